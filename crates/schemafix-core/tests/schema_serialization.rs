use schemafix_core::{Column, Index, Model, Table};

#[test]
fn serializes_model_deterministically() {
    let mut role = Table::new("Role");
    role.alias = "Role".to_string();
    role.display_name = "Role".to_string();
    let mut id = Column::new("ID", "int").primary_key().identity();
    id.alias = "ID".to_string();
    id.display_name = "ID".to_string();
    role.columns = vec![id];

    let model = Model {
        name: Some("demo".to_string()),
        tables: vec![role],
    };

    let json = serde_json::to_string_pretty(&model).expect("serialize model");
    let expected = r#"{
  "name": "demo",
  "tables": [
    {
      "name": "Role",
      "alias": "Role",
      "description": null,
      "display_name": "Role",
      "columns": [
        {
          "name": "ID",
          "alias": "ID",
          "data_type": "int",
          "description": null,
          "display_name": "ID",
          "primary_key": true,
          "identity": true
        }
      ],
      "indexes": [],
      "relations": []
    }
  ]
}"#;
    assert_eq!(json, expected);
}

#[test]
fn deserializes_sparse_snapshot_with_defaults() {
    let json = r#"{
        "tables": [
            {
                "name": "tbl_admin",
                "columns": [
                    { "name": "id", "data_type": "int", "identity": true },
                    { "name": "RoleID", "data_type": "int" }
                ],
                "indexes": [ { "columns": ["RoleID"] } ]
            }
        ]
    }"#;

    let model: Model = serde_json::from_str(json).expect("parse model");
    assert!(model.name.is_none());

    let table = &model.tables[0];
    assert!(table.alias.is_empty());
    assert!(table.relations.is_empty());
    assert!(table.columns[0].identity);
    assert!(!table.columns[0].primary_key);
    assert_eq!(table.indexes[0], Index::on(["RoleID"]));
}
