use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, Result};
use crate::schema::Model;

/// Validate internal consistency of a model.
///
/// This checks:
/// - duplicate tables/columns (ignoring ASCII case)
/// - index columns exist
/// - relation source columns and referenced targets exist
pub fn validate_model(model: &Model) -> Result<()> {
    let mut catalog: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for table in &model.tables {
        let table_key = table.name.to_ascii_lowercase();
        if catalog.contains_key(&table_key) {
            return Err(Error::InvalidModel(format!(
                "duplicate table name: {}",
                table.name
            )));
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.name.to_ascii_lowercase()) {
                return Err(Error::InvalidModel(format!(
                    "duplicate column name: {}.{}",
                    table.name, column.name
                )));
            }
        }

        catalog.insert(table_key, columns);
    }

    for table in &model.tables {
        let columns = catalog
            .get(&table.name.to_ascii_lowercase())
            .ok_or_else(|| {
                Error::InvalidModel(format!("missing table in catalog: {}", table.name))
            })?;

        for index in &table.indexes {
            for column in &index.columns {
                if !columns.contains(&column.to_ascii_lowercase()) {
                    return Err(Error::InvalidModel(format!(
                        "index column not found: {}.{}",
                        table.name, column
                    )));
                }
            }
        }

        for relation in &table.relations {
            if !columns.contains(&relation.column.to_ascii_lowercase()) {
                return Err(Error::InvalidModel(format!(
                    "relation column not found: {}.{}",
                    table.name, relation.column
                )));
            }

            let ref_columns = catalog
                .get(&relation.relation_table.to_ascii_lowercase())
                .ok_or_else(|| {
                    Error::InvalidModel(format!(
                        "referenced table not found: {}",
                        relation.relation_table
                    ))
                })?;

            if !ref_columns.contains(&relation.relation_column.to_ascii_lowercase()) {
                return Err(Error::InvalidModel(format!(
                    "referenced column not found: {}.{}",
                    relation.relation_table, relation.relation_column
                )));
            }
        }
    }

    Ok(())
}
