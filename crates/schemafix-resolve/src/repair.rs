//! Whole-table consistency repair: indexes, primary keys and aliases.

use std::collections::HashSet;
use std::fmt;

use schemafix_core::{Index, Table};
use tracing::{debug, warn};

/// Signal a derived primary key was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryKeySource {
    PrimaryIndex,
    UniqueIndex,
    Identity,
    FirstIndex,
}

impl PrimaryKeySource {
    pub fn as_str(self) -> &'static str {
        match self {
            PrimaryKeySource::PrimaryIndex => "primary_index",
            PrimaryKeySource::UniqueIndex => "unique_index",
            PrimaryKeySource::Identity => "identity",
            PrimaryKeySource::FirstIndex => "first_index",
        }
    }
}

impl fmt::Display for PrimaryKeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single [`fix_table`] pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixOutcome {
    pub indexes_created: usize,
    pub primary_key: Option<PrimaryKeySource>,
    pub aliases_renamed: usize,
}

/// Repair one table in place. Steps run in a fixed order; each relies on
/// the ones before it.
pub fn fix_table<F>(table: &mut Table, is_reserved: F) -> FixOutcome
where
    F: Fn(&str) -> bool,
{
    let mut outcome = FixOutcome::default();

    sync_relations_from_indexes(table);
    outcome.indexes_created += index_relation_columns(table);
    outcome.primary_key = derive_primary_key(table);
    outcome.indexes_created += index_identity_columns(table);
    sync_index_flags(table);
    outcome.aliases_renamed = resolve_alias_collisions(table, is_reserved);

    if let Some(source) = outcome.primary_key {
        debug!(table = %table.name, source = %source, "primary key derived");
    }

    outcome
}

/// Single-column indexes decide the uniqueness of the relation on that column.
fn sync_relations_from_indexes(table: &mut Table) {
    for pos in 0..table.indexes.len() {
        let index = &table.indexes[pos];
        let [column] = index.columns.as_slice() else {
            continue;
        };
        let (column, unique, computed) = (column.clone(), index.unique, index.computed);

        if let Some(relation) = table.relation_on_mut(&column) {
            relation.unique = unique;
            relation.computed = computed;
        }
    }
}

/// Every non-key relation column gets a single-column index.
fn index_relation_columns(table: &mut Table) -> usize {
    let mut created = 0;

    for pos in 0..table.relations.len() {
        let relation = &table.relations[pos];
        let column = relation.column.clone();
        let unique = relation.unique;

        match table.column(&column) {
            Some(found) if !found.primary_key => {}
            _ => continue,
        }
        if table.index_on(&column).is_some() {
            continue;
        }

        let mut index = table.create_index();
        index.columns = vec![column];
        index.unique = unique;
        index.computed = true;
        table.push_index(index);
        created += 1;
    }

    created
}

fn derive_primary_key(table: &mut Table) -> Option<PrimaryKeySource> {
    if table.has_primary_key() {
        return None;
    }

    let tiers: [(PrimaryKeySource, fn(&Index) -> bool); 2] = [
        (PrimaryKeySource::PrimaryIndex, |index| index.primary_key),
        (PrimaryKeySource::UniqueIndex, |index| index.unique),
    ];
    for (source, qualifies) in tiers {
        let names: Vec<String> = table
            .indexes
            .iter()
            .filter(|index| qualifies(index))
            .flat_map(|index| index.columns.iter().cloned())
            .collect();
        if promote(table, &names) {
            return Some(source);
        }
    }

    let first = table
        .indexes
        .iter()
        .find(|index| !table.columns_named(&index.columns).is_empty())
        .map(|index| index.columns.clone());
    if let Some(names) = first {
        if promote(table, &names) {
            return Some(PrimaryKeySource::FirstIndex);
        }
    }

    if let Some(column) = table.columns.iter_mut().find(|column| column.identity) {
        column.primary_key = true;
        return Some(PrimaryKeySource::Identity);
    }

    None
}

fn promote(table: &mut Table, names: &[String]) -> bool {
    let mut promoted = false;
    for name in names {
        if let Some(column) = table.column_mut(name) {
            column.primary_key = true;
            promoted = true;
        }
    }
    promoted
}

/// Non-key auto-increment columns must sit behind a unique single-column index.
fn index_identity_columns(table: &mut Table) -> usize {
    let mut created = 0;

    for pos in 0..table.columns.len() {
        let column = &table.columns[pos];
        if !column.identity || column.primary_key {
            continue;
        }
        let name = column.name.clone();

        match table.index_on_mut(&name) {
            Some(index) => index.unique = true,
            None => {
                let mut index = table.create_index();
                index.columns = vec![name];
                index.unique = true;
                index.computed = true;
                table.push_index(index);
                created += 1;
            }
        }
    }

    created
}

/// Indexes over only auto-increment columns are unique; indexes over only
/// primary-key columns are primary.
fn sync_index_flags(table: &mut Table) {
    for pos in 0..table.indexes.len() {
        let columns = table.columns_named(&table.indexes[pos].columns);
        if columns.is_empty() {
            continue;
        }
        let all_identity = columns.iter().all(|column| column.identity);
        let all_primary = columns.iter().all(|column| column.primary_key);

        let index = &mut table.indexes[pos];
        if !index.unique {
            index.unique = all_identity;
        }
        if !index.primary_key {
            index.primary_key = all_primary;
        }
    }
}

/// Rename column aliases that repeat the table alias or an earlier column
/// alias (ignoring ASCII case), or that are reserved, by appending 2, 3, ...
///
/// Aliases that no numeric suffix can make valid (empty, leading digit,
/// stray symbols) are first turned into an identifier shape.
fn resolve_alias_collisions<F>(table: &mut Table, is_reserved: F) -> usize
where
    F: Fn(&str) -> bool,
{
    let mut seen: HashSet<String> = HashSet::new();
    seen.insert(table.alias.to_ascii_lowercase());

    let limit = table.columns.len() + 2;
    let mut renamed = 0;

    for column in &mut table.columns {
        let taken = |name: &str| seen.contains(&name.to_ascii_lowercase()) || is_reserved(name);

        if taken(&column.alias) {
            let base = if is_reserved(&format!("{}2", column.alias)) {
                identifier_shape(&column.alias)
            } else {
                column.alias.clone()
            };

            let shaped = (base != column.alias).then(|| base.clone());
            let candidate = shaped
                .into_iter()
                .chain((2..=limit).map(|n| format!("{base}{n}")))
                .find(|name| !taken(name));

            match candidate {
                Some(candidate) => {
                    column.alias = candidate;
                    renamed += 1;
                }
                None => warn!(
                    table = %table.name,
                    column = %column.name,
                    alias = %column.alias,
                    "alias could not be made unique"
                ),
            }
        }

        seen.insert(column.alias.to_ascii_lowercase());
    }

    renamed
}

/// Replace symbols with `_` and prefix `_` when empty or led by a digit.
fn identifier_shape(alias: &str) -> String {
    let mut shaped: String = alias
        .chars()
        .map(|c| if c == '_' || c.is_alphanumeric() { c } else { '_' })
        .collect();
    if !shaped.starts_with(|c: char| c == '_' || c.is_alphabetic()) {
        shaped.insert(0, '_');
    }
    shaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemafix_core::{Column, Relation};

    use crate::keywords::CSharpIdentifiers;
    use crate::names::is_reserved_identifier;

    fn fix(table: &mut Table) -> FixOutcome {
        fix_table(table, |name| is_reserved_identifier(name, &CSharpIdentifiers))
    }

    fn aliased(name: &str, data_type: &str) -> Column {
        Column::new(name, data_type).with_alias(name)
    }

    #[test]
    fn index_uniqueness_flows_into_relation() {
        let mut table = Table::new("Admin");
        table.columns = vec![aliased("ID", "int").primary_key(), aliased("RoleID", "int")];
        table.indexes = vec![Index::on(["RoleID"]).unique()];
        table.relations = vec![Relation::new("RoleID", "Role", "ID")];

        fix(&mut table);

        let relation = &table.relations[0];
        assert!(relation.unique);
        assert!(!relation.computed);
    }

    #[test]
    fn relation_columns_get_indexes() {
        let mut table = Table::new("Admin");
        table.columns = vec![aliased("ID", "int").primary_key(), aliased("RoleID", "int")];
        let mut relation = Relation::new("RoleID", "Role", "ID");
        relation.unique = true;
        table.relations = vec![relation, Relation::new("ID", "Log", "AdminID")];

        let outcome = fix(&mut table);

        assert_eq!(outcome.indexes_created, 1);
        let index = table.index_on("RoleID").expect("index created");
        assert!(index.unique);
        assert!(index.computed);
        assert!(table.index_on("ID").is_none());
    }

    #[test]
    fn primary_key_prefers_primary_then_unique_index() {
        let mut table = Table::new("Order");
        table.columns = vec![
            aliased("Code", "varchar"),
            aliased("Shop", "int"),
            aliased("Seq", "int"),
        ];
        table.indexes = vec![Index::on(["Code"]).unique(), Index::on(["Shop", "Seq"]).primary()];

        let outcome = fix(&mut table);

        assert_eq!(outcome.primary_key, Some(PrimaryKeySource::PrimaryIndex));
        let keys: Vec<&str> = table.primary_keys().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(keys, ["Shop", "Seq"]);
    }

    #[test]
    fn identity_column_becomes_primary_key() {
        let mut table = Table::new("Log");
        table.columns = vec![aliased("Message", "varchar"), aliased("Seq", "int").identity()];

        let outcome = fix(&mut table);

        assert_eq!(outcome.primary_key, Some(PrimaryKeySource::Identity));
        assert!(table.columns[1].primary_key);
        assert!(table.indexes.is_empty());
    }

    #[test]
    fn first_index_wins_over_identity_column() {
        let mut table = Table::new("Tag");
        table.columns = vec![aliased("Name", "varchar"), aliased("Seq", "int").identity()];
        table.indexes = vec![Index::on(["Missing"]), Index::on(["Name"])];

        let outcome = fix(&mut table);

        assert_eq!(outcome.primary_key, Some(PrimaryKeySource::FirstIndex));
        let keys: Vec<&str> = table.primary_keys().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(keys, ["Name"]);
        assert!(table.indexes[1].primary_key);

        // the identity column stays a non-key column behind a unique index
        assert!(!table.columns[1].primary_key);
        assert_eq!(outcome.indexes_created, 1);
        assert!(table.index_on("Seq").is_some_and(|index| index.unique));
    }

    #[test]
    fn no_signal_leaves_table_without_key() {
        let mut table = Table::new("Note");
        table.columns = vec![aliased("Body", "text")];

        let outcome = fix(&mut table);

        assert!(outcome.primary_key.is_none());
        assert!(table.primary_keys().is_empty());
    }

    #[test]
    fn non_key_identity_gets_unique_index() {
        let mut table = Table::new("Ticket");
        table.columns = vec![
            aliased("Code", "varchar").primary_key(),
            aliased("Seq", "int").identity(),
        ];
        table.indexes = vec![Index::on(["Code"])];

        let outcome = fix(&mut table);

        assert_eq!(outcome.indexes_created, 1);
        let index = table.index_on("Seq").expect("identity index");
        assert!(index.unique && index.computed);
        assert!(!index.primary_key);
        // index over the key column picks up the primary flag
        assert!(table.index_on("Code").is_some_and(|index| index.primary_key));
    }

    #[test]
    fn existing_identity_index_forced_unique() {
        let mut table = Table::new("Ticket");
        table.columns = vec![
            aliased("Code", "varchar").primary_key(),
            aliased("Seq", "int").identity(),
        ];
        table.indexes = vec![Index::on(["Seq"])];

        let outcome = fix(&mut table);

        assert_eq!(outcome.indexes_created, 0);
        assert!(table.index_on("Seq").is_some_and(|index| index.unique));
    }

    #[test]
    fn colliding_and_reserved_aliases_are_renamed() {
        let mut table = Table::new("user");
        table.alias = "User".to_string();
        table.columns = vec![
            aliased("ID", "int").primary_key(),
            Column::new("user", "varchar").with_alias("user"),
            Column::new("NAME", "varchar").with_alias("Name"),
            Column::new("name", "varchar").with_alias("name"),
            Column::new("item", "varchar").with_alias("item"),
        ];

        let outcome = fix(&mut table);

        let aliases: Vec<&str> = table.columns.iter().map(|c| c.alias.as_str()).collect();
        assert_eq!(aliases, ["ID", "user2", "Name", "name2", "item2"]);
        assert_eq!(outcome.aliases_renamed, 3);
    }

    #[test]
    fn symbol_and_digit_aliases_get_identifier_shape() {
        let mut table = Table::new("Stats");
        table.alias = "Stats".to_string();
        table.columns = vec![
            Column::new("$", "int").with_alias(""),
            Column::new("()", "int").with_alias(""),
            Column::new("1st", "int").with_alias("1st"),
            Column::new("1ST", "int").with_alias("1st1"),
            Column::new("a-b", "int").with_alias("a-b"),
        ];

        let outcome = fix(&mut table);

        let aliases: Vec<&str> = table.columns.iter().map(|c| c.alias.as_str()).collect();
        assert_eq!(aliases, ["_", "_2", "_1st", "_1st1", "a_b"]);
        assert_eq!(outcome.aliases_renamed, 5);
    }

    #[test]
    fn identifier_shape_only_touches_invalid_parts() {
        assert_eq!(identifier_shape(""), "_");
        assert_eq!(identifier_shape("9lives"), "_9lives");
        assert_eq!(identifier_shape("first.name"), "first_name");
        assert_eq!(identifier_shape("用户"), "用户");
    }
}
