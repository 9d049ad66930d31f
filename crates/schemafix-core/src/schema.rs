use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constraints::{Index, Relation};

/// A schema snapshot: the arena of tables the resolver works on.
///
/// Tables are addressed by position; indexes and relations refer to
/// tables and columns by name only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Model {
    /// Database or model name when available.
    #[serde(default)]
    pub name: Option<String>,
    /// Tables captured from the source schema.
    pub tables: Vec<Table>,
}

impl Model {
    /// Case-insensitive lookup of a table by raw name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables
            .iter()
            .find(|table| table.name.eq_ignore_ascii_case(name))
    }

    /// Borrow two distinct tables mutably at the same time.
    ///
    /// Returns `None` when `a == b` or either position is out of range.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> Option<(&mut Table, &mut Table)> {
        if a == b || a >= self.tables.len() || b >= self.tables.len() {
            return None;
        }

        if a < b {
            let (head, tail) = self.tables.split_at_mut(b);
            Some((&mut head[a], &mut tail[0]))
        } else {
            let (head, tail) = self.tables.split_at_mut(a);
            Some((&mut tail[0], &mut head[b]))
        }
    }
}

/// A table as read from the source schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    /// Raw name as read from the source.
    pub name: String,
    /// Resolved code-safe name.
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_name: String,
    pub columns: Vec<Column>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default)]
    pub relations: Vec<Relation>,
}

impl Table {
    /// Create an empty table with the given raw name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Look up a column by raw name, falling back to its alias.
    ///
    /// Both comparisons ignore ASCII case.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.column_position(name).map(|pos| &self.columns[pos])
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        let pos = self.column_position(name)?;
        Some(&mut self.columns[pos])
    }

    fn column_position(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.name.eq_ignore_ascii_case(name))
            .or_else(|| {
                self.columns.iter().position(|column| {
                    !column.alias.is_empty() && column.alias.eq_ignore_ascii_case(name)
                })
            })
    }

    /// Columns matching `names`, in the order given. Unknown names are skipped.
    pub fn columns_named<S: AsRef<str>>(&self, names: &[S]) -> Vec<&Column> {
        names
            .iter()
            .filter_map(|name| self.column(name.as_ref()))
            .collect()
    }

    /// Columns currently flagged as primary key, in table order.
    pub fn primary_keys(&self) -> Vec<&Column> {
        self.columns.iter().filter(|column| column.primary_key).collect()
    }

    pub fn has_primary_key(&self) -> bool {
        self.columns.iter().any(|column| column.primary_key)
    }

    /// The index covering exactly the single given column.
    pub fn index_on(&self, column: &str) -> Option<&Index> {
        self.index_position(column).map(|pos| &self.indexes[pos])
    }

    pub fn index_on_mut(&mut self, column: &str) -> Option<&mut Index> {
        let pos = self.index_position(column)?;
        Some(&mut self.indexes[pos])
    }

    fn index_position(&self, column: &str) -> Option<usize> {
        self.indexes.iter().position(|index| index.covers_only(column))
    }

    /// The first relation whose source is `column`.
    pub fn relation_on(&self, column: &str) -> Option<&Relation> {
        self.relation_position(column).map(|pos| &self.relations[pos])
    }

    pub fn relation_on_mut(&mut self, column: &str) -> Option<&mut Relation> {
        let pos = self.relation_position(column)?;
        Some(&mut self.relations[pos])
    }

    fn relation_position(&self, column: &str) -> Option<usize> {
        self.relations
            .iter()
            .position(|relation| relation.column.eq_ignore_ascii_case(column))
    }

    /// The relation matching the full `(column, table, column)` triple.
    pub fn relation(
        &self,
        column: &str,
        relation_table: &str,
        relation_column: &str,
    ) -> Option<&Relation> {
        self.relations
            .iter()
            .find(|relation| relation.matches(column, relation_table, relation_column))
    }

    /// A blank index owned by this table; attach it with [`Table::push_index`].
    pub fn create_index(&self) -> Index {
        Index::default()
    }

    /// A blank relation owned by this table; attach it with [`Table::push_relation`].
    pub fn create_relation(&self) -> Relation {
        Relation::default()
    }

    pub fn push_index(&mut self, index: Index) {
        self.indexes.push(index);
    }

    pub fn push_relation(&mut self, relation: Relation) {
        self.relations.push(relation);
    }
}

/// Column metadata for a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    /// Raw name as read from the source.
    pub name: String,
    /// Resolved code-safe name.
    #[serde(default)]
    pub alias: String,
    /// Data type tag; relation inference requires both sides to match exactly.
    pub data_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub primary_key: bool,
    /// Auto-increment column.
    #[serde(default)]
    pub identity: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            ..Self::default()
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
