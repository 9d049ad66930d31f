use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Index definition. Columns are referenced by raw name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Index {
    #[serde(default)]
    pub name: Option<String>,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub primary_key: bool,
    /// Created or adjusted by inference rather than read from the source.
    #[serde(default)]
    pub computed: bool,
}

impl Index {
    /// A plain index over the given columns.
    pub fn on<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// True when this index covers exactly one column, `column`.
    pub fn covers_only(&self, column: &str) -> bool {
        matches!(self.columns.as_slice(), [only] if only.eq_ignore_ascii_case(column))
    }
}

/// Directional relation from a column of the owning table to a column of
/// another table. A foreign key is a mirrored pair of relations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Relation {
    /// Source column on the owning table.
    pub column: String,
    pub relation_table: String,
    pub relation_column: String,
    #[serde(default)]
    pub unique: bool,
    /// Created or adjusted by inference rather than read from the source.
    #[serde(default)]
    pub computed: bool,
}

impl Relation {
    pub fn new(
        column: impl Into<String>,
        relation_table: impl Into<String>,
        relation_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            relation_table: relation_table.into(),
            relation_column: relation_column.into(),
            ..Self::default()
        }
    }

    /// Case-insensitive comparison against a `(column, table, column)` triple.
    pub fn matches(&self, column: &str, relation_table: &str, relation_column: &str) -> bool {
        self.column.eq_ignore_ascii_case(column)
            && self.relation_table.eq_ignore_ascii_case(relation_table)
            && self.relation_column.eq_ignore_ascii_case(relation_column)
    }
}
