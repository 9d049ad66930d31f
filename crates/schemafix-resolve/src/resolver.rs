use schemafix_core::{Column, Table};

use crate::keywords::IdentifierRules;
use crate::names;
use crate::relations;
use crate::repair::{self, FixOutcome};
use crate::settings::ResolverSettings;

/// Name resolution and schema inference over a model.
///
/// Every operation has a default implementation; implementors only supply
/// settings and identifier rules, and may override any step. Overrides are
/// honored by the other defaults: [`ModelResolver::connect`] goes through
/// [`ModelResolver::guess_relation`], and reserved-name checks go through
/// [`ModelResolver::is_reserved_identifier`].
pub trait ModelResolver {
    fn settings(&self) -> &ResolverSettings;

    fn identifier_rules(&self) -> &dyn IdentifierRules;

    /// Alias for `column`, renamed with a numeric suffix when another column
    /// of `table` already uses it.
    fn resolve_column_alias(&self, column: &Column, table: Option<&Table>) -> String {
        let alias = self.resolve_alias(&column.name);
        match table {
            Some(table) => names::deduplicate_column_alias(&alias, column, table),
            None => alias,
        }
    }

    /// Strip symbols, strip prefixes, then fix casing.
    fn resolve_alias(&self, name: &str) -> String {
        if name.is_empty() {
            return String::new();
        }
        let name = names::strip_characters(name, &self.settings().strip_characters);
        self.normalize_case(&self.strip_prefix(&name))
    }

    fn strip_prefix(&self, name: &str) -> String {
        names::strip_prefix(name, &self.settings().prefix_tokens, |candidate| {
            self.is_reserved_identifier(candidate)
        })
    }

    fn normalize_case(&self, name: &str) -> String {
        names::normalize_case(name)
    }

    fn is_reserved_identifier(&self, name: &str) -> bool {
        names::is_reserved_identifier(name, self.identifier_rules())
    }

    fn display_name(&self, name: &str, description: Option<&str>) -> String {
        names::display_name(name, description)
    }

    /// Guess relations from `table` to `rtable`. Returns the number of
    /// columns connected.
    fn connect(&self, table: &mut Table, rtable: &mut Table) -> usize {
        relations::connect_with(table, rtable, |table, rtable, rname, column, name| {
            self.guess_relation(table, rtable, rname, column, name)
        })
    }

    fn guess_relation(
        &self,
        table: &mut Table,
        rtable: &mut Table,
        rname: &str,
        column: &Column,
        name: &str,
    ) -> bool {
        relations::guess_relation(table, rtable, rname, column, name)
    }

    fn fix(&self, table: &mut Table) -> FixOutcome {
        repair::fix_table(table, |name| self.is_reserved_identifier(name))
    }
}

/// The stock resolver: default behavior for every operation.
pub struct StandardResolver {
    settings: ResolverSettings,
    rules: Box<dyn IdentifierRules + Send + Sync>,
}

impl StandardResolver {
    /// Resolver using the identifier rules of `settings.target`.
    pub fn new(settings: ResolverSettings) -> Self {
        let rules = settings.target.rules();
        Self { settings, rules }
    }

    /// Resolver with caller-provided identifier rules.
    pub fn with_rules(
        settings: ResolverSettings,
        rules: impl IdentifierRules + Send + Sync + 'static,
    ) -> Self {
        Self {
            settings,
            rules: Box::new(rules),
        }
    }
}

impl Default for StandardResolver {
    fn default() -> Self {
        Self::new(ResolverSettings::default())
    }
}

impl ModelResolver for StandardResolver {
    fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    fn identifier_rules(&self) -> &dyn IdentifierRules {
        self.rules.as_ref()
    }
}
