use schemafix_core::{Model, validate_model};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::resolver::ModelResolver;

/// Summary of what a resolution run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub tables: usize,
    pub relations_inferred: usize,
    pub indexes_created: usize,
    pub primary_keys_derived: usize,
    pub aliases_renamed: usize,
    /// Tables for which no primary-key signal was found.
    pub tables_without_primary_key: Vec<String>,
}

/// Resolve aliases, infer relations and repair every table of `model`.
///
/// Phases run in order and each can be switched off in the resolver
/// settings: aliases and display names first, then relation inference
/// over every ordered pair of distinct tables, then per-table repair.
pub fn resolve_model(resolver: &dyn ModelResolver, model: &mut Model) -> ResolutionReport {
    let settings = resolver.settings();
    let mut report = ResolutionReport {
        tables: model.tables.len(),
        ..ResolutionReport::default()
    };

    info!(
        tables = report.tables,
        target = resolver.identifier_rules().language(),
        "resolution started"
    );

    if settings.resolve_aliases {
        assign_aliases(resolver, model);
    }

    if settings.infer_relations {
        let before = relation_count(model);
        let count = model.tables.len();
        for pos in 0..count {
            for other in 0..count {
                if let Some((table, rtable)) = model.pair_mut(pos, other) {
                    let connected = resolver.connect(table, rtable);
                    if connected > 0 {
                        debug!(
                            table = %table.name,
                            relation_table = %rtable.name,
                            columns = connected,
                            "tables connected"
                        );
                    }
                }
            }
        }
        report.relations_inferred = relation_count(model) - before;
    }

    if settings.repair_tables {
        for table in &mut model.tables {
            let outcome = resolver.fix(table);
            report.indexes_created += outcome.indexes_created;
            report.aliases_renamed += outcome.aliases_renamed;
            if outcome.primary_key.is_some() {
                report.primary_keys_derived += 1;
            }
        }
    }

    for table in &model.tables {
        if !table.has_primary_key() {
            warn!(table = %table.name, "no primary key could be derived");
            report.tables_without_primary_key.push(table.name.clone());
        }
    }

    info!(
        relations_inferred = report.relations_inferred,
        indexes_created = report.indexes_created,
        primary_keys_derived = report.primary_keys_derived,
        aliases_renamed = report.aliases_renamed,
        "resolution finished"
    );

    report
}

/// Validate `model`, resolve it, then validate the result.
pub fn resolve_checked(
    resolver: &dyn ModelResolver,
    model: &mut Model,
) -> Result<ResolutionReport> {
    validate_model(model)?;
    let report = resolve_model(resolver, model);
    validate_model(model)?;
    Ok(report)
}

fn assign_aliases(resolver: &dyn ModelResolver, model: &mut Model) {
    let keep_existing = resolver.settings().keep_existing_aliases;

    for table in &mut model.tables {
        if !keep_existing || table.alias.is_empty() {
            table.alias = resolver.resolve_alias(&table.name);
        }
        table.display_name = resolver.display_name(&table.alias, table.description.as_deref());

        for pos in 0..table.columns.len() {
            let column = &table.columns[pos];
            let alias = if keep_existing && !column.alias.is_empty() {
                column.alias.clone()
            } else {
                resolver.resolve_column_alias(column, Some(&*table))
            };
            let display_name = resolver.display_name(&alias, column.description.as_deref());

            let column = &mut table.columns[pos];
            column.alias = alias;
            column.display_name = display_name;
        }
    }
}

fn relation_count(model: &Model) -> usize {
    model.tables.iter().map(|table| table.relations.len()).sum()
}
