//! Relation inference from `<RelatedTable><RelatedColumn>` column naming.

use schemafix_core::{Column, Table};
use tracing::debug;

/// Try every eligible column of `table` against `rtable` with `guess`.
///
/// Primary-key and auto-increment columns are skipped. For each column up
/// to four `(table name, column name)` pairs are tried, raw names first,
/// aliases only when they differ from the raw names. Returns how many
/// columns were connected.
pub fn connect_with<F>(table: &mut Table, rtable: &mut Table, mut guess: F) -> usize
where
    F: FnMut(&mut Table, &mut Table, &str, &Column, &str) -> bool,
{
    let rname = rtable.name.clone();
    let ralias = (!rtable.alias.is_empty() && !rtable.alias.eq_ignore_ascii_case(&rname))
        .then(|| rtable.alias.clone());

    let mut connected = 0;
    for pos in 0..table.columns.len() {
        let column = table.columns[pos].clone();
        if column.primary_key || column.identity {
            continue;
        }

        let alias = (!column.alias.is_empty() && !column.alias.eq_ignore_ascii_case(&column.name))
            .then_some(column.alias.as_str());

        let mut attempts = vec![(rname.as_str(), column.name.as_str())];
        attempts.extend(alias.map(|alias| (rname.as_str(), alias)));
        if let Some(ralias) = ralias.as_deref() {
            attempts.push((ralias, column.name.as_str()));
            attempts.extend(alias.map(|alias| (ralias, alias)));
        }

        if attempts
            .into_iter()
            .any(|(rname, name)| guess(table, rtable, rname, &column, name))
        {
            connected += 1;
        }
    }

    connected
}

/// Relate `column` of `table` to a column of `rtable` when `name` reads as
/// `rname` followed by the name of a column of `rtable` with the same type.
///
/// On a match a relation is added to `table` and, unless an equivalent one
/// exists already, a mirror relation is added to `rtable`. Both are marked
/// computed.
pub fn guess_relation(
    table: &mut Table,
    rtable: &mut Table,
    rname: &str,
    column: &Column,
    name: &str,
) -> bool {
    if name.len() <= rname.len() {
        return false;
    }
    let key = match name.get(..rname.len()) {
        Some(head) if head.eq_ignore_ascii_case(rname) => &name[rname.len()..],
        _ => return false,
    };

    let target = match rtable.column(key) {
        Some(target) if target.data_type == column.data_type => target.clone(),
        _ => return false,
    };

    // many-to-one unless the source column is itself unique
    if table
        .relation(&column.name, &rtable.name, &target.name)
        .is_none()
    {
        let mut relation = table.create_relation();
        relation.column = column.name.clone();
        relation.relation_table = rtable.name.clone();
        relation.relation_column = target.name.clone();
        relation.unique = column.primary_key
            || column.identity
            || table.index_on(&column.name).is_some_and(|index| index.unique);
        relation.computed = true;

        debug!(
            table = %table.name,
            column = %column.name,
            relation_table = %rtable.name,
            relation_column = %target.name,
            unique = relation.unique,
            "relation inferred"
        );
        table.push_relation(relation);
    }

    if rtable
        .relation(&target.name, &table.name, &column.name)
        .is_some()
    {
        return true;
    }

    // the referenced side is unique unless nothing structural says so
    let mut mirror = rtable.create_relation();
    mirror.column = target.name.clone();
    mirror.relation_table = table.name.clone();
    mirror.relation_column = column.name.clone();
    mirror.unique = target.primary_key
        || target.identity
        || rtable.index_on(&target.name).is_some_and(|index| index.unique);
    mirror.computed = true;
    rtable.push_relation(mirror);

    true
}

/// [`connect_with`] using the stock [`guess_relation`].
pub fn connect(table: &mut Table, rtable: &mut Table) -> usize {
    connect_with(table, rtable, guess_relation)
}
