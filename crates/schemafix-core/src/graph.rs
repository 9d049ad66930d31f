use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::schema::Model;

/// Summary of the relation graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationGraphSummary {
    pub nodes: usize,
    pub edges: usize,
}

/// Dependency ordering derived from table relations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationGraphReport {
    pub summary: RelationGraphSummary,
    pub topo_order: Option<Vec<String>>,
    pub cycle: Option<Vec<String>>,
}

/// Build a deterministic dependency report from the relations of a model.
///
/// A non-unique relation marks its owning table as the "many" side, which
/// depends on the referenced table. Unique relations add no edge.
pub fn build_relation_graph_report(model: &Model) -> RelationGraphReport {
    let graph = build_adjacency(model);
    let nodes = graph.len();
    let edges = graph.values().map(|targets| targets.len()).sum();
    let summary = RelationGraphSummary { nodes, edges };

    match toposort(&graph) {
        Ok(order) => RelationGraphReport {
            summary,
            topo_order: Some(order),
            cycle: None,
        },
        Err(cycle) => RelationGraphReport {
            summary,
            topo_order: None,
            cycle: Some(cycle),
        },
    }
}

fn build_adjacency(model: &Model) -> BTreeMap<String, BTreeSet<String>> {
    let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

    for table in &model.tables {
        graph.entry(table.name.clone()).or_default();

        for relation in &table.relations {
            if relation.unique || relation.relation_table.eq_ignore_ascii_case(&table.name) {
                continue;
            }

            let referenced = model
                .table(&relation.relation_table)
                .map(|target| target.name.clone())
                .unwrap_or_else(|| relation.relation_table.clone());
            graph
                .entry(referenced)
                .or_default()
                .insert(table.name.clone());
        }
    }

    graph
}

/// Order nodes so every edge source precedes its target, taking the
/// smallest ready name first. On a cycle, returns the nodes left unordered.
fn toposort(graph: &BTreeMap<String, BTreeSet<String>>) -> Result<Vec<String>, Vec<String>> {
    let mut waiting: BTreeMap<&str, usize> = graph.keys().map(|node| (node.as_str(), 0)).collect();
    for target in graph.values().flatten() {
        *waiting.entry(target.as_str()).or_default() += 1;
    }

    let mut order = Vec::with_capacity(waiting.len());
    while let Some(node) = waiting
        .iter()
        .find(|(_, incoming)| **incoming == 0)
        .map(|(node, _)| *node)
    {
        waiting.remove(node);
        for target in graph.get(node).into_iter().flatten() {
            if let Some(incoming) = waiting.get_mut(target.as_str()) {
                *incoming -= 1;
            }
        }
        order.push(node.to_string());
    }

    if waiting.is_empty() {
        Ok(order)
    } else {
        Err(waiting.into_keys().map(str::to_string).collect())
    }
}
