//! Schema model contracts for schemafix.
//!
//! This crate defines the table/column/index/relation model the resolver
//! mutates, plus validation and relation-graph helpers shared by callers.

pub mod constraints;
pub mod error;
pub mod graph;
pub mod schema;
pub mod validation;

pub use constraints::{Index, Relation};
pub use error::{Error, Result};
pub use graph::{RelationGraphReport, RelationGraphSummary, build_relation_graph_report};
pub use schema::{Column, Model, Table};
pub use validation::validate_model;
