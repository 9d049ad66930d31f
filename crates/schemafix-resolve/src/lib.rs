//! Name resolution and schema inference for reverse-engineered models.
//!
//! Raw table and column names become code-safe aliases; relations, indexes
//! and primary keys the source schema left implicit are inferred from
//! naming conventions and existing indexes.

pub mod errors;
pub mod keywords;
pub mod names;
pub mod pipeline;
pub mod relations;
pub mod repair;
pub mod resolver;
pub mod settings;

pub use errors::{ResolveError, Result};
pub use keywords::{CSharpIdentifiers, IdentifierRules, RustIdentifiers, TargetLanguage};
pub use pipeline::{ResolutionReport, resolve_checked, resolve_model};
pub use repair::{FixOutcome, PrimaryKeySource};
pub use resolver::{ModelResolver, StandardResolver};
pub use settings::{ResolverSettings, load_settings};
