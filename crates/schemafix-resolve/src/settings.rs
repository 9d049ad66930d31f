use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ResolveError, Result};
use crate::keywords::TargetLanguage;
use crate::names::{DEFAULT_PREFIX_TOKENS, DEFAULT_STRIP_CHARACTERS};

/// Resolver configuration, usually read from a TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverSettings {
    /// Language whose identifier rules decide what is reserved.
    pub target: TargetLanguage,
    /// Characters deleted from raw names.
    pub strip_characters: String,
    /// Tokens stripped from either end of raw names.
    pub prefix_tokens: Vec<String>,
    pub resolve_aliases: bool,
    /// Keep aliases the model already carries instead of recomputing them.
    pub keep_existing_aliases: bool,
    pub infer_relations: bool,
    pub repair_tables: bool,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            target: TargetLanguage::default(),
            strip_characters: DEFAULT_STRIP_CHARACTERS.to_string(),
            prefix_tokens: DEFAULT_PREFIX_TOKENS
                .iter()
                .map(|token| token.to_string())
                .collect(),
            resolve_aliases: true,
            keep_existing_aliases: false,
            infer_relations: true,
            repair_tables: true,
        }
    }
}

impl ResolverSettings {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Load settings from a TOML file. Missing keys take their defaults.
pub fn load_settings(path: &Path) -> Result<ResolverSettings> {
    let content = std::fs::read_to_string(path).map_err(|source| ResolveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ResolverSettings::from_toml_str(&content)
}
