//! Identifier rules of the language the resolved model is generated into.

use serde::{Deserialize, Serialize};

/// Decides whether a name can be used as a bare identifier in generated code.
pub trait IdentifierRules {
    /// Short language tag used in logs.
    fn language(&self) -> &'static str;

    fn is_valid_identifier(&self, name: &str) -> bool;
}

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while", "__arglist", "__makeref", "__reftype", "__refvalue",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod",
    "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
    "trait", "true", "type", "unsafe", "use", "where", "while", "abstract", "become", "box",
    "do", "final", "macro", "override", "priv", "try", "typeof", "unsized", "virtual",
    "yield",
];

/// C# identifier rules. Non-ASCII letters are accepted, as C# allows them.
#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpIdentifiers;

impl IdentifierRules for CSharpIdentifiers {
    fn language(&self) -> &'static str {
        "csharp"
    }

    fn is_valid_identifier(&self, name: &str) -> bool {
        has_identifier_shape(name) && !CSHARP_KEYWORDS.contains(&name)
    }
}

/// Rust identifier rules, strict and reserved keywords included.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustIdentifiers;

impl IdentifierRules for RustIdentifiers {
    fn language(&self) -> &'static str {
        "rust"
    }

    fn is_valid_identifier(&self, name: &str) -> bool {
        name != "_" && has_identifier_shape(name) && !RUST_KEYWORDS.contains(&name)
    }
}

/// Letters, digits and underscores, not starting with a digit.
fn has_identifier_shape(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_alphanumeric())
}

/// Target language selected in settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetLanguage {
    #[default]
    CSharp,
    Rust,
}

impl TargetLanguage {
    pub fn rules(self) -> Box<dyn IdentifierRules + Send + Sync> {
        match self {
            TargetLanguage::CSharp => Box::new(CSharpIdentifiers),
            TargetLanguage::Rust => Box::new(RustIdentifiers),
        }
    }
}
