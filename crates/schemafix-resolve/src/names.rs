//! Name normalization: raw table/column names to code-safe aliases.

use schemafix_core::{Column, Table};

use crate::keywords::IdentifierRules;

/// Characters deleted from raw names before any other processing.
pub const DEFAULT_STRIP_CHARACTERS: &str = "$()（） \u{3000}";

/// Tokens stripped from either end of a name.
pub const DEFAULT_PREFIX_TOKENS: &[&str] = &["tbl", "table"];

/// Whether `name` cannot be used as an alias as-is.
///
/// `item` is always reserved. Any ASCII uppercase letter makes a name safe,
/// since keywords are all lowercase; otherwise the target language decides.
pub fn is_reserved_identifier(name: &str, rules: &dyn IdentifierRules) -> bool {
    if name.eq_ignore_ascii_case("item") {
        return true;
    }
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        return false;
    }
    !rules.is_valid_identifier(name)
}

pub fn strip_characters(name: &str, characters: &str) -> String {
    name.chars().filter(|c| !characters.contains(*c)).collect()
}

/// Drop a leading `xxx_` segment and `tbl`/`table` style tokens.
///
/// The segment after the first `_` replaces the name when it has at least
/// two characters, does not start with `_` and is not reserved. Each token
/// is then stripped from the start, or failing that from the end, unless
/// the remainder would be reserved.
pub fn strip_prefix<S, F>(name: &str, tokens: &[S], is_reserved: F) -> String
where
    S: AsRef<str>,
    F: Fn(&str) -> bool,
{
    let mut name = name.to_string();

    if let Some(pos) = name.find('_') {
        let rest = &name[pos + 1..];
        if rest.chars().count() >= 2 && !rest.starts_with('_') && !is_reserved(rest) {
            name = rest.to_string();
        }
    }

    for token in tokens {
        let token = token.as_ref();
        if token.is_empty() {
            continue;
        }

        let rest = match name.strip_prefix(token) {
            Some(rest) => Some(rest),
            None => name.strip_suffix(token),
        };
        if let Some(rest) = rest {
            if !is_reserved(rest) {
                name = rest.to_string();
            }
        }
    }

    name
}

/// Fix up casing of names that are all lower case or (nearly) all upper case.
pub fn normalize_case(name: &str) -> String {
    if name.eq_ignore_ascii_case("ID") {
        return "ID".to_string();
    }
    if name.chars().count() <= 2 {
        return name.to_string();
    }

    let lower = name.chars().filter(char::is_ascii_lowercase).count();
    let upper = name.chars().filter(char::is_ascii_uppercase).count();

    let mut name = if lower <= 1 || upper == 0 {
        capitalize(&name.to_lowercase())
    } else {
        name.to_string()
    };

    // boolean flags: isactive -> IsActive
    if name.starts_with("Is") {
        if let Some(third) = name[2..].chars().next().filter(char::is_ascii_lowercase) {
            name.replace_range(2..3, &third.to_ascii_uppercase().to_string());
        }
    }

    name
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::with_capacity(name.len());
            out.push(first.to_ascii_uppercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Append `1`, `2`, ... to `alias` until no other column of `table` uses it.
///
/// The scan restarts from the first column after every rename. Columns
/// sharing the raw name of `column` are treated as `column` itself. An empty
/// alias is returned as is; table repair gives it an identifier shape.
pub fn deduplicate_column_alias(alias: &str, column: &Column, table: &Table) -> String {
    if alias.is_empty() {
        return String::new();
    }

    let mut candidate = alias.to_string();
    let mut suffix = 0usize;
    let mut pos = 0;

    while pos < table.columns.len() {
        let sibling = &table.columns[pos];
        if sibling.name != column.name && candidate.eq_ignore_ascii_case(&sibling.alias) {
            suffix += 1;
            candidate = format!("{alias}{suffix}");
            pos = 0;
            continue;
        }
        pos += 1;
    }

    candidate
}

/// Short display name: the first sentence or line of the description, or
/// `name` when there is no description.
pub fn display_name(name: &str, description: Option<&str>) -> String {
    let description = match description {
        Some(description) if !description.is_empty() => description.trim(),
        _ => return name.to_string(),
    };

    match description.find(|c: char| matches!(c, '.' | '。' | '\r' | '\n')) {
        Some(pos) if pos > 0 => description[..pos].trim().to_string(),
        _ => description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::CSharpIdentifiers;

    fn reserved(name: &str) -> bool {
        is_reserved_identifier(name, &CSharpIdentifiers)
    }

    fn strip(name: &str) -> String {
        strip_prefix(name, DEFAULT_PREFIX_TOKENS, reserved)
    }

    #[test]
    fn item_and_keywords_are_reserved() {
        assert!(reserved("item"));
        assert!(reserved("ITEM"));
        assert!(reserved("class"));
        assert!(reserved("2nd"));
        assert!(!reserved("Class"));
        assert!(!reserved("name"));
    }

    #[test]
    fn strips_underscore_segment_then_tokens() {
        assert_eq!(strip("tbl_user"), "user");
        assert_eq!(strip("tbluser"), "user");
        assert_eq!(strip("usertable"), "user");
        assert_eq!(strip("sys_x"), "sys_x");
        assert_eq!(strip("a__b"), "a__b");
        assert_eq!(strip("tbl_class"), "_class");
        assert_eq!(strip("tbl"), "tbl");
        assert_eq!(strip("Tbluser"), "Tbluser");
    }

    #[test]
    fn normalizes_case_of_flat_names() {
        assert_eq!(normalize_case("id"), "ID");
        assert_eq!(normalize_case("Id"), "ID");
        assert_eq!(normalize_case("no"), "no");
        assert_eq!(normalize_case("username"), "Username");
        assert_eq!(normalize_case("USERNAME"), "Username");
        assert_eq!(normalize_case("UserName"), "UserName");
        assert_eq!(normalize_case("isactive"), "IsActive");
        assert_eq!(normalize_case("ISACTIVE"), "IsActive");
        assert_eq!(normalize_case("用户名"), "用户名");
    }

    #[test]
    fn deduplicates_against_sibling_aliases() {
        let mut table = Table::new("User");
        table.columns = vec![
            Column::new("name", "varchar").with_alias("Name"),
            Column::new("NAME_", "varchar").with_alias("Name1"),
            Column::new("u_name", "varchar"),
        ];

        let column = table.columns[2].clone();
        assert_eq!(deduplicate_column_alias("Name", &column, &table), "Name2");

        let first = table.columns[0].clone();
        assert_eq!(deduplicate_column_alias("Name", &first, &table), "Name");
    }

    #[test]
    fn empty_alias_is_not_numbered() {
        let mut table = Table::new("Stats");
        table.columns = vec![
            Column::new("$", "int").with_alias(""),
            Column::new("()", "int"),
        ];

        let column = table.columns[1].clone();
        assert_eq!(deduplicate_column_alias("", &column, &table), "");
    }

    #[test]
    fn display_name_uses_first_sentence() {
        assert_eq!(
            display_name("Name", Some("First sentence. Second sentence.")),
            "First sentence"
        );
        assert_eq!(display_name("Name", Some("用户名。登录用")), "用户名");
        assert_eq!(display_name("Name", Some("  Title\r\nmore")), "Title");
        assert_eq!(display_name("Name", Some(".hidden")), ".hidden");
        assert_eq!(display_name("Name", Some("")), "Name");
        assert_eq!(display_name("Name", None), "Name");
    }

    #[test]
    fn strip_characters_removes_full_width_symbols() {
        assert_eq!(
            strip_characters("Price（USD） $", DEFAULT_STRIP_CHARACTERS),
            "PriceUSD"
        );
    }
}
