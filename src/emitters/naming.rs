//! Identifier naming
//!
//! Element names are split into words on case changes, spaces, hyphens
//! and underscores, then reassembled for the target language. Go names
//! follow golint: common initialisms are written all upper case.

use std::collections::HashSet;

use heck::{CamelCase, SnakeCase};
use once_cell::sync::Lazy;

static INITIALISMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
        "IP", "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS",
        "TTL", "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XMPP", "XSRF",
        "XSS",
    ]
    .into_iter()
    .collect()
});

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "box", "break", "const", "continue", "do", "dyn", "else",
    "enum", "extern", "false", "final", "fn", "for", "if", "impl", "in", "let", "loop", "macro",
    "match", "mod", "move", "mut", "override", "priv", "pub", "ref", "return", "static", "struct",
    "trait", "true", "try", "type", "typeof", "unsafe", "unsized", "use", "virtual", "where",
    "while", "yield",
];

// Go keywords and the predeclared types generated fields refer to
const GO_RESERVED: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range", "return",
    "select", "struct", "switch", "type", "var", "bool", "int", "float64", "string",
];

// type names the generated Rust module already uses
const RUST_RESERVED_TYPES: &[&str] = &["Self", "String", "Vec", "Deserialize", "Serialize"];

/// Split a name into lower-case words
pub fn split_words(name: &str) -> Vec<String> {
    name.to_snake_case()
        .split('_')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Title-case one word, upper-casing it entirely if it is an initialism
fn title_word(word: &str) -> String {
    let upper = word.to_uppercase();
    if INITIALISMS.contains(upper.as_str()) {
        return upper;
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Exported golint name: `"test Id"` becomes `"TestID"`
pub fn lint_title(name: &str) -> String {
    split_words(name).iter().map(|w| title_word(w)).collect()
}

/// Go type name for an element, with optional prefix
///
/// Unexported names keep their first word in lower case (`tagId` becomes
/// `tagID`, `url` stays `url`). A name that would be a keyword or shadow
/// a predeclared type gets a trailing underscore.
pub fn go_type_name(name: &str, prefix: &str, exported: bool) -> String {
    let words = split_words(&format!("{} {}", prefix, name));
    if words.is_empty() {
        return name.to_string();
    }

    let mut out = if exported {
        title_word(&words[0])
    } else {
        words[0].clone()
    };
    for word in &words[1..] {
        out.push_str(&title_word(word));
    }
    if GO_RESERVED.contains(&out.as_str()) {
        out.push('_');
    }
    out
}

/// Rust type name for an element, with optional prefix
pub fn rust_type_name(name: &str, prefix: &str) -> String {
    let camel = format!("{} {}", prefix, name).to_camel_case();
    if camel.is_empty() {
        name.to_string()
    } else if RUST_RESERVED_TYPES.contains(&camel.as_str()) {
        format!("{}_", camel)
    } else {
        camel
    }
}

/// Rust field name, escaping keywords
pub fn rust_field_name(name: &str) -> String {
    let snake = name.to_snake_case();
    if snake.is_empty() {
        "field".to_string()
    } else if matches!(snake.as_str(), "crate" | "self" | "super") {
        // cannot be raw identifiers
        format!("{}_", snake)
    } else if RUST_KEYWORDS.contains(&snake.as_str()) {
        format!("r#{}", snake)
    } else {
        snake
    }
}

/// Field names already used within one struct
#[derive(Debug, Default)]
pub struct FieldNames {
    taken: HashSet<String>,
}

impl FieldNames {
    /// Claim the first free candidate; when all are taken the last one is
    /// numbered
    pub fn claim(&mut self, candidates: &[String]) -> String {
        for candidate in candidates {
            if self.taken.insert(candidate.clone()) {
                return candidate.clone();
            }
        }

        let last = candidates.last().map(String::as_str).unwrap_or("field");
        let mut n = 2;
        loop {
            let numbered = format!("{}{}", last, n);
            if self.taken.insert(numbered.clone()) {
                return numbered;
            }
            n += 1;
        }
    }
}
