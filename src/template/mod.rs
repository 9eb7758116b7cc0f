//! Text templates with `{{name}}` placeholders.
//!
//! Templates are opaque to the compiler apart from their placeholders. Substitution only
//! touches placeholders that have a value; unknown ones are left in place. Inserted values
//! are never rescanned, so text taken from a workflow comes out verbatim.

use ahash::AHashMap;
use regex::{Captures, Regex};
use std::sync::LazyLock;

mod catalogue;

pub use catalogue::{NodeTemplate, TemplateCatalogue};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// A class-level or node-level skeleton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Names of all placeholders, in order of first appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for caps in PLACEHOLDER.captures_iter(&self.text) {
            if let Some(name) = caps.get(1).map(|m| m.as_str())
                && !names.contains(&name)
            {
                names.push(name);
            }
        }
        names
    }

    pub fn render(&self, values: &Placeholders) -> String {
        substitute(&self.text, values)
    }
}

/// Values for a substitution pass.
#[derive(Debug, Clone, Default)]
pub struct Placeholders {
    values: AHashMap<String, String>,
}

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> &mut Self {
        self.values.insert(name.to_string(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

/// Replaces every known placeholder in `text`.
///
/// Multi-line values are re-indented: each line after the first gets the leading whitespace
/// of the line the placeholder sits on.
pub fn substitute(text: &str, values: &Placeholders) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            let Some(value) = values.get(&caps[1]) else {
                return caps[0].to_string();
            };
            let start = caps.get(0).map_or(0, |m| m.start());
            let line_start = text[..start].rfind('\n').map_or(0, |i| i + 1);
            let indent: String = text[line_start..start]
                .chars()
                .take_while(|c| c.is_whitespace())
                .collect();
            indent_continuation(value, &indent)
        })
        .into_owned()
}

fn indent_continuation(value: &str, indent: &str) -> String {
    if indent.is_empty() || !value.contains('\n') {
        return value.to_string();
    }
    value
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{}{}", indent, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
