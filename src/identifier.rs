//! Display name -> source identifier synthesis.
//!
//! Names coming from the workflow editor are free text ("Conselheiro Bíblico", "HTTP Request",
//! "1st step"). The functions here turn them into identifiers every target language accepts:
//! ASCII letters and digits only, letter-initial, and never a reserved word.

use crate::language::Language;
use itertools::Itertools;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

const METHOD_FALLBACK: &str = "node";
const CLASS_FALLBACK: &str = "Workflow";

/// Appended when a method identifier collides with a reserved word.
pub const RESERVED_SUFFIX: &str = "Node";

/// camelCase method identifier for `display_name`, valid in `language`.
pub fn method_identifier(display_name: &str, language: Language) -> String {
    let tokens = tokenize(display_name);
    let mut ident = if tokens.is_empty() {
        METHOD_FALLBACK.to_string()
    } else {
        tokens
            .iter()
            .enumerate()
            .map(|(i, token)| {
                if i == 0 {
                    token.to_ascii_lowercase()
                } else {
                    capitalize(token)
                }
            })
            .collect()
    };

    if !starts_with_letter(&ident) {
        ident = format!("{}{}", METHOD_FALLBACK, capitalize(&ident));
    }
    if language.backend().is_reserved(&ident) {
        ident.push_str(RESERVED_SUFFIX);
    }
    ident
}

/// PascalCase class identifier for `display_name`.
///
/// Class names are checked against the reserved words of every supported language, so a
/// single identifier serves all targets.
pub fn class_identifier(display_name: &str) -> String {
    let tokens = tokenize(display_name);
    let mut ident = if tokens.is_empty() {
        CLASS_FALLBACK.to_string()
    } else {
        tokens.iter().map(|t| capitalize(t)).collect()
    };

    if !starts_with_letter(&ident) {
        ident = format!("{}{}", CLASS_FALLBACK, ident);
    }
    if Language::ALL.iter().any(|l| l.backend().is_reserved(&ident)) {
        ident.push_str(CLASS_FALLBACK);
    }
    ident
}

/// Strips diacritics and splits on every run of non-alphanumeric characters.
fn tokenize(display_name: &str) -> Vec<String> {
    let folded: String = display_name
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    folded
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect_vec()
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn starts_with_letter(ident: &str) -> bool {
    ident.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
}
