//! Target-language backends.
//!
//! Every language the compiler can emit is described by a [`LanguageBackend`]: how a
//! parameter accessor looks, how literals and constructors are spelled, which words are
//! reserved, and how credential bindings are declared. Backends are stateless and shared.

use crate::compiler::credentials::Provider;
use crate::error::TemplateError;
use crate::inventory::{ParamType, ParameterInventory};
use crate::template::Placeholders;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

mod javascript;
mod php;
mod python;

pub use javascript::JavaScriptBackend;
pub use php::PhpBackend;
pub use python::PythonBackend;

/// The available target languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Php,
    Python,
    JavaScript,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Php, Language::Python, Language::JavaScript];

    /// Short lowercase code used in template paths and on the command line.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Php => "php",
            Language::Python => "python",
            Language::JavaScript => "javascript",
        }
    }

    pub fn backend(&self) -> &'static dyn LanguageBackend {
        match self {
            Language::Php => &PhpBackend,
            Language::Python => &PythonBackend,
            Language::JavaScript => &JavaScriptBackend,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "php" => Ok(Language::Php),
            "python" | "py" => Ok(Language::Python),
            "javascript" | "js" => Ok(Language::JavaScript),
            other => Err(TemplateError::UnknownLanguage(other.to_string())),
        }
    }
}

/// Class-level values a backend may derive its own placeholders from.
pub struct ClassContext<'a> {
    pub class_name: &'a str,
    pub credentials_path: &'a str,
}

/// Describes how generated code is spelled in one target language.
pub trait LanguageBackend: Send + Sync {
    fn language(&self) -> Language;

    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Prefix every instance-member access starts with (`$this->`, `self.`, `this.`).
    fn member_sigil(&self) -> &'static str;

    /// Keywords plus member names already defined by the class templates.
    fn reserved_words(&self) -> &'static [&'static str];

    fn is_reserved(&self, word: &str) -> bool {
        self.reserved_words()
            .iter()
            .any(|r| r.eq_ignore_ascii_case(word))
    }

    /// `params['a']['b']` on the instance, spelled for this language.
    fn accessor(&self, parameter: &str, path: &[String]) -> String {
        let mut code = format!("{}params['{}']", self.member_sigil(), escape_single(parameter));
        for segment in path {
            code.push_str(&format!("['{}']", escape_single(segment)));
        }
        code
    }

    /// Wraps raw text in double quotes, leaving the content untouched.
    fn string_literal(&self, text: &str) -> String {
        format!("\"{}\"", text)
    }

    fn null_literal(&self) -> &'static str;

    fn bool_literal(&self, value: bool) -> &'static str;

    /// `items` are already rendered code.
    fn list_literal(&self, items: &[String]) -> String {
        format!("[{}]", items.join(", "))
    }

    /// Keys are raw, values are already rendered code.
    fn map_literal(&self, entries: &[(String, String)]) -> String;

    fn type_name(&self, ty: ParamType) -> &'static str;

    /// Statement invoking a generated step method from `run`.
    fn method_call(&self, method: &str) -> String;

    /// Constructor block accepting every inventory parameter.
    fn constructor(&self, inventory: &ParameterInventory) -> String;

    /// Import/declare statements for the credential classes, empty when none are needed.
    fn credential_bindings(&self, identifiers: &[&str], resource_path: &str) -> String;

    /// Expression that yields the API key held by a credential class.
    fn credential_lookup(&self, identifier: &str) -> String;

    /// Provider-specific headers; may contain `{{credentials_lookup}}`.
    fn request_headers(&self, provider: Provider) -> &'static str;

    /// Provider-specific payload; may contain `{{model}}`, `{{prompt}}` and friends.
    fn request_body(&self, provider: Provider) -> &'static str;

    /// Method skeleton used when no node template matches.
    fn fallback_stub(&self) -> &'static str;

    /// Language-specific class placeholders, filled in the same pass as the common ones.
    fn class_placeholders(&self, _ctx: &ClassContext<'_>, _values: &mut Placeholders) {}
}

pub(crate) fn escape_single(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "\\'")
}
