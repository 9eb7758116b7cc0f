//! Embedded `={{ ... }}` micro-expressions.
//!
//! Only a small subset is understood: paths into the implicit per-invocation input object,
//! such as `$json.body.msg` or `$json.query.page`. Every recognised path becomes an accessor
//! on the generated class's `params` and registers its first segment as an interface
//! parameter. Anything else degrades to a string literal.

use crate::language::LanguageBackend;
use std::fmt;

pub mod parsing;
mod resolver;

pub use resolver::ExpressionResolver;

/// Named sub-trees of the implicit input object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceBucket {
    Body,
    Query,
    Headers,
}

impl SourceBucket {
    pub const ALL: [SourceBucket; 3] = [SourceBucket::Body, SourceBucket::Query, SourceBucket::Headers];

    pub fn key(&self) -> &'static str {
        match self {
            SourceBucket::Body => "body",
            SourceBucket::Query => "query",
            SourceBucket::Headers => "headers",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|b| b.key() == key)
    }
}

/// A parsed expression path. `bucket` is `None` for bare `$json.<path>` expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionReference {
    pub bucket: Option<SourceBucket>,
    pub path: Vec<String>,
}

impl ExpressionReference {
    /// The interface parameter the expression reads: the first path segment.
    pub fn parameter(&self) -> &str {
        &self.path[0]
    }

    /// Index steps applied after the parameter.
    pub fn rest(&self) -> &[String] {
        &self.path[1..]
    }
}

impl fmt::Display for ExpressionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bucket {
            Some(bucket) => write!(f, "$json.{}.{}", bucket.key(), self.path.join(".")),
            None => write!(f, "$json.{}", self.path.join(".")),
        }
    }
}

/// Outcome of resolving a single expression envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Target-language code reading an interface parameter.
    Accessor(String),
    /// Raw text that must be emitted as a string literal.
    Literal(String),
}

impl Resolved {
    pub fn into_code(self, backend: &dyn LanguageBackend) -> String {
        match self {
            Resolved::Accessor(code) => code,
            Resolved::Literal(text) => backend.string_literal(&text),
        }
    }
}
