use super::{ExpressionReference, SourceBucket};
use regex::Regex;
use std::sync::LazyLock;

const ENVELOPE_OPEN: &str = "={{";
const ENVELOPE_CLOSE: &str = "}}";

/// Tried in order: sigil-prefixed, escaped sigil, sigil omitted.
static BUCKET_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        r"\$json\.(body|query|headers)\.(.+)",
        r"\\\$json\.(body|query|headers)\.(.+)",
        r"json\.(body|query|headers)\.(.+)",
    ]
    .map(|p| Regex::new(p).expect("bucket pattern is valid"))
});

static BARE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\$json\.(.+)").expect("bare path pattern is valid"));

/// One `={{ ... }}` span inside free text. The inner text may not contain `}`.
static ENVELOPE_SPAN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"=\{\{([^}]+)\}\}").expect("envelope pattern is valid"));

/// First segment of a bucket path, as used by the graph-wide parameter scan.
static BUCKET_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$json\.(?:body|query|headers)\.([a-zA-Z_][a-zA-Z0-9_]*)")
        .expect("parameter pattern is valid")
});

/// `true` when `text` is one whole `={{ ... }}` envelope.
pub fn is_envelope(text: &str) -> bool {
    text.starts_with(ENVELOPE_OPEN) && text.ends_with(ENVELOPE_CLOSE) && text.len() >= 5
}

/// Parses a whole envelope. Returns `None` when no supported path can be found.
pub fn parse_envelope(expression: &str) -> Option<ExpressionReference> {
    let expression = expression.trim();
    if !is_envelope(expression) {
        return None;
    }
    let inner = expression[ENVELOPE_OPEN.len()..expression.len() - ENVELOPE_CLOSE.len()].trim();
    parse_inner(inner)
}

fn parse_inner(inner: &str) -> Option<ExpressionReference> {
    for pattern in BUCKET_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(inner) {
            return reference(SourceBucket::from_key(&caps[1]), &caps[2]);
        }
    }

    for bucket in SourceBucket::ALL {
        let marker = format!(".{}.", bucket.key());
        if let Some(pos) = inner.rfind(&marker) {
            return reference(Some(bucket), &inner[pos + marker.len()..]);
        }
    }

    BARE_PATH
        .captures(inner)
        .and_then(|caps| reference(None, &caps[1]))
}

fn reference(bucket: Option<SourceBucket>, path: &str) -> Option<ExpressionReference> {
    let path: Vec<String> = path.trim().split('.').map(|s| s.trim().to_string()).collect();
    if path[0].is_empty() {
        return None;
    }
    Some(ExpressionReference { bucket, path })
}

/// Byte ranges of every envelope span in `text`, in order.
pub fn envelope_spans(text: &str) -> Vec<std::ops::Range<usize>> {
    ENVELOPE_SPAN.find_iter(text).map(|m| m.range()).collect()
}

/// Parameter names referenced by bucket paths anywhere in `text`.
pub fn referenced_parameters(text: &str) -> impl Iterator<Item = &str> {
    BUCKET_PARAMETER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
}
