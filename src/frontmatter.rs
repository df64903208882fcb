//! Parsing and serialization of the `---`-delimited metadata header that
//! prefixes post source files.
//!
//! The format is deliberately small: string keys, string values, one pair
//! per line. There is no type coercion, no escaping, no multi-line values,
//! and no nesting.

use std::collections::BTreeMap;

/// The delimiter that opens and closes a metadata header.
pub const FENCE: &str = "---";

/// Splits a source document into its metadata mapping and body text.
///
/// A document that does not begin with the fence, or whose header is never
/// closed by a second fence, comes back untouched: an empty mapping and the
/// full input (header included) as the body. Within a well-formed header,
/// each line is split at its first `:` into a trimmed key and value; lines
/// without a `:` are ignored.
pub fn parse(content: &str) -> (BTreeMap<String, String>, &str) {
    if !content.starts_with(FENCE) {
        return (BTreeMap::new(), content);
    }

    let parts: Vec<&str> = content.splitn(3, FENCE).collect();
    if parts.len() < 3 {
        return (BTreeMap::new(), content);
    }

    let mut meta = BTreeMap::new();
    for line in parts[1].lines() {
        if let Some((key, value)) = line.split_once(':') {
            meta.insert(key.trim().to_owned(), value.trim().to_owned());
        }
    }

    (meta, parts[2].trim())
}

/// The canonical serialization of a metadata mapping and body: fence,
/// `key: value` lines in map order, fence, body. [`parse`] inverts it.
pub fn compose(meta: &BTreeMap<String, String>, body: &str) -> String {
    let mut out = String::from(FENCE);
    out.push('\n');
    for (key, value) in meta {
        out.push_str(key);
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out.push_str(FENCE);
    out.push('\n');
    out.push_str(body);
    out
}
