//! Placeholder interpolation.
//!
//! Replaces `{{.dotted.key}}` and `{{.dotted.key | filter ...}}` with values
//! from a flat string map. Placeholders whose key is absent are left verbatim,
//! filter suffix included, so a later pass with more variables can resolve
//! them.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use admission_types::Result;

use crate::filter::{apply_chain, parse_chain};

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.([A-Za-z0-9_.\-]+)\s*(\|[^{}]*)?\}\}").expect("invalid placeholder regex")
});

/// Interpolate every resolvable placeholder of `input` against `vars`.
///
/// Keys match exactly, so `myKey` never captures part of `myKeyAnother`.
/// Only placeholders whose key is present have their filters parsed; an
/// unknown or malformed filter on such a placeholder is an error.
pub fn interpolate(input: &str, vars: &HashMap<String, String>) -> Result<String> {
    if !input.contains("{{") {
        return Ok(input.to_string());
    }

    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(input) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(value) = vars.get(key.as_str()) else {
            continue;
        };

        let resolved = match caps.get(2) {
            Some(chain) => apply_chain(&parse_chain(chain.as_str())?, value),
            None => value.clone(),
        };
        out.push_str(&input[last..whole.start()]);
        out.push_str(&resolved);
        last = whole.end();
    }
    out.push_str(&input[last..]);
    Ok(out)
}
