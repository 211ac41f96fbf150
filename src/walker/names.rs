//! Server name normalization
//!
//! nginx `server_name` arguments come in forms that don't map directly to
//! reachable hosts. `*.example.org` has a canonical guess (`www.`),
//! `.example.org` means the bare domain, and trailing wildcards, regex
//! names, `_`, and friends cannot be predicted at all — those are dropped
//! unless a `replace:` annotation supplies the real names.

use super::annotations::{self, Annotations};
use super::validate::is_valid_host;

/// Normalize one `server_name` token into zero or more valid hosts.
///
/// `is_singleton` marks a directive with exactly one argument; only then
/// does an empty token fall back to `$hostname`.
pub fn normalize_server_name(token: &str, ann: &Annotations, is_singleton: bool) -> Vec<String> {
    // An exact replacement wins outright; its entries are filtered for
    // validity but an all-invalid list still means "drop the token"
    if let Some(replacement) = ann.replacements.get(token) {
        return replacement
            .iter()
            .filter(|name| is_valid_host(name))
            .cloned()
            .collect();
    }

    let name = annotations::substitute_vars(token, &[ann]);

    if name.is_empty() {
        if is_singleton {
            if let Some(hostname) = ann.variable("$hostname") {
                return vec![hostname.to_string()];
            }
        }
        return Vec::new();
    }

    let name = if let Some(rest) = name.strip_prefix("*.") {
        format!("www.{rest}")
    } else if let Some(rest) = name.strip_prefix('.') {
        rest.to_string()
    } else {
        name
    };

    if is_valid_host(&name) {
        vec![name]
    } else {
        Vec::new()
    }
}
