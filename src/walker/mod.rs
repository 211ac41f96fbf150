//! The directive-tree interpreter
//!
//! Walks the children of an `http` block and derives one [`ServerRecord`]
//! per reachable `server` block, applying special-comment annotations,
//! name normalization, listen resolution, and the location walk.

pub mod annotations;
pub mod listen;
pub mod locations;
pub mod names;
pub mod validate;

use crate::ir::{Diagnostics, ServerRecord};
use crate::parser::Directive;
use std::collections::HashSet;

/// True if any direct `return` child carries a code above `threshold`.
///
/// Non-numeric codes never count; nginx rejects them anyway and a
/// malformed code must not silently hide a server.
pub fn skip_on_return(block: &[Directive], threshold: u16) -> bool {
    block
        .iter()
        .filter(|d| d.name.eq_ignore_ascii_case("return"))
        .any(|d| match d.first_arg().map(str::parse::<i64>) {
            Some(Ok(code)) => code > i64::from(threshold),
            _ => false,
        })
}

/// Derive records for every server under an `http` block
pub fn process_servers(
    http_children: &[Directive],
    hostname: &str,
    default_port: u16,
    return_code_threshold: u16,
    skip_locations: bool,
    diagnostics: &mut Diagnostics,
) -> Vec<ServerRecord> {
    let http_ssl_on = listen::has_legacy_ssl_on(http_children);

    http_children
        .iter()
        .filter(|d| d.name.eq_ignore_ascii_case("server"))
        .filter_map(|d| {
            process_server(
                d,
                hostname,
                default_port,
                return_code_threshold,
                skip_locations,
                http_ssl_on,
                diagnostics,
            )
        })
        .collect()
}

/// Derive the record for one `server` block, or `None` if the server is
/// suppressed (annotation skip, high return code, or an unreachable root
/// location).
pub fn process_server(
    server: &Directive,
    hostname: &str,
    default_port: u16,
    return_code_threshold: u16,
    skip_locations: bool,
    inherited_ssl_on: bool,
    diagnostics: &mut Diagnostics,
) -> Option<ServerRecord> {
    let block = server.children();
    let location = || Some(server.location.clone());

    if skip_on_return(block, return_code_threshold) {
        diagnostics.skip("server", "return code exceeds threshold", location());
        return None;
    }

    let ann = annotations::process_annotations(block, hostname);
    if ann.skip {
        diagnostics.skip("server", "skip_this annotation", location());
        return None;
    }

    let names = resolve_server_names(block, &ann, hostname, diagnostics);

    let ssl_on = inherited_ssl_on || listen::has_legacy_ssl_on(block);

    let locations = if skip_locations {
        Vec::new()
    } else {
        let walk = locations::walk_locations(
            block,
            &[&ann],
            hostname,
            return_code_threshold,
            diagnostics,
        );
        if walk.suppress_server {
            return None;
        }
        walk.paths
    };

    let listens = block
        .iter()
        .filter(|d| d.name.eq_ignore_ascii_case("listen"))
        .map(|d| listen::resolve_listen(&d.args, default_port, ssl_on))
        .collect();

    Some(ServerRecord {
        names,
        locations,
        listens,
    })
}

/// Resolve the server's names: `replace_all` verbatim, or every
/// `server_name` argument normalized, flattened in declaration order and
/// deduplicated keeping the first occurrence. A server never ends up
/// nameless; the hostname default stands in when everything was dropped.
fn resolve_server_names(
    block: &[Directive],
    ann: &annotations::Annotations,
    hostname: &str,
    diagnostics: &mut Diagnostics,
) -> Vec<String> {
    if let Some(replace_all) = &ann.replace_all {
        return replace_all.clone();
    }

    let mut result = Vec::new();
    for directive in block {
        if !directive.name.eq_ignore_ascii_case("server_name") {
            continue;
        }
        let is_singleton = directive.args.len() == 1;
        for arg in &directive.args {
            let normalized = names::normalize_server_name(arg, ann, is_singleton);
            if normalized.is_empty() {
                diagnostics.skip(
                    "server_name",
                    format!("unmappable name {:?}", arg),
                    Some(directive.location.clone()),
                );
            }
            result.extend(normalized);
        }
    }

    let mut seen = HashSet::new();
    result.retain(|name| seen.insert(name.clone()));

    if result.is_empty() {
        vec![hostname.to_string()]
    } else {
        result
    }
}
