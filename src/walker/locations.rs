//! Location block walking
//!
//! Produces the ordered path list for one server: direct locations in
//! declaration order, each followed by its nested locations (pre-order).
//! Regex (`~`, `~*`) and named (`@`) locations have no predictable URL
//! and are dropped unless a `replace_all:` annotation substitutes a real
//! path; ACME challenge paths and `stub_status` endpoints are never
//! reported.

use super::annotations::{self, Annotations};
use super::skip_on_return;
use crate::ir::Diagnostics;
use crate::parser::Directive;

const ACME_CHALLENGE_PREFIX: &str = "/.well-known/acme-challenge";

/// Result of walking a block's locations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationWalk {
    /// Normalized paths in pre-order
    pub paths: Vec<String>,
    /// The root location redirects away; the whole server is unreachable
    pub suppress_server: bool,
}

impl LocationWalk {
    fn suppressed() -> Self {
        Self {
            paths: Vec::new(),
            suppress_server: true,
        }
    }
}

/// Recursively walk the `location` directives under `block`.
///
/// `parent_scopes` is the annotation chain of the enclosing scopes,
/// child-to-parent; variables resolve through it. A `return` whose code
/// exceeds `threshold` skips that location subtree, and kills the whole
/// server when it sits on the root path.
pub fn walk_locations(
    block: &[Directive],
    parent_scopes: &[&Annotations],
    hostname: &str,
    threshold: u16,
    diagnostics: &mut Diagnostics,
) -> LocationWalk {
    let mut walk = LocationWalk::default();

    for directive in block {
        if !directive.name.eq_ignore_ascii_case("location") {
            continue;
        }
        let children = directive.children();
        let location = Some(directive.location.clone());

        let ann = annotations::process_annotations(children, hostname);
        if ann.skip {
            diagnostics.skip("location", "skip_this annotation", location);
            continue;
        }

        let mut scopes: Vec<&Annotations> = Vec::with_capacity(parent_scopes.len() + 1);
        scopes.push(&ann);
        scopes.extend_from_slice(parent_scopes);

        let mut candidate = prepare_location(&directive.args, &ann, &scopes);
        if candidate.is_none() {
            diagnostics.skip("location", "unsupported location pattern", location.clone());
        }
        if candidate
            .as_deref()
            .is_some_and(|path| path.starts_with(ACME_CHALLENGE_PREFIX))
        {
            diagnostics.skip("location", "acme-challenge path", location.clone());
            candidate = None;
        }
        if candidate.is_some() && has_stub_status(children) {
            diagnostics.skip("location", "stub_status endpoint", location.clone());
            candidate = None;
        }

        if skip_on_return(children, threshold) {
            if candidate.as_deref() == Some("/") {
                // The root location redirects away: nothing under this
                // server is reachable, discard everything collected so far
                diagnostics.skip("server", "root location return exceeds threshold", location);
                return LocationWalk::suppressed();
            }
            diagnostics.skip("location", "return code exceeds threshold", location);
            continue;
        }

        if let Some(path) = candidate {
            walk.paths.push(path);
        }

        let nested = walk_locations(children, &scopes, hostname, threshold, diagnostics);
        if nested.suppress_server {
            return LocationWalk::suppressed();
        }
        walk.paths.extend(nested.paths);
    }

    walk
}

/// Compute the candidate path for one location directive.
///
/// Arguments are joined so `['=', '/x']` and `['=/x']` read the same; the
/// `=` and `^~` modifiers are dropped, variables substituted through the
/// scope chain. Returns `None` for regex, named, and empty locations.
fn prepare_location(args: &[String], ann: &Annotations, scopes: &[&Annotations]) -> Option<String> {
    if let Some(replace_all) = &ann.replace_all {
        return replace_all.first().cloned();
    }

    let joined = args.concat();
    if joined.starts_with('~') {
        return None;
    }

    let stripped = joined
        .strip_prefix("^~")
        .or_else(|| joined.strip_prefix('='))
        .unwrap_or(&joined);

    let path = annotations::substitute_vars(stripped, scopes);
    if path.is_empty() || path.starts_with('@') {
        return None;
    }
    Some(path)
}

fn has_stub_status(block: &[Directive]) -> bool {
    block
        .iter()
        .any(|d| d.name.eq_ignore_ascii_case("stub_status"))
}
