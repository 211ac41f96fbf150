//! Special-comment annotations
//!
//! A block's direct comments can override how its names and locations are
//! derived:
//!
//! ```nginx
//! # replace: <original-name> = <name1> <name2> ...
//! # replace_all: <name1> <name2> ...
//! # var: $token = <value>
//! # skip_this: True
//! ```
//!
//! Only the direct children of a block are scanned; nested blocks build
//! their own annotation set.

use crate::parser::Directive;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

static COMMAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^:]+):\s+(.+)$").expect("command pattern"));
static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(.+)\s+=\s+(.+)$").expect("assignment pattern"));
static LIST_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,]+").expect("list split pattern"));

/// Overrides collected from one block's special comments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotations {
    /// `replace:` — original token to its replacement list
    pub replacements: HashMap<String, Vec<String>>,
    /// `replace_all:` — overrides the whole name/location list
    pub replace_all: Option<Vec<String>>,
    /// `var:` — substitution variables, in insertion order
    pub variables: Vec<(String, String)>,
    /// `skip_this: True` — discard the block entirely
    pub skip: bool,
}

impl Annotations {
    /// Look up a variable in this scope only
    pub fn variable(&self, key: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a variable, keeping the original insertion position on overwrite
    fn set_variable(&mut self, key: String, value: String) {
        match self.variables.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.variables.push((key, value)),
        }
    }
}

/// Scan a block's direct children for special comments.
///
/// `$hostname` is pre-seeded with the caller-supplied default, so an
/// explicit `var: $hostname = ...` overrides it. Unrecognized commands
/// are ignored.
pub fn process_annotations(children: &[Directive], hostname: &str) -> Annotations {
    let mut ann = Annotations::default();
    ann.set_variable("$hostname".to_string(), hostname.to_string());

    for directive in children {
        if !directive.is_comment() {
            continue;
        }
        let comment = match &directive.comment {
            Some(c) => c,
            None => continue,
        };
        let captures = match COMMAND.captures(comment) {
            Some(c) => c,
            None => continue,
        };
        let (cmd, cmd_val) = (&captures[1], &captures[2]);

        match cmd {
            "skip_this" if cmd_val == "True" => ann.skip = true,
            "replace_all" => ann.replace_all = Some(split_list(cmd_val)),
            "replace" => {
                if let Some((key, values)) = split_assignment(cmd_val) {
                    ann.replacements.insert(key, split_list(&values));
                }
            }
            "var" => {
                if let Some((key, value)) = split_assignment(cmd_val) {
                    ann.set_variable(key, value);
                }
            }
            _ => {}
        }
    }

    ann
}

/// Split a value list on whitespace/comma runs
fn split_list(value: &str) -> Vec<String> {
    LIST_SPLIT
        .split(value)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Split `<key> = <value>` on the last ` = ` separator
fn split_assignment(value: &str) -> Option<(String, String)> {
    let captures = ASSIGNMENT.captures(value)?;
    Some((captures[1].to_string(), captures[2].to_string()))
}

/// Substitute every variable visible from `scopes` into `token`.
///
/// `scopes` is ordered child-to-parent; each variable is applied exactly
/// once, in insertion order, and a child shadows a parent's key.
pub fn substitute_vars(token: &str, scopes: &[&Annotations]) -> String {
    let mut result = token.to_string();
    let mut seen: HashSet<&str> = HashSet::new();

    for ann in scopes {
        for (key, value) in &ann.variables {
            if seen.insert(key.as_str()) {
                result = result.replace(key.as_str(), value);
            }
        }
    }

    result
}

/// Chained variable lookup, child scope first
pub fn lookup_var<'a>(scopes: &[&'a Annotations], key: &str) -> Option<&'a str> {
    scopes.iter().find_map(|ann| ann.variable(key))
}
