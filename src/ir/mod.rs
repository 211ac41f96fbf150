//! Derived records produced by walking a configuration tree
//!
//! The walker turns directive trees into these types; URL assembly is a
//! pure function over them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// URL scheme of a resolved listen directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Http,
    Https,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Https => f.write_str("https"),
        }
    }
}

/// One resolved `listen` directive: a port and the protocol served on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenSpec {
    pub port: u16,
    pub protocol: Protocol,
}

impl ListenSpec {
    pub fn new(port: u16, protocol: Protocol) -> Self {
        Self { port, protocol }
    }

    /// True for the two well-known (port, protocol) pairs that URLs elide
    pub fn is_default_port(&self) -> bool {
        matches!(
            (self.port, self.protocol),
            (80, Protocol::Http) | (443, Protocol::Https)
        )
    }
}

/// Everything derived from one surviving `server` block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerRecord {
    /// Resolved server names, first-seen order, no duplicates
    pub names: Vec<String>,
    /// Normalized location paths in pre-order (parents before children)
    pub locations: Vec<String>,
    /// Resolved listen directives in declaration order
    pub listens: Vec<ListenSpec>,
}

/// What the walk dropped and why; never affects the URL list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub skipped: Vec<SkippedItem>,
}

impl Diagnostics {
    pub fn skip(
        &mut self,
        directive: impl Into<String>,
        reason: impl Into<String>,
        location: Option<SourceLocation>,
    ) {
        self.skipped.push(SkippedItem {
            directive: directive.into(),
            reason: reason.into(),
            source_location: location,
        });
    }
}

/// A directive (or directive argument) excluded from the output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedItem {
    pub directive: String,
    pub reason: String,
    pub source_location: Option<SourceLocation>,
}

/// Source location reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: PathBuf,
    pub line: usize,
}

impl SourceLocation {
    pub fn new(file: PathBuf, line: usize) -> Self {
        Self { file, line }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file.display(), self.line)
    }
}
