//! nginx configuration parsing: text to directive tree

mod lexer;
mod parser;

pub use parser::NginxParser;

use crate::ir::SourceLocation;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at {file}:{line}: {message}")]
    Syntax {
        file: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Include cycle detected: {0}")]
    IncludeCycle(PathBuf),

    #[error("Maximum include depth exceeded ({0})")]
    MaxIncludeDepth(usize),
}

/// A parsed nginx directive (simple, block, or comment)
///
/// Comments are kept in the tree as directives named `#` with the comment
/// text (everything after the `#`) in `comment` — the annotation layer
/// reads override commands out of them.
#[derive(Debug, Clone)]
pub struct Directive {
    pub name: String,
    pub args: Vec<String>,
    pub comment: Option<String>,
    pub block: Option<Vec<Directive>>,
    pub location: SourceLocation,
}

impl Directive {
    pub fn new(name: impl Into<String>, line: usize, file: PathBuf) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            comment: None,
            block: None,
            location: SourceLocation::new(file, line),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_block(mut self, block: Vec<Directive>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Check if this is a comment directive
    pub fn is_comment(&self) -> bool {
        self.name == "#"
    }

    /// Get the first argument
    pub fn first_arg(&self) -> Option<&str> {
        self.args.first().map(|s| s.as_str())
    }

    /// Check if directive has a specific argument
    pub fn has_arg(&self, value: &str) -> bool {
        self.args.iter().any(|a| a == value)
    }

    /// Get block children (empty slice for simple directives)
    pub fn children(&self) -> &[Directive] {
        self.block.as_deref().unwrap_or(&[])
    }
}

/// Context for parsing, handles includes and multi-file configs
pub struct ParseContext {
    /// Primary configuration file path
    pub primary_path: PathBuf,
    /// Primary file content
    pub content: String,
    /// Base directory for resolving includes
    pub base_dir: PathBuf,
    /// Already processed includes (cycle detection)
    pub processed: HashSet<PathBuf>,
    /// Parser options
    pub options: ParseOptions,
    /// Current include depth
    pub include_depth: usize,
}

impl ParseContext {
    pub fn new(path: PathBuf, content: String) -> Self {
        let base_dir = path.parent().map(|p| p.to_path_buf()).unwrap_or_default();
        Self {
            primary_path: path,
            content,
            base_dir,
            processed: HashSet::new(),
            options: ParseOptions::default(),
            include_depth: 0,
        }
    }

    /// Check if we can process this include (no cycle, within depth limit)
    pub fn can_include(&self, path: &Path) -> Result<(), ParseError> {
        if self.processed.contains(path) {
            return Err(ParseError::IncludeCycle(path.to_path_buf()));
        }
        if self.include_depth >= self.options.max_include_depth {
            return Err(ParseError::MaxIncludeDepth(self.options.max_include_depth));
        }
        Ok(())
    }
}

/// Parser options
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Follow include directives
    pub follow_includes: bool,
    /// Maximum include depth
    pub max_include_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            follow_includes: true,
            max_include_depth: 10,
        }
    }
}
