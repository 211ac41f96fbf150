//! nginx-urls
//!
//! Derive the externally reachable URLs (scheme, host, port, path) implied
//! by an nginx configuration. Server names are normalized the way nginx
//! wildcard semantics allow, listen directives resolve to (port, protocol)
//! pairs, and location blocks contribute paths — all overridable through
//! special comments placed inside the relevant block:
//!
//! ```nginx
//! server {
//!     server_name *.example.org;
//!     # replace: *.example.org = www.example.org api.example.org
//!     listen 443 ssl;
//! }
//! ```

pub mod cli;
pub mod ir;
pub mod parser;
pub mod urls;
pub mod walker;

pub use ir::{Diagnostics, ListenSpec, Protocol, ServerRecord, SkippedItem};
pub use parser::{Directive, NginxParser, ParseContext, ParseError, ParseOptions};

use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeriveError {
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("no `http` block found in configuration")]
    NoHttpBlock,
}

pub type Result<T> = std::result::Result<T, DeriveError>;

/// Options for URL derivation
#[derive(Debug, Clone)]
pub struct DeriveOptions {
    /// Value bound to the `$hostname` variable
    pub hostname: String,
    /// Port for listen directives that don't name one
    pub default_port: u16,
    /// Servers/locations with a `return` code above this are unreachable
    pub return_code_threshold: u16,
    /// Don't walk location blocks
    pub skip_locations: bool,
    /// Parser options
    pub parse_options: ParseOptions,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            default_port: 80,
            return_code_threshold: 399,
            skip_locations: false,
            parse_options: ParseOptions::default(),
        }
    }
}

/// Result of a derivation: the URL list plus what was dropped along the way
#[derive(Debug, Clone, Default)]
pub struct DeriveResult {
    pub urls: Vec<String>,
    pub diagnostics: Diagnostics,
}

/// Derive URLs from a configuration file
pub fn derive_urls(
    path: &Path,
    options: &DeriveOptions,
    dns_check: Option<&dyn Fn(&str) -> bool>,
) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(derive_urls_from_str(&content, path, options, dns_check)?.urls)
}

/// Derive URLs from configuration text.
///
/// `path` anchors relative include paths and error messages. Fails if the
/// text doesn't parse or contains no `http` block; everything else —
/// unmappable names, unsupported locations, suppressed servers — is
/// filtering, reported through [`DeriveResult::diagnostics`].
pub fn derive_urls_from_str(
    content: &str,
    path: &Path,
    options: &DeriveOptions,
    dns_check: Option<&dyn Fn(&str) -> bool>,
) -> Result<DeriveResult> {
    let mut ctx = ParseContext::new(path.to_path_buf(), content.to_string());
    ctx.options = options.parse_options.clone();

    let config = NginxParser::parse(&mut ctx)?;

    let http_children = config
        .iter()
        .find(|d| d.name.eq_ignore_ascii_case("http"))
        .and_then(|d| d.block.as_deref())
        .ok_or(DeriveError::NoHttpBlock)?;

    let mut diagnostics = Diagnostics::default();
    let servers = walker::process_servers(
        http_children,
        &options.hostname,
        options.default_port,
        options.return_code_threshold,
        options.skip_locations,
        &mut diagnostics,
    );

    let urls = urls::assemble_urls(&servers, options.skip_locations, dns_check);

    Ok(DeriveResult { urls, diagnostics })
}
