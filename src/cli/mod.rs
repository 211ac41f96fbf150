//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// Get URLs from an nginx config file
#[derive(Parser)]
#[command(name = "nginx-urls")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the nginx config file
    #[arg(value_name = "CONFIG_FILE", default_value = "/etc/nginx/nginx.conf")]
    pub config_file: PathBuf,

    /// Value for the $hostname variable (default: local machine hostname)
    #[arg(short = 'H', long, value_name = "HOSTNAME")]
    pub hostname: Option<String>,

    /// Default port for server blocks without a listen directive port
    #[arg(short, long, default_value_t = 80, value_name = "PORT")]
    pub port: u16,

    /// Servers and locations with a `return` code above this are dropped
    #[arg(short = 'r', long = "ret-code", default_value_t = 399, value_name = "CODE")]
    pub ret_code: u16,

    /// Don't handle location blocks
    #[arg(short, long)]
    pub skip_locations: bool,

    /// Drop server names that don't resolve in DNS
    #[arg(short, long)]
    pub dns_check: bool,

    /// Human friendly output format
    #[arg(short = 'u', long)]
    pub human: bool,

    /// Don't follow include directives
    #[arg(long)]
    pub no_includes: bool,

    /// Report skipped directives on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
