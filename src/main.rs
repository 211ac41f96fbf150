use clap::Parser;
use colored::*;
use nginx_urls::cli::Cli;
use nginx_urls::{DeriveOptions, Diagnostics, ParseOptions, derive_urls_from_str};
use std::fs;
use std::net::ToSocketAddrs;
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let hostname = match cli.hostname {
        Some(name) => name,
        None => local_hostname()?,
    };

    let options = DeriveOptions {
        hostname,
        default_port: cli.port,
        return_code_threshold: cli.ret_code,
        skip_locations: cli.skip_locations,
        parse_options: ParseOptions {
            follow_includes: !cli.no_includes,
            ..Default::default()
        },
    };

    let content = fs::read_to_string(&cli.config_file)
        .map_err(|e| format!("Failed to read {}: {}", cli.config_file.display(), e))?;

    let dns_check: Option<&dyn Fn(&str) -> bool> = if cli.dns_check {
        Some(&host_exists)
    } else {
        None
    };

    let result = derive_urls_from_str(&content, &cli.config_file, &options, dns_check)
        .map_err(|e| e.to_string())?;

    if cli.verbose {
        print_diagnostics(&result.diagnostics);
    }

    let entries: Vec<serde_json::Value> = result
        .urls
        .iter()
        .map(|url| serde_json::json!({ "#URL": url }))
        .collect();

    let rendered = if cli.human {
        serde_json::to_string_pretty(&entries)
    } else {
        serde_json::to_string(&entries)
    }
    .map_err(|e| e.to_string())?;

    println!("{}", rendered);
    Ok(())
}

fn local_hostname() -> Result<String, String> {
    hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .map_err(|e| format!("Failed to get local hostname: {}", e))
}

/// DNS existence probe via the system resolver. Any failure counts as
/// "doesn't exist" — the URL list must only carry resolvable names.
fn host_exists(name: &str) -> bool {
    (name, 80u16)
        .to_socket_addrs()
        .map(|mut addrs| addrs.next().is_some())
        .unwrap_or(false)
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    if diagnostics.skipped.is_empty() {
        return;
    }

    eprintln!("{}", "Skipped items:".yellow());
    for item in &diagnostics.skipped {
        match &item.source_location {
            Some(location) => {
                eprintln!("  - {} ({}) at {}", item.directive, item.reason, location);
            }
            None => eprintln!("  - {} ({})", item.directive, item.reason),
        }
    }
    eprintln!();
}
