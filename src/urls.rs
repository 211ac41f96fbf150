//! URL assembly from derived server records

use crate::ir::ServerRecord;

/// Build the flat URL list: for each server, each listen, each name, the
/// base URL followed by its location paths. This nesting order is part of
/// the contract; callers and tests depend on it.
///
/// The port suffix is elided for plain `http` on 80 and `https` on 443.
/// The root path `/` duplicates the bare server URL and is not repeated.
/// An optional DNS predicate filters names; it runs once per
/// (server, name) pair, and any non-true result excludes the name.
pub fn assemble_urls(
    servers: &[ServerRecord],
    skip_locations: bool,
    dns_check: Option<&dyn Fn(&str) -> bool>,
) -> Vec<String> {
    let mut urls = Vec::new();

    for server in servers {
        let names: Vec<&str> = match dns_check {
            Some(exists) => server
                .names
                .iter()
                .map(String::as_str)
                .filter(|name| exists(name))
                .collect(),
            None => server.names.iter().map(String::as_str).collect(),
        };

        for listen in &server.listens {
            for name in &names {
                let mut base = format!("{}://{}", listen.protocol, name);
                if !listen.is_default_port() {
                    base.push(':');
                    base.push_str(&listen.port.to_string());
                }
                urls.push(base.clone());

                if skip_locations {
                    continue;
                }
                for path in &server.locations {
                    if path == "/" {
                        continue;
                    }
                    if path.starts_with('/') {
                        urls.push(format!("{base}{path}"));
                    } else {
                        urls.push(format!("{base}/{path}"));
                    }
                }
            }
        }
    }

    urls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{ListenSpec, Protocol};

    fn record(names: &[&str], locations: &[&str], listens: &[ListenSpec]) -> ServerRecord {
        ServerRecord {
            names: names.iter().map(|s| s.to_string()).collect(),
            locations: locations.iter().map(|s| s.to_string()).collect(),
            listens: listens.to_vec(),
        }
    }

    #[test]
    fn test_base_and_location_urls() {
        let servers = [record(
            &["a.com"],
            &["/", "/x"],
            &[ListenSpec::new(80, Protocol::Http)],
        )];

        assert_eq!(
            assemble_urls(&servers, false, None),
            vec!["http://a.com", "http://a.com/x"]
        );
    }

    #[test]
    fn test_default_port_elision() {
        let servers = [
            record(&["a.com"], &[], &[ListenSpec::new(443, Protocol::Https)]),
            record(&["b.com"], &[], &[ListenSpec::new(8080, Protocol::Http)]),
            record(&["c.com"], &[], &[ListenSpec::new(80, Protocol::Https)]),
        ];

        assert_eq!(
            assemble_urls(&servers, false, None),
            vec!["https://a.com", "http://b.com:8080", "https://c.com:80"]
        );
    }

    #[test]
    fn test_nesting_order_listen_then_name() {
        let servers = [record(
            &["a.com", "b.com"],
            &["/p"],
            &[
                ListenSpec::new(80, Protocol::Http),
                ListenSpec::new(443, Protocol::Https),
            ],
        )];

        assert_eq!(
            assemble_urls(&servers, false, None),
            vec![
                "http://a.com",
                "http://a.com/p",
                "http://b.com",
                "http://b.com/p",
                "https://a.com",
                "https://a.com/p",
                "https://b.com",
                "https://b.com/p",
            ]
        );
    }

    #[test]
    fn test_relative_location_gets_leading_slash() {
        let servers = [record(
            &["a.com"],
            &["docs"],
            &[ListenSpec::new(80, Protocol::Http)],
        )];

        assert_eq!(
            assemble_urls(&servers, false, None),
            vec!["http://a.com", "http://a.com/docs"]
        );
    }

    #[test]
    fn test_skip_locations() {
        let servers = [record(
            &["a.com"],
            &["/x", "/y"],
            &[ListenSpec::new(80, Protocol::Http)],
        )];

        assert_eq!(assemble_urls(&servers, true, None), vec!["http://a.com"]);
    }

    #[test]
    fn test_dns_filter_excludes_name_entirely() {
        let servers = [record(
            &["real.com", "phantom.com"],
            &["/x"],
            &[
                ListenSpec::new(80, Protocol::Http),
                ListenSpec::new(443, Protocol::Https),
            ],
        )];

        let exists = |name: &str| name == "real.com";
        let urls = assemble_urls(&servers, false, Some(&exists));
        assert_eq!(
            urls,
            vec![
                "http://real.com",
                "http://real.com/x",
                "https://real.com",
                "https://real.com/x",
            ]
        );
    }

    #[test]
    fn test_idempotent_and_order_stable() {
        let servers = [record(
            &["a.com", "b.com"],
            &["/x"],
            &[ListenSpec::new(8443, Protocol::Https)],
        )];

        let first = assemble_urls(&servers, false, None);
        let second = assemble_urls(&servers, false, None);
        assert_eq!(first, second);
        assert_eq!(first[0], "https://a.com:8443");
    }
}
