//! Listen directive resolution

use crate::ir::{ListenSpec, Protocol};
use crate::parser::Directive;
use regex::Regex;
use std::sync::LazyLock;

/// Trailing `:<port>` or a bare port, anchored at the end of an argument
static PORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|:)(\d+)$").expect("port pattern"));

/// Check for the deprecated `ssl on;` directive among a block's direct
/// children. nginx inherited it from the http scope into servers, so
/// callers OR the http-level and server-level results.
pub fn has_legacy_ssl_on(block: &[Directive]) -> bool {
    block
        .iter()
        .any(|d| d.name.eq_ignore_ascii_case("ssl") && d.has_arg("on"))
}

/// Resolve one `listen` directive's arguments into a (port, protocol) pair.
///
/// A bare 443 implies https even without an `ssl` token; the original
/// calls this a dirty hack, but real configs rely on it.
pub fn resolve_listen(args: &[String], default_port: u16, inherited_ssl_on: bool) -> ListenSpec {
    let mut protocol = if inherited_ssl_on {
        Protocol::Https
    } else {
        Protocol::Http
    };
    let mut port = default_port;

    for arg in args {
        if arg == "ssl" {
            protocol = Protocol::Https;
        } else if arg.starts_with("so_keepalive") {
            // Its numeric suboptions would match the port pattern
        } else if let Some(captures) = PORT.captures(arg) {
            if let Ok(p) = captures[2].parse::<u16>() {
                if p > 0 {
                    port = p;
                    if port == 443 {
                        protocol = Protocol::Https;
                    }
                }
            }
        }
    }

    ListenSpec::new(port, protocol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_args_uses_default_port() {
        assert_eq!(
            resolve_listen(&[], 80, false),
            ListenSpec::new(80, Protocol::Http)
        );
        assert_eq!(
            resolve_listen(&[], 8000, false),
            ListenSpec::new(8000, Protocol::Http)
        );
    }

    #[test]
    fn test_bare_port() {
        assert_eq!(
            resolve_listen(&args(&["8080"]), 80, false),
            ListenSpec::new(8080, Protocol::Http)
        );
    }

    #[test]
    fn test_address_with_port() {
        assert_eq!(
            resolve_listen(&args(&["1.1.1.1:80"]), 80, false),
            ListenSpec::new(80, Protocol::Http)
        );
        assert_eq!(
            resolve_listen(&args(&["[::]:8080"]), 80, false),
            ListenSpec::new(8080, Protocol::Http)
        );
    }

    #[test]
    fn test_explicit_ssl() {
        assert_eq!(
            resolve_listen(&args(&["443", "ssl"]), 80, false),
            ListenSpec::new(443, Protocol::Https)
        );
        assert_eq!(
            resolve_listen(&args(&["443", "ssl", "http2"]), 80, false),
            ListenSpec::new(443, Protocol::Https)
        );
    }

    #[test]
    fn test_bare_443_implies_https() {
        assert_eq!(
            resolve_listen(&args(&["443"]), 80, false),
            ListenSpec::new(443, Protocol::Https)
        );
    }

    #[test]
    fn test_nonstandard_ssl_port_keeps_port() {
        assert_eq!(
            resolve_listen(&args(&["8443", "ssl"]), 80, false),
            ListenSpec::new(8443, Protocol::Https)
        );
    }

    #[test]
    fn test_so_keepalive_does_not_look_like_a_port() {
        assert_eq!(
            resolve_listen(&args(&["80", "so_keepalive=30m::10"]), 80, false),
            ListenSpec::new(80, Protocol::Http)
        );
    }

    #[test]
    fn test_inherited_ssl_on() {
        assert_eq!(
            resolve_listen(&args(&["80"]), 80, true),
            ListenSpec::new(80, Protocol::Https)
        );
    }

    #[test]
    fn test_unix_socket_has_no_port() {
        assert_eq!(
            resolve_listen(&args(&["unix:/var/run/nginx.sock"]), 80, false),
            ListenSpec::new(80, Protocol::Http)
        );
    }

    #[test]
    fn test_overflowing_port_is_ignored() {
        assert_eq!(
            resolve_listen(&args(&["99999999"]), 80, false),
            ListenSpec::new(80, Protocol::Http)
        );
    }

    #[test]
    fn test_has_legacy_ssl_on() {
        let block = vec![
            Directive::new("listen", 1, PathBuf::from("t")).with_args(vec!["80".to_string()]),
            Directive::new("ssl", 2, PathBuf::from("t")).with_args(vec!["on".to_string()]),
        ];
        assert!(has_legacy_ssl_on(&block));

        let block = vec![
            Directive::new("ssl", 1, PathBuf::from("t")).with_args(vec!["off".to_string()]),
        ];
        assert!(!has_legacy_ssl_on(&block));
        assert!(!has_legacy_ssl_on(&[]));
    }
}
