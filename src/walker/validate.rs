//! Host name validation predicates
//!
//! Total functions: any input yields a verdict, never an error.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Check a dotted-label DNS hostname.
///
/// At least two labels; labels are ASCII alphanumerics with `-`/`_`
/// allowed between them; the final label must end in a letter (so bare
/// IPv4 literals don't pass as domains). Wildcards, leading/trailing
/// dots, and control characters all fail.
pub fn is_valid_domain(s: &str) -> bool {
    if s.is_empty() || s.len() > 253 || !s.is_ascii() {
        return false;
    }

    let mut labels = s.split('.');
    let last = match labels.next_back() {
        Some(l) => l,
        None => return false,
    };

    let mut count = 1;
    for label in labels {
        count += 1;
        if !is_label(label) {
            return false;
        }
    }

    count >= 2 && is_final_label(last)
}

fn is_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.is_empty() || bytes.len() > 63 {
        return false;
    }
    bytes[0].is_ascii_alphanumeric()
        && bytes[bytes.len() - 1].is_ascii_alphanumeric()
        && bytes
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn is_final_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    bytes.len() >= 2
        && bytes.len() <= 63
        && bytes[0].is_ascii_alphanumeric()
        && bytes[bytes.len() - 1].is_ascii_alphabetic()
        && bytes
            .iter()
            .all(|&b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

pub fn is_valid_ipv4(s: &str) -> bool {
    s.parse::<Ipv4Addr>().is_ok()
}

pub fn is_valid_ipv6(s: &str) -> bool {
    s.parse::<Ipv6Addr>().is_ok()
}

/// Anything that can stand as a host in a URL
pub fn is_valid_host(s: &str) -> bool {
    is_valid_domain(s) || is_valid_ipv4(s) || is_valid_ipv6(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_domains() {
        assert!(is_valid_domain("example.org"));
        assert!(is_valid_domain("www.example.org"));
        assert!(is_valid_domain("a.b.co.uk"));
        assert!(is_valid_domain("test.ru"));
        assert!(is_valid_domain("my-site.example.org"));
        assert!(is_valid_domain("my_site.example.org"));
    }

    #[test]
    fn test_invalid_domains() {
        assert!(!is_valid_domain(""));
        assert!(!is_valid_domain("_"));
        assert!(!is_valid_domain("*"));
        assert!(!is_valid_domain("*.example.org"));
        assert!(!is_valid_domain("www.example.*"));
        assert!(!is_valid_domain(".example.org"));
        assert!(!is_valid_domain("example.org."));
        assert!(!is_valid_domain("example"));
        assert!(!is_valid_domain("--"));
        assert!(!is_valid_domain("!@#"));
        assert!(!is_valid_domain("-leading.example.org"));
        assert!(!is_valid_domain("exa\x07mple.org"));
        assert!(!is_valid_domain("~^www\\..+\\.example\\.org$"));
        // Numeric final label: that's an address, not a domain
        assert!(!is_valid_domain("1.1.1.1"));
    }

    #[test]
    fn test_label_length_limits() {
        let long_label = "a".repeat(64);
        assert!(!is_valid_domain(&format!("{long_label}.org")));
        assert!(is_valid_domain(&format!("{}.org", "a".repeat(63))));
    }

    #[test]
    fn test_ipv4() {
        assert!(is_valid_ipv4("1.1.1.1"));
        assert!(is_valid_ipv4("192.168.33.68"));
        assert!(!is_valid_ipv4("256.0.0.1"));
        assert!(!is_valid_ipv4("1.1.1"));
        assert!(!is_valid_ipv4("example.org"));
    }

    #[test]
    fn test_ipv6() {
        assert!(is_valid_ipv6("::1"));
        assert!(is_valid_ipv6("2001:db8::1"));
        assert!(!is_valid_ipv6("1.1.1.1"));
        assert!(!is_valid_ipv6("not-an-address"));
    }
}
