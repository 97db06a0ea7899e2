//! Reversed-domain storage convention.
//!
//! Domains are stored label-reversed (`example.com` <-> `com.example`) so
//! that lexical sort groups a site together with its subdomains.

/// Reverses the `.`-separated label sequence of `domain`.
///
/// Pure string transform: `reverse(reverse(s)) == s` for any input.
pub fn reverse_domain(domain: &str) -> String {
    domain.split('.').rev().collect::<Vec<_>>().join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_simple_domain() {
        assert_eq!(reverse_domain("example.com"), "com.example");
    }

    #[test]
    fn reverses_subdomain() {
        assert_eq!(reverse_domain("www.example.com"), "com.example.www");
    }

    #[test]
    fn round_trips() {
        for s in ["example.com", "a.b.c.d", "single", "", "a..b"] {
            assert_eq!(reverse_domain(&reverse_domain(s)), s);
        }
    }

    #[test]
    fn single_label_is_unchanged() {
        assert_eq!(reverse_domain("localhost"), "localhost");
    }
}
