//! Context token derivation: the page the user is on narrows suggestions.
//!
//! `https://news.bbc.co.uk/sport` → host `news.bbc.co.uk` → base domain
//! `bbc.co.uk` → token `bbc`. No public-suffix list: two-letter country
//! codes with a common second-level label (`co.uk`, `com.au`, ...) are
//! treated as a suffix, everything else uses the last label.

use url::{Host, Url};

/// Second-level labels that sit under a country code as part of the suffix.
const SECOND_LEVEL: &[&str] = &["ac", "co", "com", "edu", "gov", "net", "org", "ne", "or"];

/// Derive the context token for a page URL. Empty when none can be derived.
pub fn context_token(page_url: &str) -> String {
    let Ok(url) = Url::parse(page_url.trim()) else {
        return String::new();
    };
    match url.host() {
        Some(Host::Domain(domain)) => {
            // Only special schemes get their host lowercased by the parser
            let domain = domain.trim_end_matches('.').to_ascii_lowercase();
            base_domain_label(&domain).unwrap_or_default()
        }
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) | None => String::new(),
    }
}

/// First label of the registrable domain, if the host has one.
fn base_domain_label(host: &str) -> Option<String> {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return None;
    }
    if labels.iter().all(|l| l.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    let tld = labels[labels.len() - 1];
    let sld = labels[labels.len() - 2];
    let suffix_len = if tld.len() == 2 && SECOND_LEVEL.contains(&sld) {
        2
    } else {
        1
    };
    if labels.len() <= suffix_len {
        return None;
    }
    Some(labels[labels.len() - suffix_len - 1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_domain() {
        assert_eq!(context_token("https://www.wikipedia.org/wiki/Rust"), "wikipedia");
        assert_eq!(context_token("http://github.com"), "github");
    }

    #[test]
    fn country_code_second_level() {
        assert_eq!(context_token("https://news.bbc.co.uk/sport"), "bbc");
        assert_eq!(context_token("https://www.abc.net.au/news"), "abc");
    }

    #[test]
    fn country_code_without_second_level() {
        assert_eq!(context_token("https://docs.rs/tokio"), "docs");
        assert_eq!(context_token("https://www.spiegel.de/"), "spiegel");
    }

    #[test]
    fn strips_port_userinfo_and_case() {
        assert_eq!(context_token("https://user:pw@Example.COM:8080/x"), "example");
    }

    #[test]
    fn unusable_inputs_give_empty_token() {
        assert_eq!(context_token(""), "");
        assert_eq!(context_token("about:blank"), "");
        assert_eq!(context_token("http://localhost:3000/"), "");
        assert_eq!(context_token("http://127.0.0.1/"), "");
        assert_eq!(context_token("http://[::1]/"), "");
        assert_eq!(context_token("https://co.uk/"), "");
    }

    #[test]
    fn parser_normalizes_hosts() {
        // Shorthand IPv4 is still an address
        assert_eq!(context_token("http://0x7f.1/"), "");
        assert_eq!(context_token("https://BÜCHER.de/"), "xn--bcher-kva");
        assert_eq!(context_token("https://www.github.com./rust-lang"), "github");
    }
}
