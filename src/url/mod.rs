//! URL helpers for domain-scoped crawling
//!
//! A crawl never leaves the network location of the page it is currently
//! parsing. These helpers decide what counts as "the same site" and which
//! URLs carry an in-page fragment marker.

mod domain;

pub use domain::network_location;

use url::Url;

/// Marker that identifies in-page anchors
pub const FRAGMENT_MARKER: char = '#';

/// Returns true if `link` lives on the same network location as `page`
///
/// Comparison is on lowercased host plus explicit port. Two URLs without a
/// host are never considered the same site.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use place_enricher::url::is_same_site;
///
/// let page = Url::parse("https://example.com/").unwrap();
/// assert!(is_same_site(&Url::parse("https://EXAMPLE.com/menu").unwrap(), &page));
/// assert!(!is_same_site(&Url::parse("https://order.example.com/").unwrap(), &page));
/// ```
pub fn is_same_site(link: &Url, page: &Url) -> bool {
    match (network_location(link), network_location(page)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Returns true if the URL text contains a fragment marker anywhere
pub fn has_fragment(url: &str) -> bool {
    url.contains(FRAGMENT_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_same_site_paths() {
        assert!(is_same_site(
            &parse("https://example.com/about"),
            &parse("https://example.com/")
        ));
    }

    #[test]
    fn test_scheme_does_not_matter() {
        assert!(is_same_site(
            &parse("http://example.com/about"),
            &parse("https://example.com/")
        ));
    }

    #[test]
    fn test_www_is_a_different_site() {
        assert!(!is_same_site(
            &parse("https://www.example.com/"),
            &parse("https://example.com/")
        ));
    }

    #[test]
    fn test_port_is_part_of_site() {
        assert!(!is_same_site(
            &parse("http://127.0.0.1:9001/"),
            &parse("http://127.0.0.1:9002/")
        ));
    }

    #[test]
    fn test_hostless_urls_never_match() {
        assert!(!is_same_site(&parse("data:text/plain,hi"), &parse("data:text/plain,hi")));
    }

    #[test]
    fn test_has_fragment() {
        assert!(has_fragment("https://example.com/#section"));
        assert!(has_fragment("https://example.com/menu#drinks"));
        assert!(!has_fragment("https://example.com/menu"));
    }
}
