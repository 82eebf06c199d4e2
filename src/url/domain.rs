use url::Url;

/// Extracts the network location (host plus explicit port) from a URL
///
/// The host is lowercased. Default ports are not part of the result, so
/// `https://example.com:443/` and `https://example.com/` share a location.
/// Returns None if the URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use place_enricher::url::network_location;
///
/// let url = Url::parse("https://Example.COM/menu").unwrap();
/// assert_eq!(network_location(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(network_location(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn network_location(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
