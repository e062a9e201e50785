// src/checker/normalize.rs
// =============================================================================
// Turns a raw reference target into something we can hand to the HTTP client.
//
// References pulled out of documents are often not full URLs:
// - DOIs like "10.1000/xyz" need the doi.org resolver in front
// - Bare hosts like "example.com" need a scheme
//
// This is a pure function: it never fails and never touches the network.
// =============================================================================

// Prefix that marks a DOI-like identifier
const DOI_PREFIX: &str = "10.";

// Resolver used for DOI-like identifiers
const DOI_RESOLVER: &str = "http://doi.org/";

// Normalizes a raw target into a fetchable absolute URL
//
// Rules (checked in order):
//   "10.1000/xyz"   -> "http://doi.org/10.1000/xyz"
//   "example.com"   -> "http://example.com"
//   "http://x.com"  -> "http://x.com"   (also covers https://)
//   ""              -> ""               (passed through untouched)
pub fn normalize_url(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    if raw.starts_with(DOI_PREFIX) {
        format!("{}{}", DOI_RESOLVER, raw)
    } else if !raw.starts_with("http") {
        format!("http://{}", raw)
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doi_goes_through_resolver() {
        assert_eq!(normalize_url("10.1000/xyz"), "http://doi.org/10.1000/xyz");
    }

    #[test]
    fn test_bare_host_gets_scheme() {
        assert_eq!(normalize_url("example.com"), "http://example.com");
    }

    #[test]
    fn test_absolute_urls_unchanged() {
        assert_eq!(normalize_url("http://x.com"), "http://x.com");
        assert_eq!(normalize_url("https://x.com/a?b=c"), "https://x.com/a?b=c");
    }

    #[test]
    fn test_empty_passes_through() {
        assert_eq!(normalize_url(""), "");
    }
}
