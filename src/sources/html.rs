// src/sources/html.rs
// =============================================================================
// This module extracts links from HTML documents.
//
// We use the `scraper` crate to find every <a href> and the `url` crate to
// resolve relative hrefs against a base URL (when the caller knows one).
//
// scraper does not track source positions, so HTML references carry no
// location (origin 0).
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

use super::Reference;

// Extracts all links from HTML content
//
// Parameters:
//   html: the HTML content to parse
//   base_url: where the page lives, used to resolve relative links.
//             Without one, relative links are skipped.
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base_url = Some("https://example.com")
//   result = [Reference { target: "https://example.com/docs", origin: 0 }]
pub fn extract_html_links(html: &str, base_url: Option<&str>) -> Vec<Reference> {
    let mut links = Vec::new();

    let document = Html::parse_document(html);

    // "a[href]" is a constant, known-valid selector
    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    let base = match base_url.map(Url::parse) {
        Some(Ok(url)) => Some(url),
        Some(Err(e)) => {
            tracing::warn!(base_url = ?base_url, error = %e, "invalid base URL, relative links skipped");
            None
        }
        None => None,
    };

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_url(base.as_ref(), href) {
                if is_checkable_link(&absolute_url) {
                    links.push(Reference::new(absolute_url, 0));
                }
            }
        }
    }

    links
}

// Resolves a possibly-relative href to an absolute URL
//
//   base = "https://example.com/page"
//   href = "/docs"              -> Some("https://example.com/docs")
//   href = "https://other.com"  -> Some("https://other.com/")
//   href = "/docs", no base     -> None
fn resolve_url(base: Option<&Url>, href: &str) -> Option<String> {
    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => base.and_then(|b| b.join(href).ok()).map(|u| u.to_string()),
    }
}

// Only HTTP/HTTPS links are checked (no mailto:, tel:, javascript:, data:)
fn is_checkable_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}
