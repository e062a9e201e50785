// src/sources/markdown.rs
// =============================================================================
// This module extracts links from Markdown text.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows the CommonMark specification
// - Can report the byte range of every event, which we turn into line numbers
//
// Every link becomes a Reference whose origin is the 1-based line it sits on.
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};

use super::Reference;

// Extracts all HTTP/HTTPS links from Markdown text
//
// Example input:
//   "intro\n\nCheck out [Rust](https://www.rust-lang.org)!"
//
// Example output:
//   [Reference { target: "https://www.rust-lang.org", origin: 3 }]
pub fn extract_markdown_links(markdown: &str) -> Vec<Reference> {
    let mut links = Vec::new();

    // into_offset_iter() pairs each event with its byte range in the source
    for (event, range) in Parser::new(markdown).into_offset_iter() {
        // In pulldown-cmark 0.9, Link is Tag::Link(link_type, dest_url, title)
        if let Event::Start(Tag::Link(_link_type, dest_url, _title)) = event {
            let url = dest_url.to_string();

            // Skip mailto:, tel:, relative paths, etc.
            if is_http_link(&url) {
                links.push(Reference::new(url, line_of(markdown, range.start)));
            }
        }
    }

    links
}

// 1-based line number of a byte offset
fn line_of(text: &str, offset: usize) -> u32 {
    let newlines = text.as_bytes()[..offset.min(text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    (newlines + 1) as u32
}

fn is_http_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is into_offset_iter()?
//    - Same events as iterating the Parser directly
//    - Each event also comes with a Range<usize> of byte offsets into the text
//    - Counting '\n' bytes before range.start gives the line number
//
// 2. Why `if let` instead of `match`?
//    - We only care about one kind of event (link start)
//    - if let skips everything else without listing it
// -----------------------------------------------------------------------------
