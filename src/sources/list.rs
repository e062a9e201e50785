// src/sources/list.rs
// =============================================================================
// Plain reference lists: one target per line.
//
//   # comments and blank lines are ignored
//   https://example.com
//   10.1000/xyz 12        <- optional origin (page/line) after whitespace
// =============================================================================

use super::Reference;

pub fn parse_reference_list(text: &str) -> Vec<Reference> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let target = parts.next()?;
            // A missing or malformed origin means "no location"
            let origin = parts.next().and_then(|o| o.parse().ok()).unwrap_or(0);
            Some(Reference::new(target, origin))
        })
        .collect()
}
