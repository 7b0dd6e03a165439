//! Log sanitization utilities
//!
//! Keeps provider response bodies (zone listings, error pages) from
//! flooding debug/error logs.

/// Byte budget for a body excerpt in the log.
const TRUNCATE_LIMIT: usize = 256;

/// Largest char boundary at or below `limit`.
fn char_boundary_below(s: &str, limit: usize) -> usize {
    s.char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|end| *end <= limit)
        .last()
        .unwrap_or(0)
}

/// Single-line excerpt of a response body for logging.
///
/// Line breaks become spaces. Bodies longer than `TRUNCATE_LIMIT` bytes are
/// cut on a char boundary and suffixed with their total size.
pub fn truncate_for_log(s: &str) -> String {
    let flat = s.replace(['\r', '\n'], " ");
    if flat.len() <= TRUNCATE_LIMIT {
        return flat;
    }
    let cut = char_boundary_below(&flat, TRUNCATE_LIMIT);
    format!("{}... [truncated, total {} bytes]", &flat[..cut], s.len())
}
