//! Content summarization policy.
//!
//! Summaries are derived purely from content, so recomputing after an edit is
//! deterministic given the same input. Short content carries no summary at all:
//! it serves as its own digest.

/// Content at or below this many characters is its own summary.
pub const SUMMARY_THRESHOLD: usize = 500;

/// Digest of long content, or `None` when the content speaks for itself.
///
/// Cuts at the last sentence or line break inside the first
/// [`SUMMARY_THRESHOLD`] characters when that break lands past 70% of the
/// window, otherwise hard-truncates at a char boundary. A truncation marker is
/// always appended.
pub fn summarize(content: &str) -> Option<String> {
    let window_end = match content.char_indices().nth(SUMMARY_THRESHOLD) {
        Some((idx, _)) => idx,
        // Fewer than THRESHOLD + 1 chars: nothing to condense.
        None => return None,
    };

    let window = &content[..window_end];
    let cut = match (window.rfind('.'), window.rfind('\n')) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };

    match cut {
        // '.' and '\n' are single-byte, so idx + 1 is a char boundary
        Some(idx) if idx >= window.len() * 7 / 10 => Some(format!("{}...", &window[..=idx])),
        _ => Some(format!("{window}...")),
    }
}

/// Truncate content to `max_chars`, appending "..." if truncated.
pub fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let end = content
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(content.len());
    format!("{}...", &content[..end])
}
