//! String utilities for the domain layer.

/// Truncate a string for log previews (UTF-8 safe).
///
/// Uses byte length for `max_len` but cuts on a character boundary and
/// appends `...` when anything was removed.
pub fn preview(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3);
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}
