//! Small helpers shared by the pipeline stages.

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes, backing off to the nearest
/// character boundary, with an ellipsis and the number of dropped bytes
/// appended. Digest bodies are mostly CJK text, so the cut never splits a
/// character.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}
