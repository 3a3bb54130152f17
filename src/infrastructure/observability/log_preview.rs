/// Single-line, length-bounded rendering of arbitrary text for log fields.
///
/// Truncation counts chars, never bytes, so multi-byte text cannot split.
pub fn preview_for_log(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = trimmed.chars().count();
    let flattened: String = trimmed
        .chars()
        .take(max_chars)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();

    if total_chars > max_chars {
        format!("{flattened}... ({total_chars} chars total)")
    } else {
        flattened
    }
}
