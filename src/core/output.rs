//! Text bounding helpers for feedback shown to players and operators.

/// Collapse whitespace runs and cap length, appending `...` when cut.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// Terminal prefix for a feedback line, e.g. `[ALERT]`.
pub fn severity_tag(label: &str) -> String {
    format!("[{}]", label.to_ascii_uppercase())
}
