const MAX_VISIBLE_CHARS: usize = 100;

/// Makes a user prompt safe to put in a log line: trimmed, control
/// characters replaced, and cut to a bounded number of characters.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total = trimmed.chars().count();
    let visible: String = trimmed
        .chars()
        .take(MAX_VISIBLE_CHARS)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect();

    if total > MAX_VISIBLE_CHARS {
        format!("{visible}... ({total} chars total)")
    } else {
        visible
    }
}
