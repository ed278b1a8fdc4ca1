//! Markdown cleaning for speech synthesis.
//!
//! Rules run in a fixed order, each over the output of the previous one.
//! Double-character markers are unwrapped before single-character ones so
//! `**bold**` is never read as two italic spans.
//!
//! Every rule runs in CRLF mode: `.` stops at `\r` as well as `\n`, and
//! line anchors treat `\r\n` as one line break.

use once_cell::sync::Lazy;
use regex::Regex;

/// Cleaning rules as (pattern, replacement) pairs, in application order.
static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        // Headings (# .. ######)
        (r"(?m)^#{1,6}\s+", ""),
        // Bold
        (r"\*\*(.+?)\*\*", "${1}"),
        (r"__(.+?)__", "${1}"),
        // Italic
        (r"\*(.+?)\*", "${1}"),
        (r"_(.+?)_", "${1}"),
        // Strikethrough
        (r"~~(.+?)~~", "${1}"),
        // Bullets
        (r"(?m)^\s*[-*+]\s+", ""),
        // Ordered list markers
        (r"(?m)^\s*[0-9]+\.\s+", ""),
        // Links: keep the label
        (r"\[(.+?)\]\(.+?\)", "${1}"),
        // Inline code
        (r"`(.+?)`", "${1}"),
        // Fenced code blocks
        (r"(?m)^```[\s\S]*?```$", ""),
        // Blockquotes
        (r"(?m)^>\s+", ""),
        // Horizontal rules
        (r"(?m)^[-*_]{3,}$", ""),
        // Remaining tags
        (r"<[^>]+>", ""),
        // Blank line runs
        (r"\n{3,}", "\n\n"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(&format!("(?R){}", pattern)).expect("cleaning pattern should compile"),
            replacement,
        )
    })
    .collect()
});

/// Strip markdown and HTML decoration, leaving speakable prose.
pub fn normalize(text: &str) -> String {
    let cleaned = RULES
        .iter()
        .fold(text.to_string(), |acc, (pattern, replacement)| {
            pattern.replace_all(&acc, *replacement).into_owned()
        });

    cleaned.trim().to_string()
}
