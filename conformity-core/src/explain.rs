//! Explanation formatting
//!
//! The explain endpoints return free text with light structure: one point
//! per line, optionally bulleted, some lines starting with a fixed label
//! such as `Причина:`. This module splits that text into lines and picks
//! the labels out so front ends can emphasize them.

/// Labels recognized at the start of a line (case-insensitive)
const LABELS: &[&str] = &[
    "cause:",
    "recommendation:",
    "criticality:",
    "причина:",
    "рекомендация:",
    "критичность:",
];

const BULLETS: &[char] = &['-', '*', '•'];

/// One line of a formatted explanation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplanationLine {
    /// A line led by a known label; `label` keeps the server's spelling
    Labeled { label: String, body: String },
    Plain(String),
}

/// Splits an explanation into lines, extracting known labels
///
/// Blank lines are dropped and leading bullets stripped.
pub fn format_explanation(text: &str) -> Vec<ExplanationLine> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let line = line.trim_start_matches(BULLETS).trim_start();
            parse_line(line)
        })
        .collect()
}

fn parse_line(line: &str) -> ExplanationLine {
    let folded = line.to_lowercase();
    for label in LABELS {
        if folded.starts_with(label) {
            // Lowercasing Cyrillic and ASCII preserves char count, so the
            // label spans the same number of chars in the original line.
            let split = line
                .char_indices()
                .nth(label.chars().count())
                .map(|(i, _)| i)
                .unwrap_or(line.len());
            let (label, body) = line.split_at(split);
            return ExplanationLine::Labeled {
                label: label.to_string(),
                body: body.trim().to_string(),
            };
        }
    }
    ExplanationLine::Plain(line.to_string())
}

/// Renders formatted lines as an HTML fragment
///
/// Labels become `<strong>` elements and lines are joined with `<br>`.
pub fn to_html(lines: &[ExplanationLine]) -> String {
    lines
        .iter()
        .map(|line| match line {
            ExplanationLine::Labeled { label, body } => {
                format!("<strong>{}</strong> {}", escape(label), escape(body))
            }
            ExplanationLine::Plain(text) => escape(text),
        })
        .collect::<Vec<_>>()
        .join("<br>")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
