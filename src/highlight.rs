//! Emphasis markers in cooked prompts.
//!
//! The chef wraps key phrases in `{{...}}`. These helpers split a prompt
//! into plain and emphasized runs, strip the markers for copying, and
//! render highlights for HTML or a terminal.

use regex::Regex;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Emphasis(&'a str),
}

fn marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    // Non-greedy; `.` does not cross newlines.
    MARKER.get_or_init(|| Regex::new(r"\{\{(.*?)\}\}").expect("marker regex compiles"))
}

/// Split `text` into runs. Unclosed `{{` stays plain.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut last = 0;
    for caps in marker().captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push(Segment::Plain(&text[last..whole.start()]));
        }
        out.push(Segment::Emphasis(inner.as_str()));
        last = whole.end();
    }
    if last < text.len() {
        out.push(Segment::Plain(&text[last..]));
    }
    out
}

/// Emphasized phrases in order of appearance.
pub fn emphasized(text: &str) -> Vec<&str> {
    segments(text)
        .into_iter()
        .filter_map(|s| match s {
            Segment::Emphasis(inner) => Some(inner),
            Segment::Plain(_) => None,
        })
        .collect()
}

/// The prompt with markers removed, ready to paste into another AI.
pub fn strip_markers(text: &str) -> String {
    marker().replace_all(text, "$1").into_owned()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// HTML with markers turned into `<span class="highlight-glow">`. All text is escaped.
pub fn to_html(text: &str) -> String {
    segments(text)
        .into_iter()
        .map(|s| match s {
            Segment::Plain(plain) => escape_html(plain),
            Segment::Emphasis(inner) => {
                format!("<span class=\"highlight-glow\">{}</span>", escape_html(inner))
            }
        })
        .collect()
}

/// Bold yellow ANSI highlights for terminal output.
pub fn to_terminal(text: &str) -> String {
    segments(text)
        .into_iter()
        .map(|s| match s {
            Segment::Plain(plain) => plain.to_string(),
            Segment::Emphasis(inner) => format!("\x1b[1;33m{}\x1b[0m", inner),
        })
        .collect()
}
