//! Line-level lexing: separator detection, line classification and
//! keyword/argument splitting.

use std::sync::OnceLock;

use regex::Regex;

/// Variable and command-keyword grammar.
pub const IDENT: &str = r"[A-Za-z_]+[0-9]*[A-Za-z_]*";

/// Label-name grammar.
pub const LABEL: &str = r"[A-Za-z_][A-Za-z_0-9]*";

fn ident_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!("^{IDENT}$")).expect("identifier regex"))
}

fn label_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"^\s*:({LABEL})\s*(.*)$")).expect("label regex"))
}

fn command_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(&format!(r"^\s*({IDENT})(?:\s+(.*?))?\s*$")).expect("command regex"))
}

/// Returns `true` if `s` is a valid variable name.
pub fn is_ident(s: &str) -> bool {
    ident_re().is_match(s)
}

/// Pick the separator for a whole script: `\r\n` if it occurs anywhere,
/// otherwise `\n`.  Scripts mixing both are not supported.
pub fn detect_separator(text: &str) -> &'static str {
    if text.contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    }
}

/// What a physical line is, as far as the base processor is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Empty,
    Comment,
    /// `:name`, optionally followed by whitespace and a comment.
    Label(&'a str),
    /// Anything else; handed to the language's preprocessing hook.
    Other,
}

pub fn classify<'a>(line: &'a str, comment_marker: &str) -> LineKind<'a> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return LineKind::Empty;
    }
    if trimmed.starts_with(comment_marker) {
        return LineKind::Comment;
    }
    if let Some(caps) = label_re().captures(line) {
        let tail = caps.get(2).map_or("", |m| m.as_str());
        if tail.is_empty() || tail.starts_with(comment_marker) {
            if let Some(name) = caps.get(1) {
                return LineKind::Label(name.as_str());
            }
        }
    }
    LineKind::Other
}

/// Split a command line into its keyword and the (possibly empty) argument
/// text.  `None` if the line does not start with an identifier followed by
/// whitespace or end of line.
pub fn split_command(line: &str) -> Option<(&str, &str)> {
    let caps = command_re().captures(line)?;
    let keyword = caps.get(1)?.as_str();
    let rest = caps.get(2).map_or("", |m| m.as_str());
    Some((keyword, rest))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
