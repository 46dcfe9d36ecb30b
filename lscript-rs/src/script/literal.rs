//! Literal forms accepted by `set`.
//!
//! The value operand of `set` is tried against these forms in order; the
//! first that matches wins, so `5` is always a number and `'x'` always a
//! string even if variables named like them exist.
//!
//! | Form | Example | Result |
//! |------|---------|--------|
//! | number | `-12.5` | [`Value::Number`] |
//! | string | `'hi\x20there'` | [`Value::Str`] with `\xHH` expanded |
//! | list | `[]`, `['a','b']` | [`Value::List`] |
//! | reference | `other` | copy of `other`'s value |

use std::sync::OnceLock;

use regex::Regex;

use super::value::Value;
use crate::processor::line::is_ident;

/// A classified `set` operand.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Value(Value),
    /// A variable name whose value should be copied.
    Reference(String),
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[0-9]+(?:\.[0-9]+)?$").expect("number regex"))
}

fn string_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^'([^']*)'$").expect("string regex"))
}

fn list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\[\s*(?:'[^']*'(?:\s*,\s*'[^']*')*)?\s*\]$").expect("list regex")
    })
}

fn list_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"'([^']*)'").expect("list item regex"))
}

fn hex_escape_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\\x([0-9A-Fa-f]{2})").expect("hex escape regex"))
}

/// Expand every `\xHH` escape to the character with that code (0–255).
/// Other backslashes are left as they are.
pub fn expand_hex_escapes(s: &str) -> String {
    hex_escape_re()
        .replace_all(s, |caps: &regex::Captures<'_>| {
            u8::from_str_radix(&caps[1], 16)
                .map(|b| char::from(b).to_string())
                .unwrap_or_else(|_| caps[0].to_owned())
        })
        .into_owned()
}

/// Classify `src` (already trimmed).  `None` if it matches no form.
pub fn classify(src: &str) -> Option<Literal> {
    if number_re().is_match(src) {
        return src.parse::<f64>().ok().map(|x| Literal::Value(Value::Number(x)));
    }
    if let Some(caps) = string_re().captures(src) {
        return Some(Literal::Value(Value::Str(expand_hex_escapes(&caps[1]))));
    }
    if list_re().is_match(src) {
        return Some(Literal::Value(Value::List(parse_list(src))));
    }
    if is_ident(src) {
        return Some(Literal::Reference(src.to_owned()));
    }
    None
}

/// Items of a list literal already validated by [`list_re`].
fn parse_list(src: &str) -> Vec<String> {
    list_item_re()
        .captures_iter(src)
        .map(|caps| expand_hex_escapes(&caps[1]))
        .collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn value(src: &str) -> Value {
        match classify(src) {
            Some(Literal::Value(v)) => v,
            other => panic!("{src}: expected a literal value, got {other:?}"),
        }
    }

    #[test]
    fn hex_escapes() {
        assert_eq!(expand_hex_escapes(r"hi\x20there"), "hi there");
        assert_eq!(expand_hex_escapes(r"\x41\x42C"), "ABC");
        assert_eq!(expand_hex_escapes(r"\x27quoted\x27"), "'quoted'");
        assert_eq!(expand_hex_escapes(r"\xff"), "\u{ff}");
    }

    #[test]
    fn incomplete_escapes_untouched() {
        assert_eq!(expand_hex_escapes(r"\x4"), r"\x4");
        assert_eq!(expand_hex_escapes(r"\xZZ"), r"\xZZ");
        assert_eq!(expand_hex_escapes(r"a\nb"), r"a\nb");
    }

    #[test]
    fn numbers() {
        assert_eq!(value("5"), Value::Number(5.0));
        assert_eq!(value("-3"), Value::Number(-3.0));
        assert_eq!(value("2.75"), Value::Number(2.75));
    }

    #[test]
    fn malformed_numbers_rejected() {
        assert_eq!(classify("1."), None);
        assert_eq!(classify("1e5"), None);
        assert_eq!(classify("--1"), None);
    }

    #[test]
    fn strings() {
        assert_eq!(value("'hi'"), Value::Str("hi".into()));
        assert_eq!(value("''"), Value::Str(String::new()));
        assert_eq!(value(r"'a\x2cb'"), Value::Str("a,b".into()));
        assert_eq!(value("'with, comma'"), Value::Str("with, comma".into()));
    }

    #[test]
    fn unterminated_string_rejected() {
        assert_eq!(classify("'open"), None);
        assert_eq!(classify("'a'b'"), None);
    }

    #[test]
    fn lists() {
        assert_eq!(value("[]"), Value::List(vec![]));
        assert_eq!(value("[ ]"), Value::List(vec![]));
        assert_eq!(value("['a','b']"), Value::List(vec!["a".into(), "b".into()]));
        assert_eq!(
            value(r"[ 'x' , '\x41' ]"),
            Value::List(vec!["x".into(), "A".into()])
        );
        assert_eq!(value("['a,b']"), Value::List(vec!["a,b".into()]));
    }

    #[test]
    fn malformed_lists_rejected() {
        assert_eq!(classify("[a,b]"), None);
        assert_eq!(classify("['a',]"), None);
        assert_eq!(classify("['a'"), None);
        assert_eq!(classify("[1,2]"), None);
    }

    #[test]
    fn references() {
        assert_eq!(classify("other"), Some(Literal::Reference("other".into())));
        assert_eq!(classify("x1"), Some(Literal::Reference("x1".into())));
    }

    #[test]
    fn garbage_matches_nothing() {
        assert_eq!(classify("a b"), None);
        assert_eq!(classify("1a"), None);
        assert_eq!(classify(""), None);
    }
}
