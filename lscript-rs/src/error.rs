//! Error type shared by the line processor and the instruction set.
//!
//! Every failure unwinds straight out of [`LineProcessor::run`]; nothing in
//! the core recovers locally.  The variants follow the phase in which the
//! failure is detected:
//!
//! | Variant | Raised by | Typical cause |
//! |---------|-----------|---------------|
//! | [`ScriptError::Configuration`] | constructors | command without handler, empty marker |
//! | [`ScriptError::Load`] | `run` / `run_file` | script file unreadable |
//! | [`ScriptError::Preprocessing`] | `preprocess` | duplicate label |
//! | [`ScriptError::Syntax`] | dispatcher | unknown keyword, malformed arguments |
//! | [`ScriptError::Runtime`] | handlers | undefined variable, wrong value kind |
//!
//! [`LineProcessor::run`]: crate::processor::LineProcessor::run

use std::path::PathBuf;

use thiserror::Error;

/// Any error produced while configuring or running a script.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("cannot load script {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("preprocessing error on line {line}: {message}: `{raw}`")]
    Preprocessing { line: usize, message: String, raw: String },

    #[error("syntax error on line {line}: {message}: `{raw}`")]
    Syntax { line: usize, message: String, raw: String },

    #[error("runtime error on line {line}: {message}: `{raw}`")]
    Runtime { line: usize, message: String, raw: String },
}

impl ScriptError {
    pub fn config(message: impl Into<String>) -> Self {
        ScriptError::Configuration(message.into())
    }

    /// `index` is the zero-based line-table index; messages report it 1-based.
    pub fn preprocessing(index: usize, raw: &str, message: impl Into<String>) -> Self {
        ScriptError::Preprocessing { line: index + 1, message: message.into(), raw: raw.to_owned() }
    }

    pub fn syntax(index: usize, raw: &str, message: impl Into<String>) -> Self {
        ScriptError::Syntax { line: index + 1, message: message.into(), raw: raw.to_owned() }
    }

    pub fn runtime(index: usize, raw: &str, message: impl Into<String>) -> Self {
        ScriptError::Runtime { line: index + 1, message: message.into(), raw: raw.to_owned() }
    }

    /// The raw source line the error points at, when there is one.
    pub fn raw_line(&self) -> Option<&str> {
        match self {
            ScriptError::Preprocessing { raw, .. }
            | ScriptError::Syntax { raw, .. }
            | ScriptError::Runtime { raw, .. } => Some(raw),
            _ => None,
        }
    }

    /// 1-based line number of the failing line, when there is one.
    pub fn line(&self) -> Option<usize> {
        match self {
            ScriptError::Preprocessing { line, .. }
            | ScriptError::Syntax { line, .. }
            | ScriptError::Runtime { line, .. } => Some(*line),
            _ => None,
        }
    }
}

pub type Result<T, E = ScriptError> = std::result::Result<T, E>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_message_contains_raw_line() {
        let e = ScriptError::runtime(0, "inc undefinedVar", "undefined variable 'undefinedVar'");
        let msg = e.to_string();
        assert!(msg.contains("undefinedVar"));
        assert!(msg.contains("inc undefinedVar"));
        assert!(msg.contains("line 1"));
    }

    #[test]
    fn line_is_one_based() {
        let e = ScriptError::syntax(4, "bogus x", "unknown command 'bogus'");
        assert_eq!(e.line(), Some(5));
        assert_eq!(e.raw_line(), Some("bogus x"));
    }

    #[test]
    fn configuration_has_no_line() {
        let e = ScriptError::config("empty command table");
        assert_eq!(e.line(), None);
        assert_eq!(e.raw_line(), None);
        assert_eq!(e.to_string(), "configuration error: empty command table");
    }

    #[test]
    fn load_error_keeps_source() {
        use std::error::Error as _;
        let e = ScriptError::Load {
            path: PathBuf::from("missing.ls"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.to_string().contains("missing.ls"));
        assert!(e.source().is_some());
    }
}
