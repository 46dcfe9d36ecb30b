//! Line-processor settings and the `.lscriptrc` file parser.
//!
//! The rc file is a list of `key = value` lines:
//!
//! | Key | Value | Default |
//! |-----|-------|---------|
//! | `comment` | comment marker | `#` |
//! | `separator` | `auto`, `lf`, `crlf`, `cr`, or a literal (`\r`/`\n` escapes) | `auto` |
//! | `extension` | script file suffix recognised by `run` | `.ls` |
//!
//! Lines starting with `#` or `;` are comments.  Errors on individual lines
//! are collected rather than aborting the load, so one typo does not discard
//! the rest of the file.

use std::path::Path;

use crate::error::{Result, ScriptError};

// ── ProcessorConfig ───────────────────────────────────────────────────────────

/// Settings consumed by [`LineProcessor`](crate::processor::LineProcessor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorConfig {
    /// Marker that starts a comment line (after optional whitespace).
    pub comment_marker: String,
    /// Explicit line separator; `None` auto-detects `\r\n` vs `\n`.
    pub separator: Option<String>,
    /// Suffix that makes `run` treat its argument as a file path.
    pub extension: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        ProcessorConfig {
            comment_marker: "#".to_owned(),
            separator: None,
            extension: ".ls".to_owned(),
        }
    }
}

impl ProcessorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment_marker(mut self, marker: impl Into<String>) -> Self {
        self.comment_marker = marker.into();
        self
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Reject settings the processor cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.comment_marker.is_empty() {
            return Err(ScriptError::config("comment marker must not be empty"));
        }
        if self.comment_marker.starts_with(':') {
            return Err(ScriptError::config("comment marker must not start with the label marker ':'"));
        }
        if matches!(&self.separator, Some(s) if s.is_empty()) {
            return Err(ScriptError::config("explicit line separator must not be empty"));
        }
        if self.extension.is_empty() {
            return Err(ScriptError::config("script file extension must not be empty"));
        }
        Ok(())
    }
}

// ── rc file ───────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading an rc file.
#[derive(Debug)]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ConfigError {}

/// Parse rc-file text on top of the defaults.
///
/// Returns the resulting config and any per-line errors.
pub fn load_str(s: &str) -> (ProcessorConfig, Vec<ConfigError>) {
    let mut config = ProcessorConfig::default();
    let mut errors = Vec::new();

    for (i, raw) in s.lines().enumerate() {
        let lineno = i + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            errors.push(ConfigError { line: lineno, message: format!("expected `key = value`, got `{line}`") });
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        match key {
            "comment" => config.comment_marker = value.to_owned(),
            "extension" => config.extension = value.to_owned(),
            "separator" => match parse_separator(value) {
                Ok(sep) => config.separator = sep,
                Err(msg) => errors.push(ConfigError { line: lineno, message: msg }),
            },
            _ => errors.push(ConfigError { line: lineno, message: format!("unknown key `{key}`") }),
        }
    }

    (config, errors)
}

/// Read and parse an rc file from disk.
pub fn load_file(path: &Path) -> std::io::Result<(ProcessorConfig, Vec<ConfigError>)> {
    let s = std::fs::read_to_string(path)?;
    Ok(load_str(&s))
}

fn parse_separator(value: &str) -> Result<Option<String>, String> {
    let sep = match value {
        "auto" => return Ok(None),
        "lf" => "\n".to_owned(),
        "crlf" => "\r\n".to_owned(),
        "cr" => "\r".to_owned(),
        other => other.replace("\\r", "\r").replace("\\n", "\n"),
    };
    if sep.is_empty() {
        return Err("separator must not be empty".to_owned());
    }
    Ok(Some(sep))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ProcessorConfig::default();
        assert_eq!(cfg.comment_marker, "#");
        assert_eq!(cfg.separator, None);
        assert_eq!(cfg.extension, ".ls");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_comment_marker_rejected() {
        let cfg = ProcessorConfig::new().with_comment_marker("");
        assert!(matches!(cfg.validate(), Err(ScriptError::Configuration(_))));
    }

    #[test]
    fn label_marker_as_comment_rejected() {
        let cfg = ProcessorConfig::new().with_comment_marker("::");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_separator_rejected() {
        let cfg = ProcessorConfig::new().with_separator("");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_extension_rejected() {
        let cfg = ProcessorConfig::new().with_extension("");
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rc_keys() {
        let (cfg, errs) = load_str("comment = ;;\nextension = .lsc\nseparator = crlf\n");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(cfg.comment_marker, ";;");
        assert_eq!(cfg.extension, ".lsc");
        assert_eq!(cfg.separator.as_deref(), Some("\r\n"));
    }

    #[test]
    fn rc_separator_auto_and_escapes() {
        let (cfg, errs) = load_str("separator = auto");
        assert!(errs.is_empty());
        assert_eq!(cfg.separator, None);

        let (cfg, errs) = load_str(r"separator = \r\n");
        assert!(errs.is_empty());
        assert_eq!(cfg.separator.as_deref(), Some("\r\n"));
    }

    #[test]
    fn rc_comments_and_blanks_ignored() {
        let (cfg, errs) = load_str("# hash comment\n; semi comment\n\nextension = .txt\n");
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(cfg.extension, ".txt");
    }

    #[test]
    fn rc_errors_are_collected_per_line() {
        let (cfg, errs) = load_str("bogus = 1\nno equals sign\nextension = .x\n");
        assert_eq!(errs.len(), 2);
        assert_eq!(errs[0].line, 1);
        assert_eq!(errs[1].line, 2);
        assert_eq!(cfg.extension, ".x");
    }

    #[test]
    fn rc_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".lscriptrc");
        std::fs::write(&path, "comment = //\n").unwrap();
        let (cfg, errs) = load_file(&path).unwrap();
        assert!(errs.is_empty());
        assert_eq!(cfg.comment_marker, "//");
    }
}
