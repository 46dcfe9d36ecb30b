//! Command declarations and handler bindings.
//!
//! A [`CommandTable`] says how each keyword's arguments are extracted; a
//! [`HandlerTable`] says which function runs it.  The two are kept apart so
//! the processor can check, once at construction, that every declared
//! command is actually implemented.

use std::collections::HashMap;

use regex::Regex;

use super::line::{is_ident, IDENT};
use super::Machine;
use crate::error::{Result, ScriptError};

// ── CommandSpec ───────────────────────────────────────────────────────────────

/// How a command's argument text is turned into argument strings.
#[derive(Debug, Clone)]
pub enum CommandSpec {
    /// `n` comma-separated variable names.
    Arity(usize),
    /// A custom grammar: the anchored `pattern` is matched against the
    /// argument text and capture groups `1..=arity` become the arguments.
    Pattern { arity: usize, pattern: Regex },
}

impl CommandSpec {
    /// Compile a custom-pattern spec.  The pattern is anchored at both ends.
    pub fn pattern(arity: usize, src: &str) -> Result<Self> {
        let pattern = Regex::new(&format!("^(?:{src})$"))
            .map_err(|e| ScriptError::config(format!("invalid command pattern `{src}`: {e}")))?;
        let groups = pattern.captures_len() - 1;
        if groups < arity {
            return Err(ScriptError::config(format!(
                "command pattern `{src}` has {groups} capture groups, needs {arity}"
            )));
        }
        Ok(CommandSpec::Pattern { arity, pattern })
    }

    pub fn arity(&self) -> usize {
        match self {
            CommandSpec::Arity(n) => *n,
            CommandSpec::Pattern { arity, .. } => *arity,
        }
    }

    /// Split `rest` (everything after the keyword) into arguments.
    ///
    /// The error string describes the mismatch; the dispatcher wraps it into
    /// a [`ScriptError::Syntax`] together with the raw line.
    pub fn extract<'a>(&self, rest: &'a str) -> std::result::Result<Vec<&'a str>, String> {
        match self {
            CommandSpec::Arity(0) => {
                if rest.trim().is_empty() {
                    Ok(Vec::new())
                } else {
                    Err("expects no arguments".to_owned())
                }
            }
            CommandSpec::Arity(n) => {
                let args: Vec<&str> = if rest.trim().is_empty() {
                    Vec::new()
                } else {
                    rest.split(',').map(str::trim).collect()
                };
                if args.len() != *n {
                    return Err(format!("expects {n} argument(s), got {}", args.len()));
                }
                if let Some(bad) = args.iter().find(|a| !is_ident(a)) {
                    return Err(format!("`{bad}` is not a valid variable name (expected {IDENT})"));
                }
                Ok(args)
            }
            CommandSpec::Pattern { arity, pattern } => {
                let caps = pattern
                    .captures(rest)
                    .ok_or_else(|| "arguments do not match the command's syntax".to_owned())?;
                Ok((1..=*arity)
                    .map(|i| caps.get(i).map_or("", |m| m.as_str()))
                    .collect())
            }
        }
    }
}

// ── CommandTable ──────────────────────────────────────────────────────────────

/// Keyword → [`CommandSpec`].  Read-only once handed to the processor.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    specs: HashMap<String, CommandSpec>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a command taking `n` comma-separated variable names.
    pub fn arity(mut self, keyword: &str, n: usize) -> Self {
        self.specs.insert(keyword.to_owned(), CommandSpec::Arity(n));
        self
    }

    /// Declare a command with a custom argument grammar.
    pub fn pattern(mut self, keyword: &str, arity: usize, src: &str) -> Result<Self> {
        self.specs.insert(keyword.to_owned(), CommandSpec::pattern(arity, src)?);
        Ok(self)
    }

    pub fn get(&self, keyword: &str) -> Option<&CommandSpec> {
        self.specs.get(keyword)
    }

    pub fn contains(&self, keyword: &str) -> bool {
        self.specs.contains_key(keyword)
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// One dispatched command line.
#[derive(Debug)]
pub struct Call<'a> {
    /// Program counter of the line being executed.
    pub pc: usize,
    /// The line as it sits in the line table, for error messages.
    pub line: &'a str,
    pub keyword: &'a str,
    pub args: Vec<&'a str>,
}

impl Call<'_> {
    /// Argument `i`; the dispatcher guarantees `args.len() == arity`.
    pub fn arg(&self, i: usize) -> &str {
        self.args.get(i).copied().unwrap_or("")
    }

    /// The default next program counter.
    pub fn next(&self) -> usize {
        self.pc + 1
    }

    /// A [`ScriptError::Runtime`] pointing at this line.
    pub fn error(&self, message: impl Into<String>) -> ScriptError {
        ScriptError::runtime(self.pc, self.line, format!("{}: {}", self.keyword, message.into()))
    }
}

/// A command implementation.  Returns the next program counter.
pub type Handler<L> = fn(&mut L, &mut Machine, &Call<'_>) -> Result<usize>;

/// Keyword → [`Handler`].
pub struct HandlerTable<L> {
    handlers: HashMap<String, Handler<L>>,
}

impl<L> Default for HandlerTable<L> {
    fn default() -> Self {
        HandlerTable { handlers: HashMap::new() }
    }
}

impl<L> HandlerTable<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, keyword: &str, handler: Handler<L>) -> Self {
        self.handlers.insert(keyword.to_owned(), handler);
        self
    }

    pub fn get(&self, keyword: &str) -> Option<Handler<L>> {
        self.handlers.get(keyword).copied()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
