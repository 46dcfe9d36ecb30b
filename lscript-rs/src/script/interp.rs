//! lscript interpreter.
//!
//! [`Interpreter`] is the embedding surface: construct it, call
//! [`run`](Interpreter::run), then inspect variables and echoed output.
//! Internally it is a [`LineProcessor`] specialised with
//! [`InstructionSet`], which holds the language's own state (echo output)
//! and strips trailing comments during preprocessing.

use crate::config::ProcessorConfig;
use crate::error::Result;
use crate::host::{FileHost, FsHost};
use crate::processor::{LineProcessor, PreprocessHooks};
use crate::var::VarStore;
use super::builtins::{commands, handlers};
use super::value::Value;

// ── InstructionSet ────────────────────────────────────────────────────────────

/// Language-level state shared by the command handlers.
#[derive(Debug, Default)]
pub struct InstructionSet {
    /// Lines produced by `echo`, oldest first.
    output: Vec<String>,
}

impl InstructionSet {
    pub(crate) fn emit(&mut self, line: String) {
        log::debug!("echo: {line}");
        self.output.push(line);
    }
}

impl PreprocessHooks for InstructionSet {
    fn preprocess_line(
        &mut self,
        _index: usize,
        line: &str,
        config: &ProcessorConfig,
    ) -> Result<Option<String>> {
        Ok(strip_trailing_comment(line, &config.comment_marker).map(str::to_owned))
    }
}

/// Cut `line` at the first comment marker outside a `'…'` literal.
/// `None` when there is no trailing comment.
pub fn strip_trailing_comment<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let mut in_str = false;
    for (i, ch) in line.char_indices() {
        if ch == '\'' {
            in_str = !in_str;
        } else if !in_str && line[i..].starts_with(marker) {
            return Some(line[..i].trim_end());
        }
    }
    None
}

// ── Interpreter ───────────────────────────────────────────────────────────────

/// The lscript interpreter.
///
/// One instance runs one script at a time; each [`run`](Self::run) starts
/// from an empty variable store and label table.  Echo output accumulates
/// across runs until [`take_output`](Self::take_output) drains it.
pub struct Interpreter {
    processor: LineProcessor<InstructionSet>,
}

impl Interpreter {
    /// Default settings, real file system.
    pub fn new() -> Result<Self> {
        Self::with_config(ProcessorConfig::default())
    }

    pub fn with_config(config: ProcessorConfig) -> Result<Self> {
        Self::with_host(config, FsHost)
    }

    pub fn with_host(config: ProcessorConfig, host: impl FileHost + 'static) -> Result<Self> {
        let processor = LineProcessor::new(
            config,
            commands()?,
            handlers(),
            InstructionSet::default(),
            Box::new(host),
        )?;
        Ok(Interpreter { processor })
    }

    // ── Execution ─────────────────────────────────────────────────────────────

    /// Run `input`: a path if it ends with the configured extension,
    /// otherwise the script source.
    pub fn run(&mut self, input: &str) -> Result<()> {
        self.processor.run(input)
    }

    /// Run the script file at `path` regardless of its extension.
    pub fn run_file(&mut self, path: &str) -> Result<()> {
        self.processor.run_file(path)
    }

    /// Run `source` as script text, never as a path.
    pub fn run_source(&mut self, source: &str) -> Result<()> {
        self.processor.run_source(source)
    }

    // ── Inspection ────────────────────────────────────────────────────────────

    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.processor.machine().get_var(name)
    }

    /// Store a value.  Note that the next `run` clears the store first.
    pub fn set_var(&mut self, name: &str, value: impl Into<Value>) {
        self.processor.machine_mut().set_var(name, value);
    }

    pub fn has_var(&self, name: &str) -> bool {
        self.processor.machine().has_var(name)
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.processor.machine().has_label(name)
    }

    /// Line index (zero-based) of `name`, or `None` if undefined.
    pub fn line_by_label(&self, name: &str) -> Option<usize> {
        self.processor.machine().line_by_label(name)
    }

    pub fn vars(&self) -> &VarStore {
        self.processor.machine().vars()
    }

    pub fn config(&self) -> &ProcessorConfig {
        self.processor.config()
    }

    /// Echoed lines not yet drained.
    pub fn output(&self) -> &[String] {
        &self.processor.lang().output
    }

    /// Drain and return echoed lines.
    pub fn take_output(&mut self) -> Vec<String> {
        std::mem::take(&mut self.processor.lang_mut().output)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
