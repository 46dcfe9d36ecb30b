//! Generic line processor.
//!
//! Turns raw script text into a line table, resolves `:label` lines, and runs
//! the fetch-execute loop that dispatches each command line to a handler.
//! It knows nothing about any particular instruction set: the concrete
//! language supplies a [`CommandTable`], a [`HandlerTable`], and a
//! [`PreprocessHooks`] implementation for line kinds of its own.
//!
//! # Lifecycle
//!
//! ```text
//! run(input) ─► load ─► reset ─► preprocess ─► interpret
//!                 │                  │             │
//!          file or inline     labels + lines   pc loop over handlers
//! ```
//!
//! Comment, blank and label lines stay in the line table as `""` so that
//! indices (and therefore jump targets) match physical line numbers.

pub mod command;
pub mod line;

use std::collections::HashMap;

use log::{debug, trace, warn};

use crate::config::ProcessorConfig;
use crate::error::{Result, ScriptError};
use crate::host::FileHost;
use crate::script::value::Value;
use crate::var::VarStore;

pub use command::{Call, CommandSpec, CommandTable, Handler, HandlerTable};
use line::{classify, detect_separator, split_command, LineKind};

// ── PreprocessHooks ───────────────────────────────────────────────────────────

/// Extension point for the concrete language.
///
/// Every line the base classifier does not recognise (not blank, not a
/// comment, not a label) is offered to [`preprocess_line`](Self::preprocess_line).
/// Returning `Some(text)` replaces the line-table entry; `None` keeps it.
pub trait PreprocessHooks {
    fn preprocess_line(
        &mut self,
        _index: usize,
        _line: &str,
        _config: &ProcessorConfig,
    ) -> Result<Option<String>> {
        Ok(None)
    }
}

// ── Machine ───────────────────────────────────────────────────────────────────

/// Mutable runtime state handed to every handler.
pub struct Machine {
    vars: VarStore,
    labels: HashMap<String, usize>,
    pc: usize,
    line_count: usize,
    host: Box<dyn FileHost>,
}

impl Machine {
    fn new(host: Box<dyn FileHost>) -> Self {
        Machine {
            vars: VarStore::new(),
            labels: HashMap::new(),
            pc: 0,
            line_count: 0,
            host,
        }
    }

    pub fn get_var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn get_var_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.vars.get_mut(name)
    }

    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.vars.set(name, value);
    }

    pub fn has_var(&self, name: &str) -> bool {
        self.vars.contains(name)
    }

    pub fn vars(&self) -> &VarStore {
        &self.vars
    }

    pub fn has_label(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    /// Line index bound to `name`, or `None` if no such label exists.
    pub fn line_by_label(&self, name: &str) -> Option<usize> {
        self.labels.get(name).copied()
    }

    /// Program counter of the line currently executing.
    pub fn pc(&self) -> usize {
        self.pc
    }

    /// Length of the line table; returning it from a handler stops the run.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn host(&self) -> &dyn FileHost {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> &mut dyn FileHost {
        self.host.as_mut()
    }

    fn reset(&mut self) {
        self.vars.clear();
        self.labels.clear();
        self.pc = 0;
        self.line_count = 0;
    }
}

// ── LineProcessor ─────────────────────────────────────────────────────────────

/// The preprocessor and dispatcher, parameterised by a concrete language `L`.
pub struct LineProcessor<L> {
    config: ProcessorConfig,
    commands: CommandTable,
    handlers: HandlerTable<L>,
    machine: Machine,
    lang: L,
}

impl<L: PreprocessHooks> LineProcessor<L> {
    /// Build a processor, checking the configuration and that every declared
    /// command has a handler.
    pub fn new(
        config: ProcessorConfig,
        commands: CommandTable,
        handlers: HandlerTable<L>,
        lang: L,
        host: Box<dyn FileHost>,
    ) -> Result<Self> {
        config.validate()?;
        if commands.is_empty() {
            return Err(ScriptError::config("command table is empty"));
        }
        let mut missing: Vec<&str> = commands.keywords().filter(|k| handlers.get(k).is_none()).collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(ScriptError::config(format!(
                "no handler bound for command(s): {}",
                missing.join(", ")
            )));
        }
        for keyword in handlers.keywords().filter(|k| !commands.contains(k)) {
            warn!("handler `{keyword}` has no command declaration and can never run");
        }
        Ok(LineProcessor {
            config,
            commands,
            handlers,
            machine: Machine::new(host),
            lang,
        })
    }

    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn lang(&self) -> &L {
        &self.lang
    }

    pub fn lang_mut(&mut self) -> &mut L {
        &mut self.lang
    }

    // ── Running ───────────────────────────────────────────────────────────────

    /// Run a script.  `input` ending in the configured extension is read as a
    /// file; anything else is the script source itself.
    pub fn run(&mut self, input: &str) -> Result<()> {
        let source = self.load(input)?;
        self.run_source(&source)
    }

    /// Run the script stored at `path`, whatever its extension.
    pub fn run_file(&mut self, path: &str) -> Result<()> {
        let source = self.read_script(path)?;
        self.run_source(&source)
    }

    /// Run inline source text.
    pub fn run_source(&mut self, source: &str) -> Result<()> {
        let lines = self.preprocess(source)?;
        debug!(
            "running {} line(s), {} label(s)",
            lines.len(),
            self.machine.labels.len()
        );
        self.interpret(&lines)?;
        debug!("run finished with {} variable(s) set", self.machine.vars.len());
        Ok(())
    }

    /// Resolve `input` to script text (see [`run`](Self::run)).
    pub fn load(&self, input: &str) -> Result<String> {
        if input.ends_with(&self.config.extension) {
            self.read_script(input)
        } else {
            Ok(input.to_owned())
        }
    }

    fn read_script(&self, path: &str) -> Result<String> {
        debug!("loading script file {path}");
        self.machine.host.read(path).map_err(|source| ScriptError::Load {
            path: path.into(),
            source,
        })
    }

    /// Clear variables, labels and the program counter.
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    /// Reset runtime state, split `text` into the line table and register
    /// labels.  Comment, blank and label lines become `""`.
    pub fn preprocess(&mut self, text: &str) -> Result<Vec<String>> {
        self.reset();

        let separator = match &self.config.separator {
            Some(sep) => sep.clone(),
            None => detect_separator(text).to_owned(),
        };
        trace!("line separator {separator:?}");

        let mut lines = Vec::new();
        for (index, raw) in text.split(separator.as_str()).enumerate() {
            let entry = match classify(raw, &self.config.comment_marker) {
                LineKind::Empty | LineKind::Comment => String::new(),
                LineKind::Label(name) => {
                    if self.machine.labels.contains_key(name) {
                        return Err(ScriptError::preprocessing(
                            index,
                            raw,
                            format!("label ':{name}' is already defined"),
                        ));
                    }
                    debug!("label :{name} -> line {}", index + 1);
                    self.machine.labels.insert(name.to_owned(), index);
                    String::new()
                }
                LineKind::Other => self
                    .lang
                    .preprocess_line(index, raw, &self.config)?
                    .unwrap_or_else(|| raw.to_owned()),
            };
            lines.push(entry);
        }
        Ok(lines)
    }

    /// The fetch-execute loop.  Runs until the program counter leaves the
    /// line table; the first error aborts the run with no rollback.
    pub fn interpret(&mut self, lines: &[String]) -> Result<()> {
        self.machine.pc = 0;
        self.machine.line_count = lines.len();

        while let Some(line) = lines.get(self.machine.pc) {
            let line = line.as_str();
            let pc = self.machine.pc;
            if line.trim().is_empty() {
                self.machine.pc = pc + 1;
                continue;
            }

            let (keyword, rest) = split_command(line)
                .ok_or_else(|| ScriptError::syntax(pc, line, "malformed command line"))?;
            let spec = self
                .commands
                .get(keyword)
                .ok_or_else(|| ScriptError::syntax(pc, line, format!("unknown command '{keyword}'")))?;
            let args = spec
                .extract(rest)
                .map_err(|msg| ScriptError::syntax(pc, line, format!("{keyword}: {msg}")))?;
            // Bindings were checked in `new`; reaching this is a programming error.
            let handler = self.handlers.get(keyword).ok_or_else(|| {
                ScriptError::config(format!("no handler bound for command '{keyword}'"))
            })?;

            trace!("{:>4}: {keyword} {args:?}", pc + 1);
            let call = Call { pc, line, keyword, args };
            self.machine.pc = handler(&mut self.lang, &mut self.machine, &call)?;
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
