//! # lscript
//!
//! A small line-oriented scripting language.  Scripts are plain text, one
//! statement per line:
//!
//! ```text
//! # count down from 3
//! set n, 3
//! set zero, 0
//! :loop
//! echo n
//! dec n
//! gotog n, zero, loop
//! ```
//!
//! The crate has two layers.  [`processor`] is language-agnostic: it splits
//! text into a line table, records labels and runs the fetch-execute loop.
//! [`script`] is the concrete instruction set built on top of it.

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod processor;
pub mod script;
pub mod var;

pub use error::ScriptError;
pub use script::{Interpreter, Value};
