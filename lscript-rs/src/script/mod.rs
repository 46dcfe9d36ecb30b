//! The lscript instruction set.
//!
//! Built on the generic [`processor`](crate::processor): this module declares
//! the command table, implements one handler per command and wraps the
//! result in an embeddable [`Interpreter`].
//!
//! - Numbers, `'strings'` with `\xHH` escapes, and `['lists']` of strings
//! - `:labels` with `goto`, `gotog`, `gotol`, `gotoe`
//! - Arithmetic, bitwise and string/list commands
//! - `read` / `write` through a pluggable [`FileHost`](crate::host::FileHost)
//!
//! # Quick start
//!
//! ```rust
//! use lscript::script::{Interpreter, Value};
//!
//! let mut interp = Interpreter::new().unwrap();
//! interp.run("set a, 10\nset b, 3\nsub a, b\necho a").unwrap();
//! assert_eq!(interp.get_var("a"), Some(&Value::Number(7.0)));
//! assert_eq!(interp.output(), ["7"]);
//! ```

pub mod builtins;
pub mod interp;
pub mod literal;
pub mod value;

pub use interp::{InstructionSet, Interpreter};
pub use value::Value;
