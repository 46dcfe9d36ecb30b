//! lscript commands.
//!
//! [`commands`] declares each keyword's argument grammar and [`handlers`]
//! binds it to a function below.  Every handler receives variable *names*
//! and looks the values up itself, so an unassigned name is always reported
//! together with the offending line.  Handlers return the next program
//! counter: `call.next()` to fall through, a label's line to jump.
//!
//! | Command | Args | Effect |
//! |---------|------|--------|
//! | `set` | dest, literal-or-var | assign a number, string, list or copy |
//! | `read` | file, dest | `dest` = contents of file |
//! | `write` | data, file | overwrite file with `data` |
//! | `cut` | src, index, dest | `dest` = char / item at `index` |
//! | `asc` | src, dest | `dest` = code of first char |
//! | `char` | code, dest | `dest` = one-char string for `code` (0–255) |
//! | `goto` | label | jump |
//! | `gotog` / `gotol` / `gotoe` | l, r, label | jump if `l > r` / `l < r` / `l == r` |
//! | `add` `sub` `mul` `div` `mod` | a, b | `a = a op b` |
//! | `xor` `and` `or` | a, b, dest | `dest = a op b` on integers |
//! | `append` | dest, src | push onto a list, or add / concatenate |
//! | `inc` / `dec` | v | `v = v ± 1` |
//! | `len` | src, dest | length of a string or list |
//! | `hex` | n, dest | two-digit lowercase hex (0–255) |
//! | `echo` | v | emit `v` |
//! | `end` | (none) | stop |

use super::interp::InstructionSet;
use super::literal::{self, Literal};
use super::value::{format_number, Value};
use crate::error::Result;
use crate::processor::line::{IDENT, LABEL};
use crate::processor::{Call, CommandTable, Handler, HandlerTable, Machine};

type Isa = InstructionSet;

// ── Declarations ──────────────────────────────────────────────────────────────

/// The lscript command table.
pub fn commands() -> Result<CommandTable> {
    let conditional = format!(r"\s*({IDENT})\s*,\s*({IDENT})\s*,\s*:?({LABEL})\s*");
    CommandTable::new()
        .arity("read", 2)
        .arity("write", 2)
        .arity("cut", 3)
        .arity("asc", 2)
        .arity("char", 2)
        .arity("add", 2)
        .arity("sub", 2)
        .arity("mul", 2)
        .arity("div", 2)
        .arity("mod", 2)
        .arity("append", 2)
        .arity("inc", 1)
        .arity("dec", 1)
        .arity("len", 2)
        .arity("xor", 3)
        .arity("and", 3)
        .arity("or", 3)
        .arity("hex", 2)
        .arity("echo", 1)
        .arity("end", 0)
        .pattern("set", 2, &format!(r"\s*({IDENT})\s*,\s*(.+?)\s*"))?
        .pattern("goto", 1, &format!(r"\s*:?({LABEL})\s*"))?
        .pattern("gotog", 3, &conditional)?
        .pattern("gotol", 3, &conditional)?
        .pattern("gotoe", 3, &conditional)
}

/// Handler bindings for every keyword in [`commands`].
pub fn handlers() -> HandlerTable<Isa> {
    HandlerTable::new()
        .bind("set", set as Handler<Isa>)
        .bind("read", read)
        .bind("write", write)
        .bind("cut", cut)
        .bind("asc", asc)
        .bind("char", chr)
        .bind("goto", goto)
        .bind("gotog", goto_greater)
        .bind("gotol", goto_less)
        .bind("gotoe", goto_equal)
        .bind("add", add)
        .bind("sub", sub)
        .bind("mul", mul)
        .bind("div", div)
        .bind("mod", rem)
        .bind("append", append)
        .bind("inc", inc)
        .bind("dec", dec)
        .bind("len", len)
        .bind("xor", xor)
        .bind("and", and)
        .bind("or", or)
        .bind("hex", hex)
        .bind("echo", echo)
        .bind("end", end)
}

// ── Operand access ────────────────────────────────────────────────────────────

fn value<'m>(m: &'m Machine, call: &Call<'_>, i: usize) -> Result<&'m Value> {
    let name = call.arg(i);
    m.get_var(name)
        .ok_or_else(|| call.error(format!("undefined variable '{name}'")))
}

fn kind_error(call: &Call<'_>, i: usize, found: &Value, expected: &str) -> crate::error::ScriptError {
    call.error(format!(
        "'{}' is a {}, expected {expected}",
        call.arg(i),
        found.type_name()
    ))
}

fn number(m: &Machine, call: &Call<'_>, i: usize) -> Result<f64> {
    match value(m, call, i)? {
        Value::Number(x) => Ok(*x),
        other => Err(kind_error(call, i, other, "a number")),
    }
}

fn string<'m>(m: &'m Machine, call: &Call<'_>, i: usize) -> Result<&'m str> {
    match value(m, call, i)? {
        Value::Str(s) => Ok(s),
        other => Err(kind_error(call, i, other, "a string")),
    }
}

/// Numbers used as integers are truncated toward zero.
fn integer(m: &Machine, call: &Call<'_>, i: usize) -> Result<i64> {
    let x = number(m, call, i)?;
    if !x.is_finite() {
        return Err(call.error(format!("'{}' is not a finite number", call.arg(i))));
    }
    Ok(x.trunc() as i64)
}

fn label(m: &Machine, call: &Call<'_>, i: usize) -> Result<usize> {
    let name = call.arg(i);
    m.line_by_label(name)
        .ok_or_else(|| call.error(format!("undefined label ':{name}'")))
}

// ── Assignment & I/O ──────────────────────────────────────────────────────────

fn set(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let src = call.arg(1);
    let val = match literal::classify(src) {
        Some(Literal::Value(v)) => v,
        Some(Literal::Reference(name)) => m
            .get_var(&name)
            .cloned()
            .ok_or_else(|| call.error(format!("undefined variable '{name}'")))?,
        None => {
            return Err(call.error(format!(
                "`{src}` is not a number, string, list or variable name"
            )))
        }
    };
    m.set_var(call.arg(0), val);
    Ok(call.next())
}

fn read(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let path = string(m, call, 0)?.to_owned();
    if !m.host().exists(&path) {
        return Err(call.error(format!("file '{path}' does not exist")));
    }
    let text = m
        .host()
        .read(&path)
        .map_err(|e| call.error(format!("cannot read '{path}': {e}")))?;
    m.set_var(call.arg(1), text);
    Ok(call.next())
}

fn write(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let data = string(m, call, 0)?.to_owned();
    let path = string(m, call, 1)?.to_owned();
    if path.is_empty() {
        return Err(call.error(format!("file name in '{}' is empty", call.arg(1))));
    }
    m.host_mut()
        .write(&path, &data)
        .map_err(|e| call.error(format!("cannot write '{path}': {e}")))?;
    Ok(call.next())
}

fn echo(isa: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let text = value(m, call, 0)?.to_string();
    isa.emit(text);
    Ok(call.next())
}

// ── Strings & lists ───────────────────────────────────────────────────────────

fn cut(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let index = integer(m, call, 1)?;
    let src = value(m, call, 0)?;
    let Some(length) = src.len() else {
        return Err(kind_error(call, 0, src, "a string or list"));
    };
    let item = usize::try_from(index).ok().and_then(|i| match src {
        Value::Str(s) => s.chars().nth(i).map(String::from),
        Value::List(items) => items.get(i).cloned(),
        Value::Number(_) => None,
    });
    let item = item.ok_or_else(|| {
        call.error(format!("index {index} out of range for '{}' (length {length})", call.arg(0)))
    })?;
    m.set_var(call.arg(2), item);
    Ok(call.next())
}

fn asc(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let first = string(m, call, 0)?
        .chars()
        .next()
        .ok_or_else(|| call.error(format!("'{}' is an empty string", call.arg(0))))?;
    m.set_var(call.arg(1), f64::from(u32::from(first)));
    Ok(call.next())
}

fn chr(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let code = number(m, call, 0)?;
    if !(0.0..=255.0).contains(&code) {
        return Err(call.error(format!("character code {} is outside 0..=255", format_number(code))));
    }
    m.set_var(call.arg(1), char::from(code as u8).to_string());
    Ok(call.next())
}

fn len(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let src = value(m, call, 0)?;
    let n = src
        .len()
        .ok_or_else(|| kind_error(call, 0, src, "a string or list"))?;
    m.set_var(call.arg(1), n as f64);
    Ok(call.next())
}

fn append(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let src = value(m, call, 1)?.clone();
    let name = call.arg(0);
    let dest = m
        .get_var_mut(name)
        .ok_or_else(|| call.error(format!("undefined variable '{name}'")))?;
    match (dest, src) {
        (Value::List(items), Value::Str(s)) => items.push(s),
        (Value::List(items), Value::Number(x)) => items.push(format_number(x)),
        (Value::Number(a), Value::Number(b)) => *a += b,
        (Value::Str(a), Value::Str(b)) => a.push_str(&b),
        (dest, src) => {
            return Err(call.error(format!(
                "cannot append a {} to a {}",
                src.type_name(),
                dest.type_name()
            )))
        }
    }
    Ok(call.next())
}

// ── Arithmetic & bitwise ──────────────────────────────────────────────────────

fn arith(m: &mut Machine, call: &Call<'_>, op: fn(f64, f64) -> f64) -> Result<usize> {
    let a = number(m, call, 0)?;
    let b = number(m, call, 1)?;
    m.set_var(call.arg(0), op(a, b));
    Ok(call.next())
}

fn add(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    arith(m, call, |a, b| a + b)
}

fn sub(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    arith(m, call, |a, b| a - b)
}

fn mul(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    arith(m, call, |a, b| a * b)
}

fn div(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    if number(m, call, 1)? == 0.0 {
        return Err(call.error("division by zero"));
    }
    arith(m, call, |a, b| a / b)
}

fn rem(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    if number(m, call, 1)? == 0.0 {
        return Err(call.error("modulo by zero"));
    }
    arith(m, call, |a, b| a % b)
}

fn step(m: &mut Machine, call: &Call<'_>, delta: f64) -> Result<usize> {
    let v = number(m, call, 0)?;
    m.set_var(call.arg(0), v + delta);
    Ok(call.next())
}

fn inc(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    step(m, call, 1.0)
}

fn dec(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    step(m, call, -1.0)
}

fn bitwise(m: &mut Machine, call: &Call<'_>, op: fn(i64, i64) -> i64) -> Result<usize> {
    let a = integer(m, call, 0)?;
    let b = integer(m, call, 1)?;
    m.set_var(call.arg(2), op(a, b) as f64);
    Ok(call.next())
}

fn xor(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    bitwise(m, call, |a, b| a ^ b)
}

fn and(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    bitwise(m, call, |a, b| a & b)
}

fn or(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    bitwise(m, call, |a, b| a | b)
}

fn hex(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let n = number(m, call, 0)?;
    if !(0.0..=255.0).contains(&n) {
        return Err(call.error(format!("{} does not fit in one byte", format_number(n))));
    }
    m.set_var(call.arg(1), format!("{:02x}", n as u8));
    Ok(call.next())
}

// ── Control transfer ──────────────────────────────────────────────────────────

fn goto(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    label(m, call, 0)
}

/// Shared body of the conditional jumps.  The label is resolved before the
/// comparison so an undefined label fails even when the jump is not taken.
fn branch(m: &Machine, call: &Call<'_>, taken: bool) -> Result<usize> {
    let target = label(m, call, 2)?;
    Ok(if taken { target } else { call.next() })
}

fn goto_greater(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let (l, r) = (number(m, call, 0)?, number(m, call, 1)?);
    branch(m, call, l > r)
}

fn goto_less(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let (l, r) = (number(m, call, 0)?, number(m, call, 1)?);
    branch(m, call, l < r)
}

fn goto_equal(_: &mut Isa, m: &mut Machine, call: &Call<'_>) -> Result<usize> {
    let l = value(m, call, 0)?;
    let r = value(m, call, 1)?;
    if std::mem::discriminant(l) != std::mem::discriminant(r) {
        return Err(call.error(format!(
            "cannot compare a {} with a {}",
            l.type_name(),
            r.type_name()
        )));
    }
    branch(m, call, l == r)
}

fn end(_: &mut Isa, m: &mut Machine, _: &Call<'_>) -> Result<usize> {
    Ok(m.line_count())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
