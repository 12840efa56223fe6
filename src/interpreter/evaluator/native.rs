use std::{
    io::Write,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            function::Callable,
        },
        lexer::Token,
        value::Value,
    },
};

/// Signature shared by all natives.
///
/// A native receives the context (for its I/O handles), the evaluated
/// arguments and the call's closing-paren token for diagnostics. Arity is
/// enforced by table lookup, so the slice always has the declared length.
pub type NativeFn = fn(&mut Context, &[Value], &Token) -> EvalResult<Value>;

/// One entry of the native table.
pub struct NativeDef {
    /// The language-level function name.
    pub name:    &'static str,
    /// The exact number of arguments.
    pub arity:   usize,
    /// Whether the native lands in the value-returning table (`true`) or
    /// the void table.
    pub returns: bool,
    /// The implementation.
    pub run:     NativeFn,
}

/// Declares the native table: one line per `name / arity` pair.
macro_rules! native_functions {
    (
        $(
            $name:literal / $arity:literal => {
                returns: $returns:expr,
                run: $run:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// Every native the runtime ships.
        pub static NATIVE_TABLE: &[NativeDef] = &[
            $(
                NativeDef { name: $name, arity: $arity, returns: $returns, run: $run },
            )*
        ];
    };
}

native_functions! {
    "print"        / 1 => { returns: false, run: print },
    "println"      / 0 => { returns: false, run: println_blank },
    "println"      / 1 => { returns: false, run: println_value },
    "length"       / 1 => { returns: true,  run: length },
    "yeet"         / 2 => { returns: true,  run: yeet },
    "isAlphabetic" / 1 => { returns: true,  run: |c, args, site| classify(c, args, site, "isAlphabetic", char::is_alphabetic) },
    "isUpperCase"  / 1 => { returns: true,  run: |c, args, site| classify(c, args, site, "isUpperCase", char::is_uppercase) },
    "isLowerCase"  / 1 => { returns: true,  run: |c, args, site| classify(c, args, site, "isLowerCase", char::is_lowercase) },
    "toUpperCase"  / 1 => { returns: true,  run: |c, args, site| recase(c, args, site, "toUpperCase") },
    "toLowerCase"  / 1 => { returns: true,  run: |c, args, site| recase(c, args, site, "toLowerCase") },
    "input"        / 0 => { returns: true,  run: input },
    "rand"         / 0 => { returns: true,  run: random },
    "clock"        / 0 => { returns: true,  run: clock },
}

impl Context {
    /// Fills the function tables with the native table. Runs once, before
    /// the importer adds declared functions, so a program clashing with a
    /// native name gets the usual re-declaration error.
    pub(crate) fn load_natives(&mut self) {
        for def in NATIVE_TABLE {
            let handle = Self::handle(def.name, def.arity);
            let table = if def.returns {
                &mut self.functions
            } else {
                &mut self.voids
            };
            table.insert(handle, Callable::Native(def));
        }
    }
}

/// `void print(value)`: the default text form, no newline.
fn print(context: &mut Context, args: &[Value], _site: &Token) -> EvalResult<Value> {
    let _ = write!(context.out, "{}", args[0]);
    Ok(Value::Null)
}

/// `void println()`: just the newline.
fn println_blank(context: &mut Context, _args: &[Value], _site: &Token) -> EvalResult<Value> {
    let _ = writeln!(context.out);
    Ok(Value::Null)
}

/// `void println(value)`: the default text form and a newline.
fn println_value(context: &mut Context, args: &[Value], _site: &Token) -> EvalResult<Value> {
    let _ = writeln!(context.out, "{}", args[0]);
    Ok(Value::Null)
}

/// `func length(value)`: characters of a string or elements of a list,
/// `-1` for anything else.
#[allow(clippy::cast_possible_wrap)]
fn length(_context: &mut Context, args: &[Value], _site: &Token) -> EvalResult<Value> {
    match &args[0] {
        Value::Str(text) => Ok(Value::Int(text.chars().count() as i64)),
        Value::List(items) => Ok(Value::Int(items.borrow().len() as i64)),
        _ => Ok(Value::Int(-1)),
    }
}

/// `func yeet(target, position)`: removes position `i` from a list
/// (returning the removed element) or from a string (returning the string
/// without that character). Anything else yields `-1`.
fn yeet(_context: &mut Context, args: &[Value], site: &Token) -> EvalResult<Value> {
    let out_of_range = || RuntimeError::IndexOutOfRange { line: site.line,
                                                          file: site.file.to_string(), };

    let Value::Int(position) = args[1] else {
        return Err(RuntimeError::TypeMismatch { details: "yeet position must be an integer"
                                                             .to_string(),
                                                line:    site.line,
                                                file:    site.file.to_string(), });
    };

    match &args[0] {
        Value::List(items) => {
            let mut elements = items.borrow_mut();
            let index = usize::try_from(position).map_err(|_| out_of_range())?;
            if index >= elements.len() {
                return Err(out_of_range());
            }
            Ok(elements.remove(index))
        },

        Value::Str(text) => {
            let chars: Vec<char> = text.chars().collect();
            let index = usize::try_from(position).map_err(|_| out_of_range())?;
            if index >= chars.len() {
                return Err(out_of_range());
            }

            let mut shortened: String = chars[..index].iter().collect();
            shortened.extend(chars[index + 1..].iter());
            Ok(Value::Str(shortened))
        },

        _ => Ok(Value::Int(-1)),
    }
}

/// Shared body of the first-character classification natives.
fn classify(_context: &mut Context,
            args: &[Value],
            site: &Token,
            name: &str,
            test: fn(char) -> bool)
            -> EvalResult<Value> {
    let Value::Str(text) = &args[0] else {
        return Err(RuntimeError::TypeMismatch { details: format!("{name} expects a string"),
                                                line:    site.line,
                                                file:    site.file.to_string(), });
    };

    let Some(first) = text.chars().next() else {
        return Err(RuntimeError::TypeMismatch { details: format!("{name} expects a non-empty string"),
                                                line:    site.line,
                                                file:    site.file.to_string(), });
    };

    Ok(Value::Bool(test(first)))
}

/// Shared body of `toUpperCase` and `toLowerCase`.
fn recase(_context: &mut Context,
          args: &[Value],
          site: &Token,
          name: &str)
          -> EvalResult<Value> {
    let Value::Str(text) = &args[0] else {
        return Err(RuntimeError::TypeMismatch { details: format!("{name} expects a string"),
                                                line:    site.line,
                                                file:    site.file.to_string(), });
    };

    Ok(Value::Str(if name == "toUpperCase" {
                      text.to_uppercase()
                  } else {
                      text.to_lowercase()
                  }))
}

/// `func input()`: one line from the reader, without its line ending.
/// Yields the empty string once input is exhausted.
fn input(context: &mut Context, _args: &[Value], _site: &Token) -> EvalResult<Value> {
    context.flush();

    let mut line = String::new();
    let _ = context.input.read_line(&mut line);
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }

    Ok(Value::Str(line))
}

/// `func rand()`: uniform in `[0.0, 1.0)`.
fn random(_context: &mut Context, _args: &[Value], _site: &Token) -> EvalResult<Value> {
    Ok(Value::Dbl(rand::random::<f64>()))
}

/// `func clock()`: milliseconds since the Unix epoch.
#[allow(clippy::cast_possible_truncation)]
fn clock(_context: &mut Context, _args: &[Value], _site: &Token) -> EvalResult<Value> {
    let millis = SystemTime::now().duration_since(UNIX_EPOCH)
                                  .map_or(0, |elapsed| elapsed.as_millis() as i64);
    Ok(Value::Int(millis))
}
