/// Parse-time diagnostics.
///
/// Defines the errors reported by the lexer, the parser, the resolver and
/// the importer. Syntax errors are collected rather than thrown so one run
/// can surface several of them; execution is skipped when any exist.
pub mod parse_error;
/// Runtime diagnostics.
///
/// Contains the errors raised during evaluation: unknown names, arity
/// mismatches, bad index positions, failed coercions and the like. Every
/// runtime error is fatal to the running program.
pub mod runtime_error;

pub use parse_error::SyntaxError;
pub use runtime_error::RuntimeError;
