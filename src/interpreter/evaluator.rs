/// Evaluation context and expression dispatch.
///
/// Owns the scope stack, the function tables, the resolver side table and
/// the injected I/O handles, and routes each expression variant to its
/// handler.
pub mod core;

/// Statement execution and control-flow unwinding.
///
/// Defines the flow values (`Normal`, `Return`, `Break`) that statement
/// evaluation threads upward, and the loop and switch frames that catch
/// them.
pub mod statement;

/// Binary operators.
///
/// The two-level numeric tower, string concatenation, list append,
/// short-circuit logic and structural equality.
pub mod binary;

/// Named coercions and truthiness.
///
/// The four casts exposed as `(bln)`, `(int)`, `(flt)` and `(str)`, and
/// the truthiness rule conditions use.
pub mod cast;

/// Index and slice evaluation, and assignment through an index.
pub mod index;

/// Function dispatch.
///
/// The callable representation, arity-keyed table lookups with their
/// did-you-mean probe, and the one-scope-per-call frame for declared
/// functions.
pub mod function;

/// Native functions registered in the tables at startup.
pub mod native;
