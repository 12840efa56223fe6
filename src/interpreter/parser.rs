/// Parser state and shared machinery.
///
/// Holds the token buffer with its current/lookahead cursors, the helpers
/// the grammar rules are written with (`advance`, the `match_*` family,
/// `expect`), diagnostic recording, and the per-line error recovery that
/// lets one run report several syntax errors.
pub mod core;

/// Statement grammar.
///
/// Parses declarations (`import`, `func`, `void`, `var`, `arr`) and the
/// nesting statements (blocks, `if`, `while`, `for`, `switch`, `return`,
/// `break`, expression statements). `for` loops are desugared into `while`
/// loops here.
pub mod statement;

/// Expression grammar.
///
/// The precedence ladder from assignment down to primary expressions,
/// including compound-assignment desugaring, the ternary operator, casts,
/// calls and index suffixes.
pub mod expression;
