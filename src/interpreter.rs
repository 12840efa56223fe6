/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens,
/// each carrying its line and file for diagnostics. It is fail-soft:
/// unknown characters are dropped and structural complaints are left to
/// the parser, so a token stream always comes out.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with payload and
///   source location.
/// - Handles numeric, string and char literals, identifiers, keywords and
///   maximal operator runs.
/// - Reports malformed numeric literals.
pub mod lexer;

/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream and constructs statement and
/// expression nodes. On a syntax error it records a diagnostic, skips to
/// the next source line and carries on, so one run surfaces as many
/// errors as it can; the driver refuses to execute a program that
/// produced any.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes.
/// - Enforces precedence and associativity, desugaring `for` loops and
///   compound assignments.
/// - Recovers from errors at line boundaries.
pub mod parser;

/// The resolver module maps variable references to lexical scopes.
///
/// A static pre-pass over the AST that annotates each reference with its
/// scope depth in a side table keyed by node id. Unannotated references
/// are global. It also rejects reading a local variable inside its own
/// initializer.
pub mod resolver;

/// The importer module hoists functions and splices imported files.
///
/// Walks the parsed statement list, moves `func`/`void` declarations into
/// the function tables, and loads `import`ed files from the import root,
/// recursively. Runs before resolution of the main statements.
pub mod importer;

/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// manages the scope stack and the function tables, and threads the
/// `Return`/`Break` unwinding signals to the frames that consume them.
pub mod evaluator;

/// The value module defines the runtime data types for evaluation.
///
/// Declares the `Value` union the whole interpreter computes with:
/// integers, doubles, booleans, strings, shared mutable lists and null.
pub mod value;
