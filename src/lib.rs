//! # cflat
//!
//! A tree-walking interpreter for the C-flat scripting language: a small,
//! dynamically-typed, C-family language with `func`/`void` functions
//! dispatched by arity, block scoping, fall-through switches and
//! multi-level `break`.
//!
//! Source text flows through four stages: the lexer builds tokens, the
//! parser builds an AST (recovering per line so several syntax errors
//! surface at once), the resolver annotates variable references with
//! their lexical scope depth, and the evaluator walks the tree. The
//! importer splices functions from `import`ed files into the function
//! tables before resolution.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic
)]
#![allow(clippy::missing_errors_doc)]

use std::{
    collections::HashSet,
    fs, io,
    io::{BufRead, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

use crate::{
    ast::{NodeIds, Stmt},
    error::{RuntimeError, SyntaxError},
    interpreter::{
        evaluator::{core::Context, statement::Flow},
        importer::Importer,
        lexer::tokenize,
        parser::core::Parser,
        resolver::Resolver,
    },
};

/// Defines the structure of parsed code.
///
/// Declares the `Expr` and `Stmt` enums the parser builds and the
/// resolver and evaluator traverse, together with the node-id machinery
/// the scope side table is keyed by.
pub mod ast;
/// Provides the error types for parsing and evaluation.
///
/// Syntax diagnostics and runtime errors both render in the interpreter's
/// bracketed `[file ln N]` format and carry the location of the token
/// they were raised at.
pub mod error;
/// Orchestrates lexing, parsing, resolution and evaluation.
///
/// Contains the four pipeline stages plus the importer and the runtime
/// value type. [`Interpreter`] in the crate root drives them.
pub mod interpreter;

/// Everything that can stop a program from starting or finishing.
#[derive(Debug)]
pub enum CflatError {
    /// Parsing or resolution produced diagnostics; the program did not
    /// run.
    Syntax(Vec<SyntaxError>),
    /// The program died on a runtime error.
    Runtime(RuntimeError),
    /// A source file could not be read at all.
    Io {
        /// The path that failed to open.
        path:   PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

impl std::fmt::Display for CflatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax(diagnostics) => {
                for (index, diagnostic) in diagnostics.iter().enumerate() {
                    if index > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{diagnostic}")?;
                }
                Ok(())
            },
            Self::Runtime(error) => write!(f, "{error}"),
            Self::Io { path, source } => {
                write!(f, "failed to read '{}': {source}", path.display())
            },
        }
    }
}

impl std::error::Error for CflatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Syntax(_) => None,
            Self::Runtime(error) => Some(error),
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// Lexes and parses one source text into statements plus any diagnostics.
///
/// Node ids are drawn from `ids` so several sources parsed for one run
/// (the main file and its imports) never collide in the side table.
#[must_use]
pub fn parse_source(source: &str, file: &str, ids: &NodeIds) -> (Vec<Stmt>, Vec<SyntaxError>) {
    let label: Rc<str> = Rc::from(file);

    let (tokens, mut diagnostics) = tokenize(source, &label);
    let (statements, parse_diagnostics) = Parser::new(tokens, ids.clone()).parse();
    diagnostics.extend(parse_diagnostics);

    (statements, diagnostics)
}

/// One interpreter session: the runtime scope, the function tables and
/// the import machinery, reusable across several sources.
///
/// # Examples
/// ```
/// let mut interpreter = cflat::Interpreter::new();
/// interpreter.run_source("var x = 6 * 7; print(x);", "demo.cflat")
///            .unwrap();
/// ```
pub struct Interpreter {
    context:     Context,
    ids:         NodeIds,
    import_root: PathBuf,
    loaded:      HashSet<PathBuf>,
}

impl Interpreter {
    /// An interpreter wired to the process stdout and stdin, importing
    /// from `./cflatexe`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_context(Context::new())
    }

    /// An interpreter with caller-supplied output and input handles, for
    /// embedding and for tests that capture what a program prints.
    #[must_use]
    pub fn with_io(out: Box<dyn Write>, input: Box<dyn BufRead>) -> Self {
        Self::with_context(Context::with_io(out, input))
    }

    fn with_context(context: Context) -> Self {
        Self { context,
               ids: NodeIds::default(),
               import_root: PathBuf::from("./cflatexe"),
               loaded: HashSet::new() }
    }

    /// Changes where `import foo;` looks for `foo.cflat`.
    pub fn set_import_root(&mut self, root: impl Into<PathBuf>) {
        self.import_root = root.into();
    }

    /// Reads and runs a source file. The diagnostics label is the file's
    /// final path component.
    pub fn run_file(&mut self, path: &Path) -> Result<(), CflatError> {
        let source = fs::read_to_string(path).map_err(|source| CflatError::Io { path:
                                                                                    path.to_path_buf(),
                                                                                source })?;
        let label = path.file_name()
                        .map_or_else(|| path.display().to_string(),
                                     |name| name.to_string_lossy().into_owned());

        self.run_source(&source, &label)
    }

    /// Runs one source text through the whole pipeline.
    ///
    /// Any syntax diagnostic from parsing, importing or resolution stops
    /// the run before execution. Runtime errors stop it at the failing
    /// statement.
    pub fn run_source(&mut self, source: &str, file: &str) -> Result<(), CflatError> {
        let (mut statements, mut diagnostics) = parse_source(source, file, &self.ids);
        if !diagnostics.is_empty() {
            return Err(CflatError::Syntax(diagnostics));
        }

        let mut resolver = Resolver::new();
        let mut importer = Importer::new(&mut self.context,
                                         &mut resolver,
                                         self.ids.clone(),
                                         &self.import_root,
                                         &mut self.loaded);
        let imported = importer.import_functions(&mut statements);
        diagnostics.extend(importer.into_diagnostics());
        imported.map_err(CflatError::Runtime)?;

        resolver.resolve_stmts(&statements);
        let (locals, resolve_diagnostics) = resolver.into_parts();
        diagnostics.extend(resolve_diagnostics);

        if !diagnostics.is_empty() {
            return Err(CflatError::Syntax(diagnostics));
        }

        self.context.extend_locals(locals);

        let result = self.execute(&statements);
        self.context.flush();
        result
    }

    fn execute(&mut self, statements: &[Stmt]) -> Result<(), CflatError> {
        for statement in statements {
            match self.context.exec(statement).map_err(CflatError::Runtime)? {
                Flow::Normal => {},

                Flow::Return { keyword, .. } => {
                    return Err(CflatError::Runtime(RuntimeError::ReturnOutsideFunction {
                        line: keyword.line,
                        file: keyword.file.to_string(),
                    }));
                },

                Flow::Break { keyword, .. } => {
                    return Err(CflatError::Runtime(RuntimeError::BreakOutsideLoop {
                        line: keyword.line,
                        file: keyword.file.to_string(),
                    }));
                },
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
