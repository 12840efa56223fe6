#[derive(Debug, Clone, PartialEq)]
/// An error raised during evaluation. Every variant names the line and file
/// of the token it was raised at; the driver prints the diagnostic as
/// `[<file> ln <line>] Runtime: <message>` and exits non-zero.
pub enum RuntimeError {
    /// A variable was read or assigned that is not defined in any
    /// reachable scope.
    UnknownVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
    /// An expression-position call found no matching function.
    UnknownFunction {
        /// The name of the function.
        name:       String,
        /// The number of arguments at the call site.
        arity:      usize,
        /// A nearby arity the function is actually defined with.
        suggestion: Option<usize>,
        /// The source line where the error occurred.
        line:       usize,
        /// The file the line belongs to.
        file:       String,
    },
    /// A statement-position call found no matching function.
    UnknownVoidFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
    /// A void function was called where a value was needed.
    VoidInExpression {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
    /// A name was declared twice in the same scope.
    CannotRedeclareVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
    /// A `(name, arity)` pair was defined twice across the function tables.
    CannotRedeclareFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
    /// An index suffix was applied to something that is neither a string
    /// nor a list.
    NotIndexable {
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
    /// An index or slice position fell outside the target.
    IndexOutOfRange {
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
    /// A non-string value was written into a string through an index.
    SubstringExpected {
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
    /// `++` or `--` was applied to something other than a bare variable.
    InvalidPostfixTarget {
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
    /// A value had the wrong type for the attempted operation.
    TypeMismatch {
        /// Details about the mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
        /// The file the line belongs to.
        file:    String,
    },
    /// A string failed to parse as a number during coercion.
    ParseNumber {
        /// The string that was being parsed.
        lexeme: String,
        /// The type the string was being coerced to.
        target: &'static str,
        /// The source line where the error occurred.
        line:   usize,
        /// The file the line belongs to.
        file:   String,
    },
    /// Integer division or modulo by zero.
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
    /// Integer arithmetic left the 64-bit range.
    Overflow {
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
    /// A `break` unwound past the loops and switches that enclose it.
    BreakOutsideLoop {
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
    /// A `return` unwound past the program root.
    ReturnOutsideFunction {
        /// The source line where the error occurred.
        line: usize,
        /// The file the line belongs to.
        file: String,
    },
}

impl RuntimeError {
    /// The line the diagnostic points at.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnknownVariable { line, .. }
            | Self::UnknownFunction { line, .. }
            | Self::UnknownVoidFunction { line, .. }
            | Self::VoidInExpression { line, .. }
            | Self::CannotRedeclareVariable { line, .. }
            | Self::CannotRedeclareFunction { line, .. }
            | Self::NotIndexable { line, .. }
            | Self::IndexOutOfRange { line, .. }
            | Self::SubstringExpected { line, .. }
            | Self::InvalidPostfixTarget { line, .. }
            | Self::TypeMismatch { line, .. }
            | Self::ParseNumber { line, .. }
            | Self::DivisionByZero { line, .. }
            | Self::Overflow { line, .. }
            | Self::BreakOutsideLoop { line, .. }
            | Self::ReturnOutsideFunction { line, .. } => *line,
        }
    }

    fn file(&self) -> &str {
        match self {
            Self::UnknownVariable { file, .. }
            | Self::UnknownFunction { file, .. }
            | Self::UnknownVoidFunction { file, .. }
            | Self::VoidInExpression { file, .. }
            | Self::CannotRedeclareVariable { file, .. }
            | Self::CannotRedeclareFunction { file, .. }
            | Self::NotIndexable { file, .. }
            | Self::IndexOutOfRange { file, .. }
            | Self::SubstringExpected { file, .. }
            | Self::InvalidPostfixTarget { file, .. }
            | Self::TypeMismatch { file, .. }
            | Self::ParseNumber { file, .. }
            | Self::DivisionByZero { file, .. }
            | Self::Overflow { file, .. }
            | Self::BreakOutsideLoop { file, .. }
            | Self::ReturnOutsideFunction { file, .. } => file,
        }
    }
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} ln {}] Runtime: ", self.file(), self.line())?;

        match self {
            Self::UnknownVariable { name, .. } => write!(f, "Unknown variable \"{name}\""),

            Self::UnknownFunction { name,
                                    arity,
                                    suggestion,
                                    .. } => {
                write!(f, "unknown function '{name}' with {arity} arguments")?;
                if let Some(parameters) = suggestion {
                    write!(f, ". Did you mean '{name}' with {parameters} parameters?")?;
                }
                Ok(())
            },

            Self::UnknownVoidFunction { name, .. } => write!(f, "unknown function '{name}'"),

            Self::VoidInExpression { name, .. } => {
                write!(f, "function {name} does not return a value")
            },

            Self::CannotRedeclareVariable { name, .. } => {
                write!(f, "Cannot re-declare variable '{name}' in the same scope")
            },

            Self::CannotRedeclareFunction { name, .. } => {
                write!(f, "cannot re-declare function '{name}'")
            },

            Self::NotIndexable { .. } => write!(f, "variable is not indexable"),

            Self::IndexOutOfRange { .. } => write!(f, "index out of range"),

            Self::SubstringExpected { .. } => {
                write!(f, "can only assign substrings to string")
            },

            Self::InvalidPostfixTarget { .. } => write!(f, "invalid postfix target"),

            Self::TypeMismatch { details, .. } => write!(f, "{details}"),

            Self::ParseNumber { lexeme, target, .. } => {
                write!(f, "cannot parse \"{lexeme}\" as {target}")
            },

            Self::DivisionByZero { .. } => write!(f, "division by zero"),

            Self::Overflow { .. } => write!(f, "integer overflow"),

            Self::BreakOutsideLoop { .. } => write!(f, "too many break statements"),

            Self::ReturnOutsideFunction { .. } => write!(f, "return outside of a function"),
        }
    }
}

impl std::error::Error for RuntimeError {}
