use std::rc::Rc;

use logos::Logos;

use crate::error::SyntaxError;

/// The classification of a single token.
///
/// Operators are deliberately loose here: the lexer collects the maximal
/// run of operator characters into one [`TokenKind::Operator`] and the
/// parser decides which compound operator (`+=`, `<<=`, `>>>`, ...) the
/// lexeme spells.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexError)]
pub enum TokenKind {
    /// An integer literal such as `42`. The pattern swallows trailing
    /// letters, so a run like `123abc` is a malformed-number error rather
    /// than a number followed by an identifier.
    #[regex(r"[0-9][0-9a-zA-Z]*", lex_int)]
    Int(i64),
    /// A floating-point literal such as `3.14` (a digit-leading run that
    /// contains a dot).
    #[regex(r"[0-9][0-9a-zA-Z.]*\.[0-9a-zA-Z.]*", lex_dbl)]
    Dbl(f64),
    /// A string literal. No escape sequences are recognised in this
    /// dialect; the payload is exactly the text between the quotes.
    /// A char literal `'c.` also lands here as a one-character string.
    #[regex(r#""[^"]*""#, lex_string)]
    #[regex(r"'..", lex_char)]
    Str(String),
    /// `import`
    #[token("import")]
    Import,
    /// `switch`
    #[token("switch")]
    Switch,
    /// `case`
    #[token("case")]
    Case,
    /// `default`
    #[token("default")]
    Default,
    /// `break`
    #[token("break")]
    Break,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `do`
    #[token("do")]
    Do,
    /// `while`
    #[token("while")]
    While,
    /// `for`
    #[token("for")]
    For,
    /// `continue`
    #[token("continue")]
    Continue,
    /// `return`
    #[token("return")]
    Return,
    /// `func`
    #[token("func")]
    Func,
    /// `void`
    #[token("void")]
    Void,
    /// `var`
    #[token("var")]
    Var,
    /// `arr`
    #[token("arr")]
    Arr,
    /// `true`
    #[token("true")]
    True,
    /// `false`
    #[token("false")]
    False,
    /// `null`
    #[token("null")]
    Null,
    /// A name: a letter followed by letters and digits.
    #[regex(r"[a-zA-Z][a-zA-Z0-9]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// The maximal run of operator characters, kept as its lexeme.
    #[regex(r"[=+\-*/%&|^<>?!]+", |lex| lex.slice().to_string())]
    Operator(String),
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `.`
    #[token(".")]
    Period,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `:`
    #[token(":")]
    Colon,

    /// Newlines advance the line counter and produce nothing.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    Newline,
    /// Blanks and tabs.
    #[regex(r"[ \t\r\x0c]+", logos::skip)]
    Ignored,

    /// End of input. Appended by [`tokenize`] after the last real token;
    /// the NUL pattern never fires on text read from a source file.
    #[token("\0")]
    Eof,
}

/// State carried by the lexer across tokens: the current line number,
/// starting at 1.
pub struct LexerExtras {
    /// The line the cursor is on.
    pub line: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line: 1 }
    }
}

/// Why a stretch of input failed to lex.
///
/// Unknown characters are dropped without a diagnostic (the lexer is
/// fail-soft and leaves structural complaints to the parser); malformed
/// numbers are reported, since silently splitting them would change the
/// meaning of the program.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LexError {
    /// A character that starts no token.
    #[default]
    UnknownCharacter,
    /// A digit-leading run that parses as neither integer nor double.
    MalformedNumber,
}

/// A token together with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The classification and payload.
    pub kind: TokenKind,
    /// The line the token was found on.
    pub line: usize,
    /// The label of the file the token came from.
    pub file: Rc<str>,
}

impl Token {
    /// The identifier payload.
    ///
    /// Only reachable for tokens the parser already classified as
    /// identifiers.
    #[must_use]
    pub fn identifier(&self) -> &str {
        match &self.kind {
            TokenKind::Identifier(name) => name,
            _ => unreachable!("token is not an identifier"),
        }
    }

    /// The operator lexeme payload.
    ///
    /// Only reachable for tokens the parser already classified as
    /// operators.
    #[must_use]
    pub fn operator(&self) -> &str {
        match &self.kind {
            TokenKind::Operator(lexeme) => lexeme,
            _ => unreachable!("token is not an operator"),
        }
    }
}

/// Scans `source` into tokens, terminated by a single [`TokenKind::Eof`].
///
/// Unknown characters are dropped; malformed numbers become diagnostics.
/// The scan itself never fails, so the parser always receives a usable
/// stream.
///
/// # Example
/// ```
/// use std::rc::Rc;
///
/// use cflat::interpreter::lexer::{TokenKind, tokenize};
///
/// let file: Rc<str> = Rc::from("demo.cflat");
/// let (tokens, diagnostics) = tokenize("var x = 1;", &file);
///
/// assert!(diagnostics.is_empty());
/// assert_eq!(tokens.len(), 6); // var, x, =, 1, ; and Eof
/// assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
/// ```
#[must_use]
pub fn tokenize(source: &str, file: &Rc<str>) -> (Vec<Token>, Vec<SyntaxError>) {
    let mut tokens = Vec::new();
    let mut diagnostics = Vec::new();
    let mut lexer = TokenKind::lexer(source);

    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => tokens.push(Token { kind,
                                            line: lexer.extras.line,
                                            file: Rc::clone(file) }),
            Err(LexError::MalformedNumber) => {
                diagnostics.push(SyntaxError::MalformedNumber { lexeme: lexer.slice()
                                                                            .to_string(),
                                                                line:   lexer.extras.line,
                                                                file:   file.to_string(), });
            },
            Err(LexError::UnknownCharacter) => {},
        }
    }

    tokens.push(Token { kind: TokenKind::Eof,
                        line: lexer.extras.line,
                        file: Rc::clone(file) });

    (tokens, diagnostics)
}

/// Strips the quotes off a string literal and counts the newlines it
/// spans, keeping later line numbers accurate.
fn lex_string(lex: &mut logos::Lexer<'_, TokenKind>) -> String {
    let literal = lex.slice().to_string();
    lex.extras.line += literal.chars().filter(|&c| c == '\n').count();
    literal[1..literal.len() - 1].to_string()
}

/// Keeps the character of a `'c.` char literal as a one-character string.
fn lex_char(lex: &logos::Lexer<'_, TokenKind>) -> String {
    lex.slice().chars().nth(1).map(String::from).unwrap_or_default()
}

fn lex_int(lex: &logos::Lexer<'_, TokenKind>) -> Result<i64, LexError> {
    lex.slice().parse().map_err(|_| LexError::MalformedNumber)
}

fn lex_dbl(lex: &logos::Lexer<'_, TokenKind>) -> Result<f64, LexError> {
    lex.slice().parse().map_err(|_| LexError::MalformedNumber)
}
