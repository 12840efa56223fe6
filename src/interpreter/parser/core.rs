use crate::{
    ast::{NodeId, NodeIds, Stmt},
    error::SyntaxError,
    interpreter::lexer::{Token, TokenKind},
};

/// Marker for a statement that failed to parse.
///
/// The diagnostic has already been recorded by the time one of these is
/// returned; the value only unwinds the grammar rules back to the nearest
/// statement boundary, where [`Parser::rerail`] resynchronises.
#[derive(Debug)]
pub(crate) struct Derailed;

/// Result type used by the grammar rules.
pub(crate) type ParseResult<T> = Result<T, Derailed>;

/// Recursive-descent parser over a token buffer.
///
/// The parser owns the whole token sequence (terminated by
/// [`TokenKind::Eof`]) and keeps one cursor: `tokens[cursor]` is the
/// lookahead and `tokens[cursor - 1]` the most recently consumed token.
/// Syntax errors never abort the parse; they are collected and the parser
/// skips to the next source line.
pub struct Parser {
    tokens:      Vec<Token>,
    cursor:      usize,
    diagnostics: Vec<SyntaxError>,
    ids:         NodeIds,
}

impl Parser {
    /// Creates a parser over `tokens`, drawing node ids from `ids`.
    ///
    /// The token buffer must end with [`TokenKind::Eof`], which
    /// [`tokenize`](crate::interpreter::lexer::tokenize) guarantees.
    #[must_use]
    pub fn new(tokens: Vec<Token>, ids: NodeIds) -> Self {
        Self { tokens,
               cursor: 0,
               diagnostics: Vec::new(),
               ids }
    }

    /// Parses the whole buffer into a statement list.
    ///
    /// Returns the statements that parsed together with every diagnostic
    /// that was recorded. The driver must refuse to execute when the
    /// diagnostic list is non-empty.
    #[must_use]
    pub fn parse(mut self) -> (Vec<Stmt>, Vec<SyntaxError>) {
        let mut statements = Vec::new();

        while !self.at_end() {
            if let Some(stmt) = self.statement() {
                statements.push(stmt);
            }
        }

        (statements, self.diagnostics)
    }

    ////////////////////////// Cursor machinery //////////////////////////

    /// The token the parser is about to consume.
    pub(crate) fn lookahead(&self) -> &Token {
        &self.tokens[self.cursor]
    }

    /// The token most recently consumed. Only called after at least one
    /// `advance`, which every grammar rule guarantees.
    pub(crate) fn current(&self) -> &Token {
        &self.tokens[self.cursor - 1]
    }

    pub(crate) fn at_end(&self) -> bool {
        self.lookahead().kind == TokenKind::Eof
    }

    /// Consumes the lookahead token. Saturates at the end of the buffer so
    /// the final `Eof` is never stepped over.
    pub(crate) fn advance(&mut self) {
        if !self.at_end() {
            self.cursor += 1;
        }
    }

    /// Consumes the lookahead and reports whether it had the given kind.
    /// Payload-carrying kinds go through [`Self::match_operator`] or
    /// [`Self::expect_identifier`] instead.
    pub(crate) fn match_kind(&mut self, kind: &TokenKind) -> bool {
        if self.at_end() {
            return false;
        }
        if self.lookahead().kind == *kind {
            self.advance();
            return true;
        }
        false
    }

    /// Consumes the lookahead if it is an operator token whose lexeme is
    /// one of `lexemes`. Compound operators are whole lexemes here, so
    /// `"+"` does not match a `+=` token.
    pub(crate) fn match_operator(&mut self, lexemes: &[&str]) -> bool {
        if let TokenKind::Operator(op) = &self.lookahead().kind
            && lexemes.contains(&op.as_str())
        {
            self.advance();
            return true;
        }
        false
    }

    /// Consumes a token of the given kind or records `message` and
    /// derails.
    pub(crate) fn expect(&mut self, kind: &TokenKind, message: &str) -> ParseResult<Token> {
        if self.match_kind(kind) {
            return Ok(self.current().clone());
        }
        Err(self.error(message))
    }

    /// Consumes an identifier token or records `message` and derails.
    pub(crate) fn expect_identifier(&mut self, message: &str) -> ParseResult<Token> {
        if matches!(self.lookahead().kind, TokenKind::Identifier(_)) {
            self.advance();
            return Ok(self.current().clone());
        }
        Err(self.error(message))
    }

    /// A fresh node id for a resolvable expression.
    pub(crate) fn node_id(&self) -> NodeId {
        self.ids.next()
    }

    ////////////////////////// Diagnostics //////////////////////////

    /// Records an expectation failure at the lookahead token and returns
    /// the derail marker for the caller to propagate.
    pub(crate) fn error(&mut self, message: &str) -> Derailed {
        let token = self.lookahead();
        let diagnostic = SyntaxError::Expected { message: message.to_string(),
                                                 line:    token.line,
                                                 file:    token.file.to_string(), };
        self.report(diagnostic);
        Derailed
    }

    /// Records a diagnostic without derailing. Used where the original
    /// grammar keeps parsing after the complaint, such as over-long
    /// parameter lists.
    pub(crate) fn report(&mut self, diagnostic: SyntaxError) {
        self.diagnostics.push(diagnostic);
    }

    /// Skips tokens until the line number changes, then resumes normal
    /// parsing. Scanning token-by-token means a second construct on the
    /// error's own line is skipped too; the next line always parses.
    pub(crate) fn rerail(&mut self) {
        while !self.at_end() {
            self.advance();
            if self.lookahead().line != self.current().line {
                return;
            }
        }
    }
}
