use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionDecl, LiteralValue, Stmt},
    error::SyntaxError,
    interpreter::{
        lexer::TokenKind,
        parser::core::{Derailed, ParseResult, Parser},
    },
};

impl Parser {
    /// Parses one statement, recovering to the next line on error.
    ///
    /// `None` means the statement failed to parse; its diagnostic is
    /// already recorded and the parser has resynchronised.
    pub(crate) fn statement(&mut self) -> Option<Stmt> {
        self.declaration()
    }

    /// Dispatches on the leading keyword.
    ///
    /// Grammar: `declaration := import | func | void | var | arr | nonDecl`
    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.match_kind(&TokenKind::Import) {
            self.import_declaration()
        } else if self.match_kind(&TokenKind::Func) {
            self.function_declaration(true)
        } else if self.match_kind(&TokenKind::Void) {
            self.function_declaration(false)
        } else if self.match_kind(&TokenKind::Var) {
            self.variable_declaration()
        } else if self.match_kind(&TokenKind::Arr) {
            self.array_declaration()
        } else {
            return self.not_declaration();
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(Derailed) => {
                self.rerail();
                None
            },
        }
    }

    /// The nesting statements: anything legal as a branch or loop body.
    fn not_declaration(&mut self) -> Option<Stmt> {
        let result = if self.match_kind(&TokenKind::LBrace) {
            self.block().map(Stmt::Block)
        } else if self.match_kind(&TokenKind::If) {
            self.if_statement()
        } else if self.match_kind(&TokenKind::While) {
            self.while_statement()
        } else if self.match_kind(&TokenKind::For) {
            self.for_statement()
        } else if self.match_kind(&TokenKind::Switch) {
            self.switch_statement()
        } else if self.match_kind(&TokenKind::Return) {
            self.return_statement()
        } else if self.match_kind(&TokenKind::Break) {
            self.break_statement()
        } else {
            self.expr_statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(Derailed) => {
                self.rerail();
                None
            },
        }
    }

    /// A nested statement position that must produce a node even after an
    /// error. The recovered statement's diagnostic is already recorded and
    /// the program will never run, so an empty block stands in.
    fn nested_statement(&mut self) -> Stmt {
        self.statement().unwrap_or(Stmt::Block(Vec::new()))
    }

    /// Grammar: `block := "{" statement* "}"`, opening brace consumed.
    pub(crate) fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while self.lookahead().kind != TokenKind::RBrace && !self.at_end() {
            if let Some(stmt) = self.statement() {
                statements.push(stmt);
            }
        }

        self.expect(&TokenKind::RBrace, "expect '}' after block")?;
        Ok(statements)
    }

    /// Grammar: `import := "import" IDENT ("," IDENT)* ";"`
    fn import_declaration(&mut self) -> ParseResult<Stmt> {
        let mut imports = Vec::new();

        loop {
            imports.push(self.expect_identifier("expect import name")?);
            if !self.match_kind(&TokenKind::Comma) {
                break;
            }
        }

        self.expect(&TokenKind::Semicolon, "expect ';' after import statement")?;
        Ok(Stmt::Import(imports))
    }

    /// Grammar: `funcDecl := IDENT "(" params? ")" block` with at most 63
    /// parameters. `returns` distinguishes `func` from `void`.
    fn function_declaration(&mut self, returns: bool) -> ParseResult<Stmt> {
        let name = self.expect_identifier("expect function name")?;
        self.expect(&TokenKind::LParen, "expect '(' after function name")?;

        let mut params = Vec::new();
        if self.lookahead().kind != TokenKind::RParen {
            loop {
                if params.len() > 63 {
                    let token = self.lookahead().clone();
                    self.report(SyntaxError::TooManyParameters { line: token.line,
                                                                 file: token.file.to_string(), });
                }
                params.push(self.expect_identifier("expect parameter name")?);
                if !self.match_kind(&TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(&TokenKind::RParen, "expect ')' after parameters")?;
        self.expect(&TokenKind::LBrace, "expect '{' before function body")?;
        let body = self.block()?;

        Ok(Stmt::Function(Rc::new(FunctionDecl { name,
                                                 params,
                                                 body,
                                                 returns })))
    }

    /// Grammar: `varDecl := IDENT ("=" expression)? ";"`
    fn variable_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.expect_identifier("expect variable name")?;

        let initializer = if self.match_operator(&["="]) {
            Some(self.expression()?)
        } else {
            None
        };

        self.expect(&TokenKind::Semicolon, "expect ';' after variable declaration")?;
        Ok(Stmt::VarDecl { name, initializer })
    }

    /// Grammar: `arrDecl := IDENT ("=" "{" elements? "}")? ";"`
    fn array_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.expect_identifier("expect array name")?;

        let mut initializers = Vec::new();
        if self.match_operator(&["="]) {
            self.expect(&TokenKind::LBrace, "expect '{' to begin array literal")?;
            if self.lookahead().kind != TokenKind::RBrace {
                loop {
                    initializers.push(self.expression()?);
                    if !self.match_kind(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            self.expect(&TokenKind::RBrace, "expect '}' after elements")?;
        }

        self.expect(&TokenKind::Semicolon, "expect ';' after array declaration")?;
        Ok(Stmt::ArrayDecl { name, initializers })
    }

    /// Grammar: `return := "return" expression? ";"`
    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.current().clone();

        let value = if self.lookahead().kind == TokenKind::Semicolon {
            None
        } else {
            Some(self.expression()?)
        };

        self.expect(&TokenKind::Semicolon, "expect ';' after return value")?;
        Ok(Stmt::Return { keyword, value })
    }

    /// Grammar: `break := "break" expression? ";"`. The optional value is
    /// how many nested loops or switches to exit.
    fn break_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.current().clone();

        let value = if self.lookahead().kind == TokenKind::Semicolon {
            None
        } else {
            Some(self.expression()?)
        };

        self.expect(&TokenKind::Semicolon, "expect ';' after break value")?;
        Ok(Stmt::Break { keyword, value })
    }

    /// Grammar: `if := "(" expression ")" statement ("else" statement)?`
    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(&TokenKind::LParen, "expect '(' after 'if'")?;
        let condition = self.expression()?;
        self.expect(&TokenKind::RParen, "expect ')' after condition")?;

        let then_branch = Box::new(self.nested_statement());
        let else_branch = if self.match_kind(&TokenKind::Else) {
            Some(Box::new(self.nested_statement()))
        } else {
            None
        };

        Ok(Stmt::If { condition,
                      then_branch,
                      else_branch })
    }

    /// Grammar: `while := "(" expression ")" statement`
    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(&TokenKind::LParen, "expect '(' after 'while'")?;
        let condition = self.expression()?;
        self.expect(&TokenKind::RParen, "expect ')' after condition")?;

        let body = Box::new(self.nested_statement());
        Ok(Stmt::While { condition, body })
    }

    /// Grammar: `for := "(" (varDecl | exprStmt | ";") expression? ";"
    /// expression? ")" statement`, desugared at parse time into
    ///
    /// ```text
    /// { init; while (cond) { body; inc; } }
    /// ```
    ///
    /// with the condition defaulting to `true` when omitted.
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(&TokenKind::LParen, "expect '(' after 'for'")?;

        let initializer = if self.match_kind(&TokenKind::Semicolon) {
            None
        } else if self.match_kind(&TokenKind::Var) {
            Some(self.variable_declaration()?)
        } else {
            Some(self.expr_statement()?)
        };

        let condition = if self.match_kind(&TokenKind::Semicolon) {
            None
        } else {
            let condition = self.expression()?;
            self.expect(&TokenKind::Semicolon, "expect ';' after loop condition")?;
            Some(condition)
        };

        let increment = if self.match_kind(&TokenKind::RParen) {
            None
        } else {
            let increment = self.expression()?;
            self.expect(&TokenKind::RParen, "expect ')' after for clause")?;
            Some(increment)
        };

        let mut body = self.nested_statement();

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expr(increment)]);
        }
        let condition = condition.unwrap_or(Expr::Literal { value: LiteralValue::Bool(true) });
        body = Stmt::While { condition,
                             body: Box::new(body) };
        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    /// Grammar: `switch := "(" expression ")" "{" ("case" expression ":"
    /// statement)* ("default" ":" statement)? "}"`
    fn switch_statement(&mut self) -> ParseResult<Stmt> {
        self.expect(&TokenKind::LParen, "expect '(' after 'switch'")?;
        let switcher = self.expression()?;
        self.expect(&TokenKind::RParen, "expect ')' after switched value")?;
        self.expect(&TokenKind::LBrace, "expect '{' after switch header")?;

        let mut switchees = Vec::new();
        let mut cases = Vec::new();
        while self.match_kind(&TokenKind::Case) {
            switchees.push(self.expression()?);
            self.expect(&TokenKind::Colon, "expect ':' after 'case'")?;
            cases.push(self.nested_statement());
        }

        let default = if self.match_kind(&TokenKind::Default) {
            self.expect(&TokenKind::Colon, "expect ':' after 'default'")?;
            Some(Box::new(self.nested_statement()))
        } else {
            None
        };

        self.expect(&TokenKind::RBrace, "expect '}' after switch body")?;
        Ok(Stmt::Switch { switcher,
                          switchees,
                          cases,
                          default })
    }

    /// Grammar: `exprStmt := expression ";"`
    fn expr_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.expect(&TokenKind::Semicolon, "expect ';' after expression statement")?;
        Ok(Stmt::Expr(expr))
    }
}
