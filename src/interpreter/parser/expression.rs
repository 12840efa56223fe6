use crate::{
    ast::{Expr, LiteralValue},
    error::SyntaxError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::{Derailed, ParseResult, Parser},
    },
};

/// The compound assignment spellings the parser rewrites into
/// `target = target ⊙ value`.
const COMPOUND_ASSIGNMENTS: &[&str] =
    &["+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=", ">>>="];

impl Parser {
    /// Entry into the expression grammar; precedence starts at
    /// assignment.
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    /// Grammar: `assignment := (variable | index) ("=" | "⊙=") assignment
    /// | ternary`, right-associative.
    ///
    /// Compound forms on a variable synthesise a `Binary` node so that
    /// `x += y` is stored as `x = x + y`. On an indexed target only `=`
    /// and `+=` exist (replace and insert); other compounds and slice
    /// targets are syntax errors.
    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.ternary()?;

        let TokenKind::Operator(lexeme) = &self.lookahead().kind else {
            return Ok(expr);
        };
        let operator = lexeme.clone();
        if operator != "=" && !COMPOUND_ASSIGNMENTS.contains(&operator.as_str()) {
            return Ok(expr);
        }

        let op_token = self.lookahead().clone();
        self.advance();
        let value = self.assignment()?;

        match expr {
            Expr::Variable { id, name } => {
                let value = if operator == "=" {
                    value
                } else {
                    let stripped =
                        Token { kind: TokenKind::Operator(operator.trim_end_matches('=')
                                                                  .to_string()),
                                line: op_token.line,
                                file: op_token.file.clone(), };
                    Expr::Binary { left:  Box::new(Expr::Variable { id, name: name.clone() }),
                                   op:    stripped,
                                   right: Box::new(value), }
                };

                Ok(Expr::Assignment { id:    self.node_id(),
                                      name,
                                      value: Box::new(value), })
            },

            Expr::Index { name, array, start, colon, .. } => {
                if let Some(colon) = colon {
                    self.report(SyntaxError::MultipleAssignment { line: colon.line,
                                                                  file: colon.file.to_string(), });
                    return Err(Derailed);
                }
                if operator != "=" && operator != "+=" {
                    self.report(SyntaxError::CompoundIndexAssignment {
                        operator,
                        line: op_token.line,
                        file: op_token.file.to_string(),
                    });
                    return Err(Derailed);
                }
                let Some(index) = start else {
                    return Err(self.error("expect index expression"));
                };

                Ok(Expr::AssignAt { id: self.node_id(),
                                    name,
                                    array,
                                    op: operator,
                                    index,
                                    value: Box::new(value) })
            },

            _ => {
                self.report(SyntaxError::InvalidAssignmentTarget {
                    line: op_token.line,
                    file: op_token.file.to_string(),
                });
                Err(Derailed)
            },
        }
    }

    /// Grammar: `ternary := logicalOR ("?" ternary ":" ternary)?`,
    /// right-associative.
    fn ternary(&mut self) -> ParseResult<Expr> {
        let mut expr = self.logical_or()?;

        if self.match_operator(&["?"]) {
            let middle = self.ternary()?;
            self.expect(&TokenKind::Colon, "expect ':' in ternary expression")?;
            let right = self.ternary()?;
            expr = Expr::Ternary { condition: Box::new(expr),
                                   middle:    Box::new(middle),
                                   right:     Box::new(right), };
        }

        Ok(expr)
    }

    /// Grammar: `logicalOR := logicalAND ("||" logicalAND)*`
    fn logical_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.logical_and()?;

        while self.match_operator(&["||"]) {
            let op = self.current().clone();
            let right = self.logical_and()?;
            expr = Expr::Binary { left:  Box::new(expr),
                                  op,
                                  right: Box::new(right), };
        }

        Ok(expr)
    }

    /// Grammar: `logicalAND := bitwiseOR ("&&" bitwiseOR)*`
    fn logical_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.bitwise_or()?;

        while self.match_operator(&["&&"]) {
            let op = self.current().clone();
            let right = self.bitwise_or()?;
            expr = Expr::Binary { left:  Box::new(expr),
                                  op,
                                  right: Box::new(right), };
        }

        Ok(expr)
    }

    /// Grammar: `bitwiseOR := bitwiseXOR ("|" bitwiseXOR)*`
    fn bitwise_or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.bitwise_xor()?;

        while self.match_operator(&["|"]) {
            let op = self.current().clone();
            let right = self.bitwise_xor()?;
            expr = Expr::Binary { left:  Box::new(expr),
                                  op,
                                  right: Box::new(right), };
        }

        Ok(expr)
    }

    /// Grammar: `bitwiseXOR := bitwiseAND ("^" bitwiseAND)*`
    fn bitwise_xor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.bitwise_and()?;

        while self.match_operator(&["^"]) {
            let op = self.current().clone();
            let right = self.bitwise_and()?;
            expr = Expr::Binary { left:  Box::new(expr),
                                  op,
                                  right: Box::new(right), };
        }

        Ok(expr)
    }

    /// Grammar: `bitwiseAND := equality ("&" equality)*`
    fn bitwise_and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while self.match_operator(&["&"]) {
            let op = self.current().clone();
            let right = self.equality()?;
            expr = Expr::Binary { left:  Box::new(expr),
                                  op,
                                  right: Box::new(right), };
        }

        Ok(expr)
    }

    /// Grammar: `equality := relational (("==" | "!=") relational)*`
    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.relational()?;

        while self.match_operator(&["==", "!="]) {
            let op = self.current().clone();
            let right = self.relational()?;
            expr = Expr::Binary { left:  Box::new(expr),
                                  op,
                                  right: Box::new(right), };
        }

        Ok(expr)
    }

    /// Grammar: `relational := bitshift (("<" | ">" | "<=" | ">=")
    /// bitshift)*`
    fn relational(&mut self) -> ParseResult<Expr> {
        let mut expr = self.bitshift()?;

        while self.match_operator(&["<", ">", "<=", ">="]) {
            let op = self.current().clone();
            let right = self.bitshift()?;
            expr = Expr::Binary { left:  Box::new(expr),
                                  op,
                                  right: Box::new(right), };
        }

        Ok(expr)
    }

    /// Grammar: `bitshift := term (("<<" | ">>" | ">>>") term)*`
    fn bitshift(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while self.match_operator(&["<<", ">>", ">>>"]) {
            let op = self.current().clone();
            let right = self.term()?;
            expr = Expr::Binary { left:  Box::new(expr),
                                  op,
                                  right: Box::new(right), };
        }

        Ok(expr)
    }

    /// Grammar: `term := factor (("+" | "-") factor)*`
    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while self.match_operator(&["+", "-"]) {
            let op = self.current().clone();
            let right = self.factor()?;
            expr = Expr::Binary { left:  Box::new(expr),
                                  op,
                                  right: Box::new(right), };
        }

        Ok(expr)
    }

    /// Grammar: `factor := unary (("*" | "/" | "%") unary)*`
    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while self.match_operator(&["*", "/", "%"]) {
            let op = self.current().clone();
            let right = self.unary()?;
            expr = Expr::Binary { left:  Box::new(expr),
                                  op,
                                  right: Box::new(right), };
        }

        Ok(expr)
    }

    /// Grammar: `unary := ("+" | "-" | "!" | "~") unary | postfix`
    fn unary(&mut self) -> ParseResult<Expr> {
        if self.match_operator(&["+", "-", "!", "~"]) {
            let op = self.current().clone();
            let expr = self.unary()?;
            return Ok(Expr::Unary { op,
                                    expr: Box::new(expr) });
        }

        self.postfix()
    }

    /// Grammar: `postfix := call ("++" | "--")*`
    fn postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.call()?;

        while self.match_operator(&["++", "--"]) {
            let op = self.current().clone();
            expr = Expr::Postfix { expr: Box::new(expr),
                                   op };
        }

        Ok(expr)
    }

    /// Grammar: `call := primary ("(" args? ")")?` with at most 63
    /// arguments. The callee must be a bare identifier.
    fn call(&mut self) -> ParseResult<Expr> {
        let expr = self.primary()?;

        if self.match_kind(&TokenKind::LParen) {
            let mut args = Vec::new();

            if self.lookahead().kind != TokenKind::RParen {
                loop {
                    if args.len() > 63 {
                        let token = self.lookahead().clone();
                        self.report(SyntaxError::TooManyArguments { line: token.line,
                                                                    file: token.file
                                                                               .to_string(), });
                    }
                    args.push(self.expression()?);
                    if !self.match_kind(&TokenKind::Comma) {
                        break;
                    }
                }
            }

            let paren = self.expect(&TokenKind::RParen, "expect ')' after arguments")?;
            return match expr {
                Expr::Variable { name, .. } => Ok(Expr::Call { callee: name,
                                                               paren,
                                                               args }),
                _ => {
                    self.report(SyntaxError::CallTarget { line: paren.line,
                                                          file: paren.file.to_string(), });
                    Err(Derailed)
                },
            };
        }

        Ok(expr)
    }

    /// Grammar: `primary := LITERAL | "true" | "false" | "null" | variable
    /// | "(" type ")" unary | "(" expression ")"`
    ///
    /// The cast form is decided with one lookahead past `(`: an identifier
    /// spelling a type name is always taken as a cast, so a variable
    /// actually named `int` cannot be parenthesised.
    fn primary(&mut self) -> ParseResult<Expr> {
        let kind = self.lookahead().kind.clone();

        match kind {
            TokenKind::Null => {
                self.advance();
                Ok(Expr::Literal { value: LiteralValue::Null })
            },
            TokenKind::True => {
                self.advance();
                Ok(Expr::Literal { value: LiteralValue::Bool(true) })
            },
            TokenKind::False => {
                self.advance();
                Ok(Expr::Literal { value: LiteralValue::Bool(false) })
            },
            TokenKind::Int(value) => {
                self.advance();
                Ok(Expr::Literal { value: LiteralValue::Int(value) })
            },
            TokenKind::Dbl(value) => {
                self.advance();
                Ok(Expr::Literal { value: LiteralValue::Dbl(value) })
            },
            TokenKind::Str(value) => {
                self.advance();
                Ok(Expr::Literal { value: LiteralValue::Str(value) })
            },
            TokenKind::Identifier(_) => {
                self.advance();
                self.variable()
            },
            TokenKind::LParen => {
                self.advance();

                if let TokenKind::Identifier(name) = &self.lookahead().kind
                    && matches!(name.as_str(), "bln" | "int" | "flt" | "str")
                {
                    let ty = self.lookahead().clone();
                    self.advance();
                    self.expect(&TokenKind::RParen, "expect ')' after type cast")?;
                    let expr = self.unary()?;
                    return Ok(Expr::TypeCast { ty,
                                               expr: Box::new(expr) });
                }

                let expr = self.expression()?;
                self.expect(&TokenKind::RParen, "expect ')' after expr")?;
                Ok(Expr::Grouping { expr: Box::new(expr) })
            },
            _ => Err(self.error("expect expr")),
        }
    }

    /// Grammar: `variable := IDENTIFIER ("[" expression? (":"?
    /// expression?)? "]")*`
    ///
    /// Index suffixes chain, so `a[1:][0]` indexes into the slice. The
    /// identifier token was consumed by the caller.
    fn variable(&mut self) -> ParseResult<Expr> {
        let name = self.current().clone();
        let mut expr = Expr::Variable { id:   self.node_id(),
                                        name: name.clone(), };

        while self.match_kind(&TokenKind::LBracket) {
            let bracket = self.current().clone();
            let mut start = None;
            let mut colon = None;
            let mut end = None;

            if self.lookahead().kind != TokenKind::Colon {
                start = Some(Box::new(self.expression()?));
            }
            if self.lookahead().kind != TokenKind::RBracket {
                self.expect(&TokenKind::Colon, "expect ':' in sliced index")?;
                colon = Some(self.current().clone());
            }
            if self.lookahead().kind != TokenKind::RBracket {
                end = Some(Box::new(self.expression()?));
            }
            self.expect(&TokenKind::RBracket, "expect ']' after index expression")?;

            expr = Expr::Index { name: name.clone(),
                                 array: Box::new(expr),
                                 bracket,
                                 start,
                                 colon,
                                 end };
        }

        Ok(expr)
    }
}
