use crate::{
    ast::{Expr, Stmt},
    interpreter::{
        evaluator::{
            cast::truthiness,
            core::{Context, EvalResult},
        },
        lexer::Token,
        value::Value,
    },
};

/// How a statement finished.
///
/// `Return` and `Break` are the unwinding signals of the language,
/// threaded up through enclosing statements instead of thrown: a call
/// frame consumes `Return`, each `while` and `switch` consumes one level
/// of `Break`. The keyword tokens ride along so a signal that escapes
/// every matching frame can be reported at its source.
#[derive(Debug)]
pub enum Flow {
    /// The statement ran to completion.
    Normal,
    /// A `return` is unwinding toward the nearest call frame.
    Return {
        /// The value being returned; `null` for a bare `return;`.
        value:   Value,
        /// The `return` keyword token.
        keyword: Token,
    },
    /// A `break` is unwinding out of `count` loops or switches.
    Break {
        /// Remaining frames to exit.
        count:   i64,
        /// The `break` keyword token.
        keyword: Token,
    },
}

impl Context {
    /// Executes one statement.
    pub fn exec(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match stmt {
            Stmt::Expr(expr) => self.exec_expr_statement(expr),

            Stmt::VarDecl { name, initializer } => {
                let value = match initializer {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Null,
                };
                self.define(name, value)?;
                Ok(Flow::Normal)
            },

            Stmt::ArrayDecl { name, initializers } => {
                let mut elements = Vec::with_capacity(initializers.len());
                for initializer in initializers {
                    elements.push(self.eval(initializer)?);
                }
                self.define(name, Value::list(elements))?;
                Ok(Flow::Normal)
            },

            Stmt::Block(stmts) => self.exec_block(stmts),

            Stmt::If { condition,
                       then_branch,
                       else_branch, } => {
                if truthiness(&self.eval(condition)?) {
                    self.exec(then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec(else_branch)
                } else {
                    Ok(Flow::Normal)
                }
            },

            Stmt::While { condition, body } => self.exec_while(condition, body),

            Stmt::Switch { switcher,
                           switchees,
                           cases,
                           default, } => self.exec_switch(switcher, switchees, cases, default.as_deref()),

            Stmt::Return { keyword, value } => {
                let value = match value {
                    Some(expr) => self.eval(expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return { value,
                                  keyword: keyword.clone() })
            },

            Stmt::Break { keyword, value } => {
                let count = match value {
                    Some(expr) => {
                        let value = self.eval(expr)?;
                        crate::interpreter::evaluator::cast::to_integer(&value, keyword)?
                    },
                    None => 1,
                };
                Ok(Flow::Break { count,
                                 keyword: keyword.clone() })
            },

            // Hoisted into the function tables by the importer; nothing
            // is left to do at execution time.
            Stmt::Function(_) | Stmt::Import(_) => Ok(Flow::Normal),
        }
    }

    /// Runs statements in order, stopping at the first unwinding signal.
    pub(crate) fn exec_all(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        for stmt in stmts {
            match self.exec(stmt)? {
                Flow::Normal => {},
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// Runs a block inside a fresh scope. The scope pops on every exit
    /// path: completion, unwinding flow, or a runtime error.
    pub(crate) fn exec_block(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        self.push_scope();
        let flow = self.exec_all(stmts);
        self.pop_scope();
        flow
    }

    /// An expression statement. A call in this position prefers the void
    /// table and falls back to the value-returning one, whose result is
    /// discarded.
    fn exec_expr_statement(&mut self, expr: &Expr) -> EvalResult<Flow> {
        if let Expr::Call { callee, paren, args } = expr {
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(self.eval(arg)?);
            }

            let function = self.get_void(callee, values.len())?;
            self.call(&function, values, paren)?;
        } else {
            self.eval(expr)?;
        }

        Ok(Flow::Normal)
    }

    /// A `while` frame: consumes one level of any `Break` its body sends
    /// up, re-raising the remainder when the break wants out further.
    fn exec_while(&mut self, condition: &Expr, body: &Stmt) -> EvalResult<Flow> {
        while truthiness(&self.eval(condition)?) {
            match self.exec(body)? {
                Flow::Normal => {},
                flow @ Flow::Return { .. } => return Ok(flow),
                Flow::Break { count, keyword } => {
                    if count > 1 {
                        return Ok(Flow::Break { count: count - 1,
                                                keyword });
                    }
                    return Ok(Flow::Normal);
                },
            }
        }

        Ok(Flow::Normal)
    }

    /// A `switch` frame. The selector picks the first case it equals
    /// structurally; execution falls through the remaining cases and the
    /// default until a `break` (which this frame consumes one level of)
    /// or the end. With no matching case only the default runs.
    fn exec_switch(&mut self,
                   switcher: &Expr,
                   switchees: &[Expr],
                   cases: &[Stmt],
                   default: Option<&Stmt>)
                   -> EvalResult<Flow> {
        let selector = self.eval(switcher)?;

        let mut first = switchees.len();
        for (index, switchee) in switchees.iter().enumerate() {
            if selector == self.eval(switchee)? {
                first = index;
                break;
            }
        }

        for stmt in cases[first..].iter().chain(default) {
            match self.exec(stmt)? {
                Flow::Normal => {},
                flow @ Flow::Return { .. } => return Ok(flow),
                Flow::Break { count, keyword } => {
                    if count > 1 {
                        return Ok(Flow::Break { count: count - 1,
                                                keyword });
                    }
                    return Ok(Flow::Normal);
                },
            }
        }

        Ok(Flow::Normal)
    }
}
