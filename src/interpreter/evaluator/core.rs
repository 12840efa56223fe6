use std::{
    collections::HashMap,
    io::{self, BufRead, BufReader, Write},
};

use crate::{
    ast::{Expr, NodeId},
    error::RuntimeError,
    interpreter::{evaluator::function::Callable, lexer::Token, value::Value},
};

/// Result type used by the evaluator. Runtime errors are fatal to the
/// program; control-flow unwinding travels separately, as
/// [`Flow`](crate::interpreter::evaluator::statement::Flow) values.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// The evaluation context: everything a running program can reach.
///
/// The scope stack holds one map per live scope with the global runtime
/// scope at index 0; the resolver side table addresses scopes by hops from
/// the top of this stack. The function tables are keyed `name + "#" +
/// arity` and filled by the importer before execution starts, read-only
/// afterwards.
///
/// Output and input go through injected handles so embedders and tests can
/// capture one and feed the other.
pub struct Context {
    /// Live scopes, innermost last. Index 0 is the global runtime scope
    /// and never pops.
    pub(crate) scope_stack: Vec<HashMap<String, Value>>,
    /// Value-returning functions by `name#arity`.
    pub(crate) functions:   HashMap<String, Callable>,
    /// Void functions by `name#arity`.
    pub(crate) voids:       HashMap<String, Callable>,
    /// The resolver side table: node id → scope hops.
    pub(crate) locals:      HashMap<NodeId, usize>,
    /// Where `print` and `println` write.
    pub(crate) out:         Box<dyn Write>,
    /// Where `input` reads.
    pub(crate) input:       Box<dyn BufRead>,
}

impl Context {
    /// Creates a context wired to the process stdout and stdin, with the
    /// native functions loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::with_io(Box::new(io::stdout()), Box::new(BufReader::new(io::stdin())))
    }

    /// Creates a context with caller-supplied I/O handles.
    #[must_use]
    pub fn with_io(out: Box<dyn Write>, input: Box<dyn BufRead>) -> Self {
        let mut context = Self { scope_stack: vec![HashMap::new()],
                                 functions: HashMap::new(),
                                 voids: HashMap::new(),
                                 locals: HashMap::new(),
                                 out,
                                 input };
        context.load_natives();
        context
    }

    /// Merges resolver output into the side table. Called once per
    /// executed source; ids never repeat across parses, so merging is
    /// collision-free.
    pub fn extend_locals(&mut self, locals: HashMap<NodeId, usize>) {
        self.locals.extend(locals);
    }

    /// Flushes pending output, e.g. after a program ends with a bare
    /// `print`.
    pub fn flush(&mut self) {
        let _ = self.out.flush();
    }

    ////////////////////////// Expression dispatch //////////////////////////

    /// Evaluates an expression to a value.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value } => Ok(Value::from(value)),

            Expr::Variable { id, name } => self.eval_variable(*id, name),

            Expr::Grouping { expr } => self.eval(expr),

            Expr::Unary { op, expr } => self.eval_unary(op, expr),

            Expr::Postfix { expr, op } => self.eval_postfix(expr, op),

            Expr::Binary { left, op, right } => self.eval_binary(left, op, right),

            Expr::Ternary { condition,
                            middle,
                            right, } => {
                if crate::interpreter::evaluator::cast::truthiness(&self.eval(condition)?) {
                    self.eval(middle)
                } else {
                    self.eval(right)
                }
            },

            Expr::TypeCast { ty, expr } => self.eval_type_cast(ty, expr),

            Expr::Index { array,
                          bracket,
                          start,
                          colon,
                          end,
                          .. } => self.eval_index(array,
                                                  bracket,
                                                  start.as_deref(),
                                                  colon.is_some(),
                                                  end.as_deref()),

            Expr::AssignAt { id,
                             name,
                             array,
                             op,
                             index,
                             value, } => self.eval_assign_at(*id, name, array, op, index, value),

            Expr::Call { callee, paren, args } => self.eval_call(callee, paren, args),

            Expr::Assignment { id, name, value } => self.eval_assignment(*id, name, value),
        }
    }

    /// Reads a variable through its resolved scope, or through the global
    /// runtime scope when the resolver left it unannotated.
    pub(crate) fn eval_variable(&self, id: NodeId, name: &Token) -> EvalResult<Value> {
        let scope = match self.locals.get(&id) {
            Some(depth) => {
                let index = self.scope_stack.len() - 1 - depth;
                &self.scope_stack[index]
            },
            None => &self.scope_stack[0],
        };

        scope.get(name.identifier())
             .cloned()
             .ok_or_else(|| RuntimeError::UnknownVariable { name: name.identifier().to_string(),
                                                            line: name.line,
                                                            file: name.file.to_string(), })
    }

    /// Writes a variable through its resolved scope or the global runtime
    /// scope. Global writes require the name to exist; resolved writes
    /// always land, since the resolver proved the declaration.
    pub(crate) fn assign_variable(&mut self,
                                  id: NodeId,
                                  name: &Token,
                                  value: Value)
                                  -> EvalResult<()> {
        if let Some(depth) = self.locals.get(&id) {
            let index = self.scope_stack.len() - 1 - depth;
            self.scope_stack[index].insert(name.identifier().to_string(), value);
            return Ok(());
        }

        let globals = &mut self.scope_stack[0];
        if globals.contains_key(name.identifier()) {
            globals.insert(name.identifier().to_string(), value);
            Ok(())
        } else {
            Err(RuntimeError::UnknownVariable { name: name.identifier().to_string(),
                                                line: name.line,
                                                file: name.file.to_string(), })
        }
    }

    fn eval_assignment(&mut self, id: NodeId, name: &Token, value: &Expr) -> EvalResult<Value> {
        let value = self.eval(value)?;
        self.assign_variable(id, name, value.clone())?;
        Ok(value)
    }

    /// `x++` and `x--`: read, write back the shifted value, produce the
    /// value from before the shift. Only a bare integer variable is a
    /// legal target.
    fn eval_postfix(&mut self, expr: &Expr, op: &Token) -> EvalResult<Value> {
        let Expr::Variable { id, name } = expr else {
            return Err(RuntimeError::InvalidPostfixTarget { line: op.line,
                                                            file: op.file.to_string(), });
        };

        let offset = if op.operator() == "++" { 1 } else { -1 };

        let value = self.eval_variable(*id, name)?;
        let Value::Int(before) = value else {
            return Err(RuntimeError::TypeMismatch {
                details: format!("postfix target must be an integer, not {}", value.type_name()),
                line: op.line,
                file: op.file.to_string(),
            });
        };

        let after = before.checked_add(offset)
                          .ok_or_else(|| RuntimeError::Overflow { line: op.line,
                                                                  file: op.file.to_string(), })?;
        self.assign_variable(*id, name, Value::Int(after))?;

        Ok(Value::Int(before))
    }

    ////////////////////////// Scopes //////////////////////////

    /// Opens a scope for a block or a call frame.
    pub(crate) fn push_scope(&mut self) {
        self.scope_stack.push(HashMap::new());
    }

    /// Closes the innermost scope. Callers pair this with
    /// [`Self::push_scope`] around the fallible body so every exit path
    /// releases the scope.
    pub(crate) fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    /// Declares a name in the innermost scope. Re-declaring a name in the
    /// scope that already holds it is an error; shadowing an outer scope
    /// is fine.
    pub(crate) fn define(&mut self, name: &Token, value: Value) -> EvalResult<()> {
        let scope = self.scope_stack
                        .last_mut()
                        .expect("the global scope never pops");

        if scope.contains_key(name.identifier()) {
            return Err(RuntimeError::CannotRedeclareVariable { name: name.identifier()
                                                                        .to_string(),
                                                               line: name.line,
                                                               file: name.file.to_string(), });
        }

        scope.insert(name.identifier().to_string(), value);
        Ok(())
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
