use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionDecl},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            native::NativeDef,
            statement::Flow,
        },
        lexer::Token,
        value::Value,
    },
};

/// Something the runtime can call: a native operation or a declared
/// function body. Declared bodies are shared with the AST through an
/// `Rc`, so one declaration serves every call.
#[derive(Clone)]
pub enum Callable {
    /// A built-in operation from the native table.
    Native(&'static NativeDef),
    /// A `func` or `void` declaration hoisted by the importer.
    Declared(Rc<FunctionDecl>),
}

impl Callable {
    /// The number of parameters this callable takes.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Native(def) => def.arity,
            Self::Declared(decl) => decl.params.len(),
        }
    }
}

impl Context {
    /// A call in expression position: only the value-returning table is
    /// searched, so calling a void function where a value is needed is an
    /// error even when the void table has a match.
    pub(crate) fn eval_call(&mut self,
                            callee: &Token,
                            paren: &Token,
                            args: &[Expr])
                            -> EvalResult<Value> {
        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval(arg)?);
        }

        let function = self.get_func(callee, values.len())?;
        self.call(&function, values, paren)
    }

    /// Invokes a callable with already-evaluated arguments. `site` is the
    /// call's closing-paren token, used by natives for their diagnostics.
    pub(crate) fn call(&mut self,
                       function: &Callable,
                       args: Vec<Value>,
                       site: &Token)
                       -> EvalResult<Value> {
        match function {
            Callable::Native(def) => (def.run)(self, &args, site),
            Callable::Declared(decl) => {
                let decl = Rc::clone(decl);
                self.call_declared(&decl, args)
            },
        }
    }

    /// Runs a declared function: one fresh scope for the parameters, the
    /// body directly inside it. A `Return` flow ends the call with its
    /// value; falling off the end yields `null`; a `Break` trying to
    /// unwind further than the function is an error.
    fn call_declared(&mut self, decl: &FunctionDecl, args: Vec<Value>) -> EvalResult<Value> {
        self.push_scope();
        let flow = self.run_body(decl, args);
        self.pop_scope();

        match flow? {
            Flow::Return { value, .. } => Ok(value),
            Flow::Normal => Ok(Value::Null),
            Flow::Break { keyword, .. } => {
                Err(RuntimeError::BreakOutsideLoop { line: keyword.line,
                                                     file: keyword.file.to_string(), })
            },
        }
    }

    fn run_body(&mut self, decl: &FunctionDecl, args: Vec<Value>) -> EvalResult<Flow> {
        for (param, value) in decl.params.iter().zip(args) {
            self.define(param, value)?;
        }
        self.exec_all(&decl.body)
    }

    ////////////////////////// Function tables //////////////////////////

    /// The table key for a function of the given arity.
    pub(crate) fn handle(name: &str, arity: usize) -> String {
        format!("{name}#{arity}")
    }

    /// Looks up a value-returning function.
    ///
    /// When nothing matches, nearby arities are probed from `arity + 2`
    /// down to zero and the first hit in either table becomes a
    /// did-you-mean hint on the error.
    pub(crate) fn get_func(&self, name: &Token, arity: usize) -> EvalResult<Callable> {
        let handle = Self::handle(name.identifier(), arity);

        if let Some(function) = self.functions.get(&handle) {
            return Ok(function.clone());
        }
        if self.voids.contains_key(&handle) {
            return Err(RuntimeError::VoidInExpression { name: name.identifier().to_string(),
                                                        line: name.line,
                                                        file: name.file.to_string(), });
        }

        let mut suggestion = None;
        for candidate in (0..=arity + 2).rev() {
            let probe = Self::handle(name.identifier(), candidate);
            if self.functions.contains_key(&probe) || self.voids.contains_key(&probe) {
                suggestion = Some(candidate);
                break;
            }
        }

        Err(RuntimeError::UnknownFunction { name: name.identifier().to_string(),
                                            arity,
                                            suggestion,
                                            line: name.line,
                                            file: name.file.to_string() })
    }

    /// Looks up a function for statement position: the void table first,
    /// then the value-returning table (whose result is discarded).
    pub(crate) fn get_void(&self, name: &Token, arity: usize) -> EvalResult<Callable> {
        let handle = Self::handle(name.identifier(), arity);

        if let Some(function) = self.voids.get(&handle) {
            return Ok(function.clone());
        }
        if let Some(function) = self.functions.get(&handle) {
            return Ok(function.clone());
        }

        Err(RuntimeError::UnknownVoidFunction { name: name.identifier().to_string(),
                                                line: name.line,
                                                file: name.file.to_string(), })
    }

    /// Registers a declared function under its `(name, arity)` key. The
    /// pair must be new to both tables.
    pub fn define_function(&mut self, decl: &Rc<FunctionDecl>) -> EvalResult<()> {
        let name = &decl.name;
        let handle = Self::handle(name.identifier(), decl.params.len());

        if self.functions.contains_key(&handle) || self.voids.contains_key(&handle) {
            return Err(RuntimeError::CannotRedeclareFunction { name: name.identifier()
                                                                        .to_string(),
                                                               line: name.line,
                                                               file: name.file.to_string(), });
        }

        let table = if decl.returns {
            &mut self.functions
        } else {
            &mut self.voids
        };
        table.insert(handle, Callable::Declared(Rc::clone(decl)));

        Ok(())
    }
}
