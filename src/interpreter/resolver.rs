use std::collections::HashMap;

use crate::{
    ast::{Expr, FunctionDecl, NodeId, Stmt},
    error::SyntaxError,
    interpreter::lexer::Token,
};

/// Static pre-pass that maps variable references to their lexical scopes.
///
/// The resolver walks the AST once with a stack of `name → defined` maps
/// and records, for every reference it can place, how many scopes lie
/// between the reference and the declaration. References it cannot place
/// get no entry and fall back to the global runtime scope at evaluation
/// time.
///
/// Depths are relative to the innermost scope at the reference, so a
/// function body shared by many calls resolves correctly against whichever
/// call scope is current.
///
/// Nothing is evaluated here; the pass writes the side table and reports
/// diagnostics.
#[derive(Default)]
pub struct Resolver {
    scopes:      Vec<HashMap<String, bool>>,
    locals:      HashMap<NodeId, usize>,
    diagnostics: Vec<SyntaxError>,
}

impl Resolver {
    /// Creates a resolver with no open scopes (global position).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a statement list in order.
    pub fn resolve_stmts(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.resolve_stmt(stmt);
        }
    }

    /// Hands the finished side table and any diagnostics to the driver.
    #[must_use]
    pub fn into_parts(self) -> (HashMap<NodeId, usize>, Vec<SyntaxError>) {
        (self.locals, self.diagnostics)
    }

    /// Resolves a hoisted function declaration: the name itself (a no-op
    /// at global scope, where function names live in the tables instead),
    /// then the body inside one fresh scope holding the parameters.
    pub fn resolve_function(&mut self, decl: &FunctionDecl) {
        self.declare(&decl.name);
        self.define(&decl.name);

        self.begin_scope();
        for param in &decl.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve_stmts(&decl.body);
        self.end_scope();
    }

    pub(crate) fn resolve_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block(stmts) => {
                self.begin_scope();
                self.resolve_stmts(stmts);
                self.end_scope();
            },

            Stmt::VarDecl { name, initializer } => {
                self.declare(name);
                if let Some(initializer) = initializer {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            },

            Stmt::ArrayDecl { name, initializers } => {
                self.declare(name);
                for initializer in initializers {
                    self.resolve_expr(initializer);
                }
                self.define(name);
            },

            Stmt::Function(decl) => self.resolve_function(decl),

            Stmt::Expr(expr) => self.resolve_expr(expr),

            Stmt::If { condition,
                       then_branch,
                       else_branch, } => {
                self.resolve_expr(condition);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            },

            Stmt::While { condition, body } => {
                self.resolve_expr(condition);
                self.resolve_stmt(body);
            },

            Stmt::Switch { switcher,
                           switchees,
                           cases,
                           default, } => {
                self.resolve_expr(switcher);
                for switchee in switchees {
                    self.resolve_expr(switchee);
                }
                for case in cases {
                    self.resolve_stmt(case);
                }
                if let Some(default) = default {
                    self.resolve_stmt(default);
                }
            },

            Stmt::Return { value, .. } | Stmt::Break { value, .. } => {
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            },

            // Imports were spliced away by the importer before this pass.
            Stmt::Import(_) => {},
        }
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal { .. } => {},

            Expr::Variable { id, name } => {
                if let Some(scope) = self.scopes.last()
                    && scope.get(name.identifier()) == Some(&false)
                {
                    self.diagnostics.push(SyntaxError::ReadInInitializer {
                        name: name.identifier().to_string(),
                        line: name.line,
                        file: name.file.to_string(),
                    });
                }
                self.resolve_local(*id, name);
            },

            Expr::Grouping { expr }
            | Expr::Unary { expr, .. }
            | Expr::Postfix { expr, .. }
            | Expr::TypeCast { expr, .. } => self.resolve_expr(expr),

            Expr::Binary { left, right, .. } => {
                self.resolve_expr(left);
                self.resolve_expr(right);
            },

            Expr::Ternary { condition,
                            middle,
                            right, } => {
                self.resolve_expr(condition);
                self.resolve_expr(middle);
                self.resolve_expr(right);
            },

            Expr::Index { array, start, end, .. } => {
                if let Some(start) = start {
                    self.resolve_expr(start);
                }
                if let Some(end) = end {
                    self.resolve_expr(end);
                }
                self.resolve_expr(array);
            },

            Expr::AssignAt { id,
                             name,
                             array,
                             index,
                             value,
                             .. } => {
                self.resolve_expr(index);
                self.resolve_expr(value);
                self.resolve_expr(array);
                self.resolve_local(*id, name);
            },

            Expr::Call { args, .. } => {
                for arg in args {
                    self.resolve_expr(arg);
                }
            },

            Expr::Assignment { id, name, value } => {
                self.resolve_expr(value);
                self.resolve_local(*id, name);
            },
        }
    }

    /// Walks outward from the innermost scope; the first scope that knows
    /// the name gets recorded as the reference's depth. No hit means the
    /// reference is global.
    fn resolve_local(&mut self, id: NodeId, name: &Token) {
        for (hops, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name.identifier()) {
                self.locals.insert(id, hops);
                return;
            }
        }
    }

    /// Enters a name as declared-but-not-yet-defined. Reads that happen
    /// before [`Self::define`] flips the flag are initializer
    /// self-references. No-op at global scope.
    fn declare(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.identifier().to_string(), false);
        }
    }

    /// Marks a declared name as usable. No-op at global scope.
    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.identifier().to_string(), true);
        }
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }
}
