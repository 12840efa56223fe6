use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{
    ast::{NodeIds, Stmt},
    error::{RuntimeError, SyntaxError},
    interpreter::{evaluator::core::Context, lexer::Token, resolver::Resolver},
};

/// Splices function declarations out of a statement list and into the
/// context's function tables, chasing `import` statements through the
/// import root as it goes.
///
/// Importing a file pulls in its functions only; any other top-level
/// statements it contains are discarded. Every hoisted function body is
/// resolved immediately, so by the time the driver resolves the remaining
/// main-file statements the side table already covers every function.
pub struct Importer<'a> {
    context:     &'a mut Context,
    resolver:    &'a mut Resolver,
    ids:         NodeIds,
    root:        &'a Path,
    loaded:      &'a mut HashSet<PathBuf>,
    diagnostics: Vec<SyntaxError>,
}

impl<'a> Importer<'a> {
    /// Wires an importer to the run's context, resolver, id generator,
    /// import root and the set of files already loaded this run.
    pub fn new(context: &'a mut Context,
               resolver: &'a mut Resolver,
               ids: NodeIds,
               root: &'a Path,
               loaded: &'a mut HashSet<PathBuf>)
               -> Self {
        Self { context,
               resolver,
               ids,
               root,
               loaded,
               diagnostics: Vec::new() }
    }

    /// The diagnostics gathered while importing: missing files and syntax
    /// errors from imported sources.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<SyntaxError> {
        self.diagnostics
    }

    /// Hoists every function declaration in `stmts` into the tables and
    /// splices imports in place, leaving only the runnable statements.
    ///
    /// # Errors
    /// A `(name, arity)` pair already present in either table is a
    /// runtime error, matching a re-declaration inside one file.
    pub fn import_functions(&mut self, stmts: &mut Vec<Stmt>) -> Result<(), RuntimeError> {
        let mut rest = Vec::with_capacity(stmts.len());

        for stmt in stmts.drain(..) {
            match stmt {
                Stmt::Function(decl) => {
                    self.context.define_function(&decl)?;
                    self.resolver.resolve_function(&decl);
                },

                Stmt::Import(names) => {
                    for name in &names {
                        self.import_file(name)?;
                    }
                },

                other => rest.push(other),
            }
        }

        *stmts = rest;
        Ok(())
    }

    fn import_file(&mut self, name: &Token) -> Result<(), RuntimeError> {
        let path = self.root.join(format!("{}.cflat", name.identifier()));

        // A file imported twice (or cyclically) is spliced only once.
        if !self.loaded.insert(path.clone()) {
            return Ok(());
        }

        let Ok(source) = fs::read_to_string(&path) else {
            self.diagnostics
                .push(SyntaxError::MissingImport { name: format!("{}.cflat",
                                                                 name.identifier()),
                                                   line: name.line,
                                                   file: name.file.to_string(), });
            return Ok(());
        };

        let label = path.file_name()
                        .map_or_else(|| name.identifier().to_string(),
                                     |file| file.to_string_lossy().into_owned());

        let (mut statements, diagnostics) = crate::parse_source(&source, &label, &self.ids);
        self.diagnostics.extend(diagnostics);

        self.import_functions(&mut statements)
    }
}
