//! Scope walker
//!
//! Visits every scope reachable from the design roots exactly once, in a
//! fixed order, and hands each one to the right elaborator. The other modules
//! of this crate add their steps to [`Elaborator`] in their own `impl` blocks.

use crate::config::ElabConfig;
use crate::context::{ElabContext, ElabReport, Outcome};
use crate::error::ElabError;
use tracing::debug;
use vl_const_eval::ConstEvaluator;
use vl_intern::{Interner, Symbol};
use vl_netlist::{Design, ScopeId, ScopeKind};
use vl_pform::{Function, FxIndexMap, Gate, Module, Pform, Process, Stmt, Task};
use vl_span::FileSpan;

/// The signal pass over one design
pub(crate) struct Elaborator<'ctx> {
    pub(crate) pform: &'ctx Pform,
    pub(crate) design: &'ctx mut Design,
    pub(crate) ctx: ElabContext<'ctx>,
    pub(crate) eval: ConstEvaluator<'ctx>,
    pub(crate) interner: Interner,
}

impl<'ctx> Elaborator<'ctx> {
    pub(crate) fn new(pform: &'ctx Pform, design: &'ctx mut Design, config: &'ctx ElabConfig) -> Self {
        let interner = design.interner().clone();
        Self {
            pform,
            design,
            ctx: ElabContext::new(config),
            eval: ConstEvaluator::new(&pform.exprs),
            interner,
        }
    }

    pub(crate) fn finish(self, outcome: Outcome) -> ElabReport {
        self.ctx.into_report(outcome)
    }

    /// Name as written, for diagnostics
    pub(crate) fn name(&self, symbol: Symbol) -> String {
        self.interner.resolve(&symbol).to_owned()
    }

    pub(crate) fn scope_path(&self, scope: ScopeId) -> String {
        self.design.scope_path(scope)
    }

    pub(crate) fn elaborate_roots(&mut self) -> Outcome {
        let roots = self.design.roots().to_vec();
        roots
            .into_iter()
            .fold(Outcome::Clean, |outcome, root| outcome.and(self.elaborate_root(root)))
    }

    fn elaborate_root(&mut self, root: ScopeId) -> Outcome {
        let scope = self.design.scope(root);
        let (kind, span) = (scope.kind(), scope.span());
        let ScopeKind::Module { module } = kind else {
            return Outcome::Clean;
        };
        let pform = self.pform;
        match pform.module(module) {
            Some(definition) => self.elaborate_module(root, definition),
            None => {
                self.ctx.report(ElabError::MissingModule {
                    module: self.name(module),
                    scope: self.scope_path(root),
                    span,
                });
                Outcome::Failed
            }
        }
    }

    /// Elaborates one module instance scope and everything below it
    pub(crate) fn elaborate_module(&mut self, scope: ScopeId, module: &'ctx Module) -> Outcome {
        debug!(scope = %self.scope_path(scope), "elaborating module signals");

        let mut outcome = self.elaborate_wires(scope, &module.wires);
        outcome = outcome.and(self.validate_module_ports(scope, module));

        for generate in &module.generates {
            outcome = outcome.and(self.elaborate_generate(scope, generate));
        }

        outcome = outcome.and(self.elaborate_gates(scope, &module.gates));
        outcome = outcome.and(self.elaborate_functions(scope, &module.functions));
        outcome = outcome.and(self.elaborate_tasks(scope, &module.tasks));
        outcome.and(self.elaborate_behaviors(scope, &module.behaviors))
    }

    /// Recurses into the instance scopes created for module instances
    ///
    /// Primitive and UDP instances have no module definition and no scope.
    pub(crate) fn elaborate_gates(&mut self, scope: ScopeId, gates: &'ctx [Gate]) -> Outcome {
        let pform = self.pform;
        let mut outcome = Outcome::Clean;

        for gate in gates {
            let Gate::Instance(instance) = gate else {
                continue;
            };
            let Some(module) = pform.module(instance.module) else {
                continue;
            };

            let instances = self.design.scope(scope).instances(instance.name).to_vec();
            for instance_scope in instances {
                let parent = self.design.scope(instance_scope).parent();
                if parent != Some(scope) {
                    self.ctx.report(ElabError::MisparentedInstance {
                        instance: self.scope_path(instance_scope),
                        actual: parent.map_or_else(String::new, |parent| self.scope_path(parent)),
                        expected: self.scope_path(scope),
                        span: instance.span,
                    });
                    outcome = Outcome::Failed;
                    continue;
                }
                outcome = outcome.and(self.elaborate_module(instance_scope, module));
            }
        }

        outcome
    }

    pub(crate) fn elaborate_functions(
        &mut self,
        scope: ScopeId,
        functions: &'ctx FxIndexMap<Symbol, Function>,
    ) -> Outcome {
        let mut outcome = Outcome::Clean;
        for function in functions.values() {
            outcome = outcome.and(match self.child_scope(scope, function.name, "function", function.span) {
                Some(child) => self.elaborate_function(child, function),
                None => Outcome::Failed,
            });
        }
        outcome
    }

    pub(crate) fn elaborate_tasks(
        &mut self,
        scope: ScopeId,
        tasks: &'ctx FxIndexMap<Symbol, Task>,
    ) -> Outcome {
        let mut outcome = Outcome::Clean;
        for task in tasks.values() {
            outcome = outcome.and(match self.child_scope(scope, task.name, "task", task.span) {
                Some(child) => self.elaborate_task(child, task),
                None => Outcome::Failed,
            });
        }
        outcome
    }

    /// Looks up a child scope the scope pass must have created
    fn child_scope(
        &mut self,
        scope: ScopeId,
        name: Symbol,
        kind: &'static str,
        span: FileSpan,
    ) -> Option<ScopeId> {
        let child = self.design.scope(scope).child(name);
        if child.is_none() {
            self.ctx.report(ElabError::MissingScope {
                kind,
                name: self.name(name),
                parent: self.scope_path(scope),
                span,
            });
        }
        child
    }

    pub(crate) fn elaborate_behaviors(&mut self, scope: ScopeId, behaviors: &'ctx [Process]) -> Outcome {
        behaviors
            .iter()
            .fold(Outcome::Clean, |outcome, process| {
                outcome.and(self.elaborate_stmt(scope, &process.body))
            })
    }

    /// Finds the named blocks below a statement and elaborates their wires
    pub(crate) fn elaborate_stmt(&mut self, scope: ScopeId, stmt: &'ctx Stmt) -> Outcome {
        match stmt {
            Stmt::Block {
                name, wires, stmts, span, ..
            } => {
                let mut outcome = Outcome::Clean;
                let mut block_scope = scope;
                if let Some(name) = name {
                    match self.child_scope(scope, *name, "named block", *span) {
                        Some(child) => {
                            debug!(scope = %self.scope_path(child), "descending into named block");
                            block_scope = child;
                            outcome = self.elaborate_wires(child, wires);
                        }
                        None => outcome = Outcome::Failed,
                    }
                }
                stmts.iter().fold(outcome, |outcome, stmt| {
                    outcome.and(self.elaborate_stmt(block_scope, stmt))
                })
            }

            Stmt::Case { items, .. } => items
                .iter()
                .filter_map(|item| item.stmt.as_ref())
                .fold(Outcome::Clean, |outcome, stmt| {
                    outcome.and(self.elaborate_stmt(scope, stmt))
                }),

            Stmt::Condit {
                then_stmt,
                else_stmt,
                ..
            } => [then_stmt, else_stmt]
                .into_iter()
                .flatten()
                .fold(Outcome::Clean, |outcome, stmt| {
                    outcome.and(self.elaborate_stmt(scope, stmt))
                }),

            Stmt::Delay { body, .. }
            | Stmt::EventWait { body, .. }
            | Stmt::Forever { body, .. }
            | Stmt::For { body, .. }
            | Stmt::Repeat { body, .. }
            | Stmt::While { body, .. } => match body {
                Some(body) => self.elaborate_stmt(scope, body),
                None => Outcome::Clean,
            },

            Stmt::Other { .. } => Outcome::Clean,
        }
    }
}
