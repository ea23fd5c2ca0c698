//! Integration test utilities for the Vellum signal pass
//!
//! Tests build the pform by hand, create the scope tree the scope pass would
//! have produced, then run [`elaborate_signals`] over both.

use vl_elab_sig::{ElabConfig, ElabReport, elaborate_signals};
use vl_intern::{Interner, Symbol};
use vl_netlist::{Design, Scope, ScopeId, ScopeKind, Signal};
use vl_pform::{DeclRange, Expr, ExprId, Module, Pform};
use vl_span::{FileId, FileSpan, Span};

/// Test fixture helper
pub struct TestFixture {
    pub interner: Interner,
    pub pform: Pform,
    pub design: Design,
    /// Next span start, so every span in a fixture is distinct
    next_offset: u32,
}

impl TestFixture {
    /// Creates an empty fixture
    #[must_use]
    pub fn new() -> Self {
        let interner = Interner::new();
        Self {
            design: Design::new(interner.clone()),
            interner,
            pform: Pform::new(),
            next_offset: 0,
        }
    }

    #[must_use]
    pub fn sym(&self, name: &str) -> Symbol {
        self.interner.intern(name)
    }

    /// A fresh span in file 0
    pub fn span(&mut self) -> FileSpan {
        let start = self.next_offset;
        self.next_offset += 4;
        FileSpan::new(FileId::new(0), Span::new(start, start + 3))
    }

    pub fn num(&mut self, value: i64) -> ExprId {
        let span = self.span();
        self.pform.alloc_expr(Expr::Number { value, span })
    }

    pub fn ident(&mut self, name: &str) -> ExprId {
        let name = self.sym(name);
        let span = self.span();
        self.pform.alloc_expr(Expr::Ident { name, span })
    }

    /// `[msb:lsb]` with literal bounds
    pub fn range(&mut self, msb: i64, lsb: i64) -> DeclRange {
        let msb = self.num(msb);
        let lsb = self.num(lsb);
        DeclRange::new(msb, lsb)
    }

    /// Adds a module definition and a root scope instantiating it
    pub fn add_top(&mut self, module: Module) -> ScopeId {
        let name = module.name;
        let span = module.span;
        self.pform.add_module(module);
        self.design.add_root(name, name, span)
    }

    /// A module definition without contents
    pub fn module(&mut self, name: &str) -> Module {
        let name = self.sym(name);
        let span = self.span();
        Module::new(name, span)
    }

    /// Runs the signal pass with `config`
    pub fn elaborate_with(&mut self, config: &ElabConfig) -> ElabReport {
        elaborate_signals(&self.pform, &mut self.design, config)
    }

    /// Runs the signal pass with the default configuration
    pub fn elaborate(&mut self) -> ElabReport {
        self.elaborate_with(&ElabConfig::default())
    }

    /// Adds a child scope of `parent`
    pub fn child(&mut self, parent: ScopeId, name: &str, kind: ScopeKind) -> ScopeId {
        let name = self.sym(name);
        let span = self.span();
        self.design.add_child(parent, name, kind, span)
    }

    #[must_use]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        self.design.scope(id)
    }

    /// The signal `name` declared directly in `scope`
    #[must_use]
    pub fn signal(&self, scope: ScopeId, name: &str) -> Option<&Signal> {
        let name = self.interner.get(name)?;
        self.design
            .find_signal(scope, name)
            .map(|id| self.design.signal(id))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders each diagnostic of a report on its own line
#[must_use]
pub fn render_diagnostics(report: &ElabReport) -> String {
    report
        .diagnostics
        .iter()
        .map(|diagnostic| format!("{:?}: {diagnostic}\n", diagnostic.severity()))
        .collect()
}
