//! Parsed declaration form (pform)
//!
//! The pform is the parser's view of a design: module definitions with their
//! port headers, declared wires, tasks, functions, generate schemes and
//! behavioural statements. Nothing here is elaborated; range bounds are still
//! expressions and types are still declarations. The signal elaboration pass
//! reads a `Pform` alongside the scope tree built by the scope pass.

#![allow(missing_docs, reason = "pform nodes are plain parser output; fields are documented where they are not self-describing")]

mod decl;
mod expr;
mod item;
mod stmt;

pub use decl::{
    AtomType, Attribute, DeclRange, EnumName, EnumType, NetType, PackedArrayType, PortType,
    StructMember, StructType, TypeSpec, VarType, Wire,
};
pub use expr::{BinaryOp, Expr, ExprId, UnaryOp};
pub use item::{
    Function, Gate, Generate, GenerateId, GenerateScheme, Instance, Module, Port, PortRef,
    ReturnKind, ReturnType, Task,
};
pub use stmt::{BlockKind, CaseItem, Process, ProcessKind, Stmt};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use vl_arena::Arena;
use vl_intern::Symbol;
use vl_span::FileSpan;

/// Insertion-ordered map with the Fx hasher
///
/// Declaration order is significant for diagnostics and signal identity, so
/// every name table in the pform and the netlist uses this map.
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// A parsed design
#[derive(Debug, Clone, Default)]
pub struct Pform {
    /// Every expression in the design
    pub exprs: Arena<Expr>,
    /// Module definitions by name
    pub modules: FxIndexMap<Symbol, Module>,
}

impl Pform {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.alloc(expr)
    }

    #[must_use]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    #[must_use]
    pub fn expr_span(&self, id: ExprId) -> FileSpan {
        self.exprs[id].span()
    }

    /// Adds a module definition, replacing any previous one of the same name
    pub fn add_module(&mut self, module: Module) {
        self.modules.insert(module.name, module);
    }

    #[must_use]
    pub fn module(&self, name: Symbol) -> Option<&Module> {
        self.modules.get(&name)
    }
}
