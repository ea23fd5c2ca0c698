//! Elaborated design
//!
//! The netlist is what elaboration produces: a tree of scopes, each owning
//! its signals, plus the composite types and compiler-generated logic those
//! signals refer to. Every node lives in an arena inside [`Design`] and is
//! addressed by a stable index, so parent links are plain handles and nothing
//! is reference counted.
//!
//! The scope pass populates the tree (scopes, parameters, genvars, events,
//! enumerations, instance arrays, generate instantiations). The signal pass
//! then adds signals, composite types, logic nodes and task/function
//! definitions.

#![allow(missing_docs, reason = "netlist nodes are plain data; fields are documented where they are not self-describing")]

mod scope;
mod signal;
mod types;

pub use scope::{
    Definition, ElabStage, FunctionDef, ParamValue, Parameter, Scope, ScopeId, ScopeKind, TaskDef,
};
pub use signal::{
    AttrValue, DataType, LogicId, LogicKind, LogicNode, NetKind, PortDirection, Signal, SignalId,
    SignalKind, Strength,
};
pub use types::{
    CompositeId, CompositeType, DynamicArrayType, EnumType, EnumValue, NetRange, PackedArrayType,
    StructMember, StructType, format_ranges, ranges_width,
};

use rustc_hash::FxHashMap;
use std::iter;
use vl_arena::Arena;
use vl_intern::{Interner, Symbol};
use vl_pform::GenerateId;
use vl_span::FileSpan;

/// The design being elaborated
#[derive(Debug)]
pub struct Design {
    interner: Interner,
    scopes: Arena<Scope>,
    signals: Arena<Signal>,
    composites: Arena<CompositeType>,
    logic: Arena<LogicNode>,
    roots: Vec<ScopeId>,
    generate_scopes: FxHashMap<GenerateId, Vec<ScopeId>>,
}

impl Design {
    #[must_use]
    pub fn new(interner: Interner) -> Self {
        Self {
            interner,
            scopes: Arena::new(),
            signals: Arena::new(),
            composites: Arena::new(),
            logic: Arena::new(),
            roots: Vec::new(),
            generate_scopes: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    // Scope construction

    /// Creates a root module scope
    pub fn add_root(&mut self, name: Symbol, module: Symbol, span: FileSpan) -> ScopeId {
        let id = self
            .scopes
            .alloc(Scope::new(name, ScopeKind::Module { module }, None, span));
        self.roots.push(id);
        id
    }

    /// Creates a named child scope of `parent`
    pub fn add_child(
        &mut self,
        parent: ScopeId,
        name: Symbol,
        kind: ScopeKind,
        span: FileSpan,
    ) -> ScopeId {
        let id = self
            .scopes
            .alloc(Scope::new(name, kind, Some(parent), span));
        self.scopes[parent].children.insert(name, id);
        id
    }

    /// Creates one element of the instance array `instance` in `parent`
    ///
    /// `element` is the scope name of this element, e.g. `u1[0]`; a plain
    /// instance uses the instance name itself.
    pub fn add_instance(
        &mut self,
        parent: ScopeId,
        instance: Symbol,
        element: Symbol,
        module: Symbol,
        span: FileSpan,
    ) -> ScopeId {
        let id = self.add_child(parent, element, ScopeKind::Module { module }, span);
        self.record_instance(parent, instance, id);
        id
    }

    /// Records `scope` as the next element of the instance array
    pub fn record_instance(&mut self, parent: ScopeId, instance: Symbol, scope: ScopeId) {
        self.scopes[parent]
            .instance_arrays
            .entry(instance)
            .or_default()
            .push(scope);
    }

    /// Records a scope instantiated by a generate scheme
    pub fn record_generate(&mut self, generate: GenerateId, scope: ScopeId) {
        self.generate_scopes.entry(generate).or_default().push(scope);
    }

    /// Scopes instantiated by a generate scheme, in instantiation order
    #[must_use]
    pub fn generate_scopes(&self, generate: GenerateId) -> &[ScopeId] {
        self.generate_scopes
            .get(&generate)
            .map_or(&[], Vec::as_slice)
    }

    pub fn add_parameter(&mut self, scope: ScopeId, name: Symbol, value: ParamValue, span: FileSpan) {
        self.scopes[scope]
            .parameters
            .insert(name, Parameter { value, span });
    }

    pub fn add_genvar(&mut self, scope: ScopeId, name: Symbol, span: FileSpan) {
        self.scopes[scope].genvars.insert(name, span);
    }

    pub fn add_event(&mut self, scope: ScopeId, name: Symbol, span: FileSpan) {
        self.scopes[scope].events.insert(name, span);
    }

    /// Registers an enumeration in `scope` under each of its value names
    pub fn register_enum(&mut self, scope: ScopeId, ty: EnumType) -> CompositeId {
        let names: Vec<Symbol> = ty.values.iter().map(|value| value.name).collect();
        let id = self.composites.alloc(CompositeType::Enum(ty));
        let enums = &mut self.scopes[scope].enums;
        for name in names {
            enums.insert(name, id);
        }
        id
    }

    // Elaboration output

    /// Adds a signal to its scope's signal namespace
    ///
    /// A later signal of the same name replaces the earlier one in the
    /// namespace; callers check for collisions first.
    pub fn add_signal(&mut self, signal: Signal) -> SignalId {
        let scope = signal.scope;
        let name = signal.name;
        let id = self.signals.alloc(signal);
        self.scopes[scope].signals.insert(name, id);
        id
    }

    pub fn add_composite(&mut self, ty: CompositeType) -> CompositeId {
        self.composites.alloc(ty)
    }

    pub fn add_logic(&mut self, node: LogicNode) -> LogicId {
        self.logic.alloc(node)
    }

    /// Connects pin 0 of `node` to `signal`
    pub fn connect(&mut self, node: LogicId, signal: SignalId) {
        self.logic[node].output = Some(signal);
        self.signals[signal].driver = Some(node);
    }

    /// Fresh compiler-generated name in `scope`
    pub fn local_symbol(&mut self, scope: ScopeId) -> Symbol {
        let scope = &mut self.scopes[scope];
        let index = scope.next_local;
        scope.next_local += 1;
        self.interner.intern(&format!("_ivl_{index}"))
    }

    pub fn set_stage(&mut self, scope: ScopeId, stage: ElabStage) {
        self.scopes[scope].stage = stage;
    }

    /// Attaches the task/function definition, replacing any previous one
    pub fn set_definition(&mut self, scope: ScopeId, definition: Definition) {
        self.scopes[scope].definition = Some(definition);
    }

    // Queries

    #[must_use]
    pub fn roots(&self) -> &[ScopeId] {
        &self.roots
    }

    #[must_use]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    #[must_use]
    pub fn signal(&self, id: SignalId) -> &Signal {
        &self.signals[id]
    }

    #[must_use]
    pub fn composite(&self, id: CompositeId) -> &CompositeType {
        &self.composites[id]
    }

    #[must_use]
    pub fn logic(&self, id: LogicId) -> &LogicNode {
        &self.logic[id]
    }

    pub fn signals(&self) -> impl Iterator<Item = (SignalId, &Signal)> {
        self.signals.iter()
    }

    pub fn logic_nodes(&self) -> impl Iterator<Item = (LogicId, &LogicNode)> {
        self.logic.iter()
    }

    #[must_use]
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// Looks a signal up in the signal namespace of `scope` only
    #[must_use]
    pub fn find_signal(&self, scope: ScopeId, name: Symbol) -> Option<SignalId> {
        self.scopes[scope].signal(name)
    }

    /// Looks a parameter up in `scope` and then its ancestors
    #[must_use]
    pub fn find_parameter(&self, scope: ScopeId, name: Symbol) -> Option<&Parameter> {
        self.ancestors(scope)
            .find_map(|id| self.scopes[id].parameters.get(&name))
    }

    /// Enumeration that declares the value `name`, searching outwards
    #[must_use]
    pub fn enumeration_for_name(&self, scope: ScopeId, name: Symbol) -> Option<CompositeId> {
        self.ancestors(scope)
            .find_map(|id| self.scopes[id].enums.get(&name).copied())
    }

    /// `scope` followed by each of its ancestors up to the root
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        iter::successors(Some(scope), |id| self.scopes[*id].parent)
    }

    /// Dotted hierarchical path, e.g. `top.u1.gen[0]`
    #[must_use]
    pub fn scope_path(&self, scope: ScopeId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(scope)
            .map(|id| self.interner.resolve(&self.scopes[id].name))
            .collect();
        names.reverse();
        names.join(".")
    }

    /// Packed width of a composite type, where it has one
    #[must_use]
    pub fn composite_width(&self, id: CompositeId) -> Option<u64> {
        match &self.composites[id] {
            CompositeType::Struct(ty) => ty.packed_width(),
            CompositeType::Enum(ty) => Some(ty.width),
            CompositeType::PackedArray(ty) => self
                .composite_width(ty.element)
                .and_then(|element| element.checked_mul(ranges_width(&ty.dims)?)),
            CompositeType::DynamicArray(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> FileSpan {
        FileSpan::detached()
    }

    #[test]
    fn test_scope_path_and_children() {
        let interner = Interner::new();
        let mut design = Design::new(interner.clone());
        let top = design.add_root(interner.intern("top"), interner.intern("top"), span());
        let genblk = design.add_child(top, interner.intern("gen[0]"), ScopeKind::Generate, span());
        let block = design.add_child(genblk, interner.intern("blk"), ScopeKind::Block, span());

        assert_eq!(design.scope_path(block), "top.gen[0].blk");
        assert_eq!(design.scope(top).child(interner.intern("gen[0]")), Some(genblk));
        assert_eq!(design.scope(block).parent(), Some(genblk));
        assert_eq!(design.ancestors(block).count(), 3);
    }

    #[test]
    fn test_parameter_lookup_walks_outwards() {
        let interner = Interner::new();
        let mut design = Design::new(interner.clone());
        let top = design.add_root(interner.intern("top"), interner.intern("top"), span());
        let func = design.add_child(top, interner.intern("f"), ScopeKind::Function, span());
        let width = interner.intern("WIDTH");
        design.add_parameter(top, width, ParamValue::Int(8), span());

        assert!(design.scope(func).parameter(width).is_none());
        assert_eq!(
            design.find_parameter(func, width).map(|param| &param.value),
            Some(&ParamValue::Int(8))
        );
    }

    #[test]
    fn test_enum_registered_under_every_value() {
        let interner = Interner::new();
        let mut design = Design::new(interner.clone());
        let top = design.add_root(interner.intern("top"), interner.intern("top"), span());
        let child = design.add_child(top, interner.intern("blk"), ScopeKind::Block, span());
        let idle = interner.intern("IDLE");
        let busy = interner.intern("BUSY");
        let id = design.register_enum(
            top,
            EnumType {
                base: DataType::Logic,
                signed: false,
                width: 1,
                values: vec![
                    EnumValue { name: idle, value: 0 },
                    EnumValue { name: busy, value: 1 },
                ],
            },
        );

        assert_eq!(design.enumeration_for_name(child, idle), Some(id));
        assert_eq!(design.enumeration_for_name(child, busy), Some(id));
        assert_eq!(design.enumeration_for_name(child, interner.intern("DONE")), None);
        assert_eq!(design.composite_width(id), Some(1));
    }

    #[test]
    fn test_local_symbols_are_fresh_per_scope() {
        let interner = Interner::new();
        let mut design = Design::new(interner.clone());
        let top = design.add_root(interner.intern("top"), interner.intern("top"), span());
        let first = design.local_symbol(top);
        let second = design.local_symbol(top);
        assert_ne!(first, second);
        assert_eq!(interner.resolve(&first), "_ivl_0");
    }

    #[test]
    fn test_connect_links_both_ends() {
        let interner = Interner::new();
        let mut design = Design::new(interner.clone());
        let top = design.add_root(interner.intern("top"), interner.intern("top"), span());
        let name = interner.intern("vdd");
        let signal = design.add_signal(Signal::new(name, top, SignalKind::Net(NetKind::Wire), span()));
        let node_name = design.local_symbol(top);
        let node = design.add_logic(LogicNode {
            name: node_name,
            scope: top,
            kind: LogicKind::Pullup,
            width: 1,
            drive0: Strength::Supply,
            drive1: Strength::Supply,
            output: None,
            span: span(),
        });
        design.connect(node, signal);

        assert_eq!(design.logic(node).output, Some(signal));
        assert_eq!(design.signal(signal).driver, Some(node));
        assert_eq!(design.find_signal(top, name), Some(signal));
    }
}
