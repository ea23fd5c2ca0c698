//! Scope tree nodes

use crate::signal::SignalId;
use crate::types::CompositeId;
use vl_arena::Idx;
use vl_intern::Symbol;
use vl_pform::FxIndexMap;
use vl_span::FileSpan;

/// Unique identifier for a scope
pub type ScopeId = Idx<Scope>;

/// Kind of scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    /// Instance of the named module definition
    Module { module: Symbol },
    Task,
    Function,
    /// Scope instantiated by a generate scheme
    Generate,
    /// Named `begin`/`fork` block
    Block,
}

impl ScopeKind {
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Self::Module { .. } => "module instance",
            Self::Task => "task",
            Self::Function => "function",
            Self::Generate => "generate block",
            Self::Block => "named block",
        }
    }
}

/// How far elaboration has progressed on a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ElabStage {
    /// Created by the scope pass
    #[default]
    Scoped,
    /// Signals elaborated
    Signals,
}

/// Parameter value, already folded by the scope pass
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Real(f64),
    Str(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub value: ParamValue,
    pub span: FileSpan,
}

/// Port binding of a task or function scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    Function(FunctionDef),
    Task(TaskDef),
}

impl Definition {
    #[must_use]
    pub fn as_function(&self) -> Option<&FunctionDef> {
        match self {
            Self::Function(def) => Some(def),
            Self::Task(_) => None,
        }
    }

    #[must_use]
    pub fn as_task(&self) -> Option<&TaskDef> {
        match self {
            Self::Task(def) => Some(def),
            Self::Function(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDef {
    /// `None` for void functions
    pub return_signal: Option<SignalId>,
    /// Argument slots in port order; empty where the port failed to elaborate
    pub args: Vec<Option<SignalId>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDef {
    pub args: Vec<Option<SignalId>>,
}

/// A single scope in the design hierarchy
#[derive(Debug, Clone)]
pub struct Scope {
    pub(crate) name: Symbol,
    pub(crate) kind: ScopeKind,
    pub(crate) parent: Option<ScopeId>,
    pub(crate) children: FxIndexMap<Symbol, ScopeId>,
    pub(crate) signals: FxIndexMap<Symbol, SignalId>,
    pub(crate) genvars: FxIndexMap<Symbol, FileSpan>,
    pub(crate) parameters: FxIndexMap<Symbol, Parameter>,
    pub(crate) events: FxIndexMap<Symbol, FileSpan>,
    pub(crate) instance_arrays: FxIndexMap<Symbol, Vec<ScopeId>>,
    pub(crate) enums: FxIndexMap<Symbol, CompositeId>,
    pub(crate) stage: ElabStage,
    pub(crate) definition: Option<Definition>,
    pub(crate) next_local: u32,
    pub(crate) span: FileSpan,
}

impl Scope {
    pub(crate) fn new(
        name: Symbol,
        kind: ScopeKind,
        parent: Option<ScopeId>,
        span: FileSpan,
    ) -> Self {
        Self {
            name,
            kind,
            parent,
            children: FxIndexMap::default(),
            signals: FxIndexMap::default(),
            genvars: FxIndexMap::default(),
            parameters: FxIndexMap::default(),
            events: FxIndexMap::default(),
            instance_arrays: FxIndexMap::default(),
            enums: FxIndexMap::default(),
            stage: ElabStage::default(),
            definition: None,
            next_local: 0,
            span,
        }
    }

    #[must_use]
    pub fn name(&self) -> Symbol {
        self.name
    }

    #[must_use]
    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    #[must_use]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    #[must_use]
    pub fn span(&self) -> FileSpan {
        self.span
    }

    #[must_use]
    pub fn child(&self, name: Symbol) -> Option<ScopeId> {
        self.children.get(&name).copied()
    }

    pub fn children(&self) -> impl Iterator<Item = (Symbol, ScopeId)> + '_ {
        self.children.iter().map(|(name, id)| (*name, *id))
    }

    #[must_use]
    pub fn signal(&self, name: Symbol) -> Option<SignalId> {
        self.signals.get(&name).copied()
    }

    /// Signals in creation order
    pub fn signals(&self) -> impl Iterator<Item = SignalId> + '_ {
        self.signals.values().copied()
    }

    #[must_use]
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    #[must_use]
    pub fn genvar(&self, name: Symbol) -> Option<FileSpan> {
        self.genvars.get(&name).copied()
    }

    #[must_use]
    pub fn parameter(&self, name: Symbol) -> Option<&Parameter> {
        self.parameters.get(&name)
    }

    #[must_use]
    pub fn event(&self, name: Symbol) -> Option<FileSpan> {
        self.events.get(&name).copied()
    }

    /// Scopes of an instance array, in index order
    #[must_use]
    pub fn instances(&self, name: Symbol) -> &[ScopeId] {
        self.instance_arrays.get(&name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn stage(&self) -> ElabStage {
        self.stage
    }

    #[must_use]
    pub fn definition(&self) -> Option<&Definition> {
        self.definition.as_ref()
    }
}
