//! Elaborated signals and compiler-generated logic

use crate::scope::ScopeId;
use crate::types::{CompositeId, NetRange, ranges_width};
use vl_arena::Idx;
use vl_intern::Symbol;
use vl_span::FileSpan;

pub type SignalId = Idx<Signal>;
pub type LogicId = Idx<LogicNode>;

/// Net flavour of a `SignalKind::Net`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetKind {
    Wire,
    Tri,
    Tri0,
    Tri1,
    TriAnd,
    TriOr,
    Wand,
    Wor,
    Uwire,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    Net(NetKind),
    Register,
    Variable,
}

impl SignalKind {
    #[must_use]
    pub fn is_net(self) -> bool {
        matches!(self, Self::Net(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PortDirection {
    #[default]
    NotAPort,
    Input,
    Output,
    InOut,
    Ref,
}

/// Element value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DataType {
    /// 4-state logic, the default for undeclared types
    #[default]
    Logic,
    /// 2-state
    Bool,
    Real,
    String,
}

/// Evaluated attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// `(* key *)` with no value
    Flag,
    Int(i64),
    Real(f64),
    Str(String),
}

/// A typed, named signal owned by its scope
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: Symbol,
    pub scope: ScopeId,
    pub kind: SignalKind,
    pub port: PortDirection,
    pub data_type: DataType,
    pub packed: Vec<NetRange>,
    pub unpacked: Vec<NetRange>,
    pub composite: Option<CompositeId>,
    pub signed: bool,
    pub scalar: bool,
    pub is_int: bool,
    pub discipline: Option<Symbol>,
    pub attributes: Vec<(Symbol, AttrValue)>,
    /// Logic node driving pin 0, set by supply net rewriting
    pub driver: Option<LogicId>,
    pub span: FileSpan,
}

impl Signal {
    /// A 1-bit, 4-state, non-port signal
    #[must_use]
    pub fn new(name: Symbol, scope: ScopeId, kind: SignalKind, span: FileSpan) -> Self {
        Self {
            name,
            scope,
            kind,
            port: PortDirection::NotAPort,
            data_type: DataType::Logic,
            packed: Vec::new(),
            unpacked: Vec::new(),
            composite: None,
            signed: false,
            scalar: false,
            is_int: false,
            discipline: None,
            attributes: Vec::new(),
            driver: None,
            span,
        }
    }

    /// Width of one element, from the packed dimensions
    #[must_use]
    pub fn packed_width(&self) -> Option<u64> {
        ranges_width(&self.packed)
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        !self.unpacked.is_empty()
    }

    #[must_use]
    pub fn attribute(&self, key: Symbol) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find_map(|(name, value)| (*name == key).then_some(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicKind {
    Pullup,
    Pulldown,
}

/// Drive strength of an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strength {
    HighZ,
    Weak,
    Pull,
    Strong,
    Supply,
}

/// Compiler-generated primitive
#[derive(Debug, Clone, PartialEq)]
pub struct LogicNode {
    pub name: Symbol,
    pub scope: ScopeId,
    pub kind: LogicKind,
    pub width: u64,
    pub drive0: Strength,
    pub drive1: Strength,
    /// Signal connected to pin 0
    pub output: Option<SignalId>,
    pub span: FileSpan,
}
