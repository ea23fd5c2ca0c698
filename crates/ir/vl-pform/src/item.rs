//! Modules, tasks, functions, gates and generate schemes

use crate::decl::{DeclRange, Wire};
use crate::stmt::{Process, Stmt};
use crate::FxIndexMap;
use vl_intern::Symbol;
use vl_span::FileSpan;

/// A module definition
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: Symbol,
    /// Port header in declaration order; `None` for an empty slot as in `m(, a)`
    pub ports: Vec<Option<Port>>,
    pub wires: FxIndexMap<Symbol, Wire>,
    pub generates: Vec<Generate>,
    pub gates: Vec<Gate>,
    pub functions: FxIndexMap<Symbol, Function>,
    pub tasks: FxIndexMap<Symbol, Task>,
    pub behaviors: Vec<Process>,
    pub span: FileSpan,
}

impl Module {
    #[must_use]
    pub fn new(name: Symbol, span: FileSpan) -> Self {
        Self {
            name,
            ports: Vec::new(),
            wires: FxIndexMap::default(),
            generates: Vec::new(),
            gates: Vec::new(),
            functions: FxIndexMap::default(),
            tasks: FxIndexMap::default(),
            behaviors: Vec::new(),
            span,
        }
    }

    pub fn add_wire(&mut self, wire: Wire) {
        self.wires.insert(wire.name, wire);
    }
}

/// One entry of a module port header
///
/// A port may be a concatenation, `.p({a, b})`, so it holds a list of
/// references to body declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    pub name: Option<Symbol>,
    pub refs: Vec<PortRef>,
    pub span: FileSpan,
}

/// Reference from a port header to a declared name
#[derive(Debug, Clone, PartialEq)]
pub struct PortRef {
    /// Path components; a well formed port has exactly one
    pub path: Vec<Symbol>,
    pub span: FileSpan,
}

impl PortRef {
    #[must_use]
    pub fn tail(&self) -> Option<Symbol> {
        self.path.last().copied()
    }
}

/// Structural items inside a module or generate scope
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// Built-in primitive such as `and` or `bufif0`
    Builtin { name: Option<Symbol>, span: FileSpan },
    /// Continuous assignment
    Assign { span: FileSpan },
    /// Module or UDP instance
    Instance(Instance),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    /// Instance name, shared by every element of an instance array
    pub name: Symbol,
    /// Name of the instantiated module
    pub module: Symbol,
    pub span: FileSpan,
}

/// Declared return type of a function
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnType {
    pub kind: ReturnKind,
    pub ranges: Vec<DeclRange>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnKind {
    /// `reg` or `reg [m:l]`
    Reg,
    /// `reg signed [m:l]`
    RegSigned,
    Integer,
    Time,
    Real,
    RealTime,
    /// 2-state atom such as `bit [m:l]`, `int` or `byte`
    Atom2,
    Atom2Signed,
    String,
    Void,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Symbol,
    /// Port names in declaration order; each is also declared in `wires`
    pub ports: Vec<Symbol>,
    pub return_type: ReturnType,
    pub wires: FxIndexMap<Symbol, Wire>,
    pub body: Option<Stmt>,
    pub span: FileSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub name: Symbol,
    pub ports: Vec<Symbol>,
    pub wires: FxIndexMap<Symbol, Wire>,
    pub body: Option<Stmt>,
    pub span: FileSpan,
}

/// Stable identity of a generate scheme
///
/// The scope pass records the scopes each scheme instantiated under this id.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct GenerateId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GenerateScheme {
    Loop,
    Condit,
    ElseCondit,
    Case,
    CaseItem,
    Block,
}

/// A generate construct
#[derive(Debug, Clone, PartialEq)]
pub struct Generate {
    pub id: GenerateId,
    pub scheme: GenerateScheme,
    /// Unconditional scheme merged directly into its parent
    pub direct_nested: bool,
    pub scope_name: Symbol,
    pub wires: FxIndexMap<Symbol, Wire>,
    pub functions: FxIndexMap<Symbol, Function>,
    pub tasks: FxIndexMap<Symbol, Task>,
    pub generates: Vec<Generate>,
    pub gates: Vec<Gate>,
    pub behaviors: Vec<Process>,
    pub span: FileSpan,
}

impl Generate {
    #[must_use]
    pub fn new(id: GenerateId, scheme: GenerateScheme, scope_name: Symbol, span: FileSpan) -> Self {
        Self {
            id,
            scheme,
            direct_nested: false,
            scope_name,
            wires: FxIndexMap::default(),
            functions: FxIndexMap::default(),
            tasks: FxIndexMap::default(),
            generates: Vec::new(),
            gates: Vec::new(),
            behaviors: Vec::new(),
            span,
        }
    }

    pub fn add_wire(&mut self, wire: Wire) {
        self.wires.insert(wire.name, wire);
    }
}
