//! Wire declarations and declared types

use crate::expr::ExprId;
use vl_intern::Symbol;
use vl_span::FileSpan;

/// One `[msb:lsb]` pair as written
///
/// Both bounds absent (`[]`) marks a dynamic array dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclRange {
    pub msb: Option<ExprId>,
    pub lsb: Option<ExprId>,
}

impl DeclRange {
    #[must_use]
    pub fn new(msb: ExprId, lsb: ExprId) -> Self {
        Self {
            msb: Some(msb),
            lsb: Some(lsb),
        }
    }

    /// The `[]` dimension of a dynamic array
    #[must_use]
    pub fn dynamic() -> Self {
        Self {
            msb: None,
            lsb: None,
        }
    }

    #[must_use]
    pub fn is_dynamic(&self) -> bool {
        self.msb.is_none() && self.lsb.is_none()
    }
}

/// Declared net or variable type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetType {
    /// Net created implicitly, e.g. by a port declared without a net type
    Implicit,
    /// Variable created implicitly, e.g. `output reg` without a body declaration
    ImplicitReg,
    Wire,
    Tri,
    Tri0,
    Tri1,
    TriAnd,
    TriOr,
    Wand,
    Wor,
    Uwire,
    Supply0,
    Supply1,
    Reg,
    /// SystemVerilog variable (`logic`, `bit`, `int`, ...)
    Variable,
}

/// Port direction as declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PortType {
    #[default]
    NotAPort,
    Input,
    Output,
    Inout,
    Ref,
}

/// Element value type of a declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    /// 4-state logic
    Logic,
    /// 2-state bit
    Bool,
    Real,
    String,
}

/// `(* key = value *)` attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub key: Symbol,
    pub value: Option<ExprId>,
    pub span: FileSpan,
}

/// Explicit data type attached to a declaration
#[derive(Debug, Clone, PartialEq)]
pub enum TypeSpec {
    Struct(StructType),
    Enum(EnumType),
    PackedArray(PackedArrayType),
    /// Plain atom type, only meaningful here as a packed-array base
    Atom(AtomType),
}

impl TypeSpec {
    #[must_use]
    pub fn span(&self) -> FileSpan {
        match self {
            Self::Struct(ty) => ty.span,
            Self::Enum(ty) => ty.span,
            Self::PackedArray(ty) => ty.span,
            Self::Atom(ty) => ty.span,
        }
    }

    /// Human readable name of the kind of type, for diagnostics
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Struct(_) => "struct",
            Self::Enum(_) => "enum",
            Self::PackedArray(_) => "packed array",
            Self::Atom(_) => "atom",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub packed: bool,
    pub members: Vec<StructMember>,
    pub span: FileSpan,
}

/// One member line of a struct; `logic [3:0] a, b;` declares two names
#[derive(Debug, Clone, PartialEq)]
pub struct StructMember {
    pub ty: VarType,
    pub range: Vec<DeclRange>,
    pub names: Vec<Symbol>,
    pub span: FileSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub names: Vec<EnumName>,
    pub span: FileSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumName {
    pub name: Symbol,
    pub value: Option<ExprId>,
    pub span: FileSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackedArrayType {
    pub dims: Vec<DeclRange>,
    pub base: Box<TypeSpec>,
    pub span: FileSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtomType {
    pub ty: VarType,
    pub signed: bool,
    pub span: FileSpan,
}

/// A declared net, variable or port
///
/// The parser merges every declaration site of one name (`input a;` plus
/// `wire [3:0] a;`) into a single `Wire`, keeping the port and the net ranges
/// apart so elaboration can check them against each other.
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    pub name: Symbol,
    pub net_type: NetType,
    pub port_type: PortType,
    /// `None` when no data type was written
    pub data_type: Option<VarType>,
    /// Range from the port declaration; `Some(vec![])` is a scalar port
    pub port_range: Option<Vec<DeclRange>>,
    /// Range from the net/variable declaration; `Some(vec![])` is a scalar net
    pub net_range: Option<Vec<DeclRange>>,
    pub unpacked: Vec<DeclRange>,
    pub type_spec: Option<TypeSpec>,
    pub signed: bool,
    pub is_int: bool,
    pub scalar: bool,
    pub discipline: Option<Symbol>,
    pub attributes: Vec<Attribute>,
    /// Errors the parser already reported against this declaration
    pub parse_errors: u32,
    pub span: FileSpan,
}

impl Wire {
    #[must_use]
    pub fn new(name: Symbol, net_type: NetType, span: FileSpan) -> Self {
        Self {
            name,
            net_type,
            port_type: PortType::NotAPort,
            data_type: None,
            port_range: None,
            net_range: None,
            unpacked: Vec::new(),
            type_spec: None,
            signed: false,
            is_int: false,
            scalar: false,
            discipline: None,
            attributes: Vec::new(),
            parse_errors: 0,
            span,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port_type: PortType) -> Self {
        self.port_type = port_type;
        self
    }

    #[must_use]
    pub fn with_port_range(mut self, range: Vec<DeclRange>) -> Self {
        self.port_range = Some(range);
        self
    }

    #[must_use]
    pub fn with_net_range(mut self, range: Vec<DeclRange>) -> Self {
        self.net_range = Some(range);
        self
    }

    #[must_use]
    pub fn with_unpacked(mut self, unpacked: Vec<DeclRange>) -> Self {
        self.unpacked = unpacked;
        self
    }

    #[must_use]
    pub fn with_data_type(mut self, data_type: VarType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    #[must_use]
    pub fn with_type_spec(mut self, type_spec: TypeSpec) -> Self {
        self.type_spec = Some(type_spec);
        self
    }

    #[must_use]
    pub fn with_signed(mut self, signed: bool) -> Self {
        self.signed = signed;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn is_port(&self) -> bool {
        self.port_type != PortType::NotAPort
    }
}
