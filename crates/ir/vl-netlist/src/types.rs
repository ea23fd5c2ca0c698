//! Bit ranges and composite types

use crate::signal::DataType;
use vl_arena::Idx;
use vl_intern::Symbol;
use std::fmt;

pub type CompositeId = Idx<CompositeType>;

/// An elaborated `[msb:lsb]` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetRange {
    pub msb: i64,
    pub lsb: i64,
}

impl NetRange {
    #[must_use]
    pub fn new(msb: i64, lsb: i64) -> Self {
        Self { msb, lsb }
    }

    /// `[width-1:0]`
    #[must_use]
    pub fn with_width(width: u64) -> Self {
        Self::new(i64::try_from(width.saturating_sub(1)).unwrap_or(i64::MAX), 0)
    }

    /// Number of bits in either direction; `None` if it does not fit in a `u64`
    #[must_use]
    pub fn width(&self) -> Option<u64> {
        self.msb.abs_diff(self.lsb).checked_add(1)
    }
}

impl fmt::Display for NetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.msb, self.lsb)
    }
}

/// Total bit width of a list of packed dimensions; an empty list is one bit
///
/// `None` when the product overflows.
#[must_use]
pub fn ranges_width(dims: &[NetRange]) -> Option<u64> {
    dims.iter()
        .try_fold(1_u64, |total, dim| total.checked_mul(dim.width()?))
}

/// Renders dimensions as written, e.g. `[7:0][3:0]`
#[must_use]
pub fn format_ranges(dims: &[NetRange]) -> String {
    dims.iter().map(ToString::to_string).collect()
}

/// A resolved type shared by signals
///
/// Composite types are immutable once allocated in the design.
#[derive(Debug, Clone, PartialEq)]
pub enum CompositeType {
    Struct(StructType),
    Enum(EnumType),
    PackedArray(PackedArrayType),
    DynamicArray(DynamicArrayType),
}

impl CompositeType {
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Struct(_) => "struct",
            Self::Enum(_) => "enum",
            Self::PackedArray(_) => "packed array",
            Self::DynamicArray(_) => "dynamic array",
        }
    }

    #[must_use]
    pub fn as_struct(&self) -> Option<&StructType> {
        match self {
            Self::Struct(ty) => Some(ty),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_dynamic_array(&self) -> Option<&DynamicArrayType> {
        match self {
            Self::DynamicArray(ty) => Some(ty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub packed: bool,
    pub members: Vec<StructMember>,
}

impl StructType {
    /// Sum of the member widths
    ///
    /// Unpacked structs have no packed width, and neither does a struct whose
    /// width overflows.
    #[must_use]
    pub fn packed_width(&self) -> Option<u64> {
        if !self.packed {
            return None;
        }
        self.members
            .iter()
            .try_fold(0_u64, |total, member| total.checked_add(member.width()?))
    }

    #[must_use]
    pub fn member(&self, name: Symbol) -> Option<&StructMember> {
        self.members.iter().find(|member| member.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructMember {
    pub name: Symbol,
    pub data_type: DataType,
    pub packed_dims: Vec<NetRange>,
}

impl StructMember {
    #[must_use]
    pub fn width(&self) -> Option<u64> {
        ranges_width(&self.packed_dims)
    }
}

/// Enumeration registered by the type declaration pass
#[derive(Debug, Clone, PartialEq)]
pub struct EnumType {
    pub base: DataType,
    pub signed: bool,
    /// Width of the backing vector
    pub width: u64,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: Symbol,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PackedArrayType {
    pub dims: Vec<NetRange>,
    pub element: CompositeId,
}

/// `T name[]`: the packed shape moves into the element
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicArrayType {
    pub element_dims: Vec<NetRange>,
    pub element_type: DataType,
    pub element_width: u64,
}
