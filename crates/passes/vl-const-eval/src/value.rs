//! Const value representation

use vl_netlist::ParamValue;

/// A compile-time constant value
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    /// Integer, including sized literals
    Int(i64),
    /// Real number
    Real(f64),
    /// String literal
    Str(String),
}

impl ConstValue {
    /// Integer view of the value, rounding reals to the nearest integer
    #[must_use]
    #[allow(clippy::cast_possible_truncation, reason = "magnitude checked first")]
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Real(value)
                if value.is_finite() && value.abs() < 9.223_372_036_854_775e18 =>
            {
                Some(value.round() as i64)
            }
            Self::Real(_) | Self::Str(_) => None,
        }
    }

    /// Real view of a numeric value
    #[must_use]
    #[allow(clippy::cast_precision_loss, reason = "integer to real conversion")]
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Int(value) => Some(*value as f64),
            Self::Real(value) => Some(*value),
            Self::Str(_) => None,
        }
    }

    /// Whether the value is a real number
    #[must_use]
    pub fn is_real(&self) -> bool {
        matches!(self, Self::Real(_))
    }

    /// Truth value as used by `?:`, `&&` and `||`
    #[must_use]
    pub fn is_true(&self) -> Option<bool> {
        match self {
            Self::Int(value) => Some(*value != 0),
            Self::Real(value) => Some(*value != 0.0),
            Self::Str(_) => None,
        }
    }

    /// Short kind name for diagnostics
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Real(_) => "real",
            Self::Str(_) => "string",
        }
    }
}

impl From<&ParamValue> for ConstValue {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Int(value) => Self::Int(*value),
            ParamValue::Real(value) => Self::Real(*value),
            ParamValue::Str(value) => Self::Str(value.clone()),
        }
    }
}
