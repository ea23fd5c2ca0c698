//! Constant-expression subset of the pform

use vl_arena::Idx;
use vl_intern::Symbol;
use vl_span::FileSpan;

pub type ExprId = Idx<Expr>;

/// An expression as written in a range, index, parameter or attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Sized or unsized integer literal
    Number { value: i64, span: FileSpan },
    /// Real literal
    Real { value: f64, span: FileSpan },
    /// String literal
    Str { value: String, span: FileSpan },
    /// Reference to a parameter, genvar or signal
    Ident { name: Symbol, span: FileSpan },
    /// Binary operation
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
        span: FileSpan,
    },
    /// Unary operation
    Unary {
        op: UnaryOp,
        operand: ExprId,
        span: FileSpan,
    },
    /// `cond ? a : b`
    Ternary {
        condition: ExprId,
        then_expr: ExprId,
        else_expr: ExprId,
        span: FileSpan,
    },
    /// System or user function call
    Call {
        name: Symbol,
        args: Vec<ExprId>,
        span: FileSpan,
    },
}

impl Expr {
    #[must_use]
    pub fn span(&self) -> FileSpan {
        match self {
            Self::Number { span, .. }
            | Self::Real { span, .. }
            | Self::Str { span, .. }
            | Self::Ident { span, .. }
            | Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::Ternary { span, .. }
            | Self::Call { span, .. } => *span,
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    LogicalAnd,
    LogicalOr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "**",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Plus,
    BitNot,
    LogicalNot,
}

impl UnaryOp {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::BitNot => "~",
            Self::LogicalNot => "!",
        }
    }
}
