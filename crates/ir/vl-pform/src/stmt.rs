//! Behavioural statements
//!
//! Only the shape needed to find nested declaration scopes is kept; leaf
//! statements collapse into [`Stmt::Other`].

use crate::decl::Wire;
use crate::FxIndexMap;
use vl_intern::Symbol;
use vl_span::FileSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessKind {
    Initial,
    Always,
    Final,
}

/// `initial`, `always` or `final` process
#[derive(Debug, Clone, PartialEq)]
pub struct Process {
    pub kind: ProcessKind,
    pub body: Stmt,
    pub span: FileSpan,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// `begin ... end`
    Sequential,
    /// `fork ... join`
    Parallel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseItem {
    pub stmt: Option<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Block; a named block owns a scope and may declare wires
    Block {
        name: Option<Symbol>,
        kind: BlockKind,
        wires: FxIndexMap<Symbol, Wire>,
        stmts: Vec<Stmt>,
        span: FileSpan,
    },
    Case {
        items: Vec<CaseItem>,
        span: FileSpan,
    },
    Condit {
        then_stmt: Option<Box<Stmt>>,
        else_stmt: Option<Box<Stmt>>,
        span: FileSpan,
    },
    Delay {
        body: Option<Box<Stmt>>,
        span: FileSpan,
    },
    EventWait {
        body: Option<Box<Stmt>>,
        span: FileSpan,
    },
    Forever {
        body: Option<Box<Stmt>>,
        span: FileSpan,
    },
    For {
        body: Option<Box<Stmt>>,
        span: FileSpan,
    },
    Repeat {
        body: Option<Box<Stmt>>,
        span: FileSpan,
    },
    While {
        body: Option<Box<Stmt>>,
        span: FileSpan,
    },
    /// Assignments, calls and every other leaf statement
    Other { span: FileSpan },
}

impl Stmt {
    /// Anonymous sequential block
    #[must_use]
    pub fn block(stmts: Vec<Stmt>, span: FileSpan) -> Self {
        Self::Block {
            name: None,
            kind: BlockKind::Sequential,
            wires: FxIndexMap::default(),
            stmts,
            span,
        }
    }

    /// Named sequential block declaring `wires`
    #[must_use]
    pub fn named_block(name: Symbol, wires: Vec<Wire>, stmts: Vec<Stmt>, span: FileSpan) -> Self {
        Self::Block {
            name: Some(name),
            kind: BlockKind::Sequential,
            wires: wires.into_iter().map(|wire| (wire.name, wire)).collect(),
            stmts,
            span,
        }
    }

    #[must_use]
    pub fn span(&self) -> FileSpan {
        match self {
            Self::Block { span, .. }
            | Self::Case { span, .. }
            | Self::Condit { span, .. }
            | Self::Delay { span, .. }
            | Self::EventWait { span, .. }
            | Self::Forever { span, .. }
            | Self::For { span, .. }
            | Self::Repeat { span, .. }
            | Self::While { span, .. }
            | Self::Other { span } => *span,
        }
    }
}
