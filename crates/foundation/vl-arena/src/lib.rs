//! Indexed arena storage for declaration and netlist nodes
//!
//! Re-exports `la-arena`, the arena rust-analyzer uses. Every handle in the
//! netlist (`ScopeId`, `SignalId`, ...) is an `Idx` into one of these arenas.

pub use la_arena::{Arena, ArenaMap, Idx};
