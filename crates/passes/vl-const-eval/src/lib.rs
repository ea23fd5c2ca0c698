//! Compile-time constant folding
//!
//! Reduces the expressions that appear in declarations to values:
//! - Range bounds: `wire [WIDTH-1:0] bus;`
//! - Array dimensions: `reg [7:0] mem [0:DEPTH-1];`
//! - Attribute values: `(* keep = 1 *)`
//!
//! Identifiers resolve to parameters visible from the scope being
//! elaborated. Anything that depends on run-time state is not constant.

mod error;
mod evaluator;
mod value;

pub use error::ConstError;
pub use evaluator::ConstEvaluator;
pub use value::ConstValue;
