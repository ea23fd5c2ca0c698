//! Signal elaboration
//!
//! Runs after the scope pass has built the scope tree and before statements
//! are elaborated. For every scope it turns the declared wires of the matching
//! pform item into typed [`Signal`](vl_netlist::Signal)s, builds the composite
//! types they use, binds task and function ports, and checks declarations
//! against each other.
//!
//! The walk never stops at the first problem. Each diagnostic is collected in
//! the returned [`ElabReport`] and the netlist is completed as far as
//! possible; a declaration that cannot be resolved simply produces no signal.
//!
//! ```text
//! elaborate_signals
//!   └─ root module scope
//!        ├─ wires            (decl)
//!        ├─ port header      (module_ports)
//!        ├─ generate schemes (generate)
//!        ├─ module instances
//!        ├─ functions, tasks (ports)
//!        └─ behaviours       (named blocks)
//! ```

#![allow(missing_docs, reason = "diagnostic variants are described by their error messages")]

mod config;
mod context;
mod decl;
mod error;
mod generate;
mod module_ports;
mod ports;
mod types;
mod walker;

pub use config::ElabConfig;
pub use context::{ElabContext, ElabReport, Outcome};
pub use error::{ElabError, ErrorCategory, Severity, codespan_reporting};

use vl_netlist::Design;
use vl_pform::Pform;
use walker::Elaborator;

/// Elaborates the signals of every scope below the design roots
pub fn elaborate_signals(pform: &Pform, design: &mut Design, config: &ElabConfig) -> ElabReport {
    let mut elab = Elaborator::new(pform, design, config);
    let outcome = elab.elaborate_roots();
    elab.finish(outcome)
}
