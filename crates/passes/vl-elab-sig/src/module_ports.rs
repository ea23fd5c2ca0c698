//! Module port header checks

use crate::context::Outcome;
use crate::error::ElabError;
use crate::walker::Elaborator;
use vl_netlist::{PortDirection, ScopeId};
use vl_pform::{Module, PortRef};

impl<'ctx> Elaborator<'ctx> {
    /// Checks every name in the port header against the module's signals
    ///
    /// Creates nothing. A name whose declaration was dropped is skipped.
    pub(crate) fn validate_module_ports(&mut self, scope: ScopeId, module: &Module) -> Outcome {
        let before = self.ctx.error_count();

        for (index, port) in module.ports.iter().enumerate() {
            let Some(port) = port else {
                continue;
            };
            for port_ref in &port.refs {
                self.validate_port_ref(scope, module, index + 1, port_ref);
            }
        }

        self.ctx.outcome_since(before)
    }

    fn validate_port_ref(&mut self, scope: ScopeId, module: &Module, position: usize, port_ref: &PortRef) {
        if port_ref.path.len() != 1 {
            let path = port_ref
                .path
                .iter()
                .map(|part| self.name(*part))
                .collect::<Vec<_>>()
                .join(".");
            self.ctx.report(ElabError::HierarchicalPort {
                path,
                module: self.name(module.name),
                span: port_ref.span,
            });
        }
        let Some(name) = port_ref.tail() else {
            return;
        };

        if !module.wires.contains_key(&name) {
            self.ctx.report(ElabError::UndeclaredPort {
                name: self.name(name),
                position,
                module: self.name(module.name),
                span: port_ref.span,
            });
            return;
        }

        let Some(signal) = self.design.find_signal(scope, name) else {
            return;
        };
        if self.design.signal(signal).port == PortDirection::NotAPort {
            self.ctx.report(ElabError::MissingPortDirection {
                name: self.name(name),
                position,
                module: self.name(module.name),
                span: port_ref.span,
            });
        }
    }
}
