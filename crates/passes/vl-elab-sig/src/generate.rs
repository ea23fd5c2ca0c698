//! Generate scheme dispatch
//!
//! The scope pass instantiates zero or more scopes per generate scheme and
//! records them against the scheme's [`GenerateId`](vl_pform::GenerateId).
//! Only instantiated scopes carry signals; a scheme that produced nothing is
//! not visited at all.

use crate::context::Outcome;
use crate::walker::Elaborator;
use tracing::debug;
use vl_netlist::ScopeId;
use vl_pform::{Generate, GenerateScheme};

impl<'ctx> Elaborator<'ctx> {
    pub(crate) fn elaborate_generate(&mut self, container: ScopeId, generate: &'ctx Generate) -> Outcome {
        if generate.direct_nested {
            return self.elaborate_direct_nested(container, generate);
        }

        if generate.scheme == GenerateScheme::Case {
            debug!(scope = %self.scope_path(container), "generate case");
            // The case construct holds no scope of its own; only the chosen
            // arm was instantiated.
            let mut outcome = Outcome::Clean;
            for arm in &generate.generates {
                if self.was_instantiated(arm) {
                    outcome = outcome.and(self.elaborate_generate(container, arm));
                }
            }
            return outcome;
        }

        let scopes = self.design.generate_scopes(generate.id).to_vec();
        let mut outcome = Outcome::Clean;
        for scope in scopes {
            if self.design.scope(scope).parent() != Some(container) {
                continue;
            }
            debug!(
                scope = %self.scope_path(scope),
                generate = generate.id.0,
                "elaborating generate scope"
            );
            outcome = outcome.and(self.elaborate_generate_scope(scope, generate));
        }
        outcome
    }

    /// An unconditional scheme merged into its parent has only sub-schemes;
    /// exactly one of them should have been instantiated
    fn elaborate_direct_nested(&mut self, container: ScopeId, generate: &'ctx Generate) -> Outcome {
        debug!(
            scope = %self.scope_path(container),
            scheme = ?generate.scheme,
            "direct nested generate"
        );

        let mut outcome = Outcome::Clean;
        for item in &generate.generates {
            if item.scheme == GenerateScheme::Case {
                for arm in &item.generates {
                    if self.was_instantiated(arm) {
                        outcome = outcome.and(self.elaborate_generate(container, arm));
                    }
                }
            } else if self.was_instantiated(item) {
                outcome = outcome.and(self.elaborate_generate(container, item));
            }
        }
        outcome
    }

    fn was_instantiated(&self, generate: &Generate) -> bool {
        generate.direct_nested || !self.design.generate_scopes(generate.id).is_empty()
    }

    /// Visits the contents of one instantiated generate scope
    fn elaborate_generate_scope(&mut self, scope: ScopeId, generate: &'ctx Generate) -> Outcome {
        let mut outcome = self.elaborate_wires(scope, &generate.wires);
        outcome = outcome.and(self.elaborate_functions(scope, &generate.functions));
        outcome = outcome.and(self.elaborate_tasks(scope, &generate.tasks));
        for nested in &generate.generates {
            outcome = outcome.and(self.elaborate_generate(scope, nested));
        }
        outcome = outcome.and(self.elaborate_gates(scope, &generate.gates));
        outcome.and(self.elaborate_behaviors(scope, &generate.behaviors))
    }
}
