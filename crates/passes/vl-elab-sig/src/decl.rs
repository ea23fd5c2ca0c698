//! Declaration elaborator
//!
//! Turns one pform [`Wire`] into a [`Signal`] of its scope. The parser has
//! already merged every declaration site of the name (`input a;` plus
//! `wire [3:0] a;`), so this is also where port and net ranges are checked
//! against each other.

use crate::context::Outcome;
use crate::error::ElabError;
use crate::types::data_type;
use crate::walker::Elaborator;
use std::mem;
use tracing::debug;
use vl_const_eval::ConstValue;
use vl_intern::Symbol;
use vl_netlist::{
    AttrValue, CompositeType, DataType, DynamicArrayType, LogicKind, LogicNode, NetKind, NetRange,
    PortDirection, ScopeId, ScopeKind, Signal, SignalId, SignalKind, Strength, format_ranges,
    ranges_width,
};
use vl_pform::{FxIndexMap, NetType, PortType, TypeSpec, Wire};

/// Signal kind, implicit-scalar flag and supply pull for a declared net type
///
/// Supply nets become plain wires driven by a pull node.
fn signal_kind(net_type: NetType) -> (SignalKind, bool, Option<LogicKind>) {
    let net = |kind| (SignalKind::Net(kind), false, None);
    match net_type {
        NetType::Implicit => (SignalKind::Net(NetKind::Wire), true, None),
        NetType::ImplicitReg => (SignalKind::Register, true, None),
        NetType::Wire => net(NetKind::Wire),
        NetType::Tri => net(NetKind::Tri),
        NetType::Tri0 => net(NetKind::Tri0),
        NetType::Tri1 => net(NetKind::Tri1),
        NetType::TriAnd => net(NetKind::TriAnd),
        NetType::TriOr => net(NetKind::TriOr),
        NetType::Wand => net(NetKind::Wand),
        NetType::Wor => net(NetKind::Wor),
        NetType::Uwire => net(NetKind::Uwire),
        NetType::Supply0 => (SignalKind::Net(NetKind::Wire), false, Some(LogicKind::Pulldown)),
        NetType::Supply1 => (SignalKind::Net(NetKind::Wire), false, Some(LogicKind::Pullup)),
        NetType::Reg => (SignalKind::Register, false, None),
        NetType::Variable => (SignalKind::Variable, false, None),
    }
}

fn port_direction(port_type: PortType) -> PortDirection {
    match port_type {
        PortType::NotAPort => PortDirection::NotAPort,
        PortType::Input => PortDirection::Input,
        PortType::Output => PortDirection::Output,
        PortType::Inout => PortDirection::InOut,
        PortType::Ref => PortDirection::Ref,
    }
}

impl<'ctx> Elaborator<'ctx> {
    /// Elaborates every wire of a scope, then checks how each new signal is
    /// used as a port
    pub(crate) fn elaborate_wires(
        &mut self,
        scope: ScopeId,
        wires: &FxIndexMap<Symbol, Wire>,
    ) -> Outcome {
        let mut outcome = Outcome::Clean;
        for wire in wires.values() {
            let before = self.ctx.error_count();
            if let Some(signal) = self.elaborate_wire(scope, wire) {
                self.check_port_usage(scope, wire, signal);
            }
            outcome = outcome.and(self.ctx.outcome_since(before));
        }
        outcome
    }

    /// Creates the signal for one declaration
    ///
    /// Returns `None` when the declaration is dropped; the reason has already
    /// been reported.
    pub(crate) fn elaborate_wire(&mut self, scope: ScopeId, wire: &Wire) -> Option<SignalId> {
        let (kind, mut implicit_scalar, pull) = signal_kind(wire.net_type);
        let name = self.name(wire.name);

        self.ctx.add_parse_errors(wire.parse_errors);
        self.check_collisions(scope, wire, &name);

        let mut packed = Vec::new();
        if wire.port_range.is_some() || wire.net_range.is_some() {
            packed = self.reconcile_ranges(scope, wire, &name, &mut implicit_scalar)?;
        }
        let Some(width) = ranges_width(&packed) else {
            self.ctx.report(ElabError::PackedWidthOverflow {
                name,
                range: format_ranges(&packed),
                span: wire.span,
            });
            return None;
        };

        let attributes = self.evaluate_attributes(scope, wire, &name);

        let element_type = wire.data_type.map_or(DataType::Logic, data_type);
        let (unpacked, dynamic) =
            self.evaluate_unpacked(scope, wire, &name, &mut packed, element_type, width)?;

        if element_type == DataType::Real && !packed.is_empty() {
            self.ctx.report(ElabError::RealVector {
                name,
                what: if kind == SignalKind::Register { "variable" } else { "net" },
                range: format_ranges(&packed),
                span: wire.span,
            });
            return None;
        }

        let (packed, unpacked, composite) = match (&wire.type_spec, dynamic) {
            (Some(TypeSpec::Struct(ty)), _) => {
                let id = self.resolve_struct(scope, wire.name, ty)?;
                (Vec::new(), Vec::new(), Some(id))
            }
            (Some(TypeSpec::Enum(ty)), _) => {
                let id = self.lookup_enum(scope, wire, ty)?;
                (packed, unpacked, Some(id))
            }
            (_, Some(array)) => {
                if !unpacked.is_empty() {
                    self.ctx.report(ElabError::MalformedType {
                        name,
                        message: "dynamic array with fixed unpacked dimensions",
                        span: wire.span,
                    });
                    return None;
                }
                let id = self.design.add_composite(CompositeType::DynamicArray(array));
                (Vec::new(), Vec::new(), Some(id))
            }
            (Some(TypeSpec::PackedArray(ty)), None) => {
                if !packed.is_empty() {
                    self.ctx.report(ElabError::MalformedType {
                        name,
                        message: "packed dimensions outside the packed array type",
                        span: wire.span,
                    });
                    return None;
                }
                let (id, dims) = self.resolve_packed_array(scope, wire.name, ty)?;
                (dims, unpacked, Some(id))
            }
            (Some(TypeSpec::Atom(_)) | None, None) => (packed, unpacked, None),
        };

        let mut signal = Signal::new(wire.name, scope, kind, wire.span);
        signal.port = port_direction(wire.port_type);
        signal.data_type = element_type;
        signal.packed = packed;
        signal.unpacked = unpacked;
        signal.composite = composite;
        signal.signed = wire.signed;
        signal.is_int = wire.is_int;
        signal.scalar = implicit_scalar || wire.scalar;
        signal.discipline = wire.discipline;
        signal.attributes = attributes;

        debug!(
            signal = %name,
            scope = %self.scope_path(scope),
            kind = ?signal.kind,
            packed = %format_ranges(&signal.packed),
            unpacked = %format_ranges(&signal.unpacked),
            "created signal"
        );
        let id = self.design.add_signal(signal);

        if let Some(pull) = pull {
            let node_name = self.design.local_symbol(scope);
            let node = self.design.add_logic(LogicNode {
                name: node_name,
                scope,
                kind: pull,
                width,
                drive0: Strength::Supply,
                drive1: Strength::Supply,
                output: None,
                span: wire.span,
            });
            self.design.connect(node, id);
            debug!(signal = %name, ?pull, "supply net driven by pull node");
        }

        Some(id)
    }

    /// A signal may not share its name with a child scope, genvar, parameter
    /// or named event. Each clash is reported separately.
    fn check_collisions(&mut self, scope: ScopeId, wire: &Wire, name: &str) {
        let owner = self.design.scope(scope);
        let mut others = Vec::new();
        if let Some(child) = owner.child(wire.name) {
            others.push(self.design.scope(child).kind().describe());
        }
        if owner.genvar(wire.name).is_some() {
            others.push("genvar");
        }
        if owner.parameter(wire.name).is_some() {
            others.push("parameter");
        }
        if owner.event(wire.name).is_some() {
            others.push("named event");
        }

        for other in others {
            self.ctx.report(ElabError::NameCollision {
                name: name.to_owned(),
                other,
                scope: self.scope_path(scope),
                span: wire.span,
            });
        }
    }

    /// Packed dimensions from the port and net declarations
    fn reconcile_ranges(
        &mut self,
        scope: ScopeId,
        wire: &Wire,
        name: &str,
        implicit_scalar: &mut bool,
    ) -> Option<Vec<NetRange>> {
        let port_dims = match wire.port_range.as_deref() {
            Some(ranges) if !ranges.is_empty() => {
                // An implicit port can still carry a range
                *implicit_scalar = false;
                self.evaluate_ranges(scope, wire.name, ranges)?
            }
            _ => Vec::new(),
        };
        let net_dims = match wire.net_range.as_deref() {
            Some(ranges) if !ranges.is_empty() => Some(self.evaluate_ranges(scope, wire.name, ranges)?),
            _ => None,
        };

        if let (Some(port_ranges), Some(net_ranges)) = (&wire.port_range, &wire.net_range) {
            let net_list = net_dims.as_deref().unwrap_or_default();
            if port_dims != net_list {
                let net_range = format_ranges(net_list);
                let port_range = format_ranges(&port_dims);
                if port_ranges.is_empty() {
                    if self.ctx.config().strict_port_ranges {
                        self.ctx.report(ElabError::StrictScalarPortVectorNet {
                            name: name.to_owned(),
                            net_range,
                            span: wire.span,
                        });
                        return None;
                    }
                    self.ctx.report(ElabError::ScalarPortVectorNet {
                        name: name.to_owned(),
                        net_range,
                        span: wire.span,
                    });
                } else if net_ranges.is_empty() {
                    self.ctx.report(ElabError::VectorPortScalarNet {
                        name: name.to_owned(),
                        port_range,
                        span: wire.span,
                    });
                    return None;
                } else {
                    self.ctx.report(ElabError::PortRangeMismatch {
                        name: name.to_owned(),
                        port_range,
                        net_range,
                        span: wire.span,
                    });
                    return None;
                }
            }
        }

        Some(net_dims.unwrap_or(port_dims))
    }

    /// Unpacked dimensions, plus the dynamic array a `[]` dimension makes
    ///
    /// The `[]` dimension takes over the packed dimensions collected so far as
    /// the element shape.
    fn evaluate_unpacked(
        &mut self,
        scope: ScopeId,
        wire: &Wire,
        name: &str,
        packed: &mut Vec<NetRange>,
        element_type: DataType,
        element_width: u64,
    ) -> Option<(Vec<NetRange>, Option<DynamicArrayType>)> {
        let mut unpacked = Vec::with_capacity(wire.unpacked.len());
        let mut dynamic = None;

        for range in &wire.unpacked {
            if dynamic.is_some() {
                self.ctx.report(ElabError::DynamicArrayOfArrays {
                    name: name.to_owned(),
                    span: wire.span,
                });
                return None;
            }
            if range.is_dynamic() {
                dynamic = Some(DynamicArrayType {
                    element_dims: mem::take(packed),
                    element_type,
                    element_width,
                });
                continue;
            }

            let (Some(msb), Some(lsb)) = (range.msb, range.lsb) else {
                self.ctx.report(ElabError::HalfOpenRange {
                    name: name.to_owned(),
                    span: wire.span,
                });
                return None;
            };
            let msb = self.eval.eval_long(self.design, scope, msb);
            let lsb = self.eval.eval_long(self.design, scope, lsb);
            let dim = if let (Ok(msb), Ok(lsb)) = (msb, lsb) {
                NetRange::new(msb, lsb)
            } else {
                self.ctx.report(ElabError::NonConstantArrayBound {
                    name: name.to_owned(),
                    span: wire.span,
                });
                NetRange::new(0, 0)
            };
            unpacked.push(dim);
        }

        Some((unpacked, dynamic))
    }

    fn evaluate_attributes(
        &mut self,
        scope: ScopeId,
        wire: &Wire,
        name: &str,
    ) -> Vec<(Symbol, AttrValue)> {
        let mut attributes = Vec::with_capacity(wire.attributes.len());
        for attribute in &wire.attributes {
            let value = match attribute.value {
                None => AttrValue::Flag,
                Some(expr) => match self.eval.eval(self.design, scope, expr) {
                    Ok(ConstValue::Int(value)) => AttrValue::Int(value),
                    Ok(ConstValue::Real(value)) => AttrValue::Real(value),
                    Ok(ConstValue::Str(value)) => AttrValue::Str(value),
                    Err(_) => {
                        self.ctx.report(ElabError::NonConstantAttribute {
                            key: self.name(attribute.key),
                            name: name.to_owned(),
                            span: attribute.span,
                        });
                        continue;
                    }
                },
            };
            attributes.push((attribute.key, value));
        }
        attributes
    }

    /// Checks a freshly created signal against the way its scope uses ports
    fn check_port_usage(&mut self, scope: ScopeId, wire: &Wire, id: SignalId) {
        let signal = self.design.signal(id);
        let (port, kind, element) = (signal.port, signal.kind, signal.data_type);

        if port == PortDirection::Ref {
            self.ctx.report(ElabError::RefPort {
                name: self.name(wire.name),
                span: wire.span,
            });
        }

        let ScopeKind::Module { module } = self.design.scope(scope).kind() else {
            return;
        };
        let direction = match port {
            PortDirection::Input => Some("input"),
            PortDirection::InOut => Some("inout"),
            _ => None,
        };
        if let Some(direction) = direction
            && kind == SignalKind::Register
        {
            self.ctx.report(ElabError::RegPort {
                name: self.name(wire.name),
                module: self.name(module),
                direction,
                span: wire.span,
            });
        }
        if port == PortDirection::InOut && element == DataType::Real {
            self.ctx.report(ElabError::RealInout {
                name: self.name(wire.name),
                module: self.name(module),
                span: wire.span,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_nets_become_wires() {
        assert_eq!(
            signal_kind(NetType::Supply1),
            (SignalKind::Net(NetKind::Wire), false, Some(LogicKind::Pullup))
        );
        assert_eq!(
            signal_kind(NetType::Supply0),
            (SignalKind::Net(NetKind::Wire), false, Some(LogicKind::Pulldown))
        );
    }

    #[test]
    fn test_implicit_types_are_scalar() {
        assert_eq!(signal_kind(NetType::Implicit), (SignalKind::Net(NetKind::Wire), true, None));
        assert_eq!(signal_kind(NetType::ImplicitReg), (SignalKind::Register, true, None));
        assert_eq!(signal_kind(NetType::Wand), (SignalKind::Net(NetKind::Wand), false, None));
    }

    #[test]
    fn test_port_direction_mapping() {
        assert_eq!(port_direction(PortType::Inout), PortDirection::InOut);
        assert_eq!(port_direction(PortType::NotAPort), PortDirection::NotAPort);
    }
}
