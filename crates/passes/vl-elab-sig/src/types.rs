//! Type resolution
//!
//! Builds the composite types named by declarations. Structs and packed
//! arrays are created per declaration site; enumerations already exist in the
//! design and are only looked up.

use crate::error::ElabError;
use crate::walker::Elaborator;
use tracing::debug;
use vl_intern::Symbol;
use vl_netlist::{
    CompositeId, CompositeType, DataType, NetRange, PackedArrayType, ScopeId, StructMember,
    StructType, format_ranges, ranges_width,
};
use vl_pform::{self as pform, DeclRange, ExprId, TypeSpec, VarType, Wire};

pub(crate) fn data_type(ty: VarType) -> DataType {
    match ty {
        VarType::Logic => DataType::Logic,
        VarType::Bool => DataType::Bool,
        VarType::Real => DataType::Real,
        VarType::String => DataType::String,
    }
}

impl<'ctx> Elaborator<'ctx> {
    /// Evaluates a list of `[msb:lsb]` pairs
    ///
    /// Every non-constant bound is reported, then `None` is returned if there
    /// was any.
    pub(crate) fn evaluate_ranges(
        &mut self,
        scope: ScopeId,
        owner: Symbol,
        ranges: &[DeclRange],
    ) -> Option<Vec<NetRange>> {
        let mut dims = Vec::with_capacity(ranges.len());
        let mut bad_range = false;

        for range in ranges {
            let (Some(msb), Some(lsb)) = (range.msb, range.lsb) else {
                let span = range.msb.or(range.lsb).map_or_else(
                    || self.design.scope(scope).span(),
                    |bound| self.pform.expr_span(bound),
                );
                self.ctx.report(ElabError::HalfOpenRange {
                    name: self.name(owner),
                    span,
                });
                bad_range = true;
                continue;
            };
            let msb = self.evaluate_bound(scope, owner, msb, "MSB");
            let lsb = self.evaluate_bound(scope, owner, lsb, "LSB");
            match (msb, lsb) {
                (Some(msb), Some(lsb)) => dims.push(NetRange::new(msb, lsb)),
                _ => bad_range = true,
            }
        }

        (!bad_range).then_some(dims)
    }

    fn evaluate_bound(
        &mut self,
        scope: ScopeId,
        owner: Symbol,
        expr: ExprId,
        bound: &'static str,
    ) -> Option<i64> {
        match self.eval.eval_long(self.design, scope, expr) {
            Ok(value) => Some(value),
            Err(err) => {
                debug!(%err, "range bound is not constant");
                self.ctx.report(ElabError::NonConstantRange {
                    name: self.name(owner),
                    bound,
                    span: self.pform.expr_span(expr),
                });
                None
            }
        }
    }

    /// Builds a struct type; a member without a range is one bit wide
    pub(crate) fn resolve_struct(
        &mut self,
        scope: ScopeId,
        owner: Symbol,
        ty: &pform::StructType,
    ) -> Option<CompositeId> {
        let mut members = Vec::new();
        for member in &ty.members {
            let packed_dims = if member.range.is_empty() {
                vec![NetRange::new(0, 0)]
            } else {
                self.evaluate_ranges(scope, owner, &member.range)?
            };
            members.extend(member.names.iter().map(|name| StructMember {
                name: *name,
                data_type: data_type(member.ty),
                packed_dims: packed_dims.clone(),
            }));
        }

        let resolved = StructType {
            packed: ty.packed,
            members,
        };
        if resolved.packed && resolved.packed_width().is_none() {
            self.ctx.report(ElabError::PackedWidthOverflow {
                name: self.name(owner),
                range: "struct".to_owned(),
                span: ty.span,
            });
            return None;
        }
        debug!(
            owner = %self.name(owner),
            packed_width = ?resolved.packed_width(),
            "resolved struct type"
        );
        Some(self.design.add_composite(CompositeType::Struct(resolved)))
    }

    /// Builds a packed array typedef and returns its dimensions
    ///
    /// Only struct elements are supported.
    pub(crate) fn resolve_packed_array(
        &mut self,
        scope: ScopeId,
        owner: Symbol,
        ty: &pform::PackedArrayType,
    ) -> Option<(CompositeId, Vec<NetRange>)> {
        let dims = self.evaluate_ranges(scope, owner, &ty.dims)?;
        let element = match ty.base.as_ref() {
            TypeSpec::Struct(base) => self.resolve_struct(scope, owner, base)?,
            other => {
                self.ctx.report(ElabError::UnsupportedPackedArrayBase {
                    name: self.name(owner),
                    base: other.describe(),
                    span: other.span(),
                });
                return None;
            }
        };

        let too_wide = match (ranges_width(&dims), self.design.composite_width(element)) {
            (None, _) => true,
            (Some(count), Some(width)) => count.checked_mul(width).is_none(),
            (Some(_), None) => false,
        };
        if too_wide {
            self.ctx.report(ElabError::PackedWidthOverflow {
                name: self.name(owner),
                range: format_ranges(&dims),
                span: ty.span,
            });
            return None;
        }

        let id = self.design.add_composite(CompositeType::PackedArray(PackedArrayType {
            dims: dims.clone(),
            element,
        }));
        Some((id, dims))
    }

    /// Finds the enumeration a declaration refers to by its first value name
    pub(crate) fn lookup_enum(
        &mut self,
        scope: ScopeId,
        wire: &Wire,
        ty: &pform::EnumType,
    ) -> Option<CompositeId> {
        let Some(first) = ty.names.first() else {
            self.ctx.report(ElabError::MalformedType {
                name: self.name(wire.name),
                message: "enumeration without values",
                span: ty.span,
            });
            return None;
        };

        let found = self.design.enumeration_for_name(scope, first.name);
        if found.is_none() {
            self.ctx.report(ElabError::MissingEnum {
                name: self.name(wire.name),
                member: self.name(first.name),
                span: ty.span,
            });
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_mapping() {
        assert_eq!(data_type(VarType::Logic), DataType::Logic);
        assert_eq!(data_type(VarType::Bool), DataType::Bool);
        assert_eq!(data_type(VarType::Real), DataType::Real);
        assert_eq!(data_type(VarType::String), DataType::String);
    }
}
