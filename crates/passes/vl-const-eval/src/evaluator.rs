//! Const expression evaluator

use crate::{ConstError, ConstValue};
use vl_arena::Arena;
use vl_netlist::{Design, ScopeId};
use vl_pform::{BinaryOp, Expr, ExprId, UnaryOp};
use vl_span::FileSpan;

/// Const expression evaluator
///
/// Folds pform expressions into values. Parameters are looked up in the
/// design starting at the scope being elaborated and walking outwards, so the
/// evaluator itself holds no state beyond the expression arena.
#[derive(Debug, Clone, Copy)]
pub struct ConstEvaluator<'pf> {
    exprs: &'pf Arena<Expr>,
}

impl<'pf> ConstEvaluator<'pf> {
    /// Creates an evaluator over the pform expression arena
    #[must_use]
    pub fn new(exprs: &'pf Arena<Expr>) -> Self {
        Self { exprs }
    }

    /// Evaluates `expr` in the context of `scope`
    ///
    /// # Errors
    ///
    /// Returns `ConstError` if:
    /// - The expression refers to something other than a parameter
    /// - Division by zero occurs
    /// - Integer overflow occurs
    /// - An operator is applied to operands it does not accept
    pub fn eval(
        &self,
        design: &Design,
        scope: ScopeId,
        expr: ExprId,
    ) -> Result<ConstValue, ConstError> {
        match &self.exprs[expr] {
            Expr::Number { value, .. } => Ok(ConstValue::Int(*value)),
            Expr::Real { value, .. } => Ok(ConstValue::Real(*value)),
            Expr::Str { value, .. } => Ok(ConstValue::Str(value.clone())),

            Expr::Ident { name, span } => design
                .find_parameter(scope, *name)
                .map(|param| ConstValue::from(&param.value))
                .ok_or(ConstError::NonConstant { span: *span }),

            Expr::Binary {
                op,
                left,
                right,
                span,
            } => {
                let left_val = self.eval(design, scope, *left)?;
                // && and || short-circuit, so `0 && x` is constant
                match (op, left_val.is_true()) {
                    (BinaryOp::LogicalAnd, Some(false)) => return Ok(ConstValue::Int(0)),
                    (BinaryOp::LogicalOr, Some(true)) => return Ok(ConstValue::Int(1)),
                    _ => {}
                }
                let right_val = self.eval(design, scope, *right)?;
                eval_binary_op(*op, &left_val, &right_val, *span)
            }

            Expr::Unary { op, operand, span } => {
                let operand_val = self.eval(design, scope, *operand)?;
                eval_unary_op(*op, &operand_val, *span)
            }

            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
                span,
            } => {
                let cond_val = self.eval(design, scope, *condition)?;
                let cond = cond_val
                    .is_true()
                    .ok_or_else(|| ConstError::InvalidOperation {
                        operation: format!("{} ? :", cond_val.kind_name()),
                        span: *span,
                    })?;
                self.eval(design, scope, if cond { *then_expr } else { *else_expr })
            }

            Expr::Call { name, args, span } => {
                if design.interner().resolve(name) != "$clog2" {
                    return Err(ConstError::NonConstant { span: *span });
                }
                let [arg] = args.as_slice() else {
                    return Err(ConstError::InvalidOperation {
                        operation: format!("$clog2 with {} arguments", args.len()),
                        span: *span,
                    });
                };
                let value = self.eval_long(design, scope, *arg)?;
                Ok(ConstValue::Int(clog2(value)))
            }
        }
    }

    /// Evaluates `expr` and converts the result to an integer
    ///
    /// # Errors
    ///
    /// As [`ConstEvaluator::eval`]; a string result is not constant.
    pub fn eval_long(
        &self,
        design: &Design,
        scope: ScopeId,
        expr: ExprId,
    ) -> Result<i64, ConstError> {
        let value = self.eval(design, scope, expr)?;
        value.as_long().ok_or(ConstError::NonConstant {
            span: self.exprs[expr].span(),
        })
    }
}

/// Ceiling of log2, with `$clog2(0) == 0`
fn clog2(value: i64) -> i64 {
    if value <= 1 {
        0
    } else {
        i64::from(64 - (value - 1).leading_zeros())
    }
}

fn bool_value(value: bool) -> ConstValue {
    ConstValue::Int(i64::from(value))
}

/// Evaluates a binary operation
#[allow(clippy::too_many_lines, reason = "Comprehensive operator handling required")]
fn eval_binary_op(
    op: BinaryOp,
    left: &ConstValue,
    right: &ConstValue,
    span: FileSpan,
) -> Result<ConstValue, ConstError> {
    let invalid = || ConstError::InvalidOperation {
        operation: format!("{} {} {}", left.kind_name(), op.as_str(), right.kind_name()),
        span,
    };
    let overflow = ConstError::Overflow { span };

    match (left, right) {
        (ConstValue::Int(left_val), ConstValue::Int(right_val)) => {
            let (left_val, right_val) = (*left_val, *right_val);
            match op {
                BinaryOp::Add => left_val.checked_add(right_val).map(ConstValue::Int).ok_or(overflow),
                BinaryOp::Sub => left_val.checked_sub(right_val).map(ConstValue::Int).ok_or(overflow),
                BinaryOp::Mul => left_val.checked_mul(right_val).map(ConstValue::Int).ok_or(overflow),
                BinaryOp::Div | BinaryOp::Mod if right_val == 0 => {
                    Err(ConstError::DivisionByZero { span })
                }
                BinaryOp::Div => left_val.checked_div(right_val).map(ConstValue::Int).ok_or(overflow),
                BinaryOp::Mod => left_val.checked_rem(right_val).map(ConstValue::Int).ok_or(overflow),
                BinaryOp::Pow => int_pow(left_val, right_val, span),
                BinaryOp::Shl | BinaryOp::Shr => {
                    let amount = u32::try_from(right_val).map_err(|_| invalid())?;
                    if amount >= 64 {
                        return Ok(ConstValue::Int(0));
                    }
                    // >> is a logical shift
                    #[allow(clippy::cast_sign_loss, clippy::cast_possible_wrap, reason = "bit reinterpretation")]
                    let shifted = if op == BinaryOp::Shl {
                        left_val << amount
                    } else {
                        ((left_val as u64) >> amount) as i64
                    };
                    Ok(ConstValue::Int(shifted))
                }
                BinaryOp::BitAnd => Ok(ConstValue::Int(left_val & right_val)),
                BinaryOp::BitOr => Ok(ConstValue::Int(left_val | right_val)),
                BinaryOp::BitXor => Ok(ConstValue::Int(left_val ^ right_val)),
                BinaryOp::LogicalAnd => Ok(bool_value(left_val != 0 && right_val != 0)),
                BinaryOp::LogicalOr => Ok(bool_value(left_val != 0 || right_val != 0)),
                BinaryOp::Eq => Ok(bool_value(left_val == right_val)),
                BinaryOp::Ne => Ok(bool_value(left_val != right_val)),
                BinaryOp::Lt => Ok(bool_value(left_val < right_val)),
                BinaryOp::Le => Ok(bool_value(left_val <= right_val)),
                BinaryOp::Gt => Ok(bool_value(left_val > right_val)),
                BinaryOp::Ge => Ok(bool_value(left_val >= right_val)),
            }
        }

        (ConstValue::Str(left_val), ConstValue::Str(right_val)) => match op {
            BinaryOp::Eq => Ok(bool_value(left_val == right_val)),
            BinaryOp::Ne => Ok(bool_value(left_val != right_val)),
            _ => Err(invalid()),
        },

        // Mixed integer and real operands promote to real
        _ => {
            let (Some(left_val), Some(right_val)) = (left.as_real(), right.as_real()) else {
                return Err(invalid());
            };
            match op {
                BinaryOp::Add => Ok(ConstValue::Real(left_val + right_val)),
                BinaryOp::Sub => Ok(ConstValue::Real(left_val - right_val)),
                BinaryOp::Mul => Ok(ConstValue::Real(left_val * right_val)),
                BinaryOp::Div if right_val == 0.0 => Err(ConstError::DivisionByZero { span }),
                BinaryOp::Div => Ok(ConstValue::Real(left_val / right_val)),
                BinaryOp::Pow => Ok(ConstValue::Real(left_val.powf(right_val))),
                BinaryOp::LogicalAnd => Ok(bool_value(left_val != 0.0 && right_val != 0.0)),
                BinaryOp::LogicalOr => Ok(bool_value(left_val != 0.0 || right_val != 0.0)),
                BinaryOp::Eq => Ok(bool_value(left_val == right_val)),
                BinaryOp::Ne => Ok(bool_value(left_val != right_val)),
                BinaryOp::Lt => Ok(bool_value(left_val < right_val)),
                BinaryOp::Le => Ok(bool_value(left_val <= right_val)),
                BinaryOp::Gt => Ok(bool_value(left_val > right_val)),
                BinaryOp::Ge => Ok(bool_value(left_val >= right_val)),
                BinaryOp::Mod
                | BinaryOp::Shl
                | BinaryOp::Shr
                | BinaryOp::BitAnd
                | BinaryOp::BitOr
                | BinaryOp::BitXor => Err(invalid()),
            }
        }
    }
}

/// Integer `**`; a negative exponent truncates towards zero
fn int_pow(base: i64, exp: i64, span: FileSpan) -> Result<ConstValue, ConstError> {
    if exp < 0 {
        return match base {
            0 => Err(ConstError::DivisionByZero { span }),
            1 => Ok(ConstValue::Int(1)),
            -1 => Ok(ConstValue::Int(if exp % 2 == 0 { 1 } else { -1 })),
            _ => Ok(ConstValue::Int(0)),
        };
    }
    u32::try_from(exp)
        .ok()
        .and_then(|exp| base.checked_pow(exp))
        .map(ConstValue::Int)
        .ok_or(ConstError::Overflow { span })
}

/// Evaluates a unary operation
fn eval_unary_op(op: UnaryOp, operand: &ConstValue, span: FileSpan) -> Result<ConstValue, ConstError> {
    match (op, operand) {
        (UnaryOp::Plus, ConstValue::Int(_) | ConstValue::Real(_)) => Ok(operand.clone()),
        (UnaryOp::Neg, ConstValue::Int(value)) => value
            .checked_neg()
            .map(ConstValue::Int)
            .ok_or(ConstError::Overflow { span }),
        (UnaryOp::Neg, ConstValue::Real(value)) => Ok(ConstValue::Real(-value)),
        (UnaryOp::BitNot, ConstValue::Int(value)) => Ok(ConstValue::Int(!value)),
        (UnaryOp::LogicalNot, ConstValue::Int(_) | ConstValue::Real(_)) => {
            Ok(bool_value(operand.is_true() == Some(false)))
        }
        _ => Err(ConstError::InvalidOperation {
            operation: format!("{}{}", op.as_str(), operand.kind_name()),
            span,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vl_intern::Interner;
    use vl_netlist::{ParamValue, ScopeKind};
    use vl_pform::Pform;

    struct Fixture {
        interner: Interner,
        pform: Pform,
        design: Design,
        top: ScopeId,
    }

    fn fixture() -> Fixture {
        let interner = Interner::new();
        let mut design = Design::new(interner.clone());
        let name = interner.intern("top");
        let top = design.add_root(name, name, FileSpan::detached());
        Fixture {
            interner,
            pform: Pform::new(),
            design,
            top,
        }
    }

    impl Fixture {
        fn num(&mut self, value: i64) -> ExprId {
            self.pform.alloc_expr(Expr::Number {
                value,
                span: FileSpan::detached(),
            })
        }

        fn ident(&mut self, name: &str) -> ExprId {
            let name = self.interner.intern(name);
            self.pform.alloc_expr(Expr::Ident {
                name,
                span: FileSpan::detached(),
            })
        }

        fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
            self.pform.alloc_expr(Expr::Binary {
                op,
                left,
                right,
                span: FileSpan::detached(),
            })
        }

        fn eval(&self, expr: ExprId) -> Result<ConstValue, ConstError> {
            ConstEvaluator::new(&self.pform.exprs).eval(&self.design, self.top, expr)
        }
    }

    #[test]
    fn test_width_minus_one() {
        let mut fx = fixture();
        let width = fx.interner.intern("WIDTH");
        fx.design
            .add_parameter(fx.top, width, ParamValue::Int(8), FileSpan::detached());
        let ident = fx.ident("WIDTH");
        let one = fx.num(1);
        let expr = fx.binary(BinaryOp::Sub, ident, one);
        assert_eq!(fx.eval(expr), Ok(ConstValue::Int(7)));
    }

    #[test]
    fn test_parameter_from_enclosing_scope() {
        let mut fx = fixture();
        let depth = fx.interner.intern("DEPTH");
        fx.design
            .add_parameter(fx.top, depth, ParamValue::Int(16), FileSpan::detached());
        let inner = fx.design.add_child(
            fx.top,
            fx.interner.intern("blk"),
            ScopeKind::Block,
            FileSpan::detached(),
        );
        let expr = fx.ident("DEPTH");
        let value = ConstEvaluator::new(&fx.pform.exprs).eval_long(&fx.design, inner, expr);
        assert_eq!(value, Ok(16));
    }

    #[test]
    fn test_unknown_identifier_is_not_constant() {
        let mut fx = fixture();
        let expr = fx.ident("sig");
        assert!(matches!(fx.eval(expr), Err(ConstError::NonConstant { .. })));
    }

    #[test]
    fn test_division_by_zero() {
        let mut fx = fixture();
        let four = fx.num(4);
        let zero = fx.num(0);
        let expr = fx.binary(BinaryOp::Div, four, zero);
        assert!(matches!(fx.eval(expr), Err(ConstError::DivisionByZero { .. })));
    }

    #[test]
    fn test_comparison_yields_bit() {
        let mut fx = fixture();
        let three = fx.num(3);
        let five = fx.num(5);
        let expr = fx.binary(BinaryOp::Lt, three, five);
        assert_eq!(fx.eval(expr), Ok(ConstValue::Int(1)));
    }

    #[test]
    fn test_logical_and_short_circuits() {
        let mut fx = fixture();
        let zero = fx.num(0);
        let unknown = fx.ident("sig");
        let expr = fx.binary(BinaryOp::LogicalAnd, zero, unknown);
        assert_eq!(fx.eval(expr), Ok(ConstValue::Int(0)));
    }

    #[test]
    fn test_ternary_and_clog2() {
        let mut fx = fixture();
        let one = fx.num(1);
        let sixteen = fx.num(16);
        let seventeen = fx.num(17);
        let clog2_name = fx.interner.intern("$clog2");
        let call = fx.pform.alloc_expr(Expr::Call {
            name: clog2_name,
            args: vec![seventeen],
            span: FileSpan::detached(),
        });
        let expr = fx.pform.alloc_expr(Expr::Ternary {
            condition: one,
            then_expr: call,
            else_expr: sixteen,
            span: FileSpan::detached(),
        });
        assert_eq!(fx.eval(expr), Ok(ConstValue::Int(5)));
        assert_eq!(clog2(16), 4);
        assert_eq!(clog2(1), 0);
        assert_eq!(clog2(0), 0);
    }

    #[test]
    fn test_mixed_operands_promote_to_real() {
        let mut fx = fixture();
        let two = fx.num(2);
        let half = fx.pform.alloc_expr(Expr::Real {
            value: 0.5,
            span: FileSpan::detached(),
        });
        let expr = fx.binary(BinaryOp::Mul, two, half);
        assert_eq!(fx.eval(expr), Ok(ConstValue::Real(1.0)));
    }

    #[test]
    fn test_negative_shift_is_invalid() {
        let mut fx = fixture();
        let one = fx.num(1);
        let minus = fx.num(-1);
        let expr = fx.binary(BinaryOp::Shl, one, minus);
        assert!(matches!(fx.eval(expr), Err(ConstError::InvalidOperation { .. })));
    }
}
