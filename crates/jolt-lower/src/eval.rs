//! Reference interpreter for lowered expressions.
//!
//! Executes plans exactly as an emitter would lay them out: operands left to right, each
//! followed by its conversions, short-circuited operands skipped. Used for constant folding and
//! for checking that a plan preserves the runtime behavior of the source expression.

use std::cmp::Ordering;

use jolt_types::{
    ClassHierarchy, ConversionStep, Conversions, PrimitiveKind, Span, TypeDescriptor,
    TypeHierarchy,
};
use thiserror::Error;

use crate::expr::{LoweredExpr, LoweredKind};
use crate::logical::FlowState;
use crate::plan::{NanBias, OperandDomain, Operation};
use crate::{BinaryOp, Const, TypeTestOutcome, Value};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    #[error("cannot unbox null to `{kind}`")]
    NullUnbox { kind: PrimitiveKind, span: Span },
    #[error("unbound local `{0}`")]
    UnboundLocal(String),
    #[error("unknown function `{0}`")]
    UnknownFunction(String),
    #[error("value `{value}` is not of type `{expected}`")]
    TypeConfusion {
        value: Value,
        expected: TypeDescriptor,
    },
    #[error("expression at {0:?} is not constant")]
    NotConstant(Span),
}

/// Supplies locals and performs calls.
pub trait Host {
    fn local(&self, name: &str) -> Option<Value>;

    fn call(&mut self, name: &str) -> Result<Value, EvalError>;
}

struct ConstantHost {
    span: Span,
}

impl Host for ConstantHost {
    fn local(&self, _name: &str) -> Option<Value> {
        None
    }

    fn call(&mut self, _name: &str) -> Result<Value, EvalError> {
        Err(EvalError::NotConstant(self.span))
    }
}

/// Evaluate `expr`. Runtime type tests consult `hierarchy`.
pub fn evaluate(
    expr: &LoweredExpr,
    host: &mut dyn Host,
    hierarchy: &dyn TypeHierarchy,
) -> Result<Value, EvalError> {
    Evaluator { host, hierarchy }.eval(expr)
}

/// The value of an expression built only from literals and `null`.
///
/// Locals and calls make the expression non-constant.
pub fn fold_constant(expr: &LoweredExpr) -> Result<Value, EvalError> {
    if let Some(span) = first_non_constant(expr) {
        return Err(EvalError::NotConstant(span));
    }
    let hierarchy = ClassHierarchy::new();
    let mut host = ConstantHost { span: expr.span };
    evaluate(expr, &mut host, &hierarchy)
}

fn first_non_constant(expr: &LoweredExpr) -> Option<Span> {
    match &expr.kind {
        LoweredKind::Literal(_) | LoweredKind::Null => None,
        LoweredKind::Local(_) | LoweredKind::Call(_) => Some(expr.span),
        LoweredKind::Binary { left, right, .. } | LoweredKind::Logical { left, right, .. } => {
            first_non_constant(left).or_else(|| first_non_constant(right))
        }
        LoweredKind::InstanceOf { expr, .. } => first_non_constant(expr),
        LoweredKind::Not { operand, .. } => first_non_constant(operand),
    }
}

struct Evaluator<'a> {
    host: &'a mut dyn Host,
    hierarchy: &'a dyn TypeHierarchy,
}

impl Evaluator<'_> {
    fn eval(&mut self, expr: &LoweredExpr) -> Result<Value, EvalError> {
        match &expr.kind {
            LoweredKind::Literal(value) => Ok(Value::Primitive(*value)),
            LoweredKind::Null => Ok(Value::Null),
            LoweredKind::Local(name) => {
                let value = self
                    .host
                    .local(name)
                    .ok_or_else(|| EvalError::UnboundLocal(name.clone()))?;
                check_fits(value, &expr.ty)
            }
            LoweredKind::Call(name) => {
                let value = self.host.call(name)?;
                check_fits(value, &expr.ty)
            }
            LoweredKind::Binary { plan, left, right } => {
                let l = self.eval(left)?;
                let l = apply(&plan.left, l, left.span)?;
                let r = self.eval(right)?;
                let r = apply(&plan.right, r, right.span)?;
                let value = operate(&plan.operation, l, r)?;
                apply(&plan.result, value, expr.span)
            }
            LoweredKind::Logical {
                plan,
                left,
                left_conversions,
                right,
                right_conversions,
            } => {
                let l = self.eval(left)?;
                let l = expect_bool(apply(left_conversions, l, left.span)?)?;
                match plan.step(FlowState::LeftEvaluated, l) {
                    FlowState::ResultKnown(value) => Ok(Value::boolean(value)),
                    _ => {
                        let r = self.eval(right)?;
                        let r = expect_bool(apply(right_conversions, r, right.span)?)?;
                        Ok(Value::boolean(r))
                    }
                }
            }
            LoweredKind::InstanceOf { plan, expr: inner } => {
                // The operand is evaluated even when the answer is known statically.
                let value = self.eval(inner)?;
                let result = match plan.outcome {
                    TypeTestOutcome::AlwaysFalse => false,
                    TypeTestOutcome::NonNull => value != Value::Null,
                    TypeTestOutcome::Runtime => {
                        match (value.runtime_class(), plan.target.class_name()) {
                            (Some(class), Some(target)) => {
                                self.hierarchy.is_subtype(class, &target)
                            }
                            _ => false,
                        }
                    }
                };
                Ok(Value::boolean(result))
            }
            LoweredKind::Not {
                operand,
                conversions,
            } => {
                let value = self.eval(operand)?;
                let value = expect_bool(apply(conversions, value, operand.span)?)?;
                Ok(Value::boolean(!value))
            }
        }
    }
}

fn check_fits(value: Value, ty: &TypeDescriptor) -> Result<Value, EvalError> {
    if value.fits(ty) {
        Ok(value)
    } else {
        Err(EvalError::TypeConfusion {
            value,
            expected: ty.clone(),
        })
    }
}

fn expect_bool(value: Value) -> Result<bool, EvalError> {
    value.as_bool().ok_or(EvalError::TypeConfusion {
        value,
        expected: TypeDescriptor::BOOLEAN,
    })
}

fn apply(conversions: &Conversions, mut value: Value, span: Span) -> Result<Value, EvalError> {
    for step in conversions {
        value = match (*step, value) {
            (ConversionStep::Unbox(kind), Value::Null) => {
                return Err(EvalError::NullUnbox { kind, span });
            }
            (ConversionStep::Unbox(kind), Value::Boxed(c)) if c.kind() == kind => {
                Value::Primitive(c)
            }
            (
                ConversionStep::Widen { from, to } | ConversionStep::Narrow { from, to },
                Value::Primitive(c),
            ) if c.kind() == from => match c.convert(to) {
                Some(converted) => Value::Primitive(converted),
                None => return Err(confusion(Value::Primitive(c), step.source())),
            },
            (ConversionStep::Box(kind), Value::Primitive(c)) if c.kind() == kind => Value::Boxed(c),
            (_, other) => return Err(confusion(other, step.source())),
        };
    }
    Ok(value)
}

fn confusion(value: Value, expected: TypeDescriptor) -> EvalError {
    EvalError::TypeConfusion { value, expected }
}

fn domain_type(domain: OperandDomain) -> TypeDescriptor {
    match domain {
        OperandDomain::Int => TypeDescriptor::INT,
        OperandDomain::Long => TypeDescriptor::LONG,
        OperandDomain::Float => TypeDescriptor::FLOAT,
        OperandDomain::Double => TypeDescriptor::DOUBLE,
        OperandDomain::Boolean => TypeDescriptor::BOOLEAN,
        OperandDomain::Reference => TypeDescriptor::object(),
    }
}

fn operate(operation: &Operation, left: Value, right: Value) -> Result<Value, EvalError> {
    if let Operation::ObjectEquals { op } = *operation {
        let equal = objects_equal(&left, &right);
        return Ok(Value::boolean(if op == BinaryOp::Ne { !equal } else { equal }));
    }

    let domain = operation.domain();
    let (a, b) = match (left, right) {
        (Value::Primitive(a), Value::Primitive(b)) => (a, b),
        (Value::Primitive(_), other) | (other, _) => {
            return Err(confusion(other, domain_type(domain)))
        }
    };
    let mismatch = |value: Const| confusion(Value::Primitive(value), domain_type(domain));

    match *operation {
        Operation::Bitwise { op, .. } => {
            let result = match (a, b) {
                (Const::Int(x), Const::Int(y)) => Const::Int(bitwise(op, x, y)),
                (Const::Long(x), Const::Long(y)) => Const::Long(bitwise(op, x, y)),
                (Const::Boolean(x), Const::Boolean(y)) => Const::Boolean(bitwise(op, x, y)),
                (Const::Int(_) | Const::Long(_) | Const::Boolean(_), other) | (other, _) => {
                    return Err(mismatch(other))
                }
            };
            Ok(Value::Primitive(result))
        }
        Operation::Compare { op, nan_bias, .. } => {
            let cmp = match (a, b) {
                (Const::Int(x), Const::Int(y)) => ordering(x.cmp(&y)),
                (Const::Boolean(x), Const::Boolean(y)) => ordering(x.cmp(&y)),
                (Const::Long(x), Const::Long(y)) => ordering(x.cmp(&y)),
                (Const::Float(x), Const::Float(y)) => float_compare(x.partial_cmp(&y), nan_bias),
                (Const::Double(x), Const::Double(y)) => float_compare(x.partial_cmp(&y), nan_bias),
                (other, _) => return Err(mismatch(other)),
            };
            let holds = match op {
                BinaryOp::Lt => cmp < 0,
                BinaryOp::Le => cmp <= 0,
                BinaryOp::Gt => cmp > 0,
                BinaryOp::Ge => cmp >= 0,
                BinaryOp::Ne => cmp != 0,
                _ => cmp == 0,
            };
            Ok(Value::boolean(holds))
        }
        Operation::Shift {
            op, distance_mask, ..
        } => {
            let Const::Int(distance) = b else {
                return Err(confusion(Value::Primitive(b), TypeDescriptor::INT));
            };
            let distance = (distance & i32::from(distance_mask)) as u32;
            let result = match (op, a) {
                (BinaryOp::Shl, Const::Int(x)) => Const::Int(x.wrapping_shl(distance)),
                (BinaryOp::Shr, Const::Int(x)) => Const::Int(x.wrapping_shr(distance)),
                (_, Const::Int(x)) => Const::Int((x as u32).wrapping_shr(distance) as i32),
                (BinaryOp::Shl, Const::Long(x)) => Const::Long(x.wrapping_shl(distance)),
                (BinaryOp::Shr, Const::Long(x)) => Const::Long(x.wrapping_shr(distance)),
                (_, Const::Long(x)) => Const::Long((x as u64).wrapping_shr(distance) as i64),
                (_, other) => return Err(mismatch(other)),
            };
            Ok(Value::Primitive(result))
        }
        Operation::ObjectEquals { .. } => Err(mismatch(a)),
    }
}

/// `java.util.Objects.equals`: null equals only null, wrappers compare by class and value
/// (`Float`/`Double` by canonical bit pattern), other objects by identity.
fn objects_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Null, Value::Null) => true,
        (Value::Object { class: a, id: x }, Value::Object { class: b, id: y }) => a == b && x == y,
        (Value::Boxed(a), Value::Boxed(b)) => match (a, b) {
            (Const::Float(x), Const::Float(y)) => {
                (x.is_nan() && y.is_nan()) || x.to_bits() == y.to_bits()
            }
            (Const::Double(x), Const::Double(y)) => {
                (x.is_nan() && y.is_nan()) || x.to_bits() == y.to_bits()
            }
            _ => a == b,
        },
        _ => false,
    }
}

fn bitwise<T>(op: BinaryOp, x: T, y: T) -> T
where
    T: std::ops::BitAnd<Output = T> + std::ops::BitOr<Output = T> + std::ops::BitXor<Output = T>,
{
    match op {
        BinaryOp::BitAnd => x & y,
        BinaryOp::BitOr => x | y,
        _ => x ^ y,
    }
}

fn ordering(ordering: Ordering) -> i32 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}

/// `fcmpg`/`fcmpl` semantics: an unordered pair produces the bias value.
fn float_compare(ordering_result: Option<Ordering>, bias: Option<NanBias>) -> i32 {
    match ordering_result {
        Some(o) => ordering(o),
        None => bias.unwrap_or(NanBias::Less).nan_result(),
    }
}
