use jolt_types::{
    prepare_operand, promote_with, ConversionStep, Conversions, OperatorCategory, PrimitiveKind,
    PromotionOptions, TypeDescriptor, TypeHierarchy,
};

use crate::plan::{NanBias, OperandDomain, Operation, OperationPlan};
use crate::{BinaryOp, LowerError, LoweringOptions};

pub(crate) fn lower_binary(
    hierarchy: &dyn TypeHierarchy,
    options: &LoweringOptions,
    op: BinaryOp,
    left: &TypeDescriptor,
    right: &TypeDescriptor,
) -> Result<OperationPlan, LowerError> {
    if op.category() == OperatorCategory::Equality {
        if let Some(plan) = object_equality(hierarchy, options, op, left, right)? {
            return Ok(plan);
        }
    }

    let (left_ty, mut left_conv) = prepare_operand(left);
    let (right_ty, mut right_conv) = prepare_operand(right);

    let promotion = PromotionOptions {
        allow_boolean_bitwise: options.allow_boolean_bitwise,
    };
    let pair = promote_with(&left_ty, &right_ty, op.category(), promotion).map_err(|err| {
        // Report the operand types as written, not their unboxed forms.
        match LowerError::from_type_error(err, op.token()) {
            LowerError::TypeMismatch { op, span, .. } => LowerError::TypeMismatch {
                op,
                left: left.clone(),
                right: right.clone(),
                span,
            },
            other => other,
        }
    })?;

    // Both operands are primitive once promotion succeeded.
    let (Some(left_kind), Some(right_kind)) = (left_ty.as_primitive(), right_ty.as_primitive())
    else {
        return Err(LowerError::mismatch(op.token(), left, right));
    };

    left_conv.try_widen(left_kind, pair.left_target)?;
    if right_kind == PrimitiveKind::Long && pair.right_target == PrimitiveKind::Int {
        right_conv.try_push(ConversionStep::Narrow {
            from: PrimitiveKind::Long,
            to: PrimitiveKind::Int,
        })?;
    } else {
        right_conv.try_widen(right_kind, pair.right_target)?;
    }

    let domain = OperandDomain::of(pair.left_target);
    let operation = match op.category() {
        OperatorCategory::Bitwise => Operation::Bitwise { op, domain },
        OperatorCategory::Relational | OperatorCategory::Equality => Operation::Compare {
            op,
            domain,
            nan_bias: nan_bias(op, domain),
        },
        OperatorCategory::Shift => Operation::Shift {
            op,
            domain,
            distance_mask: if domain == OperandDomain::Long {
                0x3f
            } else {
                0x1f
            },
        },
    };

    let plan = OperationPlan {
        left: left_conv,
        right: right_conv,
        operation,
        result_type: TypeDescriptor::Primitive(pair.result_type),
        result: Conversions::new(),
    };
    tracing::debug!(
        target: "jolt.lower",
        op = %op,
        left = %left,
        right = %right,
        operation = %plan.operation,
        result = %plan.result_type,
        "lowered binary operator"
    );
    Ok(plan)
}

/// `cmpg` for `<`/`<=` and `cmpl` for `>`/`>=`, so a NaN operand fails the branch. Equality
/// branches on zero and is NaN-safe with either bias.
fn nan_bias(op: BinaryOp, domain: OperandDomain) -> Option<NanBias> {
    if !matches!(domain, OperandDomain::Float | OperandDomain::Double) {
        return None;
    }
    Some(match op {
        BinaryOp::Lt | BinaryOp::Le => NanBias::Greater,
        _ => NanBias::Less,
    })
}

/// Plan `==`/`!=` as `java.util.Objects.equals` when neither side is primitive.
///
/// Returns `None` when the comparison is primitive: at least one primitive side, or two
/// wrappers whose unboxed kinds promote together.
fn object_equality(
    hierarchy: &dyn TypeHierarchy,
    options: &LoweringOptions,
    op: BinaryOp,
    left: &TypeDescriptor,
    right: &TypeDescriptor,
) -> Result<Option<OperationPlan>, LowerError> {
    if left.is_primitive() && right.is_primitive() {
        return Ok(None);
    }
    if left.is_primitive() || right.is_primitive() {
        if left.is_null() || right.is_null() {
            return Err(LowerError::mismatch(op.token(), left, right));
        }
        return Ok(None);
    }

    if let (TypeDescriptor::Boxed(a), TypeDescriptor::Boxed(b)) = (left, right) {
        let promotion = PromotionOptions {
            allow_boolean_bitwise: options.allow_boolean_bitwise,
        };
        let unboxed = (TypeDescriptor::Primitive(*a), TypeDescriptor::Primitive(*b));
        if promote_with(&unboxed.0, &unboxed.1, OperatorCategory::Equality, promotion).is_ok() {
            return Ok(None);
        }
    }

    for operand in [left, right] {
        if let TypeDescriptor::Reference(reference) = operand {
            if !hierarchy.contains(&reference.name) {
                return Err(LowerError::unresolved(reference.name.clone()));
            }
        }
    }

    tracing::debug!(
        target: "jolt.lower",
        op = %op,
        left = %left,
        right = %right,
        "lowered object equality"
    );
    Ok(Some(OperationPlan {
        left: Conversions::new(),
        right: Conversions::new(),
        operation: Operation::ObjectEquals { op },
        result_type: TypeDescriptor::BOOLEAN,
        result: Conversions::new(),
    }))
}
