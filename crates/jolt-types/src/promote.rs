use std::fmt;

use crate::{
    binary_numeric_promotion, unary_numeric_promotion, PrimitiveKind, Result, TypeDescriptor,
    TypeError,
};

/// Operator families with distinct promotion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorCategory {
    /// `&`, `|`, `^`
    Bitwise,
    /// `<`, `<=`, `>`, `>=`
    Relational,
    /// `<<`, `>>`, `>>>`
    Shift,
    /// `==`, `!=` on primitive operands
    Equality,
}

impl OperatorCategory {
    pub fn describe(self) -> &'static str {
        match self {
            OperatorCategory::Bitwise => "bitwise operator",
            OperatorCategory::Relational => "relational operator",
            OperatorCategory::Shift => "shift operator",
            OperatorCategory::Equality => "equality operator",
        }
    }
}

impl fmt::Display for OperatorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Result of promoting two primitive operands for one operator category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PromotedPair {
    /// Kind the left operand is converted to before the operation.
    pub left_target: PrimitiveKind,
    /// Kind the right operand is converted to before the operation.
    pub right_target: PrimitiveKind,
    /// Static type of the operator's value.
    pub result_type: PrimitiveKind,
}

impl PromotedPair {
    fn uniform(domain: PrimitiveKind, result_type: PrimitiveKind) -> Self {
        Self {
            left_target: domain,
            right_target: domain,
            result_type,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromotionOptions {
    /// Accept `boolean & boolean` (and `|`, `^`) as non-short-circuit logic.
    pub allow_boolean_bitwise: bool,
}

impl Default for PromotionOptions {
    fn default() -> Self {
        Self {
            allow_boolean_bitwise: true,
        }
    }
}

/// [`promote_with`] using default options.
pub fn promote(
    left: &TypeDescriptor,
    right: &TypeDescriptor,
    category: OperatorCategory,
) -> Result<PromotedPair> {
    promote_with(left, right, category, PromotionOptions::default())
}

/// Compute the operand domain and result type of a binary operator.
///
/// Both operands must already be primitive (see [`crate::prepare_operand`]); boxed, reference
/// and null operands are rejected with [`TypeError::TypeMismatch`].
pub fn promote_with(
    left: &TypeDescriptor,
    right: &TypeDescriptor,
    category: OperatorCategory,
    options: PromotionOptions,
) -> Result<PromotedPair> {
    let mismatch = || TypeError::mismatch(category.describe(), left, right);
    let (Some(l), Some(r)) = (left.as_primitive(), right.as_primitive()) else {
        return Err(mismatch());
    };

    let pair = match category {
        OperatorCategory::Bitwise => {
            if l == PrimitiveKind::Boolean && r == PrimitiveKind::Boolean {
                if !options.allow_boolean_bitwise {
                    return Err(mismatch());
                }
                PromotedPair::uniform(PrimitiveKind::Boolean, PrimitiveKind::Boolean)
            } else if l.is_integral() && r.is_integral() {
                let domain = binary_numeric_promotion(l, r).ok_or_else(mismatch)?;
                PromotedPair::uniform(domain, domain)
            } else {
                return Err(mismatch());
            }
        }
        OperatorCategory::Relational => {
            let domain = binary_numeric_promotion(l, r).ok_or_else(mismatch)?;
            PromotedPair::uniform(domain, PrimitiveKind::Boolean)
        }
        OperatorCategory::Equality => {
            if l == PrimitiveKind::Boolean && r == PrimitiveKind::Boolean {
                PromotedPair::uniform(PrimitiveKind::Boolean, PrimitiveKind::Boolean)
            } else {
                let domain = binary_numeric_promotion(l, r).ok_or_else(mismatch)?;
                PromotedPair::uniform(domain, PrimitiveKind::Boolean)
            }
        }
        OperatorCategory::Shift => {
            if !l.is_integral() || !r.is_integral() {
                return Err(mismatch());
            }
            let value = unary_numeric_promotion(l);
            PromotedPair {
                left_target: value,
                // The distance is always consumed as an int, narrowing a long.
                right_target: PrimitiveKind::Int,
                result_type: value,
            }
        }
    };

    tracing::trace!(
        target: "jolt.types",
        %category,
        left = %left,
        right = %right,
        domain = %pair.left_target,
        result = %pair.result_type,
        "promoted operands"
    );
    Ok(pair)
}
