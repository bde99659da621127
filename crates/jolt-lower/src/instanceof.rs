use jolt_types::{ClassKind, TypeDescriptor, TypeHierarchy};

use crate::{LowerError, LoweringOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTestOutcome {
    /// The test is false for every value, including null. No instruction is needed.
    AlwaysFalse,
    /// Every non-null value passes; only a null check remains.
    NonNull,
    /// A real type test against the target is required.
    Runtime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTestPlan {
    pub operand: TypeDescriptor,
    pub target: TypeDescriptor,
    pub outcome: TypeTestOutcome,
}

impl TypeTestPlan {
    pub fn statically_always_false(&self) -> bool {
        self.outcome == TypeTestOutcome::AlwaysFalse
    }

    /// True when the type check itself is redundant. A null operand still yields false.
    pub fn statically_always_true(&self) -> bool {
        self.outcome == TypeTestOutcome::NonNull
    }

    /// The type the emitted `instanceof` instruction tests against, if one is needed.
    pub fn runtime_check_against(&self) -> Option<&TypeDescriptor> {
        match self.outcome {
            TypeTestOutcome::Runtime => Some(&self.target),
            TypeTestOutcome::AlwaysFalse | TypeTestOutcome::NonNull => None,
        }
    }
}

pub(crate) fn plan_instance_of(
    hierarchy: &dyn TypeHierarchy,
    options: &LoweringOptions,
    operand: &TypeDescriptor,
    target: &TypeDescriptor,
) -> Result<TypeTestPlan, LowerError> {
    let plan = |outcome| TypeTestPlan {
        operand: operand.clone(),
        target: target.clone(),
        outcome,
    };

    if operand.is_null() {
        return Ok(plan(TypeTestOutcome::AlwaysFalse));
    }
    let (Some(sub), Some(sup)) = (operand.class_name(), target.class_name()) else {
        return Err(LowerError::mismatch("instanceof", operand, target));
    };
    for name in [&sub, &sup] {
        if !hierarchy.contains(name) {
            return Err(LowerError::unresolved(name.to_string()));
        }
    }

    let outcome = if !options.resolve_static_type_tests {
        TypeTestOutcome::Runtime
    } else if hierarchy.is_subtype(&sub, &sup) {
        TypeTestOutcome::NonNull
    } else if provably_disjoint(hierarchy, &sub, &sup) {
        TypeTestOutcome::AlwaysFalse
    } else {
        TypeTestOutcome::Runtime
    };

    tracing::debug!(
        target: "jolt.lower",
        operand = %operand,
        target_type = %target,
        ?outcome,
        "planned instanceof"
    );
    Ok(plan(outcome))
}

/// Whether no object can be an instance of both `a` and `b`.
///
/// Two unrelated classes never share an instance (single inheritance). A final class shares
/// instances only with its own supertypes.
pub(crate) fn provably_disjoint(hierarchy: &dyn TypeHierarchy, a: &str, b: &str) -> bool {
    if hierarchy.is_subtype(a, b) || hierarchy.is_subtype(b, a) {
        return false;
    }
    let is_class = |name: &str| hierarchy.kind(name) == Some(ClassKind::Class);
    let is_final_class = |name: &str| is_class(name) && hierarchy.is_final(name);
    (is_class(a) && is_class(b)) || is_final_class(a) || is_final_class(b)
}
