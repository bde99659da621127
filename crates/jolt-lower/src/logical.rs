use jolt_types::TypeDescriptor;

use crate::{LogicalOp, LowerError};

/// One step of the short-circuit evaluation shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowStep {
    EvaluateLeft,
    /// Jump to the join point when the left value equals this.
    BranchIfShortCircuits(bool),
    EvaluateRight,
    /// Join: the value is the right operand, or this constant on the short-circuit path.
    JoinResultAsBoolean(bool),
}

/// State after the left operand has produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowState {
    LeftEvaluated,
    /// The right operand must not be evaluated; this is the result.
    ResultKnown(bool),
    /// The result is the right operand's value.
    EvaluateRight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlFlowPlan {
    pub op: LogicalOp,
    pub steps: [FlowStep; 4],
}

impl ControlFlowPlan {
    fn new(op: LogicalOp) -> Self {
        let value = op.short_circuit_value();
        Self {
            op,
            steps: [
                FlowStep::EvaluateLeft,
                FlowStep::BranchIfShortCircuits(value),
                FlowStep::EvaluateRight,
                FlowStep::JoinResultAsBoolean(value),
            ],
        }
    }

    pub fn short_circuit_value(&self) -> bool {
        self.op.short_circuit_value()
    }

    /// Advance from [`FlowState::LeftEvaluated`] given the left operand's value.
    pub fn after_left(&self, left: bool) -> FlowState {
        if left == self.short_circuit_value() {
            FlowState::ResultKnown(left)
        } else {
            FlowState::EvaluateRight
        }
    }

    /// Run the state machine one step. Only [`FlowState::LeftEvaluated`] has a successor.
    pub fn step(&self, state: FlowState, left: bool) -> FlowState {
        match state {
            FlowState::LeftEvaluated => self.after_left(left),
            done => done,
        }
    }

    /// The conditional branch that skips the right operand (`ifeq` for `&&`, `ifne` for `||`).
    pub fn branch_mnemonic(&self) -> &'static str {
        if self.short_circuit_value() {
            "ifne"
        } else {
            "ifeq"
        }
    }
}

pub(crate) fn plan_logical(
    op: LogicalOp,
    left: &TypeDescriptor,
    right: &TypeDescriptor,
) -> Result<ControlFlowPlan, LowerError> {
    if *left != TypeDescriptor::BOOLEAN || *right != TypeDescriptor::BOOLEAN {
        return Err(LowerError::mismatch(op.token(), left, right));
    }
    tracing::trace!(target: "jolt.lower", op = %op, "planned short-circuit operator");
    Ok(ControlFlowPlan::new(op))
}
