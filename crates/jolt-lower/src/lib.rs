//! Operator lowering.
//!
//! Given an operator and the static types of its operands, decide the implicit conversions,
//! the concrete JVM operation and the result type ([`OperationPlan`]), the evaluation shape of
//! `&&`/`||` ([`ControlFlowPlan`]), or how much of an `instanceof` can be decided at compile
//! time ([`TypeTestPlan`]).
//!
//! ```
//! use jolt_lower::{BinaryOp, Lowerer};
//! use jolt_types::{ClassHierarchy, PrimitiveKind, TypeDescriptor};
//!
//! let hierarchy = ClassHierarchy::with_minimal_jdk();
//! let lowerer = Lowerer::new(&hierarchy);
//! let plan = lowerer
//!     .lower_binary(BinaryOp::BitAnd, &TypeDescriptor::INT, &TypeDescriptor::LONG)
//!     .unwrap();
//! assert_eq!(plan.result_type, TypeDescriptor::Primitive(PrimitiveKind::Long));
//! ```

mod error;
mod eval;
mod expr;
mod instanceof;
mod logical;
mod op;
mod plan;
mod table;
mod value;

use jolt_config::LoweringConfig;
use jolt_types::{Span, TypeDescriptor, TypeHierarchy};

pub use error::LowerError;
pub use eval::{evaluate, fold_constant, EvalError, Host};
pub use expr::{Expr, ExprKind, LoweredExpr, LoweredKind};
pub use instanceof::{TypeTestOutcome, TypeTestPlan};
pub use logical::{ControlFlowPlan, FlowState, FlowStep};
pub use op::{BinaryOp, LogicalOp};
pub use plan::{NanBias, OperandDomain, Operation, OperationPlan};
pub use value::{Const, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoweringOptions {
    pub allow_boolean_bitwise: bool,
    pub resolve_static_type_tests: bool,
}

impl Default for LoweringOptions {
    fn default() -> Self {
        Self {
            allow_boolean_bitwise: true,
            resolve_static_type_tests: true,
        }
    }
}

impl From<&LoweringConfig> for LoweringOptions {
    fn from(config: &LoweringConfig) -> Self {
        Self {
            allow_boolean_bitwise: config.allow_boolean_bitwise,
            resolve_static_type_tests: config.resolve_static_type_tests,
        }
    }
}

/// Entry points of the lowering engine.
///
/// Holds no mutable state; one `Lowerer` may be shared across threads.
#[derive(Clone, Copy)]
pub struct Lowerer<'h> {
    hierarchy: &'h dyn TypeHierarchy,
    options: LoweringOptions,
}

impl<'h> Lowerer<'h> {
    pub fn new(hierarchy: &'h dyn TypeHierarchy) -> Self {
        Self::with_options(hierarchy, LoweringOptions::default())
    }

    pub fn with_options(hierarchy: &'h dyn TypeHierarchy, options: LoweringOptions) -> Self {
        Self { hierarchy, options }
    }

    pub fn hierarchy(&self) -> &'h dyn TypeHierarchy {
        self.hierarchy
    }

    pub fn options(&self) -> LoweringOptions {
        self.options
    }

    /// Plan a bitwise, relational, equality or shift operator.
    pub fn lower_binary(
        &self,
        op: BinaryOp,
        left: &TypeDescriptor,
        right: &TypeDescriptor,
    ) -> Result<OperationPlan, LowerError> {
        table::lower_binary(self.hierarchy, &self.options, op, left, right)
    }

    /// Parse `token` and plan it with [`Lowerer::lower_binary`].
    pub fn lower_binary_token(
        &self,
        token: &str,
        left: &TypeDescriptor,
        right: &TypeDescriptor,
        span: Span,
    ) -> Result<OperationPlan, LowerError> {
        let op = BinaryOp::from_token(token, span)?;
        self.lower_binary(op, left, right)
            .map_err(|err| err.with_span(span))
    }

    /// Plan `&&`/`||`. Both operands must already be primitive `boolean`.
    pub fn plan_logical(
        &self,
        op: LogicalOp,
        left: &TypeDescriptor,
        right: &TypeDescriptor,
    ) -> Result<ControlFlowPlan, LowerError> {
        logical::plan_logical(op, left, right)
    }

    /// Plan `expr instanceof target`.
    pub fn plan_instance_of(
        &self,
        expr_type: &TypeDescriptor,
        target: &TypeDescriptor,
    ) -> Result<TypeTestPlan, LowerError> {
        instanceof::plan_instance_of(self.hierarchy, &self.options, expr_type, target)
    }

    /// Lower a whole expression tree in one pass.
    pub fn lower_expr(&self, expr: &Expr) -> Result<LoweredExpr, LowerError> {
        expr::lower_expr(self, expr)
    }
}
