use jolt_types::{prepare_operand, Conversions, Span, TypeDescriptor};

use crate::logical::ControlFlowPlan;
use crate::{BinaryOp, Const, LogicalOp, LowerError, Lowerer, OperationPlan, TypeTestPlan};

/// A typed expression handed to the lowering engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Const),
    /// An inline `null`.
    Null,
    Local {
        name: String,
        ty: TypeDescriptor,
    },
    /// A call with side effects, returning a value of type `ty`.
    Call {
        name: String,
        ty: TypeDescriptor,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    InstanceOf {
        expr: Box<Expr>,
        target: TypeDescriptor,
    },
    Not(Box<Expr>),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn literal(value: Const, span: Span) -> Self {
        Self::new(ExprKind::Literal(value), span)
    }

    pub fn null(span: Span) -> Self {
        Self::new(ExprKind::Null, span)
    }

    pub fn local(name: impl Into<String>, ty: TypeDescriptor, span: Span) -> Self {
        Self::new(
            ExprKind::Local {
                name: name.into(),
                ty,
            },
            span,
        )
    }

    pub fn call(name: impl Into<String>, ty: TypeDescriptor, span: Span) -> Self {
        Self::new(
            ExprKind::Call {
                name: name.into(),
                ty,
            },
            span,
        )
    }

    /// The spans of `left` and `right` are covered by the new node.
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        let span = left.span.cover(right.span);
        Self::new(
            ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Self {
        let span = left.span.cover(right.span);
        Self::new(
            ExprKind::Logical {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            span,
        )
    }

    pub fn instance_of(expr: Expr, target: TypeDescriptor, span: Span) -> Self {
        let span = expr.span.cover(span);
        Self::new(
            ExprKind::InstanceOf {
                expr: Box::new(expr),
                target,
            },
            span,
        )
    }

    pub fn not(expr: Expr, span: Span) -> Self {
        let span = span.cover(expr.span);
        Self::new(ExprKind::Not(Box::new(expr)), span)
    }
}

/// An expression with every operator resolved to a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct LoweredExpr {
    pub kind: LoweredKind,
    /// Static type of the value the node produces.
    pub ty: TypeDescriptor,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoweredKind {
    Literal(Const),
    Null,
    Local(String),
    Call(String),
    Binary {
        plan: OperationPlan,
        left: Box<LoweredExpr>,
        right: Box<LoweredExpr>,
    },
    Logical {
        plan: ControlFlowPlan,
        left: Box<LoweredExpr>,
        /// Unboxing of a `Boolean` left operand.
        left_conversions: Conversions,
        right: Box<LoweredExpr>,
        right_conversions: Conversions,
    },
    InstanceOf {
        plan: TypeTestPlan,
        expr: Box<LoweredExpr>,
    },
    Not {
        operand: Box<LoweredExpr>,
        conversions: Conversions,
    },
}

pub(crate) fn lower_expr(lowerer: &Lowerer<'_>, expr: &Expr) -> Result<LoweredExpr, LowerError> {
    let (kind, ty) = match &expr.kind {
        ExprKind::Literal(value) => (
            LoweredKind::Literal(*value),
            TypeDescriptor::Primitive(value.kind()),
        ),
        ExprKind::Null => (LoweredKind::Null, TypeDescriptor::Null),
        ExprKind::Local { name, ty } => (LoweredKind::Local(name.clone()), ty.clone()),
        ExprKind::Call { name, ty } => (LoweredKind::Call(name.clone()), ty.clone()),
        ExprKind::Binary { op, left, right } => {
            let left = lower_expr(lowerer, left)?;
            let right = lower_expr(lowerer, right)?;
            let plan = lowerer
                .lower_binary(*op, &left.ty, &right.ty)
                .map_err(|err| err.with_span(expr.span))?;
            let ty = plan.value_type();
            (
                LoweredKind::Binary {
                    plan,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                ty,
            )
        }
        ExprKind::Logical { op, left, right } => {
            let left = lower_expr(lowerer, left)?;
            let right = lower_expr(lowerer, right)?;
            let (left_ty, left_conversions) = prepare_operand(&left.ty);
            let (right_ty, right_conversions) = prepare_operand(&right.ty);
            let plan = lowerer
                .plan_logical(*op, &left_ty, &right_ty)
                .map_err(|_| LowerError::mismatch(op.token(), &left.ty, &right.ty))
                .map_err(|err| err.with_span(expr.span))?;
            (
                LoweredKind::Logical {
                    plan,
                    left: Box::new(left),
                    left_conversions,
                    right: Box::new(right),
                    right_conversions,
                },
                TypeDescriptor::BOOLEAN,
            )
        }
        ExprKind::InstanceOf { expr: inner, target } => {
            let inner = lower_expr(lowerer, inner)?;
            let plan = lowerer
                .plan_instance_of(&inner.ty, target)
                .map_err(|err| err.with_span(expr.span))?;
            (
                LoweredKind::InstanceOf {
                    plan,
                    expr: Box::new(inner),
                },
                TypeDescriptor::BOOLEAN,
            )
        }
        ExprKind::Not(operand) => {
            let operand = lower_expr(lowerer, operand)?;
            let (operand_ty, conversions) = prepare_operand(&operand.ty);
            if operand_ty != TypeDescriptor::BOOLEAN {
                return Err(
                    LowerError::mismatch("!", &operand.ty, &TypeDescriptor::BOOLEAN)
                        .with_span(expr.span),
                );
            }
            (
                LoweredKind::Not {
                    operand: Box::new(operand),
                    conversions,
                },
                TypeDescriptor::BOOLEAN,
            )
        }
    };

    tracing::trace!(target: "jolt.lower", span = ?expr.span, ty = %ty, "lowered expression");
    Ok(LoweredExpr {
        kind,
        ty,
        span: expr.span,
    })
}
