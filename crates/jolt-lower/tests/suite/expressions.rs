use jolt_lower::{
    fold_constant, BinaryOp, Const, EvalError, Expr, LogicalOp, LowerError, LoweredKind, Lowerer,
    Value,
};
use jolt_types::{ConversionStep, PrimitiveKind, TypeDescriptor};
use pretty_assertions::assert_eq;

use super::{boolean, boxed, fold, int, jdk, run, sp, ty, RecordingHost};

#[test]
fn errors_carry_the_offending_node_span() {
    let hierarchy = jdk();
    // 1 < (2.5 & 3)
    let inner = Expr::binary(
        BinaryOp::BitAnd,
        Expr::literal(Const::Double(2.5), sp(5, 8)),
        Expr::literal(Const::Int(3), sp(11, 12)),
    );
    let expr = Expr::binary(
        BinaryOp::Lt,
        Expr::literal(Const::Int(1), sp(0, 1)),
        inner,
    );
    let err = Lowerer::new(&hierarchy).lower_expr(&expr).unwrap_err();
    assert_eq!(err.span(), sp(5, 12));
    assert!(matches!(err, LowerError::TypeMismatch { ref op, .. } if op == "&"));
}

#[test]
fn unresolved_instanceof_target_has_span() {
    let hierarchy = jdk();
    let expr = Expr::instance_of(
        Expr::local("o", TypeDescriptor::object(), sp(0, 1)),
        ty("app.Missing"),
        sp(2, 24),
    );
    let err = Lowerer::new(&hierarchy).lower_expr(&expr).unwrap_err();
    assert_eq!(
        err,
        LowerError::UnresolvedReference {
            name: "app.Missing".to_string(),
            span: sp(0, 24),
        }
    );
}

#[test]
fn lowered_tree_records_types_and_plans() {
    let hierarchy = jdk();
    let expr = Expr::binary(
        BinaryOp::Ge,
        Expr::local("n", TypeDescriptor::Boxed(PrimitiveKind::Int), sp(0, 1)),
        Expr::literal(Const::Long(3), sp(5, 7)),
    );
    let lowered = Lowerer::new(&hierarchy).lower_expr(&expr).unwrap();
    assert_eq!(lowered.ty, TypeDescriptor::BOOLEAN);
    assert_eq!(lowered.span, sp(0, 7));
    let LoweredKind::Binary { plan, left, .. } = &lowered.kind else {
        panic!("expected binary node, got {:?}", lowered.kind);
    };
    assert_eq!(left.ty, TypeDescriptor::Boxed(PrimitiveKind::Int));
    assert_eq!(
        plan.left.steps(),
        &[
            ConversionStep::Unbox(PrimitiveKind::Int),
            ConversionStep::Widen {
                from: PrimitiveKind::Int,
                to: PrimitiveKind::Long,
            },
        ]
    );
}

#[test]
fn unboxing_null_fails_at_evaluation() {
    let expr = Expr::binary(
        BinaryOp::BitAnd,
        Expr::local("n", TypeDescriptor::Boxed(PrimitiveKind::Int), sp(0, 1)),
        int(1),
    );

    let mut host = RecordingHost::default().with_local("n", Value::Null);
    assert_eq!(
        run(&expr, &mut host),
        Err(EvalError::NullUnbox {
            kind: PrimitiveKind::Int,
            span: sp(0, 1),
        })
    );

    let mut host = RecordingHost::default().with_local("n", boxed(Const::Int(7)));
    assert_eq!(run(&expr, &mut host), Ok(Value::int(1)));
}

#[test]
fn left_operand_fails_before_right_is_evaluated() {
    let expr = Expr::binary(
        BinaryOp::Lt,
        Expr::local("n", TypeDescriptor::Boxed(PrimitiveKind::Long), sp(0, 1)),
        Expr::call("next", TypeDescriptor::LONG, sp(4, 10)),
    );
    let mut host = RecordingHost::default()
        .with_local("n", Value::Null)
        .with_call("next", Value::long(1));
    assert!(run(&expr, &mut host).is_err());
    assert_eq!(host.call_count("next"), 0);
}

#[test]
fn not_inverts_booleans() {
    let expr = Expr::not(
        Expr::logical(LogicalOp::Or, boolean(false), boolean(false)),
        sp(0, 1),
    );
    assert_eq!(fold(&expr), Value::boolean(true));

    let hierarchy = jdk();
    let err = Lowerer::new(&hierarchy)
        .lower_expr(&Expr::not(int(3), sp(0, 2)))
        .unwrap_err();
    assert!(matches!(err, LowerError::TypeMismatch { ref op, .. } if op == "!"));
}

#[test]
fn folding_stops_at_locals() {
    let hierarchy = jdk();
    let expr = Expr::binary(
        BinaryOp::BitOr,
        int(1),
        Expr::local("x", TypeDescriptor::INT, sp(4, 5)),
    );
    let lowered = Lowerer::new(&hierarchy).lower_expr(&expr).unwrap();
    assert_eq!(fold_constant(&lowered), Err(EvalError::NotConstant(sp(4, 5))));
}

#[test]
fn host_values_must_match_static_types() {
    let expr = Expr::binary(
        BinaryOp::BitAnd,
        Expr::local("x", TypeDescriptor::INT, sp(0, 1)),
        int(1),
    );
    let mut host = RecordingHost::default().with_local("x", Value::long(1));
    assert!(matches!(
        run(&expr, &mut host),
        Err(EvalError::TypeConfusion { .. })
    ));
}

#[test]
fn mixed_width_relational_chain() {
    // (byte 100 > short 50) == (3L <= 2.5f)
    let left = Expr::binary(
        BinaryOp::Gt,
        Expr::literal(Const::Byte(100), sp(0, 3)),
        Expr::literal(Const::Short(50), sp(6, 8)),
    );
    let right = Expr::binary(
        BinaryOp::Le,
        Expr::literal(Const::Long(3), sp(13, 15)),
        Expr::literal(Const::Float(2.5), sp(19, 23)),
    );
    let expr = Expr::binary(BinaryOp::Eq, left, right);
    assert_eq!(fold(&expr), Value::boolean(false));
}
