use jolt_lower::{
    BinaryOp, Const, Expr, LowerError, Lowerer, OperandDomain, Operation, TypeTestOutcome, Value,
};
use jolt_types::{ConversionStep, PrimitiveKind, Span, TypeDescriptor};
use pretty_assertions::assert_eq;

use super::{fold, int, jdk, long, ty};

#[test]
fn int_bitand() {
    assert_eq!(
        fold(&Expr::binary(BinaryOp::BitAnd, int(12), int(10))),
        Value::int(8)
    );
}

#[test]
fn negative_int_bitand() {
    assert_eq!(
        fold(&Expr::binary(BinaryOp::BitAnd, int(-10), int(-5))),
        Value::int(-14)
    );
}

#[test]
fn long_bitand() {
    assert_eq!(
        fold(&Expr::binary(
            BinaryOp::BitAnd,
            long(4_886_718_345),
            long(4_294_967_295)
        )),
        Value::long(591_751_049)
    );
}

#[test]
fn int_and_long_bitand_widens_to_long() {
    let hierarchy = jdk();
    let plan = Lowerer::new(&hierarchy)
        .lower_binary(BinaryOp::BitAnd, &TypeDescriptor::INT, &TypeDescriptor::LONG)
        .unwrap();
    assert_eq!(
        plan.left.steps(),
        &[ConversionStep::Widen {
            from: PrimitiveKind::Int,
            to: PrimitiveKind::Long,
        }]
    );
    assert!(plan.right.is_empty());
    assert_eq!(plan.result_type, TypeDescriptor::LONG);
    assert_eq!(plan.operation.mnemonics(), vec!["land"]);

    assert_eq!(
        fold(&Expr::binary(BinaryOp::BitAnd, int(200), long(150))),
        Value::long(128)
    );
}

#[test]
fn byte_greater_than_short_compares_as_int() {
    let hierarchy = jdk();
    let plan = Lowerer::new(&hierarchy)
        .lower_binary(BinaryOp::Gt, &TypeDescriptor::BYTE, &TypeDescriptor::SHORT)
        .unwrap();
    assert_eq!(
        plan.operation,
        Operation::Compare {
            op: BinaryOp::Gt,
            domain: OperandDomain::Int,
            nan_bias: None,
        }
    );
    assert_eq!(plan.result_type, TypeDescriptor::BOOLEAN);

    let expr = Expr::binary(
        BinaryOp::Gt,
        Expr::literal(Const::Byte(100), Span::default()),
        Expr::literal(Const::Short(50), Span::default()),
    );
    assert_eq!(fold(&expr), Value::boolean(true));
}

#[test]
fn null_instanceof_string_needs_no_check() {
    let hierarchy = jdk();
    let plan = Lowerer::new(&hierarchy)
        .plan_instance_of(&TypeDescriptor::Null, &ty("java.lang.String"))
        .unwrap();
    assert_eq!(plan.outcome, TypeTestOutcome::AlwaysFalse);
    assert!(plan.statically_always_false());
    assert_eq!(plan.runtime_check_against(), None);

    let expr = Expr::instance_of(
        Expr::null(Span::default()),
        ty("java.lang.String"),
        Span::default(),
    );
    assert_eq!(fold(&expr), Value::boolean(false));
}

#[test]
fn boxed_operand_is_unboxed_before_widening() {
    let hierarchy = jdk();
    let plan = Lowerer::new(&hierarchy)
        .lower_binary(
            BinaryOp::BitOr,
            &TypeDescriptor::Boxed(PrimitiveKind::Short),
            &TypeDescriptor::LONG,
        )
        .unwrap();
    assert_eq!(
        plan.left.steps(),
        &[
            ConversionStep::Unbox(PrimitiveKind::Short),
            ConversionStep::Widen {
                from: PrimitiveKind::Short,
                to: PrimitiveKind::Long,
            },
        ]
    );
}

#[test]
fn floating_bitwise_is_a_mismatch() {
    let hierarchy = jdk();
    let err = Lowerer::new(&hierarchy)
        .lower_binary(BinaryOp::BitXor, &TypeDescriptor::DOUBLE, &TypeDescriptor::INT)
        .unwrap_err();
    assert_eq!(
        err,
        LowerError::TypeMismatch {
            op: "^".to_string(),
            left: TypeDescriptor::DOUBLE,
            right: TypeDescriptor::INT,
            span: Span::default(),
        }
    );
}

#[test]
fn mismatch_reports_operands_as_written() {
    let hierarchy = jdk();
    let err = Lowerer::new(&hierarchy)
        .lower_binary(
            BinaryOp::Lt,
            &TypeDescriptor::Boxed(PrimitiveKind::Boolean),
            &TypeDescriptor::INT,
        )
        .unwrap_err();
    let LowerError::TypeMismatch { left, .. } = err else {
        panic!("expected mismatch, got {err:?}");
    };
    assert_eq!(left, TypeDescriptor::Boxed(PrimitiveKind::Boolean));
}

#[test]
fn unknown_tokens_are_unsupported() {
    let hierarchy = jdk();
    let lowerer = Lowerer::new(&hierarchy);
    for token in ["+", "**", "&&", "instanceof"] {
        let err = lowerer
            .lower_binary_token(token, &TypeDescriptor::INT, &TypeDescriptor::INT, Span::new(3, 5))
            .unwrap_err();
        assert_eq!(
            err,
            LowerError::UnsupportedOperator {
                token: token.to_string(),
                span: Span::new(3, 5),
            }
        );
    }
}

#[test]
fn result_boxing_is_opt_in() {
    let hierarchy = jdk();
    let plan = Lowerer::new(&hierarchy)
        .lower_binary(BinaryOp::BitAnd, &TypeDescriptor::INT, &TypeDescriptor::INT)
        .unwrap();
    assert!(plan.result.is_empty());
    assert_eq!(plan.value_type(), TypeDescriptor::INT);

    let boxed = plan.with_boxed_result();
    assert_eq!(boxed.result.steps(), &[ConversionStep::Box(PrimitiveKind::Int)]);
    assert_eq!(boxed.value_type(), TypeDescriptor::Boxed(PrimitiveKind::Int));
    assert_eq!(boxed.clone().with_boxed_result(), boxed);
}

#[test]
fn boolean_bitwise_follows_option() {
    let hierarchy = jdk();
    let plan = Lowerer::new(&hierarchy)
        .lower_binary(BinaryOp::BitAnd, &TypeDescriptor::BOOLEAN, &TypeDescriptor::BOOLEAN)
        .unwrap();
    assert_eq!(plan.operation.domain(), OperandDomain::Boolean);
    assert_eq!(plan.result_type, TypeDescriptor::BOOLEAN);

    let strict = Lowerer::with_options(
        &hierarchy,
        jolt_lower::LoweringOptions {
            allow_boolean_bitwise: false,
            ..Default::default()
        },
    );
    assert!(strict
        .lower_binary(BinaryOp::BitAnd, &TypeDescriptor::BOOLEAN, &TypeDescriptor::BOOLEAN)
        .is_err());
}
