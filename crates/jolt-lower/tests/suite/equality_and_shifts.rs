use jolt_lower::{
    BinaryOp, Const, EvalError, Expr, LowerError, Lowerer, NanBias, OperandDomain, Operation,
    Value,
};
use jolt_types::{ConversionStep, PrimitiveKind, Span, TypeDescriptor};
use pretty_assertions::assert_eq;

use super::{boxed, double, fold, int, jdk, long, object, run, ty, RecordingHost};

#[test]
fn boxed_equals_primitive_unboxes() {
    let hierarchy = jdk();
    let plan = Lowerer::new(&hierarchy)
        .lower_binary(
            BinaryOp::Eq,
            &TypeDescriptor::Boxed(PrimitiveKind::Int),
            &TypeDescriptor::LONG,
        )
        .unwrap();
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
    assert_eq!(plan.operation.mnemonics(), vec!["lcmp", "ifeq"]);
}

#[test]
fn two_boxes_unbox_and_compare_values() {
    let hierarchy = jdk();
    let lowerer = Lowerer::new(&hierarchy);
    let plan = lowerer
        .lower_binary(
            BinaryOp::Ne,
            &TypeDescriptor::Boxed(PrimitiveKind::Int),
            &TypeDescriptor::Boxed(PrimitiveKind::Int),
        )
        .unwrap();
    assert_eq!(plan.left.steps(), &[ConversionStep::Unbox(PrimitiveKind::Int)]);
    assert_eq!(plan.right.steps(), &[ConversionStep::Unbox(PrimitiveKind::Int)]);
    assert_eq!(plan.operation.mnemonics(), vec!["if_icmpne"]);

    let mixed = lowerer
        .lower_binary(
            BinaryOp::Eq,
            &TypeDescriptor::Boxed(PrimitiveKind::Int),
            &TypeDescriptor::Boxed(PrimitiveKind::Long),
        )
        .unwrap();
    assert_eq!(
        mixed.left.steps(),
        &[
            ConversionStep::Unbox(PrimitiveKind::Int),
            ConversionStep::Widen {
                from: PrimitiveKind::Int,
                to: PrimitiveKind::Long,
            },
        ]
    );
    assert_eq!(mixed.right.steps(), &[ConversionStep::Unbox(PrimitiveKind::Long)]);
    assert_eq!(mixed.operation.mnemonics(), vec!["lcmp", "ifeq"]);
}

#[test]
fn distinct_boxes_with_equal_values_are_equal() {
    let expr = Expr::binary(
        BinaryOp::Eq,
        Expr::local("a", TypeDescriptor::Boxed(PrimitiveKind::Int), Span::default()),
        Expr::local("b", TypeDescriptor::Boxed(PrimitiveKind::Int), Span::default()),
    );
    let mut host = RecordingHost::default()
        .with_local("a", boxed(Const::Int(1000)))
        .with_local("b", boxed(Const::Int(1000)));
    assert_eq!(run(&expr, &mut host), Ok(Value::boolean(true)));

    let mut host = RecordingHost::default()
        .with_local("a", Value::Null)
        .with_local("b", boxed(Const::Int(1000)));
    assert!(matches!(
        run(&expr, &mut host),
        Err(EvalError::NullUnbox {
            kind: PrimitiveKind::Int,
            ..
        })
    ));
}

#[test]
fn null_equality() {
    let hierarchy = jdk();
    let lowerer = Lowerer::new(&hierarchy);
    let plan = lowerer
        .lower_binary(BinaryOp::Eq, &TypeDescriptor::Null, &TypeDescriptor::string())
        .unwrap();
    assert_eq!(plan.operation.domain(), OperandDomain::Reference);

    let err = lowerer
        .lower_binary(BinaryOp::Eq, &TypeDescriptor::Null, &TypeDescriptor::INT)
        .unwrap_err();
    assert!(matches!(err, LowerError::TypeMismatch { .. }));
}

#[test]
fn unrelated_references_use_objects_equals() {
    let hierarchy = jdk();
    let lowerer = Lowerer::new(&hierarchy);
    let pairs = [
        (TypeDescriptor::string(), TypeDescriptor::Boxed(PrimitiveKind::Int)),
        (TypeDescriptor::string(), TypeDescriptor::string()),
        (ty("java.lang.Number"), TypeDescriptor::Boxed(PrimitiveKind::Int)),
        (
            TypeDescriptor::Boxed(PrimitiveKind::Boolean),
            TypeDescriptor::Boxed(PrimitiveKind::Int),
        ),
    ];
    for (left, right) in pairs {
        let plan = lowerer.lower_binary(BinaryOp::Eq, &left, &right).unwrap();
        assert_eq!(
            plan.operation,
            Operation::ObjectEquals { op: BinaryOp::Eq },
            "{left} == {right}"
        );
        assert!(plan.left.is_empty() && plan.right.is_empty());
        assert_eq!(plan.result_type, TypeDescriptor::BOOLEAN);
    }

    let err = lowerer
        .lower_binary(BinaryOp::Ne, &ty("shapes.Missing"), &TypeDescriptor::string())
        .unwrap_err();
    assert!(matches!(
        err,
        LowerError::UnresolvedReference { name, .. } if name == "shapes.Missing"
    ));
}

#[test]
fn object_equality_at_runtime() {
    let expr = Expr::binary(
        BinaryOp::Eq,
        Expr::local("a", ty("java.lang.Object"), Span::default()),
        Expr::local("b", ty("java.lang.Object"), Span::default()),
    );
    let cases = [
        (object("java.lang.Object", 1), object("java.lang.Object", 1), true),
        (object("java.lang.Object", 1), object("java.lang.Object", 2), false),
        (object("java.lang.Object", 1), Value::Null, false),
        (Value::Null, Value::Null, true),
        (boxed(Const::Int(7)), boxed(Const::Int(7)), true),
        (boxed(Const::Int(7)), boxed(Const::Long(7)), false),
        (boxed(Const::Double(f64::NAN)), boxed(Const::Double(f64::NAN)), true),
        (boxed(Const::Double(0.0)), boxed(Const::Double(-0.0)), false),
    ];
    for (a, b, expected) in cases {
        let mut host = RecordingHost::default()
            .with_local("a", a.clone())
            .with_local("b", b.clone());
        assert_eq!(run(&expr, &mut host), Ok(Value::boolean(expected)), "{a} == {b}");
    }

    let ne = Expr::binary(
        BinaryOp::Ne,
        Expr::local("a", TypeDescriptor::string(), Span::default()),
        Expr::local("b", TypeDescriptor::Boxed(PrimitiveKind::Int), Span::default()),
    );
    let mut host = RecordingHost::default()
        .with_local("a", object("java.lang.String", 3))
        .with_local("b", boxed(Const::Int(3)));
    assert_eq!(run(&ne, &mut host), Ok(Value::boolean(true)));
}

#[test]
fn nan_comparisons_are_false() {
    let nan = f64::NAN;
    for op in [BinaryOp::Lt, BinaryOp::Le, BinaryOp::Gt, BinaryOp::Ge, BinaryOp::Eq] {
        assert_eq!(
            fold(&Expr::binary(op, double(nan), double(1.0))),
            Value::boolean(false),
            "NaN {op} 1.0"
        );
        assert_eq!(
            fold(&Expr::binary(op, double(1.0), double(nan))),
            Value::boolean(false),
            "1.0 {op} NaN"
        );
    }
    assert_eq!(
        fold(&Expr::binary(BinaryOp::Ne, double(nan), double(nan))),
        Value::boolean(true)
    );
}

#[test]
fn float_relational_bias() {
    let hierarchy = jdk();
    let lowerer = Lowerer::new(&hierarchy);
    let le = lowerer
        .lower_binary(BinaryOp::Le, &TypeDescriptor::FLOAT, &TypeDescriptor::INT)
        .unwrap();
    assert_eq!(le.operation.nan_bias(), Some(NanBias::Greater));
    assert_eq!(le.operation.mnemonics(), vec!["fcmpg", "ifle"]);
    assert_eq!(
        le.right.steps(),
        &[ConversionStep::Widen {
            from: PrimitiveKind::Int,
            to: PrimitiveKind::Float,
        }]
    );

    let gt = lowerer
        .lower_binary(BinaryOp::Gt, &TypeDescriptor::LONG, &TypeDescriptor::DOUBLE)
        .unwrap();
    assert_eq!(gt.operation.mnemonics(), vec!["dcmpl", "ifgt"]);
}

#[test]
fn shifts_keep_left_type_and_narrow_long_distance() {
    let hierarchy = jdk();
    let plan = Lowerer::new(&hierarchy)
        .lower_binary(BinaryOp::Shl, &TypeDescriptor::INT, &TypeDescriptor::LONG)
        .unwrap();
    assert_eq!(plan.result_type, TypeDescriptor::INT);
    assert_eq!(
        plan.right.steps(),
        &[ConversionStep::Narrow {
            from: PrimitiveKind::Long,
            to: PrimitiveKind::Int,
        }]
    );
    assert_eq!(
        plan.operation,
        Operation::Shift {
            op: BinaryOp::Shl,
            domain: OperandDomain::Int,
            distance_mask: 0x1f,
        }
    );
}

#[test]
fn shift_distances_are_masked() {
    assert_eq!(
        fold(&Expr::binary(BinaryOp::Shl, int(1), int(33))),
        Value::int(2)
    );
    assert_eq!(
        fold(&Expr::binary(BinaryOp::Shl, long(1), long(65))),
        Value::long(2)
    );
    assert_eq!(
        fold(&Expr::binary(BinaryOp::UShr, int(-1), int(28))),
        Value::int(15)
    );
    assert_eq!(
        fold(&Expr::binary(BinaryOp::Shr, int(-16), int(2))),
        Value::int(-4)
    );
    assert_eq!(
        fold(&Expr::binary(BinaryOp::UShr, long(-1), int(60))),
        Value::long(15)
    );
}

#[test]
fn floating_shift_is_a_mismatch() {
    let hierarchy = jdk();
    assert!(Lowerer::new(&hierarchy)
        .lower_binary(BinaryOp::Shr, &TypeDescriptor::FLOAT, &TypeDescriptor::INT)
        .is_err());
}
