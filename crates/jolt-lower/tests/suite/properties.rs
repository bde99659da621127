use jolt_lower::{BinaryOp, Const, Expr, LogicalOp, TypeTestOutcome, Value};
use jolt_types::{PrimitiveKind, Span, TypeDescriptor};
use proptest::prelude::*;

use super::{boolean, double, fold, int, jdk, long, run, RecordingHost};

const PROPTEST_CASES: u32 = 256;

fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::binary(op, left, right)
}

fn arb_reference() -> impl Strategy<Value = TypeDescriptor> {
    prop::sample::select(vec![
        TypeDescriptor::object(),
        TypeDescriptor::string(),
        TypeDescriptor::reference("java.lang.Number"),
        TypeDescriptor::reference("java.lang.Comparable"),
        TypeDescriptor::Boxed(PrimitiveKind::Int),
        TypeDescriptor::Boxed(PrimitiveKind::Double),
        TypeDescriptor::Boxed(PrimitiveKind::Boolean),
    ])
}

proptest! {
    #![proptest_config(ProptestConfig { cases: PROPTEST_CASES, .. ProptestConfig::default() })]

    #[test]
    fn int_bitwise_identities(a in any::<i32>(), b in any::<i32>()) {
        prop_assert_eq!(fold(&bin(BinaryOp::BitAnd, int(a), int(a))), Value::int(a));
        prop_assert_eq!(fold(&bin(BinaryOp::BitXor, int(a), int(a))), Value::int(0));
        prop_assert_eq!(
            fold(&bin(BinaryOp::BitXor, bin(BinaryOp::BitXor, int(a), int(b)), int(b))),
            Value::int(a)
        );
        prop_assert_eq!(fold(&bin(BinaryOp::BitOr, int(a), int(b))), Value::int(a | b));
    }

    #[test]
    fn long_bitwise_identities(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(fold(&bin(BinaryOp::BitAnd, long(a), long(a))), Value::long(a));
        prop_assert_eq!(fold(&bin(BinaryOp::BitXor, long(a), long(a))), Value::long(0));
        prop_assert_eq!(
            fold(&bin(BinaryOp::BitXor, bin(BinaryOp::BitXor, long(a), long(b)), long(b))),
            Value::long(a)
        );
    }

    #[test]
    fn mixed_width_bitand_sign_extends(a in any::<i32>(), b in any::<i64>()) {
        prop_assert_eq!(
            fold(&bin(BinaryOp::BitAnd, int(a), long(b))),
            Value::long(i64::from(a) & b)
        );
    }

    #[test]
    fn long_relational_matches_total_order(a in any::<i64>(), b in any::<i64>()) {
        prop_assert_eq!(fold(&bin(BinaryOp::Lt, long(a), long(b))), Value::boolean(a < b));
        prop_assert_eq!(fold(&bin(BinaryOp::Ge, long(a), long(b))), Value::boolean(a >= b));
    }

    #[test]
    fn double_relational_matches_ieee(
        a in prop_oneof![any::<f64>(), Just(f64::NAN)],
        b in prop_oneof![any::<f64>(), Just(f64::NAN)],
    ) {
        prop_assert_eq!(fold(&bin(BinaryOp::Lt, double(a), double(b))), Value::boolean(a < b));
        prop_assert_eq!(fold(&bin(BinaryOp::Le, double(a), double(b))), Value::boolean(a <= b));
        prop_assert_eq!(fold(&bin(BinaryOp::Gt, double(a), double(b))), Value::boolean(a > b));
        prop_assert_eq!(fold(&bin(BinaryOp::Ge, double(a), double(b))), Value::boolean(a >= b));
        prop_assert_eq!(fold(&bin(BinaryOp::Ne, double(a), double(b))), Value::boolean(a != b));
    }

    #[test]
    fn short_circuit_never_calls_right(left in any::<bool>(), right in any::<bool>(), is_and in any::<bool>()) {
        let op = if is_and { LogicalOp::And } else { LogicalOp::Or };
        let expr = Expr::logical(
            op,
            boolean(left),
            Expr::call("rhs", TypeDescriptor::BOOLEAN, Span::default()),
        );
        let mut host = RecordingHost::default().with_call("rhs", Value::boolean(right));
        let value = run(&expr, &mut host).unwrap();

        let expected = if is_and { left && right } else { left || right };
        prop_assert_eq!(value, Value::boolean(expected));
        let short_circuits = left == op.short_circuit_value();
        prop_assert_eq!(host.call_count("rhs"), if short_circuits { 0 } else { 1 });
    }

    #[test]
    fn null_instanceof_anything_is_false(target in arb_reference()) {
        let hierarchy = jdk();
        let plan = jolt_lower::Lowerer::new(&hierarchy)
            .plan_instance_of(&TypeDescriptor::Null, &target)
            .unwrap();
        prop_assert_eq!(plan.outcome, TypeTestOutcome::AlwaysFalse);
        prop_assert!(plan.runtime_check_against().is_none());
    }

    #[test]
    fn byte_short_relational_is_int_comparison(a in any::<i8>(), b in any::<i16>()) {
        let expr = bin(
            BinaryOp::Gt,
            Expr::literal(Const::Byte(a), Span::default()),
            Expr::literal(Const::Short(b), Span::default()),
        );
        prop_assert_eq!(fold(&expr), Value::boolean(i16::from(a) > b));
    }
}
