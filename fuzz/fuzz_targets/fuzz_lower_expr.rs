// Run locally (from the repo root):
//   cargo +nightly fuzz run fuzz_lower_expr -- -runs=1000
#![no_main]

use jolt_lower::{fold_constant, BinaryOp, Const, Expr, LogicalOp, Lowerer};
use jolt_types::{ClassHierarchy, PrimitiveKind, Span, TypeDescriptor};
use libfuzzer_sys::fuzz_target;

const MAX_DEPTH: usize = 6;

struct Bytes<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Bytes<'_> {
    fn next(&mut self) -> u8 {
        let byte = self.data.get(self.pos).copied().unwrap_or(0);
        self.pos += 1;
        byte
    }

    fn next_i64(&mut self) -> i64 {
        let mut buf = [0u8; 8];
        for slot in &mut buf {
            *slot = self.next();
        }
        i64::from_le_bytes(buf)
    }
}

fn descriptor(bytes: &mut Bytes<'_>) -> TypeDescriptor {
    let kind = PrimitiveKind::ALL[usize::from(bytes.next()) % PrimitiveKind::ALL.len()];
    match bytes.next() % 6 {
        0 => TypeDescriptor::Boxed(kind),
        1 => TypeDescriptor::object(),
        2 => TypeDescriptor::string(),
        3 => TypeDescriptor::reference("java.lang.Number"),
        _ => TypeDescriptor::Primitive(kind),
    }
}

fn literal(bytes: &mut Bytes<'_>) -> Const {
    let raw = bytes.next_i64();
    match bytes.next() % 7 {
        0 => Const::Boolean(raw & 1 == 1),
        1 => Const::Byte(raw as i8),
        2 => Const::Short(raw as i16),
        3 => Const::Int(raw as i32),
        4 => Const::Long(raw),
        5 => Const::Float(f32::from_bits(raw as u32)),
        _ => Const::Double(f64::from_bits(raw as u64)),
    }
}

fn expr(bytes: &mut Bytes<'_>, depth: usize) -> Expr {
    let span = Span::new(bytes.pos, bytes.pos + 1);
    let choice = if depth >= MAX_DEPTH { bytes.next() % 3 } else { bytes.next() % 7 };
    match choice {
        0 => Expr::literal(literal(bytes), span),
        1 => Expr::null(span),
        2 => Expr::local("x", descriptor(bytes), span),
        3 => {
            let op = BinaryOp::ALL[usize::from(bytes.next()) % BinaryOp::ALL.len()];
            Expr::binary(op, expr(bytes, depth + 1), expr(bytes, depth + 1))
        }
        4 => {
            let op = if bytes.next() & 1 == 0 { LogicalOp::And } else { LogicalOp::Or };
            Expr::logical(op, expr(bytes, depth + 1), expr(bytes, depth + 1))
        }
        5 => Expr::instance_of(expr(bytes, depth + 1), descriptor(bytes), span),
        _ => Expr::not(expr(bytes, depth + 1), span),
    }
}

fuzz_target!(|data: &[u8]| {
    let hierarchy = ClassHierarchy::with_minimal_jdk();
    let lowerer = Lowerer::new(&hierarchy);
    let mut bytes = Bytes { data, pos: 0 };
    let tree = expr(&mut bytes, 0);

    // Oracle: lowering and folding report errors, never panic.
    if let Ok(lowered) = lowerer.lower_expr(&tree) {
        let _ = fold_constant(&lowered);
    }
});
