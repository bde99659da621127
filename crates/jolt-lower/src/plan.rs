use std::fmt;

use jolt_types::{ConversionStep, Conversions, PrimitiveKind, TypeDescriptor};

use crate::BinaryOp;

/// The JVM value category an operation works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperandDomain {
    Int,
    Long,
    Float,
    Double,
    Boolean,
    Reference,
}

impl OperandDomain {
    /// Domain of a promoted primitive kind. `byte`/`short` never reach an operation unpromoted.
    pub fn of(kind: PrimitiveKind) -> Self {
        match kind {
            PrimitiveKind::Boolean => OperandDomain::Boolean,
            PrimitiveKind::Byte | PrimitiveKind::Short | PrimitiveKind::Int => OperandDomain::Int,
            PrimitiveKind::Long => OperandDomain::Long,
            PrimitiveKind::Float => OperandDomain::Float,
            PrimitiveKind::Double => OperandDomain::Double,
        }
    }

    fn prefix(self) -> char {
        match self {
            OperandDomain::Int | OperandDomain::Boolean => 'i',
            OperandDomain::Long => 'l',
            OperandDomain::Float => 'f',
            OperandDomain::Double => 'd',
            OperandDomain::Reference => 'a',
        }
    }
}

/// Result of a floating-point compare instruction when either operand is NaN.
///
/// `cmpg` pushes `1`, `cmpl` pushes `-1`. Choosing the bias that fails the following branch
/// makes every ordered comparison against NaN false.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NanBias {
    /// `fcmpg`/`dcmpg`
    Greater,
    /// `fcmpl`/`dcmpl`
    Less,
}

impl NanBias {
    pub fn nan_result(self) -> i32 {
        match self {
            NanBias::Greater => 1,
            NanBias::Less => -1,
        }
    }
}

/// The concrete operation selected for a binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Bitwise {
        op: BinaryOp,
        domain: OperandDomain,
    },
    /// Relational and primitive equality comparisons. Produces a boolean.
    Compare {
        op: BinaryOp,
        domain: OperandDomain,
        nan_bias: Option<NanBias>,
    },
    Shift {
        op: BinaryOp,
        domain: OperandDomain,
        /// Applied to the (int) distance before shifting.
        distance_mask: u8,
    },
    /// Null-safe value equality of two references through `java.util.Objects.equals`.
    ObjectEquals { op: BinaryOp },
}

impl Operation {
    pub fn op(&self) -> BinaryOp {
        match *self {
            Operation::Bitwise { op, .. }
            | Operation::Compare { op, .. }
            | Operation::Shift { op, .. }
            | Operation::ObjectEquals { op } => op,
        }
    }

    pub fn domain(&self) -> OperandDomain {
        match *self {
            Operation::Bitwise { domain, .. }
            | Operation::Compare { domain, .. }
            | Operation::Shift { domain, .. } => domain,
            Operation::ObjectEquals { .. } => OperandDomain::Reference,
        }
    }

    pub fn nan_bias(&self) -> Option<NanBias> {
        match *self {
            Operation::Compare { nan_bias, .. } => nan_bias,
            _ => None,
        }
    }

    /// Instruction mnemonics the emitter uses, in order.
    ///
    /// Comparisons end in the conditional branch taken when the comparison holds; the emitter
    /// supplies the branch target and materializes the boolean.
    pub fn mnemonics(&self) -> Vec<String> {
        let prefix = self.domain().prefix();
        match *self {
            Operation::Bitwise { op, .. } => {
                let name = match op {
                    BinaryOp::BitAnd => "and",
                    BinaryOp::BitOr => "or",
                    _ => "xor",
                };
                vec![format!("{prefix}{name}")]
            }
            Operation::Shift { op, .. } => {
                let name = match op {
                    BinaryOp::Shl => "shl",
                    BinaryOp::Shr => "shr",
                    _ => "ushr",
                };
                vec![format!("{prefix}{name}")]
            }
            Operation::Compare {
                op,
                domain,
                nan_bias,
            } => {
                let cond = condition(op);
                match domain {
                    OperandDomain::Int | OperandDomain::Boolean => {
                        vec![format!("if_icmp{cond}")]
                    }
                    OperandDomain::Long => vec!["lcmp".to_string(), format!("if{cond}")],
                    OperandDomain::Float | OperandDomain::Double => {
                        let suffix = match nan_bias.unwrap_or(NanBias::Less) {
                            NanBias::Greater => 'g',
                            NanBias::Less => 'l',
                        };
                        vec![format!("{prefix}cmp{suffix}"), format!("if{cond}")]
                    }
                    OperandDomain::Reference => vec![format!("if_acmp{cond}")],
                }
            }
            Operation::ObjectEquals { op } => {
                let branch = if op == BinaryOp::Ne { "ifeq" } else { "ifne" };
                vec![OBJECTS_EQUALS.to_string(), branch.to_string()]
            }
        }
    }
}

const OBJECTS_EQUALS: &str =
    "invokestatic java/util/Objects.equals:(Ljava/lang/Object;Ljava/lang/Object;)Z";

fn condition(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Lt => "lt",
        BinaryOp::Le => "le",
        BinaryOp::Gt => "gt",
        BinaryOp::Ge => "ge",
        BinaryOp::Ne => "ne",
        _ => "eq",
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mnemonics().join(" "))
    }
}

/// Everything the emitter needs to generate one binary operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPlan {
    pub left: Conversions,
    pub right: Conversions,
    pub operation: Operation,
    /// Static type of the operator's value, before any `result` conversions.
    pub result_type: TypeDescriptor,
    /// Conversions applied to the operator's value for the caller's context.
    pub result: Conversions,
}

impl OperationPlan {
    pub fn op(&self) -> BinaryOp {
        self.operation.op()
    }

    /// Box the value for a reference context. No-op if the result is already boxed.
    #[must_use]
    pub fn with_boxed_result(mut self) -> Self {
        if let TypeDescriptor::Primitive(kind) = self.result_type {
            if self.result.is_empty() {
                self.result = Conversions::single(ConversionStep::Box(kind));
            }
        }
        self
    }

    /// Static type of the value this plan produces.
    pub fn value_type(&self) -> TypeDescriptor {
        self.result.apply(&self.result_type)
    }
}
