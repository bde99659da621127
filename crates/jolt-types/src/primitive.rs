use std::fmt;

use serde::{Deserialize, Serialize};

/// Primitive value kinds understood by the operator engine.
///
/// The surface language has no `char`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveKind {
    pub const ALL: [PrimitiveKind; 7] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    /// Numeric kinds in promotion order.
    pub const NUMERIC: [PrimitiveKind; 6] = [
        PrimitiveKind::Byte,
        PrimitiveKind::Short,
        PrimitiveKind::Int,
        PrimitiveKind::Long,
        PrimitiveKind::Float,
        PrimitiveKind::Double,
    ];

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveKind::Boolean)
    }

    #[must_use]
    pub const fn is_integral(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Byte | PrimitiveKind::Short | PrimitiveKind::Int | PrimitiveKind::Long
        )
    }

    #[must_use]
    pub const fn is_floating(self) -> bool {
        matches!(self, PrimitiveKind::Float | PrimitiveKind::Double)
    }

    /// Position in the numeric promotion order (`byte < short < int < long < float < double`).
    ///
    /// `boolean` is not part of the numeric lattice.
    #[must_use]
    pub const fn rank(self) -> Option<u8> {
        match self {
            PrimitiveKind::Boolean => None,
            PrimitiveKind::Byte => Some(0),
            PrimitiveKind::Short => Some(1),
            PrimitiveKind::Int => Some(2),
            PrimitiveKind::Long => Some(3),
            PrimitiveKind::Float => Some(4),
            PrimitiveKind::Double => Some(5),
        }
    }

    /// Whether a value of this kind is represented by one JVM operand stack slot of type `int`.
    #[must_use]
    pub const fn is_int_like(self) -> bool {
        matches!(
            self,
            PrimitiveKind::Boolean | PrimitiveKind::Byte | PrimitiveKind::Short | PrimitiveKind::Int
        )
    }

    /// JVM field descriptor letter.
    #[must_use]
    pub const fn descriptor(self) -> char {
        match self {
            PrimitiveKind::Boolean => 'Z',
            PrimitiveKind::Byte => 'B',
            PrimitiveKind::Short => 'S',
            PrimitiveKind::Int => 'I',
            PrimitiveKind::Long => 'J',
            PrimitiveKind::Float => 'F',
            PrimitiveKind::Double => 'D',
        }
    }

    #[must_use]
    pub fn from_descriptor(descriptor: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.descriptor() == descriptor)
    }

    /// Surface-language keyword for this kind (`int`, `boolean`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Byte => "byte",
            PrimitiveKind::Short => "short",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Long => "long",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Double => "double",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Binary name of the wrapper class that boxes this kind.
    #[must_use]
    pub const fn wrapper_class(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "java.lang.Boolean",
            PrimitiveKind::Byte => "java.lang.Byte",
            PrimitiveKind::Short => "java.lang.Short",
            PrimitiveKind::Int => "java.lang.Integer",
            PrimitiveKind::Long => "java.lang.Long",
            PrimitiveKind::Float => "java.lang.Float",
            PrimitiveKind::Double => "java.lang.Double",
        }
    }

    /// Inverse of [`PrimitiveKind::wrapper_class`].
    #[must_use]
    pub fn from_wrapper_class(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.wrapper_class() == name)
    }

    /// Name of the accessor the wrapper exposes for unboxing (`intValue`, ...).
    #[must_use]
    pub const fn unbox_method(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "booleanValue",
            PrimitiveKind::Byte => "byteValue",
            PrimitiveKind::Short => "shortValue",
            PrimitiveKind::Int => "intValue",
            PrimitiveKind::Long => "longValue",
            PrimitiveKind::Float => "floatValue",
            PrimitiveKind::Double => "doubleValue",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unary numeric promotion: `byte` and `short` become `int`, every other kind is unchanged.
#[must_use]
pub fn unary_numeric_promotion(kind: PrimitiveKind) -> PrimitiveKind {
    match kind {
        PrimitiveKind::Byte | PrimitiveKind::Short => PrimitiveKind::Int,
        other => other,
    }
}

/// Binary numeric promotion of two numeric kinds.
///
/// Returns `None` when either side is `boolean`.
#[must_use]
pub fn binary_numeric_promotion(a: PrimitiveKind, b: PrimitiveKind) -> Option<PrimitiveKind> {
    if !a.is_numeric() || !b.is_numeric() {
        return None;
    }
    let a = unary_numeric_promotion(a);
    let b = unary_numeric_promotion(b);
    Some(if a.rank() >= b.rank() { a } else { b })
}

/// Whether `from` converts to `to` by a widening primitive conversion (or identity).
#[must_use]
pub fn is_widening(from: PrimitiveKind, to: PrimitiveKind) -> bool {
    if from == to {
        return true;
    }
    match (from.rank(), to.rank()) {
        (Some(f), Some(t)) => f < t,
        _ => false,
    }
}
