use std::fmt;

use jolt_types::{PrimitiveKind, TypeDescriptor};

/// A primitive constant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Const {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
}

impl Const {
    pub fn kind(self) -> PrimitiveKind {
        match self {
            Const::Boolean(_) => PrimitiveKind::Boolean,
            Const::Byte(_) => PrimitiveKind::Byte,
            Const::Short(_) => PrimitiveKind::Short,
            Const::Int(_) => PrimitiveKind::Int,
            Const::Long(_) => PrimitiveKind::Long,
            Const::Float(_) => PrimitiveKind::Float,
            Const::Double(_) => PrimitiveKind::Double,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            Const::Boolean(value) => Some(value),
            _ => None,
        }
    }

    fn as_i64(self) -> Option<i64> {
        match self {
            Const::Byte(v) => Some(i64::from(v)),
            Const::Short(v) => Some(i64::from(v)),
            Const::Int(v) => Some(i64::from(v)),
            Const::Long(v) => Some(v),
            _ => None,
        }
    }

    fn as_f64(self) -> Option<f64> {
        match self {
            Const::Float(v) => Some(f64::from(v)),
            Const::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Primitive conversion with JVM semantics: integral narrowing keeps the low bits,
    /// floating to integral saturates and maps NaN to zero.
    ///
    /// Returns `None` between `boolean` and a numeric kind.
    pub fn convert(self, to: PrimitiveKind) -> Option<Const> {
        if self.kind() == to {
            return Some(self);
        }
        if !self.kind().is_numeric() || !to.is_numeric() {
            return None;
        }

        if let Some(v) = self.as_i64() {
            return Some(match to {
                PrimitiveKind::Byte => Const::Byte(v as i8),
                PrimitiveKind::Short => Const::Short(v as i16),
                PrimitiveKind::Int => Const::Int(v as i32),
                PrimitiveKind::Long => Const::Long(v),
                PrimitiveKind::Float => Const::Float(v as f32),
                PrimitiveKind::Double => Const::Double(v as f64),
                PrimitiveKind::Boolean => return None,
            });
        }

        let v = self.as_f64()?;
        Some(match to {
            // f2i then i2b / i2s
            PrimitiveKind::Byte => Const::Byte(v as i32 as i8),
            PrimitiveKind::Short => Const::Short(v as i32 as i16),
            PrimitiveKind::Int => Const::Int(v as i32),
            PrimitiveKind::Long => Const::Long(v as i64),
            PrimitiveKind::Float => Const::Float(v as f32),
            PrimitiveKind::Double => Const::Double(v),
            PrimitiveKind::Boolean => return None,
        })
    }
}

impl fmt::Display for Const {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Const::Boolean(v) => write!(f, "{v}"),
            Const::Byte(v) => write!(f, "{v}"),
            Const::Short(v) => write!(f, "{v}"),
            Const::Int(v) => write!(f, "{v}"),
            Const::Long(v) => write!(f, "{v}L"),
            Const::Float(v) => write!(f, "{v}f"),
            Const::Double(v) => write!(f, "{v}"),
        }
    }
}

/// A runtime value seen by the plan evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Primitive(Const),
    /// A wrapper object holding the constant.
    Boxed(Const),
    /// An instance of the named class. `id` is its identity.
    Object { class: String, id: u32 },
    Null,
}

impl Value {
    pub fn int(value: i32) -> Self {
        Value::Primitive(Const::Int(value))
    }

    pub fn long(value: i64) -> Self {
        Value::Primitive(Const::Long(value))
    }

    pub fn boolean(value: bool) -> Self {
        Value::Primitive(Const::Boolean(value))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Primitive(c) => c.as_bool(),
            _ => None,
        }
    }

    /// Dynamic class of a non-null reference value.
    pub fn runtime_class(&self) -> Option<&str> {
        match self {
            Value::Boxed(c) => Some(c.kind().wrapper_class()),
            Value::Object { class, .. } => Some(class.as_str()),
            Value::Primitive(_) | Value::Null => None,
        }
    }

    /// Whether a value may be stored in a slot of static type `ty`, without consulting a
    /// hierarchy for reference types.
    pub(crate) fn fits(&self, ty: &TypeDescriptor) -> bool {
        match (self, ty) {
            (Value::Primitive(c), TypeDescriptor::Primitive(kind)) => c.kind() == *kind,
            (Value::Boxed(c), TypeDescriptor::Boxed(kind)) => c.kind() == *kind,
            (Value::Null, TypeDescriptor::Primitive(_)) => false,
            (Value::Null, _) => true,
            (Value::Boxed(_) | Value::Object { .. }, TypeDescriptor::Reference(_)) => true,
            _ => false,
        }
    }
}

impl From<Const> for Value {
    fn from(value: Const) -> Self {
        Value::Primitive(value)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Primitive(c) => write!(f, "{c}"),
            Value::Boxed(c) => write!(f, "{}({c})", c.kind().wrapper_class()),
            Value::Object { class, id } => write!(f, "{class}@{id}"),
            Value::Null => f.write_str("null"),
        }
    }
}
