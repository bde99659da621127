use std::borrow::Cow;
use std::fmt;

use crate::PrimitiveKind;

pub const JAVA_LANG_OBJECT: &str = "java.lang.Object";
pub const JAVA_LANG_NUMBER: &str = "java.lang.Number";
pub const JAVA_LANG_STRING: &str = "java.lang.String";

/// A named reference type together with the direct supertypes its declaration names.
///
/// The declared list is informational: subtype questions are answered by a
/// [`crate::TypeHierarchy`], which owns the transitively closed relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceType {
    pub name: String,
    pub declared_supertypes: Vec<String>,
}

impl ReferenceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_supertypes: Vec::new(),
        }
    }

    pub fn with_supertypes<I, S>(name: impl Into<String>, supertypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            declared_supertypes: supertypes.into_iter().map(Into::into).collect(),
        }
    }

    /// Binary name with `/` separators, as used in class files (`java/lang/String`).
    #[must_use]
    pub fn internal_name(&self) -> String {
        self.name.replace('.', "/")
    }
}

/// Static type of an operand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    /// Wrapper class of exactly one primitive kind. Values of this type may be null.
    Boxed(PrimitiveKind),
    Reference(ReferenceType),
    /// The type of a literal `null` written inline.
    Null,
}

impl TypeDescriptor {
    pub const BOOLEAN: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveKind::Boolean);
    pub const BYTE: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveKind::Byte);
    pub const SHORT: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveKind::Short);
    pub const INT: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveKind::Int);
    pub const LONG: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveKind::Long);
    pub const FLOAT: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveKind::Float);
    pub const DOUBLE: TypeDescriptor = TypeDescriptor::Primitive(PrimitiveKind::Double);

    /// A reference type by name. Wrapper class names become [`TypeDescriptor::Boxed`].
    pub fn reference(name: impl Into<String>) -> Self {
        let name = name.into();
        match PrimitiveKind::from_wrapper_class(&name) {
            Some(kind) => TypeDescriptor::Boxed(kind),
            None => TypeDescriptor::Reference(ReferenceType::new(name)),
        }
    }

    pub fn object() -> Self {
        Self::reference(JAVA_LANG_OBJECT)
    }

    pub fn string() -> Self {
        Self::reference(JAVA_LANG_STRING)
    }

    #[must_use]
    pub fn as_primitive(&self) -> Option<PrimitiveKind> {
        match self {
            TypeDescriptor::Primitive(kind) => Some(*kind),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeDescriptor::Primitive(_))
    }

    /// Everything except primitives is a reference (including the null type).
    #[must_use]
    pub fn is_reference(&self) -> bool {
        !self.is_primitive()
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, TypeDescriptor::Null)
    }

    /// Binary class name for reference-like descriptors.
    #[must_use]
    pub fn class_name(&self) -> Option<Cow<'_, str>> {
        match self {
            TypeDescriptor::Boxed(kind) => Some(Cow::Borrowed(kind.wrapper_class())),
            TypeDescriptor::Reference(reference) => Some(Cow::Borrowed(reference.name.as_str())),
            TypeDescriptor::Primitive(_) | TypeDescriptor::Null => None,
        }
    }

    /// JVM field descriptor (`I`, `Ljava/lang/Integer;`, ...). The null type has none.
    #[must_use]
    pub fn jvm_descriptor(&self) -> Option<String> {
        match self {
            TypeDescriptor::Primitive(kind) => Some(kind.descriptor().to_string()),
            TypeDescriptor::Null => None,
            _ => self
                .class_name()
                .map(|name| format!("L{};", name.replace('.', "/"))),
        }
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(kind: PrimitiveKind) -> Self {
        TypeDescriptor::Primitive(kind)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Primitive(kind) => write!(f, "{kind}"),
            TypeDescriptor::Boxed(kind) => f.write_str(kind.wrapper_class()),
            TypeDescriptor::Reference(reference) => f.write_str(&reference.name),
            TypeDescriptor::Null => f.write_str("null"),
        }
    }
}
