//! Static types for the operator-lowering engine.
//!
//! This crate owns the value-level vocabulary shared by the rest of the workspace: primitive
//! kinds and their promotion lattice, operand [`TypeDescriptor`]s, the implicit conversions an
//! operand can undergo, and the reference supertype relation consulted by type tests.

use std::fmt;

mod alias;
mod boxing;
mod conversion;
mod descriptor;
mod hierarchy;
mod primitive;
mod promote;

pub use alias::TypeAliases;
pub use boxing::{assignment_conversions, prepare_operand};
pub use conversion::{ConversionStep, Conversions};
pub use descriptor::{
    ReferenceType, TypeDescriptor, JAVA_LANG_NUMBER, JAVA_LANG_OBJECT, JAVA_LANG_STRING,
};
pub use hierarchy::{ClassHierarchy, ClassInfo, ClassKind, HierarchyError, TypeHierarchy};
pub use primitive::{
    binary_numeric_promotion, is_widening, unary_numeric_promotion, PrimitiveKind,
};
pub use promote::{promote, promote_with, OperatorCategory, PromotedPair, PromotionOptions};

/// A byte-span into a source string.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Smallest span covering both `self` and `other`.
    #[must_use]
    pub fn cover(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.start, self.end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    #[error("type mismatch in {context}: `{left}` and `{right}`")]
    TypeMismatch {
        context: &'static str,
        left: TypeDescriptor,
        right: TypeDescriptor,
    },
    #[error("unresolved reference type `{0}`")]
    UnresolvedReference(String),
    /// An `Unbox` after another step, or any step after a `Box`.
    #[error("conversion `{step}` cannot appear at position {position}")]
    ConversionOrder {
        step: ConversionStep,
        position: usize,
    },
}

impl TypeError {
    pub(crate) fn mismatch(
        context: &'static str,
        left: &TypeDescriptor,
        right: &TypeDescriptor,
    ) -> Self {
        TypeError::TypeMismatch {
            context,
            left: left.clone(),
            right: right.clone(),
        }
    }
}

pub type Result<T, E = TypeError> = std::result::Result<T, E>;
