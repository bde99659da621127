use jolt_types::{Span, TypeDescriptor, TypeError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LowerError {
    #[error("operator `{op}` cannot be applied to `{left}` and `{right}`")]
    TypeMismatch {
        op: String,
        left: TypeDescriptor,
        right: TypeDescriptor,
        span: Span,
    },
    #[error("unsupported operator `{token}`")]
    UnsupportedOperator { token: String, span: Span },
    #[error("unresolved reference type `{name}`")]
    UnresolvedReference { name: String, span: Span },
}

impl LowerError {
    pub(crate) fn mismatch(op: impl Into<String>, left: &TypeDescriptor, right: &TypeDescriptor) -> Self {
        LowerError::TypeMismatch {
            op: op.into(),
            left: left.clone(),
            right: right.clone(),
            span: Span::default(),
        }
    }

    pub(crate) fn unresolved(name: impl Into<String>) -> Self {
        LowerError::UnresolvedReference {
            name: name.into(),
            span: Span::default(),
        }
    }

    /// Convert a type error raised while lowering operator `op`.
    pub(crate) fn from_type_error(err: TypeError, op: &str) -> Self {
        match err {
            TypeError::TypeMismatch { left, right, .. } => LowerError::TypeMismatch {
                op: op.to_string(),
                left,
                right,
                span: Span::default(),
            },
            other => other.into(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            LowerError::TypeMismatch { span, .. }
            | LowerError::UnsupportedOperator { span, .. }
            | LowerError::UnresolvedReference { span, .. } => *span,
        }
    }

    /// Attach `span` unless the error already carries a more specific one.
    #[must_use]
    pub fn with_span(mut self, new_span: Span) -> Self {
        match &mut self {
            LowerError::TypeMismatch { span, .. }
            | LowerError::UnsupportedOperator { span, .. }
            | LowerError::UnresolvedReference { span, .. } => {
                if span.is_empty() {
                    *span = new_span;
                }
            }
        }
        self
    }
}

impl From<TypeError> for LowerError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::TypeMismatch {
                context,
                left,
                right,
            } => LowerError::TypeMismatch {
                op: context.to_string(),
                left,
                right,
                span: Span::default(),
            },
            TypeError::UnresolvedReference(name) => LowerError::unresolved(name),
            TypeError::ConversionOrder { step, .. } => LowerError::TypeMismatch {
                op: "conversion".to_string(),
                left: step.source(),
                right: step.target(),
                span: Span::default(),
            },
        }
    }
}
