use std::fmt;

use crate::{PrimitiveKind, Result, TypeDescriptor, TypeError};

/// One implicit conversion applied to an operand value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionStep {
    /// Widening primitive conversion (`int -> long`, `byte -> int`, ...).
    Widen {
        from: PrimitiveKind,
        to: PrimitiveKind,
    },
    /// Narrowing primitive conversion. Only produced for shift distances (`long -> int`).
    Narrow {
        from: PrimitiveKind,
        to: PrimitiveKind,
    },
    /// Wrapper of the given kind to its primitive value.
    Unbox(PrimitiveKind),
    /// Primitive of the given kind to its wrapper.
    Box(PrimitiveKind),
}

impl ConversionStep {
    /// Static type of the value before this step.
    #[must_use]
    pub fn source(&self) -> TypeDescriptor {
        match *self {
            ConversionStep::Widen { from, .. } | ConversionStep::Narrow { from, .. } => {
                TypeDescriptor::Primitive(from)
            }
            ConversionStep::Unbox(kind) => TypeDescriptor::Boxed(kind),
            ConversionStep::Box(kind) => TypeDescriptor::Primitive(kind),
        }
    }

    /// Static type of the value after this step.
    #[must_use]
    pub fn target(&self) -> TypeDescriptor {
        match *self {
            ConversionStep::Widen { to, .. } | ConversionStep::Narrow { to, .. } => {
                TypeDescriptor::Primitive(to)
            }
            ConversionStep::Unbox(kind) => TypeDescriptor::Primitive(kind),
            ConversionStep::Box(kind) => TypeDescriptor::Boxed(kind),
        }
    }

    /// JVM conversion opcode, if the step needs one.
    ///
    /// `byte`/`short`/`boolean` already live in an `int` stack slot, so widening among them and
    /// `int` is free.
    #[must_use]
    pub fn opcode(&self) -> Option<&'static str> {
        use PrimitiveKind::*;

        match *self {
            ConversionStep::Widen { from, to } | ConversionStep::Narrow { from, to } => {
                let from = if from.is_int_like() { Int } else { from };
                let to_slot = if to.is_int_like() { Int } else { to };
                match (from, to_slot) {
                    (Int, Long) => Some("i2l"),
                    (Int, Float) => Some("i2f"),
                    (Int, Double) => Some("i2d"),
                    (Long, Int) => Some("l2i"),
                    (Long, Float) => Some("l2f"),
                    (Long, Double) => Some("l2d"),
                    (Float, Double) => Some("f2d"),
                    _ => None,
                }
            }
            ConversionStep::Unbox(_) => Some("invokevirtual"),
            ConversionStep::Box(_) => Some("invokestatic"),
        }
    }
}

impl fmt::Display for ConversionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionStep::Widen { from, to } => write!(f, "widen({from} -> {to})"),
            ConversionStep::Narrow { from, to } => write!(f, "narrow({from} -> {to})"),
            ConversionStep::Unbox(kind) => write!(f, "unbox({})", kind.wrapper_class()),
            ConversionStep::Box(kind) => write!(f, "box({kind})"),
        }
    }
}

/// Ordered conversions for one operand.
///
/// Invariants: at most one `Unbox` and only as the first step; at most one `Box` and only as the
/// last step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Conversions {
    steps: Vec<ConversionStep>,
}

impl Conversions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn steps(&self) -> &[ConversionStep] {
        &self.steps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConversionStep> {
        self.steps.iter()
    }

    /// A single step. Any step is a valid sequence on its own.
    #[must_use]
    pub fn single(step: ConversionStep) -> Self {
        Self { steps: vec![step] }
    }

    /// Append a step, keeping the unbox-first / box-last ordering.
    pub fn try_push(&mut self, step: ConversionStep) -> Result<()> {
        if !self.can_push(&step) {
            return Err(TypeError::ConversionOrder {
                step,
                position: self.steps.len(),
            });
        }
        self.steps.push(step);
        Ok(())
    }

    /// Append a widening step unless `from == to`.
    pub fn try_widen(&mut self, from: PrimitiveKind, to: PrimitiveKind) -> Result<()> {
        if from == to {
            return Ok(());
        }
        self.try_push(ConversionStep::Widen { from, to })
    }

    fn can_push(&self, step: &ConversionStep) -> bool {
        if matches!(self.steps.last(), Some(ConversionStep::Box(_))) {
            return false;
        }
        match step {
            ConversionStep::Unbox(_) => self.steps.is_empty(),
            _ => true,
        }
    }

    /// The static type obtained by applying every step to `ty`.
    #[must_use]
    pub fn apply(&self, ty: &TypeDescriptor) -> TypeDescriptor {
        self.steps
            .last()
            .map(ConversionStep::target)
            .unwrap_or_else(|| ty.clone())
    }
}

impl<'a> IntoIterator for &'a Conversions {
    type Item = &'a ConversionStep;
    type IntoIter = std::slice::Iter<'a, ConversionStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

impl TryFrom<Vec<ConversionStep>> for Conversions {
    type Error = TypeError;

    fn try_from(steps: Vec<ConversionStep>) -> Result<Self> {
        let mut out = Conversions::new();
        for step in steps {
            out.try_push(step)?;
        }
        Ok(out)
    }
}
