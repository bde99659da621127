use crate::{
    is_widening, ConversionStep, Conversions, Result, TypeDescriptor, TypeError, TypeHierarchy,
};

/// Strip a wrapper so the operand can take part in primitive arithmetic.
///
/// Boxed operands become their primitive kind with a single `Unbox` step. Primitive, reference
/// and null operands are returned unchanged; references are never implicitly unboxed.
pub fn prepare_operand(ty: &TypeDescriptor) -> (TypeDescriptor, Conversions) {
    match ty {
        TypeDescriptor::Boxed(kind) => (
            TypeDescriptor::Primitive(*kind),
            Conversions::single(ConversionStep::Unbox(*kind)),
        ),
        other => (other.clone(), Conversions::new()),
    }
}

/// Conversions that take a value of type `from` into a caller-declared context of type `to`.
///
/// Boxing only happens here, i.e. when the caller asks for a reference context.
pub fn assignment_conversions(
    from: &TypeDescriptor,
    to: &TypeDescriptor,
    hierarchy: &dyn TypeHierarchy,
) -> Result<Conversions> {
    let mismatch = || TypeError::mismatch("assignment", from, to);
    let mut conversions = Conversions::new();
    if from == to {
        return Ok(conversions);
    }

    match (from, to) {
        (TypeDescriptor::Primitive(f), TypeDescriptor::Primitive(t)) => {
            if !is_widening(*f, *t) {
                return Err(mismatch());
            }
            conversions.try_widen(*f, *t)?;
        }
        (TypeDescriptor::Primitive(f), TypeDescriptor::Boxed(t)) => {
            if f != t {
                return Err(mismatch());
            }
            conversions.try_push(ConversionStep::Box(*f))?;
        }
        (TypeDescriptor::Primitive(f), TypeDescriptor::Reference(target)) => {
            if !hierarchy.is_subtype(f.wrapper_class(), &target.name) {
                return Err(mismatch());
            }
            conversions.try_push(ConversionStep::Box(*f))?;
        }
        (TypeDescriptor::Boxed(f), TypeDescriptor::Primitive(t)) => {
            if !is_widening(*f, *t) {
                return Err(mismatch());
            }
            conversions.try_push(ConversionStep::Unbox(*f))?;
            conversions.try_widen(*f, *t)?;
        }
        (TypeDescriptor::Null, TypeDescriptor::Boxed(_) | TypeDescriptor::Reference(_)) => {}
        (
            TypeDescriptor::Boxed(_) | TypeDescriptor::Reference(_),
            TypeDescriptor::Boxed(_) | TypeDescriptor::Reference(_),
        ) => {
            let (Some(sub), Some(sup)) = (from.class_name(), to.class_name()) else {
                return Err(mismatch());
            };
            if !hierarchy.contains(&sub) {
                return Err(TypeError::UnresolvedReference(sub.into_owned()));
            }
            if !hierarchy.contains(&sup) {
                return Err(TypeError::UnresolvedReference(sup.into_owned()));
            }
            if !hierarchy.is_subtype(&sub, &sup) {
                return Err(mismatch());
            }
        }
        _ => return Err(mismatch()),
    }
    Ok(conversions)
}
