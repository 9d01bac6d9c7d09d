//! Runtime-polymorphic values
//!
//! A member declared as `Box<dyn Polymorphic>` plays the role of a
//! field with an abstract static type: the engine inspects the value's
//! actual concrete type at clone time, resolves that type's contract,
//! and forwards to it, so the clone comes out as the concrete type.

use std::any::Any;
use std::sync::Arc;

use crate::error::CloneResult;
use crate::reflect::{DynamicInfo, Reflectable, TypeInfo, TypeKind};

/// Object-safe bridge from a trait object to its concrete descriptor
///
/// Blanket-implemented for every `Reflectable + Clone` type; callers
/// normally only ever name it as `Box<dyn Polymorphic>`. The blanket
/// impl also covers the box itself, so when holding a box, call
/// through `as_ref()` (or deref) to reach the concrete value instead
/// of the box's own descriptor.
pub trait Polymorphic: Any {
    /// Descriptor of the value's concrete type
    fn concrete_info(&self) -> Arc<TypeInfo>;

    /// The concrete value, erased
    fn as_reflect(&self) -> &dyn Any;

    /// Re-erase a cloned concrete value behind a fresh box
    ///
    /// Fails only if the engine hands back a value of the wrong type,
    /// which indicates a contract bug.
    fn rebox(&self, clone: Box<dyn Any>) -> CloneResult<Box<dyn Polymorphic>>;

    /// Duplicate the box by direct assignment of the concrete value
    fn clone_box(&self) -> Box<dyn Polymorphic>;
}

impl<T: Reflectable + Clone> Polymorphic for T {
    fn concrete_info(&self) -> Arc<TypeInfo> {
        T::type_info()
    }

    fn as_reflect(&self) -> &dyn Any {
        self
    }

    fn rebox(&self, clone: Box<dyn Any>) -> CloneResult<Box<dyn Polymorphic>> {
        match clone.downcast::<T>() {
            Ok(value) => Ok(value as Box<dyn Polymorphic>),
            Err(_) => Err(crate::CloneError::internal_downcast(
                std::any::type_name::<T>(),
            )),
        }
    }

    fn clone_box(&self) -> Box<dyn Polymorphic> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Polymorphic> {
    fn clone(&self) -> Self {
        self.as_ref().clone_box()
    }
}

impl Reflectable for Box<dyn Polymorphic> {
    fn type_info() -> Arc<TypeInfo> {
        Arc::new(
            // The thunks dispatch through the trait-object vtable
            // explicitly; calling the methods on the box would hit the
            // blanket impl for the box type and describe the box
            // instead of the interior value.
            TypeInfo::of::<Box<dyn Polymorphic>>(TypeKind::Dynamic(DynamicInfo {
                concrete_info: |source| {
                    let source = source.downcast_ref::<Box<dyn Polymorphic>>().ok_or_else(|| {
                        crate::CloneError::internal_downcast("Box<dyn Polymorphic>")
                    })?;
                    Ok((**source).concrete_info())
                },
                concrete_value: |source| {
                    let source = source.downcast_ref::<Box<dyn Polymorphic>>().ok_or_else(|| {
                        crate::CloneError::internal_downcast("Box<dyn Polymorphic>")
                    })?;
                    Ok((**source).as_reflect())
                },
                rebox: |source, clone| {
                    let source = source.downcast_ref::<Box<dyn Polymorphic>>().ok_or_else(|| {
                        crate::CloneError::internal_downcast("Box<dyn Polymorphic>")
                    })?;
                    Ok(Box::new((**source).rebox(clone)?) as Box<dyn Any>)
                },
            }))
            .with_clone_value(|source| {
                let source = source.downcast_ref::<Box<dyn Polymorphic>>().ok_or_else(|| {
                    crate::CloneError::internal_downcast("Box<dyn Polymorphic>")
                })?;
                Ok(Box::new(source.clone()) as Box<dyn Any>)
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::TypeId;

    #[test]
    fn concrete_info_reports_interior_type() {
        let boxed: Box<dyn Polymorphic> = Box::new(42u64);
        assert_eq!(boxed.as_ref().concrete_info().id(), TypeId::of::<u64>());
    }

    #[test]
    fn clone_box_copies_value() {
        let boxed: Box<dyn Polymorphic> = Box::new(String::from("abc"));
        let copy = boxed.clone();
        assert_eq!(
            copy.as_ref().as_reflect().downcast_ref::<String>().map(String::as_str),
            Some("abc")
        );
    }

    #[test]
    fn rebox_rejects_foreign_values() {
        let boxed: Box<dyn Polymorphic> = Box::new(1u8);
        let err = boxed.as_ref().rebox(Box::new("wrong")).err().unwrap();
        assert!(matches!(err, crate::CloneError::Internal(_)));
    }

    #[test]
    fn box_descriptor_is_dynamic_shaped() {
        let info = <Box<dyn Polymorphic>>::type_info();
        assert!(matches!(info.kind(), TypeKind::Dynamic(_)));
    }

    #[test]
    fn dynamic_thunks_reach_the_interior_value() {
        let info = <Box<dyn Polymorphic>>::type_info();
        let TypeKind::Dynamic(ops) = info.kind() else {
            panic!("expected dynamic shape");
        };

        let boxed: Box<dyn Polymorphic> = Box::new(7u32);
        // The thunks must describe the interior value, never the box's
        // own dynamic descriptor.
        let concrete = (ops.concrete_info)(&boxed).unwrap();
        assert_eq!(concrete.id(), TypeId::of::<u32>());
        assert!(matches!(concrete.kind(), TypeKind::Value));
        let value = (ops.concrete_value)(&boxed).unwrap();
        assert_eq!(value.downcast_ref::<u32>(), Some(&7));
    }
}
