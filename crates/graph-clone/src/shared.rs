//! Aliasing handles with object identity
//!
//! By-value Rust data cannot alias, so shared references and reference
//! cycles in a graph are expressed through [`Shared`], a reference-
//! counted mutable cell. The engine tracks object identity per cell
//! address: two handles to one cell clone to two handles to one new
//! cell, and a cycle back to an ancestor resolves to the ancestor's
//! in-progress clone.

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::sync::Arc;

use crate::reflect::{assign_value, Reflectable, SharedInfo, TypeInfo, TypeKind};

/// Shared, mutable handle to a value participating in a graph
///
/// Cloning the handle shares the cell; deep-cloning through the engine
/// duplicates the cell exactly once per operation, preserving sharing
/// and terminating cycles.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    /// Wrap a value in a fresh cell
    #[must_use]
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    /// Immutably borrow the interior value
    ///
    /// # Panics
    /// Panics if the value is currently mutably borrowed.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutably borrow the interior value
    ///
    /// # Panics
    /// Panics if the value is currently borrowed.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Whether two handles point at the same cell
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Stable identity of the cell for the duration of the handle
    #[must_use]
    pub fn address(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Shared").field(&self.0).finish()
    }
}

impl<T: Reflectable> Reflectable for Shared<T> {
    fn type_info() -> Arc<TypeInfo> {
        Arc::new(
            TypeInfo::of::<Shared<T>>(TypeKind::Shared(SharedInfo {
                inner: T::type_info,
                address: |source| {
                    let source = source
                        .downcast_ref::<Shared<T>>()
                        .ok_or_else(|| crate::CloneError::internal_downcast(std::any::type_name::<Shared<T>>()))?;
                    Ok(source.address())
                },
                duplicate_handle: assign_value::<Shared<T>>,
                new_cell: |interior| {
                    let interior = *interior
                        .downcast::<T>()
                        .map_err(|_| crate::CloneError::internal_downcast(std::any::type_name::<T>()))?;
                    Ok(Box::new(Shared::new(interior)) as Box<dyn Any>)
                },
                deep_interior: |source, target, settings, context| {
                    let source = source
                        .downcast_ref::<Shared<T>>()
                        .ok_or_else(|| crate::CloneError::internal_downcast(std::any::type_name::<Shared<T>>()))?;
                    let target = target
                        .downcast_ref::<Shared<T>>()
                        .ok_or_else(|| crate::CloneError::internal_downcast(std::any::type_name::<Shared<T>>()))?;
                    let cloned =
                        crate::cloner::deep_clone_internal(&*source.borrow(), settings, context)?;
                    *target.borrow_mut() = cloned;
                    Ok(())
                },
                shallow_interior: |source, target, settings, context| {
                    let source = source
                        .downcast_ref::<Shared<T>>()
                        .ok_or_else(|| crate::CloneError::internal_downcast(std::any::type_name::<Shared<T>>()))?;
                    let target = target
                        .downcast_ref::<Shared<T>>()
                        .ok_or_else(|| crate::CloneError::internal_downcast(std::any::type_name::<Shared<T>>()))?;
                    let cloned = crate::cloner::shallow_clone_internal(
                        &*source.borrow(),
                        settings,
                        context,
                    )?;
                    *target.borrow_mut() = cloned;
                    Ok(())
                },
            }))
            // Classifying a handle type as primitive shares the cell.
            .with_clone_value(assign_value::<Shared<T>>),
        )
    }
}
