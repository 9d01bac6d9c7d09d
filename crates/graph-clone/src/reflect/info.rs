//! Type descriptors and shape vtables
//!
//! [`TypeInfo`] identifies a concrete type at runtime and tells the
//! factory chain how values of that type are put together. The shape
//! vtables hold only plain `fn` pointers, so every descriptor is
//! `Send + Sync` and can be shared freely once built.

use std::any::{Any, TypeId};
use std::sync::Arc;

use crate::context::CloneContext;
use crate::error::CloneResult;
use crate::settings::CloneSettings;

/// Copy a value by direct assignment (`Clone::clone`, no recursion)
pub type AssignFn = fn(&dyn Any) -> CloneResult<Box<dyn Any>>;

/// Recursively duplicate a value through the resolver
pub type DeepFn = fn(&dyn Any, &CloneSettings, &mut CloneContext) -> CloneResult<Box<dyn Any>>;

/// Produce the type descriptor of a related type, lazily
///
/// Member and element descriptors are functions rather than values so
/// self-referential types can be registered without infinite regress.
pub type InfoFn = fn() -> Arc<TypeInfo>;

/// Runtime type descriptor
///
/// Immutable after construction; the resolver caches contracts keyed
/// by [`TypeInfo::id`]. One descriptor is built per type on first use.
#[derive(Debug)]
pub struct TypeInfo {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
    clone_value: Option<AssignFn>,
    default_instance: Option<fn() -> Box<dyn Any>>,
}

impl TypeInfo {
    /// Create a descriptor for `T` with the given shape
    #[must_use]
    pub fn of<T: Any>(kind: TypeKind) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind,
            clone_value: None,
            default_instance: None,
        }
    }

    /// Convenience descriptor for a primitive-classified value type
    ///
    /// Deep and shallow copies of such types are both plain assignment.
    #[must_use]
    pub fn value<T: Any + Clone + Default>() -> Arc<Self> {
        Arc::new(
            Self::of::<T>(TypeKind::Value)
                .with_clone_value(|source| {
                    let source = source
                        .downcast_ref::<T>()
                        .ok_or_else(|| crate::CloneError::internal_downcast(std::any::type_name::<T>()))?;
                    Ok(Box::new(source.clone()) as Box<dyn Any>)
                })
                .with_default_instance(|| Box::new(T::default())),
        )
    }

    /// Attach a direct-assignment copy procedure
    #[must_use]
    pub fn with_clone_value(mut self, f: AssignFn) -> Self {
        self.clone_value = Some(f);
        self
    }

    /// Attach a zero-argument constructor
    #[must_use]
    pub fn with_default_instance(mut self, f: fn() -> Box<dyn Any>) -> Self {
        self.default_instance = Some(f);
        self
    }

    /// Attach an optional zero-argument constructor
    #[must_use]
    pub fn with_default(mut self, f: Option<fn() -> Box<dyn Any>>) -> Self {
        self.default_instance = f;
        self
    }

    /// Identity of the described type
    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Runtime name of the described type
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Structural shape of the described type
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// Direct-assignment copy procedure, if the type registered one
    #[inline]
    #[must_use]
    pub fn clone_value(&self) -> Option<AssignFn> {
        self.clone_value
    }

    /// Zero-argument constructor, if the type registered one
    #[inline]
    #[must_use]
    pub fn default_instance(&self) -> Option<fn() -> Box<dyn Any>> {
        self.default_instance
    }
}

/// Shape taxonomy driving built-in factory dispatch
#[derive(Debug)]
pub enum TypeKind {
    /// Immutable scalar or string; copied by assignment
    Value,
    /// `Option<T>`; the absent case short-circuits to absent
    Optional(OptionalInfo),
    /// Fixed-length array `[T; N]`
    Array(ArrayInfo),
    /// Ordered or unordered element collection
    Sequence(SequenceInfo),
    /// Key-value map
    Map(MapInfo),
    /// Record type with registered members
    Record(RecordInfo),
    /// Aliasing handle with object identity ([`crate::Shared`])
    Shared(SharedInfo),
    /// Trait object whose concrete type is only known at runtime
    Dynamic(DynamicInfo),
    /// Third-party type the engine cannot introspect; requires a
    /// caller-supplied contract factory
    Opaque,
}

/// Shape vtable for `Option<T>`
#[derive(Debug, Clone, Copy)]
pub struct OptionalInfo {
    /// Descriptor of the wrapped type
    pub inner: InfoFn,
    /// Borrow the wrapped value, or `None` when absent
    pub as_some: fn(&dyn Any) -> CloneResult<Option<&dyn Any>>,
    /// Produce the absent value
    pub none: fn() -> Box<dyn Any>,
    /// Wrap a cloned inner value back into the option
    pub wrap_some: fn(Box<dyn Any>) -> CloneResult<Box<dyn Any>>,
    /// Assignment copy of the wrapped value
    pub assign_inner: AssignFn,
    /// Recursive duplication of the wrapped value
    pub deep_inner: DeepFn,
}

/// Shape vtable for `[T; N]`
#[derive(Debug, Clone, Copy)]
pub struct ArrayInfo {
    /// Descriptor of the element type
    pub element: InfoFn,
    /// Number of elements
    pub len: usize,
    /// Rebuild the array by mapping every source element, index order
    pub rebuild:
        fn(&dyn Any, &mut dyn FnMut(&dyn Any) -> CloneResult<Box<dyn Any>>) -> CloneResult<Box<dyn Any>>,
    /// Assignment copy of one element
    pub assign_element: AssignFn,
    /// Recursive duplication of one element
    pub deep_element: DeepFn,
}

/// Shape vtable for element collections
#[derive(Debug, Clone, Copy)]
pub struct SequenceInfo {
    /// Descriptor of the element type
    pub element: InfoFn,
    /// Rebuild the collection by mapping every source element in
    /// natural iteration order
    pub rebuild:
        fn(&dyn Any, &mut dyn FnMut(&dyn Any) -> CloneResult<Box<dyn Any>>) -> CloneResult<Box<dyn Any>>,
    /// Assignment copy of one element
    pub assign_element: AssignFn,
    /// Recursive duplication of one element
    pub deep_element: DeepFn,
}

/// Shape vtable for key-value maps
///
/// Key and value types are classified primitive-or-not independently
/// by the contract built over this vtable.
#[derive(Debug, Clone, Copy)]
pub struct MapInfo {
    /// Descriptor of the key type
    pub key: InfoFn,
    /// Descriptor of the value type
    pub value: InfoFn,
    /// Rebuild the map by mapping every source entry in iteration order
    pub rebuild: fn(
        &dyn Any,
        &mut dyn FnMut(&dyn Any, &dyn Any) -> CloneResult<(Box<dyn Any>, Box<dyn Any>)>,
    ) -> CloneResult<Box<dyn Any>>,
    /// Assignment copy of one key
    pub assign_key: AssignFn,
    /// Recursive duplication of one key
    pub deep_key: DeepFn,
    /// Assignment copy of one value
    pub assign_value: AssignFn,
    /// Recursive duplication of one value
    pub deep_value: DeepFn,
}

/// Registration table for a record type
#[derive(Debug, Clone, Copy)]
pub struct RecordInfo {
    /// Enumerate the registered members
    pub members: fn() -> Vec<MemberInfo>,
    /// Enumerate the registered post-clone hooks
    ///
    /// More than one hook is a definition error, surfaced when the
    /// record's contract is synthesized.
    pub hooks: fn() -> Vec<HookInfo>,
}

/// One cloneable member of a record type
///
/// Computed once at contract-synthesis time and reused by every clone
/// of the record thereafter.
#[derive(Debug, Clone, Copy)]
pub struct MemberInfo {
    /// Field name as declared
    pub name: &'static str,
    /// Whether the member carries the explicit exclusion marker
    ///
    /// Marked members are dropped before the member-inclusion
    /// predicate is consulted; the marker always wins.
    pub ignored: bool,
    /// Descriptor of the member's declared type
    pub info: InfoFn,
    /// Copy the member from source record to target record by
    /// assignment
    pub assign: fn(&dyn Any, &mut dyn Any) -> CloneResult<()>,
    /// Recursively duplicate the member from source record into the
    /// target record through the resolver
    pub clone_into:
        fn(&dyn Any, &mut dyn Any, &CloneSettings, &mut CloneContext) -> CloneResult<()>,
}

/// Post-clone hook registered on a record type
///
/// Invoked on the freshly built clone after all members are populated,
/// receiving the source value and the active settings.
#[derive(Debug, Clone, Copy)]
pub struct HookInfo {
    /// Name of the hook method, for diagnostics
    pub name: &'static str,
    /// Erased invocation thunk
    pub invoke: fn(&mut dyn Any, &dyn Any, &CloneSettings) -> CloneResult<()>,
}

/// Shape vtable for [`crate::Shared`] handles
#[derive(Debug, Clone, Copy)]
pub struct SharedInfo {
    /// Descriptor of the interior type
    pub inner: InfoFn,
    /// Stable identity of the cell a handle points at
    pub address: fn(&dyn Any) -> CloneResult<usize>,
    /// Clone the handle itself (shares the cell)
    pub duplicate_handle: AssignFn,
    /// Wrap a constructed interior value in a fresh cell
    pub new_cell: fn(Box<dyn Any>) -> CloneResult<Box<dyn Any>>,
    /// Deep clone the source cell's interior into the target cell
    pub deep_interior:
        fn(&dyn Any, &dyn Any, &CloneSettings, &mut CloneContext) -> CloneResult<()>,
    /// Shallow clone the source cell's interior into the target cell
    pub shallow_interior:
        fn(&dyn Any, &dyn Any, &CloneSettings, &mut CloneContext) -> CloneResult<()>,
}

/// Shape vtable for trait objects
///
/// The declared type is the box; the value's actual concrete type is
/// discovered at clone time and its contract re-resolved, which is
/// what lets a member declared as `Box<dyn Polymorphic>` clone
/// correctly as its concrete type.
#[derive(Debug, Clone, Copy)]
pub struct DynamicInfo {
    /// Descriptor of the value's concrete runtime type
    pub concrete_info: fn(&dyn Any) -> CloneResult<Arc<TypeInfo>>,
    /// Borrow the concrete value behind the box
    pub concrete_value: fn(&dyn Any) -> CloneResult<&dyn Any>,
    /// Re-erase a cloned concrete value behind a fresh box
    pub rebox: fn(&dyn Any, Box<dyn Any>) -> CloneResult<Box<dyn Any>>,
}

/// Capability trait: a type that can describe itself to the engine
///
/// Implemented by the built-in impls for primitives, containers,
/// [`crate::Shared`] and boxed [`crate::Polymorphic`] values, and by
/// the [`crate::reflect_record!`] registration macro for user record
/// types.
pub trait Reflectable: Any {
    /// Build the type's descriptor
    ///
    /// Called at most a handful of times per type; the resolver caches
    /// the contract synthesized from the descriptor, not the
    /// descriptor itself.
    fn type_info() -> Arc<TypeInfo>
    where
        Self: Sized;
}
