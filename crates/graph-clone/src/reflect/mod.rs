//! Runtime type descriptors and the introspection capability
//!
//! Rust has no runtime reflection, so the engine's "enumerate cloneable
//! members" capability is an explicit registration table: every
//! participating type implements [`Reflectable`] and publishes an
//! immutable [`TypeInfo`] describing its shape. Composite shapes carry
//! small vtables of monomorphized function pointers captured where the
//! concrete type is still known; contracts are assembled from those
//! vtables without ever naming the concrete type again.

mod containers;
mod info;
mod primitives;

pub(crate) use containers::assign_value;
pub use info::{
    ArrayInfo, AssignFn, DeepFn, DynamicInfo, HookInfo, InfoFn, MapInfo, MemberInfo,
    OptionalInfo, RecordInfo, Reflectable, SequenceInfo, SharedInfo, TypeInfo, TypeKind,
};
