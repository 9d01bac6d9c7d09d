//! The clone-contract capability
//!
//! A contract is the per-type unit strategy: it knows how to produce a
//! deep copy and, independently, a shallow copy of values of one type.
//! Contracts are synthesized once per type per settings instance,
//! cached by the resolver, never mutated afterwards, and hold no
//! per-operation state, so one contract serves any number of
//! concurrent operations.

use std::any::Any;
use std::sync::Arc;

use crate::context::CloneContext;
use crate::error::CloneResult;
use crate::reflect::TypeInfo;
use crate::settings::CloneSettings;

/// Per-type clone strategy, type-erased
pub trait CloneContract: Send + Sync {
    /// Descriptor of the type this contract was built for
    fn target(&self) -> &Arc<TypeInfo>;

    /// Produce a fully recursive, independent copy of `source`
    ///
    /// `source` must be a value of the target type; composite members
    /// are duplicated through the resolver, consulting the context so
    /// shared and cyclic references are reproduced exactly once.
    fn deep_clone(
        &self,
        source: &dyn Any,
        settings: &CloneSettings,
        context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>>;

    /// Duplicate only the top level of `source`
    ///
    /// Members and elements are copied by direct assignment and never
    /// traversed further.
    fn shallow_clone(
        &self,
        source: &dyn Any,
        settings: &CloneSettings,
        context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>>;
}
