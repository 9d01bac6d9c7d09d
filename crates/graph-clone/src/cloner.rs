//! Top-level clone entry points
//!
//! Each call is one clone operation: a fresh identity context is
//! created, the root contract is resolved, and the typed result is
//! recovered from the erased contract output. All recursion inside an
//! operation funnels back through the internal variants so depth
//! accounting and identity tracking stay uniform.

use once_cell::sync::Lazy;

use crate::context::CloneContext;
use crate::error::{CloneError, CloneResult};
use crate::reflect::Reflectable;
use crate::settings::CloneSettings;

static DEFAULT_SETTINGS: Lazy<CloneSettings> = Lazy::new(CloneSettings::default);

/// Deep-clone a value under the default settings
///
/// Shared handles reachable more than once come back shared the same
/// way in the clone, and cycles terminate.
pub fn deep_clone<T: Reflectable>(source: &T) -> CloneResult<T> {
    deep_clone_with(source, &DEFAULT_SETTINGS)
}

/// Shallow-clone a value under the default settings
///
/// Only the top level is duplicated; interior shared state stays
/// shared with the source.
pub fn shallow_clone<T: Reflectable>(source: &T) -> CloneResult<T> {
    shallow_clone_with(source, &DEFAULT_SETTINGS)
}

/// Deep-clone a value under explicit settings
pub fn deep_clone_with<T: Reflectable>(source: &T, settings: &CloneSettings) -> CloneResult<T> {
    let mut context = CloneContext::new(settings.max_depth());
    let cloned = deep_clone_internal(source, settings, &mut context)?;
    tracing::trace!(
        type_name = std::any::type_name::<T>(),
        references = context.len(),
        "deep clone finished"
    );
    Ok(cloned)
}

/// Shallow-clone a value under explicit settings
pub fn shallow_clone_with<T: Reflectable>(source: &T, settings: &CloneSettings) -> CloneResult<T> {
    let mut context = CloneContext::new(settings.max_depth());
    shallow_clone_internal(source, settings, &mut context)
}

/// Recursion entry used by generated member procedures
#[doc(hidden)]
pub fn deep_clone_internal<T: Reflectable>(
    source: &T,
    settings: &CloneSettings,
    context: &mut CloneContext,
) -> CloneResult<T> {
    let contract = settings.resolver().resolve_for::<T>(settings)?;
    context.enter(std::any::type_name::<T>())?;
    let result = contract.deep_clone(source, settings, context);
    context.exit();
    recover::<T>(result?)
}

#[doc(hidden)]
pub fn shallow_clone_internal<T: Reflectable>(
    source: &T,
    settings: &CloneSettings,
    context: &mut CloneContext,
) -> CloneResult<T> {
    let contract = settings.resolver().resolve_for::<T>(settings)?;
    context.enter(std::any::type_name::<T>())?;
    let result = contract.shallow_clone(source, settings, context);
    context.exit();
    recover::<T>(result?)
}

fn recover<T: Reflectable>(erased: Box<dyn std::any::Any>) -> CloneResult<T> {
    erased
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| CloneError::internal_downcast(std::any::type_name::<T>()))
}
