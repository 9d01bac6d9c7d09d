//! Memoizing contract resolver
//!
//! Contract synthesis is pure for a fixed settings object, so each
//! type is synthesized at most once per resolver and the outcome is
//! cached either way: a failed synthesis is remembered and replayed
//! on every later request for the same type.

use std::any::TypeId;
use std::sync::Arc;

use dashmap::DashMap;

use crate::contract::CloneContract;
use crate::error::{CloneError, CloneResult};
use crate::reflect::{Reflectable, TypeInfo};
use crate::settings::CloneSettings;

/// Cached outcome of a synthesis attempt
#[derive(Clone)]
enum CacheSlot {
    Ready(Arc<dyn CloneContract>),
    Failed(CloneError),
}

impl CacheSlot {
    fn into_result(self) -> CloneResult<Arc<dyn CloneContract>> {
        match self {
            Self::Ready(contract) => Ok(contract),
            Self::Failed(error) => Err(error),
        }
    }
}

/// Per-settings cache mapping type identities to clone contracts
#[derive(Default)]
pub struct ContractResolver {
    cache: DashMap<TypeId, CacheSlot>,
}

impl ContractResolver {
    /// Build an empty resolver
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached synthesis outcomes, successes and failures both
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether no synthesis outcome has been cached yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Resolve the contract for a type descriptor, synthesizing on miss
    ///
    /// The factory chain runs outside the cache lock; when two threads
    /// race on the same miss, one synthesis wins and the other result
    /// is dropped.
    pub fn resolve(
        &self,
        info: &Arc<TypeInfo>,
        settings: &CloneSettings,
    ) -> CloneResult<Arc<dyn CloneContract>> {
        if let Some(slot) = self.cache.get(&info.id()) {
            return slot.clone().into_result();
        }

        tracing::debug!(type_name = info.name(), "synthesizing clone contract");
        let slot = match self.synthesize(info, settings) {
            Ok(contract) => CacheSlot::Ready(contract),
            Err(error) => CacheSlot::Failed(error),
        };
        self.cache
            .entry(info.id())
            .or_insert(slot)
            .clone()
            .into_result()
    }

    /// Resolve the contract for a statically known type
    ///
    /// Verifies that the cached contract actually targets `T`; a
    /// mismatch means a custom factory returned a contract built for a
    /// different type and is surfaced as
    /// [`CloneError::ContractTypeMismatch`].
    pub fn resolve_for<T: Reflectable>(
        &self,
        settings: &CloneSettings,
    ) -> CloneResult<Arc<dyn CloneContract>> {
        let info = T::type_info();
        let contract = self.resolve(&info, settings)?;
        if contract.target().id() != TypeId::of::<T>() {
            return Err(CloneError::contract_type_mismatch(
                contract.target().name(),
                info.name(),
            ));
        }
        Ok(contract)
    }

    fn synthesize(
        &self,
        info: &Arc<TypeInfo>,
        settings: &CloneSettings,
    ) -> CloneResult<Arc<dyn CloneContract>> {
        for factory in settings.factories() {
            if factory.applies_to(info) {
                return factory.create_contract(info, settings);
            }
        }
        // The builder always appends the built-in factory, which
        // claims every type, so an empty chain cannot be built through
        // the public API.
        Err(CloneError::configuration(
            info.name(),
            "contract factory chain is empty",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::{ContractFactory, DefaultContractFactory};
    use crate::settings::CloneSettingsBuilder;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFactory {
        calls: Arc<AtomicUsize>,
        inner: DefaultContractFactory,
    }

    impl ContractFactory for CountingFactory {
        fn applies_to(&self, _info: &TypeInfo) -> bool {
            true
        }

        fn create_contract(
            &self,
            info: &Arc<TypeInfo>,
            settings: &CloneSettings,
        ) -> CloneResult<Arc<dyn CloneContract>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.create_contract(info, settings)
        }
    }

    #[test]
    fn synthesis_happens_once_per_type() {
        let calls = Arc::new(AtomicUsize::new(0));
        let settings = CloneSettingsBuilder::new()
            .add_contract_factory(Arc::new(CountingFactory {
                calls: Arc::clone(&calls),
                inner: DefaultContractFactory::new(),
            }))
            .build();

        let resolver = ContractResolver::new();
        let info = String::type_info();
        for _ in 0..3 {
            resolver.resolve(&info, &settings).unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn failed_synthesis_is_cached_and_replayed() {
        use crate::reflect::TypeKind;

        let settings = CloneSettingsBuilder::new().build();
        let resolver = ContractResolver::new();
        let info = Arc::new(TypeInfo::of::<fn()>(TypeKind::Opaque));

        let first = resolver.resolve(&info, &settings).err().unwrap();
        let second = resolver.resolve(&info, &settings).err().unwrap();
        assert!(matches!(first, CloneError::Configuration { .. }));
        assert_eq!(first.to_string(), second.to_string());
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn statically_typed_resolution_checks_the_target() {
        let settings = CloneSettingsBuilder::new().build();
        let resolver = ContractResolver::new();
        let contract = resolver.resolve_for::<Vec<u32>>(&settings).unwrap();
        assert_eq!(contract.target().id(), TypeId::of::<Vec<u32>>());
    }
}
