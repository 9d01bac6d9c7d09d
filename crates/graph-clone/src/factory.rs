//! Contract factories
//!
//! A factory turns a type descriptor into a working [`CloneContract`].
//! Caller-supplied factories are consulted in registration order and
//! the first one that applies wins; the built-in
//! [`DefaultContractFactory`] sits at the end of the chain and covers
//! every registered shape.

use std::sync::Arc;

use crate::contract::CloneContract;
use crate::contracts::{
    ArrayContract, DelegatingContract, MapContract, OptionContract, RecordContract,
    SequenceContract, SharedContract, ValueContract,
};
use crate::error::{CloneError, CloneResult};
use crate::reflect::{TypeInfo, TypeKind};
use crate::settings::CloneSettings;

/// Creates clone contracts for the types it claims
///
/// `applies_to` must be cheap and side-effect free; it is called for
/// every cache miss until a factory claims the type.
pub trait ContractFactory: Send + Sync {
    /// Whether this factory can produce a contract for the type
    fn applies_to(&self, info: &TypeInfo) -> bool;

    /// Produce the contract
    ///
    /// Only called after `applies_to` returned `true` for the same
    /// descriptor.
    fn create_contract(
        &self,
        info: &Arc<TypeInfo>,
        settings: &CloneSettings,
    ) -> CloneResult<Arc<dyn CloneContract>>;
}

/// Built-in factory covering every registered type shape
///
/// Dispatch order mirrors specificity: optionals, fixed arrays and
/// trait objects before shared handles, then the primitive shortcut,
/// then maps, collections and records, with plain value copying as the
/// final fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultContractFactory;

impl DefaultContractFactory {
    /// Build the factory
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ContractFactory for DefaultContractFactory {
    fn applies_to(&self, _info: &TypeInfo) -> bool {
        true
    }

    fn create_contract(
        &self,
        info: &Arc<TypeInfo>,
        settings: &CloneSettings,
    ) -> CloneResult<Arc<dyn CloneContract>> {
        let contract: Arc<dyn CloneContract> = match info.kind() {
            TypeKind::Optional(ops) => {
                Arc::new(OptionContract::new(Arc::clone(info), *ops, settings))
            }
            TypeKind::Array(ops) => Arc::new(ArrayContract::new(Arc::clone(info), *ops, settings)),
            TypeKind::Dynamic(ops) => Arc::new(DelegatingContract::new(Arc::clone(info), *ops)),
            TypeKind::Shared(ops) => {
                Arc::new(SharedContract::new(Arc::clone(info), *ops, settings)?)
            }
            _ if settings.is_primitive(info) => Arc::new(ValueContract::new(Arc::clone(info))?),
            TypeKind::Map(ops) => Arc::new(MapContract::new(Arc::clone(info), *ops, settings)),
            TypeKind::Sequence(ops) => {
                Arc::new(SequenceContract::new(Arc::clone(info), *ops, settings))
            }
            TypeKind::Record(_) => Arc::new(RecordContract::synthesize(Arc::clone(info), settings)?),
            TypeKind::Value => Arc::new(ValueContract::new(Arc::clone(info))?),
            TypeKind::Opaque => {
                return Err(CloneError::configuration(
                    info.name(),
                    "opaque type has no registered shape; add a custom contract factory",
                ));
            }
        };
        Ok(contract)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::Reflectable;
    use crate::settings::CloneSettingsBuilder;

    #[test]
    fn default_factory_claims_everything() {
        let factory = DefaultContractFactory::new();
        assert!(factory.applies_to(&String::type_info()));
        assert!(factory.applies_to(&<Vec<u8>>::type_info()));
    }

    #[test]
    fn opaque_shape_is_a_configuration_error() {
        let factory = DefaultContractFactory::new();
        let settings = CloneSettingsBuilder::new().build();
        let info = TypeInfo::of::<fn()>(TypeKind::Opaque);
        let err = factory.create_contract(&Arc::new(info), &settings).err().unwrap();
        assert!(matches!(err, CloneError::Configuration { .. }));
    }

    #[test]
    fn contract_target_matches_requested_type() {
        let factory = DefaultContractFactory::new();
        let settings = CloneSettingsBuilder::new().build();
        let info = <Option<String>>::type_info();
        let contract = factory.create_contract(&info, &settings).unwrap();
        assert_eq!(contract.target().id(), info.id());
    }
}
