//! Delegating contract for runtime-polymorphic values
//!
//! The declared type only says "some trait object"; at clone time this
//! contract reads the value's actual concrete type, resolves THAT
//! type's contract, forwards to it, and re-erases the result.

use std::any::Any;
use std::sync::Arc;

use crate::context::CloneContext;
use crate::contract::CloneContract;
use crate::error::CloneResult;
use crate::reflect::{DynamicInfo, TypeInfo};
use crate::settings::CloneSettings;

/// Forwards to the contract of the value's concrete runtime type
pub struct DelegatingContract {
    target: Arc<TypeInfo>,
    ops: DynamicInfo,
}

impl DelegatingContract {
    /// Build the contract
    #[must_use]
    pub fn new(target: Arc<TypeInfo>, ops: DynamicInfo) -> Self {
        Self { target, ops }
    }

    fn forward(
        &self,
        source: &dyn Any,
        settings: &CloneSettings,
        context: &mut CloneContext,
        deep: bool,
    ) -> CloneResult<Box<dyn Any>> {
        let concrete = (self.ops.concrete_info)(source)?;
        tracing::trace!(
            declared = self.target.name(),
            concrete = concrete.name(),
            "delegating to concrete type"
        );
        let contract = settings.resolver().resolve(&concrete, settings)?;
        let value = (self.ops.concrete_value)(source)?;
        // Delegation is a recursion frame of its own; chained trait
        // objects must count against the depth limit.
        context.enter(concrete.name())?;
        let cloned = if deep {
            contract.deep_clone(value, settings, context)
        } else {
            contract.shallow_clone(value, settings, context)
        };
        context.exit();
        (self.ops.rebox)(source, cloned?)
    }
}

impl CloneContract for DelegatingContract {
    fn target(&self) -> &Arc<TypeInfo> {
        &self.target
    }

    fn deep_clone(
        &self,
        source: &dyn Any,
        settings: &CloneSettings,
        context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        self.forward(source, settings, context, true)
    }

    fn shallow_clone(
        &self,
        source: &dyn Any,
        settings: &CloneSettings,
        context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        self.forward(source, settings, context, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::Polymorphic;
    use crate::reflect::{Reflectable, TypeKind};
    use crate::settings::CloneSettingsBuilder;

    #[test]
    fn forwards_to_concrete_contract() {
        let settings = CloneSettingsBuilder::new().build();
        let info = <Box<dyn Polymorphic>>::type_info();
        let TypeKind::Dynamic(ops) = info.kind() else {
            panic!("expected dynamic shape");
        };
        let contract = DelegatingContract::new(Arc::clone(&info), *ops);

        let source: Box<dyn Polymorphic> = Box::new(String::from("behind a trait object"));
        let mut context = CloneContext::new(8);
        let cloned = contract.deep_clone(&source, &settings, &mut context).unwrap();

        let cloned = cloned.downcast_ref::<Box<dyn Polymorphic>>().unwrap();
        assert_eq!(
            cloned.as_ref().as_reflect().downcast_ref::<String>().map(String::as_str),
            Some("behind a trait object")
        );
    }
}
