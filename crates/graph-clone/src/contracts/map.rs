//! Entry-wise contract for key-value maps
//!
//! Key and value types are classified primitive-or-not independently,
//! once, when the contract is created.

use std::any::Any;
use std::sync::Arc;

use crate::context::CloneContext;
use crate::contract::CloneContract;
use crate::error::CloneResult;
use crate::reflect::{MapInfo, TypeInfo};
use crate::settings::CloneSettings;

/// Clones a map entry by entry in iteration order
pub struct MapContract {
    target: Arc<TypeInfo>,
    ops: MapInfo,
    key_primitive: bool,
    value_primitive: bool,
}

impl MapContract {
    /// Build the contract, classifying key and value types once
    #[must_use]
    pub fn new(target: Arc<TypeInfo>, ops: MapInfo, settings: &CloneSettings) -> Self {
        let key_primitive = settings.is_primitive(&(ops.key)());
        let value_primitive = settings.is_primitive(&(ops.value)());
        Self {
            target,
            ops,
            key_primitive,
            value_primitive,
        }
    }
}

impl CloneContract for MapContract {
    fn target(&self) -> &Arc<TypeInfo> {
        &self.target
    }

    fn deep_clone(
        &self,
        source: &dyn Any,
        settings: &CloneSettings,
        context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        (self.ops.rebuild)(source, &mut |key, value| {
            let cloned_key = if self.key_primitive {
                (self.ops.assign_key)(key)?
            } else {
                (self.ops.deep_key)(key, settings, context)?
            };
            let cloned_value = if self.value_primitive {
                (self.ops.assign_value)(value)?
            } else {
                (self.ops.deep_value)(value, settings, context)?
            };
            Ok((cloned_key, cloned_value))
        })
    }

    fn shallow_clone(
        &self,
        source: &dyn Any,
        _settings: &CloneSettings,
        _context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        (self.ops.rebuild)(source, &mut |key, value| {
            Ok(((self.ops.assign_key)(key)?, (self.ops.assign_value)(value)?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{Reflectable, TypeKind};
    use crate::settings::CloneSettingsBuilder;
    use std::collections::HashMap;

    #[test]
    fn mixed_classification_round_trips() {
        let settings = CloneSettingsBuilder::new().build();
        let info = <HashMap<String, Vec<u8>>>::type_info();
        let TypeKind::Map(ops) = info.kind() else {
            panic!("expected map shape");
        };
        let contract = MapContract::new(Arc::clone(&info), *ops, &settings);
        assert!(contract.key_primitive);
        assert!(!contract.value_primitive);

        let mut source = HashMap::new();
        source.insert(String::from("k"), vec![1u8, 2, 3]);

        let mut context = CloneContext::new(8);
        let cloned = contract.deep_clone(&source, &settings, &mut context).unwrap();
        assert_eq!(cloned.downcast_ref::<HashMap<String, Vec<u8>>>(), Some(&source));
    }
}
