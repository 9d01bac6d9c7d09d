//! Element-wise contract for fixed-length arrays

use std::any::Any;
use std::sync::Arc;

use crate::context::CloneContext;
use crate::contract::CloneContract;
use crate::error::CloneResult;
use crate::reflect::{ArrayInfo, TypeInfo};
use crate::settings::CloneSettings;

/// Clones `[T; N]` element by element in index order
pub struct ArrayContract {
    target: Arc<TypeInfo>,
    ops: ArrayInfo,
    element_primitive: bool,
}

impl ArrayContract {
    /// Build the contract, classifying the element type once
    #[must_use]
    pub fn new(target: Arc<TypeInfo>, ops: ArrayInfo, settings: &CloneSettings) -> Self {
        let element_primitive = settings.is_primitive(&(ops.element)());
        Self {
            target,
            ops,
            element_primitive,
        }
    }
}

impl CloneContract for ArrayContract {
    fn target(&self) -> &Arc<TypeInfo> {
        &self.target
    }

    fn deep_clone(
        &self,
        source: &dyn Any,
        settings: &CloneSettings,
        context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        if self.element_primitive {
            (self.ops.rebuild)(source, &mut |element| (self.ops.assign_element)(element))
        } else {
            (self.ops.rebuild)(source, &mut |element| {
                (self.ops.deep_element)(element, settings, context)
            })
        }
    }

    fn shallow_clone(
        &self,
        source: &dyn Any,
        _settings: &CloneSettings,
        _context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        (self.ops.rebuild)(source, &mut |element| (self.ops.assign_element)(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{Reflectable, TypeKind};
    use crate::settings::CloneSettingsBuilder;

    #[test]
    fn primitive_array_round_trips() {
        let settings = CloneSettingsBuilder::new().build();
        let info = <[u16; 3]>::type_info();
        let TypeKind::Array(ops) = info.kind() else {
            panic!("expected array shape");
        };
        let contract = ArrayContract::new(Arc::clone(&info), *ops, &settings);

        let source = [7u16, 8, 9];
        let mut context = CloneContext::new(8);
        let cloned = contract.deep_clone(&source, &settings, &mut context).unwrap();
        assert_eq!(cloned.downcast_ref::<[u16; 3]>(), Some(&source));
    }
}
