//! Element-wise contract for ordered and unordered collections

use std::any::Any;
use std::sync::Arc;

use crate::context::CloneContext;
use crate::contract::CloneContract;
use crate::error::CloneResult;
use crate::reflect::{SequenceInfo, TypeInfo};
use crate::settings::CloneSettings;

/// Clones a collection element by element in natural iteration order
///
/// The rebuilt container starts from the concrete type's zero-argument
/// constructor; primitive-classified element types are assigned
/// directly, anything else is duplicated through the resolver.
pub struct SequenceContract {
    target: Arc<TypeInfo>,
    ops: SequenceInfo,
    element_primitive: bool,
}

impl SequenceContract {
    /// Build the contract, classifying the element type once
    #[must_use]
    pub fn new(target: Arc<TypeInfo>, ops: SequenceInfo, settings: &CloneSettings) -> Self {
        let element_primitive = settings.is_primitive(&(ops.element)());
        Self {
            target,
            ops,
            element_primitive,
        }
    }
}

impl CloneContract for SequenceContract {
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
