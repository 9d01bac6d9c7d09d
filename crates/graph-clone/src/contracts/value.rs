//! Identity contract for primitive-classified types

use std::any::Any;
use std::sync::Arc;

use crate::context::CloneContext;
use crate::contract::CloneContract;
use crate::error::{CloneError, CloneResult};
use crate::reflect::{AssignFn, TypeInfo};
use crate::settings::CloneSettings;

/// Copies values by plain assignment; deep and shallow are identical
pub struct ValueContract {
    target: Arc<TypeInfo>,
    assign: AssignFn,
}

impl ValueContract {
    /// Build an identity contract from a type's assignment procedure
    ///
    /// Fails at synthesis time if the type registered no assignment
    /// copy, which can happen when a custom primitive predicate
    /// classifies a type that never expected to be copied this way.
    pub fn new(target: Arc<TypeInfo>) -> CloneResult<Self> {
        let assign = target.clone_value().ok_or_else(|| {
            CloneError::contract_definition(
                target.name(),
                "primitive-classified but registers no assignment copy",
            )
        })?;
        Ok(Self { target, assign })
    }
}

impl CloneContract for ValueContract {
    fn target(&self) -> &Arc<TypeInfo> {
        &self.target
    }

    fn deep_clone(
        &self,
        source: &dyn Any,
        _settings: &CloneSettings,
        _context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        (self.assign)(source)
    }

    fn shallow_clone(
        &self,
        source: &dyn Any,
        _settings: &CloneSettings,
        _context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        (self.assign)(source)
    }
}
