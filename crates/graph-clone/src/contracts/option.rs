//! Contract for optional values
//!
//! The absent case is the engine's null analog: it clones to absent
//! without any context lookup or contract invocation.

use std::any::Any;
use std::sync::Arc;

use crate::context::CloneContext;
use crate::contract::CloneContract;
use crate::error::CloneResult;
use crate::reflect::{OptionalInfo, TypeInfo};
use crate::settings::CloneSettings;

/// Clones `Option<T>` by cloning the present value, if any
pub struct OptionContract {
    target: Arc<TypeInfo>,
    ops: OptionalInfo,
    inner_primitive: bool,
}

impl OptionContract {
    /// Build the contract, classifying the wrapped type once
    #[must_use]
    pub fn new(target: Arc<TypeInfo>, ops: OptionalInfo, settings: &CloneSettings) -> Self {
        let inner_primitive = settings.is_primitive(&(ops.inner)());
        Self {
            target,
            ops,
            inner_primitive,
        }
    }
}

impl CloneContract for OptionContract {
    fn target(&self) -> &Arc<TypeInfo> {
        &self.target
    }

    fn deep_clone(
        &self,
        source: &dyn Any,
        settings: &CloneSettings,
        context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        match (self.ops.as_some)(source)? {
            None => Ok((self.ops.none)()),
            Some(inner) => {
                let cloned = if self.inner_primitive {
                    (self.ops.assign_inner)(inner)?
                } else {
                    (self.ops.deep_inner)(inner, settings, context)?
                };
                (self.ops.wrap_some)(cloned)
            }
        }
    }

    fn shallow_clone(
        &self,
        source: &dyn Any,
        _settings: &CloneSettings,
        _context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        match (self.ops.as_some)(source)? {
            None => Ok((self.ops.none)()),
            Some(inner) => (self.ops.wrap_some)((self.ops.assign_inner)(inner)?),
        }
    }
}
