//! Identity-aware contract for shared handles
//!
//! This is where cycle safety lives: the clone cell is registered in
//! the context immediately after its shell exists and strictly before
//! its interior is populated, so any reference cycling back to the
//! source cell resolves to the in-progress clone.

use std::any::Any;
use std::sync::Arc;

use crate::context::CloneContext;
use crate::contract::CloneContract;
use crate::error::{CloneError, CloneResult};
use crate::reflect::{SharedInfo, TypeInfo};
use crate::settings::{CloneSettings, Instantiator};

/// Clones `Shared<T>` cells exactly once per operation
pub struct SharedContract {
    target: Arc<TypeInfo>,
    ops: SharedInfo,
    instantiate: Instantiator,
}

impl SharedContract {
    /// Build the contract, resolving the interior constructor once
    ///
    /// The interior shell must be constructible before population so
    /// the cell can be registered ahead of any recursion; a missing
    /// constructor is a synthesis-time [`CloneError::Construction`].
    pub fn new(
        target: Arc<TypeInfo>,
        ops: SharedInfo,
        settings: &CloneSettings,
    ) -> CloneResult<Self> {
        let interior = (ops.inner)();
        let instantiate = settings.resolve_instantiator(&interior)?;
        Ok(Self {
            target,
            ops,
            instantiate,
        })
    }

    fn clone_cell(
        &self,
        source: &dyn Any,
        settings: &CloneSettings,
        context: &mut CloneContext,
        deep: bool,
    ) -> CloneResult<Box<dyn Any>> {
        let address = (self.ops.address)(source)?;
        if let Some(existing) = context.lookup(address) {
            tracing::trace!(address, type_name = self.target.name(), "reference hit");
            return (self.ops.duplicate_handle)(existing);
        }

        let shell = (self.instantiate)();
        let cell = (self.ops.new_cell)(shell)?;
        context.register(address, (self.ops.duplicate_handle)(cell.as_ref())?)?;

        if deep {
            (self.ops.deep_interior)(source, cell.as_ref(), settings, context)?;
        } else {
            (self.ops.shallow_interior)(source, cell.as_ref(), settings, context)?;
        }
        Ok(cell)
    }
}

impl CloneContract for SharedContract {
    fn target(&self) -> &Arc<TypeInfo> {
        &self.target
    }

    fn deep_clone(
        &self,
        source: &dyn Any,
        settings: &CloneSettings,
        context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        self.clone_cell(source, settings, context, true)
    }

    fn shallow_clone(
        &self,
        source: &dyn Any,
        settings: &CloneSettings,
        context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        self.clone_cell(source, settings, context, false)
    }
}
