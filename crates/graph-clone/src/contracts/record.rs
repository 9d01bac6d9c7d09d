//! Default object contract for record types
//!
//! For any record not covered by a more specific factory, the
//! synthesizer inspects the type's registered members once at
//! contract-creation time and builds a pair of reusable copy
//! procedures: members are filtered (explicit exclusion marker first,
//! then the configurable inclusion predicate), partitioned into
//! direct-assignment and recursive groups, and the optional post-clone
//! hook is validated. Every later clone of the type replays the
//! partition without re-inspecting anything.

use std::any::Any;
use std::sync::Arc;

use crate::context::CloneContext;
use crate::contract::CloneContract;
use crate::error::{CloneError, CloneResult};
use crate::reflect::{HookInfo, MemberInfo, TypeInfo, TypeKind};
use crate::settings::{CloneSettings, Instantiator};

/// Synthesized member-wise contract for a record type
pub struct RecordContract {
    target: Arc<TypeInfo>,
    instantiate: Instantiator,
    /// Primitive-classified members, copied by assignment
    direct: Vec<MemberInfo>,
    /// Composite members, duplicated through the resolver
    composite: Vec<MemberInfo>,
    /// Every eligible member, for the shallow procedure
    eligible: Vec<MemberInfo>,
    hook: Option<HookInfo>,
}

impl RecordContract {
    /// Inspect a record type once and build its copy procedures
    pub fn synthesize(target: Arc<TypeInfo>, settings: &CloneSettings) -> CloneResult<Self> {
        let TypeKind::Record(record) = target.kind() else {
            return Err(CloneError::internal(format!(
                "record contract requested for non-record type `{}`",
                target.name()
            )));
        };

        let instantiate = settings.resolve_instantiator(&target)?;

        let mut direct = Vec::new();
        let mut composite = Vec::new();
        let mut eligible = Vec::new();
        for member in (record.members)() {
            // The exclusion marker wins before the predicate runs.
            if member.ignored {
                continue;
            }
            if !settings.include_member(&member) {
                continue;
            }
            eligible.push(member);
            if settings.is_primitive(&(member.info)()) {
                direct.push(member);
            } else {
                composite.push(member);
            }
        }

        let mut hooks = (record.hooks)();
        if hooks.len() > 1 {
            return Err(CloneError::contract_definition(
                target.name(),
                format!(
                    "{} post-clone hooks registered; at most one is allowed",
                    hooks.len()
                ),
            ));
        }
        let hook = hooks.pop();

        tracing::debug!(
            type_name = target.name(),
            direct = direct.len(),
            composite = composite.len(),
            hook = hook.map(|h| h.name),
            "synthesized record contract"
        );

        Ok(Self {
            target,
            instantiate,
            direct,
            composite,
            eligible,
            hook,
        })
    }
}

impl CloneContract for RecordContract {
    fn target(&self) -> &Arc<TypeInfo> {
        &self.target
    }

    fn deep_clone(
        &self,
        source: &dyn Any,
        settings: &CloneSettings,
        context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        let mut clone = (self.instantiate)();
        for member in &self.direct {
            (member.assign)(source, clone.as_mut())?;
        }
        for member in &self.composite {
            (member.clone_into)(source, clone.as_mut(), settings, context)?;
        }
        if let Some(hook) = &self.hook {
            (hook.invoke)(clone.as_mut(), source, settings)?;
        }
        Ok(clone)
    }

    fn shallow_clone(
        &self,
        source: &dyn Any,
        _settings: &CloneSettings,
        _context: &mut CloneContext,
    ) -> CloneResult<Box<dyn Any>> {
        let mut clone = (self.instantiate)();
        for member in &self.eligible {
            (member.assign)(source, clone.as_mut())?;
        }
        Ok(clone)
    }
}
