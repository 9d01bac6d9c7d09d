//! Clone settings and their builder
//!
//! A settings object fixes every policy knob for a family of clone
//! operations: which types count as primitive, which record members
//! participate, how bare instances are constructed, which factories
//! synthesize contracts, and how deep recursion may go. The contract
//! cache lives inside the settings object, so contracts synthesized
//! under one policy are never reused under another.

use std::any::Any;
use std::sync::Arc;

use crate::error::{CloneError, CloneResult};
use crate::factory::{ContractFactory, DefaultContractFactory};
use crate::reflect::{MemberInfo, TypeInfo, TypeKind};
use crate::resolver::ContractResolver;

/// Classifies a type as assignment-copyable
pub type PrimitivePredicate = Arc<dyn Fn(&TypeInfo) -> bool + Send + Sync>;

/// Decides whether a record member participates in cloning
pub type MemberPredicate = Arc<dyn Fn(&MemberInfo) -> bool + Send + Sync>;

/// Produces a bare, default-state instance of one type
pub type Instantiator = Arc<dyn Fn() -> Box<dyn Any> + Send + Sync>;

/// Maps a type descriptor to its instantiator
pub type ConstructorResolver = Arc<dyn Fn(&TypeInfo) -> CloneResult<Instantiator> + Send + Sync>;

const DEFAULT_MAX_DEPTH: usize = 512;

/// Immutable policy for a family of clone operations
pub struct CloneSettings {
    primitive: PrimitivePredicate,
    include_member: MemberPredicate,
    constructor: ConstructorResolver,
    factories: Vec<Arc<dyn ContractFactory>>,
    resolver: ContractResolver,
    max_depth: usize,
}

impl CloneSettings {
    /// Whether the type is copied by plain assignment
    #[must_use]
    pub fn is_primitive(&self, info: &TypeInfo) -> bool {
        (self.primitive)(info)
    }

    /// Whether the member participates in cloning
    ///
    /// Members carrying the explicit exclusion marker never reach this
    /// predicate.
    #[must_use]
    pub fn include_member(&self, member: &MemberInfo) -> bool {
        (self.include_member)(member)
    }

    /// Resolve the instantiator for a type
    pub fn resolve_instantiator(&self, info: &TypeInfo) -> CloneResult<Instantiator> {
        (self.constructor)(info)
    }

    /// The factory chain, custom factories first
    #[must_use]
    pub fn factories(&self) -> &[Arc<dyn ContractFactory>] {
        &self.factories
    }

    /// The contract cache bound to these settings
    #[must_use]
    pub fn resolver(&self) -> &ContractResolver {
        &self.resolver
    }

    /// Maximum permitted clone recursion depth
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }
}

impl Default for CloneSettings {
    fn default() -> Self {
        CloneSettingsBuilder::new().build()
    }
}

impl std::fmt::Debug for CloneSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloneSettings")
            .field("factories", &self.factories.len())
            .field("cached_contracts", &self.resolver.len())
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

/// Builder for [`CloneSettings`]
///
/// Every knob has a default; `build` appends the built-in factory so
/// the chain always terminates.
pub struct CloneSettingsBuilder {
    primitive: PrimitivePredicate,
    include_member: MemberPredicate,
    constructor: ConstructorResolver,
    factories: Vec<Arc<dyn ContractFactory>>,
    max_depth: usize,
}

impl CloneSettingsBuilder {
    /// Start from the default policy
    #[must_use]
    pub fn new() -> Self {
        Self {
            primitive: Arc::new(|info| matches!(info.kind(), TypeKind::Value)),
            include_member: Arc::new(|_| true),
            constructor: Arc::new(default_instantiator),
            factories: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Append a custom contract factory
    ///
    /// Custom factories are consulted in registration order, all of
    /// them before the built-in factory.
    #[must_use]
    pub fn add_contract_factory(mut self, factory: Arc<dyn ContractFactory>) -> Self {
        self.factories.push(factory);
        self
    }

    /// Replace the primitive-classification predicate
    ///
    /// Widening the predicate turns deep clones of the matched types
    /// into assignment copies; narrowing it forces recursion into
    /// types that would otherwise be copied wholesale.
    #[must_use]
    pub fn primitive_predicate(mut self, predicate: PrimitivePredicate) -> Self {
        self.primitive = predicate;
        self
    }

    /// Replace the member-participation predicate
    #[must_use]
    pub fn member_predicate(mut self, predicate: MemberPredicate) -> Self {
        self.include_member = predicate;
        self
    }

    /// Replace the constructor resolver
    #[must_use]
    pub fn constructor_resolver(mut self, resolver: ConstructorResolver) -> Self {
        self.constructor = resolver;
        self
    }

    /// Override the recursion depth limit
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Finish the settings object
    #[must_use]
    pub fn build(mut self) -> CloneSettings {
        self.factories
            .push(Arc::new(DefaultContractFactory::new()));
        CloneSettings {
            primitive: self.primitive,
            include_member: self.include_member,
            constructor: self.constructor,
            factories: self.factories,
            resolver: ContractResolver::new(),
            max_depth: self.max_depth,
        }
    }
}

impl Default for CloneSettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_instantiator(info: &TypeInfo) -> CloneResult<Instantiator> {
    let make = info.default_instance().ok_or_else(|| {
        CloneError::construction(
            info.name(),
            "no default constructor registered; supply a constructor resolver",
        )
    })?;
    Ok(Arc::new(make))
}
