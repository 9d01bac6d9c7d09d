//! Per-operation clone context
//!
//! One context exists per top-level duplication call. It maps the
//! identity of every already-cloned shared cell to its clone, which is
//! what preserves sharing and terminates cycles: the clone of a cell
//! is registered immediately after its shell exists and before its
//! interior is populated, so a reference cycling back to an ancestor
//! resolves to the ancestor's in-progress clone instead of recursing.

use std::any::Any;
use std::collections::HashMap;

use crate::error::{CloneError, CloneResult};

/// Identity map and recursion guard for a single duplication call
///
/// Created fresh by the entry points, mutated only during that call,
/// and discarded when it returns. Two separate duplication calls never
/// share identity.
pub struct CloneContext {
    references: HashMap<usize, Box<dyn Any>>,
    depth: usize,
    max_depth: usize,
}

impl CloneContext {
    /// Create an empty context with the given recursion limit
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            references: HashMap::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Record the clone of a source cell
    ///
    /// Must be called exactly once per source cell per operation,
    /// after the clone's shell exists and before its interior is
    /// populated. A second registration of the same address indicates
    /// a contract bug.
    pub fn register(&mut self, address: usize, clone: Box<dyn Any>) -> CloneResult<()> {
        if self.references.insert(address, clone).is_some() {
            return Err(CloneError::internal(format!(
                "reference {address:#x} registered twice in one operation"
            )));
        }
        tracing::trace!(address, "registered reference");
        Ok(())
    }

    /// Look up the already-produced clone of a source cell
    #[must_use]
    pub fn lookup(&self, address: usize) -> Option<&dyn Any> {
        self.references.get(&address).map(Box::as_ref)
    }

    /// Whether a source cell has already been cloned in this operation
    #[must_use]
    pub fn is_registered(&self, address: usize) -> bool {
        self.references.contains_key(&address)
    }

    /// Number of registered references
    #[must_use]
    pub fn len(&self) -> usize {
        self.references.len()
    }

    /// Whether no references have been registered yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Enter one level of graph recursion
    ///
    /// Surfaces [`CloneError::RecursionLimit`] instead of exhausting
    /// the stack on pathologically deep graphs.
    pub(crate) fn enter(&mut self, type_name: &'static str) -> CloneResult<()> {
        if self.depth >= self.max_depth {
            return Err(CloneError::recursion_limit(self.max_depth, type_name));
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave one level of graph recursion
    pub(crate) fn exit(&mut self) {
        debug_assert!(self.depth > 0, "unbalanced context exit");
        self.depth = self.depth.saturating_sub(1);
    }
}
