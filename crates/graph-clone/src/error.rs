//! Error types for graph duplication
//!
//! All failures are raised synchronously, either at contract-synthesis
//! time or at the first clone attempt of an unconfigured type. The
//! resolver caches synthesis failures, so the error type is `Clone`:
//! repeated attempts on the same type fail identically.

/// Errors raised while resolving, synthesizing, or executing clone contracts
#[derive(Debug, Clone, thiserror::Error)]
pub enum CloneError {
    /// No contract factory in the chain applies to a type
    #[error("no contract factory applies to type `{type_name}`: {reason}")]
    Configuration {
        /// Runtime name of the offending type
        type_name: &'static str,
        /// Why resolution stopped
        reason: String,
    },

    /// A resolved contract does not target the statically requested type
    #[error("resolved contract targets `{resolved}`, not the requested type `{requested}`")]
    ContractTypeMismatch {
        /// Type the cached contract was built for
        resolved: &'static str,
        /// Type the caller asked for
        requested: &'static str,
    },

    /// The configured construction strategy cannot produce an instance
    #[error("cannot construct an instance of `{type_name}`: {reason}")]
    Construction {
        /// Type that could not be instantiated
        type_name: &'static str,
        /// Why construction failed
        reason: String,
    },

    /// A type's clone registration is malformed (raised at synthesis time)
    #[error("invalid clone contract for `{type_name}`: {reason}")]
    ContractDefinition {
        /// Type whose registration is invalid
        type_name: &'static str,
        /// What is wrong with it
        reason: String,
    },

    /// The object graph is nested deeper than the configured limit
    #[error("recursion limit of {limit} exceeded while cloning `{type_name}`")]
    RecursionLimit {
        /// Configured depth limit
        limit: usize,
        /// Type being cloned when the limit was hit
        type_name: &'static str,
    },

    /// An engine invariant was violated; a bug, not a user error
    #[error("internal cloner error: {0}")]
    Internal(String),
}

impl CloneError {
    /// Create a configuration error for an unresolvable type
    pub fn configuration(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            type_name,
            reason: reason.into(),
        }
    }

    /// Create a mismatch error between a resolved contract and a requested type
    #[must_use]
    pub fn contract_type_mismatch(resolved: &'static str, requested: &'static str) -> Self {
        Self::ContractTypeMismatch {
            resolved,
            requested,
        }
    }

    /// Create a construction error for a type
    pub fn construction(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self::Construction {
            type_name,
            reason: reason.into(),
        }
    }

    /// Create a contract definition error for a type
    pub fn contract_definition(type_name: &'static str, reason: impl Into<String>) -> Self {
        Self::ContractDefinition {
            type_name,
            reason: reason.into(),
        }
    }

    /// Create a recursion limit error
    #[must_use]
    pub fn recursion_limit(limit: usize, type_name: &'static str) -> Self {
        Self::RecursionLimit { limit, type_name }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Internal error for a downcast that can only fail on an engine bug
    #[must_use]
    pub fn internal_downcast(expected: &'static str) -> Self {
        Self::Internal(format!("value is not of the expected type `{expected}`"))
    }
}

/// Result type alias for clone operations
pub type CloneResult<T> = Result<T, CloneError>;
