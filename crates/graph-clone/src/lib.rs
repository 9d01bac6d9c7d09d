//! Deep and shallow duplication of arbitrary object graphs
//!
//! The engine clones values it has never seen before by consulting a
//! per-type *clone contract*: a synthesized procedure describing how
//! one type is duplicated. Contracts are produced by a chain of
//! factories, cached per settings object, and executed under a
//! per-operation identity context so shared cells stay shared and
//! cycles terminate.
//!
//! # Core concepts
//!
//! - [`Reflectable`]: a type that can describe its own shape. Built in
//!   for primitives, standard containers, [`Shared`] handles and boxed
//!   [`Polymorphic`] values; derived for user records with
//!   [`reflect_record!`].
//! - [`CloneContract`]: the synthesized deep/shallow procedure pair
//!   for one type.
//! - [`ContractFactory`]: turns a type descriptor into a contract.
//!   Caller-supplied factories run first; [`DefaultContractFactory`]
//!   covers every registered shape.
//! - [`CloneSettings`]: the policy for a family of operations, built
//!   with [`CloneSettingsBuilder`]. Owns the contract cache.
//! - [`CloneContext`]: per-operation identity map and recursion guard.
//!
//! # Quick start
//!
//! ```
//! use graph_clone::{deep_clone, reflect_record, Shared};
//!
//! #[derive(Clone, Default)]
//! struct Account {
//!     id: u64,
//!     holder: Shared<String>,
//! }
//!
//! reflect_record! {
//!     Account {
//!         id: u64,
//!         holder: Shared<String>,
//!     }
//! }
//!
//! let holder = Shared::new(String::from("ada"));
//! let source = Account { id: 7, holder };
//! let clone = deep_clone(&source).unwrap();
//!
//! assert_eq!(clone.id, 7);
//! assert_eq!(*clone.holder.borrow(), "ada");
//! // The clone owns a fresh cell, not the source's.
//! assert!(!Shared::ptr_eq(&clone.holder, &source.holder));
//! ```

mod cloner;
mod context;
mod contract;
mod contracts;
mod error;
mod factory;
mod macros;
mod poly;
mod reflect;
mod resolver;
mod settings;
mod shared;

pub use cloner::{deep_clone, deep_clone_with, shallow_clone, shallow_clone_with};
pub use context::CloneContext;
pub use contract::CloneContract;
pub use contracts::{
    ArrayContract, DelegatingContract, MapContract, OptionContract, RecordContract,
    SequenceContract, SharedContract, ValueContract,
};
pub use error::{CloneError, CloneResult};
pub use factory::{ContractFactory, DefaultContractFactory};
pub use poly::Polymorphic;
pub use reflect::{
    ArrayInfo, AssignFn, DeepFn, DynamicInfo, HookInfo, InfoFn, MapInfo, MemberInfo, OptionalInfo,
    RecordInfo, Reflectable, SequenceInfo, SharedInfo, TypeInfo, TypeKind,
};
pub use resolver::ContractResolver;
pub use settings::{
    CloneSettings, CloneSettingsBuilder, ConstructorResolver, Instantiator, MemberPredicate,
    PrimitivePredicate,
};
pub use shared::Shared;

/// Support items for macro-generated code; not part of the public API
#[doc(hidden)]
pub mod __private {
    pub use crate::cloner::{deep_clone_internal, shallow_clone_internal};
}

/// Crate version, for diagnostics
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
