//! Built-in clone contracts
//!
//! One contract per structural shape, assembled by the default factory
//! from the shape vtables in a type's descriptor. Every contract here
//! is created once per type per settings instance and reused for all
//! subsequent clones of that type.

mod array;
mod delegate;
mod map;
mod option;
mod record;
mod sequence;
mod shared;
mod value;

pub use array::ArrayContract;
pub use delegate::DelegatingContract;
pub use map::MapContract;
pub use option::OptionContract;
pub use record::RecordContract;
pub use sequence::SequenceContract;
pub use shared::SharedContract;
pub use value::ValueContract;
