//! Built-in descriptors for primitive-classified types
//!
//! Mirrors the default primitive policy: value types and strings are
//! copied by plain assignment, so their deep and shallow copies are
//! identical.

use std::sync::Arc;

use super::info::{Reflectable, TypeInfo};

macro_rules! reflect_value_types {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Reflectable for $ty {
                fn type_info() -> Arc<TypeInfo> {
                    TypeInfo::value::<$ty>()
                }
            }
        )*
    };
}

reflect_value_types!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    f32,
    f64,
    String,
    &'static str,
);
