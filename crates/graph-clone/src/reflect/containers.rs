//! Built-in descriptors for composite standard-library types
//!
//! Each impl captures monomorphized rebuild and per-element thunks in
//! its shape vtable while the concrete element type is still known;
//! the corresponding contract drives those thunks without naming the
//! element type again.

use std::any::Any;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

use super::info::{ArrayInfo, MapInfo, OptionalInfo, Reflectable, SequenceInfo, TypeInfo, TypeKind};
use crate::context::CloneContext;
use crate::error::{CloneError, CloneResult};
use crate::settings::CloneSettings;

/// Assignment-copy thunk for `T`, erased
pub(crate) fn assign_value<T: Any + Clone>(source: &dyn Any) -> CloneResult<Box<dyn Any>> {
    let source = source
        .downcast_ref::<T>()
        .ok_or_else(|| CloneError::internal_downcast(std::any::type_name::<T>()))?;
    Ok(Box::new(source.clone()))
}

/// Recursive-duplication thunk for `T`, erased
pub(crate) fn deep_value<T: Reflectable>(
    source: &dyn Any,
    settings: &CloneSettings,
    context: &mut CloneContext,
) -> CloneResult<Box<dyn Any>> {
    let source = source
        .downcast_ref::<T>()
        .ok_or_else(|| CloneError::internal_downcast(std::any::type_name::<T>()))?;
    Ok(Box::new(crate::cloner::deep_clone_internal(
        source, settings, context,
    )?))
}

impl<T: Reflectable + Clone> Reflectable for Option<T> {
    fn type_info() -> Arc<TypeInfo> {
        Arc::new(
            TypeInfo::of::<Option<T>>(TypeKind::Optional(OptionalInfo {
                inner: T::type_info,
                as_some: |source| {
                    let source = source
                        .downcast_ref::<Option<T>>()
                        .ok_or_else(|| CloneError::internal_downcast(std::any::type_name::<Option<T>>()))?;
                    Ok(source.as_ref().map(|value| value as &dyn Any))
                },
                none: || Box::new(None::<T>),
                wrap_some: |inner| {
                    let inner = *inner
                        .downcast::<T>()
                        .map_err(|_| CloneError::internal_downcast(std::any::type_name::<T>()))?;
                    Ok(Box::new(Some(inner)) as Box<dyn Any>)
                },
                assign_inner: assign_value::<T>,
                deep_inner: deep_value::<T>,
            }))
            .with_clone_value(assign_value::<Option<T>>)
            .with_default_instance(|| Box::new(None::<T>)),
        )
    }
}

impl<T: Reflectable + Clone, const N: usize> Reflectable for [T; N] {
    fn type_info() -> Arc<TypeInfo> {
        Arc::new(
            TypeInfo::of::<[T; N]>(TypeKind::Array(ArrayInfo {
                element: T::type_info,
                len: N,
                rebuild: |source, map| {
                    let source = source
                        .downcast_ref::<[T; N]>()
                        .ok_or_else(|| CloneError::internal_downcast(std::any::type_name::<[T; N]>()))?;
                    let mut elements = Vec::with_capacity(N);
                    for item in source.iter() {
                        let cloned = map(item)?;
                        elements.push(*cloned.downcast::<T>().map_err(|_| {
                            CloneError::internal_downcast(std::any::type_name::<T>())
                        })?);
                    }
                    let rebuilt: [T; N] = elements
                        .try_into()
                        .map_err(|_| CloneError::internal("array rebuild lost elements"))?;
                    Ok(Box::new(rebuilt) as Box<dyn Any>)
                },
                assign_element: assign_value::<T>,
                deep_element: deep_value::<T>,
            }))
            .with_clone_value(assign_value::<[T; N]>),
        )
    }
}

macro_rules! reflect_sequence_types {
    ($( $col:ident $(: $($extra:path),+ )? );* $(;)?) => {
        $(
            impl<T> Reflectable for $col<T>
            where
                T: Reflectable + Clone $( $(+ $extra)+ )?,
            {
                fn type_info() -> Arc<TypeInfo> {
                    Arc::new(
                        TypeInfo::of::<$col<T>>(TypeKind::Sequence(SequenceInfo {
                            element: T::type_info,
                            rebuild: |source, map| {
                                let source = source
                                    .downcast_ref::<$col<T>>()
                                    .ok_or_else(|| CloneError::internal_downcast(
                                        std::any::type_name::<$col<T>>(),
                                    ))?;
                                let mut target = $col::<T>::default();
                                for item in source.iter() {
                                    let cloned = map(item)?;
                                    let cloned = *cloned.downcast::<T>().map_err(|_| {
                                        CloneError::internal_downcast(std::any::type_name::<T>())
                                    })?;
                                    target.extend(std::iter::once(cloned));
                                }
                                Ok(Box::new(target) as Box<dyn Any>)
                            },
                            assign_element: assign_value::<T>,
                            deep_element: deep_value::<T>,
                        }))
                        .with_clone_value(assign_value::<$col<T>>)
                        .with_default_instance(|| Box::new($col::<T>::default())),
                    )
                }
            }
        )*
    };
}

reflect_sequence_types!(
    Vec;
    VecDeque;
    HashSet: Eq, Hash;
    BTreeSet: Ord;
);

macro_rules! reflect_map_types {
    ($( $map:ident : $($kbound:path),+ );* $(;)?) => {
        $(
            impl<K, V> Reflectable for $map<K, V>
            where
                K: Reflectable + Clone $(+ $kbound)+,
                V: Reflectable + Clone,
            {
                fn type_info() -> Arc<TypeInfo> {
                    Arc::new(
                        TypeInfo::of::<$map<K, V>>(TypeKind::Map(MapInfo {
                            key: K::type_info,
                            value: V::type_info,
                            rebuild: |source, map_entry| {
                                let source = source
                                    .downcast_ref::<$map<K, V>>()
                                    .ok_or_else(|| CloneError::internal_downcast(
                                        std::any::type_name::<$map<K, V>>(),
                                    ))?;
                                let mut target = $map::<K, V>::default();
                                for (key, value) in source.iter() {
                                    let (cloned_key, cloned_value) = map_entry(key, value)?;
                                    let cloned_key = *cloned_key.downcast::<K>().map_err(|_| {
                                        CloneError::internal_downcast(std::any::type_name::<K>())
                                    })?;
                                    let cloned_value = *cloned_value.downcast::<V>().map_err(|_| {
                                        CloneError::internal_downcast(std::any::type_name::<V>())
                                    })?;
                                    target.insert(cloned_key, cloned_value);
                                }
                                Ok(Box::new(target) as Box<dyn Any>)
                            },
                            assign_key: assign_value::<K>,
                            deep_key: deep_value::<K>,
                            assign_value: assign_value::<V>,
                            deep_value: deep_value::<V>,
                        }))
                        .with_clone_value(assign_value::<$map<K, V>>)
                        .with_default_instance(|| Box::new($map::<K, V>::default())),
                    )
                }
            }
        )*
    };
}

reflect_map_types!(
    HashMap: Eq, Hash;
    BTreeMap: Ord;
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_is_sequence_shaped() {
        let info = <Vec<u32>>::type_info();
        assert!(matches!(info.kind(), TypeKind::Sequence(_)));
        assert!(info.default_instance().is_some());
    }

    #[test]
    fn every_sequence_container_is_sequence_shaped() {
        assert!(matches!(<VecDeque<u8>>::type_info().kind(), TypeKind::Sequence(_)));
        assert!(matches!(<HashSet<String>>::type_info().kind(), TypeKind::Sequence(_)));
        assert!(matches!(<BTreeSet<u64>>::type_info().kind(), TypeKind::Sequence(_)));
    }

    #[test]
    fn option_is_optional_shaped() {
        let info = <Option<String>>::type_info();
        let TypeKind::Optional(ops) = info.kind() else {
            panic!("expected optional shape");
        };
        assert_eq!((ops.inner)().id(), String::type_info().id());
    }

    #[test]
    fn option_as_some_sees_absence() {
        let info = <Option<u8>>::type_info();
        let TypeKind::Optional(ops) = info.kind() else {
            panic!("expected optional shape");
        };
        let absent: Option<u8> = None;
        assert!((ops.as_some)(&absent).unwrap().is_none());
        let present: Option<u8> = Some(7);
        assert!((ops.as_some)(&present).unwrap().is_some());
    }

    #[test]
    fn map_descriptor_exposes_key_and_value() {
        let info = <HashMap<String, u64>>::type_info();
        let TypeKind::Map(ops) = info.kind() else {
            panic!("expected map shape");
        };
        assert_eq!((ops.key)().id(), String::type_info().id());
        assert_eq!((ops.value)().id(), u64::type_info().id());
    }

    #[test]
    fn array_descriptor_knows_length() {
        let info = <[u8; 4]>::type_info();
        let TypeKind::Array(ops) = info.kind() else {
            panic!("expected array shape");
        };
        assert_eq!(ops.len, 4);
    }

    #[test]
    fn sequence_rebuild_preserves_order() {
        let info = <Vec<u32>>::type_info();
        let TypeKind::Sequence(ops) = info.kind() else {
            panic!("expected sequence shape");
        };
        let source = vec![3u32, 1, 2];
        let rebuilt = (ops.rebuild)(&source, &mut |item| (ops.assign_element)(item)).unwrap();
        assert_eq!(rebuilt.downcast_ref::<Vec<u32>>(), Some(&source));
    }
}
