//! Record registration macro
//!
//! [`reflect_record!`] implements [`Reflectable`](crate::Reflectable)
//! for a user record type by generating its member table, optional
//! constructor override and optional post-clone hook. The type must be
//! `Clone` (for assignment copies) and, unless a constructor is
//! supplied, `Default`.
//!
//! ```
//! use graph_clone::{deep_clone, reflect_record};
//!
//! #[derive(Clone, Default)]
//! struct Profile {
//!     name: String,
//!     scores: Vec<u32>,
//!     cache: Option<String>,
//! }
//!
//! reflect_record! {
//!     Profile {
//!         name: String,
//!         scores: Vec<u32>,
//!         #[clone_ignore]
//!         cache: Option<String>,
//!     }
//! }
//!
//! let source = Profile {
//!     name: "a".into(),
//!     scores: vec![1, 2],
//!     cache: Some("stale".into()),
//! };
//! let clone = deep_clone(&source).unwrap();
//! assert_eq!(clone.name, "a");
//! assert_eq!(clone.cache, None); // ignored members keep their default
//! ```

/// Register a record type with the clone engine
///
/// Fields marked `#[clone_ignore]` are left at their default value in
/// every clone; `constructor = <expr>;` supplies a zero-argument
/// constructor for types without `Default`; `post_clone = <path>;`
/// registers a hook called on the finished clone with the source value
/// and the active settings. At most one hook is permitted per type,
/// which is enforced when the type's contract is synthesized.
#[macro_export]
macro_rules! reflect_record {
    (
        $ty:ident {
            $( $(#[$marker:ident])? $field:ident : $ftype:ty ),* $(,)?
        }
        $( constructor = $ctor:expr; )?
        $( post_clone = $hook:path; )*
    ) => {
        impl $crate::Reflectable for $ty {
            fn type_info() -> ::std::sync::Arc<$crate::TypeInfo> {
                fn members() -> ::std::vec::Vec<$crate::MemberInfo> {
                    ::std::vec![
                        $( $crate::__member_entry!($ty, $field, $ftype $(, $marker)?) ),*
                    ]
                }
                fn hooks() -> ::std::vec::Vec<$crate::HookInfo> {
                    ::std::vec![
                        $( $crate::__hook_entry!($ty, $hook) ),*
                    ]
                }
                fn assign(
                    source: &dyn ::std::any::Any,
                ) -> $crate::CloneResult<::std::boxed::Box<dyn ::std::any::Any>> {
                    let source = source.downcast_ref::<$ty>().ok_or_else(|| {
                        $crate::CloneError::internal_downcast(::std::any::type_name::<$ty>())
                    })?;
                    ::std::result::Result::Ok(::std::boxed::Box::new(
                        ::std::clone::Clone::clone(source),
                    ))
                }
                ::std::sync::Arc::new(
                    $crate::TypeInfo::of::<$ty>($crate::TypeKind::Record($crate::RecordInfo {
                        members,
                        hooks,
                    }))
                    .with_clone_value(assign)
                    .with_default_instance($crate::__record_ctor!($ty $(, $ctor)?)),
                )
            }
        }
    };
}

/// Internal: one member-table entry
#[doc(hidden)]
#[macro_export]
macro_rules! __member_entry {
    ($ty:ident, $field:ident, $ftype:ty) => {{
        fn assign(
            source: &dyn ::std::any::Any,
            target: &mut dyn ::std::any::Any,
        ) -> $crate::CloneResult<()> {
            let source = source.downcast_ref::<$ty>().ok_or_else(|| {
                $crate::CloneError::internal_downcast(::std::any::type_name::<$ty>())
            })?;
            let target = target.downcast_mut::<$ty>().ok_or_else(|| {
                $crate::CloneError::internal_downcast(::std::any::type_name::<$ty>())
            })?;
            target.$field = ::std::clone::Clone::clone(&source.$field);
            ::std::result::Result::Ok(())
        }
        fn clone_into(
            source: &dyn ::std::any::Any,
            target: &mut dyn ::std::any::Any,
            settings: &$crate::CloneSettings,
            context: &mut $crate::CloneContext,
        ) -> $crate::CloneResult<()> {
            let source = source.downcast_ref::<$ty>().ok_or_else(|| {
                $crate::CloneError::internal_downcast(::std::any::type_name::<$ty>())
            })?;
            let target = target.downcast_mut::<$ty>().ok_or_else(|| {
                $crate::CloneError::internal_downcast(::std::any::type_name::<$ty>())
            })?;
            target.$field =
                $crate::__private::deep_clone_internal(&source.$field, settings, context)?;
            ::std::result::Result::Ok(())
        }
        $crate::MemberInfo {
            name: ::std::stringify!($field),
            ignored: false,
            info: <$ftype as $crate::Reflectable>::type_info,
            assign,
            clone_into,
        }
    }};
    // Marked members stay inert: the entry exists so diagnostics can
    // name the field, but both thunks leave the clone's default value.
    ($ty:ident, $field:ident, $ftype:ty, clone_ignore) => {{
        fn assign(
            _source: &dyn ::std::any::Any,
            _target: &mut dyn ::std::any::Any,
        ) -> $crate::CloneResult<()> {
            ::std::result::Result::Ok(())
        }
        fn clone_into(
            _source: &dyn ::std::any::Any,
            _target: &mut dyn ::std::any::Any,
            _settings: &$crate::CloneSettings,
            _context: &mut $crate::CloneContext,
        ) -> $crate::CloneResult<()> {
            ::std::result::Result::Ok(())
        }
        $crate::MemberInfo {
            name: ::std::stringify!($field),
            ignored: true,
            info: <() as $crate::Reflectable>::type_info,
            assign,
            clone_into,
        }
    }};
}

/// Internal: one hook-table entry
#[doc(hidden)]
#[macro_export]
macro_rules! __hook_entry {
    ($ty:ident, $hook:path) => {{
        fn invoke(
            clone: &mut dyn ::std::any::Any,
            source: &dyn ::std::any::Any,
            settings: &$crate::CloneSettings,
        ) -> $crate::CloneResult<()> {
            let source = source.downcast_ref::<$ty>().ok_or_else(|| {
                $crate::CloneError::internal_downcast(::std::any::type_name::<$ty>())
            })?;
            let clone = clone.downcast_mut::<$ty>().ok_or_else(|| {
                $crate::CloneError::internal_downcast(::std::any::type_name::<$ty>())
            })?;
            $hook(clone, source, settings);
            ::std::result::Result::Ok(())
        }
        $crate::HookInfo {
            name: ::std::stringify!($hook),
            invoke,
        }
    }};
}

/// Internal: the record's zero-argument constructor
#[doc(hidden)]
#[macro_export]
macro_rules! __record_ctor {
    ($ty:ident) => {{
        fn construct() -> ::std::boxed::Box<dyn ::std::any::Any> {
            ::std::boxed::Box::new(<$ty as ::std::default::Default>::default())
        }
        construct
    }};
    ($ty:ident, $ctor:expr) => {{
        fn construct() -> ::std::boxed::Box<dyn ::std::any::Any> {
            ::std::boxed::Box::new(($ctor)())
        }
        construct
    }};
}
