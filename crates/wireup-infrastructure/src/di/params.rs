//! Parameter sets
//!
//! [`params!`](crate::params) declares a struct whose fields are injected
//! one by one, each with its own directive:
//!
//! ```ignore
//! wireup_infrastructure::params! {
//!     pub struct ServerDeps {
//!         pub config: Arc<ServerConfig>,
//!         #[dep(name = "primary")]
//!         pub db: Arc<Database>,
//!         #[dep(optional)]
//!         pub cache: Option<Arc<Cache>>,
//!         #[dep(group = "routes")]
//!         pub routes: Vec<Arc<dyn Route>>,
//!         #[dep(nested)]
//!         pub common: CommonDeps,
//!     }
//! }
//! ```
//!
//! The struct can be taken as a constructor parameter and handed to the
//! dependency walker.

use super::resolver::Resolver;
use std::any::type_name;
use wireup_domain::error::{Error, Result};
use wireup_domain::value_objects::Directive;

/// Parameter sets are wired field by field and cannot be tagged as a whole
#[doc(hidden)]
pub fn expect_untagged<P>(resolver: &Resolver<'_>, directive: &Directive) -> Result<()> {
    if directive.is_skip() {
        return Ok(());
    }
    Err(Error::usage(format!(
        "parameter set {} of {} cannot take directive `{directive}`; tag its fields instead",
        type_name::<P>(),
        resolver.requester()
    )))
}

/// Declare a parameter set
#[macro_export]
macro_rules! params {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[doc = $doc:literal])*
                $(#[dep($($dep:tt)*)])?
                $fvis:vis $field:ident : $fty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[doc = $doc])*
                $fvis $field: $fty,
            )*
        }

        impl $crate::di::Inject for $name {
            fn inject(
                resolver: &$crate::di::Resolver<'_>,
                directive: &$crate::__private::Directive,
            ) -> $crate::__private::Result<Self> {
                $crate::di::params::expect_untagged::<Self>(resolver, directive)?;
                ::std::result::Result::Ok(Self {
                    $(
                        $field: <$fty as $crate::di::Inject>::inject(
                            resolver,
                            &$crate::__params_directive!($($($dep)*)?),
                        )?,
                    )*
                })
            }
        }

        impl $crate::di::ParamSet for $name {
            fn type_name(&self) -> &'static str {
                ::std::any::type_name::<Self>()
            }

            fn slots(&self) -> ::std::vec::Vec<$crate::di::Slot<'_>> {
                ::std::vec![
                    $(
                        $crate::__params_slot!(&self.$field, $field, $fty; $($($dep)*)?),
                    )*
                ]
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __params_directive {
    () => {
        $crate::__private::Directive::Skip
    };
    (nested) => {
        $crate::__private::Directive::Skip
    };
    (optional) => {
        $crate::__private::Directive::Optional
    };
    (name = $name:literal) => {
        $crate::__private::Directive::Name(::std::string::String::from($name))
    };
    (optional, name = $name:literal) => {
        $crate::__private::Directive::OptionalName(::std::string::String::from($name))
    };
    (name = $name:literal, optional) => {
        $crate::__private::Directive::OptionalName(::std::string::String::from($name))
    };
    (group = $group:literal) => {
        $crate::__private::Directive::Group(::std::string::String::from($group))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __params_slot {
    ($value:expr, $field:ident, $fty:ty; nested) => {
        $crate::di::Slot::Nested($value)
    };
    ($value:expr, $field:ident, $fty:ty; $($dep:tt)*) => {
        $crate::di::Slot::Leaf {
            meta: $crate::__private::FieldMeta::new(
                ::std::stringify!($field),
                ::std::any::type_name::<$fty>(),
                $crate::__params_directive!($($dep)*),
            ),
            value: $value,
            present: $crate::di::Presence::is_present($value),
        }
    };
}
