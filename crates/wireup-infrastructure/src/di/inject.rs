//! Values a constructor can ask for
//!
//! A constructor parameter is anything implementing [`Inject`]. The three
//! container shapes map onto the directive kinds:
//!
//! | Parameter type | Accepted directives |
//! |----------------|---------------------|
//! | `Arc<T>` | untagged, `name` |
//! | `Option<Arc<T>>` | untagged, `name`, `optional`, optional `name` |
//! | `Vec<Arc<T>>` | `group` |
//!
//! Parameter sets declared with [`params!`](crate::params) also implement
//! [`Inject`] and fill each field from its own directive.

use super::key::Key;
use super::resolver::Resolver;
use std::any::type_name;
use std::sync::Arc;
use wireup_domain::error::{Error, Result};
use wireup_domain::value_objects::Directive;

/// Something the container can build from its registered values
pub trait Inject: Sized {
    /// Produce the value as instructed by `directive`
    fn inject(resolver: &Resolver<'_>, directive: &Directive) -> Result<Self>;
}

impl<T> Inject for Arc<T>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn inject(resolver: &Resolver<'_>, directive: &Directive) -> Result<Self> {
        match directive {
            Directive::Skip | Directive::Name(_) => {
                let name = directive.name();
                resolver
                    .resolve::<T>(name)?
                    .ok_or_else(|| resolver.missing(Key::single::<T>(name)))
            }
            Directive::Optional | Directive::OptionalName(_) => Err(mismatch::<Self>(
                resolver,
                directive,
                "optional dependencies must be declared as Option<Arc<_>>",
            )),
            Directive::Group(_) => Err(mismatch::<Self>(
                resolver,
                directive,
                "group dependencies must be declared as Vec<Arc<_>>",
            )),
        }
    }
}

impl<T> Inject for Option<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn inject(resolver: &Resolver<'_>, directive: &Directive) -> Result<Self> {
        match directive {
            Directive::Group(_) => Err(mismatch::<Self>(
                resolver,
                directive,
                "group dependencies must be declared as Vec<Arc<_>>",
            )),
            other => resolver.resolve::<T>(other.name()),
        }
    }
}

impl<T> Inject for Vec<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    fn inject(resolver: &Resolver<'_>, directive: &Directive) -> Result<Self> {
        match directive.group() {
            Some(group) => resolver.resolve_group::<T>(group),
            None => Err(mismatch::<Self>(
                resolver,
                directive,
                "a Vec<Arc<_>> parameter needs a group directive",
            )),
        }
    }
}

fn mismatch<P>(resolver: &Resolver<'_>, directive: &Directive, reason: &str) -> Error {
    Error::usage(format!(
        "parameter {} of {} cannot take directive `{directive}`: {reason}",
        type_name::<P>(),
        resolver.requester()
    ))
}
