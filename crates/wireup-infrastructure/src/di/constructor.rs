//! Functions the container can call
//!
//! Any `Fn(A1, .., An) -> Result<R>` whose parameters implement [`Inject`]
//! is a [`Constructor`]. Parameter `i` is wired using directive `i` of the
//! [`ParamTags`] supplied with it; untagged positions wire by type.

use super::inject::Inject;
use super::resolver::Resolver;
use wireup_domain::error::Result;
use wireup_domain::value_objects::ParamTags;

/// A function whose parameters the container can supply
pub trait Constructor<Args>: Send + Sync + 'static {
    /// Value produced on success
    type Output;

    /// Number of parameters
    fn arity(&self) -> usize;

    /// Resolve every parameter and call the function
    fn construct(&self, resolver: &Resolver<'_>, tags: &ParamTags) -> Result<Self::Output>;
}

macro_rules! impl_constructor {
    ($count:expr; $($arg:ident),*) => {
        #[allow(non_snake_case, unused_variables, unused_mut, unused_assignments)]
        impl<F, R, $($arg,)*> Constructor<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> Result<R> + Send + Sync + 'static,
            $($arg: Inject,)*
        {
            type Output = R;

            fn arity(&self) -> usize {
                $count
            }

            fn construct(&self, resolver: &Resolver<'_>, tags: &ParamTags) -> Result<R> {
                let mut position = 0usize;
                $(
                    let $arg = $arg::inject(resolver, tags.at(position))?;
                    position += 1;
                )*
                (self)($($arg),*)
            }
        }
    };
}

impl_constructor!(0;);
impl_constructor!(1; A1);
impl_constructor!(2; A1, A2);
impl_constructor!(3; A1, A2, A3);
impl_constructor!(4; A1, A2, A3, A4);
impl_constructor!(5; A1, A2, A3, A4, A5);
impl_constructor!(6; A1, A2, A3, A4, A5, A6);
impl_constructor!(7; A1, A2, A3, A4, A5, A6, A7);
impl_constructor!(8; A1, A2, A3, A4, A5, A6, A7, A8);
