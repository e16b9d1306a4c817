//! Wiring blocks
//!
//! A [`Wiring`] is an ordered list of providers, invocations and deferred
//! errors. Blocks compose: nesting one block in another keeps the order of
//! every entry, and an empty block contributes nothing.

use super::constructor::Constructor;
use super::provider::Provider;
use super::resolver::{Registration, Resolver};
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use wireup_domain::error::{Error, Result};
use wireup_domain::value_objects::ParamTags;

type RunFn = Arc<dyn Fn(&Resolver<'_>) -> Result<()> + Send + Sync>;

/// A function run once while the application is assembled
pub struct Invocation {
    label: String,
    arity: usize,
    param_tags: ParamTags,
    run: Arc<dyn Fn(&Resolver<'_>, &ParamTags) -> Result<()> + Send + Sync>,
}

impl Invocation {
    /// Invocation calling `function` with injected parameters
    pub fn new<C, Args>(function: C) -> Self
    where
        C: Constructor<Args, Output = ()>,
    {
        let arity = function.arity();
        Self {
            label: type_name::<C>().to_string(),
            arity,
            param_tags: ParamTags::default(),
            run: Arc::new(move |resolver: &Resolver<'_>, tags: &ParamTags| {
                function.construct(resolver, tags)
            }),
        }
    }

    /// Override the label used in events and error messages
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Wire the function's parameters positionally
    pub fn param_tags(mut self, tags: ParamTags) -> Self {
        self.param_tags = tags;
        self
    }
}

/// Invocation ready to run
pub(crate) struct Prepared {
    pub(crate) label: String,
    pub(crate) run: RunFn,
}

pub(crate) enum Entry {
    Provide {
        label: String,
        output: String,
        supplied: bool,
        registration: std::result::Result<Registration, Vec<Error>>,
    },
    Invoke(std::result::Result<Prepared, Error>),
    Fail(Error),
}

impl Entry {
    fn label(&self) -> &str {
        match self {
            Self::Provide { label, .. } => label,
            Self::Invoke(Ok(prepared)) => &prepared.label,
            Self::Invoke(Err(_)) => "invalid invocation",
            Self::Fail(_) => "error",
        }
    }
}

/// Ordered block of wiring entries
#[derive(Default)]
pub struct Wiring {
    entries: Vec<Entry>,
}

impl Wiring {
    /// Create an empty block
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide the result of `constructor`
    pub fn provide<C, Args>(constructor: C) -> Self
    where
        C: Constructor<Args>,
        C::Output: Send + Sync + 'static,
    {
        Provider::new(constructor).into()
    }

    /// Provide the result of `constructor` under `name`
    pub fn provide_named<C, Args>(name: impl Into<String>, constructor: C) -> Self
    where
        C: Constructor<Args>,
        C::Output: Send + Sync + 'static,
    {
        Provider::new(constructor).named(name).into()
    }

    /// Provide a ready value
    pub fn supply<T: Send + Sync + 'static>(value: T) -> Self {
        Provider::supply(value).into()
    }

    /// Provide a ready value under `name`
    pub fn supply_named<T: Send + Sync + 'static>(name: impl Into<String>, value: T) -> Self {
        Provider::supply(value).named(name).into()
    }

    /// Provide an existing shared value, which may be a trait object
    pub fn supply_arc<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
        Provider::supply_arc(value).into()
    }

    /// Run `function` once while the application is assembled
    pub fn invoke<C, Args>(function: C) -> Self
    where
        C: Constructor<Args, Output = ()>,
    {
        Invocation::new(function).into()
    }

    /// Make assembling the application fail with `error`
    pub fn error(error: Error) -> Self {
        Self {
            entries: vec![Entry::Fail(error)],
        }
    }

    /// Concatenate blocks in order
    pub fn options(blocks: impl IntoIterator<Item = Wiring>) -> Self {
        blocks.into_iter().collect()
    }

    /// Append another block (or provider, or invocation) after this one
    pub fn with(mut self, other: impl Into<Wiring>) -> Self {
        self.entries.extend(other.into().entries);
        self
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the block contributes nothing
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry labels in order
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(Entry::label).collect()
    }

    pub(crate) fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}

impl fmt::Debug for Wiring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

impl<T: ?Sized + Send + Sync + 'static> From<Provider<T>> for Wiring {
    fn from(provider: Provider<T>) -> Self {
        let label = provider.label_str().to_string();
        let supplied = provider.is_supplied();
        let registration = provider.into_registration();
        let output = match &registration {
            Ok(registration) => registration.key.to_string(),
            Err(_) => type_name::<T>().to_string(),
        };
        Self {
            entries: vec![Entry::Provide {
                label,
                output,
                supplied,
                registration,
            }],
        }
    }
}

impl From<Invocation> for Wiring {
    fn from(invocation: Invocation) -> Self {
        let prepared = if invocation.param_tags.len() > invocation.arity {
            Err(Error::usage(format!(
                "{} takes {} parameter(s) but {} parameter tag(s) were given",
                invocation.label,
                invocation.arity,
                invocation.param_tags.len()
            )))
        } else {
            let run = invocation.run;
            let tags = invocation.param_tags;
            Ok(Prepared {
                label: invocation.label,
                run: Arc::new(move |resolver: &Resolver<'_>| run(resolver, &tags)),
            })
        };
        Self {
            entries: vec![Entry::Invoke(prepared)],
        }
    }
}

impl FromIterator<Wiring> for Wiring {
    fn from_iter<I: IntoIterator<Item = Wiring>>(iter: I) -> Self {
        let mut wiring = Wiring::new();
        wiring.extend(iter);
        wiring
    }
}

impl Extend<Wiring> for Wiring {
    fn extend<I: IntoIterator<Item = Wiring>>(&mut self, iter: I) {
        for block in iter {
            self.entries.extend(block.entries);
        }
    }
}
