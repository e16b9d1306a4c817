//! Providers: constructors plus their wiring metadata
//!
//! A [`Provider`] pairs a constructor with positional parameter tags and a
//! single result tag. It is the dynamic counterpart of writing a dedicated
//! parameter struct: the same constructor can be registered several times
//! under different names, groups or interface bindings.
//!
//! Tag problems are not reported when the builder methods are called. They
//! are collected and surface all together when the application is built.

use super::constructor::Constructor;
use super::key::Key;
use super::resolver::{BuildFn, Instance, Registration, Resolver};
use std::any::type_name;
use std::sync::Arc;
use wireup_domain::error::{Error, Result};
use wireup_domain::value_objects::{Directive, ParamTags, ResultTags, Tags};

type ProduceFn<T> = Arc<dyn Fn(&Resolver<'_>, &ParamTags) -> Result<Arc<T>> + Send + Sync>;

/// A constructor (or ready value) together with how it is wired
pub struct Provider<T: ?Sized + Send + Sync + 'static> {
    label: String,
    arity: usize,
    param_tags: ParamTags,
    result_tags: ResultTags,
    supplied: bool,
    produce: ProduceFn<T>,
}

impl<T: Send + Sync + 'static> Provider<T> {
    /// Provider calling `constructor` with injected parameters
    pub fn new<C, Args>(constructor: C) -> Self
    where
        C: Constructor<Args, Output = T>,
    {
        let arity = constructor.arity();
        Self {
            label: type_name::<C>().to_string(),
            arity,
            param_tags: ParamTags::default(),
            result_tags: ResultTags::default(),
            supplied: false,
            produce: Arc::new(move |resolver: &Resolver<'_>, tags: &ParamTags| {
                constructor.construct(resolver, tags).map(Arc::new)
            }),
        }
    }

    /// Provider handing out a ready value
    pub fn supply(value: T) -> Self {
        Self::supply_arc(Arc::new(value))
    }
}

impl<T: ?Sized + Send + Sync + 'static> Provider<T> {
    /// Provider whose constructor already returns a shared pointer
    ///
    /// This is how trait objects are provided directly:
    /// `Provider::<dyn Store>::shared(|| Ok(Arc::new(Memory) as Arc<dyn Store>))`.
    pub fn shared<C, Args>(constructor: C) -> Self
    where
        C: Constructor<Args, Output = Arc<T>>,
    {
        let arity = constructor.arity();
        Self {
            label: type_name::<C>().to_string(),
            arity,
            param_tags: ParamTags::default(),
            result_tags: ResultTags::default(),
            supplied: false,
            produce: Arc::new(move |resolver: &Resolver<'_>, tags: &ParamTags| {
                constructor.construct(resolver, tags)
            }),
        }
    }

    /// Provider handing out an existing shared value
    pub fn supply_arc(value: Arc<T>) -> Self {
        Self {
            label: format!("supply {}", type_name::<T>()),
            arity: 0,
            param_tags: ParamTags::default(),
            result_tags: ResultTags::default(),
            supplied: true,
            produce: Arc::new(move |_: &Resolver<'_>, _: &ParamTags| Ok(Arc::clone(&value))),
        }
    }

    /// Override the label used in events and error messages
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Wire the constructor's parameters positionally
    pub fn param_tags(mut self, tags: ParamTags) -> Self {
        self.param_tags = tags;
        self
    }

    /// Register the result under the given directive
    pub fn result_tags(mut self, tags: ResultTags) -> Self {
        self.result_tags = tags;
        self
    }

    /// Register the result under `name`
    pub fn named(self, name: impl Into<String>) -> Self {
        self.result_tags(Tags::new().name(name).results())
    }

    /// Contribute the result to `group`
    pub fn group(self, group: impl Into<String>) -> Self {
        self.result_tags(Tags::new().group(group).results())
    }

    /// Register the result as the interface `I` instead of as `T`
    ///
    /// ```ignore
    /// Provider::new(new_memory_store).bind::<dyn Store>(|store| store)
    /// ```
    pub fn bind<I>(self, cast: fn(Arc<T>) -> Arc<I>) -> Provider<I>
    where
        I: ?Sized + Send + Sync + 'static,
    {
        let produce = self.produce;
        Provider {
            label: self.label,
            arity: self.arity,
            param_tags: self.param_tags,
            result_tags: self.result_tags,
            supplied: self.supplied,
            produce: Arc::new(move |resolver: &Resolver<'_>, tags: &ParamTags| {
                produce(resolver, tags).map(cast)
            }),
        }
    }

    /// Label used in events and error messages
    pub fn label_str(&self) -> &str {
        &self.label
    }

    /// Whether this provider hands out a ready value
    pub fn is_supplied(&self) -> bool {
        self.supplied
    }

    /// Validate the tags and erase the value type
    pub(crate) fn into_registration(self) -> std::result::Result<Registration, Vec<Error>> {
        let mut problems = Vec::new();

        if self.param_tags.len() > self.arity {
            problems.push(Error::usage(format!(
                "{} takes {} parameter(s) but {} parameter tag(s) were given",
                self.label,
                self.arity,
                self.param_tags.len()
            )));
        }
        for directive in self.param_tags.iter() {
            if let Some(problem) = empty_target(&self.label, directive) {
                problems.push(problem);
            }
        }

        if self.result_tags.len() > 1 {
            problems.push(Error::usage(format!(
                "{} produces one value but {} result tags were given",
                self.label,
                self.result_tags.len()
            )));
        }
        let result = self.result_tags.at(0);
        if result.is_optional() {
            problems.push(Error::usage(format!(
                "cannot apply `{result}` to the result of {}: results cannot be optional",
                self.label
            )));
        }
        if let Some(problem) = empty_target(&self.label, result) {
            problems.push(problem);
        }

        if !problems.is_empty() {
            return Err(problems);
        }

        let key = match result {
            Directive::Group(group) => Key::group::<T>(group),
            other => Key::single::<T>(other.name()),
        };
        let produce = self.produce;
        let param_tags = self.param_tags;
        let build: BuildFn = Arc::new(move |resolver: &Resolver<'_>| {
            produce(resolver, &param_tags).map(|value| Box::new(value) as Instance)
        });

        Ok(Registration {
            label: self.label,
            key,
            build,
            supplied: self.supplied,
        })
    }
}

fn empty_target(label: &str, directive: &Directive) -> Option<Error> {
    let empty = directive.name().is_some_and(str::is_empty)
        || directive.group().is_some_and(str::is_empty);
    empty.then(|| Error::usage(format!("{label}: names and groups cannot be empty")))
}
