//! Providers that decode configuration records
//!
//! A prototype describes the record to produce. Its shape decides what the
//! container hands out:
//!
//! | Prototype | Provided as | Initial contents |
//! |-----------|-------------|------------------|
//! | `Prototype::Value(t)` | `Arc<T>` | a copy of `t` |
//! | `Prototype::Pointer(t)` | `Arc<ConfigHandle<T>>` | a copy of `*t` |
//! | `Prototype::NullPointer` | `Arc<ConfigHandle<T>>` | `T::default()` |
//!
//! Every construction starts from a fresh copy of the prototype, so two
//! constructions never share storage and the prototype is never modified.
//! Keys the source does not mention keep the prototype's values.

use super::provider::Provider;
use crate::config::{ConfigSource, DecodeOptions};
use arc_swap::ArcSwap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use wireup_domain::error::Result;
use wireup_domain::ports::{Event, EventLogger};

/// Shared configuration record that can be read and replaced at runtime
///
/// Readers never block writers: every read sees one complete version of the
/// record, and a replacement is visible to all clones of the handle.
pub struct ConfigHandle<T>(Arc<ArcSwap<T>>);

impl<T> ConfigHandle<T> {
    /// Wrap `value`
    pub fn new(value: T) -> Self {
        Self(Arc::new(ArcSwap::from_pointee(value)))
    }

    /// Snapshot of the current record
    pub fn load(&self) -> Arc<T> {
        self.0.load_full()
    }

    /// Read the current record through `f`
    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.load())
    }

    /// Replace the record, returning the previous one
    pub fn replace(&self, value: T) -> Arc<T> {
        self.0.swap(Arc::new(value))
    }

    /// Whether both handles point at the same record
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> ConfigHandle<T> {
    /// Copy of the current record
    pub fn get(&self) -> T {
        T::clone(&self.0.load())
    }

    /// Modify a copy of the record through `f` and publish it
    ///
    /// `f` runs again on the newer record if another writer got there first.
    pub fn update(&self, f: impl Fn(&mut T)) {
        self.0.rcu(|current| {
            let mut next = T::clone(current);
            f(&mut next);
            next
        });
    }
}

impl<T> Clone for ConfigHandle<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for ConfigHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConfigHandle").field(&**self.0.load()).finish()
    }
}

/// Template for the record a decoding provider produces
#[derive(Debug, Clone)]
pub enum Prototype<T> {
    /// Produce a plain record starting from this value
    Value(T),
    /// Produce a shared record starting from this value
    Pointer(Box<T>),
    /// Produce a shared record starting from a fresh default
    NullPointer(fn() -> T),
}

impl<T> Prototype<T> {
    /// Plain prototype
    pub fn value(value: T) -> Self {
        Self::Value(value)
    }

    /// Shared prototype starting from `value`
    pub fn pointer(value: T) -> Self {
        Self::Pointer(Box::new(value))
    }

    /// Shared prototype starting from `T::default()`
    pub fn null() -> Self
    where
        T: Default,
    {
        Self::NullPointer(T::default)
    }

    /// Whether the produced record is shared
    pub fn is_pointer(&self) -> bool {
        !matches!(self, Self::Value(_))
    }
}

impl<T: Clone> Prototype<T> {
    /// Allocate fresh storage for one construction
    pub fn resolve(&self) -> Target<T> {
        match self {
            Self::Value(value) => Target {
                destination: value.clone(),
                shared: false,
            },
            Self::Pointer(value) => Target {
                destination: T::clone(value),
                shared: true,
            },
            Self::NullPointer(default) => Target {
                destination: default(),
                shared: true,
            },
        }
    }
}

/// Fresh storage for one construction
#[derive(Debug)]
pub struct Target<T> {
    destination: T,
    shared: bool,
}

impl<T> Target<T> {
    /// Where decoding writes
    pub fn destination(&mut self) -> &mut T {
        &mut self.destination
    }

    /// Whether the component is handed out shared
    pub fn is_pointer(&self) -> bool {
        self.shared
    }

    /// The value to hand out, in the prototype's shape
    pub fn into_component(self) -> Component<T> {
        if self.shared {
            Component::Pointer(ConfigHandle::new(self.destination))
        } else {
            Component::Value(self.destination)
        }
    }

    /// The decoded record itself
    pub fn into_value(self) -> T {
        self.destination
    }

    /// The decoded record behind a shared handle
    pub fn into_handle(self) -> ConfigHandle<T> {
        ConfigHandle::new(self.destination)
    }
}

/// What a decoding provider hands out
#[derive(Debug, Clone)]
pub enum Component<T> {
    /// Plain record
    Value(T),
    /// Shared record
    Pointer(ConfigHandle<T>),
}

/// Build the constructor behind a decoding provider
///
/// The constructor takes the configuration source (required), the
/// container-wide decode options (optional, applied first) and the event
/// logger. A decode failure is returned unchanged as the constructor error.
pub fn decoding_constructor<T, C>(
    prototype: Prototype<T>,
    key: Option<String>,
    options: DecodeOptions,
    finish: fn(Target<T>) -> C,
) -> impl Fn(Arc<ConfigSource>, Option<Arc<DecodeOptions>>, Arc<dyn EventLogger>) -> Result<C>
+ Send
+ Sync
+ 'static
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
    C: 'static,
{
    move |source, global, logger| {
        let mut target = prototype.resolve();
        let merged = DecodeOptions::merge(global.as_deref(), &options);
        let outcome = match &key {
            Some(key) => source.unmarshal_key(key, target.destination(), &merged),
            None => source.unmarshal(target.destination(), &merged),
        };
        logger.log_event(&Event::Decoded {
            type_name: type_name::<T>().to_string(),
            key: key.clone(),
            error: outcome.as_ref().err().map(ToString::to_string),
        });
        outcome?;
        Ok(finish(target))
    }
}

fn decoding_label<T>(key: Option<&str>) -> String {
    match key {
        Some(key) => format!("unmarshal {} from `{key}`", type_name::<T>()),
        None => format!("unmarshal {}", type_name::<T>()),
    }
}

impl<T> Provider<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Decode the whole configuration source into a copy of `prototype`
    pub fn unmarshal(prototype: T, options: DecodeOptions) -> Self {
        Provider::new(decoding_constructor(
            Prototype::value(prototype),
            None,
            options,
            Target::into_value,
        ))
        .label(decoding_label::<T>(None))
    }

    /// Decode the value under `key` into a copy of `prototype`
    pub fn unmarshal_key(key: impl Into<String>, prototype: T, options: DecodeOptions) -> Self {
        let key = key.into();
        let label = decoding_label::<T>(Some(&key));
        Provider::new(decoding_constructor(
            Prototype::value(prototype),
            Some(key),
            options,
            Target::into_value,
        ))
        .label(label)
    }
}

impl<T> Provider<ConfigHandle<T>>
where
    T: Serialize + DeserializeOwned + Clone + Default + Send + Sync + 'static,
{
    /// Decode the whole configuration source into a shared record
    ///
    /// `None` starts from `T::default()`.
    pub fn unmarshal_shared(prototype: Option<T>, options: DecodeOptions) -> Self {
        Provider::new(decoding_constructor(
            shared_prototype(prototype),
            None,
            options,
            Target::into_handle,
        ))
        .label(decoding_label::<T>(None))
    }

    /// Decode the value under `key` into a shared record
    pub fn unmarshal_key_shared(
        key: impl Into<String>,
        prototype: Option<T>,
        options: DecodeOptions,
    ) -> Self {
        let key = key.into();
        let label = decoding_label::<T>(Some(&key));
        Provider::new(decoding_constructor(
            shared_prototype(prototype),
            Some(key),
            options,
            Target::into_handle,
        ))
        .label(label)
    }
}

fn shared_prototype<T: Default>(prototype: Option<T>) -> Prototype<T> {
    match prototype {
        Some(value) => Prototype::pointer(value),
        None => Prototype::null(),
    }
}
