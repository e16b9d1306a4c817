//! Registry of providers and the per-call resolver
//!
//! The registry maps each [`Key`] to the provider that produces it. A
//! [`Resolver`] walks that map for one top-level request: it constructs
//! missing values at most once per application, caches them, and reports a
//! cycle when a provider transitively asks for its own output.

use super::key::Key;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use wireup_domain::error::{Error, Result};
use wireup_domain::ports::{Event, EventLogger};

/// Type-erased `Arc<T>` produced by a provider
pub(crate) type Instance = Box<dyn Any + Send + Sync>;

/// Type-erased constructor
pub(crate) type BuildFn = Arc<dyn Fn(&Resolver<'_>) -> Result<Instance> + Send + Sync>;

/// One provider known to the registry
pub(crate) struct Registration {
    pub(crate) label: String,
    pub(crate) key: Key,
    pub(crate) build: BuildFn,
    pub(crate) supplied: bool,
}

#[derive(Default)]
pub(crate) struct Registry {
    entries: Vec<Registration>,
    singles: HashMap<Key, usize>,
    groups: HashMap<Key, Vec<usize>>,
}

impl Registry {
    /// Add a provider; a second provider for the same single key is refused
    pub(crate) fn register(&mut self, registration: Registration) -> Result<()> {
        let index = self.entries.len();
        if registration.key.is_group() {
            self.groups
                .entry(registration.key.clone())
                .or_default()
                .push(index);
        } else {
            if let Some(&existing) = self.singles.get(&registration.key) {
                return Err(Error::usage(format!(
                    "cannot provide {} from {}: already provided by {}",
                    registration.key, registration.label, self.entries[existing].label
                )));
            }
            self.singles.insert(registration.key.clone(), index);
        }
        self.entries.push(registration);
        Ok(())
    }

    fn single(&self, key: &Key) -> Option<usize> {
        self.singles.get(key).copied()
    }

    fn group(&self, key: &Key) -> &[usize] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    fn entry(&self, index: usize) -> &Registration {
        &self.entries[index]
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Resolves dependencies for one top-level request
pub struct Resolver<'a> {
    registry: &'a Registry,
    cache: &'a Mutex<HashMap<usize, Instance>>,
    logger: &'a dyn EventLogger,
    path: RefCell<Vec<(Option<usize>, String)>>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(
        registry: &'a Registry,
        cache: &'a Mutex<HashMap<usize, Instance>>,
        logger: &'a dyn EventLogger,
        requester: &str,
    ) -> Self {
        Self {
            registry,
            cache,
            logger,
            path: RefCell::new(vec![(None, requester.to_string())]),
        }
    }

    /// The single value of type `T` (optionally named), if one is provided
    pub fn resolve<T>(&self, name: Option<&str>) -> Result<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        match self.registry.single(&Key::single::<T>(name)) {
            Some(index) => self.instance::<T>(index).map(Some),
            None => Ok(None),
        }
    }

    /// Every value of type `T` contributed to `group`, in registration order
    pub fn resolve_group<T>(&self, group: &str) -> Result<Vec<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.registry
            .group(&Key::group::<T>(group))
            .iter()
            .map(|&index| self.instance::<T>(index))
            .collect()
    }

    /// Label of the constructor or invocation currently asking for values
    pub fn requester(&self) -> String {
        self.path
            .borrow()
            .last()
            .map(|(_, label)| label.clone())
            .unwrap_or_default()
    }

    /// Error for a required dependency without provider
    pub fn missing(&self, key: Key) -> Error {
        Error::MissingDependency {
            key: key.to_string(),
            required_by: self.requester(),
        }
    }

    fn instance<T>(&self, index: usize) -> Result<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let registration = self.registry.entry(index);
        if let Some(instance) = lock(self.cache).get(&index) {
            return downcast::<T>(instance, &registration.key);
        }

        self.enter(index, &registration.label)?;
        let built = (registration.build)(self);
        self.path.borrow_mut().pop();

        if !registration.supplied {
            self.logger.log_event(&Event::Constructed {
                constructor: registration.label.clone(),
                error: built.as_ref().err().map(ToString::to_string),
            });
        }

        let mut cache = lock(self.cache);
        let instance = cache.entry(index).or_insert(built?);
        downcast::<T>(instance, &registration.key)
    }

    fn enter(&self, index: usize, label: &str) -> Result<()> {
        let mut path = self.path.borrow_mut();
        if let Some(start) = path.iter().position(|(active, _)| *active == Some(index)) {
            let cycle = path[start..]
                .iter()
                .map(|(_, label)| label.as_str())
                .chain(std::iter::once(label))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(Error::Cycle { path: cycle });
        }
        path.push((Some(index), label.to_string()));
        Ok(())
    }
}

fn downcast<T>(instance: &Instance, key: &Key) -> Result<Arc<T>>
where
    T: ?Sized + Send + Sync + 'static,
{
    instance
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| Error::internal(format!("value stored for {key} has an unexpected type")))
}
