//! Dependency walker
//!
//! Visits the values a constructor received, depth-first and in declaration
//! order. A parameter set (declared with [`params!`](crate::params)) is
//! expanded field by field; nested parameter sets are expanded in place. Any
//! other value is reported once as a naked dependency. The visitor returns
//! `false` to stop the walk, including across the remaining roots.
//!
//! The walker only reads; it never modifies a value it visits.

use std::any::{Any, type_name};
use std::sync::Arc;
use tracing::debug;
use wireup_domain::value_objects::{DependencyRecord, FieldMeta};

/// One field of a parameter set
pub enum Slot<'a> {
    /// A wired value
    Leaf {
        /// Field description
        meta: FieldMeta,
        /// The field's value
        value: &'a (dyn Any + Send + Sync),
        /// Whether the field holds a value
        present: bool,
    },
    /// A parameter set embedded in this one
    Nested(&'a dyn ParamSet),
}

/// A struct whose fields are wired individually
pub trait ParamSet: Send + Sync {
    /// Type name reported as the owner of each field
    fn type_name(&self) -> &'static str;

    /// Fields in declaration order
    fn slots(&self) -> Vec<Slot<'_>>;
}

/// Whether an injected field holds a value
pub trait Presence {
    /// `false` only for an absent optional value
    fn is_present(&self) -> bool;
}

impl<T: ?Sized> Presence for Arc<T> {
    fn is_present(&self) -> bool {
        true
    }
}

impl<T: ?Sized> Presence for Option<Arc<T>> {
    fn is_present(&self) -> bool {
        self.is_some()
    }
}

impl<T: ?Sized> Presence for Vec<Arc<T>> {
    fn is_present(&self) -> bool {
        true
    }
}

/// A root handed to [`walk`]
pub enum Node<'a> {
    /// A value that is not a parameter set
    Naked {
        /// Type name of the value
        type_name: &'static str,
        /// The value
        value: &'a (dyn Any + Send + Sync),
    },
    /// A parameter set to expand
    Params(&'a dyn ParamSet),
}

impl<'a> Node<'a> {
    /// Root for a plain value
    pub fn naked<T: Any + Send + Sync>(value: &'a T) -> Self {
        Self::Naked {
            type_name: type_name::<T>(),
            value,
        }
    }

    /// Root for a parameter set
    pub fn params<P: ParamSet>(set: &'a P) -> Self {
        Self::Params(set)
    }
}

/// Visit every dependency reachable from `roots`
///
/// Returns `false` when the visitor stopped the walk early.
pub fn walk<F>(roots: &[Node<'_>], mut visitor: F) -> bool
where
    F: FnMut(&DependencyRecord<'_>) -> bool,
{
    for root in roots {
        let keep_going = match root {
            Node::Naked { type_name, value } => {
                visitor(&DependencyRecord::naked(*type_name, *value))
            }
            Node::Params(set) => walk_params(*set, &mut visitor),
        };
        if !keep_going {
            return false;
        }
    }
    true
}

fn walk_params<'a, F>(root: &'a dyn ParamSet, visitor: &mut F) -> bool
where
    F: FnMut(&DependencyRecord<'_>) -> bool,
{
    let mut stack = vec![(root.type_name(), root.slots().into_iter())];
    loop {
        let Some((owner, slots)) = stack.last_mut() else {
            return true;
        };
        let owner: &'static str = *owner;
        match slots.next() {
            None => {
                stack.pop();
            }
            Some(Slot::Nested(inner)) => stack.push((inner.type_name(), inner.slots().into_iter())),
            Some(Slot::Leaf {
                meta,
                value,
                present,
            }) => {
                let injected = !meta.directive.is_optional() || present;
                if !visitor(&DependencyRecord::field(owner, &meta, value, injected)) {
                    return false;
                }
            }
        }
    }
}

/// Log every dependency reachable from `roots` at debug level
pub fn log_dependencies(roots: &[Node<'_>]) {
    walk(roots, |record| {
        debug!(
            owner = record.owner.unwrap_or("-"),
            field = record.field.map(|meta| meta.field).unwrap_or("-"),
            type_name = record.type_name,
            name = record.name().unwrap_or("-"),
            group = record.group().unwrap_or("-"),
            optional = record.is_optional(),
            injected = record.injected,
            "Dependency"
        );
        true
    });
}
