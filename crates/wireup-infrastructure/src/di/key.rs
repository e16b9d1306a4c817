//! Registration keys

use std::any::{TypeId, type_name};
use std::fmt;

/// Where a value lives for its type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum Slot {
    /// One value, optionally named
    Single(Option<String>),
    /// Any number of values contributed to a group
    Group(String),
}

/// Identity of a registered value: its type plus its name or group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    type_id: TypeId,
    type_name: &'static str,
    slot: Slot,
}

impl Key {
    /// Key of a single value of type `T`, optionally named
    pub fn single<T: ?Sized + 'static>(name: Option<&str>) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            slot: Slot::Single(name.map(str::to_string)),
        }
    }

    /// Key of the group `group` of values of type `T`
    pub fn group<T: ?Sized + 'static>(group: &str) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            slot: Slot::Group(group.to_string()),
        }
    }

    /// Type name of the keyed value
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Name of the keyed value, if it is named
    pub fn name(&self) -> Option<&str> {
        match &self.slot {
            Slot::Single(name) => name.as_deref(),
            Slot::Group(_) => None,
        }
    }

    /// Group of the keyed value, if it belongs to one
    pub fn group_name(&self) -> Option<&str> {
        match &self.slot {
            Slot::Group(group) => Some(group),
            Slot::Single(_) => None,
        }
    }

    pub(crate) fn is_group(&self) -> bool {
        matches!(self.slot, Slot::Group(_))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.slot {
            Slot::Single(None) => f.write_str(self.type_name),
            Slot::Single(Some(name)) => write!(f, "{}[name = {name:?}]", self.type_name),
            Slot::Group(group) => write!(f, "{}[group = {group:?}]", self.type_name),
        }
    }
}
