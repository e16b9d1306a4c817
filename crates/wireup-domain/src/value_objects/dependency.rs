//! Dependency records produced by the dependency walker

use super::tags::Directive;
use std::any::Any;
use std::fmt;

/// Static description of one injected field of a parameter set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMeta {
    /// Field identifier
    pub field: &'static str,
    /// Type name of the field
    pub type_name: &'static str,
    /// How the field is wired
    pub directive: Directive,
}

impl FieldMeta {
    /// Describe a field
    pub fn new(field: &'static str, type_name: &'static str, directive: Directive) -> Self {
        Self {
            field,
            type_name,
            directive,
        }
    }
}

/// One visited dependency
///
/// A naked dependency (a value that is not a parameter set) has no owner, no
/// field, no name or group, and is never optional.
pub struct DependencyRecord<'a> {
    /// Type name of the enclosing parameter set
    pub owner: Option<&'static str>,
    /// Field descriptor within the owner
    pub field: Option<&'a FieldMeta>,
    /// Type name of the value
    pub type_name: &'static str,
    /// The value itself
    pub value: &'a (dyn Any + Send + Sync),
    /// Whether the value was actually supplied by the container
    pub injected: bool,
}

impl<'a> DependencyRecord<'a> {
    /// Record for a value visited on its own
    pub fn naked(type_name: &'static str, value: &'a (dyn Any + Send + Sync)) -> Self {
        Self {
            owner: None,
            field: None,
            type_name,
            value,
            injected: true,
        }
    }

    /// Record for a field of a parameter set
    pub fn field(
        owner: &'static str,
        field: &'a FieldMeta,
        value: &'a (dyn Any + Send + Sync),
        injected: bool,
    ) -> Self {
        Self {
            owner: Some(owner),
            field: Some(field),
            type_name: field.type_name,
            value,
            injected,
        }
    }

    /// Whether this record stands for a whole value rather than a field
    pub fn is_naked(&self) -> bool {
        self.owner.is_none()
    }

    /// Name the field was wired by
    pub fn name(&self) -> Option<&str> {
        self.field.and_then(|meta| meta.directive.name())
    }

    /// Group the field was wired from
    pub fn group(&self) -> Option<&str> {
        self.field.and_then(|meta| meta.directive.group())
    }

    /// Whether the field tolerates absence
    pub fn is_optional(&self) -> bool {
        self.field.is_some_and(|meta| meta.directive.is_optional())
    }
}

impl fmt::Debug for DependencyRecord<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependencyRecord")
            .field("owner", &self.owner)
            .field("field", &self.field.map(|meta| meta.field))
            .field("type_name", &self.type_name)
            .field("name", &self.name())
            .field("group", &self.group())
            .field("optional", &self.is_optional())
            .field("injected", &self.injected)
            .finish()
    }
}
