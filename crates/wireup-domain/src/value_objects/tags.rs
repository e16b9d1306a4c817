//! Wiring directives and the fluent tag builders
//!
//! A [`Directive`] tells the container how one parameter (or one result) of a
//! constructor is wired: by type only, by name, by group, or as optional.
//! Directives are strictly positional: the n-th directive applies to the n-th
//! parameter, and there is no merge or overwrite within one builder.
//!
//! ```
//! use wireup_domain::value_objects::Tags;
//!
//! let params = Tags::new().name("primary").skip().optional().params();
//! assert_eq!(params.len(), 3);
//! ```

use crate::constants::SCOPE_SEPARATOR;
use serde::Serialize;
use std::fmt;

/// One positional wiring instruction
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    /// Wire by type only
    #[default]
    Skip,
    /// Wire the value registered under this name
    Name(String),
    /// Wire every value contributed to this group
    Group(String),
    /// Wire by type, tolerating absence
    Optional,
    /// Wire by name, tolerating absence
    OptionalName(String),
}

impl Directive {
    /// Name this directive binds to, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Name(name) | Self::OptionalName(name) => Some(name),
            _ => None,
        }
    }

    /// Group this directive binds to, if any
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::Group(group) => Some(group),
            _ => None,
        }
    }

    /// Whether absence of the dependency is tolerated
    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional | Self::OptionalName(_))
    }

    /// Whether this directive carries no information
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::Skip)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => Ok(()),
            Self::Name(name) => write!(f, "name:{name:?}"),
            Self::Group(group) => write!(f, "group:{group:?}"),
            Self::Optional => write!(f, "optional:\"true\""),
            Self::OptionalName(name) => write!(f, "name:{name:?} optional:\"true\""),
        }
    }
}

/// Materialized directives for a constructor's parameter list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamTags(Vec<Directive>);

impl ParamTags {
    /// Directive for the parameter at `position`; untagged positions are `Skip`
    pub fn at(&self, position: usize) -> &Directive {
        const SKIP: &Directive = &Directive::Skip;
        self.0.get(position).unwrap_or(SKIP)
    }

    /// Number of tagged positions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no position is tagged
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over directives in position order
    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.0.iter()
    }
}

/// Materialized directives for a constructor's result list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTags(Vec<Directive>);

impl ResultTags {
    /// Directive for the result at `position`; untagged positions are `Skip`
    pub fn at(&self, position: usize) -> &Directive {
        const SKIP: &Directive = &Directive::Skip;
        self.0.get(position).unwrap_or(SKIP)
    }

    /// Number of tagged positions
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no position is tagged
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over directives in position order
    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.0.iter()
    }
}

/// Fluent accumulator of positional directives
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags {
    directives: Vec<Directive>,
}

impl Tags {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Leave the next position untagged
    pub fn skip(self) -> Self {
        self.push(Directive::Skip)
    }

    /// Mark the next position optional
    pub fn optional(self) -> Self {
        self.push(Directive::Optional)
    }

    /// Bind the next position to `name`
    pub fn name(self, name: impl Into<String>) -> Self {
        self.push(Directive::Name(name.into()))
    }

    /// Bind the next position to `name`, tolerating absence
    pub fn optional_name(self, name: impl Into<String>) -> Self {
        self.push(Directive::OptionalName(name.into()))
    }

    /// Bind the next position to `group`
    pub fn group(self, group: impl Into<String>) -> Self {
        self.push(Directive::Group(group.into()))
    }

    /// Append an arbitrary directive
    pub fn push(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    /// Directives accumulated so far
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Consume the builder as parameter metadata
    pub fn params(self) -> ParamTags {
        ParamTags(self.directives)
    }

    /// Consume the builder as result metadata
    ///
    /// An `optional` directive here is not rejected; the container refuses it
    /// when the application is assembled.
    pub fn results(self) -> ResultTags {
        ResultTags(self.directives)
    }
}

/// Tag builder that prefixes names and groups with a scope
///
/// Only the innermost pushed prefix applies. Pushing an empty prefix suspends
/// prefixing until it is popped again.
///
/// ```
/// use wireup_domain::value_objects::{Directive, ScopedTags};
///
/// let tags = ScopedTags::new()
///     .push("db")
///     .name("primary")
///     .push("")
///     .name("raw")
///     .pop()
///     .group("pools")
///     .into_tags();
///
/// assert_eq!(
///     tags.directives(),
///     &[
///         Directive::Name("db.primary".into()),
///         Directive::Name("raw".into()),
///         Directive::Group("db.pools".into()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopedTags {
    tags: Tags,
    prefixes: Vec<String>,
}

impl ScopedTags {
    /// Create an empty, unscoped builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a scope
    pub fn push(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Leave the innermost scope; a no-op when unscoped
    pub fn pop(mut self) -> Self {
        self.prefixes.pop();
        self
    }

    /// Innermost prefix currently in effect, if any
    pub fn current_prefix(&self) -> Option<&str> {
        self.prefixes
            .last()
            .map(String::as_str)
            .filter(|prefix| !prefix.is_empty())
    }

    fn scoped(&self, value: String) -> String {
        match self.current_prefix() {
            Some(prefix) => format!("{prefix}{SCOPE_SEPARATOR}{value}"),
            None => value,
        }
    }

    /// Leave the next position untagged
    pub fn skip(mut self) -> Self {
        self.tags = self.tags.skip();
        self
    }

    /// Mark the next position optional
    pub fn optional(mut self) -> Self {
        self.tags = self.tags.optional();
        self
    }

    /// Bind the next position to the scoped `name`
    pub fn name(mut self, name: impl Into<String>) -> Self {
        let scoped = self.scoped(name.into());
        self.tags = self.tags.name(scoped);
        self
    }

    /// Bind the next position to the scoped `name`, tolerating absence
    pub fn optional_name(mut self, name: impl Into<String>) -> Self {
        let scoped = self.scoped(name.into());
        self.tags = self.tags.optional_name(scoped);
        self
    }

    /// Bind the next position to the scoped `group`
    pub fn group(mut self, group: impl Into<String>) -> Self {
        let scoped = self.scoped(group.into());
        self.tags = self.tags.group(scoped);
        self
    }

    /// Drop the scope stack and keep the accumulated directives
    pub fn into_tags(self) -> Tags {
        self.tags
    }

    /// Consume the builder as parameter metadata
    pub fn params(self) -> ParamTags {
        self.tags.params()
    }

    /// Consume the builder as result metadata
    pub fn results(self) -> ResultTags {
        self.tags.results()
    }
}
