//! Value objects shared by the wiring layers

pub mod dependency;
pub mod tags;

pub use dependency::{DependencyRecord, FieldMeta};
pub use tags::{Directive, ParamTags, ResultTags, ScopedTags, Tags};
