//! Conditional wiring
//!
//! ```
//! use wireup_infrastructure::di::{ConditionalExt, Wiring, when};
//!
//! let debug = false;
//! let wiring = when(debug).then([Wiring::supply(42u32)]);
//! assert!(wiring.is_empty());
//! ```

use super::wiring::Wiring;

/// Witness that a condition held; consumed by [`Conditional::then`]
#[derive(Debug)]
#[must_use = "a condition does nothing until `then` is called"]
pub struct Conditional {
    _private: (),
}

impl Conditional {
    /// Combine `blocks` into a single block
    pub fn then(self, blocks: impl IntoIterator<Item = Wiring>) -> Wiring {
        Wiring::options(blocks)
    }
}

/// `Some` when `predicate` holds
pub fn when(predicate: bool) -> Option<Conditional> {
    predicate.then_some(Conditional { _private: () })
}

/// `Some` when `predicate` does not hold
pub fn when_not(predicate: bool) -> Option<Conditional> {
    when(!predicate)
}

/// Lets an absent condition be used like a present one
pub trait ConditionalExt {
    /// The combined blocks when the condition held, otherwise an empty block
    fn then(self, blocks: impl IntoIterator<Item = Wiring>) -> Wiring;
}

impl ConditionalExt for Option<Conditional> {
    fn then(self, blocks: impl IntoIterator<Item = Wiring>) -> Wiring {
        match self {
            Some(conditional) => conditional.then(blocks),
            None => Wiring::new(),
        }
    }
}
