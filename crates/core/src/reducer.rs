//! Pure state transition trait shared by the cart and wishlist.

use serde::{Serialize, de::DeserializeOwned};

/// A state value that evolves by applying actions.
///
/// The implementing type itself is the state. Stores hold one of these, apply
/// each incoming action, commit the result, and only then run side effects
/// (persistence, subscriber notification).
///
/// # Contract
///
/// [`apply`](Reducer::apply) must be a pure, total function: it takes
/// ownership of the current state and a reference to an action and returns the
/// next state. No I/O, no clock reads, no failure. An action that does not
/// apply (e.g., removing an absent line) returns the state unchanged.
pub trait Reducer: Default + Clone + Serialize + DeserializeOwned + Send + 'static {
    /// The set of actions this state understands.
    type Action;

    /// Apply a single action to produce the next state.
    #[must_use]
    fn apply(self, action: &Self::Action) -> Self;

    /// Whether the state satisfies its invariants.
    ///
    /// States produced by [`apply`](Reducer::apply) always do. Restored state
    /// that does not is treated as unreadable and replaced by the default.
    fn is_consistent(&self) -> bool {
        true
    }
}
