//! Custom actions for the Order actor.
//!
//! Orders are never edited in place; the only transition after creation is
//! completion, handled by [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action).

/// Custom actions for Order entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Marks the order completed.
    ///
    /// The action result is `true` when this call performed the transition and
    /// `false` when the order was already completed. Both are successes.
    Complete,
}
