//! Domain events published on the shared broadcast bus.
//!
//! Subscribers hold a `broadcast::Receiver`; dropping one receiver never
//! affects the others, which is how a view stops listening to a query it no
//! longer renders.

use crate::cache::QueryKey;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    /// The session store changed state.
    SessionChanged { authenticated: bool },

    /// A fetch for this query completed and its entry was applied.
    QueryUpdated(QueryKey),

    /// This query's entry was marked stale by a tag invalidation.
    QueryInvalidated(QueryKey),
}
