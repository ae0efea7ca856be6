//! Consumer-side traits.
//!
//! A consumer can handle events in one of two calling conventions:
//!
//! - **Named handlers**: one trait per category (`NodeHandler::node`,
//!   `WayHandler::way`, ...). Implement only the ones you care about.
//! - **Callable**: [`Visit<P>`], a single `visit` entry point per payload type.
//!   Every closure `FnMut(&P)` is a `Visit<P>`. For flush, a consumer that is
//!   itself callable with no argument (`FnMut()`) also counts, ahead of
//!   `Visit<Flush>`.
//!
//! Neither convention requires a common base trait. Categories a consumer does
//! not implement resolve to no-ops when it is bound to a
//! [`DynamicHandler`](crate::DynamicHandler).

use osmflow_core::{Area, Changeset, Node, Relation, Way};

/// Payload of the flush signal.
///
/// Flushing means no more events will arrive until further notice and buffered
/// output should be finalized now. It carries no data.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Flush;

/// Named handler for nodes.
pub trait NodeHandler {
    fn node(&mut self, node: &Node);
}

/// Named handler for ways.
pub trait WayHandler {
    fn way(&mut self, way: &Way);
}

/// Named handler for relations.
pub trait RelationHandler {
    fn relation(&mut self, relation: &Relation);
}

/// Named handler for areas.
pub trait AreaHandler {
    fn area(&mut self, area: &Area);
}

/// Named handler for changesets.
pub trait ChangesetHandler {
    fn changeset(&mut self, changeset: &Changeset);
}

/// Named handler for the flush signal.
pub trait FlushHandler {
    fn flush(&mut self);
}

/// Callable-style consumer: invoked with a payload, without a per-category name.
///
/// Implement `Visit<Node>`, `Visit<Way>`, ... for each payload the consumer
/// accepts, and `Visit<Flush>` to observe flushes. Argument-free closures
/// observe flushes without going through this trait.
pub trait Visit<P> {
    fn visit(&mut self, object: &P);
}

impl<P, F> Visit<P> for F
where
    F: FnMut(&P),
{
    fn visit(&mut self, object: &P) {
        self(object)
    }
}
