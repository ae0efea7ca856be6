//! Type-erased handler whose consumer is chosen at setup time.
//!
//! A pipeline holds one [`DynamicHandler`] and feeds every event to it. What
//! actually consumes those events is bound later with [`bind!`](crate::bind!)
//! or [`try_bind!`](crate::try_bind!), and can be swapped as often as needed.
//!
//! ## Binding
//!
//! Binding drops the current consumer, constructs the new one, resolves its
//! [`DispatchTable`] and installs both behind a `Box<dyn ...>`. The pipeline
//! never learns the consumer's concrete type.
//!
//! ## Failure semantics
//!
//! - A failed construction (`try_bind!` returning `Err`, or a panicking
//!   constructor) leaves the handler **unbound**. The previous consumer is
//!   already gone at that point; nothing partially built is ever installed.
//! - Panics raised by the consumer while handling an event unwind through the
//!   dispatch call untouched.
//!
//! ## Threading
//!
//! No locking and no `Send` bound on consumers: the handler belongs to the
//! thread that drives the pipeline.

use std::any::{Any, type_name};

use osmflow_core::{Area, Changeset, Node, Relation, Way};
use tracing::debug;

use crate::handler::{
    AreaHandler, ChangesetHandler, Flush, FlushHandler, NodeHandler, RelationHandler, WayHandler,
};
use crate::resolve::{Category, Convention, DispatchTable};

/// The fixed interface every erased consumer is reached through.
trait ErasedHandler {
    fn node(&mut self, _node: &Node) {}

    fn way(&mut self, _way: &Way) {}

    fn relation(&mut self, _relation: &Relation) {}

    fn area(&mut self, _area: &Area) {}

    fn changeset(&mut self, _changeset: &Changeset) {}

    fn flush(&mut self) {}

    fn consumer_type(&self) -> Option<&'static str> {
        None
    }

    fn convention(&self, _category: Category) -> Convention {
        Convention::Noop
    }

    fn as_any(&self) -> Option<&dyn Any> {
        None
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        None
    }
}

/// State before the first bind and after a reset or failed bind.
struct Unbound;

impl ErasedHandler for Unbound {}

/// A concrete consumer together with its resolved dispatch functions.
struct Bound<T> {
    consumer: T,
    table: DispatchTable<T>,
}

impl<T: 'static> ErasedHandler for Bound<T> {
    fn node(&mut self, node: &Node) {
        self.table.node.call(&mut self.consumer, node)
    }

    fn way(&mut self, way: &Way) {
        self.table.way.call(&mut self.consumer, way)
    }

    fn relation(&mut self, relation: &Relation) {
        self.table.relation.call(&mut self.consumer, relation)
    }

    fn area(&mut self, area: &Area) {
        self.table.area.call(&mut self.consumer, area)
    }

    fn changeset(&mut self, changeset: &Changeset) {
        self.table.changeset.call(&mut self.consumer, changeset)
    }

    fn flush(&mut self) {
        self.table.flush.call(&mut self.consumer, &Flush)
    }

    fn consumer_type(&self) -> Option<&'static str> {
        Some(type_name::<T>())
    }

    fn convention(&self, category: Category) -> Convention {
        self.table.convention(category)
    }

    fn as_any(&self) -> Option<&dyn Any> {
        Some(&self.consumer)
    }

    fn as_any_mut(&mut self) -> Option<&mut dyn Any> {
        Some(&mut self.consumer)
    }
}

/// Owns exactly one consumer (or the unbound no-op state) and forwards events to it.
pub struct DynamicHandler {
    inner: Box<dyn ErasedHandler>,
}

impl DynamicHandler {
    /// An unbound handler: every event is ignored until something is bound.
    pub fn new() -> Self {
        Self {
            inner: Box::new(Unbound),
        }
    }

    /// Install `consumer` with an already resolved table, dropping the current consumer.
    ///
    /// Prefer [`bind!`](crate::bind!), which resolves the table for you. The
    /// macros reset before evaluating the constructor, so the reset here only
    /// does work for callers that built `consumer` while the old one was alive.
    pub fn bind_with<T: 'static>(&mut self, table: DispatchTable<T>, consumer: T) {
        self.reset();
        debug!(
            consumer = type_name::<T>(),
            node = ?table.node.via(),
            way = ?table.way.via(),
            relation = ?table.relation.via(),
            area = ?table.area.via(),
            changeset = ?table.changeset.via(),
            flush = ?table.flush.via(),
            "bound consumer"
        );
        self.inner = Box::new(Bound { consumer, table });
    }

    /// Drop the current consumer and return to the unbound state.
    pub fn reset(&mut self) {
        if let Some(previous) = self.inner.consumer_type() {
            // Unbound first so a panicking Drop cannot leave the old consumer reachable.
            let old = std::mem::replace(&mut self.inner, Box::new(Unbound));
            drop(old);
            debug!(consumer = previous, "released consumer");
        }
    }

    pub fn is_bound(&self) -> bool {
        self.inner.consumer_type().is_some()
    }

    /// Type name of the bound consumer, for diagnostics.
    pub fn consumer_type(&self) -> Option<&'static str> {
        self.inner.consumer_type()
    }

    /// Convention the bound consumer resolved to for `category`.
    pub fn convention(&self, category: Category) -> Convention {
        self.inner.convention(category)
    }

    /// The bound consumer, if it is a `T`.
    pub fn consumer<T: 'static>(&self) -> Option<&T> {
        self.inner.as_any()?.downcast_ref::<T>()
    }

    /// The bound consumer, mutably, if it is a `T`.
    pub fn consumer_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.inner.as_any_mut()?.downcast_mut::<T>()
    }

    #[inline]
    pub fn node(&mut self, node: &Node) {
        self.inner.node(node)
    }

    #[inline]
    pub fn way(&mut self, way: &Way) {
        self.inner.way(way)
    }

    #[inline]
    pub fn relation(&mut self, relation: &Relation) {
        self.inner.relation(relation)
    }

    #[inline]
    pub fn area(&mut self, area: &Area) {
        self.inner.area(area)
    }

    #[inline]
    pub fn changeset(&mut self, changeset: &Changeset) {
        self.inner.changeset(changeset)
    }

    #[inline]
    pub fn flush(&mut self) {
        self.inner.flush()
    }
}

impl Default for DynamicHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for DynamicHandler {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DynamicHandler")
            .field("consumer", &self.inner.consumer_type())
            .finish()
    }
}

// A DynamicHandler is itself a named-style consumer, so handlers nest.
impl NodeHandler for DynamicHandler {
    fn node(&mut self, node: &Node) {
        DynamicHandler::node(self, node)
    }
}

impl WayHandler for DynamicHandler {
    fn way(&mut self, way: &Way) {
        DynamicHandler::way(self, way)
    }
}

impl RelationHandler for DynamicHandler {
    fn relation(&mut self, relation: &Relation) {
        DynamicHandler::relation(self, relation)
    }
}

impl AreaHandler for DynamicHandler {
    fn area(&mut self, area: &Area) {
        DynamicHandler::area(self, area)
    }
}

impl ChangesetHandler for DynamicHandler {
    fn changeset(&mut self, changeset: &Changeset) {
        DynamicHandler::changeset(self, changeset)
    }
}

impl FlushHandler for DynamicHandler {
    fn flush(&mut self) {
        DynamicHandler::flush(self)
    }
}

/// Bind a consumer to a [`DynamicHandler`].
///
/// `bind!(handler, consumer_expr)` drops the handler's current consumer, then
/// evaluates `consumer_expr`, resolves its dispatch table and installs it.
/// `handler` should be a place expression (a variable, field or deref); it is
/// evaluated more than once.
#[macro_export]
macro_rules! bind {
    ($handler:expr, $consumer:expr $(,)?) => {{
        $handler.reset();
        let consumer = $consumer;
        let table = $crate::resolve!(@of &consumer);
        $handler.bind_with(table, consumer)
    }};
}

/// Bind a consumer built by a fallible constructor.
///
/// `try_bind!(handler, result_expr)` drops the current consumer, evaluates
/// `result_expr: Result<T, E>` and, on `Ok`, installs the consumer. Evaluates to
/// `Result<(), E>`; on `Err` the error is returned unchanged and the handler is
/// left unbound.
#[macro_export]
macro_rules! try_bind {
    ($handler:expr, $make:expr $(,)?) => {{
        $handler.reset();
        match $make {
            ::core::result::Result::Ok(consumer) => {
                let table = $crate::resolve!(@of &consumer);
                $handler.bind_with(table, consumer);
                ::core::result::Result::Ok(())
            }
            ::core::result::Result::Err(err) => ::core::result::Result::Err(err),
        }
    }};
}
