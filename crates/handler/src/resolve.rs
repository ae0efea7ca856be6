//! Compile-time call resolution.
//!
//! For a consumer type `T` and an event category with payload `P`, resolution
//! yields exactly one `fn(&mut T, &P)`, picked in this order:
//!
//! 1. the named handler (`T: NodeHandler` for nodes, ...),
//! 2. the callable form (`T: Visit<P>`, closures included),
//! 3. a no-op.
//!
//! The choice is made by method resolution at the bind site. Each tier is a
//! trait implemented for a differently referenced [`Probe<T>`]: tier 1 for
//! `&&Probe<T>`, tier 2 for `&Probe<T>`, tier 3 for `Probe<T>`. Calling the tier
//! method on `&&&Probe<T>` picks the first receiver whose bounds hold, so the
//! priority order costs nothing at dispatch time.
//!
//! Flush has one more tier: a consumer that is itself callable with no argument
//! (`T: FnMut()`) sits between the named handler and `Visit<Flush>`, so flush
//! probes start one reference deeper. Because the consumer type
//! must be concrete for this to work, resolution runs inside the
//! [`resolve!`](crate::resolve!) macro rather than in a generic function.

use std::marker::PhantomData;

use osmflow_core::{Area, Changeset, Node, Relation, Way};

use crate::handler::{
    AreaHandler, ChangesetHandler, Flush, FlushHandler, NodeHandler, RelationHandler, Visit,
    WayHandler,
};

/// Event category routed through a [`DispatchTable`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Node,
    Way,
    Relation,
    Area,
    Changeset,
    Flush,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Node,
        Category::Way,
        Category::Relation,
        Category::Area,
        Category::Changeset,
        Category::Flush,
    ];
}

/// Calling convention a category resolved to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Convention {
    Named,
    Callable,
    Noop,
}

/// Zero-sized stand-in for a consumer type during resolution.
pub struct Probe<T>(PhantomData<fn() -> T>);

impl<T> Probe<T> {
    pub fn new() -> Self {
        Probe(PhantomData)
    }

    /// Probe for the type of an existing value.
    pub fn of(_consumer: &T) -> Self {
        Probe(PhantomData)
    }
}

impl<T> Default for Probe<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One resolved dispatch function and the convention it came from.
pub struct Resolved<T, P> {
    call: fn(&mut T, &P),
    via: Convention,
}

impl<T, P> Resolved<T, P> {
    pub fn new(call: fn(&mut T, &P), via: Convention) -> Self {
        Self { call, via }
    }

    pub fn noop() -> Self {
        Self::new(ignore::<T, P>, Convention::Noop)
    }

    pub fn via(&self) -> Convention {
        self.via
    }

    #[inline]
    pub fn call(&self, consumer: &mut T, object: &P) {
        (self.call)(consumer, object)
    }
}

impl<T, P> Clone for Resolved<T, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, P> Copy for Resolved<T, P> {}

impl<T, P> core::fmt::Debug for Resolved<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Resolved").field("via", &self.via).finish()
    }
}

/// Resolved dispatch functions for every category of one consumer type.
pub struct DispatchTable<T> {
    pub(crate) node: Resolved<T, Node>,
    pub(crate) way: Resolved<T, Way>,
    pub(crate) relation: Resolved<T, Relation>,
    pub(crate) area: Resolved<T, Area>,
    pub(crate) changeset: Resolved<T, Changeset>,
    pub(crate) flush: Resolved<T, Flush>,
}

impl<T> DispatchTable<T> {
    pub fn new(
        node: Resolved<T, Node>,
        way: Resolved<T, Way>,
        relation: Resolved<T, Relation>,
        area: Resolved<T, Area>,
        changeset: Resolved<T, Changeset>,
        flush: Resolved<T, Flush>,
    ) -> Self {
        Self {
            node,
            way,
            relation,
            area,
            changeset,
            flush,
        }
    }

    /// A table that ignores every category.
    pub fn noop() -> Self {
        Self::new(
            Resolved::noop(),
            Resolved::noop(),
            Resolved::noop(),
            Resolved::noop(),
            Resolved::noop(),
            Resolved::noop(),
        )
    }

    pub fn convention(&self, category: Category) -> Convention {
        match category {
            Category::Node => self.node.via,
            Category::Way => self.way.via,
            Category::Relation => self.relation.via,
            Category::Area => self.area.via,
            Category::Changeset => self.changeset.via,
            Category::Flush => self.flush.via,
        }
    }
}

impl<T> Clone for DispatchTable<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for DispatchTable<T> {}

impl<T> core::fmt::Debug for DispatchTable<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DispatchTable")
            .field("node", &self.node.via)
            .field("way", &self.way.via)
            .field("relation", &self.relation.via)
            .field("area", &self.area.via)
            .field("changeset", &self.changeset.via)
            .field("flush", &self.flush.via)
            .finish()
    }
}

fn ignore<T, P>(_consumer: &mut T, _object: &P) {}

fn call_visit<T: Visit<P>, P>(consumer: &mut T, object: &P) {
    consumer.visit(object)
}

fn call_thunk<T: FnMut()>(consumer: &mut T, _signal: &Flush) {
    consumer()
}

fn named_node<T: NodeHandler>(consumer: &mut T, node: &Node) {
    consumer.node(node)
}

fn named_way<T: WayHandler>(consumer: &mut T, way: &Way) {
    consumer.way(way)
}

fn named_relation<T: RelationHandler>(consumer: &mut T, relation: &Relation) {
    consumer.relation(relation)
}

fn named_area<T: AreaHandler>(consumer: &mut T, area: &Area) {
    consumer.area(area)
}

fn named_changeset<T: ChangesetHandler>(consumer: &mut T, changeset: &Changeset) {
    consumer.changeset(changeset)
}

fn named_flush<T: FlushHandler>(consumer: &mut T, _signal: &Flush) {
    consumer.flush()
}

/// Tier traits, one set per category. Only [`resolve!`](crate::resolve!)
/// should need these in scope.
pub mod tiers {
    use super::*;

    macro_rules! resolution_tiers {
        (
            $payload:ty,
            $bound:ident,
            $named:ident,
            $method:ident,
            $Named:ident,
            $Callable:ident,
            $Fallback:ident
        ) => {
            pub trait $Named<T> {
                fn $method(&self) -> Resolved<T, $payload>;
            }

            pub trait $Callable<T> {
                fn $method(&self) -> Resolved<T, $payload>;
            }

            pub trait $Fallback<T> {
                fn $method(&self) -> Resolved<T, $payload>;
            }

            impl<T: $bound> $Named<T> for &&Probe<T> {
                fn $method(&self) -> Resolved<T, $payload> {
                    Resolved::new($named::<T>, Convention::Named)
                }
            }

            impl<T: Visit<$payload>> $Callable<T> for &Probe<T> {
                fn $method(&self) -> Resolved<T, $payload> {
                    Resolved::new(call_visit::<T, $payload>, Convention::Callable)
                }
            }

            impl<T> $Fallback<T> for Probe<T> {
                fn $method(&self) -> Resolved<T, $payload> {
                    Resolved::noop()
                }
            }
        };
    }

    resolution_tiers!(Node, NodeHandler, named_node, node_fn, NamedNode, CallableNode, NoopNode);
    resolution_tiers!(Way, WayHandler, named_way, way_fn, NamedWay, CallableWay, NoopWay);
    resolution_tiers!(
        Relation,
        RelationHandler,
        named_relation,
        relation_fn,
        NamedRelation,
        CallableRelation,
        NoopRelation
    );
    resolution_tiers!(Area, AreaHandler, named_area, area_fn, NamedArea, CallableArea, NoopArea);
    resolution_tiers!(
        Changeset,
        ChangesetHandler,
        named_changeset,
        changeset_fn,
        NamedChangeset,
        CallableChangeset,
        NoopChangeset
    );

    pub trait NamedFlush<T> {
        fn flush_fn(&self) -> Resolved<T, Flush>;
    }

    pub trait CallableFlush<T> {
        fn flush_fn(&self) -> Resolved<T, Flush>;
    }

    pub trait VisitFlush<T> {
        fn flush_fn(&self) -> Resolved<T, Flush>;
    }

    pub trait NoopFlush<T> {
        fn flush_fn(&self) -> Resolved<T, Flush>;
    }

    impl<T: FlushHandler> NamedFlush<T> for &&&Probe<T> {
        fn flush_fn(&self) -> Resolved<T, Flush> {
            Resolved::new(named_flush::<T>, Convention::Named)
        }
    }

    impl<T: FnMut()> CallableFlush<T> for &&Probe<T> {
        fn flush_fn(&self) -> Resolved<T, Flush> {
            Resolved::new(call_thunk::<T>, Convention::Callable)
        }
    }

    impl<T: Visit<Flush>> VisitFlush<T> for &Probe<T> {
        fn flush_fn(&self) -> Resolved<T, Flush> {
            Resolved::new(call_visit::<T, Flush>, Convention::Callable)
        }
    }

    impl<T> NoopFlush<T> for Probe<T> {
        fn flush_fn(&self) -> Resolved<T, Flush> {
            Resolved::noop()
        }
    }
}

/// Build the [`DispatchTable`] for a consumer type.
///
/// - `resolve!(MyConsumer)` resolves a named type.
/// - `resolve!(@of &value)` resolves the type of an existing value, which is
///   how closures get resolved.
///
/// The type must be concrete at the call site; inside a generic function the
/// bounds of the type parameter are all that resolution can see.
#[macro_export]
macro_rules! resolve {
    (@of $consumer:expr) => {{
        let probe = $crate::resolve::Probe::of($consumer);
        $crate::__resolve_probe!(probe)
    }};
    ($consumer:ty) => {{
        let probe = $crate::resolve::Probe::<$consumer>::new();
        $crate::__resolve_probe!(probe)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __resolve_probe {
    ($probe:ident) => {{
        #[allow(unused_imports)]
        use $crate::resolve::tiers::*;
        $crate::resolve::DispatchTable::new(
            (&&&$probe).node_fn(),
            (&&&$probe).way_fn(),
            (&&&$probe).relation_fn(),
            (&&&$probe).area_fn(),
            (&&&$probe).changeset_fn(),
            (&&&&$probe).flush_fn(),
        )
    }};
}
