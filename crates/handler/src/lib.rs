//! Runtime-bound event handlers over statically-typed consumers.
//!
//! - [`handler`]: the traits a consumer implements (named or callable style).
//! - [`resolve`]: compile-time choice of calling convention per category.
//! - [`dynamic`]: [`DynamicHandler`], the type-erased owner of one consumer.
//! - [`runner`]: drives records from a source through a handler.

pub mod dynamic;
pub mod handler;
pub mod resolve;
pub mod runner;

pub use dynamic::DynamicHandler;
pub use handler::{
    AreaHandler, ChangesetHandler, Flush, FlushHandler, NodeHandler, RelationHandler, Visit,
    WayHandler,
};
pub use resolve::{Category, Convention, DispatchTable};
pub use runner::{ApplyStats, Runner, RunnerConfig, apply};
