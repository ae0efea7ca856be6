//! `osmflow-core` — OSM record building blocks.
//!
//! This crate contains the payload records handed to event consumers and the
//! sources that produce them. It has no knowledge of consumers or dispatch.

pub mod entity;
pub mod error;
pub mod id;
pub mod io;
pub mod location;
pub mod object;

pub use entity::{Entity, ItemType};
pub use error::{OsmError, OsmResult};
pub use id::{AreaId, AreaSource, ChangesetId, NodeId, RelationId, WayId};
pub use io::JsonLines;
pub use location::{Location, Tags};
pub use object::{Area, Changeset, Member, Node, OsmObject, Relation, Ring, Way};
