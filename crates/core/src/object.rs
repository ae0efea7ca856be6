//! OSM payload records.
//!
//! Records are immutable facts once produced by a source: consumers receive
//! them by shared reference and never own or mutate them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, ItemType};
use crate::id::{AreaId, ChangesetId, NodeId, RelationId, WayId};
use crate::location::{Location, Tags};

/// A point feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub location: Location,
    #[serde(default)]
    pub tags: Tags,
}

/// An ordered list of node references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Way {
    pub id: WayId,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub nodes: Vec<NodeId>,
    #[serde(default)]
    pub tags: Tags,
}

impl Way {
    /// A way is closed when it has at least four node refs and ends where it starts.
    pub fn is_closed(&self) -> bool {
        self.nodes.len() >= 4 && self.nodes.first() == self.nodes.last()
    }
}

/// A member of a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub kind: ItemType,
    #[serde(rename = "ref")]
    pub reference: i64,
    #[serde(default)]
    pub role: String,
}

/// A group of members with roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub id: RelationId,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub tags: Tags,
}

/// A closed ring of locations.
pub type Ring = Vec<Location>;

/// A polygon assembled from a closed way or a multipolygon relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub id: AreaId,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub outer_rings: Vec<Ring>,
    #[serde(default)]
    pub inner_rings: Vec<Ring>,
    #[serde(default)]
    pub tags: Tags,
}

impl Area {
    pub fn is_multipolygon(&self) -> bool {
        self.outer_rings.len() > 1
    }
}

/// A group of edits uploaded together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Changeset {
    pub id: ChangesetId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub num_changes: u32,
    #[serde(default)]
    pub tags: Tags,
}

impl Changeset {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

macro_rules! impl_entity {
    ($t:ty, $id:ty, $kind:expr) => {
        impl Entity for $t {
            type Id = $id;

            const ITEM_TYPE: ItemType = $kind;

            fn id(&self) -> Self::Id {
                self.id
            }
        }
    };
}

impl_entity!(Node, NodeId, ItemType::Node);
impl_entity!(Way, WayId, ItemType::Way);
impl_entity!(Relation, RelationId, ItemType::Relation);
impl_entity!(Area, AreaId, ItemType::Area);
impl_entity!(Changeset, ChangesetId, ItemType::Changeset);

/// Any OSM record, as produced by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OsmObject {
    Node(Node),
    Way(Way),
    Relation(Relation),
    Area(Area),
    Changeset(Changeset),
}

impl OsmObject {
    pub fn item_type(&self) -> ItemType {
        match self {
            OsmObject::Node(_) => ItemType::Node,
            OsmObject::Way(_) => ItemType::Way,
            OsmObject::Relation(_) => ItemType::Relation,
            OsmObject::Area(_) => ItemType::Area,
            OsmObject::Changeset(_) => ItemType::Changeset,
        }
    }

    pub fn tags(&self) -> &Tags {
        match self {
            OsmObject::Node(n) => &n.tags,
            OsmObject::Way(w) => &w.tags,
            OsmObject::Relation(r) => &r.tags,
            OsmObject::Area(a) => &a.tags,
            OsmObject::Changeset(c) => &c.tags,
        }
    }
}

impl From<Node> for OsmObject {
    fn from(value: Node) -> Self {
        OsmObject::Node(value)
    }
}

impl From<Way> for OsmObject {
    fn from(value: Way) -> Self {
        OsmObject::Way(value)
    }
}

impl From<Relation> for OsmObject {
    fn from(value: Relation) -> Self {
        OsmObject::Relation(value)
    }
}

impl From<Area> for OsmObject {
    fn from(value: Area) -> Self {
        OsmObject::Area(value)
    }
}

impl From<Changeset> for OsmObject {
    fn from(value: Changeset) -> Self {
        OsmObject::Changeset(value)
    }
}
