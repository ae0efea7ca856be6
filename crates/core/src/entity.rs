//! Entity trait: identity of an OSM record across versions.

use serde::{Deserialize, Serialize};

/// Kind of OSM record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Node,
    Way,
    Relation,
    Area,
    Changeset,
}

impl ItemType {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Node => "node",
            ItemType::Way => "way",
            ItemType::Relation => "relation",
            ItemType::Area => "area",
            ItemType::Changeset => "changeset",
        }
    }
}

impl core::fmt::Display for ItemType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed record identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Kind of record this type represents.
    const ITEM_TYPE: ItemType;

    /// Returns the record identifier.
    fn id(&self) -> Self::Id;
}
