//! Strongly-typed OSM identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{OsmError, OsmResult};

/// Identifier of a node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(i64);

/// Identifier of a way.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WayId(i64);

/// Identifier of a relation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationId(i64);

/// Identifier of an area assembled from a closed way or a multipolygon relation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(i64);

/// Identifier of a changeset.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangesetId(u64);

macro_rules! impl_id_newtype {
    ($t:ty, $inner:ty, $name:literal) => {
        impl $t {
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$inner> for $t {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$t> for $inner {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        impl FromStr for $t {
            type Err = OsmError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<$inner>()
                    .map_err(|e| OsmError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

impl_id_newtype!(NodeId, i64, "NodeId");
impl_id_newtype!(WayId, i64, "WayId");
impl_id_newtype!(RelationId, i64, "RelationId");
impl_id_newtype!(AreaId, i64, "AreaId");
impl_id_newtype!(ChangesetId, u64, "ChangesetId");

/// The object an area was assembled from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AreaSource {
    Way(WayId),
    Relation(RelationId),
}

impl AreaId {
    /// Area ids are even for areas built from closed ways.
    ///
    /// The sign of the way id carries over, so negative (locally created) ways
    /// get negative area ids.
    pub fn from_way(id: WayId) -> OsmResult<Self> {
        Self::encode(id.0, 0)
    }

    /// Area ids are odd for areas built from multipolygon relations.
    pub fn from_relation(id: RelationId) -> OsmResult<Self> {
        Self::encode(id.0, 1)
    }

    fn encode(id: i64, tag: i64) -> OsmResult<Self> {
        let magnitude = id
            .checked_abs()
            .and_then(|abs| abs.checked_mul(2))
            .and_then(|doubled| doubled.checked_add(tag))
            .ok_or_else(|| OsmError::invalid_id(format!("AreaId: {id} is out of range")))?;
        Ok(Self(if id < 0 { -magnitude } else { magnitude }))
    }

    pub const fn source(self) -> AreaSource {
        let magnitude = self.0.unsigned_abs();
        // Half of a u64 always fits in an i64.
        let origin = (magnitude / 2) as i64;
        let origin = if self.0 < 0 { -origin } else { origin };
        if magnitude % 2 == 0 {
            AreaSource::Way(WayId(origin))
        } else {
            AreaSource::Relation(RelationId(origin))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_accepts_negative_ids() {
        let id: NodeId = "-17".parse().unwrap();
        assert_eq!(id.get(), -17);
        assert_eq!(id.to_string(), "-17");
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "abc".parse::<WayId>().unwrap_err();
        match err {
            OsmError::InvalidId(msg) => assert!(msg.starts_with("WayId")),
            other => panic!("Expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn changeset_ids_are_unsigned() {
        assert!("-1".parse::<ChangesetId>().is_err());
        assert_eq!("42".parse::<ChangesetId>().unwrap(), ChangesetId::new(42));
    }

    #[test]
    fn area_ids_encode_their_source() {
        assert_eq!(AreaId::from_way(WayId::new(10)).unwrap().get(), 20);
        assert_eq!(AreaId::from_relation(RelationId::new(10)).unwrap().get(), 21);
    }

    #[test]
    fn negative_ids_keep_their_sign() {
        let area = AreaId::from_relation(RelationId::new(-2)).unwrap();
        assert_eq!(area.get(), -5);
        assert_eq!(area.source(), AreaSource::Relation(RelationId::new(-2)));

        let area = AreaId::from_way(WayId::new(-3)).unwrap();
        assert_eq!(area.get(), -6);
        assert_eq!(area.source(), AreaSource::Way(WayId::new(-3)));
    }

    #[test]
    fn area_ids_reject_overflowing_sources() {
        let err = AreaId::from_way(WayId::new(i64::MAX / 2 + 1)).unwrap_err();
        match err {
            OsmError::InvalidId(msg) => assert!(msg.starts_with("AreaId")),
            other => panic!("Expected InvalidId, got {other:?}"),
        }
        assert!(AreaId::from_relation(RelationId::new(i64::MIN)).is_err());
        assert!(AreaId::from_relation(RelationId::new(i64::MAX / 2 + 1)).is_err());
        assert_eq!(
            AreaId::from_relation(RelationId::new(i64::MAX / 2)).unwrap().get(),
            i64::MAX
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the area id of a way or relation always maps back to it.
        #[test]
        fn area_source_recovers_origin(raw in -(i64::MAX / 2)..=(i64::MAX / 2)) {
            prop_assert_eq!(
                AreaId::from_way(WayId::new(raw)).unwrap().source(),
                AreaSource::Way(WayId::new(raw))
            );
            prop_assert_eq!(
                AreaId::from_relation(RelationId::new(raw)).unwrap().source(),
                AreaSource::Relation(RelationId::new(raw))
            );
        }
    }
}
