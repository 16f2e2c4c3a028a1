use glam::{IVec3, Vec3};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::WorldError;

/// Integer grid coordinate of one block cell.
///
/// Its textual key is `"x,y,z"`: decimal integers, comma separated, no
/// whitespace. Logs and world snapshots use exactly this form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockCoord(pub IVec3);

impl BlockCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self(IVec3::new(x, y, z))
    }

    /// Cell containing a world-space point.
    pub fn containing(pos: Vec3) -> Self {
        Self(pos.floor().as_ivec3())
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn y(&self) -> i32 {
        self.0.y
    }

    pub fn z(&self) -> i32 {
        self.0.z
    }

    pub fn key(&self) -> String {
        self.to_string()
    }

    /// True when every axis lies in `[0, size)`.
    pub fn within(&self, size: i32) -> bool {
        self.0.cmpge(IVec3::ZERO).all() && self.0.cmplt(IVec3::splat(size)).all()
    }
}

impl fmt::Display for BlockCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0.x, self.0.y, self.0.z)
    }
}

impl FromStr for BlockCoord {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || WorldError::InvalidCoordKey(s.to_string());
        let mut parts = s.split(',');
        let mut next = || -> Result<i32, WorldError> {
            let part = parts.next().ok_or_else(invalid)?;
            if part.is_empty() || part.trim() != part {
                return Err(invalid());
            }
            part.parse().map_err(|_| invalid())
        };
        let (x, y, z) = (next()?, next()?, next()?);
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self::new(x, y, z))
    }
}

impl Serialize for BlockCoord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockCoord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let key = String::deserialize(deserializer)?;
        key.parse().map_err(serde::de::Error::custom)
    }
}

impl PartialOrd for BlockCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BlockCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.0.x, self.0.y, self.0.z).cmp(&(other.0.x, other.0.y, other.0.z))
    }
}

impl From<IVec3> for BlockCoord {
    fn from(v: IVec3) -> Self {
        Self(v)
    }
}

impl From<(i32, i32, i32)> for BlockCoord {
    fn from((x, y, z): (i32, i32, i32)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<BlockCoord> for IVec3 {
    fn from(coord: BlockCoord) -> Self {
        coord.0
    }
}
