//! Content flags for collision filtering.
//!
//! Every body in the collision world carries a set of content flags. Queries
//! pass a mask and only bodies whose contents intersect the mask are
//! considered. The movement core never interprets a mask beyond the few
//! designated constants below; everything else is passed through unchanged.

use serde::{Deserialize, Serialize};

/// Content flags describe what type of volume something is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Empty space - nothing here.
    pub const EMPTY: Self = Self(0);

    /// Solid world geometry - walls, floors, props.
    pub const SOLID: Self = Self(1 << 0);

    /// Player clip - blocks actors but nothing else.
    pub const PLAYER_CLIP: Self = Self(1 << 1);

    /// Water volume - the host switches actors to the underwater regime.
    pub const WATER: Self = Self(1 << 2);

    /// Climbable surface or volume.
    pub const LADDER: Self = Self(1 << 3);

    /// Trigger volume - never blocks, ignored by overlap queries.
    pub const TRIGGER: Self = Self(1 << 4);

    /// The ground layer: used for every floor, wall, step and clearance query.
    pub const GROUND: Self = Self(Self::SOLID.0 | Self::PLAYER_CLIP.0);

    /// Mask used when looking for ladders (ladder volumes need not be solid).
    pub const LADDER_QUERY: Self = Self(Self::GROUND.0 | Self::LADDER.0);

    /// Check if these flags contain a specific flag.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Check if no flag is set.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Remove flags from this set.
    #[inline]
    pub fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for ContentFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for ContentFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
