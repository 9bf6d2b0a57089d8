//! Capturable production sites.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::TileCoord;
use crate::players::TeamId;
use crate::units::UnitKind;

/// Stable structure handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StructureId(pub u32);

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{}", self.0)
    }
}

/// A factory bound to one tile.
///
/// Structures are never destroyed; they only change hands.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Structure {
    /// Handle of this structure.
    pub id: StructureId,
    /// Tile the structure is bound to.
    pub tile: TileCoord,
    /// Owning team, or `None` while unclaimed.
    pub claimant: Option<TeamId>,
    /// Kind of unit produced.
    pub produces: UnitKind,
    /// Spawn fires left before the next production attempt.
    pub spawn_countdown: u32,
}

impl Structure {
    /// Create a structure whose first production is due after `spawn_cycles` fires.
    #[must_use]
    pub fn new(
        id: StructureId,
        tile: TileCoord,
        claimant: Option<TeamId>,
        produces: UnitKind,
        spawn_cycles: u32,
    ) -> Self {
        Self {
            id,
            tile,
            claimant,
            produces,
            spawn_countdown: spawn_cycles,
        }
    }

    /// Claimed by `team`.
    #[must_use]
    pub fn is_claimed_by(&self, team: TeamId) -> bool {
        self.claimant == Some(team)
    }

    /// Hand the structure to a new team with the default production.
    pub fn capture(&mut self, team: TeamId, produces: UnitKind, spawn_cycles: u32) {
        self.claimant = Some(team);
        self.produces = produces;
        self.spawn_countdown = spawn_cycles;
    }

    /// Advance the spawn countdown by one fire.
    ///
    /// Returns true when production is due; the countdown is then re-armed
    /// whether or not the spawn succeeds.
    pub fn tick_spawn(&mut self, spawn_cycles: u32) -> bool {
        self.spawn_countdown = self.spawn_countdown.saturating_sub(1);
        if self.spawn_countdown == 0 {
            self.spawn_countdown = spawn_cycles;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_countdown_rearms() {
        let mut s = Structure::new(
            StructureId(1),
            TileCoord::new(1, 1),
            Some(TeamId(1)),
            UnitKind::Combatant,
            2,
        );
        assert!(!s.tick_spawn(2));
        assert!(s.tick_spawn(2));
        assert_eq!(s.spawn_countdown, 2);
        assert!(!s.tick_spawn(2));
    }

    #[test]
    fn test_capture_resets_production() {
        let mut s = Structure::new(
            StructureId(1),
            TileCoord::new(1, 1),
            Some(TeamId(2)),
            UnitKind::Combatant,
            3,
        );
        s.spawn_countdown = 1;
        s.capture(TeamId(1), UnitKind::CommandCenter, 3);
        assert!(s.is_claimed_by(TeamId(1)));
        assert_eq!(s.produces, UnitKind::CommandCenter);
        assert_eq!(s.spawn_countdown, 3);
    }
}
