//! Unit definitions.
//!
//! Units are plain data. The simulation owns them in an id-keyed arena and
//! keeps the tile back-reference and team roster consistent.

use std::collections::VecDeque;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::TileCoord;
use crate::players::TeamId;

/// Stable unit handle. Ids are never reused within a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Closed set of unit kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitKind {
    /// Non-combat headquarters unit. Keeps its team alive, mines and builds.
    #[default]
    CommandCenter,
    /// Fights adjacent enemies and captures structures.
    Combatant,
    /// Mines and builds; does not count toward fighting strength.
    Worker,
}

impl UnitKind {
    /// Starting health for a freshly created unit.
    #[must_use]
    pub const fn starting_health(self) -> i32 {
        match self {
            Self::CommandCenter => 5,
            Self::Combatant => 3,
            Self::Worker => 2,
        }
    }

    /// Can attack and capture.
    #[must_use]
    pub const fn is_combatant(self) -> bool {
        matches!(self, Self::Combatant)
    }

    /// Counts as fighting strength for elimination and stalemate checks.
    #[must_use]
    pub const fn is_fighter(self) -> bool {
        matches!(self, Self::CommandCenter | Self::Combatant)
    }

    /// Generates resources on mining fires.
    #[must_use]
    pub const fn can_mine(self) -> bool {
        matches!(self, Self::CommandCenter | Self::Worker)
    }

    /// May place factories.
    #[must_use]
    pub const fn can_build(self) -> bool {
        matches!(self, Self::CommandCenter | Self::Worker)
    }

    /// One-letter tag used by text dumps.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::CommandCenter => 'C',
            Self::Combatant => 'F',
            Self::Worker => 'W',
        }
    }
}

/// Per-behaviour timers.
///
/// `move_ready` and `mine_ready` are armed by the scheduler and consumed by
/// the unit's own update; `build_cooldown` counts down once per mining fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct UnitTimers {
    /// A movement step may be taken this tick.
    pub move_ready: bool,
    /// A mining yield may be collected this tick.
    pub mine_ready: bool,
    /// Mining fires until the next build is allowed.
    pub build_cooldown: u32,
}

/// A mobile actor on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// Handle of this unit.
    pub id: UnitId,
    /// Owning team.
    pub team: TeamId,
    /// Kind.
    pub kind: UnitKind,
    /// Hit points. The unit is removed at the end of any tick where this is `<= 0`.
    pub health: i32,
    /// Tile the unit stands on. Mirrors the tile's occupant.
    pub tile: TileCoord,
    /// Remaining route, next step first.
    pub path: VecDeque<TileCoord>,
    /// Behaviour timers.
    pub timers: UnitTimers,
    /// Consecutive movement fires on which the next step was occupied.
    pub blocked_steps: u32,
}

impl Unit {
    /// Create a unit at full health with no route.
    #[must_use]
    pub fn new(id: UnitId, team: TeamId, kind: UnitKind, tile: TileCoord) -> Self {
        Self {
            id,
            team,
            kind,
            health: kind.starting_health(),
            tile,
            path: VecDeque::new(),
            timers: UnitTimers::default(),
            blocked_steps: 0,
        }
    }

    /// Health has dropped to zero or below.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// No route to follow.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.path.is_empty()
    }

    /// Replace the current route.
    pub fn set_path(&mut self, path: impl IntoIterator<Item = TileCoord>) {
        self.path = path.into_iter().collect();
        self.blocked_steps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_capabilities() {
        assert!(UnitKind::Combatant.is_combatant());
        assert!(!UnitKind::CommandCenter.is_combatant());
        assert!(UnitKind::CommandCenter.is_fighter());
        assert!(!UnitKind::Worker.is_fighter());
        assert!(UnitKind::Worker.can_mine());
        assert!(!UnitKind::Combatant.can_mine());
    }

    #[test]
    fn test_new_unit_is_idle_and_alive() {
        let unit = Unit::new(UnitId(1), TeamId(1), UnitKind::Worker, TileCoord::new(1, 1));
        assert!(unit.is_idle());
        assert!(!unit.is_dead());
        assert_eq!(unit.health, UnitKind::Worker.starting_health());
    }

    #[test]
    fn test_set_path_resets_stalls() {
        let mut unit = Unit::new(UnitId(1), TeamId(1), UnitKind::Combatant, TileCoord::new(0, 0));
        unit.blocked_steps = 4;
        unit.set_path([TileCoord::new(0, 1), TileCoord::new(0, 2)]);
        assert_eq!(unit.path.len(), 2);
        assert_eq!(unit.blocked_steps, 0);
        unit.set_path(Vec::<TileCoord>::new());
        assert!(unit.is_idle());
    }
}
