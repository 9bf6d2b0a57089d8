//! Teams, controllers and the read-only world view shared by AI and humans.
//!
//! Human input and AI policies drive the simulation through the same
//! [`Order`] values and the same mutation paths, so a team can switch
//! between them without any other subsystem noticing.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, TileCoord};
use crate::structures::{Structure, StructureId};
use crate::units::{Unit, UnitId, UnitKind};

/// 1-based team identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TeamId(pub u32);

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An instruction a controller issues for one of its units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Navigate to a tile.
    Move {
        /// Unit to move.
        unit: UnitId,
        /// Destination.
        target: TileCoord,
    },
    /// Place a factory producing `kind` next to the unit.
    Build {
        /// Builder.
        unit: UnitId,
        /// What the factory will produce.
        kind: UnitKind,
    },
}

impl Order {
    /// The unit the order is for.
    #[must_use]
    pub const fn unit(&self) -> UnitId {
        match self {
            Self::Move { unit, .. } | Self::Build { unit, .. } => *unit,
        }
    }
}

/// Decision-making capability plugged into a non-human team.
///
/// Called once per AI fire with a read-only view of the whole world.
pub trait Policy: fmt::Debug + Send {
    /// Short name for logs and reports.
    fn name(&self) -> &str;

    /// Decide this interval's orders for `team`.
    fn act(&mut self, view: &WorldView<'_>, team: TeamId) -> Vec<Order>;
}

/// A participant in the match.
#[derive(Debug)]
pub struct Player {
    /// Team identifier.
    pub id: TeamId,
    /// Accumulated resources.
    pub resources: u32,
    /// Units owned by the team.
    pub roster: Vec<UnitId>,
    /// AI policy, or `None` for a human-driven team.
    pub(crate) policy: Option<Box<dyn Policy>>,
    human: bool,
}

impl Player {
    /// Create a human-driven player.
    #[must_use]
    pub fn human(id: TeamId) -> Self {
        Self {
            id,
            resources: 0,
            roster: Vec::new(),
            policy: None,
            human: true,
        }
    }

    /// Create a policy-driven player.
    #[must_use]
    pub fn ai(id: TeamId, policy: Box<dyn Policy>) -> Self {
        Self {
            id,
            resources: 0,
            roster: Vec::new(),
            policy: Some(policy),
            human: false,
        }
    }

    /// Driven by input events rather than a policy.
    #[must_use]
    pub const fn is_human(&self) -> bool {
        self.human
    }

    /// Name of the policy, if any.
    #[must_use]
    pub fn policy_name(&self) -> Option<&str> {
        self.policy.as_deref().map(|p| p.name())
    }

    /// Swap the controller. `None` hands the team to human input.
    pub fn set_policy(&mut self, policy: Option<Box<dyn Policy>>) {
        self.human = policy.is_none();
        self.policy = policy;
    }
}

/// Borrowed snapshot of the world for policies and presentation layers.
#[derive(Debug, Clone, Copy)]
pub struct WorldView<'a> {
    pub(crate) grid: &'a Grid,
    pub(crate) units: &'a BTreeMap<UnitId, Unit>,
    pub(crate) structures: &'a BTreeMap<StructureId, Structure>,
    pub(crate) players: &'a [Player],
}

impl<'a> WorldView<'a> {
    /// The board.
    #[must_use]
    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// All live units in id order.
    pub fn units(&self) -> impl Iterator<Item = &'a Unit> {
        self.units.values()
    }

    /// Look up one unit.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&'a Unit> {
        self.units.get(&id)
    }

    /// All structures in id order.
    pub fn structures(&self) -> impl Iterator<Item = &'a Structure> {
        self.structures.values()
    }

    /// Players still in the match, in join order.
    #[must_use]
    pub fn players(&self) -> &'a [Player] {
        self.players
    }

    /// Look up one player.
    #[must_use]
    pub fn player(&self, team: TeamId) -> Option<&'a Player> {
        self.players.iter().find(|p| p.id == team)
    }

    /// Units owned by `team`.
    pub fn units_of(&self, team: TeamId) -> impl Iterator<Item = &'a Unit> {
        self.units.values().filter(move |u| u.team == team)
    }

    /// Units not owned by `team`.
    pub fn enemies_of(&self, team: TeamId) -> impl Iterator<Item = &'a Unit> {
        self.units.values().filter(move |u| u.team != team)
    }

    /// Structures claimed by `team`.
    pub fn structures_claimed_by(&self, team: TeamId) -> impl Iterator<Item = &'a Structure> {
        self.structures
            .values()
            .filter(move |s| s.is_claimed_by(team))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Idle;

    impl Policy for Idle {
        fn name(&self) -> &str {
            "idle"
        }

        fn act(&mut self, _view: &WorldView<'_>, _team: TeamId) -> Vec<Order> {
            Vec::new()
        }
    }

    #[test]
    fn test_controller_swap() {
        let mut player = Player::human(TeamId(1));
        assert!(player.is_human());
        assert_eq!(player.policy_name(), None);

        player.set_policy(Some(Box::new(Idle)));
        assert!(!player.is_human());
        assert_eq!(player.policy_name(), Some("idle"));

        player.set_policy(None);
        assert!(player.is_human());
    }

    #[test]
    fn test_view_filters_by_team() {
        let grid = Grid::new(3, 3);
        let mut units = BTreeMap::new();
        units.insert(
            UnitId(1),
            Unit::new(UnitId(1), TeamId(1), UnitKind::Combatant, TileCoord::new(0, 0)),
        );
        units.insert(
            UnitId(2),
            Unit::new(UnitId(2), TeamId(2), UnitKind::Worker, TileCoord::new(2, 2)),
        );
        let structures = BTreeMap::new();
        let players = vec![Player::human(TeamId(1)), Player::ai(TeamId(2), Box::new(Idle))];
        let view = WorldView {
            grid: &grid,
            units: &units,
            structures: &structures,
            players: &players,
        };

        assert_eq!(view.units_of(TeamId(1)).count(), 1);
        assert_eq!(
            view.enemies_of(TeamId(1)).map(|u| u.id).collect::<Vec<_>>(),
            vec![UnitId(2)]
        );
        assert!(view.player(TeamId(3)).is_none());
    }
}
