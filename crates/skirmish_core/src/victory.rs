//! Elimination and match-outcome rules.
//!
//! Evaluation happens in two passes every tick, in this order:
//!
//! 1. **Elimination** - a team with no command unit and no combatant, or
//!    with no units at all and no claimed structure, leaves the match.
//! 2. **Outcome** - no teams left is a stalemate, one team left wins, and
//!    with two or more left the match is a stalemate only if none of them
//!    has a command unit or combatant.
//!
//! The outcome check cannot see structures, and after the elimination pass
//! every surviving team necessarily has a fighter, so the multi-team
//! stalemate branch is only reachable if elimination is skipped. Both rules
//! are kept as-is.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::players::{Player, TeamId};
use crate::structures::{Structure, StructureId};
use crate::units::{Unit, UnitId};

/// State of the match after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Keep playing.
    #[default]
    Running,
    /// No team can win.
    Stalemate,
    /// The given team is the last one standing.
    Victory(TeamId),
}

impl MatchStatus {
    /// The match has ended.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Harness result code: `0` for a stalemate, the winner's id for a victory.
    #[must_use]
    pub const fn result_code(&self) -> Option<u32> {
        match self {
            Self::Running => None,
            Self::Stalemate => Some(0),
            Self::Victory(team) => Some(team.0),
        }
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => write!(f, "running"),
            Self::Stalemate => write!(f, "stalemate"),
            Self::Victory(team) => write!(f, "team {team} wins"),
        }
    }
}

/// What a team still has on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamStanding {
    /// Team.
    pub team: TeamId,
    /// Owns at least one command unit or combatant.
    pub has_fighters: bool,
    /// Units in the roster.
    pub units: usize,
    /// Structures claimed.
    pub structures: usize,
}

impl TeamStanding {
    /// Elimination predicate.
    #[must_use]
    pub const fn is_eliminated(&self) -> bool {
        !self.has_fighters || (self.units == 0 && self.structures == 0)
    }
}

/// Summarise one team from its roster and the structure collection.
#[must_use]
pub fn standing(
    player: &Player,
    units: &BTreeMap<UnitId, Unit>,
    structures: &BTreeMap<StructureId, Structure>,
) -> TeamStanding {
    let has_fighters = player
        .roster
        .iter()
        .filter_map(|id| units.get(id))
        .any(|u| u.kind.is_fighter());
    TeamStanding {
        team: player.id,
        has_fighters,
        units: player.roster.len(),
        structures: structures
            .values()
            .filter(|s| s.is_claimed_by(player.id))
            .count(),
    }
}

/// Outcome for the teams that survived the elimination pass.
#[must_use]
pub fn decide(survivors: &[TeamStanding]) -> MatchStatus {
    match survivors {
        [] => MatchStatus::Stalemate,
        [only] => MatchStatus::Victory(only.team),
        many => {
            if many.iter().any(|s| s.has_fighters) {
                MatchStatus::Running
            } else {
                MatchStatus::Stalemate
            }
        }
    }
}
