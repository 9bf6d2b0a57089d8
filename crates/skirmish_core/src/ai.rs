//! Built-in scripted opponent.
//!
//! The AI only sees what [`WorldView`] exposes and only acts through
//! [`Order`]s, exactly like a human player's input handler.

use crate::config::SimConfig;
use crate::grid::TileCoord;
use crate::players::{Order, Policy, TeamId, WorldView};
use crate::units::{Unit, UnitKind};

/// Movement fires a combatant may stay blocked before it is re-routed.
pub const STALL_LIMIT: u32 = 3;

/// Build-then-rush policy.
///
/// Builders spend resources on factories whenever they can afford one;
/// every `worker_every`-th structure the team holds produces workers, the
/// rest produce combatants. The rotation is read from the board, so a
/// rejected build does not skip a slot. Idle or stalled combatants head for the closest enemy unit
/// or structure not owned by the team.
#[derive(Debug, Clone)]
pub struct SkirmishAi {
    factory_cost: u32,
    worker_every: u32,
}

impl SkirmishAi {
    /// Create a policy using the costs from `config`.
    #[must_use]
    pub fn new(config: &SimConfig) -> Self {
        Self {
            factory_cost: config.factory_cost,
            worker_every: 3,
        }
    }

    /// Kind for the team's `ordinal`-th structure, counting from 1.
    fn factory_kind(&self, ordinal: u32) -> UnitKind {
        if self.worker_every > 0 && ordinal % self.worker_every == 0 {
            UnitKind::Worker
        } else {
            UnitKind::Combatant
        }
    }

    /// Pick a free tile next to the closest target for `unit`.
    fn choose_destination(view: &WorldView<'_>, team: TeamId, unit: &Unit) -> Option<TileCoord> {
        let enemy_tiles = view.enemies_of(team).map(|u| u.tile);
        let structure_tiles = view
            .structures()
            .filter(|s| !s.is_claimed_by(team))
            .map(|s| s.tile);

        let target = enemy_tiles
            .chain(structure_tiles)
            .min_by_key(|t| (t.manhattan(unit.tile), *t))?;

        if target.is_adjacent(unit.tile) {
            return None;
        }

        let grid = view.grid();
        grid.neighbors4(target)
            .filter(|c| grid.tile(*c).is_some_and(|t| t.is_free()))
            .min_by_key(|c| (c.manhattan(unit.tile), *c))
    }
}

impl Policy for SkirmishAi {
    fn name(&self) -> &str {
        "skirmish"
    }

    fn act(&mut self, view: &WorldView<'_>, team: TeamId) -> Vec<Order> {
        let Some(player) = view.player(team) else {
            return Vec::new();
        };
        let mut budget = player.resources;
        let mut held = view.structures_claimed_by(team).count() as u32;
        let mut orders = Vec::new();

        for unit in view.units_of(team) {
            match unit.kind {
                UnitKind::CommandCenter | UnitKind::Worker => {
                    let can_place = view
                        .grid()
                        .neighbors4(unit.tile)
                        .filter_map(|c| view.grid().tile(c))
                        .any(|t| t.is_free() && t.structure.is_none());
                    if unit.is_idle()
                        && unit.timers.build_cooldown == 0
                        && budget >= self.factory_cost
                        && can_place
                    {
                        budget -= self.factory_cost;
                        held += 1;
                        orders.push(Order::Build {
                            unit: unit.id,
                            kind: self.factory_kind(held),
                        });
                    }
                }
                UnitKind::Combatant => {
                    if !unit.is_idle() && unit.blocked_steps < STALL_LIMIT {
                        continue;
                    }
                    if let Some(target) = Self::choose_destination(view, team, unit) {
                        orders.push(Order::Move {
                            unit: unit.id,
                            target,
                        });
                    }
                }
            }
        }

        orders
    }
}
