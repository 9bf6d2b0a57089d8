//! Discrete input commands.
//!
//! Presentation layers translate key presses and clicks into [`Command`]s;
//! the simulation applies them through the same mutation paths AI orders use.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::grid::TileCoord;
use crate::players::{Order, Player};
use crate::simulation::Simulation;
use crate::units::{UnitId, UnitKind};

/// An input event for the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Stop the host loop.
    Quit,
    /// Log every player's resources.
    DumpResources,
    /// Have the acting unit build a factory producing the given kind.
    Build(UnitKind),
    /// Select the human unit standing on a tile.
    Select(TileCoord),
    /// Route the acting unit to a tile.
    Navigate(TileCoord),
    /// Select if the tile holds a human unit, otherwise navigate there.
    Click(TileCoord),
}

impl Simulation {
    /// Apply an input command.
    ///
    /// `origin` is the acting unit; when `None` the current selection is
    /// used. Only units of human teams can be ordered, and a build made
    /// through the selection clears it. `target` overrides the coordinate
    /// carried by `Select`, `Navigate` and `Click`. Invalid input is logged
    /// and ignored.
    ///
    /// Returns `false` only for [`Command::Quit`].
    pub fn handle_command(
        &mut self,
        command: Command,
        origin: Option<UnitId>,
        target: Option<TileCoord>,
    ) -> bool {
        match command {
            Command::Quit => {
                tracing::info!("Quit requested");
                return false;
            }
            Command::DumpResources => self.dump_resources(),
            Command::Build(kind) => {
                let Some(unit) = origin.or(self.selected()) else {
                    tracing::warn!(?kind, "Build command without a unit");
                    return true;
                };
                if let Err(err) = self.human_order(Order::Build { unit, kind }) {
                    tracing::warn!(unit = %unit, ?kind, %err, "Build command ignored");
                }
                if origin.is_none() {
                    self.select(None);
                }
            }
            Command::Select(coord) => {
                self.select_at(target.unwrap_or(coord));
            }
            Command::Navigate(coord) => {
                self.navigate(origin, target.unwrap_or(coord));
            }
            Command::Click(coord) => {
                let coord = target.unwrap_or(coord);
                if self.human_unit_at(coord).is_some() {
                    self.select_at(coord);
                } else {
                    self.navigate(origin, coord);
                }
            }
        }
        true
    }

    fn human_unit_at(&self, coord: TileCoord) -> Option<UnitId> {
        let id = self.grid().occupant(coord)?;
        let team = self.unit(id)?.team;
        self.player(team)
            .is_some_and(|p| p.is_human())
            .then_some(id)
    }

    fn select_at(&mut self, coord: TileCoord) {
        match self.human_unit_at(coord) {
            Some(unit) => {
                tracing::debug!(unit = %unit, ?coord, "Unit selected");
                self.select(Some(unit));
            }
            None => {
                tracing::warn!(?coord, "Nothing selectable on tile");
            }
        }
    }

    fn navigate(&mut self, origin: Option<UnitId>, coord: TileCoord) {
        let Some(unit) = origin.or(self.selected()) else {
            tracing::debug!(?coord, "Click with no unit selected");
            return;
        };
        match self.human_order(Order::Move {
            unit,
            target: coord,
        }) {
            // Logged by the move order itself.
            Ok(()) | Err(GameError::OutOfBounds(_) | GameError::TileUnavailable { .. }) => {}
            Err(err) => tracing::warn!(unit = %unit, ?coord, %err, "Navigate command ignored"),
        }
    }

    /// Apply an order on behalf of the human team owning its unit.
    fn human_order(&mut self, order: Order) -> Result<()> {
        let unit = order.unit();
        let team = self
            .unit(unit)
            .map(|u| u.team)
            .ok_or(GameError::UnitNotFound(unit))?;
        if !self.player(team).is_some_and(Player::is_human) {
            return Err(GameError::NotHumanControlled(unit));
        }
        self.apply_order(team, order)
    }
}
