//! Core simulation loop.
//!
//! [`Simulation`] owns the whole world (board, unit and structure arenas,
//! players, seeded random source, subsystem timers) and advances it one
//! tick per [`Simulation::tick`] call.
//!
//! # Determinism
//!
//! - All randomness comes from a `ChaCha8Rng` seeded from [`SimConfig::seed`]
//! - Arenas are `BTreeMap`s keyed by never-reused ids, so iteration order is fixed
//! - Probabilities are fixed-point
//! - Same seed, same clock values and same commands give the same state hash
//!
//! # Example
//!
//! ```
//! use skirmish_core::config::SimConfig;
//! use skirmish_core::grid::{Grid, TileCoord};
//! use skirmish_core::simulation::Simulation;
//! use skirmish_core::units::UnitKind;
//!
//! let mut sim = Simulation::new(SimConfig::with_seed(7), Grid::new(8, 8)).unwrap();
//! let red = sim.add_player(None).unwrap();
//! let blue = sim.add_player(None).unwrap();
//! let scout = sim.spawn_unit(red, UnitKind::Combatant, TileCoord::new(1, 1)).unwrap();
//! sim.spawn_unit(blue, UnitKind::CommandCenter, TileCoord::new(6, 6)).unwrap();
//!
//! sim.issue_move_order(scout, TileCoord::new(1, 4)).unwrap();
//! for now in (5..=300).step_by(5) {
//!     sim.tick(now);
//! }
//! assert_eq!(sim.unit(scout).unwrap().tile, TileCoord::new(1, 4));
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::combat::{capture_adjacent, resolve_attack, AttackEvent, CaptureEvent};
use crate::config::SimConfig;
use crate::error::{GameError, Result};
use crate::grid::{Grid, TileCoord, TileState};
use crate::pathfinding::find_path;
use crate::players::{Order, Player, Policy, TeamId, WorldView};
use crate::scheduler::{Scheduler, TimerFires};
use crate::structures::{Structure, StructureId};
use crate::units::{Unit, UnitId, UnitKind};
use crate::victory::{decide, standing, MatchStatus, TeamStanding};

/// A unit stepping from one tile to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveEvent {
    /// Moving unit.
    pub unit: UnitId,
    /// Tile left.
    pub from: TileCoord,
    /// Tile entered.
    pub to: TileCoord,
}

/// Events generated during a simulation tick.
///
/// Presentation layers and tests read these instead of diffing state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickEvents {
    /// Timers that fired this tick.
    pub fires: TimerFires,
    /// Units created by structures.
    pub spawned: Vec<UnitId>,
    /// Structures whose production was due but whose tile was occupied.
    pub spawns_skipped: Vec<StructureId>,
    /// Orders issued by AI policies and accepted.
    pub orders_applied: usize,
    /// Attack rolls.
    pub attacks: Vec<AttackEvent>,
    /// Structures changing hands.
    pub captures: Vec<CaptureEvent>,
    /// Resources mined, summed over all teams.
    pub mined: u32,
    /// Successful path steps.
    pub moves: Vec<MoveEvent>,
    /// Path steps refused because the next tile was occupied.
    pub stalls: Vec<UnitId>,
    /// Units removed after reaching zero health.
    pub deaths: Vec<UnitId>,
    /// Teams removed this tick.
    pub eliminated: Vec<TeamId>,
    /// Match state after the tick.
    pub status: MatchStatus,
}

/// The core game simulation.
///
/// # System Execution Order
///
/// Each tick, systems run in this order so later systems see the effects
/// of earlier ones:
/// 1. **Spawn** - claimed structures produce units (spawn timer)
/// 2. **AI** - non-human policies issue orders (AI timer)
/// 3. **Units** - per unit, in id order: combat and capture (every tick),
///    mining (mining timer), one path step (movement timer)
/// 4. **Cleanup** - dead units are collected, then removed
/// 5. **Termination** - elimination pass, then outcome
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    grid: Grid,
    units: BTreeMap<UnitId, Unit>,
    structures: BTreeMap<StructureId, Structure>,
    players: Vec<Player>,
    rng: ChaCha8Rng,
    scheduler: Scheduler,
    next_unit_id: u32,
    next_structure_id: u32,
    next_team_id: u32,
    tick: u64,
    status: MatchStatus,
    selected: Option<UnitId>,
}

impl Simulation {
    /// Create an empty simulation on `grid`, with timers primed at clock 0.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: SimConfig, grid: Grid) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            scheduler: Scheduler::new(&config, 0),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            grid,
            units: BTreeMap::new(),
            structures: BTreeMap::new(),
            players: Vec::new(),
            next_unit_id: 1,
            next_structure_id: 1,
            next_team_id: 1,
            tick: 0,
            status: MatchStatus::Running,
            selected: None,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Number of completed ticks.
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Match state after the last tick.
    #[must_use]
    pub const fn status(&self) -> MatchStatus {
        self.status
    }

    /// The board.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Mutable board access for map setup.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// All live units in id order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    /// Look up a unit.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Mutable unit access for scenario setup and tests.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// All structures in id order.
    pub fn structures(&self) -> impl Iterator<Item = &Structure> {
        self.structures.values()
    }

    /// Look up a structure.
    #[must_use]
    pub fn structure(&self, id: StructureId) -> Option<&Structure> {
        self.structures.get(&id)
    }

    /// Players still in the match.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player.
    #[must_use]
    pub fn player(&self, team: TeamId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == team)
    }

    /// Mutable player access for scenario setup and tests.
    pub fn player_mut(&mut self, team: TeamId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == team)
    }

    /// Currently selected human unit.
    #[must_use]
    pub const fn selected(&self) -> Option<UnitId> {
        self.selected
    }

    /// Read-only snapshot for policies and renderers.
    #[must_use]
    pub fn view(&self) -> WorldView<'_> {
        WorldView {
            grid: &self.grid,
            units: &self.units,
            structures: &self.structures,
            players: &self.players,
        }
    }

    // ------------------------------------------------------------------
    // Setup
    // ------------------------------------------------------------------

    /// Add a player. `None` makes it human-driven.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::PlayerLimitExceeded`] once the cap is reached.
    /// Callers treat this as a fatal setup error.
    pub fn add_player(&mut self, policy: Option<Box<dyn Policy>>) -> Result<TeamId> {
        if self.players.len() >= self.config.player_limit {
            return Err(GameError::PlayerLimitExceeded {
                limit: self.config.player_limit,
            });
        }
        let id = TeamId(self.next_team_id);
        self.next_team_id += 1;
        let player = match policy {
            Some(policy) => Player::ai(id, policy),
            None => Player::human(id),
        };
        tracing::debug!(team = %id, policy = ?player.policy_name(), "Player joined");
        self.players.push(player);
        Ok(id)
    }

    /// Swap a team between human input and a policy.
    pub fn set_policy(&mut self, team: TeamId, policy: Option<Box<dyn Policy>>) -> Result<()> {
        let player = self
            .player_mut(team)
            .ok_or(GameError::TeamNotFound(team))?;
        player.set_policy(policy);
        Ok(())
    }

    /// Place a new unit for `team` on a free tile.
    pub fn spawn_unit(&mut self, team: TeamId, kind: UnitKind, at: TileCoord) -> Result<UnitId> {
        let tile = self.grid.require(at)?;
        if !tile.state.is_traversable() {
            return Err(GameError::TileUnavailable {
                coord: at,
                reason: "blocked terrain",
            });
        }
        if tile.occupant.is_some() {
            return Err(GameError::TileUnavailable {
                coord: at,
                reason: "occupied",
            });
        }
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id == team)
            .ok_or(GameError::TeamNotFound(team))?;

        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        player.roster.push(id);
        self.grid.set_occupant(at, Some(id));
        self.units.insert(id, Unit::new(id, team, kind, at));
        Ok(id)
    }

    /// Bind a new structure to a tile.
    pub fn add_structure(
        &mut self,
        at: TileCoord,
        claimant: Option<TeamId>,
        produces: UnitKind,
    ) -> Result<StructureId> {
        let tile = self.grid.require(at)?;
        if !tile.state.is_traversable() {
            return Err(GameError::TileUnavailable {
                coord: at,
                reason: "blocked terrain",
            });
        }
        if tile.structure.is_some() {
            return Err(GameError::TileUnavailable {
                coord: at,
                reason: "already has a structure",
            });
        }
        if let Some(team) = claimant {
            if self.player(team).is_none() {
                return Err(GameError::TeamNotFound(team));
            }
        }

        let id = StructureId(self.next_structure_id);
        self.next_structure_id += 1;
        self.grid.set_structure(at, Some(id));
        self.structures.insert(
            id,
            Structure::new(id, at, claimant, produces, self.config.spawn_cycles),
        );
        Ok(id)
    }

    // ------------------------------------------------------------------
    // Orders
    // ------------------------------------------------------------------

    /// Route a unit toward `target`.
    ///
    /// Returns the number of steps in the new route; zero means the unit
    /// stays put (already there, or no route exists right now).
    ///
    /// # Errors
    ///
    /// Invalid targets (off the board or blocked terrain) are logged and
    /// rejected without touching the unit's current route.
    pub fn issue_move_order(&mut self, unit: UnitId, target: TileCoord) -> Result<usize> {
        let Some(start) = self.units.get(&unit).map(|u| u.tile) else {
            return Err(GameError::UnitNotFound(unit));
        };
        if !self.grid.in_bounds(target) {
            tracing::warn!(unit = %unit, ?target, "Ignoring move order outside the board");
            return Err(GameError::OutOfBounds(target));
        }
        if !self.grid.is_traversable(target) {
            tracing::warn!(unit = %unit, ?target, "Ignoring move order onto blocked terrain");
            return Err(GameError::TileUnavailable {
                coord: target,
                reason: "blocked terrain",
            });
        }

        let path = find_path(&self.grid, start, target);
        let steps = path.len();

        if self.selected == Some(unit) {
            self.grid.clear_path_markers();
            self.grid.mark_path(&path);
        }
        if let Some(u) = self.units.get_mut(&unit) {
            u.set_path(path);
        }
        tracing::debug!(unit = %unit, ?start, ?target, steps, "Move order");
        Ok(steps)
    }

    /// Have a builder place a factory on the first free neighbouring tile.
    pub fn build_structure(&mut self, unit: UnitId, kind: UnitKind) -> Result<StructureId> {
        let builder = self.units.get(&unit).ok_or(GameError::UnitNotFound(unit))?;
        if !builder.kind.can_build() {
            return Err(GameError::NotCapable {
                unit,
                action: "build",
            });
        }
        if builder.timers.build_cooldown > 0 {
            return Err(GameError::BuildCoolingDown(unit));
        }
        let team = builder.team;
        let origin = builder.tile;

        let available = self
            .player(team)
            .map(|p| p.resources)
            .ok_or(GameError::TeamNotFound(team))?;
        if available < self.config.factory_cost {
            return Err(GameError::InsufficientResources {
                required: self.config.factory_cost,
                available,
            });
        }

        let site = self
            .grid
            .neighbors4(origin)
            .find(|c| {
                self.grid
                    .tile(*c)
                    .is_some_and(|t| t.is_free() && t.structure.is_none())
            })
            .ok_or(GameError::TileUnavailable {
                coord: origin,
                reason: "no free neighbouring tile",
            })?;

        let id = self.add_structure(site, Some(team), kind)?;
        let cost = self.config.factory_cost;
        if let Some(player) = self.player_mut(team) {
            player.resources -= cost;
        }
        let cooldown = self.config.build_cooldown;
        if let Some(builder) = self.units.get_mut(&unit) {
            builder.timers.build_cooldown = cooldown;
        }
        tracing::info!(unit = %unit, team = %team, structure = %id, ?kind, ?site, "Factory built");
        Ok(id)
    }

    /// Apply an order on behalf of `team`.
    pub fn apply_order(&mut self, team: TeamId, order: Order) -> Result<()> {
        let unit = order.unit();
        let owner = self
            .units
            .get(&unit)
            .map(|u| u.team)
            .ok_or(GameError::UnitNotFound(unit))?;
        if owner != team {
            return Err(GameError::NotOwner { unit, team });
        }
        match order {
            Order::Move { unit, target } => self.issue_move_order(unit, target).map(|_| ()),
            Order::Build { unit, kind } => self.build_structure(unit, kind).map(|_| ()),
        }
    }

    /// Make `unit` the target of navigation clicks. `None` clears it.
    pub(crate) fn select(&mut self, unit: Option<UnitId>) {
        if self.selected != unit {
            self.grid.clear_path_markers();
        }
        self.selected = unit;
        if let Some(path) = unit.and_then(|id| self.units.get(&id)).map(|u| u.path.clone()) {
            self.grid.mark_path(&path);
        }
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance the simulation using the host clock value `now` (ms).
    ///
    /// Once the match has ended further calls do nothing and return the
    /// final status.
    pub fn tick(&mut self, now: u64) -> TickEvents {
        let fires = self.scheduler.advance(now);
        self.step(fires)
    }

    /// Advance one tick with explicit timer fires, bypassing the clock.
    pub fn step(&mut self, fires: TimerFires) -> TickEvents {
        let mut events = TickEvents {
            fires,
            status: self.status,
            ..TickEvents::default()
        };
        if self.status.is_terminal() {
            return events;
        }

        // 1. Spawn System
        if fires.spawn {
            self.run_spawn_system(&mut events);
        }

        // 2. AI System
        if fires.ai {
            self.run_ai_system(&mut events);
        }

        // 3. Unit System - combat every tick, mining and movement when due
        self.run_unit_system(fires, &mut events);

        // 4. Cleanup System
        events.deaths = self.run_cleanup_system();

        // 5. Termination
        events.eliminated = self.run_elimination_system();
        self.status = self.evaluate_status();
        events.status = self.status;

        self.tick += 1;

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.tick, state_hash = hash, "Simulation state hash");
        }

        #[cfg(feature = "debug-validation")]
        if let Err(err) = self.check_invariants() {
            tracing::error!(tick = self.tick, %err, "Invariant check failed");
        }

        if self.status.is_terminal() {
            tracing::info!(tick = self.tick, status = %self.status, "Match finished");
        }

        events
    }

    /// Claimed structures advance their countdown and produce on their own tile.
    fn run_spawn_system(&mut self, events: &mut TickEvents) {
        let cycles = self.config.spawn_cycles;
        let due: Vec<(StructureId, TeamId, UnitKind, TileCoord)> = self
            .structures
            .values_mut()
            .filter_map(|s| {
                let team = s.claimant?;
                s.tick_spawn(cycles).then_some((s.id, team, s.produces, s.tile))
            })
            .collect();

        for (structure, team, kind, tile) in due {
            match self.spawn_unit(team, kind, tile) {
                Ok(unit) => {
                    tracing::debug!(structure = %structure, unit = %unit, ?kind, "Unit spawned");
                    events.spawned.push(unit);
                }
                Err(err) => {
                    tracing::debug!(structure = %structure, %err, "Spawn skipped");
                    events.spawns_skipped.push(structure);
                }
            }
        }
    }

    /// Consult every non-human policy once and apply its orders.
    fn run_ai_system(&mut self, events: &mut TickEvents) {
        for index in 0..self.players.len() {
            if self.players[index].is_human() {
                continue;
            }
            let team = self.players[index].id;
            let Some(mut policy) = self.players[index].policy.take() else {
                continue;
            };
            let orders = policy.act(&self.view(), team);
            self.players[index].policy = Some(policy);

            for order in orders {
                match self.apply_order(team, order) {
                    Ok(()) => events.orders_applied += 1,
                    Err(err) => tracing::debug!(team = %team, ?order, %err, "Order rejected"),
                }
            }
        }
    }

    /// Per-unit combat, capture, mining and movement.
    fn run_unit_system(&mut self, fires: TimerFires, events: &mut TickEvents) {
        let ids: Vec<UnitId> = self.units.keys().copied().collect();
        let mut captured: BTreeSet<StructureId> = BTreeSet::new();

        for id in ids {
            let Some(unit) = self.units.get_mut(&id) else {
                continue;
            };
            if fires.movement {
                unit.timers.move_ready = true;
            }
            if fires.mine {
                unit.timers.mine_ready = true;
            }

            if let Some(attack) =
                resolve_attack(&mut self.rng, &self.config, &self.grid, &mut self.units, id)
            {
                events.attacks.push(attack);
            }
            if let Some(unit) = self.units.get(&id) {
                let mut taken = capture_adjacent(
                    &self.config,
                    &mut self.grid,
                    &mut self.structures,
                    unit,
                    &mut captured,
                );
                events.captures.append(&mut taken);
            }

            events.mined += self.mine(id);

            match self.advance(id) {
                Some(Ok(step)) => events.moves.push(step),
                Some(Err(())) => events.stalls.push(id),
                None => {}
            }
        }
    }

    /// Consume the mining flag; idle miners add their yield to the team.
    fn mine(&mut self, id: UnitId) -> u32 {
        let Some(unit) = self.units.get_mut(&id) else {
            return 0;
        };
        if !std::mem::take(&mut unit.timers.mine_ready) {
            return 0;
        }
        unit.timers.build_cooldown = unit.timers.build_cooldown.saturating_sub(1);
        if !unit.kind.can_mine() || !unit.is_idle() {
            return 0;
        }

        let team = unit.team;
        let amount = self.config.mining_yield;
        match self.players.iter_mut().find(|p| p.id == team) {
            Some(player) => {
                player.resources = player.resources.saturating_add(amount);
                amount
            }
            None => {
                tracing::error!(unit = %id, team = %team, "Mining unit belongs to no player");
                0
            }
        }
    }

    /// Consume the movement flag and try one path step.
    ///
    /// `Some(Err(()))` means the next tile was occupied and the unit waits.
    fn advance(&mut self, id: UnitId) -> Option<std::result::Result<MoveEvent, ()>> {
        let unit = self.units.get_mut(&id)?;
        if !std::mem::take(&mut unit.timers.move_ready) {
            return None;
        }
        let next = *unit.path.front()?;

        if !self.grid.tile(next).is_some_and(|t| t.is_free()) {
            unit.blocked_steps += 1;
            return Some(Err(()));
        }

        let from = unit.tile;
        self.grid.set_occupant(from, None);
        self.grid.set_occupant(next, Some(id));
        unit.tile = next;
        unit.path.pop_front();
        unit.blocked_steps = 0;

        if self.grid.tile(next).map(|t| t.state) == Some(TileState::PathMarker) {
            self.grid.set_state(next, TileState::Empty);
        }

        Some(Ok(MoveEvent {
            unit: id,
            from,
            to: next,
        }))
    }

    /// Remove units at zero health, collecting them before removing any.
    fn run_cleanup_system(&mut self) -> Vec<UnitId> {
        let dead: Vec<UnitId> = self
            .units
            .values()
            .filter(|u| u.is_dead())
            .map(|u| u.id)
            .collect();

        for &id in &dead {
            self.destroy_unit(id);
        }
        dead
    }

    /// Clear every back-reference to a unit, then drop it.
    fn destroy_unit(&mut self, id: UnitId) {
        let Some((team, tile)) = self.units.get(&id).map(|u| (u.team, u.tile)) else {
            return;
        };

        if self.selected == Some(id) {
            self.select(None);
        }

        match self.players.iter_mut().find(|p| p.id == team) {
            Some(player) => match player.roster.iter().position(|u| *u == id) {
                Some(index) => {
                    player.roster.remove(index);
                }
                None => {
                    tracing::error!(unit = %id, team = %team, "Dead unit not found in its team roster");
                }
            },
            None => {
                tracing::error!(unit = %id, team = %team, "Dead unit belongs to no player");
            }
        }

        if self.grid.occupant(tile) == Some(id) {
            self.grid.set_occupant(tile, None);
        }
        self.units.remove(&id);
    }

    /// Remove teams that can no longer play, with their units and claims.
    fn run_elimination_system(&mut self) -> Vec<TeamId> {
        let eliminated: Vec<TeamId> = self
            .players
            .iter()
            .map(|p| standing(p, &self.units, &self.structures))
            .filter(TeamStanding::is_eliminated)
            .map(|s| s.team)
            .collect();

        for &team in &eliminated {
            let mut abandoned: Vec<UnitId> = self
                .player(team)
                .map(|p| p.roster.clone())
                .unwrap_or_default();
            // Orphans carry the team but are missing from its roster.
            let orphans: Vec<UnitId> = self
                .units
                .values()
                .filter(|u| u.team == team && !abandoned.contains(&u.id))
                .map(|u| u.id)
                .collect();
            abandoned.extend(orphans);
            for unit in abandoned {
                self.destroy_unit(unit);
            }
            for structure in self.structures.values_mut() {
                if structure.is_claimed_by(team) {
                    structure.claimant = None;
                }
            }
            self.players.retain(|p| p.id != team);
            tracing::info!(team = %team, tick = self.tick, "Team eliminated");
        }
        eliminated
    }

    fn evaluate_status(&self) -> MatchStatus {
        let survivors: Vec<TeamStanding> = self
            .players
            .iter()
            .map(|p| standing(p, &self.units, &self.structures))
            .collect();
        decide(&survivors)
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Verify the occupancy and roster back-references.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] describing the first violation.
    pub fn check_invariants(&self) -> Result<()> {
        for unit in self.units.values() {
            if self.grid.occupant(unit.tile) != Some(unit.id) {
                return Err(GameError::InvalidState(format!(
                    "unit {} thinks it is on {:?} but the tile holds {:?}",
                    unit.id,
                    unit.tile,
                    self.grid.occupant(unit.tile)
                )));
            }
            let listed = self
                .player(unit.team)
                .is_some_and(|p| p.roster.contains(&unit.id));
            if !listed {
                return Err(GameError::InvalidState(format!(
                    "unit {} is missing from team {} roster",
                    unit.id, unit.team
                )));
            }
        }
        for tile in self.grid.tiles() {
            if let Some(id) = tile.occupant {
                if self.units.get(&id).map(|u| u.tile) != Some(tile.coord) {
                    return Err(GameError::InvalidState(format!(
                        "tile {:?} references unit {id} which is elsewhere or gone",
                        tile.coord
                    )));
                }
            }
        }
        Ok(())
    }

    /// Hash of the full simulation state, for determinism checks.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.tick.hash(&mut hasher);
        self.status.hash(&mut hasher);
        self.grid.hash(&mut hasher);

        self.units.len().hash(&mut hasher);
        for unit in self.units.values() {
            unit.hash(&mut hasher);
        }

        self.structures.len().hash(&mut hasher);
        for structure in self.structures.values() {
            structure.hash(&mut hasher);
        }

        self.players.len().hash(&mut hasher);
        for player in &self.players {
            player.id.hash(&mut hasher);
            player.resources.hash(&mut hasher);
            player.roster.hash(&mut hasher);
        }

        hasher.finish()
    }

    /// Log every player's resources.
    pub fn dump_resources(&self) {
        for player in &self.players {
            tracing::info!(
                team = %player.id,
                resources = player.resources,
                units = player.roster.len(),
                "Player {} has {} resources.",
                player.id,
                player.resources
            );
        }
    }
}
