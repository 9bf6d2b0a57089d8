//! Simulation tunables.
//!
//! Every magic number the simulation depends on is a named constant here and
//! a field of [`SimConfig`], so harnesses can override them without touching
//! subsystem code.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::math::{fixed_serde, Fixed};
use crate::units::UnitKind;

/// Size of a tile in screen pixels, used by presentation layers to map
/// pointer coordinates to tiles.
pub const TILE_SIZE: u32 = 25;

/// Maximum number of players in one match.
pub const PLAYER_LIMIT: usize = 15;

/// Mining timer interval in milliseconds.
pub const MINE_INTERVAL_MS: u64 = 500;

/// Structure spawn timer interval in milliseconds.
pub const SPAWN_INTERVAL_MS: u64 = 10_000;

/// Unit movement timer interval in milliseconds.
pub const MOVE_INTERVAL_MS: u64 = 75;

/// AI decision timer interval in milliseconds.
pub const AI_INTERVAL_MS: u64 = 300;

/// Probability that an attack lands.
pub const HIT_CHANCE: Fixed = Fixed::from_bits(1 << 31); // 0.5

/// Resources added per mining fire per eligible unit.
pub const MINING_YIELD: u32 = 1;

/// Health lost by a target on a successful hit.
pub const ATTACK_DAMAGE: i32 = 1;

/// Resources consumed by building a factory.
pub const FACTORY_COST: u32 = 10;

/// Mining fires a unit must wait between builds.
pub const BUILD_COOLDOWN: u32 = 4;

/// Spawn fires between two units from the same structure.
pub const SPAWN_CYCLES: u32 = 1;

/// Tunables for one simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed for the simulation's random source.
    pub seed: u64,
    /// Player cap.
    pub player_limit: usize,
    /// Mining interval (ms).
    pub mine_interval_ms: u64,
    /// Spawn interval (ms).
    pub spawn_interval_ms: u64,
    /// Movement interval (ms).
    pub move_interval_ms: u64,
    /// AI interval (ms).
    pub ai_interval_ms: u64,
    /// Attack hit probability in `[0, 1]`.
    #[serde(with = "fixed_serde")]
    pub hit_chance: Fixed,
    /// Damage per successful hit.
    pub attack_damage: i32,
    /// Resources per mining fire.
    pub mining_yield: u32,
    /// Factory build cost.
    pub factory_cost: u32,
    /// Mining fires between builds by the same unit.
    pub build_cooldown: u32,
    /// Spawn fires between productions of one structure.
    pub spawn_cycles: u32,
    /// What a structure produces after it changes hands.
    pub captured_kind: UnitKind,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            player_limit: PLAYER_LIMIT,
            mine_interval_ms: MINE_INTERVAL_MS,
            spawn_interval_ms: SPAWN_INTERVAL_MS,
            move_interval_ms: MOVE_INTERVAL_MS,
            ai_interval_ms: AI_INTERVAL_MS,
            hit_chance: HIT_CHANCE,
            attack_damage: ATTACK_DAMAGE,
            mining_yield: MINING_YIELD,
            factory_cost: FACTORY_COST,
            build_cooldown: BUILD_COOLDOWN,
            spawn_cycles: SPAWN_CYCLES,
            captured_kind: UnitKind::CommandCenter,
        }
    }
}

impl SimConfig {
    /// Default configuration with the given seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Check every field for values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        let intervals = [
            ("mine_interval_ms", self.mine_interval_ms),
            ("spawn_interval_ms", self.spawn_interval_ms),
            ("move_interval_ms", self.move_interval_ms),
            ("ai_interval_ms", self.ai_interval_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(GameError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        if self.player_limit < 2 {
            return Err(GameError::InvalidConfig(
                "player_limit must allow at least two players".into(),
            ));
        }
        if self.hit_chance < Fixed::ZERO || self.hit_chance > Fixed::ONE {
            return Err(GameError::InvalidConfig(format!(
                "hit_chance {} is outside [0, 1]",
                self.hit_chance
            )));
        }
        if self.attack_damage <= 0 {
            return Err(GameError::InvalidConfig(
                "attack_damage must be positive".into(),
            ));
        }
        if self.spawn_cycles == 0 {
            return Err(GameError::InvalidConfig(
                "spawn_cycles must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Shortest of the four timer intervals.
    #[must_use]
    pub fn shortest_interval_ms(&self) -> u64 {
        self.mine_interval_ms
            .min(self.spawn_interval_ms)
            .min(self.move_interval_ms)
            .min(self.ai_interval_ms)
    }
}
