//! Combat and capture behaviour through the full tick.

use skirmish_core::math::Fixed;
use skirmish_core::scheduler::TimerFires;
use skirmish_core::units::UnitKind;
use skirmish_core::victory::MatchStatus;
use skirmish_test_utils::fixtures::{config_with_hit_chance, fixed_f, tc, Scenario, SPAWN};

#[test]
fn adjacent_combatant_captures_unclaimed_structure() {
    let mut scenario = Scenario::parse(&["C.FS.", "....c"], 1);
    let structure = scenario.structure_at(tc(0, 3));

    let events = scenario.sim.step(TimerFires::NONE);

    assert_eq!(events.captures.len(), 1);
    let captured = scenario.sim.structure(structure).unwrap();
    assert_eq!(captured.claimant, Some(scenario.red));
    assert_eq!(captured.produces, scenario.sim.config().captured_kind);
}

#[test]
fn enemy_structure_changes_hands_regardless_of_seed() {
    for seed in 0..20 {
        let mut scenario = Scenario::parse(&["C.F2.", "....c"], seed);
        let structure = scenario.structure_at(tc(0, 3));

        scenario.sim.step(TimerFires::NONE);

        assert_eq!(
            scenario.sim.structure(structure).unwrap().claimant,
            Some(scenario.red),
            "seed {seed}"
        );
    }
}

#[test]
fn contested_structure_goes_to_lowest_unit_id() {
    let mut scenario = Scenario::parse(&["C.F..", "..S..", "..f.c"], 1);
    let structure = scenario.structure_at(tc(1, 2));

    let events = scenario.sim.step(TimerFires::NONE);

    assert_eq!(events.captures.len(), 1);
    assert_eq!(
        scenario.sim.structure(structure).unwrap().claimant,
        Some(scenario.red)
    );

    // Next tick the other side takes it back.
    scenario.sim.step(TimerFires::NONE);
    assert_eq!(
        scenario.sim.structure(structure).unwrap().claimant,
        Some(scenario.blue)
    );
}

#[test]
fn captured_structure_spawns_for_new_owner() {
    let mut scenario = Scenario::parse(&["C.F2.", "....c"], 1);
    let structure = scenario.structure_at(tc(0, 3));
    scenario.sim.step(TimerFires::NONE);

    let events = scenario.sim.step(SPAWN);

    assert_eq!(events.spawned.len(), 1);
    let unit = scenario.sim.unit(events.spawned[0]).unwrap();
    assert_eq!(unit.team, scenario.red);
    assert_eq!(unit.tile, scenario.sim.structure(structure).unwrap().tile);
    assert_eq!(unit.kind, UnitKind::CommandCenter);
}

#[test]
fn hit_rate_converges_to_configured_chance() {
    const ROUNDS: u32 = 4_000;
    let config = config_with_hit_chance(2024, fixed_f(0.5));
    let mut scenario = Scenario::with_config(&["C.Fw.", "....c"], config);
    let target = scenario.unit_at(tc(0, 3));

    let mut hits = 0u32;
    for _ in 0..ROUNDS {
        // Keep the target alive so every round has exactly one eligible target.
        scenario.sim.unit_mut(target).unwrap().health = 1_000;
        let events = scenario.sim.step(TimerFires::NONE);
        assert_eq!(events.attacks.len(), 1);
        hits += u32::from(events.attacks[0].is_hit());
    }

    // Binomial(4000, 0.5): standard deviation is about 32 hits.
    let expected = ROUNDS / 2;
    assert!(
        hits.abs_diff(expected) < 160,
        "{hits} hits out of {ROUNDS}"
    );
}

#[test]
fn zero_hit_chance_never_damages() {
    let config = config_with_hit_chance(5, Fixed::ZERO);
    let mut scenario = Scenario::with_config(&["C.Ff.", "....c"], config);

    scenario.step_n(200, TimerFires::NONE);

    assert!(scenario.sim.units().all(|u| u.health == u.kind.starting_health()));
    assert_eq!(scenario.sim.status(), MatchStatus::Running);
}
