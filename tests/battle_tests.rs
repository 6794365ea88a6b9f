use pokedex_battle::animation::{Cue, HIT_DELAY};
use pokedex_battle::battle::{Battle, BattleError, MoveOutcome, Phase, Side};
use pokedex_battle::model::{BaseStats, Combatant};
use pokedex_battle::moves::ActionKind;
use pokedex_battle::rng::{BattleRng, ScriptedRng, SeededRng};
use std::time::Duration;

fn make_mon(name: &str, hp: u32, attack: u32, defense: u32) -> Combatant {
    Combatant::new(
        name,
        BaseStats {
            hp,
            attack,
            defense,
            special_attack: 60,
            special_defense: 60,
            speed: 60,
        },
    )
}

fn scenario_pair() -> (Combatant, Combatant) {
    (
        make_mon("Pikachu", 100, 100, 50),
        make_mon("Ronflex", 100, 50, 100),
    )
}

fn assert_invariants<R: BattleRng>(battle: &Battle<R>) {
    assert!(battle.player_hp() <= battle.max_player_hp());
    assert!(battle.cpu_hp() <= battle.max_cpu_hp());
    assert_eq!(battle.winner().is_some(), battle.phase() == Phase::Finished);
}

#[test]
fn starts_at_full_health_on_player_turn() {
    let (player, cpu) = scenario_pair();
    let battle = Battle::seeded(player, cpu, 1).unwrap();
    assert_eq!(battle.player_hp(), 100);
    assert_eq!(battle.cpu_hp(), 100);
    assert_eq!(battle.turn(), Side::Player);
    assert_eq!(battle.phase(), Phase::InProgress);
    assert_eq!(battle.winner(), None);
    assert!(battle.log().contains("Pikachu"));
    assert!(battle.log().contains("Ronflex"));
    assert!(!battle.ready_for_cpu_turn());
}

#[test]
fn quick_attack_damage_is_within_formula_range() {
    for seed in 0..64 {
        let (player, cpu) = scenario_pair();
        let mut battle = Battle::seeded(player, cpu, seed).unwrap();
        let report = battle.submit_player_action(ActionKind::Quick).unwrap();
        let dealt = 100 - battle.cpu_hp();
        assert!((25..=29).contains(&dealt), "seed {seed} dealt {dealt}");
        assert_eq!(report.outcome, MoveOutcome::Hit { damage: dealt });
        assert_eq!(battle.turn(), Side::Cpu);
        assert!(battle.ready_for_cpu_turn());
    }
}

#[test]
fn scripted_factor_pins_exact_damage() {
    let (player, cpu) = scenario_pair();
    let rng = ScriptedRng::new().with_factors([0.85]);
    let mut battle = Battle::new(player, cpu, rng).unwrap();
    battle.submit_player_action(ActionKind::Quick);
    assert_eq!(battle.cpu_hp(), 75);
    assert_eq!(battle.log(), "Pikachu utilise Vive-Attaque !");
}

#[test]
fn knockout_finishes_the_battle_and_freezes_hp() {
    let player = make_mon("Pikachu", 100, 100, 50);
    let cpu = make_mon("Magicarpe", 10, 50, 100);
    let mut battle = Battle::seeded(player, cpu, 5).unwrap();
    let mut rounds = 0;
    while !battle.is_finished() {
        battle.submit_player_action(ActionKind::Quick);
        battle.resolve_cpu_action();
        rounds += 1;
        assert!(rounds < 100, "battle should end");
    }
    assert_eq!(battle.cpu_hp(), 0);
    assert_eq!(battle.phase(), Phase::Finished);
    assert_eq!(battle.winner(), Some(Side::Player));
    // No handoff after a knockout.
    assert_eq!(battle.turn(), Side::Player);

    let player_hp = battle.player_hp();
    let sequence = battle.sequence();
    for action in ActionKind::ALL {
        assert!(battle.submit_player_action(action).is_none());
    }
    assert!(battle.resolve_cpu_action().is_none());
    assert_eq!(battle.cpu_hp(), 0);
    assert_eq!(battle.player_hp(), player_hp);
    assert_eq!(battle.sequence(), sequence);
    assert_eq!(battle.winner(), Some(Side::Player));
}

#[test]
fn heal_at_full_health_is_capped_but_uses_the_turn() {
    let (player, cpu) = scenario_pair();
    let mut battle = Battle::seeded(player, cpu, 3).unwrap();
    let report = battle.submit_player_action(ActionKind::Heal).unwrap();
    assert_eq!(battle.player_hp(), 100);
    assert_eq!(report.outcome, MoveOutcome::Healed { restored: 0 });
    assert_eq!(battle.log(), "Pikachu utilise Soin !");
    assert_eq!(battle.turn(), Side::Cpu);
    assert!(battle.cues().is_idle());
}

#[test]
fn heal_restores_thirty_percent_after_damage() {
    let (player, cpu) = scenario_pair();
    // Quick by the player, then CPU heavy (pick 2) at factor 0.9: 50/50 * 50 * 0.9 = 45.
    let rng = ScriptedRng::new()
        .with_factors([0.9, 0.9])
        .with_picks([2]);
    let mut battle = Battle::new(player, cpu, rng).unwrap();
    battle.submit_player_action(ActionKind::Quick);
    let cpu_report = battle.resolve_cpu_action().unwrap();
    assert_eq!(cpu_report.action, ActionKind::Heavy);
    assert_eq!(battle.player_hp(), 55);
    assert_eq!(battle.log(), "Ronflex adverse utilise Ultralaser !");

    battle.submit_player_action(ActionKind::Heal);
    assert_eq!(battle.player_hp(), 85);
}

#[test]
fn special_and_cpu_moves_hit_with_their_own_power() {
    // Factor 0.9 on a 1:1 or 100:100 stat ratio: damage is 0.9 * power, floored.
    let cases = [
        (0, ActionKind::Quick, 27, "Ronflex adverse utilise Charge !"),
        (1, ActionKind::Quick, 27, "Ronflex adverse utilise Charge !"),
        (3, ActionKind::Special, 36, "Ronflex adverse utilise une attaque obscure !"),
    ];
    for (pick, kind, dealt, message) in cases {
        let (player, cpu) = scenario_pair();
        let rng = ScriptedRng::new()
            .with_factors([0.9, 0.9])
            .with_picks([pick]);
        let mut battle = Battle::new(player, cpu, rng).unwrap();

        battle.submit_player_action(ActionKind::Special);
        assert_eq!(battle.cpu_hp(), 100 - 40);
        assert_eq!(battle.log(), "Pikachu utilise sa capacité spéciale !");

        let report = battle.resolve_cpu_action().unwrap();
        assert_eq!(report.action, kind);
        assert_eq!(report.outcome, MoveOutcome::Hit { damage: dealt });
        assert_eq!(battle.player_hp(), 100 - dealt);
        assert_eq!(battle.log(), message);
    }
}

#[test]
fn repeated_heals_never_exceed_max() {
    let player = make_mon("Leveinard", 250, 10, 200);
    let cpu = make_mon("Chenipan", 45, 30, 35);
    let mut battle = Battle::seeded(player, cpu, 11).unwrap();
    for _ in 0..40 {
        battle.submit_player_action(ActionKind::Heal);
        assert!(battle.player_hp() <= battle.max_player_hp());
        battle.resolve_cpu_action();
        assert_invariants(&battle);
    }
}

#[test]
fn heavy_miss_deals_nothing_and_passes_the_turn() {
    let (player, cpu) = scenario_pair();
    let rng = ScriptedRng::new().with_miss_rolls([true]);
    let mut battle = Battle::new(player, cpu, rng).unwrap();
    let report = battle.submit_player_action(ActionKind::Heavy).unwrap();
    assert_eq!(report.outcome, MoveOutcome::Missed);
    assert_eq!(battle.cpu_hp(), 100);
    assert_eq!(battle.log(), "Pikachu rate son attaque !");
    assert_eq!(battle.turn(), Side::Cpu);
    assert!(battle.cues().is_idle());
}

#[test]
fn heavy_hit_flashes_the_screen() {
    let (player, cpu) = scenario_pair();
    let rng = ScriptedRng::new()
        .with_miss_rolls([false])
        .with_factors([0.9]);
    let mut battle = Battle::new(player, cpu, rng).unwrap();
    battle.submit_player_action(ActionKind::Heavy);
    assert_eq!(battle.cpu_hp(), 100 - 54);
    assert_eq!(battle.log(), "Pikachu lance une attaque puissante !");
    assert_eq!(battle.snapshot().cues.player, Some(Cue::Thrust));
    battle.advance_cues(HIT_DELAY);
    let snapshot = battle.snapshot();
    assert!(snapshot.cues.flash);
    assert_eq!(snapshot.cues.cpu, Some(Cue::Shake));
}

#[test]
fn heavy_miss_rate_is_about_one_in_five() {
    let mut misses = 0;
    for seed in 0..1000 {
        let (player, cpu) = scenario_pair();
        let mut battle = Battle::seeded(player, cpu, seed).unwrap();
        if let Some(report) = battle.submit_player_action(ActionKind::Heavy) {
            if report.outcome == MoveOutcome::Missed {
                misses += 1;
            }
        }
    }
    let rate = misses as f64 / 1000.0;
    assert!((rate - 0.2).abs() < 0.05, "expected miss rate near 0.2, got {rate}");
}

#[test]
fn out_of_turn_calls_are_ignored() {
    let (player, cpu) = scenario_pair();
    let mut battle = Battle::seeded(player, cpu, 8).unwrap();
    assert!(battle.resolve_cpu_action().is_none());
    battle.submit_player_action(ActionKind::Quick);
    let cpu_hp = battle.cpu_hp();
    assert!(battle.submit_player_action(ActionKind::Quick).is_none());
    assert_eq!(battle.cpu_hp(), cpu_hp);
    assert_eq!(battle.turn(), Side::Cpu);

    let report = battle.resolve_cpu_action().unwrap();
    assert_eq!(report.actor, Side::Cpu);
    assert_eq!(battle.turn(), Side::Player);
    assert!(battle.resolve_cpu_action().is_none());
}

#[test]
fn cpu_never_heals_and_favours_quick() {
    let mut counts = [0usize; 4];
    for seed in 0..2000 {
        let (player, cpu) = scenario_pair();
        let mut battle = Battle::seeded(player, cpu, seed).unwrap();
        battle.submit_player_action(ActionKind::Heal);
        let report = battle.resolve_cpu_action().unwrap();
        let slot = match report.action {
            ActionKind::Quick => 0,
            ActionKind::Heavy => 1,
            ActionKind::Heal => 2,
            ActionKind::Special => 3,
        };
        counts[slot] += 1;
        assert!(matches!(report.outcome, MoveOutcome::Hit { .. }));
    }
    assert_eq!(counts[2], 0);
    assert!(counts[0] > counts[1] + 300, "{counts:?}");
    assert!(counts[0] > counts[3] + 300, "{counts:?}");
}

#[test]
fn cpu_knockout_makes_cpu_the_winner() {
    let player = make_mon("Chétiflor", 10, 20, 5);
    let cpu = make_mon("Dracolosse", 91, 134, 95);
    let mut battle = Battle::seeded(player, cpu, 2).unwrap();
    battle.submit_player_action(ActionKind::Quick);
    let report = battle.resolve_cpu_action().unwrap();
    assert!(report.finished);
    assert_eq!(battle.player_hp(), 0);
    assert_eq!(battle.winner(), Some(Side::Cpu));
    assert!(battle.submit_player_action(ActionKind::Heal).is_none());
    assert_eq!(battle.player_hp(), 0);
}

#[test]
fn damage_floor_applies_to_hopeless_matchups() {
    let player = make_mon("Magicarpe", 100, 1, 10);
    let cpu = make_mon("Steelix", 75, 85, 200);
    let mut battle = Battle::seeded(player, cpu, 4).unwrap();
    battle.submit_player_action(ActionKind::Quick);
    assert_eq!(battle.cpu_hp(), 70);
}

#[test]
fn zero_defense_is_treated_as_one() {
    let player = make_mon("Pikachu", 100, 2, 50);
    let cpu = make_mon("Fantôme", 200, 10, 0);
    let rng = ScriptedRng::new().with_factors([0.9]);
    let mut battle = Battle::new(player, cpu, rng).unwrap();
    battle.submit_player_action(ActionKind::Quick);
    assert_eq!(battle.cpu_hp(), 200 - 54);
}

#[test]
fn same_seed_and_actions_replay_identically() {
    let actions = [
        ActionKind::Heavy,
        ActionKind::Special,
        ActionKind::Heal,
        ActionKind::Quick,
        ActionKind::Heavy,
        ActionKind::Quick,
    ];
    let play = |cue_step: Duration| {
        let player = make_mon("Salamèche", 120, 80, 70);
        let cpu = make_mon("Carapuce", 130, 70, 80);
        let mut battle = Battle::seeded(player, cpu, 77).unwrap();
        let mut trace = Vec::new();
        for action in actions {
            battle.submit_player_action(action);
            battle.advance_cues(cue_step);
            battle.resolve_cpu_action();
            battle.advance_cues(cue_step);
            trace.push((battle.player_hp(), battle.cpu_hp(), battle.winner()));
        }
        trace
    };
    // Cue timing never changes the outcome.
    assert_eq!(play(Duration::ZERO), play(Duration::from_millis(900)));
}

#[test]
fn random_play_keeps_invariants_and_alternates_turns() {
    for seed in 0..200 {
        let player = make_mon("Évoli", 55, 55, 50);
        let cpu = make_mon("Rattata", 30, 56, 35);
        let mut battle = Battle::seeded(player, cpu, seed).unwrap();
        let mut picker = SeededRng::new(seed + 1000);
        while !battle.is_finished() {
            assert_eq!(battle.turn(), Side::Player);
            let action = ActionKind::ALL[picker.pick(4)];
            let report = battle.submit_player_action(action).unwrap();
            assert_invariants(&battle);
            if report.finished {
                break;
            }
            assert_eq!(battle.turn(), Side::Cpu);
            battle.resolve_cpu_action().unwrap();
            assert_invariants(&battle);
        }
        let snapshot = battle.snapshot();
        assert_eq!(snapshot.phase, Phase::Finished);
        let loser_hp = match snapshot.winner {
            Some(Side::Player) => snapshot.cpu_hp,
            Some(Side::Cpu) => snapshot.player_hp,
            None => panic!("finished battle without a winner"),
        };
        assert_eq!(loser_hp, 0);
    }
}

#[test]
fn missing_or_malformed_combatants_are_refused() {
    let (player, cpu) = scenario_pair();
    let err = Battle::from_selection(None, Some(cpu.clone()), SeededRng::new(0)).unwrap_err();
    assert_eq!(err, BattleError::MissingCombatant(Side::Player));
    let err = Battle::from_selection(Some(player.clone()), None, SeededRng::new(0)).unwrap_err();
    assert_eq!(err, BattleError::MissingCombatant(Side::Cpu));

    let nameless = make_mon("  ", 100, 50, 50);
    let err = Battle::seeded(nameless, cpu.clone(), 0).unwrap_err();
    assert_eq!(err, BattleError::UnnamedCombatant(Side::Player));

    let fainted = make_mon("Mew", 0, 100, 100);
    let err = Battle::seeded(player, fainted, 0).unwrap_err();
    assert!(matches!(err, BattleError::NoHitPoints { side: Side::Cpu, .. }));
    assert!(err.to_string().contains("Mew"));
}
