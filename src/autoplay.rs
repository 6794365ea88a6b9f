//! Headless encounters: whole battles with no pacing, used for win-rate reports.

use crate::battle::{Battle, BattleError, Side};
use crate::model::Combatant;
use crate::moves::ActionKind;
use crate::rng::{BattleRng, SeededRng};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use std::path::Path;

/// Rounds after which the harness gives up. The engine has no turn limit of its own;
/// a player who only heals can outlast weak CPU hits forever.
pub const MAX_ROUNDS: usize = 500;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlayerPolicy {
    Random,
    Fixed(ActionKind),
}

impl PlayerPolicy {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        if raw.trim().eq_ignore_ascii_case("random") {
            return Ok(PlayerPolicy::Random);
        }
        ActionKind::parse(raw).map(PlayerPolicy::Fixed).ok_or_else(|| {
            anyhow::anyhow!("Unknown policy {raw} (use random, quick, heavy, heal or special)")
        })
    }

    fn choose<R: BattleRng>(&self, rng: &mut R) -> ActionKind {
        match self {
            PlayerPolicy::Random => ActionKind::ALL[rng.pick(ActionKind::ALL.len())],
            PlayerPolicy::Fixed(kind) => *kind,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AutoplayOutcome {
    PlayerWins,
    CpuWins,
    Stalemate,
}

pub fn simulate_battle(
    player: &Combatant,
    cpu: &Combatant,
    policy: PlayerPolicy,
    seed: u64,
) -> Result<AutoplayOutcome, BattleError> {
    let mut battle = Battle::seeded(player.clone(), cpu.clone(), seed)?;
    let mut policy_rng = SeededRng::new(seed ^ 0x9E37_79B9);
    for _round in 0..MAX_ROUNDS {
        if battle.is_finished() {
            break;
        }
        battle.submit_player_action(policy.choose(&mut policy_rng));
        battle.resolve_cpu_action();
    }
    Ok(match battle.winner() {
        Some(Side::Player) => AutoplayOutcome::PlayerWins,
        Some(Side::Cpu) => AutoplayOutcome::CpuWins,
        None => AutoplayOutcome::Stalemate,
    })
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WinRateRow {
    pub champion: String,
    pub battles: u64,
    pub wins: u64,
    pub losses: u64,
    pub stalemates: u64,
    pub win_rate: f64,
}

struct PairResult {
    champion_idx: usize,
    wins: u64,
    losses: u64,
    stalemates: u64,
}

/// Plays every champion against every opponent `sims_per_pair` times. Results only depend
/// on `seed`, not on how rayon schedules the pairs.
pub fn compute_win_rates(
    champions: &[Combatant],
    opponents: &[Combatant],
    sims_per_pair: usize,
    seed: u64,
    policy: PlayerPolicy,
) -> Result<Vec<WinRateRow>, BattleError> {
    let tasks: Vec<(usize, usize)> = (0..champions.len())
        .flat_map(|c| (0..opponents.len()).map(move |o| (c, o)))
        .collect();
    let pair_results: Vec<PairResult> = tasks
        .par_iter()
        .map(|(c_idx, o_idx)| -> Result<PairResult, BattleError> {
            let mut pair_rng =
                SmallRng::seed_from_u64(seed ^ ((*c_idx as u64) << 32) ^ (*o_idx as u64));
            let mut result = PairResult {
                champion_idx: *c_idx,
                wins: 0,
                losses: 0,
                stalemates: 0,
            };
            for _ in 0..sims_per_pair {
                let battle_seed = pair_rng.gen();
                let outcome = simulate_battle(
                    &champions[*c_idx],
                    &opponents[*o_idx],
                    policy,
                    battle_seed,
                )?;
                match outcome {
                    AutoplayOutcome::PlayerWins => result.wins += 1,
                    AutoplayOutcome::CpuWins => result.losses += 1,
                    AutoplayOutcome::Stalemate => result.stalemates += 1,
                }
            }
            Ok(result)
        })
        .collect::<Result<_, BattleError>>()?;

    let mut rows: Vec<WinRateRow> = champions
        .iter()
        .map(|champion| WinRateRow {
            champion: champion.name.clone(),
            battles: 0,
            wins: 0,
            losses: 0,
            stalemates: 0,
            win_rate: 0.0,
        })
        .collect();
    for pair in pair_results {
        let row = &mut rows[pair.champion_idx];
        row.wins += pair.wins;
        row.losses += pair.losses;
        row.stalemates += pair.stalemates;
    }
    for row in &mut rows {
        row.battles = row.wins + row.losses + row.stalemates;
        if row.battles > 0 {
            row.win_rate = (row.wins as f64 + 0.5 * row.stalemates as f64) / row.battles as f64;
        }
    }
    Ok(rows)
}

/// Writes CSV, or pretty JSON when the path ends in `.json`.
pub fn write_report(rows: &[WinRateRow], path: &Path) -> anyhow::Result<()> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let out = if is_json {
        serde_json::to_string_pretty(rows)? + "\n"
    } else {
        let mut out = String::from("champion,battles,wins,losses,stalemates,win_rate\n");
        for row in rows {
            out.push_str(&format!(
                "{},{},{},{},{},{:.4}\n",
                csv_field(&row.champion),
                row.battles,
                row.wins,
                row.losses,
                row.stalemates,
                row.win_rate
            ));
        }
        out
    };
    std::fs::write(path, out)?;
    Ok(())
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
