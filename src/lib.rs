pub mod animation;
pub mod autoplay;
pub mod battle;
pub mod config;
pub mod model;
pub mod moves;
pub mod pacing;
pub mod rng;
pub mod roster;

use crate::autoplay::{compute_win_rates, write_report, PlayerPolicy};
use crate::model::Combatant;
use crate::roster::{champions, load_catalogue, opponent_pool};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct CliOptions {
    pub catalogue_path: PathBuf,
    pub sims_per_pair: usize,
    pub seed: u64,
    pub output_path: PathBuf,
    pub policy: PlayerPolicy,
    pub opponent_pool_limit: usize,
}

/// Runs every champion of every team against the opponent pool and writes the report.
pub fn run(opts: CliOptions) -> anyhow::Result<()> {
    if opts.sims_per_pair == 0 {
        anyhow::bail!("--sims-per-pair must be > 0");
    }
    let catalogue = load_catalogue(&opts.catalogue_path)?;
    let squad: Vec<Combatant> = champions(&catalogue).iter().map(Combatant::from).collect();
    if squad.is_empty() {
        anyhow::bail!(
            "No team members in {}; build a team first",
            opts.catalogue_path.display()
        );
    }
    let opponents: Vec<Combatant> = opponent_pool(&catalogue, opts.opponent_pool_limit)
        .iter()
        .map(Combatant::from)
        .collect();
    if opponents.is_empty() {
        anyhow::bail!("No opponents in {}", opts.catalogue_path.display());
    }
    let rows = compute_win_rates(
        &squad,
        &opponents,
        opts.sims_per_pair,
        opts.seed,
        opts.policy,
    )?;
    write_report(&rows, &opts.output_path)?;
    println!(
        "Wrote win rates for {} champions against {} opponents to {}",
        rows.len(),
        opponents.len(),
        opts.output_path.display()
    );
    Ok(())
}
