mod ui;

use anyhow::Context;
use log::info;
use pokedex_battle::animation::CUE_DURATION;
use pokedex_battle::battle::Battle;
use pokedex_battle::config::{ArenaConfig, DEFAULT_CONFIG_PATH};
use pokedex_battle::model::Combatant;
use pokedex_battle::pacing::CpuTurnTimer;
use pokedex_battle::rng::{BattleRng, SeededRng};
use pokedex_battle::roster::{
    champions, find_arena, load_catalogue, opponent_pool, pick_opponent, Arena, ARENAS,
};
use rand::Rng;
use std::env;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(100);

struct CliOptions {
    config_path: PathBuf,
    catalogue_path: Option<PathBuf>,
    seed: Option<u64>,
    arena: Option<String>,
    champion: Option<usize>,
    cpu_delay_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opts = parse_args()?;
    let config = ArenaConfig::load(&opts.config_path)?;
    run_game(opts, config)
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut opts = CliOptions {
        config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        catalogue_path: None,
        seed: None,
        arena: None,
        champion: None,
        cpu_delay_ms: None,
    };

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                opts.config_path = args
                    .next()
                    .map(PathBuf::from)
                    .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
            }
            "--catalogue" => {
                opts.catalogue_path = Some(
                    args.next()
                        .map(PathBuf::from)
                        .ok_or_else(|| anyhow::anyhow!("--catalogue requires a path"))?,
                );
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                opts.seed = Some(val.parse()?);
            }
            "--arena" => {
                opts.arena = Some(
                    args.next()
                        .ok_or_else(|| anyhow::anyhow!("--arena requires an arena id"))?,
                );
            }
            "--champion" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--champion requires a number"))?;
                let n: usize = val.parse()?;
                if n == 0 {
                    anyhow::bail!("--champion starts at 1");
                }
                opts.champion = Some(n - 1);
            }
            "--cpu-delay-ms" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--cpu-delay-ms requires milliseconds"))?;
                opts.cpu_delay_ms = Some(val.parse()?);
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => {
                print_usage();
                anyhow::bail!("Unknown argument {other}");
            }
        }
    }
    Ok(opts)
}

fn run_game(opts: CliOptions, config: ArenaConfig) -> anyhow::Result<()> {
    let catalogue_path = opts.catalogue_path.clone().unwrap_or(config.catalogue.clone());
    let catalogue = load_catalogue(&catalogue_path).context("Impossible de charger le Pokédex")?;
    let seed = opts
        .seed
        .or(config.seed)
        .unwrap_or_else(|| rand::thread_rng().gen());
    let mut setup_rng = SeededRng::new(seed ^ 0xD1B5_C0DE);

    let squad = champions(&catalogue);
    let champion_idx = match opts.champion {
        Some(idx) if idx < squad.len() => idx,
        Some(idx) => anyhow::bail!("--champion {} is out of range (1..={})", idx + 1, squad.len()),
        None => ui::prompt_champion(&squad)?,
    };
    let arena = choose_arena(opts.arena.as_deref(), &mut setup_rng)?;
    let pool = opponent_pool(&catalogue, config.opponent_pool_limit);
    let opponent = pick_opponent(&pool, &mut setup_rng);
    info!("seed {seed}, arena {}, opponent pool of {}", arena.id, pool.len());

    let battle = Battle::from_selection(
        squad.get(champion_idx).map(Combatant::from),
        opponent.map(Combatant::from),
        SeededRng::new(seed),
    );
    let mut battle = match battle {
        Ok(battle) => battle,
        Err(err) => {
            ui::print_load_error(&err);
            return Err(err.into());
        }
    };
    if let (Some(player), Some(cpu)) = (squad.get(champion_idx), opponent) {
        ui::print_matchup(player, cpu, &arena);
    }

    let delay = opts
        .cpu_delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.cpu_delay());
    let mut timer = CpuTurnTimer::new(delay);

    loop {
        ui::render(&battle.snapshot(), &arena);
        if battle.is_finished() {
            ui::print_result(&battle.snapshot());
            break;
        }
        if battle.is_player_turn() {
            let action = ui::prompt_action()?;
            battle.submit_player_action(action);
        }
        if timer.arm(&battle, Instant::now()) {
            wait_for_cpu(&mut battle, &mut timer, &arena);
        }
        settle_cues(&mut battle, &arena);
    }
    Ok(())
}

/// Plays cue frames until the scheduled CPU turn fires.
fn wait_for_cpu<R: BattleRng>(battle: &mut Battle<R>, timer: &mut CpuTurnTimer, arena: &Arena) {
    let mut last = Instant::now();
    while timer.is_pending() {
        let now = Instant::now();
        battle.advance_cues(now - last);
        last = now;
        if timer.poll(battle, now).is_some() {
            break;
        }
        ui::render(&battle.snapshot(), arena);
        let wait = timer.remaining(now).unwrap_or(Duration::ZERO).min(FRAME);
        thread::sleep(wait);
    }
}

fn settle_cues<R: BattleRng>(battle: &mut Battle<R>, arena: &Arena) {
    let deadline = Instant::now() + CUE_DURATION * 2;
    while !battle.cues().is_idle() && Instant::now() < deadline {
        ui::render(&battle.snapshot(), arena);
        thread::sleep(FRAME);
        battle.advance_cues(FRAME);
    }
}

fn choose_arena(id: Option<&str>, rng: &mut SeededRng) -> anyhow::Result<Arena> {
    match id {
        Some(id) => find_arena(id).ok_or_else(|| {
            let ids: Vec<&str> = ARENAS.iter().map(|a| a.id).collect();
            anyhow::anyhow!("Unknown arena {id} (use one of {})", ids.join(", "))
        }),
        None => Ok(ARENAS[rng.pick(ARENAS.len())]),
    }
}

fn print_usage() {
    eprintln!(
        "Usage: cargo run --manifest-path battle/Cargo.toml -- [--config arena.toml] [--catalogue db.json] \
[--seed N] [--arena stadium|forest|volcano|ocean] [--champion N] [--cpu-delay-ms MS]"
    );
}
