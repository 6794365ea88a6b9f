use pokedex_battle::autoplay::PlayerPolicy;
use pokedex_battle::config::{ArenaConfig, DEFAULT_CONFIG_PATH};
use pokedex_battle::{run, CliOptions};
use std::env;
use std::path::PathBuf;

fn usage() -> ! {
    eprintln!(
        "Usage: cargo run --release -- [--config arena.toml] [--catalogue db.json] [--sims-per-pair N] \
[--seed SEED] [--output win_rates.csv] [--policy random|quick|heavy|heal|special] [--pool-limit N]"
    );
    std::process::exit(1);
}

fn parse_args() -> anyhow::Result<CliOptions> {
    let mut config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let mut catalogue_path: Option<PathBuf> = None;
    let mut sims_per_pair = 20usize;
    let mut seed: Option<u64> = None;
    let mut output_path = PathBuf::from("win_rates.csv");
    let mut policy = PlayerPolicy::Random;
    let mut pool_limit: Option<usize> = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--config requires a path (e.g. --config arena.toml)")
                })?;
            }
            "--catalogue" => {
                catalogue_path = Some(args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--catalogue requires a path (e.g. --catalogue db.json)")
                })?);
            }
            "--sims-per-pair" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--sims-per-pair requires a number"))?;
                sims_per_pair = val.parse()?;
            }
            "--seed" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--seed requires a number"))?;
                seed = Some(val.parse()?);
            }
            "--output" => {
                output_path = args.next().map(PathBuf::from).ok_or_else(|| {
                    anyhow::anyhow!("--output requires a path (e.g. --output win_rates.csv)")
                })?;
            }
            "--policy" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--policy requires random or an action"))?;
                policy = PlayerPolicy::parse(&val)?;
            }
            "--pool-limit" => {
                let val = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--pool-limit requires a number"))?;
                pool_limit = Some(val.parse()?);
            }
            "--help" | "-h" => usage(),
            other => return Err(anyhow::anyhow!("Unknown argument {other}")),
        }
    }

    let config = ArenaConfig::load(&config_path)?;
    Ok(CliOptions {
        catalogue_path: catalogue_path.unwrap_or(config.catalogue),
        sims_per_pair,
        seed: seed.or(config.seed).unwrap_or(0),
        output_path,
        policy,
        opponent_pool_limit: pool_limit.unwrap_or(config.opponent_pool_limit),
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = parse_args()?;
    run(opts)
}
