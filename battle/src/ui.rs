use anyhow::Result;
use pokedex_battle::animation::Cue;
use pokedex_battle::battle::{BattleSnapshot, Side};
use pokedex_battle::model::Pokemon;
use pokedex_battle::moves::ActionKind;
use pokedex_battle::roster::{cycle_index, Arena};
use std::io::{self, Write};

const GREEN: &str = "\x1b[32m";
const ORANGE: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";
const INVERT: &str = "\x1b[7m";

pub fn render(view: &BattleSnapshot, arena: &Arena) {
    clear_screen();
    let flash = if view.cues.flash { INVERT } else { "" };
    println!("{flash}=== {} ==={RESET}", arena.name);
    println!();
    println!("{:>46}", format_platform(&view.cpu_name, view.cues.cpu, true));
    println!("{:>46}", format_health(view.cpu_hp, view.max_cpu_hp, false));
    println!();
    println!("{}", format_platform(&view.player_name, view.cues.player, false));
    println!("{}", format_health(view.player_hp, view.max_player_hp, true));
    println!();
    println!("+{}+", "-".repeat(60));
    println!("| {:<58} |", view.log);
    println!("+{}+", "-".repeat(60));
    if view.winner.is_none() {
        let turn = match view.turn {
            Side::Player => "À vous de jouer !",
            Side::Cpu => "L'adversaire réfléchit...",
        };
        println!("{turn}");
    }
}

pub fn prompt_action() -> Result<ActionKind> {
    loop {
        for (i, kind) in ActionKind::ALL.iter().enumerate() {
            println!(" {}: {}", i + 1, kind.label());
        }
        print!("Action: ");
        let input = read_line()?;
        if let Some(kind) = ActionKind::parse(&input) {
            return Ok(kind);
        }
        println!("Entrée invalide. Choisissez 1 à 4.");
    }
}

/// Carousel over the champions: `n`/`p` to browse, Enter to confirm, or a number.
pub fn prompt_champion(champions: &[Pokemon]) -> Result<usize> {
    if champions.is_empty() {
        anyhow::bail!("Vous devez d'abord créer une équipe !");
    }
    let mut idx = 0usize;
    loop {
        let champ = &champions[idx];
        println!(
            "VOTRE CHAMPION ({}/{}): {:<14} HP {:>3}  ATK {:>3}  DEF {:>3}",
            idx + 1,
            champions.len(),
            champ.name.display(),
            champ.base.hp,
            champ.base.attack,
            champ.base.defense
        );
        print!("[n] suivant  [p] précédent  [Entrée] combattre: ");
        let input = read_line()?;
        match input.trim() {
            "" => return Ok(idx),
            "n" | "N" => idx = cycle_index(idx, champions.len(), true),
            "p" | "P" => idx = cycle_index(idx, champions.len(), false),
            other => match other.parse::<usize>() {
                Ok(n) if n >= 1 && n <= champions.len() => return Ok(n - 1),
                _ => println!("Numéro entre 1 et {} attendu.", champions.len()),
            },
        }
    }
}

pub fn print_matchup(player: &Pokemon, cpu: &Pokemon, arena: &Arena) {
    println!();
    println!(
        "{}  VS  {}  @ {}",
        player.name.display(),
        cpu.name.display(),
        arena.name
    );
}

pub fn print_result(view: &BattleSnapshot) {
    println!();
    match view.winner {
        Some(Side::Player) => {
            println!("{GREEN}=== VICTOIRE ! ==={RESET}");
            println!("Votre {} a terrassé l'adversaire !", view.player_name);
        }
        Some(Side::Cpu) => {
            println!("{RED}=== DÉFAITE... ==={RESET}");
            println!("Votre {} a succombé au combat.", view.player_name);
        }
        None => {}
    }
}

pub fn print_load_error(err: &dyn std::fmt::Display) {
    eprintln!("ERREUR DE CHARGEMENT DU COMBAT... ({err})");
}

fn format_platform(name: &str, cue: Option<Cue>, opponent: bool) -> String {
    let marker = match (cue, opponent) {
        (Some(Cue::Thrust), false) => " >>",
        (Some(Cue::Thrust), true) => "<< ",
        (Some(Cue::Shake), _) => " ~~",
        _ => "   ",
    };
    if opponent {
        format!("{marker}{name} Lvl 50")
    } else {
        format!("{name} Lvl 50{marker}")
    }
}

fn format_health(hp: u32, max_hp: u32, show_numbers: bool) -> String {
    let bar = hp_bar(hp, max_hp);
    if show_numbers {
        format!("HP {bar} {hp} / {max_hp}")
    } else {
        format!("HP {bar}")
    }
}

/// Green above half, orange above a fifth, red below.
fn hp_bar(hp: u32, max_hp: u32) -> String {
    let width = 20usize;
    let ratio = hp as f32 / max_hp.max(1) as f32;
    let filled = ((ratio * width as f32).round() as usize).min(width);
    let colour = if ratio > 0.5 {
        GREEN
    } else if ratio > 0.2 {
        ORANGE
    } else {
        RED
    };
    format!(
        "[{colour}{}{RESET}{}]",
        "=".repeat(filled),
        ".".repeat(width - filled)
    )
}

fn clear_screen() {
    print!("\x1b[2J\x1b[H");
    let _ = io::stdout().flush();
}

fn read_line() -> Result<String> {
    let mut buf = String::new();
    io::stdout().flush()?;
    if io::stdin().read_line(&mut buf)? == 0 {
        anyhow::bail!("stdin closed");
    }
    Ok(buf)
}
