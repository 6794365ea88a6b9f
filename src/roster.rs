//! Catalogue loading and combatant selection for an encounter.

use crate::model::{Catalogue, Pokemon};
use crate::rng::BattleRng;
use anyhow::Context;
use log::{info, warn};
use std::collections::HashSet;
use std::path::Path;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Arena {
    pub id: &'static str,
    pub name: &'static str,
}

pub const ARENAS: [Arena; 4] = [
    Arena {
        id: "stadium",
        name: "Stade de la Ligue",
    },
    Arena {
        id: "forest",
        name: "Forêt de Jade",
    },
    Arena {
        id: "volcano",
        name: "Mont Braise",
    },
    Arena {
        id: "ocean",
        name: "Îles Écume",
    },
];

pub fn find_arena(id: &str) -> Option<Arena> {
    ARENAS
        .iter()
        .find(|arena| arena.id.eq_ignore_ascii_case(id.trim()))
        .copied()
}

pub fn load_catalogue(path: &Path) -> anyhow::Result<Catalogue> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalogue at {}", path.display()))?;
    let catalogue: Catalogue = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))?;
    info!(
        "loaded {} pokemons and {} teams from {}",
        catalogue.pokemons.len(),
        catalogue.teams.len(),
        path.display()
    );
    Ok(catalogue)
}

/// Every team member once, in team order. Members that cannot fight (no HP) are skipped.
pub fn champions(catalogue: &Catalogue) -> Vec<Pokemon> {
    let mut seen = HashSet::new();
    let mut members = Vec::new();
    for team in &catalogue.teams {
        for member in &team.members {
            if member.base.hp == 0 {
                warn!("skipping {} from team {}: no HP", member.name.display(), team.name);
                continue;
            }
            if seen.insert(member.key()) {
                members.push(member.clone());
            }
        }
    }
    members
}

/// Entries able to fight among the first `limit` of the catalogue; fainted ones are
/// dropped, not replaced, so the pool may be shorter than `limit`.
pub fn opponent_pool(catalogue: &Catalogue, limit: usize) -> Vec<Pokemon> {
    catalogue
        .pokemons
        .iter()
        .take(limit)
        .filter(|p| p.base.hp > 0)
        .cloned()
        .collect()
}

pub fn pick_opponent<'a, R: BattleRng>(pool: &'a [Pokemon], rng: &mut R) -> Option<&'a Pokemon> {
    if pool.is_empty() {
        return None;
    }
    pool.get(rng.pick(pool.len()))
}

/// Carousel step for the champion picker; wraps at both ends.
pub fn cycle_index(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    match (forward, current) {
        (true, c) if c + 1 >= len => 0,
        (true, c) => c + 1,
        (false, 0) => len - 1,
        (false, c) => (c - 1).min(len - 1),
    }
}
