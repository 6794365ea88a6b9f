use crate::model::BaseStats;
use serde::{Deserialize, Serialize};

pub const MIN_DAMAGE: u32 = 5;
pub const HEAL_FRACTION: f64 = 0.30;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActionKind {
    Quick,
    Heavy,
    Heal,
    Special,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Quick,
        ActionKind::Heavy,
        ActionKind::Heal,
        ActionKind::Special,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActionKind::Quick => "VIVE-ATTAQUE",
            ActionKind::Heavy => "ATTAQUE LOURDE",
            ActionKind::Heal => "SOIN (MAX 30%)",
            ActionKind::Special => "SPÉCIAL",
        }
    }

    /// Accepts menu numbers, English kinds and the French button labels.
    pub fn parse(input: &str) -> Option<ActionKind> {
        let key = input.trim().to_lowercase();
        ACTION_KEYWORDS.get(key.as_str()).copied()
    }
}

static ACTION_KEYWORDS: phf::Map<&'static str, ActionKind> = phf::phf_map! {
    "1" => ActionKind::Quick,
    "q" => ActionKind::Quick,
    "quick" => ActionKind::Quick,
    "vive-attaque" => ActionKind::Quick,
    "2" => ActionKind::Heavy,
    "h" => ActionKind::Heavy,
    "heavy" => ActionKind::Heavy,
    "lourde" => ActionKind::Heavy,
    "3" => ActionKind::Heal,
    "s" => ActionKind::Heal,
    "heal" => ActionKind::Heal,
    "soin" => ActionKind::Heal,
    "4" => ActionKind::Special,
    "x" => ActionKind::Special,
    "special" => ActionKind::Special,
    "spécial" => ActionKind::Special,
};

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MoveEffect {
    Damage { power: u32 },
    /// Restores a fraction of the actor's max HP.
    Heal,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MoveSpec {
    pub kind: ActionKind,
    pub effect: MoveEffect,
    pub miss_chance: f64,
    /// Heavy hits flash the whole screen.
    pub flash: bool,
}

const fn damage(kind: ActionKind, power: u32, miss_chance: f64, flash: bool) -> MoveSpec {
    MoveSpec {
        kind,
        effect: MoveEffect::Damage { power },
        miss_chance,
        flash,
    }
}

pub const PLAYER_QUICK: MoveSpec = damage(ActionKind::Quick, 30, 0.0, false);
pub const PLAYER_HEAVY: MoveSpec = damage(ActionKind::Heavy, 60, 0.2, true);
pub const PLAYER_HEAL: MoveSpec = MoveSpec {
    kind: ActionKind::Heal,
    effect: MoveEffect::Heal,
    miss_chance: 0.0,
    flash: false,
};
pub const PLAYER_SPECIAL: MoveSpec = damage(ActionKind::Special, 45, 0.0, false);

pub const CPU_QUICK: MoveSpec = damage(ActionKind::Quick, 30, 0.0, false);
pub const CPU_HEAVY: MoveSpec = damage(ActionKind::Heavy, 50, 0.0, true);
pub const CPU_SPECIAL: MoveSpec = damage(ActionKind::Special, 40, 0.0, false);

/// Quick appears twice, so it is drawn twice as often.
pub const CPU_POOL: [MoveSpec; 4] = [CPU_QUICK, CPU_QUICK, CPU_HEAVY, CPU_SPECIAL];

pub fn player_move(kind: ActionKind) -> MoveSpec {
    match kind {
        ActionKind::Quick => PLAYER_QUICK,
        ActionKind::Heavy => PLAYER_HEAVY,
        ActionKind::Heal => PLAYER_HEAL,
        ActionKind::Special => PLAYER_SPECIAL,
    }
}

/// `floor(atk / def * power * factor)`, at least [`MIN_DAMAGE`]. A non-positive
/// defense counts as 1.
pub fn compute_damage(attacker: &BaseStats, defender: &BaseStats, power: u32, factor: f64) -> u32 {
    let defense = defender.defense.max(1) as f64;
    let raw = (attacker.attack as f64 / defense) * power as f64 * factor;
    let floored = if raw.is_finite() && raw > 0.0 {
        raw.floor().min(u32::MAX as f64) as u32
    } else {
        0
    };
    floored.max(MIN_DAMAGE)
}

pub fn heal_amount(max_hp: u32) -> u32 {
    (max_hp as f64 * HEAL_FRACTION).floor() as u32
}
