use crate::animation::{Cue, CueTarget, CueTimeline};
use crate::model::Combatant;
use crate::moves::{
    compute_damage, heal_amount, player_move, ActionKind, MoveEffect, MoveSpec, CPU_POOL,
};
use crate::rng::{BattleRng, SeededRng};
use log::{debug, info};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Player,
    Cpu,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Cpu,
            Side::Cpu => Side::Player,
        }
    }

    fn cue_target(self) -> CueTarget {
        match self {
            Side::Player => CueTarget::Player,
            Side::Cpu => CueTarget::Cpu,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => f.write_str("player"),
            Side::Cpu => f.write_str("cpu"),
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    InProgress,
    Finished,
}

/// Reasons an encounter refuses to start.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BattleError {
    #[error("no {0} combatant was selected")]
    MissingCombatant(Side),
    #[error("the {0} combatant has no name")]
    UnnamedCombatant(Side),
    #[error("the {side} combatant {name} has no hit points")]
    NoHitPoints { side: Side, name: String },
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MoveOutcome {
    Hit { damage: u32 },
    Missed,
    /// `restored` is what actually landed after the max-HP cap.
    Healed { restored: u32 },
}

/// What one resolved action did.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ActionReport {
    pub actor: Side,
    pub action: ActionKind,
    pub outcome: MoveOutcome,
    pub message: String,
    pub player_hp: u32,
    pub cpu_hp: u32,
    pub finished: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CueSnapshot {
    pub player: Option<Cue>,
    pub cpu: Option<Cue>,
    pub flash: bool,
}

/// Everything a presentation layer needs to draw one frame.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BattleSnapshot {
    pub player_name: String,
    pub cpu_name: String,
    pub player_hp: u32,
    pub cpu_hp: u32,
    pub max_player_hp: u32,
    pub max_cpu_hp: u32,
    pub turn: Side,
    pub phase: Phase,
    pub winner: Option<Side>,
    pub log: String,
    pub cues: CueSnapshot,
}

#[derive(Clone, Debug)]
struct Battler {
    combatant: Combatant,
    current_hp: u32,
    max_hp: u32,
}

impl Battler {
    fn new(side: Side, combatant: Combatant) -> Result<Self, BattleError> {
        if combatant.name.trim().is_empty() {
            return Err(BattleError::UnnamedCombatant(side));
        }
        // Refused instead of substituting a default pool of hit points.
        if combatant.base.hp == 0 {
            return Err(BattleError::NoHitPoints {
                side,
                name: combatant.name,
            });
        }
        let max_hp = combatant.base.hp;
        Ok(Battler {
            combatant,
            current_hp: max_hp,
            max_hp,
        })
    }

    fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }
}

/// One player-versus-CPU encounter.
///
/// State only changes through [`Battle::submit_player_action`] and
/// [`Battle::resolve_cpu_action`]; both check whose turn it is and ignore calls that
/// arrive out of turn or after the battle ended.
#[derive(Clone, Debug)]
pub struct Battle<R: BattleRng = SeededRng> {
    player: Battler,
    cpu: Battler,
    turn: Side,
    phase: Phase,
    winner: Option<Side>,
    log: String,
    cues: CueTimeline,
    sequence: u64,
    rng: R,
}

impl Battle<SeededRng> {
    pub fn seeded(player: Combatant, cpu: Combatant, seed: u64) -> Result<Self, BattleError> {
        Battle::new(player, cpu, SeededRng::new(seed))
    }
}

impl<R: BattleRng> Battle<R> {
    pub fn new(player: Combatant, cpu: Combatant, rng: R) -> Result<Self, BattleError> {
        let player = Battler::new(Side::Player, player)?;
        let cpu = Battler::new(Side::Cpu, cpu)?;
        let log = format!(
            "Un combat commence entre {} et {} !",
            player.combatant.name, cpu.combatant.name
        );
        info!(
            "battle started: {} ({} HP) vs {} ({} HP)",
            player.combatant.name, player.max_hp, cpu.combatant.name, cpu.max_hp
        );
        Ok(Battle {
            player,
            cpu,
            turn: Side::Player,
            phase: Phase::InProgress,
            winner: None,
            log,
            cues: CueTimeline::new(),
            sequence: 0,
            rng,
        })
    }

    /// Starts from a selection flow that may not have produced both combatants.
    pub fn from_selection(
        player: Option<Combatant>,
        cpu: Option<Combatant>,
        rng: R,
    ) -> Result<Self, BattleError> {
        let player = player.ok_or(BattleError::MissingCombatant(Side::Player))?;
        let cpu = cpu.ok_or(BattleError::MissingCombatant(Side::Cpu))?;
        Battle::new(player, cpu, rng)
    }

    fn battler(&self, side: Side) -> &Battler {
        match side {
            Side::Player => &self.player,
            Side::Cpu => &self.cpu,
        }
    }

    fn battler_mut(&mut self, side: Side) -> &mut Battler {
        match side {
            Side::Player => &mut self.player,
            Side::Cpu => &mut self.cpu,
        }
    }

    pub fn player_hp(&self) -> u32 {
        self.player.current_hp
    }

    pub fn cpu_hp(&self) -> u32 {
        self.cpu.current_hp
    }

    pub fn max_player_hp(&self) -> u32 {
        self.player.max_hp
    }

    pub fn max_cpu_hp(&self) -> u32 {
        self.cpu.max_hp
    }

    pub fn turn(&self) -> Side {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn log(&self) -> &str {
        &self.log
    }

    pub fn cues(&self) -> &CueTimeline {
        &self.cues
    }

    /// Ages animation cues. Touches nothing but the cue timeline.
    pub fn advance_cues(&mut self, dt: Duration) {
        self.cues.advance(dt);
    }

    /// Number of actions resolved so far; a CPU schedule armed at one value is stale at
    /// any other.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn is_player_turn(&self) -> bool {
        self.phase == Phase::InProgress && self.turn == Side::Player
    }

    /// Raised as soon as control passes to the CPU.
    pub fn ready_for_cpu_turn(&self) -> bool {
        self.phase == Phase::InProgress && self.turn == Side::Cpu
    }

    pub fn submit_player_action(&mut self, action: ActionKind) -> Option<ActionReport> {
        if !self.is_player_turn() {
            debug!(
                "ignoring player action {:?}: turn={:?} phase={:?}",
                action, self.turn, self.phase
            );
            return None;
        }
        Some(self.execute_move(Side::Player, player_move(action)))
    }

    /// Resolves one CPU action drawn from [`CPU_POOL`]. No-op unless the CPU is to act.
    pub fn resolve_cpu_action(&mut self) -> Option<ActionReport> {
        if !self.ready_for_cpu_turn() {
            debug!(
                "ignoring cpu resolution: turn={:?} phase={:?}",
                self.turn, self.phase
            );
            return None;
        }
        let idx = self.rng.pick(CPU_POOL.len());
        let spec = CPU_POOL[idx.min(CPU_POOL.len() - 1)];
        Some(self.execute_move(Side::Cpu, spec))
    }

    fn execute_move(&mut self, actor: Side, spec: MoveSpec) -> ActionReport {
        let target = actor.opponent();
        let outcome = match spec.effect {
            MoveEffect::Damage { power } => {
                // The miss roll comes first; a miss draws no damage factor.
                if self.rng.misses(spec.miss_chance) {
                    MoveOutcome::Missed
                } else {
                    let factor = self.rng.damage_factor();
                    let damage = compute_damage(
                        &self.battler(actor).combatant.base,
                        &self.battler(target).combatant.base,
                        power,
                        factor,
                    );
                    let defender = self.battler_mut(target);
                    defender.current_hp = defender.current_hp.saturating_sub(damage);
                    self.cues.emit(CueTimeline::hit(
                        actor.cue_target(),
                        target.cue_target(),
                        spec.flash,
                    ));
                    MoveOutcome::Hit { damage }
                }
            }
            MoveEffect::Heal => {
                let healer = self.battler_mut(actor);
                let before = healer.current_hp;
                healer.current_hp = before
                    .saturating_add(heal_amount(healer.max_hp))
                    .min(healer.max_hp);
                MoveOutcome::Healed {
                    restored: healer.current_hp - before,
                }
            }
        };

        self.log = describe(&self.battler(actor).combatant.name, actor, spec.kind, &outcome);
        self.sequence += 1;
        debug!(
            "{} {:?} -> {:?} (player {} / cpu {})",
            actor, spec.kind, outcome, self.player.current_hp, self.cpu.current_hp
        );

        if self.battler(target).is_fainted() {
            self.phase = Phase::Finished;
            self.winner = Some(actor);
            info!(
                "battle finished: {} wins with {} HP left",
                self.battler(actor).combatant.name,
                self.battler(actor).current_hp
            );
        } else {
            self.turn = target;
        }

        ActionReport {
            actor,
            action: spec.kind,
            outcome,
            message: self.log.clone(),
            player_hp: self.player.current_hp,
            cpu_hp: self.cpu.current_hp,
            finished: self.is_finished(),
        }
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            player_name: self.player.combatant.name.clone(),
            cpu_name: self.cpu.combatant.name.clone(),
            player_hp: self.player.current_hp,
            cpu_hp: self.cpu.current_hp,
            max_player_hp: self.player.max_hp,
            max_cpu_hp: self.cpu.max_hp,
            turn: self.turn,
            phase: self.phase,
            winner: self.winner,
            log: self.log.clone(),
            cues: CueSnapshot {
                player: self.cues.active(CueTarget::Player),
                cpu: self.cues.active(CueTarget::Cpu),
                flash: self.cues.flash(),
            },
        }
    }
}

fn describe(name: &str, actor: Side, kind: ActionKind, outcome: &MoveOutcome) -> String {
    match (actor, outcome, kind) {
        (Side::Player, MoveOutcome::Missed, _) => format!("{name} rate son attaque !"),
        (Side::Cpu, MoveOutcome::Missed, _) => format!("{name} adverse rate son attaque !"),
        (_, _, ActionKind::Heal) => format!("{name} utilise Soin !"),
        (Side::Player, _, ActionKind::Quick) => format!("{name} utilise Vive-Attaque !"),
        (Side::Player, _, ActionKind::Heavy) => format!("{name} lance une attaque puissante !"),
        (Side::Player, _, ActionKind::Special) => format!("{name} utilise sa capacité spéciale !"),
        (Side::Cpu, _, ActionKind::Quick) => format!("{name} adverse utilise Charge !"),
        (Side::Cpu, _, ActionKind::Heavy) => format!("{name} adverse utilise Ultralaser !"),
        (Side::Cpu, _, ActionKind::Special) => format!("{name} adverse utilise une attaque obscure !"),
    }
}
