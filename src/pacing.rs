//! Pacing for the CPU's turn.
//!
//! The engine only signals [`Battle::ready_for_cpu_turn`]; this timer decides when the
//! CPU actually acts. A schedule remembers the engine sequence it was armed at and is
//! dropped instead of resolved if the encounter moved on in the meantime.

use crate::battle::{ActionReport, Battle};
use crate::rng::BattleRng;
use log::{debug, warn};
use std::time::{Duration, Instant};

pub const DEFAULT_CPU_DELAY: Duration = Duration::from_millis(1500);

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct PendingCpuTurn {
    due: Instant,
    sequence: u64,
}

#[derive(Clone, Debug)]
pub struct CpuTurnTimer {
    delay: Duration,
    pending: Option<PendingCpuTurn>,
}

impl Default for CpuTurnTimer {
    fn default() -> Self {
        CpuTurnTimer::new(DEFAULT_CPU_DELAY)
    }
}

impl CpuTurnTimer {
    pub fn new(delay: Duration) -> Self {
        CpuTurnTimer {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules the CPU turn if the engine is waiting for one. Re-arming for the same
    /// turn keeps the original deadline.
    pub fn arm<R: BattleRng>(&mut self, battle: &Battle<R>, now: Instant) -> bool {
        if !battle.ready_for_cpu_turn() {
            return false;
        }
        if let Some(pending) = self.pending {
            if pending.sequence == battle.sequence() {
                return true;
            }
        }
        self.pending = Some(PendingCpuTurn {
            due: now + self.delay,
            sequence: battle.sequence(),
        });
        debug!("cpu turn armed for sequence {}", battle.sequence());
        true
    }

    pub fn cancel(&mut self) {
        if self.pending.take().is_some() {
            debug!("cpu turn cancelled");
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left before the pending turn fires; `None` when nothing is scheduled.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.pending.map(|pending| pending.due.saturating_duration_since(now))
    }

    /// Fires the pending turn once it is due. Stale schedules are discarded.
    pub fn poll<R: BattleRng>(
        &mut self,
        battle: &mut Battle<R>,
        now: Instant,
    ) -> Option<ActionReport> {
        let pending = self.pending?;
        if now < pending.due {
            return None;
        }
        self.pending = None;
        if pending.sequence != battle.sequence() || !battle.ready_for_cpu_turn() {
            warn!(
                "dropping stale cpu turn armed at sequence {} (now {})",
                pending.sequence,
                battle.sequence()
            );
            return None;
        }
        battle.resolve_cpu_action()
    }
}
