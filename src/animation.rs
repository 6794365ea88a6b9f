//! Transient animation cues. Purely observational: nothing in the engine reads them back.

use serde::Serialize;
use std::time::Duration;

pub const CUE_DURATION: Duration = Duration::from_millis(500);
pub const HIT_DELAY: Duration = Duration::from_millis(300);
pub const FLASH_DURATION: Duration = Duration::from_millis(100);

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CueTarget {
    Player,
    Cpu,
    Screen,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Thrust,
    Shake,
    Flash,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ScheduledCue {
    pub target: CueTarget,
    pub cue: Cue,
    pub starts_after: Duration,
    pub lasts: Duration,
}

/// Cues emitted by recent actions, aged by [`CueTimeline::advance`].
#[derive(Clone, Debug, Default, Serialize)]
pub struct CueTimeline {
    cues: Vec<ScheduledCue>,
    #[serde(skip)]
    elapsed: Duration,
}

impl CueTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues for one hit: thrust on the attacker, shake on the target after the hit
    /// delay, plus a screen flash for heavy hits.
    pub fn hit(attacker: CueTarget, target: CueTarget, flash: bool) -> Vec<ScheduledCue> {
        let mut cues = vec![
            ScheduledCue {
                target: attacker,
                cue: Cue::Thrust,
                starts_after: Duration::ZERO,
                lasts: CUE_DURATION,
            },
            ScheduledCue {
                target,
                cue: Cue::Shake,
                starts_after: HIT_DELAY,
                lasts: CUE_DURATION,
            },
        ];
        if flash {
            cues.push(ScheduledCue {
                target: CueTarget::Screen,
                cue: Cue::Flash,
                starts_after: HIT_DELAY,
                lasts: FLASH_DURATION,
            });
        }
        cues
    }

    /// Schedules cues relative to the current timeline clock.
    pub fn emit(&mut self, cues: impl IntoIterator<Item = ScheduledCue>) {
        let now = self.elapsed;
        self.cues.extend(cues.into_iter().map(|mut cue| {
            cue.starts_after += now;
            cue
        }));
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
        let now = self.elapsed;
        self.cues.retain(|cue| cue.starts_after + cue.lasts > now);
        if self.cues.is_empty() {
            self.elapsed = Duration::ZERO;
        }
    }

    /// The most recently emitted cue showing on `target` right now.
    pub fn active(&self, target: CueTarget) -> Option<Cue> {
        let now = self.elapsed;
        self.cues
            .iter()
            .rev()
            .find(|cue| cue.target == target && cue.starts_after <= now)
            .map(|cue| cue.cue)
    }

    pub fn flash(&self) -> bool {
        self.active(CueTarget::Screen) == Some(Cue::Flash)
    }

    pub fn is_idle(&self) -> bool {
        self.cues.is_empty()
    }
}
