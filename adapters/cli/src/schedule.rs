use maze_chase_core::GhostMode;

/// Simulation rate the phase timings are expressed against.
pub(crate) const TICKS_PER_SECOND: u32 = 120;

/// Patrol and chase durations in seconds, one pair per phase. The final
/// chase stretch is long enough to outlast any session.
const PHASES: [(u32, u32); 4] = [(7, 20), (7, 20), (5, 20), (5, 100_000)];

/// Alternates the shared ghost mode between patrol and chase stretches.
///
/// A session opens with the first phase's patrol stretch, then alternates:
/// each patrol is followed by the current phase's chase stretch, and each
/// chase stretch ends by starting the next phase's patrol. The last phase
/// repeats forever.
#[derive(Debug)]
pub(crate) struct ModeSchedule {
    phase: usize,
    mode: GhostMode,
    remaining: u32,
}

impl ModeSchedule {
    pub(crate) fn new() -> Self {
        Self {
            phase: 1,
            mode: GhostMode::Patrol,
            remaining: PHASES[0].0 * TICKS_PER_SECOND,
        }
    }

    /// Counts one tick off the current stretch. Returns the new mode when
    /// the stretch ends, `None` otherwise.
    pub(crate) fn tick(&mut self) -> Option<GhostMode> {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining > 0 {
            return None;
        }
        match self.mode {
            GhostMode::Patrol => {
                self.mode = GhostMode::Chase;
                self.remaining = PHASES[self.phase].1 * TICKS_PER_SECOND;
            }
            GhostMode::Chase => {
                self.mode = GhostMode::Patrol;
                self.remaining = PHASES[self.phase].0 * TICKS_PER_SECOND;
                self.phase = (self.phase + 1).min(PHASES.len() - 1);
            }
        }
        Some(self.mode)
    }

    /// Records a mode change imposed outside the schedule, such as the
    /// patrol forced by a power pellet. The stretch timer keeps its
    /// cadence; only the branch taken at the next switch changes, so a
    /// forced patrol flips back to chase without consuming a phase.
    pub(crate) fn observe(&mut self, mode: GhostMode) {
        self.mode = mode;
    }

    #[cfg(test)]
    pub(crate) fn mode(&self) -> GhostMode {
        self.mode
    }
}
