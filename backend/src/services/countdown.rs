//! Poll-driven countdown state.
//!
//! [`CountdownTicker`] is the consumer side of the anniversary clock: it is
//! fed the current instant on a fixed cadence, keeps the last target around
//! until its window ends, and tracks the counting-down / celebration state
//! machine. Every tick is computed from the instant it is given, so a missed
//! tick never accumulates drift.

use tracing::{debug, info};

use crate::models::{
    AnniversaryClock, CountdownPhase, CountdownSnapshot, EpochMillis, TargetOccurrence,
};

/// A change of display phase observed between two ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: CountdownPhase,
    pub to: CountdownPhase,
    pub at: EpochMillis,
}

/// Caches the current occurrence and tracks phase changes.
#[derive(Debug, Clone)]
pub struct CountdownTicker {
    clock: AnniversaryClock,
    target: Option<TargetOccurrence>,
    phase: Option<CountdownPhase>,
    last_transition: Option<PhaseTransition>,
}

impl CountdownTicker {
    pub fn new(clock: AnniversaryClock) -> Self {
        Self {
            clock,
            target: None,
            phase: None,
            last_transition: None,
        }
    }

    pub fn clock(&self) -> &AnniversaryClock {
        &self.clock
    }

    /// Current phase, `None` before the first tick.
    pub fn phase(&self) -> Option<CountdownPhase> {
        self.phase
    }

    pub fn target(&self) -> Option<TargetOccurrence> {
        self.target
    }

    /// Transition recorded by the most recent tick, if that tick changed phase.
    pub fn last_transition(&self) -> Option<PhaseTransition> {
        self.last_transition
    }

    /// Evaluate one tick at `now`.
    pub fn tick(&mut self, now: EpochMillis) -> CountdownSnapshot {
        let target = match self.target {
            Some(target) if now < target.window_end() => target,
            previous => {
                let next = self.clock.next_occurrence_start(now);
                if previous.is_some_and(|p| p != next) {
                    debug!(
                        civil_year = next.civil_year,
                        "Anniversary window ended, moving to next occurrence"
                    );
                }
                self.target = Some(next);
                next
            }
        };

        let snapshot = self.clock.snapshot_for(now, target);

        self.last_transition = match self.phase {
            Some(from) if from != snapshot.phase => {
                info!(
                    %from,
                    to = %snapshot.phase,
                    civil_year = target.civil_year,
                    "Countdown phase changed"
                );
                Some(PhaseTransition {
                    from,
                    to: snapshot.phase,
                    at: now,
                })
            }
            _ => None,
        };
        self.phase = Some(snapshot.phase);

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MILLIS_PER_DAY;

    fn ticker() -> CountdownTicker {
        CountdownTicker::new(AnniversaryClock::new(5, 25, 330).unwrap())
    }

    #[test]
    fn test_initial_phase_counting_down() {
        let mut t = ticker();
        let start = t.clock().occurrence_in_year(2024).epoch_millis;
        let snap = t.tick(start.saturating_add_millis(-10_000));
        assert_eq!(snap.phase, CountdownPhase::CountingDown);
        assert_eq!(t.phase(), Some(CountdownPhase::CountingDown));
        assert!(t.last_transition().is_none());
    }

    #[test]
    fn test_initial_phase_inside_window() {
        let mut t = ticker();
        let start = t.clock().occurrence_in_year(2024).epoch_millis;
        let snap = t.tick(start.saturating_add_millis(3_600_000));
        assert_eq!(snap.phase, CountdownPhase::AnniversaryActive);
        assert!(t.last_transition().is_none());
    }

    #[test]
    fn test_full_cycle() {
        let mut t = ticker();
        let start = t.clock().occurrence_in_year(2024).epoch_millis;

        t.tick(start.saturating_add_millis(-2_000));
        let snap = t.tick(start);
        assert_eq!(snap.phase, CountdownPhase::AnniversaryActive);
        let transition = t.last_transition().unwrap();
        assert_eq!(transition.from, CountdownPhase::CountingDown);
        assert_eq!(transition.to, CountdownPhase::AnniversaryActive);
        assert_eq!(transition.at, start);

        let snap = t.tick(start.saturating_add_millis(MILLIS_PER_DAY - 1));
        assert_eq!(snap.phase, CountdownPhase::AnniversaryActive);
        assert_eq!(snap.target.civil_year, 2024);
        assert!(t.last_transition().is_none());

        let snap = t.tick(start.saturating_add_millis(MILLIS_PER_DAY));
        assert_eq!(snap.phase, CountdownPhase::CountingDown);
        assert_eq!(snap.target.civil_year, 2025);
        assert_eq!(t.target().unwrap().civil_year, 2025);
        assert_eq!(
            t.last_transition().map(|tr| tr.to),
            Some(CountdownPhase::CountingDown)
        );
    }

    #[test]
    fn test_cached_target_matches_fresh_evaluation() {
        let mut t = ticker();
        let start = t.clock().occurrence_in_year(2030).epoch_millis;
        let mut now = start.saturating_add_millis(-5 * MILLIS_PER_DAY);
        while now < start.saturating_add_millis(2 * MILLIS_PER_DAY) {
            let snap = t.tick(now);
            assert_eq!(snap, t.clock().snapshot(now));
            now = now.saturating_add_millis(3_600_000);
        }
    }

    #[test]
    fn test_skipped_ticks_self_correct() {
        let mut t = ticker();
        let start = t.clock().occurrence_in_year(2024).epoch_millis;
        t.tick(start.saturating_add_millis(-MILLIS_PER_DAY));
        // jump straight past the whole window
        let snap = t.tick(start.saturating_add_millis(MILLIS_PER_DAY + 1));
        assert_eq!(snap.target.civil_year, 2025);
        assert_eq!(snap.phase, CountdownPhase::CountingDown);
        assert!(t.last_transition().is_none());
    }
}
