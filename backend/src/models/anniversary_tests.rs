//! Property tests for the anniversary clock.

use proptest::prelude::*;

use super::anniversary::{AnniversaryClock, CountdownPhase, RemainingDuration};
use super::time::{EpochMillis, MILLIS_PER_DAY};

// 0001-01-01T00:00:00Z ..= 9999-12-31T23:59:59Z
const CALENDAR_MIN: i64 = -62_135_596_800_000;
const CALENDAR_MAX: i64 = 253_402_300_799_000;

fn clocks() -> impl Strategy<Value = AnniversaryClock> {
    (1u32..=12, 1u32..=31, -1439i32..=1439)
        .prop_filter_map("valid month/day", |(month, day, offset)| {
            AnniversaryClock::new(month, day, offset).ok()
        })
}

proptest! {
    #[test]
    fn prop_remaining_never_negative_and_recomposes(
        clock in clocks(),
        now in CALENDAR_MIN..CALENDAR_MAX,
    ) {
        let now = EpochMillis::new(now);
        let target = clock.next_occurrence_start(now);
        let remaining = clock.remaining(now, &target);
        prop_assert_eq!(remaining.recomposed_seconds(), remaining.total_seconds);
        prop_assert!(remaining.hours < 24);
        prop_assert!(remaining.minutes < 60);
        prop_assert!(remaining.seconds < 60);
    }

    #[test]
    fn prop_decomposition_roundtrip(total in 0u64..=u64::MAX / 2) {
        let d = RemainingDuration::from_total_seconds(total);
        prop_assert_eq!(d.recomposed_seconds(), total);
    }

    #[test]
    fn prop_next_occurrence_is_idempotent(clock in clocks(), now in any::<i64>()) {
        let now = EpochMillis::new(now);
        prop_assert_eq!(clock.next_occurrence_start(now), clock.next_occurrence_start(now));
    }

    #[test]
    fn prop_window_never_elapsed(clock in clocks(), now in CALENDAR_MIN..CALENDAR_MAX) {
        let now = EpochMillis::new(now);
        let target = clock.next_occurrence_start(now);
        prop_assert!(now < target.window_end());
        // Never skips a year: the previous occurrence has already ended.
        let previous = clock.occurrence_in_year(target.civil_year - 1);
        prop_assert!(now >= previous.window_end());
    }

    #[test]
    fn prop_window_boundaries(clock in clocks(), year in 1i32..9999) {
        let target = clock.occurrence_in_year(year);
        let start = target.epoch_millis;
        let last = start.saturating_add_millis(MILLIS_PER_DAY - 1);
        let end = start.saturating_add_millis(MILLIS_PER_DAY);

        prop_assert!(clock.is_within_anniversary_window(start, &target));
        prop_assert!(clock.remaining(start, &target).is_zero());
        prop_assert!(clock.is_within_anniversary_window(last, &target));
        prop_assert_eq!(clock.next_occurrence_start(last), target);
        prop_assert!(!clock.is_within_anniversary_window(end, &target));

        let following = clock.next_occurrence_start(end);
        prop_assert_eq!(following.civil_year, year + 1);
    }

    #[test]
    fn prop_phase_matches_countdown(clock in clocks(), now in CALENDAR_MIN..CALENDAR_MAX) {
        let snapshot = clock.snapshot(EpochMillis::new(now));
        let expected = if snapshot.remaining.is_zero() {
            CountdownPhase::AnniversaryActive
        } else {
            CountdownPhase::CountingDown
        };
        prop_assert_eq!(snapshot.phase, expected);
    }

    #[test]
    fn prop_any_instant_is_crash_free(clock in clocks(), now in any::<i64>()) {
        let snapshot = clock.snapshot(EpochMillis::new(now));
        prop_assert_eq!(snapshot.remaining.recomposed_seconds(), snapshot.remaining.total_seconds);
    }
}
