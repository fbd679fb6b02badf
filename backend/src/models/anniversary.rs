//! Recurring anniversary computation.
//!
//! An [`AnniversaryClock`] resolves the next occurrence of a fixed calendar
//! date at local midnight in a fixed civil UTC offset, and the remaining
//! duration until it. Every operation is a pure function of the instant it is
//! given; nothing here reads the host time zone or keeps state between calls.
//!
//! An occurrence stays current for its whole 24 hour window
//! `[start, start + 1 day)`. Only once real time reaches the end of that window
//! does the clock move on to the following year.

use std::fmt;

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use super::time::{EpochMillis, MILLIS_PER_DAY, MILLIS_PER_MINUTE, MILLIS_PER_SECOND};

const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Rejected anniversary configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClockConfigError {
    #[error("Invalid month {0}: expected 1-12")]
    InvalidMonth(u32),

    #[error("Invalid day {day} for month {month}")]
    InvalidDay { month: u32, day: u32 },

    #[error("Invalid civil offset {0} minutes: must be strictly within ±24 hours")]
    InvalidOffset(i32),
}

/// Fixed signed offset from UTC. No daylight-saving adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CivilOffset(FixedOffset);

impl CivilOffset {
    /// Create an offset from signed minutes east of UTC (e.g. `330` for +05:30).
    pub fn from_minutes(minutes: i32) -> Result<Self, ClockConfigError> {
        if minutes.unsigned_abs() >= 24 * 60 {
            return Err(ClockConfigError::InvalidOffset(minutes));
        }
        FixedOffset::east_opt(minutes * 60)
            .map(Self)
            .ok_or(ClockConfigError::InvalidOffset(minutes))
    }

    pub fn minutes(&self) -> i32 {
        self.0.local_minus_utc() / 60
    }

    pub fn as_millis(&self) -> i64 {
        i64::from(self.minutes()) * MILLIS_PER_MINUTE
    }

    pub fn fixed_offset(&self) -> FixedOffset {
        self.0
    }
}

impl fmt::Display for CivilOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recurring month/day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnniversaryDate {
    month: u32,
    day: u32,
}

impl AnniversaryDate {
    /// Validate a month/day pair.
    ///
    /// A day is accepted if it exists in that month of a leap year, so
    /// February 29 is allowed.
    pub fn new(month: u32, day: u32) -> Result<Self, ClockConfigError> {
        if !(1..=12).contains(&month) {
            return Err(ClockConfigError::InvalidMonth(month));
        }
        NaiveDate::from_ymd_opt(2000, month, day)
            .map(|_| Self { month, day })
            .ok_or(ClockConfigError::InvalidDay { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Civil date of the occurrence in `year`.
    ///
    /// February 29 is observed on March 1 in common years. `None` only for
    /// years outside the supported calendar range.
    pub fn in_year(&self, year: i32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, self.month, self.day).or_else(|| {
            if self.month == 2 && self.day == 29 {
                NaiveDate::from_ymd_opt(year, 3, 1)
            } else {
                None
            }
        })
    }
}

impl fmt::Display for AnniversaryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}", self.month, self.day)
    }
}

/// One yearly instance of the anniversary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOccurrence {
    /// Local midnight of the anniversary date, as an absolute instant.
    pub epoch_millis: EpochMillis,
    /// Civil year (in the configured offset) of this occurrence.
    pub civil_year: i32,
}

impl TargetOccurrence {
    /// First instant after the 24 hour anniversary window.
    pub fn window_end(&self) -> EpochMillis {
        self.epoch_millis.saturating_add_millis(MILLIS_PER_DAY)
    }

    pub fn contains(&self, now: EpochMillis) -> bool {
        now >= self.epoch_millis && now < self.window_end()
    }
}

/// Whole seconds left until an occurrence, split for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemainingDuration {
    pub total_seconds: u64,
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl RemainingDuration {
    pub fn from_total_seconds(total_seconds: u64) -> Self {
        Self {
            total_seconds,
            days: total_seconds / SECONDS_PER_DAY,
            hours: (total_seconds / SECONDS_PER_HOUR) % 24,
            minutes: (total_seconds / SECONDS_PER_MINUTE) % 60,
            seconds: total_seconds % 60,
        }
    }

    /// Seconds represented by the decomposed fields.
    pub fn recomposed_seconds(&self) -> u64 {
        self.days * SECONDS_PER_DAY
            + self.hours * SECONDS_PER_HOUR
            + self.minutes * SECONDS_PER_MINUTE
            + self.seconds
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds == 0
    }
}

/// Display mode derived from the remaining duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CountdownPhase {
    CountingDown,
    AnniversaryActive,
}

impl fmt::Display for CountdownPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CountdownPhase::CountingDown => write!(f, "counting_down"),
            CountdownPhase::AnniversaryActive => write!(f, "anniversary_active"),
        }
    }
}

/// Everything a display needs for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownSnapshot {
    pub now_epoch_millis: EpochMillis,
    pub target: TargetOccurrence,
    pub remaining: RemainingDuration,
    pub phase: CountdownPhase,
}

/// Pure anniversary time computation for one date and civil offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnniversaryClock {
    date: AnniversaryDate,
    offset: CivilOffset,
}

impl AnniversaryClock {
    /// Build a clock, rejecting impossible dates and offsets.
    pub fn new(month: u32, day: u32, offset_minutes: i32) -> Result<Self, ClockConfigError> {
        Ok(Self::from_parts(
            AnniversaryDate::new(month, day)?,
            CivilOffset::from_minutes(offset_minutes)?,
        ))
    }

    pub fn from_parts(date: AnniversaryDate, offset: CivilOffset) -> Self {
        Self { date, offset }
    }

    pub fn date(&self) -> AnniversaryDate {
        self.date
    }

    pub fn offset(&self) -> CivilOffset {
        self.offset
    }

    /// Civil year of `now` in the configured offset.
    ///
    /// Instants beyond chrono's calendar are clamped to its first/last year.
    pub fn civil_year_at(&self, now: EpochMillis) -> i32 {
        let local = now.saturating_add_millis(self.offset.as_millis());
        match DateTime::from_timestamp_millis(local.value()) {
            Some(dt) => dt.year(),
            None if local.value() < 0 => NaiveDate::MIN.year(),
            None => NaiveDate::MAX.year(),
        }
    }

    /// Occurrence of the anniversary in a given civil year.
    pub fn occurrence_in_year(&self, civil_year: i32) -> TargetOccurrence {
        let epoch_millis = self
            .date
            .in_year(civil_year)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|local_midnight| {
                local_midnight
                    .and_utc()
                    .timestamp_millis()
                    .saturating_sub(self.offset.as_millis())
            })
            .unwrap_or(if civil_year < 0 { i64::MIN } else { i64::MAX });

        TargetOccurrence {
            epoch_millis: EpochMillis::new(epoch_millis),
            civil_year,
        }
    }

    /// The current occurrence: the one whose window contains `now`, or the
    /// nearest one in the future.
    pub fn next_occurrence_start(&self, now: EpochMillis) -> TargetOccurrence {
        let year = self.civil_year_at(now);
        let candidate = self.occurrence_in_year(year);

        if now >= candidate.window_end() {
            self.occurrence_in_year(year.saturating_add(1))
        } else {
            candidate
        }
    }

    /// Whole seconds until `target`, clamped to zero once it has started.
    pub fn remaining(&self, now: EpochMillis, target: &TargetOccurrence) -> RemainingDuration {
        let diff = i128::from(target.epoch_millis.value()) - i128::from(now.value());
        let total_seconds = if diff <= 0 {
            0
        } else {
            u64::try_from(diff / i128::from(MILLIS_PER_SECOND)).unwrap_or(u64::MAX)
        };
        RemainingDuration::from_total_seconds(total_seconds)
    }

    pub fn is_within_anniversary_window(
        &self,
        now: EpochMillis,
        target: &TargetOccurrence,
    ) -> bool {
        target.contains(now)
    }

    /// Display phase for `now` against `target`.
    ///
    /// The celebration starts as soon as the countdown shows zero, which also
    /// covers every instant inside the anniversary window. Once the window of
    /// `target` has ended the phase is back to counting down.
    pub fn phase(&self, now: EpochMillis, target: &TargetOccurrence) -> CountdownPhase {
        if now >= target.window_end() {
            CountdownPhase::CountingDown
        } else if self.is_within_anniversary_window(now, target)
            || self.remaining(now, target).is_zero()
        {
            CountdownPhase::AnniversaryActive
        } else {
            CountdownPhase::CountingDown
        }
    }

    /// Evaluate everything from scratch for `now`.
    pub fn snapshot(&self, now: EpochMillis) -> CountdownSnapshot {
        let target = self.next_occurrence_start(now);
        self.snapshot_for(now, target)
    }

    /// Evaluate against a previously computed target.
    pub fn snapshot_for(&self, now: EpochMillis, target: TargetOccurrence) -> CountdownSnapshot {
        CountdownSnapshot {
            now_epoch_millis: now,
            target,
            remaining: self.remaining(now, &target),
            phase: self.phase(now, &target),
        }
    }

    /// Local wall-clock start of an occurrence, if representable.
    pub fn local_start(&self, target: &TargetOccurrence) -> Option<DateTime<FixedOffset>> {
        target
            .epoch_millis
            .to_datetime()
            .map(|dt| dt.with_timezone(&self.offset.fixed_offset()))
    }
}
