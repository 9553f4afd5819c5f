use std::{fmt, str::FromStr, sync::Arc};

use chrono::{
    DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeDelta, TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::Tz;
use thiserror::Error;

/// Civil timezone every tariff is defined in. Daylight saving is handled by the tz database.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Paris;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown timezone identifier: {0}")]
    UnknownTimezone(String),
}

pub fn parse_timezone(name: &str) -> Result<Tz, self::Error> {
    Tz::from_str(name).map_err(|_| self::Error::UnknownTimezone(name.to_string()))
}

/// Time of day as seconds since midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Time(u32);

impl Time {
    pub const fn from_hm(hours: u32, minutes: u32) -> Self {
        Self(hours * 3600 + minutes * 60)
    }

    pub const fn as_seconds(&self) -> u32 {
        self.0
    }

    pub fn to_hms_string(&self) -> String {
        let h = self.0 / 3600;
        let m = (self.0 % 3600) / 60;
        let s = self.0 % 60;
        format!("{:02}:{:02}:{:02}", h, m, s)
    }
}

/// Night period, usually wrapping around midnight. Both boundaries belong to the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightWindow {
    pub start: Time,
    pub end: Time,
}

impl NightWindow {
    pub const fn new(start: Time, end: Time) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        let secs = time.num_seconds_from_midnight();
        let after_start = secs >= self.start.as_seconds();
        // 07:00:00.5 is already past a 07:00 end
        let past_end = secs > self.end.as_seconds()
            || (secs == self.end.as_seconds() && time.nanosecond() > 0);
        if self.start <= self.end {
            after_start && !past_end
        } else {
            after_start || !past_end
        }
    }
}

impl fmt::Display for NightWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.to_hms_string(),
            self.end.to_hms_string()
        )
    }
}

pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// Source of the current instant. Swapped for a [`FixedClock`] in tests.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new<T: TimeZone>(instant: DateTime<T>) -> Self {
        Self(instant.with_timezone(&Utc))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A timestamp as supplied by a caller, with or without an UTC offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Self::Naive(value)
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::Zoned(value)
    }
}

impl From<DateTime<Tz>> for Timestamp {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Zoned(value.fixed_offset())
    }
}

impl Timestamp {
    /// Accepts RFC 3339 as well as ISO 8601 date-times without an offset.
    pub fn parse(value: &str) -> Option<Self> {
        const NAIVE_FORMATS: [&str; 3] = [
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%dT%H:%M",
        ];
        let value = value.trim();
        if let Ok(zoned) = DateTime::parse_from_rfc3339(value) {
            return Some(Self::Zoned(zoned));
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .map(Self::Naive)
    }
}

/// Attaches the offset `timezone` had at that wall-clock time.
///
/// Wall times made ambiguous or skipped by a DST change resolve to standard
/// time, and the wall clock is kept as given.
pub fn localize(naive: NaiveDateTime, timezone: Tz) -> DateTime<FixedOffset> {
    match timezone.from_local_datetime(&naive) {
        LocalResult::Single(local) => local.fixed_offset(),
        LocalResult::Ambiguous(_, latest) => latest.fixed_offset(),
        LocalResult::None => {
            // Offset in force before the gap, a day earlier is clear of the transition
            let offset = timezone
                .offset_from_local_datetime(&(naive - TimeDelta::days(1)))
                .latest()
                .map(|offset| offset.fix())
                .unwrap_or_else(|| timezone.offset_from_utc_datetime(&naive).fix());
            let utc = naive - TimeDelta::seconds(offset.local_minus_utc().into());
            DateTime::from_naive_utc_and_offset(utc, offset)
        }
    }
}

/// Wall-clock source for one civil timezone.
#[derive(Clone)]
pub struct CivilClock {
    timezone: Tz,
    clock: Arc<dyn Clock>,
}

impl Default for CivilClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl fmt::Debug for CivilClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CivilClock")
            .field("timezone", &self.timezone)
            .finish_non_exhaustive()
    }
}

impl CivilClock {
    pub fn new(timezone: Tz) -> Self {
        Self {
            timezone,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.clock.now().with_timezone(&self.timezone).fixed_offset()
    }

    /// Missing timestamps mean "now". Naive ones are read as local civil time,
    /// zoned ones keep their own offset.
    pub fn resolve(&self, timestamp: Option<Timestamp>) -> DateTime<FixedOffset> {
        match timestamp {
            None => self.now(),
            Some(Timestamp::Naive(naive)) => localize(naive, self.timezone),
            Some(Timestamp::Zoned(zoned)) => zoned,
        }
    }
}

#[test]
fn window_display() {
    let window = NightWindow::new(Time::from_hm(19, 0), Time::from_hm(7, 0));
    assert_eq!(window.to_string(), "19:00:00 - 07:00:00");
}
