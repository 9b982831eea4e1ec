use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use time::{macros::format_description, Date, Month, OffsetDateTime, PrimitiveDateTime};

/// Canonical calendar-day key, rendered as zero-padded `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(Date);

impl DateKey {
    pub fn date(self) -> Date {
        self.0
    }

    pub fn in_month(self, year: i32, month: Month) -> bool {
        self.0.year() == year && self.0.month() == month
    }
}

/// Key for the calendar day of `at`, as observed in the offset it carries.
pub fn to_date_key(at: OffsetDateTime) -> DateKey {
    DateKey(at.date())
}

/// Today's key. `time` refuses to read the local offset once other threads
/// are running, so inside the tokio runtime this is effectively the UTC day.
pub fn today() -> DateKey {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    to_date_key(now)
}

/// Parses a `YYYY-MM` month selector.
pub fn parse_month(s: &str) -> Option<(i32, Month)> {
    let (year, month) = s.trim().split_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month = Month::try_from(month.parse::<u8>().ok()?).ok()?;
    Some((year, month))
}

impl From<Date> for DateKey {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl From<PrimitiveDateTime> for DateKey {
    fn from(at: PrimitiveDateTime) -> Self {
        Self(at.date())
    }
}

impl From<OffsetDateTime> for DateKey {
    fn from(at: OffsetDateTime) -> Self {
        to_date_key(at)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}",
            self.0.year(),
            u8::from(self.0.month()),
            self.0.day()
        )
    }
}

impl FromStr for DateKey {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let format = format_description!("[year]-[month]-[day]");
        Date::parse(s.trim(), format).map(Self)
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
