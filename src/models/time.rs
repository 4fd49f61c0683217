use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors produced when parsing clock times or durations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// Not a valid `HH:MM` time of day
    #[error("invalid time of day: {0:?}")]
    InvalidTimeOfDay(String),
    /// Not a recognized duration form (`"2h"`, `"1.5h"`, `"45m"`, `"45min"`, bare hours)
    #[error("invalid duration: {0:?}")]
    InvalidDuration(String),
}

/// Clock time within a single day, stored as minutes since midnight.
///
/// Parses the `HH:MM` 24-hour form used throughout the block timeline,
/// tolerating `H:MM` and a trailing `AM`/`PM` marker on input. Always
/// renders back as zero-padded 24-hour `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    /// Build from an hour/minute pair. Returns `None` out of range.
    pub fn new(hour: u16, minute: u16) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self(hour * 60 + minute))
        } else {
            None
        }
    }

    /// Build from minutes since midnight, saturating at 23:59.
    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes.min(Self::MINUTES_PER_DAY as u32 - 1) as u16)
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u32 {
        self.0 as u32
    }

    pub fn hour(&self) -> u16 {
        self.0 / 60
    }

    pub fn minute(&self) -> u16 {
        self.0 % 60
    }

    /// Advance by `minutes`, saturating at the end of the day.
    pub fn plus_minutes(&self, minutes: u32) -> Self {
        Self::from_minutes(self.minutes() + minutes)
    }

    /// Minutes from `self` until `later`; zero when `later` is not after `self`.
    pub fn minutes_until(&self, later: TimeOfDay) -> u32 {
        later.minutes().saturating_sub(self.minutes())
    }

    /// Clamp into the inclusive range `[lo, hi]`.
    pub fn clamp_range(self, lo: TimeOfDay, hi: TimeOfDay) -> Self {
        Self(self.0.clamp(lo.0, hi.0))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_uppercase();
        let (body, meridiem) = if let Some(rest) = raw.strip_suffix("PM") {
            (rest.trim_end(), Some(true))
        } else if let Some(rest) = raw.strip_suffix("AM") {
            (rest.trim_end(), Some(false))
        } else {
            (raw.as_str(), None)
        };

        let mut parts = body.splitn(2, ':');
        let hour_part = parts.next().unwrap_or("");
        let minute_part = parts.next().unwrap_or("0");

        let mut hour: u16 = hour_part
            .trim()
            .parse()
            .map_err(|_| TimeError::InvalidTimeOfDay(s.to_string()))?;
        let minute: u16 = minute_part
            .trim()
            .parse()
            .map_err(|_| TimeError::InvalidTimeOfDay(s.to_string()))?;

        match meridiem {
            Some(true) if hour != 12 => hour += 12,
            Some(false) if hour == 12 => hour = 0,
            _ => {}
        }

        TimeOfDay::new(hour, minute).ok_or_else(|| TimeError::InvalidTimeOfDay(s.to_string()))
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Block duration, stored canonically as whole minutes.
///
/// Accepted input forms: `"2h"`, `"1.5h"`, `"45m"`, `"45min"`, `"45 minutes"`,
/// `"2 hours"`, and a bare number interpreted as hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DurationMin(u32);

impl DurationMin {
    pub fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub fn from_hours(hours: f64) -> Self {
        Self((hours * 60.0).round().max(0.0) as u32)
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for DurationMin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        if m >= 60 && m % 60 == 0 {
            write!(f, "{}h", m / 60)
        } else if m > 60 && m % 30 == 0 {
            write!(f, "{}.5h", m / 60)
        } else {
            write!(f, "{}m", m)
        }
    }
}

impl FromStr for DurationMin {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();
        if raw.is_empty() {
            return Err(TimeError::InvalidDuration(s.to_string()));
        }

        let parse_number = |text: &str| -> Result<f64, TimeError> {
            text.trim()
                .parse::<f64>()
                .map_err(|_| TimeError::InvalidDuration(s.to_string()))
        };

        if let Some(idx) = raw.find("min") {
            let minutes = parse_number(&raw[..idx])?;
            return Ok(Self(minutes.round().max(0.0) as u32));
        }
        if let Some(idx) = raw.find("hour") {
            let hours = parse_number(&raw[..idx])?;
            return Ok(Self::from_hours(hours));
        }
        if let Some(body) = raw.strip_suffix('h') {
            let hours = parse_number(body)?;
            return Ok(Self::from_hours(hours));
        }
        if let Some(body) = raw.strip_suffix('m') {
            let minutes = parse_number(body)?;
            return Ok(Self(minutes.round().max(0.0) as u32));
        }

        // Bare number: hours
        let hours = parse_number(&raw)?;
        Ok(Self::from_hours(hours))
    }
}

impl Serialize for DurationMin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DurationMin {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
