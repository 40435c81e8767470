//! Wall-clock time pushed to the kit

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike};

use crate::error::{Error, Result};

/// Date and time in the kit's packed layout
///
/// ```text
/// [year: u16 LE][month][day][hour][minute][second]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KitDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl KitDateTime {
    /// Packed size in bytes
    pub const SIZE: usize = 7;

    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Result<Self> {
        if !(1..=12).contains(&month)
            || !(1..=31).contains(&day)
            || hour > 23
            || minute > 59
            || second > 59
        {
            return Err(Error::Validation(format!(
                "Invalid date/time {:04}-{:02}-{:02} {:02}:{:02}:{:02}",
                year, month, day, hour, minute, second
            )));
        }

        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
        })
    }

    /// Append the packed representation to `buf`
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.year.to_le_bytes());
        buf.extend_from_slice(&[self.month, self.day, self.hour, self.minute, self.second]);
    }
}

impl From<NaiveDateTime> for KitDateTime {
    fn from(dt: NaiveDateTime) -> Self {
        Self {
            year: dt.year().clamp(0, u16::MAX as i32) as u16,
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            // Leap seconds show up as second 59
            second: dt.second().min(59) as u8,
        }
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for KitDateTime {
    fn from(dt: DateTime<Tz>) -> Self {
        dt.naive_utc().into()
    }
}

impl fmt::Display for KitDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}
