//! Build timestamps in the `YYYY.MM.DDTHH.MM` release format.

use super::error::{Error, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone};
use std::{fmt, str::FromStr};

/// strftime pattern used in artifact names and the packaged build info.
pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%dT%H.%M";

/// Minute-resolution timestamp captured once per packaging run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    /// Current local time.
    pub fn now() -> Self {
        Self::from_datetime(&chrono::Local::now())
    }

    pub fn from_datetime<Tz>(datetime: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self(datetime.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Timestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map_err(|e| {
            Error::GenericError(format!(
                "invalid timestamp '{s}' (expected YYYY.MM.DDTHH.MM): {e}"
            ))
        })?;
        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
