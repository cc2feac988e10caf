use crate::error::DateError;
use chrono::{Local, NaiveDate, Utc};
use core::{
    fmt::{self, Display},
    str::FromStr,
};

/// The day that calendar parts of a scheme are rendered from.
///
/// ```
/// use calbump::Date;
///
/// let date: Date = "2024-09-16".parse().unwrap();
/// assert_eq!(Date::explicit(2024, 9, 16).unwrap(), date);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date(NaiveDate);

impl Date {
    /// Today in UTC. This is the date used when none is given.
    pub fn utc_now() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Today in the system's timezone.
    pub fn local_now() -> Self {
        Self(Local::now().date_naive())
    }

    /// # Errors
    ///
    /// Returns [DateError::InvalidDateArguments] if there is no such day, like February 30th.
    pub fn explicit(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateError::InvalidDateArguments { year, month, day })
    }

    /// The underlying calendar day.
    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Parses `YYYY-MM-DD`. Month and day may omit their leading zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
