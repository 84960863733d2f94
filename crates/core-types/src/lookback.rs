// In crates/core-types/src/lookback.rs

use crate::error::{Error, Result};
use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookbackUnit {
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl LookbackUnit {
    fn suffix(&self) -> &'static str {
        match self {
            LookbackUnit::Minutes => "m",
            LookbackUnit::Hours => "h",
            LookbackUnit::Days => "d",
            LookbackUnit::Weeks => "w",
            LookbackUnit::Months => "mo",
            LookbackUnit::Years => "y",
        }
    }
}

/// How far back from "now" a price history request reaches, written the way
/// data vendors spell periods: `90m`, `12h`, `504d`, `6mo`, `2y`.
///
/// Months and years are calendar-aware, so `1mo` before March 31st lands on
/// the last day of February.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Lookback {
    pub amount: u32,
    pub unit: LookbackUnit,
}

impl Lookback {
    pub fn new(amount: u32, unit: LookbackUnit) -> Self {
        Self { amount, unit }
    }

    /// The instant `self` before `end`.
    pub fn start_from(&self, end: DateTime<Utc>) -> Result<DateTime<Utc>> {
        let amount = i64::from(self.amount);
        let start = match self.unit {
            LookbackUnit::Minutes => TimeDelta::try_minutes(amount).and_then(|d| end.checked_sub_signed(d)),
            LookbackUnit::Hours => TimeDelta::try_hours(amount).and_then(|d| end.checked_sub_signed(d)),
            LookbackUnit::Days => TimeDelta::try_days(amount).and_then(|d| end.checked_sub_signed(d)),
            LookbackUnit::Weeks => TimeDelta::try_weeks(amount).and_then(|d| end.checked_sub_signed(d)),
            LookbackUnit::Months => end.checked_sub_months(Months::new(self.amount)),
            LookbackUnit::Years => self
                .amount
                .checked_mul(12)
                .and_then(|months| end.checked_sub_months(Months::new(months))),
        };
        start.ok_or_else(|| Error::LookbackOutOfRange(self.to_string()))
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.suffix())
    }
}

impl FromStr for Lookback {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().to_ascii_lowercase();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| Error::InvalidLookback(s.to_string()))?;
        let (digits, suffix) = trimmed.split_at(split);

        let amount: u32 = digits
            .parse()
            .map_err(|_| Error::InvalidLookback(s.to_string()))?;
        if amount == 0 {
            return Err(Error::InvalidLookback(s.to_string()));
        }

        let unit = match suffix {
            "m" | "min" => LookbackUnit::Minutes,
            "h" => LookbackUnit::Hours,
            "d" => LookbackUnit::Days,
            "w" | "wk" => LookbackUnit::Weeks,
            "mo" => LookbackUnit::Months,
            "y" => LookbackUnit::Years,
            _ => return Err(Error::InvalidLookback(s.to_string())),
        };

        Ok(Lookback { amount, unit })
    }
}

impl TryFrom<String> for Lookback {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Lookback> for String {
    fn from(value: Lookback) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_vendor_period_strings() {
        assert_eq!("2y".parse::<Lookback>().unwrap(), Lookback::new(2, LookbackUnit::Years));
        assert_eq!("6mo".parse::<Lookback>().unwrap(), Lookback::new(6, LookbackUnit::Months));
        assert_eq!(" 504D ".parse::<Lookback>().unwrap(), Lookback::new(504, LookbackUnit::Days));
        assert_eq!("90m".parse::<Lookback>().unwrap(), Lookback::new(90, LookbackUnit::Minutes));
        assert_eq!("12h".parse::<Lookback>().unwrap().to_string(), "12h");
    }

    #[test]
    fn rejects_malformed_periods() {
        for bad in ["", "y", "10", "0d", "3q", "-2d", "1.5y"] {
            assert!(bad.parse::<Lookback>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn calendar_units_step_back_by_months() {
        let end = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();

        let one_month = Lookback::new(1, LookbackUnit::Months).start_from(end).unwrap();
        assert_eq!(one_month, Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap());

        let two_years = Lookback::new(2, LookbackUnit::Years).start_from(end).unwrap();
        assert_eq!(two_years, Utc.with_ymd_and_hms(2022, 3, 31, 12, 0, 0).unwrap());
    }

    #[test]
    fn fixed_units_step_back_by_duration() {
        let end = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let start = Lookback::new(3, LookbackUnit::Days).start_from(end).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap());
    }
}
