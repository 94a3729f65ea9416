//! Calendar periods at a fixed granularity (day, month, quarter, year).
//!
//! A [`Period`] is an immutable point on a calendar axis, comparable and totally
//! ordered within its own frequency. Each period maps to a monotonically
//! increasing integer ordinal at its granularity, which is what the tick engine
//! and the axis adapter work with.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Recognised period frequencies, finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Frequency {
    Day,
    Month,
    Quarter,
    Year,
}

impl Frequency {
    /// Single-letter frequency code (`D`, `M`, `Q`, `Y`).
    pub fn code(self) -> char {
        match self {
            Frequency::Day => 'D',
            Frequency::Month => 'M',
            Frequency::Quarter => 'Q',
            Frequency::Year => 'Y',
        }
    }

    /// Parse a single-letter frequency code (case-insensitive).
    pub fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'D' => Some(Frequency::Day),
            'M' => Some(Frequency::Month),
            'Q' => Some(Frequency::Quarter),
            'Y' => Some(Frequency::Year),
            _ => None,
        }
    }

    /// The frequencies this one may be re-expressed at: itself first, then
    /// each coarser alternative. There is no path from coarse to fine.
    pub fn coarser_chain(self) -> &'static [Frequency] {
        match self {
            Frequency::Day => &[Frequency::Day, Frequency::Month, Frequency::Year],
            Frequency::Month => &[Frequency::Month, Frequency::Year],
            Frequency::Quarter => &[Frequency::Quarter, Frequency::Year],
            Frequency::Year => &[Frequency::Year],
        }
    }
}

/// Errors from period construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },
    #[error("month number out of range: {0}")]
    InvalidMonth(u32),
    #[error("quarter number out of range: {0}")]
    InvalidQuarter(u32),
    #[error("unrecognised period string: {0:?}")]
    Unparseable(String),
    #[error("mismatched frequencies: {0:?} vs {1:?}")]
    FrequencyMismatch(Frequency, Frequency),
}

/// A single point on a fixed-granularity calendar axis.
///
/// Internally a `(frequency, ordinal)` pair. Ordinals count days since the
/// common era for daily periods, months since year 0 for monthly periods,
/// quarters since year 0 for quarterly periods, and the year itself for
/// yearly periods. Two periods of the same frequency and calendar position
/// compare equal; ordering follows calendar time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Period {
    freq: Frequency,
    ord: i64,
}

impl Period {
    /// A daily period. Fails on an impossible calendar date.
    pub fn daily(year: i32, month: u32, day: u32) -> Result<Self, PeriodError> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or(PeriodError::InvalidDate { year, month, day })?;
        Ok(Self::from_date(date))
    }

    /// The daily period containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Period {
            freq: Frequency::Day,
            ord: i64::from(date.num_days_from_ce()),
        }
    }

    /// A monthly period.
    pub fn monthly(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::InvalidMonth(month));
        }
        Ok(Period {
            freq: Frequency::Month,
            ord: i64::from(year) * 12 + i64::from(month) - 1,
        })
    }

    /// A quarterly period.
    pub fn quarterly(year: i32, quarter: u32) -> Result<Self, PeriodError> {
        if !(1..=4).contains(&quarter) {
            return Err(PeriodError::InvalidQuarter(quarter));
        }
        Ok(Period {
            freq: Frequency::Quarter,
            ord: i64::from(year) * 4 + i64::from(quarter) - 1,
        })
    }

    /// A yearly period.
    pub fn yearly(year: i32) -> Self {
        Period {
            freq: Frequency::Year,
            ord: i64::from(year),
        }
    }

    pub fn frequency(&self) -> Frequency {
        self.freq
    }

    /// The integer ordinal at this period's own granularity.
    pub fn ordinal(&self) -> i64 {
        self.ord
    }

    fn date(&self) -> NaiveDate {
        // Only meaningful for daily periods; ordinals come from valid dates.
        NaiveDate::from_num_days_from_ce_opt(self.ord as i32).unwrap_or(NaiveDate::MIN)
    }

    pub fn year(&self) -> i32 {
        match self.freq {
            Frequency::Day => self.date().year(),
            Frequency::Month => self.ord.div_euclid(12) as i32,
            Frequency::Quarter => self.ord.div_euclid(4) as i32,
            Frequency::Year => self.ord as i32,
        }
    }

    /// Calendar month (1-12). Coarser periods report their end month, so a
    /// quarter maps to its third month and a year to December.
    pub fn month(&self) -> u32 {
        match self.freq {
            Frequency::Day => self.date().month(),
            Frequency::Month => (self.ord.rem_euclid(12) + 1) as u32,
            Frequency::Quarter => (self.ord.rem_euclid(4) as u32 + 1) * 3,
            Frequency::Year => 12,
        }
    }

    /// Calendar quarter (1-4); years report their end quarter.
    pub fn quarter(&self) -> u32 {
        match self.freq {
            Frequency::Day | Frequency::Month => (self.month() - 1) / 3 + 1,
            Frequency::Quarter => (self.ord.rem_euclid(4) + 1) as u32,
            Frequency::Year => 4,
        }
    }

    /// Day of month for daily periods; the period's last day otherwise.
    pub fn day_of_month(&self) -> u32 {
        match self.freq {
            Frequency::Day => self.date().day(),
            _ => {
                let (y, m) = (self.year(), self.month());
                last_day_of_month(y, m)
            }
        }
    }

    /// The period `n` steps later (or earlier, for negative `n`) at the same
    /// frequency.
    pub fn offset(&self, n: i64) -> Self {
        Period {
            freq: self.freq,
            ord: self.ord + n,
        }
    }

    /// Re-express this period at an equal-or-coarser frequency and return the
    /// containing bucket's ordinal ("as of period end"). `None` when the
    /// target frequency is finer than this period's own.
    pub fn ordinal_at(&self, target: Frequency) -> Option<i64> {
        if target == self.freq {
            return Some(self.ord);
        }
        match (self.freq, target) {
            (Frequency::Day, Frequency::Month) => {
                let d = self.date();
                Some(i64::from(d.year()) * 12 + i64::from(d.month()) - 1)
            }
            (Frequency::Day, Frequency::Year)
            | (Frequency::Month, Frequency::Year)
            | (Frequency::Quarter, Frequency::Year) => Some(i64::from(self.year())),
            _ => None,
        }
    }

    /// Every consecutive period from `start` to `end` inclusive: the gap-free
    /// complete range. Empty when `end` precedes `start`.
    pub fn range_inclusive(start: Period, end: Period) -> Result<Vec<Period>, PeriodError> {
        if start.freq != end.freq {
            return Err(PeriodError::FrequencyMismatch(start.freq, end.freq));
        }
        Ok((start.ord..=end.ord)
            .map(|ord| Period {
                freq: start.freq,
                ord,
            })
            .collect())
    }
}

fn last_day_of_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(ny, nm, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.freq {
            Frequency::Day => write!(f, "{}", self.date().format("%Y-%m-%d")),
            Frequency::Month => write!(f, "{:04}-{:02}", self.year(), self.month()),
            Frequency::Quarter => write!(f, "{:04}Q{}", self.year(), self.quarter()),
            Frequency::Year => write!(f, "{:04}", self.year()),
        }
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    /// Accepts `2020-01-02` (daily), `2020-01` (monthly), `2020Q2` or
    /// `2020-Q2` (quarterly), and `2020` (yearly).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unparseable = || PeriodError::Unparseable(s.to_string());

        if let Some((y, q)) = s.split_once(['Q', 'q']) {
            let year: i32 = y.trim_end_matches('-').parse().map_err(|_| unparseable())?;
            let quarter: u32 = q.parse().map_err(|_| unparseable())?;
            return Period::quarterly(year, quarter);
        }

        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            [y] => Ok(Period::yearly(y.parse().map_err(|_| unparseable())?)),
            [y, m] => Period::monthly(
                y.parse().map_err(|_| unparseable())?,
                m.parse().map_err(|_| unparseable())?,
            ),
            [y, m, d] => Period::daily(
                y.parse().map_err(|_| unparseable())?,
                m.parse().map_err(|_| unparseable())?,
                d.parse().map_err(|_| unparseable())?,
            ),
            _ => Err(unparseable()),
        }
    }
}
