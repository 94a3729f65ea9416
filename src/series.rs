//! Period-indexed series: the data structure the plotting functions consume.

use crate::period::{Frequency, Period};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from series construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("periods ({periods}) and values ({values}) differ in length")]
    LengthMismatch { periods: usize, values: usize },
    #[error("series mixes period frequencies")]
    MixedFrequencies,
}

/// One named series of optional observations over a period index.
///
/// The index is kept sorted by period; `None` values mark missing
/// observations and are skipped when plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSeries {
    pub name: String,
    periods: Vec<Period>,
    values: Vec<Option<f64>>,
}

impl PeriodSeries {
    /// Build a series; the observations are sorted by period.
    pub fn new(
        name: impl Into<String>,
        periods: Vec<Period>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, SeriesError> {
        if periods.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                periods: periods.len(),
                values: values.len(),
            });
        }
        if let Some(first) = periods.first()
            && periods.iter().any(|p| p.frequency() != first.frequency())
        {
            return Err(SeriesError::MixedFrequencies);
        }
        let mut rows: Vec<(Period, Option<f64>)> = periods.into_iter().zip(values).collect();
        rows.sort_by_key(|(p, _)| *p);
        let (periods, values) = rows.into_iter().unzip();
        Ok(PeriodSeries {
            name: name.into(),
            periods,
            values,
        })
    }

    pub fn len(&self) -> usize {
        self.periods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// The series frequency; `None` when the series is empty.
    pub fn frequency(&self) -> Option<Frequency> {
        self.periods.first().map(|p| p.frequency())
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (Period, Option<f64>)> + '_ {
        self.periods
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Whether the index equals its own gap-free reconstruction. Bar charts
    /// only apply custom period labels to complete indexes.
    pub fn is_complete(&self) -> bool {
        self.periods
            .windows(2)
            .all(|w| w[1].ordinal() == w[0].ordinal() + 1)
    }

    /// The series restricted to periods at or after `start`.
    pub fn trim_start(&self, start: Period) -> Self {
        let rows: Vec<(Period, Option<f64>)> =
            self.iter().filter(|(p, _)| *p >= start).collect();
        let (periods, values) = rows.into_iter().unzip();
        PeriodSeries {
            name: self.name.clone(),
            periods,
            values,
        }
    }

    /// The last observed (non-missing) point, for end-of-line annotations.
    pub fn last_value(&self) -> Option<(Period, f64)> {
        self.iter().rev().find_map(|(p, v)| v.map(|v| (p, v)))
    }

    /// Min and max over the observed values.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        let mut bounds: Option<(f64, f64)> = None;
        for v in self.values.iter().flatten() {
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(*v), hi.max(*v)),
                None => (*v, *v),
            });
        }
        bounds
    }
}

/// The min and max period across several series.
pub fn index_bounds(series: &[PeriodSeries]) -> Option<(Period, Period)> {
    let mut all = series.iter().flat_map(|s| s.periods().iter().copied());
    let first = all.next()?;
    let (lo, hi) = all.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    Some((lo, hi))
}
