//! A Plotters coordinate for period axes.
//!
//! [`PeriodAxis`] places chart x-values at integer period offsets (ordinal
//! minus the range minimum) and hands the tick engine's chosen offsets to
//! Plotters as the axis key points, so the mesh draws exactly the labels the
//! engine selected.

use crate::period::Period;
use crate::ticks::compute_ticks_and_labels;
use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, Ranged, ValueFormatter};
use std::collections::HashMap;
use std::ops::Range;

/// Ranged x-coordinate over a run of calendar periods.
///
/// Values are `f64` period offsets so bar charts can subdivide a period slot.
/// The visible range is padded by half a period on each side.
#[derive(Debug, Clone)]
pub struct PeriodAxis {
    base: i64,
    span: i64,
    ticks: Vec<f64>,
    labels: HashMap<i64, String>,
}

impl PeriodAxis {
    /// Build an axis for `periods` with at most roughly `max_ticks` labels.
    ///
    /// Returns `None` for empty input. Degenerate input (mixed frequencies)
    /// yields an axis with no custom labels, matching the engine's
    /// "render without labels" fallback.
    pub fn new(periods: &[Period], max_ticks: usize) -> Option<Self> {
        let base = periods.iter().map(|p| p.ordinal()).min()?;
        let span = periods.iter().map(|p| p.ordinal()).max()? - base;
        let (offsets, texts) = compute_ticks_and_labels(periods, max_ticks);
        let ticks = offsets.iter().map(|&t| t as f64).collect();
        let labels = offsets.into_iter().zip(texts).collect();
        Some(PeriodAxis { base, span, ticks, labels })
    }

    /// An axis over `periods` that draws no tick labels at all. Used where
    /// custom period labels are not applicable (e.g. bar charts over an
    /// incomplete index).
    pub fn unlabelled(periods: &[Period]) -> Option<Self> {
        let base = periods.iter().map(|p| p.ordinal()).min()?;
        let span = periods.iter().map(|p| p.ordinal()).max()? - base;
        Some(PeriodAxis {
            base,
            span,
            ticks: Vec::new(),
            labels: HashMap::new(),
        })
    }

    /// The x-coordinate of a period on this axis.
    pub fn offset_of(&self, period: &Period) -> f64 {
        (period.ordinal() - self.base) as f64
    }

    /// Number of periods spanned, minus one.
    pub fn span(&self) -> i64 {
        self.span
    }

    /// The label text for an integer offset, if that offset is labelled.
    pub fn label_at(&self, offset: i64) -> Option<&str> {
        self.labels.get(&offset).map(String::as_str)
    }
}

impl Ranged for PeriodAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        let lo = -0.5;
        let hi = self.span as f64 + 0.5;
        let frac = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
        limit.0 + (frac * f64::from(limit.1 - limit.0)).round() as i32
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        // The engine already honoured the label budget.
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        -0.5..self.span as f64 + 0.5
    }
}

impl ValueFormatter<f64> for PeriodAxis {
    fn format_ext(&self, value: &f64) -> String {
        // Backend text is single-line; fold the label's line breaks.
        self.labels
            .get(&(value.round() as i64))
            .map(|s| s.replace('\n', " "))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;

    fn quarters(from: &str, to: &str) -> Vec<Period> {
        Period::range_inclusive(from.parse().unwrap(), to.parse().unwrap()).unwrap()
    }

    #[test]
    fn key_points_are_the_engine_ticks() {
        let q = quarters("2020Q1", "2021Q4");
        let axis = PeriodAxis::new(&q, 10).unwrap();
        let points = axis.key_points(10usize);
        assert!(!points.is_empty());
        for p in &points {
            assert!(!axis.format_ext(p).is_empty());
        }
    }

    #[test]
    fn unlabelled_offsets_format_empty() {
        let q = quarters("2020Q1", "2021Q4");
        let axis = PeriodAxis::new(&q, 10).unwrap();
        assert_eq!(axis.format_ext(&1000.0), "");
        assert_eq!(axis.label_at(1000), None);
        // Q1 offsets keep their raw multi-line text.
        assert_eq!(axis.label_at(0), Some("Q1\n2020"));
    }

    #[test]
    fn map_is_monotone_over_the_range() {
        let q = quarters("2020Q1", "2021Q4");
        let axis = PeriodAxis::new(&q, 10).unwrap();
        let px: Vec<i32> = (0..=axis.span())
            .map(|o| axis.map(&(o as f64), (0, 640)))
            .collect();
        assert!(px.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn offsets_anchor_at_the_range_minimum() {
        let q = quarters("2020Q2", "2021Q4");
        let axis = PeriodAxis::new(&q, 10).unwrap();
        assert_eq!(axis.offset_of(&"2020Q2".parse().unwrap()), 0.0);
        assert_eq!(axis.offset_of(&"2021Q1".parse().unwrap()), 3.0);
    }

    #[test]
    fn empty_input_has_no_axis() {
        assert!(PeriodAxis::new(&[], 10).is_none());
    }
}
