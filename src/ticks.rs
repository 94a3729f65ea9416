//! Date-like tick selection and labelling for period axes.
//!
//! Given an ordered run of calendar periods and a maximum label budget, this
//! module decides which granularity to label at (days, months, quarters or
//! years), the spacing between labelled points, and context-sensitive text for
//! each point: the year is only repeated when it changes, a month name is only
//! inserted when the month changes, and the final label always carries its
//! year so the reader can anchor the series.
//!
//! Everything here is a pure function over its inputs; the only side effect is
//! a `log::warn!` on degenerate input, which callers treat as "render without
//! custom tick labels".

use crate::period::{Frequency, Period};
use log::warn;
use std::collections::BTreeMap;

/// Acceptable label step sizes per granularity, tried in ascending order.
const YEAR_INTERVALS: &[i64] = &[1, 2, 4, 5, 10, 20, 40, 50, 100, 200, 400, 500, 1000];
const QUARTER_INTERVALS: &[i64] = &[1, 2];
const MONTH_INTERVALS: &[i64] = &[1, 2, 3, 4, 6];
const DAY_INTERVALS: &[i64] = &[1, 2, 4, 7, 14];

const MONTH_ABBR: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn intervals(freq: Frequency) -> &'static [i64] {
    match freq {
        Frequency::Day => DAY_INTERVALS,
        Frequency::Month => MONTH_INTERVALS,
        Frequency::Quarter => QUARTER_INTERVALS,
        Frequency::Year => YEAR_INTERVALS,
    }
}

fn month_abbr(month: u32) -> &'static str {
    MONTH_ABBR[(month as usize - 1) % 12]
}

/// The outcome of the granularity/interval search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickPlan {
    /// Anticipated number of labelled points (suggestive, not exact).
    pub count: i64,
    /// Granularity to label at; equal to or coarser than the input frequency.
    pub freq: Frequency,
    /// Step between labelled points, in units of `freq`.
    pub interval: i64,
}

/// Work out the label granularity and interval for a run of periods.
///
/// Scans the input frequency's generalisation chain finest-first, and within
/// each granularity its interval table in ascending order, returning the first
/// combination whose bucket count fits within `max_ticks` (floored to 4).
/// Bucket counts use as-of-period-end conversion at the candidate granularity
/// for both endpoints, so a partial trailing bucket still counts as one.
///
/// Returns `None` for empty or mixed-frequency input; the caller should fall
/// back to default axis ticks. Should no combination fit the budget, the
/// coarsest granularity's largest interval is returned (the count may then
/// exceed the budget).
pub fn select_tick_plan(periods: &[Period], max_ticks: usize) -> Option<TickPlan> {
    let max_ticks = max_ticks.max(4) as i64;

    let first = periods.first()?;
    let freq = first.frequency();
    if periods.iter().any(|p| p.frequency() != freq) {
        warn!("mixed period frequencies in tick selection input");
        return None;
    }
    let lo = periods.iter().min().copied()?;
    let hi = periods.iter().max().copied()?;

    let span_at = |g: Frequency| -> Option<i64> {
        Some(hi.ordinal_at(g)? - lo.ordinal_at(g)? + 1)
    };

    for &g in freq.coarser_chain() {
        let Some(span) = span_at(g) else { continue };
        for &interval in intervals(g) {
            let count = span / interval;
            if count <= max_ticks {
                return Some(TickPlan { count, freq: g, interval });
            }
        }
    }

    // Terminal fallback: coarsest granularity, largest interval.
    let g = *freq.coarser_chain().last()?;
    let interval = *intervals(g).last()?;
    let span = span_at(g)?;
    Some(TickPlan {
        count: span / interval,
        freq: g,
        interval,
    })
}

/// Every `interval`-th element starting at `start`.
fn take_every(subset: &[Period], start: usize, interval: i64) -> Vec<Period> {
    subset
        .iter()
        .skip(start)
        .step_by(interval.max(1) as usize)
        .copied()
        .collect()
}

/// Index of the first element whose key is 0 modulo `interval`, so the
/// labelled points align on a calendar-anchored boundary. Defaults to 0.
fn alignment_offset(subset: &[Period], interval: i64, key: impl Fn(&Period) -> i64) -> usize {
    if interval <= 1 {
        return 0;
    }
    subset
        .iter()
        .position(|p| key(p).rem_euclid(interval) == 0)
        .unwrap_or(0)
}

/// Select the years to label from the complete range.
fn locate_years(complete: &[Period], interval: i64) -> Vec<Period> {
    let Some(first) = complete.first() else {
        return Vec::new();
    };
    // Keep only first-of-year markers in the source granularity.
    let subset: Vec<Period> = complete
        .iter()
        .filter(|p| match first.frequency() {
            Frequency::Day => p.month() == 1 && p.day_of_month() == 1,
            Frequency::Month => p.month() == 1,
            Frequency::Quarter => p.quarter() == 1,
            Frequency::Year => true,
        })
        .copied()
        .collect();
    let start = alignment_offset(&subset, interval, |p| i64::from(p.year()));
    take_every(&subset, start, interval)
}

/// Select the quarters to label from the complete range.
fn locate_quarters(complete: &[Period], interval: i64) -> Vec<Period> {
    let start = alignment_offset(complete, interval, |p| i64::from(p.quarter()) - 1);
    take_every(complete, start, interval)
}

/// Select the months to label from the complete range.
fn locate_months(complete: &[Period], interval: i64) -> Vec<Period> {
    let Some(first) = complete.first() else {
        return Vec::new();
    };
    let subset: Vec<Period> = if first.frequency() == Frequency::Day {
        complete
            .iter()
            .filter(|p| p.day_of_month() == 1)
            .copied()
            .collect()
    } else {
        complete.to_vec()
    };
    let start = alignment_offset(&subset, interval, |p| i64::from(p.month()) - 1);
    take_every(&subset, start, interval)
}

/// Select the days to label from the complete range.
///
/// When the interval is 2 and the candidate count is odd the first element is
/// kept; otherwise the first visible tick is centered at `interval / 2`.
/// A fixed cosmetic rule, preserved as-is.
fn locate_days(complete: &[Period], interval: i64, count: i64) -> Vec<Period> {
    let start = if interval == 2 && count % 2 == 1 {
        0
    } else {
        (interval / 2) as usize
    };
    take_every(complete, start, interval)
}

/// Label the selected years: the 4-digit year, no cross-label dependency.
fn label_years(selected: &[Period]) -> BTreeMap<Period, String> {
    selected.iter().map(|p| (*p, p.year().to_string())).collect()
}

/// Label the selected quarters: `Q<n>`, with the year on a second line at the
/// start of each year. The last label always gets a year line.
fn label_quarters(selected: &[Period]) -> BTreeMap<Period, String> {
    let mut labels = BTreeMap::new();
    let mut year_on_last = false;
    for p in selected {
        let mut label = format!("Q{}", p.quarter());
        year_on_last = p.quarter() == 1;
        if year_on_last {
            label = format!("{label}\n{}", p.year());
        }
        labels.insert(*p, label);
    }
    if !year_on_last {
        patch_final_year(&mut labels, |label, p| format!("{label}\n{}", p.year()));
    }
    labels
}

/// Label the selected months: 3-letter abbreviation, with the year on a second
/// line whenever the year changes or at January. The last label always gets a
/// year line.
fn label_months(selected: &[Period]) -> BTreeMap<Period, String> {
    let mut labels = BTreeMap::new();
    let Some(first) = selected.first() else {
        return labels;
    };
    let mut prev_year = first.year();
    let mut year_on_last = false;
    for p in selected {
        let mut label = month_abbr(p.month()).to_string();
        year_on_last = p.year() != prev_year || p.month() == 1;
        if year_on_last {
            label = format!("{label}\n{}", p.year());
            prev_year = p.year();
        }
        labels.insert(*p, label);
    }
    if !year_on_last {
        patch_final_year(&mut labels, |label, p| format!("{label}\n{}", p.year()));
    }
    labels
}

/// Append a year line to a day label. Short one-line labels (a 1-2 digit day
/// with no month line) get the month inline first, to stay compact; labels
/// that already carry a month line are flattened onto one line.
fn add_day_year(label: &str, month: &str, year: i32) -> String {
    let base = if label.chars().count() > 2 {
        label.replace('\n', " ")
    } else {
        format!("{label} {month}")
    };
    format!("{base}\n{year}")
}

/// Label the selected days: the day-of-month number, a month line when the
/// month changes, and a year line when the year changes. The last label
/// always gets a year line.
fn label_days(selected: &[Period]) -> BTreeMap<Period, String> {
    let mut labels = BTreeMap::new();
    let Some(first) = selected.first() else {
        return labels;
    };
    let mut prev_month = first.month();
    let mut prev_year = first.year();
    let mut year_on_last = false;
    for p in selected {
        let mut label = p.day_of_month().to_string();
        let month = month_abbr(p.month());
        if p.month() != prev_month {
            label = format!("{label}\n{month}");
            prev_month = p.month();
        }
        year_on_last = p.year() != prev_year;
        if year_on_last {
            label = add_day_year(&label, month, p.year());
            prev_year = p.year();
        }
        labels.insert(*p, label);
    }
    if !year_on_last {
        patch_final_year(&mut labels, |label, p| {
            add_day_year(label, month_abbr(p.month()), p.year())
        });
    }
    labels
}

/// Inject the year into the chronologically last label.
fn patch_final_year(
    labels: &mut BTreeMap<Period, String>,
    with_year: impl Fn(&str, &Period) -> String,
) {
    if let Some(mut entry) = labels.last_entry() {
        let period = *entry.key();
        let patched = with_year(entry.get(), &period);
        *entry.get_mut() = patched;
    }
}

/// Build display labels for a run of periods, keyed by the periods to label.
///
/// Delegates to [`select_tick_plan`], fills any gaps in the input (selection
/// steps over true calendar spacing, not input indices), locates the periods
/// to label at the chosen granularity, and formats each one. Returns an empty
/// map when no plan can be selected. Every key lies within the inclusive
/// `[min, max]` range of the input.
pub fn build_labels(periods: &[Period], max_ticks: usize) -> BTreeMap<Period, String> {
    let Some(plan) = select_tick_plan(periods, max_ticks) else {
        return BTreeMap::new();
    };
    let (Some(lo), Some(hi)) = (
        periods.iter().min().copied(),
        periods.iter().max().copied(),
    ) else {
        return BTreeMap::new();
    };
    let complete = match Period::range_inclusive(lo, hi) {
        Ok(range) => range,
        Err(e) => {
            warn!("cannot complete period range: {e}");
            return BTreeMap::new();
        }
    };

    match plan.freq {
        Frequency::Day => label_days(&locate_days(&complete, plan.interval, plan.count)),
        Frequency::Month => label_months(&locate_months(&complete, plan.interval)),
        Frequency::Quarter => label_quarters(&locate_quarters(&complete, plan.interval)),
        Frequency::Year => label_years(&locate_years(&complete, plan.interval)),
    }
}

/// Build parallel integer tick offsets and label strings for a run of periods.
///
/// Offsets are each labelled period's ordinal minus the input minimum's
/// ordinal; both vectors are sorted by period. This is the sole public
/// contract consumed by axis code.
pub fn compute_ticks_and_labels(periods: &[Period], max_ticks: usize) -> (Vec<i64>, Vec<String>) {
    let labels = build_labels(periods, max_ticks);
    let Some(base) = periods.iter().map(|p| p.ordinal()).min() else {
        return (Vec::new(), Vec::new());
    };
    labels
        .into_iter()
        .map(|(p, label)| (p.ordinal() - base, label))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn daily_run(from: (i32, u32, u32), to: (i32, u32, u32)) -> Vec<Period> {
        let lo = Period::daily(from.0, from.1, from.2).unwrap();
        let hi = Period::daily(to.0, to.1, to.2).unwrap();
        Period::range_inclusive(lo, hi).unwrap()
    }

    #[test]
    fn selector_prefers_finest_fitting_granularity() {
        let days = daily_run((2020, 1, 1), (2020, 1, 4));
        let plan = select_tick_plan(&days, 10).unwrap();
        assert_eq!(
            plan,
            TickPlan { count: 4, freq: Frequency::Day, interval: 1 }
        );
    }

    #[test]
    fn selector_takes_first_satisfying_interval_before_coarsening() {
        // 11 quarters: interval 1 gives 11 > 10, interval 2 gives 5.
        let lo = Period::quarterly(2020, 2).unwrap();
        let hi = Period::quarterly(2022, 4).unwrap();
        let quarters = Period::range_inclusive(lo, hi).unwrap();
        let plan = select_tick_plan(&quarters, 10).unwrap();
        assert_eq!(
            plan,
            TickPlan { count: 5, freq: Frequency::Quarter, interval: 2 }
        );
    }

    #[test]
    fn selector_floors_the_budget_at_four() {
        let days = daily_run((2020, 1, 1), (2020, 1, 4));
        assert_eq!(select_tick_plan(&days, 1), select_tick_plan(&days, 4));
    }

    #[test]
    fn selector_counts_partial_trailing_buckets() {
        // 2020-12-15..2021-01-05: two partial months span two month buckets.
        let days = daily_run((2020, 12, 15), (2021, 1, 5));
        let lo = days[0];
        let hi = days[days.len() - 1];
        assert_eq!(
            hi.ordinal_at(Frequency::Month).unwrap() - lo.ordinal_at(Frequency::Month).unwrap() + 1,
            2
        );
    }

    #[test]
    fn selector_rejects_empty_and_mixed_input() {
        assert_eq!(select_tick_plan(&[], 10), None);
        let mixed = vec![Period::yearly(2020), Period::monthly(2020, 1).unwrap()];
        assert_eq!(select_tick_plan(&mixed, 10), None);
    }

    #[test]
    fn year_locator_aligns_on_divisible_years() {
        let lo = Period::yearly(2001);
        let hi = Period::yearly(2022);
        let years = Period::range_inclusive(lo, hi).unwrap();
        let picked = locate_years(&years, 4);
        let picked_years: Vec<i32> = picked.iter().map(|p| p.year()).collect();
        assert_eq!(picked_years, vec![2004, 2008, 2012, 2016, 2020]);
    }

    #[test]
    fn month_locator_reduces_daily_input_to_month_starts() {
        let days = daily_run((2020, 1, 15), (2020, 4, 10));
        let picked = locate_months(&days, 1);
        assert_eq!(picked.len(), 3); // Feb, Mar, Apr 1st
        assert!(picked.iter().all(|p| p.day_of_month() == 1));
    }

    #[test]
    fn day_centering_rule() {
        // interval 2, even count: start at interval / 2.
        let days = daily_run((2020, 1, 1), (2020, 1, 20));
        let picked = locate_days(&days, 2, 10);
        assert_eq!(picked[0].day_of_month(), 2);
        // interval 2, odd count: start at the first element.
        let days = daily_run((2020, 1, 1), (2020, 1, 10));
        let picked = locate_days(&days, 2, 5);
        assert_eq!(picked[0].day_of_month(), 1);
    }

    #[test]
    fn quarter_labels_carry_year_at_q1_and_at_the_end() {
        let lo = Period::quarterly(2020, 3).unwrap();
        let hi = Period::quarterly(2021, 2).unwrap();
        let quarters = Period::range_inclusive(lo, hi).unwrap();
        let labels = label_quarters(&quarters);
        let texts: Vec<&str> = labels.values().map(String::as_str).collect();
        assert_eq!(texts, vec!["Q3", "Q4", "Q1\n2021", "Q2\n2021"]);
    }

    #[test]
    fn month_labels_mark_january_and_year_changes() {
        let lo = Period::monthly(2020, 11).unwrap();
        let hi = Period::monthly(2021, 2).unwrap();
        let months = Period::range_inclusive(lo, hi).unwrap();
        let labels = label_months(&months);
        let texts: Vec<&str> = labels.values().map(String::as_str).collect();
        assert_eq!(texts, vec!["Nov", "Dec", "Jan\n2021", "Feb\n2021"]);
    }

    #[test]
    fn short_day_label_gets_inline_month_with_its_year() {
        assert_eq!(add_day_year("5", "Mar", 2021), "5 Mar\n2021");
        assert_eq!(add_day_year("15\nMar", "Mar", 2021), "15 Mar\n2021");
    }

    #[test]
    fn empty_labeller_input_yields_empty_maps() {
        assert!(label_days(&[]).is_empty());
        assert!(label_months(&[]).is_empty());
        assert!(label_quarters(&[]).is_empty());
        assert!(label_years(&[]).is_empty());
    }
}
