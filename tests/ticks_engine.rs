//! End-to-end tests for the date-like tick/label engine.

use period_plot::period::{Frequency, Period};
use period_plot::ticks::{TickPlan, build_labels, compute_ticks_and_labels, select_tick_plan};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn daily(s: &str, e: &str) -> Vec<Period> {
    Period::range_inclusive(s.parse().unwrap(), e.parse().unwrap()).unwrap()
}

fn quarterly(s: &str, e: &str) -> Vec<Period> {
    Period::range_inclusive(s.parse().unwrap(), e.parse().unwrap()).unwrap()
}

fn sorted_labels(periods: &[Period], max_ticks: usize) -> Vec<(Period, String)> {
    build_labels(periods, max_ticks).into_iter().collect()
}

#[test]
fn four_days_label_every_day() {
    let days = daily("2020-01-01", "2020-01-04");
    assert_eq!(
        select_tick_plan(&days, 10),
        Some(TickPlan { count: 4, freq: Frequency::Day, interval: 1 })
    );

    let (ticks, labels) = compute_ticks_and_labels(&days, 10);
    assert_eq!(ticks, vec![0, 1, 2, 3]);
    // Plain day numbers, with full date context injected into the last label.
    assert_eq!(labels, vec!["1", "2", "3", "4 Jan\n2020"]);
}

#[test]
fn two_and_a_half_years_of_days_label_quarter_months() {
    // ~896 days: no day interval fits 10 ticks, so the selector escalates to
    // months and lands on interval 3 (30 month buckets / 3 = 10).
    let days = daily("2020-02-01", "2022-07-15");
    assert_eq!(
        select_tick_plan(&days, 10),
        Some(TickPlan { count: 10, freq: Frequency::Month, interval: 3 })
    );

    let labels = sorted_labels(&days, 10);
    assert_eq!(labels.len(), 10);
    // Aligned to calendar quarters starting at the first divisible month.
    assert_eq!(labels[0].0, "2020-04-01".parse().unwrap());
    assert_eq!(labels[0].1, "Apr");
    assert_eq!(labels[3].1, "Jan\n2021");
    // Last label gets its year injected.
    assert_eq!(labels[9].0, "2022-07-01".parse().unwrap());
    assert_eq!(labels[9].1, "Jul\n2022");
}

#[test]
fn eleven_quarters_step_to_interval_two() {
    // 11 quarters > 10 at interval 1; the very next interval fits.
    let quarters = quarterly("2020Q2", "2022Q4");
    assert_eq!(
        select_tick_plan(&quarters, 10),
        Some(TickPlan { count: 5, freq: Frequency::Quarter, interval: 2 })
    );

    let (ticks, labels) = compute_ticks_and_labels(&quarters, 10);
    assert_eq!(ticks, vec![1, 3, 5, 7, 9]);
    assert_eq!(labels, vec!["Q3", "Q1\n2021", "Q3", "Q1\n2022", "Q3\n2022"]);
}

#[test]
fn ninety_one_quarters_escalate_to_multi_year() {
    let quarters = quarterly("2000Q2", "2022Q4");
    assert_eq!(
        select_tick_plan(&quarters, 10),
        Some(TickPlan { count: 5, freq: Frequency::Year, interval: 4 })
    );

    let (ticks, labels) = compute_ticks_and_labels(&quarters, 10);
    assert_eq!(labels, vec!["2004", "2008", "2012", "2016", "2020"]);
    // First-quarter markers, four years apart, relative to 2000Q2.
    assert_eq!(ticks, vec![15, 31, 47, 63, 79]);
}

#[test]
fn single_period_gets_full_date_context() {
    let one = vec!["2021-03-05".parse::<Period>().unwrap()];
    let labels = sorted_labels(&one, 10);
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].1, "5 Mar\n2021");

    let (ticks, _) = compute_ticks_and_labels(&one, 10);
    assert_eq!(ticks, vec![0]);
}

#[test]
fn label_count_stays_within_budget() {
    let runs: Vec<Vec<Period>> = vec![
        daily("2020-01-01", "2020-01-15"),
        daily("2020-02-01", "2022-07-15"),
        daily("1950-01-01", "2026-12-15"),
        quarterly("2000Q2", "2022Q4"),
        Period::range_inclusive("2011-05".parse().unwrap(), "2024-02".parse().unwrap()).unwrap(),
    ];
    for periods in &runs {
        for max_ticks in [1, 4, 5, 7, 10, 13, 20] {
            let labels = build_labels(periods, max_ticks);
            // The selector's bucket count is a floor over the span, so the
            // locator can place one more point than the count it fit to the
            // budget; the label count is suggestive, not exact.
            assert!(
                labels.len() <= max_ticks.max(4) + 1,
                "{} labels for budget {max_ticks}",
                labels.len()
            );
        }
    }
}

#[test]
fn growing_budget_never_coarsens() {
    let days = daily("2018-03-01", "2023-11-30");
    let rank = |f: Frequency| {
        Frequency::Day
            .coarser_chain()
            .iter()
            .position(|&g| g == f)
            .unwrap()
    };
    let mut prev_rank = usize::MAX;
    for max_ticks in 4..=40 {
        let plan = select_tick_plan(&days, max_ticks).unwrap();
        let r = rank(plan.freq);
        assert!(r <= prev_rank, "budget {max_ticks} coarsened the choice");
        prev_rank = r;
    }
}

#[test]
fn gapped_input_labels_from_the_complete_range() {
    // Weekdays only: the gaps must not disturb calendar-spaced stepping, and
    // selected periods may fall inside a gap but never outside [min, max].
    let all = daily("2021-01-04", "2021-02-26");
    let weekdays: Vec<Period> = all
        .iter()
        .copied()
        .filter(|p| !matches!(p.ordinal() % 7, 2 | 3)) // drop two days a week
        .collect();
    assert!(weekdays.len() < all.len());

    let lo = *weekdays.iter().min().unwrap();
    let hi = *weekdays.iter().max().unwrap();
    let labels = build_labels(&weekdays, 10);
    assert!(!labels.is_empty());
    for p in labels.keys() {
        assert!(*p >= lo && *p <= hi);
    }
}

#[test]
fn last_label_always_carries_a_year() {
    let cases: Vec<Vec<Period>> = vec![
        daily("2020-01-01", "2020-01-04"),
        daily("2020-06-10", "2020-09-10"),
        Period::range_inclusive("2021-02".parse().unwrap(), "2021-11".parse().unwrap()).unwrap(),
        quarterly("2020Q2", "2020Q4"),
        quarterly("2020Q2", "2022Q4"),
    ];
    for periods in &cases {
        let labels = sorted_labels(periods, 10);
        let (_, last_label) = labels.last().expect("labels expected");
        let year = periods.iter().max().unwrap().year().to_string();
        assert!(
            last_label.contains(&year),
            "final label {last_label:?} lacks year {year}"
        );
    }
}

#[test]
fn tick_offsets_round_trip_to_period_ordinals() {
    let quarters = quarterly("2000Q2", "2022Q4");
    let base = quarters.iter().map(|p| p.ordinal()).min().unwrap();
    let labels = sorted_labels(&quarters, 10);
    let (ticks, _) = compute_ticks_and_labels(&quarters, 10);
    for (tick, (period, _)) in ticks.iter().zip(&labels) {
        assert_eq!(tick + base, period.ordinal());
    }
}

#[test]
fn absurd_spans_fall_back_to_the_largest_year_interval() {
    // Five millennia of yearly periods: even the largest year interval gives
    // more buckets than a floored budget of 4, so the selector falls through
    // to coarsest-granularity, largest-interval and the count may exceed the
    // budget.
    let years = Period::range_inclusive(Period::yearly(0), Period::yearly(5000)).unwrap();
    assert_eq!(
        select_tick_plan(&years, 4),
        Some(TickPlan { count: 5, freq: Frequency::Year, interval: 1000 })
    );

    let labels = sorted_labels(&years, 4);
    let texts: Vec<&str> = labels.iter().map(|(_, s)| s.as_str()).collect();
    assert_eq!(texts, vec!["0", "1000", "2000", "3000", "4000", "5000"]);
}

#[test]
fn degenerate_input_yields_no_labels() {
    init_logs();
    assert!(build_labels(&[], 10).is_empty());
    let mixed = vec![
        Period::yearly(2020),
        "2020Q1".parse::<Period>().unwrap(),
    ];
    assert!(build_labels(&mixed, 10).is_empty());
    let (ticks, labels) = compute_ticks_and_labels(&[], 10);
    assert!(ticks.is_empty() && labels.is_empty());
}
