//! period-plot
//!
//! A lightweight Rust library for plotting calendar-period time series (daily,
//! monthly, quarterly, yearly) with readable date tick labels.
//!
//! ### Features
//! - Calendar [`Period`]s with ordinal arithmetic and gap-free ranges
//! - A tick/label engine that picks the labelling granularity and spacing to
//!   fit a label budget, and formats context-aware labels (years only where
//!   they change, month names only where they matter)
//! - SVG/PNG line and bar charts via Plotters, with default styling, legends,
//!   footers, and title-derived output file names
//!
//! ### Example
//! ```no_run
//! use period_plot::{ChartOptions, Period, PeriodSeries};
//!
//! let start: Period = "2020Q1".parse()?;
//! let end: Period = "2022Q4".parse()?;
//! let periods = Period::range_inclusive(start, end)?;
//! let values: Vec<Option<f64>> = (0..periods.len())
//!     .map(|i| Some(100.0 + i as f64))
//!     .collect();
//! let gdp = PeriodSeries::new("GDP", periods, values)?;
//!
//! period_plot::set_chart_dir("charts")?;
//! period_plot::line_plot(&[gdp], &ChartOptions::titled("Quarterly GDP"))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod axis;
pub mod output;
pub mod period;
pub mod series;
pub mod settings;
pub mod ticks;
pub mod viz;

pub use axis::PeriodAxis;
pub use output::{ChartOptions, chart_path};
pub use period::{Frequency, Period, PeriodError};
pub use series::{PeriodSeries, SeriesError};
pub use settings::{clear_chart_dir, set_chart_dir, settings, update_settings};
pub use ticks::{TickPlan, build_labels, compute_ticks_and_labels, select_tick_plan};
pub use viz::{bar_plot, line_plot};
