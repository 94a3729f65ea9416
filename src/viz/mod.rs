//! Render period-indexed series as line or bar charts, saved to **SVG** or
//! **PNG**.
//!
//! - Calendar-aware x-axis tick labels via [`crate::ticks`] and
//!   [`crate::axis::PeriodAxis`]
//! - Distinct series colors with a small default palette
//! - Optional legend, end-of-line value annotation, y = 0 guide line,
//!   corner footers
//! - Output file chosen from the chart title via [`crate::output`]

pub mod util;

use crate::axis::PeriodAxis;
use crate::output::{ChartOptions, chart_path};
use crate::series::{PeriodSeries, index_bounds};
use crate::settings::settings;
use anyhow::{Result, anyhow};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;

use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;

use std::path::PathBuf;
use std::sync::Once;

use util::{
    choose_axis_scale, color_list, estimate_text_width_px, format_annotation, format_axis_value,
};

/// One-time registration for a fallback "sans-serif" font when using the
/// `ab_glyph` text path. Required because `ab_glyph` doesn't discover OS
/// fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    // Safe to call many times; only runs once.
    INIT_FONTS.call_once(|| {
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChartKind {
    Line,
    Bar,
}

/// Render a multi-series line chart and save it; returns the saved path.
pub fn line_plot(series: &[PeriodSeries], opts: &ChartOptions) -> Result<PathBuf> {
    render(series, opts, ChartKind::Line)
}

/// Render a grouped or stacked bar chart and save it; returns the saved path.
///
/// Custom period tick labels are only applied when every series has a
/// complete (gap-free) index; otherwise the axis is left unlabelled.
pub fn bar_plot(series: &[PeriodSeries], opts: &ChartOptions) -> Result<PathBuf> {
    render(series, opts, ChartKind::Bar)
}

fn render(series: &[PeriodSeries], opts: &ChartOptions, kind: ChartKind) -> Result<PathBuf> {
    let non_empty: Vec<&PeriodSeries> = series.iter().filter(|s| !s.is_empty()).collect();
    if non_empty.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    let freq = non_empty[0]
        .frequency()
        .ok_or_else(|| anyhow!("no data to plot"))?;
    if non_empty.iter().any(|s| s.frequency() != Some(freq)) {
        return Err(anyhow!("all series must share one period frequency"));
    }

    ensure_fonts_registered();
    let out_path = chart_path(opts);
    let path_string = out_path.to_string_lossy().into_owned();
    let (width, height) = opts.size();

    if opts.file_type() == "svg" {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, &non_empty, opts, kind)?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_chart(root, &non_empty, opts, kind)?;
    }
    Ok(out_path)
}

fn draw_chart<DB>(
    root: DrawingArea<DB, Shift>,
    series: &[&PeriodSeries],
    opts: &ChartOptions,
    kind: ChartKind,
) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    // ----------------------------
    // 1) Axes
    // ----------------------------
    let owned: Vec<PeriodSeries> = series.iter().map(|s| (*s).clone()).collect();
    let (lo, hi) = index_bounds(&owned).ok_or_else(|| anyhow!("no data to plot"))?;
    let full_index = crate::period::Period::range_inclusive(lo, hi)?;

    let labelled = kind == ChartKind::Line || series.iter().all(|s| s.is_complete());
    let axis = if labelled {
        PeriodAxis::new(&full_index, opts.max_ticks())
    } else {
        PeriodAxis::unlabelled(&full_index)
    }
    .ok_or_else(|| anyhow!("no periods to plot"))?;

    let mut bounds: Option<(f64, f64)> = None;
    for s in series {
        if let Some((s_lo, s_hi)) = s.value_bounds() {
            bounds = Some(match bounds {
                Some((b_lo, b_hi)) => (b_lo.min(s_lo), b_hi.max(s_hi)),
                None => (s_lo, s_hi),
            });
        }
    }
    let (mut min_val, mut max_val) = bounds.ok_or_else(|| anyhow!("no numeric values to plot"))?;
    if opts.zero_y || kind == ChartKind::Bar {
        min_val = min_val.min(0.0);
        max_val = max_val.max(0.0);
    }
    if (max_val - min_val).abs() < f64::EPSILON {
        min_val -= 1.0;
        max_val += 1.0;
    }

    // Axis scaling for large magnitudes (thousands/millions/billions).
    let max_abs = min_val.abs().max(max_val.abs());
    let (yscale, scale_word) = choose_axis_scale(max_abs);
    let y_axis_title = match (opts.ylabel.as_deref(), scale_word) {
        (Some(u), "") => u.to_string(),
        (Some(u), sw) => format!("{u} ({sw})"),
        (None, "") => String::new(),
        (None, sw) => format!("({sw})"),
    };

    // ----------------------------
    // 2) Build the chart
    // ----------------------------
    let mut builder = ChartBuilder::on(&root);
    builder
        .margin(12)
        .set_label_area_size(LabelAreaPosition::Left, 64)
        .set_label_area_size(LabelAreaPosition::Bottom, 44);
    if !opts.title.trim().is_empty() {
        builder.caption(opts.title.trim(), (FontFamily::SansSerif, 20));
    }
    let mut chart = builder
        .build_cartesian_2d(axis.clone(), (min_val / yscale)..(max_val / yscale))
        .map_err(|e| anyhow!("{:?}", e))?;

    let y_label_fmt = |v: &f64| format_axis_value(*v);
    let mut mesh = chart.configure_mesh();
    mesh.y_desc(y_axis_title)
        .y_labels(10)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14));
    if let Some(xlabel) = opts.xlabel.as_deref() {
        mesh.x_desc(xlabel);
    }
    mesh.draw().map_err(|e| anyhow!("{:?}", e))?;

    // ----------------------------
    // 3) Draw the series
    // ----------------------------
    let colors = color_list(series.len());
    let with_legend = opts.legend && series.len() > 1;
    let stroke = settings().line_normal;

    match kind {
        ChartKind::Line => {
            for (idx, s) in series.iter().enumerate() {
                let color = colors[idx % colors.len()];
                let pts: Vec<(f64, f64)> = s
                    .iter()
                    .filter_map(|(p, v)| v.map(|v| (axis.offset_of(&p), v / yscale)))
                    .collect();
                if pts.is_empty() {
                    continue;
                }
                let style = ShapeStyle {
                    color,
                    filled: false,
                    stroke_width: stroke,
                };
                let elem = chart
                    .draw_series(LineSeries::new(pts, style))
                    .map_err(|e| anyhow!("{:?}", e))?;
                if with_legend {
                    let legend_color = color;
                    let name = s.name.clone();
                    elem.label(name).legend(move |(x, y)| {
                        PathElement::new(
                            vec![(x, y), (x + 16, y)],
                            legend_color.stroke_width(2),
                        )
                    });
                }
                if opts.annotate
                    && let Some((p, v)) = s.last_value()
                {
                    let text = format!(" {}", format_annotation(v));
                    chart
                        .draw_series(std::iter::once(Text::new(
                            text,
                            (axis.offset_of(&p), v / yscale),
                            (FontFamily::SansSerif, 11)
                                .into_font()
                                .color(&RGBColor(68, 68, 68)),
                        )))
                        .map_err(|e| anyhow!("{:?}", e))?;
                }
            }
        }
        ChartKind::Bar => {
            draw_bars(&mut chart, &axis, series, &colors, yscale, opts, with_legend)?;
        }
    }

    // ----------------------------
    // 4) Decorations
    // ----------------------------
    if opts.y0 && min_val < 0.0 && 0.0 < max_val {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(-0.5, 0.0), (axis.span() as f64 + 0.5, 0.0)],
                RGBColor(85, 85, 85).stroke_width(1),
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    if with_legend {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .label_font((FontFamily::SansSerif, 12))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    let (root_w, root_h) = root.dim_in_pixel();
    let footer_style = (FontFamily::SansSerif, 11)
        .into_font()
        .color(&RGBColor(153, 153, 153));
    if let Some(lfooter) = opts.lfooter.as_deref() {
        root.draw(&Text::new(
            lfooter.to_string(),
            (6, root_h as i32 - 14),
            footer_style.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    if let Some(rfooter) = opts.rfooter.as_deref() {
        let x = root_w as i32 - estimate_text_width_px(rfooter, 11) as i32 - 6;
        root.draw(&Text::new(
            rfooter.to_string(),
            (x, root_h as i32 - 14),
            footer_style,
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

#[allow(clippy::type_complexity)]
fn draw_bars<DB>(
    chart: &mut ChartContext<
        '_,
        DB,
        Cartesian2d<PeriodAxis, plotters::coord::types::RangedCoordf64>,
    >,
    axis: &PeriodAxis,
    series: &[&PeriodSeries],
    colors: &[RGBAColor],
    yscale: f64,
    opts: &ChartOptions,
    with_legend: bool,
) -> Result<()>
where
    DB: DrawingBackend,
{
    let group_width = 0.8f64;

    if opts.stacked {
        // Cumulative positive and negative stacks per period slot.
        let slots = axis.span() as usize + 1;
        let mut cum_pos = vec![0.0f64; slots];
        let mut cum_neg = vec![0.0f64; slots];
        for (idx, s) in series.iter().enumerate() {
            let color = colors[idx % colors.len()];
            let mut first = true;
            for (p, v) in s.iter() {
                let Some(v) = v else { continue };
                let x = axis.offset_of(&p);
                let slot = x as usize;
                let (y0, y1) = if v >= 0.0 {
                    let y0 = cum_pos[slot];
                    cum_pos[slot] += v;
                    (y0, cum_pos[slot])
                } else {
                    let y1 = cum_neg[slot];
                    cum_neg[slot] += v;
                    (cum_neg[slot], y1)
                };
                let rect = Rectangle::new(
                    [
                        (x - group_width / 2.0, y0 / yscale),
                        (x + group_width / 2.0, y1 / yscale),
                    ],
                    color.filled(),
                );
                let elem = chart
                    .draw_series(std::iter::once(rect))
                    .map_err(|e| anyhow!("{:?}", e))?;
                if with_legend && first {
                    let legend_color = color;
                    elem.label(s.name.clone()).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], legend_color.filled())
                    });
                    first = false;
                }
            }
        }
    } else {
        let n_series = series.len().max(1);
        let bar_w = group_width / n_series as f64;
        for (idx, s) in series.iter().enumerate() {
            let color = colors[idx % colors.len()];
            let mut first = true;
            for (p, v) in s.iter() {
                let Some(v) = v else { continue };
                let x_center = axis.offset_of(&p);
                let x0 = x_center - group_width / 2.0 + idx as f64 * bar_w;
                let x1 = x0 + bar_w;
                let y0 = 0.0f64.min(v) / yscale;
                let y1 = 0.0f64.max(v) / yscale;
                let rect = Rectangle::new([(x0, y0), (x1, y1)], color.filled());
                let elem = chart
                    .draw_series(std::iter::once(rect))
                    .map_err(|e| anyhow!("{:?}", e))?;
                if with_legend && first {
                    let legend_color = color;
                    elem.label(s.name.clone()).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], legend_color.filled())
                    });
                    first = false;
                }
            }
        }
    }
    Ok(())
}
