//! Visualization helpers: series colors, axis scaling, number formatting.

use num_format::{Locale, ToFormattedString};
use plotters::prelude::*;

/// Single-series accent color.
const ONE: [RGBColor; 1] = [RGBColor(205, 92, 92)]; // indian red

/// Palette for up to five series.
const FIVE: [RGBColor; 5] = [
    RGBColor(65, 105, 225),  // royal blue
    RGBColor(255, 140, 0),   // dark orange
    RGBColor(34, 139, 34),   // forest green
    RGBColor(205, 92, 92),   // indian red
    RGBColor(128, 128, 128), // gray
];

/// Palette for up to nine series.
const NINE: [RGBColor; 9] = [
    RGBColor(0, 0, 139),     // dark blue
    RGBColor(255, 140, 0),   // dark orange
    RGBColor(34, 139, 34),   // forest green
    RGBColor(205, 92, 92),   // indian red
    RGBColor(128, 0, 128),   // purple
    RGBColor(255, 215, 0),   // gold
    RGBColor(240, 128, 128), // light coral
    RGBColor(32, 178, 170),  // light sea green
    RGBColor(128, 128, 128), // gray
];

/// Colors for `count` plotted series: a dedicated single-series color, the
/// five-color palette up to five, the nine-color palette up to nine, cycling
/// beyond that.
pub fn color_list(count: usize) -> Vec<RGBAColor> {
    match count {
        0 | 1 => ONE.iter().map(|c| c.to_rgba()).collect(),
        2..=5 => FIVE[..count].iter().map(|c| c.to_rgba()).collect(),
        6..=9 => NINE[..count].iter().map(|c| c.to_rgba()).collect(),
        _ => (0..count).map(|i| NINE[i % NINE.len()].to_rgba()).collect(),
    }
}

/// Pick a single y-axis scale and its human label based on overall magnitude,
/// e.g. `(1e6, "millions")`.
pub fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "trillions")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "billions")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "millions")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "thousands")
    } else {
        (1.0, "")
    }
}

/// Format a (scaled) axis value: thousands grouping for large whole numbers,
/// magnitude-dependent precision otherwise.
pub fn format_axis_value(v: f64) -> String {
    let a = v.abs();
    if a >= 1000.0 && v.fract() == 0.0 {
        (v as i64).to_formatted_string(&Locale::en)
    } else if a >= 100.0 {
        format!("{v:.0}")
    } else if a >= 10.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.2}")
    }
}

/// Format an annotated end-of-line value, mirroring the axis precision rules
/// without grouping.
pub fn format_annotation(v: f64) -> String {
    let a = v.abs();
    if a >= 100.0 {
        format!("{v:.0}")
    } else if a >= 10.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.2}")
    }
}

/// Heuristic pixel width of text (Plotters has no built-in text measuring).
pub fn estimate_text_width_px(text: &str, font_px: u32) -> u32 {
    ((text.chars().count() as f32) * (font_px as f32) * 0.60).ceil() as u32
}
