//! Chart options and output file naming.
//!
//! The saved file name is derived from the chart title plus optional tags, so
//! repeated runs of the same script overwrite their own charts and similar
//! titles do not collide when tagged.

use crate::settings::settings;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

// Sensible file names from an alphanumeric title.
static NON_ALNUM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z]").expect("valid literal regex"));
static MULTI_HYPHEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("valid literal regex"));

const MAX_TITLE_LEN: usize = 150;

/// Presentation and output options for a single chart.
///
/// Unset optional fields fall back to the global [`crate::settings`].
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Chart title; also used to build the output file name.
    pub title: String,
    pub xlabel: Option<String>,
    pub ylabel: Option<String>,
    /// Small grey footer text, bottom-left corner.
    pub lfooter: Option<String>,
    /// Small grey footer text, bottom-right corner.
    pub rfooter: Option<String>,
    /// Text before the title in the file name.
    pub pre_tag: String,
    /// Text after the title in the file name, to keep same-titled charts
    /// from overwriting each other.
    pub tag: String,
    pub chart_dir: Option<PathBuf>,
    /// `png` or `svg`; anything other than `svg` renders via the bitmap
    /// backend.
    pub file_type: Option<String>,
    pub size: Option<(u32, u32)>,
    pub max_ticks: Option<usize>,
    /// Show a legend (only drawn for multi-series charts).
    pub legend: bool,
    /// Annotate each line's final observed value.
    pub annotate: bool,
    /// Force the y-range to include zero.
    pub zero_y: bool,
    /// Draw a y = 0 guide line when zero is in range.
    pub y0: bool,
    /// Stack bar series instead of grouping them.
    pub stacked: bool,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            title: String::new(),
            xlabel: None,
            ylabel: None,
            lfooter: None,
            rfooter: None,
            pre_tag: String::new(),
            tag: String::new(),
            chart_dir: None,
            file_type: None,
            size: None,
            max_ticks: None,
            legend: true,
            annotate: false,
            zero_y: false,
            y0: false,
            stacked: false,
        }
    }
}

impl ChartOptions {
    /// Options with just a title set.
    pub fn titled(title: impl Into<String>) -> Self {
        ChartOptions {
            title: title.into(),
            ..ChartOptions::default()
        }
    }

    pub fn file_type(&self) -> String {
        self.file_type
            .clone()
            .unwrap_or_else(|| settings().file_type)
            .to_ascii_lowercase()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size.unwrap_or_else(|| settings().chart_size)
    }

    pub fn max_ticks(&self) -> usize {
        self.max_ticks.unwrap_or_else(|| settings().max_ticks)
    }
}

/// Where a chart with these options is saved:
/// `<chart_dir>/<pre_tag><title-slug>-<tag>.<file_type>`.
pub fn chart_path(opts: &ChartOptions) -> PathBuf {
    let dir = opts
        .chart_dir
        .clone()
        .unwrap_or_else(|| settings().chart_dir);

    let shorter: String = opts.title.chars().take(MAX_TITLE_LEN).collect();
    let slug = NON_ALNUM.replace_all(&shorter, "-").to_lowercase();
    let slug = MULTI_HYPHEN.replace_all(&slug, "-");

    let file_name = format!(
        "{}{}-{}.{}",
        opts.pre_tag,
        slug,
        opts.tag,
        opts.file_type()
    );
    dir.join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_slug_is_filesystem_safe() {
        let mut opts = ChartOptions::titled("Quarterly GDP (chain volume)");
        opts.chart_dir = Some(PathBuf::from("/tmp/charts"));
        opts.file_type = Some("svg".into());
        let path = chart_path(&opts);
        assert_eq!(
            path,
            PathBuf::from("/tmp/charts/quarterly-gdp-chain-volume--.svg")
        );
    }

    #[test]
    fn tags_bracket_the_slug() {
        let mut opts = ChartOptions::titled("Title");
        opts.chart_dir = Some(PathBuf::from("."));
        opts.pre_tag = "a-".into();
        opts.tag = "v2".into();
        opts.file_type = Some("png".into());
        assert_eq!(chart_path(&opts), PathBuf::from("./a-title-v2.png"));
    }

    #[test]
    fn long_titles_are_truncated() {
        let mut opts = ChartOptions::titled("x".repeat(400));
        opts.chart_dir = Some(PathBuf::from("."));
        opts.file_type = Some("png".into());
        let name = chart_path(&opts);
        let name = name.file_name().unwrap().to_str().unwrap();
        assert!(name.len() < 200);
    }
}
