//! Process-wide chart defaults.
//!
//! Per-call [`crate::output::ChartOptions`] override these; the globals exist
//! so a script can set the chart directory and output type once.

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, RwLock};

/// Global defaults used when a chart option is left unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory charts are written to.
    pub chart_dir: PathBuf,
    /// Output image type: `png` or `svg`.
    pub file_type: String,
    /// Chart size in pixels.
    pub chart_size: (u32, u32),
    /// Stroke width for ordinary lines.
    pub line_normal: u32,
    /// Stroke width for emphasised lines.
    pub line_wide: u32,
    /// Default maximum number of x-axis tick labels (suggestive).
    pub max_ticks: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            chart_dir: PathBuf::from("."),
            file_type: "png".to_string(),
            chart_size: (900, 450),
            line_normal: 2,
            line_wide: 3,
            max_ticks: 10,
        }
    }
}

static SETTINGS: LazyLock<RwLock<Settings>> = LazyLock::new(|| RwLock::new(Settings::default()));

/// A snapshot of the current global settings.
pub fn settings() -> Settings {
    SETTINGS
        .read()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
}

/// Mutate the global settings in place.
pub fn update_settings(f: impl FnOnce(&mut Settings)) {
    let mut guard = SETTINGS.write().unwrap_or_else(|e| e.into_inner());
    f(&mut guard);
}

/// Set the global chart directory, creating it if needed.
pub fn set_chart_dir<P: AsRef<Path>>(dir: P) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;
    update_settings(|s| s.chart_dir = dir.to_path_buf());
    Ok(())
}

/// Remove all chart image files from the global chart directory.
pub fn clear_chart_dir() -> Result<()> {
    let dir = settings().chart_dir;
    for entry in std::fs::read_dir(&dir)? {
        let path = entry?.path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        if path.is_file()
            && matches!(ext.as_deref(), Some("png" | "svg" | "jpg" | "jpeg"))
        {
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn chart_dir_set_and_clear() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("charts");
        set_chart_dir(&sub).unwrap();
        assert!(sub.is_dir());
        assert_eq!(settings().chart_dir, sub);

        std::fs::write(sub.join("a.png"), b"x").unwrap();
        std::fs::write(sub.join("b.svg"), b"x").unwrap();
        std::fs::write(sub.join("keep.csv"), b"x").unwrap();
        clear_chart_dir().unwrap();
        assert!(!sub.join("a.png").exists());
        assert!(!sub.join("b.svg").exists());
        assert!(sub.join("keep.csv").exists());

        // restore for other tests sharing the process globals
        update_settings(|s| *s = Settings::default());
    }
}
