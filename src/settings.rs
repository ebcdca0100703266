use std::path::{Path, PathBuf};

use crate::color::CellColor;
use crate::error::{EditorError, Result};
use crate::ops::export::DEFAULT_EXPORT_SCALE;

/// Editor configuration loaded from `pixelgrid_settings.cfg`.
///
/// Only configuration lives here; grid contents and history are never written
/// to disk.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
    /// Grid size used when the editor starts
    pub default_grid_size: usize,
    /// Smallest grid size a resize request may ask for
    pub min_grid_size: usize,
    /// Largest grid size a resize request may ask for
    pub max_grid_size: usize,
    /// Upscaling factor for exports
    pub export_scale: u32,
    /// Initial drawing color
    pub default_color: CellColor,
    /// Maximum number of history entries (0 = unlimited)
    pub max_undo_steps: usize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            default_grid_size: 16,
            min_grid_size: 8,
            max_grid_size: 100,
            export_scale: DEFAULT_EXPORT_SCALE,
            default_color: CellColor::BLACK,
            max_undo_steps: 0,
        }
    }
}

impl EditorSettings {
    /// Path to the settings file.
    /// On Linux:   ~/.config/pixelgrid/pixelgrid_settings.cfg  (XDG_CONFIG_HOME respected)
    /// On Windows: %APPDATA%\pixelgrid\pixelgrid_settings.cfg
    /// On macOS:   ~/Library/Application Support/pixelgrid/pixelgrid_settings.cfg
    pub fn settings_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            let appdata = std::env::var("APPDATA").or_else(|_| std::env::var("USERPROFILE")).ok()?;
            return Some(PathBuf::from(appdata).join("pixelgrid").join("pixelgrid_settings.cfg"));
        }
        #[cfg(target_os = "macos")]
        {
            let home = std::env::var("HOME").ok()?;
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join("pixelgrid")
                    .join("pixelgrid_settings.cfg"),
            );
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        {
            let config_dir = std::env::var("XDG_CONFIG_HOME")
                .map(PathBuf::from)
                .or_else(|_| std::env::var("HOME").map(|home| PathBuf::from(home).join(".config")))
                .ok()?;
            Some(config_dir.join("pixelgrid").join("pixelgrid_settings.cfg"))
        }
    }

    /// Load settings from disk (returns default if file missing or corrupt)
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else { return Self::default() };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else { return Self::default() };
        let settings = Self::parse(&content);
        crate::log_info!("Loaded settings from {}", path.display());
        settings
    }

    /// Save settings to disk
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = Self::settings_path() else { return Ok(()) };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_config_string())?;
        crate::log_info!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Reject a range an editor cannot start from: `min_grid_size` of zero,
    /// `min_grid_size > max_grid_size`, a `default_grid_size` outside the
    /// range, or an `export_scale` of zero.
    pub fn validate(&self) -> Result<()> {
        let size = self.default_grid_size;
        if self.min_grid_size == 0
            || self.min_grid_size > self.max_grid_size
            || !(self.min_grid_size..=self.max_grid_size).contains(&size)
            || self.export_scale == 0
        {
            return Err(EditorError::InvalidDimension { rows: size, cols: size });
        }
        Ok(())
    }

    pub fn to_config_string(&self) -> String {
        format!(
            "default_grid_size={}\n\
             min_grid_size={}\n\
             max_grid_size={}\n\
             export_scale={}\n\
             default_color={}\n\
             max_undo_steps={}\n",
            self.default_grid_size,
            self.min_grid_size,
            self.max_grid_size,
            self.export_scale,
            self.default_color.to_hex(),
            self.max_undo_steps,
        )
    }

    /// Parse `key=value` lines. Unknown keys and unparsable values are ignored.
    pub fn parse(content: &str) -> Self {
        let defaults = Self::default();
        let mut s = Self::default();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else { continue };
            let val = val.trim();
            match key.trim() {
                "default_grid_size" => {
                    s.default_grid_size = val.parse().unwrap_or(defaults.default_grid_size);
                }
                "min_grid_size" => {
                    s.min_grid_size = val.parse().unwrap_or(defaults.min_grid_size);
                }
                "max_grid_size" => {
                    s.max_grid_size = val.parse().unwrap_or(defaults.max_grid_size);
                }
                "export_scale" => {
                    s.export_scale = val
                        .parse()
                        .ok()
                        .filter(|&v| v > 0)
                        .unwrap_or(defaults.export_scale);
                }
                "default_color" => {
                    s.default_color = val.parse().unwrap_or(defaults.default_color);
                }
                "max_undo_steps" => {
                    s.max_undo_steps = val.parse().unwrap_or(defaults.max_undo_steps);
                }
                other => {
                    crate::log_warn!("Ignoring unknown settings key '{}'", other);
                }
            }
        }
        s.sanitize()
    }

    /// Restore defaults for any inconsistent grid-size range.
    fn sanitize(mut self) -> Self {
        let defaults = Self::default();
        if self.min_grid_size == 0 || self.min_grid_size > self.max_grid_size {
            self.min_grid_size = defaults.min_grid_size;
            self.max_grid_size = defaults.max_grid_size;
        }
        self.default_grid_size = self
            .default_grid_size
            .clamp(self.min_grid_size, self.max_grid_size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_known_keys() {
        let s = EditorSettings::parse(
            "default_grid_size=32\n\
             min_grid_size=4\n\
             max_grid_size=64\n\
             export_scale=10\n\
             default_color=#ff0000\n\
             max_undo_steps=25\n",
        );
        assert_eq!(s.default_grid_size, 32);
        assert_eq!(s.min_grid_size, 4);
        assert_eq!(s.max_grid_size, 64);
        assert_eq!(s.export_scale, 10);
        assert_eq!(s.default_color, CellColor::opaque(255, 0, 0));
        assert_eq!(s.max_undo_steps, 25);
    }

    #[test]
    fn bad_values_fall_back_to_defaults() {
        let s = EditorSettings::parse("export_scale=0\ndefault_color=nope\nmax_grid_size=abc\njunk line\n");
        assert_eq!(s, EditorSettings::default());
    }

    #[test]
    fn inverted_range_is_reset() {
        let s = EditorSettings::parse("min_grid_size=50\nmax_grid_size=10\n");
        assert_eq!((s.min_grid_size, s.max_grid_size), (8, 100));
    }

    #[test]
    fn default_grid_size_is_clamped_into_range() {
        let s = EditorSettings::parse("default_grid_size=500\n");
        assert_eq!(s.default_grid_size, 100);
    }

    #[test]
    fn parsed_settings_always_validate() {
        for content in ["", "min_grid_size=50\nmax_grid_size=10\n", "default_grid_size=1\n"] {
            assert!(EditorSettings::parse(content).validate().is_ok());
        }
        let s = EditorSettings { export_scale: 0, ..EditorSettings::default() };
        assert!(s.validate().is_err());
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("pixelgrid-settings-{}", uuid::Uuid::new_v4()));
        let path = dir.join("nested").join("pixelgrid_settings.cfg");
        assert_eq!(EditorSettings::load_from(&path), EditorSettings::default());

        let s = EditorSettings {
            default_grid_size: 40,
            export_scale: 5,
            default_color: CellColor::opaque(0, 128, 255),
            ..EditorSettings::default()
        };
        s.save_to(&path).unwrap();
        assert_eq!(EditorSettings::load_from(&path), s);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn config_string_parses_back() {
        let mut s = EditorSettings::default();
        s.default_grid_size = 24;
        s.default_color = CellColor::rgba(1, 2, 3, 128);
        assert_eq!(EditorSettings::parse(&s.to_config_string()), s);
    }
}
