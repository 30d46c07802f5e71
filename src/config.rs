//! `senkyoku.toml` schema and loader.
//!
//! Every section is optional; missing keys take the defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;
use crate::layout::{Sizing, ZoomSizing};
use crate::party::PartyColors;

pub const DEFAULT_CONFIG_PATH: &str = "senkyoku.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Viewer log destination; the terminal itself belongs to the TUI.
    pub log_file: PathBuf,
    pub input: InputConfig,
    pub view: ViewConfig,
    pub layout: LayoutConfig,
    pub colors: PartyColors,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("senkyoku.log"),
            input: InputConfig::default(),
            view: ViewConfig::default(),
            layout: LayoutConfig::default(),
            colors: PartyColors::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub districts: PathBuf,
    pub candidates: PathBuf,
    /// Feature property (and CSV column) holding the district name.
    pub name_property: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            districts: PathBuf::from("assets/senkyoku2022_0.8.geojson"),
            candidates: PathBuf::from("assets/dummy_candidates.csv"),
            name_property: "kuname".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// `[lon, lat]`
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: [138.0, 38.0],
            zoom: 5.0,
            min_zoom: 2.0,
            max_zoom: 14.0,
            zoom_step: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyKind {
    Zoom,
    Proportional,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub policy: PolicyKind,
    pub fraction: f64,
    pub max_size: f64,
    pub min_size: f64,
    pub threshold: f64,
    pub range: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let zoom = ZoomSizing::default();
        Self {
            policy: PolicyKind::Zoom,
            fraction: 0.15,
            max_size: zoom.max_size,
            min_size: zoom.min_size,
            threshold: zoom.threshold,
            range: zoom.range,
        }
    }
}

impl LayoutConfig {
    /// The one sizing policy this config selects.
    pub fn sizing(&self) -> Sizing {
        match self.policy {
            PolicyKind::Zoom => Sizing::Zoom(ZoomSizing {
                max_size: self.max_size,
                min_size: self.min_size,
                threshold: self.threshold,
                range: self.range,
            }),
            PolicyKind::Proportional => Sizing::Proportional { fraction: self.fraction },
        }
    }
}

impl AppConfig {
    /// Loads `path`, failing with `NotFound` when it does not exist.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound { path: path.to_path_buf() }
            } else {
                ConfigError::ReadError { path: path.to_path_buf(), source: e }
            }
        })?;
        let config = Self::parse_toml(&content, path)?;
        config.validate(path)?;
        Ok(config)
    }

    /// Loads `path` if present, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load_from_path(path)
        } else {
            tracing::debug!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Rejects values that would panic the viewer or invert marker sizing.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |key: &'static str, message: &str| ConfigError::Invalid {
            path: path.to_path_buf(),
            key,
            message: message.to_string(),
        };

        let view = &self.view;
        let finite = [
            ("view.center", view.center[0]),
            ("view.center", view.center[1]),
            ("view.zoom", view.zoom),
            ("view.min_zoom", view.min_zoom),
            ("view.max_zoom", view.max_zoom),
            ("view.zoom_step", view.zoom_step),
            ("layout.fraction", self.layout.fraction),
            ("layout.max_size", self.layout.max_size),
            ("layout.min_size", self.layout.min_size),
            ("layout.threshold", self.layout.threshold),
            ("layout.range", self.layout.range),
        ];
        if let Some(&(key, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(key, "must be a finite number"));
        }
        if view.min_zoom > view.max_zoom {
            return Err(invalid("view.min_zoom", "must not exceed view.max_zoom"));
        }
        if view.zoom_step <= 0.0 {
            return Err(invalid("view.zoom_step", "must be positive"));
        }

        let layout = &self.layout;
        match layout.policy {
            PolicyKind::Zoom => {
                if layout.min_size <= 0.0 {
                    return Err(invalid("layout.min_size", "must be positive"));
                }
                if layout.max_size <= 0.0 {
                    return Err(invalid("layout.max_size", "must be positive"));
                }
                if layout.min_size > layout.max_size {
                    return Err(invalid("layout.min_size", "must not exceed layout.max_size"));
                }
            }
            PolicyKind::Proportional => {
                if layout.fraction <= 0.0 {
                    return Err(invalid("layout.fraction", "must be positive"));
                }
            }
        }
        Ok(())
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| {
            let (line, column) = e
                .span()
                .map(|span| {
                    let before = &content[..span.start];
                    let line = before.matches('\n').count() + 1;
                    let line_start = before.rfind('\n').map(|p| p + 1).unwrap_or(0);
                    (line, span.start - line_start + 1)
                })
                .unwrap_or((0, 0));
            ConfigError::ParseError {
                path: path.to_path_buf(),
                line,
                column,
                message: e.message().to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn empty_file_yields_defaults() {
        let file = write_config("");
        let config = AppConfig::load_from_path(file.path()).expect("load");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.layout.policy, PolicyKind::Zoom);
        assert_eq!(config.input.name_property, "kuname");
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let file = write_config(
            r##"
[layout]
policy = "proportional"
fraction = 0.2

[colors]
fallback = "#111111"

[colors.parties]
"緑の党" = "#00aa00"
"##,
        );
        let config = AppConfig::load_from_path(file.path()).expect("load");
        assert_eq!(config.layout.sizing(), Sizing::Proportional { fraction: 0.2 });
        assert_eq!(config.colors.resolve("緑の党"), "#00aa00");
        assert_eq!(config.colors.resolve("自由民主党"), "#111111");
        assert_eq!(config.view, ViewConfig::default());
    }

    #[test]
    fn zoom_policy_carries_all_parameters() {
        let file = write_config(
            "[layout]\nmax_size = 0.1\nmin_size = 0.01\nthreshold = 4.0\nrange = 6.0\n",
        );
        let config = AppConfig::load_from_path(file.path()).expect("load");
        assert_eq!(
            config.layout.sizing(),
            Sizing::Zoom(ZoomSizing {
                max_size: 0.1,
                min_size: 0.01,
                threshold: 4.0,
                range: 6.0,
            })
        );
    }

    #[test]
    fn parse_error_reports_line_and_column() {
        let file = write_config("[view]\nzoom = \"high\"\n");
        match AppConfig::load_from_path(file.path()) {
            Err(ConfigError::ParseError { line, column, .. }) => {
                assert_eq!(line, 2);
                assert!(column > 0);
            }
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn defaults_are_valid() {
        assert!(AppConfig::default().validate(Path::new("default")).is_ok());
    }

    fn invalid_key(content: &str) -> &'static str {
        let file = write_config(content);
        match AppConfig::load_from_path(file.path()) {
            Err(ConfigError::Invalid { key, .. }) => key,
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn inverted_zoom_bounds_are_rejected() {
        assert_eq!(invalid_key("[view]\nmin_zoom = 10.0\nmax_zoom = 5.0\n"), "view.min_zoom");
    }

    #[test]
    fn non_finite_and_non_positive_view_values_are_rejected() {
        assert_eq!(invalid_key("[view]\nmax_zoom = nan\n"), "view.max_zoom");
        assert_eq!(invalid_key("[view]\nzoom = inf\n"), "view.zoom");
        assert_eq!(invalid_key("[view]\nzoom_step = 0.0\n"), "view.zoom_step");
    }

    #[test]
    fn inverted_sizes_are_rejected() {
        assert_eq!(
            invalid_key("[layout]\nmax_size = 0.01\nmin_size = 0.1\n"),
            "layout.min_size"
        );
        assert_eq!(invalid_key("[layout]\nmax_size = -0.1\n"), "layout.max_size");
    }

    #[test]
    fn proportional_fraction_must_be_positive() {
        assert_eq!(
            invalid_key("[layout]\npolicy = \"proportional\"\nfraction = -0.15\n"),
            "layout.fraction"
        );
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let file = write_config("[layout]\npolicy = \"hexagon\"\n");
        assert!(matches!(
            AppConfig::load_from_path(file.path()),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn missing_file_is_not_found_but_default_loader_tolerates_it() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.toml");
        assert!(matches!(
            AppConfig::load_from_path(&path),
            Err(ConfigError::NotFound { .. })
        ));
        let config = AppConfig::load_or_default(&path).expect("defaults");
        assert_eq!(config, AppConfig::default());
    }
}
