use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Color, Point};
use crate::grid::DEFAULT_COLUMNS;
use crate::notes::resolve_key_count;
use crate::ui::OVERLAY_TOKENS;

const APP_DIR: &str = "field-overlay";
const APP_CONFIG_FILE: &str = "config.json";

pub const DEFAULT_ITEM_COLOR: Color = Color::new(0xff, 0xff, 0xff);
pub const DEFAULT_BACKGROUND_COLOR: Color = Color::new(0x33, 0x33, 0x33);
pub const DEFAULT_HIGHLIGHT_COLOR: Color = Color::new(0x4c, 0x97, 0xff);

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("neither XDG_CONFIG_HOME nor HOME is set")]
    MissingHomeDirectory,
    #[error("failed to read {}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config json: {0}")]
    ParseConfig(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TooltipOffset {
    pub x: i32,
    pub y: i32,
}

impl Default for TooltipOffset {
    fn default() -> Self {
        Self { x: 15, y: 15 }
    }
}

/// Host-supplied picker settings. Unknown keys are ignored and missing keys take defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    pub columns: usize,
    /// Visible row limit before the grid scrolls; 0 means unlimited.
    pub max_rows: usize,
    /// Width budget before the grid paginates.
    pub width: i32,
    pub item_color: Option<String>,
    pub background_color: Option<String>,
    pub highlight_color: Option<String>,
    pub tooltips: bool,
    pub tooltip_offset: TooltipOffset,
    pub key_count: usize,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            max_rows: 0,
            width: 400,
            item_color: None,
            background_color: None,
            highlight_color: None,
            tooltips: true,
            tooltip_offset: TooltipOffset::default(),
            key_count: crate::notes::DEFAULT_KEY_COUNT,
        }
    }
}

/// Picker settings after colors are parsed and out-of-range values are replaced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPickerConfig {
    pub columns: usize,
    pub max_rows: usize,
    pub width: i32,
    pub item_color: Color,
    pub background_color: Color,
    pub highlight_color: Color,
    pub tooltips: bool,
    pub tooltip_offset: Point,
    pub key_count: usize,
}

impl Default for ResolvedPickerConfig {
    fn default() -> Self {
        PickerConfig::default().resolve()
    }
}

impl PickerConfig {
    /// Parses host JSON. Anything unparseable yields the defaults.
    pub fn from_json(contents: &str) -> Self {
        serde_json::from_str(contents).unwrap_or_else(|err| {
            tracing::warn!(%err, "invalid picker config; using defaults");
            Self::default()
        })
    }

    pub fn resolve(&self) -> ResolvedPickerConfig {
        let columns = if self.columns == 0 {
            tracing::warn!(default = DEFAULT_COLUMNS, "picker columns must be positive");
            DEFAULT_COLUMNS
        } else {
            self.columns
        };
        let width = if self.width <= 0 {
            tracing::warn!(width = self.width, "picker width must be positive");
            Self::default().width
        } else {
            self.width
        };

        ResolvedPickerConfig {
            columns,
            max_rows: self.max_rows,
            width,
            item_color: resolve_color("item_color", self.item_color.as_deref(), DEFAULT_ITEM_COLOR),
            background_color: resolve_color(
                "background_color",
                self.background_color.as_deref(),
                DEFAULT_BACKGROUND_COLOR,
            ),
            highlight_color: resolve_color(
                "highlight_color",
                self.highlight_color.as_deref(),
                DEFAULT_HIGHLIGHT_COLOR,
            ),
            tooltips: self.tooltips,
            tooltip_offset: Point::new(self.tooltip_offset.x, self.tooltip_offset.y),
            key_count: resolve_key_count(self.key_count),
        }
    }
}

fn resolve_color(field: &'static str, value: Option<&str>, fallback: Color) -> Color {
    let Some(value) = value else {
        return fallback;
    };
    Color::from_hex(value).unwrap_or_else(|| {
        tracing::warn!(field, value, fallback = %fallback.to_hex(), "malformed color");
        fallback
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonConfig {
    /// Horizontal padding on each side of the label.
    pub margin: i32,
    pub vertical_margin: i32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            margin: OVERLAY_TOKENS.button_margin,
            vertical_margin: OVERLAY_TOKENS.button_vertical_margin,
        }
    }
}

/// Settings from `config.json`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub grid: PickerConfig,
    pub note: PickerConfig,
    pub button: ButtonConfig,
    pub log_filter: Option<String>,
}

/// Directories `config.json` may live under.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDirs {
    pub xdg_config_home: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

impl ConfigDirs {
    pub fn from_env() -> Self {
        Self {
            xdg_config_home: std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
            home: std::env::var_os("HOME").map(PathBuf::from),
        }
    }

    /// `$XDG_CONFIG_HOME/field-overlay/config.json`, else under `$HOME/.config`.
    /// An empty `XDG_CONFIG_HOME` counts as unset.
    pub fn config_file(&self) -> ConfigResult<PathBuf> {
        let xdg = self
            .xdg_config_home
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty());
        let root = match (xdg, self.home.as_deref()) {
            (Some(xdg), _) => xdg.to_path_buf(),
            (None, Some(home)) => home.join(".config"),
            (None, None) => return Err(ConfigError::MissingHomeDirectory),
        };
        Ok(root.join(APP_DIR).join(APP_CONFIG_FILE))
    }
}

/// Reads `config.json`. A missing file is not an error and yields defaults.
pub fn load_overlay_config(dirs: &ConfigDirs) -> ConfigResult<OverlayConfig> {
    let path = dirs.config_file()?;
    let contents = match std::fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(?path, "no config file; using defaults");
            return Ok(OverlayConfig::default());
        }
        Err(source) => return Err(ConfigError::ReadConfig { path, source }),
    };
    let config: OverlayConfig = serde_json::from_str(&contents)?;
    tracing::debug!(?path, "overlay config loaded");
    Ok(config)
}
