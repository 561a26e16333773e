use std::{fs, path::Path};

use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::history::{MAX_STATES, MAX_STATES_LIMIT};
use crate::idle::IDLE_TIMEOUT_SECS;
use crate::palette::{DEFAULT_BACKGROUND, DEFAULT_DARK, DEFAULT_LIGHT, Palette, Shade};
use crate::session::SessionSettings;
use crate::stroke::DrawState;

pub const DEFAULT_CONFIG_PATH: &str = "warhol.toml";

#[derive(Debug, Parser)]
#[command(name = "warhol-boards", about = "Draw once, see it on every pop-art panel")]
pub struct Cli {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<String>,
    /// Log filter, e.g. "debug" or "warhol_boards=trace"
    #[arg(long)]
    pub log_level: Option<String>,
    /// Seconds without drawing before the inactivity prompt
    #[arg(long)]
    pub idle_timeout: Option<u32>,
    /// Boards per row
    #[arg(long)]
    pub columns: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub board_width: usize,
    pub board_height: usize,
    pub columns: usize,
    pub gap: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            board_width: 320,
            board_height: 240,
            columns: 3,
            gap: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_states: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_states: MAX_STATES }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct IdleConfig {
    pub timeout_secs: u32,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self { timeout_secs: IDLE_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrushConfig {
    pub shade: String,
    pub width: u32,
    pub sizes: Vec<u32>,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            shade: Shade::Dark.name().into(),
            width: 20,
            sizes: vec![5, 10, 20, 40],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaletteConfig {
    pub dark: Vec<String>,
    pub light: Vec<String>,
    pub background: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let row = |r: [&str; 6]| -> Vec<String> { r.iter().map(|s| s.to_string()).collect() };
        Self {
            dark: row(DEFAULT_DARK),
            light: row(DEFAULT_LIGHT),
            background: row(DEFAULT_BACKGROUND),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".into() }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub canvas: CanvasConfig,
    pub history: HistoryConfig,
    pub idle: IdleConfig,
    pub brush: BrushConfig,
    pub palette: PaletteConfig,
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref).map_err(|err| {
            Error::Config(format!("unable to read config file {}: {err}", path_ref.display()))
        })?;
        toml::from_str(&contents).map_err(|err| {
            Error::Config(format!("failed to parse config file {}: {err}", path_ref.display()))
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|err| Error::Config(format!("failed to parse config: {err}")))
    }

    /// Config file named on the command line (must load), else the default
    /// file if present, else built-in defaults. CLI flags win over the file.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(level) = &cli.log_level {
            self.logging.level = level.clone();
        }
        if let Some(secs) = cli.idle_timeout {
            self.idle.timeout_secs = secs;
        }
        if let Some(columns) = cli.columns {
            self.canvas.columns = columns;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.canvas.board_width == 0 || self.canvas.board_height == 0 {
            return Err(Error::Config("canvas.board_width and board_height must be greater than zero".into()));
        }
        if self.canvas.columns == 0 {
            return Err(Error::Config("canvas.columns must be greater than zero".into()));
        }
        if self.history.max_states == 0 || self.history.max_states > MAX_STATES_LIMIT {
            return Err(Error::Config(format!(
                "history.max_states must be between 1 and {MAX_STATES_LIMIT}"
            )));
        }
        if self.idle.timeout_secs == 0 {
            return Err(Error::Config("idle.timeout_secs must be greater than zero".into()));
        }
        if self.brush.width == 0 || self.brush.sizes.contains(&0) {
            return Err(Error::Config("brush widths must be greater than zero".into()));
        }
        self.shade()?;
        self.palette()?;
        Ok(())
    }

    pub fn shade(&self) -> Result<Shade> {
        self.brush.shade.parse()
    }

    pub fn palette(&self) -> Result<Palette> {
        Palette::from_hex(&self.palette.dark[..], &self.palette.light[..], &self.palette.background[..])
    }

    pub fn session_settings(&self) -> Result<SessionSettings> {
        Ok(SessionSettings {
            board_width: self.canvas.board_width,
            board_height: self.canvas.board_height,
            max_states: self.history.max_states,
            idle_timeout_secs: self.idle.timeout_secs,
            draw_state: DrawState {
                shade: self.shade()?,
                width: self.brush.width,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        config.validate().unwrap();
        assert_eq!(config.palette().unwrap(), Palette::default());
        assert_eq!(config.history.max_states, 10);
        assert_eq!(config.idle.timeout_secs, 60);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r##"
            [canvas]
            columns = 2

            [brush]
            shade = "light"

            [palette]
            dark = ["#000000", "#111111"]
            light = ["#ffffff", "#eeeeee"]
            background = ["#ff0000", "#00ff00"]
            "##,
        )
        .unwrap();
        config.validate().unwrap();
        assert_eq!(config.canvas.columns, 2);
        assert_eq!(config.canvas.board_width, 320);
        assert_eq!(config.shade().unwrap(), Shade::Light);
        assert_eq!(config.palette().unwrap().len(), 2);
    }

    #[test]
    fn unknown_shade_fails_validation() {
        let config = Config::from_toml("[brush]\nshade = \"neon\"\n").unwrap();
        assert!(matches!(config.validate(), Err(Error::UnknownShade(_))));
    }

    #[test]
    fn bad_values_fail_validation() {
        let config = Config::from_toml("[history]\nmax_states = 0\n").unwrap();
        assert!(config.validate().is_err());
        let config = Config::from_toml("[palette]\ndark = [\"#000000\"]\n").unwrap();
        assert!(config.validate().is_err());
        assert!(Config::from_toml("[canvas]\ncolumns = \"three\"\n").is_err());
    }

    #[test]
    fn huge_history_is_rejected() {
        let config = Config::from_toml("[history]\nmax_states = 9223372036854775807\n").unwrap();
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        let config = Config::from_toml("[history]\nmax_states = 100\n").unwrap();
        config.validate().unwrap();
    }

    #[test]
    fn cli_overrides_file() {
        let mut config = Config::default();
        let cli = Cli::parse_from(["warhol-boards", "--idle-timeout", "5", "--columns", "2", "--log-level", "debug"]);
        config.apply_cli(&cli);
        assert_eq!(config.idle.timeout_secs, 5);
        assert_eq!(config.canvas.columns, 2);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn config_file_round_trips_through_disk() {
        let path = std::env::temp_dir().join("warhol-boards-config-test.toml");
        let mut config = Config::default();
        config.idle.timeout_secs = 90;
        fs::write(&path, toml::to_string(&config).unwrap()).unwrap();
        let loaded = Config::from_file(&path).unwrap();
        assert_eq!(loaded, config);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(matches!(
            Config::from_file("/definitely/not/here.toml"),
            Err(Error::Config(_))
        ));
    }
}
