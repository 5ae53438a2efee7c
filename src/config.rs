use crate::day::{DayCellOptions, DayStyles, MarkedDate};
use serde::{Deserialize, Deserializer};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use time::{Date, format_description::FormatItem, macros::format_description};

pub(crate) static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

const CONFIG_PATH_ENV_VAR: &str = "CALDAY_CONFIG_FILE";

const DEFAULT_SIZE: f64 = 7.0;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("highlight_date_number_style must set a font_size")]
    MissingHighlightFontSize,
    #[error("disabled_date_opacity must be between 0 and 1, got {0}")]
    InvalidOpacity(f64),
}

/// The configuration file as written
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    size: f64,
    #[serde(deserialize_with = "deserialize_opt_date")]
    min_date: Option<Date>,
    #[serde(deserialize_with = "deserialize_opt_date")]
    max_date: Option<Date>,
    cell: DayCellOptions,
    marked_dates: Vec<MarkedDate>,
}

impl Default for RawConfig {
    fn default() -> RawConfig {
        RawConfig {
            size: DEFAULT_SIZE,
            min_date: None,
            max_date: None,
            cell: DayCellOptions::default(),
            marked_dates: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Config {
    pub(crate) size: f64,
    /// Days before this one are disabled
    pub(crate) min_date: Option<Date>,
    /// Days after this one are disabled
    pub(crate) max_date: Option<Date>,
    pub(crate) styles: DayStyles,
    pub(crate) marked_dates: Vec<MarkedDate>,
}

impl Config {
    pub(crate) fn from_toml_str(s: &str, path: &Path) -> Result<Config, ConfigError> {
        let raw = toml::from_str::<RawConfig>(s).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Result<Config, ConfigError> {
        Ok(Config {
            size: raw.size,
            min_date: raw.min_date,
            max_date: raw.max_date,
            styles: DayStyles::new(raw.cell)?,
            marked_dates: raw.marked_dates,
        })
    }

    pub(crate) fn load(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml_str(&content, path)
    }

    /// Load the config at `explicit_path` if given; otherwise, load the
    /// first config file found in the standard locations, falling back to
    /// the defaults if there is none
    pub(crate) fn load_suitable(explicit_path: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = explicit_path {
            log::info!("Loading config from {}", path.display());
            return Config::load(path);
        }
        for path in config_locations() {
            if path.exists() {
                log::info!("Loading config from {}", path.display());
                return Config::load(&path);
            }
        }
        log::info!("No config file found; using defaults");
        Ok(Config::default())
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            size: DEFAULT_SIZE,
            min_date: None,
            max_date: None,
            styles: DayStyles::default(),
            marked_dates: Vec::new(),
        }
    }
}

fn config_locations() -> Vec<PathBuf> {
    locations_from(
        env::var_os(CONFIG_PATH_ENV_VAR),
        env::var_os("XDG_CONFIG_HOME"),
        dirs::home_dir(),
    )
}

fn locations_from(
    explicit: Option<OsString>,
    xdg_config_home: Option<OsString>,
    home: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(path) = explicit {
        locations.push(PathBuf::from(path));
    }
    let config_dir = xdg_config_home
        .filter(|d| !d.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|h| h.join(".config")));
    if let Some(dir) = config_dir {
        locations.push(dir.join("calday").join("config.toml"));
    }
    locations
}

fn parse_date<E: serde::de::Error>(s: &str) -> Result<Date, E> {
    Date::parse(s, &YMD_FMT).map_err(E::custom)
}

pub(crate) fn deserialize_date<'de, D: Deserializer<'de>>(de: D) -> Result<Date, D::Error> {
    parse_date(&String::deserialize(de)?)
}

fn deserialize_opt_date<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Date>, D::Error> {
    Option::<String>::deserialize(de)?
        .map(|s| parse_date(&s))
        .transpose()
}
