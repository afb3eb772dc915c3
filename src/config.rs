//! Engine configuration, read from a YAML file
//
//  Copyright 2020 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::engine::SearchMode;

////////////////////////////////////////////////////////////////////////////////////////////////////
/// Engine settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How many replies to look ahead
    pub depth: usize,
    /// Time budget for a single move, in milliseconds
    pub time_per_move_ms: u64,
    /// How replies are scored
    pub mode: SearchMode,
    /// File to keep the search cache in between runs
    pub cache_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            depth: 1,
            time_per_move_ms: 5000,
            mode: SearchMode::default(),
            cache_file: None,
        }
    }
}

impl Config {
    /// Returns the default location of the configuration file, `~/.timfish/config.yaml`.
    pub fn default_path() -> PathBuf {
        app_dir().join("config.yaml")
    }

    /// Reads the configuration from the default location, using the defaults if there is no
    /// file there.
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path();

        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Reads the configuration from `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read or isn't valid YAML for a `Config`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;

        Self::from_yaml(&text)
    }

    /// Parses a configuration from YAML text. Empty text gives the defaults.
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_str(text)?)
    }

    /// Returns the time budget for a single move
    pub fn time_per_move(&self) -> Duration {
        Duration::from_millis(self.time_per_move_ms)
    }
}

/// Returns the directory timfish keeps its files in
pub fn app_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".timfish"))
        .unwrap_or_else(|| PathBuf::from("."))
}

////////////////////////////////////////////////////////////////////////////////////////////////////
/// An error reading the configuration
#[derive(Debug)]
pub enum Error {
    /// The file couldn't be read
    Io(io::Error),
    /// The file isn't valid
    Yaml(serde_yaml::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "configuration: {}", err),
            Error::Yaml(err) => write!(f, "configuration: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Yaml(err) => Some(err),
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml(err)
    }
}

/// The result type for reading the configuration
pub type Result<T> = std::result::Result<T, Error>;
