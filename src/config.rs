use crate::storage::resolve_data_path;
use chrono::FixedOffset;
use serde::Serialize;
use std::{env, path::PathBuf, str::FromStr};
use thiserror::Error;

const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a port number, got '{0}'")]
    InvalidPort(String),
    #[error("APP_UTC_OFFSET_MINUTES must be whole minutes within a day, got '{0}'")]
    InvalidOffset(String),
    #[error("APP_THEME must be 'modern' or 'doodle', got '{0}'")]
    InvalidTheme(String),
}

/// Presentation skin handed to the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Modern,
    Doodle,
}

impl FromStr for Theme {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "modern" => Ok(Theme::Modern),
            "doodle" => Ok(Theme::Doodle),
            _ => Err(ConfigError::InvalidTheme(value.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub port: u16,
    pub utc_offset: FixedOffset,
    pub theme: Theme,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match env::var("PORT") {
            Ok(value) => parse_port(&value)?,
            Err(_) => DEFAULT_PORT,
        };
        let utc_offset = match env::var("APP_UTC_OFFSET_MINUTES") {
            Ok(value) => parse_offset(&value)?,
            Err(_) => utc(),
        };
        let theme = match env::var("APP_THEME") {
            Ok(value) => value.parse()?,
            Err(_) => Theme::default(),
        };

        Ok(Self {
            data_path: resolve_data_path(),
            port,
            utc_offset,
            theme,
        })
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidPort(value.to_string()))
}

pub fn parse_offset(value: &str) -> Result<FixedOffset, ConfigError> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .and_then(|minutes| minutes.checked_mul(60))
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| ConfigError::InvalidOffset(value.to_string()))
}

fn utc() -> FixedOffset {
    chrono::Offset::fix(&chrono::Utc)
}
