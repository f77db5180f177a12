use std::io;
use thiserror::Error;
use std::fmt::Display;
use std::str::Utf8Error;
use btleplug;
use serde_json;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine path to config file")]
    NoConfigPath,

    #[error("Misconfiguration: service identifier {value:?} is not a valid UUID: {source}")]
    InvalidServiceId { value: String, source: uuid::Error },

    #[error("Misconfiguration: protocol type {value:?} is not a valid type identifier")]
    InvalidProtocolType { value: String },

    #[error("Failed to encode/decode config as utf-8: {source}")]
    Utf8Error { #[from] source: Utf8Error },

    #[error("Failed to read/write config file: {source}")]
    IOError { #[from] source: io::Error },

    #[error("Failed to parse/build config file: {source}")]
    JsonError { #[from] source: serde_json::Error },
}

impl ConfigError {
    pub fn is_file_not_found_error(&self) -> bool {
        match self {
            ConfigError::IOError { source } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }

    /// True for the errors that indicate a packaging defect rather than an IO problem.
    pub fn is_misconfiguration(&self) -> bool {
        matches!(self, ConfigError::InvalidServiceId { .. } | ConfigError::InvalidProtocolType { .. })
    }
}

#[derive(Error, Debug)]
pub enum LocatorError {
    #[error("Error communicating with the bluetooth stack (btleplug): {source}")]
    Btle { #[from] source: btleplug::Error },

    #[error("No bluetooth adapter is available")]
    NoAdapter,
}

#[derive(Error, Debug)]
pub enum AppRunError {
    #[error("Failed to start device locator (config): {source}")]
    ConfigError { #[from] source: ConfigError },

    #[error("Failed to run device locator: {source}")]
    LocatorError { #[from] source: LocatorError },

    #[error("Failed to wait for shutdown signal: {source}")]
    SignalError { source: io::Error },
}

pub fn report_error<T: Display>(message: &'static str, error: &T) {
    log::error!(concat!("device-locator ", env!("CARGO_PKG_VERSION"), ": {}: {}"), message, error);
}
