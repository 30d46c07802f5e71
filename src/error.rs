//! Error types for configuration and input loading.
//!
//! Marker layout itself never fails; only reading files can.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading `senkyoku.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `line`/`column` are one-based, 0 when the parser gave no span.
    #[error("Invalid configuration at {path}:{line}:{column}: {message}")]
    ParseError {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Parsed fine but a value is out of range.
    #[error("Invalid configuration in {path}: {key} {message}")]
    Invalid {
        path: PathBuf,
        key: &'static str,
        message: String,
    },
}

/// Errors raised while reading district GeoJSON or candidate CSV.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse GeoJSON in {path}")]
    GeoJson {
        path: PathBuf,
        #[source]
        source: Box<geojson::Error>,
    },

    #[error("GeoJSON in {path} must be a FeatureCollection")]
    NotFeatureCollection { path: PathBuf },

    #[error("Failed to parse candidate CSV {path}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Candidate CSV {path} has no {column:?} column")]
    MissingColumn { path: PathBuf, column: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_display_includes_position() {
        let err = ConfigError::ParseError {
            path: PathBuf::from("senkyoku.toml"),
            line: 3,
            column: 7,
            message: "expected `=`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("senkyoku.toml:3:7"), "got: {msg}");
        assert!(msg.contains("expected `=`"));
    }

    #[test]
    fn invalid_display_names_the_key() {
        let err = ConfigError::Invalid {
            path: PathBuf::from("senkyoku.toml"),
            key: "view.min_zoom",
            message: "must not exceed view.max_zoom".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("view.min_zoom"), "got: {msg}");
        assert!(msg.contains("senkyoku.toml"));
    }

    #[test]
    fn io_error_chains_source() {
        let err = DataError::Io {
            path: PathBuf::from("missing.geojson"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("missing.geojson"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
