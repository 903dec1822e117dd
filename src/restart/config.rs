//! Restart test configuration.
//!
//! Only the entropy estimate and the working precision are tunable. The
//! matrix geometry and the significance level are fixed by the test.

use crate::arith::{Precision, DEFAULT_PRECISION_DIGITS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Entropy estimate used when none is given, in bits per symbol.
pub const DEFAULT_H_I: f64 = 0.8;

/// Lowest accepted working precision, in decimal digits.
pub const MIN_PRECISION_DIGITS: u32 = 100;

/// Parameters of one restart test run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RestartConfig {
    /// Claimed min-entropy per symbol (H_I), in bits.
    pub h_i: f64,
    /// Working precision of the tail sum, in decimal digits.
    pub precision_digits: u32,
}

impl Default for RestartConfig {
    fn default() -> Self {
        Self {
            h_i: DEFAULT_H_I,
            precision_digits: DEFAULT_PRECISION_DIGITS,
        }
    }
}

impl RestartConfig {
    /// Creates a configuration with the given entropy estimate.
    pub fn with_entropy(h_i: f64) -> Self {
        Self {
            h_i,
            ..Default::default()
        }
    }

    /// Working precision for the arithmetic engine.
    pub fn precision(&self) -> Precision {
        Precision::from_digits(self.precision_digits)
    }

    /// Validates the configuration parameters.
    ///
    /// H_I must lie in (0, 8]; the tighter bound of the matrix's own
    /// bits-per-symbol is only known once the matrix is loaded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.h_i.is_finite() || self.h_i <= 0.0 || self.h_i > 8.0 {
            return Err(ConfigError::InvalidEntropy(self.h_i));
        }
        if self.precision_digits < MIN_PRECISION_DIGITS {
            return Err(ConfigError::InsufficientPrecision {
                digits: self.precision_digits,
                min: MIN_PRECISION_DIGITS,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid entropy estimate H_I = {0} (must be in (0, 8])")]
    InvalidEntropy(f64),
    #[error("precision of {digits} digits is below the minimum of {min}")]
    InsufficientPrecision { digits: u32, min: u32 },
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub restart: RestartConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Trace every tail term at DEBUG level.
    pub verbose: bool,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.restart.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config_valid() {
        let config = RestartConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.h_i, 0.8);
        assert_eq!(config.precision().bits(), 6644);
    }

    #[test]
    fn test_entropy_bounds() {
        for h_i in [0.0, -1.0, 8.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                RestartConfig::with_entropy(h_i).validate(),
                Err(ConfigError::InvalidEntropy(_))
            ));
        }
        assert!(RestartConfig::with_entropy(8.0).validate().is_ok());
        assert!(RestartConfig::with_entropy(1e-3).validate().is_ok());
    }

    #[test]
    fn test_low_precision_invalid() {
        let config = RestartConfig {
            precision_digits: 20,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InsufficientPrecision { digits: 20, min: 100 })
        ));
    }

    #[test]
    fn test_file_config_partial_sections() {
        let file = write_config("[restart]\nh_i = 1.5\n\n[output]\nverbose = true\n");
        let config = FileConfig::from_file(file.path()).unwrap();

        assert_eq!(config.restart.h_i, 1.5);
        assert_eq!(config.restart.precision_digits, DEFAULT_PRECISION_DIGITS);
        assert!(config.output.verbose);
    }

    #[test]
    fn test_file_config_empty_uses_defaults() {
        let file = write_config("");
        let config = FileConfig::from_file(file.path()).unwrap();

        assert_eq!(config.restart.h_i, DEFAULT_H_I);
        assert!(!config.output.verbose);
    }

    #[test]
    fn test_file_config_rejects_invalid_values() {
        let file = write_config("[restart]\nh_i = 12.0\n");
        assert!(matches!(
            FileConfig::from_file(file.path()),
            Err(ConfigError::InvalidEntropy(_))
        ));

        let file = write_config("[restart]\nh_i = \"high\"\n");
        assert!(matches!(
            FileConfig::from_file(file.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            FileConfig::from_file("/nonexistent/restart.toml"),
            Err(ConfigError::FileReadError(_))
        ));
    }
}
