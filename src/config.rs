//! Engine configuration.
//!
//! The defaults reproduce the fixed constants of the storefront: a featured
//! window of three products and an undo stack of five actions.
//!
//! ## Example
//!
//! ```
//! use storefront_core::config::StoreConfig;
//!
//! let config: StoreConfig = serde_json::from_str(r#"{"undo_capacity": 8}"#).unwrap();
//! assert_eq!(config.undo_capacity, 8);
//! assert_eq!(config.max_featured, 3);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Size of the featured window at the front of the carousel
pub const MAX_FEATURED: usize = 3;

/// Capacity of the cart undo stack
pub const UNDO_CAPACITY: usize = 5;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Number of products flagged featured at the carousel front
    pub max_featured: usize,

    /// Number of cart actions kept for undo
    pub undo_capacity: usize,

    /// Nodes to pre-allocate in the carousel arena
    pub carousel_capacity: usize,

    /// Nodes to pre-allocate in the directory arena
    pub directory_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_featured: MAX_FEATURED,
            undo_capacity: UNDO_CAPACITY,
            carousel_capacity: 64,
            directory_capacity: 64,
        }
    }
}

impl StoreConfig {
    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: StoreConfig = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the components cannot honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_featured == 0 {
            return Err(ConfigError::Invalid("max_featured must be at least 1".into()));
        }
        if self.undo_capacity == 0 {
            return Err(ConfigError::Invalid("undo_capacity must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();

        assert_eq!(config.max_featured, 3);
        assert_eq!(config.undo_capacity, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_featured": 4, "carousel_capacity": 1024}}"#).unwrap();

        let config = StoreConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.max_featured, 4);
        assert_eq!(config.carousel_capacity, 1024);
        assert_eq!(config.undo_capacity, UNDO_CAPACITY);
    }

    #[test]
    fn test_from_json_file_rejects_zero_window() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_featured": 0}}"#).unwrap();

        let err = StoreConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = StoreConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_from_json_file_malformed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = StoreConfig::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
