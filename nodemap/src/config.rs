use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{nodemap::ConnectFrom, render::Gradient};

/// Settings for turning an image into a solved image, usually read from a JSON file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)] // missing fields fall back to their defaults
pub struct Config {
    /// Pixels with a luma below this are walls
    pub wall_threshold: u8,
    pub gradient: Gradient,
    pub connect_from: ConnectFrom,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wall_threshold: 128,
            gradient: Gradient::default(),
            connect_from: ConnectFrom::default(),
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self, anyhow::Error> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.wall_threshold, 128);
        assert_eq!(config.connect_from, ConnectFrom::Critical);
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_json(
            r#"{
                "connect_from": "all",
                "gradient": { "from": [0, 255, 0], "to": [255, 255, 0] }
            }"#,
        )
        .unwrap();

        assert_eq!(config.wall_threshold, 128);
        assert_eq!(config.connect_from, ConnectFrom::All);
        assert_eq!(config.gradient.from, [0, 255, 0]);
        assert_eq!(config.gradient.to, [255, 255, 0]);
    }

    #[test]
    fn test_bad_config() {
        assert!(Config::from_json(r#"{ "connect_from": "sometimes" }"#).is_err());
        assert!(Config::from_json(r#"{ "wall_threshold": 300 }"#).is_err());
    }
}
