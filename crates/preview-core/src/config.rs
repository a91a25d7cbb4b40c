//! Runtime configuration read by the web frontend at startup.
//!
//! Tuning values live in [`crate::constants`]; this struct only carries the
//! deployment-specific bits (image endpoint, key, log level, seed).

use serde::Deserialize;

use crate::error::{PreviewError, PreviewResult};

pub const DEFAULT_IMAGE_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-image:generateContent";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct PreviewConfig {
    pub image_endpoint: String,
    pub api_key: String,
    pub log_level: String,
    /// Particle layout seed. `None` picks a fresh seed per scene.
    pub seed: Option<u64>,
    /// Id of the `<script type="application/json">` holding the website description.
    pub website_element_id: String,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            image_endpoint: DEFAULT_IMAGE_ENDPOINT.to_string(),
            api_key: String::new(),
            log_level: "info".to_string(),
            seed: None,
            website_element_id: "website-data".to_string(),
        }
    }
}

impl PreviewConfig {
    pub fn from_json(json: &str) -> PreviewResult<Self> {
        serde_json::from_str(json).map_err(|e| PreviewError::config(e.to_string()))
    }

    /// Parse `json` if present, falling back to defaults on any failure.
    pub fn from_json_or_default(json: Option<&str>) -> Self {
        match json {
            Some(text) => match Self::from_json(text) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("[config] {e}; using defaults");
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    pub fn log_level(&self) -> log::Level {
        match self.log_level.to_ascii_lowercase().as_str() {
            "error" => log::Level::Error,
            "warn" => log::Level::Warn,
            "debug" => log::Level::Debug,
            "trace" => log::Level::Trace,
            _ => log::Level::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = PreviewConfig::from_json(r#"{"apiKey":"k","seed":7}"#).unwrap();
        assert_eq!(cfg.api_key, "k");
        assert_eq!(cfg.seed, Some(7));
        assert_eq!(cfg.image_endpoint, DEFAULT_IMAGE_ENDPOINT);
        assert_eq!(cfg.website_element_id, "website-data");
    }

    #[test]
    fn broken_json_falls_back() {
        let cfg = PreviewConfig::from_json_or_default(Some("{"));
        assert_eq!(cfg, PreviewConfig::default());
        assert_eq!(PreviewConfig::from_json_or_default(None), cfg);
    }

    #[test]
    fn log_level_parsing_is_lenient() {
        let mut cfg = PreviewConfig::default();
        cfg.log_level = "DEBUG".into();
        assert_eq!(cfg.log_level(), log::Level::Debug);
        cfg.log_level = "loud".into();
        assert_eq!(cfg.log_level(), log::Level::Info);
    }
}
