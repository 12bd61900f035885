// ABOUTME: Configuration module for the slider-export application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::errors::{Result, SliderError};
use crate::html::{DocumentOptions, TextPolicy};
use std::env;

pub const DEFAULT_BASE_NAME: &str = "curved-slider-export";
pub const DEFAULT_ASSET_DIR: &str = "slider-images";
pub const DEFAULT_TITLE: &str = "Curved Scroll Transition";
pub const DEFAULT_PREVIEW_PORT: u16 = 8080;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    /// Prefix of the downloaded artifact name
    pub base_name: String,
    /// Directory inside the archive holding extracted images
    pub asset_dir: String,
    /// Title of the exported document
    pub title: String,
    pub preview_port: u16,
    pub text_policy: TextPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_name: DEFAULT_BASE_NAME.to_string(),
            asset_dir: DEFAULT_ASSET_DIR.to_string(),
            title: DEFAULT_TITLE.to_string(),
            preview_port: DEFAULT_PREVIEW_PORT,
            text_policy: TextPolicy::Raw,
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let base_name =
            env::var("SLIDER_BASE_NAME").unwrap_or_else(|_| DEFAULT_BASE_NAME.to_string());
        let asset_dir =
            env::var("SLIDER_ASSET_DIR").unwrap_or_else(|_| DEFAULT_ASSET_DIR.to_string());
        let title = env::var("SLIDER_TITLE").unwrap_or_else(|_| DEFAULT_TITLE.to_string());
        let preview_port = env::var("SLIDER_PREVIEW_PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PREVIEW_PORT);
        let text_policy = env::var("SLIDER_ESCAPE_TEXT")
            .ok()
            .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
            .map(|escape| {
                if escape {
                    TextPolicy::Escaped
                } else {
                    TextPolicy::Raw
                }
            })
            .unwrap_or(TextPolicy::Raw);

        Self {
            base_name,
            asset_dir,
            title,
            preview_port,
            text_policy,
        }
    }

    /// Check that names used inside artifacts are usable
    pub fn validate(&self) -> Result<()> {
        if self.base_name.trim().is_empty() {
            return Err(SliderError::ConfigError(
                "base name must not be empty".to_string(),
            ));
        }
        let dir = self.asset_dir.as_str();
        if dir.is_empty() || dir == "." || dir == ".." || dir.contains('/') || dir.contains('\\')
        {
            return Err(SliderError::ConfigError(format!(
                "asset directory must be a single plain directory name, got {:?}",
                self.asset_dir
            )));
        }
        Ok(())
    }

    /// Get document generation options from this config
    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            title: self.title.clone(),
            text_policy: self.text_policy,
            ..DocumentOptions::default()
        }
    }
}
