// ABOUTME: Configuration module for the slidecraft application
// ABOUTME: Provides configuration settings and environment variable handling

use crate::charts::ChartCanvas;
use crate::html::ExportOptions;
use std::env;
use std::time::Duration;

pub const DEFAULT_THEME: &str = "minimal";

/// Global configuration for the application
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub default_theme: String,
    pub debounce_ms: u64,
    pub chart_width: f64,
    pub chart_height: f64,
    pub watermark: bool,
    pub embed_resources: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_theme: DEFAULT_THEME.to_string(),
            debounce_ms: 300,
            chart_width: 600.0,
            chart_height: 320.0,
            watermark: true,
            embed_resources: true,
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
        let defaults = Self::default();

        let default_theme = env::var("SLIDECRAFT_THEME")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.default_theme);
        let debounce_ms = env::var("SLIDECRAFT_DEBOUNCE_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(defaults.debounce_ms);
        let chart_width = env::var("SLIDECRAFT_CHART_WIDTH")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|w| *w > 0.0)
            .unwrap_or(defaults.chart_width);
        let chart_height = env::var("SLIDECRAFT_CHART_HEIGHT")
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|h| *h > 0.0)
            .unwrap_or(defaults.chart_height);
        let watermark = env::var("SLIDECRAFT_WATERMARK")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(defaults.watermark);
        let embed_resources = env::var("SLIDECRAFT_EMBED_RESOURCES")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(defaults.embed_resources);

        Self {
            default_theme,
            debounce_ms,
            chart_width,
            chart_height,
            watermark,
            embed_resources,
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn chart_canvas(&self) -> ChartCanvas {
        ChartCanvas::new(self.chart_width, self.chart_height)
    }

    /// Export options from this config; `watermark` overrides the configured value when set.
    pub fn export_options(&self, watermark: Option<bool>) -> ExportOptions {
        ExportOptions {
            watermark: watermark.unwrap_or(self.watermark),
            canvas: self.chart_canvas(),
        }
    }
}
