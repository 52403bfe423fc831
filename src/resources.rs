// ABOUTME: Stylesheet resources for the slidecraft application
// ABOUTME: Resolves local or remote CSS into markup that extends a theme's style

use crate::errors::{Result, SlideError};
use crate::themes::ThemeStyle;
use log::{info, warn};
use reqwest::blocking::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;

const FETCH_ATTEMPTS: u32 = 3;

/// How an extra stylesheet ends up in the exported document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceMode {
    /// Inline the stylesheet content in a `<style>` block.
    Embed,
    /// Reference it with a `<link>` tag.
    Link,
}

impl std::str::FromStr for ResourceMode {
    type Err = SlideError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "embed" => Ok(ResourceMode::Embed),
            "link" => Ok(ResourceMode::Link),
            other => Err(SlideError::ValidationError(format!(
                "Unknown resource mode '{}', expected 'embed' or 'link'",
                other
            ))),
        }
    }
}

/// A stylesheet that is either a local file or a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceFile {
    pub path: String,
    pub is_remote: bool,
}

impl ResourceFile {
    pub fn new(path: &str) -> Self {
        let is_remote = path.starts_with("http://") || path.starts_with("https://");
        Self {
            path: path.to_string(),
            is_remote,
        }
    }

    /// Read the stylesheet, fetching it when remote.
    pub fn content(&self) -> Result<String> {
        if self.is_remote {
            self.fetch_remote_content()
        } else {
            self.read_local_content()
        }
    }

    fn fetch_remote_content(&self) -> Result<String> {
        info!("Fetching remote stylesheet: {}", self.path);

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        let mut retry_delay = 1000;
        let mut last_error = None;

        for attempt in 1..=FETCH_ATTEMPTS {
            match client.get(&self.path).send() {
                Ok(response) if response.status().is_success() => {
                    return Ok(response.text()?);
                }
                Ok(response) => {
                    last_error = Some(SlideError::ValidationError(format!(
                        "HTTP error: {}",
                        response.status()
                    )));
                }
                Err(e) => last_error = Some(SlideError::FetchError(e)),
            }

            if attempt < FETCH_ATTEMPTS {
                warn!(
                    "Fetch attempt {} failed, retrying in {} ms",
                    attempt, retry_delay
                );
                std::thread::sleep(Duration::from_millis(retry_delay));
                retry_delay *= 2;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SlideError::ValidationError("Unknown error fetching stylesheet".to_string())
        }))
    }

    fn read_local_content(&self) -> Result<String> {
        info!("Reading local stylesheet: {}", self.path);
        let path = Path::new(&self.path);
        if !path.exists() {
            return Err(SlideError::PathNotFoundError(path.to_path_buf()));
        }
        Ok(fs::read_to_string(path)?)
    }

    /// Markup for this stylesheet: inlined in embed mode, referenced in link mode.
    pub fn tag(&self, mode: ResourceMode) -> Result<String> {
        match mode {
            ResourceMode::Link => Ok(format!(
                r#"<link rel="stylesheet" href="{}">"#,
                quick_xml::escape::escape(&self.path)
            )),
            ResourceMode::Embed => {
                // A literal "</style" would end the block early.
                let content = self.content()?.replace("</style", "<\\/style");
                Ok(format!("<style>\n{}\n</style>", content))
            }
        }
    }
}

/// Append resolved stylesheet markup to a theme style.
pub fn apply_stylesheets(
    style: &mut ThemeStyle,
    files: &[ResourceFile],
    mode: ResourceMode,
) -> Result<()> {
    for file in files {
        style.extra_css.push(file.tag(mode)?);
    }
    Ok(())
}
