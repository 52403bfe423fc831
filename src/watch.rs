// ABOUTME: Watch module for monitoring deck changes and re-exporting
// ABOUTME: Provides file watching, auto-regeneration of HTML and a local preview server

use log::{debug, error, info};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use notify::{RecursiveMode, Watcher};
use notify_debouncer_full::new_debouncer;
use tiny_http::{Header, Response, Server, StatusCode};

use crate::errors::{Result, SlideError};
use crate::export;
use crate::html::{render_document, ExportOptions};
use crate::resources::{apply_stylesheets, ResourceFile, ResourceMode};
use crate::themes::ThemeCatalog;
use crate::utils;

/// Configuration for watch mode
pub struct WatchConfig {
    /// Deck JSON file to watch
    pub deck_path: PathBuf,

    /// Output HTML file path
    pub html_output: PathBuf,

    /// Theme whose styling is applied to the deck
    pub theme_id: String,

    /// Extra stylesheets; local ones are watched too
    pub css_files: Vec<ResourceFile>,

    pub resource_mode: ResourceMode,

    pub export: ExportOptions,

    /// Debounce time in milliseconds
    pub debounce_ms: u64,

    /// Whether to serve the HTML using a local web server
    pub serve: bool,

    /// Port for local web server
    pub port: u16,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            deck_path: PathBuf::new(),
            html_output: PathBuf::new(),
            theme_id: crate::config::DEFAULT_THEME.to_string(),
            css_files: Vec::new(),
            resource_mode: ResourceMode::Embed,
            export: ExportOptions::default(),
            debounce_ms: 500,
            serve: false,
            port: 8080,
        }
    }
}

fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" => "text/html; charset=utf-8",
        "css" => "text/css",
        "json" => "application/json",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Start a simple HTTP server that serves the exported document and its directory
fn start_server(html_path: PathBuf, port: u16) -> Result<()> {
    let server = Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| SlideError::WatchError(format!("Failed to start HTTP server: {}", e)))?;

    let html_dir = html_path.parent().unwrap_or(Path::new(".")).to_path_buf();
    let html_file_name = html_path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    thread::spawn(move || {
        info!("HTTP server listening on http://localhost:{}", port);
        println!("HTTP server listening on http://localhost:{}", port);

        for request in server.incoming_requests() {
            let url_path = request.url().split('?').next().unwrap_or("/").to_string();

            let file_path = if url_path == "/" {
                html_dir.join(&html_file_name)
            } else {
                html_dir.join(url_path.trim_start_matches('/'))
            };

            debug!("Request for {:?} -> {:?}", url_path, file_path);

            // Keep requests inside the output directory.
            if url_path.split('/').any(|part| part == "..") || !file_path.is_file() {
                let response =
                    Response::from_string("404 Not Found").with_status_code(StatusCode(404));
                let _ = request.respond(response);
                continue;
            }

            match fs::read(&file_path) {
                Ok(content) => {
                    let mut response = Response::from_data(content);
                    if let Ok(header) =
                        Header::from_bytes(&b"Content-Type"[..], content_type(&file_path).as_bytes())
                    {
                        response = response.with_header(header);
                    }
                    if let Err(e) = request.respond(response) {
                        error!("Failed to send response: {}", e);
                    }
                }
                Err(e) => {
                    error!("Failed to read file {:?}: {}", file_path, e);
                    let response = Response::from_string(format!("Failed to read file: {}", e))
                        .with_status_code(StatusCode(500));
                    let _ = request.respond(response);
                }
            }
        }
    });

    Ok(())
}

/// Watch a deck file and re-export it whenever it or a local stylesheet changes
pub fn watch_deck(config: WatchConfig, catalog: &ThemeCatalog) -> Result<()> {
    utils::validate_file_exists(&config.deck_path)?;
    utils::ensure_parent_directory_exists(&config.html_output)?;
    if catalog.get(&config.theme_id).is_none() {
        return Err(SlideError::UnknownTheme(config.theme_id.clone()));
    }

    regenerate_output(&config, catalog)?;

    if config.serve {
        start_server(config.html_output.clone(), config.port)?;
    }

    let (tx, rx) = mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(config.debounce_ms), None, tx)
        .map_err(|e| SlideError::WatchError(format!("Failed to create file watcher: {}", e)))?;

    let watch_path = match config.deck_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let abs_watch_path = utils::get_absolute_path(watch_path)?;

    debug!("Watching absolute path: {:?}", abs_watch_path);

    debouncer
        .watcher()
        .watch(&abs_watch_path, RecursiveMode::Recursive)
        .map_err(|e| {
            SlideError::WatchError(format!(
                "Failed to start watching {:?}: {}",
                abs_watch_path, e
            ))
        })?;

    info!("Watching for changes in {:?}", watch_path);
    println!(
        "Watching for changes in {:?} (Press Ctrl+C to stop)",
        watch_path
    );

    let mut last_processed = Instant::now();

    for result in rx {
        match result {
            Ok(events) => {
                let relevant = events.iter().any(|event| {
                    event.paths.iter().any(|path| {
                        let relevant = is_relevant_path(path, &config);
                        if relevant {
                            debug!("Detected relevant change in {:?}", path);
                        }
                        relevant
                    })
                });

                let now = Instant::now();
                if relevant
                    && now.duration_since(last_processed)
                        > Duration::from_millis(config.debounce_ms)
                {
                    match regenerate_output(&config, catalog) {
                        Ok(()) => {
                            info!("Re-exported {:?}", config.html_output);
                            last_processed = now;
                        }
                        Err(e) => error!("Failed to re-export: {}", e),
                    }
                }
            }
            Err(errors) => error!("Watch error: {:?}", errors),
        }
    }

    Ok(())
}

/// The deck itself or one of the local stylesheets; never the output file.
fn is_relevant_path(path: &Path, config: &WatchConfig) -> bool {
    let Ok(path_abs) = utils::get_absolute_path(path) else {
        return false;
    };
    let same_file = |other: &Path| {
        utils::get_absolute_path(other)
            .map(|other| other == path_abs)
            .unwrap_or(false)
    };

    if same_file(&config.html_output) {
        return false;
    }
    if same_file(&config.deck_path) {
        return true;
    }
    config
        .css_files
        .iter()
        .filter(|css| !css.is_remote)
        .any(|css| same_file(Path::new(&css.path)))
}

/// Load the deck and export it with the configured theme and stylesheets
pub fn regenerate_output(config: &WatchConfig, catalog: &ThemeCatalog) -> Result<()> {
    let theme = catalog
        .get(&config.theme_id)
        .ok_or_else(|| SlideError::UnknownTheme(config.theme_id.clone()))?;
    let deck = export::load_deck(&config.deck_path)?;

    let mut style = theme.style.clone();
    apply_stylesheets(&mut style, &config.css_files, config.resource_mode)?;

    let html = render_document(&deck, &style, &config.export);
    export::write_document(&html, &config.html_output)
}
