// ABOUTME: Main entry point for the slidecraft program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use clap::{Args, Parser, Subcommand};
use slidecraft::{Config, Deck, ResourceFile, ResourceMode, ThemeCatalog, WatchConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available themes
    Themes,

    /// Write a theme's starter deck as JSON
    New(NewArgs),

    /// Export a deck as a self-contained HTML presentation
    Export(ExportArgs),

    /// Re-export a deck whenever it changes
    Watch(WatchArgs),
}

#[derive(Args)]
struct NewArgs {
    /// Theme id (see `slidecraft themes`)
    #[arg(short, long)]
    theme: Option<String>,

    /// Path to the deck JSON file to create
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct StyleArgs {
    /// Theme id; defaults to SLIDECRAFT_THEME or "minimal"
    #[arg(short, long)]
    theme: Option<String>,

    /// Extra CSS files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    css: Option<Vec<String>>,

    /// Mode for CSS: 'embed' to embed content or 'link' to reference
    #[arg(long)]
    mode: Option<String>,

    /// Leave out the attribution mark
    #[arg(long)]
    no_watermark: bool,
}

#[derive(Args)]
struct ExportArgs {
    /// Deck JSON file; the theme's starter deck is used when omitted
    #[arg(short, long)]
    deck: Option<PathBuf>,

    /// Path to output HTML file; defaults to a name derived from the deck
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    style: StyleArgs,
}

#[derive(Args)]
struct WatchArgs {
    /// Deck JSON file to watch
    #[arg(short, long)]
    deck: PathBuf,

    /// Path to output HTML file
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    style: StyleArgs,

    /// Serve the output with a local web server
    #[arg(long)]
    serve: bool,

    /// Port for the local web server
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl StyleArgs {
    fn theme_id(&self, config: &Config) -> String {
        self.theme
            .clone()
            .unwrap_or_else(|| config.default_theme.clone())
    }

    fn css_files(&self) -> Vec<ResourceFile> {
        self.css
            .as_ref()
            .map(|files| files.iter().map(|path| ResourceFile::new(path)).collect())
            .unwrap_or_default()
    }

    fn resource_mode(&self, config: &Config) -> anyhow::Result<ResourceMode> {
        match &self.mode {
            Some(mode) => Ok(mode.parse()?),
            None if config.embed_resources => Ok(ResourceMode::Embed),
            None => Ok(ResourceMode::Link),
        }
    }

    fn watermark(&self) -> Option<bool> {
        self.no_watermark.then_some(false)
    }
}

fn list_themes(catalog: &ThemeCatalog) -> anyhow::Result<()> {
    for theme in catalog.themes() {
        println!("{:<12} {:<12} {}", theme.id, theme.name, theme.description);
    }
    Ok(())
}

fn new_deck(args: &NewArgs, catalog: &ThemeCatalog, config: &Config) -> anyhow::Result<()> {
    let theme_id = args.theme.clone().unwrap_or_else(|| config.default_theme.clone());
    let theme = catalog
        .get(&theme_id)
        .ok_or_else(|| slidecraft::SlideError::UnknownTheme(theme_id.clone()))?;
    slidecraft::save_deck(&theme.default_deck, &args.output)?;
    println!("Deck created: {:?}", args.output);
    Ok(())
}

fn export(args: &ExportArgs, catalog: &ThemeCatalog, config: &Config) -> anyhow::Result<()> {
    let theme_id = args.style.theme_id(config);
    let theme = catalog
        .get(&theme_id)
        .ok_or_else(|| slidecraft::SlideError::UnknownTheme(theme_id.clone()))?;

    let deck: Deck = match &args.deck {
        Some(path) => slidecraft::load_deck(path)?,
        None => theme.default_deck.clone(),
    };

    let mut style = theme.style.clone();
    slidecraft::resources::apply_stylesheets(
        &mut style,
        &args.style.css_files(),
        args.style.resource_mode(config)?,
    )?;

    let options = config.export_options(args.style.watermark());
    let html = slidecraft::render_document(&deck, &style, &options);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(slidecraft::suggested_filename(&deck)));
    slidecraft::write_document(&html, &output)?;

    println!("HTML generated successfully: {:?}", output);
    Ok(())
}

fn watch(args: &WatchArgs, catalog: &ThemeCatalog, config: &Config) -> anyhow::Result<()> {
    let watch_config = WatchConfig {
        deck_path: args.deck.clone(),
        html_output: args.output.clone(),
        theme_id: args.style.theme_id(config),
        css_files: args.style.css_files(),
        resource_mode: args.style.resource_mode(config)?,
        export: config.export_options(args.style.watermark()),
        debounce_ms: WatchConfig::default().debounce_ms,
        serve: args.serve,
        port: args.port,
    };
    slidecraft::watch_deck(watch_config, catalog)?;
    Ok(())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let catalog = ThemeCatalog::builtin();

    let result = match &cli.command {
        Some(Commands::Themes) => list_themes(&catalog),
        Some(Commands::New(args)) => {
            println!("Executing new command...");
            new_deck(args, &catalog, &config)
        }
        Some(Commands::Export(args)) => {
            println!("Executing export command...");
            export(args, &catalog, &config)
        }
        Some(Commands::Watch(args)) => {
            println!("Executing watch command...");
            watch(args, &catalog, &config)
        }
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
