// ABOUTME: Main entry point for the slider-export program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::debug;
use slider_export::html::{self, TextPolicy};
use slider_export::{load_deck, Config, DirectorySink, Exporter, HttpPreview, Notice};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a deck as a standalone HTML file, or a ZIP when it has embedded images
    Export(ExportArgs),

    /// Serve a deck on a local preview server
    Preview(PreviewArgs),
}

#[derive(Args)]
struct DeckArgs {
    /// Path to the deck JSON file
    #[arg(short, long)]
    deck: PathBuf,

    /// Title of the generated document (defaults to the deck title)
    #[arg(long)]
    title: Option<String>,

    /// Escape slide text instead of inserting it as raw HTML
    #[arg(long)]
    escape_text: bool,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    deck: DeckArgs,

    /// Directory the exported file is saved into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Prefix of the exported file name
    #[arg(long)]
    base_name: Option<String>,

    /// Name of the image directory inside the ZIP
    #[arg(long)]
    asset_dir: Option<String>,
}

#[derive(Args)]
struct PreviewArgs {
    #[command(flatten)]
    deck: DeckArgs,

    /// Port for the preview server
    #[arg(short, long)]
    port: Option<u16>,

    /// Also write the preview document to this file
    #[arg(long)]
    save: Option<PathBuf>,
}

fn apply_deck_args(config: &mut Config, args: &DeckArgs, deck_title: Option<String>) {
    if let Some(title) = args.title.clone().or(deck_title) {
        config.title = title;
    }
    if args.escape_text {
        config.text_policy = TextPolicy::Escaped;
    }
}

fn report(notice: &Notice) -> bool {
    if notice.is_success() {
        println!("{}", notice);
    } else {
        eprintln!("{}", notice);
    }
    notice.is_success()
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = Config::from_env();

    let ok = match cli.command {
        Some(Commands::Export(args)) => {
            let deck = load_deck(&args.deck.deck)
                .with_context(|| format!("Failed to load deck {:?}", args.deck.deck))?;
            apply_deck_args(&mut config, &args.deck, deck.title);
            if let Some(base_name) = args.base_name {
                config.base_name = base_name;
            }
            if let Some(asset_dir) = args.asset_dir {
                config.asset_dir = asset_dir;
            }
            debug!("Export configuration: {:?}", config);

            let mut exporter = Exporter::new(config)?;
            let mut sink = DirectorySink::new(args.output_dir);
            report(&exporter.export(&deck.slides, &mut sink))
        }
        Some(Commands::Preview(args)) => {
            let deck = load_deck(&args.deck.deck)
                .with_context(|| format!("Failed to load deck {:?}", args.deck.deck))?;
            apply_deck_args(&mut config, &args.deck, deck.title);
            if let Some(port) = args.port {
                config.preview_port = port;
            }

            let mut preview = HttpPreview::new(config.preview_port);
            let mut exporter = Exporter::new(config)?;
            let notice = exporter.preview(&deck.slides, &mut preview);
            let ok = report(&notice);
            if ok {
                if let Some(path) = &args.save {
                    let document = exporter.render_preview(&deck.slides)?;
                    html::write_html_to_file(&document, path)?;
                    println!("Saved preview document to {}", path.display());
                }
                println!("Press Ctrl+C to stop the preview server.");
                preview.wait();
            }
            ok
        }
        None => {
            println!("No command specified. Use --help for usage information.");
            true
        }
    };

    if !ok {
        std::process::exit(1);
    }
    Ok(())
}
