//! cnxmd - CNXML textbook to Markdown converter

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use cnxmd::config::{Config, load_config};
use cnxmd::{Book, Result, export, import};

#[derive(Parser, Debug)]
#[command(name = "cnxmd")]
#[command(version, about = "Convert a CNXML textbook to Markdown", long_about = None)]
#[command(after_help = "EXAMPLES:
    cnxmd                          Convert the book in the current directory
    cnxmd ~/osbooks-physics -b physics
    cnxmd . --media-url https://cdn.example.com/media")]
struct Cli {
    /// Book repository root (contains collections/ and modules/)
    #[arg(value_name = "ROOT", default_value = ".")]
    root: PathBuf,

    /// Book identifier (selects collections/<BOOK>.collection.xml)
    #[arg(short, long)]
    book: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL for image targets
    #[arg(long)]
    media_url: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        LevelFilter::Error
    } else {
        LevelFilter::from_str(&cli.log_level).unwrap_or_else(|_| {
            eprintln!("Invalid log level: {}. Using 'warn' instead.", cli.log_level);
            LevelFilter::Warn
        })
    };

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    debug!(cli:?; "Parsed arguments");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli)?;
    let root = cli.root.as_path();

    let collection_file = config.collection_file(root);
    info!(book = config.book_id.as_str(), collection = collection_file.display().to_string(); "Converting book");

    let collection = import::read_xml(&collection_file)?;
    let sources = import::read_module_sources(&config.modules_dir(root))?;

    let book = Book::convert(&collection, &sources, &config.render_options())?;
    export::write_book(&book, &config.content_dir(root), &config.toc_file(root))?;

    if !cli.quiet {
        print_summary(&book, &config, root);
    }
    Ok(())
}

/// Config file values with command-line overrides applied.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = load_config(&cli.root, cli.config.as_deref())?;
    if let Some(book) = &cli.book {
        config.book_id = book.clone();
    }
    if let Some(url) = &cli.media_url {
        config.media_url = Some(url.clone());
    }
    Ok(config)
}

fn print_summary(book: &Book, config: &Config, root: &Path) {
    println!("Book: {}", book.toc.title());
    println!("Modules: {}", book.modules.len());
    println!("Pages in TOC: {}", book.toc.page_ids().len());
    println!("Content: {}", config.content_dir(root).display());
    println!("TOC: {}", config.toc_file(root).display());
}
