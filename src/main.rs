// ABOUTME: Main entry point for the deckgen program.
// ABOUTME: Provides the CLI interface and runs the deck build from the library.

use clap::error::ErrorKind;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;

/// Assemble the twelve-slide deck into OUTPUT_DIR.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory the presentation is written to (created if missing)
    output_dir: PathBuf,

    /// Deck content file (JSON) to use instead of the built-in deck
    #[arg(long)]
    deck: Option<PathBuf>,

    /// Per-image download timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print the outline of the written presentation
    #[arg(long)]
    list: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            process::exit(1);
        }
    };

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    // The directory must exist before any document work begins
    if let Err(e) = deckgen::utils::ensure_directory_exists(&cli.output_dir) {
        eprintln!("Cannot create directory {}: {}", cli.output_dir.display(), e);
        process::exit(1);
    }

    match run(&cli) {
        Ok(report) => {
            if report.is_clean() {
                println!("Presentation generated: {}", report.output_path.display());
            } else {
                println!(
                    "Presentation generated with {} warning(s): {}",
                    report.warnings.len(),
                    report.output_path.display()
                );
                for warning in &report.warnings {
                    println!("  - {}", warning);
                }
            }
            if cli.list {
                if let Err(e) = print_outline(&report.output_path) {
                    eprintln!("Error: {}", e);
                    process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> deckgen::Result<deckgen::BuildReport> {
    let mut config = deckgen::Config::from_env();
    if let Some(timeout_ms) = cli.timeout_ms {
        config.image_timeout_ms = timeout_ms;
    }
    if cli.deck.is_some() {
        config.deck_path = cli.deck.clone();
    }

    let deck = deckgen::Deck::load_or_builtin(config.deck_path.as_deref())?;
    let fetcher = deckgen::HttpFetcher::new(&config)?;
    deckgen::build_deck(&deck, &cli.output_dir, &config, &fetcher)
}

fn print_outline(path: &Path) -> deckgen::Result<()> {
    for (index, slide) in deckgen::read_outline(path)?.iter().enumerate() {
        println!("{:>2}. {}", index + 1, slide.title);
        for line in &slide.body {
            println!("      • {}", line);
        }
        if !slide.pictures.is_empty() {
            println!("      [{} picture(s)]", slide.pictures.len());
        }
    }
    Ok(())
}
