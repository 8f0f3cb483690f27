use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use mtg_card_sync::app::{App, RunOptions, SyncReport};
use mtg_card_sync::cache::CacheAction;
use mtg_card_sync::config::{ConfigLoader, ConfigOverrides};
use mtg_card_sync::domain::FailurePolicy;
use mtg_card_sync::error::SyncError;
use mtg_card_sync::output::{JsonOutput, LogSink};
use mtg_card_sync::scryfall::ScryfallHttpClient;

#[derive(Parser)]
#[command(name = "mtg-sync")]
#[command(about = "Sync the Scryfall default-cards dataset and download card images")]
#[command(version)]
struct Cli {
    #[arg(long, help = "Print the run report as JSON")]
    non_interactive: bool,

    #[arg(long, help = "Config file (defaults to ./mtg-sync.json when present)")]
    config: Option<String>,

    #[arg(long, help = "Data directory (defaults to ./data)")]
    data_dir: Option<Utf8PathBuf>,

    #[arg(long, help = "Pause after each image request, in milliseconds")]
    interval_ms: Option<u64>,

    #[arg(long, value_enum, help = "What to do when an image download fails")]
    on_error: Option<FailurePolicy>,

    #[arg(long, help = "Stop after caching and sanitizing the dataset")]
    skip_images: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<SyncError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &SyncError) -> u8 {
    match error {
        SyncError::Resolution { .. } => 2,
        SyncError::Http(_) | SyncError::HttpStatus { .. } | SyncError::ImageDownload { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ConfigLoader::resolve(
        cli.config.as_deref(),
        ConfigOverrides {
            data_dir: cli.data_dir,
            request_interval_ms: cli.interval_ms,
            failure_policy: cli.on_error,
        },
    )?;
    let client = ScryfallHttpClient::new(config.timeout)?;
    let app = App::new(config, client);
    let options = RunOptions {
        skip_images: cli.skip_images,
    };

    if cli.non_interactive {
        let report = app.run(options, &JsonOutput)?;
        JsonOutput::print_report(&report).into_diagnostic()?;
    } else {
        let report = app.run(options, &LogSink)?;
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &SyncReport) {
    let green = "\x1b[32m";
    let yellow = "\x1b[33m";
    let cyan = "\x1b[36m";
    let red = "\x1b[31m";
    let reset = "\x1b[0m";

    println!("{cyan}mtg-sync summary{reset}");
    let action = match report.cache_action {
        CacheAction::Reused => "reused",
        CacheAction::Downloaded => "downloaded",
    };
    println!("{green}dataset {} ({action}){reset}", report.dataset_id);
    println!("{green}   cache: {}{reset}", report.cache_path);
    for name in &report.removed_files {
        println!("{yellow}   removed: {name}{reset}");
    }
    for failure in &report.cleanup_failures {
        println!("{red}   {failure}{reset}");
    }
    if let Some(err) = &report.sanitize_error {
        println!("{red}{err}{reset}");
    }
    println!(
        "{cyan}cards: {} usable of {}{reset}",
        report.cards_usable, report.records_total
    );

    let Some(images) = &report.images else {
        println!("{yellow}image download skipped{reset}");
        return;
    };
    println!("{green}images downloaded: {}{reset}", images.downloaded);
    println!("{green}images already present: {}{reset}", images.skipped);
    let color = if images.failed.is_empty() { green } else { red };
    println!("{color}images failed: {}{reset}", images.failed.len());
    for failure in &images.failed {
        println!("{red}   {} {}: {}{reset}", failure.id, failure.url, failure.message);
    }
    println!("{cyan}   images: {}{reset}", report.images_dir);
}
