mod config;
mod export;
mod logging;
mod resolve;
#[cfg(test)]
mod test_utils;
mod xspf;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context, eyre::eyre};

use crate::{
    config::Config,
    export::{ExportMode, ExportOptions, export_playlist},
    logging::setup_logging,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input playlist file (XSPF)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(short = 'd', long = "dir")]
    output: Option<PathBuf>,

    /// Copy files asynchronously; may improve performance in some cases
    #[arg(
        long = "async",
        num_args = 0..=1,
        default_missing_value = "true",
        value_name = "true|false"
    )]
    concurrent: Option<bool>,

    /// The config file to use
    #[arg(short, long, env = "PLAYLIST_EXPORT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Console log level (default: warn)
    #[arg(long, default_value = "warn", global = true, env = "LOG_LEVEL")]
    log_level: log::LevelFilter,

    /// File log level (default: debug)
    #[arg(long, default_value = "debug", global = true)]
    log_file_level: log::LevelFilter,

    /// Path to log file
    #[arg(long, env = "PLAYLIST_EXPORT_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    setup_logging(args.log_level, args.log_file.clone(), args.log_file_level)?;

    if let Some(Commands::Config(command)) = args.command {
        match command {
            ConfigCommands::CreateDefault => {
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        }
        return Ok(());
    }

    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .with_context(|| "Failed to load playlist-export config")?;

    let input = args
        .input
        .ok_or_else(|| eyre!("An input playlist is required (--input)"))?;
    let output_dir = args
        .output
        .or_else(|| config.output_directory())
        .ok_or_else(|| {
            eyre!("No output directory given. Pass --dir or set output_directory in the config file")
        })?;
    let mode = ExportMode::from_concurrent(args.concurrent.unwrap_or(config.concurrent()));

    log::debug!(
        "Exporting {} to {} ({:?})",
        input.display(),
        output_dir.display(),
        mode
    );

    let start = Instant::now();
    let report = export_playlist(&ExportOptions {
        input: input.clone(),
        output_dir,
        mode,
    })
    .await
    .with_context(|| format!("Failed to export playlist {}", input.display()))?;

    for outcome in report.skipped() {
        if let Err(e) = &outcome.result {
            match &outcome.file_name {
                Some(name) => println!("Skipping file \"{}\". {}", name, e),
                None => println!("Skipping track {}. {}", outcome.position, e),
            }
        }
    }

    println!(
        "\nCompleted! {} of {} tracks copied. Time elapsed: {}",
        report.copied_count(),
        report.total(),
        humantime::format_duration(Duration::from_millis(start.elapsed().as_millis() as u64))
    );

    Ok(())
}
