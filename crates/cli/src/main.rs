//! Binary entry point for the caption transformer.

use anyhow::Result;
use capmix_core::backend::{anthropic::AnthropicGenerator, openai::OpenAiGenerator, Generator};
use capmix_core::subtitle::extract::extract_first_track;
use capmix_core::{Engine, EngineConfig, ModeRegistry, DEFAULT_BATCH_SIZE};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line options for the binary.
#[derive(Parser)]
struct Cli {
    /// Enable verbose debug and trace logs.
    #[arg(long, global = true)]
    debug: bool,

    /// Directory holding cached transformation results.
    #[arg(long, global = true, default_value = "./data/cache")]
    cache_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available caption modes.
    Modes,

    /// Transform a subtitle file under a mode and print a summary.
    Transform {
        /// Path to the .srt or .vtt file.
        input: PathBuf,

        /// Mode key, e.g. "pirate".
        #[arg(long)]
        mode: String,

        /// Captions transformed concurrently per batch.
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
    },

    /// Transform (or reuse the cache) and write the result to a file.
    Export {
        input: PathBuf,

        #[arg(long)]
        mode: String,

        /// Output format: srt or vtt.
        #[arg(long, default_value = "srt")]
        format: String,

        /// Defaults to `<input stem>_<mode>.<format>` next to the input.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print information about a subtitle file as JSON.
    Info { input: PathBuf },

    /// Pull the first embedded subtitle track out of a video file.
    Extract { input: PathBuf },

    /// Cache maintenance.
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Remove every cached transformation.
    Clear,
    /// Remove one cached transformation by key.
    Delete { key: String },
}

/// Build an engine with whatever backends the environment configures.
/// With no API keys set, everything runs on mode fallbacks.
fn build_engine(cache_dir: PathBuf) -> Result<Engine> {
    let mut backends: Vec<Arc<dyn Generator>> = Vec::new();
    if let Ok(key) = std::env::var("OPENAI_API_KEY") {
        backends.push(Arc::new(OpenAiGenerator::new(key)));
    }
    if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
        backends.push(Arc::new(AnthropicGenerator::new(key)));
    }
    if backends.is_empty() {
        info!("no backend API keys configured, running in fallback mode");
    }
    let config = EngineConfig {
        cache_dir,
        ..EngineConfig::default()
    };
    Ok(Engine::new(config, ModeRegistry::builtin(), backends)?)
}

/// Application entry point which parses CLI args and performs actions.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let filter = if cli.debug {
        EnvFilter::default()
            .add_directive("capmix=trace".parse().unwrap())
            .add_directive("capmix_core=trace".parse().unwrap())
            .add_directive("info".parse().unwrap())
    } else {
        EnvFilter::default()
            .add_directive("capmix=info".parse().unwrap())
            .add_directive("capmix_core=info".parse().unwrap())
            .add_directive("warn".parse().unwrap())
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Command::Modes => {
            let engine = build_engine(cli.cache_dir)?;
            for mode in engine.list_modes() {
                println!(
                    "{:<14} {:<20} {}",
                    mode.key, mode.display_name, mode.description
                );
            }
        }
        Command::Transform {
            input,
            mode,
            batch_size,
        } => {
            let engine = build_engine(cli.cache_dir)?;
            let result = engine.transform(&input, &mode, batch_size).await?;
            println!(
                "{} captions transformed to {} mode (cache key {})",
                result.subtitles.len(),
                result.mode,
                result.cache_key
            );
        }
        Command::Export {
            input,
            mode,
            format,
            output,
        } => {
            let engine = build_engine(cli.cache_dir)?;
            let result = engine.transform(&input, &mode, DEFAULT_BATCH_SIZE).await?;
            let output = output.unwrap_or_else(|| {
                let stem = input.file_stem().unwrap_or_default().to_string_lossy();
                input.with_file_name(format!("{stem}_{mode}.{format}"))
            });
            engine.export(&result, &output, &format)?;
            println!("wrote {}", output.display());
        }
        Command::Info { input } => {
            let engine = build_engine(cli.cache_dir)?;
            let info = engine.get_info(&input)?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Extract { input } => {
            let out = extract_first_track(&input)?;
            println!("extracted {}", out.display());
        }
        Command::Cache { command } => {
            let engine = build_engine(cli.cache_dir)?;
            match command {
                CacheCommand::Clear => {
                    let removed = engine.cache().clear()?;
                    println!("removed {removed} cached transformation(s)");
                }
                CacheCommand::Delete { key } => {
                    if engine.cache().invalidate(&key) {
                        println!("removed {key}");
                    } else {
                        println!("no cache entry for {key}");
                    }
                }
            }
        }
    }
    Ok(())
}
