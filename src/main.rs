use clap::{Parser, Subcommand, builder::styling};
use eyre::Result;
use owo_colors::OwoColorize;
use std::path::Path;
use stream_loader::cli::{LoadOptions, load_config_from_env, load_file, probe_endpoints};
use stream_loader::etl::{BatchLimits, DEFAULT_LABEL_PREFIX};

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Stream Loader: push NDJSON rows into a table through its stream load endpoints
#[derive(Parser)]
#[command(name = "sload", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source connection settings from
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load an NDJSON file, one row per line, in labelled batches
    Load {
        /// The NDJSON file to load
        file: String,

        /// Prefix of the generated batch labels
        #[arg(short, long, default_value = DEFAULT_LABEL_PREFIX)]
        label_prefix: String,

        /// Maximum rows per batch
        #[arg(long, default_value_t = BatchLimits::default().max_rows)]
        max_rows: usize,

        /// Maximum bytes of row data per batch
        #[arg(long, default_value_t = BatchLimits::default().max_bytes)]
        max_bytes: usize,
    },

    /// Check which configured endpoints accept connections
    Probe,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if Path::new(&cli.env).exists() {
        dotenvy::from_filename(&cli.env)?;
    }

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    let config = load_config_from_env()?;

    match cli.command {
        Commands::Load {
            file,
            label_prefix,
            max_rows,
            max_bytes,
        } => {
            log::info!(
                "Loading {} into {}",
                file.bright_black(),
                format!("{}.{}", config.database, config.table).cyan()
            );
            let options = LoadOptions {
                label_prefix,
                limits: BatchLimits {
                    max_rows,
                    max_bytes,
                },
            };
            let summary = load_file(config, &file, options).await?;
            log::info!(
                "✓ Loaded {} row(s), {} byte(s) in {} batch(es)",
                summary.rows.green(),
                summary.bytes,
                summary.batches
            );
        }
        Commands::Probe => {
            log::info!("Probing {} endpoint(s)", config.endpoints.len());
            let report = probe_endpoints(config).await?;
            let reachable = report.iter().filter(|(_, ok)| *ok).count();
            for (endpoint, ok) in &report {
                match ok {
                    true => log::info!("{} {}", "✓".green(), endpoint),
                    false => log::warn!("{} {}", "✗".red(), endpoint),
                }
            }
            if reachable == 0 {
                eyre::bail!("None of the {} endpoint(s) could be connected", report.len());
            }
        }
    }

    Ok(())
}
