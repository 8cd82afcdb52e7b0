/// Soul Tagger - ID3 tag inspector and editor
use clap::{Parser, Subcommand};
use soul_id3::{FieldKey, TagVersion};
use soul_tagger::{commands, config::TaggerConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soul-tagger")]
#[command(about = "Inspect, convert and edit ID3 tags", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SOUL_TAGGER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tags of a file
    Dump {
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Convert the ID3v2 tag to another version
    Convert {
        file: PathBuf,
        /// Target version (2.2, 2.3 or 2.4)
        #[arg(long)]
        to: TagVersion,
        /// Write to this file instead of in place
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Set a field (an empty value removes it)
    Set {
        file: PathBuf,
        /// Field key, e.g. title, track_number, album_artist
        #[arg(long)]
        field: FieldKey,
        #[arg(long)]
        value: String,
    },
    /// Remove the ID3v1 trailer
    StripV1 { file: PathBuf },
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soul_tagger=info,soul_id3=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = TaggerConfig::load(cli.config.as_deref())?;
    config.validate()?;

    match cli.command {
        Commands::Dump { file, json } => {
            print!("{}", commands::dump(&file, json, &config)?);
            if json {
                println!();
            }
        }
        Commands::Convert { file, to, output } => {
            if !to.is_v2() {
                anyhow::bail!("conversion target must be ID3v2, not {to}");
            }
            let report = commands::convert(&file, to, output.as_deref(), &config)?;
            tracing::info!(
                "Converted to {}: {} frames, {} unavailable, {} duplicates",
                to,
                report.converted,
                report.unavailable.len(),
                report.duplicates
            );
        }
        Commands::Set { file, field, value } => {
            commands::set(&file, field, &value, &config)?;
            tracing::info!("Set {} on {}", field, file.display());
        }
        Commands::StripV1 { file } => {
            if commands::strip_v1(&file, &config)? {
                tracing::info!("Removed ID3v1 trailer from {}", file.display());
            } else {
                tracing::info!("{} has no ID3v1 trailer", file.display());
            }
        }
    }

    Ok(())
}
