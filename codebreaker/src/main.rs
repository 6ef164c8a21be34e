mod analyze;
mod crack;

use analyze::analyze_file;
use clap::{Parser, Subcommand};
use crack::{run as run_crack, CrackOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codebreaker")]
#[command(about = "Ciphertext-only cryptanalysis for the grid transpose cipher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recover possible keys from a ciphertext and expected plaintext words
    Break {
        /// Ciphertext file
        file: PathBuf,

        /// Candidate word (repeatable)
        #[arg(short, long = "word")]
        words: Vec<String>,

        /// Dictionary file with one candidate word per line
        #[arg(long = "words")]
        dictionary: Option<PathBuf>,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,

        /// Decrypt with every recovered key and list matching plaintexts
        #[arg(long)]
        plaintexts: bool,

        /// Keep a trailing newline in the ciphertext file
        #[arg(long)]
        raw: bool,
    },

    /// List the grid shapes a ciphertext fits
    Analyze {
        /// Ciphertext file
        file: PathBuf,

        /// Keep a trailing newline in the ciphertext file
        #[arg(long)]
        raw: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("codebreaker=warn,gridcrypt=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Break {
            file,
            words,
            dictionary,
            json,
            plaintexts,
            raw,
        } => {
            let options = CrackOptions {
                words,
                dictionary,
                json,
                plaintexts,
                raw,
            };
            tracing::debug!(file = %file.display(), "running key recovery");
            let report = run_crack(&file, &options)?;
            print!("{}", report);
        }
        Commands::Analyze { file, raw } => {
            let report = analyze_file(&file, raw)?;
            print!("{}", report);
        }
    }

    Ok(())
}
