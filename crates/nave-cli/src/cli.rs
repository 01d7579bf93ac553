use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nave")]
#[command(about = "Mask issue-tracker exports and sync them to the Nave dashboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (default: platform config dir)
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Mask a JSON export file
    Mask {
        /// Export to mask
        input: PathBuf,

        /// Where to write the masked copy (default: masked_<input> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Seed for reproducible synthetic values
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Fetch the tracker export, mask it and upload it to the dashboard
    Sync {
        /// Directory for transient export files
        #[arg(long)]
        work_dir: Option<PathBuf>,

        /// Ask the dashboard to append instead of replace
        #[arg(long)]
        cumulative: bool,

        /// Seed for reproducible synthetic values
        #[arg(long)]
        seed: Option<u64>,

        /// Read credentials from this file (default: .env in the current directory or a parent)
        #[arg(long)]
        env_file: Option<PathBuf>,
    },

    /// Remove export files left behind by earlier runs
    Clean {
        /// Directory to clean
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },
}
