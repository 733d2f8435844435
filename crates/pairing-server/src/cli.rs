use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pairing-server")]
#[command(
    author,
    version,
    about = "Solo vs team project preference classifier API"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "pairing.yaml", global = true)]
    pub config: String,

    /// Classifier artifact path
    #[arg(short, long, env = "PAIRING_MODEL", global = true)]
    pub model: Option<PathBuf>,

    /// Submission dataset path
    #[arg(short, long, env = "PAIRING_DATASET", global = true)]
    pub dataset: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API
    Serve {
        /// Listen address
        #[arg(short, long)]
        listen: Option<String>,

        /// Listen port
        #[arg(short = 'P', long)]
        port: Option<u16>,
    },

    /// Print the dashboard summary for the configured dataset
    Summarize,

    /// Classify one student without logging the result
    Predict {
        /// 1 = introvert, 5 = extravert
        #[arg(long)]
        introversion_extraversion: i64,

        /// 1 = low risk-taker, 5 = high risk-taker
        #[arg(long)]
        risk_taking: i64,

        /// Primary club or activity
        #[arg(long)]
        club: String,

        /// Hours spent on hobbies per week
        #[arg(long)]
        weekly_hobby_hours: i64,
    },
}
