use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agroforecast",
    version,
    about = "Yield estimates, pest outbreak risk and irrigation schedules"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Analysis date (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    pub as_of: Option<NaiveDate>,

    /// Increase log verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run interactive setup
    Init,
    /// Validate config and print the farm profile
    Check,
    /// Estimate yield from weather history and soil
    Yield {
        /// JSON array of past weather days
        #[arg(long)]
        weather: Option<PathBuf>,
        #[command(flatten)]
        soil: SoilArg,
    },
    /// Forecast pest outbreaks
    Pests {
        /// JSON array of forecast weather days
        #[arg(long)]
        forecast: Option<PathBuf>,
        /// JSON array of past infestations
        #[arg(long)]
        history: Option<PathBuf>,
        #[command(flatten)]
        soil: SoilArg,
    },
    /// Plan irrigation for the next 14 days
    Irrigation {
        /// JSON array of forecast weather days
        #[arg(long)]
        forecast: Option<PathBuf>,
        #[command(flatten)]
        soil: SoilArg,
    },
    /// Run every predictor
    Report {
        #[arg(long)]
        weather: Option<PathBuf>,
        #[arg(long)]
        forecast: Option<PathBuf>,
        #[arg(long)]
        history: Option<PathBuf>,
        #[command(flatten)]
        soil: SoilArg,
    },
}

#[derive(Args)]
pub struct SoilArg {
    /// JSON soil sample, overrides the one in config
    #[arg(long)]
    pub soil: Option<PathBuf>,
}
