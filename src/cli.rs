use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tcxgen",
    about = "Generate Garmin TCX activity files from a YAML workout list"
)]
pub struct Cli {
    /// Path to the workouts YAML config.
    #[arg(long, value_name = "CONFIG")]
    pub config: PathBuf,

    /// Increase log verbosity (-v, -vv). Defaults to INFO.
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease log verbosity (-q, -qq). Defaults to INFO.
    #[arg(short = 'q', long, action = ArgAction::Count, global = true)]
    pub quiet: u8,
}
