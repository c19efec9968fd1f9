use std::{io, path::PathBuf};
use thiserror::Error;

/// Typed failures for config loading, unit conversion, and TCX output.
#[derive(Error, Debug)]
pub enum TcxError {
    #[error("config file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
    #[error("config contains no workouts")]
    EmptyBatch,
    #[error("workout {index}: distance_mi must be positive, got {value}")]
    InvalidDistance { index: usize, value: f64 },
    #[error("workout {index}: avg_hr must be positive")]
    InvalidHeartRate { index: usize },
    #[error("invalid pace {pace:?}: expected M:SS or MM:SS")]
    InvalidPaceFormat { pace: String },
    #[error("invalid pace {pace:?}: seconds must be 0-59")]
    InvalidPaceRange { pace: String },
    #[error("invalid date/time {value:?}")]
    InvalidDateTime { value: String },
    #[error("timezone offset {hours}h is outside -23..=23")]
    InvalidTimezoneOffset { hours: i32 },
    #[error("serializing activity: {0}")]
    Serialize(#[source] io::Error),
    #[error("{}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}
