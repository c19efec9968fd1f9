use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::PathBuf;

/// Batch-wide settings from the `defaults` section of the config.
///
/// Every field falls back to its default independently, so a config may
/// override just one of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub timezone_offset_hours: i32,
    pub sport: String,
    pub output_dir: PathBuf,
    pub start_time: String,
    pub notes_prefix: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timezone_offset_hours: -5,
            sport: "Running".to_string(),
            output_dir: PathBuf::from("out/tcx"),
            start_time: "12:00".to_string(),
            notes_prefix: "generated workout".to_string(),
        }
    }
}

/// One entry of the `workouts` list.
#[derive(Debug, Clone, Deserialize)]
pub struct Workout {
    pub date: String,
    pub distance_mi: f64,
    pub pace: String,
    pub start_time: Option<String>,
    pub avg_hr: Option<u32>,
    pub notes: Option<String>,
}

/// Everything the TCX serializer needs for one activity, fully derived.
#[derive(Debug, Clone)]
pub struct ResolvedActivity {
    pub start: DateTime<Utc>,
    pub duration_s: u32,
    pub distance_m: f64,
    pub sport: String,
    pub avg_hr: Option<u32>,
    pub notes: Option<String>,
}
