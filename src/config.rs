use crate::error::TcxError;
use crate::types::{Defaults, Workout};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    defaults: Defaults,
    #[serde(default)]
    workouts: Vec<Workout>,
}

/// Load the workout config and validate every entry.
///
/// An absent or empty `workouts` list is an error, not a no-op.
pub fn load(path: &Path) -> Result<(Defaults, Vec<Workout>), TcxError> {
    let raw = fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            TcxError::ConfigNotFound(path.to_path_buf())
        } else {
            TcxError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let parsed: ConfigFile = serde_yaml::from_str(&raw)?;

    if parsed.workouts.is_empty() {
        return Err(TcxError::EmptyBatch);
    }

    for (index, w) in parsed.workouts.iter().enumerate() {
        if !w.distance_mi.is_finite() || w.distance_mi <= 0.0 {
            return Err(TcxError::InvalidDistance {
                index,
                value: w.distance_mi,
            });
        }
        if w.avg_hr == Some(0) {
            return Err(TcxError::InvalidHeartRate { index });
        }
    }

    Ok((parsed.defaults, parsed.workouts))
}
