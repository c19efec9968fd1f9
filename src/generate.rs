use crate::dlog;
use crate::error::TcxError;
use crate::types::{Defaults, ResolvedActivity, Workout};
use crate::units::{local_to_utc, miles_to_meters, pace_to_seconds_per_mile};
use crate::utils::safe_filename;
use crate::{config, tcx};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Run the whole batch described by the config at `config_path`.
///
/// Workouts are processed sequentially in list order; the first failure
/// aborts the run and nothing after it is written.
pub fn run(config_path: &Path) -> Result<()> {
    let (defaults, workouts) = config::load(config_path)
        .with_context(|| format!("loading config: {}", config_path.display()))?;

    let total = workouts.len();
    tracing::info!(
        workouts = total,
        output_dir = %defaults.output_dir.display(),
        "loaded config"
    );

    fs::create_dir_all(&defaults.output_dir).with_context(|| {
        format!("creating output dir: {}", defaults.output_dir.display())
    })?;

    let mut written = 0usize;
    for w in &workouts {
        let activity = resolve(&defaults, w)?;
        let out_path = defaults.output_dir.join(output_filename(w, &defaults));
        dlog!(
            "workout date={} duration_s={} out={}",
            w.date,
            activity.duration_s,
            out_path.display()
        );

        tcx::write(&out_path, &activity)?;
        println!("wrote {}", out_path.display());
        written += 1;
    }

    tracing::info!(files_written = written, "batch done");
    Ok(())
}

/// Derive the serializer-ready activity for one workout.
pub fn resolve(defaults: &Defaults, w: &Workout) -> Result<ResolvedActivity, TcxError> {
    let start_time = w.start_time.as_deref().unwrap_or(&defaults.start_time);
    let start = local_to_utc(&w.date, start_time, defaults.timezone_offset_hours)?;

    let pace_s = pace_to_seconds_per_mile(&w.pace)?;
    let duration_s = (w.distance_mi * f64::from(pace_s)).round() as u32;

    Ok(ResolvedActivity {
        start,
        duration_s,
        distance_m: miles_to_meters(w.distance_mi),
        sport: defaults.sport.clone(),
        avg_hr: w.avg_hr,
        notes: combined_notes(&defaults.notes_prefix, w.notes.as_deref()),
    })
}

fn combined_notes(prefix: &str, notes: Option<&str>) -> Option<String> {
    let mut parts = vec![prefix];
    if let Some(n) = notes
        && !n.is_empty()
    {
        parts.push(n);
    }
    let joined = parts.join(" - ");
    (!joined.is_empty()).then_some(joined)
}

/// `<date>_<HHMM>_<distance>mi_<MSS>.tcx`, sanitized. Two workouts that
/// derive the same name overwrite each other; the last one wins.
fn output_filename(w: &Workout, defaults: &Defaults) -> String {
    let start_time = w.start_time.as_deref().unwrap_or(&defaults.start_time);
    let candidate = format!(
        "{}_{}_{:.2}mi_{}.tcx",
        w.date,
        start_time.replace(':', ""),
        w.distance_mi,
        w.pace.replace(':', "")
    );
    safe_filename(&candidate)
}
