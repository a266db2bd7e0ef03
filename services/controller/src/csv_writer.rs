use anyhow::{Context, Result};
use chrono::Utc;
use csv::Writer;
use protocol::Junction;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Files produced by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryExport {
    pub history: PathBuf,
    pub offsets: PathBuf,
}

/// Writes `generation,best_fitness` and `junction_id,label,offset` tables into `dir`,
/// named after the current UTC time.
///
/// # Errors
/// Fails if the directory or either file cannot be written.
pub fn export_optimization(
    dir: &Path,
    junctions: &[Junction],
    offsets: &[f64],
    history: &[f64],
) -> Result<HistoryExport> {
    if history.is_empty() {
        warn!("optimizer returned no fitness history");
    }
    if offsets.len() != junctions.len() {
        warn!("{} offsets returned for {} junctions", offsets.len(), junctions.len());
    }

    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let timestamp = Utc::now().format("%Y%m%d_%H%M%S");
    let export = HistoryExport {
        history: dir.join(format!("optimization_history_{timestamp}.csv")),
        offsets: dir.join(format!("optimization_offsets_{timestamp}.csv")),
    };

    debug!("saving {} generations to {}", history.len(), export.history.display());
    let mut writer = Writer::from_path(&export.history)
        .with_context(|| format!("creating {}", export.history.display()))?;
    writer.write_record(["generation", "best_fitness"])?;
    for (generation, fitness) in history.iter().enumerate() {
        writer.write_record([generation.to_string(), fitness.to_string()])?;
    }
    writer.flush()?;

    let mut writer = Writer::from_path(&export.offsets)
        .with_context(|| format!("creating {}", export.offsets.display()))?;
    writer.write_record(["junction_id", "label", "offset"])?;
    for (junction, offset) in junctions.iter().zip(offsets) {
        writer.write_record([junction.id.to_string(), junction.label.clone(), offset.to_string()])?;
    }
    writer.flush()?;

    info!(
        "optimization saved to {} and {}",
        export.history.display(),
        export.offsets.display()
    );
    Ok(export)
}
