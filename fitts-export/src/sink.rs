use fitts_core::{SessionSummary, TrialRecord};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::csv::to_csv;
use crate::json::to_json;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write trial records as CSV: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("failed to serialise trial records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Receives the finished record list once, at the end of a session.
pub trait RecordSink {
    type Output;
    fn consume(
        &mut self,
        records: &[TrialRecord],
        summary: &SessionSummary,
    ) -> Result<Self::Output, ExportError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// `fitts_trials_<participant>`, with characters that would escape the
/// output directory replaced by `_`.
pub fn export_stem(participant_id: &str) -> String {
    let safe: String = participant_id
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    let safe = if safe == "." || safe == ".." {
        "_".repeat(safe.len())
    } else {
        safe
    };
    format!("fitts_trials_{safe}")
}

/// Writes the CSV and JSON exports side by side in one directory.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn paths_for(&self, participant_id: &str) -> ExportPaths {
        let stem = export_stem(participant_id);
        ExportPaths {
            csv: self.dir.join(format!("{stem}.csv")),
            json: self.dir.join(format!("{stem}.json")),
        }
    }

    fn write(path: &Path, contents: &str) -> Result<(), ExportError> {
        fs::write(path, contents).map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl RecordSink for FileSink {
    type Output = ExportPaths;

    fn consume(
        &mut self,
        records: &[TrialRecord],
        summary: &SessionSummary,
    ) -> Result<ExportPaths, ExportError> {
        fs::create_dir_all(&self.dir).map_err(|source| ExportError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let paths = self.paths_for(&summary.participant_id);
        let csv = to_csv(records)?;
        let json = to_json(records)?;
        Self::write(&paths.csv, &csv)?;
        Self::write(&paths.json, &json)?;

        info!(
            records = records.len(),
            csv = %paths.csv.display(),
            json = %paths.json.display(),
            "trial records exported"
        );
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_embeds_participant() {
        assert_eq!(export_stem("P1"), "fitts_trials_P1");
        assert_eq!(export_stem("../x"), "fitts_trials_.._x");
        assert_eq!(export_stem(".."), "fitts_trials___");
    }
}
