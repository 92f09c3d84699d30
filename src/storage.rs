use crate::model::{HoursOfOperation, ScheduleResult, Worker};
use crate::scheduler::{GenerateOptions, SchedError, Scheduler};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Planning sauvegardé avec les entrées nécessaires pour recalculer ses
/// agrégats après une correction manuelle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSchedule {
    pub workplace_id: String,
    pub generated_at: DateTime<Utc>,
    pub hours: HoursOfOperation,
    pub workers: Vec<Worker>,
    pub options: GenerateOptions,
    pub result: ScheduleResult,
}

impl SavedSchedule {
    pub fn scheduler(&self) -> Result<Scheduler, SchedError> {
        Scheduler::new(self.workers.clone(), self.hours.clone(), self.options.clone())
    }
}

pub trait Storage {
    /// Charge un planning depuis un support.
    fn load(&self) -> anyhow::Result<SavedSchedule>;
    /// Sauvegarde de manière atomique.
    fn save(&self, schedule: &SavedSchedule) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self { path: path.as_ref().to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<SavedSchedule> {
        let data = fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let schedule: SavedSchedule = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(schedule)
    }

    fn save(&self, schedule: &SavedSchedule) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(schedule)?;
        write_atomic(&self.path, &json)
    }
}

/// Écrit `data` dans un fichier temporaire voisin puis le renomme sur `path`.
pub(crate) fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("atomic rename to {}", path.display()))?;
    Ok(())
}
