use crate::model::{AvailabilityWindow, HoursOfOperation, OperationBlock, Worker};
use crate::scheduler::GenerateOptions;
use crate::storage::write_atomic;
use crate::time::{self, Weekday};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Description d'un lieu : horaires d'ouverture et paramètres par défaut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workplace {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub hours_of_operation: BTreeMap<Weekday, Vec<BlockSpec>>,
    #[serde(default)]
    pub defaults: Option<RunDefaults>,
    /// Équipe du lieu ; l'email (casse ignorée) identifie chaque employé.
    #[serde(default)]
    pub workers: Vec<Worker>,
}

/// Plage d'ouverture telle que saisie (`"HH:MM"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSpec {
    pub start: String,
    pub end: String,
}

impl BlockSpec {
    pub fn new<S: Into<String>, E: Into<String>>(start: S, end: E) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    fn to_block(&self) -> Result<OperationBlock> {
        if self.start.trim() == self.end.trim() {
            bail!("block start and end cannot be equal ({})", self.start);
        }
        Ok(OperationBlock::parse(&self.start, &self.end)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunDefaults {
    #[serde(default)]
    pub max_hours_per_worker: Option<u32>,
    #[serde(default)]
    pub max_workers_per_shift: Option<u32>,
    #[serde(default)]
    pub shift_lengths: Option<Vec<u32>>,
}

impl RunDefaults {
    /// Complète `base` avec les valeurs définies pour ce lieu.
    pub fn apply(&self, mut base: GenerateOptions) -> GenerateOptions {
        if let Some(v) = self.max_hours_per_worker {
            base.max_hours_per_worker = v;
        }
        if let Some(v) = self.max_workers_per_shift {
            base.max_workers_per_shift = v;
        }
        if let Some(v) = &self.shift_lengths {
            base.shift_lengths = v.clone();
        }
        base
    }
}

/// Modification partielle d'un employé ; les champs absents sont conservés.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkerPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub work_study: Option<bool>,
    pub availability: Option<BTreeMap<Weekday, Vec<AvailabilityWindow>>>,
}

impl WorkerPatch {
    pub fn apply(&self, worker: &mut Worker) {
        if let Some(v) = &self.first_name {
            worker.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            worker.last_name = v.clone();
        }
        if let Some(v) = self.work_study {
            worker.work_study = v;
        }
        if let Some(v) = &self.availability {
            worker.availability = v.clone();
        }
    }
}

impl Workplace {
    pub fn new<I: Into<String>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            hours_of_operation: BTreeMap::new(),
            defaults: None,
            workers: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            bail!("workplace id cannot be empty");
        }
        if !self
            .id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!("workplace id may only contain letters, digits, '-' and '_'");
        }
        if self.name.trim().is_empty() {
            bail!("workplace name cannot be empty");
        }
        let hours = self.operation_hours()?;
        for (day, blocks) in &hours {
            validate_block_overlaps(*day, blocks)?;
        }
        if self.defaults.is_some() {
            self.options(GenerateOptions::default())
                .validate()
                .context("invalid run defaults")?;
        }
        let mut emails = BTreeSet::new();
        for worker in &self.workers {
            worker.validate()?;
            if !emails.insert(email_key(&worker.email)) {
                bail!("duplicate worker email: {}", worker.email);
            }
        }
        Ok(())
    }

    /// Convertit les plages saisies en blocs normalisés.
    pub fn operation_hours(&self) -> Result<HoursOfOperation> {
        let mut out = HoursOfOperation::new();
        for (day, specs) in &self.hours_of_operation {
            let blocks = specs
                .iter()
                .map(|spec| spec.to_block().with_context(|| format!("invalid block on {day}")))
                .collect::<Result<Vec<_>>>()?;
            out.insert(*day, blocks);
        }
        Ok(out)
    }

    /// Ajoute une plage à `day`, en refusant les chevauchements.
    pub fn add_block(&mut self, day: Weekday, start: &str, end: &str) -> Result<()> {
        let spec = BlockSpec::new(start.trim(), end.trim());
        spec.to_block()?;
        let previous = self.hours_of_operation.clone();
        let specs = self.hours_of_operation.entry(day).or_default();
        specs.push(spec);
        specs.sort_by(|a, b| {
            let a = time::parse_time(&a.start).unwrap_or(0.0);
            let b = time::parse_time(&b.start).unwrap_or(0.0);
            a.total_cmp(&b)
        });
        if let Err(err) = self.validate() {
            self.hours_of_operation = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn find_worker(&self, email: &str) -> Option<&Worker> {
        self.workers
            .iter()
            .find(|w| email_key(&w.email) == email_key(email))
    }

    /// Ajoute un employé ; l'email doit être nouveau pour ce lieu.
    pub fn add_worker(&mut self, worker: Worker) -> Result<()> {
        worker.validate()?;
        if self.find_worker(&worker.email).is_some() {
            bail!("a worker with email {} already exists", worker.email);
        }
        self.workers.push(worker);
        Ok(())
    }

    pub fn update_worker(&mut self, email: &str, patch: &WorkerPatch) -> Result<()> {
        let key = email_key(email);
        let Some(worker) = self.workers.iter_mut().find(|w| email_key(&w.email) == key) else {
            bail!("unknown worker: {email}");
        };
        let mut updated = worker.clone();
        patch.apply(&mut updated);
        updated.validate()?;
        *worker = updated;
        Ok(())
    }

    pub fn remove_worker(&mut self, email: &str) -> Result<Worker> {
        let key = email_key(email);
        let Some(pos) = self.workers.iter().position(|w| email_key(&w.email) == key) else {
            bail!("unknown worker: {email}");
        };
        Ok(self.workers.remove(pos))
    }

    /// Fusionne une équipe importée : les emails connus sont remplacés,
    /// les autres ajoutés. Renvoie `(ajoutés, remplacés)`.
    pub fn import_workers(&mut self, workers: Vec<Worker>) -> Result<(usize, usize)> {
        let previous = self.workers.clone();
        let (mut added, mut replaced) = (0, 0);
        for worker in workers {
            let key = email_key(&worker.email);
            match self.workers.iter_mut().find(|w| email_key(&w.email) == key) {
                Some(existing) => {
                    *existing = worker;
                    replaced += 1;
                }
                None => {
                    self.workers.push(worker);
                    added += 1;
                }
            }
        }
        if let Err(err) = self.validate() {
            self.workers = previous;
            return Err(err);
        }
        info!(workplace = %self.id, added, replaced, "workers imported");
        Ok((added, replaced))
    }

    pub fn clear_day(&mut self, day: Weekday) {
        self.hours_of_operation.remove(&day);
    }

    pub fn is_open(&self) -> bool {
        self.hours_of_operation.values().any(|b| !b.is_empty())
    }

    pub fn options(&self, base: GenerateOptions) -> GenerateOptions {
        match &self.defaults {
            Some(d) => d.apply(base),
            None => base,
        }
    }
}

fn email_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn validate_block_overlaps(day: Weekday, blocks: &[OperationBlock]) -> Result<()> {
    for (i, a) in blocks.iter().enumerate() {
        for b in blocks.iter().skip(i + 1) {
            if time::overlaps(a.start_hour, a.end_hour, b.start_hour, b.end_hour) {
                bail!(
                    "overlapping blocks on {day}: {}-{} and {}-{}",
                    time::format_time(a.start_hour),
                    time::format_time(a.end_hour),
                    time::format_time(b.start_hour),
                    time::format_time(b.end_hour)
                );
            }
        }
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct WorkplaceInfo {
    pub workplace: Workplace,
    pub path: PathBuf,
    pub modified: Option<DateTime<Utc>>,
}

/// Gestion simple des lieux persistés sur disque (un JSON par lieu).
#[derive(Debug, Clone)]
pub struct WorkplaceStore {
    base_dir: PathBuf,
}

impl WorkplaceStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating workplace directory {}", self.base_dir.display()))
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.base_dir.join(format!("{id}.json"))
    }

    pub fn exists(&self, id: &str) -> bool {
        self.path_for(id).exists()
    }

    pub fn save(&self, workplace: &Workplace) -> Result<PathBuf> {
        workplace.validate()?;
        self.ensure_dir()?;
        let path = self.path_for(&workplace.id);
        let json = serde_json::to_vec_pretty(workplace)?;
        write_atomic(&path, &json).with_context(|| format!("writing workplace {}", path.display()))?;
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<Workplace> {
        let path = self.path_for(id);
        let data =
            fs::read(&path).with_context(|| format!("reading workplace {}", path.display()))?;
        let workplace: Workplace = serde_json::from_slice(&data)
            .with_context(|| format!("parsing workplace {}", path.display()))?;
        workplace.validate()?;
        Ok(workplace)
    }

    /// Charge le lieu, ou en crée un vide (nom = id) s'il n'existe pas.
    pub fn load_or_new(&self, id: &str) -> Result<Workplace> {
        if self.exists(id) {
            self.load(id)
        } else {
            Ok(Workplace::new(id, id))
        }
    }

    pub fn list(&self) -> Result<Vec<WorkplaceInfo>> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }
        let mut infos = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let data = fs::read(&path)?;
            let workplace: Workplace = match serde_json::from_slice(&data) {
                Ok(w) => w,
                Err(err) => {
                    warn!(path = %path.display(), %err, "could not parse workplace");
                    continue;
                }
            };
            let modified = entry
                .metadata()
                .and_then(|meta| meta.modified())
                .ok()
                .map(DateTime::<Utc>::from);
            infos.push(WorkplaceInfo {
                workplace,
                path,
                modified,
            });
        }
        infos.sort_by(|a, b| a.workplace.id.cmp(&b.workplace.id));
        Ok(infos)
    }
}
