use crate::scheduler::SchedError;
use crate::time::{self, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Fenêtre de disponibilité déclarée par un employé (heures décimales,
/// la fin peut dépasser 24 pour une nuit).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    pub start_hour: f64,
    pub end_hour: f64,
}

impl AvailabilityWindow {
    /// Normalise les fenêtres qui traversent minuit.
    pub fn new(start_hour: f64, end_hour: f64) -> Self {
        let (start_hour, end_hour) = time::normalize_block(start_hour, end_hour);
        Self { start_hour, end_hour }
    }

    pub fn contains(&self, start: f64, end: f64) -> bool {
        self.start_hour <= start + time::EPSILON && end <= self.end_hour + time::EPSILON
    }
}

/// Employé ; l'email sert d'identifiant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub work_study: bool,
    #[serde(default)]
    pub availability: BTreeMap<Weekday, Vec<AvailabilityWindow>>,
}

impl Worker {
    pub fn new<F: Into<String>, L: Into<String>, E: Into<String>>(
        first_name: F,
        last_name: L,
        email: E,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            work_study: false,
            availability: BTreeMap::new(),
        }
    }

    pub fn work_study(mut self, work_study: bool) -> Self {
        self.work_study = work_study;
        self
    }

    /// Ajoute une fenêtre `[start, end]` pour `day`.
    pub fn available(mut self, day: Weekday, start: f64, end: f64) -> Self {
        self.availability
            .entry(day)
            .or_default()
            .push(AvailabilityWindow::new(start, end));
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn to_ref(&self) -> WorkerRef {
        WorkerRef {
            email: self.email.clone(),
            name: self.full_name(),
        }
    }

    pub fn validate(&self) -> Result<(), SchedError> {
        let label = if self.email.trim().is_empty() {
            self.full_name()
        } else {
            self.email.clone()
        };
        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
        ] {
            if value.trim().is_empty() {
                return Err(SchedError::MissingField {
                    field,
                    worker: label.trim().to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Référence légère vers un employé, telle qu'affichée dans un créneau.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorkerRef {
    pub email: String,
    pub name: String,
}

/// Plage d'ouverture contiguë d'un lieu pour un jour donné.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperationBlock {
    pub start_hour: f64,
    pub end_hour: f64,
}

impl OperationBlock {
    pub fn new(start_hour: f64, end_hour: f64) -> Self {
        let (start_hour, end_hour) = time::normalize_block(start_hour, end_hour);
        Self { start_hour, end_hour }
    }

    /// Construit un bloc depuis deux chaînes `"HH:MM"`.
    pub fn parse(start: &str, end: &str) -> Result<Self, SchedError> {
        Ok(Self::new(time::parse_time(start)?, time::parse_time(end)?))
    }

    pub fn duration(&self) -> f64 {
        self.end_hour - self.start_hour
    }
}

/// Horaires d'ouverture de la semaine ; un jour absent ou vide est fermé.
pub type HoursOfOperation = BTreeMap<Weekday, Vec<OperationBlock>>;

/// Identifiant fort pour Shift
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// État d'affectation d'un créneau.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "workers", rename_all = "snake_case")]
pub enum ShiftStatus {
    Filled(Vec<WorkerRef>),
    Unfilled,
}

impl ShiftStatus {
    pub fn from_workers(workers: Vec<WorkerRef>) -> Self {
        if workers.is_empty() {
            ShiftStatus::Unfilled
        } else {
            ShiftStatus::Filled(workers)
        }
    }
}

/// Clé d'un créneau : jour + bornes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShiftKey {
    pub day: Weekday,
    pub start_hour: f64,
    pub end_hour: f64,
}

impl fmt::Display for ShiftKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{}",
            self.day,
            time::format_time(self.start_hour),
            time::format_time(self.end_hour)
        )
    }
}

/// Créneau généré.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shift {
    pub id: ShiftId,
    pub day: Weekday,
    pub start_hour: f64,
    pub end_hour: f64,
    pub status: ShiftStatus,
    /// Employés dont les disponibilités couvrent le créneau, plafonds ignorés.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub available: Vec<WorkerRef>,
    #[serde(default)]
    pub is_work_study: bool,
}

impl Shift {
    pub fn duration_hours(&self) -> f64 {
        self.end_hour - self.start_hour
    }

    pub fn key(&self) -> ShiftKey {
        ShiftKey {
            day: self.day,
            start_hour: self.start_hour,
            end_hour: self.end_hour,
        }
    }

    pub fn assigned(&self) -> &[WorkerRef] {
        match &self.status {
            ShiftStatus::Filled(workers) => workers,
            ShiftStatus::Unfilled => &[],
        }
    }

    pub fn is_unfilled(&self) -> bool {
        matches!(self.status, ShiftStatus::Unfilled)
    }

    pub fn is_assigned_to(&self, email: &str) -> bool {
        self.assigned().iter().any(|w| w.email == email)
    }
}

/// Suggestions pour un créneau non pourvu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSolution {
    pub shift: ShiftKey,
    pub candidates: Vec<WorkerRef>,
}

/// Agrégats dérivés d'un planning ; toujours recalculés d'un bloc.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagnostics {
    pub assigned_hours: BTreeMap<String, f64>,
    pub assigned_days: BTreeMap<String, BTreeSet<Weekday>>,
    pub low_hour_workers: Vec<WorkerRef>,
    pub unassigned_workers: Vec<WorkerRef>,
    pub work_study_issues: Vec<WorkerRef>,
    pub unfilled_shifts: Vec<ShiftKey>,
    pub alternative_solutions: Vec<AlternativeSolution>,
}

impl Diagnostics {
    /// Vrai si au moins un avertissement est à remonter à l'utilisateur.
    pub fn has_issues(&self) -> bool {
        !self.low_hour_workers.is_empty()
            || !self.unassigned_workers.is_empty()
            || !self.work_study_issues.is_empty()
            || !self.unfilled_shifts.is_empty()
    }

    pub fn hours_of(&self, email: &str) -> f64 {
        self.assigned_hours.get(email).copied().unwrap_or(0.0)
    }
}

/// Planning complet d'une semaine.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub seed: u64,
    pub days: BTreeMap<Weekday, Vec<Shift>>,
    pub diagnostics: Diagnostics,
}

impl ScheduleResult {
    pub fn shifts(&self) -> impl Iterator<Item = &Shift> {
        self.days.values().flatten()
    }

    pub fn find_shift(&self, id: &ShiftId) -> Option<&Shift> {
        self.shifts().find(|s| &s.id == id)
    }
}
