use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Paramètres d'une génération
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub max_hours_per_worker: u32,
    pub max_workers_per_shift: u32,
    pub min_shift_length: u32,
    /// Durées autorisées (heures) ; l'ordre est mélangé à chaque génération.
    pub shift_lengths: Vec<u32>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_hours_per_worker: 20,
            max_workers_per_shift: 1,
            min_shift_length: 2,
            shift_lengths: vec![2, 3, 4, 5],
        }
    }
}

impl GenerateOptions {
    pub fn validate(&self) -> Result<(), SchedError> {
        if self.max_hours_per_worker == 0 {
            return Err(SchedError::InvalidParameter("max_hours_per_worker must be > 0"));
        }
        if self.max_workers_per_shift == 0 {
            return Err(SchedError::InvalidParameter("max_workers_per_shift must be > 0"));
        }
        if self.min_shift_length == 0 {
            return Err(SchedError::InvalidParameter("min_shift_length must be > 0"));
        }
        if self.shift_lengths.is_empty() || self.shift_lengths.contains(&0) {
            return Err(SchedError::InvalidParameter(
                "shift_lengths must be non-empty and positive",
            ));
        }
        if self.shift_lengths.iter().any(|l| *l < self.min_shift_length) {
            return Err(SchedError::InvalidParameter(
                "shift_lengths must not be shorter than min_shift_length",
            ));
        }
        Ok(())
    }

    pub(crate) fn max_hours(&self) -> f64 {
        f64::from(self.max_hours_per_worker)
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid time: {0:?} (expected HH:MM)")]
    InvalidTime(String),
    #[error("unknown weekday: {0}")]
    UnknownDay(String),
    #[error("missing required field `{field}` for worker {worker:?}")]
    MissingField { field: &'static str, worker: String },
    #[error("duplicate worker email: {0}")]
    DuplicateWorker(String),
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
    #[error("unknown worker: {0}")]
    UnknownWorker(String),
    #[error("unknown shift: {0}")]
    UnknownShift(String),
    #[error("reassign invalid: {0}")]
    ReassignInvalid(&'static str),
}
