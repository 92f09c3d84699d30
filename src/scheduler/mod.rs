mod assignment;
mod diagnostics;
mod mutate;
mod partition;
mod types;
mod util;

pub use types::{GenerateOptions, SchedError};

use crate::availability::{AvailabilityPolicy, ContainmentPolicy};
use crate::model::{Diagnostics, HoursOfOperation, ScheduleResult, Shift, ShiftId, Worker, WorkerRef};
use crate::time::Weekday;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Quota hebdomadaire exact d'un work-study.
pub const WORK_STUDY_HOURS: f64 = 5.0;
/// En dessous, un employé (hors work-study) est signalé.
pub const LOW_HOURS_THRESHOLD: f64 = 4.0;
/// Relâchement du plafond d'heures pour les suggestions.
pub const ALTERNATIVE_CAP_FACTOR: f64 = 1.5;

/// Scheduler : équipe, horaires d'ouverture et paramètres validés
#[derive(Debug, Clone)]
pub struct Scheduler<P = ContainmentPolicy> {
    workers: Vec<Worker>,
    hours: HoursOfOperation,
    opts: GenerateOptions,
    policy: P,
}

impl Scheduler<ContainmentPolicy> {
    pub fn new(
        workers: Vec<Worker>,
        hours: HoursOfOperation,
        opts: GenerateOptions,
    ) -> Result<Self, SchedError> {
        Self::with_policy(workers, hours, opts, ContainmentPolicy)
    }
}

impl<P: AvailabilityPolicy> Scheduler<P> {
    /// Valide toutes les entrées ; aucune génération n'a lieu si l'une
    /// d'elles est invalide.
    pub fn with_policy(
        workers: Vec<Worker>,
        hours: HoursOfOperation,
        opts: GenerateOptions,
        policy: P,
    ) -> Result<Self, SchedError> {
        opts.validate()?;
        let mut emails = BTreeSet::new();
        for w in &workers {
            w.validate()?;
            if !emails.insert(w.email.trim().to_ascii_lowercase()) {
                return Err(SchedError::DuplicateWorker(w.email.clone()));
            }
        }
        for block in hours.values().flatten() {
            let in_range = (0.0..24.0).contains(&block.start_hour)
                && block.duration() > 0.0
                && block.duration() <= 24.0;
            if !in_range {
                return Err(SchedError::InvalidParameter("operation block out of range"));
            }
        }
        Ok(Self {
            workers,
            hours,
            opts,
            policy,
        })
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }
    pub fn hours(&self) -> &HoursOfOperation {
        &self.hours
    }
    pub fn options(&self) -> &GenerateOptions {
        &self.opts
    }

    pub fn find_worker(&self, email: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.email == email)
    }

    /// Génère le planning de la semaine avec une graine explicite.
    pub fn generate(&self, seed: u64) -> ScheduleResult {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut result = self.generate_with(&mut rng);
        result.seed = seed;
        result
    }

    /// Génère le planning avec le générateur fourni (`seed` reste à 0).
    pub fn generate_with<R: Rng + ?Sized>(&self, rng: &mut R) -> ScheduleResult {
        let mut lengths = self.opts.shift_lengths.clone();
        lengths.shuffle(rng);

        let mut run = assignment::Assignment::new(&self.workers, &self.policy, &self.opts);
        run.assign_work_study(&self.hours, rng);
        run.assign_regular(&self.hours, &lengths, rng);
        let days = run.finish();

        let diagnostics = self.diagnostics(&days);
        info!(
            shifts = days.values().map(Vec::len).sum::<usize>(),
            unfilled = diagnostics.unfilled_shifts.len(),
            work_study_issues = diagnostics.work_study_issues.len(),
            "schedule generated"
        );
        ScheduleResult {
            seed: 0,
            days,
            diagnostics,
        }
    }

    /// Agrégats, avertissements et suggestions pour un ensemble de créneaux.
    pub fn diagnostics(&self, days: &BTreeMap<Weekday, Vec<Shift>>) -> Diagnostics {
        diagnostics::compute(days, &self.workers, &self.opts, &self.policy)
    }

    /// Recalcule les agrégats d'un planning existant (après une édition).
    pub fn recompute(&self, result: &ScheduleResult) -> Diagnostics {
        self.diagnostics(&result.days)
    }

    pub fn find_alternatives(&self, day: Weekday, start: f64, end: f64) -> Vec<WorkerRef> {
        diagnostics::find_alternatives(&self.workers, &self.opts, &self.policy, day, start, end)
    }

    /// Affecte manuellement `emails` au créneau `shift_id` (liste vide :
    /// créneau non pourvu).
    pub fn reassign(
        &self,
        result: &mut ScheduleResult,
        shift_id: &ShiftId,
        emails: &[String],
    ) -> Result<(), SchedError> {
        mutate::reassign(self, result, shift_id, emails)
    }
}
