#![forbid(unsafe_code)]
//! Horaires : bibliothèque de génération de plannings hebdomadaires (sans BD).
//!
//! - Découpage des heures d'ouverture en créneaux de durées variées.
//! - Affectation gloutonne et aléatoire (graine explicite), plafonds d'heures,
//!   quota exact de 5h pour les work-study.
//! - Diagnostics : créneaux non pourvus, employés sous-employés, suggestions.
//! - Stockage fichiers (JSON/CSV).

pub mod availability;
pub mod io;
pub mod model;
pub mod report;
pub mod scheduler;
pub mod storage;
pub mod time;
pub mod workplace;

pub use availability::{AvailabilityPolicy, ContainmentPolicy};
pub use model::{
    AlternativeSolution, AvailabilityWindow, Diagnostics, HoursOfOperation, OperationBlock,
    ScheduleResult, Shift, ShiftId, ShiftKey, ShiftStatus, Worker, WorkerRef,
};
pub use report::{HtmlSchedule, ScheduleRenderer, TextSchedule};
pub use scheduler::{GenerateOptions, SchedError, Scheduler};
pub use storage::{JsonStorage, SavedSchedule, Storage};
pub use time::Weekday;
pub use workplace::{BlockSpec, RunDefaults, WorkerPatch, Workplace, WorkplaceInfo, WorkplaceStore};
