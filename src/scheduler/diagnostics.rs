use super::{GenerateOptions, ALTERNATIVE_CAP_FACTOR, LOW_HOURS_THRESHOLD, WORK_STUDY_HOURS};
use crate::availability::AvailabilityPolicy;
use crate::model::{AlternativeSolution, Diagnostics, Shift, Worker, WorkerRef};
use crate::time::{self, Weekday, EPSILON};
use std::collections::BTreeMap;

/// Recalcule tous les agrégats d'un planning. Fonction pure : deux appels
/// sur le même planning donnent le même résultat.
pub(super) fn compute<P: AvailabilityPolicy>(
    days: &BTreeMap<Weekday, Vec<Shift>>,
    workers: &[Worker],
    opts: &GenerateOptions,
    policy: &P,
) -> Diagnostics {
    let mut out = Diagnostics::default();

    for w in workers {
        out.assigned_hours.insert(w.email.clone(), 0.0);
    }
    for shift in days.values().flatten() {
        for w in shift.assigned() {
            *out.assigned_hours.entry(w.email.clone()).or_insert(0.0) += shift.duration_hours();
            out.assigned_days
                .entry(w.email.clone())
                .or_default()
                .insert(shift.day);
        }
    }

    for w in workers {
        let hours = out.hours_of(&w.email);
        if hours < EPSILON {
            out.unassigned_workers.push(w.to_ref());
        } else if !w.work_study && hours < LOW_HOURS_THRESHOLD {
            out.low_hour_workers.push(w.to_ref());
        }
        if w.work_study && !time::approx_eq(hours, WORK_STUDY_HOURS) {
            out.work_study_issues.push(w.to_ref());
        }
    }

    for shift in days.values().flatten().filter(|s| s.is_unfilled()) {
        let key = shift.key();
        out.unfilled_shifts.push(key);
        out.alternative_solutions.push(AlternativeSolution {
            shift: key,
            candidates: find_alternatives(workers, opts, policy, key.day, key.start_hour, key.end_hour),
        });
    }

    out
}

/// Qui pourrait tenir ce créneau si l'on relâchait le plafond d'heures ?
/// La charge actuelle est ignorée ; l'ordre est celui de l'équipe.
pub(super) fn find_alternatives<P: AvailabilityPolicy>(
    workers: &[Worker],
    opts: &GenerateOptions,
    policy: &P,
    day: Weekday,
    start: f64,
    end: f64,
) -> Vec<WorkerRef> {
    let duration = end - start;
    let relaxed_cap = opts.max_hours() * ALTERNATIVE_CAP_FACTOR;
    workers
        .iter()
        .filter(|w| policy.is_available(w, day, start, end))
        .filter(|w| !w.work_study || time::approx_eq(duration, WORK_STUDY_HOURS))
        .filter(|_| duration <= relaxed_cap + EPSILON)
        .map(Worker::to_ref)
        .collect()
}
