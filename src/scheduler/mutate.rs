use super::{diagnostics, util, SchedError, Scheduler};
use crate::availability::AvailabilityPolicy;
use crate::model::{ScheduleResult, ShiftId, ShiftStatus, WorkerRef};
use crate::time::Weekday;
use std::collections::BTreeSet;
use tracing::info;

/// Remplace les employés d'un créneau (correction manuelle) puis recalcule
/// les agrégats. Le planning n'est pas modifié en cas d'erreur.
pub(super) fn reassign<P: AvailabilityPolicy>(
    scheduler: &Scheduler<P>,
    result: &mut ScheduleResult,
    shift_id: &ShiftId,
    emails: &[String],
) -> Result<(), SchedError> {
    let Some((day, pos, target_span)) = locate(result, shift_id) else {
        return Err(SchedError::UnknownShift(shift_id.as_str().to_string()));
    };

    let mut seen = BTreeSet::new();
    if !emails.iter().all(|e| seen.insert(e.as_str())) {
        return Err(SchedError::ReassignInvalid("worker listed twice"));
    }
    if emails.len() > scheduler.opts.max_workers_per_shift as usize {
        return Err(SchedError::ReassignInvalid("too many workers for shift"));
    }

    let refs: Vec<WorkerRef> = emails
        .iter()
        .map(|email| {
            scheduler
                .find_worker(email)
                .map(|w| w.to_ref())
                .ok_or_else(|| SchedError::UnknownWorker(email.clone()))
        })
        .collect::<Result<_, _>>()?;

    for w in &refs {
        let clash = result
            .shifts()
            .filter(|s| s.id != *shift_id && s.is_assigned_to(&w.email))
            .any(|s| util::week_overlaps(util::week_span(s.day, s.start_hour, s.end_hour), target_span));
        if clash {
            return Err(SchedError::ReassignInvalid("introduces overlap"));
        }
    }

    info!(shift = %shift_id, workers = refs.len(), "shift reassigned");
    if let Some(shift) = result.days.get_mut(&day).and_then(|shifts| shifts.get_mut(pos)) {
        shift.status = ShiftStatus::from_workers(refs);
    }
    result.diagnostics =
        diagnostics::compute(&result.days, &scheduler.workers, &scheduler.opts, &scheduler.policy);
    Ok(())
}

fn locate(result: &ScheduleResult, shift_id: &ShiftId) -> Option<(Weekday, usize, (f64, f64))> {
    result.days.iter().find_map(|(day, shifts)| {
        util::find_shift_position(shifts, shift_id).map(|pos| {
            let s = &shifts[pos];
            (*day, pos, util::week_span(*day, s.start_hour, s.end_hour))
        })
    })
}
