use crate::model::{Shift, ShiftId};
use crate::time::{self, Weekday, WEEK_HOURS};
use rand::Rng;

/// Intervalle d'un créneau sur l'axe continu de la semaine.
pub(super) fn week_span(day: Weekday, start: f64, end: f64) -> (f64, f64) {
    (time::week_hour(day, start), time::week_hour(day, end))
}

/// Chevauchement sur une semaine circulaire (la nuit de samedi déborde
/// sur dimanche).
pub(super) fn week_overlaps(a: (f64, f64), b: (f64, f64)) -> bool {
    [0.0, WEEK_HOURS, -WEEK_HOURS]
        .iter()
        .any(|shift| time::overlaps(a.0, a.1, b.0 + shift, b.1 + shift))
}

/// Identifiant tiré du générateur de la génération, stable pour une graine.
pub(super) fn shift_id<R: Rng + ?Sized>(rng: &mut R) -> ShiftId {
    let id = uuid::Builder::from_random_bytes(rng.random()).into_uuid();
    ShiftId::new(id.to_string())
}

pub(super) fn find_shift_position(
    shifts: &[Shift],
    shift_id: &ShiftId,
) -> Option<usize> {
    shifts.iter().position(|s| &s.id == shift_id)
}
