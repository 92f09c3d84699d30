use crate::model::{AvailabilityWindow, Worker};
use crate::time::{self, Weekday};
use std::collections::BTreeMap;
use tracing::debug;

/// Décide si un employé peut tenir un créneau `[start, end)` d'un jour donné.
pub trait AvailabilityPolicy {
    fn is_available(&self, worker: &Worker, day: Weekday, start: f64, end: f64) -> bool;
}

/// Politique de confinement : une seule fenêtre déclarée doit contenir
/// entièrement le créneau. Aucun créneau n'est accepté un jour sans fenêtre.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContainmentPolicy;

impl AvailabilityPolicy for ContainmentPolicy {
    fn is_available(&self, worker: &Worker, day: Weekday, start: f64, end: f64) -> bool {
        worker
            .availability
            .get(&day)
            .is_some_and(|windows| windows.iter().any(|w| w.contains(start, end)))
    }
}

/// Parse une liste libre `"Monday 09:00-17:00, tue 10:00-12:00"`.
///
/// Les entrées illisibles sont ignorées.
pub fn parse_availability(raw: &str) -> BTreeMap<Weekday, Vec<AvailabilityWindow>> {
    let mut out: BTreeMap<Weekday, Vec<AvailabilityWindow>> = BTreeMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match parse_entry(entry, |t| time::parse_time(t).ok()) {
            Some((day, start, end)) => out
                .entry(day)
                .or_default()
                .push(AvailabilityWindow::new(start, end)),
            None => debug!(entry = %entry, "skipping malformed availability entry"),
        }
    }
    out
}

/// Ancien format d'indisponibilités : `"Mon 9-12, tue 14:30 to 16"`.
pub fn parse_not_available(raw: &str) -> BTreeMap<Weekday, Vec<(f64, f64)>> {
    let mut out: BTreeMap<Weekday, Vec<(f64, f64)>> = BTreeMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let entry = entry.replace(" to ", "-");
        match parse_entry(&entry, parse_loose_hour) {
            Some((day, start, end)) => out.entry(day).or_default().push((start, end)),
            None => debug!(entry = %entry, "skipping malformed not-available entry"),
        }
    }
    out
}

/// Complément des exclusions dans `[0, 24]` : convertit un jour
/// "disponible sauf…" en fenêtres de confinement.
pub fn windows_from_exclusions(exclusions: &[(f64, f64)]) -> Vec<AvailabilityWindow> {
    exclusions
        .iter()
        .fold(vec![(0.0, 24.0)], |slots, &(start, end)| {
            time::subtract(slots, start, end)
        })
        .into_iter()
        .filter(|(start, end)| end - start > time::EPSILON)
        .map(|(start, end)| AvailabilityWindow { start_hour: start, end_hour: end })
        .collect()
}

fn parse_entry<F>(entry: &str, hour: F) -> Option<(Weekday, f64, f64)>
where
    F: Fn(&str) -> Option<f64>,
{
    let (day, range) = entry.split_once(char::is_whitespace)?;
    let day = Weekday::from_prefix(day)?;
    let range: String = range.chars().filter(|c| !c.is_whitespace()).collect();
    let (start, end) = range.split_once('-')?;
    Some((day, hour(start)?, hour(end)?))
}

fn parse_loose_hour(raw: &str) -> Option<f64> {
    if raw.contains(':') {
        return time::parse_time(raw).ok();
    }
    raw.parse::<u32>()
        .ok()
        .filter(|h| *h <= 24)
        .map(f64::from)
}
