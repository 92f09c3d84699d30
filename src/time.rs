use crate::scheduler::SchedError;
use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tolérance pour les comparaisons sur l'axe des heures décimales.
pub(crate) const EPSILON: f64 = 1e-6;

/// Jour de la semaine, dimanche en premier (ordre d'affichage du planning).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }

    /// Index 0..7 à partir de dimanche.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Reconnaît "mon", "Monday", "TUES"… (préfixe d'au moins 3 lettres).
    pub fn from_prefix(raw: &str) -> Option<Weekday> {
        let raw = raw.trim().to_ascii_lowercase();
        if raw.len() < 3 {
            return None;
        }
        Weekday::ALL
            .into_iter()
            .find(|d| d.name().to_ascii_lowercase().starts_with(&raw))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = SchedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::from_prefix(s).ok_or_else(|| SchedError::UnknownDay(s.to_string()))
    }
}

/// `"HH:MM"` -> heure décimale (`"14:30"` -> `14.5`).
pub fn parse_time(raw: &str) -> Result<f64, SchedError> {
    let t = NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| SchedError::InvalidTime(raw.to_string()))?;
    Ok(f64::from(t.hour()) + f64::from(t.minute()) / 60.0)
}

/// Heure décimale -> `"HH:MM"`, tronquée à la minute. Au-delà de 24h
/// (créneau de nuit), l'heure affichée est celle de l'horloge.
pub fn format_time(hour: f64) -> String {
    let (h, m) = split_hour(hour);
    format!("{h:02}:{m:02}")
}

/// Même chose au format 12h : `14.5` -> `"2:30 PM"`.
pub fn format_time_ampm(hour: f64) -> String {
    let (h, m) = split_hour(hour);
    let period = if h < 12 { "AM" } else { "PM" };
    let h12 = match h % 12 {
        0 => 12,
        other => other,
    };
    format!("{h12}:{m:02} {period}")
}

fn split_hour(hour: f64) -> (u32, u32) {
    let hour = hour.max(0.0);
    let whole = hour.trunc();
    let minutes = ((hour - whole) * 60.0 + EPSILON).trunc().min(59.0);
    ((whole as u32) % 24, minutes as u32)
}

/// Un intervalle dont la fin précède (ou égale) le début traverse minuit.
pub fn normalize_block(start: f64, end: f64) -> (f64, f64) {
    if end <= start {
        (start, end + 24.0)
    } else {
        (start, end)
    }
}

/// Chevauchement strict de deux intervalles semi-ouverts.
pub fn overlaps(a_start: f64, a_end: f64, b_start: f64, b_end: f64) -> bool {
    a_start.max(b_start) < a_end.min(b_end)
}

/// Retire `[cut_start, cut_end)` de chaque intervalle de `slots`.
pub(crate) fn subtract(slots: Vec<(f64, f64)>, cut_start: f64, cut_end: f64) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(slots.len() + 1);
    for (start, end) in slots {
        if !overlaps(start, end, cut_start, cut_end) {
            out.push((start, end));
            continue;
        }
        if start < cut_start {
            out.push((start, cut_start));
        }
        if cut_end < end {
            out.push((cut_end, end));
        }
    }
    out
}

pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Position d'une heure du jour `day` sur l'axe continu de la semaine.
pub(crate) fn week_hour(day: Weekday, hour: f64) -> f64 {
    day.index() as f64 * 24.0 + hour
}

pub(crate) const WEEK_HOURS: f64 = 7.0 * 24.0;
