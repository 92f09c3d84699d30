use crate::availability::{parse_availability, parse_not_available, windows_from_exclusions};
use crate::model::{ScheduleResult, ShiftStatus, Worker};
use crate::time::{self, Weekday};
use anyhow::{bail, Context};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de l'équipe depuis un CSV.
///
/// En-tête `first_name,last_name,email,work_study,availability` (liste libre
/// `"Mon 09:00-17:00, ..."`), ou ancien format avec une colonne oui/non par
/// jour et une colonne `not_available` (`"Mon 9-12, ..."`). Les noms de
/// colonnes sont insensibles à la casse et aux espaces (`First Name`).
pub fn import_workers_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Worker>> {
    let path = path.as_ref();
    let file = fs::File::open(path).with_context(|| format!("reading {}", path.display()))?;
    read_workers(file)
}

pub fn read_workers<R: std::io::Read>(reader: R) -> anyhow::Result<Vec<Worker>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
    let col = |name: &str| headers.iter().position(|h| h == name);

    let first = col("first_name").context("missing column first_name")?;
    let last = col("last_name").context("missing column last_name")?;
    let email = col("email").context("missing column email")?;
    let work_study = col("work_study");
    let availability = col("availability");
    let not_available = headers.iter().position(|h| h.starts_with("not_avail"));
    let day_columns: Vec<(Weekday, usize)> = Weekday::ALL
        .iter()
        .filter_map(|d| col(&d.name().to_ascii_lowercase()).map(|idx| (*d, idx)))
        .collect();

    let mut out = Vec::new();
    for (row, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let line = row + 2;
        let field = |idx: usize| rec.get(idx).unwrap_or("").trim();

        let mut worker = Worker::new(field(first), field(last), field(email));
        if let Some(idx) = work_study {
            let flag = field(idx);
            if !flag.is_empty() {
                worker.work_study = parse_bool(flag)
                    .with_context(|| format!("invalid work_study value on line {line}"))?;
            }
        }

        if let Some(idx) = availability {
            worker.availability = parse_availability(field(idx));
        } else if !day_columns.is_empty() {
            let exclusions = not_available
                .map(|idx| parse_not_available(field(idx)))
                .unwrap_or_default();
            for (day, idx) in &day_columns {
                if matches!(parse_bool(field(*idx)), Ok(true)) {
                    let excluded = exclusions.get(day).map(Vec::as_slice).unwrap_or(&[]);
                    worker
                        .availability
                        .insert(*day, windows_from_exclusions(excluded));
                }
            }
        }

        worker
            .validate()
            .with_context(|| format!("invalid worker on line {line}"))?;
        out.push(worker);
    }
    Ok(out)
}

fn normalize_header(raw: &str) -> String {
    raw.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Export JSON du planning (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(path: P, result: &ScheduleResult) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(result)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des créneaux: header `day,start,end,assigned`
pub fn export_schedule_csv<P: AsRef<Path>>(path: P, result: &ScheduleResult) -> anyhow::Result<()> {
    let file = fs::File::create(path)?;
    write_schedule_csv(file, result)
}

pub fn write_schedule_csv<W: std::io::Write>(writer: W, result: &ScheduleResult) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(false).from_writer(writer);
    w.write_record(["day", "start", "end", "assigned"])?;
    for s in result.shifts() {
        let assigned = match &s.status {
            ShiftStatus::Filled(workers) => workers
                .iter()
                .map(|w| w.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            ShiftStatus::Unfilled => "Unfilled".to_string(),
        };
        let start = time::format_time(s.start_hour);
        let end = time::format_time(s.end_hour);
        w.write_record([s.day.name(), start.as_str(), end.as_str(), assigned.as_str()])?;
    }
    w.flush()?;
    Ok(())
}
