use crate::model::{ScheduleResult, Shift, ShiftStatus, WorkerRef};
use crate::time::format_time_ampm;

/// Permet de customiser le rendu d'un planning (texte, HTML, etc.).
pub trait ScheduleRenderer {
    fn render(&self, title: &str, result: &ScheduleResult) -> String;
}

/// Rendu texte pour le terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextSchedule;

impl ScheduleRenderer for TextSchedule {
    fn render(&self, title: &str, result: &ScheduleResult) -> String {
        let diag = &result.diagnostics;
        let mut lines = vec![format!("{title} schedule (seed {})", result.seed)];

        for (day, shifts) in &result.days {
            lines.push(String::new());
            lines.push(day.to_string());
            if shifts.is_empty() {
                lines.push("  (no shifts)".to_string());
            }
            for s in shifts {
                let tag = if s.is_work_study { " [work-study]" } else { "" };
                lines.push(format!("  {:<20} {}{tag}", span(s), assigned_names(s)));
            }
        }

        lines.push(String::new());
        lines.push("Hours".to_string());
        let mut hours: Vec<(&String, &f64)> = diag.assigned_hours.iter().collect();
        hours.sort_by(|a, b| b.1.total_cmp(a.1).then(a.0.cmp(b.0)));
        for (email, h) in hours {
            lines.push(format!("  {email:<28} {h:>5.1}"));
        }

        if diag.has_issues() {
            lines.push(String::new());
            lines.push("Warnings".to_string());
            for alt in &diag.alternative_solutions {
                let who = if alt.candidates.is_empty() {
                    "nobody available".to_string()
                } else {
                    format!("could cover: {}", names(&alt.candidates))
                };
                lines.push(format!("  unfilled {} ({who})", alt.shift));
            }
            for w in &diag.low_hour_workers {
                lines.push(format!("  low hours: {} ({:.1}h)", w.name, diag.hours_of(&w.email)));
            }
            for w in &diag.unassigned_workers {
                lines.push(format!("  no hours: {}", w.name));
            }
            for w in &diag.work_study_issues {
                lines.push(format!(
                    "  work-study quota missed: {} ({:.1}h)",
                    w.name,
                    diag.hours_of(&w.email)
                ));
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

/// Tableau HTML par jour, tel qu'envoyé en corps de mail.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlSchedule;

impl ScheduleRenderer for HtmlSchedule {
    fn render(&self, title: &str, result: &ScheduleResult) -> String {
        let mut html = String::from(
            "<html>\n<head>\n<style>\n\
             body { font-family: Arial, sans-serif; }\n\
             table { border-collapse: collapse; width: 100%; }\n\
             th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }\n\
             th { background-color: #f2f2f2; }\n\
             .unfilled { color: red; }\n\
             </style>\n</head>\n<body>\n",
        );
        html.push_str(&format!("<h2>{} Schedule</h2>\n", escape(title)));

        for (day, shifts) in result.days.iter().filter(|(_, s)| !s.is_empty()) {
            html.push_str(&format!("<h3>{day}</h3>\n<table>\n"));
            html.push_str("<tr><th>Start</th><th>End</th><th>Assigned</th></tr>\n");
            for s in shifts {
                let class = if s.is_unfilled() { " class=\"unfilled\"" } else { "" };
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td{class}>{}</td></tr>\n",
                    format_time_ampm(s.start_hour),
                    format_time_ampm(s.end_hour),
                    escape(&assigned_names(s)),
                ));
            }
            html.push_str("</table>\n");
        }

        html.push_str("</body>\n</html>\n");
        html
    }
}

fn span(s: &Shift) -> String {
    format!(
        "{} - {}",
        format_time_ampm(s.start_hour),
        format_time_ampm(s.end_hour)
    )
}

fn assigned_names(s: &Shift) -> String {
    match &s.status {
        ShiftStatus::Filled(workers) => names(workers),
        ShiftStatus::Unfilled => "Unfilled".to_string(),
    }
}

fn names(workers: &[WorkerRef]) -> String {
    workers
        .iter()
        .map(|w| w.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
