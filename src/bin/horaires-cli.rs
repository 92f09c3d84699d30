#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use horaires::{
    availability::parse_availability,
    io,
    model::{ShiftId, Worker},
    report::{HtmlSchedule, ScheduleRenderer, TextSchedule},
    scheduler::{GenerateOptions, Scheduler},
    storage::{JsonStorage, SavedSchedule, Storage},
    time::{self, Weekday},
    workplace::{WorkerPatch, WorkplaceStore},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération de plannings hebdomadaires (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Répertoire des lieux (un JSON par lieu)
    #[arg(long, global = true, default_value = "workplaces")]
    store: String,

    /// Fichier JSON du dernier planning généré
    #[arg(long, global = true, default_value = "schedule.json")]
    schedule: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter une plage d'ouverture à un lieu (le crée au besoin)
    AddBlock {
        #[arg(long)]
        workplace: String,
        /// "mon", "Monday", ...
        #[arg(long)]
        day: Weekday,
        /// HH:MM
        #[arg(long)]
        start: String,
        /// HH:MM (avant `start` : traverse minuit)
        #[arg(long)]
        end: String,
    },

    /// Fermer un lieu pour une journée
    ClearDay {
        #[arg(long)]
        workplace: String,
        #[arg(long)]
        day: Weekday,
    },

    /// Afficher les horaires d'ouverture d'un lieu
    Hours {
        #[arg(long)]
        workplace: String,
    },

    /// Lister les lieux connus
    ListWorkplaces,

    /// Ajouter un employé à l'équipe d'un lieu
    AddWorker {
        #[arg(long)]
        workplace: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        work_study: bool,
        /// "Mon 09:00-17:00, Wed 12:00-20:00"
        #[arg(long, default_value = "")]
        availability: String,
    },

    /// Modifier un employé (identifié par son email)
    UpdateWorker {
        #[arg(long)]
        workplace: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        work_study: Option<bool>,
        /// remplace toutes les disponibilités
        #[arg(long)]
        availability: Option<String>,
    },

    /// Retirer un employé de l'équipe
    RemoveWorker {
        #[arg(long)]
        workplace: String,
        #[arg(long)]
        email: String,
    },

    /// Fusionner un CSV dans l'équipe enregistrée
    ImportWorkers {
        #[arg(long)]
        workplace: String,
        #[arg(long)]
        csv: String,
    },

    /// Afficher l'équipe d'un lieu
    Workers {
        #[arg(long)]
        workplace: String,
    },

    /// Générer le planning de la semaine
    Generate {
        #[arg(long)]
        workplace: String,
        /// CSV de l'équipe (par défaut : équipe enregistrée du lieu)
        #[arg(long)]
        workers: Option<String>,
        #[arg(long)]
        max_hours: Option<u32>,
        #[arg(long)]
        max_per_shift: Option<u32>,
        /// Graine (par défaut : horloge)
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Afficher le planning courant
    Show {
        /// Écrit aussi le rendu HTML dans ce fichier
        #[arg(long)]
        html: Option<String>,
    },

    /// Réaffecter un créneau à la main
    Reassign {
        #[arg(long)]
        shift_id: String,
        /// liste "email1,email2,..." (vide : créneau non pourvu)
        #[arg(long, default_value = "")]
        workers: String,
    },

    /// Vérifier les avertissements du planning courant
    Check {
        /// Export CSV des créneaux non pourvus (optionnel)
        #[arg(long)]
        report: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let store = WorkplaceStore::new(&cli.store);
    let storage = JsonStorage::open(&cli.schedule)?;

    let code = match cli.cmd {
        Commands::AddBlock {
            workplace,
            day,
            start,
            end,
        } => {
            let mut wp = store.load_or_new(&workplace)?;
            wp.add_block(day, &start, &end)?;
            store.save(&wp)?;
            0
        }
        Commands::ClearDay { workplace, day } => {
            let mut wp = store.load(&workplace)?;
            wp.clear_day(day);
            store.save(&wp)?;
            0
        }
        Commands::Hours { workplace } => {
            let wp = store.load(&workplace)?;
            println!("{} ({})", wp.name, wp.id);
            for day in Weekday::ALL {
                let blocks = wp
                    .hours_of_operation
                    .get(&day)
                    .map(|b| {
                        b.iter()
                            .map(|s| format!("{}-{}", s.start, s.end))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .filter(|s| !s.is_empty())
                    .unwrap_or_else(|| "closed".to_string());
                println!("  {:<10} {}", day.name(), blocks);
            }
            0
        }
        Commands::ListWorkplaces => {
            for info in store.list()? {
                println!(
                    "{} | {} | {}",
                    info.workplace.id,
                    info.workplace.name,
                    info.path.display()
                );
            }
            0
        }
        Commands::AddWorker {
            workplace,
            first_name,
            last_name,
            email,
            work_study,
            availability,
        } => {
            let mut wp = store.load_or_new(&workplace)?;
            let mut worker = Worker::new(first_name, last_name, email).work_study(work_study);
            worker.availability = parse_availability(&availability);
            wp.add_worker(worker)?;
            store.save(&wp)?;
            0
        }
        Commands::UpdateWorker {
            workplace,
            email,
            first_name,
            last_name,
            work_study,
            availability,
        } => {
            let mut wp = store.load(&workplace)?;
            let patch = WorkerPatch {
                first_name,
                last_name,
                work_study,
                availability: availability.as_deref().map(parse_availability),
            };
            wp.update_worker(&email, &patch)?;
            store.save(&wp)?;
            0
        }
        Commands::RemoveWorker { workplace, email } => {
            let mut wp = store.load(&workplace)?;
            let removed = wp.remove_worker(&email)?;
            store.save(&wp)?;
            println!("removed {}", removed.full_name());
            0
        }
        Commands::ImportWorkers { workplace, csv } => {
            let mut wp = store.load_or_new(&workplace)?;
            let team = io::import_workers_csv(&csv)?;
            let (added, replaced) = wp.import_workers(team)?;
            store.save(&wp)?;
            println!("{added} added, {replaced} updated");
            0
        }
        Commands::Workers { workplace } => {
            let wp = store.load(&workplace)?;
            for w in &wp.workers {
                let days = w
                    .availability
                    .iter()
                    .flat_map(|(day, windows)| {
                        windows.iter().map(move |win| {
                            format!(
                                "{} {}-{}",
                                day,
                                time::format_time(win.start_hour),
                                time::format_time(win.end_hour)
                            )
                        })
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                let tag = if w.work_study { " [work-study]" } else { "" };
                println!("{} | {}{tag} | {}", w.email, w.full_name(), days);
            }
            0
        }
        Commands::Generate {
            workplace,
            workers,
            max_hours,
            max_per_shift,
            seed,
            out_json,
            out_csv,
        } => {
            let wp = store.load(&workplace)?;
            if !wp.is_open() {
                bail!("no hours of operation defined for {workplace}");
            }
            let mut opts = wp.options(GenerateOptions::default());
            if let Some(v) = max_hours {
                opts.max_hours_per_worker = v;
            }
            if let Some(v) = max_per_shift {
                opts.max_workers_per_shift = v;
            }

            let team = match workers {
                Some(path) => io::import_workers_csv(&path)?,
                None => wp.workers.clone(),
            };
            if team.is_empty() {
                bail!("no workers for {workplace}: add some or pass --workers");
            }
            let hours = wp.operation_hours()?;
            let scheduler = Scheduler::new(team, hours, opts)?;

            let now = Utc::now();
            let seed = seed.unwrap_or_else(|| now.timestamp_millis().unsigned_abs());
            let result = scheduler.generate(seed);

            if let Some(path) = out_json {
                io::export_schedule_json(path, &result)?;
            }
            if let Some(path) = out_csv {
                io::export_schedule_csv(path, &result)?;
            }
            print!("{}", TextSchedule.render(&wp.name, &result));

            storage.save(&SavedSchedule {
                workplace_id: wp.id.clone(),
                generated_at: now,
                hours: scheduler.hours().clone(),
                workers: scheduler.workers().to_vec(),
                options: scheduler.options().clone(),
                result,
            })?;
            0
        }
        Commands::Show { html } => {
            let saved = storage.load()?;
            let title = store
                .load(&saved.workplace_id)
                .map(|wp| wp.name)
                .unwrap_or_else(|_| saved.workplace_id.clone());
            if let Some(path) = html {
                std::fs::write(&path, HtmlSchedule.render(&title, &saved.result))
                    .with_context(|| format!("writing {path}"))?;
            }
            print!("{}", TextSchedule.render(&title, &saved.result));
            // impression compacte des identifiants pour `reassign`
            for s in saved.result.shifts() {
                println!(
                    "{} | {} {}-{}",
                    s.id,
                    s.day,
                    time::format_time(s.start_hour),
                    time::format_time(s.end_hour)
                );
            }
            0
        }
        Commands::Reassign { shift_id, workers } => {
            let mut saved = storage.load()?;
            let scheduler = saved.scheduler()?;
            let emails: Vec<String> = workers
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            scheduler.reassign(&mut saved.result, &ShiftId::new(shift_id), &emails)?;
            storage.save(&saved)?;
            0
        }
        Commands::Check { report } => {
            let saved = storage.load()?;
            let diag = &saved.result.diagnostics;
            if !diag.has_issues() {
                println!("OK: no warnings");
                0
            } else {
                eprintln!(
                    "Found {} unfilled shift(s), {} low-hour, {} unassigned, {} work-study issue(s)",
                    diag.unfilled_shifts.len(),
                    diag.low_hour_workers.len(),
                    diag.unassigned_workers.len(),
                    diag.work_study_issues.len()
                );
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["day", "start", "end", "alternatives"])?;
                    for alt in &diag.alternative_solutions {
                        let names = alt
                            .candidates
                            .iter()
                            .map(|c| c.email.as_str())
                            .collect::<Vec<_>>()
                            .join(";");
                        w.write_record([
                            alt.shift.day.name(),
                            time::format_time(alt.shift.start_hour).as_str(),
                            time::format_time(alt.shift.end_hour).as_str(),
                            names.as_str(),
                        ])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
    };

    std::process::exit(code);
}
