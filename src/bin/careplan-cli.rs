#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use careplan::{
    io,
    model::{CarePlan, ChildId, ChildProfile, ProgressLog, StaffId, TimetableEntry},
    narrative::{self, NarrativeCache, NarrativeSource, Narrator, OfflineBackend},
    progress::{self, ProgressStats},
    scheduler::{self, ConflictKind, TimeWindow},
    storage::{JsonStorage, Storage},
    ClockTime,
};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planification (emplois du temps, personnel, progrès) sans base de données
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du plan
    #[arg(long, global = true, default_value = "careplan.json")]
    plan: String,

    /// Répertoire du cache des textes narratifs
    #[arg(long, global = true, default_value = ".careplan-cache")]
    cache_dir: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ajouter un enfant
    AddChild {
        #[arg(long)]
        name: String,
        /// YYYY-MM-DD
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Ajouter un membre du personnel
    AddStaff {
        #[arg(long)]
        name: String,
        #[arg(long)]
        role: Option<String>,
    },

    /// Ajouter un template d'activité
    AddTemplate {
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = 30)]
        duration: u32,
        #[arg(long)]
        description: Option<String>,
    },

    /// Importer des enfants depuis un CSV
    ImportChildren {
        #[arg(long)]
        csv: String,
    },

    /// Importer du personnel depuis un CSV
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Importer des templates depuis un CSV
    ImportTemplates {
        #[arg(long)]
        csv: String,
    },

    /// Générer l'emploi du temps d'un enfant pour une date
    Generate {
        #[arg(long)]
        child: u32,
        #[arg(long)]
        date: NaiveDate,
        /// HH:MM
        #[arg(long, default_value = "09:00")]
        start: ClockTime,
        /// HH:MM
        #[arg(long, default_value = "12:00")]
        end: ClockTime,
        /// Enregistrer les blocs générés dans le plan
        #[arg(long)]
        save: bool,
        /// Afficher une justification de l'emploi du temps
        #[arg(long)]
        explain: bool,
    },

    /// Allouer le personnel aux créneaux d'une date
    Allocate {
        #[arg(long)]
        date: NaiveDate,
        /// liste d'ids "1,3,..." (ordre de priorité) ; tout le personnel par défaut
        #[arg(long, value_delimiter = ',')]
        staff: Vec<u32>,
        #[arg(long)]
        save: bool,
        /// Expliquer la répartition (micro-coaching)
        #[arg(long)]
        explain: bool,
    },

    /// Lister une journée et optionnellement exporter
    List {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        allocations_csv: Option<String>,
    },

    /// Vérifier les conflits d'allocation d'une date
    Check {
        #[arg(long)]
        date: NaiveDate,
        /// Export CSV des conflits (optionnel)
        #[arg(long)]
        report: Option<String>,
    },

    /// Enregistrer un journal de progrès
    LogProgress {
        #[arg(long)]
        child: u32,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        completed: bool,
        /// 0 à 10
        #[arg(long, default_value_t = 5)]
        engagement: u8,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Résumé du jour pour la famille
    Summary {
        #[arg(long)]
        child: u32,
        #[arg(long)]
        date: NaiveDate,
    },

    /// Conseil rapide à partir du dernier journal du jour
    Coach {
        #[arg(long)]
        child: u32,
        #[arg(long)]
        date: NaiveDate,
    },

    /// Synthèse hebdomadaire sur les derniers journaux
    Weekly {
        #[arg(long)]
        child: u32,
        #[arg(long, default_value = "Teacher/Parent/Doctor")]
        audience: String,
    },

    /// Exporter les journaux anonymisés d'un enfant (JSON)
    Anonymize {
        #[arg(long)]
        child: u32,
        #[arg(long)]
        out: String,
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

    let storage = JsonStorage::open(&cli.plan)?;
    let mut plan = storage.load_or_default()?;

    let code = match cli.cmd {
        Commands::AddChild { name, birth_date, notes } => {
            let id = plan.add_child(name, birth_date, notes);
            storage.save(&plan)?;
            println!("child {id}");
            0
        }
        Commands::AddStaff { name, role } => {
            let id = plan.add_staff(name, role);
            storage.save(&plan)?;
            println!("staff {id}");
            0
        }
        Commands::AddTemplate { title, duration, description } => {
            let id = plan
                .add_template(title, duration, description)
                .map_err(anyhow::Error::msg)?;
            storage.save(&plan)?;
            println!("template {id}");
            0
        }
        Commands::ImportChildren { csv } => {
            let n = io::import_children_csv(csv, &mut plan)?;
            storage.save(&plan)?;
            println!("imported {n} child(ren)");
            0
        }
        Commands::ImportStaff { csv } => {
            let n = io::import_staff_csv(csv, &mut plan)?;
            storage.save(&plan)?;
            println!("imported {n} staff member(s)");
            0
        }
        Commands::ImportTemplates { csv } => {
            let n = io::import_templates_csv(csv, &mut plan)?;
            storage.save(&plan)?;
            println!("imported {n} template(s)");
            0
        }
        Commands::Generate { child, date, start, end, save, explain } => {
            let profile = find_child(&plan, child)?.clone();
            let window = TimeWindow::new(start, end)?;
            let templates = plan.template_inputs();
            if templates.is_empty() {
                bail!("no activity template defined");
            }
            let blocks = scheduler::generate_schedule(window, &templates);
            if blocks.is_empty() {
                eprintln!("No block fits in {start}-{end}");
            }
            for b in &blocks {
                println!("{} → {} | {}", b.start, b.end, b.activity);
            }
            if explain && !blocks.is_empty() {
                let request = narrative::rationale_request(&profile, date, &blocks);
                print_narrative(&cli.cache_dir, &request)?;
            }
            if save {
                for b in &blocks {
                    let entry = TimetableEntry::from_block(profile.id, date, b)
                        .map_err(anyhow::Error::msg)?;
                    plan.timetable.push(entry);
                }
                storage.save(&plan)?;
            }
            0
        }
        Commands::Allocate { date, staff, save, explain } => {
            let staff = if staff.is_empty() {
                plan.staff_identities()
            } else {
                let ids: Vec<StaffId> = staff.into_iter().map(StaffId).collect();
                plan.staff_subset(&ids)?
            };
            if staff.is_empty() {
                bail!("no staff member defined");
            }
            let blocks = plan.blocks_for(date);
            let allocations = scheduler::allocate(&staff, &blocks);
            if explain {
                let context = narrative::mapping_context(date, &staff, &blocks);
                print_narrative(&cli.cache_dir, &narrative::microcoach_request(context))?;
            }
            let mut conflicts = 0usize;
            for a in &allocations {
                let staff_name = plan.find_staff(a.staff_id).map_or("-", |s| s.name.as_str());
                let child_name = plan.find_child(a.child_id).map_or("-", |c| c.name.as_str());
                let flag = if a.conflict {
                    conflicts += 1;
                    " | CONFLICT: double-booked"
                } else {
                    ""
                };
                println!("{} → {} | {} | {}{}", a.start, a.end, child_name, staff_name, flag);
            }
            if save {
                plan.replace_allocations(date, allocations);
                storage.save(&plan)?;
            }
            if conflicts > 0 {
                eprintln!("{conflicts} block(s) force-assigned");
                2
            } else {
                0
            }
        }
        Commands::List { date, out_json, out_csv, allocations_csv } => {
            if let Some(path) = out_json {
                io::export_plan_json(path, &plan)?;
            }
            if let Some(path) = out_csv {
                io::export_timetable_csv_to_path(path, &plan, date)?;
            }
            if let Some(path) = allocations_csv {
                io::export_allocations_csv_to_path(path, &plan, date)?;
            }
            for e in plan.timetable_for(date) {
                let child = plan.find_child(e.child_id).map_or("-", |c| c.name.as_str());
                let staff = e
                    .staff_id
                    .and_then(|id| plan.find_staff(id))
                    .map_or("-", |s| s.name.as_str());
                println!("{} → {} | {} | {} | {}", e.start, e.end, child, e.activity, staff);
            }
            0
        }
        Commands::Check { date, report } => {
            let allocations: Vec<_> = plan
                .allocations_for(date)
                .into_iter()
                .map(|r| r.allocation.clone())
                .collect();
            let conflicts = scheduler::detect_conflicts(&allocations);
            if conflicts.is_empty() {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", conflicts.len());
                if let Some(path) = report {
                    let mut w = csv::Writer::from_path(path)?;
                    w.write_record(["staff_id", "date", "child_a", "child_b", "kind"])?;
                    for c in &conflicts {
                        w.write_record([
                            c.staff.to_string(),
                            c.date.to_string(),
                            c.child_a.to_string(),
                            c.child_b.map(|id| id.to_string()).unwrap_or_default(),
                            match c.kind {
                                ConflictKind::Overlap => "overlap",
                                ConflictKind::Forced => "forced",
                            }
                            .to_string(),
                        ])?;
                    }
                    w.flush()?;
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::LogProgress { child, date, completed, engagement, notes } => {
            let id = find_child(&plan, child)?.id;
            let log = ProgressLog::new(id, date, completed, engagement, notes)
                .map_err(anyhow::Error::msg)?;
            plan.progress.push(log);
            storage.save(&plan)?;
            let stats = ProgressStats::from_logs(plan.progress_for(id));
            if let (Some(rate), Some(mean)) = (stats.completion_rate, stats.mean_engagement) {
                println!(
                    "{} log(s), {:.0}% completed, mean engagement {:.1}",
                    stats.logs,
                    rate * 100.0,
                    mean
                );
            }
            0
        }
        Commands::Summary { child, date } => {
            let profile = find_child(&plan, child)?;
            let logs: Vec<&ProgressLog> = plan
                .progress_for(profile.id)
                .into_iter()
                .filter(|l| l.date == date)
                .collect();
            let request = narrative::summary_request(profile, date, &logs);
            print_narrative(&cli.cache_dir, &request)?;
            0
        }
        Commands::Coach { child, date } => {
            let id = find_child(&plan, child)?.id;
            let logs = plan.progress_for(id);
            let last = logs.iter().rev().find(|l| l.date == date).copied();
            let context = narrative::session_context(date, last);
            print_narrative(&cli.cache_dir, &narrative::microcoach_request(context))?;
            0
        }
        Commands::Weekly { child, audience } => {
            let id = find_child(&plan, child)?.id;
            let logs = progress::recent_logs(&plan, id, progress::WEEKLY_LOG_WINDOW);
            let request = narrative::weekly_request(&logs, &audience);
            print_narrative(&cli.cache_dir, &request)?;
            0
        }
        Commands::Anonymize { child, out } => {
            let id = find_child(&plan, child)?.id;
            let logs = plan.progress_for(id);
            let anon = narrative::anonymize_logs(&logs);
            std::fs::write(&out, serde_json::to_string_pretty(&anon)?)
                .with_context(|| format!("writing {out}"))?;
            println!("{} log(s) anonymized to {out}", anon.len());
            0
        }
    };

    std::process::exit(code);
}

fn find_child(plan: &CarePlan, id: u32) -> Result<&ChildProfile> {
    Ok(plan.child(ChildId(id))?)
}

fn print_narrative(cache_dir: &str, request: &narrative::NarrativeRequest) -> Result<()> {
    let narrator = Narrator::new(OfflineBackend).with_cache(NarrativeCache::in_dir(cache_dir)?);
    let narrative = narrator.narrate(request, Utc::now());
    match &narrative.source {
        NarrativeSource::Fresh => {}
        NarrativeSource::Cached { stored_at } => {
            eprintln!("(offline, cached {})", stored_at.to_rfc3339())
        }
        NarrativeSource::Fallback { .. } => eprintln!("(offline fallback)"),
    }
    println!("{}", narrative.text);
    Ok(())
}
