#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use escala::{
    generate, hhmm, io,
    holidays::{sync_holidays, HolidayResolver, HolidaySource, JsonFileSource},
    model::Roster,
    rules::{default_rules, load_rules_from_file},
    scheduler::{GenerateError, GenerationRequest, Schedule},
    storage::{JsonHolidayStore, JsonStorage, Storage},
};
use std::path::Path;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération d'escala mensuelle (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du roster (collaborateurs + règles)
    #[arg(long, global = true, default_value = "roster.json")]
    roster: String,

    /// Fichier JSON des fériés synchronisés
    #[arg(long, global = true, default_value = "holidays.json")]
    holidays: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des collaborateurs depuis un CSV
    ImportEmployees {
        #[arg(long)]
        csv: String,
    },

    /// Remplacer les règles par celles d'un fichier JSON
    ImportRules {
        #[arg(long)]
        json: String,
    },

    /// Synchroniser les fériés d'une année
    SyncHolidays {
        #[arg(long)]
        year: i32,
        /// Sources nationales classées (JSON, `{year}` remplacé)
        #[arg(long, num_args = 1..)]
        national: Vec<String>,
        /// Source régionale (JSON, `{year}` remplacé)
        #[arg(long)]
        state: Option<String>,
    },

    /// Générer l'escala d'un mois
    Generate {
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        /// Escala JSON du mois précédent (reprise de la rotation du dimanche)
        #[arg(long)]
        carry_over: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Lister les fériés synchronisés d'une année
    ListHolidays {
        #[arg(long)]
        year: i32,
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

    let storage = JsonStorage::open(&cli.roster)?;
    // roster absent : premier lancement ; illisible ou corrompu : erreur
    let mut roster = if Path::new(&cli.roster).exists() {
        storage.load()?
    } else {
        Roster {
            employees: Vec::new(),
            rules: default_rules(),
        }
    };

    let code = match cli.cmd {
        Commands::ImportEmployees { csv } => {
            let employees = io::import_employees_csv(csv)?;
            println!("imported {} employee(s)", employees.len());
            roster.employees.extend(employees);
            storage.save(&roster)?;
            0
        }
        Commands::ImportRules { json } => {
            roster.rules = load_rules_from_file(json)?;
            println!("loaded {} rule(s)", roster.rules.len());
            storage.save(&roster)?;
            0
        }
        Commands::SyncHolidays {
            year,
            national,
            state,
        } => {
            let national: Vec<Box<dyn HolidaySource>> = national
                .iter()
                .map(|path| {
                    Box::new(JsonFileSource::new(path.as_str(), path.as_str()))
                        as Box<dyn HolidaySource>
                })
                .collect();
            let state = state.map(|path| {
                Box::new(JsonFileSource::new(path.as_str(), path.as_str())) as Box<dyn HolidaySource>
            });
            let resolver = HolidayResolver::new(national, state);
            let mut store = JsonHolidayStore::open(&cli.holidays)?;
            let report = sync_holidays(&resolver, &mut store, year)?;
            println!(
                "{}: removed {}, inserted {}",
                report.year, report.removed, report.inserted
            );
            if report.errors.is_empty() {
                0
            } else {
                for err in &report.errors {
                    eprintln!("{err}");
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Generate {
            month,
            year,
            carry_over,
            out_json,
            out_csv,
        } => {
            let store = JsonHolidayStore::open(&cli.holidays)?;
            let mut holidays = store.for_year(year);
            if holidays.is_empty() {
                holidays = HolidayResolver::offline().resolve(year);
            }
            let carry = match carry_over {
                Some(path) => {
                    let data = std::fs::read(&path).with_context(|| format!("reading {path}"))?;
                    let previous: Schedule = serde_json::from_slice(&data)
                        .with_context(|| format!("parsing schedule {path}"))?;
                    previous.rotation
                }
                None => Vec::new(),
            };
            let request =
                GenerationRequest::new(month, year, &roster.employees, &holidays, &roster.rules)
                    .with_carry_over(&carry);
            match generate(&request) {
                Ok(schedule) => {
                    if let Some(path) = out_json {
                        io::export_schedule_json(path, &schedule)?;
                    }
                    if let Some(path) = out_csv {
                        io::export_schedule_csv(path, &schedule)?;
                    }
                    for a in &schedule.assignments {
                        let lunch = match (a.lunch_start, a.lunch_end) {
                            (Some(s), Some(e)) => format!(
                                " | lunch {}-{}",
                                hhmm::format_time(s),
                                hhmm::format_time(e)
                            ),
                            _ => String::new(),
                        };
                        println!(
                            "{} | {} | {} | {}-{}{}",
                            a.date,
                            a.shift_type.as_str(),
                            a.employee_name,
                            hhmm::format_time(a.start),
                            hhmm::format_time(a.end),
                            lunch
                        );
                    }
                    0
                }
                Err(GenerateError::Infeasible(report)) => {
                    eprintln!("{report}");
                    2
                }
                Err(err) => return Err(err.into()),
            }
        }
        Commands::ListHolidays { year } => {
            let store = JsonHolidayStore::open(&cli.holidays)?;
            for h in store.for_year(year) {
                println!(
                    "{} | {} | {:?} | {:?}",
                    h.date, h.name, h.scope, h.obligation
                );
            }
            0
        }
    };

    std::process::exit(code);
}
