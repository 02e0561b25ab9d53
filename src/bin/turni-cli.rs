#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::str::FromStr;
use turni::{
    io,
    model::StaffId,
    report::summarize,
    scheduler::{Planner, RunMode, RunOptions},
    storage::{JsonStorage, Storage},
    ShiftType, SlotKey, TimeSlot,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Seuil d'affichage du détail des cases non remplies.
const ERROR_DISPLAY_LIMIT: usize = 20;

/// CLI minimaliste de planification des gardes (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON d'état du planning
    #[arg(long, global = true, default_value = "turni.json")]
    state: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer l'effectif depuis un CSV
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Importer des indisponibilités depuis un CSV
    ImportUnavailability {
        #[arg(long)]
        csv: String,
    },

    /// Déclarer une indisponibilité
    Unavailable {
        /// Code court ou id du membre
        #[arg(long)]
        staff: String,
        /// Date ISO (AAAA-MM-JJ)
        #[arg(long)]
        date: String,
        /// Liste "mattina|pomeriggio|notte"
        #[arg(long)]
        periods: String,
    },

    /// Fermer un ambulatoire pour une date
    Close {
        #[arg(long)]
        date: String,
        #[arg(long)]
        shift_type: String,
    },

    /// Rouvrir un ambulatoire (lève aussi la fermeture week-end)
    Reopen {
        #[arg(long)]
        date: String,
        #[arg(long)]
        shift_type: String,
    },

    /// Assigner manuellement une case (les entorses sont signalées, pas bloquées)
    AssignSlot {
        #[arg(long)]
        date: String,
        #[arg(long)]
        shift_type: String,
        #[arg(long)]
        slot: String,
        #[arg(long)]
        staff: String,
    },

    /// Vider une case
    ClearSlot {
        #[arg(long)]
        date: String,
        #[arg(long)]
        shift_type: String,
        #[arg(long)]
        slot: String,
    },

    /// Lancer l'assignation automatique du mois
    Assign {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
        /// Vide d'abord les types sélectionnés (sinon : cases vides seulement)
        #[arg(long)]
        regenerate: bool,
        /// Sous-ensemble "PS,RAP,UTIC" ; absent = tous les types
        #[arg(long)]
        types: Option<String>,
        /// Graine du tirage (runs reproductibles)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Bilan du mois (compteurs + répartition par membre)
    Report {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },

    /// Exporter la grille du mois en CSV
    Export {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
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

    let storage = JsonStorage::open(&cli.state)?;
    // Fichier absent = premier lancement ; un fichier illisible, lui, doit
    // arrêter la commande avant qu'une sauvegarde ne l'écrase.
    let mut planner = if Path::new(&cli.state).exists() {
        Planner::with_state(storage.load()?)
    } else {
        Planner::new()
    };

    let code = match cli.cmd {
        Commands::ImportStaff { csv } => {
            let staff = io::import_staff_csv(csv)?;
            planner.state_mut().roster.staff.extend(staff);
            storage.save(planner.state())?;
            0
        }
        Commands::ImportUnavailability { csv } => {
            let entries = io::import_unavailability_csv(csv)?;
            for entry in entries {
                for period in entry.periods {
                    planner
                        .state_mut()
                        .unavailability
                        .mark(entry.staff.clone(), entry.date, period);
                }
            }
            storage.save(planner.state())?;
            0
        }
        Commands::Unavailable {
            staff,
            date,
            periods,
        } => {
            let id = resolve_staff(&planner, &staff)?;
            let date = parse_date(&date)?;
            for chunk in periods.split('|').filter(|c| !c.trim().is_empty()) {
                let period = chunk.parse().map_err(anyhow::Error::msg)?;
                planner
                    .state_mut()
                    .unavailability
                    .mark(id.clone(), date, period);
            }
            storage.save(planner.state())?;
            0
        }
        Commands::Close { date, shift_type } => {
            let date = parse_date(&date)?;
            let shift_type = parse_type(&shift_type)?;
            planner.close(date, shift_type);
            storage.save(planner.state())?;
            0
        }
        Commands::Reopen { date, shift_type } => {
            let date = parse_date(&date)?;
            let shift_type = parse_type(&shift_type)?;
            planner.reopen(date, shift_type);
            storage.save(planner.state())?;
            0
        }
        Commands::AssignSlot {
            date,
            shift_type,
            slot,
            staff,
        } => {
            let key = SlotKey::new(
                parse_date(&date)?,
                parse_type(&shift_type)?,
                parse_slot(&slot)?,
            );
            let id = resolve_staff(&planner, &staff)?;
            let violations = planner.assign_manual(key, &id)?;
            for violation in &violations {
                eprintln!("warning: {key}: {violation:?}");
            }
            storage.save(planner.state())?;
            0
        }
        Commands::ClearSlot {
            date,
            shift_type,
            slot,
        } => {
            let key = SlotKey::new(
                parse_date(&date)?,
                parse_type(&shift_type)?,
                parse_slot(&slot)?,
            );
            planner.clear_slot(&key);
            storage.save(planner.state())?;
            0
        }
        Commands::Assign {
            year,
            month,
            regenerate,
            types,
            seed,
        } => {
            let shift_types = match types {
                Some(list) => list
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(parse_type)
                    .collect::<Result<Vec<_>>>()?,
                None => ShiftType::ALL.to_vec(),
            };
            let options = RunOptions {
                mode: if regenerate {
                    RunMode::Regenerate
                } else {
                    RunMode::FillRemaining
                },
                shift_types,
            };
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let report = planner.run(year, month, &options, &mut rng)?;
            storage.save(planner.state())?;

            let state = planner.state();
            let summary = summarize(
                &state.schedule,
                &report.unassigned,
                &state.roster,
                report.assigned,
                year,
                month,
            );
            println!(
                "assigned: {} | unassigned: {} | success: {:.0}%",
                summary.assigned,
                summary.unassigned,
                summary.success_rate * 100.0
            );
            if report.unassigned.len() <= ERROR_DISPLAY_LIMIT {
                for slot in &report.unassigned {
                    eprintln!("{}: {}", slot.key, slot.reason.label());
                }
            } else {
                eprintln!(
                    "{} cases non assignées (personnel insuffisant)",
                    report.unassigned.len()
                );
            }
            // Code 2 = WARNING/INCOMPLETE
            if report.unassigned.is_empty() {
                0
            } else {
                2
            }
        }
        Commands::Report { year, month } => {
            validate_month(year, month)?;
            let state = planner.state();
            let summary = summarize(&state.schedule, &[], &state.roster, 0, year, month);
            for load in &summary.per_staff {
                println!("{:10} {}", load.code, load.shifts);
            }
            0
        }
        Commands::Export { year, month, out } => {
            validate_month(year, month)?;
            io::export_schedule_csv(out, planner.state(), year, month)?;
            0
        }
    };

    std::process::exit(code);
}

fn validate_month(year: i32, month: u32) -> Result<()> {
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        bail!("invalid month: {year}-{month}");
    }
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("invalid date: {raw}"))
}

fn parse_type(raw: &str) -> Result<ShiftType> {
    ShiftType::from_str(raw).map_err(anyhow::Error::msg)
}

fn parse_slot(raw: &str) -> Result<TimeSlot> {
    TimeSlot::from_str(raw).map_err(anyhow::Error::msg)
}

fn resolve_staff(planner: &Planner, raw: &str) -> Result<StaffId> {
    let roster = &planner.state().roster;
    if let Some(member) = roster.find_by_code(raw.trim()) {
        return Ok(member.id.clone());
    }
    let id = StaffId::new(raw.trim());
    if roster.find_by_id(&id).is_some() {
        return Ok(id);
    }
    bail!("unknown staff member: {raw}")
}
