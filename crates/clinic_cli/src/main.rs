//! Terminal agenda over the clinic database.
//!
//! # Responsibility
//! - Wire configuration, logging, the SQLite record store and the entity
//!   stores the same way a UI host would.
//! - Print a calendar projection or dashboard figures for one date.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clinic_core::calendar::date::today;
use clinic_core::calendar::labels::{
    appointment_line, header_title, month_grid_rows, view_label, EMPTY_DAY_MESSAGE,
    EMPTY_DAY_TITLE,
};
use clinic_core::calendar::{parse_calendar_date, CalendarState, CalendarView, DayCell};
use clinic_core::{
    compute_dashboard_stats, core_version, init_logging_from_config, ClinicConfig, ClinicStores,
    SqliteRecordStore,
};
use log::warn;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "clinic_cli", version, about = "Clinic agenda and dashboard figures")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the core library version
    Version,

    /// Print the agenda for one day, week or month
    Agenda {
        #[arg(value_enum)]
        view: ViewArg,

        /// Cursor date (YYYY-MM-DD); defaults to today
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },

    /// Print dashboard figures relative to a date
    Stats {
        /// Reference date (YYYY-MM-DD); defaults to today
        #[arg(value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ViewArg {
    Day,
    Week,
    Month,
}

impl From<ViewArg> for CalendarView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Day => CalendarView::Day,
            ViewArg::Week => CalendarView::Week,
            ViewArg::Month => CalendarView::Month,
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    parse_calendar_date(value).map_err(|err| err.to_string())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands) -> Result<(), String> {
    match command {
        Commands::Version => {
            println!("clinic_core version={}", core_version());
            Ok(())
        }
        Commands::Agenda { view, date } => {
            let config = load_config()?;
            let mut state = CalendarState::new(date.unwrap_or_else(today));
            state.set_view(view.into());
            let stores = open_stores(&config).await?;
            print_agenda(&stores, &state);
            Ok(())
        }
        Commands::Stats { date } => {
            let config = load_config()?;
            let stores = open_stores(&config).await?;
            let stats = compute_dashboard_stats(
                &stores.appointments.collection(),
                &stores.patients.collection(),
                &stores.psychologists.collection(),
                date.unwrap_or_else(today),
            );
            println!("total={}", stats.total_appointments);
            println!("completed={}", stats.completed_appointments);
            println!("cancelled={}", stats.cancelled_appointments);
            println!("upcoming={}", stats.upcoming_appointments);
            println!("revenue={:.2}", stats.total_revenue);
            println!("active_patients={}", stats.active_patients);
            println!("active_psychologists={}", stats.active_psychologists);
            Ok(())
        }
    }
}

/// Resolves configuration and starts logging; logging failures only warn.
fn load_config() -> Result<ClinicConfig, String> {
    let config = ClinicConfig::from_env().map_err(|err| err.to_string())?;
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }
    Ok(config)
}

async fn open_stores(config: &ClinicConfig) -> Result<ClinicStores, String> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| {
            format!("failed to create `{}`: {err}", parent.display())
        })?;
    }
    let remote = SqliteRecordStore::open(&config.database_path).map_err(|err| err.to_string())?;
    let stores = ClinicStores::new(Arc::new(remote));

    let outcomes = stores.fetch_calendar_data().await;
    if outcomes.iter().any(|outcome| outcome.is_failed()) {
        let errors = [
            stores.appointments.error(),
            stores.patients.error(),
            stores.psychologists.error(),
        ];
        for error in errors.into_iter().flatten() {
            warn!("event=cli_fetch module=cli status=error error={error}");
            eprintln!("fetch failed: {error}");
        }
    }
    Ok(stores)
}

fn print_agenda(stores: &ClinicStores, state: &CalendarState) {
    let appointments = stores.appointments.collection();
    let patients = stores.patients.collection();
    let psychologists = stores.psychologists.collection();
    let projection = state.project(&appointments, &patients, &psychologists);

    println!(
        "{} [{}]",
        header_title(state.current_date, state.active_view),
        view_label(state.active_view)
    );

    match &projection.grid {
        Some(cells) => {
            let days: Vec<DayCell> = cells.iter().map(|cell| cell.day).collect();
            for row in month_grid_rows(&days) {
                println!("{row}");
            }
            for cell in cells.iter().filter(|cell| !cell.appointments.is_empty()) {
                println!();
                println!("{}", cell.day.date.format("%d"));
                for details in &cell.appointments {
                    println!("    {}", appointment_line(details));
                }
            }
        }
        None if projection.visible.is_empty() => {
            println!("{EMPTY_DAY_TITLE}");
            println!("{EMPTY_DAY_MESSAGE}");
        }
        None => {
            for details in &projection.visible {
                println!(
                    "{}-{}  {}  ({})",
                    details.appointment.start_time,
                    details.appointment.end_time,
                    details.patient.display_name(),
                    details.psychologist.display_name()
                );
            }
        }
    }
}
