use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{error, info};

use kader_roster::config::Config;
use kader_roster::constants::{SEMUA, STATUS_BELUM, STATUS_SELESAI};
use kader_roster::pipeline::export;
use kader_roster::{DataSource, FilterCriteria, RosterError, RosterSession, UnitSelector};

#[derive(Parser)]
#[command(name = "kader-roster")]
#[command(about = "Roster query engine for HMI Ciputat cadre data")]
#[command(version = "0.1.0")]
struct Cli {
    /// Alternate CSV data source (defaults to the bundled dataset)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, validate, filter and summarize the roster
    Report {
        #[command(flatten)]
        filters: FilterArgs,
        /// Print the summary as JSON instead of tables
        #[arg(long)]
        json: bool,
        /// Also write the filtered rows to this CSV file
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Run load/normalize/validate only and report every violation
    Validate,
    /// Write the filtered rows as a row-numbered CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Output file (defaults to the configured export file name)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(clap::Args)]
struct FilterArgs {
    /// Komisariat to keep, or "Semua" for all units
    #[arg(long, default_value = SEMUA)]
    komisariat: String,
    /// Cohort years to keep (comma-separated; default: all observed)
    #[arg(long)]
    tahun: Option<String>,
    /// Campuses to keep (comma-separated; default: all observed, or the
    /// unit's permitted campuses when a komisariat is selected)
    #[arg(long)]
    kampus: Option<String>,
    /// LK statuses to keep (comma-separated Selesai/Belum; default: both)
    #[arg(long)]
    status: Option<String>,
    /// Free-text search over name and NIK
    #[arg(long, default_value = "")]
    cari: String,
}

fn split_csv_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn build_criteria(
    session: &RosterSession,
    args: &FilterArgs,
) -> Result<FilterCriteria, RosterError> {
    let records = session
        .records()
        .expect("criteria are built after a successful refresh");
    let mut criteria = FilterCriteria::all_of(records);

    criteria.komisariat = UnitSelector::parse(&args.komisariat);

    if let Some(tahun) = &args.tahun {
        let mut years = BTreeSet::new();
        for token in split_csv_list(tahun) {
            let year = token.parse::<i32>().map_err(|_| {
                RosterError::Config(format!("invalid --tahun value '{}': not a year", token))
            })?;
            years.insert(year);
        }
        criteria.tahun = years;
    }

    if let Some(kampus) = &args.kampus {
        criteria.kampus = split_csv_list(kampus).map(|k| k.to_string()).collect();
    } else if let UnitSelector::One(unit) = &criteria.komisariat {
        // Limit campus choices to the unit's permitted set, as the
        // dashboard sidebar does when a specific komisariat is selected
        if let Some(permitted) = session.mapping().permitted(unit) {
            criteria.kampus = permitted.iter().cloned().collect();
        }
    }

    if let Some(status) = &args.status {
        criteria.status = split_csv_list(status).map(|s| s.to_string()).collect();
    } else {
        criteria.status = [STATUS_SELESAI, STATUS_BELUM]
            .iter()
            .map(|s| s.to_string())
            .collect();
    }

    criteria.search = args.cari.clone();
    Ok(criteria)
}

fn report_failure(err: &RosterError) {
    match err {
        RosterError::Schema { missing } => {
            println!("❌ CSV is missing required columns:");
            for col in missing {
                println!("   - {}", col);
            }
            println!("   Fix the file and load it again.");
        }
        RosterError::UnknownLabels { labels } => {
            println!("❌ Unrecognized komisariat labels:");
            for label in labels {
                println!("   - {}", label);
            }
            println!("   Fix the file and load it again.");
        }
        RosterError::CampusMismatch { violations } => {
            println!("❌ Rows with a campus outside their komisariat mapping:");
            println!("   {:<4} {:<20} {:<15} {}", "No", "Asal Komisariat", "Kampus (file)", "Kampus (expected)");
            for (no, v) in violations.iter().enumerate() {
                println!(
                    "   {:<4} {:<20} {:<15} {}",
                    no + 1,
                    v.komisariat,
                    v.found,
                    v.expected
                );
            }
            println!("   Fix the Kampus values to match the komisariat mapping, then load again.");
        }
        other => {
            println!("❌ {}", other);
        }
    }
}

fn print_summary(summary: &kader_roster::pipeline::query::Summary) {
    println!("\n📊 Ringkasan:");
    println!("   Total kader: {}", summary.total);
    match summary.top_tahun {
        Some(tahun) => println!("   Tahun terbanyak: {}", tahun),
        None => println!("   Tahun terbanyak: -"),
    }
    match &summary.top_komisariat {
        Some(unit) => println!("   Komisariat terbanyak: {}", unit),
        None => println!("   Komisariat terbanyak: -"),
    }
    println!(
        "   LK 1/2/3 selesai: {}% / {}% / {}%",
        summary.completion_pct[0], summary.completion_pct[1], summary.completion_pct[2]
    );

    println!("\n   Ringkasan LK:");
    println!("   {:<4} {:<6} {:<8} {}", "No", "LK", "Selesai", "Belum");
    for (no, stage) in summary.stages.iter().enumerate() {
        println!(
            "   {:<4} {:<6} {:<8} {}",
            no + 1,
            stage.stage,
            stage.selesai,
            stage.belum
        );
    }

    println!("\n   Kader per tahun:");
    for (tahun, count) in &summary.tahun_counts {
        println!("   {:<6} {}", tahun, count);
    }
    println!("\n   Kader per komisariat:");
    for (unit, count) in &summary.komisariat_counts {
        println!("   {:<20} {}", unit, count);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    kader_roster::logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load_or_default();

    let source = match &cli.data {
        Some(path) => DataSource::path(path.clone()),
        None => DataSource::path(&config.dataset.path),
    };

    let mut session = RosterSession::new();

    match cli.command {
        Commands::Validate => {
            println!("🔎 Validating {}...", source.reference());
            match session.refresh(&source) {
                Ok(()) => {
                    let rows = session.records().map(|r| r.len()).unwrap_or(0);
                    println!("✅ {} rows valid ({} komisariat known)", rows, session.mapping().len());
                }
                Err(e) => {
                    error!("validation failed: {}", e);
                    report_failure(&e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Report { filters, json, export: export_path } => {
            if let Err(e) = session.refresh(&source) {
                error!("pipeline failed: {}", e);
                report_failure(&e);
                std::process::exit(1);
            }
            let criteria = build_criteria(&session, &filters)?;
            let (view, summary) = session.query(&criteria);
            info!(rows = view.len(), "query complete");

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("📋 Tabel data ({} baris):", view.len());
                println!(
                    "   {:<4} {:<12} {:<24} {:<20} {:<6} {:<16} {:<8} {:<8} {}",
                    "No", "NIK", "Nama", "Asal Komisariat", "Tahun", "Kampus", "LK 1", "LK 2", "LK 3"
                );
                for (no, m) in view.iter().enumerate() {
                    println!(
                        "   {:<4} {:<12} {:<24} {:<20} {:<6} {:<16} {:<8} {:<8} {}",
                        no + 1,
                        m.nik,
                        m.nama,
                        m.komisariat,
                        m.tahun,
                        m.kampus,
                        m.lk[0],
                        m.lk[1],
                        m.lk[2]
                    );
                }
                print_summary(&summary);
            }

            if let Some(path) = export_path {
                export::write_csv(&view, &path)?;
                println!("\n💾 Export written to {}", path.display());
            }
        }
        Commands::Export { filters, output } => {
            if let Err(e) = session.refresh(&source) {
                error!("pipeline failed: {}", e);
                report_failure(&e);
                std::process::exit(1);
            }
            let criteria = build_criteria(&session, &filters)?;
            let (view, _) = session.query(&criteria);

            let path = output.unwrap_or_else(|| PathBuf::from(&config.export.file_name));
            export::write_csv(&view, &path)?;
            println!("💾 {} rows written to {}", view.len(), path.display());
        }
    }
    Ok(())
}
