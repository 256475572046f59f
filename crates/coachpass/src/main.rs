//! `coachpass` - CLI for offline flight checks and coach assignments.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Result;
use clap::Parser;

use coachpass::cli::{
    AssignCommand, CheckCommand, Cli, Command, ConfigCommand, LoadCommand, OutputFormat,
    RecordsCommand, ScanCommand, StatusCommand,
};
use coachpass::lookup::{lookup, LookupOutcome};
use coachpass::qr;
use coachpass::record::AssignmentRecord;
use coachpass::reference::{ingest, ReferenceStore};
use coachpass::scan::{ImageFrameSource, ScanSession};
use coachpass::store::RecordStore;
use coachpass::{init_logging, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    let config = Config::load_from(cli.config.clone())?;

    match cli.command {
        Command::Load(cmd) => handle_load(&config, &cmd),
        Command::Check(cmd) => handle_check(&config, &cmd),
        Command::Assign(cmd) => handle_assign(&config, &cmd),
        Command::Records(cmd) => handle_records(&config, &cmd),
        Command::Scan(cmd) => handle_scan(&cmd),
        Command::Status(cmd) => handle_status(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn handle_load(config: &Config, cmd: &LoadCommand) -> Result<()> {
    let (table, summary) = ingest::load_reference_file(&cmd.file)?;

    let store = ReferenceStore::new(config.reference_table_path());
    store.replace(&table)?;

    println!("{} flights loaded from {}", table.len(), cmd.file.display());
    if summary.partial_rows > 0 {
        println!(
            "Warning: {} of {} rows were missing required columns",
            summary.partial_rows, summary.total_rows
        );
    }
    println!("Reference table saved to {}", store.path().display());
    Ok(())
}

fn handle_check(config: &Config, cmd: &CheckCommand) -> Result<()> {
    let table = ReferenceStore::new(config.reference_table_path()).load()?;

    match lookup(&table, &cmd.flight_number) {
        LookupOutcome::Found(flight) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&flight)?);
            } else {
                println!("Flight Number: {}", flight.flight_number);
                println!("Type:          {}", flight.flight_type);
                println!("Flight Name:   {}", flight.flight_name);
            }
        }
        LookupOutcome::NotFound => {
            println!(
                "Flight '{}' not found. Please check the flight number.",
                cmd.flight_number
            );
        }
        LookupOutcome::NoDataLoaded => {
            println!("No flight data available. Load a reference file with 'coachpass load'.");
        }
    }
    Ok(())
}

fn handle_assign(config: &Config, cmd: &AssignCommand) -> Result<()> {
    let table = ReferenceStore::new(config.reference_table_path()).load()?;

    let flight = match lookup(&table, &cmd.flight_number) {
        LookupOutcome::Found(flight) => flight,
        LookupOutcome::NotFound => {
            println!(
                "Flight '{}' not found; nothing recorded.",
                cmd.flight_number
            );
            return Ok(());
        }
        LookupOutcome::NoDataLoaded => {
            println!("No flight data available. Load a reference file with 'coachpass load'.");
            return Ok(());
        }
    };

    let store = RecordStore::open(config.database_path())?;
    let mut record = AssignmentRecord::new(&flight, cmd.coach.clone());
    let id = store.insert(&record)?;
    record.id = Some(id);

    let output = cmd.output.clone().unwrap_or_else(|| {
        std::path::PathBuf::from(format!("{}-{}.png", flight.flight_number, cmd.coach))
    });
    qr::encode_to_file(&record.payload(), &output, &config.qr)?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("Saved assignment #{id}");
        println!("  Flight: {} ({})", record.flight_number, record.flight_type);
        println!("  Coach:  {}", record.coach_number);
    }
    println!("QR code written to {}", output.display());
    Ok(())
}

fn handle_records(config: &Config, cmd: &RecordsCommand) -> Result<()> {
    let store = RecordStore::open(config.database_path())?;
    let records = store.list_all()?;

    match cmd.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No assignment records.");
                return Ok(());
            }
            println!(
                "{:>5}  {:<10} {:<24} {:<24} {:<10} {}",
                "id", "flight", "type", "name", "coach", "created"
            );
            for record in &records {
                println!(
                    "{:>5}  {:<10} {:<24} {:<24} {:<10} {}",
                    record.id.unwrap_or_default(),
                    record.flight_number,
                    record.flight_type,
                    record.flight_name,
                    record.coach_number,
                    record.created_at.format("%Y-%m-%d %H:%M:%S"),
                );
            }
        }
    }
    Ok(())
}

fn handle_scan(cmd: &ScanCommand) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    let outcome = runtime.block_on(async {
        let source = ImageFrameSource::new(cmd.frames.clone())?;
        let mut session = ScanSession::new(source);
        session
            .run(async {
                let _ = tokio::signal::ctrl_c().await;
            })
            .await
    })?;

    match outcome {
        Some(payload) => {
            if cmd.json {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("Flight Number: {}", payload.flight_number);
                println!("Flight Name:   {}", payload.flight_name);
                println!("Type:          {}", payload.flight_type);
                println!("Coach Number:  {}", payload.coach_number);
                println!("Recorded At:   {}", payload.timestamp);
            }
        }
        None => println!("No assignment code decoded."),
    }
    Ok(())
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> Result<()> {
    let store = RecordStore::open(config.database_path())?;
    let stats = store.stats()?;
    let table = ReferenceStore::new(config.reference_table_path()).load()?;

    if cmd.json {
        let status = serde_json::json!({
            "database_path": store.path(),
            "total_records": stats.total_records,
            "newest_record": stats.newest_record,
            "db_size_bytes": stats.db_size_bytes,
            "reference_table_path": config.reference_table_path(),
            "reference_entries": table.len(),
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("coachpass status");
        println!("----------------");
        println!("Database:          {}", store.path().display());
        println!("Records:           {}", stats.total_records);
        if let Some(newest) = stats.newest_record {
            println!("Newest record:     {}", newest.format("%Y-%m-%d %H:%M:%S"));
        }
        println!("Database size:     {} bytes", stats.db_size_bytes);
        println!(
            "Reference table:   {}",
            config.reference_table_path().display()
        );
        println!("Reference entries: {}", table.len());
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:   {}", config.database_path().display());
                println!();
                println!("[Reference]");
                println!(
                    "  Table path:      {}",
                    config.reference_table_path().display()
                );
                println!();
                println!("[QR]");
                println!("  Module size:     {}", config.qr.module_size);
                println!("  Quiet zone:      {}", config.qr.quiet_zone);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
