use anyhow::Result;
use clap::{Parser, Subcommand};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing_subscriber::EnvFilter;

use adapters::ScraperConfig;
use adapters::shape::{RawEvent, assemble_event};
use ingest_core::schema::{EventIngestionModel, Person};
use ingest_core::viable::ViabilityCache;
use ingest_core::{NameMatcher, extract_event_persons, reconcile_roster, reduce};
use report::{ReportContext, write_roster_report};

#[derive(Parser)]
#[command(name = "munigest")]
#[command(about = "Municipal meeting ingestion CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export canonical JSON Schemas for the ingestion model
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
    /// Shape raw scraped events and apply the minimum viable ingestion filter
    Events {
        #[command(subcommand)]
        command: EventCommands,
    },
    /// Compare scraped persons against the known roster
    Roster {
        #[command(subcommand)]
        command: RosterCommands,
    },
}

#[derive(Subcommand)]
enum SchemaCommands {
    /// Export JSON Schema files for canonical types
    Export {
        /// Output directory (default: ./schemas)
        #[arg(long, default_value = "schemas")]
        out_dir: PathBuf,
    },
}

#[derive(Subcommand)]
enum EventCommands {
    /// Normalize a raw events JSON file, dropping non-viable records
    Check {
        /// JSON array of raw events
        #[arg(long)]
        input: PathBuf,
        /// Scraper configuration directory (built-in defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Write the normalized events here instead of only counting
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum RosterCommands {
    /// Diff persons observed in normalized events against the known roster
    Diff {
        /// JSON array of normalized events
        #[arg(long)]
        events: PathBuf,
        /// JSON array of known persons
        #[arg(long)]
        known: PathBuf,
        /// Scraper configuration directory (built-in defaults when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Also write a markdown review note into this directory
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schema { command } => match command {
            SchemaCommands::Export { out_dir } => schema_export(out_dir),
        },
        Commands::Events { command } => match command {
            EventCommands::Check { input, config, out } => events_check(input, config, out),
        },
        Commands::Roster { command } => match command {
            RosterCommands::Diff {
                events,
                known,
                config,
                report_dir,
            } => roster_diff(events, known, config, report_dir),
        },
    }
}

fn schema_export(out_dir: PathBuf) -> Result<()> {
    fs::create_dir_all(&out_dir)?;

    let event_schema = schema_for!(ingest_core::schema::EventIngestionModel);
    let event_json = serde_json::to_string_pretty(&event_schema)?;
    fs::write(out_dir.join("EventIngestionModel.schema.json"), event_json)?;

    let person_schema = schema_for!(ingest_core::schema::Person);
    let person_json = serde_json::to_string_pretty(&person_schema)?;
    fs::write(out_dir.join("Person.schema.json"), person_json)?;

    let session_schema = schema_for!(ingest_core::schema::Session);
    let session_json = serde_json::to_string_pretty(&session_schema)?;
    fs::write(out_dir.join("Session.schema.json"), session_json)?;

    let matter_schema = schema_for!(ingest_core::schema::Matter);
    let matter_json = serde_json::to_string_pretty(&matter_schema)?;
    fs::write(out_dir.join("Matter.schema.json"), matter_json)?;

    println!("Exported schemas to {}", out_dir.display());
    Ok(())
}

fn load_config(config: Option<&Path>) -> Result<ScraperConfig> {
    match config {
        Some(dir) => ScraperConfig::load_from_dir(dir),
        None => Ok(ScraperConfig::default()),
    }
}

fn events_check(input: PathBuf, config: Option<PathBuf>, out: Option<PathBuf>) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let cache = ViabilityCache::new();

    let raw_text = fs::read_to_string(&input)?;
    let raw_events: Vec<RawEvent> = serde_json::from_str(&raw_text)?;
    let total = raw_events.len();

    let mut shaped: Vec<Option<EventIngestionModel>> = Vec::with_capacity(total);
    for raw in raw_events {
        shaped.push(assemble_event(raw, &config, &cache)?);
    }
    let kept = reduce(shaped, false).unwrap_or_default();

    println!("{} raw event(s): {} kept, {} dropped", total, kept.len(), total - kept.len());

    if let Some(out) = out {
        let json = if config.config.output.pretty_json {
            serde_json::to_string_pretty(&kept)?
        } else {
            serde_json::to_string(&kept)?
        };
        fs::write(&out, json)?;
        println!("Wrote normalized events to {}", out.display());
    }
    Ok(())
}

fn roster_diff(
    events: PathBuf,
    known: PathBuf,
    config: Option<PathBuf>,
    report_dir: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_deref())?;

    let events_text = fs::read_to_string(&events)?;
    let events: Vec<EventIngestionModel> = serde_json::from_str(&events_text)?;
    let known_text = fs::read_to_string(&known)?;
    let known: Vec<Person> = serde_json::from_str(&known_text)?;

    let scraped = extract_event_persons(&events);
    let matcher = NameMatcher::with_builtin_table()
        .with_threshold(config.config.matching.fuzzy_threshold);
    let now = OffsetDateTime::now_utc();
    let diff = reconcile_roster(
        &scraped,
        &known,
        &config.primary_bodies,
        now.date(),
        &matcher,
    );

    if diff.old_names.is_empty() && diff.new_names.is_empty() {
        println!("Roster is in sync: {} known, {} observed", known.len(), scraped.len());
    } else {
        for name in &diff.old_names {
            println!("departed: {name}");
        }
        for name in &diff.new_names {
            println!("new: {name}");
        }
    }

    if let Some(report_dir) = report_dir {
        let context = ReportContext {
            known_count: known.len(),
            scraped_count: scraped.len(),
        };
        let path = write_roster_report(&diff, context, now, &report_dir)?;
        println!("Wrote review note to {}", path.display());
    }
    Ok(())
}
