//! `slots` CLI: inspect availability and book slots against a records snapshot.
//!
//! A snapshot is one owner's records as JSON:
//! `{"locations": [...], "areas": [...], "rules": [...], "bookings": [...]}`.
//!
//! ## Usage
//!
//! ```sh
//! # Bookable slots for a location on a date
//! slots list -i records.json --location L1 --date 2026-03-16
//!
//! # Same, as JSON, with 30-minute slots
//! slots list -i records.json --location L1 --date 2026-03-16 --duration 30 --json
//!
//! # Days of March 2026 with any availability rule
//! slots days -i records.json --month 3 --year 2026
//!
//! # Book a slot and write the updated snapshot
//! slots book -i records.json -o records.json --location L1 --date 2026-03-16 \
//!   --start 09:00 --end 10:00 --name "Sam Rivera" --email sam@example.com
//!
//! # Verbose engine logging goes to stderr
//! RUST_LOG=slot_engine=debug slots list -i records.json --location L1 --date 2026-03-16
//! ```

use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use slot_engine::interval::{format_date, parse_date};
use slot_engine::store::fetch_owner_records;
use slot_engine::{AvailabilityService, InMemoryStore, NewBooking, OwnerRecords, TimeSlot};
use tracing_subscriber::EnvFilter;

/// Snapshots hold a single owner, stored under this id in the in-memory store.
const SNAPSHOT_OWNER: &str = "snapshot";

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Appointment availability with travel buffers"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookable slots for a location on a date
    List {
        /// Records snapshot (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Location id
        #[arg(long)]
        location: String,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Slot length in minutes
        #[arg(long, default_value_t = slot_engine::DEFAULT_SLOT_MINUTES)]
        duration: u32,
        /// Print JSON instead of one slot per line
        #[arg(long)]
        json: bool,
    },
    /// List days of a month whose weekday has an availability rule
    Days {
        /// Records snapshot (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Month, 1-12
        #[arg(long)]
        month: u32,
        #[arg(long)]
        year: i32,
        /// Print JSON instead of one date per line
        #[arg(long)]
        json: bool,
    },
    /// Book a slot if it is still offered, then write the updated snapshot
    Book {
        /// Records snapshot (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Where to write the updated snapshot (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        location: String,
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Slot start, HH:MM
        #[arg(long)]
        start: String,
        /// Slot end, HH:MM
        #[arg(long)]
        end: String,
        /// Customer name
        #[arg(long)]
        name: String,
        /// Customer email
        #[arg(long)]
        email: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List {
            input,
            location,
            date,
            duration,
            json,
        } => {
            let service = load_service(input.as_deref())?;
            let date = parse_date(&date).context("Invalid --date")?;
            let slots = service
                .compute_available_slots(SNAPSHOT_OWNER, &location, date, Some(duration))
                .await
                .context("Failed to compute slots")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                for slot in &slots {
                    println!("{}-{}", slot.start_time, slot.end_time);
                }
            }
        }
        Commands::Days {
            input,
            month,
            year,
            json,
        } => {
            let service = load_service(input.as_deref())?;
            let days: Vec<String> = service
                .compute_available_days(SNAPSHOT_OWNER, month, year)
                .await
                .context("Failed to compute available days")?
                .into_iter()
                .map(format_date)
                .collect();

            if json {
                println!("{}", serde_json::to_string_pretty(&days)?);
            } else {
                for day in &days {
                    println!("{}", day);
                }
            }
        }
        Commands::Book {
            input,
            output,
            location,
            date,
            start,
            end,
            name,
            email,
        } => {
            let store = Arc::new(read_store(input.as_deref())?);
            let service = AvailabilityService::new(Arc::clone(&store));
            let date = parse_date(&date).context("Invalid --date")?;
            let slot = TimeSlot {
                start_time: start,
                end_time: end,
                is_available: true,
            };
            let customer = NewBooking {
                customer_name: name,
                customer_email: email,
            };

            let booked = service
                .book_slot(SNAPSHOT_OWNER, &location, date, &slot, customer)
                .await
                .context("Booking failed")?;
            eprintln!(
                "Booked {} {}-{} at {} ({})",
                booked.date, booked.start_time, booked.end_time, booked.location_id, booked.id
            );

            let records = fetch_owner_records(store.as_ref(), SNAPSHOT_OWNER)
                .await
                .context("Failed to read back records")?;
            write_output(output.as_deref(), &serde_json::to_string_pretty(&records)?)?;
        }
    }

    Ok(())
}

fn load_service(path: Option<&str>) -> Result<AvailabilityService<InMemoryStore>> {
    let store = read_store(path)?;
    Ok(AvailabilityService::new(Arc::new(store)))
}

fn read_store(path: Option<&str>) -> Result<InMemoryStore> {
    let json = read_input(path)?;
    let records: OwnerRecords =
        serde_json::from_str(&json).context("Failed to parse records snapshot")?;
    tracing::debug!(
        locations = records.locations.len(),
        rules = records.rules.len(),
        bookings = records.bookings.len(),
        "loaded records snapshot"
    );
    let store = InMemoryStore::new();
    store.load(SNAPSHOT_OWNER, records);
    Ok(store)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
