//! `stay` CLI — check availability and manage booking requests from the command line.
//!
//! Bookings and apartments live in a JSON data file; every command loads it,
//! and commands that change something write it back.
//!
//! ## Usage
//!
//! ```sh
//! # Register an apartment
//! stay --data bookings.json add-apartment --id loft --name "Sea View Loft" --price 12000 --max-guests 4
//!
//! # Days a date picker must disable
//! stay --data bookings.json blocked --apartment loft
//!
//! # Would these dates clash?
//! stay --data bookings.json check --apartment loft --start 2026-03-01 --end 2026-03-05
//!
//! # Submit a request, then confirm it
//! stay --data bookings.json request --apartment loft --name Ana --email ana@example.com \
//!     --phone 555-0100 --start 2026-03-01 --end 2026-03-05 --guests 2
//! stay --data bookings.json confirm bk-000001
//!
//! # Admin calendar across every apartment, and who is in on one day
//! stay --data bookings.json calendar --month 2026-03
//! stay --data bookings.json day 2026-03-02
//!
//! # Allow same-day turnover via a policy file
//! stay --config policy.toml --data bookings.json check --apartment loft --start 2026-03-05 --end 2026-03-08
//! ```

mod config;
mod logging;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use stay_engine::{
    Apartment, ApartmentId, BookingId, BookingRequest, BookingService, BookingStatus, DateRange,
    GuestInfo,
};

#[derive(Parser)]
#[command(name = "stay", version, about = "Short-stay booking availability CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON data file holding apartments and bookings
    #[arg(long, global = true, default_value = "bookings.json")]
    data: PathBuf,

    /// TOML file with the availability policy
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register or replace an apartment
    AddApartment {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// Nightly price in minor currency units
        #[arg(long)]
        price: u64,
        #[arg(long)]
        max_guests: u32,
        #[arg(long, default_value = "")]
        location: String,
    },
    /// Print the blocked dates of an apartment, one per line
    Blocked {
        #[arg(long)]
        apartment: String,
    },
    /// Check whether a date range is available
    Check {
        #[arg(long)]
        apartment: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
    /// Submit a booking request (stored as pending)
    Request {
        #[arg(long)]
        apartment: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value_t = 1)]
        guests: u32,
        /// Reference date for rejecting past stays (defaults to the local date)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Confirm a pending booking
    Confirm { id: String },
    /// Cancel a pending or confirmed booking
    Cancel { id: String },
    /// List all bookings, newest first
    List,
    /// Show a month of occupancy for one apartment, or for all of them
    Calendar {
        #[arg(long)]
        apartment: Option<String>,
        /// Month as YYYY-MM
        #[arg(long)]
        month: String,
    },
    /// List the bookings covering a date across all apartments
    Day { date: NaiveDate },
    /// Price a stay
    Quote {
        #[arg(long)]
        apartment: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value_t = 1)]
        guests: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let policy = config::load_policy(cli.config.as_deref())?;
    let store = config::load_store(&cli.data, policy)?;
    let mut service = BookingService::new(store, policy);

    let changed = match cli.command {
        Commands::AddApartment {
            id,
            name,
            price,
            max_guests,
            location,
        } => {
            let mut store = service.into_store();
            store.add_apartment(Apartment {
                id: ApartmentId(id.clone()),
                name,
                description: String::new(),
                location,
                price_per_night: price,
                max_guests,
                amenities: Vec::new(),
                images: Vec::new(),
            });
            println!("{}", id);
            service = BookingService::new(store, policy);
            true
        }
        Commands::Blocked { apartment } => {
            let blocked = engine(service.blocked_dates(&ApartmentId(apartment)))?;
            for day in blocked {
                println!("{}", day);
            }
            false
        }
        Commands::Check {
            apartment,
            start,
            end,
        } => {
            let range = engine(DateRange::new(start, end))?;
            let conflicts = engine(service.check_availability(&ApartmentId(apartment), &range))?;
            if conflicts.is_empty() {
                println!("available");
            } else {
                println!("conflict");
                for c in conflicts {
                    println!(
                        "  {} {} ({} day(s) overlap)",
                        c.booking.id, c.booking.range, c.overlap_days
                    );
                }
            }
            false
        }
        Commands::Request {
            apartment,
            name,
            email,
            phone,
            start,
            end,
            guests,
            today,
        } => {
            let guest = engine(GuestInfo::new(name, email, phone))?;
            let request = engine(BookingRequest::new(
                ApartmentId(apartment),
                guest,
                start,
                end,
                guests,
            ))?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            service = service.with_today(today);
            let id = engine(service.create_booking_request(&request))?;
            println!("{}", id);
            true
        }
        Commands::Confirm { id } => {
            engine(service.confirm(&BookingId(id.clone())))?;
            println!("{} confirmed", id);
            true
        }
        Commands::Cancel { id } => {
            engine(service.cancel(&BookingId(id.clone())))?;
            println!("{} cancelled", id);
            true
        }
        Commands::List => {
            for b in engine(service.list_bookings())? {
                let actions: Vec<&str> = b
                    .status
                    .allowed_transitions()
                    .iter()
                    .map(|s| action_name(*s))
                    .collect();
                println!(
                    "{}\t{}\t{}\t{}\t{}\t{}",
                    b.id,
                    b.apartment_id,
                    b.guest.name,
                    b.range,
                    b.status,
                    actions.join(",")
                );
            }
            false
        }
        Commands::Calendar { apartment, month } => {
            let (year, month) = parse_month(&month)?;
            let view = match apartment {
                Some(apartment) => {
                    engine(service.month_view(&ApartmentId(apartment), year, month))?
                }
                None => engine(service.overview_month(year, month))?,
            };
            for day in &view.days {
                let ids: Vec<String> = day.bookings.iter().map(|id| id.to_string()).collect();
                let marker = if day.is_booked() { "x" } else { "." };
                println!("{} {} {}", day.date, marker, ids.join(","));
            }
            println!("{} of {} day(s) booked", view.booked_days(), view.days.len());
            false
        }
        Commands::Day { date } => {
            let entries = engine(service.bookings_on(date))?;
            if entries.is_empty() {
                println!("no bookings on {}", date);
            }
            for entry in entries {
                println!(
                    "{}\t{}\t{}\t{}",
                    entry.booking.id,
                    entry.apartment_name,
                    entry.booking.range,
                    entry.booking.status
                );
            }
            false
        }
        Commands::Quote {
            apartment,
            start,
            end,
            guests,
        } => {
            let range = engine(DateRange::new(start, end))?;
            let quote = engine(service.quote(&ApartmentId(apartment), &range, guests))?;
            println!(
                "{}",
                serde_json::to_string(&quote).context("Failed to serialize quote")?
            );
            false
        }
    };

    if changed {
        config::save_store(&cli.data, service.store())?;
    }

    Ok(())
}

/// Map an engine error to its user-facing message and stable code.
fn engine<T>(result: stay_engine::Result<T>) -> Result<T> {
    result.map_err(|e| anyhow!("{} [{}]", e.user_message(), e.code()))
}

fn action_name(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Confirmed => "confirm",
        BookingStatus::Cancelled => "cancel",
        BookingStatus::Pending => "reopen",
    }
}

/// Parse `YYYY-MM` into year and month.
fn parse_month(raw: &str) -> Result<(i32, u32)> {
    let (year, month) = raw
        .split_once('-')
        .ok_or_else(|| anyhow!("Month must look like YYYY-MM, got '{}'", raw))?;
    let year: i32 = year
        .parse()
        .with_context(|| format!("Invalid year in '{}'", raw))?;
    let month: u32 = month
        .parse()
        .with_context(|| format!("Invalid month in '{}'", raw))?;
    Ok((year, month))
}
