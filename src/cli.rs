use clap::{Parser, Subcommand};
use serde::Serialize;
use tabled::{Table, Tabled};

use crate::domain::{Shipment, Transporter};
use crate::simulator::TickTransition;

#[derive(Parser)]
#[command(name = "shiptrack")]
#[command(author = "Shiptrack Team")]
#[command(version = "0.1.0")]
#[command(about = "Shipment tracking backend with transporter assignment and status simulation", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config directory (default.toml plus $SHIPTRACK_ENV overrides)
    #[arg(short, long, default_value = "config", global = true)]
    pub config: String,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API together with the status simulator (default)
    Serve {
        /// Override server.port
        #[arg(short, long, env = "SHIPTRACK_PORT")]
        port: Option<u16>,
        /// Do not start the status simulator
        #[arg(long)]
        no_simulator: bool,
    },
    /// Run simulator ticks against the seed data without a timer
    Simulate {
        /// Number of ticks to run
        #[arg(short, long, default_value = "20")]
        ticks: u32,
        /// RNG seed for a reproducible run
        #[arg(short, long)]
        seed: Option<u64>,
    },
    /// Print the seed shipments and transporters
    Seed,
}

/// Output mode for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct ShipmentRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Route")]
    pub route: String,
    #[tabled(rename = "Vehicle")]
    pub vehicle_type: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Transporter")]
    pub transporter: String,
}

impl From<&Shipment> for ShipmentRow {
    fn from(s: &Shipment) -> Self {
        Self {
            id: s.id.clone(),
            route: format!("{} -> {}", s.origin, s.destination),
            vehicle_type: s.vehicle_type.clone(),
            status: s.status.to_string(),
            transporter: s.transporter_id.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct TransporterRow {
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Vehicle")]
    pub vehicle_type: String,
    #[tabled(rename = "Phone")]
    pub phone: String,
}

impl From<&Transporter> for TransporterRow {
    fn from(t: &Transporter) -> Self {
        Self {
            id: t.id.clone(),
            name: t.name.clone(),
            vehicle_type: t.vehicle_type.clone(),
            phone: t.phone.clone(),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct TransitionRow {
    #[tabled(rename = "Tick")]
    pub tick: u32,
    #[tabled(rename = "Shipment")]
    pub shipment_id: String,
    #[tabled(rename = "From")]
    pub from: String,
    #[tabled(rename = "To")]
    pub to: String,
}

impl TransitionRow {
    pub fn new(tick: u32, t: &TickTransition) -> Self {
        Self {
            tick,
            shipment_id: t.shipment_id.clone(),
            from: t.from.to_string(),
            to: t.to.to_string(),
        }
    }
}

/// Print a vec of Tabled + Serialize items in the chosen mode
pub fn print_items<T: Tabled + Serialize>(items: &[T], mode: OutputMode) -> anyhow::Result<()> {
    match mode {
        OutputMode::Table => {
            if items.is_empty() {
                println!("(no results)");
            } else {
                let table = Table::new(items).to_string();
                println!("{table}");
            }
        }
        OutputMode::Json => {
            let json = serde_json::to_string_pretty(items)?;
            println!("{json}");
        }
    }
    Ok(())
}
