pub mod channels;
pub mod costs;
pub mod import;
pub mod init;
pub mod report;

use clap::{Parser, Subcommand};
use rusqlite::Connection;

use crate::db;
use crate::error::Result;
use crate::settings;

/// Open (and if needed create) the ledger database in the data directory.
pub(crate) fn open_db() -> Result<Connection> {
    let data_dir = settings::get_data_dir();
    std::fs::create_dir_all(&data_dir)?;
    let conn = db::get_connection(&settings::db_path())?;
    db::init_db(&conn)?;
    Ok(conn)
}

pub(crate) fn site_or_default(site: Option<i64>) -> i64 {
    site.unwrap_or_else(|| settings::load_settings().default_site)
}

pub(crate) fn date_or_today(date: Option<String>) -> String {
    date.unwrap_or_else(|| chrono::Local::now().date_naive().format("%Y-%m-%d").to_string())
}

#[derive(Parser)]
#[command(
    name = "costbook",
    about = "Marketing-spend ledger and ROI reporting for web-analytics sites."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up costbook: choose a data directory and initialize the database.
    Init {
        /// Path for costbook data (default: ~/Documents/costbook)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Record a single cost entry.
    Add {
        /// Cost amount (non-negative)
        amount: f64,
        /// Channel: direct, website, search, social, campaign
        #[arg(long)]
        channel: String,
        /// Cost date: YYYY-MM-DD
        #[arg(long)]
        date: String,
        /// Site id (default: settings)
        #[arg(long)]
        site: Option<i64>,
        /// ISO currency code (default: settings)
        #[arg(long)]
        currency: Option<String>,
        /// Campaign name
        #[arg(long)]
        campaign: Option<String>,
        /// Free-form description
        #[arg(long)]
        description: Option<String>,
    },
    /// Update fields of an existing cost entry.
    Update {
        /// Cost entry id (shown in `costbook costs`)
        id: i64,
        #[arg(long)]
        site: Option<i64>,
        /// New channel
        #[arg(long)]
        channel: Option<String>,
        /// New cost date: YYYY-MM-DD
        #[arg(long)]
        date: Option<String>,
        /// New amount
        #[arg(long)]
        amount: Option<f64>,
        /// New currency code
        #[arg(long)]
        currency: Option<String>,
        /// New campaign name
        #[arg(long)]
        campaign: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a cost entry (kept in storage, hidden from reports).
    Delete {
        /// Cost entry id
        id: i64,
        #[arg(long)]
        site: Option<i64>,
    },
    /// List recorded cost entries (management view).
    Costs {
        #[arg(long)]
        site: Option<i64>,
        #[arg(long, default_value = "50")]
        limit: i64,
        #[arg(long, default_value = "0")]
        offset: i64,
        /// Sort column: cost_date, channel_type, cost_amount, campaign_name, created_at
        #[arg(long = "order-by", default_value = "cost_date")]
        order_by: String,
        /// Sort direction: asc or desc
        #[arg(long = "order-dir", default_value = "desc")]
        order_dir: String,
    },
    /// Import cost entries from a CSV file.
    Import {
        /// Path to the CSV file (header: channel_type,cost_date,cost_amount[,currency,campaign_name,description])
        file: String,
        #[arg(long)]
        site: Option<i64>,
        /// First delete every existing entry in the file's date span, all channels
        #[arg(long = "delete-existing")]
        delete_existing: bool,
    },
    /// List the channel taxonomy.
    Channels,
    /// Generate reports.
    Report {
        #[command(subcommand)]
        command: ReportCommands,
    },
}

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Spend, attributed revenue and ROI per channel.
    ByChannel {
        #[arg(long)]
        site: Option<i64>,
        /// Period: day, week, month, year, range
        #[arg(long, default_value = "month")]
        period: String,
        /// Date in the period: YYYY-MM-DD, or start,end for range (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Stats export JSON with goal revenue and referrer visits
        #[arg(long)]
        stats: Option<String>,
        /// Costs only, skip revenue attribution
        #[arg(long = "no-roi")]
        no_roi: bool,
    },
    /// Individual cost entries for a period.
    Costs {
        #[arg(long)]
        site: Option<i64>,
        #[arg(long, default_value = "month")]
        period: String,
        #[arg(long)]
        date: Option<String>,
        /// Filter by channel
        #[arg(long)]
        channel: Option<String>,
    },
    /// Sitewide cost, revenue, profit and ROI.
    Summary {
        #[arg(long)]
        site: Option<i64>,
        #[arg(long, default_value = "month")]
        period: String,
        #[arg(long)]
        date: Option<String>,
        /// Stats export JSON with goal revenue and referrer visits
        #[arg(long)]
        stats: Option<String>,
    },
}
