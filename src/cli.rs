use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::services::dashboard::{self, HistoryColumn, SortOrder};
use crate::store::{CsvRecordStore, RecordStore};
use crate::utils::format::{format_money, format_unit_price, format_weight};

#[derive(Parser)]
#[command(name = "gold-ledger")]
#[command(about = "Gold purchase ledger - bill wizard, record store and receipts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Record store commands
    #[command(subcommand)]
    Records(RecordsCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum RecordsCommands {
    /// Print the purchase history
    List {
        /// Column to sort by, e.g. Date, Amount, Weight(g)
        #[arg(short, long, default_value = "Date")]
        sort: HistoryColumn,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Print row, bill and daily totals
    Summary,

    /// Write the daily totals bar chart as SVG
    Chart {
        #[arg(short, long, default_value = "daily_totals.svg")]
        out: PathBuf,
    },

    /// Delete every stored record
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

fn store(config: &Config) -> CsvRecordStore {
    CsvRecordStore::new(config.record_store_path.clone())
}

pub async fn handle_records_list(
    config: &Config,
    sort: HistoryColumn,
    desc: bool,
) -> anyhow::Result<()> {
    let records = store(config).load_all().await?;
    if records.is_empty() {
        println!("No transactions recorded yet");
        return Ok(());
    }

    let order = if desc { SortOrder::Desc } else { SortOrder::Asc };
    let rows = dashboard::history(records, sort, order);

    println!(
        "{:<20} {:<24} {:<14} {:<12} {:>10} {:>14} {:>16}",
        "Date", "Seller", "ID", "Gold type", "Weight(g)", "Unit price", "Amount"
    );
    println!("{}", "-".repeat(116));
    for row in rows {
        println!(
            "{:<20} {:<24} {:<14} {:<12} {:>10} {:>14} {:>16}",
            row.timestamp.format("%Y-%m-%d %H:%M:%S"),
            row.seller_name,
            row.seller_id,
            row.gold_type.label(),
            format_weight(&row.weight),
            format_unit_price(row.unit_price),
            format_money(&row.amount)
        );
    }

    Ok(())
}

pub async fn handle_records_summary(config: &Config) -> anyhow::Result<()> {
    let records = store(config).load_all().await?;
    let summary = dashboard::summarize(&records);

    println!("Rows:        {}", summary.rows);
    println!("Bills:       {}", summary.bills);
    println!("Grand total: {} VND", format_money(&summary.grand_total));
    for day in &summary.daily_totals {
        println!("  {}  {:>20} VND", day.date, format_money(&day.total));
    }

    Ok(())
}

pub async fn handle_records_chart(config: &Config, out: &Path) -> anyhow::Result<()> {
    let records = store(config).load_all().await?;
    let svg = dashboard::render_chart_svg(&dashboard::daily_totals(&records))?;
    tokio::fs::write(out, svg).await?;

    println!("✓ Chart written to {}", out.display());
    Ok(())
}

pub async fn handle_records_clear(config: &Config, yes: bool) -> anyhow::Result<()> {
    if !yes {
        anyhow::bail!(
            "Refusing to delete {} without --yes",
            config.record_store_path.display()
        );
    }

    store(config).clear().await?;
    tracing::warn!("Record store cleared from CLI");
    println!("✓ All records deleted");
    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Record Store: {}", config.record_store_path.display());
    println!(
        "  Receipt Font: {} ({})",
        config.receipt_font_path.display(),
        availability(&config.receipt_font_path)
    );
    println!(
        "  Receipt Bold Font: {} ({})",
        config.receipt_bold_font_path.display(),
        availability(&config.receipt_bold_font_path)
    );
    println!("  Receipt Prefix: {}", config.receipt_file_prefix);
    println!("  Company: {}", config.company_name);

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");

    Ok(())
}

fn availability(path: &Path) -> &'static str {
    if path.is_file() {
        "found"
    } else {
        "missing, built-in font will be used"
    }
}
