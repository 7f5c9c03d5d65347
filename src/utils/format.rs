//! Output formatting: report tables, charts, JSON and CSV

use crate::types::{ClockWindow, OutputFormat, TimeRangeSelection, TransactionRecord};
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

const BAR_WIDTH: usize = 24;

/// Everything one render needs: the filtered view plus the unfiltered total.
pub struct Report<'a> {
    pub records: &'a [&'a TransactionRecord],
    pub total: u64,
    pub selection: TimeRangeSelection,
    pub clock_window: Option<ClockWindow>,
}

pub fn render(report: &Report<'_>, format: OutputFormat) -> String {
    match format {
        OutputFormat::Table => format_table(report),
        OutputFormat::Json => format_json(report),
        OutputFormat::Csv => format_csv(report),
    }
}

/// Format a count with K/M suffix for readability
pub fn format_count(num: u64) -> String {
    if num >= 1_000_000 {
        format!("{:.1}M", num as f64 / 1_000_000.0)
    } else if num >= 1_000 {
        format!("{:.1}K", num as f64 / 1_000.0)
    } else {
        num.to_string()
    }
}

/// Proportional bar for chart rows
fn bar(count: usize, max: usize) -> String {
    if count == 0 || max == 0 {
        return String::new();
    }
    let len = (count * BAR_WIDTH / max).max(1);
    "█".repeat(len)
}

/// Calendar-day label of a record, from the text before the `T` separator
fn day_label(record: &TransactionRecord) -> String {
    match record.waktu_parkir.split_once('T') {
        Some((date, _)) => date.to_string(),
        None => "(unknown)".to_string(),
    }
}

#[derive(Tabled)]
struct TrendRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Transactions")]
    count: String,
    #[tabled(rename = "")]
    bar: String,
}

#[derive(Tabled)]
struct VehicleRow {
    #[tabled(rename = "Vehicle")]
    vehicle: String,
    #[tabled(rename = "Transactions")]
    count: String,
    #[tabled(rename = "")]
    bar: String,
}

/// Format the report as the terminal dashboard: summary header, daily trend,
/// vehicle breakdown.
pub fn format_table(report: &Report<'_>) -> String {
    let mut out = String::new();

    let window = match report.clock_window {
        Some(w) if report.selection == TimeRangeSelection::Today => {
            format!(" ({})", w).dimmed().to_string()
        }
        _ => String::new(),
    };
    out.push_str(&format!(
        "{} {}   {} {}{}\n\n",
        "Total transactions:".bold(),
        format_count(report.total).cyan(),
        "In window:".bold(),
        format_count(report.records.len() as u64).cyan(),
        window
    ));
    out.push_str(&format!(
        "{} {}\n",
        "Range:".bold(),
        report.selection.to_string().green()
    ));

    if report.records.is_empty() {
        out.push_str(&format!(
            "\n{}\n",
            "No transactions in the selected range.".yellow()
        ));
        return out;
    }

    // Daily trend
    let mut by_day: BTreeMap<String, usize> = BTreeMap::new();
    for record in report.records {
        *by_day.entry(day_label(record)).or_default() += 1;
    }
    let max = by_day.values().copied().max().unwrap_or(0);
    let rows: Vec<TrendRow> = by_day
        .iter()
        .map(|(date, &count)| TrendRow {
            date: date.clone(),
            count: format_count(count as u64),
            bar: bar(count, max).cyan().to_string(),
        })
        .collect();
    out.push_str(&format!("\n{}\n", "Daily Trend".bold()));
    out.push_str(&table_of(rows));
    out.push('\n');

    // Vehicle breakdown
    let mut by_vehicle: BTreeMap<String, usize> = BTreeMap::new();
    for record in report.records {
        let vehicle = record
            .jenis_kendaraan
            .clone()
            .unwrap_or_else(|| "(unknown)".to_string());
        *by_vehicle.entry(vehicle).or_default() += 1;
    }
    let max = by_vehicle.values().copied().max().unwrap_or(0);
    let rows: Vec<VehicleRow> = by_vehicle
        .iter()
        .map(|(vehicle, &count)| VehicleRow {
            vehicle: vehicle.clone(),
            count: format_count(count as u64),
            bar: bar(count, max).green().to_string(),
        })
        .collect();
    out.push_str(&format!("\n{}\n", "Vehicle Breakdown".bold()));
    out.push_str(&table_of(rows));
    out.push('\n');

    out
}

fn table_of<R: Tabled>(rows: Vec<R>) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::single(0)).with(Alignment::left()))
        .to_string()
}

#[derive(Serialize)]
struct JsonReport<'a> {
    range: String,
    #[serde(rename = "totalTransaksi")]
    total_transaksi: u64,
    shown: usize,
    transaksi: &'a [&'a TransactionRecord],
}

/// Format the filtered records plus totals as JSON
pub fn format_json(report: &Report<'_>) -> String {
    let json = JsonReport {
        range: report.selection.to_string(),
        total_transaksi: report.total,
        shown: report.records.len(),
        transaksi: report.records,
    };
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string())
}

/// Quote a CSV field when it carries a comma, quote, or newline
fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Format the filtered records as CSV, one line per record
pub fn format_csv(report: &Report<'_>) -> String {
    let mut output = String::from("waktu_parkir,jenis_kendaraan,plat_nomor,biaya\n");

    for record in report.records {
        output.push_str(&format!(
            "{},{},{},{}\n",
            csv_field(&record.waktu_parkir),
            csv_field(record.jenis_kendaraan.as_deref().unwrap_or("")),
            csv_field(record.plat_nomor.as_deref().unwrap_or("")),
            record
                .biaya
                .map(|b| format!("{:.2}", b))
                .unwrap_or_default()
        ));
    }

    output
}

/// Print banner
pub fn print_banner() {
    println!();
    println!(
        "{}",
        "  parkstat - Parking Transaction Dashboard".cyan().bold()
    );
    println!();
}

/// Print doctor results
pub fn print_doctor_results(checks: &[(String, String, bool)]) {
    println!("{}", "\nConfiguration Sources:\n".bold());

    for (name, detail, found) in checks {
        let icon = if *found { "✓".green() } else { "✗".red() };
        let detail_display = if *found {
            detail.green()
        } else {
            detail.dimmed()
        };
        println!("  {} {}", icon, name);
        println!("    {}\n", detail_display);
    }
}
