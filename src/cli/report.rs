use std::path::Path;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::api::CostAnalytics;
use crate::channel::Channel;
use crate::error::Result;
use crate::fmt::{money, percent};
use crate::providers::{NoStats, OpenAccess, RevenueProvider, StatsFile, VisitBreakdownProvider};

fn load_stats(stats: Option<&str>) -> Result<Option<StatsFile>> {
    stats.map(|path| StatsFile::load(Path::new(path))).transpose()
}

fn roi_cell(roi: f64) -> Cell {
    if roi >= 0.0 {
        Cell::new(percent(roi).green())
    } else {
        Cell::new(percent(roi).red())
    }
}

pub fn by_channel(
    site: Option<i64>,
    period: &str,
    date: Option<String>,
    stats: Option<String>,
    no_roi: bool,
) -> Result<()> {
    let conn = super::open_db()?;
    let stats_file = load_stats(stats.as_deref())?;
    let revenue: &dyn RevenueProvider = match &stats_file {
        Some(s) => s,
        None => &NoStats,
    };
    let visits: &dyn VisitBreakdownProvider = match &stats_file {
        Some(s) => s,
        None => &NoStats,
    };
    let api = CostAnalytics::new(&conn, &OpenAccess, revenue, visits);
    let site = super::site_or_default(site);
    let date = super::date_or_today(date);

    let rows = api.costs_by_channel(site, period, &date, !no_roi)?;

    let mut table = Table::new();
    if no_roi {
        table.set_header(vec!["Channel", "Cost"]);
    } else {
        table.set_header(vec!["Channel", "Cost", "Revenue", "Profit", "ROI"]);
    }
    for row in &rows {
        let mut cells = vec![Cell::new(row.label), Cell::new(money(row.cost, &row.currency))];
        if !no_roi {
            cells.push(Cell::new(money(row.revenue.unwrap_or(0.0), &row.currency)));
            cells.push(Cell::new(money(row.profit.unwrap_or(0.0), &row.currency)));
            cells.push(roi_cell(row.roi.unwrap_or(0.0)));
        }
        table.add_row(cells);
    }
    println!("Costs by Channel (site {site}, {period} {date})\n{table}");
    if rows.is_empty() {
        println!("No costs recorded for this period.");
    }
    Ok(())
}

pub fn costs(
    site: Option<i64>,
    period: &str,
    date: Option<String>,
    channel: Option<String>,
) -> Result<()> {
    let conn = super::open_db()?;
    let api = CostAnalytics::new(&conn, &OpenAccess, &NoStats, &NoStats);
    let site = super::site_or_default(site);
    let date = super::date_or_today(date);
    let channel = channel.as_deref().map(Channel::parse_code).transpose()?;

    let rows = api.costs(site, period, &date, channel)?;

    let mut table = Table::new();
    table.set_header(vec!["Date", "Channel", "Campaign", "Cost"]);
    for row in &rows {
        table.add_row(vec![
            Cell::new(row.date),
            Cell::new(row.channel_label),
            Cell::new(row.campaign_name.as_deref().unwrap_or("")),
            Cell::new(money(row.cost, &row.currency)),
        ]);
    }
    println!("Costs (site {site}, {period} {date})\n{table}");
    Ok(())
}

pub fn summary(
    site: Option<i64>,
    period: &str,
    date: Option<String>,
    stats: Option<String>,
) -> Result<()> {
    let conn = super::open_db()?;
    let stats_file = load_stats(stats.as_deref())?;
    let revenue: &dyn RevenueProvider = match &stats_file {
        Some(s) => s,
        None => &NoStats,
    };
    let visits: &dyn VisitBreakdownProvider = match &stats_file {
        Some(s) => s,
        None => &NoStats,
    };
    let api = CostAnalytics::new(&conn, &OpenAccess, revenue, visits);
    let site = super::site_or_default(site);
    let date = super::date_or_today(date);

    let summary = api.roi_summary(site, period, &date)?;
    let currency = crate::settings::load_settings().default_currency;

    let profit_label = if summary.profit >= 0.0 {
        "Profit".green().bold()
    } else {
        "Profit".red().bold()
    };

    let mut table = Table::new();
    table.add_row(vec![Cell::new("Total Cost"), Cell::new(money(summary.total_cost, &currency))]);
    table.add_row(vec![
        Cell::new("Total Revenue"),
        Cell::new(money(summary.total_revenue, &currency)),
    ]);
    table.add_row(vec![Cell::new(profit_label), Cell::new(money(summary.profit, &currency))]);
    table.add_row(vec![Cell::new("ROI".bold()), roi_cell(summary.roi)]);
    println!("ROI Summary (site {site}, {period} {date})\n{table}");
    Ok(())
}
