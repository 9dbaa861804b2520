use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::api::CostAnalytics;
use crate::channel::Channel;
use crate::error::{CostbookError, Result};
use crate::fmt::money;
use crate::importer::parse_cost_date;
use crate::models::CostPatch;
use crate::providers::{NoStats, OpenAccess};
use crate::settings;

#[allow(clippy::too_many_arguments)]
pub fn add(
    amount: f64,
    channel: &str,
    date: &str,
    site: Option<i64>,
    currency: Option<String>,
    campaign: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let conn = super::open_db()?;
    let api = CostAnalytics::new(&conn, &OpenAccess, &NoStats, &NoStats);
    let site = super::site_or_default(site);
    let currency = currency.unwrap_or_else(|| settings::load_settings().default_currency);

    let id = api.add_cost(site, channel, date, amount, Some(currency), campaign, description)?;
    println!("Added cost entry {id}");
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn update(
    id: i64,
    site: Option<i64>,
    channel: Option<String>,
    date: Option<String>,
    amount: Option<f64>,
    currency: Option<String>,
    campaign: Option<String>,
    description: Option<String>,
) -> Result<()> {
    let conn = super::open_db()?;
    let api = CostAnalytics::new(&conn, &OpenAccess, &NoStats, &NoStats);
    let site = super::site_or_default(site);

    let patch = CostPatch {
        channel: channel.as_deref().map(Channel::parse_code).transpose()?,
        cost_date: date
            .as_deref()
            .map(|d| {
                parse_cost_date(d)
                    .ok_or_else(|| CostbookError::Validation(format!("Invalid date format '{d}'")))
            })
            .transpose()?,
        cost_amount: amount,
        currency,
        campaign_name: campaign,
        description,
    };

    api.update_cost(site, id, &patch)?;
    println!("Updated cost entry {id}");
    Ok(())
}

pub fn delete(id: i64, site: Option<i64>) -> Result<()> {
    let conn = super::open_db()?;
    let api = CostAnalytics::new(&conn, &OpenAccess, &NoStats, &NoStats);
    let site = super::site_or_default(site);

    api.delete_cost(site, id)?;
    println!("Deleted cost entry {id}");
    Ok(())
}

pub fn list(
    site: Option<i64>,
    limit: i64,
    offset: i64,
    order_by: &str,
    order_dir: &str,
) -> Result<()> {
    let conn = super::open_db()?;
    let api = CostAnalytics::new(&conn, &OpenAccess, &NoStats, &NoStats);
    let site = super::site_or_default(site);

    let (entries, total) = api.all_costs(site, limit, offset, order_by, order_dir)?;

    let mut table = Table::new();
    table.set_header(vec!["ID", "Date", "Channel", "Campaign", "Amount", "Created"]);
    for e in &entries {
        table.add_row(vec![
            Cell::new(e.id),
            Cell::new(e.cost_date),
            Cell::new(e.channel.label()),
            Cell::new(e.campaign_name.as_deref().unwrap_or("")),
            Cell::new(money(e.cost_amount, &e.currency)),
            Cell::new(&e.created_at),
        ]);
    }
    println!("Costs (site {site})\n{table}");
    println!("Showing {} of {} entries", entries.len(), total.to_string().bold());
    Ok(())
}
