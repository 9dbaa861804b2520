use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension};

use crate::channel::Channel;
use crate::error::{CostbookError, Result};
use crate::models::{ChannelCost, CostEntry, CostPatch, NewCost};

const ENTRY_COLUMNS: &str =
    "id, site_id, channel_type, campaign_name, description, cost_date, cost_amount, currency, created_at, updated_at, deleted";

fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<CostEntry> {
    let code: String = row.get(2)?;
    let channel = Channel::from_code(&code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown channel type '{code}'").into(),
        )
    })?;
    Ok(CostEntry {
        id: row.get(0)?,
        site_id: row.get(1)?,
        channel,
        campaign_name: row.get(3)?,
        description: row.get(4)?,
        cost_date: row.get(5)?,
        cost_amount: row.get(6)?,
        currency: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
        deleted: row.get(10)?,
    })
}

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

pub fn insert_cost(conn: &Connection, cost: &NewCost) -> Result<i64> {
    if cost.cost_amount < 0.0 {
        return Err(CostbookError::Validation(
            "Cost amount cannot be negative".to_string(),
        ));
    }
    conn.execute(
        "INSERT INTO costs (site_id, channel_type, campaign_name, description, cost_date, cost_amount, currency, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, datetime('now'))",
        rusqlite::params![
            cost.site_id,
            cost.channel.code(),
            cost.campaign_name,
            cost.description,
            cost.cost_date,
            cost.cost_amount,
            cost.currency,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Apply a partial update to a live entry owned by the site. An empty patch
/// succeeds without touching the row (updated_at stays as it was).
pub fn update_cost(conn: &Connection, site_id: i64, id: i64, patch: &CostPatch) -> Result<()> {
    let entry = get_cost(conn, id)?;
    match entry {
        Some(e) if e.site_id == site_id => {}
        _ => return Err(CostbookError::NotFound(id)),
    }

    if patch.is_empty() {
        return Ok(());
    }
    if let Some(amount) = patch.cost_amount {
        if amount < 0.0 {
            return Err(CostbookError::Validation(
                "Cost amount cannot be negative".to_string(),
            ));
        }
    }

    let mut sets: Vec<&str> = Vec::new();
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    if let Some(channel) = patch.channel {
        sets.push("channel_type = ?");
        params.push(Box::new(channel.code()));
    }
    if let Some(date) = patch.cost_date {
        sets.push("cost_date = ?");
        params.push(Box::new(date));
    }
    if let Some(amount) = patch.cost_amount {
        sets.push("cost_amount = ?");
        params.push(Box::new(amount));
    }
    if let Some(ref currency) = patch.currency {
        sets.push("currency = ?");
        params.push(Box::new(currency.clone()));
    }
    if let Some(ref campaign) = patch.campaign_name {
        sets.push("campaign_name = ?");
        params.push(Box::new(campaign.clone()));
    }
    if let Some(ref description) = patch.description {
        sets.push("description = ?");
        params.push(Box::new(description.clone()));
    }
    sets.push("updated_at = datetime('now')");

    let sql = format!("UPDATE costs SET {} WHERE id = ?", sets.join(", "));
    params.push(Box::new(id));
    let param_values: Vec<&dyn rusqlite::types::ToSql> =
        params.iter().map(|p| p.as_ref()).collect();
    conn.execute(&sql, param_values.as_slice())?;
    Ok(())
}

/// Soft delete: flips the flag, never removes the row. Deleting an already
/// deleted or unknown id is not an error.
pub fn soft_delete_cost(conn: &Connection, id: i64) -> Result<()> {
    conn.execute("UPDATE costs SET deleted = 1 WHERE id = ?1", [id])?;
    Ok(())
}

/// Bulk soft-delete for a site and inclusive date span, optionally scoped
/// to one channel. Used as the destructive re-import guard.
pub fn delete_costs_in_range(
    conn: &Connection,
    site_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    channel: Option<Channel>,
) -> Result<()> {
    match channel {
        Some(c) => {
            conn.execute(
                "UPDATE costs SET deleted = 1 WHERE site_id = ?1 AND cost_date >= ?2 AND cost_date <= ?3 AND channel_type = ?4",
                rusqlite::params![site_id, start, end, c.code()],
            )?;
        }
        None => {
            conn.execute(
                "UPDATE costs SET deleted = 1 WHERE site_id = ?1 AND cost_date >= ?2 AND cost_date <= ?3",
                rusqlite::params![site_id, start, end],
            )?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reads (all filter deleted = 0)
// ---------------------------------------------------------------------------

pub fn get_cost(conn: &Connection, id: i64) -> Result<Option<CostEntry>> {
    let entry = conn
        .query_row(
            &format!("SELECT {ENTRY_COLUMNS} FROM costs WHERE id = ?1 AND deleted = 0"),
            [id],
            row_to_entry,
        )
        .optional()?;
    Ok(entry)
}

pub fn list_costs(
    conn: &Connection,
    site_id: i64,
    start: NaiveDate,
    end: NaiveDate,
    channel: Option<Channel>,
) -> Result<Vec<CostEntry>> {
    let mut sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM costs \
         WHERE site_id = ? AND cost_date >= ? AND cost_date <= ? AND deleted = 0"
    );
    let mut params: Vec<Box<dyn rusqlite::types::ToSql>> =
        vec![Box::new(site_id), Box::new(start), Box::new(end)];
    if let Some(c) = channel {
        sql.push_str(" AND channel_type = ?");
        params.push(Box::new(c.code()));
    }
    sql.push_str(" ORDER BY cost_date ASC");

    let mut stmt = conn.prepare(&sql)?;
    let param_values: Vec<&dyn rusqlite::types::ToSql> =
        params.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(param_values.as_slice(), row_to_entry)?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Paged management listing. An order column outside the allow-list falls
/// back to cost_date, and anything but "asc" orders descending; bad sort
/// input must never break report pagination.
pub fn list_all_costs(
    conn: &Connection,
    site_id: i64,
    limit: i64,
    offset: i64,
    order_by: &str,
    order_dir: &str,
) -> Result<Vec<CostEntry>> {
    const ALLOWED: &[&str] = &[
        "cost_date",
        "channel_type",
        "cost_amount",
        "campaign_name",
        "created_at",
    ];
    let order_by = if ALLOWED.contains(&order_by) { order_by } else { "cost_date" };
    let order_dir = if order_dir.eq_ignore_ascii_case("asc") { "ASC" } else { "DESC" };

    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM costs WHERE site_id = ?1 AND deleted = 0 \
         ORDER BY {order_by} {order_dir} LIMIT ?2 OFFSET ?3"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params![site_id, limit, offset], row_to_entry)?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

pub fn count_costs(conn: &Connection, site_id: i64) -> Result<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM costs WHERE site_id = ?1 AND deleted = 0",
        [site_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Spend grouped by (channel, currency), largest first. Currencies stay in
/// separate rows rather than being summed together.
pub fn sum_by_channel(
    conn: &Connection,
    site_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ChannelCost>> {
    let mut stmt = conn.prepare(
        "SELECT channel_type, SUM(cost_amount) as total, currency FROM costs \
         WHERE site_id = ?1 AND cost_date >= ?2 AND cost_date <= ?3 AND deleted = 0 \
         GROUP BY channel_type, currency ORDER BY total DESC",
    )?;
    let rows = stmt.query_map(rusqlite::params![site_id, start, end], |row| {
        let code: String = row.get(0)?;
        let channel = Channel::from_code(&code).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                format!("unknown channel type '{code}'").into(),
            )
        })?;
        Ok(ChannelCost {
            channel,
            total: row.get(1)?,
            currency: row.get(2)?,
        })
    })?;
    Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
}

/// Sitewide spend total. Sums across currencies, which is only meaningful
/// for single-currency deployments.
pub fn sum_total(conn: &Connection, site_id: i64, start: NaiveDate, end: NaiveDate) -> Result<f64> {
    let total: Option<f64> = conn.query_row(
        "SELECT SUM(cost_amount) FROM costs \
         WHERE site_id = ?1 AND cost_date >= ?2 AND cost_date <= ?3 AND deleted = 0",
        rusqlite::params![site_id, start, end],
        |row| row.get(0),
    )?;
    Ok(total.unwrap_or(0.0))
}
