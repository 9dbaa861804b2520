use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS costs (
    id INTEGER PRIMARY KEY,
    site_id INTEGER NOT NULL,
    channel_type TEXT NOT NULL,
    campaign_name TEXT,
    description TEXT,
    cost_date TEXT NOT NULL,
    cost_amount REAL NOT NULL DEFAULT 0,
    currency TEXT NOT NULL DEFAULT 'USD',
    created_at TEXT DEFAULT (datetime('now')),
    updated_at TEXT,
    deleted INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_costs_site_date ON costs(site_id, cost_date);
CREATE INDEX IF NOT EXISTS idx_costs_channel ON costs(channel_type);
CREATE INDEX IF NOT EXISTS idx_costs_site_channel_date ON costs(site_id, channel_type, cost_date);
";

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}
