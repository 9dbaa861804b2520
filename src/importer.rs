use chrono::NaiveDate;
use rusqlite::Connection;

use crate::channel::Channel;
use crate::error::{CostbookError, Result};
use crate::models::{ImportResult, NewCost};
use crate::store;

// ---------------------------------------------------------------------------
// Field parsers
// ---------------------------------------------------------------------------

pub fn parse_amount(raw: &str) -> Option<f64> {
    let s = raw.replace(',', "").replace('$', "");
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse().ok()
}

/// ISO dates first; MM/DD/YYYY accepted as a fallback.
pub fn parse_cost_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}

fn non_empty(raw: &str) -> Option<String> {
    let s = raw.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// import_csv
// ---------------------------------------------------------------------------

const REQUIRED_COLUMNS: &[&str] = &["channel_type", "cost_date", "cost_amount"];

/// Parse and validate CSV cost data, then batch-insert it for the site.
///
/// The header is checked up front; a missing required column aborts before
/// any store access. After that no single row can abort the batch: invalid
/// rows are collected into line-numbered errors and skipped. With
/// `delete_existing`, every prior entry for the site inside the new file's
/// [min, max] date span is soft-deleted first, regardless of channel.
pub fn import_csv(
    conn: &Connection,
    site_id: i64,
    csv_data: &str,
    delete_existing: bool,
) -> Result<ImportResult> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let mut records: Vec<(u64, csv::StringRecord)> = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        records.push((line, record));
    }

    let header: Vec<String> = records
        .first()
        .map(|(_, record)| record.iter().map(|c| c.trim().to_lowercase()).collect())
        .unwrap_or_default();
    for col in REQUIRED_COLUMNS {
        if !header.iter().any(|h| h == col) {
            return Err(CostbookError::MissingColumn((*col).to_string()));
        }
    }

    let col = |name: &str| header.iter().position(|h| h == name);
    let idx_channel = col("channel_type").unwrap();
    let idx_date = col("cost_date").unwrap();
    let idx_amount = col("cost_amount").unwrap();
    let idx_currency = col("currency");
    let idx_campaign = col("campaign_name");
    let idx_description = col("description");

    // Short rows are padded implicitly: a missing cell reads as "".
    let cell = |record: &csv::StringRecord, idx: Option<usize>| -> String {
        idx.and_then(|i| record.get(i)).unwrap_or("").to_string()
    };

    let mut costs: Vec<NewCost> = Vec::new();
    let mut errors: Vec<String> = Vec::new();

    for (line, record) in records.iter().skip(1) {
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }

        let raw_channel = cell(record, Some(idx_channel));
        let Some(channel) = Channel::from_code(raw_channel.trim()) else {
            errors.push(format!("Line {line}: Invalid channel type '{raw_channel}'"));
            continue;
        };

        let raw_date = cell(record, Some(idx_date));
        let Some(cost_date) = parse_cost_date(&raw_date) else {
            errors.push(format!("Line {line}: Invalid date format '{raw_date}'"));
            continue;
        };

        let raw_amount = cell(record, Some(idx_amount));
        let cost_amount = match parse_amount(&raw_amount) {
            Some(a) if a < 0.0 => {
                errors.push(format!("Line {line}: Cost amount cannot be negative"));
                continue;
            }
            Some(a) => a,
            None => {
                errors.push(format!("Line {line}: Invalid cost amount '{raw_amount}'"));
                continue;
            }
        };

        let currency = non_empty(&cell(record, idx_currency)).unwrap_or_else(|| "USD".to_string());

        costs.push(NewCost {
            site_id,
            channel,
            cost_date,
            cost_amount,
            currency,
            campaign_name: non_empty(&cell(record, idx_campaign)),
            description: non_empty(&cell(record, idx_description)),
        });
    }

    if costs.is_empty() {
        return Ok(ImportResult {
            success: false,
            imported: 0,
            total_rows: 0,
            errors,
        });
    }

    if delete_existing {
        let min_date = costs.iter().map(|c| c.cost_date).min().unwrap();
        let max_date = costs.iter().map(|c| c.cost_date).max().unwrap();
        store::delete_costs_in_range(conn, site_id, min_date, max_date, None)?;
    }

    let mut imported = 0usize;
    for cost in &costs {
        match store::insert_cost(conn, cost) {
            Ok(_) => imported += 1,
            Err(e) => {
                log::warn!(
                    "skipping cost row ({} {}): {e}",
                    cost.channel.code(),
                    cost.cost_date
                );
            }
        }
    }

    Ok(ImportResult {
        success: true,
        imported,
        total_rows: costs.len(),
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::store::{count_costs, list_costs};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("120.50"), Some(120.50));
        assert_eq!(parse_amount("$1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("  0  "), Some(0.0));
        assert_eq!(parse_amount("-42.50"), Some(-42.50));
        assert_eq!(parse_amount("twelve"), None);
        assert_eq!(parse_amount(""), None);
    }

    #[test]
    fn test_parse_cost_date() {
        assert_eq!(parse_cost_date("2026-01-15"), Some(date("2026-01-15")));
        assert_eq!(parse_cost_date("01/15/2026"), Some(date("2026-01-15")));
        assert_eq!(parse_cost_date("2026-02-30"), None);
        assert_eq!(parse_cost_date("soon"), None);
    }

    #[test]
    fn test_import_valid_rows() {
        let (_dir, conn) = test_db();
        let csv = "channel_type,cost_date,cost_amount,currency,campaign_name,description\n\
                   search,2026-01-10,100.00,USD,spring,Paid search\n\
                   social,2026-01-11,50.00,,,\n";
        let result = import_csv(&conn, 1, csv, false).unwrap();
        assert!(result.success);
        assert_eq!(result.imported, 2);
        assert_eq!(result.total_rows, 2);
        assert!(result.errors.is_empty());

        let entries = list_costs(&conn, 1, date("2026-01-01"), date("2026-01-31"), None).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].campaign_name.as_deref(), Some("spring"));
        assert_eq!(entries[1].currency, "USD");
        assert!(entries[1].campaign_name.is_none());
    }

    #[test]
    fn test_import_missing_required_column_aborts() {
        let (_dir, conn) = test_db();
        let csv = "channel_type,cost_amount\nsearch,100.00\n";
        let err = import_csv(&conn, 1, csv, false).unwrap_err();
        assert!(matches!(err, CostbookError::MissingColumn(ref c) if c == "cost_date"));
        assert_eq!(count_costs(&conn, 1).unwrap(), 0);
    }

    #[test]
    fn test_import_empty_input_aborts() {
        let (_dir, conn) = test_db();
        let err = import_csv(&conn, 1, "", false).unwrap_err();
        assert!(matches!(err, CostbookError::MissingColumn(_)));
    }

    #[test]
    fn test_import_collects_row_errors_with_line_numbers() {
        let (_dir, conn) = test_db();
        let csv = "channel_type,cost_date,cost_amount\n\
                   search,2026-01-10,100.00\n\
                   bogus,2026-01-11,50.00\n\
                   social,not-a-date,25.00\n\
                   direct,2026-01-12,-5.00\n\
                   website,2026-01-13,free\n";
        let result = import_csv(&conn, 1, csv, false).unwrap();
        assert!(result.success);
        assert_eq!(result.imported, 1);
        assert_eq!(result.total_rows, 1);
        assert_eq!(result.errors.len(), 4);
        assert!(result.errors[0].contains("Line 3"));
        assert!(result.errors[0].contains("Invalid channel type 'bogus'"));
        assert!(result.errors[1].contains("Line 4"));
        assert!(result.errors[1].contains("Invalid date format"));
        assert!(result.errors[2].contains("Line 5"));
        assert!(result.errors[2].contains("cannot be negative"));
        assert!(result.errors[3].contains("Line 6"));
        assert!(result.errors[3].contains("Invalid cost amount 'free'"));
    }

    #[test]
    fn test_import_zero_valid_rows_mutates_nothing() {
        let (_dir, conn) = test_db();
        let csv = "channel_type,cost_date,cost_amount\nbogus,2026-01-10,1.00\n";
        let result = import_csv(&conn, 1, csv, true).unwrap();
        assert!(!result.success);
        assert_eq!(result.imported, 0);
        assert_eq!(result.total_rows, 0);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(count_costs(&conn, 1).unwrap(), 0);
    }

    #[test]
    fn test_import_header_is_case_normalized() {
        let (_dir, conn) = test_db();
        let csv = " Channel_Type , COST_DATE ,Cost_Amount\nsearch,2026-01-10,10.00\n";
        let result = import_csv(&conn, 1, csv, false).unwrap();
        assert_eq!(result.imported, 1);
    }

    #[test]
    fn test_import_pads_short_rows() {
        let (_dir, conn) = test_db();
        let csv = "channel_type,cost_date,cost_amount,currency,campaign_name\n\
                   search,2026-01-10,10.00\n";
        let result = import_csv(&conn, 1, csv, false).unwrap();
        assert_eq!(result.imported, 1);
        let entries = list_costs(&conn, 1, date("2026-01-01"), date("2026-01-31"), None).unwrap();
        assert_eq!(entries[0].currency, "USD");
        assert!(entries[0].campaign_name.is_none());
    }

    #[test]
    fn test_import_accepts_mdy_dates_and_formatted_amounts() {
        let (_dir, conn) = test_db();
        let csv = "channel_type,cost_date,cost_amount\ncampaign,01/15/2026,\"$1,250.00\"\n";
        let result = import_csv(&conn, 1, csv, false).unwrap();
        assert_eq!(result.imported, 1);
        let entries = list_costs(&conn, 1, date("2026-01-01"), date("2026-01-31"), None).unwrap();
        assert_eq!(entries[0].cost_date, date("2026-01-15"));
        assert_eq!(entries[0].cost_amount, 1250.0);
    }

    #[test]
    fn test_delete_existing_clears_whole_date_span() {
        let (_dir, conn) = test_db();
        // Prior entries: one inside the new file's span (different channel),
        // one outside it.
        crate::store::insert_cost(
            &conn,
            &NewCost::new(1, Channel::Direct, date("2026-01-12"), 99.0),
        )
        .unwrap();
        crate::store::insert_cost(
            &conn,
            &NewCost::new(1, Channel::Search, date("2026-02-01"), 77.0),
        )
        .unwrap();

        let csv = "channel_type,cost_date,cost_amount\n\
                   search,2026-01-10,10.00\n\
                   social,2026-01-20,20.00\n";
        let result = import_csv(&conn, 1, csv, true).unwrap();
        assert_eq!(result.imported, 2);

        // The span [2026-01-10, 2026-01-20] holds exactly the new rows.
        let in_span = list_costs(&conn, 1, date("2026-01-10"), date("2026-01-20"), None).unwrap();
        assert_eq!(in_span.len(), result.imported);
        // The out-of-span entry survives.
        let feb = list_costs(&conn, 1, date("2026-02-01"), date("2026-02-28"), None).unwrap();
        assert_eq!(feb.len(), 1);
    }

    #[test]
    fn test_import_without_delete_existing_appends() {
        let (_dir, conn) = test_db();
        crate::store::insert_cost(
            &conn,
            &NewCost::new(1, Channel::Direct, date("2026-01-12"), 99.0),
        )
        .unwrap();
        let csv = "channel_type,cost_date,cost_amount\nsearch,2026-01-10,10.00\n";
        import_csv(&conn, 1, csv, false).unwrap();
        assert_eq!(count_costs(&conn, 1).unwrap(), 2);
    }
}
