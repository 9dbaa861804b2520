use colored::Colorize;

use crate::api::CostAnalytics;
use crate::error::Result;
use crate::providers::{NoStats, OpenAccess};

pub fn run(file: &str, site: Option<i64>, delete_existing: bool) -> Result<()> {
    let csv_data = std::fs::read_to_string(file)?;
    let conn = super::open_db()?;
    let api = CostAnalytics::new(&conn, &OpenAccess, &NoStats, &NoStats);
    let site = super::site_or_default(site);

    if delete_existing {
        println!(
            "{}",
            "Replacing existing entries in the imported date span (all channels)."
                .yellow()
        );
    }

    let result = api.import_csv(site, &csv_data, delete_existing)?;

    if result.success {
        println!("{} of {} rows imported", result.imported, result.total_rows);
    } else {
        println!("{}", "No rows imported".red());
    }
    for error in &result.errors {
        println!("  {}", error.red());
    }
    Ok(())
}
