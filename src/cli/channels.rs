use comfy_table::Table;

use crate::api::CostAnalytics;
use crate::error::Result;
use crate::providers::{NoStats, OpenAccess};

pub fn run() -> Result<()> {
    let conn = super::open_db()?;
    let api = CostAnalytics::new(&conn, &OpenAccess, &NoStats, &NoStats);

    let mut table = Table::new();
    table.set_header(vec!["Code", "Label"]);
    for (code, label) in api.channel_types() {
        table.add_row(vec![code, label]);
    }
    println!("Channels\n{table}");
    Ok(())
}
