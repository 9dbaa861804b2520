use chrono::NaiveDate;

use crate::channel::Channel;

/// One recorded marketing expense, as stored in the ledger.
#[derive(Debug, Clone)]
pub struct CostEntry {
    pub id: i64,
    pub site_id: i64,
    pub channel: Channel,
    pub campaign_name: Option<String>,
    pub description: Option<String>,
    pub cost_date: NaiveDate,
    pub cost_amount: f64,
    pub currency: String,
    pub created_at: String,
    pub updated_at: Option<String>,
    pub deleted: bool,
}

/// Insert payload for a new ledger entry.
#[derive(Debug, Clone)]
pub struct NewCost {
    pub site_id: i64,
    pub channel: Channel,
    pub cost_date: NaiveDate,
    pub cost_amount: f64,
    pub currency: String,
    pub campaign_name: Option<String>,
    pub description: Option<String>,
}

impl NewCost {
    pub fn new(site_id: i64, channel: Channel, cost_date: NaiveDate, cost_amount: f64) -> Self {
        Self {
            site_id,
            channel,
            cost_date,
            cost_amount,
            currency: "USD".to_string(),
            campaign_name: None,
            description: None,
        }
    }
}

/// Partial update: only supplied fields are written.
#[derive(Debug, Clone, Default)]
pub struct CostPatch {
    pub channel: Option<Channel>,
    pub cost_date: Option<NaiveDate>,
    pub cost_amount: Option<f64>,
    pub currency: Option<String>,
    pub campaign_name: Option<String>,
    pub description: Option<String>,
}

impl CostPatch {
    pub fn is_empty(&self) -> bool {
        self.channel.is_none()
            && self.cost_date.is_none()
            && self.cost_amount.is_none()
            && self.currency.is_none()
            && self.campaign_name.is_none()
            && self.description.is_none()
    }
}

/// Aggregated spend for one (channel, currency) pair. Amounts in different
/// currencies are never summed together, so a channel can appear once per
/// currency.
#[derive(Debug, Clone)]
pub struct ChannelCost {
    pub channel: Channel,
    pub total: f64,
    pub currency: String,
}

/// Outcome of a CSV import. Transient, never persisted.
#[derive(Debug, Clone)]
pub struct ImportResult {
    pub success: bool,
    pub imported: usize,
    pub total_rows: usize,
    pub errors: Vec<String>,
}

/// Per-channel report row; revenue/roi/profit are present only when the
/// caller asked for ROI.
#[derive(Debug, Clone)]
pub struct ChannelReportRow {
    pub label: &'static str,
    pub channel: Channel,
    pub cost: f64,
    pub currency: String,
    pub revenue: Option<f64>,
    pub roi: Option<f64>,
    pub profit: Option<f64>,
}

/// One ledger entry as listed in the costs report.
#[derive(Debug, Clone)]
pub struct CostReportRow {
    pub date: NaiveDate,
    pub channel: Channel,
    pub channel_label: &'static str,
    pub campaign_name: Option<String>,
    pub cost: f64,
    pub currency: String,
}

/// Sitewide totals. ROI is recomputed from the totals, not summed across
/// channels.
#[derive(Debug, Clone)]
pub struct RoiSummary {
    pub total_cost: f64,
    pub total_revenue: f64,
    pub profit: f64,
    pub roi: f64,
}
