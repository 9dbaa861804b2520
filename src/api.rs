use rusqlite::Connection;

use crate::attribution;
use crate::channel::{Channel, ALL_CHANNELS};
use crate::error::{CostbookError, Result};
use crate::importer;
use crate::models::{
    ChannelReportRow, CostEntry, CostPatch, CostReportRow, ImportResult, NewCost, RoiSummary,
};
use crate::period::{self, DateRange};
use crate::providers::{AccessControl, ReferrerVisits, RevenueProvider, VisitBreakdownProvider};
use crate::store;

/// Reporting facade over the cost ledger. Every operation checks access
/// first, then resolves the period once; provider failures are logged and
/// degrade to "no data" instead of surfacing.
pub struct CostAnalytics<'a> {
    conn: &'a Connection,
    access: &'a dyn AccessControl,
    revenue: &'a dyn RevenueProvider,
    visits: &'a dyn VisitBreakdownProvider,
}

impl<'a> CostAnalytics<'a> {
    pub fn new(
        conn: &'a Connection,
        access: &'a dyn AccessControl,
        revenue: &'a dyn RevenueProvider,
        visits: &'a dyn VisitBreakdownProvider,
    ) -> Self {
        Self { conn, access, revenue, visits }
    }

    // -----------------------------------------------------------------------
    // Reports
    // -----------------------------------------------------------------------

    pub fn costs_by_channel(
        &self,
        site_id: i64,
        period: &str,
        date: &str,
        include_roi: bool,
    ) -> Result<Vec<ChannelReportRow>> {
        self.access.check_view(site_id)?;
        let range = period::resolve(period, date)?;

        let sums = store::sum_by_channel(self.conn, site_id, range.start, range.end)?;

        let attributed = if include_roi {
            let channels_with_cost: Vec<Channel> = sums.iter().map(|c| c.channel).collect();
            Some(self.attributed_revenues(site_id, &range, &channels_with_cost))
        } else {
            None
        };

        Ok(sums
            .into_iter()
            .map(|sum| {
                let revenue = attributed.as_ref().map(|map| map[&sum.channel]);
                ChannelReportRow {
                    label: sum.channel.label(),
                    channel: sum.channel,
                    cost: sum.total,
                    currency: sum.currency,
                    revenue,
                    roi: revenue.map(|r| attribution::roi(sum.total, r)),
                    profit: revenue.map(|r| r - sum.total),
                }
            })
            .collect())
    }

    pub fn costs(
        &self,
        site_id: i64,
        period: &str,
        date: &str,
        channel: Option<Channel>,
    ) -> Result<Vec<CostReportRow>> {
        self.access.check_view(site_id)?;
        let range = period::resolve(period, date)?;
        let entries = store::list_costs(self.conn, site_id, range.start, range.end, channel)?;
        Ok(entries
            .into_iter()
            .map(|e| CostReportRow {
                date: e.cost_date,
                channel: e.channel,
                channel_label: e.channel.label(),
                campaign_name: e.campaign_name,
                cost: e.cost_amount,
                currency: e.currency,
            })
            .collect())
    }

    /// Sitewide ROI, recomputed from total cost and total revenue. ROI is
    /// not additive across channels, so this never sums per-channel ROIs.
    pub fn roi_summary(&self, site_id: i64, period: &str, date: &str) -> Result<RoiSummary> {
        self.access.check_view(site_id)?;
        let range = period::resolve(period, date)?;
        let total_cost = store::sum_total(self.conn, site_id, range.start, range.end)?;
        let total_revenue = self.total_revenue_or_zero(site_id, &range);
        Ok(RoiSummary {
            total_cost,
            total_revenue,
            profit: total_revenue - total_cost,
            roi: attribution::roi(total_cost, total_revenue),
        })
    }

    // -----------------------------------------------------------------------
    // Ledger management
    // -----------------------------------------------------------------------

    /// Strict manual entry: any invalid field aborts the operation.
    #[allow(clippy::too_many_arguments)]
    pub fn add_cost(
        &self,
        site_id: i64,
        channel: &str,
        cost_date: &str,
        cost_amount: f64,
        currency: Option<String>,
        campaign_name: Option<String>,
        description: Option<String>,
    ) -> Result<i64> {
        self.access.check_admin(site_id)?;
        let channel = Channel::parse_code(channel)?;
        let cost_date = importer::parse_cost_date(cost_date).ok_or_else(|| {
            CostbookError::Validation(format!("Invalid date format '{cost_date}'"))
        })?;
        let cost = NewCost {
            site_id,
            channel,
            cost_date,
            cost_amount,
            currency: currency.unwrap_or_else(|| "USD".to_string()),
            campaign_name,
            description,
        };
        store::insert_cost(self.conn, &cost)
    }

    pub fn update_cost(&self, site_id: i64, id: i64, patch: &CostPatch) -> Result<bool> {
        self.access.check_admin(site_id)?;
        store::update_cost(self.conn, site_id, id, patch)?;
        Ok(true)
    }

    pub fn delete_cost(&self, site_id: i64, id: i64) -> Result<bool> {
        self.access.check_admin(site_id)?;
        match store::get_cost(self.conn, id)? {
            Some(e) if e.site_id == site_id => {}
            _ => return Err(CostbookError::NotFound(id)),
        }
        store::soft_delete_cost(self.conn, id)?;
        Ok(true)
    }

    pub fn all_costs(
        &self,
        site_id: i64,
        limit: i64,
        offset: i64,
        order_by: &str,
        order_dir: &str,
    ) -> Result<(Vec<CostEntry>, i64)> {
        self.access.check_admin(site_id)?;
        let entries =
            store::list_all_costs(self.conn, site_id, limit, offset, order_by, order_dir)?;
        let total = store::count_costs(self.conn, site_id)?;
        Ok((entries, total))
    }

    pub fn import_csv(
        &self,
        site_id: i64,
        csv_data: &str,
        delete_existing: bool,
    ) -> Result<ImportResult> {
        self.access.check_admin(site_id)?;
        importer::import_csv(self.conn, site_id, csv_data, delete_existing)
    }

    pub fn channel_types(&self) -> Vec<(&'static str, &'static str)> {
        ALL_CHANNELS.iter().map(|c| (c.code(), c.label())).collect()
    }

    // -----------------------------------------------------------------------
    // Provider access (failures collapse to "no data")
    // -----------------------------------------------------------------------

    fn total_revenue_or_zero(&self, site_id: i64, range: &DateRange) -> f64 {
        match self.revenue.total_revenue(site_id, range) {
            Ok(Some(v)) => v,
            Ok(None) => 0.0,
            Err(e) => {
                log::warn!("revenue provider failed for site {site_id}: {e}");
                0.0
            }
        }
    }

    fn visit_breakdown(&self, site_id: i64, range: &DateRange) -> Option<Vec<ReferrerVisits>> {
        match self.visits.visits_by_referrer_type(site_id, range) {
            Ok(v) => v,
            Err(e) => {
                log::warn!("visit breakdown provider failed for site {site_id}: {e}");
                None
            }
        }
    }

    fn attributed_revenues(
        &self,
        site_id: i64,
        range: &DateRange,
        channels_with_cost: &[Channel],
    ) -> std::collections::BTreeMap<Channel, f64> {
        let total_revenue = self.total_revenue_or_zero(site_id, range);
        let breakdown = self.visit_breakdown(site_id, range);
        attribution::attribute_revenue(total_revenue, breakdown.as_deref(), channels_with_cost)
    }
}
