use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{CostbookError, Result};
use crate::period::DateRange;

// ---------------------------------------------------------------------------
// Collaborator contracts
// ---------------------------------------------------------------------------

pub trait AccessControl {
    fn check_view(&self, site_id: i64) -> Result<()>;
    fn check_admin(&self, site_id: i64) -> Result<()>;
}

/// Single-operator CLI default: everything is allowed.
pub struct OpenAccess;

impl AccessControl for OpenAccess {
    fn check_view(&self, _site_id: i64) -> Result<()> {
        Ok(())
    }
    fn check_admin(&self, _site_id: i64) -> Result<()> {
        Ok(())
    }
}

/// One row of the visits-by-referrer-type breakdown. The numeric code is
/// optional; the label may be translated.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferrerVisits {
    #[serde(default)]
    pub referrer_type: Option<u32>,
    pub label: String,
    pub visits: u64,
}

/// Goal-conversion revenue tracked by the host analytics platform.
/// `Ok(None)` means the goals subsystem is absent, which callers treat
/// as zero revenue.
pub trait RevenueProvider {
    fn total_revenue(&self, site_id: i64, range: &DateRange) -> Result<Option<f64>>;
}

/// Visit counts broken down by referrer type. `Ok(None)` means no
/// breakdown is available.
pub trait VisitBreakdownProvider {
    fn visits_by_referrer_type(
        &self,
        site_id: i64,
        range: &DateRange,
    ) -> Result<Option<Vec<ReferrerVisits>>>;
}

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

/// The always-absent provider, used when no stats export was supplied.
pub struct NoStats;

impl RevenueProvider for NoStats {
    fn total_revenue(&self, _site_id: i64, _range: &DateRange) -> Result<Option<f64>> {
        Ok(None)
    }
}

impl VisitBreakdownProvider for NoStats {
    fn visits_by_referrer_type(
        &self,
        _site_id: i64,
        _range: &DateRange,
    ) -> Result<Option<Vec<ReferrerVisits>>> {
        Ok(None)
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SiteStats {
    #[serde(default)]
    pub goal_revenue: Option<f64>,
    #[serde(default)]
    pub referrer_types: Option<Vec<ReferrerVisits>>,
}

/// Per-site statistics exported from the analytics platform, keyed by
/// site id. The export is produced for the period being reported on, so
/// the query range is not re-checked here.
pub struct StatsFile {
    sites: HashMap<String, SiteStats>,
}

impl StatsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let sites: HashMap<String, SiteStats> = serde_json::from_str(content)
            .map_err(|e| CostbookError::Other(format!("Failed to parse stats file: {e}")))?;
        Ok(Self { sites })
    }

    fn site(&self, site_id: i64) -> Option<&SiteStats> {
        self.sites.get(&site_id.to_string())
    }
}

impl RevenueProvider for StatsFile {
    fn total_revenue(&self, site_id: i64, _range: &DateRange) -> Result<Option<f64>> {
        Ok(self.site(site_id).and_then(|s| s.goal_revenue))
    }
}

impl VisitBreakdownProvider for StatsFile {
    fn visits_by_referrer_type(
        &self,
        site_id: i64,
        _range: &DateRange,
    ) -> Result<Option<Vec<ReferrerVisits>>> {
        Ok(self.site(site_id).and_then(|s| s.referrer_types.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn any_range() -> DateRange {
        DateRange {
            start: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 1, 31).unwrap(),
        }
    }

    #[test]
    fn test_stats_file_parses_revenue_and_referrers() {
        let json = r#"{
            "1": {
                "goal_revenue": 1500.0,
                "referrer_types": [
                    {"referrer_type": 2, "label": "Search Engines", "visits": 120},
                    {"label": "Réseaux sociaux", "visits": 80}
                ]
            }
        }"#;
        let stats = StatsFile::from_json(json).unwrap();
        assert_eq!(stats.total_revenue(1, &any_range()).unwrap(), Some(1500.0));
        let rows = stats.visits_by_referrer_type(1, &any_range()).unwrap().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].referrer_type, Some(2));
        assert_eq!(rows[1].referrer_type, None);
        assert_eq!(rows[1].visits, 80);
    }

    #[test]
    fn test_stats_file_unknown_site_is_absent() {
        let stats = StatsFile::from_json(r#"{"1": {"goal_revenue": 10.0}}"#).unwrap();
        assert_eq!(stats.total_revenue(2, &any_range()).unwrap(), None);
        assert!(stats.visits_by_referrer_type(2, &any_range()).unwrap().is_none());
    }

    #[test]
    fn test_stats_file_partial_sections() {
        let stats = StatsFile::from_json(r#"{"1": {"goal_revenue": 10.0}}"#).unwrap();
        assert!(stats.visits_by_referrer_type(1, &any_range()).unwrap().is_none());
    }

    #[test]
    fn test_stats_file_rejects_malformed_json() {
        assert!(StatsFile::from_json("not json").is_err());
    }

    #[test]
    fn test_no_stats_is_always_absent() {
        assert_eq!(NoStats.total_revenue(1, &any_range()).unwrap(), None);
        assert!(NoStats.visits_by_referrer_type(1, &any_range()).unwrap().is_none());
    }
}
