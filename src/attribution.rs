use std::collections::{BTreeMap, BTreeSet};

use crate::channel::{self, Channel, ALL_CHANNELS};
use crate::providers::ReferrerVisits;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Return on investment in percent. Zero cost is special-cased: free
/// revenue is capped at 100, and no activity at all is 0.
pub fn roi(cost: f64, revenue: f64) -> f64 {
    if cost == 0.0 {
        if revenue > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        round2((revenue - cost) / cost * 100.0)
    }
}

/// Resolve one breakdown row to a channel. An explicit referrer-type code
/// wins outright (an unknown code excludes the row, even if the label
/// would match); otherwise a purely numeric label is read as the code;
/// otherwise the translated label is matched against the phrase table.
fn resolve_channel(row: &ReferrerVisits) -> Option<Channel> {
    if let Some(code) = row.referrer_type {
        return Channel::from_referrer_code(code);
    }
    let label = row.label.trim();
    if !label.is_empty() && label.chars().all(|c| c.is_ascii_digit()) {
        if let Ok(code) = label.parse::<u32>() {
            return Channel::from_referrer_code(code);
        }
    }
    channel::match_label(label)
}

/// Distribute an aggregate revenue figure across the five channels.
///
/// Proportional-by-visits when a usable breakdown exists; otherwise an
/// equal split over the channels that carry cost, or over all five when
/// none do. Always returns all five keys, zero-filled. Pure function;
/// provider failures are collapsed to `breakdown = None` by the caller.
pub fn attribute_revenue(
    total_revenue: f64,
    breakdown: Option<&[ReferrerVisits]>,
    channels_with_cost: &[Channel],
) -> BTreeMap<Channel, f64> {
    let mut revenues: BTreeMap<Channel, f64> =
        ALL_CHANNELS.iter().map(|c| (*c, 0.0)).collect();
    if total_revenue <= 0.0 {
        return revenues;
    }

    let mut distributed = false;
    if let Some(rows) = breakdown {
        let mut visits_by_channel: BTreeMap<Channel, u64> = BTreeMap::new();
        let mut total_visits = 0u64;
        for row in rows {
            if let Some(ch) = resolve_channel(row) {
                *visits_by_channel.entry(ch).or_default() += row.visits;
                total_visits += row.visits;
            }
        }
        if total_visits > 0 {
            for (ch, visits) in &visits_by_channel {
                let share = *visits as f64 / total_visits as f64 * total_revenue;
                revenues.insert(*ch, round2(share));
            }
            distributed = true;
        }
    }

    if !distributed {
        let targets: BTreeSet<Channel> = if channels_with_cost.is_empty() {
            ALL_CHANNELS.iter().copied().collect()
        } else {
            channels_with_cost.iter().copied().collect()
        };
        let per_channel = round2(total_revenue / targets.len() as f64);
        for ch in targets {
            revenues.insert(ch, per_channel);
        }
    }

    revenues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(referrer_type: Option<u32>, label: &str, visits: u64) -> ReferrerVisits {
        ReferrerVisits {
            referrer_type,
            label: label.to_string(),
            visits,
        }
    }

    #[test]
    fn test_roi_zero_cost() {
        assert_eq!(roi(0.0, 0.0), 0.0);
        assert_eq!(roi(0.0, 500.0), 100.0);
    }

    #[test]
    fn test_roi_total_loss_only_at_zero_revenue() {
        assert_eq!(roi(100.0, 0.0), -100.0);
        assert_eq!(roi(0.01, 0.0), -100.0);
        assert!(roi(100.0, 0.01) > -100.0);
    }

    #[test]
    fn test_roi_break_even_and_gain() {
        assert_eq!(roi(100.0, 100.0), 0.0);
        assert_eq!(roi(200.0, 300.0), 50.0);
        assert_eq!(roi(50.0, 25.0), -50.0);
    }

    #[test]
    fn test_roi_rounds_to_two_decimals() {
        assert_eq!(roi(3.0, 10.0), 233.33);
    }

    #[test]
    fn test_attribution_proportional_by_visits() {
        let rows = vec![row(None, "Search Engines", 30), row(None, "Social Networks", 70)];
        let map = attribute_revenue(1000.0, Some(&rows), &[]);
        assert_eq!(map[&Channel::Search], 300.0);
        assert_eq!(map[&Channel::Social], 700.0);
        assert_eq!(map[&Channel::Direct], 0.0);
        assert_eq!(map[&Channel::Website], 0.0);
        assert_eq!(map[&Channel::Campaign], 0.0);
        let sum: f64 = map.values().sum();
        assert!((sum - 1000.0).abs() <= 0.05);
    }

    #[test]
    fn test_attribution_resolves_codes_and_numeric_labels() {
        let rows = vec![
            row(Some(1), "whatever", 10),
            row(None, "2", 10),
            row(None, "réseaux sociaux", 20),
        ];
        let map = attribute_revenue(400.0, Some(&rows), &[]);
        assert_eq!(map[&Channel::Direct], 100.0);
        assert_eq!(map[&Channel::Search], 100.0);
        assert_eq!(map[&Channel::Social], 200.0);
    }

    #[test]
    fn test_attribution_excludes_unresolved_rows_entirely() {
        // The unknown row must not dilute the denominator.
        let rows = vec![row(None, "Search Engines", 50), row(None, "newsletter", 950)];
        let map = attribute_revenue(100.0, Some(&rows), &[]);
        assert_eq!(map[&Channel::Search], 100.0);
    }

    #[test]
    fn test_attribution_explicit_unknown_code_beats_label() {
        let rows = vec![row(Some(9), "search", 100)];
        let map = attribute_revenue(100.0, Some(&rows), &[Channel::Direct]);
        // No row resolved, so the cost-channel fallback applies.
        assert_eq!(map[&Channel::Search], 0.0);
        assert_eq!(map[&Channel::Direct], 100.0);
    }

    #[test]
    fn test_attribution_zero_revenue_is_all_zeros() {
        let rows = vec![row(None, "Search Engines", 30)];
        let map = attribute_revenue(0.0, Some(&rows), &[Channel::Search]);
        assert!(map.values().all(|v| *v == 0.0));
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_attribution_fallback_splits_over_cost_channels() {
        let map = attribute_revenue(900.0, None, &[Channel::Search, Channel::Direct]);
        assert_eq!(map[&Channel::Search], 450.0);
        assert_eq!(map[&Channel::Direct], 450.0);
        assert_eq!(map[&Channel::Social], 0.0);
        assert_eq!(map[&Channel::Website], 0.0);
        assert_eq!(map[&Channel::Campaign], 0.0);
    }

    #[test]
    fn test_attribution_empty_breakdown_uses_fallback() {
        let map = attribute_revenue(900.0, Some(&[]), &[Channel::Search, Channel::Direct]);
        assert_eq!(map[&Channel::Search], 450.0);
        assert_eq!(map[&Channel::Direct], 450.0);
    }

    #[test]
    fn test_attribution_fallback_over_all_channels() {
        let map = attribute_revenue(1000.0, None, &[]);
        for channel in ALL_CHANNELS {
            assert_eq!(map[channel], 200.0);
        }
    }

    #[test]
    fn test_attribution_fallback_dedupes_cost_channels() {
        // A channel with spend in two currencies appears twice in the
        // cost set; the split is still over distinct channels.
        let map = attribute_revenue(900.0, None, &[Channel::Search, Channel::Search]);
        assert_eq!(map[&Channel::Search], 900.0);
    }

    #[test]
    fn test_attribution_rounding_residue_is_small() {
        let rows = vec![
            row(None, "search", 1),
            row(None, "social", 1),
            row(None, "website", 1),
        ];
        let map = attribute_revenue(100.0, Some(&rows), &[]);
        for ch in [Channel::Search, Channel::Social, Channel::Website] {
            assert_eq!(map[&ch], 33.33);
        }
        let sum: f64 = map.values().sum();
        assert!((sum - 100.0).abs() <= 0.03);
    }
}
