//! Baseline dataset the simulator varies around.

use crate::model::{CampaignRecord, CampaignStatus, ChannelShare, MetricSnapshot, TrendPoint};

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const MONTHLY_REVENUE: [f64; 12] = [
    245000.0, 267000.0, 289000.0, 312000.0, 298000.0, 334000.0, 356000.0, 378000.0, 342000.0,
    389000.0, 412000.0, 445000.0,
];

const MONTHLY_USERS: [(u64, u64); 12] = [
    (45230, 8945),
    (52140, 9876),
    (48960, 10234),
    (61200, 11567),
    (58940, 10987),
    (67890, 12456),
    (72340, 13234),
    (79120, 14567),
    (74560, 13890),
    (83450, 15234),
    (89760, 16789),
    (94320, 17890),
];

pub fn metrics() -> MetricSnapshot {
    MetricSnapshot {
        revenue: 324750.0,
        users: 89234,
        conversions: 12847,
        growth_pct: 23.5,
    }
}

pub fn revenue_series() -> Vec<TrendPoint> {
    MONTHS
        .iter()
        .zip(MONTHLY_REVENUE)
        .map(|(name, value)| TrendPoint {
            name: name.to_string(),
            value,
            revenue: Some(value),
            users: None,
            conversions: None,
        })
        .collect()
}

pub fn user_growth_series() -> Vec<TrendPoint> {
    MONTHS
        .iter()
        .zip(MONTHLY_USERS)
        .map(|(name, (users, conversions))| TrendPoint {
            name: name.to_string(),
            value: users as f64,
            revenue: None,
            users: Some(users),
            conversions: Some(conversions),
        })
        .collect()
}

pub fn channels() -> Vec<ChannelShare> {
    [
        ("Google Ads", 35.0, 156250.0),
        ("Facebook Ads", 28.0, 125000.0),
        ("Instagram Ads", 18.0, 78750.0),
        ("LinkedIn Ads", 12.0, 52500.0),
        ("Twitter Ads", 7.0, 31250.0),
    ]
    .into_iter()
    .map(|(name, share, revenue)| ChannelShare {
        name: name.to_string(),
        share,
        revenue,
    })
    .collect()
}

#[allow(clippy::too_many_arguments)]
fn record(
    id: &str,
    campaign: &str,
    platform: &str,
    impressions: u64,
    clicks: u64,
    conversions: u64,
    revenue: f64,
    ctr: f64,
    cpa: f64,
    status: CampaignStatus,
) -> CampaignRecord {
    CampaignRecord {
        id: id.to_string(),
        campaign: campaign.to_string(),
        platform: platform.to_string(),
        impressions,
        clicks,
        conversions,
        revenue,
        ctr,
        cpa,
        status,
    }
}

/// The 8-row sample campaign table.
pub fn campaigns() -> Vec<CampaignRecord> {
    use CampaignStatus::*;
    vec![
        record("1", "Q4 Holiday Campaign", "Google Ads", 2456789, 124567, 3456, 89750.0, 5.07, 25.97, Active),
        record("2", "Brand Awareness Push", "Facebook Ads", 1876543, 98765, 2890, 67890.0, 5.26, 23.48, Active),
        record("3", "Product Launch Blitz", "Instagram Ads", 1543210, 87654, 2456, 56780.0, 5.68, 23.11, Completed),
        record("4", "Retargeting Campaign", "Google Ads", 987654, 65432, 1987, 45670.0, 6.62, 22.98, Active),
        record("5", "LinkedIn B2B Push", "LinkedIn Ads", 654321, 43210, 1543, 38950.0, 6.60, 25.24, Paused),
        record("6", "Video Ad Series", "YouTube Ads", 3210987, 156789, 4321, 98760.0, 4.88, 22.86, Active),
        record("7", "Mobile-First Campaign", "Facebook Ads", 1234567, 76543, 2109, 52340.0, 6.20, 24.82, Active),
        record("8", "Influencer Collaboration", "Instagram Ads", 876543, 54321, 1876, 43210.0, 6.20, 23.04, Completed),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_shapes() {
        assert_eq!(revenue_series().len(), 12);
        assert_eq!(user_growth_series().len(), 12);
        assert_eq!(channels().len(), 5);
        assert_eq!(campaigns().len(), 8);
    }

    #[test]
    fn test_campaign_ids_unique() {
        let records = campaigns();
        let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), records.len());
    }
}
