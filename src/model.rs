use serde::{Deserialize, Serialize};

// ============================================================================
// Dashboard data model
// ============================================================================

/// Top-line KPIs shown on the summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    pub revenue: f64,
    pub users: u64,
    pub conversions: u64,
    pub growth_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
}

/// One row of the campaign performance table.
///
/// `ctr` is always `clicks / impressions * 100` once a record has been through
/// the simulator. `cpa` is carried as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignRecord {
    pub id: String,
    pub campaign: String,
    pub platform: String,
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub revenue: f64,
    pub ctr: f64,
    pub cpa: f64,
    pub status: CampaignStatus,
}

impl CampaignRecord {
    pub fn computed_ctr(&self) -> f64 {
        if self.impressions == 0 {
            return 0.0;
        }
        self.clicks as f64 / self.impressions as f64 * 100.0
    }
}

/// A monthly point on a trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub name: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversions: Option<u64>,
}

/// An advertising channel's share of traffic (percent) and attributed revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelShare {
    pub name: String,
    pub share: f64,
    pub revenue: f64,
}
