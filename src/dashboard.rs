use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::model::{CampaignRecord, ChannelShare, MetricSnapshot, TrendPoint};
use crate::seed;
use crate::simulator::{MetricSimulator, SimulationClock};

/// Baseline series the trend and channel simulations vary around on every tick.
#[derive(Debug, Clone)]
pub struct Baseline {
    pub revenue_series: Vec<TrendPoint>,
    pub user_growth: Vec<TrendPoint>,
    pub channels: Vec<ChannelShare>,
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            revenue_series: seed::revenue_series(),
            user_growth: seed::user_growth_series(),
            channels: seed::channels(),
        }
    }
}

/// Everything the dashboard renders, committed as one unit per tick.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub metrics: MetricSnapshot,
    pub campaigns: Vec<CampaignRecord>,
    pub revenue_series: Vec<TrendPoint>,
    pub user_growth: Vec<TrendPoint>,
    pub channels: Vec<ChannelShare>,
    pub last_updated: DateTime<Utc>,
    pub tick_count: u64,
    #[serde(skip)]
    baseline: Baseline,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Dashboard {
    pub fn seeded() -> Self {
        let baseline = Baseline::default();
        Self {
            metrics: seed::metrics(),
            campaigns: seed::campaigns(),
            revenue_series: baseline.revenue_series.clone(),
            user_growth: baseline.user_growth.clone(),
            channels: baseline.channels.clone(),
            last_updated: Utc::now(),
            tick_count: 0,
            baseline,
        }
    }

    /// Apply one simulation tick to every dataset.
    ///
    /// KPIs and campaign rows evolve from their previous values; the trend and
    /// channel series are redrawn around the baseline.
    pub fn refresh<R: Rng + ?Sized>(
        &mut self,
        simulator: &MetricSimulator,
        rng: &mut R,
        clock: SimulationClock,
    ) {
        self.metrics = simulator.tick_metrics(&self.metrics, rng, clock);
        self.campaigns = simulator.tick_campaigns(&self.campaigns, rng);
        self.revenue_series = simulator.tick_revenue_series(&self.baseline.revenue_series, rng, clock);
        self.user_growth = simulator.tick_user_growth(&self.baseline.user_growth, rng);
        self.channels = simulator.tick_channels(&self.baseline.channels, rng);
        self.last_updated = Utc::now();
        self.tick_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_refresh_keeps_identities() {
        let mut dashboard = Dashboard::seeded();
        let ids_before: Vec<String> = dashboard.campaigns.iter().map(|c| c.id.clone()).collect();
        let mut rng = StdRng::seed_from_u64(11);
        let sim = MetricSimulator::default();
        for _ in 0..10 {
            dashboard.refresh(&sim, &mut rng, SimulationClock { hour: 10, month: 3 });
        }
        let ids_after: Vec<String> = dashboard.campaigns.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids_before, ids_after);
        assert_eq!(dashboard.tick_count, 10);
        assert_eq!(dashboard.revenue_series.len(), 12);
        assert_eq!(dashboard.channels.len(), 5);
    }

    #[test]
    fn test_baseline_not_serialized() {
        let json = serde_json::to_value(Dashboard::seeded()).unwrap();
        assert!(json.get("baseline").is_none());
        assert!(json.get("metrics").is_some());
    }
}
