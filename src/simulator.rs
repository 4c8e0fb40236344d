//! Bounded pseudo-random variation of the dashboard datasets.
//!
//! Every operation is a pure function of its inputs, the random source handed
//! in, and a [`SimulationClock`]. Nothing here fails: out-of-range values are
//! clamped back into their documented bounds.

use chrono::{Datelike, Timelike};
use rand::Rng;

use crate::config::{BusinessHours, BUSINESS_HOURS_MULTIPLIER, OFF_HOURS_MULTIPLIER};
use crate::model::{CampaignRecord, CampaignStatus, ChannelShare, MetricSnapshot, TrendPoint};

pub const MIN_USERS: u64 = 1000;
pub const MIN_CONVERSIONS: u64 = 50;
pub const MIN_GROWTH_PCT: f64 = 5.0;
pub const MAX_GROWTH_PCT: f64 = 35.0;

pub const MIN_IMPRESSIONS: u64 = 1000;
pub const MIN_CLICKS: u64 = 10;
pub const MIN_CAMPAIGN_REVENUE: f64 = 100.0;
pub const MIN_CTR: f64 = 0.1;
pub const MAX_CTR: f64 = 15.0;
pub const MIN_CHANNEL_SHARE: f64 = 2.0;

// Spreads are the full width of the uniform draw: value * (1 + (r - 0.5) * spread).
const REVENUE_SWING: f64 = 10_000.0;
const USERS_SWING: f64 = 500.0;
const CONVERSIONS_SWING: f64 = 50.0;
const GROWTH_SWING: f64 = 5.0;
const IMPRESSIONS_SPREAD: f64 = 0.20;
const CLICKS_SPREAD: f64 = 0.15;
const CAMPAIGN_REVENUE_SPREAD: f64 = 0.25;
const REVENUE_SERIES_SPREAD: f64 = 0.3;
const USER_GROWTH_SPREAD: f64 = 0.4;
const USER_GROWTH_TREND_STEP: f64 = 0.02;
const USER_CONVERSION_RATE: f64 = 0.2;
const CHANNEL_SPREAD: f64 = 0.3;
const YEAR_END_BOOST: f64 = 1.5;

/// Wall-clock inputs to the simulation, passed explicitly so ticks are reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulationClock {
    /// Hour of day, 0-23.
    pub hour: u32,
    /// Month of year, 1-12.
    pub month: u32,
}

impl SimulationClock {
    pub fn now() -> Self {
        let now = chrono::Local::now();
        Self {
            hour: now.hour(),
            month: now.month(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetricSimulator {
    business_hours: BusinessHours,
}

impl MetricSimulator {
    pub fn new(business_hours: BusinessHours) -> Self {
        Self { business_hours }
    }

    pub fn time_of_day_multiplier(&self, clock: SimulationClock) -> f64 {
        if self.business_hours.contains(clock.hour) {
            BUSINESS_HOURS_MULTIPLIER
        } else {
            OFF_HOURS_MULTIPLIER
        }
    }

    pub fn tick_metrics<R: Rng + ?Sized>(
        &self,
        previous: &MetricSnapshot,
        rng: &mut R,
        clock: SimulationClock,
    ) -> MetricSnapshot {
        let m = self.time_of_day_multiplier(clock);

        let revenue = (previous.revenue + centered(rng) * REVENUE_SWING * m).max(0.0);
        let users = offset_floor(previous.users, centered(rng) * USERS_SWING * m, MIN_USERS);
        let conversions = offset_floor(
            previous.conversions,
            centered(rng) * CONVERSIONS_SWING * m,
            MIN_CONVERSIONS,
        );
        let growth_pct = (previous.growth_pct + centered(rng) * GROWTH_SWING)
            .clamp(MIN_GROWTH_PCT, MAX_GROWTH_PCT);

        MetricSnapshot {
            revenue,
            users,
            conversions,
            growth_pct,
        }
    }

    /// Perturb every record in place of its previous values. Identity fields are kept.
    pub fn tick_campaigns<R: Rng + ?Sized>(
        &self,
        previous: &[CampaignRecord],
        rng: &mut R,
    ) -> Vec<CampaignRecord> {
        previous
            .iter()
            .map(|record| {
                let status = status_for_draw(rng.random::<f64>());

                let impressions =
                    (spread(record.impressions as f64, IMPRESSIONS_SPREAD, rng).round() as u64)
                        .max(MIN_IMPRESSIONS);
                let clicks = (spread(record.clicks as f64, CLICKS_SPREAD, rng).round() as u64)
                    .max(MIN_CLICKS);
                let revenue = spread(record.revenue, CAMPAIGN_REVENUE_SPREAD, rng)
                    .round()
                    .max(MIN_CAMPAIGN_REVENUE);

                let clicks = bound_clicks(clicks, impressions);
                let ctr = (clicks as f64 / impressions as f64 * 100.0).clamp(MIN_CTR, MAX_CTR);

                CampaignRecord {
                    impressions,
                    clicks,
                    revenue,
                    ctr,
                    status,
                    ..record.clone()
                }
            })
            .collect()
    }

    /// Vary each month around `baseline`, with a year-end boost in December.
    pub fn tick_revenue_series<R: Rng + ?Sized>(
        &self,
        baseline: &[TrendPoint],
        rng: &mut R,
        clock: SimulationClock,
    ) -> Vec<TrendPoint> {
        let seasonal = if clock.month == 12 { YEAR_END_BOOST } else { 1.0 };
        baseline
            .iter()
            .map(|point| {
                let value = (spread(point.value, REVENUE_SERIES_SPREAD, rng) * seasonal)
                    .round()
                    .max(0.0);
                TrendPoint {
                    value,
                    revenue: Some(value),
                    ..point.clone()
                }
            })
            .collect()
    }

    pub fn tick_user_growth<R: Rng + ?Sized>(
        &self,
        baseline: &[TrendPoint],
        rng: &mut R,
    ) -> Vec<TrendPoint> {
        baseline
            .iter()
            .enumerate()
            .map(|(index, point)| {
                let trend = 1.0 + index as f64 * USER_GROWTH_TREND_STEP;
                let value = (spread(point.value, USER_GROWTH_SPREAD, rng) * trend)
                    .round()
                    .max(0.0);
                TrendPoint {
                    value,
                    users: Some(value as u64),
                    conversions: Some((value * USER_CONVERSION_RATE).round() as u64),
                    ..point.clone()
                }
            })
            .collect()
    }

    /// Vary share and revenue independently, then keep the list ranked by share.
    pub fn tick_channels<R: Rng + ?Sized>(
        &self,
        baseline: &[ChannelShare],
        rng: &mut R,
    ) -> Vec<ChannelShare> {
        let mut channels: Vec<ChannelShare> = baseline
            .iter()
            .map(|channel| ChannelShare {
                name: channel.name.clone(),
                share: spread(channel.share, CHANNEL_SPREAD, rng)
                    .max(MIN_CHANNEL_SHARE)
                    .round(),
                revenue: spread(channel.revenue, CHANNEL_SPREAD, rng).round().max(0.0),
            })
            .collect();
        channels.sort_by(|a, b| b.share.total_cmp(&a.share));
        channels
    }
}

/// Status re-assignment from one uniform draw.
///
/// Only `(0.3, 0.7]` maps to paused; both tails map to active. The low tail is
/// kept as observed in the reference dashboard.
pub fn status_for_draw(p: f64) -> CampaignStatus {
    if p > 0.7 {
        CampaignStatus::Active
    } else if p > 0.3 {
        CampaignStatus::Paused
    } else {
        CampaignStatus::Active
    }
}

/// Clamp clicks so the recomputed CTR lands in `[MIN_CTR, MAX_CTR]`.
/// Also guarantees `clicks <= impressions`.
fn bound_clicks(clicks: u64, impressions: u64) -> u64 {
    let imps = impressions as f64;
    let lo = (imps * MIN_CTR / 100.0).ceil() as u64;
    let hi = (imps * MAX_CTR / 100.0).floor() as u64;
    clicks.clamp(lo, hi.max(lo))
}

fn centered<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.random::<f64>() - 0.5
}

fn spread<R: Rng + ?Sized>(value: f64, width: f64, rng: &mut R) -> f64 {
    value * (1.0 + centered(rng) * width)
}

fn offset_floor(value: u64, delta: f64, floor: u64) -> u64 {
    let shifted = value as f64 + delta.floor();
    if shifted <= floor as f64 {
        floor
    } else {
        shifted as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BUSINESS_NOON: SimulationClock = SimulationClock { hour: 12, month: 6 };
    const NIGHT: SimulationClock = SimulationClock { hour: 3, month: 6 };

    #[test]
    fn test_multiplier_follows_business_hours() {
        let sim = MetricSimulator::default();
        assert_eq!(sim.time_of_day_multiplier(BUSINESS_NOON), 1.2);
        assert_eq!(sim.time_of_day_multiplier(NIGHT), 0.8);
        assert_eq!(sim.time_of_day_multiplier(SimulationClock { hour: 9, month: 1 }), 1.2);
        assert_eq!(sim.time_of_day_multiplier(SimulationClock { hour: 17, month: 1 }), 1.2);
        assert_eq!(sim.time_of_day_multiplier(SimulationClock { hour: 18, month: 1 }), 0.8);
    }

    #[test]
    fn test_custom_business_hours() {
        let sim = MetricSimulator::new(BusinessHours {
            start_hour: 0,
            end_hour: 4,
        });
        assert_eq!(sim.time_of_day_multiplier(NIGHT), 1.2);
        assert_eq!(sim.time_of_day_multiplier(BUSINESS_NOON), 0.8);
    }

    #[test]
    fn test_metric_floors_hold_from_below() {
        let sim = MetricSimulator::default();
        let mut rng = StdRng::seed_from_u64(1);
        let low = MetricSnapshot {
            revenue: 0.0,
            users: 0,
            conversions: 0,
            growth_pct: -100.0,
        };
        let next = sim.tick_metrics(&low, &mut rng, NIGHT);
        assert!(next.revenue >= 0.0);
        assert!(next.users >= MIN_USERS);
        assert!(next.conversions >= MIN_CONVERSIONS);
        assert_eq!(next.growth_pct, MIN_GROWTH_PCT);
    }

    #[test]
    fn test_metric_swing_is_bounded() {
        let sim = MetricSimulator::default();
        let mut rng = StdRng::seed_from_u64(2);
        let base = crate::seed::metrics();
        for _ in 0..200 {
            let next = sim.tick_metrics(&base, &mut rng, BUSINESS_NOON);
            assert!((next.revenue - base.revenue).abs() <= 6000.0);
            assert!((next.users as f64 - base.users as f64).abs() <= 301.0);
            assert!((next.conversions as f64 - base.conversions as f64).abs() <= 31.0);
        }
    }

    #[test]
    fn test_status_thresholds() {
        assert_eq!(status_for_draw(0.0), CampaignStatus::Active);
        assert_eq!(status_for_draw(0.3), CampaignStatus::Active);
        assert_eq!(status_for_draw(0.31), CampaignStatus::Paused);
        assert_eq!(status_for_draw(0.7), CampaignStatus::Paused);
        assert_eq!(status_for_draw(0.71), CampaignStatus::Active);
        assert_eq!(status_for_draw(0.99), CampaignStatus::Active);
    }

    #[test]
    fn test_bound_clicks() {
        // 20% CTR is pulled down to 15%
        assert_eq!(bound_clicks(200, 1000), 150);
        // 0.01% CTR is pulled up to 0.1%
        assert_eq!(bound_clicks(1, 100_000), 100);
        assert_eq!(bound_clicks(50, 1000), 50);
    }

    #[test]
    fn test_year_end_boost() {
        let sim = MetricSimulator::default();
        let baseline = crate::seed::revenue_series();
        let mut rng = StdRng::seed_from_u64(3);
        let december = sim.tick_revenue_series(&baseline, &mut rng, SimulationClock { hour: 12, month: 12 });
        for (point, base) in december.iter().zip(&baseline) {
            // 1.5 * (1 - 0.15) is the smallest possible factor
            assert!(point.value >= (base.value * 1.275).floor());
            assert_eq!(point.revenue, Some(point.value));
        }
    }

    #[test]
    fn test_user_growth_conversions_track_users() {
        let sim = MetricSimulator::default();
        let mut rng = StdRng::seed_from_u64(4);
        let series = sim.tick_user_growth(&crate::seed::user_growth_series(), &mut rng);
        assert_eq!(series.len(), 12);
        for point in &series {
            let users = point.users.unwrap();
            assert_eq!(users as f64, point.value);
            assert_eq!(point.conversions, Some((point.value * 0.2).round() as u64));
        }
    }
}
