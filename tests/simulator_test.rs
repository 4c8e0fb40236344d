use rand::rngs::StdRng;
use rand::SeedableRng;

use campaign_insights::config::BusinessHours;
use campaign_insights::dashboard::Dashboard;
use campaign_insights::model::{CampaignRecord, CampaignStatus};
use campaign_insights::seed;
use campaign_insights::simulator::*;

const MIDDAY: SimulationClock = SimulationClock { hour: 12, month: 6 };
const NIGHT: SimulationClock = SimulationClock { hour: 2, month: 6 };

fn small_record() -> CampaignRecord {
    CampaignRecord {
        impressions: 1000,
        clicks: 100,
        revenue: 500.0,
        ctr: 10.0,
        ..seed::campaigns()[0].clone()
    }
}

#[test]
fn test_campaign_invariants_hold_over_many_ticks() {
    let sim = MetricSimulator::new(BusinessHours::default());
    let mut rng = StdRng::seed_from_u64(42);
    let mut records = seed::campaigns();
    records.push(small_record());

    for _ in 0..500 {
        records = sim.tick_campaigns(&records, &mut rng);
        for r in &records {
            assert!(r.impressions >= MIN_IMPRESSIONS);
            assert!(r.clicks >= MIN_CLICKS);
            assert!(r.clicks <= r.impressions);
            assert!(r.revenue >= MIN_CAMPAIGN_REVENUE);
            assert!(r.ctr >= MIN_CTR && r.ctr <= MAX_CTR, "ctr {} out of range", r.ctr);
            assert!((r.ctr - r.computed_ctr()).abs() < 1e-9);
            assert_ne!(r.status, CampaignStatus::Completed);
        }
    }
}

#[test]
fn test_small_record_stays_bounded() {
    let sim = MetricSimulator::default();
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..200 {
        let next = sim.tick_campaigns(&[small_record()], &mut rng);
        let r = &next[0];
        assert!(r.impressions >= 1000);
        assert!(r.clicks >= 10);
        assert!(r.revenue >= 100.0);
        assert!(r.ctr >= 0.1 && r.ctr <= 15.0);
        assert_eq!(r.id, "1");
        assert_eq!(r.campaign, "Q4 Holiday Campaign");
        assert_eq!(r.conversions, small_record().conversions);
    }
}

#[test]
fn test_metric_floors_and_growth_clamp() {
    let sim = MetricSimulator::default();
    let mut rng = StdRng::seed_from_u64(3);
    let mut metrics = seed::metrics();

    for i in 0..1000 {
        let clock = if i % 2 == 0 { MIDDAY } else { NIGHT };
        metrics = sim.tick_metrics(&metrics, &mut rng, clock);
        assert!(metrics.revenue >= 0.0);
        assert!(metrics.users >= MIN_USERS);
        assert!(metrics.conversions >= MIN_CONVERSIONS);
        assert!(metrics.growth_pct >= MIN_GROWTH_PCT && metrics.growth_pct <= MAX_GROWTH_PCT);
    }
}

#[test]
fn test_time_of_day_multiplier() {
    let sim = MetricSimulator::default();
    assert_eq!(sim.time_of_day_multiplier(MIDDAY), 1.2);
    assert_eq!(sim.time_of_day_multiplier(NIGHT), 0.8);
    assert_eq!(sim.time_of_day_multiplier(SimulationClock { hour: 17, month: 1 }), 1.2);
}

#[test]
fn test_channels_ranked_and_floored() {
    let sim = MetricSimulator::default();
    let mut rng = StdRng::seed_from_u64(99);
    let baseline = seed::channels();

    for _ in 0..200 {
        let channels = sim.tick_channels(&baseline, &mut rng);
        assert_eq!(channels.len(), baseline.len());
        assert!(channels.windows(2).all(|w| w[0].share >= w[1].share));
        assert!(channels.iter().all(|c| c.share >= MIN_CHANNEL_SHARE));
    }
}

#[test]
fn test_december_boost_does_not_compound() {
    let mut dashboard = Dashboard::seeded();
    let sim = MetricSimulator::default();
    let mut rng = StdRng::seed_from_u64(5);
    let december = SimulationClock { hour: 12, month: 12 };
    let baseline_max = seed::revenue_series()
        .iter()
        .map(|p| p.value)
        .fold(0.0, f64::max);

    for _ in 0..50 {
        dashboard.refresh(&sim, &mut rng, december);
    }

    // One boost on top of a +-15% spread, never more
    let ceiling = baseline_max * 1.15 * 1.5 + 1.0;
    assert!(dashboard.revenue_series.iter().all(|p| p.value <= ceiling));
    assert_eq!(dashboard.tick_count, 50);
}

#[test]
fn test_status_draw_bands() {
    assert_eq!(status_for_draw(0.95), CampaignStatus::Active);
    assert_eq!(status_for_draw(0.5), CampaignStatus::Paused);
    assert_eq!(status_for_draw(0.7), CampaignStatus::Paused);
    assert_eq!(status_for_draw(0.1), CampaignStatus::Active);
}
