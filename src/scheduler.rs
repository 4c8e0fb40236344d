//! Periodic and on-demand dashboard refresh with an explicit lifecycle.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::activity::{ActivityLevel, ActivityLog, ActivitySource};
use crate::dashboard::Dashboard;
use crate::simulator::{MetricSimulator, SimulationClock};

struct RefreshCore {
    dashboard: Arc<RwLock<Dashboard>>,
    simulator: MetricSimulator,
    updates: broadcast::Sender<Dashboard>,
    activity: Arc<ActivityLog>,
}

/// Owns the refresh timer. `start` spawns it, `stop` (or drop) aborts it.
/// `trigger` runs a tick immediately whether or not the timer is running.
pub struct RefreshScheduler {
    core: Arc<RefreshCore>,
    interval: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl RefreshScheduler {
    pub fn new(
        dashboard: Arc<RwLock<Dashboard>>,
        simulator: MetricSimulator,
        interval: Duration,
        updates: broadcast::Sender<Dashboard>,
        activity: Arc<ActivityLog>,
    ) -> Self {
        Self {
            core: Arc::new(RefreshCore {
                dashboard,
                simulator,
                updates,
                activity,
            }),
            interval,
            handle: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the periodic task. A no-op if it is already running.
    pub fn start(&self) {
        let mut handle = self.handle.lock().unwrap_or_else(|e| e.into_inner());
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return;
        }

        let core = self.core.clone();
        let period = self.interval;
        info!("Refresh scheduler started ({}s interval)", period.as_secs());
        *handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                apply_tick(&core, "scheduled").await;
            }
        }));
    }

    pub fn stop(&self) {
        let mut handle = self.handle.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(h) = handle.take() {
            h.abort();
            info!("Refresh scheduler stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|h| !h.is_finished())
    }

    /// Manual refresh. Overlapping ticks each commit in full; the later one wins.
    pub async fn trigger(&self) -> Dashboard {
        apply_tick(&self.core, "manual").await
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        if let Ok(mut handle) = self.handle.lock() {
            if let Some(h) = handle.take() {
                h.abort();
            }
        }
    }
}

async fn apply_tick(core: &RefreshCore, origin: &str) -> Dashboard {
    let snapshot = {
        let mut dashboard = core.dashboard.write().await;
        refresh_with_thread_rng(&mut dashboard, &core.simulator);
        dashboard.clone()
    };

    debug!("Dashboard refreshed ({}, tick {})", origin, snapshot.tick_count);
    core.activity
        .emit(
            ActivitySource::Simulator,
            ActivityLevel::Info,
            format!("{} refresh #{}", origin, snapshot.tick_count),
        )
        .await;
    let _ = core.updates.send(snapshot.clone());
    snapshot
}

fn refresh_with_thread_rng(dashboard: &mut Dashboard, simulator: &MetricSimulator) {
    let mut rng = rand::rng();
    dashboard.refresh(simulator, &mut rng, SimulationClock::now());
}
