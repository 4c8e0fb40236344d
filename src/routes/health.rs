use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::SharedState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: i64,
    pub refresh: RefreshHealth,
    pub gateway: GatewayHealth,
    pub chat_sessions: usize,
}

#[derive(Serialize)]
pub struct RefreshHealth {
    pub running: bool,
    pub interval_secs: u64,
    pub tick_count: u64,
    pub last_updated: String,
}

#[derive(Serialize)]
pub struct GatewayHealth {
    pub model: String,
    pub api_key_configured: bool,
    pub timeout_secs: u64,
    pub pending_insights: Vec<&'static str>,
}

/// "ok" while the refresher runs; "degraded" if the key is missing or the refresher is stopped.
pub fn determine_overall_status(refresh_running: bool, api_key_configured: bool) -> &'static str {
    if refresh_running && api_key_configured {
        "ok"
    } else {
        "degraded"
    }
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(build_health_response(&state).await)
}

pub async fn build_health_response(state: &SharedState) -> HealthResponse {
    let (tick_count, last_updated) = {
        let dashboard = state.dashboard.read().await;
        (dashboard.tick_count, dashboard.last_updated)
    };
    let chat_sessions = state.chats.read().await.len();

    let gateway = state.gateway.config();
    let running = state.scheduler.is_running();
    let api_key_configured = !gateway.api_key.is_empty();

    HealthResponse {
        status: determine_overall_status(running, api_key_configured).to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: (chrono::Utc::now() - state.started_at).num_seconds(),
        refresh: RefreshHealth {
            running,
            interval_secs: state.scheduler.interval().as_secs(),
            tick_count,
            last_updated: last_updated.to_rfc3339(),
        },
        gateway: GatewayHealth {
            model: gateway.model.clone(),
            api_key_configured,
            timeout_secs: gateway.timeout.as_secs(),
            pending_insights: state
                .insights
                .iter()
                .filter(|w| w.is_pending())
                .map(|w| w.id)
                .collect(),
        },
        chat_sessions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_overall_status() {
        assert_eq!(determine_overall_status(true, true), "ok");
        assert_eq!(determine_overall_status(false, true), "degraded");
        assert_eq!(determine_overall_status(true, false), "degraded");
    }
}
