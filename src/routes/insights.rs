use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::activity::{ActivityLevel, ActivitySource};
use crate::error::AppError;
use crate::state::SharedState;
use crate::widgets::{InsightOutcome, InsightWidgetStatus};

#[derive(Serialize)]
pub struct InsightListResponse {
    pub widgets: Vec<InsightWidgetStatus>,
}

/// GET /insights — every insight widget with its last outcome.
pub async fn list(State(state): State<SharedState>) -> Json<InsightListResponse> {
    let mut widgets = Vec::with_capacity(state.insights.len());
    for widget in &state.insights {
        widgets.push(widget.status().await);
    }
    Json(InsightListResponse { widgets })
}

/// POST /insights/{widget} — generate from the current dashboard data.
///
/// Upstream failures still answer 200 with the fallback text; only an unknown
/// widget (404) or a pending request (409) is an error.
pub async fn generate(
    State(state): State<SharedState>,
    Path(widget_id): Path<String>,
) -> Result<Json<InsightOutcome>, AppError> {
    let widget = state
        .insight_widget(&widget_id)
        .ok_or_else(|| AppError::NotFound(format!("insight widget '{}'", widget_id)))?;

    let payload = {
        let dashboard = state.dashboard.read().await;
        widget.payload_from(&dashboard)
    };

    let outcome = widget.generate(&state.gateway, payload).await?;

    let (level, message) = match &outcome.error {
        None => (ActivityLevel::Info, format!("insight '{}' generated", widget.id)),
        Some(e) => (ActivityLevel::Warn, format!("insight '{}' failed: {}", widget.id, e)),
    };
    state
        .activity
        .emit(ActivitySource::Insights, level, message)
        .await;

    Ok(Json(outcome))
}
