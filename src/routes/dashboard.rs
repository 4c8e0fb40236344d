use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;

use crate::dashboard::Dashboard;
use crate::state::SharedState;

/// GET /dashboard — latest committed snapshot.
pub async fn snapshot(State(state): State<SharedState>) -> Json<Dashboard> {
    Json(state.dashboard.read().await.clone())
}

/// POST /dashboard/refresh — run a tick now.
pub async fn refresh(State(state): State<SharedState>) -> Json<Dashboard> {
    Json(state.scheduler.trigger().await)
}

/// GET /dashboard/stream — SSE event after every committed tick.
/// Ends when the server begins shutting down.
pub async fn stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.updates_tx.subscribe();
    let mut shutdown_rx = state.shutdown_tx.subscribe();

    let stream = BroadcastStream::new(rx)
        .map(|update| match update {
            Ok(dashboard) => Ok(dashboard_event(&dashboard)),
            // Slow client skipped some ticks; the next one carries the full state.
            Err(_) => Ok(Event::default().comment("lagged")),
        })
        .take_until(Box::pin(async move {
            let _ = shutdown_rx.recv().await;
        }));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keepalive"),
    )
}

fn dashboard_event(dashboard: &Dashboard) -> Event {
    let data = serde_json::to_string(dashboard).unwrap_or_default();
    Event::default().event("dashboard").data(data)
}
