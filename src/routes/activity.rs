use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use futures::stream::{Stream, StreamExt};
use serde::Deserialize;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;

use crate::activity::ActivityEntry;
use crate::state::SharedState;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

/// GET /activity — most recent engine events, oldest first.
pub async fn history(
    State(state): State<SharedState>,
    Query(query): Query<HistoryQuery>,
) -> Json<Vec<ActivityEntry>> {
    let mut entries = state.activity.history().await;
    if let Some(limit) = query.limit {
        let skip = entries.len().saturating_sub(limit);
        entries.drain(..skip);
    }
    Json(entries)
}

/// GET /activity/stream — live SSE feed of new entries.
pub async fn stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.activity.subscribe();
    let mut shutdown_rx = state.shutdown_tx.subscribe();

    let stream = BroadcastStream::new(rx)
        .filter_map(|entry| async move {
            let entry = entry.ok()?;
            let data = serde_json::to_string(&entry).ok()?;
            Some(Ok::<_, Infallible>(Event::default().event("activity").data(data)))
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
