//! Per-widget request state. Each widget has its own in-flight flag; a trigger
//! that arrives while a request is pending is refused, never queued.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::info;

use crate::chat::{ChatMessage, ChatSession};
use crate::config::CAMPAIGN_INSIGHT_ROWS;
use crate::dashboard::Dashboard;
use crate::error::AppError;
use crate::gateway::{prompts, InsightGateway, InsightPayload, InsightResult};

#[derive(Debug, Default)]
pub struct InFlight(AtomicBool);

/// Clears the owning flag when dropped.
pub struct InFlightGuard<'a>(&'a AtomicBool);

impl InFlight {
    pub fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.0))
    }

    pub fn is_pending(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Revenue,
    Campaigns,
    Channels,
}

/// What an insight widget shows: the generated text, or the fallback on failure.
#[derive(Debug, Clone, Serialize)]
pub struct InsightOutcome {
    pub ok: bool,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub generated_at: DateTime<Utc>,
}

impl InsightOutcome {
    pub fn from_result(result: InsightResult) -> Self {
        match result {
            Ok(text) => Self {
                ok: true,
                text,
                error: None,
                generated_at: Utc::now(),
            },
            Err(e) => Self {
                ok: false,
                text: e.fallback_message().to_string(),
                error: Some(e.to_string()),
                generated_at: Utc::now(),
            },
        }
    }
}

pub struct InsightWidget {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: InsightKind,
    in_flight: InFlight,
    last: RwLock<Option<InsightOutcome>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InsightWidgetStatus {
    pub id: &'static str,
    pub title: &'static str,
    pub kind: InsightKind,
    pub context: &'static str,
    pub pending: bool,
    pub last: Option<InsightOutcome>,
}

impl InsightWidget {
    pub fn new(id: &'static str, title: &'static str, kind: InsightKind) -> Self {
        Self {
            id,
            title,
            kind,
            in_flight: InFlight::default(),
            last: RwLock::new(None),
        }
    }

    /// The three widgets on the analytics overview.
    pub fn defaults() -> Vec<InsightWidget> {
        vec![
            InsightWidget::new("revenue", "Revenue Analysis", InsightKind::Revenue),
            InsightWidget::new("campaigns", "Campaign Optimization", InsightKind::Campaigns),
            InsightWidget::new("channels", "Channel Mix", InsightKind::Channels),
        ]
    }

    pub fn payload_from(&self, dashboard: &Dashboard) -> InsightPayload {
        match self.kind {
            InsightKind::Revenue => InsightPayload::RevenueSeries(dashboard.revenue_series.clone()),
            InsightKind::Campaigns => InsightPayload::CampaignList(
                dashboard
                    .campaigns
                    .iter()
                    .take(CAMPAIGN_INSIGHT_ROWS)
                    .cloned()
                    .collect(),
            ),
            InsightKind::Channels => InsightPayload::ChannelMix(dashboard.channels.clone()),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_pending()
    }

    pub async fn status(&self) -> InsightWidgetStatus {
        let context = match self.kind {
            InsightKind::Revenue => prompts::REVENUE_CONTEXT,
            InsightKind::Campaigns => prompts::CAMPAIGN_CONTEXT,
            InsightKind::Channels => prompts::CHANNEL_CONTEXT,
        };
        InsightWidgetStatus {
            id: self.id,
            title: self.title,
            kind: self.kind,
            context,
            pending: self.is_pending(),
            last: self.last.read().await.clone(),
        }
    }

    /// Generate an insight, refusing while a previous request for this widget is pending.
    pub async fn generate(
        &self,
        gateway: &InsightGateway,
        payload: InsightPayload,
    ) -> Result<InsightOutcome, AppError> {
        let _guard = self
            .in_flight
            .try_begin()
            .ok_or_else(|| AppError::Busy(format!("insight widget '{}'", self.id)))?;

        info!("Generating insight for widget '{}'", self.id);
        let result = gateway
            .request_insight(&payload, payload.default_context())
            .await;
        let outcome = InsightOutcome::from_result(result);
        *self.last.write().await = Some(outcome.clone());
        Ok(outcome)
    }
}

/// The assistant's reply to one posted message, plus the full visible history.
#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub ok: bool,
    pub reply: ChatMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub messages: Vec<ChatMessage>,
}

pub struct ChatWidget {
    id: uuid::Uuid,
    created_at: DateTime<Utc>,
    session: RwLock<ChatSession>,
    in_flight: InFlight,
}

impl Default for ChatWidget {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWidget {
    pub fn new() -> Self {
        let session = ChatSession::new();
        Self {
            id: session.id(),
            created_at: session.created_at(),
            session: RwLock::new(session),
            in_flight: InFlight::default(),
        }
    }

    pub fn id(&self) -> uuid::Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_pending()
    }

    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.session.read().await.messages().to_vec()
    }

    /// The user's message is visible to readers as soon as this returns from its
    /// first lock, while the upstream call is still pending.
    pub async fn send(&self, gateway: &InsightGateway, text: &str) -> Result<ChatReply, AppError> {
        let _guard = self
            .in_flight
            .try_begin()
            .ok_or_else(|| AppError::Busy("chat session".to_string()))?;

        let pending = self
            .session
            .write()
            .await
            .begin_turn(text)
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let result = gateway
            .request_chat_reply(&pending.message, &pending.context)
            .await;

        let mut session = self.session.write().await;
        let reply = session.complete_turn(&result).clone();
        Ok(ChatReply {
            ok: result.is_ok(),
            reply,
            error: result.err().map(|e| e.to_string()),
            messages: session.messages().to_vec(),
        })
    }
}
