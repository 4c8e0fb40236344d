use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::debug;
use uuid::Uuid;

use crate::activity::ActivityLog;
use crate::config::{InsightsConfig, MAX_CHAT_SESSIONS};
use crate::dashboard::Dashboard;
use crate::gateway::InsightGateway;
use crate::scheduler::RefreshScheduler;
use crate::simulator::MetricSimulator;
use crate::widgets::{ChatWidget, InsightWidget};

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub config: InsightsConfig,
    pub started_at: DateTime<Utc>,
    pub dashboard: Arc<RwLock<Dashboard>>,
    pub scheduler: RefreshScheduler,
    pub gateway: Arc<InsightGateway>,
    pub insights: Vec<Arc<InsightWidget>>,
    pub chats: RwLock<HashMap<Uuid, Arc<ChatWidget>>>,
    pub activity: Arc<ActivityLog>,
    pub updates_tx: broadcast::Sender<Dashboard>,
    pub shutdown_tx: broadcast::Sender<()>,
}

impl AppState {
    pub fn new(config: InsightsConfig) -> anyhow::Result<Self> {
        let gateway = Arc::new(InsightGateway::new(config.gateway.clone())?);
        let dashboard = Arc::new(RwLock::new(Dashboard::seeded()));
        let activity = Arc::new(ActivityLog::new());
        let (updates_tx, _) = broadcast::channel(16);
        let (shutdown_tx, _) = broadcast::channel(1);

        let scheduler = RefreshScheduler::new(
            dashboard.clone(),
            MetricSimulator::new(config.business_hours),
            config.refresh_interval,
            updates_tx.clone(),
            activity.clone(),
        );

        Ok(Self {
            config,
            started_at: Utc::now(),
            dashboard,
            scheduler,
            gateway,
            insights: InsightWidget::defaults().into_iter().map(Arc::new).collect(),
            chats: RwLock::new(HashMap::new()),
            activity,
            updates_tx,
            shutdown_tx,
        })
    }

    pub fn insight_widget(&self, id: &str) -> Option<Arc<InsightWidget>> {
        self.insights.iter().find(|w| w.id == id).cloned()
    }

    /// Open a session. At `MAX_CHAT_SESSIONS` the oldest session is evicted first;
    /// a request already in flight on it still completes against its own handle.
    pub async fn create_chat(&self) -> (Uuid, Arc<ChatWidget>) {
        let widget = Arc::new(ChatWidget::new());
        let id = widget.id();

        let mut chats = self.chats.write().await;
        while chats.len() >= MAX_CHAT_SESSIONS {
            let oldest = chats
                .values()
                .min_by_key(|w| w.created_at())
                .map(|w| w.id());
            match oldest {
                Some(oldest) => {
                    chats.remove(&oldest);
                    debug!("Evicted chat session {}", oldest);
                }
                None => break,
            }
        }
        chats.insert(id, widget.clone());
        (id, widget)
    }

    /// Close a session. Returns whether it existed.
    pub async fn remove_chat(&self, id: Uuid) -> bool {
        self.chats.write().await.remove(&id).is_some()
    }

    pub async fn chat(&self, id: Uuid) -> Option<Arc<ChatWidget>> {
        self.chats.read().await.get(&id).cloned()
    }
}
