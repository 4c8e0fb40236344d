use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::settings::PersistentSettings;

/// Campaign Insights — marketing analytics engine with simulated live data and AI insights.
#[derive(Parser, Debug, Clone)]
#[command(name = "campaign-insights")]
pub struct CliArgs {
    /// HTTP port for the dashboard API
    #[arg(long = "port", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// API key for the text-generation service
    #[arg(long = "api-key", env = "INSIGHTS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the text-generation service (models collection)
    #[arg(long = "endpoint", default_value = DEFAULT_GENERATION_ENDPOINT)]
    pub endpoint: String,

    /// Model id; overrides the persisted setting
    #[arg(short = 'm', long = "model")]
    pub model: Option<String>,

    /// Timeout for one generation request
    #[arg(long = "timeout-secs", default_value_t = GENERATION_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Seconds between simulated refresh ticks; overrides the persisted setting
    #[arg(long = "refresh-interval-secs")]
    pub refresh_interval_secs: Option<u64>,

    /// Settings file (defaults to the user config dir)
    #[arg(short = 's', long = "settings-file")]
    pub settings_file: Option<PathBuf>,

    /// Directory for daily rolling log files
    #[arg(short = 'l', long = "log-dir")]
    pub log_dir: Option<PathBuf>,
}

pub struct InsightsConfig {
    pub port: u16,
    pub settings_path: PathBuf,
    pub refresh_interval: Duration,
    pub business_hours: BusinessHours,
    pub gateway: GatewayConfig,
}

/// Connection settings for the generation service. The key is always injected.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

/// Inclusive hour window (local time) during which metric swings are amplified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            start_hour: BUSINESS_HOURS_START,
            end_hour: BUSINESS_HOURS_END,
        }
    }
}

impl BusinessHours {
    pub fn contains(&self, hour: u32) -> bool {
        hour >= self.start_hour && hour <= self.end_hour
    }
}

// Server constants
pub const DEFAULT_PORT: u16 = 8787;

// Generation service constants
pub const DEFAULT_GENERATION_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const GENERATION_TIMEOUT_SECS: u64 = 30;

// Simulation constants
pub const REFRESH_INTERVAL_SECS: u64 = 8;
pub const BUSINESS_HOURS_START: u32 = 9;
pub const BUSINESS_HOURS_END: u32 = 17;
pub const BUSINESS_HOURS_MULTIPLIER: f64 = 1.2;
pub const OFF_HOURS_MULTIPLIER: f64 = 0.8;

// Table constants
pub const PAGE_SIZE: usize = 5;

// Chat constants
pub const CHAT_CONTEXT_WINDOW: usize = 5;
// Opening a session past this evicts the oldest one
pub const MAX_CHAT_SESSIONS: usize = 64;

// Insight widgets fed from the campaign table only see the head of it
pub const CAMPAIGN_INSIGHT_ROWS: usize = 5;

// Activity log constants
pub const ACTIVITY_BUFFER_SIZE: usize = 500;

impl InsightsConfig {
    pub fn from_args(args: CliArgs, settings: &PersistentSettings) -> Self {
        let settings_path = args
            .settings_file
            .clone()
            .unwrap_or_else(default_settings_path);

        let refresh_secs = args
            .refresh_interval_secs
            .or(settings.refresh_interval_secs)
            .unwrap_or(REFRESH_INTERVAL_SECS)
            .max(1);

        let defaults = BusinessHours::default();
        let business_hours = BusinessHours {
            start_hour: settings.business_hours_start.unwrap_or(defaults.start_hour),
            end_hour: settings.business_hours_end.unwrap_or(defaults.end_hour),
        };

        let model = args
            .model
            .or_else(|| settings.model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        InsightsConfig {
            port: args.port,
            settings_path,
            refresh_interval: Duration::from_secs(refresh_secs),
            business_hours,
            gateway: GatewayConfig {
                endpoint: args.endpoint.trim_end_matches('/').to_string(),
                api_key: args.api_key.unwrap_or_default(),
                model,
                timeout: Duration::from_secs(args.timeout_secs),
            },
        }
    }
}

/// `<config dir>/campaign-insights/settings.json`, falling back to the working directory.
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("campaign-insights")
        .join("settings.json")
}
