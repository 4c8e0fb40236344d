use serde::Serialize;

use crate::chat::{ChatMessage, Role};
use crate::config::CHAT_CONTEXT_WINDOW;
use crate::model::{CampaignRecord, ChannelShare, TrendPoint};

const ASSISTANT_IDENTITY: &str = "You are an AI assistant for Campaign Insights, a digital marketing analytics platform.";

pub const REVENUE_CONTEXT: &str = "Revenue Trend Analysis";
pub const CAMPAIGN_CONTEXT: &str = "Campaign Performance Analysis";
pub const CHANNEL_CONTEXT: &str = "Channel Mix Analysis";

/// Structured data an insight can be generated from.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum InsightPayload {
    RevenueSeries(Vec<TrendPoint>),
    CampaignList(Vec<CampaignRecord>),
    ChannelMix(Vec<ChannelShare>),
}

impl InsightPayload {
    pub fn default_context(&self) -> &'static str {
        match self {
            InsightPayload::RevenueSeries(_) => REVENUE_CONTEXT,
            InsightPayload::CampaignList(_) => CAMPAIGN_CONTEXT,
            InsightPayload::ChannelMix(_) => CHANNEL_CONTEXT,
        }
    }

    /// The summarized form that is embedded in the prompt.
    pub fn prompt_data(&self) -> serde_json::Value {
        let value = match self {
            InsightPayload::RevenueSeries(series) => serde_json::to_value(revenue_summary(series)),
            InsightPayload::CampaignList(records) => {
                serde_json::to_value(campaign_recommendations(records))
            }
            InsightPayload::ChannelMix(channels) => serde_json::to_value(channel_mix(channels)),
        };
        value.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueSummary {
    pub total_revenue: f64,
    pub avg_monthly_revenue: f64,
    /// First-to-last change in percent; 0 for fewer than two points.
    pub growth_pct: f64,
    pub monthly_data: Vec<TrendPoint>,
}

pub fn revenue_summary(series: &[TrendPoint]) -> RevenueSummary {
    let total_revenue: f64 = series.iter().map(|p| p.value).sum();
    let avg_monthly_revenue = if series.is_empty() {
        0.0
    } else {
        total_revenue / series.len() as f64
    };
    let growth_pct = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() > 1 && first.value != 0.0 => {
            (last.value - first.value) / first.value * 100.0
        }
        _ => 0.0,
    };

    RevenueSummary {
        total_revenue,
        avg_monthly_revenue,
        growth_pct,
        monthly_data: series.to_vec(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CampaignRecommendations {
    pub top_performers: Vec<CampaignRecord>,
    pub low_performers: Vec<CampaignRecord>,
    pub total_campaigns: usize,
}

/// Top three by revenue and bottom three by CTR.
pub fn campaign_recommendations(records: &[CampaignRecord]) -> CampaignRecommendations {
    let mut by_revenue = records.to_vec();
    by_revenue.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    by_revenue.truncate(3);

    let mut by_ctr = records.to_vec();
    by_ctr.sort_by(|a, b| a.ctr.total_cmp(&b.ctr));
    by_ctr.truncate(3);

    CampaignRecommendations {
        top_performers: by_revenue,
        low_performers: by_ctr,
        total_campaigns: records.len(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChannelMixSummary {
    pub leading_channel: Option<String>,
    pub total_revenue: f64,
    pub channels: Vec<ChannelShare>,
}

pub fn channel_mix(channels: &[ChannelShare]) -> ChannelMixSummary {
    let leading_channel = channels
        .iter()
        .max_by(|a, b| a.share.total_cmp(&b.share))
        .map(|c| c.name.clone());

    ChannelMixSummary {
        leading_channel,
        total_revenue: channels.iter().map(|c| c.revenue).sum(),
        channels: channels.to_vec(),
    }
}

pub fn build_insight_prompt(payload: &InsightPayload, context_label: &str) -> String {
    let data = serde_json::to_string_pretty(&payload.prompt_data()).unwrap_or_default();

    format!(
        r#"{identity} Provide a concise and actionable insight based on the following data.

Context: {context_label}
Data: {data}

Please provide:
1. A brief summary of what the data shows
2. Key insights or trends
3. Actionable recommendations for improving performance
4. Any potential areas of concern or opportunity

Keep the response professional, data-driven, and focused on helping digital marketing agencies optimize their campaigns."#,
        identity = ASSISTANT_IDENTITY,
    )
}

/// Preamble, the last few turns of `history`, then the new user turn.
pub fn build_chat_prompt(message: &str, history: &[ChatMessage]) -> String {
    let start = history.len().saturating_sub(CHAT_CONTEXT_WINDOW);
    let conversation = history[start..]
        .iter()
        .map(|m| {
            let speaker = match m.role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            };
            format!("{}: {}", speaker, m.content)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"{identity}
You help digital marketing agencies analyze their campaign performance, understand trends, and optimize their strategies.

You should:
- Be professional and knowledgeable about digital marketing
- Provide actionable insights and recommendations
- Help users understand their data and metrics
- Suggest optimization strategies for campaigns
- Be concise but thorough in your responses

Previous conversation:
{conversation}

User: {message}

Please provide a helpful response about digital marketing analytics:"#,
        identity = ASSISTANT_IDENTITY,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::Utc;

    #[test]
    fn test_revenue_summary() {
        let summary = revenue_summary(&seed::revenue_series());
        assert_eq!(summary.total_revenue, 4067000.0);
        assert!((summary.avg_monthly_revenue - 338916.67).abs() < 0.01);
        // 245000 -> 445000
        assert!((summary.growth_pct - 81.63).abs() < 0.01);
    }

    #[test]
    fn test_revenue_summary_single_point() {
        let series = &seed::revenue_series()[..1];
        let summary = revenue_summary(series);
        assert_eq!(summary.growth_pct, 0.0);
        assert_eq!(summary.avg_monthly_revenue, 245000.0);
    }

    #[test]
    fn test_campaign_recommendations() {
        let recs = campaign_recommendations(&seed::campaigns());
        let top: Vec<&str> = recs.top_performers.iter().map(|r| r.id.as_str()).collect();
        let low: Vec<&str> = recs.low_performers.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(top, vec!["6", "1", "2"]);
        assert_eq!(low, vec!["6", "1", "2"]);
        assert_eq!(recs.total_campaigns, 8);
    }

    #[test]
    fn test_channel_mix_leader() {
        let mix = channel_mix(&seed::channels());
        assert_eq!(mix.leading_channel.as_deref(), Some("Google Ads"));
        assert_eq!(mix.total_revenue, 443750.0);
    }

    #[test]
    fn test_insight_prompt_contains_context_and_data() {
        let payload = InsightPayload::ChannelMix(seed::channels());
        let prompt = build_insight_prompt(&payload, payload.default_context());
        assert!(prompt.contains("Context: Channel Mix Analysis"));
        assert!(prompt.contains("\"leading_channel\": \"Google Ads\""));
    }

    #[test]
    fn test_chat_prompt_window() {
        let history: Vec<ChatMessage> = (0..8)
            .map(|i| ChatMessage {
                role: if i % 2 == 0 { Role::User } else { Role::Assistant },
                content: format!("turn-{}", i),
                sent_at: Utc::now(),
            })
            .collect();
        let prompt = build_chat_prompt("what next?", &history);
        assert!(!prompt.contains("turn-2"));
        assert!(prompt.contains("User: turn-4"));
        assert!(prompt.contains("Assistant: turn-7"));
        assert!(prompt.ends_with("about digital marketing analytics:"));
        assert!(prompt.contains("User: what next?"));
    }
}
