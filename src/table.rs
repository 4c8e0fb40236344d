//! Filter / sort / paginate over campaign records.
//!
//! Pure transform: the engine owns no data and never fails. Unknown sort
//! fields are rejected only when parsing text (see [`SortField::from_str`]);
//! page indices are always clamped.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::config::PAGE_SIZE;
use crate::error::InsightError;
use crate::model::CampaignRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Campaign,
    Platform,
    Impressions,
    Clicks,
    Conversions,
    Revenue,
    Ctr,
    Cpa,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::Campaign,
        SortField::Platform,
        SortField::Impressions,
        SortField::Clicks,
        SortField::Conversions,
        SortField::Revenue,
        SortField::Ctr,
        SortField::Cpa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Campaign => "campaign",
            SortField::Platform => "platform",
            SortField::Impressions => "impressions",
            SortField::Clicks => "clicks",
            SortField::Conversions => "conversions",
            SortField::Revenue => "revenue",
            SortField::Ctr => "ctr",
            SortField::Cpa => "cpa",
        }
    }

    fn compare(&self, a: &CampaignRecord, b: &CampaignRecord) -> Ordering {
        match self {
            SortField::Campaign => locale_cmp(&a.campaign, &b.campaign),
            SortField::Platform => locale_cmp(&a.platform, &b.platform),
            SortField::Impressions => a.impressions.cmp(&b.impressions),
            SortField::Clicks => a.clicks.cmp(&b.clicks),
            SortField::Conversions => a.conversions.cmp(&b.conversions),
            SortField::Revenue => a.revenue.total_cmp(&b.revenue),
            SortField::Ctr => a.ctr.total_cmp(&b.ctr),
            SortField::Cpa => a.cpa.total_cmp(&b.cpa),
        }
    }
}

impl FromStr for SortField {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| InsightError::Validation(format!("unknown sort field: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = InsightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(InsightError::Validation(format!(
                "unknown sort direction: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Revenue,
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    /// Column-header click: the same field flips direction, a new field starts descending.
    pub fn select(self, field: SortField) -> SortSpec {
        if field == self.field {
            SortSpec {
                field,
                direction: self.direction.flipped(),
            }
        } else {
            SortSpec {
                field,
                direction: SortDirection::Desc,
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub rows: Vec<CampaignRecord>,
    pub total_filtered_count: usize,
    pub page_count: usize,
    /// The page actually served, after clamping.
    pub page_index: usize,
}

/// Case-folded comparison first. Ties between case variants put lowercase
/// first ("b" before "B"), as an `en` collator does.
fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

pub fn matches_filter(record: &CampaignRecord, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    let needle = filter.to_lowercase();
    record.campaign.to_lowercase().contains(&needle)
        || record.platform.to_lowercase().contains(&needle)
}

pub fn page_count(filtered: usize) -> usize {
    filtered.div_ceil(PAGE_SIZE)
}

/// Clamp a requested 1-based page into `[1, max(1, page_count)]`.
pub fn clamp_page(requested: i64, page_count: usize) -> usize {
    let last = page_count.max(1) as i64;
    requested.clamp(1, last) as usize
}

pub fn view(records: &[CampaignRecord], sort: SortSpec, filter: &str, page: i64) -> TableView {
    let mut filtered: Vec<&CampaignRecord> =
        records.iter().filter(|r| matches_filter(r, filter)).collect();

    // sort_by is stable; equal keys compare Equal in both directions.
    filtered.sort_by(|a, b| match sort.direction {
        SortDirection::Asc => sort.field.compare(a, b),
        SortDirection::Desc => sort.field.compare(b, a),
    });

    let total_filtered_count = filtered.len();
    let page_count = page_count(total_filtered_count);
    let page_index = clamp_page(page, page_count);

    let rows = filtered
        .into_iter()
        .skip((page_index - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .cloned()
        .collect();

    TableView {
        rows,
        total_filtered_count,
        page_count,
        page_index,
    }
}
