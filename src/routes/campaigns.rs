use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::AppError;
use crate::table::{self, SortDirection, SortField, SortSpec, TableView};
use crate::state::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct TableQuery {
    pub sort: Option<String>,
    pub direction: Option<String>,
    pub filter: Option<String>,
    pub page: Option<i64>,
}

impl TableQuery {
    /// Missing fields fall back to `revenue desc`, no filter, page 1.
    pub fn sort_spec(&self) -> Result<SortSpec, AppError> {
        let defaults = SortSpec::default();
        let field = match &self.sort {
            Some(s) => s
                .parse::<SortField>()
                .map_err(|e| AppError::Validation(e.to_string()))?,
            None => defaults.field,
        };
        let direction = match &self.direction {
            Some(d) => d
                .parse::<SortDirection>()
                .map_err(|e| AppError::Validation(e.to_string()))?,
            None => SortDirection::Desc,
        };
        Ok(SortSpec { field, direction })
    }
}

/// GET /campaigns — filtered, sorted, paginated campaign table.
pub async fn list(
    State(state): State<SharedState>,
    Query(query): Query<TableQuery>,
) -> Result<Json<TableView>, AppError> {
    let sort = query.sort_spec()?;
    let filter = query.filter.as_deref().unwrap_or("");
    let page = query.page.unwrap_or(1);

    let dashboard = state.dashboard.read().await;
    Ok(Json(table::view(&dashboard.campaigns, sort, filter, page)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let spec = TableQuery::default().sort_spec().unwrap();
        assert_eq!(spec, SortSpec::default());
    }

    #[test]
    fn test_query_rejects_unknown_field() {
        let query = TableQuery {
            sort: Some("status".to_string()),
            ..Default::default()
        };
        assert!(matches!(query.sort_spec(), Err(AppError::Validation(_))));
    }
}
