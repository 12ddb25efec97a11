use crate::model::{SortColumn, SortDirection, SortSpec, TableState};

#[must_use]
pub fn sort_indicator(spec: SortSpec, column: SortColumn) -> Option<&'static str> {
    (spec.column == column).then_some(match spec.direction {
        SortDirection::Asc => "▲",
        SortDirection::Desc => "▼",
    })
}

/// Relative url for a row action that keeps the table state.
#[must_use]
pub fn action_url(id: i64, action: &str, state: &TableState) -> String {
    format!("segments/{id}/{action}?{}", state.query_string())
}
