//! Domain errors and their HTTP mapping.
//!
//! Every variant is recoverable at the UI level: the client changes a
//! selection and retries. The "halt" conditions (no sheet selected, filters
//! matching nothing) are modeled as 409s so a partial render never happens.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Unknown sheet: '{0}'")]
    UnknownSheet(String),

    #[error("No sheet selected. Select a sheet before querying the dataset")]
    SheetNotSelected,

    #[error("Sheet '{sheet}' is missing required columns: {}", .columns.join(", "))]
    MissingColumns { sheet: String, columns: Vec<String> },

    #[error("No stakeholders match the current filters")]
    NoMatches,

    #[error("Stakeholder not found: '{0}'")]
    StakeholderNotFound(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::SessionNotFound(_)
            | AppError::UnknownSheet(_)
            | AppError::StakeholderNotFound(_) => StatusCode::NOT_FOUND,
            AppError::SheetNotSelected | AppError::NoMatches => StatusCode::CONFLICT,
            AppError::MissingColumns { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_all() {
        let err = AppError::MissingColumns {
            sheet: "Q3".into(),
            columns: vec!["Client Name".into(), "Designation".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Client Name"));
        assert!(msg.contains("Designation"));
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::SheetNotSelected.status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::StakeholderNotFound("X".into()).status(),
            StatusCode::NOT_FOUND
        );
    }
}
