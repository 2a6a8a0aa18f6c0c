//! RPC error translation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use scrutin_election::ElectionError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// An error crossing the HTTP boundary. Wraps the core error and decides
/// its status code at response time.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct RpcError(#[from] ElectionError);

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl RpcError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            ElectionError::Validation(_) => StatusCode::BAD_REQUEST,
            ElectionError::NotFound(_) => StatusCode::NOT_FOUND,
            // Lifecycle violations and repeated actions are conflicts with
            // current server state, not bad requests.
            ElectionError::InvalidState(_) => StatusCode::CONFLICT,
            ElectionError::DuplicateAction(_) => StatusCode::CONFLICT,
            ElectionError::Ledger(_) => StatusCode::BAD_GATEWAY,
            ElectionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(%status, "request failed: {}", self.0);
        }
        let body = ErrorBody {
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrutin_ledger::LedgerError;
    use scrutin_store::StoreError;

    fn status_of(err: ElectionError) -> StatusCode {
        RpcError::from(err).status()
    }

    #[test]
    fn core_errors_map_to_expected_status_codes() {
        assert_eq!(
            status_of(ElectionError::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ElectionError::NotFound("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ElectionError::InvalidState("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ElectionError::DuplicateAction("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ElectionError::Ledger(LedgerError::Connection("x".into()))),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(ElectionError::Storage(StoreError::Backend("x".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
