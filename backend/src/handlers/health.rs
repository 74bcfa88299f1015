use axum::{extract::State, http::StatusCode, Json};

use crate::dto::{HealthResponse, ReadyzChecks, ReadyzResponse};
use crate::AppState;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        service: "moodlog-api".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    })
}

pub async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadyzResponse>) {
    match state.store.check_writable_dir().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadyzResponse {
                status: "ready".into(),
                checks: ReadyzChecks {
                    storage: "ok".into(),
                },
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Storage not ready");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyzResponse {
                    status: "not_ready".into(),
                    checks: ReadyzChecks {
                        storage: "failed".into(),
                    },
                }),
            )
        }
    }
}
