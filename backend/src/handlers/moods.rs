use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use chrono::Utc;
use validator::Validate;

use crate::dto::{CreateMoodRequest, CreateMoodResponse, MoodListResponse};
use crate::error::{AppError, AppResult};
use crate::models::mood::MoodEntry;
use crate::AppState;

pub async fn create_mood(
    State(state): State<AppState>,
    payload: Result<Json<CreateMoodRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<CreateMoodResponse>)> {
    let Json(body) = payload?;

    let mood = body.parse_mood().map_err(AppError::Validation)?;
    body.validate()?;

    // Never fails; falls back to the "unknown" snapshot.
    let weather = state.weather.fetch(body.lat, body.lon).await;
    let notes = body.notes_or_empty();

    let entry = state
        .store
        .append_with(|existing| -> AppResult<MoodEntry> {
            let now = Utc::now();
            let id = existing
                .next_id(now)
                .ok_or_else(|| anyhow::anyhow!("Mood id space exhausted"))?;
            Ok(MoodEntry {
                id,
                timestamp: now,
                mood: mood.to_string(),
                notes,
                weather,
            })
        })
        .await?;

    tracing::info!(
        id = %entry.id,
        mood = %entry.mood,
        condition = %entry.weather.condition,
        "Mood logged"
    );

    Ok((
        StatusCode::CREATED,
        Json(CreateMoodResponse {
            success: true,
            entry,
        }),
    ))
}

pub async fn list_moods(State(state): State<AppState>) -> Json<MoodListResponse> {
    let entries = state.store.load_all().await.into_newest_first();
    Json(MoodListResponse { entries })
}
