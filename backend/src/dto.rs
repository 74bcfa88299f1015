//! # Moodlog — Request/Response DTOs
//!
//! All API contract types in one module.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - `*Response` → serialized to client JSON
//! - Field-level rules are expressed via `validator` derive macros

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::mood::{Mood, MoodEntry};

// ============================================================================
// Moods
// ============================================================================

/// POST /api/mood
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateMoodRequest {
    /// Required. Case-insensitive member of the mood vocabulary.
    pub mood: Option<String>,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,

    #[validate(range(min = -90.0, max = 90.0, message = "lat must be between -90 and 90"))]
    pub lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "lon must be between -180 and 180"))]
    pub lon: Option<f64>,
}

/// POST /api/mood → 201
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMoodResponse {
    pub success: bool,
    pub entry: MoodEntry,
}

/// GET /api/moods
#[derive(Debug, Serialize, Deserialize)]
pub struct MoodListResponse {
    pub entries: Vec<MoodEntry>,
}

// ============================================================================
// Health
// ============================================================================

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// GET /readyz
#[derive(Debug, Serialize)]
pub struct ReadyzResponse {
    pub status: String,
    pub checks: ReadyzChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyzChecks {
    pub storage: String,
}

// ============================================================================
// Validation helpers
// ============================================================================

impl CreateMoodRequest {
    /// The requested mood, trimmed and case-normalized.
    pub fn parse_mood(&self) -> Result<Mood, String> {
        let raw = self.mood.as_deref().map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err("Mood is required".into());
        }
        raw.parse::<Mood>().map_err(|e| e.to_string())
    }

    pub fn notes_or_empty(&self) -> String {
        self.notes.clone().unwrap_or_default()
    }
}
