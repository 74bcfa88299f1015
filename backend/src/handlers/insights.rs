use axum::{extract::State, Json};

use crate::insights::{compute_insights, Insights};
use crate::AppState;

pub async fn get_insights(State(state): State<AppState>) -> Json<Insights> {
    let collection = state.store.load_all().await;
    Json(compute_insights(&collection.entries))
}
