use crate::errors::AppError;
use crate::filter::filter_entries;
use crate::models::{
    is_known_mood, Entry, NewEntry, SearchParams, SettingsResponse, Statistics, MOOD_LABELS,
};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::{append_entry, persist_data};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

pub async fn list_entries(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Entry>>, AppError> {
    let entries = newest_first(&state).await?;
    let found: Vec<Entry> = filter_entries(&entries, &params.q, &state.utc_offset)
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(found))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<NewEntry>,
) -> Result<(StatusCode, Json<Entry>), AppError> {
    let mood = payload.mood.trim();
    if mood.is_empty() {
        return Err(AppError::bad_request("please select a mood first"));
    }
    if !is_known_mood(mood) {
        warn!(mood, "storing entry with unlisted mood");
    }

    let entry = save_entry(&state, payload, Utc::now()).await?;
    info!(id = entry.id, mood = %entry.mood, "entry saved");
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<Statistics>, AppError> {
    let entries = state.data.lock().await.entries()?;
    Ok(Json(build_stats(&entries, &state.utc_offset)))
}

pub async fn get_moods() -> Json<&'static [&'static str]> {
    Json(MOOD_LABELS)
}

pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    Json(SettingsResponse {
        theme: state.theme,
        utc_offset_minutes: state.utc_offset.local_minus_utc() / 60,
    })
}

/// Appends to a copy of the journal and publishes it only once the copy is
/// on disk.
async fn save_entry(
    state: &AppState,
    new_entry: NewEntry,
    now: DateTime<Utc>,
) -> Result<Entry, AppError> {
    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let entry = append_entry(&mut next, new_entry, now);
    persist_data(&state.data_path, &next).await?;
    *data = next;
    Ok(entry)
}

async fn newest_first(state: &AppState) -> Result<Vec<Entry>, AppError> {
    let mut entries = state.data.lock().await.entries()?;
    entries.reverse();
    Ok(entries)
}
