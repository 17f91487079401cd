use crate::errors::AppError;
use crate::models::{AppData, Entry, EntryRecord, NewEntry};
use chrono::{DateTime, SecondsFormat, Utc};
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use thiserror::Error;
use tracing::debug;

pub fn resolve_data_path() -> PathBuf {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return PathBuf::from(path);
    }

    PathBuf::from("data/state.json")
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read data file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("data file {} is not a valid journal: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads the journal snapshot. A missing file is an empty journal; a file
/// that exists but cannot be read or parsed is an error so it is never
/// overwritten by a later save.
pub async fn load_data(path: &Path) -> Result<AppData, StorageError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(AppData::default()),
        Err(source) => {
            return Err(StorageError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let data: AppData = serde_json::from_slice(&bytes).map_err(|source| StorageError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(entries = data.entries.len(), "loaded journal");
    Ok(data)
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}

/// Stores a submission under the next free id, stamped with `now`.
pub fn append_entry(data: &mut AppData, new_entry: NewEntry, now: DateTime<Utc>) -> Entry {
    let taken = data.entries.iter().filter_map(|record| record.id).max();
    let id = data.next_id.max(taken.map_or(0, |max| max + 1)).max(1);
    data.next_id = id + 1;

    let notes = new_entry.notes.filter(|notes| !notes.is_empty());
    let entry = Entry {
        id,
        created_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        mood: new_entry.mood.trim().to_string(),
        notes,
    };
    data.entries.push(EntryRecord::from(&entry));
    entry
}
