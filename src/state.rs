use crate::config::{Config, Theme};
use crate::models::AppData;
use chrono::FixedOffset;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub utc_offset: FixedOffset,
    pub theme: Theme,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(config: &Config, data: AppData) -> Self {
        Self {
            data_path: config.data_path.clone(),
            utc_offset: config.utc_offset,
            theme: config.theme,
            data: Arc::new(Mutex::new(data)),
        }
    }
}
