pub mod app;
pub mod config;
pub mod errors;
pub mod filter;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod storage;
pub mod state;

pub use app::router;
pub use config::Config;
pub use filter::filter_entries;
pub use state::AppState;
pub use stats::{compute_statistics, compute_statistics_in};
pub use storage::load_data;
