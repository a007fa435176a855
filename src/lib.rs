pub mod app;
pub mod config;
pub mod day_status;
pub mod errors;
pub mod handlers;
pub mod highlight;
pub mod layout;
pub mod locale;
pub mod merge;
pub mod models;
pub mod service;
pub mod state;
pub mod stats;
pub mod store;
pub mod trend;

pub use app::router;
pub use config::Settings;
pub use service::FastingLog;
pub use state::AppState;
