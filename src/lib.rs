pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod hotel;
pub mod models;
pub mod navigation;
pub mod notifications;
pub mod page;
pub mod runtime;
pub mod sample;
pub mod scheduler;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use runtime::{Dashboard, Event};
pub use state::AppState;
pub use storage::{FileStorage, MemoryStorage, Storage};
