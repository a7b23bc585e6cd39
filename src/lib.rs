pub mod app;
pub mod errors;
pub mod handlers;
pub mod identity;
pub mod models;
pub mod progress;
pub mod screenshot;
pub mod state;
pub mod store;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use store::{resolve_db_path, GoalStore};
