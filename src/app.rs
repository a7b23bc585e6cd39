use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

/// State-changing routes are registered for POST only; any other method
/// gets a 405 from the router before a handler runs.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/add/", get(handlers::add_form).post(handlers::add_goal))
        .route("/toggle/:goal_id/", post(handlers::toggle_goal))
        .route("/delete/:goal_id/", post(handlers::delete_goal))
        .route("/save_screenshot/", post(handlers::save_screenshot_handler))
        .route("/api/today", get(handlers::get_today))
        .with_state(state)
}
