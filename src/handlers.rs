use crate::errors::{AppError, JsonError};
use crate::identity::ClientId;
use crate::models::{GoalForm, ScreenshotRequest, ScreenshotResponse, TodayResponse};
use crate::progress::Progress;
use crate::screenshot::{decode_data_url, save_screenshot};
use crate::state::AppState;
use crate::ui::{render_add_form, render_home};
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Redirect, Response},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

pub async fn home(State(state): State<AppState>, client: ClientId) -> Result<Response, AppError> {
    let today = today();
    let goals = state.store.lock().await.list_for_day(client.as_str(), today)?;
    let progress = Progress::from_goals(&goals);
    Ok(client.attach(Html(render_home(today, &goals, &progress))))
}

pub async fn get_today(
    State(state): State<AppState>,
    client: ClientId,
) -> Result<Response, AppError> {
    let today = today();
    let goals = state.store.lock().await.list_for_day(client.as_str(), today)?;
    let progress = Progress::from_goals(&goals);
    Ok(client.attach(Json(TodayResponse {
        date: today.to_string(),
        goals,
        progress,
    })))
}

pub async fn add_form(client: ClientId) -> Response {
    client.attach(Html(render_add_form(None, &GoalForm::default())))
}

pub async fn add_goal(
    State(state): State<AppState>,
    client: ClientId,
    Form(form): Form<GoalForm>,
) -> Result<Response, AppError> {
    let new_goal = match form.validate(client.as_str(), today()) {
        Ok(goal) => goal,
        Err(err) => {
            let page = Html(render_add_form(Some(err.message()), &form));
            return Ok(client.attach((StatusCode::UNPROCESSABLE_ENTITY, page)));
        }
    };

    let goal = state.store.lock().await.insert(&new_goal)?;
    info!(
        id = goal.id,
        client = client.short(),
        difficulty = %goal.difficulty,
        "goal created"
    );
    Ok(client.attach(Redirect::to("/")))
}

pub async fn toggle_goal(
    State(state): State<AppState>,
    client: ClientId,
    Path(goal_id): Path<i64>,
) -> Result<Response, AppError> {
    let toggled = state.store.lock().await.toggle(goal_id, client.as_str())?;
    match toggled {
        Some(is_done) => {
            info!(id = goal_id, client = client.short(), is_done, "goal toggled");
            Ok(client.attach(Redirect::to("/")))
        }
        None => {
            warn!(id = goal_id, client = client.short(), "toggle on unknown goal");
            Err(AppError::not_found("goal not found"))
        }
    }
}

pub async fn delete_goal(
    State(state): State<AppState>,
    client: ClientId,
    Path(goal_id): Path<i64>,
) -> Result<Response, AppError> {
    let removed = state.store.lock().await.delete(goal_id, client.as_str())?;
    if !removed {
        warn!(id = goal_id, client = client.short(), "delete on unknown goal");
        return Err(AppError::not_found("goal not found"));
    }

    info!(id = goal_id, client = client.short(), "goal deleted");
    Ok(client.attach(Redirect::to("/")))
}

/// Takes the raw body so a malformed payload gets a JSON error instead of
/// the framework's plain-text rejection.
pub async fn save_screenshot_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ScreenshotResponse>, JsonError> {
    let payload: ScreenshotRequest = serde_json::from_slice(&body)
        .map_err(|err| AppError::bad_request(format!("invalid JSON payload: {err}")))?;
    let bytes = decode_data_url(&payload.image)?;
    let filename = save_screenshot(&state.screenshot_dir, &bytes, Local::now()).await?;

    info!(filename = %filename, size = bytes.len(), "screenshot saved");
    Ok(Json(ScreenshotResponse {
        status: "ok",
        filename,
    }))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
