use crate::errors::AppError;
use crate::models::{AppData, Stats, StatsPatch};
use crate::page::Page;
use crate::runtime::Event;
use crate::state::AppState;
use crate::ui::{render_app, render_index};
use axum::{extract::State, http::StatusCode, response::Html, Json};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let dashboard = state.dashboard.lock().await;
    Html(render_index(dashboard.page(), dashboard.app().data()))
}

pub async fn fragment(State(state): State<AppState>) -> Html<String> {
    let dashboard = state.dashboard.lock().await;
    Html(render_app(dashboard.page(), dashboard.app().data()))
}

pub async fn get_state(State(state): State<AppState>) -> Json<AppData> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.snapshot())
}

pub async fn get_page(State(state): State<AppState>) -> Json<Page> {
    let dashboard = state.dashboard.lock().await;
    Json(dashboard.page().clone())
}

pub async fn post_event(
    State(state): State<AppState>,
    Json(event): Json<Event>,
) -> Result<Json<Page>, AppError> {
    let page = state
        .run_blocking(move |dashboard| {
            match &event {
                Event::Click { target }
                | Event::MouseEnter { target }
                | Event::MouseLeave { target } => {
                    if !dashboard.page().has_target(*target) {
                        return Err(AppError::not_found("no such element on the page"));
                    }
                }
                Event::Resize { width } | Event::OrientationChange { width } if *width == 0 => {
                    return Err(AppError::bad_request("viewport width must be positive"));
                }
                _ => {}
            }

            dashboard.dispatch(event);
            Ok(dashboard.page().clone())
        })
        .await??;
    Ok(Json(page))
}

pub async fn post_stats(
    State(state): State<AppState>,
    Json(patch): Json<StatsPatch>,
) -> Result<Json<Stats>, AppError> {
    let stats = state
        .run_blocking(move |dashboard| dashboard.update_stats(&patch))
        .await??;
    Ok(Json(stats))
}

pub async fn save(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.run_blocking(|dashboard| dashboard.save()).await??;
    Ok(StatusCode::NO_CONTENT)
}
