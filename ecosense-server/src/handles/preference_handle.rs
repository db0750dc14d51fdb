use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use ecosense_api::models::ThemeBody;

use crate::configs::PreferenceStore;
use crate::errors::ApiError;

#[derive(Clone)]
pub struct PreferenceState {
    pub preference_store: Arc<PreferenceStore>,
}

pub fn preference_router(preference_state: PreferenceState) -> Router {
    Router::new()
        .route("/preferences/theme", get(get_theme).put(update_theme))
        .with_state(preference_state)
}

pub async fn get_theme(State(state): State<PreferenceState>) -> Result<Json<ThemeBody>, ApiError> {
    let theme = state.preference_store.load_theme().await?;

    Ok(Json(ThemeBody { theme }))
}

pub async fn update_theme(
    State(state): State<PreferenceState>,
    Json(body): Json<ThemeBody>,
) -> Result<Json<ThemeBody>, ApiError> {
    state.preference_store.store_theme(body.theme).await?;

    Ok(Json(body))
}
