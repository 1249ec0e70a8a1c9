use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::parse_body;
use crate::api::{state::AppState, ApiError};
use crate::domain::{BusyTransporter, NewTransporter, Transporter};

/// GET /api/transporters
pub async fn list_transporters(State(state): State<AppState>) -> Json<Vec<Transporter>> {
    Json(state.authority.list_transporters().await)
}

/// POST /api/transporters
pub async fn create_transporter(
    State(state): State<AppState>,
    payload: Result<Json<NewTransporter>, JsonRejection>,
) -> Result<(StatusCode, Json<Transporter>), ApiError> {
    let request = parse_body(payload)?;
    let transporter = state.authority.create_transporter(request).await?;
    Ok((StatusCode::CREATED, Json(transporter)))
}

/// GET /api/transporters/:id
pub async fn get_transporter(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Transporter>, ApiError> {
    Ok(Json(state.authority.get_transporter(&id).await?))
}

/// GET /api/transporters/busy
pub async fn get_busy_transporters(State(state): State<AppState>) -> Json<Vec<BusyTransporter>> {
    Json(state.authority.busy_transporters().await)
}
