use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use super::parse_body;
use crate::api::{
    state::AppState,
    types::{AssignRequest, StatusRequest},
    ApiError,
};
use crate::domain::{NewShipment, Shipment};
use crate::viewmodel::CandidateSet;

/// GET /api/shipments
pub async fn list_shipments(State(state): State<AppState>) -> Json<Vec<Shipment>> {
    Json(state.authority.list_shipments().await)
}

/// POST /api/shipments
pub async fn create_shipment(
    State(state): State<AppState>,
    payload: Result<Json<NewShipment>, JsonRejection>,
) -> Result<(StatusCode, Json<Shipment>), ApiError> {
    let request = parse_body(payload)?;
    let shipment = state.authority.create_shipment(request).await?;
    Ok((StatusCode::CREATED, Json(shipment)))
}

/// GET /api/shipments/:id
pub async fn get_shipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Shipment>, ApiError> {
    Ok(Json(state.authority.get_shipment(&id).await?))
}

/// PUT /api/shipments/:id/assign
pub async fn assign_shipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AssignRequest>, JsonRejection>,
) -> Result<Json<Shipment>, ApiError> {
    // An unknown shipment outranks a malformed body
    let request = match parse_body(payload) {
        Ok(request) => request,
        Err(e) => {
            state.authority.get_shipment(&id).await?;
            return Err(e);
        }
    };
    let transporter_id = request.transporter_id.unwrap_or_default();
    let shipment = state.authority.assign(&id, &transporter_id).await?;
    Ok(Json(shipment))
}

/// PATCH /api/shipments/:id/status
pub async fn update_shipment_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<Shipment>, ApiError> {
    let request = match parse_body(payload) {
        Ok(request) => request,
        Err(e) => {
            state.authority.get_shipment(&id).await?;
            return Err(e);
        }
    };
    let shipment = state
        .authority
        .advance_status_raw(&id, request.status.as_deref())
        .await?;
    Ok(Json(shipment))
}

/// GET /api/shipments/:id/candidates
pub async fn get_candidates(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CandidateSet>, ApiError> {
    Ok(Json(state.view_model.candidates(&id).await?))
}
