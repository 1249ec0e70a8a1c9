pub mod shipments;
pub mod system;
pub mod transporters;

pub use shipments::*;
pub use system::*;
pub use transporters::*;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::api::ApiError;
use crate::error::AssignmentError;

/// Malformed bodies surface as InvalidRequest rather than axum's plain-text rejection
pub(crate) fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError(AssignmentError::InvalidRequest(rejection.body_text())))
}
