use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::types::ErrorBody;
use crate::error::{AssignmentError, AssignmentErrorKind};

/// Authority rejection rendered as `{"kind", "message"}`
#[derive(Debug)]
pub struct ApiError(pub AssignmentError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0.kind() {
            AssignmentErrorKind::NotFound => StatusCode::NOT_FOUND,
            AssignmentErrorKind::InvalidRequest => StatusCode::BAD_REQUEST,
            AssignmentErrorKind::VehicleTypeMismatch => StatusCode::UNPROCESSABLE_ENTITY,
            AssignmentErrorKind::TransporterBusy => StatusCode::CONFLICT,
        }
    }
}

impl From<AssignmentError> for ApiError {
    fn from(err: AssignmentError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            kind: self.0.kind(),
            message: self.0.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
