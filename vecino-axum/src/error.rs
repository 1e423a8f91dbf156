use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use vecino_core::errors::VecinoError;

#[derive(Debug)]
pub struct VecinoAxumError(pub anyhow::Error);

impl From<anyhow::Error> for VecinoAxumError {
    fn from(e: anyhow::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for VecinoAxumError {
    fn into_response(self) -> Response {
        // If it is a VecinoError (even when wrapped by anyhow contexts),
        // preserve the structured fields.
        if let Some(err) = self.0.chain().find_map(|e| e.downcast_ref::<VecinoError>()) {
            let safe = err.sanitize_for_client();
            let status =
                StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            return (status, Json(safe.to_json())).into_response();
        }

        // Fallback: normalize wraps anything else as a GeneralError
        let safe = VecinoError::normalize(self.0).sanitize_for_client();
        let status =
            StatusCode::from_u16(safe.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(safe.to_json())).into_response()
    }
}
