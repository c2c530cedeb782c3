//! 命令错误到 HTTP 应答的映射

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use drywall_client::CommandError;
use drywall_protocol::ErrorBody;

/// 处理函数的错误类型
///
/// - `ValidationFailed` → 400
/// - `SafetyRejected` / `TransitionRejected` → 409
#[derive(Debug)]
pub struct ApiError(pub CommandError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            CommandError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            CommandError::SafetyRejected(_) | CommandError::TransitionRejected { .. } => {
                StatusCode::CONFLICT
            },
        }
    }
}

impl From<CommandError> for ApiError {
    fn from(err: CommandError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.kind().to_string(),
            detail: self.0.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
