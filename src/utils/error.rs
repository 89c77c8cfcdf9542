use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// 回應給呼叫端的固定錯誤訊息
pub const BAD_BODY_MESSAGE: &str = "Failed to parse request body";
pub const NOT_FOUND_MESSAGE: &str = "Data not found";

#[derive(Error, Debug)]
pub enum ApiError {
    /// 請求內容無法解析，不會送往 store
    #[error("{message}")]
    BadRequest { message: String },

    /// store 有回應但回報失敗，狀態碼原樣轉送
    #[error("{message}")]
    StoreError { status: u16, message: String },

    #[error("{0}")]
    TransportError(#[from] reqwest::Error),

    #[error("{0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unexpected store response: {message}")]
    MalformedResponse { message: String },

    /// 僅 Delete 使用：傳輸成功但 result 不是 "deleted"
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

impl ApiError {
    pub fn bad_request() -> Self {
        Self::BadRequest {
            message: BAD_BODY_MESSAGE.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::StoreError { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::TransportError(_)
            | Self::SerializationError(_)
            | Self::MalformedResponse { .. }
            | Self::IoError(_)
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed ({}): {}", status, self);
        } else {
            tracing::debug!("Request rejected ({}): {}", status, self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
