//! Request / response bodies and the error → status mapping

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::errors::RegistryError;
use crate::services::ClickAccountingSnapshot;

/// POST /api/links 请求体
#[derive(Deserialize, Debug, Clone)]
pub struct PostNewLink {
    pub url: Option<String>,
    pub code: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthStorage {
    pub backend: String,
    pub status: String,
}

/// GET /healthz 响应体
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
    /// 运行秒数
    pub uptime: u64,
    pub storage: HealthStorage,
    pub clicks: ClickAccountingSnapshot,
}

/// HTTP status for each registry failure
pub fn error_status(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::InvalidUrl(_) | RegistryError::InvalidCode(_) => StatusCode::BAD_REQUEST,
        RegistryError::CodeTaken(_) => StatusCode::CONFLICT,
        RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
        RegistryError::GenerationExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
        RegistryError::StoreUnavailable(_) | RegistryError::DatabaseConfig(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// 构建 JSON 错误响应
pub fn error_response(err: &RegistryError) -> HttpResponse {
    let status = error_status(err);
    if err.is_client_error() {
        debug!("API: request rejected: {}", err);
    } else {
        error!("API: request failed: {}", err);
    }

    // 存储故障不向调用方暴露细节
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        "Internal server error".to_string()
    } else {
        err.message().to_string()
    };

    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ErrorBody { error: message })
}
