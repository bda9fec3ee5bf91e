use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, trace};

use crate::services::RedirectResolver;
use crate::storage::LinkStore;

use super::types::{HealthResponse, HealthStorage};

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

/// Health Service
///
/// 直接 ping 存储，不经过 LinkService。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        store: web::Data<Arc<dyn LinkStore>>,
        resolver: web::Data<RedirectResolver>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        // ping 自带超时，超时即返回 StoreUnavailable
        let healthy = match store.ping().await {
            Ok(()) => true,
            Err(e) => {
                error!("Storage health check failed: {}", e);
                false
            }
        };

        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;

        let body = HealthResponse {
            ok: healthy,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime,
            storage: HealthStorage {
                backend: store.backend_name().to_string(),
                status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
            },
            clicks: resolver.accounting().snapshot(),
        };

        trace!("Health check completed in {:?}", start_time.elapsed());

        let status = if healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        HttpResponse::build(status).json(body)
    }
}

pub fn health_routes() -> actix_web::Resource {
    web::resource("/healthz").route(web::get().to(HealthService::health_check))
}
