pub mod health;
pub mod links;
pub mod redirect;
pub mod types;

use actix_web::{HttpResponse, error, web};
use tracing::debug;

pub use health::{AppStartTime, HealthService, health_routes};
pub use links::{LinkApi, link_routes};
pub use redirect::{RedirectService, redirect_routes};

/// Register every route. The catch-all redirect goes last.
///
/// Expects `web::Data` for `LinkService`, `RedirectResolver`,
/// `Arc<dyn LinkStore>` and `AppStartTime` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().limit(64 * 1024).error_handler(
        |err, _req| {
            debug!("API: malformed request body: {}", err);
            let response = HttpResponse::BadRequest().json(types::ErrorBody {
                error: format!("Invalid request body: {}", err),
            });
            error::InternalError::from_response(err, response).into()
        },
    ))
    .service(health_routes())
    .service(link_routes())
    .service(redirect_routes());
}
