use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, error};

use crate::errors::RegistryError;
use crate::services::RedirectResolver;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        resolver: web::Data<RedirectResolver>,
    ) -> impl Responder {
        let code = path.into_inner();

        match resolver.resolve(&code).await {
            Ok(url) => HttpResponse::build(StatusCode::FOUND)
                .insert_header(("Location", url))
                .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
                .finish(),
            Err(RegistryError::NotFound(_)) => {
                debug!("Redirect link not found: {}", code);
                Self::not_found_response()
            }
            Err(e) => {
                error!("Redirect lookup failed for '{}': {}", code, e);
                Self::error_response()
            }
        }
    }

    #[inline]
    fn not_found_response() -> HttpResponse {
        HttpResponse::build(StatusCode::NOT_FOUND)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Not Found")
    }

    #[inline]
    fn error_response() -> HttpResponse {
        HttpResponse::build(StatusCode::INTERNAL_SERVER_ERROR)
            .insert_header(("Content-Type", "text/html; charset=utf-8"))
            .body("Internal Server Error")
    }
}

pub fn redirect_routes() -> actix_web::Resource {
    web::resource("/{code}").route(web::get().to(RedirectService::handle_redirect))
}
