//! /api/links CRUD handlers

use actix_web::{HttpResponse, Responder, web};
use tracing::{info, trace};

use crate::errors::RegistryError;
use crate::services::{CreateLinkRequest, LinkService};

use super::types::{MessageBody, PostNewLink, error_response};

pub struct LinkApi;

impl LinkApi {
    pub async fn list_links(service: web::Data<LinkService>) -> impl Responder {
        trace!("API: request to list all links");

        match service.list_links().await {
            Ok(links) => {
                info!("API: returning {} links", links.len());
                HttpResponse::Ok().json(links)
            }
            Err(e) => error_response(&e),
        }
    }

    pub async fn create_link(
        service: web::Data<LinkService>,
        payload: web::Json<PostNewLink>,
    ) -> impl Responder {
        let PostNewLink { url, code } = payload.into_inner();

        let Some(url) = url else {
            return error_response(&RegistryError::invalid_url("Field 'url' is required"));
        };

        let req = CreateLinkRequest { url, code };
        match service.create_link(req).await {
            Ok(link) => HttpResponse::Created().json(link),
            Err(e) => error_response(&e),
        }
    }

    pub async fn get_link(
        service: web::Data<LinkService>,
        path: web::Path<String>,
    ) -> impl Responder {
        let code = path.into_inner();
        trace!("API: request to get link '{}'", code);

        match service.get_link(&code).await {
            Ok(link) => HttpResponse::Ok().json(link),
            Err(e) => error_response(&e),
        }
    }

    pub async fn delete_link(
        service: web::Data<LinkService>,
        path: web::Path<String>,
    ) -> impl Responder {
        let code = path.into_inner();

        match service.delete_link(&code).await {
            Ok(()) => HttpResponse::Ok().json(MessageBody {
                message: format!("Link '{}' deleted", code),
            }),
            Err(e) => error_response(&e),
        }
    }
}

pub fn link_routes() -> actix_web::Scope {
    web::scope("/api/links")
        .route("", web::get().to(LinkApi::list_links))
        .route("", web::post().to(LinkApi::create_link))
        .route("/{code}", web::get().to(LinkApi::get_link))
        .route("/{code}", web::delete().to(LinkApi::delete_link))
}
