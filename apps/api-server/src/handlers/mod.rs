//! HTTP handlers and route configuration.
//!
//! Procedures live under `/api/trpc/<router>.<procedure>`: queries are `GET`
//! with their input in the query string, mutations are `POST` with a JSON body.

mod categories;
mod health;
mod posts;
mod seed;
mod uploads;


use actix_web::web;

use crate::middleware::error::reject_input;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(reject_input))
        .app_data(web::QueryConfig::default().error_handler(reject_input))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health::health_check))
                .service(
                    web::scope("/trpc")
                        // Posts
                        .route("/posts.list", web::get().to(posts::list))
                        .route("/posts.bySlug", web::get().to(posts::by_slug))
                        .route("/posts.search", web::get().to(posts::search))
                        .route("/posts.create", web::post().to(posts::create))
                        .route("/posts.update", web::post().to(posts::update))
                        .route("/posts.delete", web::post().to(posts::delete))
                        .route("/posts.uploadImage", web::post().to(posts::upload_image))
                        // Categories
                        .route("/categories.list", web::get().to(categories::list))
                        .route("/categories.bySlug", web::get().to(categories::by_slug))
                        .route("/categories.create", web::post().to(categories::create))
                        .route("/categories.update", web::post().to(categories::update))
                        .route("/categories.delete", web::post().to(categories::delete))
                        // Demo data
                        .route("/seed.seed", web::post().to(seed::seed)),
                ),
        )
        .route("/uploads/{name}", web::get().to(uploads::serve));
}
