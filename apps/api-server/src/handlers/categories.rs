//! Category procedures.

use actix_web::{HttpResponse, web};

use quill_core::domain::{CategoryChanges, NewCategory};
use quill_shared::dto::{ByIdRequest, BySlugRequest};
use quill_shared::ApiResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/trpc/categories.list
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(categories)))
}

/// GET /api/trpc/categories.bySlug
pub async fn by_slug(
    state: web::Data<AppState>,
    query: web::Query<BySlugRequest>,
) -> AppResult<HttpResponse> {
    let category = state.categories.by_slug(&query.slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// POST /api/trpc/categories.create
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<NewCategory>,
) -> AppResult<HttpResponse> {
    let category = state.categories.create(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// POST /api/trpc/categories.update
pub async fn update(
    state: web::Data<AppState>,
    body: web::Json<CategoryChanges>,
) -> AppResult<HttpResponse> {
    let category = state.categories.update(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}

/// POST /api/trpc/categories.delete
///
/// Removes the category's post links; the posts themselves stay.
pub async fn delete(
    state: web::Data<AppState>,
    body: web::Json<ByIdRequest>,
) -> AppResult<HttpResponse> {
    let category = state.categories.delete(body.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(category)))
}
