//! Post procedures.

use actix_web::{HttpResponse, web};

use quill_core::domain::{ListPosts, NewPost, PostChanges, SearchPosts};
use quill_core::services::UploadImage;
use quill_shared::dto::{ByIdRequest, BySlugRequest, SearchResponse};
use quill_shared::ApiResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/trpc/posts.list
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPosts>,
) -> AppResult<HttpResponse> {
    let page = state.posts.list(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(page)))
}

/// GET /api/trpc/posts.bySlug
///
/// Counts as a view: every successful call bumps the post's `views`.
pub async fn by_slug(
    state: web::Data<AppState>,
    query: web::Query<BySlugRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.by_slug(&query.slug).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// GET /api/trpc/posts.search
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchPosts>,
) -> AppResult<HttpResponse> {
    let items = state.posts.search(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(SearchResponse { items })))
}

/// POST /api/trpc/posts.create
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<NewPost>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/trpc/posts.update
pub async fn update(
    state: web::Data<AppState>,
    body: web::Json<PostChanges>,
) -> AppResult<HttpResponse> {
    let post = state.posts.update(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/trpc/posts.delete
pub async fn delete(
    state: web::Data<AppState>,
    body: web::Json<ByIdRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.delete(body.id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(post)))
}

/// POST /api/trpc/posts.uploadImage
pub async fn upload_image(
    state: web::Data<AppState>,
    body: web::Json<UploadImage>,
) -> AppResult<HttpResponse> {
    let image = state.images.upload(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(image)))
}
