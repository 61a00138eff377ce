//! Demo data procedure.

use actix_web::{HttpResponse, web};

use quill_shared::ApiResponse;
use quill_shared::dto::SeedResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/trpc/seed.seed
pub async fn seed(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    state.seed.run().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok_with_message(
        SeedResponse { success: true },
        "Sample data loaded",
    )))
}
