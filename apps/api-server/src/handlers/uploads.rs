//! Serves uploaded images back from the upload directory.

use actix_web::{HttpResponse, web};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /uploads/{name}
pub async fn serve(
    state: web::Data<AppState>,
    name: web::Path<String>,
) -> AppResult<HttpResponse> {
    let name = name.into_inner();
    // Stored names are flat; anything else is a traversal attempt
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(AppError::BadRequest(format!("invalid file name '{}'", name)));
    }

    let path = state.upload_dir.join(&name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("upload '{}' not found", name)));
        }
        Err(e) => return Err(AppError::Internal(e.to_string())),
    };

    let mime = mime_guess::from_path(&name).first_or_octet_stream();
    Ok(HttpResponse::Ok()
        .content_type(mime.essence_str())
        .body(bytes))
}
