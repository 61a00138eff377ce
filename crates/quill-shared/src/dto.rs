//! Data Transfer Objects - procedure inputs and outputs that are not domain
//! entities.

use serde::{Deserialize, Serialize};

/// Input of procedures addressing a row by id (`*.delete`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ByIdRequest {
    pub id: i32,
}

/// Input of procedures addressing a row by slug (`*.bySlug`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BySlugRequest {
    pub slug: String,
}

/// Output of `posts.search`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse<T> {
    pub items: Vec<T>,
}

/// Output of `seed.seed`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResponse {
    pub success: bool,
}

/// Output of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storage: String,
    pub timestamp: String,
}
