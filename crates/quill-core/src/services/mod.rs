//! Services - the query/mutation layer.
//!
//! Each service validates its input before touching storage, derives slugs,
//! and turns repository failures into [`DomainError`](crate::DomainError)s
//! callers can tell apart.

mod categories;
mod images;
mod posts;
mod seed;

pub use categories::CategoryService;
pub use images::{ImageService, UploadImage, UploadedImage};
pub use posts::PostService;
pub use seed::{SAMPLE_CATEGORIES, SAMPLE_POSTS, SeedService};
