//! In-memory repositories - used as fallback when no database is configured.
//!
//! Both repositories share one [`MemoryStore`], so links between posts and
//! categories behave like the SQL schema: unique slugs, checked references,
//! cascading deletes. Data is lost on process restart.

mod category_repo;
mod post_repo;
mod seed;
mod store;

pub use category_repo::MemoryCategoryRepository;
pub use post_repo::MemoryPostRepository;
pub use seed::MemorySeeder;
pub use store::MemoryStore;
