use async_trait::async_trait;

use crate::domain::{
    Category, CategoryDraft, CategoryUpdate, CategoryWithCount, Post, PostDetail, PostDraft,
    PostPageQuery, PostSummary, PostUpdate,
};
use crate::error::RepoError;

/// Generic repository trait defining the operations every table shares.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Delete an entity by its ID and return the removed row.
    async fn delete(&self, id: ID) -> Result<T, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    /// Newest posts first, `query.fetch` rows at most.
    async fn list(&self, query: PostPageQuery) -> Result<Vec<PostSummary>, RepoError>;

    /// Bump the view counter of the post with this slug and return it, in one
    /// atomic step.
    async fn view_by_slug(&self, slug: &str) -> Result<Option<PostDetail>, RepoError>;

    /// Insert a post and its category links atomically.
    async fn insert(&self, draft: PostDraft) -> Result<Post, RepoError>;

    /// Apply changes (and replace category links if asked) atomically.
    async fn update(&self, id: i32, changes: PostUpdate) -> Result<Post, RepoError>;

    /// Case-insensitive substring search over title, content and slug,
    /// ascending id.
    async fn search(&self, needle: &str, limit: u64) -> Result<Vec<Post>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, i32> {
    /// Every category with its live post count, by name.
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    async fn insert(&self, draft: CategoryDraft) -> Result<Category, RepoError>;

    async fn update(&self, id: i32, changes: CategoryUpdate) -> Result<Category, RepoError>;
}
