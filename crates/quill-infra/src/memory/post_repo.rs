use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use quill_core::domain::{
    Patch, Post, PostDetail, PostDraft, PostPageQuery, PostSummary, PostUpdate, slugify,
};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository};

use super::store::MemoryStore;

/// In-memory post repository.
#[derive(Clone)]
pub struct MemoryPostRepository {
    store: Arc<MemoryStore>,
}

impl MemoryPostRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for MemoryPostRepository {
    async fn delete(&self, id: i32) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        let post = tables.posts.remove(&id).ok_or(RepoError::NotFound)?;
        tables.links.retain(|&(post_id, _)| post_id != id);
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn list(&self, query: PostPageQuery) -> Result<Vec<PostSummary>, RepoError> {
        let tables = self.store.tables.read().await;

        let mut posts: Vec<&Post> = tables
            .posts
            .values()
            .filter(|p| query.cursor.is_none_or(|cursor| p.id <= cursor))
            .filter(|p| {
                query
                    .category_id
                    .is_none_or(|category_id| tables.links.contains(&(p.id, category_id)))
            })
            .collect();
        posts.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(posts
            .into_iter()
            .take(query.fetch as usize)
            .map(|p| PostSummary::new(p.clone(), tables.categories_of(p.id)))
            .collect())
    }

    async fn view_by_slug(&self, slug: &str) -> Result<Option<PostDetail>, RepoError> {
        let mut tables = self.store.tables.write().await;

        let Some(post) = tables.posts.values_mut().find(|p| p.slug == slug) else {
            return Ok(None);
        };
        post.views += 1;
        let post = post.clone();

        let categories = tables.categories_of(post.id);
        Ok(Some(PostDetail { post, categories }))
    }

    async fn insert(&self, draft: PostDraft) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.check_post_slug(&draft.slug, None)?;
        tables.check_categories_exist(&draft.category_ids)?;

        let now = Utc::now();
        let post = Post {
            id: tables.next_post_id(),
            title: draft.title,
            content: draft.content,
            slug: draft.slug,
            published: draft.published,
            views: 0,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        };
        tables.replace_links(post.id, &draft.category_ids);
        tables.posts.insert(post.id, post.clone());

        Ok(post)
    }

    async fn update(&self, id: i32, changes: PostUpdate) -> Result<Post, RepoError> {
        let mut tables = self.store.tables.write().await;
        if !tables.posts.contains_key(&id) {
            return Err(RepoError::NotFound);
        }
        if let Some(slug) = &changes.slug {
            tables.check_post_slug(slug, Some(id))?;
        }
        if let Patch::Replace(category_ids) = &changes.category_ids {
            tables.check_categories_exist(category_ids)?;
            tables.replace_links(id, category_ids);
        }

        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(slug) = changes.slug {
            post.slug = slug;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(published) = changes.published {
            post.published = published;
        }
        if let Some(image_url) = changes.image_url {
            post.image_url = Some(image_url);
        }
        post.updated_at = Utc::now();

        Ok(post.clone())
    }

    async fn search(&self, needle: &str, limit: u64) -> Result<Vec<Post>, RepoError> {
        let slug = slugify(needle);
        let needle = needle.to_lowercase();
        let tables = self.store.tables.read().await;

        Ok(tables
            .posts
            .values()
            .filter(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.content.to_lowercase().contains(&needle)
                    || (!slug.is_empty() && p.slug.contains(&slug))
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
