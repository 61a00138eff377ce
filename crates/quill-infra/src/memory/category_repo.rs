use std::sync::Arc;

use async_trait::async_trait;

use quill_core::domain::{Category, CategoryDraft, CategoryUpdate, CategoryWithCount};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CategoryRepository};

use super::store::MemoryStore;

/// In-memory category repository.
#[derive(Clone)]
pub struct MemoryCategoryRepository {
    store: Arc<MemoryStore>,
}

impl MemoryCategoryRepository {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BaseRepository<Category, i32> for MemoryCategoryRepository {
    async fn delete(&self, id: i32) -> Result<Category, RepoError> {
        let mut tables = self.store.tables.write().await;
        let category = tables.categories.remove(&id).ok_or(RepoError::NotFound)?;
        tables.links.retain(|&(_, category_id)| category_id != id);
        Ok(category)
    }
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let tables = self.store.tables.read().await;

        let mut categories: Vec<CategoryWithCount> = tables
            .categories
            .values()
            .map(|c| CategoryWithCount {
                category: c.clone(),
                post_count: tables.links.iter().filter(|(_, id)| *id == c.id).count() as i64,
            })
            .collect();
        categories.sort_by(|a, b| a.category.name.cmp(&b.category.name));

        Ok(categories)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.store.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn insert(&self, draft: CategoryDraft) -> Result<Category, RepoError> {
        let mut tables = self.store.tables.write().await;
        tables.check_category_slug(&draft.slug, None)?;

        let category = Category {
            id: tables.next_category_id(),
            name: draft.name,
            description: draft.description,
            slug: draft.slug,
        };
        tables.categories.insert(category.id, category.clone());

        Ok(category)
    }

    async fn update(&self, id: i32, changes: CategoryUpdate) -> Result<Category, RepoError> {
        let mut tables = self.store.tables.write().await;
        if let Some(slug) = &changes.slug {
            tables.check_category_slug(slug, Some(id))?;
        }

        let category = tables.categories.get_mut(&id).ok_or(RepoError::NotFound)?;
        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(slug) = changes.slug {
            category.slug = slug;
        }
        if let Some(description) = changes.description {
            category.description = Some(description);
        }

        Ok(category.clone())
    }
}
