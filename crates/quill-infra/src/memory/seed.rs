use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use quill_core::domain::{Category, Post, slugify};
use quill_core::error::RepoError;
use quill_core::ports::{SampleCategory, SamplePost, Seeder};

use super::store::MemoryStore;

/// Seeds the in-memory store, skipping rows whose slug already exists.
#[derive(Clone)]
pub struct MemorySeeder {
    store: Arc<MemoryStore>,
}

impl MemorySeeder {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Seeder for MemorySeeder {
    async fn load(
        &self,
        categories: &[SampleCategory],
        posts: &[SamplePost],
    ) -> Result<(), RepoError> {
        let mut tables = self.store.tables.write().await;

        for sample in categories {
            let slug = slugify(sample.name);
            if tables.check_category_slug(&slug, None).is_err() {
                continue;
            }
            let id = tables.next_category_id();
            tables.categories.insert(
                id,
                Category {
                    id,
                    name: sample.name.to_string(),
                    description: Some(sample.description.to_string()),
                    slug,
                },
            );
        }

        for sample in posts {
            let slug = slugify(sample.title);
            let existing = tables.posts.values().find(|p| p.slug == slug).map(|p| p.id);
            let post_id = match existing {
                Some(id) => id,
                None => {
                    let id = tables.next_post_id();
                    let now = Utc::now();
                    tables.posts.insert(
                        id,
                        Post {
                            id,
                            title: sample.title.to_string(),
                            content: sample.content.to_string(),
                            slug,
                            published: sample.published,
                            views: 0,
                            image_url: None,
                            created_at: now,
                            updated_at: now,
                        },
                    );
                    id
                }
            };

            let category_ids: Vec<i32> = sample
                .categories
                .iter()
                .filter_map(|name| {
                    let slug = slugify(name);
                    tables.categories.values().find(|c| c.slug == slug).map(|c| c.id)
                })
                .collect();
            tables
                .links
                .extend(category_ids.into_iter().map(|category_id| (post_id, category_id)));
        }

        Ok(())
    }
}
