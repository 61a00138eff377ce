use std::collections::{BTreeMap, BTreeSet};

use tokio::sync::RwLock;

use quill_core::domain::{Category, CategoryRef, Post};
use quill_core::error::RepoError;

/// Tables of the in-memory store.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub posts: BTreeMap<i32, Post>,
    pub categories: BTreeMap<i32, Category>,
    /// `(post_id, category_id)` pairs.
    pub links: BTreeSet<(i32, i32)>,
    next_post_id: i32,
    next_category_id: i32,
}

impl Tables {
    pub fn next_post_id(&mut self) -> i32 {
        self.next_post_id += 1;
        self.next_post_id
    }

    pub fn next_category_id(&mut self) -> i32 {
        self.next_category_id += 1;
        self.next_category_id
    }

    /// Reject a post slug already used by another post.
    pub fn check_post_slug(&self, slug: &str, except: Option<i32>) -> Result<(), RepoError> {
        let taken = self
            .posts
            .values()
            .any(|p| p.slug == slug && Some(p.id) != except);
        if taken {
            return Err(RepoError::Constraint(format!("posts.slug = {slug}")));
        }
        Ok(())
    }

    pub fn check_category_slug(&self, slug: &str, except: Option<i32>) -> Result<(), RepoError> {
        let taken = self
            .categories
            .values()
            .any(|c| c.slug == slug && Some(c.id) != except);
        if taken {
            return Err(RepoError::Constraint(format!("categories.slug = {slug}")));
        }
        Ok(())
    }

    pub fn check_categories_exist(&self, ids: &[i32]) -> Result<(), RepoError> {
        match ids.iter().find(|id| !self.categories.contains_key(id)) {
            Some(id) => Err(RepoError::MissingReference(format!("categories.id = {id}"))),
            None => Ok(()),
        }
    }

    pub fn replace_links(&mut self, post_id: i32, category_ids: &[i32]) {
        self.links.retain(|&(p, _)| p != post_id);
        self.links
            .extend(category_ids.iter().map(|&category_id| (post_id, category_id)));
    }

    /// Categories of a post, sorted by name.
    pub fn categories_of(&self, post_id: i32) -> Vec<CategoryRef> {
        let mut refs: Vec<CategoryRef> = self
            .links
            .range((post_id, i32::MIN)..=(post_id, i32::MAX))
            .filter_map(|(_, category_id)| self.categories.get(category_id))
            .map(|c| CategoryRef {
                id: c.id,
                name: c.name.clone(),
                slug: c.slug.clone(),
            })
            .collect();
        refs.sort_by(|a, b| a.name.cmp(&b.name));
        refs
    }
}

/// Shared in-memory storage behind an async RwLock.
///
/// Every mutation holds the write lock for its whole duration, which gives
/// the same all-or-nothing behaviour as a database transaction.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}
