//! Demo data loading port.

use async_trait::async_trait;

use crate::error::RepoError;

/// A category in the demo data set.
#[derive(Debug, Clone, Copy)]
pub struct SampleCategory {
    pub name: &'static str,
    pub description: &'static str,
}

/// A post in the demo data set, linked to categories by name.
#[derive(Debug, Clone, Copy)]
pub struct SamplePost {
    pub title: &'static str,
    pub content: &'static str,
    pub published: bool,
    pub categories: &'static [&'static str],
}

/// Loads demo data. Loading twice must not duplicate anything.
#[async_trait]
pub trait Seeder: Send + Sync {
    async fn load(
        &self,
        categories: &[SampleCategory],
        posts: &[SamplePost],
    ) -> Result<(), RepoError>;
}
