use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::patch::Patch;

/// Post entity - a blog post with markdown content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub slug: String,
    pub published: bool,
    pub views: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub const TITLE_MAX: usize = 255;
    pub const IMAGE_URL_MAX: usize = 1024;
    pub const EXCERPT_LEN: usize = 200;

    /// First `EXCERPT_LEN` characters of the content.
    pub fn excerpt(&self) -> String {
        self.content.chars().take(Self::EXCERPT_LEN).collect()
    }
}

/// The part of a category shown next to a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: i32,
    pub name: String,
    pub slug: String,
}

/// A post as it appears in listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub published: bool,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub categories: Vec<CategoryRef>,
}

impl PostSummary {
    pub fn new(post: Post, categories: Vec<CategoryRef>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            published: post.published,
            image_url: post.image_url,
            created_at: post.created_at,
            categories,
        }
    }
}

/// A full post together with its categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub categories: Vec<CategoryRef>,
}

/// One page of a post listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub items: Vec<PostSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<i32>,
}

/// A search match with a short excerpt of the content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
}

impl From<Post> for SearchHit {
    fn from(post: Post) -> Self {
        let excerpt = post.excerpt();
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            excerpt,
        }
    }
}

/// Input of `posts.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ListPosts {
    pub category_id: Option<i32>,
    pub limit: Option<u64>,
    pub cursor: Option<i32>,
}

impl ListPosts {
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 100;
}

/// Input of `posts.search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SearchPosts {
    pub query: String,
    pub limit: Option<u64>,
}

impl SearchPosts {
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 50;
}

/// Input of `posts.create`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub published: bool,
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
}

/// Input of `posts.update`. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PostChanges {
    pub id: i32,
    pub title: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub category_ids: Patch<Vec<i32>>,
}

/// What a repository fetches for one listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostPageQuery {
    pub category_id: Option<i32>,
    /// Inclusive upper bound on the post id.
    pub cursor: Option<i32>,
    /// Rows to fetch, one more than the page size.
    pub fetch: u64,
}

/// A validated post ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub slug: String,
    pub published: bool,
    pub image_url: Option<String>,
    pub category_ids: Vec<i32>,
}

/// A validated set of post changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub published: Option<bool>,
    pub image_url: Option<String>,
    pub category_ids: Patch<Vec<i32>>,
}
