use std::sync::Arc;

use crate::domain::{
    ListPosts, NewPost, Post, PostChanges, PostDetail, PostDraft, PostPage, PostPageQuery,
    PostUpdate, SearchHit, SearchPosts, Violations, slugify,
};
use crate::error::{DomainError, FieldError, RepoError};
use crate::ports::PostRepository;

const ENTITY: &str = "post";

/// Listing, lookup, search and mutation of posts.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// One page of posts, newest first.
    ///
    /// Fetches one row more than asked for; when that extra row exists it is
    /// dropped and its id becomes `next_cursor`, so the next page starts with
    /// it.
    pub async fn list(&self, input: ListPosts) -> Result<PostPage, DomainError> {
        let limit = input.limit.unwrap_or(ListPosts::DEFAULT_LIMIT);
        let mut violations = Violations::new();
        violations.range("limit", limit, 1, ListPosts::MAX_LIMIT);
        violations.finish()?;

        let mut items = self
            .posts
            .list(PostPageQuery {
                category_id: input.category_id,
                cursor: input.cursor,
                fetch: limit + 1,
            })
            .await
            .map_err(|e| e.into_domain(ENTITY, "page"))?;

        let next_cursor = if items.len() as u64 > limit {
            items.pop().map(|extra| extra.id)
        } else {
            None
        };

        tracing::debug!(count = items.len(), ?next_cursor, "Listed posts");
        Ok(PostPage { items, next_cursor })
    }

    /// Fetch a post by slug, counting the read as a view.
    pub async fn by_slug(&self, slug: &str) -> Result<PostDetail, DomainError> {
        if slug.trim().is_empty() {
            return Err(DomainError::invalid("slug", "must not be empty"));
        }

        self.posts
            .view_by_slug(slug)
            .await
            .map_err(|e| e.into_domain(ENTITY, slug))?
            .ok_or_else(|| DomainError::not_found(ENTITY, slug))
    }

    pub async fn create(&self, input: NewPost) -> Result<Post, DomainError> {
        let mut violations = Violations::new();
        violations.text("title", &input.title, Post::TITLE_MAX);
        violations.text("content", &input.content, usize::MAX);
        if let Some(url) = &input.image_url {
            check_image_url(&mut violations, url);
        }
        let slug = slugify(&input.title);
        if violations.is_empty() && slug.is_empty() {
            violations.add("title", "must contain at least one letter or digit");
        }
        violations.finish()?;

        let draft = PostDraft {
            title: input.title.trim().to_string(),
            content: input.content,
            slug,
            published: input.published,
            image_url: input.image_url,
            category_ids: dedup(input.category_ids),
        };
        let slug = draft.slug.clone();

        let post = self
            .posts
            .insert(draft)
            .await
            .map_err(|e| write_error(e, &slug))?;

        tracing::info!(post_id = post.id, slug = %post.slug, "Post created");
        Ok(post)
    }

    /// Partial update. `category_ids` replaces the whole association set when
    /// present, even if empty.
    pub async fn update(&self, input: PostChanges) -> Result<Post, DomainError> {
        let mut violations = Violations::new();
        if let Some(title) = &input.title {
            violations.text("title", title, Post::TITLE_MAX);
        }
        if let Some(content) = &input.content {
            violations.text("content", content, usize::MAX);
        }
        if let Some(url) = &input.image_url {
            check_image_url(&mut violations, url);
        }
        let slug = input.title.as_deref().map(slugify);
        if violations.is_empty() && slug.as_deref() == Some("") {
            violations.add("title", "must contain at least one letter or digit");
        }
        violations.finish()?;

        let id = input.id;
        let changes = PostUpdate {
            title: input.title.map(|t| t.trim().to_string()),
            slug,
            content: input.content,
            published: input.published,
            image_url: input.image_url,
            category_ids: input.category_ids.map(dedup),
        };
        let slug_hint = changes.slug.clone().unwrap_or_default();

        let post = self
            .posts
            .update(id, changes)
            .await
            .map_err(|e| match e {
                RepoError::NotFound => DomainError::not_found(ENTITY, id),
                other => write_error(other, &slug_hint),
            })?;

        tracing::info!(post_id = post.id, slug = %post.slug, "Post updated");
        Ok(post)
    }

    pub async fn delete(&self, id: i32) -> Result<Post, DomainError> {
        let post = self
            .posts
            .delete(id)
            .await
            .map_err(|e| e.into_domain(ENTITY, id))?;

        tracing::info!(post_id = post.id, "Post deleted");
        Ok(post)
    }

    /// Case-insensitive substring search, oldest match first.
    pub async fn search(&self, input: SearchPosts) -> Result<Vec<SearchHit>, DomainError> {
        let limit = input.limit.unwrap_or(SearchPosts::DEFAULT_LIMIT);
        let needle = input.query.trim();
        let mut violations = Violations::new();
        if needle.is_empty() {
            violations.add("query", "must not be empty");
        }
        violations.range("limit", limit, 1, SearchPosts::MAX_LIMIT);
        violations.finish()?;

        let posts = self
            .posts
            .search(needle, limit)
            .await
            .map_err(|e| e.into_domain(ENTITY, needle))?;

        Ok(posts.into_iter().map(SearchHit::from).collect())
    }
}

fn check_image_url(violations: &mut Violations, url: &str) {
    if url.len() > Post::IMAGE_URL_MAX {
        violations.add(
            "imageUrl",
            format!("must be at most {} characters", Post::IMAGE_URL_MAX),
        );
    } else if !(url.starts_with("https://") || url.starts_with("http://") || url.starts_with('/'))
    {
        violations.add("imageUrl", "must be an http(s) URL or an absolute path");
    }
}

fn dedup(mut ids: Vec<i32>) -> Vec<i32> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn write_error(err: RepoError, slug: &str) -> DomainError {
    match err {
        RepoError::Constraint(_) => {
            DomainError::Duplicate(format!("a post with slug '{slug}' already exists"))
        }
        RepoError::MissingReference(_) => DomainError::Validation(vec![FieldError::new(
            "categoryIds",
            "refers to a category that does not exist",
        )]),
        other => other.into_domain(ENTITY, slug),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::{Patch, PostSummary};
    use crate::ports::BaseRepository;

    /// Records every call so tests can assert that validation happens first.
    #[derive(Default)]
    struct RecordingRepo {
        calls: Mutex<Vec<&'static str>>,
        page: Vec<i32>,
    }

    impl RecordingRepo {
        fn with_page(ids: &[i32]) -> Self {
            Self {
                calls: Mutex::default(),
                page: ids.to_vec(),
            }
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, name: &'static str) {
            self.calls.lock().unwrap().push(name);
        }
    }

    fn summary(id: i32) -> PostSummary {
        PostSummary {
            id,
            title: format!("Post {id}"),
            slug: format!("post-{id}"),
            published: true,
            image_url: None,
            created_at: chrono::Utc::now(),
            categories: vec![],
        }
    }

    #[async_trait]
    impl BaseRepository<Post, i32> for RecordingRepo {
        async fn delete(&self, _id: i32) -> Result<Post, RepoError> {
            self.record("delete");
            Err(RepoError::NotFound)
        }
    }

    #[async_trait]
    impl PostRepository for RecordingRepo {
        async fn list(&self, query: PostPageQuery) -> Result<Vec<PostSummary>, RepoError> {
            self.record("list");
            Ok(self
                .page
                .iter()
                .take(query.fetch as usize)
                .map(|id| summary(*id))
                .collect())
        }

        async fn view_by_slug(&self, _slug: &str) -> Result<Option<PostDetail>, RepoError> {
            self.record("view_by_slug");
            Ok(None)
        }

        async fn insert(&self, _draft: PostDraft) -> Result<Post, RepoError> {
            self.record("insert");
            Err(RepoError::Constraint("posts_slug_key".into()))
        }

        async fn update(&self, _id: i32, _changes: PostUpdate) -> Result<Post, RepoError> {
            self.record("update");
            Err(RepoError::NotFound)
        }

        async fn search(&self, _needle: &str, _limit: u64) -> Result<Vec<Post>, RepoError> {
            self.record("search");
            Ok(vec![])
        }
    }

    fn service(repo: &Arc<RecordingRepo>) -> PostService {
        PostService::new(repo.clone())
    }

    fn changes(id: i32) -> PostChanges {
        PostChanges {
            id,
            title: None,
            content: None,
            published: None,
            image_url: None,
            category_ids: Patch::Keep,
        }
    }

    #[tokio::test]
    async fn empty_title_update_is_rejected_before_any_write() {
        let repo = Arc::new(RecordingRepo::default());
        let result = service(&repo)
            .update(PostChanges {
                title: Some(String::new()),
                ..changes(7)
            })
            .await;

        match result {
            Err(DomainError::Validation(errors)) => assert_eq!(errors[0].field, "title"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn create_reports_every_invalid_field() {
        let repo = Arc::new(RecordingRepo::default());
        let result = service(&repo)
            .create(NewPost {
                title: "  ".into(),
                content: String::new(),
                published: false,
                image_url: Some("ftp://example.com/x.png".into()),
                category_ids: vec![],
            })
            .await;

        match result {
            Err(DomainError::Validation(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, ["title", "content", "imageUrl"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn title_without_slug_characters_is_rejected() {
        let repo = Arc::new(RecordingRepo::default());
        let result = service(&repo)
            .create(NewPost {
                title: "???".into(),
                content: "body".into(),
                published: false,
                image_url: None,
                category_ids: vec![],
            })
            .await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn unique_violation_becomes_duplicate_naming_the_slug() {
        let repo = Arc::new(RecordingRepo::default());
        let result = service(&repo)
            .create(NewPost {
                title: "Hello World".into(),
                content: "body".into(),
                published: false,
                image_url: None,
                category_ids: vec![],
            })
            .await;

        match result {
            Err(DomainError::Duplicate(msg)) => assert!(msg.contains("hello-world")),
            other => panic!("expected duplicate, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn update_of_missing_post_is_not_found() {
        let repo = Arc::new(RecordingRepo::default());
        let result = service(&repo).update(changes(42)).await;
        assert!(matches!(
            result,
            Err(DomainError::NotFound { entity_type: "post", .. })
        ));
    }

    #[tokio::test]
    async fn list_trims_the_lookahead_row_into_a_cursor() {
        let repo = Arc::new(RecordingRepo::with_page(&[9, 8, 7]));
        let page = service(&repo)
            .list(ListPosts {
                limit: Some(2),
                ..ListPosts::default()
            })
            .await
            .unwrap();

        let ids: Vec<_> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, [9, 8]);
        assert_eq!(page.next_cursor, Some(7));
    }

    #[tokio::test]
    async fn list_rejects_out_of_range_limits() {
        let repo = Arc::new(RecordingRepo::default());
        for limit in [0, 101] {
            let result = service(&repo)
                .list(ListPosts {
                    limit: Some(limit),
                    ..ListPosts::default()
                })
                .await;
            assert!(matches!(result, Err(DomainError::Validation(_))));
        }
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn search_requires_a_query() {
        let repo = Arc::new(RecordingRepo::default());
        let result = service(&repo)
            .search(SearchPosts {
                query: "   ".into(),
                limit: None,
            })
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let result = service(&repo)
            .search(SearchPosts {
                query: "rust".into(),
                limit: Some(51),
            })
            .await;
        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(repo.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let repo = Arc::new(RecordingRepo::default());
        let result = service(&repo).by_slug("missing").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
        assert_eq!(repo.calls(), ["view_by_slug"]);
    }
}
