//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, LikeExpr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, FromQueryResult,
    JoinType, LoaderTrait, ModelTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    TransactionTrait,
};

use quill_core::domain::{
    Category, CategoryDraft, CategoryRef, CategoryUpdate, CategoryWithCount, Patch, Post,
    PostDetail, PostDraft, PostPageQuery, PostSummary, PostUpdate, slugify,
};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, PostRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_category::{self, Entity as PostCategoryEntity};
use super::postgres_base::{PostgresBaseRepository, classify};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// Insert one junction row per category id. No-op for an empty list.
async fn link_categories<C>(db: &C, post_id: i32, category_ids: &[i32]) -> Result<(), RepoError>
where
    C: ConnectionTrait,
{
    if category_ids.is_empty() {
        return Ok(());
    }

    let rows = category_ids.iter().map(|&category_id| post_category::ActiveModel {
        post_id: Set(post_id),
        category_id: Set(category_id),
    });
    PostCategoryEntity::insert_many(rows)
        .exec_without_returning(db)
        .await
        .map_err(classify)?;

    Ok(())
}

fn sorted_refs(models: Vec<category::Model>) -> Vec<CategoryRef> {
    let mut refs: Vec<CategoryRef> = models.into_iter().map(Into::into).collect();
    refs.sort_by(|a, b| a.name.cmp(&b.name));
    refs
}

/// Escape LIKE wildcards so the needle is matched literally.
fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn list(&self, query: PostPageQuery) -> Result<Vec<PostSummary>, RepoError> {
        tracing::debug!(?query, "Listing posts");

        // The serial id is the creation order, so it alone is both the sort
        // key and the cursor.
        let mut select = PostEntity::find()
            .order_by_desc(post::Column::Id)
            .limit(query.fetch);

        if let Some(cursor) = query.cursor {
            select = select.filter(post::Column::Id.lte(cursor));
        }

        if let Some(category_id) = query.category_id {
            select = select.filter(
                post::Column::Id.in_subquery(
                    Query::select()
                        .column(post_category::Column::PostId)
                        .from(PostCategoryEntity)
                        .and_where(post_category::Column::CategoryId.eq(category_id))
                        .to_owned(),
                ),
            );
        }

        let posts = select.all(self.db.as_ref()).await.map_err(classify)?;
        let categories = posts
            .load_many_to_many(CategoryEntity, PostCategoryEntity, self.db.as_ref())
            .await
            .map_err(classify)?;

        Ok(posts
            .into_iter()
            .zip(categories)
            .map(|(model, cats)| PostSummary::new(model.into(), sorted_refs(cats)))
            .collect())
    }

    async fn view_by_slug(&self, slug: &str) -> Result<Option<PostDetail>, RepoError> {
        // UPDATE ... SET views = views + 1 ... RETURNING *: the read and the
        // bump are one statement, so concurrent readers never lose a view.
        let bumped = PostEntity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Slug.eq(slug))
            .exec_with_returning(self.db.as_ref())
            .await
            .map_err(classify)?;

        let Some(model) = bumped.into_iter().next() else {
            return Ok(None);
        };

        let categories = model
            .find_related(CategoryEntity)
            .all(self.db.as_ref())
            .await
            .map_err(classify)?;

        Ok(Some(PostDetail {
            post: model.into(),
            categories: sorted_refs(categories),
        }))
    }

    async fn insert(&self, mut draft: PostDraft) -> Result<Post, RepoError> {
        let category_ids = std::mem::take(&mut draft.category_ids);
        let txn = self.db.begin().await.map_err(classify)?;

        let model = post::ActiveModel::from(draft)
            .insert(&txn)
            .await
            .map_err(classify)?;
        link_categories(&txn, model.id, &category_ids).await?;

        txn.commit().await.map_err(classify)?;
        tracing::debug!(post_id = model.id, links = category_ids.len(), "Inserted post");
        Ok(model.into())
    }

    async fn update(&self, id: i32, changes: PostUpdate) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(classify)?;

        let existing = PostEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(classify)?
            .ok_or(RepoError::NotFound)?;

        // Only Set columns are written, so a concurrent view bump survives.
        let mut active: post::ActiveModel = existing.into();
        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(content) = changes.content {
            active.content = Set(content);
        }
        if let Some(published) = changes.published {
            active.published = Set(published);
        }
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(Some(image_url));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        let model = active.update(&txn).await.map_err(classify)?;

        if let Patch::Replace(category_ids) = &changes.category_ids {
            PostCategoryEntity::delete_many()
                .filter(post_category::Column::PostId.eq(id))
                .exec(&txn)
                .await
                .map_err(classify)?;
            link_categories(&txn, id, category_ids).await?;
        }

        txn.commit().await.map_err(classify)?;
        Ok(model.into())
    }

    async fn search(&self, needle: &str, limit: u64) -> Result<Vec<Post>, RepoError> {
        let matches = |column: post::Column, pattern: String| {
            Expr::expr(Func::lower(Expr::col((PostEntity, column))))
                .like(LikeExpr::new(pattern).escape('\\'))
        };

        let pattern = like_pattern(needle);
        let mut condition = Condition::any()
            .add(matches(post::Column::Title, pattern.clone()))
            .add(matches(post::Column::Content, pattern));
        // Slugs are matched by the needle's own slug: "nextjs" finds
        // "Next.js", while "-" alone finds nothing.
        let slug = slugify(needle);
        if !slug.is_empty() {
            condition = condition.add(matches(post::Column::Slug, like_pattern(&slug)));
        }

        let rows = PostEntity::find()
            .filter(condition)
            .order_by_asc(post::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(classify)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, FromQueryResult)]
struct CategoryCountRow {
    id: i32,
    name: String,
    description: Option<String>,
    slug: String,
    post_count: i64,
}

impl From<CategoryCountRow> for CategoryWithCount {
    fn from(row: CategoryCountRow) -> Self {
        Self {
            category: Category {
                id: row.id,
                name: row.name,
                description: row.description,
                slug: row.slug,
            },
            post_count: row.post_count,
        }
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list_with_counts(&self) -> Result<Vec<CategoryWithCount>, RepoError> {
        let rows = CategoryEntity::find()
            .column_as(
                Expr::col((PostCategoryEntity, post_category::Column::PostId)).count(),
                "post_count",
            )
            .join(JoinType::LeftJoin, category::Relation::PostCategory.def())
            .group_by(category::Column::Id)
            .order_by_asc(category::Column::Name)
            .into_model::<CategoryCountRow>()
            .all(self.db.as_ref())
            .await
            .map_err(classify)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        tracing::debug!(%slug, "Finding category by slug");

        let result = CategoryEntity::find()
            .filter(category::Column::Slug.eq(slug))
            .one(self.db.as_ref())
            .await
            .map_err(classify)?;

        Ok(result.map(Into::into))
    }

    async fn insert(&self, draft: CategoryDraft) -> Result<Category, RepoError> {
        let model = category::ActiveModel::from(draft)
            .insert(self.db.as_ref())
            .await
            .map_err(classify)?;

        Ok(model.into())
    }

    async fn update(&self, id: i32, changes: CategoryUpdate) -> Result<Category, RepoError> {
        let existing = CategoryEntity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(classify)?
            .ok_or(RepoError::NotFound)?;

        let mut active: category::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(slug) = changes.slug {
            active.slug = Set(slug);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }

        let model = active.update(self.db.as_ref()).await.map_err(classify)?;
        Ok(model.into())
    }
}
