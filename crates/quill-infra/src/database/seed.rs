//! Demo data loader for PostgreSQL.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DbConn, EntityTrait, QueryFilter, Set, TransactionTrait};

use quill_core::domain::slugify;
use quill_core::error::RepoError;
use quill_core::ports::{SampleCategory, SamplePost, Seeder};

use super::entity::{category, post, post_category};
use super::postgres_base::classify;

/// Seeds through `INSERT ... ON CONFLICT DO NOTHING` inside one transaction.
pub struct PostgresSeeder {
    db: Arc<DbConn>,
}

impl PostgresSeeder {
    pub fn new(db: Arc<DbConn>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Seeder for PostgresSeeder {
    async fn load(
        &self,
        categories: &[SampleCategory],
        posts: &[SamplePost],
    ) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(classify)?;

        for sample in categories {
            let row = category::ActiveModel {
                name: Set(sample.name.to_string()),
                description: Set(Some(sample.description.to_string())),
                slug: Set(slugify(sample.name)),
                ..Default::default()
            };
            category::Entity::insert(row)
                .on_conflict(
                    OnConflict::column(category::Column::Slug)
                        .do_nothing()
                        .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(classify)?;
        }

        let category_ids: HashMap<String, i32> = category::Entity::find()
            .filter(category::Column::Slug.is_in(categories.iter().map(|c| slugify(c.name))))
            .all(&txn)
            .await
            .map_err(classify)?
            .into_iter()
            .map(|c| (c.slug, c.id))
            .collect();

        for sample in posts {
            let now = chrono::Utc::now();
            let slug = slugify(sample.title);
            let row = post::ActiveModel {
                title: Set(sample.title.to_string()),
                content: Set(sample.content.to_string()),
                slug: Set(slug.clone()),
                published: Set(sample.published),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            };
            post::Entity::insert(row)
                .on_conflict(OnConflict::column(post::Column::Slug).do_nothing().to_owned())
                .exec_without_returning(&txn)
                .await
                .map_err(classify)?;

            let post_id = post::Entity::find()
                .filter(post::Column::Slug.eq(slug.as_str()))
                .one(&txn)
                .await
                .map_err(classify)?
                .ok_or(RepoError::NotFound)?
                .id;

            let links: Vec<_> = sample
                .categories
                .iter()
                .filter_map(|name| category_ids.get(&slugify(name)))
                .map(|&category_id| post_category::ActiveModel {
                    post_id: Set(post_id),
                    category_id: Set(category_id),
                })
                .collect();
            if links.is_empty() {
                continue;
            }

            post_category::Entity::insert_many(links)
                .on_conflict(
                    OnConflict::columns([
                        post_category::Column::PostId,
                        post_category::Column::CategoryId,
                    ])
                    .do_nothing()
                    .to_owned(),
                )
                .exec_without_returning(&txn)
                .await
                .map_err(classify)?;
        }

        txn.commit().await.map_err(classify)?;
        Ok(())
    }
}
