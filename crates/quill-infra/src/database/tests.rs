use std::collections::BTreeMap;
use std::sync::Arc;

use sea_orm::{
    DatabaseBackend, DbConn, DbErr, MockDatabase, MockExecResult, RuntimeErr, SqlErr, Value,
};

use quill_core::domain::{Patch, Post, PostDraft, PostPageQuery, PostUpdate};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CategoryRepository, PostRepository};

use crate::database::entity::{category, post, post_category};
use crate::database::postgres_base::{classify, classify_violation};
use crate::database::postgres_repo::{PostgresCategoryRepository, PostgresPostRepository};

fn post_model(id: i32, slug: &str, views: i32) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id,
        title: "Test Post".to_owned(),
        content: "Content".to_owned(),
        slug: slug.to_owned(),
        published: true,
        views,
        image_url: None,
        created_at: now.into(),
        updated_at: now.into(),
    }
}

fn category_model(id: i32, name: &str) -> category::Model {
    category::Model {
        id,
        name: name.to_owned(),
        description: None,
        slug: name.to_lowercase(),
    }
}

fn mock() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

fn posts(db: DbConn) -> PostgresPostRepository {
    PostgresPostRepository::new(Arc::new(db))
}

fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

/// SQL the mock saw, with the Debug escaping of quotes undone.
fn sql_log(db: Arc<DbConn>) -> String {
    let Ok(db) = Arc::try_unwrap(db) else {
        panic!("connection still shared");
    };
    format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"")
}

fn position(log: &str, needle: &str) -> usize {
    log.find(needle).unwrap_or_else(|| panic!("{needle:?} not in {log}"))
}

#[tokio::test]
async fn delete_returns_the_removed_post() {
    let db = mock()
        .append_query_results([vec![post_model(3, "gone", 0)]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let deleted: Post = posts(db).delete(3).await.unwrap();

    assert_eq!(deleted.id, 3);
    assert_eq!(deleted.slug, "gone");
}

#[tokio::test]
async fn delete_of_missing_post_is_not_found() {
    let db = mock()
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let result: Result<Post, RepoError> = posts(db).delete(99).await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn view_by_slug_returns_bumped_row_with_sorted_categories() {
    let db = mock()
        .append_query_results([vec![post_model(1, "hello-world", 8)]])
        .append_query_results([vec![category_model(2, "Rust"), category_model(1, "Databases")]])
        .into_connection();

    let detail = posts(db).view_by_slug("hello-world").await.unwrap().unwrap();

    assert_eq!(detail.post.views, 8);
    let names: Vec<_> = detail.categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Databases", "Rust"]);
}

#[tokio::test]
async fn view_by_unknown_slug_is_none() {
    let db = mock()
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    assert!(posts(db).view_by_slug("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn search_maps_rows_to_posts() {
    let db = mock()
        .append_query_results([vec![post_model(4, "getting-started-with-nextjs", 0)]])
        .into_connection();

    let found = posts(db).search("nextjs", 10).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].slug, "getting-started-with-nextjs");
}

#[tokio::test]
async fn category_counts_are_read_from_the_aggregate() {
    let row = BTreeMap::from([
        ("id", Value::from(1i32)),
        ("name", Value::from("Databases")),
        ("description", Value::String(None)),
        ("slug", Value::from("databases")),
        ("post_count", Value::from(3i64)),
    ]);
    let db = mock().append_query_results([vec![row]]).into_connection();

    let categories = PostgresCategoryRepository::new(Arc::new(db))
        .list_with_counts()
        .await
        .unwrap();

    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].category.slug, "databases");
    assert_eq!(categories[0].post_count, 3);
}

#[tokio::test]
async fn category_update_of_missing_row_is_not_found() {
    let db = mock()
        .append_query_results([Vec::<category::Model>::new()])
        .into_connection();

    let result = PostgresCategoryRepository::new(Arc::new(db))
        .update(5, Default::default())
        .await;

    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn insert_writes_post_and_links_in_one_transaction() {
    let db = Arc::new(
        mock()
            .append_query_results([vec![post_model(1, "hello-world", 0)]])
            .append_exec_results([exec(2)])
            .into_connection(),
    );

    let post = PostgresPostRepository::new(db.clone())
        .insert(PostDraft {
            title: "Hello World".into(),
            content: "Body".into(),
            slug: "hello-world".into(),
            published: false,
            image_url: None,
            category_ids: vec![1, 2],
        })
        .await
        .unwrap();
    assert_eq!(post.id, 1);

    let log = sql_log(db);
    let begin = position(&log, "BEGIN");
    let insert_post = position(&log, r#"INSERT INTO "posts""#);
    let insert_links = position(&log, r#"INSERT INTO "post_categories""#);
    let commit = position(&log, "COMMIT");
    assert!(begin < insert_post && insert_post < insert_links && insert_links < commit);
}

#[tokio::test]
async fn insert_without_categories_skips_the_junction() {
    let db = Arc::new(
        mock()
            .append_query_results([vec![post_model(1, "solo", 0)]])
            .into_connection(),
    );

    PostgresPostRepository::new(db.clone())
        .insert(PostDraft {
            title: "Solo".into(),
            content: "Body".into(),
            slug: "solo".into(),
            published: true,
            image_url: None,
            category_ids: vec![],
        })
        .await
        .unwrap();

    assert!(!sql_log(db).contains("post_categories"));
}

#[tokio::test]
async fn update_with_replaced_categories_relinks() {
    let db = Arc::new(
        mock()
            .append_query_results([vec![post_model(3, "old", 4)]])
            .append_query_results([vec![post_model(3, "new", 4)]])
            .append_exec_results([exec(2), exec(1)])
            .into_connection(),
    );

    let post = PostgresPostRepository::new(db.clone())
        .update(
            3,
            PostUpdate {
                slug: Some("new".into()),
                category_ids: Patch::Replace(vec![5]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(post.slug, "new");

    let log = sql_log(db);
    let update = position(&log, r#"UPDATE "posts""#);
    let unlink = position(&log, r#"DELETE FROM "post_categories""#);
    let relink = position(&log, r#"INSERT INTO "post_categories""#);
    let commit = position(&log, "COMMIT");
    assert!(update < unlink && unlink < relink && relink < commit);
}

#[tokio::test]
async fn update_keeping_categories_leaves_the_junction_alone() {
    let db = Arc::new(
        mock()
            .append_query_results([vec![post_model(3, "kept", 0)]])
            .append_query_results([vec![post_model(3, "kept", 0)]])
            .into_connection(),
    );

    PostgresPostRepository::new(db.clone())
        .update(
            3,
            PostUpdate {
                published: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let log = sql_log(db);
    assert!(log.contains(r#"UPDATE "posts""#));
    assert!(!log.contains("post_categories"));
}

#[tokio::test]
async fn failed_link_insert_surfaces_as_repo_error() {
    let db = mock()
        .append_query_results([vec![post_model(1, "broken", 0)]])
        .append_exec_errors([DbErr::Custom("link insert failed".into())])
        .into_connection();

    let result = posts(db)
        .insert(PostDraft {
            title: "Broken".into(),
            content: "Body".into(),
            slug: "broken".into(),
            published: false,
            image_url: None,
            category_ids: vec![9],
        })
        .await;

    assert!(matches!(result, Err(RepoError::Query(_))));
}

#[tokio::test]
async fn list_filters_by_cursor_and_category_newest_id_first() {
    let db = Arc::new(
        mock()
            .append_query_results([vec![post_model(3, "third", 0)]])
            .append_query_results([vec![post_category::Model {
                post_id: 3,
                category_id: 2,
            }]])
            .append_query_results([vec![category_model(2, "Rust")]])
            .into_connection(),
    );

    let page = PostgresPostRepository::new(db.clone())
        .list(PostPageQuery {
            category_id: Some(2),
            cursor: Some(3),
            fetch: 3,
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].categories[0].name, "Rust");

    let log = sql_log(db);
    let listing = &log[..position(&log, "LIMIT")];
    assert!(listing.contains(r#""posts"."id" <= "#));
    assert!(listing.contains(r#"IN (SELECT "post_id" FROM "post_categories""#));
    assert!(listing.contains(r#"ORDER BY "posts"."id" DESC"#));
    assert!(!listing.contains("created_at\" DESC"));
}

#[test]
fn constraint_violations_map_to_repo_errors() {
    assert!(matches!(
        classify_violation(SqlErr::UniqueConstraintViolation("posts_slug_key".into())),
        Some(RepoError::Constraint(_))
    ));
    assert!(matches!(
        classify_violation(SqlErr::ForeignKeyConstraintViolation(
            "fk_post_categories_category".into()
        )),
        Some(RepoError::MissingReference(_))
    ));
}

#[test]
fn other_database_errors_are_classified_by_kind() {
    assert!(matches!(
        classify(DbErr::RecordNotFound("posts".into())),
        RepoError::NotFound
    ));
    assert!(matches!(
        classify(DbErr::Conn(RuntimeErr::Internal("refused".into()))),
        RepoError::Connection(_)
    ));
    assert!(matches!(
        classify(DbErr::Custom("syntax".into())),
        RepoError::Query(_)
    ));
}
