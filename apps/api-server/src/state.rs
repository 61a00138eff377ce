//! Application state - shared across all handlers.

use std::path::PathBuf;
use std::sync::Arc;

use quill_core::services::{CategoryService, ImageService, PostService, SeedService};
use quill_infra::{
    LocalImageStore, MemoryCategoryRepository, MemoryPostRepository, MemorySeeder, MemoryStore,
};

use crate::config::{AppConfig, UploadConfig};

/// Public URL prefix under which uploaded images are served.
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub categories: CategoryService,
    pub images: ImageService,
    pub seed: SeedService,
    /// Directory backing `GET /uploads/{name}`.
    pub upload_dir: PathBuf,
    /// Which backend serves the repositories, reported by the health check.
    pub storage: &'static str,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<sea_orm::DbConn>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        {
            if let Some(db_config) = &config.database {
                match Self::open_database(db_config, config.run_migrations).await {
                    Ok(db) => {
                        tracing::info!("Application state initialized (postgres)");
                        return Self::postgres(db, &config.uploads);
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to prepare database: {}. Using in-memory fallback.",
                            e
                        );
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            }
        }

        #[cfg(not(feature = "postgres"))]
        {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repositories");
        }

        let state = Self::in_memory(&config.uploads);
        tracing::info!("Application state initialized (memory)");
        state
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(uploads: &UploadConfig) -> Self {
        let store = Arc::new(MemoryStore::new());

        Self {
            posts: PostService::new(Arc::new(MemoryPostRepository::new(store.clone()))),
            categories: CategoryService::new(Arc::new(MemoryCategoryRepository::new(
                store.clone(),
            ))),
            images: image_service(uploads),
            seed: SeedService::new(Arc::new(MemorySeeder::new(store))),
            upload_dir: uploads.dir.clone(),
            storage: "memory",
            #[cfg(feature = "postgres")]
            db: None,
        }
    }

    #[cfg(feature = "postgres")]
    fn postgres(db: sea_orm::DbConn, uploads: &UploadConfig) -> Self {
        use quill_infra::{PostgresCategoryRepository, PostgresPostRepository, PostgresSeeder};

        // Shared through an Arc: `DbConn` is not `Clone` once sea-orm's mock
        // feature is on, which workspace test builds enable.
        let db = Arc::new(db);
        Self {
            posts: PostService::new(Arc::new(PostgresPostRepository::new(db.clone()))),
            categories: CategoryService::new(Arc::new(PostgresCategoryRepository::new(
                db.clone(),
            ))),
            images: image_service(uploads),
            seed: SeedService::new(Arc::new(PostgresSeeder::new(db.clone()))),
            upload_dir: uploads.dir.clone(),
            storage: "postgres",
            db: Some(db),
        }
    }

    #[cfg(feature = "postgres")]
    async fn open_database(
        config: &quill_infra::DatabaseConfig,
        run_migrations: bool,
    ) -> Result<sea_orm::DbConn, sea_orm::DbErr> {
        use migration::{Migrator, MigratorTrait};

        let db = quill_infra::connect(config).await?;
        if run_migrations {
            Migrator::up(&db, None).await?;
            tracing::info!("Database migrations applied");
        }
        Ok(db)
    }
}

fn image_service(uploads: &UploadConfig) -> ImageService {
    let store = LocalImageStore::new(uploads.dir.clone(), UPLOADS_PREFIX);
    ImageService::new(Arc::new(store), uploads.max_bytes)
}
