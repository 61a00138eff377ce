use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{DbConn, DbErr, EntityTrait, PrimaryKeyTrait, SqlErr, TransactionTrait};

use quill_core::error::RepoError;
use quill_core::ports::BaseRepository;

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: Arc<DbConn>,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    /// Repositories built from one pool share it through the `Arc`.
    pub fn new(db: Arc<DbConn>) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

/// Classify a SeaORM error into the repository taxonomy.
pub(crate) fn classify(err: DbErr) -> RepoError {
    if let Some(violation) = err.sql_err().and_then(classify_violation) {
        return violation;
    }

    match err {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NotFound,
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => RepoError::Connection(err.to_string()),
        other => RepoError::Query(other.to_string()),
    }
}

/// Constraint violations the services translate for the client.
pub(crate) fn classify_violation(err: SqlErr) -> Option<RepoError> {
    match err {
        SqlErr::UniqueConstraintViolation(msg) => Some(RepoError::Constraint(msg)),
        SqlErr::ForeignKeyConstraintViolation(msg) => Some(RepoError::MissingReference(msg)),
        _ => None,
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: EntityTrait,
    E::Model: Sync + Send,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
    T: From<E::Model> + Send + Sync + 'static,
{
    async fn delete(&self, id: ID) -> Result<T, RepoError> {
        let txn = self.db.begin().await.map_err(classify)?;

        let model = E::find_by_id(id)
            .one(&txn)
            .await
            .map_err(classify)?
            .ok_or(RepoError::NotFound)?;

        // Junction rows go with it through ON DELETE CASCADE.
        let result = E::delete_by_id(id).exec(&txn).await.map_err(classify)?;
        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(classify)?;
        Ok(model.into())
    }
}
