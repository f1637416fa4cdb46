//! Generic repository for tables whose rows are never physically removed.
//!
//! Every read goes through [`SoftDeleteRepository::active`], which excludes rows
//! with a `deleted_at` timestamp. Writes are guarded the same way, so updating
//! or deleting an already-deleted row affects nothing.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, PaginatorTrait, QueryFilter, Select, TransactionTrait,
};
use std::marker::PhantomData;
use tracing::debug;
use uuid::Uuid;

use crate::{DatabaseError, DatabaseResult, FindArgs, FindQuery, Page};

/// Entities with a UUID primary key and a nullable `deleted_at` column
pub trait SoftDelete: EntityTrait {
    fn id_column() -> Self::Column;
    fn deleted_at_column() -> Self::Column;
}

pub struct SoftDeleteRepository<E> {
    db: DatabaseConnection,
    _entity: PhantomData<E>,
}

impl<E> Clone for SoftDeleteRepository<E> {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E> SoftDeleteRepository<E>
where
    E: SoftDelete,
    E::Model: FromQueryResult + Send + Sync + 'static,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
{
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Base select over rows that are not soft-deleted
    pub fn active() -> Select<E> {
        E::find().filter(E::deleted_at_column().is_null())
    }

    pub async fn find(&self, args: &FindArgs) -> DatabaseResult<Page<E::Model>> {
        FindQuery::build(Self::active(), args)?.fetch(&self.db).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<E::Model>> {
        Ok(Self::active()
            .filter(E::id_column().eq(id))
            .one(&self.db)
            .await?)
    }

    /// Active rows of `select`, keeping its filters and ordering
    pub async fn find_all(&self, select: Select<E>) -> DatabaseResult<Vec<E::Model>> {
        Ok(select
            .filter(E::deleted_at_column().is_null())
            .all(&self.db)
            .await?)
    }

    pub async fn exists(&self, condition: Condition) -> DatabaseResult<bool> {
        let matches = Self::active().filter(condition).count(&self.db).await?;
        Ok(matches > 0)
    }

    pub async fn insert(&self, model: E::ActiveModel) -> DatabaseResult<()> {
        E::insert(model).exec_without_returning(&self.db).await?;
        Ok(())
    }

    /// Overwrites the active row with the model's id. Returns the rows touched (0 or 1).
    pub async fn update(&self, model: E::ActiveModel) -> DatabaseResult<u64> {
        update_active::<E, _>(&self.db, model).await
    }

    /// Applies every update in one transaction; any failure rolls all of them back.
    pub async fn update_all(&self, models: Vec<E::ActiveModel>) -> DatabaseResult<u64> {
        let txn = self.db.begin().await?;
        let mut touched = 0;
        for model in models {
            touched += update_active::<E, _>(&txn, model).await?;
        }
        txn.commit().await?;
        debug!(rows = touched, "Committed batched update");
        Ok(touched)
    }

    /// Stamps `deleted_at`. Deleting a missing or already-deleted row is a no-op.
    pub async fn soft_delete(&self, id: Uuid) -> DatabaseResult<u64> {
        let result = E::update_many()
            .col_expr(E::deleted_at_column(), Expr::current_timestamp().into())
            .filter(E::id_column().eq(id))
            .filter(E::deleted_at_column().is_null())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

async fn update_active<E, C>(conn: &C, model: E::ActiveModel) -> DatabaseResult<u64>
where
    E: SoftDelete,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send,
    C: ConnectionTrait,
{
    let id = model
        .get(E::id_column())
        .into_value()
        .ok_or_else(|| DatabaseError::invalid_query("update requires an id"))?;

    let result = E::update_many()
        .set(model)
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_null())
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
