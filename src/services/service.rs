//! Generic data service
//!
//! `Service<E, R>` holds the queries every entity service shares: projected
//! reads, entity lookups for writes, parent existence checks and deletes.
//! Specialized services embed one and add their own insert and update SQL.

use std::future::Future;
use std::marker::PhantomData;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::database::{query, DatabasePool, Entity, Projection};
use crate::utils::errors::{Result, UserEventsError};

pub struct Service<E, R> {
    pool: DatabasePool,
    _marker: PhantomData<fn() -> (E, R)>,
}

impl<E, R> Clone for Service<E, R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _marker: PhantomData,
        }
    }
}

impl<E: Entity, R: Projection<E>> Service<E, R> {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// In-process projection of an already loaded entity.
    pub fn as_dto(entity: &E) -> R {
        R::project(entity)
    }

    /// Every matching row, projected inside the database.
    pub async fn dtos(
        &self,
        predicate: Option<&E::Filter>,
        token: &CancellationToken,
    ) -> Result<Vec<R>> {
        let mut query = query::select::<E>(R::COLUMNS, predicate);
        debug!(table = E::TABLE, filter = ?predicate, "Fetching projected rows");
        cancellable(token, query.build_query_as::<R>().fetch_all(&self.pool)).await
    }

    /// Every matching entity with all columns loaded.
    pub async fn entities(
        &self,
        predicate: Option<&E::Filter>,
        token: &CancellationToken,
    ) -> Result<Vec<E>> {
        let mut query = query::select::<E>(E::COLUMNS, predicate);
        cancellable(token, query.build_query_as::<E>().fetch_all(&self.pool)).await
    }

    /// First matching row, projected inside the database.
    pub async fn first_dto(
        &self,
        predicate: &E::Filter,
        token: &CancellationToken,
    ) -> Result<Option<R>> {
        let mut query = query::select_first::<E>(R::COLUMNS, Some(predicate));
        cancellable(token, query.build_query_as::<R>().fetch_optional(&self.pool)).await
    }

    /// First matching entity with every column loaded.
    pub async fn first_entity(
        &self,
        predicate: &E::Filter,
        token: &CancellationToken,
    ) -> Result<Option<E>> {
        let mut query = query::select_first::<E>(E::COLUMNS, Some(predicate));
        cancellable(token, query.build_query_as::<E>().fetch_optional(&self.pool)).await
    }

    /// Like [`first_entity`](Self::first_entity) but a miss is an error.
    pub async fn require_entity(
        &self,
        predicate: &E::Filter,
        token: &CancellationToken,
    ) -> Result<E> {
        self.first_entity(predicate, token)
            .await?
            .ok_or(UserEventsError::InvalidIdentifier)
    }

    /// Whether any `P` row satisfies the predicate.
    pub async fn validate_parent<P: Entity>(
        &self,
        predicate: &P::Filter,
        token: &CancellationToken,
    ) -> Result<bool> {
        let mut query = query::exists::<P>(predicate);
        cancellable(token, query.build_query_scalar::<bool>().fetch_one(&self.pool)).await
    }

    pub async fn remove(&self, entity: &E, token: &CancellationToken) -> Result<()> {
        ensure_active(token)?;
        let mut query = query::delete_by_id::<E>(entity.id());
        query.build().execute(&self.pool).await?;
        debug!(table = E::TABLE, id = entity.id(), "Row deleted");
        Ok(())
    }
}

/// Races a read against cancellation.
pub async fn cancellable<T, F>(token: &CancellationToken, future: F) -> Result<T>
where
    F: Future<Output = std::result::Result<T, sqlx::Error>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(UserEventsError::Cancelled),
        result = future => result.map_err(UserEventsError::from),
    }
}

/// Writes are not interrupted once issued; they only refuse to start.
pub fn ensure_active(token: &CancellationToken) -> Result<()> {
    if token.is_cancelled() {
        Err(UserEventsError::Cancelled)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn test_cancellable_passes_result_through() {
        let token = CancellationToken::new();
        let value = cancellable(&token, async { Ok::<_, sqlx::Error>(5) }).await.unwrap();
        assert_eq!(value, 5);

        let err = cancellable(&token, async { Err::<i32, _>(sqlx::Error::RowNotFound) })
            .await
            .unwrap_err();
        assert_matches!(err, UserEventsError::Database(sqlx::Error::RowNotFound));
    }

    #[tokio::test]
    async fn test_cancelled_token_wins() {
        let token = CancellationToken::new();
        token.cancel();

        let pending = std::future::pending::<std::result::Result<(), sqlx::Error>>();
        let result = cancellable(&token, pending).await;
        assert_matches!(result, Err(UserEventsError::Cancelled));
        assert_matches!(ensure_active(&token), Err(UserEventsError::Cancelled));
    }

    #[test]
    fn test_active_token_allows_writes() {
        assert!(ensure_active(&CancellationToken::new()).is_ok());
    }
}
