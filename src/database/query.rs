//! SQL builders shared by the generic services

use sqlx::{Postgres, QueryBuilder};

use super::entity::{Entity, Predicate};

/// `SELECT <columns> FROM <table> [WHERE <predicate>] ORDER BY id`
pub fn select<'a, E: Entity>(
    columns: &[&str],
    predicate: Option<&E::Filter>,
) -> QueryBuilder<'a, Postgres> {
    let mut query = QueryBuilder::new("SELECT ");
    query.push(columns.join(", "));
    query.push(" FROM ");
    query.push(E::TABLE);
    if let Some(predicate) = predicate {
        query.push(" WHERE ");
        predicate.push_sql(&mut query);
    }
    query.push(" ORDER BY id");
    query
}

/// Like [`select`] but stops at the first matching row.
pub fn select_first<'a, E: Entity>(
    columns: &[&str],
    predicate: Option<&E::Filter>,
) -> QueryBuilder<'a, Postgres> {
    let mut query = select::<E>(columns, predicate);
    query.push(" LIMIT 1");
    query
}

/// `SELECT EXISTS(SELECT 1 FROM <table> WHERE <predicate>)`
pub fn exists<'a, E: Entity>(predicate: &E::Filter) -> QueryBuilder<'a, Postgres> {
    let mut query = QueryBuilder::new("SELECT EXISTS(SELECT 1 FROM ");
    query.push(E::TABLE);
    query.push(" WHERE ");
    predicate.push_sql(&mut query);
    query.push(")");
    query
}

/// `DELETE FROM <table> WHERE id = $1`
pub fn delete_by_id<'a, E: Entity>(id: i32) -> QueryBuilder<'a, Postgres> {
    let mut query = QueryBuilder::new("DELETE FROM ");
    query.push(E::TABLE);
    query.push(" WHERE id = ");
    query.push_bind(id);
    query
}
