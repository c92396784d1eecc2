//! Entity, projection and predicate contracts
//!
//! Every persisted type describes its table once. A DTO describes how it is
//! derived from that entity once, and the same description serves both as an
//! in-process mapping and as a column projection pushed down to PostgreSQL.
//! Filters work the same way: they can be evaluated against a loaded entity
//! or rendered into a `WHERE` clause.

use std::fmt::Debug;

use sqlx::postgres::PgRow;
use sqlx::{FromRow, Postgres, QueryBuilder};

/// A row type backed by a table with a serial `id` primary key.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Debug + Send + Sync + Unpin + 'static {
    /// Filter type accepted by services operating on this entity.
    type Filter: Predicate<Self>;

    const TABLE: &'static str;

    /// Every column of the table, in `FromRow` order.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i32;
}

/// The public shape of an entity.
pub trait Projection<E: Entity>: for<'r> FromRow<'r, PgRow> + Send + Unpin + 'static {
    /// Columns selected when the projection runs inside the database.
    const COLUMNS: &'static [&'static str];

    /// The same projection evaluated in-process.
    fn project(entity: &E) -> Self;
}

/// A boolean filter over an entity.
pub trait Predicate<E>: Debug + Clone + Send + Sync + 'static {
    fn matches(&self, entity: &E) -> bool;

    /// Appends the condition, without the `WHERE` keyword, binding every value.
    fn push_sql(&self, query: &mut QueryBuilder<'_, Postgres>);
}
