//! Media record persistence.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use vitrine_core::models::{ListScope, MediaRecord, NewMediaRecord, OrderKey, PageRequest};
use vitrine_core::AppError;

use super::transaction::TransactionGuard;

/// Owner-scoped access to media records, plus a read-only public view.
///
/// Every owner-scoped method treats a record belonging to someone else exactly like a
/// missing one.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Insert a record. The store assigns `id`, timestamps and `sort_rank`, which is one
    /// more than the owner's current maximum (1 for an empty collection).
    async fn create(&self, record: NewMediaRecord) -> Result<MediaRecord, AppError>;

    async fn get_by_id(&self, id: i64, owner_id: i64) -> Result<Option<MediaRecord>, AppError>;

    /// Public lookup by storage key, used when serving raw files.
    async fn get_public_by_path(
        &self,
        relative_path: &str,
    ) -> Result<Option<MediaRecord>, AppError>;

    /// One page of records plus the total number of matches.
    async fn list(
        &self,
        scope: ListScope,
        request: &PageRequest,
    ) -> Result<(Vec<MediaRecord>, i64), AppError>;

    async fn list_by_owner(
        &self,
        owner_id: i64,
        request: &PageRequest,
    ) -> Result<(Vec<MediaRecord>, i64), AppError> {
        self.list(ListScope::Owner(owner_id), request).await
    }

    async fn list_public(
        &self,
        request: &PageRequest,
    ) -> Result<(Vec<MediaRecord>, i64), AppError> {
        self.list(ListScope::Public, request).await
    }

    /// Persist `record.sort_rank` only. Returns the refreshed record, or `None` when no
    /// row matched `(id, owner_id)`.
    async fn update_rank(&self, record: &MediaRecord) -> Result<Option<MediaRecord>, AppError>;

    /// Persist the file-related fields of `record`; id, owner and rank are untouched.
    async fn replace(&self, record: &MediaRecord) -> Result<Option<MediaRecord>, AppError>;

    /// Delete a record. Returns whether a row was removed; a foreign or missing id is
    /// not an error.
    async fn delete(&self, id: i64, owner_id: i64) -> Result<bool, AppError>;

    /// Give `ordered_ids[i]` rank `i + 1`, all or nothing. Ids the owner does not hold
    /// match no row. Returns the number of rows updated.
    async fn set_ranks_batch(&self, owner_id: i64, ordered_ids: &[i64]) -> Result<u64, AppError>;

    /// Cheap connectivity check for readiness probes.
    async fn ping(&self) -> Result<(), AppError>;
}

/// ORDER BY fragment for each listing order. Ties are broken by id so pages are stable.
pub fn order_by_clause(order: OrderKey) -> &'static str {
    match order {
        OrderKey::SortRank => "sort_rank ASC, id ASC",
        OrderKey::CreatedAtDesc => "created_at DESC, id DESC",
        OrderKey::CreatedAtAsc => "created_at ASC, id ASC",
        OrderKey::FilenameAsc => "original_name ASC, id ASC",
        OrderKey::FilenameDesc => "original_name DESC, id DESC",
        OrderKey::SizeAsc => "size_bytes ASC, id ASC",
        OrderKey::SizeDesc => "size_bytes DESC, id DESC",
    }
}

pub(crate) fn rank_for_position(position: usize) -> Result<i32, AppError> {
    i32::try_from(position + 1)
        .map_err(|_| AppError::InvalidInput("Too many media ids in one reorder".to_string()))
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, scope: ListScope, request: &PageRequest) {
    builder.push(" WHERE TRUE");
    if let ListScope::Owner(owner_id) = scope {
        builder.push(" AND owner_id = ").push_bind(owner_id);
    }
    if let Some(kind) = request.kind {
        builder.push(" AND kind = ").push_bind(kind);
    }
}

/// Postgres-backed [`MediaStore`].
#[derive(Clone)]
pub struct MediaRepository {
    pool: PgPool,
}

impl MediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MediaStore for MediaRepository {
    #[tracing::instrument(skip(self, record), fields(db.table = "media", db.operation = "insert", owner_id = record.owner_id))]
    async fn create(&self, record: NewMediaRecord) -> Result<MediaRecord, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;

        // Serializes concurrent inserts for one owner so MAX + 1 is never read twice.
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(record.owner_id)
            .execute(&mut **tx)
            .await?;

        let file = record.file;
        let row = sqlx::query_as::<Postgres, MediaRecord>(
            r#"
            INSERT INTO media (
                owner_id, stored_name, original_name, relative_path,
                size_bytes, content_type, kind, sort_rank
            )
            SELECT $1, $2, $3, $4, $5, $6, $7, COALESCE(MAX(sort_rank), 0) + 1
            FROM media
            WHERE owner_id = $1
            RETURNING *
            "#,
        )
        .bind(record.owner_id)
        .bind(&file.stored_name)
        .bind(&file.original_name)
        .bind(&file.relative_path)
        .bind(file.size_bytes)
        .bind(&file.content_type)
        .bind(file.kind)
        .fetch_one(&mut **tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(media_id = row.id, sort_rank = row.sort_rank, "Media record created");
        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select", db.record_id = id))]
    async fn get_by_id(&self, id: i64, owner_id: i64) -> Result<Option<MediaRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, MediaRecord>(
            "SELECT * FROM media WHERE id = $1 AND owner_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select"))]
    async fn get_public_by_path(
        &self,
        relative_path: &str,
    ) -> Result<Option<MediaRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, MediaRecord>(
            "SELECT * FROM media WHERE relative_path = $1",
        )
        .bind(relative_path)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "select"))]
    async fn list(
        &self,
        scope: ListScope,
        request: &PageRequest,
    ) -> Result<(Vec<MediaRecord>, i64), AppError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM media");
        push_filters(&mut count_query, scope, request);
        let total: i64 = count_query
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut data_query = QueryBuilder::<Postgres>::new("SELECT * FROM media");
        push_filters(&mut data_query, scope, request);
        data_query
            .push(" ORDER BY ")
            .push(order_by_clause(request.order))
            .push(" LIMIT ")
            .push_bind(request.limit())
            .push(" OFFSET ")
            .push_bind(request.offset());
        let rows = data_query
            .build_query_as::<MediaRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "media", db.operation = "update", db.record_id = record.id))]
    async fn update_rank(&self, record: &MediaRecord) -> Result<Option<MediaRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, MediaRecord>(
            r#"
            UPDATE media
            SET sort_rank = $1, updated_at = NOW()
            WHERE id = $2 AND owner_id = $3
            RETURNING *
            "#,
        )
        .bind(record.sort_rank)
        .bind(record.id)
        .bind(record.owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self, record), fields(db.table = "media", db.operation = "update", db.record_id = record.id))]
    async fn replace(&self, record: &MediaRecord) -> Result<Option<MediaRecord>, AppError> {
        let row = sqlx::query_as::<Postgres, MediaRecord>(
            r#"
            UPDATE media
            SET stored_name = $1, original_name = $2, relative_path = $3,
                size_bytes = $4, content_type = $5, kind = $6, updated_at = NOW()
            WHERE id = $7 AND owner_id = $8
            RETURNING *
            "#,
        )
        .bind(&record.stored_name)
        .bind(&record.original_name)
        .bind(&record.relative_path)
        .bind(record.size_bytes)
        .bind(&record.content_type)
        .bind(record.kind)
        .bind(record.id)
        .bind(record.owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    #[tracing::instrument(skip(self), fields(db.table = "media", db.operation = "delete", db.record_id = id))]
    async fn delete(&self, id: i64, owner_id: i64) -> Result<bool, AppError> {
        let rows_affected = sqlx::query("DELETE FROM media WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    #[tracing::instrument(skip(self, ordered_ids), fields(db.table = "media", db.operation = "update", batch_size = ordered_ids.len()))]
    async fn set_ranks_batch(&self, owner_id: i64, ordered_ids: &[i64]) -> Result<u64, AppError> {
        let mut tx = TransactionGuard::begin(&self.pool).await?;
        let mut updated = 0u64;

        for (position, id) in ordered_ids.iter().copied().enumerate() {
            let rank = rank_for_position(position)?;
            updated += sqlx::query(
                "UPDATE media SET sort_rank = $1, updated_at = NOW() WHERE id = $2 AND owner_id = $3",
            )
            .bind(rank)
            .bind(id)
            .bind(owner_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();
        }

        tx.commit().await?;
        Ok(updated)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_order_key_has_a_tiebreaker() {
        for key in [
            OrderKey::SortRank,
            OrderKey::CreatedAtDesc,
            OrderKey::CreatedAtAsc,
            OrderKey::FilenameAsc,
            OrderKey::FilenameDesc,
            OrderKey::SizeAsc,
            OrderKey::SizeDesc,
        ] {
            let clause = order_by_clause(key);
            assert!(clause.ends_with("id ASC") || clause.ends_with("id DESC"));
        }
    }

    #[test]
    fn test_list_filters_bind_values() {
        let request = PageRequest::new(
            1,
            20,
            Some(vitrine_core::MediaKind::Image),
            OrderKey::SortRank,
        );
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM media");
        push_filters(&mut builder, ListScope::Owner(3), &request);
        assert_eq!(
            builder.sql(),
            "SELECT * FROM media WHERE TRUE AND owner_id = $1 AND kind = $2"
        );

        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM media");
        push_filters(&mut builder, ListScope::Public, &PageRequest::default());
        assert_eq!(builder.sql(), "SELECT * FROM media WHERE TRUE");
    }

    #[test]
    fn test_rank_for_position_is_one_based() {
        assert_eq!(rank_for_position(0).unwrap(), 1);
        assert_eq!(rank_for_position(9).unwrap(), 10);
    }
}
