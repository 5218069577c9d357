//! Repository for the `millionaires` table.

use sqlx::{PgPool, Postgres, QueryBuilder};
use wealthlist_core::pagination::{PageRequest, Paginated};
use wealthlist_core::search::{contains_pattern, MillionaireFilter};
use wealthlist_core::types::DbId;

use crate::models::millionaire::{Millionaire, MillionaireInput};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, last_name, first_name, middle_name, birth_date, birth_place, \
     company, net_worth, industry, country, biography, path_to_photo, created_at, updated_at";

/// Provides CRUD, search and photo-path operations for millionaires.
pub struct MillionaireRepo;

impl MillionaireRepo {
    /// Insert a new millionaire, returning the created row with its
    /// server-assigned id and timestamps.
    pub async fn create(
        pool: &PgPool,
        input: &MillionaireInput,
    ) -> Result<Millionaire, sqlx::Error> {
        let query = format!(
            "INSERT INTO millionaires (
                last_name, first_name, middle_name, birth_date, birth_place,
                company, net_worth, industry, country, biography
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Millionaire>(&query)
            .bind(&input.last_name)
            .bind(&input.first_name)
            .bind(&input.middle_name)
            .bind(input.birth_date)
            .bind(&input.birth_place)
            .bind(&input.company)
            .bind(input.net_worth)
            .bind(&input.industry)
            .bind(&input.country)
            .bind(&input.biography)
            .fetch_one(pool)
            .await
    }

    /// Find a millionaire by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Millionaire>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM millionaires WHERE id = $1");
        sqlx::query_as::<_, Millionaire>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace every mutable field except the photo path and refresh
    /// `updated_at`.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &MillionaireInput,
    ) -> Result<Option<Millionaire>, sqlx::Error> {
        let query = format!(
            "UPDATE millionaires SET
                last_name = $2,
                first_name = $3,
                middle_name = $4,
                birth_date = $5,
                birth_place = $6,
                company = $7,
                net_worth = $8,
                industry = $9,
                country = $10,
                biography = $11,
                updated_at = GREATEST(NOW(), updated_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Millionaire>(&query)
            .bind(id)
            .bind(&input.last_name)
            .bind(&input.first_name)
            .bind(&input.middle_name)
            .bind(input.birth_date)
            .bind(&input.birth_place)
            .bind(&input.company)
            .bind(input.net_worth)
            .bind(&input.industry)
            .bind(&input.country)
            .bind(&input.biography)
            .fetch_optional(pool)
            .await
    }

    /// Delete a millionaire by id. Returns `true` if a row was removed.
    ///
    /// The photo file, if any, is left on disk.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM millionaires WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// One page of millionaires matching `filter`, ordered by id ascending,
    /// together with the total number of matching rows.
    ///
    /// The total comes from a separate `COUNT(*)` over the same predicate.
    pub async fn search(
        pool: &PgPool,
        filter: &MillionaireFilter,
        page: PageRequest,
    ) -> Result<Paginated<Millionaire>, sqlx::Error> {
        let page = page.clamped();

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM millionaires"));
        push_filter(&mut select, filter);
        select
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(page.page_size)
            .push(" OFFSET ")
            .push_bind(page.offset());

        let items = select
            .build_query_as::<Millionaire>()
            .fetch_all(pool)
            .await?;
        let total = Self::count(pool, filter).await?;

        Ok(Paginated::new(items, total, page))
    }

    /// Unfiltered listing; identical to [`Self::search`] with an empty filter.
    pub async fn list(
        pool: &PgPool,
        page: PageRequest,
    ) -> Result<Paginated<Millionaire>, sqlx::Error> {
        Self::search(pool, &MillionaireFilter::default(), page).await
    }

    /// Number of rows matching `filter`.
    pub async fn count(pool: &PgPool, filter: &MillionaireFilter) -> Result<i64, sqlx::Error> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM millionaires");
        push_filter(&mut count, filter);
        count.build_query_scalar::<i64>().fetch_one(pool).await
    }

    /// The `limit` richest millionaires: net worth descending with unknown
    /// net worth last, ties broken by id ascending.
    pub async fn top_by_net_worth(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<Millionaire>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM millionaires
             ORDER BY net_worth DESC NULLS LAST, id ASC
             LIMIT $1"
        );
        sqlx::query_as::<_, Millionaire>(&query)
            .bind(limit.max(0))
            .fetch_all(pool)
            .await
    }

    /// Stored photo path of a millionaire.
    ///
    /// `None` when the row does not exist or has no photo.
    pub async fn photo_path(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        let path = sqlx::query_scalar::<_, Option<String>>(
            "SELECT path_to_photo FROM millionaires WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(path.flatten())
    }

    /// Set (or clear, with `None`) the photo path. Returns `true` if a row
    /// was updated.
    pub async fn set_photo_path(
        pool: &PgPool,
        id: DbId,
        path: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE millionaires
             SET path_to_photo = $2, updated_at = GREATEST(NOW(), updated_at)
             WHERE id = $1",
        )
        .bind(id)
        .bind(path)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the photo path of several millionaires in one transaction.
    ///
    /// An id that matches no row aborts the batch with
    /// [`sqlx::Error::RowNotFound`]; nothing is committed in that case.
    pub async fn batch_set_photo_paths(
        pool: &PgPool,
        paths: &[(DbId, String)],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0;

        for (id, path) in paths {
            let result = sqlx::query(
                "UPDATE millionaires
                 SET path_to_photo = $2, updated_at = GREATEST(NOW(), updated_at)
                 WHERE id = $1",
            )
            .bind(*id)
            .bind(path)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Err(sqlx::Error::RowNotFound);
            }
            updated += result.rows_affected();
        }

        tx.commit().await?;
        Ok(updated)
    }
}

/// Append ` WHERE col ILIKE $n AND ...` for every non-empty filter field.
///
/// Column names come from a fixed set in [`MillionaireFilter::conditions`];
/// user input is only ever bound as a parameter.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &MillionaireFilter) {
    for (i, (column, value)) in filter.conditions().enumerate() {
        builder
            .push(if i == 0 { " WHERE " } else { " AND " })
            .push(column)
            .push(" ILIKE ")
            .push_bind(contains_pattern(value));
    }
}
