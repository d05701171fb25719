//! Photo repository
//!
//! - list: filtered, ordered, paginated; count uses the same predicates
//! - every read aggregates categories, quotes and media in one statement
//! - category links on create/update are best-effort (logged, never fatal)

use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::DbError;
use crate::models::{
    Category, NewPhoto, Paginated, Photo, PhotoChanges, PhotoDetails, PhotoFilters, PhotoMedia,
    PhotoQuote,
};

/// Photo columns plus the three child collections as JSON arrays.
const DETAILS_SELECT: &str = r#"
    SELECT
        p.*,
        COALESCE((
            SELECT json_agg(c ORDER BY c.name)
            FROM photo_categories pc
            JOIN categories c ON c.id = pc.category_id
            WHERE pc.photo_id = p.id
        ), '[]'::json) AS categories,
        COALESCE((
            SELECT json_agg(q ORDER BY q.created_at)
            FROM photo_quotes q
            WHERE q.photo_id = p.id
        ), '[]'::json) AS quotes,
        COALESCE((
            SELECT json_agg(m ORDER BY m.created_at)
            FROM photo_media m
            WHERE m.photo_id = p.id
        ), '[]'::json) AS media
    FROM photos p
"#;

/// Row shape of `DETAILS_SELECT`
#[derive(Debug, FromRow)]
struct PhotoRow {
    #[sqlx(flatten)]
    photo: Photo,
    categories: Json<Vec<Category>>,
    quotes: Json<Vec<PhotoQuote>>,
    media: Json<Vec<PhotoMedia>>,
}

impl From<PhotoRow> for PhotoDetails {
    fn from(row: PhotoRow) -> Self {
        Self {
            photo: row.photo,
            categories: row.categories.0,
            quotes: row.quotes.0,
            media: row.media.0,
        }
    }
}

/// Photo repository
pub struct PhotoRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> PhotoRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List photos matching `filters`, one page at a time.
    ///
    /// `total` counts every row matching the same predicates, not just the page.
    pub async fn list(&self, filters: &PhotoFilters) -> Result<Paginated<PhotoDetails>, DbError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM photos p WHERE TRUE");
        push_filters(&mut count, filters);
        let total: i64 = count.build_query_scalar().fetch_one(self.pool).await?;

        let mut select = QueryBuilder::<Postgres>::new(DETAILS_SELECT);
        select.push(" WHERE TRUE");
        push_filters(&mut select, filters);
        push_order_and_page(&mut select, filters);

        let rows: Vec<PhotoRow> = select.build_query_as().fetch_all(self.pool).await?;
        tracing::debug!(
            total,
            returned = rows.len(),
            page = filters.pagination.page,
            "Listed photos"
        );

        Ok(Paginated::new(
            rows.into_iter().map(PhotoDetails::from).collect(),
            total,
            filters.pagination,
        ))
    }

    /// Get a single photo with its categories, quotes and media.
    pub async fn get(&self, id: Uuid) -> Result<PhotoDetails, DbError> {
        let sql = format!("{DETAILS_SELECT} WHERE p.id = $1");
        let row: PhotoRow = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("photo", id))?;

        Ok(row.into())
    }

    /// Insert a photo, then link its categories.
    ///
    /// The link insert is a separate statement: if it fails the photo is kept
    /// and the failure is only logged.
    pub async fn create(&self, photo: &NewPhoto) -> Result<PhotoDetails, DbError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO photos (
                title, description, file_path, file_size, mime_type, width, height,
                camera_model, lens, focal_length, aperture, shutter_speed, iso,
                taken_at, location, is_featured, is_published, sort_order
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING id
            "#,
        )
        .bind(photo.title.as_str())
        .bind(photo.description.as_deref())
        .bind(&photo.file_path)
        .bind(photo.file_size)
        .bind(photo.mime_type.as_deref())
        .bind(photo.width)
        .bind(photo.height)
        .bind(photo.camera_model.as_deref())
        .bind(photo.lens.as_deref())
        .bind(photo.focal_length.as_deref())
        .bind(photo.aperture.as_deref())
        .bind(photo.shutter_speed.as_deref())
        .bind(photo.iso)
        .bind(photo.taken_at)
        .bind(photo.location.as_deref())
        .bind(photo.is_featured)
        .bind(photo.is_published)
        .bind(photo.sort_order)
        .fetch_one(self.pool)
        .await?;

        tracing::info!(photo_id = %id, title = photo.title.as_str(), "Created photo");

        if !photo.categories.is_empty() {
            if let Err(e) = insert_links(self.pool, id, &photo.categories).await {
                tracing::warn!(photo_id = %id, error = %e, "Error associating categories");
            }
        }

        self.get(id).await
    }

    /// Apply supplied fields, refresh `updated_at`, and replace the category
    /// set when `changes.categories` is present.
    pub async fn update(&self, id: Uuid, changes: &PhotoChanges) -> Result<PhotoDetails, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE photos SET updated_at = NOW()");

        if let Some(title) = &changes.title {
            qb.push(", title = ").push_bind(title.as_str().to_owned());
        }
        if let Some(description) = &changes.description {
            qb.push(", description = ").push_bind(description.clone());
        }
        if let Some(file_path) = &changes.file_path {
            qb.push(", file_path = ").push_bind(file_path.clone());
        }
        if let Some(file_size) = changes.file_size {
            qb.push(", file_size = ").push_bind(file_size);
        }
        if let Some(mime_type) = &changes.mime_type {
            qb.push(", mime_type = ").push_bind(mime_type.clone());
        }
        if let Some(width) = changes.width {
            qb.push(", width = ").push_bind(width);
        }
        if let Some(height) = changes.height {
            qb.push(", height = ").push_bind(height);
        }
        if let Some(camera_model) = &changes.camera_model {
            qb.push(", camera_model = ").push_bind(camera_model.clone());
        }
        if let Some(lens) = &changes.lens {
            qb.push(", lens = ").push_bind(lens.clone());
        }
        if let Some(focal_length) = &changes.focal_length {
            qb.push(", focal_length = ").push_bind(focal_length.clone());
        }
        if let Some(aperture) = &changes.aperture {
            qb.push(", aperture = ").push_bind(aperture.clone());
        }
        if let Some(shutter_speed) = &changes.shutter_speed {
            qb.push(", shutter_speed = ").push_bind(shutter_speed.clone());
        }
        if let Some(iso) = changes.iso {
            qb.push(", iso = ").push_bind(iso);
        }
        if let Some(taken_at) = changes.taken_at {
            qb.push(", taken_at = ").push_bind(taken_at);
        }
        if let Some(location) = &changes.location {
            qb.push(", location = ").push_bind(location.clone());
        }
        if let Some(is_featured) = changes.is_featured {
            qb.push(", is_featured = ").push_bind(is_featured);
        }
        if let Some(is_published) = changes.is_published {
            qb.push(", is_published = ").push_bind(is_published);
        }
        if let Some(sort_order) = changes.sort_order {
            qb.push(", sort_order = ").push_bind(sort_order);
        }

        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING id");

        let updated: Option<Uuid> = qb.build_query_scalar().fetch_optional(self.pool).await?;
        let id = updated.ok_or_else(|| DbError::not_found("photo", id))?;

        if let Some(categories) = &changes.categories {
            if let Err(e) = self.replace_categories(id, categories).await {
                tracing::warn!(photo_id = %id, error = %e, "Error updating categories");
            }
        }

        self.get(id).await
    }

    /// Delete a photo; its links, quotes and media cascade.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM photos WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("photo", id));
        }

        tracing::info!(photo_id = %id, "Deleted photo");
        Ok(())
    }

    /// Replace every category link of a photo with `category_ids`.
    ///
    /// Delete and insert share one transaction, so a bad id leaves the
    /// previous set in place.
    pub async fn replace_categories(
        &self,
        photo_id: Uuid,
        category_ids: &[Uuid],
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM photo_categories WHERE photo_id = $1")
            .bind(photo_id)
            .execute(&mut *tx)
            .await?;

        if !category_ids.is_empty() {
            insert_links(&mut *tx, photo_id, category_ids).await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Link a photo to categories; existing pairs are left as they are.
async fn insert_links<'e, E>(
    executor: E,
    photo_id: Uuid,
    category_ids: &[Uuid],
) -> Result<u64, sqlx::Error>
where
    E: sqlx::Executor<'e, Database = Postgres>,
{
    let result = sqlx::query(
        r#"
        INSERT INTO photo_categories (photo_id, category_id)
        SELECT $1, category_id FROM UNNEST($2::uuid[]) AS category_id
        ON CONFLICT (photo_id, category_id) DO NOTHING
        "#,
    )
    .bind(photo_id)
    .bind(category_ids)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

/// Append the WHERE predicates for `filters` (the builder already ends in a WHERE clause).
fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filters: &PhotoFilters) {
    if let Some(is_published) = filters.is_published {
        qb.push(" AND p.is_published = ").push_bind(is_published);
    }

    if let Some(is_featured) = filters.is_featured {
        qb.push(" AND p.is_featured = ").push_bind(is_featured);
    }

    if let Some(pattern) = filters.search_pattern() {
        qb.push(" AND (p.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR p.description ILIKE ")
            .push_bind(pattern)
            .push(")");
    }

    if let Some(category) = &filters.category {
        qb.push(
            " AND EXISTS (SELECT 1 FROM photo_categories pc \
             JOIN categories c ON c.id = pc.category_id \
             WHERE pc.photo_id = p.id AND c.slug = ",
        )
        .push_bind(category.clone())
        .push(")");
    }
}

/// Append ORDER BY (with `id` as tiebreaker) and LIMIT/OFFSET.
fn push_order_and_page(qb: &mut QueryBuilder<'_, Postgres>, filters: &PhotoFilters) {
    let direction = filters.sort_order.keyword();
    qb.push(" ORDER BY p.")
        .push(filters.sort_by.column())
        .push(" ")
        .push(direction)
        .push(", p.id ")
        .push(direction);

    let page = filters.pagination;
    qb.push(" LIMIT ")
        .push_bind(i64::from(page.limit()))
        .push(" OFFSET ")
        .push_bind(page.offset() as i64);
}
