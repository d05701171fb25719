//! Category repository
//!
//! - create/update: slug recomputed from name, collisions become `Conflict`
//! - delete: refused while any photo links to the category

use sqlx::PgPool;
use uuid::Uuid;

use crate::db::error::{on_foreign_key_violation, on_unique_violation};
use crate::db::DbError;
use crate::models::filters::like_pattern;
use crate::models::{Category, CategoryInput};

const DUPLICATE_CATEGORY: &str = "Category name or slug already exists";
const CATEGORY_IN_USE: &str = "Cannot delete category that is being used by photos";

/// Category repository
pub struct CategoryRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List categories by name, optionally filtered by a search term.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Category>, DbError> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);

        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, slug, created_at, updated_at
            FROM categories
            WHERE $1::text IS NULL OR name ILIKE $1 OR description ILIKE $1
            ORDER BY name ASC
            "#,
        )
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get(&self, id: Uuid) -> Result<Category, DbError> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, slug, created_at, updated_at
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("category", id))
    }

    /// Insert a category; name or slug collisions map to `DbError::Conflict`.
    pub async fn create(&self, input: &CategoryInput) -> Result<Category, DbError> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, slug)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, slug, created_at, updated_at
            "#,
        )
        .bind(input.name.as_str())
        .bind(input.description())
        .bind(input.name.slug().as_str())
        .fetch_one(self.pool)
        .await
        .map_err(on_unique_violation(DUPLICATE_CATEGORY))?;

        tracing::info!(category_id = %category.id, slug = %category.slug, "Created category");
        Ok(category)
    }

    /// Rename a category, recomputing the slug.
    ///
    /// The description is only written when the request carried the key.
    pub async fn update(&self, id: Uuid, input: &CategoryInput) -> Result<Category, DbError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $2,
                description = CASE WHEN $5 THEN $3::text ELSE description END,
                slug = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, slug, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(input.name.as_str())
        .bind(input.description())
        .bind(input.name.slug().as_str())
        .bind(input.description.is_some())
        .fetch_optional(self.pool)
        .await
        .map_err(on_unique_violation(DUPLICATE_CATEGORY))?
        .ok_or_else(|| DbError::not_found("category", id))
    }

    /// Delete a category that no photo links to.
    ///
    /// A link inserted between the check and the delete trips the foreign
    /// key, which maps to the same `InUse` error.
    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let in_use: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM photo_categories WHERE category_id = $1)",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        if in_use {
            return Err(DbError::InUse {
                message: CATEGORY_IN_USE,
            });
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(on_foreign_key_violation(CATEGORY_IN_USE))?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("category", id));
        }

        tracing::info!(category_id = %id, "Deleted category");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_pool;
    use crate::db::repos::PhotoRepo;
    use crate::models::{CategoryRequest, CreatePhotoRequest, NewPhoto};

    #[test]
    fn like_pattern_escapes() {
        assert_eq!(like_pattern("main"), "%main%");
        assert_eq!(like_pattern("100%"), r"%100\%%");
    }

    fn input(name: &str) -> CategoryInput {
        CategoryInput::try_from(CategoryRequest {
            name: Some(name.to_owned()),
            description: None,
        })
        .unwrap()
    }

    fn described(name: &str, description: Option<&str>) -> CategoryInput {
        CategoryInput::try_from(CategoryRequest {
            name: Some(name.to_owned()),
            description: Some(description.map(str::to_owned)),
        })
        .unwrap()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_name_conflicts() {
        let pool = test_pool().await;
        let repo = CategoryRepo::new(&pool);
        let name = format!("Duplicate {}", Uuid::new_v4().simple());

        let first = repo.create(&input(&name)).await.unwrap();
        let err = repo.create(&input(&name)).await.unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));
        assert_eq!(err.to_string(), DUPLICATE_CATEGORY);

        repo.delete(first.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_recomputes_slug() {
        let pool = test_pool().await;
        let repo = CategoryRepo::new(&pool);
        let suffix = Uuid::new_v4().simple().to_string();

        let created = repo.create(&input(&format!("Starters {suffix}"))).await.unwrap();
        let updated = repo
            .update(created.id, &input(&format!("Main Course {suffix}")))
            .await
            .unwrap();
        assert_eq!(updated.slug, format!("main-course-{suffix}"));
        assert!(updated.updated_at >= created.updated_at);

        repo.delete(created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn rename_keeps_description() {
        let pool = test_pool().await;
        let repo = CategoryRepo::new(&pool);
        let name = format!("Desserts {}", Uuid::new_v4().simple());

        let created = repo
            .create(&described(&name, Some("Sweet things")))
            .await
            .unwrap();
        let renamed = repo
            .update(created.id, &input(&format!("{name} renamed")))
            .await
            .unwrap();
        assert_eq!(renamed.description.as_deref(), Some("Sweet things"));

        let cleared = repo
            .update(created.id, &described(&name, None))
            .await
            .unwrap();
        assert_eq!(cleared.description, None);

        repo.delete(created.id).await.unwrap();
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn referenced_category_cannot_be_deleted() {
        let pool = test_pool().await;
        let repo = CategoryRepo::new(&pool);
        let category = repo
            .create(&input(&format!("Linked {}", Uuid::new_v4().simple())))
            .await
            .unwrap();

        let photo = NewPhoto::try_from(CreatePhotoRequest {
            title: Some("Gyoza".into()),
            file_path: Some("/uploads/gyoza.jpg".into()),
            categories: vec![category.id],
            ..Default::default()
        })
        .unwrap();
        let photos = PhotoRepo::new(&pool);
        let photo = photos.create(&photo).await.unwrap();

        let err = repo.delete(category.id).await.unwrap_err();
        assert!(matches!(err, DbError::InUse { .. }));
        assert!(repo.get(category.id).await.is_ok());

        photos.delete(photo.photo.id).await.unwrap();
        repo.delete(category.id).await.unwrap();
        assert!(matches!(
            repo.get(category.id).await.unwrap_err(),
            DbError::NotFound { .. }
        ));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn delete_missing_is_not_found() {
        let pool = test_pool().await;
        let err = CategoryRepo::new(&pool).delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { resource: "category", .. }));
    }
}
