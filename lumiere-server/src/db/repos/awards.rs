//! Award repository

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::db::DbError;
use crate::models::{Award, AwardChanges, NewAward};

/// Award repository
pub struct AwardRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> AwardRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Most recent first.
    pub async fn list(&self) -> Result<Vec<Award>, DbError> {
        let awards = sqlx::query_as::<_, Award>(
            r#"
            SELECT id, title, year, organization, description, created_at, updated_at
            FROM awards
            ORDER BY year DESC, title ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(awards)
    }

    pub async fn get(&self, id: Uuid) -> Result<Award, DbError> {
        sqlx::query_as::<_, Award>(
            r#"
            SELECT id, title, year, organization, description, created_at, updated_at
            FROM awards
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("award", id))
    }

    pub async fn create(&self, award: &NewAward) -> Result<Award, DbError> {
        let award = sqlx::query_as::<_, Award>(
            r#"
            INSERT INTO awards (title, year, organization, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, year, organization, description, created_at, updated_at
            "#,
        )
        .bind(&award.title)
        .bind(&award.year)
        .bind(&award.organization)
        .bind(award.description.as_deref())
        .fetch_one(self.pool)
        .await?;

        tracing::info!(award_id = %award.id, "Created award");
        Ok(award)
    }

    /// Apply supplied fields and refresh `updated_at`.
    pub async fn update(&self, id: Uuid, changes: &AwardChanges) -> Result<Award, DbError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE awards SET updated_at = NOW()");

        if let Some(title) = &changes.title {
            qb.push(", title = ").push_bind(title.clone());
        }
        if let Some(year) = &changes.year {
            qb.push(", year = ").push_bind(year.clone());
        }
        if let Some(organization) = &changes.organization {
            qb.push(", organization = ").push_bind(organization.clone());
        }
        if let Some(description) = &changes.description {
            qb.push(", description = ").push_bind(description.clone());
        }

        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING id, title, year, organization, description, created_at, updated_at");

        qb.build_query_as::<Award>()
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("award", id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM awards WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("award", id));
        }

        tracing::info!(award_id = %id, "Deleted award");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_pool;
    use crate::models::{CreateAwardRequest, UpdateAwardRequest};

    #[tokio::test]
    #[ignore = "requires database"]
    async fn award_lifecycle() {
        let pool = test_pool().await;
        let repo = AwardRepo::new(&pool);

        let new = NewAward::try_from(CreateAwardRequest {
            title: Some("Best Food Photography".into()),
            year: Some("2024".into()),
            organization: Some("Culinary Arts Awards".into()),
            description: Some("Editorial series".into()),
        })
        .unwrap();
        let created = repo.create(&new).await.unwrap();

        let changes = AwardChanges::try_from(UpdateAwardRequest {
            description: Some(None),
            ..Default::default()
        })
        .unwrap();
        let updated = repo.update(created.id, &changes).await.unwrap();
        assert_eq!(updated.title, "Best Food Photography");
        assert!(updated.description.is_none());

        repo.delete(created.id).await.unwrap();
        assert!(matches!(
            repo.get(created.id).await.unwrap_err(),
            DbError::NotFound { resource: "award", .. }
        ));
    }
}
