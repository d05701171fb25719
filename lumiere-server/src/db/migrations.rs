//! Schema bootstrap for the portfolio tables
//!
//! Every statement is idempotent so `run` is safe on every startup.

use sqlx::PgPool;

/// Create all tables and indexes if they do not exist yet.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running schema migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS photos (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title TEXT NOT NULL,
            description TEXT,
            file_path TEXT NOT NULL,
            file_size BIGINT,
            mime_type TEXT,
            width INTEGER,
            height INTEGER,
            camera_model TEXT,
            lens TEXT,
            focal_length TEXT,
            aperture TEXT,
            shutter_speed TEXT,
            iso INTEGER,
            taken_at TIMESTAMPTZ,
            location TEXT,
            is_featured BOOLEAN NOT NULL DEFAULT FALSE,
            is_published BOOLEAN NOT NULL DEFAULT TRUE,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name TEXT NOT NULL UNIQUE,
            description TEXT,
            slug TEXT NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // category_id has no cascade: deleting a linked category is refused
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS photo_categories (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            photo_id UUID NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
            category_id UUID NOT NULL REFERENCES categories(id),
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            UNIQUE (photo_id, category_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS photo_quotes (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            photo_id UUID NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
            quote TEXT NOT NULL,
            author TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS photo_media (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            photo_id UUID NOT NULL REFERENCES photos(id) ON DELETE CASCADE,
            file_path TEXT NOT NULL,
            media_type TEXT NOT NULL
                CHECK (media_type IN ('thumbnail', 'medium', 'large', 'original')),
            file_size BIGINT,
            width INTEGER,
            height INTEGER,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS awards (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title TEXT NOT NULL,
            year TEXT NOT NULL,
            organization TEXT NOT NULL,
            description TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    create_indexes(pool).await?;

    tracing::info!("Schema migrations complete");
    Ok(())
}

async fn create_indexes(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Gallery listing
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_photos_published_created ON photos(is_published, created_at DESC)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_photos_featured ON photos(is_featured) WHERE is_featured")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_photos_sort_order ON photos(sort_order)")
        .execute(pool)
        .await?;

    // Join and child lookups
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_photo_categories_category ON photo_categories(category_id)",
    )
    .execute(pool)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_photo_quotes_photo ON photo_quotes(photo_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_photo_media_photo ON photo_media(photo_id)")
        .execute(pool)
        .await?;

    Ok(())
}
