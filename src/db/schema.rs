// src/db/schema.rs
// DOCUMENTATION: Startup schema management
// PURPOSE: Create missing tables and bring older photo tables up to date

use sqlx::PgPool;

const CREATE_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS restrooms (
        restroom_id SERIAL PRIMARY KEY,
        building_name TEXT NOT NULL,
        floor INTEGER NOT NULL,
        is_men BOOLEAN NOT NULL DEFAULT FALSE,
        is_women BOOLEAN NOT NULL DEFAULT FALSE,
        is_accessible BOOLEAN NOT NULL DEFAULT FALSE,
        is_bum_gun BOOLEAN NOT NULL DEFAULT FALSE,
        is_toilet_paper BOOLEAN NOT NULL DEFAULT FALSE,
        is_free BOOLEAN NOT NULL DEFAULT TRUE,
        latitude TEXT NOT NULL,
        longitude TEXT NOT NULL,
        faculty_name TEXT,
        opening_hours_monday TEXT,
        opening_hours_tuesday TEXT,
        opening_hours_wednesday TEXT,
        opening_hours_thursday TEXT,
        opening_hours_friday TEXT,
        opening_hours_saturday TEXT,
        opening_hours_sunday TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        user_id SERIAL PRIMARY KEY,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL DEFAULT 'user'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS reviews (
        review_id SERIAL PRIMARY KEY,
        restroom_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        rating DOUBLE PRECISION NOT NULL,
        comment TEXT NOT NULL DEFAULT '',
        review_date DATE NOT NULL DEFAULT CURRENT_DATE
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_reviews_restroom_id ON reviews (restroom_id)",
    r#"
    CREATE TABLE IF NOT EXISTS photos (
        photo_id SERIAL PRIMARY KEY,
        kind TEXT NOT NULL,
        mime_type TEXT,
        data BYTEA,
        url TEXT,
        photo_restroom INTEGER,
        photo_review INTEGER,
        CONSTRAINT photos_kind CHECK (kind IN ('inline', 'hosted')),
        CONSTRAINT photos_single_owner CHECK ((photo_restroom IS NULL) <> (photo_review IS NULL)),
        CONSTRAINT photos_payload CHECK (
            (kind = 'inline' AND data IS NOT NULL AND mime_type IS NOT NULL)
            OR (kind = 'hosted' AND url IS NOT NULL)
        )
    )
    "#,
    // Tables created before the kind column existed
    "ALTER TABLE photos ADD COLUMN IF NOT EXISTS kind TEXT",
    "ALTER TABLE photos ADD COLUMN IF NOT EXISTS mime_type TEXT",
    "ALTER TABLE photos ADD COLUMN IF NOT EXISTS data BYTEA",
    "ALTER TABLE photos ADD COLUMN IF NOT EXISTS url TEXT",
    "CREATE INDEX IF NOT EXISTS idx_photos_review ON photos (photo_review)",
    "CREATE INDEX IF NOT EXISTS idx_photos_restroom ON photos (photo_restroom)",
];

/// Columns read as `i32`. Tables created by the earlier ORM-based service
/// have them as `bigint`.
const INTEGER_COLUMNS: &[(&str, &str)] = &[
    ("restrooms", "restroom_id"),
    ("restrooms", "floor"),
    ("users", "user_id"),
    ("reviews", "review_id"),
    ("reviews", "restroom_id"),
    ("reviews", "user_id"),
    ("photos", "photo_id"),
    ("photos", "photo_restroom"),
    ("photos", "photo_review"),
];

/// Older deployments kept every photo as text in a `base64` column, holding
/// either a data URL or a hosted link. Move those rows into the typed columns.
/// Only data URLs with a well-formed payload are decoded; malformed ones keep
/// `kind` NULL and are skipped on read.
const LEGACY_PHOTO_STATEMENTS: &[&str] = &[
    "ALTER TABLE photos ALTER COLUMN base64 DROP NOT NULL",
    r#"
    UPDATE photos
    SET kind = 'inline',
        mime_type = substring(base64 FROM '^data:([^;,]+);base64,'),
        data = decode(regexp_replace(split_part(base64, ',', 2), '\s', '', 'g'), 'base64')
    WHERE kind IS NULL
      AND base64 ~ '^data:[^;,]+;base64,'
      AND regexp_replace(split_part(base64, ',', 2), '\s', '', 'g')
          ~ '^([A-Za-z0-9+/]{4})*([A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?$'
      AND regexp_replace(split_part(base64, ',', 2), '\s', '', 'g') <> ''
    "#,
    r#"
    UPDATE photos
    SET kind = 'hosted', url = base64
    WHERE kind IS NULL AND base64 IS NOT NULL AND base64 !~ '^data:'
    "#,
];

async fn column_is_bigint(pool: &PgPool, table: &str, column: &str) -> Result<bool, sqlx::Error> {
    let (is_bigint,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.columns
            WHERE table_schema = current_schema()
              AND table_name::text = $1
              AND column_name::text = $2
              AND data_type = 'bigint'
        )
        "#,
    )
    .bind(table)
    .bind(column)
    .fetch_one(pool)
    .await?;

    Ok(is_bigint)
}

/// Narrow `bigint` columns of older tables to `integer`
async fn align_integer_columns(pool: &PgPool) -> Result<(), sqlx::Error> {
    for (table, column) in INTEGER_COLUMNS {
        if column_is_bigint(pool, table, column).await? {
            log::info!("Converting {}.{} from bigint to integer", table, column);
            sqlx::query(&format!(
                "ALTER TABLE {} ALTER COLUMN {} TYPE integer",
                table, column
            ))
            .execute(pool)
            .await?;
        }
    }
    Ok(())
}

async fn convert_legacy_photos(pool: &PgPool) -> Result<(), sqlx::Error> {
    let (has_legacy_column,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM information_schema.columns
            WHERE table_schema = current_schema()
              AND table_name = 'photos' AND column_name = 'base64'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    if !has_legacy_column {
        return Ok(());
    }

    log::info!("Converting legacy photo rows to typed columns");
    for statement in LEGACY_PHOTO_STATEMENTS {
        let result = sqlx::query(statement).execute(pool).await?;
        if result.rows_affected() > 0 {
            log::info!("Converted {} legacy photo rows", result.rows_affected());
        }
    }

    let (unconverted,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM photos WHERE kind IS NULL")
        .fetch_one(pool)
        .await?;
    if unconverted > 0 {
        log::warn!(
            "{} legacy photos have a malformed payload and will not be served",
            unconverted
        );
    }

    Ok(())
}

/// Create or alter all tables; safe to run on every start
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in CREATE_STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }

    align_integer_columns(pool).await?;
    convert_legacy_photos(pool).await?;

    log::info!("Database schema is up to date");
    Ok(())
}
