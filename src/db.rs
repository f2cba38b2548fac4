//! # Database Module
//!
//! Postgres persistence for saved dishes and user libraries.
//!
//! Only plain select / insert / update / delete statements are issued; all
//! matching happens in memory in [`crate::reconcile`].

use anyhow::{Context, Result};
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::dish::{CookedDish, SavedDish};
use crate::errors::LibraryError;
use crate::library::{Library, LibraryCategory, LibraryRow};
use crate::recompute::PantryStore;

/// NOTIFY channel carrying row changes on pantry tables
pub const CHANGE_CHANNEL: &str = "pantry_changes";

/// Open a connection pool
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool> {
    info!(max_connections, "Connecting to database");
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .context("Failed to connect to database")
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema...");

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS saved_dishes (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL,
            name TEXT,
            ingredients JSONB,
            suggested_sides JSONB,
            meal_type TEXT,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create saved_dishes table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS saved_dishes_user_id_idx ON saved_dishes (user_id)")
        .execute(pool)
        .await
        .context("Failed to create saved_dishes index")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS user_library (
            user_id BIGINT PRIMARY KEY,
            seasonings TEXT[],
            produce TEXT[],
            vegetables TEXT[],
            proteins TEXT[],
            entrees TEXT[],
            pastas TEXT[],
            equipment TEXT[],
            grains TEXT[],
            breads TEXT[],
            sauces_condiments TEXT[],
            dairy TEXT[],
            non_perishables TEXT[],
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create user_library table")?;

    sqlx::query(
        "CREATE TABLE IF NOT EXISTS cooked_dishes (
            id BIGSERIAL PRIMARY KEY,
            user_id BIGINT NOT NULL,
            dish_id BIGINT NOT NULL REFERENCES saved_dishes(id) ON DELETE CASCADE,
            cooked_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create cooked_dishes table")?;

    sqlx::query(&format!(
        "CREATE OR REPLACE FUNCTION notify_pantry_change() RETURNS trigger AS $$
         BEGIN
             PERFORM pg_notify('{CHANGE_CHANNEL}', json_build_object(
                 'table', TG_TABLE_NAME,
                 'user_id', CASE TG_OP WHEN 'DELETE' THEN OLD.user_id ELSE NEW.user_id END
             )::text);
             RETURN NULL;
         END;
         $$ LANGUAGE plpgsql"
    ))
    .execute(pool)
    .await
    .context("Failed to create change notification function")?;

    for table in ["saved_dishes", "user_library", "cooked_dishes"] {
        sqlx::query(&format!("DROP TRIGGER IF EXISTS {table}_changed ON {table}"))
            .execute(pool)
            .await
            .with_context(|| format!("Failed to drop change trigger on {table}"))?;
        sqlx::query(&format!(
            "CREATE TRIGGER {table}_changed AFTER INSERT OR UPDATE OR DELETE ON {table}
             FOR EACH ROW EXECUTE FUNCTION notify_pantry_change()"
        ))
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create change trigger on {table}"))?;
    }

    info!("Database schema initialized successfully");
    Ok(())
}

fn saved_dish_from_row(row: &PgRow) -> Result<SavedDish> {
    Ok(SavedDish {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        ingredients: row
            .try_get::<Option<Value>, _>("ingredients")?
            .unwrap_or(Value::Null),
        suggested_sides: row.try_get("suggested_sides")?,
        meal_type: row.try_get("meal_type")?,
        created_at: Some(row.try_get("created_at")?),
    })
}

/// Save a dish for a user and return its ID
pub async fn create_saved_dish(
    pool: &PgPool,
    user_id: i64,
    name: &str,
    ingredients: &Value,
    suggested_sides: Option<&Value>,
    meal_type: Option<&str>,
) -> Result<i64> {
    debug!(user_id, name, "Creating saved dish");

    let row = sqlx::query(
        "INSERT INTO saved_dishes (user_id, name, ingredients, suggested_sides, meal_type)
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(user_id)
    .bind(name)
    .bind(ingredients)
    .bind(suggested_sides)
    .bind(meal_type)
    .fetch_one(pool)
    .await
    .context("Failed to insert saved dish")?;

    let dish_id: i64 = row.get(0);
    info!(user_id, dish_id, "Saved dish created");
    Ok(dish_id)
}

/// All saved dishes of a user, oldest first
pub async fn list_saved_dishes(pool: &PgPool, user_id: i64) -> Result<Vec<SavedDish>> {
    let rows = sqlx::query(
        "SELECT id, name, ingredients, suggested_sides, meal_type, created_at
         FROM saved_dishes WHERE user_id = $1 ORDER BY created_at, id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list saved dishes")?;

    rows.iter().map(saved_dish_from_row).collect()
}

/// Delete a saved dish; returns whether a row was removed
pub async fn delete_saved_dish(pool: &PgPool, user_id: i64, dish_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM saved_dishes WHERE id = $1 AND user_id = $2")
        .bind(dish_id)
        .bind(user_id)
        .execute(pool)
        .await
        .context("Failed to delete saved dish")?;

    Ok(result.rows_affected() > 0)
}

/// Record that the user cooked their most recent saved dish with this name.
///
/// Returns the saved dish ID, or `None` when no dish has that name.
pub async fn record_cooked_dish(pool: &PgPool, user_id: i64, dish_name: &str) -> Result<Option<i64>> {
    let row = sqlx::query(
        "INSERT INTO cooked_dishes (user_id, dish_id)
         SELECT user_id, id FROM saved_dishes
         WHERE user_id = $1 AND LOWER(name) = LOWER($2)
         ORDER BY created_at DESC, id DESC
         LIMIT 1
         RETURNING dish_id",
    )
    .bind(user_id)
    .bind(dish_name.trim())
    .fetch_optional(pool)
    .await
    .context("Failed to record cooked dish")?;

    let dish_id = row.map(|row| row.get::<i64, _>("dish_id"));
    info!(user_id, dish_name, ?dish_id, "Cooked dish recorded");
    Ok(dish_id)
}

/// Cooking history of a user, most recent first
pub async fn list_cooked_dishes(pool: &PgPool, user_id: i64) -> Result<Vec<CookedDish>> {
    let rows = sqlx::query(
        "SELECT id, dish_id, cooked_at FROM cooked_dishes
         WHERE user_id = $1 ORDER BY cooked_at DESC, id DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .context("Failed to list cooked dishes")?;

    rows.iter().map(cooked_dish_from_row).collect()
}

fn cooked_dish_from_row(row: &PgRow) -> Result<CookedDish> {
    Ok(CookedDish {
        id: row.try_get("id")?,
        dish_id: row.try_get("dish_id")?,
        cooked_at: row.try_get("cooked_at")?,
    })
}

fn library_row_from_row(row: &PgRow) -> Result<LibraryRow> {
    Ok(LibraryRow {
        seasonings: row.try_get("seasonings")?,
        produce: row.try_get("produce")?,
        vegetables: row.try_get("vegetables")?,
        proteins: row.try_get("proteins")?,
        entrees: row.try_get("entrees")?,
        pastas: row.try_get("pastas")?,
        equipment: row.try_get("equipment")?,
        grains: row.try_get("grains")?,
        breads: row.try_get("breads")?,
        sauces_condiments: row.try_get("sauces_condiments")?,
        dairy: row.try_get("dairy")?,
        non_perishables: row.try_get("non_perishables")?,
    })
}

const LIBRARY_COLUMNS: &str = "seasonings, produce, vegetables, proteins, entrees, pastas, equipment, \
     grains, breads, sauces_condiments, dairy, non_perishables";

/// The user's library row, if they ever created one
pub async fn get_library_row(pool: &PgPool, user_id: i64) -> Result<Option<LibraryRow>> {
    let query = format!("SELECT {LIBRARY_COLUMNS} FROM user_library WHERE user_id = $1");
    let row = sqlx::query(&query)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .context("Failed to read library row")?;

    row.as_ref().map(library_row_from_row).transpose()
}

/// Insert or replace the user's library row
pub async fn upsert_library_row(pool: &PgPool, user_id: i64, library: &LibraryRow) -> Result<()> {
    sqlx::query(
        "INSERT INTO user_library (user_id, seasonings, produce, vegetables, proteins, entrees,
             pastas, equipment, grains, breads, sauces_condiments, dairy, non_perishables, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, NOW())
         ON CONFLICT (user_id) DO UPDATE SET
             seasonings = EXCLUDED.seasonings,
             produce = EXCLUDED.produce,
             vegetables = EXCLUDED.vegetables,
             proteins = EXCLUDED.proteins,
             entrees = EXCLUDED.entrees,
             pastas = EXCLUDED.pastas,
             equipment = EXCLUDED.equipment,
             grains = EXCLUDED.grains,
             breads = EXCLUDED.breads,
             sauces_condiments = EXCLUDED.sauces_condiments,
             dairy = EXCLUDED.dairy,
             non_perishables = EXCLUDED.non_perishables,
             updated_at = NOW()",
    )
    .bind(user_id)
    .bind(&library.seasonings)
    .bind(&library.produce)
    .bind(&library.vegetables)
    .bind(&library.proteins)
    .bind(&library.entrees)
    .bind(&library.pastas)
    .bind(&library.equipment)
    .bind(&library.grains)
    .bind(&library.breads)
    .bind(&library.sauces_condiments)
    .bind(&library.dairy)
    .bind(&library.non_perishables)
    .execute(pool)
    .await
    .context("Failed to upsert library row")?;

    Ok(())
}

/// Apply an edit to the resolved library inside a row-locking transaction
async fn edit_library<F>(pool: &PgPool, user_id: i64, edit: F) -> Result<bool, LibraryError>
where
    F: FnOnce(&mut Library) -> Result<bool, LibraryError>,
{
    let mut tx = pool
        .begin()
        .await
        .context("Failed to start library transaction")?;

    let query = format!("SELECT {LIBRARY_COLUMNS} FROM user_library WHERE user_id = $1 FOR UPDATE");
    let current = sqlx::query(&query)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock library row")?
        .as_ref()
        .map(library_row_from_row)
        .transpose()?
        .unwrap_or_default();

    let mut library = Library::from_row(&current);
    let changed = edit(&mut library)?;
    if !changed {
        return Ok(false);
    }

    let written = library.to_row();
    sqlx::query(
        "INSERT INTO user_library (user_id, seasonings, produce, proteins, pastas, equipment,
             grains, breads, sauces_condiments, dairy, non_perishables, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NOW())
         ON CONFLICT (user_id) DO UPDATE SET
             seasonings = EXCLUDED.seasonings,
             produce = EXCLUDED.produce,
             proteins = EXCLUDED.proteins,
             pastas = EXCLUDED.pastas,
             equipment = EXCLUDED.equipment,
             grains = EXCLUDED.grains,
             breads = EXCLUDED.breads,
             sauces_condiments = EXCLUDED.sauces_condiments,
             dairy = EXCLUDED.dairy,
             non_perishables = EXCLUDED.non_perishables,
             updated_at = NOW()",
    )
    .bind(user_id)
    .bind(&written.seasonings)
    .bind(&written.produce)
    .bind(&written.proteins)
    .bind(&written.pastas)
    .bind(&written.equipment)
    .bind(&written.grains)
    .bind(&written.breads)
    .bind(&written.sauces_condiments)
    .bind(&written.dairy)
    .bind(&written.non_perishables)
    .execute(&mut *tx)
    .await
    .context("Failed to write library row")?;

    tx.commit().await.context("Failed to commit library edit")?;
    Ok(true)
}

/// Add an item to a library category; `Ok(false)` when already present
pub async fn add_library_item(
    pool: &PgPool,
    user_id: i64,
    category: LibraryCategory,
    item: &str,
) -> Result<bool, LibraryError> {
    let added = edit_library(pool, user_id, |library| library.add_item(category, item)).await?;
    info!(user_id, %category, item, added, "Library add");
    Ok(added)
}

/// Remove an item from a library category; `Ok(false)` when it was not there
pub async fn remove_library_item(
    pool: &PgPool,
    user_id: i64,
    category: LibraryCategory,
    item: &str,
) -> Result<bool, LibraryError> {
    let removed =
        edit_library(pool, user_id, |library| Ok(library.remove_item(category, item))).await?;
    info!(user_id, %category, item, removed, "Library remove");
    Ok(removed)
}

/// Postgres-backed [`PantryStore`]
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl PantryStore for PgStore {
    async fn saved_dishes(&self, user_id: i64) -> Result<Vec<SavedDish>> {
        list_saved_dishes(&self.pool, user_id).await
    }

    async fn library_row(&self, user_id: i64) -> Result<Option<LibraryRow>> {
        get_library_row(&self.pool, user_id).await
    }
}
