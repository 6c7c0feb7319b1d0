use crate::db::models::{DbProduct, DbQuote, DbUser, NewProduct, NewQuote, ProductUpdate};
use crate::db::schema::SQLITE_INIT;
use crate::error::ShowroomError;
use crate::service::password;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

/// Open a pool for `database_url`, creating the database file when missing.
pub async fn connect(database_url: &str) -> Result<SqlitePool, ShowroomError> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct ShowroomStorage {
    pool: SqlitePool,
}

impl ShowroomStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), ShowroomError> {
        // sqlx::query runs one statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Create the admin account unless a user with that name already exists.
    /// Returns true when a row was inserted.
    pub async fn ensure_admin(
        &self,
        username: &str,
        plain_password: &str,
    ) -> Result<bool, ShowroomError> {
        if self.find_user(username).await?.is_some() {
            return Ok(false);
        }
        let hash = password::hash_password(plain_password)?;
        let affected = sqlx::query(
            "INSERT INTO users (username, password_hash) VALUES (?, ?) ON CONFLICT(username) DO NOTHING",
        )
        .bind(username)
        .bind(hash)
        .execute(&self.pool)
        .await?
        .rows_affected();
        let inserted = affected > 0;
        if inserted {
            info!(username, "seeded admin account");
        }
        Ok(inserted)
    }

    pub async fn find_user(&self, username: &str) -> Result<Option<DbUser>, ShowroomError> {
        let user = sqlx::query_as::<_, DbUser>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn list_products(&self) -> Result<Vec<DbProduct>, ShowroomError> {
        let rows = sqlx::query_as::<_, DbProduct>(
            "SELECT id, brand, name, description, image FROM products ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn get_product(&self, id: i64) -> Result<Option<DbProduct>, ShowroomError> {
        let row = sqlx::query_as::<_, DbProduct>(
            "SELECT id, brand, name, description, image FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// Insert a product. Returns the row id.
    pub async fn insert_product(&self, product: NewProduct) -> Result<i64, ShowroomError> {
        let id = sqlx::query(
            "INSERT INTO products (brand, name, description, image) VALUES (?, ?, ?, ?)",
        )
        .bind(product.brand)
        .bind(product.name)
        .bind(product.description)
        .bind(product.image)
        .execute(&self.pool)
        .await?
        .last_insert_rowid();
        Ok(id)
    }

    /// Update text fields, and the image only when `update.image` is set.
    /// Returns false when no product has this id.
    pub async fn update_product(
        &self,
        id: i64,
        update: ProductUpdate,
    ) -> Result<bool, ShowroomError> {
        let affected = sqlx::query(
            r#"UPDATE products SET
                brand = ?,
                name = ?,
                description = ?,
                image = COALESCE(?, image)
              WHERE id = ?"#,
        )
        .bind(update.brand)
        .bind(update.name)
        .bind(update.description)
        .bind(update.image)
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    /// Returns false when no product has this id.
    pub async fn delete_product(&self, id: i64) -> Result<bool, ShowroomError> {
        let affected = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    /// Insert a quote stamped with the current time. Returns the row id.
    pub async fn insert_quote(&self, quote: NewQuote) -> Result<i64, ShowroomError> {
        let id = sqlx::query(
            "INSERT INTO quotes (name, phone, message, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(quote.name)
        .bind(quote.phone)
        .bind(quote.message)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?
        .last_insert_rowid();
        Ok(id)
    }

    pub async fn list_quotes(&self) -> Result<Vec<DbQuote>, ShowroomError> {
        let rows = sqlx::query(
            "SELECT id, name, phone, message, created_at FROM quotes ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Self::row_to_quote).collect()
    }

    fn row_to_quote(row: SqliteRow) -> Result<DbQuote, ShowroomError> {
        let created_at_str: String = row.try_get("created_at")?;
        let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(DbQuote {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            phone: row.try_get("phone")?,
            message: row.try_get("message")?,
            created_at,
        })
    }
}
