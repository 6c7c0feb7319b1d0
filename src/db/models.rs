use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbProduct {
    pub id: i64,
    pub brand: String,
    pub name: String,
    pub description: String,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbQuote {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub brand: String,
    pub name: String,
    pub description: String,
    pub image: String,
}

/// Field changes for an existing product. `image` is replaced only when set.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
    pub brand: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewQuote {
    pub name: String,
    pub phone: String,
    pub message: String,
}
