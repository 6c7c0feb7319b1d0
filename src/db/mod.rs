//! Database module: row models, schema and SQLite access for the catalog.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and insert/update payloads
//! - `schema.rs`: SQL DDL applied at startup
//! - `sqlite.rs`: pool setup and the `ShowroomStorage` query layer

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DbProduct, DbQuote, DbUser, NewProduct, NewQuote, ProductUpdate};
pub use schema::SQLITE_INIT;
pub use sqlite::{ShowroomStorage, SqlitePool, connect};
