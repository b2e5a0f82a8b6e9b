//! SQLite output sink
//!
//! Appends each harvest to a `products` table, tagging every row with the
//! harvest timestamp so successive runs can be told apart.

use crate::output::traits::{OutputResult, OutputSink, ProductRecord};
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQL schema for the output database
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    harvested_at TEXT NOT NULL,
    category TEXT NOT NULL,
    name TEXT NOT NULL,
    price_inr TEXT NOT NULL,
    discount_pct REAL,
    rating TEXT NOT NULL,
    sold_by TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_category ON products(category);
CREATE INDEX IF NOT EXISTS idx_products_harvested_at ON products(harvested_at);
"#;

/// Writes product records to an SQLite database
pub struct SqliteSink {
    conn: Connection,
    destination: String,
}

impl SqliteSink {
    /// Opens or creates the database at `path`
    pub fn open(path: &Path) -> OutputResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;
        conn.execute_batch(SCHEMA_SQL)?;

        Ok(Self {
            conn,
            destination: path.display().to_string(),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn,
            destination: ":memory:".to_string(),
        })
    }

    /// Number of stored product rows
    pub fn count_products(&self) -> OutputResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl OutputSink for SqliteSink {
    fn write(&mut self, records: &[ProductRecord]) -> OutputResult<()> {
        let harvested_at = Utc::now().to_rfc3339();
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO products (harvested_at, category, name, price_inr, discount_pct, rating, sold_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for record in records {
                stmt.execute(params![
                    harvested_at,
                    record.category,
                    record.name,
                    record.price_inr,
                    record.discount_pct,
                    record.rating,
                    record.sold_by,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn destination(&self) -> String {
        self.destination.clone()
    }
}
