use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nd_core::{ArticleRecord, Error, InsightRecord, InsightStore, Result, StoredInsight};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

/// Table bootstrap, run on every connect. Not a migration system: tables are
/// created when absent and never altered.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS insights (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        summary TEXT NOT NULL,
        keywords TEXT NOT NULL,
        insight TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS articles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        link TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
];

fn db_error(context: &str, e: sqlx::Error) -> Error {
    Error::Database(format!("{}: {}", context, e))
}

pub struct SqliteInsightStore {
    pool: SqlitePool,
}

impl SqliteInsightStore {
    /// Opens (creating if needed) the database at `url`, e.g. `sqlite:insights.db`.
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| db_error("Invalid database url", e))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| db_error("Failed to connect to database", e))?;

        for (i, statement) in SCHEMA.iter().enumerate() {
            sqlx::query(statement)
                .execute(&pool)
                .await
                .map_err(|e| db_error(&format!("Failed to create table {}", i), e))?;
        }

        Ok(Self { pool })
    }

    pub async fn article_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM articles")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("Failed to count articles", e))?;
        Ok(row.get("n"))
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl InsightStore for SqliteInsightStore {
    async fn save_insight(&self, insight: &InsightRecord) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO insights (summary, keywords, insight, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&insight.summary)
        .bind(&insight.keywords)
        .bind(&insight.insight)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to store insight", e))?;

        Ok(result.last_insert_rowid())
    }

    async fn save_articles(&self, articles: &[ArticleRecord]) -> Result<usize> {
        let now = Utc::now().to_rfc3339();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("Failed to open transaction", e))?;

        for article in articles {
            sqlx::query("INSERT INTO articles (title, link, created_at) VALUES (?, ?, ?)")
                .bind(&article.title)
                .bind(&article.link)
                .bind(&now)
                .execute(&mut *tx)
                .await
                .map_err(|e| db_error("Failed to store article", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| db_error("Failed to commit articles", e))?;
        Ok(articles.len())
    }

    async fn latest_insight(&self) -> Result<Option<StoredInsight>> {
        let row = sqlx::query(
            "SELECT id, summary, keywords, insight, created_at FROM insights ORDER BY id DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to load latest insight", e))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let created_at: String = row.get("created_at");
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| Error::Database(format!("Failed to parse date: {}", e)))?
            .with_timezone(&Utc);

        Ok(Some(StoredInsight {
            id: row.get("id"),
            record: InsightRecord {
                summary: row.get("summary"),
                keywords: row.get("keywords"),
                insight: row.get("insight"),
            },
            created_at,
        }))
    }
}
