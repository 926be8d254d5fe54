//! Database context for the review store.
//!
//! The context owns the connection pool and hands out repositories. It is
//! built once at startup, passed to whoever needs the store, and closed
//! explicitly on shutdown.

use diesel_async::SimpleAsyncConnection;

use super::pool::{DbError, DbPool, SqliteConn};
use super::review::ReviewRepository;
use super::util::redact_url_password;
use crate::with_conn_split;

#[cfg(feature = "postgres")]
use diesel_async::AsyncPgConnection;

/// Database context that manages the connection pool and provides repository access.
///
/// # Example
/// ```ignore
/// let ctx = DbContext::from_url("sqlite:review-insight.db")?;
/// ctx.init_schema().await?;
/// let reviews = ctx.reviews().list(None).await?;
/// ```
#[derive(Clone)]
pub struct DbContext {
    pool: DbPool,
}

impl DbContext {
    /// Create a context from a database URL.
    ///
    /// Supports:
    /// - SQLite: file paths or `sqlite:` URLs
    /// - PostgreSQL: `postgres://` or `postgresql://` URLs (with the `postgres` feature)
    pub fn from_url(database_url: &str) -> Result<Self, DbError> {
        let pool = DbPool::from_url(database_url)?;
        tracing::debug!(
            "Opened {} review store at {}",
            pool.backend_name(),
            redact_url_password(database_url)
        );
        Ok(Self { pool })
    }

    /// Create a context from a SQLite file path.
    pub fn sqlite(path: &std::path::Path) -> Self {
        Self {
            pool: DbPool::Sqlite(super::pool::SqlitePool::new(&path.display().to_string())),
        }
    }

    /// Get a review repository.
    pub fn reviews(&self) -> ReviewRepository {
        ReviewRepository::new(self.pool.clone())
    }

    /// Create the reviews table and its indexes if they don't exist.
    ///
    /// Also serves as the startup connectivity check: if the store cannot be
    /// reached this fails and the server never binds.
    pub async fn init_schema(&self) -> Result<(), DbError> {
        with_conn_split!(self.pool,
            sqlite: conn => {
                init_sqlite_schema(&mut conn).await
            },
            postgres: conn => {
                init_postgres_schema(&mut conn).await
            }
        )
    }

    /// Release pooled connections.
    pub fn close(&self) {
        self.pool.close();
        tracing::debug!("Closed {} review store", self.pool.backend_name());
    }
}

const SQLITE_SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS reviews (
        id TEXT PRIMARY KEY,
        tourist_attraction_thai_name TEXT NOT NULL DEFAULT '-',
        tourist_attraction_category TEXT NOT NULL DEFAULT '-',
        tourist_attraction TEXT NOT NULL DEFAULT '-',
        reviewer_name TEXT NOT NULL DEFAULT '"-"',
        review TEXT NOT NULL,
        rating TEXT NOT NULL DEFAULT '-',
        label TEXT NOT NULL DEFAULT '-',
        emoji TEXT NOT NULL DEFAULT '-',
        emoji_label REAL NOT NULL DEFAULT 0,
        label_vader_sentiment TEXT NOT NULL DEFAULT '-',
        adjective TEXT NOT NULL DEFAULT '-',
        aspect TEXT NOT NULL DEFAULT '-',
        created_at TEXT NOT NULL
    );
    CREATE INDEX IF NOT EXISTS idx_reviews_attraction ON reviews(tourist_attraction);
    CREATE INDEX IF NOT EXISTS idx_reviews_category_aspect ON reviews(tourist_attraction_category, aspect);
    CREATE INDEX IF NOT EXISTS idx_reviews_created ON reviews(created_at);
"#;

async fn init_sqlite_schema(conn: &mut SqliteConn) -> Result<(), DbError> {
    conn.batch_execute(SQLITE_SCHEMA).await
}

#[cfg(feature = "postgres")]
async fn init_postgres_schema(conn: &mut AsyncPgConnection) -> Result<(), DbError> {
    use diesel_async::RunQueryDsl;

    let statements = [
        r#"CREATE TABLE IF NOT EXISTS reviews (
            id TEXT PRIMARY KEY,
            tourist_attraction_thai_name TEXT NOT NULL DEFAULT '-',
            tourist_attraction_category TEXT NOT NULL DEFAULT '-',
            tourist_attraction TEXT NOT NULL DEFAULT '-',
            reviewer_name TEXT NOT NULL DEFAULT '"-"',
            review TEXT NOT NULL,
            rating TEXT NOT NULL DEFAULT '-',
            label TEXT NOT NULL DEFAULT '-',
            emoji TEXT NOT NULL DEFAULT '-',
            emoji_label DOUBLE PRECISION NOT NULL DEFAULT 0,
            label_vader_sentiment TEXT NOT NULL DEFAULT '-',
            adjective TEXT NOT NULL DEFAULT '-',
            aspect TEXT NOT NULL DEFAULT '-',
            created_at TEXT NOT NULL
        )"#,
        "CREATE INDEX IF NOT EXISTS idx_reviews_attraction ON reviews(tourist_attraction)",
        "CREATE INDEX IF NOT EXISTS idx_reviews_category_aspect ON reviews(tourist_attraction_category, aspect)",
        "CREATE INDEX IF NOT EXISTS idx_reviews_created ON reviews(created_at)",
    ];

    for stmt in statements {
        diesel::sql_query(stmt).execute(conn).await?;
    }

    Ok(())
}
