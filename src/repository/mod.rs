//! Repository layer for database persistence.
//!
//! All database access uses Diesel ORM with compile-time query checking.
//! Supports both SQLite and PostgreSQL backends.

pub mod context;
pub mod models;
pub mod pool;
mod review;
pub mod util;

pub use context::DbContext;
pub use pool::{DbError, DbPool};
pub use review::ReviewRepository;

use chrono::{DateTime, Utc};

/// Parse a datetime string from the database, defaulting to Unix epoch on error.
pub fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime() {
        let dt = parse_datetime("2024-05-01T10:20:30.123456Z");
        assert_eq!(dt.to_rfc3339(), "2024-05-01T10:20:30.123456+00:00");
        assert_eq!(parse_datetime("yesterday"), DateTime::UNIX_EPOCH);
    }
}
