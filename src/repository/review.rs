//! Review repository.
//!
//! Reviews are append-only: this repository can insert and read, and has no
//! update or delete path. Aggregate queries live in [`stats`].

mod stats;

use chrono::SecondsFormat;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::models::{NewReview, ReviewRecord};
use super::parse_datetime;
use super::pool::{DbError, DbPool};
use crate::models::{Review, ReviewerName};
use crate::schema::reviews;
use crate::with_conn;

impl From<ReviewRecord> for Review {
    fn from(record: ReviewRecord) -> Self {
        Review {
            id: record.id,
            thai_name: record.tourist_attraction_thai_name,
            category: record.tourist_attraction_category,
            attraction: record.tourist_attraction,
            name: ReviewerName::from_json(&record.reviewer_name),
            text: record.review,
            rating: record.rating,
            label: record.label,
            emoji: record.emoji,
            emoji_label: record.emoji_label,
            vader_label: record.label_vader_sentiment,
            adjective: record.adjective,
            aspect: record.aspect,
            created_at: parse_datetime(&record.created_at),
        }
    }
}

impl<'a> From<&'a Review> for NewReview<'a> {
    fn from(review: &'a Review) -> Self {
        NewReview {
            id: &review.id,
            tourist_attraction_thai_name: &review.thai_name,
            tourist_attraction_category: &review.category,
            tourist_attraction: &review.attraction,
            reviewer_name: review.name.to_json(),
            review: &review.text,
            rating: &review.rating,
            label: &review.label,
            emoji: &review.emoji,
            emoji_label: review.emoji_label,
            label_vader_sentiment: &review.vader_label,
            adjective: &review.adjective,
            aspect: &review.aspect,
            // Fixed-width timestamps keep text ordering chronological.
            created_at: review
                .created_at
                .to_rfc3339_opts(SecondsFormat::Micros, true),
        }
    }
}

/// Diesel-backed review repository.
#[derive(Clone)]
pub struct ReviewRepository {
    pool: DbPool,
}

impl ReviewRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List reviews in insertion order, optionally only those for one place.
    pub async fn list(&self, place: Option<&str>) -> Result<Vec<Review>, DbError> {
        with_conn!(self.pool, conn => {
            let mut query = reviews::table.into_boxed();
            if let Some(place) = place {
                query = query.filter(reviews::tourist_attraction.eq(place));
            }

            let records = query
                .order((reviews::created_at.asc(), reviews::id.asc()))
                .select(ReviewRecord::as_select())
                .load::<ReviewRecord>(&mut conn)
                .await?;

            Ok(records.into_iter().map(Review::from).collect())
        })
    }

    /// Get a review by ID.
    #[cfg(test)]
    pub async fn get(&self, id: &str) -> Result<Option<Review>, DbError> {
        with_conn!(self.pool, conn => {
            reviews::table
                .find(id)
                .select(ReviewRecord::as_select())
                .first::<ReviewRecord>(&mut conn)
                .await
                .optional()
                .map(|opt| opt.map(Review::from))
        })
    }

    /// Count all reviews.
    pub async fn count(&self) -> Result<u64, DbError> {
        with_conn!(self.pool, conn => {
            let count: i64 = reviews::table.count().get_result(&mut conn).await?;
            Ok(count as u64)
        })
    }

    /// Insert a review as a single statement.
    pub async fn insert(&self, review: &Review) -> Result<(), DbError> {
        let record = NewReview::from(review);

        with_conn!(self.pool, conn => {
            diesel::insert_into(reviews::table)
                .values(&record)
                .execute(&mut conn)
                .await?;
            Ok(())
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{LABEL_NEGATIVE, LABEL_POSITIVE};
    use crate::repository::DbContext;
    use chrono::{Duration, SubsecRound, Utc};
    use tempfile::TempDir;

    pub(crate) async fn setup_repo() -> (ReviewRepository, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let ctx = DbContext::sqlite(&dir.path().join("reviews.db"));
        ctx.init_schema().await.unwrap();
        (ctx.reviews(), dir)
    }

    /// Build a classified review; `offset_secs` spaces out creation times.
    pub(crate) fn review(
        attraction: &str,
        category: &str,
        aspect: &str,
        label: &str,
        offset_secs: i64,
    ) -> Review {
        let mut review = Review::draft(None, category, Some(attraction), "review text");
        review.aspect = aspect.to_string();
        review.label = label.to_string();
        review.created_at = (Utc::now() + Duration::seconds(offset_secs)).trunc_subsecs(6);
        review
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let (repo, _dir) = setup_repo().await;

        let mut original = review("Wat Arun", "Religious Place", "Scenery", LABEL_POSITIVE, 0);
        original.name = ReviewerName::Unstructured(serde_json::json!({"display": "Nok"}));
        original.emoji = "😀 👍".to_string();
        original.emoji_label = 2.0;
        repo.insert(&original).await.unwrap();

        let loaded = repo.get(&original.id).await.unwrap().unwrap();
        assert_eq!(loaded, original);
        assert!(repo.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let (repo, _dir) = setup_repo().await;
        let r = review("Wat Arun", "Religious Place", "Scenery", LABEL_POSITIVE, 0);

        repo.insert(&r).await.unwrap();
        assert!(repo.insert(&r).await.is_err());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_place_in_insertion_order() {
        let (repo, _dir) = setup_repo().await;

        let first = review("Wat Arun", "Religious Place", "Scenery", LABEL_POSITIVE, 0);
        let second = review("Dusit Zoo", "Zoos", "Animals", LABEL_NEGATIVE, 1);
        let third = review("Wat Arun", "Religious Place", "Atmosphere", LABEL_NEGATIVE, 2);
        for r in [&third, &first, &second] {
            repo.insert(r).await.unwrap();
        }

        let all = repo.list(None).await.unwrap();
        let ids: Vec<_> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec![first.id.as_str(), second.id.as_str(), third.id.as_str()]);

        let wat_arun = repo.list(Some("Wat Arun")).await.unwrap();
        assert_eq!(wat_arun.len(), 2);
        assert!(wat_arun.iter().all(|r| r.attraction == "Wat Arun"));

        assert!(repo.list(Some("Nowhere")).await.unwrap().is_empty());
    }
}
