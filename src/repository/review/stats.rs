//! Sentiment aggregates over the review table.
//!
//! Counts use conditional sums so that every label other than exactly
//! "Positive" or "Negative" contributes to neither bucket.

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Bool};
use diesel_async::RunQueryDsl;

use super::ReviewRepository;
use crate::models::{
    AspectBreakdown, AspectSentiment, AttractionSentiment, PlaceSentiment, SentimentSelector,
};
use crate::repository::pool::DbError;
use crate::schema::reviews;
use crate::with_conn;

const POSITIVE_SUM: &str = "COALESCE(SUM(CASE WHEN label = 'Positive' THEN 1 ELSE 0 END), 0)";
const NEGATIVE_SUM: &str = "COALESCE(SUM(CASE WHEN label = 'Negative' THEN 1 ELSE 0 END), 0)";

fn positive_count() -> SqlLiteral<BigInt> {
    sql::<BigInt>(POSITIVE_SUM)
}

fn negative_count() -> SqlLiteral<BigInt> {
    sql::<BigInt>(NEGATIVE_SUM)
}

/// `column = value`, or always true when the value is absent.
///
/// Keeps a single query shape for optional filters, so grouped queries
/// don't need boxing.
macro_rules! eq_or_any {
    ($column:expr, $value:expr) => {
        $column
            .eq($value.unwrap_or_default())
            .or($value.is_none().into_sql::<Bool>())
    };
}

type CountRow = (String, i64, i64);

impl ReviewRepository {
    /// Attractions ranked by positive or negative review count.
    ///
    /// Ties break by attraction name so the ranking is stable.
    pub async fn top_attractions(
        &self,
        selector: SentimentSelector,
        limit: i64,
    ) -> Result<Vec<AttractionSentiment>, DbError> {
        let rank_by = match selector {
            SentimentSelector::Positive => positive_count(),
            SentimentSelector::Negative => negative_count(),
        };

        with_conn!(self.pool, conn => {
            let rows: Vec<CountRow> = reviews::table
                .group_by(reviews::tourist_attraction)
                .select((reviews::tourist_attraction, positive_count(), negative_count()))
                .order((rank_by.desc(), reviews::tourist_attraction.asc()))
                .limit(limit)
                .load(&mut conn)
                .await?;

            Ok(rows
                .into_iter()
                .map(|(attraction, positive, negative)| AttractionSentiment {
                    attraction,
                    positive_count: positive as u64,
                    negative_count: negative as u64,
                })
                .collect())
        })
    }

    /// Distinct aspect tags, optionally within one category, sorted.
    pub async fn distinct_aspects(&self, category: Option<&str>) -> Result<Vec<String>, DbError> {
        with_conn!(self.pool, conn => {
            reviews::table
                .filter(eq_or_any!(reviews::tourist_attraction_category, category))
                .select(reviews::aspect)
                .distinct()
                .order(reviews::aspect.asc())
                .load::<String>(&mut conn)
                .await
        })
    }

    /// Positive and negative totals for one (category, aspect) pair.
    pub async fn aspect_sentiment(
        &self,
        category: Option<&str>,
        aspect: Option<&str>,
    ) -> Result<AspectSentiment, DbError> {
        with_conn!(self.pool, conn => {
            let (positive, negative): (i64, i64) = reviews::table
                .filter(eq_or_any!(reviews::tourist_attraction_category, category))
                .filter(eq_or_any!(reviews::aspect, aspect))
                .select((positive_count(), negative_count()))
                .get_result(&mut conn)
                .await?;

            Ok(AspectSentiment::new(positive as u64, negative as u64))
        })
    }

    /// Per-attraction totals for one (category, aspect) pair, sorted by place.
    pub async fn aspect_sentiment_by_place(
        &self,
        category: Option<&str>,
        aspect: Option<&str>,
    ) -> Result<Vec<PlaceSentiment>, DbError> {
        with_conn!(self.pool, conn => {
            let rows: Vec<CountRow> = reviews::table
                .filter(eq_or_any!(reviews::tourist_attraction_category, category))
                .filter(eq_or_any!(reviews::aspect, aspect))
                .group_by(reviews::tourist_attraction)
                .select((reviews::tourist_attraction, positive_count(), negative_count()))
                .order(reviews::tourist_attraction.asc())
                .load(&mut conn)
                .await?;

            Ok(rows.into_iter().map(place_sentiment).collect())
        })
    }

    /// Per-attraction totals within a category, sorted by place.
    pub async fn stats_by_category(
        &self,
        category: Option<&str>,
    ) -> Result<Vec<PlaceSentiment>, DbError> {
        with_conn!(self.pool, conn => {
            let rows: Vec<CountRow> = reviews::table
                .filter(eq_or_any!(reviews::tourist_attraction_category, category))
                .group_by(reviews::tourist_attraction)
                .select((reviews::tourist_attraction, positive_count(), negative_count()))
                .order(reviews::tourist_attraction.asc())
                .load(&mut conn)
                .await?;

            Ok(rows.into_iter().map(place_sentiment).collect())
        })
    }

    /// Per-aspect totals for one attraction, sorted by aspect.
    pub async fn stats_by_place(&self, place: Option<&str>) -> Result<Vec<AspectBreakdown>, DbError> {
        with_conn!(self.pool, conn => {
            let rows: Vec<CountRow> = reviews::table
                .filter(eq_or_any!(reviews::tourist_attraction, place))
                .group_by(reviews::aspect)
                .select((reviews::aspect, positive_count(), negative_count()))
                .order(reviews::aspect.asc())
                .load(&mut conn)
                .await?;

            Ok(rows
                .into_iter()
                .map(|(aspect, positive, negative)| AspectBreakdown {
                    aspect,
                    positive: positive as u64,
                    negative: negative as u64,
                })
                .collect())
        })
    }
}

fn place_sentiment((place, positive, negative): CountRow) -> PlaceSentiment {
    PlaceSentiment {
        place,
        positive: positive as u64,
        negative: negative as u64,
    }
}
