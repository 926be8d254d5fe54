//! Diesel ORM models for the reviews table.

use diesel::prelude::*;

use crate::schema;

/// Review row from the database.
#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = schema::reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ReviewRecord {
    pub id: String,
    pub tourist_attraction_thai_name: String,
    pub tourist_attraction_category: String,
    pub tourist_attraction: String,
    pub reviewer_name: String,
    pub review: String,
    pub rating: String,
    pub label: String,
    pub emoji: String,
    pub emoji_label: f64,
    pub label_vader_sentiment: String,
    pub adjective: String,
    pub aspect: String,
    pub created_at: String,
}

/// New review for insertion.
#[derive(Insertable, Debug)]
#[diesel(table_name = schema::reviews)]
pub struct NewReview<'a> {
    pub id: &'a str,
    pub tourist_attraction_thai_name: &'a str,
    pub tourist_attraction_category: &'a str,
    pub tourist_attraction: &'a str,
    pub reviewer_name: String,
    pub review: &'a str,
    pub rating: &'a str,
    pub label: &'a str,
    pub emoji: &'a str,
    pub emoji_label: f64,
    pub label_vader_sentiment: &'a str,
    pub adjective: &'a str,
    pub aspect: &'a str,
    pub created_at: String,
}
