//! review-insight - tourist attraction reviews with sentiment statistics.
//!
//! Serves review records and per-attraction sentiment aggregates over HTTP,
//! and enriches newly submitted reviews through an external sentiment
//! classifier before storing them.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod models;
pub mod repository;
pub mod schema;
pub mod server;
pub mod services;
