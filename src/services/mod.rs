//! Service layer for review-insight business logic.
//!
//! Services can be used by the HTTP server or the CLI.

pub mod ingest;

pub use ingest::{IngestError, IngestOutcome, IngestService, ReviewSubmission};
