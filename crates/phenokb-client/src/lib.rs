//! phenokb-client — HTTP client for the remote gene/symptom curation
//! service.
//!
//! Covers the full service surface: gene/category/symptom reads, symptom
//! order persistence, spreadsheet management (upload, update, delete),
//! the import error log, and configuration archive transfer. The session
//! layer talks to the service through the [`CurationBackend`] trait so tests
//! can substitute an in-memory fake.

pub mod backend;
pub mod client;

pub use backend::CurationBackend;
pub use client::CurationClient;
