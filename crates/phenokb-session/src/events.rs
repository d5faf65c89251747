//! Events broadcast to session subscribers (notification surfaces, logs).

use serde::{Deserialize, Serialize};

/// Pushed to subscribers after every observable session transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A gene's symptom board finished loading
    GeneSelected { gene: String, categories: usize, symptoms: usize },
    /// A resolved fetch was discarded because the selection moved on
    StaleFetchDiscarded { gene: String },
    /// A flattened ordering was persisted remotely
    OrderCommitted { gene: String, records: usize },
    /// A push failed; the local board was kept as-is
    CommitFailed { gene: String, message: String },
    /// A symptom was relocated into the Archived bucket
    SymptomArchived { gene: String, symptom: String },
}
