/// Wire-level record types shared between the board model and the remote
/// curation service. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Symptom order record
// ---------------------------------------------------------------------------

/// One row of the flattened symptom ordering pushed to the remote store.
/// `order` is the zero-based position of the symptom within its category
/// at flatten time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomRecord {
    pub gene_name: String,
    pub symptom_name: String,
    pub category_name: String,
    pub order: i64,
}

impl SymptomRecord {
    pub fn new(gene: &str, symptom: &str, category: &str, order: i64) -> Self {
        Self {
            gene_name:     gene.to_string(),
            symptom_name:  symptom.to_string(),
            category_name: category.to_string(),
            order,
        }
    }
}
