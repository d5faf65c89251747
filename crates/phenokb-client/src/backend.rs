//! Backend interface consumed by the session layer.

use async_trait::async_trait;

use phenokb_board::CategorizedSymptoms;
use phenokb_common::{Result, SymptomRecord};

/// The subset of the curation service a live session depends on.
///
/// [`crate::CurationClient`] implements this against the real service;
/// session tests implement it over an in-memory store.
#[async_trait]
pub trait CurationBackend: Send + Sync {
    /// All known gene names.
    async fn list_genes(&self) -> Result<Vec<String>>;

    /// The fixed category vocabulary.
    async fn list_categories(&self) -> Result<Vec<String>>;

    /// Categorized symptoms of one gene, category order significant.
    async fn fetch_symptoms(&self, gene: &str) -> Result<CategorizedSymptoms>;

    /// Persist a full flattened ordering. Invoked once per completed drag
    /// gesture or archive operation, never per intermediate hover.
    async fn push_symptom_order(&self, records: &[SymptomRecord]) -> Result<()>;

    /// Hard-delete one symptom record on the service side.
    async fn delete_symptom(&self, symptom_id: &str) -> Result<()>;
}
