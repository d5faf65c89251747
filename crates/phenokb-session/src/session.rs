//! The curation session: gene/category selection, the drag gesture state
//! machine, and the flatten-and-push commit path.
//! See ARCHITECTURE.md §5

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use phenokb_board::{move_item, CategorizedSymptoms, DragPayload, ItemKind};
use phenokb_client::CurationBackend;
use phenokb_common::{PhenokbError, Result};

use crate::events::SessionEvent;

/// Gesture state. A gene switch or a drop always returns to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging { gesture: Uuid, payload: DragPayload },
}

/// Handle for one in-flight symptom fetch. The epoch inside it decides
/// whether the resolved board may still be applied (stale-response guard).
#[derive(Debug, Clone)]
pub struct FetchTicket {
    gene: String,
    epoch: u64,
}

impl FetchTicket {
    pub fn gene(&self) -> &str {
        &self.gene
    }
}

/// Session-scoped curation state over one [`CurationBackend`].
///
/// Every mutation takes `&mut self`; hover moves are local-only and a push
/// to the remote store happens once per completed drop or archive.
pub struct CurationSession<B> {
    backend: Arc<B>,
    event_tx: broadcast::Sender<SessionEvent>,
    selected_gene: Option<String>,
    selected_category: Option<String>,
    store: Option<CategorizedSymptoms>,
    fetch_epoch: u64,
    drag: DragState,
}

impl<B: CurationBackend> CurationSession<B> {
    pub fn new(backend: Arc<B>) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            backend,
            event_tx,
            selected_gene: None,
            selected_category: None,
            store: None,
            fetch_epoch: 0,
            drag: DragState::Idle,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub fn selected_gene(&self) -> Option<&str> {
        self.selected_gene.as_deref()
    }

    pub fn selected_category(&self) -> Option<&str> {
        self.selected_category.as_deref()
    }

    pub fn board(&self) -> Option<&CategorizedSymptoms> {
        self.store.as_ref()
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    // -----------------------------------------------------------------------
    // Gene selection
    // -----------------------------------------------------------------------

    /// Synchronous half of a gene switch: record the selection, clear the
    /// board, the category selection and any in-flight gesture, and mint a
    /// ticket for the asynchronous fetch.
    pub fn begin_gene_selection(&mut self, gene: &str) -> FetchTicket {
        info!(gene, "gene selected, clearing board for refetch");
        self.selected_gene = Some(gene.to_string());
        self.selected_category = None;
        self.store = None;
        self.drag = DragState::Idle;
        self.fetch_epoch += 1;
        FetchTicket {
            gene: gene.to_string(),
            epoch: self.fetch_epoch,
        }
    }

    /// Apply a resolved fetch. Returns false (and discards the board) when a
    /// newer `begin_gene_selection` superseded the ticket, so a slow fetch
    /// for a previously selected gene can never clobber the current one.
    pub fn apply_fetched_board(&mut self, ticket: &FetchTicket, board: CategorizedSymptoms) -> bool {
        if ticket.epoch != self.fetch_epoch
            || self.selected_gene.as_deref() != Some(ticket.gene.as_str())
        {
            debug!(gene = %ticket.gene, "discarding stale symptom fetch");
            let _ = self.event_tx.send(SessionEvent::StaleFetchDiscarded {
                gene: ticket.gene.clone(),
            });
            return false;
        }

        self.selected_category = board.first_category().map(String::from);
        let _ = self.event_tx.send(SessionEvent::GeneSelected {
            gene: ticket.gene.clone(),
            categories: board.category_count(),
            symptoms: board.symptom_count(),
        });
        self.store = Some(board);
        true
    }

    /// Select a gene and load its board: `begin_gene_selection` + fetch +
    /// guarded apply in one call.
    pub async fn select_gene(&mut self, gene: &str) -> Result<()> {
        let ticket = self.begin_gene_selection(gene);
        let backend = Arc::clone(&self.backend);
        let board = backend.fetch_symptoms(gene).await?;
        self.apply_fetched_board(&ticket, board);
        Ok(())
    }

    /// Re-fetch the currently selected gene (the recovery path after the
    /// local board diverged from the remote store).
    pub async fn refresh(&mut self) -> Result<()> {
        let gene = self
            .selected_gene
            .clone()
            .ok_or_else(|| PhenokbError::Session("no gene selected".into()))?;
        self.select_gene(&gene).await
    }

    pub fn select_category(&mut self, category: &str) -> Result<()> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| PhenokbError::Session("no symptom board loaded".into()))?;
        if !store.category_names().any(|c| c == category) {
            return Err(PhenokbError::Session(format!("unknown category: {category}")));
        }
        self.selected_category = Some(category.to_string());
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Drag gesture lifecycle
    // -----------------------------------------------------------------------

    /// Start dragging `symptom`. Its current category and index become the
    /// drag payload origin.
    pub fn begin_drag(&mut self, symptom: &str) -> Result<Uuid> {
        if matches!(self.drag, DragState::Dragging { .. }) {
            return Err(PhenokbError::Session("a drag gesture is already active".into()));
        }
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| PhenokbError::Session("no symptom board loaded".into()))?;

        let origin = store.category_names().find_map(|category| {
            store
                .symptoms(category)
                .and_then(|list| list.iter().position(|s| s == symptom))
                .map(|index| (category.to_string(), index))
        });
        let Some((category, index)) = origin else {
            return Err(PhenokbError::Session(format!("unknown symptom: {symptom}")));
        };

        let gesture = Uuid::new_v4();
        debug!(%gesture, symptom, %category, index, "drag started");
        self.drag = DragState::Dragging {
            gesture,
            payload: DragPayload::symptom(symptom, index, &category),
        };
        Ok(gesture)
    }

    /// Apply one provisional hover move. Local-only: nothing is pushed until
    /// [`CurationSession::complete_drop`]. A cross-category relocation
    /// arrives as the last hover (onto the destination header) before the
    /// drop. Hover moves apply strictly in call order.
    pub fn hover_move(
        &mut self,
        hover_index: usize,
        hover_category: &str,
        hover_kind: ItemKind,
    ) -> Result<()> {
        let DragState::Dragging { payload, .. } = &mut self.drag else {
            return Err(PhenokbError::Session("no drag gesture active".into()));
        };
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| PhenokbError::Session("no symptom board loaded".into()))?;

        let next = move_item(store, payload, hover_index, hover_category, hover_kind);
        if next == *store {
            return Ok(());
        }

        // Keep the payload tracking the dragged item's live position, the
        // way the gesture source mutates its monitor item.
        match hover_kind {
            ItemKind::Symptom => payload.index = hover_index,
            ItemKind::Category => {
                payload.category = hover_category.to_string();
                payload.index = next
                    .symptoms(hover_category)
                    .map(|list| list.len().saturating_sub(1))
                    .unwrap_or(0);
            }
        }
        self.store = Some(next);
        Ok(())
    }

    /// Finish the gesture: flatten the board and push the full ordering.
    /// The local board is kept even when the push fails.
    pub async fn complete_drop(&mut self) -> Result<()> {
        let DragState::Dragging { gesture, .. } = &self.drag else {
            return Err(PhenokbError::Session("no drag gesture active".into()));
        };
        debug!(gesture = %gesture, "drop completed, committing order");
        self.drag = DragState::Idle;
        self.commit().await
    }

    /// Abort the gesture without committing. Hover moves already applied
    /// stay in the local board until the next drop or refetch.
    pub fn cancel_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    // -----------------------------------------------------------------------
    // Deletion (archive relocation) and the commit path
    // -----------------------------------------------------------------------

    /// Relocate `symptom` into the Archived bucket and push the new order.
    /// Structurally idempotent, but an already-archived symptom still
    /// triggers a commit.
    pub async fn archive_symptom(&mut self, symptom: &str) -> Result<()> {
        let gene = self
            .selected_gene
            .clone()
            .ok_or_else(|| PhenokbError::Session("no gene selected".into()))?;
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| PhenokbError::Session("no symptom board loaded".into()))?;

        self.store = Some(store.archive(symptom));
        let _ = self.event_tx.send(SessionEvent::SymptomArchived {
            gene,
            symptom: symptom.to_string(),
        });
        self.commit().await
    }

    /// Flatten the current board and push it. Failures are broadcast and
    /// returned; the optimistic local state is never rolled back, so the
    /// board may diverge from the remote store until the next refetch.
    async fn commit(&mut self) -> Result<()> {
        let gene = self
            .selected_gene
            .clone()
            .ok_or_else(|| PhenokbError::Session("no gene selected".into()))?;
        let records = self
            .store
            .as_ref()
            .ok_or_else(|| PhenokbError::Session("no symptom board loaded".into()))?
            .flatten(&gene);

        let backend = Arc::clone(&self.backend);
        match backend.push_symptom_order(&records).await {
            Ok(()) => {
                info!(gene, records = records.len(), "symptom order committed");
                let _ = self.event_tx.send(SessionEvent::OrderCommitted {
                    gene,
                    records: records.len(),
                });
                Ok(())
            }
            Err(e) => {
                warn!(gene, error = %e, "commit failed; keeping local board");
                let _ = self.event_tx.send(SessionEvent::CommitFailed {
                    gene,
                    message: e.to_string(),
                });
                Err(e)
            }
        }
    }
}
