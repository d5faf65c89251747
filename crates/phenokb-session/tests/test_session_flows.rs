//! End-to-end session flows against an in-memory backend: selection,
//! drag gestures, archive relocation, and the optimistic commit path.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use phenokb_board::{CategorizedSymptoms, ItemKind, ARCHIVED_CATEGORY};
use phenokb_client::CurationBackend;
use phenokb_common::{PhenokbError, Result, SymptomRecord};
use phenokb_session::{CurationSession, DragState, SessionEvent};

struct MockBackend {
    boards: Mutex<HashMap<String, CategorizedSymptoms>>,
    pushes: Mutex<Vec<Vec<SymptomRecord>>>,
    fail_pushes: AtomicBool,
}

impl MockBackend {
    fn new() -> Self {
        let mut boards = HashMap::new();
        boards.insert(
            "GBA".to_string(),
            CategorizedSymptoms::from_pairs([
                ("CatA", vec!["s1", "s2", "s3"]),
                ("CatB", vec!["s4"]),
            ]),
        );
        boards.insert(
            "PRRT2".to_string(),
            CategorizedSymptoms::from_pairs([("Triggers", vec!["Exercise"])]),
        );
        Self {
            boards: Mutex::new(boards),
            pushes: Mutex::new(Vec::new()),
            fail_pushes: AtomicBool::new(false),
        }
    }

    fn push_count(&self) -> usize {
        self.pushes.lock().unwrap().len()
    }

    fn last_push(&self) -> Vec<SymptomRecord> {
        self.pushes.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl CurationBackend for MockBackend {
    async fn list_genes(&self) -> Result<Vec<String>> {
        Ok(self.boards.lock().unwrap().keys().cloned().collect())
    }

    async fn list_categories(&self) -> Result<Vec<String>> {
        Ok(vec!["CatA".into(), "CatB".into()])
    }

    async fn fetch_symptoms(&self, gene: &str) -> Result<CategorizedSymptoms> {
        self.boards
            .lock()
            .unwrap()
            .get(gene)
            .cloned()
            .ok_or_else(|| PhenokbError::Fetch(format!("unknown gene: {gene}")))
    }

    async fn push_symptom_order(&self, records: &[SymptomRecord]) -> Result<()> {
        if self.fail_pushes.load(Ordering::SeqCst) {
            return Err(PhenokbError::Commit("service unavailable".into()));
        }
        self.pushes.lock().unwrap().push(records.to_vec());
        Ok(())
    }

    async fn delete_symptom(&self, _symptom_id: &str) -> Result<()> {
        Ok(())
    }
}

fn session() -> (Arc<MockBackend>, CurationSession<MockBackend>) {
    let backend = Arc::new(MockBackend::new());
    let session = CurationSession::new(Arc::clone(&backend));
    (backend, session)
}

#[tokio::test]
async fn test_select_gene_loads_board_and_default_category() {
    let (_, mut session) = session();
    session.select_gene("GBA").await.unwrap();

    assert_eq!(session.selected_gene(), Some("GBA"));
    assert_eq!(session.selected_category(), Some("CatA"));
    let board = session.board().unwrap();
    assert_eq!(board.symptoms("CatA").unwrap(), ["s1", "s2", "s3"]);
}

#[tokio::test]
async fn test_gene_switch_clears_dependent_state_synchronously() {
    let (_, mut session) = session();
    session.select_gene("GBA").await.unwrap();

    let _ticket = session.begin_gene_selection("PRRT2");
    assert_eq!(session.selected_gene(), Some("PRRT2"));
    assert!(session.board().is_none());
    assert!(session.selected_category().is_none());
}

#[tokio::test]
async fn test_stale_fetch_is_discarded() {
    // Scenario D: the fetch for the first gene resolves after the user has
    // already switched to a second gene.
    let (backend, mut session) = session();

    let old_ticket = session.begin_gene_selection("GBA");
    let old_board = backend.fetch_symptoms("GBA").await.unwrap();

    let new_ticket = session.begin_gene_selection("PRRT2");
    let new_board = backend.fetch_symptoms("PRRT2").await.unwrap();

    assert!(!session.apply_fetched_board(&old_ticket, old_board));
    assert!(session.board().is_none());

    assert!(session.apply_fetched_board(&new_ticket, new_board));
    assert_eq!(session.selected_gene(), Some("PRRT2"));
    assert_eq!(session.selected_category(), Some("Triggers"));
}

#[tokio::test]
async fn test_hover_moves_are_local_until_drop() {
    let (backend, mut session) = session();
    session.select_gene("GBA").await.unwrap();

    session.begin_drag("s1").unwrap();
    session.hover_move(2, "CatA", ItemKind::Symptom).unwrap();

    assert_eq!(session.board().unwrap().symptoms("CatA").unwrap(), ["s2", "s3", "s1"]);
    assert_eq!(backend.push_count(), 0);

    session.complete_drop().await.unwrap();
    assert_eq!(backend.push_count(), 1);
    assert_eq!(*session.drag_state(), DragState::Idle);

    let rows: Vec<(String, i64)> = backend
        .last_push()
        .iter()
        .map(|r| (r.symptom_name.clone(), r.order))
        .collect();
    assert_eq!(
        rows,
        [
            ("s2".to_string(), 0),
            ("s3".to_string(), 1),
            ("s1".to_string(), 2),
            ("s4".to_string(), 0),
        ]
    );
}

#[tokio::test]
async fn test_payload_tracks_live_position_across_hovers() {
    let (_, mut session) = session();
    session.select_gene("GBA").await.unwrap();

    session.begin_drag("s1").unwrap();
    session.hover_move(1, "CatA", ItemKind::Symptom).unwrap();
    session.hover_move(2, "CatA", ItemKind::Symptom).unwrap();

    // Two single-step hovers must end where one two-step hover would.
    assert_eq!(session.board().unwrap().symptoms("CatA").unwrap(), ["s2", "s3", "s1"]);
    match session.drag_state() {
        DragState::Dragging { payload, .. } => assert_eq!(payload.index, 2),
        DragState::Idle => panic!("gesture should still be active"),
    }
}

#[tokio::test]
async fn test_cross_category_drop_appends_at_tail() {
    let (backend, mut session) = session();
    session.select_gene("GBA").await.unwrap();

    session.begin_drag("s4").unwrap();
    session.hover_move(0, "CatA", ItemKind::Category).unwrap();
    session.complete_drop().await.unwrap();

    let board = session.board().unwrap();
    assert_eq!(board.symptoms("CatA").unwrap(), ["s1", "s2", "s3", "s4"]);
    assert!(board.symptoms("CatB").unwrap().is_empty());
    assert_eq!(backend.push_count(), 1);
}

#[tokio::test]
async fn test_commit_failure_keeps_local_board() {
    let (backend, mut session) = session();
    session.select_gene("GBA").await.unwrap();
    let mut events = session.subscribe();

    backend.fail_pushes.store(true, Ordering::SeqCst);
    session.begin_drag("s1").unwrap();
    session.hover_move(2, "CatA", ItemKind::Symptom).unwrap();

    let err = session.complete_drop().await.unwrap_err();
    assert!(matches!(err, PhenokbError::Commit(_)));

    // Optimistic local state survives the failed push.
    assert_eq!(session.board().unwrap().symptoms("CatA").unwrap(), ["s2", "s3", "s1"]);
    assert_eq!(backend.push_count(), 0);

    let mut saw_failure = false;
    while let Ok(event) = events.try_recv() {
        if matches!(event, SessionEvent::CommitFailed { .. }) {
            saw_failure = true;
        }
    }
    assert!(saw_failure, "commit failure should be broadcast");
}

#[tokio::test]
async fn test_archive_relocates_and_commits() {
    let (backend, mut session) = session();
    session.select_gene("GBA").await.unwrap();

    session.archive_symptom("s2").await.unwrap();

    let board = session.board().unwrap();
    assert_eq!(board.symptoms("CatA").unwrap(), ["s1", "s3"]);
    assert_eq!(board.symptoms(ARCHIVED_CATEGORY).unwrap(), ["s2"]);
    assert_eq!(backend.push_count(), 1);

    // Archiving again is a structural no-op but still commits.
    session.archive_symptom("s2").await.unwrap();
    assert_eq!(session.board().unwrap().symptoms(ARCHIVED_CATEGORY).unwrap(), ["s2"]);
    assert_eq!(backend.push_count(), 2);
}

#[tokio::test]
async fn test_gesture_errors() {
    let (_, mut session) = session();
    assert!(matches!(
        session.begin_drag("s1").unwrap_err(),
        PhenokbError::Session(_)
    ));

    session.select_gene("GBA").await.unwrap();
    assert!(matches!(
        session.begin_drag("unknown").unwrap_err(),
        PhenokbError::Session(_)
    ));
    assert!(matches!(
        session.hover_move(0, "CatA", ItemKind::Symptom).unwrap_err(),
        PhenokbError::Session(_)
    ));
    assert!(matches!(
        session.complete_drop().await.unwrap_err(),
        PhenokbError::Session(_)
    ));
}

#[tokio::test]
async fn test_cancel_drag_keeps_provisional_state() {
    let (backend, mut session) = session();
    session.select_gene("GBA").await.unwrap();

    session.begin_drag("s1").unwrap();
    session.hover_move(1, "CatA", ItemKind::Symptom).unwrap();
    session.cancel_drag();

    assert_eq!(*session.drag_state(), DragState::Idle);
    assert_eq!(session.board().unwrap().symptoms("CatA").unwrap(), ["s2", "s1", "s3"]);
    assert_eq!(backend.push_count(), 0);
}

#[tokio::test]
async fn test_select_category_validates_against_board() {
    let (_, mut session) = session();
    session.select_gene("GBA").await.unwrap();

    session.select_category("CatB").unwrap();
    assert_eq!(session.selected_category(), Some("CatB"));
    assert!(session.select_category("Nope").is_err());
}
