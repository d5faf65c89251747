//! phenokb-board — The ordered, categorized symptom collection and its
//! drag-and-drop mutation engine.
//!
//! Everything in this crate is pure: functions take a store by reference and
//! return a new store value, so no caller can ever observe a partially-moved
//! collection. All I/O (fetching, committing) lives in phenokb-client and
//! phenokb-session.

pub mod drag;
pub mod store;

pub use drag::{hover_commits, move_item, DragPayload, HoverRect, ItemKind};
pub use store::{CategorizedSymptoms, ARCHIVED_CATEGORY};
