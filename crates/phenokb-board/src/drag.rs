//! The drag-reorder engine: pure transformation functions that, given a move
//! event, produce a new store reflecting either an intra-category reorder or
//! a cross-category relocation.
//! See ARCHITECTURE.md §2.2–2.3
//!
//! Gesture detection (pointer tracking, bounding boxes) belongs to whatever
//! frontend drives this; the engine only needs the resolved drag payload and
//! hover target, plus [`hover_commits`] as the shared midpoint rule.

use serde::{Deserialize, Serialize};

use crate::store::CategorizedSymptoms;

/// What kind of row a drag payload or hover target refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    Symptom,
    Category,
}

/// Transient descriptor of an in-flight drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    /// The dragged item's identity (symptom name, or category name for
    /// header drags — which the engine treats as no-ops).
    pub item: String,
    /// Zero-based position within the origin category.
    pub index: usize,
    /// Origin category name.
    pub category: String,
    pub kind: ItemKind,
}

impl DragPayload {
    pub fn symptom(item: &str, index: usize, category: &str) -> Self {
        Self {
            item: item.to_string(),
            index,
            category: category.to_string(),
            kind: ItemKind::Symptom,
        }
    }
}

/// Compute the store after one move event. Always returns a complete new
/// store; unsupported combinations return the input unchanged.
///
/// Supported moves:
/// - symptom hovered over a symptom of the *same* category at a different
///   index: splice reorder (remove at `drag.index`, reinsert at
///   `hover_index` of the shortened list).
/// - symptom dropped on a *different* category's header: remove by value
///   from the origin, append at the destination tail. The destination is
///   created empty if absent.
pub fn move_item(
    store: &CategorizedSymptoms,
    drag: &DragPayload,
    hover_index: usize,
    hover_category: &str,
    hover_kind: ItemKind,
) -> CategorizedSymptoms {
    if drag.kind != ItemKind::Symptom {
        return store.clone();
    }

    match hover_kind {
        ItemKind::Symptom if drag.category == hover_category && drag.index != hover_index => {
            reorder_within(store, &drag.category, drag.index, hover_index)
        }
        ItemKind::Category if drag.category != hover_category => {
            relocate(store, &drag.item, &drag.category, hover_category)
        }
        _ => store.clone(),
    }
}

fn reorder_within(
    store: &CategorizedSymptoms,
    category: &str,
    drag_index: usize,
    hover_index: usize,
) -> CategorizedSymptoms {
    let mut next = store.clone();
    let symptoms = next.entry_mut(category);
    if drag_index >= symptoms.len() {
        return store.clone();
    }
    let dragged = symptoms.remove(drag_index);
    let insert_at = hover_index.min(symptoms.len());
    symptoms.insert(insert_at, dragged);
    next
}

fn relocate(
    store: &CategorizedSymptoms,
    symptom: &str,
    from: &str,
    to: &str,
) -> CategorizedSymptoms {
    let mut next = store.clone();
    let source = next.entry_mut(from);
    let Some(pos) = source.iter().position(|s| s == symptom) else {
        return store.clone();
    };
    source.remove(pos);
    next.entry_mut(to).push(symptom.to_string());
    next
}

/// Bounding box of the hovered row, in the pointer's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverRect {
    pub top: f64,
    pub bottom: f64,
}

/// Midpoint rule for same-category hovers: commit the move only once the
/// pointer has crossed the vertical middle of the target row in the
/// direction of travel. Dragging down commits past the lower half, dragging
/// up past the upper half. Keeps adjacent rows from oscillating while the
/// pointer sits near their shared edge.
pub fn hover_commits(
    drag_index: usize,
    hover_index: usize,
    pointer_y: f64,
    rect: HoverRect,
) -> bool {
    if drag_index == hover_index {
        return false;
    }
    let middle = (rect.bottom - rect.top) / 2.0;
    let offset = pointer_y - rect.top;

    if drag_index < hover_index {
        // Dragging downwards.
        offset >= middle
    } else {
        // Dragging upwards.
        offset <= middle
    }
}
