//! phenokb-session — Selection state, drag gesture lifecycle, and the
//! commit path that keeps the remote store eventually consistent with the
//! local board.
//!
//! One logical writer: every mutation takes `&mut self`, so a session shared
//! across tasks must sit behind a `tokio::sync::Mutex` (one mutation in
//! flight at a time). Commits are optimistic — a failed push keeps the local
//! board and broadcasts the failure instead of rolling back.

pub mod events;
pub mod session;

pub use events::SessionEvent;
pub use session::{CurationSession, DragState, FetchTicket};
