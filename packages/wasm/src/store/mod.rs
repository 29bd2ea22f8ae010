//! Graph state owned by the caller, plus the yank/reattach state machine.

mod graph_store;
mod yank;

pub use graph_store::{EdgeSegment, GraphStore};
pub use yank::{ChildSlot, DetachScope, StoreConfig, YankState};
