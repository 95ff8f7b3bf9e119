pub mod common;
pub mod entry;

pub use common::Displayable;
pub use entry::{Entry, EntryDraft, EntryId, EntryKind};
