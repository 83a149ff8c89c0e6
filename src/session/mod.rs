//! Workspace state: the draft being edited, preferences, revision history
//! and baseline, kept in sync with a [`StateStore`](crate::storage::StateStore).

mod draft;
mod revisions;
mod workspace;

pub use draft::*;
pub use revisions::*;
pub use workspace::*;
