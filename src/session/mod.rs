//! The session state engine.
//!
//! Elm-style: a single [`SessionState`], a [`Message`] enum, and a pure-ish
//! [`update`] that mutates state and returns a [`Task`] describing any
//! collaborator calls. The [`Controller`] runs those calls and feeds their
//! results back in.
//!
//! Two small state machines carry the concurrency rules:
//! - [`EditSession`]: at most one cell under edit
//! - [`Recommendations`]: at most one accepted suggestion set, always for the
//!   latest [`RequestEpoch`]

pub mod edit;
pub mod messages;
pub mod runtime;
pub mod state;
pub mod task;
pub mod update;

pub use edit::{EditSession, EditTarget};
pub use messages::{FileAnalysis, Message};
pub use runtime::{Completion, Controller};
pub use state::{ExportView, Recommendations, SessionOptions, SessionState};
pub use task::{BatchId, RequestEpoch, Task};
pub use update::update;
