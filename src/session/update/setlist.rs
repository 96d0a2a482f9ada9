//! Set-list handlers.

use super::super::messages::Message;
use super::super::state::SessionState;
use super::super::task::Task;

pub fn handle_setlist(s: &mut SessionState, message: Message) -> Task {
    match message {
        Message::AddToSetlist(id) => {
            if !s.library.contains(&id) {
                tracing::debug!(target: "session::setlist", "Ignoring unknown track {}", id);
            } else if s.setlist.add(id.clone()) {
                tracing::debug!(target: "session::setlist", "Added {} at position {}", id, s.setlist.len());
            }
        }
        Message::RemoveFromSetlist(id) => {
            if s.setlist.remove(&id) {
                tracing::debug!(target: "session::setlist", "Removed {}", id);
            }
        }
        _ => {}
    }
    Task::none()
}
