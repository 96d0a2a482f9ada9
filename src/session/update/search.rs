//! Filter and sort handlers.

use super::super::messages::Message;
use super::super::state::SessionState;
use super::super::task::Task;
use crate::library::FilterCriteria;

/// Handle filter and sort messages. The view is derived on demand, so these
/// only record the new criteria.
pub fn handle_search_filter(s: &mut SessionState, message: Message) -> Task {
    match message {
        Message::SetFilter(criteria) => {
            tracing::debug!(target: "session::search", "Filter: {:?}", criteria);
            s.filter = criteria;
        }
        Message::ResetFilter => {
            s.filter = FilterCriteria::default();
        }
        Message::SetSort(field) => {
            s.sort = s.sort.toggle(field);
            tracing::debug!(target: "session::search", "Sort: {} {:?}", s.sort.field, s.sort.direction);
        }
        _ => {}
    }
    Task::none()
}
