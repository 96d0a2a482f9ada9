//! Inline edit handling.

use super::super::edit::EditTarget;
use super::super::messages::Message;
use super::super::state::SessionState;
use super::super::task::Task;
use super::selection;

/// Handle inline-edit messages.
pub fn handle_edit(s: &mut SessionState, message: Message) -> Task {
    match message {
        Message::StartEdit { track_id, field } => {
            if !s.library.contains(&track_id) {
                tracing::debug!(target: "session::edit", "Ignoring edit of unknown track {}", track_id);
                return Task::none();
            }
            let target = EditTarget::new(track_id, field);
            if !s.edit.start(target.clone()) {
                tracing::debug!(
                    target: "session::edit",
                    "Ignoring edit of {}/{}: another cell is open",
                    target.track_id,
                    target.field
                );
            }
        }

        Message::CommitEdit(value) => {
            let Some(target) = s.edit.finish() else {
                tracing::debug!(target: "session::edit", "Commit without an open edit");
                return Task::none();
            };
            return commit(s, target, &value);
        }

        Message::CancelEdit => {
            if let Some(target) = s.edit.finish() {
                tracing::debug!(target: "session::edit", "Cancelled edit of {}/{}", target.track_id, target.field);
            }
        }

        _ => {}
    }
    Task::none()
}

fn commit(s: &mut SessionState, target: EditTarget, value: &str) -> Task {
    let before = s.library.get(&target.track_id).cloned();

    let changed = match s.library.update(&target.track_id, target.field, value) {
        Ok(Some(after)) => before.as_ref() != Some(after),
        Ok(None) => false,
        Err(e) => {
            // Silent cancel: the old value stays
            tracing::debug!(target: "session::edit", "Discarding edit: {}", e);
            false
        }
    };
    if !changed {
        return Task::none();
    }

    tracing::debug!(target: "session::edit", "Updated {}/{}", target.track_id, target.field);

    let is_selected = s.selection.as_ref() == Some(&target.track_id);
    if is_selected && target.field.affects_harmony() {
        tracing::info!(
            target: "session::edit",
            "{} changed on the selected track; refreshing suggestions",
            target.field
        );
        return selection::request_recommendations(s);
    }
    Task::none()
}
