//! CSV export command.

use std::path::Path;

use crate::error::ResultExt;
use crate::library::{FilterCriteria, SortDirection, SortSpec};
use crate::model::{Track, TrackField};
use crate::session::{ExportView, Message, SessionState, update};

/// Export `tracks` filtered by `filter` and sorted by `sort` (default: artist).
pub fn cmd_export(
    tracks: Vec<Track>,
    filter: FilterCriteria,
    sort: Option<TrackField>,
    descending: bool,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let state = export_state(tracks, filter, sort, descending);
    let csv = state.export(ExportView::Library)?;

    match output {
        Some(path) => {
            std::fs::write(path, format!("{csv}\n")).with_context(format!("writing {}", path.display()))?;
            eprintln!("Exported {} track(s) to {}", state.view().len(), path.display());
        }
        None => println!("{csv}"),
    }
    Ok(())
}

/// Drive a fresh session to the requested view through the same messages the
/// shell uses.
fn export_state(tracks: Vec<Track>, filter: FilterCriteria, sort: Option<TrackField>, descending: bool) -> SessionState {
    let mut state = SessionState::default();
    update(&mut state, Message::SeedTracks(tracks));
    update(&mut state, Message::SetFilter(filter));

    let direction = if descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    };
    let wanted = SortSpec::new(sort.unwrap_or(state.sort.field), direction);
    // A toggle either switches column (ascending) or flips direction
    for _ in 0..2 {
        if state.sort == wanted {
            break;
        }
        update(&mut state, Message::SetSort(wanted.field));
    }
    state
}
