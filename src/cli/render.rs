//! Plain-text rendering of session state for the terminal.

use crate::harmony::AnnotatedSuggestion;
use crate::library::SortDirection;
use crate::model::{Track, TrackField};
use crate::session::SessionState;

/// Width-aligned table of `tracks`.
///
/// Row markers: `>` selected, `*` in the set-list. The sorted column header
/// carries an arrow.
pub fn track_table(tracks: &[&Track], state: &SessionState) -> String {
    let rows: Vec<Vec<String>> = tracks
        .iter()
        .map(|t| {
            let mut row = vec![t.id.to_string()];
            row.extend(TrackField::ALL.iter().map(|&f| t.field_text(f)));
            row
        })
        .collect();

    let arrow = match state.sort.direction {
        SortDirection::Ascending => " ^",
        SortDirection::Descending => " v",
    };
    let mut headers = vec!["Filename".to_string()];
    headers.extend(TrackField::ALL.iter().map(|&f| {
        let name = column_name(f);
        if f == state.sort.field { format!("{name}{arrow}") } else { name.to_string() }
    }));

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |marker: &str, cells: &[String]| -> String {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect();
        format!("{marker} {}", padded.join("  ")).trim_end().to_string()
    };

    let mut out = vec![line("  ", &headers)];
    for (track, row) in tracks.iter().zip(&rows) {
        let selected = state.selection.as_ref() == Some(&track.id);
        let marker = match (selected, state.in_setlist(&track.id)) {
            (true, true) => ">*",
            (true, false) => "> ",
            (false, true) => " *",
            (false, false) => "  ",
        };
        out.push(line(marker, row));
    }
    out.join("\n")
}

/// Numbered suggestion list; rule violations are shown after the reason.
pub fn suggestions(list: &[AnnotatedSuggestion]) -> String {
    if list.is_empty() {
        return "  (no suggestions)".to_string();
    }
    list.iter()
        .enumerate()
        .map(|(i, s)| {
            let mut line = format!(
                "  {}. \"{}\" by {}: {}",
                i + 1,
                s.suggestion.title,
                s.suggestion.artist,
                s.suggestion.reason
            );
            match &s.assessment {
                Some(a) if s.is_flagged() => line.push_str(&format!(" [!] {}", a.warnings().join(", "))),
                Some(_) => {}
                None => line.push_str(" [not in library]"),
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn column_name(field: TrackField) -> &'static str {
    match field {
        TrackField::Title => "Title",
        TrackField::Artist => "Artist",
        TrackField::Key => "Key",
        TrackField::Bpm => "BPM",
        TrackField::Energy => "Energy",
    }
}

/// One-line summary: counts, filter and busy flags.
pub fn status(state: &SessionState) -> String {
    let mut parts = vec![format!("{} of {} track(s) shown", state.view().len(), state.library.len())];
    if !state.filter.is_empty() {
        parts.push("filtered".to_string());
    }
    if !state.setlist.is_empty() {
        parts.push(format!("set-list {}", state.setlist.len()));
    }
    if let Some(target) = state.edit.target() {
        parts.push(format!("editing {}/{}", target.track_id, target.field));
    }
    if state.is_analyzing() {
        parts.push("analyzing...".to_string());
    }
    if state.is_suggesting() {
        parts.push("finding suggestions...".to_string());
    }
    parts.join(" | ")
}
