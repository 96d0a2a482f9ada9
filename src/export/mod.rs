//! CSV export of a track sequence.
//!
//! Format:
//! ```text
//! Filename,Title,Artist,Key,BPM,Energy
//! demo1.mp3,Cosmic Echoes,Stellar Drifters,8A,124,7
//! ```
//!
//! A cell containing a comma, double quote or newline is wrapped in double
//! quotes with inner quotes doubled. Rows are written in exactly the order
//! given; the serializer never sorts. [`tracks_from_csv`] reads the same
//! format back for seeding a library.

use csv::{QuoteStyle, ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use crate::error::{Error, Result};
use crate::model::{Track, TrackField, TrackId};

pub const HEADER: [&str; 6] = ["Filename", "Title", "Artist", "Key", "BPM", "Energy"];

/// Serialize tracks, header first, rows joined by `\n` with no trailing
/// newline.
pub fn to_csv<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for track in tracks {
        writer.write_record([
            track.id.to_string(),
            track.field_text(TrackField::Title),
            track.field_text(TrackField::Artist),
            track.field_text(TrackField::Key),
            track.field_text(TrackField::Bpm),
            track.field_text(TrackField::Energy),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    let text = String::from_utf8(bytes).map_err(|e| Error::InvalidFormat(e.to_string()))?;
    Ok(text.strip_suffix('\n').unwrap_or(&text).to_string())
}

/// Read tracks from an exported CSV (header row required, `\r\n` accepted).
pub fn tracks_from_csv(text: &str) -> Result<Vec<Track>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let header = reader.headers()?;
    let header_ok = header.len() == HEADER.len()
        && header
            .iter()
            .zip(HEADER)
            .all(|(got, want)| got.trim().eq_ignore_ascii_case(want));
    if !header_ok {
        return Err(Error::InvalidFormat(format!(
            "unexpected header {:?}, expected {}",
            header.iter().collect::<Vec<_>>(),
            HEADER.join(",")
        )));
    }

    reader
        .records()
        .map(|record| {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line());
            track_from_record(line, &record)
        })
        .collect()
}

fn track_from_record(line: u64, record: &StringRecord) -> Result<Track> {
    let invalid = |msg: String| Error::InvalidFormat(format!("row {line}: {msg}"));

    if record.len() != HEADER.len() {
        return Err(invalid(format!("expected 6 cells, found {}", record.len())));
    }
    let cell = |i: usize| record.get(i).unwrap_or_default();

    let id = cell(0);
    if id.trim().is_empty() {
        return Err(invalid("missing filename".to_string()));
    }
    let bpm: f64 = cell(4)
        .trim()
        .parse()
        .ok()
        .filter(|b: &f64| b.is_finite() && *b > 0.0)
        .ok_or_else(|| invalid(format!("invalid BPM '{}'", cell(4))))?;
    let energy: u8 = cell(5)
        .trim()
        .parse()
        .ok()
        .filter(|e| (1..=10).contains(e))
        .ok_or_else(|| invalid(format!("invalid energy '{}'", cell(5))))?;

    Ok(Track {
        id: TrackId::new(id),
        title: cell(1).to_string(),
        artist: cell(2).to_string(),
        key: cell(3).to_string(),
        bpm,
        energy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::demo_tracks;
    use crate::test_utils::track;

    fn titled(title: &str) -> Track {
        Track {
            title: title.to_string(),
            ..track("x.mp3", "8A", 124.0, 7)
        }
    }

    fn row(title: &str) -> String {
        let csv = to_csv([&titled(title)]).unwrap();
        csv.split_once('\n').unwrap().1.to_string()
    }

    #[test]
    fn test_escape_rules() {
        assert_eq!(row("plain"), "x.mp3,plain,Artist x.mp3,8A,124,7");
        assert_eq!(row("a,b\"c"), "x.mp3,\"a,b\"\"c\",Artist x.mp3,8A,124,7");
        assert_eq!(row("two\nlines"), "x.mp3,\"two\nlines\",Artist x.mp3,8A,124,7");
        assert_eq!(row("say \"hi\""), "x.mp3,\"say \"\"hi\"\"\",Artist x.mp3,8A,124,7");
    }

    #[test]
    fn test_header_and_row_order() {
        let tracks = [track("z", "8A", 124.0, 7), track("a", "9A", 122.5, 6)];
        let csv = to_csv(&tracks).unwrap();
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "Filename,Title,Artist,Key,BPM,Energy");
        assert_eq!(lines[1], "z,Track z,Artist z,8A,124,7");
        assert_eq!(lines[2], "a,Track a,Artist a,9A,122.5,6");
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_empty_sequence_is_header_only() {
        assert_eq!(to_csv(std::iter::empty()).unwrap(), "Filename,Title,Artist,Key,BPM,Energy");
    }

    #[test]
    fn test_tracks_round_trip_through_csv() {
        let mut tracks = demo_tracks();
        tracks[0].title = "Echoes, \"Live\"\nPart 2".to_string();

        let parsed = tracks_from_csv(&to_csv(&tracks).unwrap()).unwrap();
        assert_eq!(parsed, tracks);
    }

    #[test]
    fn test_reader_accepts_crlf_and_trailing_newline() {
        let text = "Filename,Title,Artist,Key,BPM,Energy\r\na.mp3,T,A,8A,120,5\r\nb.mp3,\"U\",B,9A,122,6\r\n";
        let tracks = tracks_from_csv(text).unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].title, "U");
    }

    #[test]
    fn test_tracks_from_csv_validates_rows() {
        let bad_header = "Name,Title\nx,y";
        assert!(tracks_from_csv(bad_header).is_err());

        let bad_energy = "Filename,Title,Artist,Key,BPM,Energy\na.mp3,T,A,8A,120,11";
        let err = tracks_from_csv(bad_energy).unwrap_err().to_string();
        assert!(err.contains("row 2"), "{err}");

        let short_row = "Filename,Title,Artist,Key,BPM,Energy\na.mp3,T";
        assert!(tracks_from_csv(short_row).is_err());

        assert!(tracks_from_csv("").is_err());
    }
}

/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use crate::test_utils::track;
    use proptest::prelude::*;

    proptest! {
        /// Any title and artist text survives export-then-import unchanged
        #[test]
        fn text_cells_survive_export(
            title in "[a-z ,\"\n]{0,12}",
            artist in "[A-Z ,\"\n]{0,12}",
        ) {
            let t = Track {
                title,
                artist,
                ..track("x.mp3", "8A", 124.0, 7)
            };
            let parsed = tracks_from_csv(&to_csv([&t]).unwrap()).unwrap();
            prop_assert_eq!(parsed, vec![t]);
        }
    }
}
