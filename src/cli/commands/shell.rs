//! Interactive session.
//!
//! Reads one command per line from stdin while collaborator calls run in the
//! background; finished analyses and new suggestions are printed as they
//! arrive.

use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Runtime;
use tracing::debug;

use crate::cli::render;
use crate::error::ResultExt;
use crate::library::{Bounds, FilterCriteria};
use crate::model::{TrackField, TrackId};
use crate::session::{Completion, Controller, ExportView, Message};

const HELP: &str = "\
Commands:
  add FILE...                 analyze files and add them to the library
  list                        show the library (filtered and sorted)
  select ID                   select a track and ask for suggestions
  pick N                      jump to suggestion N
  edit ID FIELD [VALUE]       edit a cell; without VALUE, finish with commit/cancel
  commit VALUE | cancel       finish the open edit
  filter key=K bpm=A..B energy=A..B
                              narrow the list (an empty value clears that filter)
  reset                       clear all filters
  sort FIELD                  sort by title, artist, key, bpm or energy (again to reverse)
  setlist [add ID | rm ID]    show or change the set-list
  export [library|setlist] [FILE]
                              CSV to stdout or FILE
  wait                        wait for running requests
  dismiss                     clear the error message
  help | quit";

/// Changes to the active filter; `None` leaves that predicate as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterUpdate {
    pub key: Option<String>,
    pub bpm: Option<Bounds<f64>>,
    pub energy: Option<Bounds<u8>>,
}

impl FilterUpdate {
    fn apply(self, current: &FilterCriteria) -> FilterCriteria {
        FilterCriteria {
            key: self.key.unwrap_or_else(|| current.key.clone()),
            bpm: self.bpm.unwrap_or(current.bpm),
            energy: self.energy.unwrap_or(current.energy),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SetlistAction {
    Show,
    Add(TrackId),
    Remove(TrackId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Add(Vec<String>),
    List,
    Select(TrackId),
    Pick(usize),
    Edit {
        track_id: TrackId,
        field: TrackField,
        value: Option<String>,
    },
    Commit(String),
    Cancel,
    Filter(FilterUpdate),
    Reset,
    Sort(TrackField),
    Setlist(SetlistAction),
    Export {
        view: ExportView,
        path: Option<PathBuf>,
    },
    Wait,
    Dismiss,
    Help,
    Quit,
}

/// Run the interactive loop until `quit` or end of input.
pub fn cmd_shell(rt: &Runtime, mut controller: Controller) -> anyhow::Result<()> {
    rt.block_on(async move {
        println!("Harmonic Mix. Type 'help' for commands.");
        println!("{}", render::status(controller.state()));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut shown_error = controller.state().error.clone();
        prompt();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    match parse_line(&line) {
                        Ok(Some(ShellCommand::Quit)) => break,
                        Ok(Some(command)) => execute(&mut controller, command).await?,
                        Ok(None) => {}
                        Err(e) => eprintln!("{e}"),
                    }
                    report_error(&controller, &mut shown_error);
                    prompt();
                }
                Some(completion) = controller.next_completion(), if controller.in_flight() > 0 => {
                    report_completion(&controller, completion);
                    report_error(&controller, &mut shown_error);
                    prompt();
                }
            }
        }

        if controller.in_flight() > 0 {
            debug!(target: "cli::shell", "Leaving with {} request(s) in flight", controller.in_flight());
        }
        Ok::<(), anyhow::Error>(())
    })
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

async fn execute(controller: &mut Controller, command: ShellCommand) -> anyhow::Result<()> {
    match command {
        ShellCommand::Add(files) => {
            controller.dispatch(Message::AddFiles(files));
            if controller.state().is_analyzing() {
                println!("Analyzing...");
            } else {
                println!("Nothing new to analyze");
            }
        }
        ShellCommand::List => {
            let state = controller.state();
            println!("{}", render::track_table(&state.view(), state));
            println!("{}", render::status(state));
        }
        ShellCommand::Select(id) => {
            controller.dispatch(Message::SelectTrack(id.clone()));
            let state = controller.state();
            if state.selection.as_ref() != Some(&id) {
                eprintln!("Cannot select {id} (unknown track, or another track is being edited)");
            } else if state.is_suggesting() {
                println!("Finding suggestions for {id}...");
            } else {
                println!("{}", render::suggestions(state.suggestions()));
            }
        }
        ShellCommand::Pick(n) => {
            let Some(pick) = n
                .checked_sub(1)
                .and_then(|i| controller.state().suggestions().get(i))
            else {
                eprintln!("No suggestion {n}");
                return Ok(());
            };
            let suggestion = pick.suggestion.clone();
            controller.dispatch(Message::SelectSuggestion(suggestion.clone()));
            match controller.state().current_track() {
                Some(t) if t.matches(&suggestion) => println!("Selected {}", t.id),
                _ => eprintln!("\"{}\" is not in the library", suggestion.title),
            }
        }
        ShellCommand::Edit { track_id, field, value } => {
            controller.dispatch(Message::StartEdit {
                track_id: track_id.clone(),
                field,
            });
            let editing = controller
                .state()
                .edit
                .target()
                .is_some_and(|t| t.track_id == track_id && t.field == field);
            if !editing {
                eprintln!("Cannot edit {track_id}/{field} (unknown track, or another edit is open)");
                return Ok(());
            }
            match value {
                Some(value) => commit(controller, value),
                None => println!("Editing {track_id}/{field}; 'commit VALUE' or 'cancel'"),
            }
        }
        ShellCommand::Commit(value) => {
            if controller.state().edit.is_editing() {
                commit(controller, value);
            } else {
                eprintln!("No edit open");
            }
        }
        ShellCommand::Cancel => controller.dispatch(Message::CancelEdit),
        ShellCommand::Filter(update) => {
            let criteria = update.apply(&controller.state().filter);
            controller.dispatch(Message::SetFilter(criteria));
            println!("{}", render::status(controller.state()));
        }
        ShellCommand::Reset => {
            controller.dispatch(Message::ResetFilter);
            println!("{}", render::status(controller.state()));
        }
        ShellCommand::Sort(field) => {
            controller.dispatch(Message::SetSort(field));
            let state = controller.state();
            println!("{}", render::track_table(&state.view(), state));
        }
        ShellCommand::Setlist(action) => {
            match action {
                SetlistAction::Show => {}
                SetlistAction::Add(id) => controller.dispatch(Message::AddToSetlist(id)),
                SetlistAction::Remove(id) => controller.dispatch(Message::RemoveFromSetlist(id)),
            }
            let state = controller.state();
            println!("{}", render::track_table(&state.setlist_tracks(), state));
        }
        ShellCommand::Export { view, path } => {
            let state = controller.state();
            let csv = state.export(view)?;
            match path {
                Some(path) => {
                    std::fs::write(&path, format!("{csv}\n")).with_context(format!("writing {}", path.display()))?;
                    println!("Exported {} track(s) to {}", state.export_rows(view).len(), path.display());
                }
                None => println!("{csv}"),
            }
        }
        ShellCommand::Wait => {
            controller.settle().await;
            println!("{}", render::status(controller.state()));
        }
        ShellCommand::Dismiss => controller.dispatch(Message::DismissError),
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => {}
    }
    Ok(())
}

fn commit(controller: &mut Controller, value: String) {
    controller.dispatch(Message::CommitEdit(value));
    if controller.state().is_suggesting() {
        println!("Saved; refreshing suggestions...");
    }
}

fn report_completion(controller: &Controller, completion: Completion) {
    let state = controller.state();
    match completion {
        Completion::Analysis { batch } => {
            debug!(target: "cli::shell", "Batch {:?} merged", batch);
            println!("\nAnalysis finished. {}", render::status(state));
        }
        Completion::Recommendation { applied: true, .. } => {
            if let Some(current) = state.current_track() {
                println!("\nSuggestions after {}:", current.id);
            }
            println!("{}", render::suggestions(state.suggestions()));
        }
        Completion::Recommendation { applied: false, epoch } => {
            debug!(target: "cli::shell", "Ignored stale suggestions for {:?}", epoch);
        }
    }
}

/// Print the session error once, when it first appears.
fn report_error(controller: &Controller, shown: &mut Option<String>) {
    let current = &controller.state().error;
    if *current != *shown {
        if let Some(error) = current {
            eprintln!("Error: {error}");
        }
        *shown = current.clone();
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let tokens = tokenize(line)?;
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match name.to_lowercase().as_str() {
        "add" if !args.is_empty() => ShellCommand::Add(args.to_vec()),
        "add" => return Err("usage: add FILE...".to_string()),
        "list" | "ls" => ShellCommand::List,
        "select" => ShellCommand::Select(TrackId::new(single(args, "select ID")?)),
        "pick" => {
            let n = single(args, "pick N")?;
            ShellCommand::Pick(n.parse().map_err(|_| format!("not a number: {n}"))?)
        }
        "edit" => match args {
            [id, field, value @ ..] => ShellCommand::Edit {
                track_id: TrackId::new(id.as_str()),
                field: field.parse().map_err(|e| format!("{e}"))?,
                value: (!value.is_empty()).then(|| value.join(" ")),
            },
            _ => return Err("usage: edit ID FIELD [VALUE]".to_string()),
        },
        // An empty commit is a valid value for text fields
        "commit" => ShellCommand::Commit(args.join(" ")),
        "cancel" => ShellCommand::Cancel,
        "filter" if !args.is_empty() => ShellCommand::Filter(parse_filter(args)?),
        "filter" => return Err("usage: filter key=K bpm=A..B energy=A..B".to_string()),
        "reset" => ShellCommand::Reset,
        "sort" => {
            let field = single(args, "sort FIELD")?;
            ShellCommand::Sort(field.parse().map_err(|e| format!("{e}"))?)
        }
        "setlist" => match args {
            [] => ShellCommand::Setlist(SetlistAction::Show),
            [op, id] if op == "add" => ShellCommand::Setlist(SetlistAction::Add(TrackId::new(id.as_str()))),
            [op, id] if op == "rm" || op == "remove" => {
                ShellCommand::Setlist(SetlistAction::Remove(TrackId::new(id.as_str())))
            }
            _ => return Err("usage: setlist [add ID | rm ID]".to_string()),
        },
        "export" => {
            let (view, rest) = match args.split_first() {
                Some((v, rest)) if v == "library" => (ExportView::Library, rest),
                Some((v, rest)) if v == "setlist" => (ExportView::Setlist, rest),
                _ => (ExportView::Library, args),
            };
            match rest {
                [] => ShellCommand::Export { view, path: None },
                [path] => ShellCommand::Export {
                    view,
                    path: Some(PathBuf::from(path)),
                },
                _ => return Err("usage: export [library|setlist] [FILE]".to_string()),
            }
        }
        "wait" => ShellCommand::Wait,
        "dismiss" => ShellCommand::Dismiss,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("Unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

fn single<'a>(args: &'a [String], usage: &str) -> Result<&'a str, String> {
    match args {
        [one] => Ok(one.as_str()),
        _ => Err(format!("usage: {usage}")),
    }
}

fn parse_filter(args: &[String]) -> Result<FilterUpdate, String> {
    let mut update = FilterUpdate::default();
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected NAME=VALUE, got '{arg}'"))?;
        match name.to_lowercase().as_str() {
            "key" => update.key = Some(value.trim().to_string()),
            "bpm" => update.bpm = Some(value.parse().map_err(|e| format!("{e}"))?),
            "energy" => update.energy = Some(value.parse().map_err(|e| format!("{e}"))?),
            other => return Err(format!("unknown filter '{other}' (key, bpm or energy)")),
        }
    }
    Ok(update)
}

/// Split on whitespace; double quotes group words and may be empty (`""`).
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quoted {
        return Err("unterminated quote".to_string());
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}
