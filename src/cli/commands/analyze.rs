//! File analysis command.

use tokio::runtime::Runtime;

use crate::cli::render;
use crate::session::{Controller, ExportView, Message};

/// Analyze files and print the tracks that were added.
///
/// Files that fail are reported on stderr; the command still prints the rest.
pub fn cmd_analyze(rt: &Runtime, mut controller: Controller, files: &[String], csv: bool) -> anyhow::Result<()> {
    rt.block_on(async {
        eprintln!("Analyzing {} file(s)...", files.len());
        controller.dispatch(Message::AddFiles(files.to_vec()));
        controller.settle().await;
    });

    let state = controller.state();
    if let Some(error) = &state.error {
        eprintln!("{error}");
    }
    if state.library.is_empty() {
        anyhow::bail!("No files could be analyzed");
    }

    if csv {
        println!("{}", state.export(ExportView::Library)?);
    } else {
        println!("{}", render::track_table(&state.view(), state));
        println!("\n{}", render::status(state));
    }
    Ok(())
}
