//! Next-track suggestions and the transition checker.

use tokio::runtime::Runtime;

use crate::cli::render;
use crate::error::Error;
use crate::harmony::{self, CamelotKey, EnergyFlow};
use crate::model::TrackId;
use crate::session::{Controller, Message};

/// Select `track` and print the suggestions for what to play next.
pub fn cmd_suggest(rt: &Runtime, mut controller: Controller, track: &str) -> anyhow::Result<()> {
    let id = TrackId::new(track);
    if !controller.state().library.contains(&id) {
        return Err(Error::not_found(format!("track '{track}' (use the file name as listed in the seed)")).into());
    }

    rt.block_on(async {
        controller.dispatch(Message::SelectTrack(id));
        controller.settle().await;
    });

    let state = controller.state();
    if let Some(error) = &state.error {
        anyhow::bail!("{error}");
    }
    if let Some(current) = state.current_track() {
        println!(
            "After \"{}\" by {} ({}, {} BPM, energy {}):",
            current.title,
            current.artist,
            current.key,
            crate::model::format_bpm(current.bpm),
            current.energy
        );
    }
    println!("{}", render::suggestions(state.suggestions()));
    Ok(())
}

/// Print how a transition fares against the mixing rules.
pub fn cmd_compat(from: &str, to: &str, bpm: Option<&[f64]>, energy: Option<&[u8]>) -> anyhow::Result<()> {
    let relation = harmony::key_relation(from, to);
    println!("Key:    {from} -> {to}: {}", relation.label());

    if let Ok(key) = from.parse::<CamelotKey>() {
        let keys: Vec<String> = key.compatible_keys().iter().map(ToString::to_string).collect();
        println!("        compatible with {from}: {}", keys.join(", "));
    }

    let mut clean = harmony::keys_compatible(from, to);

    if let Some(&[a, b]) = bpm {
        let ok = harmony::tempo_compatible(a, b);
        let sign = if b >= a { 1.0 } else { -1.0 };
        let change = sign * harmony::tempo_delta(a, b);
        println!(
            "Tempo:  {} -> {} BPM: {:+.1}% ({})",
            crate::model::format_bpm(a),
            crate::model::format_bpm(b),
            change * 100.0,
            if ok { "ok" } else { "tempo jump" }
        );
        clean &= ok;
    }

    if let Some(&[a, b]) = energy {
        let flow = harmony::energy_flow(a, b);
        println!(
            "Energy: {a} -> {b}: {}",
            match flow {
                EnergyFlow::Smooth => "smooth",
                EnergyFlow::Abrupt => "abrupt",
            }
        );
        clean &= flow == EnergyFlow::Smooth;
    }

    println!("{}", if clean { "Clean transition" } else { "Rule violations found" });
    Ok(())
}
