//! Harmonic-mixing rules.
//!
//! Pure, deterministic scoring of a transition between two tracks:
//! - **Key**: exact match, mode switch (8A ↔ 8B) or one step on the Camelot
//!   wheel with the same letter (8A ↔ 9A, 12A ↔ 1A) are compatible
//! - **Tempo**: compatible when the BPM difference is at most 5% of the lower
//!   value
//! - **Energy**: a change of at most 2 levels is smooth; bigger jumps are
//!   flagged as abrupt but never rejected
//!
//! These rules are an oracle, not a filter. Recommender output that breaks
//! them is annotated via [`annotate`], never dropped.

pub mod camelot;

pub use camelot::{CamelotKey, InvalidCamelotKey, Mode};

use std::cmp::Ordering;

use crate::model::{Suggestion, Track, TrackId};

/// Maximum relative BPM difference (of the lower tempo) that still mixes.
pub const TEMPO_TOLERANCE: f64 = 0.05;

/// Largest energy change that still counts as a smooth transition.
pub const SMOOTH_ENERGY_STEP: u8 = 2;

/// How two keys relate on the Camelot wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRelation {
    /// Same number, same letter
    Exact,
    /// Same number, other letter (relative major/minor)
    ModeSwitch,
    /// Neighbouring numbers, same letter
    Adjacent,
    /// Anything else
    Clash,
    /// At least one key is not valid Camelot notation
    Unknown,
}

impl KeyRelation {
    pub fn is_compatible(self) -> bool {
        matches!(
            self,
            KeyRelation::Exact | KeyRelation::ModeSwitch | KeyRelation::Adjacent
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            KeyRelation::Exact => "same key",
            KeyRelation::ModeSwitch => "mode switch",
            KeyRelation::Adjacent => "adjacent key",
            KeyRelation::Clash => "key clash",
            KeyRelation::Unknown => "unknown key",
        }
    }
}

/// Classify a key transition. Either side failing to parse yields
/// [`KeyRelation::Unknown`].
pub fn key_relation(from: &str, to: &str) -> KeyRelation {
    let (Ok(a), Ok(b)) = (from.parse::<CamelotKey>(), to.parse::<CamelotKey>()) else {
        return KeyRelation::Unknown;
    };

    match (a.number() == b.number(), a.mode() == b.mode()) {
        (true, true) => KeyRelation::Exact,
        (true, false) => KeyRelation::ModeSwitch,
        (false, true) if a.wheel_distance(b) == 1 => KeyRelation::Adjacent,
        _ => KeyRelation::Clash,
    }
}

pub fn keys_compatible(from: &str, to: &str) -> bool {
    key_relation(from, to).is_compatible()
}

/// Absolute BPM difference relative to the lower of the two tempos.
pub fn tempo_delta(a: f64, b: f64) -> f64 {
    let lower = a.min(b);
    if lower <= 0.0 {
        return f64::INFINITY;
    }
    (a - b).abs() / lower
}

pub fn tempo_compatible(a: f64, b: f64) -> bool {
    tempo_delta(a, b) <= TEMPO_TOLERANCE
}

/// Character of an energy change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyFlow {
    Smooth,
    Abrupt,
}

pub fn energy_flow(from: u8, to: u8) -> EnergyFlow {
    if from.abs_diff(to) <= SMOOTH_ENERGY_STEP {
        EnergyFlow::Smooth
    } else {
        EnergyFlow::Abrupt
    }
}

/// Full assessment of mixing from one track into another.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionAssessment {
    pub key: KeyRelation,
    /// Signed BPM change relative to the lower tempo (+0.033 = 3.3% faster)
    pub tempo_change: f64,
    pub tempo_compatible: bool,
    pub energy_delta: i16,
    pub energy_flow: EnergyFlow,
}

impl TransitionAssessment {
    pub fn between(from: &Track, to: &Track) -> Self {
        let delta = tempo_delta(from.bpm, to.bpm);
        let tempo_change = if to.bpm >= from.bpm { delta } else { -delta };
        Self {
            key: key_relation(&from.key, &to.key),
            tempo_change,
            tempo_compatible: delta <= TEMPO_TOLERANCE,
            energy_delta: i16::from(to.energy) - i16::from(from.energy),
            energy_flow: energy_flow(from.energy, to.energy),
        }
    }

    /// All three rules satisfied.
    pub fn is_clean(&self) -> bool {
        self.key.is_compatible() && self.tempo_compatible && self.energy_flow == EnergyFlow::Smooth
    }

    /// Weighted score in `[0, 1]`; key dominates, then tempo, then energy.
    pub fn score(&self) -> f64 {
        let key = match self.key {
            KeyRelation::Exact => 1.0,
            KeyRelation::Adjacent => 0.85,
            KeyRelation::ModeSwitch => 0.75,
            KeyRelation::Unknown => 0.25,
            KeyRelation::Clash => 0.0,
        };
        let tempo = (1.0 - self.tempo_change.abs() / (2.0 * TEMPO_TOLERANCE)).clamp(0.0, 1.0);
        let energy = (1.0 - f64::from(self.energy_delta.unsigned_abs()) * 0.1).max(0.0);

        0.5 * key + 0.3 * tempo + 0.2 * energy
    }

    /// Rule violations worth flagging next to a suggestion.
    pub fn warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        if !self.key.is_compatible() {
            warnings.push(self.key.label());
        }
        if !self.tempo_compatible {
            warnings.push("tempo jump");
        }
        if self.energy_flow == EnergyFlow::Abrupt {
            warnings.push("abrupt energy change");
        }
        warnings
    }

    /// Short human-readable summary, e.g. `adjacent key, tempo +3.3%, energy +1`.
    pub fn describe(&self) -> String {
        format!(
            "{}, tempo {:+.1}%, energy {:+}",
            self.key.label(),
            self.tempo_change * 100.0,
            self.energy_delta
        )
    }
}

/// A recommender suggestion, resolved against the library where possible and
/// checked against the mixing rules.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedSuggestion {
    pub suggestion: Suggestion,
    /// Library track the suggestion resolved to at annotation time
    pub track_id: Option<TrackId>,
    /// `None` when the suggestion did not resolve to a library track
    pub assessment: Option<TransitionAssessment>,
}

impl AnnotatedSuggestion {
    pub fn is_flagged(&self) -> bool {
        self.assessment.as_ref().is_some_and(|a| !a.is_clean())
    }
}

/// Attach an assessment to every suggestion. Nothing is dropped, including
/// suggestions that break the rules or cannot be resolved.
pub fn annotate(current: &Track, suggestions: Vec<Suggestion>, library: &[Track]) -> Vec<AnnotatedSuggestion> {
    suggestions
        .into_iter()
        .map(|suggestion| {
            let target = library.iter().find(|t| t.matches(&suggestion));
            AnnotatedSuggestion {
                track_id: target.map(|t| t.id.clone()),
                assessment: target.map(|t| TransitionAssessment::between(current, t)),
                suggestion,
            }
        })
        .collect()
}

/// Stable re-rank by rule score, best first; unresolved suggestions keep their
/// relative order at the end.
pub fn rerank(suggestions: &mut [AnnotatedSuggestion]) {
    suggestions.sort_by(|a, b| match (&a.assessment, &b.assessment) {
        (Some(x), Some(y)) => y.score().partial_cmp(&x.score()).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}
