//! Extension suggestions: small single-string perturbations of the current
//! shape that add a recognized color tone.

use serde::{Deserialize, Serialize};

use crate::identify::identify;
use crate::quality::interval_mask;
use crate::tuning::{note_name, Fretting, StringState, Tuning, MAX_FRET};

/// Candidate extension intervals and their musical names. Distances 2 and 5
/// each carry two names on purpose: both readings are offered when
/// reachable.
pub const EXTENSION_CATALOG: [(&str, u8); 7] = [
    ("add9", 2),
    ("sus2", 2),
    ("sus4", 5),
    ("maj7", 11),
    ("min7", 10),
    ("6", 9),
    ("add11", 5),
];

pub const MAX_SUGGESTIONS: usize = 5;

/// One actionable fretting change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable action, e.g. "Move string 4 to fret 2 (A)".
    pub action: String,
    /// The full shape with the one string changed.
    pub fretting: Fretting,
    /// Identified name of the resulting shape.
    pub chord: String,
    /// Catalog name of the extension this adds.
    pub extension: &'static str,
}

/// Suggest up to [`MAX_SUGGESTIONS`] single-string changes that introduce a
/// catalog interval not already present.
///
/// Returns an empty list when the current shape has no usable root, and
/// never returns a change whose result identifies as no-notes or Custom.
pub fn suggest_extensions(tuning: &Tuning, fretting: &Fretting) -> Vec<Suggestion> {
    let current = identify(tuning, fretting);
    let Some(root) = current.root() else {
        return Vec::new();
    };

    let played = fretting.played_notes(tuning);
    let current_mask = interval_mask(&played, root);

    let mut seen: Vec<(&'static str, u8)> = Vec::new();
    let mut suggestions = Vec::new();

    'strings: for string in 0..crate::tuning::STRING_COUNT {
        let state = fretting.string(string);
        for fret in candidate_frets(state) {
            let pc = tuning.note_for_string(string, fret);
            let interval = (pc + 12 - root) % 12;
            if current_mask & (1 << interval) != 0 {
                continue;
            }

            for (name, distance) in EXTENSION_CATALOG {
                if distance != interval || seen.contains(&(name, interval)) {
                    continue;
                }

                let mut changed = *fretting;
                changed.set_string(string, StringState::Fretted(fret));
                let result = identify(tuning, &changed);
                if result.is_unresolved() {
                    continue;
                }

                seen.push((name, interval));
                suggestions.push(Suggestion {
                    action: action_phrase(string, state, fret, pc),
                    fretting: changed,
                    chord: result.to_string(),
                    extension: name,
                });
                if suggestions.len() == MAX_SUGGESTIONS {
                    break 'strings;
                }
            }
        }
    }

    suggestions
}

/// Nearby frets to try on one string, in discovery order.
fn candidate_frets(state: StringState) -> Vec<u8> {
    match state {
        StringState::Muted => vec![0, 1, 2, 3],
        StringState::Fretted(f) => {
            let mut frets = Vec::with_capacity(5);
            for offset in [-1i16, 1, -2, 2] {
                let candidate = f as i16 + offset;
                if (0..=MAX_FRET as i16).contains(&candidate) {
                    frets.push(candidate as u8);
                }
            }
            if f > 0 && !frets.contains(&0) {
                frets.push(0);
            }
            frets
        }
    }
}

fn action_phrase(string: usize, was: StringState, fret: u8, pc: u8) -> String {
    let label = string + 1;
    let note = note_name(pc);
    match (was, fret) {
        (StringState::Muted, 0) => format!("Play string {} open ({})", label, note),
        (StringState::Muted, f) => format!("Play muted string {} at fret {} ({})", label, f, note),
        (StringState::Fretted(_), 0) => format!("Open string {} ({})", label, note),
        (StringState::Fretted(_), f) => format!("Move string {} to fret {} ({})", label, f, note),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::FACGCE;

    #[test]
    fn no_notes_yields_no_suggestions() {
        assert!(suggest_extensions(&FACGCE, &Fretting::MUTED).is_empty());
    }

    #[test]
    fn custom_chord_yields_no_suggestions() {
        // chromatic cluster with no recognized reading
        let fretting = Fretting::from_raw([7, 4, 2, -1, -1, -1]);
        assert!(suggest_extensions(&FACGCE, &fretting).is_empty());
    }

    #[test]
    fn suggestions_are_capped_and_resolved() {
        let fretting = Fretting::OPEN;
        let suggestions = suggest_extensions(&FACGCE, &fretting);
        assert!(suggestions.len() <= MAX_SUGGESTIONS);
        for s in &suggestions {
            assert_ne!(s.chord, "No notes selected");
            assert!(!s.chord.starts_with("Custom"), "unresolved result: {}", s.chord);
        }
    }

    #[test]
    fn suggested_interval_is_new() {
        let fretting = Fretting::from_raw([0, 0, 0, 2, 0, 0]); // Fmaj7
        let played = fretting.played_notes(&FACGCE);
        let current = interval_mask(&played, 5);

        for s in suggest_extensions(&FACGCE, &fretting) {
            let changed_notes = s.fretting.played_notes(&FACGCE);
            let new_mask = interval_mask(&changed_notes, 5);
            assert_ne!(new_mask, current, "suggestion added nothing: {}", s.action);
        }
    }

    #[test]
    fn each_extension_name_appears_once() {
        let suggestions = suggest_extensions(&FACGCE, &Fretting::from_raw([0, 0, 0, 2, 0, 0]));
        let mut names: Vec<&str> = suggestions.iter().map(|s| s.extension).collect();
        let before = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(before, names.len());
    }

    #[test]
    fn changes_touch_exactly_one_string() {
        let fretting = Fretting::from_raw([0, 0, 0, 2, 0, 0]);
        for s in suggest_extensions(&FACGCE, &fretting) {
            let differing = (0..6)
                .filter(|&i| s.fretting.string(i) != fretting.string(i))
                .count();
            assert_eq!(differing, 1, "{} changed {} strings", s.action, differing);
        }
    }

    #[test]
    fn muted_string_suggestions_describe_the_action() {
        let fretting = Fretting::from_raw([-1, -1, 0, 0, 0, 0]);
        let suggestions = suggest_extensions(&FACGCE, &fretting);
        for s in &suggestions {
            assert!(
                s.action.starts_with("Play")
                    || s.action.starts_with("Open")
                    || s.action.starts_with("Move"),
                "odd action phrase: {}",
                s.action
            );
        }
    }
}
