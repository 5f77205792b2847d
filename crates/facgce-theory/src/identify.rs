//! Chord identification: candidate roots, heuristic scoring, naming.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::quality::{classify, interval_mask, Quality};
use crate::tuning::{note_name, Fretting, Tuning};

/// Scoring weights for root-candidate selection.
///
/// These are a closed, versioned table: changing any weight changes which
/// candidate wins for ambiguous voicings.
#[derive(Debug, Clone, Copy)]
pub struct ScoreWeights {
    pub base: i32,
    /// Root lies in the C major scale.
    pub diatonic_root: i32,
    /// Root is one of the roots this tuning voices naturally.
    pub common_root: i32,
    /// Quality is in the simple subset (major, minor, sus, add9).
    pub simple_quality: i32,
    /// Interval set carries both a third and a fifth.
    pub complete_triad: i32,
    /// Root is the lowest-sounding played note (not an inversion).
    pub root_in_bass: i32,
}

pub const SCORE_WEIGHTS: ScoreWeights = ScoreWeights {
    base: 100,
    diatonic_root: 20,
    common_root: 10,
    simple_quality: 15,
    complete_triad: 25,
    root_in_bass: 30,
};

/// C major scale as a pitch-class bitmask (C D E F G A B).
const C_MAJOR_SCALE: u16 = (1 << 0) | (1 << 2) | (1 << 4) | (1 << 5) | (1 << 7) | (1 << 9) | (1 << 11);

/// Roots that fall naturally under the fingers in FACGCE.
const COMMON_ROOTS: [u8; 6] = [0, 5, 7, 9, 2, 4]; // C F G A D E

/// Outcome of identifying a fretting. Degenerate shapes get their own
/// variants instead of an error; `Display` renders the user-facing name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identification {
    /// Every string muted.
    NoNotes,
    /// A single pitch class, possibly doubled across strings and octaves.
    Unison(u8),
    /// Exactly two pitch classes; no root inference is attempted.
    Dyad(u8, u8),
    /// A scored chord reading. `bass` is the lowest-sounding played note;
    /// when it differs from `root` the name takes a slash suffix.
    Chord {
        root: u8,
        quality: Quality,
        bass: u8,
    },
    /// Three or more pitch classes with no recognized reading.
    Custom(Vec<u8>),
}

impl Identification {
    /// True for the outcomes that carry no usable root.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, Identification::NoNotes | Identification::Custom(_))
    }

    /// The root pitch class this name is built on, when one exists.
    pub fn root(&self) -> Option<u8> {
        match self {
            Identification::NoNotes | Identification::Custom(_) => None,
            Identification::Unison(pc) => Some(*pc),
            Identification::Dyad(a, _) => Some(*a),
            Identification::Chord { root, .. } => Some(*root),
        }
    }
}

impl fmt::Display for Identification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identification::NoNotes => write!(f, "No notes selected"),
            Identification::Unison(pc) => write!(f, "{} power chord", note_name(*pc)),
            Identification::Dyad(a, b) => {
                write!(f, "{}/{} (interval)", note_name(*a), note_name(*b))
            }
            Identification::Chord {
                root,
                quality,
                bass,
            } => {
                write!(f, "{}{}", note_name(*root), quality.suffix())?;
                if bass != root {
                    write!(f, "/{}", note_name(*bass))?;
                }
                Ok(())
            }
            Identification::Custom(notes) => {
                write!(f, "Custom (")?;
                for (i, pc) in notes.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", note_name(*pc))?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Identify the chord a fretting sounds. Pure and total: every input maps
/// to some `Identification`.
pub fn identify(tuning: &Tuning, fretting: &Fretting) -> Identification {
    let played = fretting.played_notes(tuning);
    if played.is_empty() {
        return Identification::NoNotes;
    }

    // Unique pitch classes in first-played order (lowest string first).
    let mut unique: Vec<u8> = Vec::with_capacity(played.len());
    for &pc in &played {
        if !unique.contains(&pc) {
            unique.push(pc);
        }
    }

    match unique.len() {
        1 => return Identification::Unison(unique[0]),
        2 => return Identification::Dyad(unique[0], unique[1]),
        _ => {}
    }

    let bass = played[0];
    let mut best: Option<(i32, u8, Quality)> = None;

    for &root in &unique {
        let mask = interval_mask(&unique, root);
        let Some(quality) = classify(mask) else {
            continue;
        };

        let mut score = SCORE_WEIGHTS.base;
        if C_MAJOR_SCALE & (1 << root) != 0 {
            score += SCORE_WEIGHTS.diatonic_root;
        }
        if COMMON_ROOTS.contains(&root) {
            score += SCORE_WEIGHTS.common_root;
        }
        if quality.is_simple() {
            score += SCORE_WEIGHTS.simple_quality;
        }
        let has_third = mask & ((1 << 3) | (1 << 4)) != 0;
        let has_fifth = mask & (1 << 7) != 0;
        if has_third && has_fifth {
            score += SCORE_WEIGHTS.complete_triad;
        }
        if root == bass {
            score += SCORE_WEIGHTS.root_in_bass;
        }

        debug!(root = note_name(root), quality = quality.suffix(), score, "chord candidate");

        // Strict comparison keeps the first-encountered candidate on ties.
        if best.map_or(true, |(best_score, _, _)| score > best_score) {
            best = Some((score, root, quality));
        }
    }

    match best {
        Some((_, root, quality)) => Identification::Chord {
            root,
            quality,
            bass,
        },
        None => Identification::Custom(unique),
    }
}
