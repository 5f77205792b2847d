//! Music-theory engine for exploring chords in open FACGCE tuning.
//!
//! Everything in this crate is synchronous and pure: the same `Fretting`
//! always produces the same chord name, suggestion list, and progression
//! candidates. "No good answer" outcomes are ordinary values (an
//! unrecognized interval set, an empty suggestion list, a `Custom` chord
//! name), never errors.

pub mod extensions;
pub mod identify;
pub mod library;
pub mod progression;
pub mod quality;
pub mod tuning;
pub mod voicing;

pub use extensions::{suggest_extensions, Suggestion, EXTENSION_CATALOG, MAX_SUGGESTIONS};
pub use identify::{identify, Identification, ScoreWeights, SCORE_WEIGHTS};
pub use library::{
    ChordShape, Progression, ProgressionStep, ShapeFamily, CHORD_LIBRARY, PROGRESSIONS,
};
pub use progression::{
    degree_for, generate_progression, Degree, GeneratedProgression, GeneratedStep,
};
pub use quality::{classify, interval_mask, IntervalMask, Quality};
pub use tuning::{
    midi_to_frequency, note_name, Fretting, FrettingParseError, StringState, Tuning, FACGCE,
    MAX_FRET, NOTE_NAMES, STRING_COUNT,
};
pub use voicing::{voice_leading_hint, voice_leading_score};
