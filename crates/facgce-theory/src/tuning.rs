//! Fixed tuning model: six strings, pitch-class arithmetic, fret shapes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const STRING_COUNT: usize = 6;
pub const MAX_FRET: u8 = 24;

/// Sharps-only spelling for the 12 pitch classes (C = 0).
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

pub fn note_name(pitch_class: u8) -> &'static str {
    NOTE_NAMES[(pitch_class % 12) as usize]
}

/// Equal-tempered frequency of a MIDI note number, A4 = 440 Hz.
pub fn midi_to_frequency(midi_note: u8) -> f32 {
    440.0 * 2.0_f32.powf((midi_note as f32 - 69.0) / 12.0)
}

/// An open tuning. String index 0 is the lowest-pitched string.
#[derive(Debug, Clone)]
pub struct Tuning {
    pub open_pitch_classes: [u8; STRING_COUNT],
    pub open_midi_notes: [u8; STRING_COUNT],
}

/// F-A-C-G-C-E low to high (F2 A2 C3 G3 C4 E4). The open strings sound Fmaj9.
pub const FACGCE: Tuning = Tuning {
    open_pitch_classes: [5, 9, 0, 7, 0, 4],
    open_midi_notes: [41, 45, 48, 55, 60, 64],
};

impl Tuning {
    /// Pitch class sounding on `string` held at `fret`.
    ///
    /// Muted strings have no note; callers check mute state first.
    pub fn note_for_string(&self, string: usize, fret: u8) -> u8 {
        (self.open_pitch_classes[string] + fret) % 12
    }

    /// Frequency in Hz of `string` held at `fret`.
    pub fn frequency_for_string(&self, string: usize, fret: u8) -> f32 {
        midi_to_frequency(self.open_midi_notes[string] + fret)
    }
}

/// One string of a chord shape: muted, or held at a fret (0 = open).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringState {
    Muted,
    Fretted(u8),
}

impl StringState {
    pub fn fret(&self) -> Option<u8> {
        match self {
            StringState::Muted => None,
            StringState::Fretted(f) => Some(*f),
        }
    }

    pub fn is_played(&self) -> bool {
        matches!(self, StringState::Fretted(_))
    }
}

/// A six-string chord shape.
///
/// Serializes as a 6-element integer array with -1 for muted strings, the
/// wire form shared with the reference chord and progression tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[i8; 6]", into = "[i8; 6]")]
pub struct Fretting([StringState; STRING_COUNT]);

impl Fretting {
    pub const MUTED: Fretting = Fretting([StringState::Muted; STRING_COUNT]);
    pub const OPEN: Fretting = Fretting([StringState::Fretted(0); STRING_COUNT]);

    /// Build from the raw integer form used by the reference tables.
    pub const fn from_raw(frets: [i8; STRING_COUNT]) -> Self {
        let mut states = [StringState::Muted; STRING_COUNT];
        let mut i = 0;
        while i < STRING_COUNT {
            if frets[i] >= 0 {
                states[i] = StringState::Fretted(frets[i] as u8);
            }
            i += 1;
        }
        Fretting(states)
    }

    pub fn string(&self, index: usize) -> StringState {
        self.0[index]
    }

    pub fn set_string(&mut self, index: usize, state: StringState) {
        self.0[index] = state;
    }

    pub fn strings(&self) -> impl Iterator<Item = StringState> + '_ {
        self.0.iter().copied()
    }

    pub fn played_count(&self) -> usize {
        self.0.iter().filter(|s| s.is_played()).count()
    }

    pub fn open_count(&self) -> usize {
        self.0
            .iter()
            .filter(|s| matches!(s, StringState::Fretted(0)))
            .count()
    }

    /// Pitch classes of the played strings, lowest string first.
    pub fn played_notes(&self, tuning: &Tuning) -> Vec<u8> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.fret().map(|f| tuning.note_for_string(i, f)))
            .collect()
    }
}

impl From<Fretting> for [i8; STRING_COUNT] {
    fn from(fretting: Fretting) -> Self {
        let mut raw = [-1i8; STRING_COUNT];
        for (i, state) in fretting.strings().enumerate() {
            if let Some(f) = state.fret() {
                raw[i] = f as i8;
            }
        }
        raw
    }
}

impl TryFrom<[i8; STRING_COUNT]> for Fretting {
    type Error = FrettingParseError;

    fn try_from(raw: [i8; STRING_COUNT]) -> Result<Self, Self::Error> {
        let mut states = [StringState::Muted; STRING_COUNT];
        for (i, &value) in raw.iter().enumerate() {
            states[i] = match value {
                -1 => StringState::Muted,
                f if (0..=MAX_FRET as i8).contains(&f) => StringState::Fretted(f as u8),
                other => return Err(FrettingParseError::OutOfRange(other as i32)),
            };
        }
        Ok(Fretting(states))
    }
}

impl fmt::Display for Fretting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, state) in self.strings().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match state {
                StringState::Muted => write!(f, "x")?,
                StringState::Fretted(fret) => write!(f, "{}", fret)?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrettingParseError {
    #[error("expected {STRING_COUNT} string tokens, got {0}")]
    WrongCount(usize),
    #[error("invalid fret token '{0}' (use x for muted, 0-{MAX_FRET} for frets)")]
    BadToken(String),
    #[error("fret {0} out of range (0-{MAX_FRET}, or -1 for muted)")]
    OutOfRange(i32),
}

impl FromStr for Fretting {
    type Err = FrettingParseError;

    /// Parse six whitespace- or comma-separated tokens: `x`/`-` for muted,
    /// a fret number otherwise. `"0 0 0 2 0 0"`, `"x,3,2,0,1,0"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.len() != STRING_COUNT {
            return Err(FrettingParseError::WrongCount(tokens.len()));
        }

        let mut states = [StringState::Muted; STRING_COUNT];
        for (i, token) in tokens.iter().enumerate() {
            states[i] = match token.to_ascii_lowercase().as_str() {
                "x" | "-" => StringState::Muted,
                t => {
                    let fret: u32 = t
                        .parse()
                        .map_err(|_| FrettingParseError::BadToken(token.to_string()))?;
                    if fret > MAX_FRET as u32 {
                        return Err(FrettingParseError::OutOfRange(fret as i32));
                    }
                    StringState::Fretted(fret as u8)
                }
            };
        }
        Ok(Fretting(states))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_string_notes() {
        // F A C G C E
        assert_eq!(FACGCE.note_for_string(0, 0), 5);
        assert_eq!(FACGCE.note_for_string(1, 0), 9);
        assert_eq!(FACGCE.note_for_string(2, 0), 0);
        assert_eq!(FACGCE.note_for_string(3, 0), 7);
        assert_eq!(FACGCE.note_for_string(4, 0), 0);
        assert_eq!(FACGCE.note_for_string(5, 0), 4);
    }

    #[test]
    fn fretted_note_wraps_octave() {
        // G string fretted at 2 sounds A
        assert_eq!(FACGCE.note_for_string(3, 2), 9);
        // low F at fret 7 wraps past B to C
        assert_eq!(FACGCE.note_for_string(0, 7), 0);
    }

    #[test]
    fn a4_is_440() {
        assert!((midi_to_frequency(69) - 440.0).abs() < 1e-3);
        // low open F string, F2
        assert!((FACGCE.frequency_for_string(0, 0) - 87.307).abs() < 0.01);
    }

    #[test]
    fn parse_and_display_round_trip() {
        let fretting: Fretting = "x 3 2 0 1 0".parse().unwrap();
        assert_eq!(fretting.string(0), StringState::Muted);
        assert_eq!(fretting.string(1), StringState::Fretted(3));
        assert_eq!(fretting.to_string(), "x 3 2 0 1 0");

        let comma: Fretting = "x,3,2,0,1,0".parse().unwrap();
        assert_eq!(comma, fretting);
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert_eq!(
            "0 0 0".parse::<Fretting>(),
            Err(FrettingParseError::WrongCount(3))
        );
        assert!(matches!(
            "0 0 0 0 0 banana".parse::<Fretting>(),
            Err(FrettingParseError::BadToken(_))
        ));
        assert_eq!(
            "0 0 0 0 0 25".parse::<Fretting>(),
            Err(FrettingParseError::OutOfRange(25))
        );
    }

    #[test]
    fn serde_uses_raw_integer_form() {
        let fretting = Fretting::from_raw([0, 0, 0, 2, 0, -1]);
        let json = serde_json::to_string(&fretting).unwrap();
        assert_eq!(json, "[0,0,0,2,0,-1]");
        let back: Fretting = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fretting);

        assert!(serde_json::from_str::<Fretting>("[0,0,0,0,0,99]").is_err());
    }

    #[test]
    fn played_notes_skip_muted_strings() {
        let fretting = Fretting::from_raw([-1, -1, 0, 2, -1, -1]);
        assert_eq!(fretting.played_notes(&FACGCE), vec![0, 9]);
        assert_eq!(fretting.played_count(), 2);
        assert_eq!(fretting.open_count(), 1);
    }
}
