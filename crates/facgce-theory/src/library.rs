//! Static reference data: chord shapes that work well in FACGCE, and the
//! progression library the generator draws from. Read-only; sessions copy
//! and annotate, never mutate.

use serde::Serialize;

use crate::progression::Degree;
use crate::tuning::Fretting;

/// Rough family tag for browsing the shape library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeFamily {
    Major,
    Minor,
    Seventh,
    Suspended,
}

/// A known-good chord voicing in this tuning.
#[derive(Debug, Clone, Serialize)]
pub struct ChordShape {
    pub name: &'static str,
    pub frets: Fretting,
    pub family: ShapeFamily,
    pub description: &'static str,
}

pub static CHORD_LIBRARY: &[ChordShape] = &[
    ChordShape {
        name: "Fmaj9",
        frets: Fretting::from_raw([0, 0, 0, 0, 0, 0]),
        family: ShapeFamily::Seventh,
        description: "Open strings - the natural voicing",
    },
    ChordShape {
        name: "Fmaj7",
        frets: Fretting::from_raw([0, 0, 0, 0, 0, 0]),
        family: ShapeFamily::Seventh,
        description: "Same as Fmaj9, emphasize different notes",
    },
    ChordShape {
        name: "C",
        frets: Fretting::from_raw([5, 7, 0, 0, 0, 7]),
        family: ShapeFamily::Major,
        description: "C major with open strings",
    },
    ChordShape {
        name: "Cmaj7",
        frets: Fretting::from_raw([5, 7, 0, 0, 0, 0]),
        family: ShapeFamily::Seventh,
        description: "C major 7 using open E",
    },
    ChordShape {
        name: "Am",
        frets: Fretting::from_raw([0, 0, 0, 2, 0, 0]),
        family: ShapeFamily::Minor,
        description: "A minor with resonant open strings",
    },
    ChordShape {
        name: "Am7",
        frets: Fretting::from_raw([0, 0, 0, 2, 0, 7]),
        family: ShapeFamily::Minor,
        description: "A minor 7",
    },
    ChordShape {
        name: "Dm",
        frets: Fretting::from_raw([3, 5, 2, 0, 0, 0]),
        family: ShapeFamily::Minor,
        description: "D minor",
    },
    ChordShape {
        name: "Dm7",
        frets: Fretting::from_raw([3, 5, 2, 0, 0, 5]),
        family: ShapeFamily::Minor,
        description: "D minor 7",
    },
    ChordShape {
        name: "G",
        frets: Fretting::from_raw([2, 4, 0, 0, 0, 0]),
        family: ShapeFamily::Major,
        description: "G major with open strings",
    },
    ChordShape {
        name: "Gmaj7",
        frets: Fretting::from_raw([2, 4, 0, 0, 0, 7]),
        family: ShapeFamily::Seventh,
        description: "G major 7",
    },
    ChordShape {
        name: "Em",
        frets: Fretting::from_raw([0, 2, 0, 0, 0, 0]),
        family: ShapeFamily::Minor,
        description: "E minor",
    },
    ChordShape {
        name: "Em7",
        frets: Fretting::from_raw([0, 2, 0, 5, 0, 0]),
        family: ShapeFamily::Minor,
        description: "E minor 7",
    },
    ChordShape {
        name: "Cadd9",
        frets: Fretting::from_raw([5, 7, 0, 2, 0, 7]),
        family: ShapeFamily::Major,
        description: "C add 9",
    },
    ChordShape {
        name: "Asus2",
        frets: Fretting::from_raw([0, 0, 2, 2, 0, 0]),
        family: ShapeFamily::Suspended,
        description: "A suspended 2",
    },
    ChordShape {
        name: "Dsus2",
        frets: Fretting::from_raw([3, 5, 0, 0, 0, 0]),
        family: ShapeFamily::Suspended,
        description: "D suspended 2",
    },
    ChordShape {
        name: "Gsus4",
        frets: Fretting::from_raw([2, 4, 0, 0, 5, 0]),
        family: ShapeFamily::Suspended,
        description: "G suspended 4",
    },
    ChordShape {
        name: "Bb",
        frets: Fretting::from_raw([0, 3, 0, 3, 3, 0]),
        family: ShapeFamily::Major,
        description: "Bb major",
    },
    ChordShape {
        name: "Bbmaj7",
        frets: Fretting::from_raw([0, 3, 0, 3, 3, 5]),
        family: ShapeFamily::Seventh,
        description: "Bb major 7",
    },
];

/// One step of a library progression.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressionStep {
    pub degree: Degree,
    pub name: &'static str,
    pub frets: Fretting,
}

/// A named harmonic progression, all in the key of C.
#[derive(Debug, Clone, Serialize)]
pub struct Progression {
    pub name: &'static str,
    pub key: &'static str,
    pub steps: &'static [ProgressionStep],
}

macro_rules! step {
    ($degree:ident, $name:expr, $frets:expr) => {
        ProgressionStep {
            degree: Degree::$degree,
            name: $name,
            frets: Fretting::from_raw($frets),
        }
    };
}

pub static PROGRESSIONS: &[Progression] = &[
    Progression {
        name: "I - V - vi - IV",
        key: "C",
        steps: &[
            step!(I, "Cadd9", [7, 9, 0, 2, 0, 0]),
            step!(V, "Gadd11", [2, 4, 0, 0, 5, 0]),
            step!(Vi, "Am7", [0, 0, 0, 2, 3, 0]),
            step!(IV, "Fmaj9", [0, 0, 0, 0, 0, 0]),
        ],
    },
    Progression {
        name: "I - IV - V",
        key: "C",
        steps: &[
            step!(I, "Cmaj7", [5, 7, 0, 0, 0, 0]),
            step!(IV, "Fmaj9", [0, 0, 0, 0, 0, 0]),
            step!(V, "Gsus4", [2, 4, 0, 0, 5, 0]),
        ],
    },
    Progression {
        name: "vi - IV - I - V",
        key: "C",
        steps: &[
            step!(Vi, "Am11", [0, 0, 0, 2, 5, 0]),
            step!(IV, "Fmaj9", [0, 0, 0, 0, 0, 0]),
            step!(I, "Cadd9", [7, 9, 0, 2, 0, 0]),
            step!(V, "G6", [2, 4, 0, 0, 0, 0]),
        ],
    },
    Progression {
        name: "I - vi - ii - V",
        key: "C",
        steps: &[
            step!(I, "Cmaj7", [5, 7, 0, 0, 0, 0]),
            step!(Vi, "Am7", [0, 0, 0, 2, 3, 0]),
            step!(Ii, "Dm9", [3, 5, 2, 0, 3, 0]),
            step!(V, "Gadd11", [2, 4, 0, 0, 5, 0]),
        ],
    },
    Progression {
        name: "ii - V - I",
        key: "C",
        steps: &[
            step!(Ii, "Dm7", [3, 5, 2, 0, 3, 0]),
            step!(V, "G6", [2, 4, 0, 0, 0, 0]),
            step!(I, "Cmaj9", [5, 7, 0, 2, 0, 0]),
        ],
    },
    Progression {
        name: "I - iii - vi - IV",
        key: "C",
        steps: &[
            step!(I, "Cadd9", [7, 9, 0, 2, 0, 0]),
            step!(Iii, "Em7", [0, 2, 0, 0, 3, 0]),
            step!(Vi, "Am7", [0, 0, 0, 2, 3, 0]),
            step!(IV, "Fmaj9", [0, 0, 0, 0, 0, 0]),
        ],
    },
    Progression {
        name: "vi - V - IV - V",
        key: "C",
        steps: &[
            step!(Vi, "Am7", [0, 0, 0, 2, 3, 0]),
            step!(V, "Gsus4", [2, 4, 0, 0, 5, 0]),
            step!(IV, "Fmaj9", [0, 0, 0, 0, 0, 0]),
            step!(V, "G6", [2, 4, 0, 0, 0, 0]),
        ],
    },
    Progression {
        name: "I - iii - IV - V",
        key: "C",
        steps: &[
            step!(I, "Cmaj7", [5, 7, 0, 0, 0, 0]),
            step!(Iii, "Em11", [0, 2, 0, 0, 5, 0]),
            step!(IV, "Fmaj9", [0, 0, 0, 0, 0, 0]),
            step!(V, "Gadd11", [2, 4, 0, 0, 5, 0]),
        ],
    },
    Progression {
        name: "IV - V - iii - vi (Royal Road)",
        key: "C",
        steps: &[
            step!(IV, "Fmaj9", [0, 0, 0, 0, 0, 0]),
            step!(V, "Gsus4", [2, 4, 0, 0, 5, 0]),
            step!(Iii, "Em7", [0, 2, 0, 0, 3, 0]),
            step!(Vi, "Am11", [0, 0, 0, 2, 5, 0]),
        ],
    },
    Progression {
        name: "vi - ii - V - I",
        key: "C",
        steps: &[
            step!(Vi, "Am7", [0, 0, 0, 2, 3, 0]),
            step!(Ii, "Dm9", [3, 5, 2, 0, 3, 0]),
            step!(V, "G6", [2, 4, 0, 0, 0, 0]),
            step!(I, "Cmaj9", [5, 7, 0, 2, 0, 0]),
        ],
    },
    Progression {
        name: "I - ii - iii - IV",
        key: "C",
        steps: &[
            step!(I, "Cmaj9", [5, 7, 0, 2, 0, 0]),
            step!(Ii, "Dm7", [3, 5, 2, 0, 3, 0]),
            step!(Iii, "Em7", [0, 2, 0, 0, 3, 0]),
            step!(IV, "Fmaj9", [0, 0, 0, 0, 0, 0]),
        ],
    },
    Progression {
        name: "I - V - vi - iii - IV",
        key: "C",
        steps: &[
            step!(I, "Cadd9", [7, 9, 0, 2, 0, 0]),
            step!(V, "G6", [2, 4, 0, 0, 0, 0]),
            step!(Vi, "Am11", [0, 0, 0, 2, 5, 0]),
            step!(Iii, "Em7", [0, 2, 0, 0, 3, 0]),
            step!(IV, "Fmaj9", [0, 0, 0, 0, 0, 0]),
        ],
    },
];
