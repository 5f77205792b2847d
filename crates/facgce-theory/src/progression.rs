//! Progression generation: pick a library progression compatible with the
//! user's chord, favor smooth voice leading into the next change, and
//! rotate it to start where the user already is.

use std::fmt;

use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::identify::{identify, Identification};
use crate::library::{Progression, PROGRESSIONS};
use crate::tuning::{Fretting, Tuning};
use crate::voicing::{voice_leading_hint, voice_leading_score};

/// How many of the best-scoring candidates the generator picks among, to
/// keep output varied while still favoring smooth transitions.
pub const TOP_CANDIDATES: usize = 3;

/// Nashville scale degree relative to C major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Degree {
    #[serde(rename = "I")]
    I,
    #[serde(rename = "ii")]
    Ii,
    #[serde(rename = "iii")]
    Iii,
    #[serde(rename = "IV")]
    IV,
    #[serde(rename = "V")]
    V,
    #[serde(rename = "vi")]
    Vi,
    #[serde(rename = "vii°")]
    ViiDim,
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Degree::I => "I",
            Degree::Ii => "ii",
            Degree::Iii => "iii",
            Degree::IV => "IV",
            Degree::V => "V",
            Degree::Vi => "vi",
            Degree::ViiDim => "vii°",
        };
        f.write_str(label)
    }
}

/// Scale degree of an identified chord in C major, from its root pitch
/// class and whether its quality is minor. Chords outside the diatonic
/// table have no degree.
pub fn degree_for(identification: &Identification) -> Option<Degree> {
    let (root, minor) = match identification {
        Identification::Chord { root, quality, .. } => (*root, quality.is_minor()),
        Identification::Unison(pc) => (*pc, false),
        Identification::Dyad(a, _) => (*a, false),
        Identification::NoNotes | Identification::Custom(_) => return None,
    };

    match (root, minor) {
        (0, false) => Some(Degree::I),
        (2, true) => Some(Degree::Ii),
        (4, true) => Some(Degree::Iii),
        (5, false) => Some(Degree::IV),
        (7, false) => Some(Degree::V),
        (9, true) => Some(Degree::Vi),
        (11, true) => Some(Degree::ViiDim),
        _ => None,
    }
}

/// One annotated step of a generated progression.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedStep {
    pub degree: Degree,
    pub name: String,
    pub frets: Fretting,
    /// True for the step carrying the user's own chord and shape.
    pub is_user_chord: bool,
    /// Transition description relative to the previous step.
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedProgression {
    pub name: &'static str,
    pub key: &'static str,
    pub steps: Vec<GeneratedStep>,
}

/// Generate a progression for the current shape.
///
/// With nothing played (or an unplaceable chord) this returns a uniformly
/// random library progression, unannotated. Otherwise the chosen
/// progression is rotated so the step matching the user's scale degree
/// comes first and carries the user's exact chord and shape.
pub fn generate_progression(
    rng: &mut impl Rng,
    tuning: &Tuning,
    fretting: &Fretting,
) -> GeneratedProgression {
    if fretting.played_count() == 0 {
        return random_pick(rng);
    }

    let identification = identify(tuning, fretting);
    let Some(degree) = degree_for(&identification) else {
        return random_pick(rng);
    };

    // Progressions visiting this degree, scored by how smoothly the user's
    // shape leads into the step after the match.
    let mut candidates: Vec<(i32, usize, &'static Progression)> = Vec::new();
    for progression in PROGRESSIONS {
        let Some(index) = progression.steps.iter().position(|s| s.degree == degree) else {
            continue;
        };
        let next = &progression.steps[(index + 1) % progression.steps.len()];
        let score = voice_leading_score(fretting, &next.frets);
        candidates.push((score, index, progression));
    }

    if candidates.is_empty() {
        return random_pick(rng);
    }

    candidates.sort_by(|a, b| b.0.cmp(&a.0));
    let pool = candidates.len().min(TOP_CANDIDATES);
    let (score, index, progression) = candidates[rng.gen_range(0..pool)];
    debug!(
        progression = progression.name,
        degree = %degree,
        score,
        "selected progression"
    );

    // Rotate so the matching step leads, then hand that slot to the user.
    let count = progression.steps.len();
    let mut steps: Vec<GeneratedStep> = Vec::with_capacity(count);
    for offset in 0..count {
        let step = &progression.steps[(index + offset) % count];
        if offset == 0 {
            steps.push(GeneratedStep {
                degree: step.degree,
                name: identification.to_string(),
                frets: *fretting,
                is_user_chord: true,
                hint: None,
            });
        } else {
            let hint = voice_leading_hint(&steps[offset - 1].frets, &step.frets);
            steps.push(GeneratedStep {
                degree: step.degree,
                name: step.name.to_string(),
                frets: step.frets,
                is_user_chord: false,
                hint,
            });
        }
    }

    GeneratedProgression {
        name: progression.name,
        key: progression.key,
        steps,
    }
}

fn random_pick(rng: &mut impl Rng) -> GeneratedProgression {
    let progression = &PROGRESSIONS[rng.gen_range(0..PROGRESSIONS.len())];
    debug!(progression = progression.name, "random progression");
    GeneratedProgression {
        name: progression.name,
        key: progression.key,
        steps: progression
            .steps
            .iter()
            .map(|step| GeneratedStep {
                degree: step.degree,
                name: step.name.to_string(),
                frets: step.frets,
                is_user_chord: false,
                hint: None,
            })
            .collect(),
    }
}
