//! Voice-leading distance between two chord shapes.

use crate::tuning::{Fretting, StringState};

/// Per-string reward for an unchanged fret.
pub const COMMON_TONE_BONUS: i32 = 10;
/// Extra reward when the shared fret is an open string.
pub const OPEN_DRONE_BONUS: i32 = 5;
/// Penalty when a string is played on one side only.
pub const MUTE_CHANGE_PENALTY: i32 = 3;
/// Small moves score `NEAR_MOVE_BASE - NEAR_MOVE_SLOPE * distance`
/// (+4 for one fret, +2 for two); larger moves subtract their distance.
pub const NEAR_MOVE_BASE: i32 = 6;
pub const NEAR_MOVE_SLOPE: i32 = 2;
pub const NEAR_MOVE_LIMIT: i32 = 2;

/// Score the transition between two shapes; higher is smoother.
///
/// Two identical shapes reach the maximum
/// `10 * played + 5 * open` for their string-activity pattern.
pub fn voice_leading_score(from: &Fretting, to: &Fretting) -> i32 {
    let mut score = 0;
    for (a, b) in from.strings().zip(to.strings()) {
        score += match (a, b) {
            (StringState::Muted, StringState::Muted) => 0,
            (StringState::Fretted(x), StringState::Fretted(y)) if x == y => {
                COMMON_TONE_BONUS + if x == 0 { OPEN_DRONE_BONUS } else { 0 }
            }
            (StringState::Muted, _) | (_, StringState::Muted) => -MUTE_CHANGE_PENALTY,
            (StringState::Fretted(x), StringState::Fretted(y)) => {
                let d = (x as i32 - y as i32).abs();
                if d <= NEAR_MOVE_LIMIT {
                    NEAR_MOVE_BASE - NEAR_MOVE_SLOPE * d
                } else {
                    -d
                }
            }
        };
    }
    score
}

/// Short transition description: how many strings hold and how many move.
/// `None` when no string does either.
pub fn voice_leading_hint(from: &Fretting, to: &Fretting) -> Option<String> {
    let mut stay = 0;
    let mut moved = 0;
    for (a, b) in from.strings().zip(to.strings()) {
        if let (StringState::Fretted(x), StringState::Fretted(y)) = (a, b) {
            if x == y {
                stay += 1;
            } else {
                moved += 1;
            }
        }
    }

    let mut phrases = Vec::new();
    if stay > 0 {
        phrases.push(if stay == 1 {
            "1 string stays".to_string()
        } else {
            format!("{} strings stay", stay)
        });
    }
    if moved > 0 {
        phrases.push(if moved == 1 {
            "1 string moves".to_string()
        } else {
            format!("{} strings move", moved)
        });
    }

    if phrases.is_empty() {
        None
    } else {
        Some(phrases.join(", "))
    }
}
