//! Per-column timing and step math.
//!
//! Given an aligned pair and a mode, decides which columns animate at all
//! (`start_index`), when each one starts (`stagger_delay`), how many steps the
//! mode forces on it (`step_floor`), and how far a single glyph actually
//! travels (`total_delta`).

use std::time::Duration;

use crate::{
    group::is_digit_char,
    model::{AlignedPair, Mode, Strategy, LOOP_MAX, LOOP_MIN},
};

/// Glyphs in one full digit cycle, `'0'..='9'`.
pub const CYCLE: u32 = 10;

/// Step count and spin direction for one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Motion {
    pub steps: u32,
    /// `+1` rolls upward, `-1` downward.
    pub direction: i8,
}

impl Motion {
    pub const STILL: Motion = Motion { steps: 0, direction: 1 };
}

/// Highest column index that animates.
///
/// Calendar and Scoreboard skip unchanged leading columns entirely: only
/// positions at or below the first difference (scanning from the most
/// significant end) move. All other modes animate every column.
pub fn start_index(pair: &AlignedPair, mode: Mode) -> usize {
    let len = pair.len();
    match mode {
        Mode::Calendar | Mode::Scoreboard => pair
            .from_seq
            .iter()
            .zip(&pair.to_seq)
            .enumerate()
            .rev()
            .find(|(_, (f, t))| f != t)
            .map_or(len, |(i, _)| i),
        _ => len,
    }
}

/// Start delay for one column. All staggered modes share the same linear law;
/// they differ in step count, not delay.
pub fn stagger_delay(index: usize, start_index: usize, unit_delay: Duration, mode: Mode) -> Duration {
    if mode == Mode::StartTogetherArriveTogether || index > start_index {
        return Duration::ZERO;
    }
    unit_delay * index as u32
}

/// Minimum step count the mode forces on a column so arrival order works out.
pub fn step_floor(index: usize, start_index: usize, mode: Mode) -> u32 {
    if index > start_index {
        return 0;
    }
    match mode {
        // Lower-significance columns play strictly more cycles, so every
        // column lands at the same wall-clock time despite starting earlier.
        Mode::StartFirstArriveLast => CYCLE + (start_index - index) as u32,
        Mode::StartFirstArriveFirst | Mode::StartTogetherArriveTogether => CYCLE,
        Mode::Calendar | Mode::Scoreboard => 0,
    }
}

/// Steps and direction for a single glyph transition.
///
/// Word glyphs flip in one step (or none when equal). Digits travel the
/// modulo-10 cycle: `Natural` always rolls upward, `ShortestPath` picks the
/// shorter of up and down (wraparound included, ties upward). `loop_count`
/// extra cycles and the mode's `step_floor` only ever lengthen the trip.
pub fn total_delta(
    from: char,
    to: char,
    strategy: Strategy,
    loop_count: u32,
    step_floor: u32,
) -> Motion {
    let loops = loop_count.clamp(LOOP_MIN, LOOP_MAX);
    if !(is_digit_char(from) && is_digit_char(to)) {
        return if from == to {
            Motion::STILL
        } else {
            Motion { steps: 1, direction: 1 }
        };
    }

    let a = from as u32 - '0' as u32;
    let b = to as u32 - '0' as u32;
    let extra = (loops - 1) * CYCLE;
    match strategy {
        Strategy::Natural => Motion {
            steps: ((b + CYCLE - a) % CYCLE + extra).max(step_floor),
            direction: 1,
        },
        Strategy::ShortestPath => {
            let up = (b + CYCLE - a) % CYCLE;
            let down = (a + CYCLE - b) % CYCLE;
            if up <= down {
                Motion {
                    steps: (up + extra).max(step_floor),
                    direction: 1,
                }
            } else {
                Motion {
                    steps: (down + extra).max(step_floor),
                    direction: -1,
                }
            }
        }
    }
}
