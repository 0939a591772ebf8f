//! One animated character cell.
//!
//! A slot owns its current/next/target glyphs and scroll offset and advances
//! one increment per tick. The offset is a fraction of the row height: the
//! renderer draws the current glyph translated by `offset * row_height` and
//! the next glyph one cell beyond it in the travel direction. When the offset
//! passes a full cell the slot commits a step and swaps glyphs.

use std::time::Duration;

use crate::{
    ease::Ease,
    group::{is_blank_char, is_digit_char},
    model::{Mode, Strategy, LOOP_MAX, LOOP_MIN},
    plan::{self, CYCLE},
};

/// Scroll increments use `1 - ease(x) + accel_offset` as their speed curve;
/// `x` sweeps `[0, ACCEL_SPAN]` over the life of the transition.
const ACCEL_SPAN: f64 = 0.8;

const ACCEL_OFFSET_DEFAULT: f64 = 0.24;
const ACCEL_OFFSET_MAX: f64 = 0.45;
const ACCEL_OFFSET_MIN: f64 = 0.1;

/// Fraction of a cell traveled per tick at the reference cadence. A glyph
/// must stay visible for at least two ticks, so the ceiling is 0.5.
const RATE_DEFAULT: f64 = 0.15;
const RATE_MAX: f64 = 0.5;
const RATE_MIN: f64 = 0.1;

/// Reference cadence: one full cycle in 1500 ms.
pub const ONE_LOOP_DURATION_MS: u64 = 1500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Scheduled,
    Scrolling,
    Settled,
}

/// Everything a slot needs to start one transition.
#[derive(Clone, Copy, Debug)]
pub struct Assignment {
    pub from: char,
    pub to: char,
    pub delay: Duration,
    pub loop_count: u32,
    pub step_floor: u32,
    pub duration: Duration,
    pub strategy: Strategy,
    pub mode: Mode,
}

/// Per-tick render output for one column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotFrame {
    pub glyph: char,
    pub upcoming: char,
    /// Fraction of the row height the current glyph is displaced by.
    pub offset: f64,
    pub is_digit: bool,
}

#[derive(Clone, Debug)]
pub struct Slot {
    current: char,
    next: char,
    target: char,
    from_digit: bool,
    to_digit: bool,
    total_steps: u32,
    remaining: u32,
    direction: i8,
    offset: f64,
    offset_rate: f64,
    accel_offset: f64,
    delay: Duration,
    phase: Phase,
    pending_removal: bool,
}

impl Default for Slot {
    fn default() -> Self {
        Self::new()
    }
}

impl Slot {
    pub fn new() -> Self {
        Self {
            current: ' ',
            next: ' ',
            target: ' ',
            from_digit: false,
            to_digit: false,
            total_steps: 0,
            remaining: 0,
            direction: 1,
            offset: 0.0,
            offset_rate: RATE_DEFAULT,
            accel_offset: ACCEL_OFFSET_DEFAULT,
            delay: Duration::ZERO,
            phase: Phase::Idle,
            pending_removal: false,
        }
    }

    /// Starts a new transition, fully replacing any in-flight one. No state
    /// from a previous assignment survives; re-assignment is cancellation.
    pub fn assign(&mut self, a: Assignment) {
        let loops = a.loop_count.clamp(LOOP_MIN, LOOP_MAX);
        let motion = plan::total_delta(a.from, a.to, a.strategy, loops, a.step_floor);

        self.current = a.from;
        self.target = a.to;
        self.from_digit = is_digit_char(a.from);
        self.to_digit = is_digit_char(a.to);
        self.pending_removal = is_blank_char(a.to);
        self.total_steps = motion.steps;
        self.remaining = motion.steps;
        self.direction = motion.direction;
        self.offset = 0.0;
        self.delay = a.delay;
        self.phase = Phase::Scheduled;
        self.retune(a.mode, a.duration, loops, motion.steps);
        self.next = self.first_next();

        tracing::debug!(
            from = %a.from,
            to = %a.to,
            steps = motion.steps,
            direction = motion.direction,
            rate = self.offset_rate,
            accel = self.accel_offset,
            "slot assigned"
        );
    }

    /// Advances the slot. `dt` pays down the start delay; while scrolling,
    /// each call applies one scroll increment (tick at your render cadence).
    /// Returns true the moment the slot settles; the owning collection
    /// decides what to do with a settled slot that is pending removal.
    pub fn tick(&mut self, ease: Ease, dt: Duration) -> bool {
        match self.phase {
            Phase::Idle | Phase::Settled => false,
            Phase::Scheduled => {
                self.delay = self.delay.saturating_sub(dt);
                if !self.delay.is_zero() {
                    return false;
                }
                if self.remaining == 0 {
                    self.settle();
                    return true;
                }
                self.phase = Phase::Scrolling;
                false
            }
            Phase::Scrolling => {
                self.advance(ease);
                if self.remaining == 0 {
                    self.settle();
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn frame(&self) -> SlotFrame {
        SlotFrame {
            glyph: self.current,
            upcoming: self.next,
            offset: self.offset,
            is_digit: is_digit_char(self.current),
        }
    }

    pub fn current(&self) -> char {
        self.current
    }

    pub fn target(&self) -> char {
        self.target
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase == Phase::Settled
    }

    pub fn pending_removal(&self) -> bool {
        self.pending_removal
    }

    pub fn remaining_steps(&self) -> u32 {
        self.remaining
    }

    pub fn direction(&self) -> i8 {
        self.direction
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    fn settle(&mut self) {
        self.offset = 0.0;
        self.phase = Phase::Settled;
    }

    fn advance(&mut self, ease: Ease) {
        let dir = self.direction as f64;
        if self.from_digit && self.to_digit {
            let done = (self.total_steps - self.remaining) as f64;
            let x = ACCEL_SPAN * done / self.total_steps as f64;
            self.offset -= dir * self.offset_rate * (1.0 - ease.apply(x) + self.accel_offset);
        } else {
            self.offset -= dir * RATE_DEFAULT * (1.0 - ease.apply(0.0) + ACCEL_OFFSET_MIN);
        }

        if self.offset.abs() >= 1.0 {
            self.remaining -= 1;
            self.offset += dir;
            self.current = self.next;
            self.next = if self.from_digit && self.to_digit {
                step_digit(self.current, self.direction)
            } else {
                self.target
            };
        }
    }

    /// The glyph one step beyond `current` in the travel direction. Upward
    /// digit motion derives it from the backtracked start digit so the final
    /// commit lands exactly on the target even when the step floor inflated
    /// the count past the natural modular distance.
    fn first_next(&self) -> char {
        if self.from_digit && self.to_digit {
            if self.direction > 0 {
                let target = digit_value(self.target);
                let start = (target + CYCLE - self.remaining % CYCLE) % CYCLE;
                digit_char((start + 1) % CYCLE)
            } else {
                step_digit(self.current, self.direction)
            }
        } else {
            self.target
        }
    }

    /// Compares the reference cadence (10 steps per 1500 ms) against the
    /// requested one and scales the per-tick travel so a column completing 1
    /// step and one completing 50 both read as smooth motion.
    fn retune(&mut self, mode: Mode, duration: Duration, loops: u32, total_steps: u32) {
        let reference = ONE_LOOP_DURATION_MS as f64 / CYCLE as f64;
        let requested = match mode {
            Mode::StartFirstArriveLast
            | Mode::StartFirstArriveFirst
            | Mode::StartTogetherArriveTogether => {
                duration.as_millis() as f64 / (loops * CYCLE) as f64
            }
            Mode::Calendar | Mode::Scoreboard => {
                duration.as_millis() as f64 / total_steps.max(1) as f64
            }
        };

        let (rate, accel) = if reference >= requested {
            let scale = (reference / requested).round();
            (
                RATE_DEFAULT + (RATE_MAX - RATE_DEFAULT) / 10.0 * scale,
                ACCEL_OFFSET_DEFAULT + (ACCEL_OFFSET_MAX - ACCEL_OFFSET_DEFAULT) / 10.0 * scale,
            )
        } else {
            let scale = (requested / reference).round();
            (
                RATE_DEFAULT - (RATE_DEFAULT - RATE_MIN) / 10.0 * scale,
                ACCEL_OFFSET_DEFAULT - (ACCEL_OFFSET_DEFAULT - ACCEL_OFFSET_MIN) / 10.0 * scale,
            )
        };
        self.offset_rate = rate.clamp(RATE_MIN, RATE_MAX);
        self.accel_offset = accel.clamp(ACCEL_OFFSET_MIN, ACCEL_OFFSET_MAX);
    }
}

fn digit_value(c: char) -> u32 {
    c as u32 - '0' as u32
}

fn digit_char(v: u32) -> char {
    char::from_u32('0' as u32 + v % CYCLE).unwrap_or('0')
}

fn step_digit(c: char, direction: i8) -> char {
    let v = digit_value(c) as i32 + direction as i32;
    digit_char(v.rem_euclid(CYCLE as i32) as u32)
}
