//! The slot pool and public driver.
//!
//! A [`ScrollRow`] owns one [`Slot`] per aligned column, index 0 being the
//! least-significant column. New transitions re-parameterize the existing
//! slots low-index-first; the pool grows and shrinks only at the
//! most-significant end. A column that disappears is never destroyed
//! mid-scroll: its slot is assigned a blank target, animates out, and is
//! trimmed once it settles.
//!
//! The row is single-threaded and tick-driven. All slots are parameterized
//! synchronously before any of them ticks, so the visual stagger is purely a
//! function of each slot's own delay. State changes are reported through an
//! event queue the caller drains; slots never hold a callback back into their
//! container.

use std::time::Duration;

use crate::{
    align::{align, punch_holes},
    ease::Ease,
    error::{NumrollError, NumrollResult},
    model::{AlignedPair, CharToken, Mode, ScrollConfig, Strategy},
    plan,
    slot::{Assignment, Phase, Slot, SlotFrame},
};

/// Delay applied when initializing glyphs without an animation.
const INIT_DELAY_MS: u64 = 10;

/// State transitions reported to the caller, drained via
/// [`ScrollRow::drain_events`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowEvent {
    /// The slot at `index` finished its transition.
    Settled { index: usize },
    /// The settled slot at `index` was scheduled for removal; its visual
    /// element should be detached. The row trims the slot itself.
    RemovalRequested { index: usize },
}

#[derive(Debug)]
pub struct ScrollRow {
    config: ScrollConfig,
    slots: Vec<Slot>,
    /// Punched from-side of the last alignment; `play()` rewinds to this.
    middle: Vec<CharToken>,
    /// Punched to-side of the last alignment.
    target: Vec<CharToken>,
    /// Last applied target text; the implicit from-side of `set_target`.
    target_text: String,
    events: Vec<RowEvent>,
}

impl ScrollRow {
    pub fn new(config: ScrollConfig) -> NumrollResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            slots: Vec::new(),
            middle: Vec::new(),
            target: Vec::new(),
            target_text: String::new(),
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Replaces the whole configuration. Validates first; on error the
    /// current configuration and any running animation are untouched.
    pub fn set_config(&mut self, config: ScrollConfig) -> NumrollResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Sets the stagger mode and re-derives the strategy it implies. Call
    /// [`set_strategy`](Self::set_strategy) afterwards to override.
    pub fn set_mode(&mut self, mode: Mode) {
        self.config.mode = mode;
        self.config.strategy = mode.implied_strategy();
    }

    pub fn set_strategy(&mut self, strategy: Strategy) {
        self.config.strategy = strategy;
    }

    pub fn set_ease(&mut self, ease: Ease) {
        self.config.ease = ease;
    }

    pub fn set_loop_count(&mut self, loop_count: u32) -> NumrollResult<()> {
        if loop_count == 0 {
            return Err(NumrollError::validation("loop_count must be >= 1"));
        }
        self.config.loop_count = loop_count;
        Ok(())
    }

    pub fn set_unit_delay_ms(&mut self, unit_delay_ms: u64) -> NumrollResult<()> {
        if unit_delay_ms == 0 {
            return Err(NumrollError::validation("unit_delay_ms must be > 0"));
        }
        self.config.unit_delay_ms = unit_delay_ms;
        Ok(())
    }

    pub fn set_duration_ms(&mut self, duration_ms: u64) -> NumrollResult<()> {
        if duration_ms == 0 {
            return Err(NumrollError::validation("duration_ms must be > 0"));
        }
        self.config.duration_ms = duration_ms;
        Ok(())
    }

    /// Aligns `from` and `to` and initializes the columns without animating:
    /// the row shows the target immediately. The from-side is kept as the
    /// middle state, so a later [`play`](Self::play) animates from→to.
    #[tracing::instrument(skip(self))]
    pub fn set_text(&mut self, from: Option<&str>, to: Option<&str>) {
        let pair = align(from, to);
        self.set_aligned(&pair, false);
    }

    /// Aligns `from` and `to` and starts the transition.
    #[tracing::instrument(skip(self))]
    pub fn set_text_animated(&mut self, from: Option<&str>, to: Option<&str>) {
        let pair = align(from, to);
        self.set_aligned(&pair, true);
    }

    /// Like [`set_text`](Self::set_text) with the previous target as the
    /// from-side.
    pub fn set_target(&mut self, to: &str) {
        let from = self.target_text.clone();
        self.set_text(non_empty(&from), non_empty(to));
    }

    /// Like [`set_text_animated`](Self::set_text_animated) with the previous
    /// target as the from-side.
    pub fn set_target_animated(&mut self, to: &str) {
        let from = self.target_text.clone();
        self.set_text_animated(non_empty(&from), non_empty(to));
    }

    /// [`set_target_animated`](Self::set_target_animated), skipped when `to`
    /// is empty or equals the current target.
    pub fn set_target_animated_if_changed(&mut self, to: &str) {
        if to.is_empty() || to == self.target_text {
            return;
        }
        self.set_target_animated(to);
    }

    /// Applies a pre-built alignment (from either aligner). An empty pair is
    /// the degenerate both-sides-empty case and is a no-op.
    pub fn set_aligned(&mut self, pair: &AlignedPair, animate: bool) {
        if pair.is_empty() {
            return;
        }
        let punched = punch_holes(pair);
        self.middle = if animate {
            punched.to_seq.clone()
        } else {
            punched.from_seq.clone()
        };
        self.target = punched.to_seq.clone();
        self.target_text = punched.to_text();
        self.reconcile(punched.len());
        if animate {
            self.assign_transition(&punched);
        } else {
            self.assign_static(&punched);
        }
    }

    /// Re-plays the last transition from its stored middle state without
    /// re-deriving the alignment.
    #[tracing::instrument(skip(self))]
    pub fn play(&mut self) {
        if self.target.is_empty() && self.slots.is_empty() {
            return;
        }
        let pair = AlignedPair {
            from_seq: self.middle.clone(),
            to_seq: self.target.clone(),
        };
        self.reconcile(pair.len());
        self.assign_transition(&pair);
    }

    /// Advances every slot. `dt` pays down start delays; scrolling slots
    /// apply one scroll increment per call, so tick at your render cadence.
    /// Settled removal slots at the most-significant end are trimmed here.
    pub fn tick(&mut self, dt: Duration) {
        let ease = self.config.ease;
        let mut settled = Vec::new();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.tick(ease, dt) {
                settled.push((i, slot.pending_removal()));
            }
        }
        for (index, removal) in settled {
            self.events.push(RowEvent::Settled { index });
            if removal {
                self.events.push(RowEvent::RemovalRequested { index });
            }
        }
        while self
            .slots
            .last()
            .is_some_and(|s| s.is_settled() && s.pending_removal())
        {
            self.slots.pop();
        }
    }

    /// Events accumulated since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<RowEvent> {
        std::mem::take(&mut self.events)
    }

    /// Render state per column, least-significant first.
    pub fn frames(&self) -> Vec<SlotFrame> {
        self.slots.iter().map(Slot::frame).collect()
    }

    /// Current glyphs as a most-significant-first string.
    pub fn glyphs(&self) -> String {
        self.slots.iter().rev().map(Slot::current).collect()
    }

    pub fn is_settled(&self) -> bool {
        self.slots
            .iter()
            .all(|s| matches!(s.phase(), Phase::Idle | Phase::Settled))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Grows the pool to `new_len` with fresh slots at the most-significant
    /// end. Surplus slots are kept; the assignment pass gives them blank
    /// targets and they are trimmed once their removal animation settles.
    fn reconcile(&mut self, new_len: usize) {
        if self.slots.len() < new_len {
            self.slots.resize_with(new_len, Slot::new);
        }
    }

    fn assign_transition(&mut self, pair: &AlignedPair) {
        let cfg = self.config;
        let start = plan::start_index(pair, cfg.mode);
        let unit = Duration::from_millis(cfg.unit_delay_ms);
        let duration = Duration::from_millis(cfg.duration_ms);
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let (from, to) = if i < pair.len() {
                (pair.from_seq[i].ch, pair.to_seq[i].ch)
            } else {
                // The column disappears; animate out from wherever it is.
                (slot.current(), ' ')
            };
            slot.assign(Assignment {
                from,
                to,
                delay: plan::stagger_delay(i, start, unit, cfg.mode),
                loop_count: cfg.loop_count,
                step_floor: plan::step_floor(i, start, cfg.mode),
                duration,
                strategy: cfg.strategy,
                mode: cfg.mode,
            });
        }
    }

    fn assign_static(&mut self, pair: &AlignedPair) {
        let cfg = self.config;
        let delay = Duration::from_millis(INIT_DELAY_MS);
        let duration = Duration::from_millis(cfg.duration_ms);
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let to = if i < pair.len() { pair.to_seq[i].ch } else { ' ' };
            let from = if i < pair.len() { to } else { slot.current() };
            slot.assign(Assignment {
                from,
                to,
                delay,
                loop_count: 1,
                step_floor: 0,
                duration,
                strategy: cfg.strategy,
                mode: cfg.mode,
            });
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    (!s.is_empty()).then_some(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(16);

    fn settle(row: &mut ScrollRow) {
        for _ in 0..100_000 {
            row.tick(TICK);
            if row.is_settled() {
                return;
            }
        }
        panic!("row never settled");
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let mut cfg = ScrollConfig::default();
        cfg.duration_ms = 0;
        assert!(ScrollRow::new(cfg).is_err());
    }

    #[test]
    fn set_text_shows_the_target_immediately() {
        let mut row = ScrollRow::new(ScrollConfig::default()).unwrap();
        row.set_text(None, Some("123"));
        assert_eq!(row.len(), 3);
        assert_eq!(row.glyphs(), "123");
    }

    #[test]
    fn degenerate_input_is_a_no_op() {
        let mut row = ScrollRow::new(ScrollConfig::default()).unwrap();
        row.set_text(None, Some("42"));
        row.set_text(None, None);
        assert_eq!(row.glyphs(), "42");
    }

    #[test]
    fn invalid_setter_leaves_config_untouched() {
        let mut row = ScrollRow::new(ScrollConfig::default()).unwrap();
        let before = *row.config();
        assert!(row.set_loop_count(0).is_err());
        assert!(row.set_duration_ms(0).is_err());
        assert!(row.set_unit_delay_ms(0).is_err());
        assert_eq!(*row.config(), before);
    }

    #[test]
    fn every_slot_settles_and_reports() {
        let mut row = ScrollRow::new(ScrollConfig::default()).unwrap();
        row.set_text_animated(Some("10"), Some("25"));
        settle(&mut row);
        assert_eq!(row.glyphs(), "25");

        let events = row.drain_events();
        let settled: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, RowEvent::Settled { .. }))
            .collect();
        assert_eq!(settled.len(), 2);
    }

    #[test]
    fn set_mode_rederives_strategy() {
        let mut row = ScrollRow::new(ScrollConfig::default()).unwrap();
        row.set_mode(Mode::Scoreboard);
        assert_eq!(row.config().strategy, Strategy::ShortestPath);
        row.set_strategy(Strategy::Natural);
        assert_eq!(row.config().strategy, Strategy::Natural);
    }
}
