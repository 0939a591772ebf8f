use crate::{
    ease::Ease,
    error::{NumrollError, NumrollResult},
    group,
};

/// Smallest loop count accepted at assignment time.
pub const LOOP_MIN: u32 = 1;
/// Largest loop count accepted at assignment time.
pub const LOOP_MAX: u32 = 5;

pub const DEFAULT_UNIT_DELAY_MS: u64 = 90;
pub const DEFAULT_DURATION_MS: u64 = 1500;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum TokenKind {
    Digit,
    Word,
    Blank,
}

/// One aligned character position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CharToken {
    pub ch: char,
    pub kind: TokenKind,
}

impl CharToken {
    pub fn of(ch: char) -> Self {
        if group::is_digit_char(ch) {
            Self { ch, kind: TokenKind::Digit }
        } else if group::is_blank_char(ch) {
            Self::blank()
        } else {
            Self { ch, kind: TokenKind::Word }
        }
    }

    pub fn digit(ch: char) -> Self {
        debug_assert!(group::is_digit_char(ch));
        Self { ch, kind: TokenKind::Digit }
    }

    pub fn word(ch: char) -> Self {
        Self { ch, kind: TokenKind::Word }
    }

    pub fn blank() -> Self {
        Self { ch: ' ', kind: TokenKind::Blank }
    }

    pub fn is_digit(&self) -> bool {
        self.kind == TokenKind::Digit
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    pub fn is_blank(&self) -> bool {
        self.kind == TokenKind::Blank
    }

    pub fn digit_value(&self) -> Option<u32> {
        self.is_digit().then(|| self.ch as u32 - '0' as u32)
    }
}

/// Two equal-length token sequences describing every animated column.
///
/// Index 0 is the least-significant (rightmost original) character; higher
/// indices are more significant.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AlignedPair {
    pub from_seq: Vec<CharToken>,
    pub to_seq: Vec<CharToken>,
}

impl AlignedPair {
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.from_seq.len(), self.to_seq.len());
        self.from_seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.from_seq.is_empty()
    }

    /// The from side as a most-significant-first string.
    pub fn from_text(&self) -> String {
        self.from_seq.iter().rev().map(|t| t.ch).collect()
    }

    /// The to side as a most-significant-first string.
    pub fn to_text(&self) -> String {
        self.to_seq.iter().rev().map(|t| t.ch).collect()
    }
}

/// Stagger pattern across columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Mode {
    /// The least-significant column starts first and arrives last; every
    /// column lands at the same wall-clock time.
    StartFirstArriveLast,
    /// All columns start together and arrive together.
    StartTogetherArriveTogether,
    /// Columns start low-to-high and arrive in the same order.
    StartFirstArriveFirst,
    /// Desk-calendar flip: only columns at or below the first changed digit
    /// move, always rolling upward.
    Calendar,
    /// Scoreboard flip: like Calendar, but each digit takes the shortest
    /// route up or down.
    Scoreboard,
}

impl Mode {
    /// The scroll strategy this mode calls for when none is given explicitly.
    pub fn implied_strategy(self) -> Strategy {
        match self {
            Self::Scoreboard => Strategy::ShortestPath,
            _ => Strategy::Natural,
        }
    }
}

/// How a digit travels from its current value to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Strategy {
    /// Always roll upward through the full modulo-10 cycle.
    Natural,
    /// Roll whichever direction traverses fewer glyphs; ties roll upward.
    ShortestPath,
}

/// Animation configuration applied to a whole row.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollConfig {
    pub mode: Mode,
    pub strategy: Strategy,
    /// Base number of full 0-9 cycles a digit plays. Clamped to
    /// [`LOOP_MIN`]..=[`LOOP_MAX`] at assignment time.
    pub loop_count: u32,
    /// Stagger unit: column `i` starts `i * unit_delay_ms` after its
    /// assignment.
    pub unit_delay_ms: u64,
    /// Wall-clock budget a full transition aims for.
    pub duration_ms: u64,
    pub ease: Ease,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self::for_mode(Mode::StartFirstArriveLast)
    }
}

impl ScrollConfig {
    /// Defaults for `mode`, with the strategy the mode implies.
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            mode,
            strategy: mode.implied_strategy(),
            loop_count: LOOP_MIN,
            unit_delay_ms: DEFAULT_UNIT_DELAY_MS,
            duration_ms: DEFAULT_DURATION_MS,
            ease: Ease::default(),
        }
    }

    pub fn validate(&self) -> NumrollResult<()> {
        if self.loop_count == 0 {
            return Err(NumrollError::validation("loop_count must be >= 1"));
        }
        if self.unit_delay_ms == 0 {
            return Err(NumrollError::validation("unit_delay_ms must be > 0"));
        }
        if self.duration_ms == 0 {
            return Err(NumrollError::validation("duration_ms must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_classification() {
        assert!(CharToken::of('7').is_digit());
        assert!(CharToken::of('万').is_word());
        assert!(CharToken::of(' ').is_blank());
        assert_eq!(CharToken::of('7').digit_value(), Some(7));
        assert_eq!(CharToken::of('万').digit_value(), None);
    }

    #[test]
    fn pair_text_reads_most_significant_first() {
        let pair = AlignedPair {
            from_seq: vec![CharToken::of('3'), CharToken::of('2'), CharToken::of('1')],
            to_seq: vec![CharToken::of('6'), CharToken::of('5'), CharToken::of('4')],
        };
        assert_eq!(pair.from_text(), "123");
        assert_eq!(pair.to_text(), "456");
    }

    #[test]
    fn scoreboard_implies_shortest_path() {
        assert_eq!(Mode::Scoreboard.implied_strategy(), Strategy::ShortestPath);
        assert_eq!(Mode::Calendar.implied_strategy(), Strategy::Natural);
        assert_eq!(
            ScrollConfig::for_mode(Mode::Scoreboard).strategy,
            Strategy::ShortestPath
        );
    }

    #[test]
    fn config_validation_rejects_zeroes() {
        let mut cfg = ScrollConfig::default();
        assert!(cfg.validate().is_ok());
        cfg.loop_count = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ScrollConfig::default();
        cfg.unit_delay_ms = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = ScrollConfig::default();
        cfg.duration_ms = 0;
        assert!(cfg.validate().is_err());
    }
}
