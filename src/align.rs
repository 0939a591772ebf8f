//! Pairwise string alignment.
//!
//! Turns two arbitrary strings of different length and structure into two
//! equal-length, position-aligned token sequences, so that column `i` on the
//! from side and column `i` on the to side are the correct pair to animate
//! between. Alignment is group-wise: the digit run preceding each word span is
//! right-justified like decimal place values ('0' padding on the from side,
//! blank padding on the to side), then the word spans themselves are
//! right-justified against each other.
//!
//! [`align`] output is pre-punch: a blank target marks a column scheduled for
//! removal. [`punch_holes`] is the separate pass that drops those columns and
//! fills placeholder sources; the row driver always applies it before
//! assigning slots.

use crate::{
    group::{find_word_char, group_count, is_digit_char, word_run_len},
    model::{AlignedPair, CharToken},
};

#[derive(Default)]
struct Build {
    // most-significant-first while building
    from: Vec<CharToken>,
    to: Vec<CharToken>,
}

impl Build {
    fn finish(mut self) -> AlignedPair {
        debug_assert_eq!(self.from.len(), self.to.len());
        self.from.reverse();
        self.to.reverse();
        AlignedPair {
            from_seq: self.from,
            to_seq: self.to,
        }
    }

    /// Right-justifies two same-group runs: '0' fill on the from side, blank
    /// fill on the to side.
    fn push_numeric_group(&mut self, from_run: &[char], to_run: &[char]) {
        let width = from_run.len().max(to_run.len());
        for _ in from_run.len()..width {
            self.from.push(CharToken::digit('0'));
        }
        self.from.extend(from_run.iter().map(|&c| CharToken::of(c)));
        for _ in to_run.len()..width {
            self.to.push(CharToken::blank());
        }
        self.to.extend(to_run.iter().map(|&c| CharToken::of(c)));
    }

    /// Right-justifies two word runs with blank fill on both sides.
    fn push_word_group(&mut self, from_run: &[char], to_run: &[char]) {
        let width = from_run.len().max(to_run.len());
        for _ in from_run.len()..width {
            self.from.push(CharToken::blank());
        }
        self.from.extend(from_run.iter().map(|&c| CharToken::of(c)));
        for _ in to_run.len()..width {
            self.to.push(CharToken::blank());
        }
        self.to.extend(to_run.iter().map(|&c| CharToken::of(c)));
    }

    /// Synthesizes the missing side when exactly one run is empty: a '0'
    /// opposite every digit and a blank opposite every word character when the
    /// from side is missing, all blanks (forced removal) when the to side is.
    fn push_one_sided(&mut self, from_run: &[char], to_run: &[char]) {
        if from_run.is_empty() {
            for &c in to_run {
                self.from.push(if is_digit_char(c) {
                    CharToken::digit('0')
                } else {
                    CharToken::blank()
                });
                self.to.push(CharToken::of(c));
            }
        } else {
            for &c in from_run {
                self.from.push(CharToken::of(c));
                self.to.push(CharToken::blank());
            }
        }
    }

    /// Folds whatever remains after the group walk into one final group.
    fn push_trailing(&mut self, from_rem: &[char], to_rem: &[char]) {
        match (from_rem.is_empty(), to_rem.is_empty()) {
            (true, true) => {}
            (false, false) => self.push_numeric_group(from_rem, to_rem),
            _ => self.push_one_sided(from_rem, to_rem),
        }
    }
}

/// Aligns `from` and `to` by alternating digit/word groups.
///
/// Empty or absent inputs short-circuit: both empty yields an empty pair; a
/// missing from side is synthesized with default digits so new columns count
/// up from zero; a missing to side is synthesized as blanks so existing
/// columns animate away.
#[tracing::instrument]
pub fn align(from: Option<&str>, to: Option<&str>) -> AlignedPair {
    let f: Vec<char> = from.unwrap_or("").chars().collect();
    let t: Vec<char> = to.unwrap_or("").chars().collect();
    if f.is_empty() && t.is_empty() {
        return AlignedPair::default();
    }

    let mut b = Build::default();
    if f.is_empty() || t.is_empty() {
        b.push_trailing(&f, &t);
        return b.finish();
    }

    let groups = group_count(&f).min(group_count(&t));
    let mut cf = 0;
    let mut ct = 0;
    for _ in 0..groups {
        let wf = find_word_char(&f, cf);
        let wt = find_word_char(&t, ct);
        if wf.is_none() && wt.is_none() {
            // Only digits remain on both sides; the trailing pass takes it.
            break;
        }
        let iwf = wf.unwrap_or(f.len());
        let iwt = wt.unwrap_or(t.len());
        b.push_numeric_group(&f[cf..iwf], &t[ct..iwt]);

        let lf = word_run_len(&f, iwf);
        let lt = word_run_len(&t, iwt);
        b.push_word_group(&f[iwf..iwf + lf], &t[iwt..iwt + lt]);
        cf = iwf + lf;
        ct = iwt + lt;
    }
    b.push_trailing(&f[cf..], &t[ct..]);

    let pair = b.finish();
    tracing::debug!(
        from = %pair.from_text(),
        to = %pair.to_text(),
        len = pair.len(),
        "aligned by character groups"
    );
    pair
}

/// Aligns by a descending unit hierarchy (e.g. `['兆', '亿', '万']`) instead
/// of by character groups, so that distinct unit characters always occupy
/// distinct columns.
///
/// For each unit present on either side, the digit runs preceding it are
/// right-justified; a side missing the unit gets '0' fill plus the unit glyph
/// itself (a stable column) on the from side, or all blanks (column removal)
/// on the to side. Remainders fold through the same trailing pass as
/// [`align`].
#[tracing::instrument]
pub fn align_with_units(from: Option<&str>, to: Option<&str>, units: &[char]) -> AlignedPair {
    let f: Vec<char> = from.unwrap_or("").chars().collect();
    let t: Vec<char> = to.unwrap_or("").chars().collect();
    if f.is_empty() && t.is_empty() {
        return AlignedPair::default();
    }

    let mut b = Build::default();
    if f.is_empty() || t.is_empty() {
        b.push_trailing(&f, &t);
        return b.finish();
    }

    let mut cf = 0;
    let mut ct = 0;
    for &unit in units {
        let pf = f[cf..].iter().position(|&c| c == unit).map(|i| i + cf);
        let pt = t[ct..].iter().position(|&c| c == unit).map(|i| i + ct);
        if pf.is_none() && pt.is_none() {
            continue;
        }

        let from_run = pf.map_or(&f[cf..cf], |p| &f[cf..p]);
        let to_run = pt.map_or(&t[ct..ct], |p| &t[ct..p]);
        let width = from_run.len().max(to_run.len());

        for _ in from_run.len()..width {
            b.from.push(CharToken::digit('0'));
        }
        b.from.extend(from_run.iter().map(|&c| CharToken::of(c)));
        b.from.push(CharToken::word(unit));

        if pt.is_some() {
            for _ in to_run.len()..width {
                b.to.push(CharToken::blank());
            }
            b.to.extend(to_run.iter().map(|&c| CharToken::of(c)));
            b.to.push(CharToken::word(unit));
        } else {
            // The whole group, unit column included, goes away.
            for _ in 0..width + 1 {
                b.to.push(CharToken::blank());
            }
        }

        if let Some(p) = pf {
            cf = p + 1;
        }
        if let Some(p) = pt {
            ct = p + 1;
        }
    }
    b.push_trailing(&f[cf..], &t[ct..]);

    let pair = b.finish();
    tracing::debug!(
        from = %pair.from_text(),
        to = %pair.to_text(),
        len = pair.len(),
        "aligned by unit hierarchy"
    );
    pair
}

/// Deletes every column whose target is blank and fills placeholder sources:
/// a digit target over a blank source becomes a '0' source (so the column
/// counts up from zero), a word target over a blank source copies the target
/// glyph (a stable column).
pub fn punch_holes(pair: &AlignedPair) -> AlignedPair {
    let mut out = AlignedPair::default();
    for (f, t) in pair.from_seq.iter().zip(&pair.to_seq) {
        if t.is_blank() {
            continue;
        }
        let from = if f.is_blank() {
            if t.is_digit() {
                CharToken::digit('0')
            } else {
                *t
            }
        } else {
            *f
        };
        out.from_seq.push(from);
        out.to_seq.push(*t);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TokenKind;

    #[test]
    fn empty_pair_is_degenerate() {
        assert!(align(None, None).is_empty());
        assert!(align(Some(""), Some("")).is_empty());
    }

    #[test]
    fn sides_always_have_equal_length() {
        let cases = [
            (Some("10万"), Some("1亿300")),
            (Some("123"), Some("3")),
            (Some("9"), Some("10000")),
            (None, Some("42万")),
            (Some("42万"), None),
            (Some("1a2b3"), Some("x9")),
        ];
        for (from, to) in cases {
            let pair = align(from, to);
            assert_eq!(pair.from_seq.len(), pair.to_seq.len());
            let punched = punch_holes(&pair);
            assert_eq!(punched.from_seq.len(), punched.to_seq.len());
        }
    }

    #[test]
    fn align_is_pure() {
        let a = align(Some("10万"), Some("1亿300"));
        let b = align(Some("10万"), Some("1亿300"));
        assert_eq!(a, b);
    }

    #[test]
    fn group_walk_faces_word_spans() {
        let pair = align(Some("10万"), Some("1亿300"));
        assert_eq!(pair.from_text(), "10万000");
        assert_eq!(pair.to_text(), " 1亿300");

        let punched = punch_holes(&pair);
        assert_eq!(punched.from_text(), "0万000");
        assert_eq!(punched.to_text(), "1亿300");
    }

    #[test]
    fn missing_to_side_becomes_blanks() {
        let pair = align(Some("000000000"), None);
        assert_eq!(pair.len(), 9);
        assert!(pair.to_seq.iter().all(|t| t.is_blank()));
        assert_eq!(pair.from_text(), "000000000");
        assert!(punch_holes(&pair).is_empty());
    }

    #[test]
    fn missing_from_side_counts_up_from_zero() {
        let pair = align(None, Some("4万2"));
        assert_eq!(pair.from_text(), "0 0");
        assert_eq!(pair.to_text(), "4万2");

        let punched = punch_holes(&pair);
        assert_eq!(punched.from_text(), "0万0");
        assert_eq!(punched.to_text(), "4万2");
    }

    #[test]
    fn all_digit_pair_right_justifies() {
        let pair = align(Some("123"), Some("3"));
        assert_eq!(pair.from_text(), "123");
        assert_eq!(pair.to_text(), "  3");

        let punched = punch_holes(&pair);
        assert_eq!(punched.from_text(), "3");
        assert_eq!(punched.to_text(), "3");
    }

    #[test]
    fn punch_leaves_no_blank_targets() {
        let cases = [
            (Some("10万"), Some("1亿300")),
            (Some("987654"), Some("1")),
            (None, Some("7亿")),
            (Some("1a"), Some("22bb33")),
        ];
        for (from, to) in cases {
            let punched = punch_holes(&align(from, to));
            assert!(punched.to_seq.iter().all(|t| !t.is_blank()));
            for (f, t) in punched.from_seq.iter().zip(&punched.to_seq) {
                if t.kind == TokenKind::Digit {
                    assert_eq!(f.kind, TokenKind::Digit);
                }
            }
        }
    }

    #[test]
    fn unit_walk_keeps_units_in_distinct_columns() {
        let units = ['兆', '亿', '万'];
        let pair = align_with_units(Some("10万"), Some("1亿300"), &units);
        assert_eq!(pair.from_text(), "0亿10万000");
        assert_eq!(pair.to_text(), "1亿   300");

        // 万 and 亿 never share a column.
        for (f, t) in pair.from_seq.iter().zip(&pair.to_seq) {
            if f.is_word() && t.is_word() {
                assert_eq!(f.ch, t.ch);
            }
        }

        let punched = punch_holes(&pair);
        assert_eq!(punched.from_text(), "0亿000");
        assert_eq!(punched.to_text(), "1亿300");
    }

    #[test]
    fn unit_walk_degenerates_like_group_walk() {
        let units = ['兆', '亿', '万'];
        assert!(align_with_units(None, None, &units).is_empty());
        let pair = align_with_units(Some("250"), Some("31"), &units);
        assert_eq!(pair.from_text(), "250");
        assert_eq!(pair.to_text(), " 31");
    }
}
