// Copyright (c) 2024 Mike Tsao

//! Mines repeated subsequences out of the performer's recent notes.

use super::{MotifPool, Neutrals};
use crate::types::{Axis, Motif, Note};
use rustc_hash::FxHashMap;

/// Where the winning repeat lives in the examined sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Repeat {
    /// Index of the repeat's first occurrence.
    pub start: usize,
    /// Number of notes in the repeat.
    pub len: usize,
    /// How many times it occurs, overlapping occurrences included.
    pub count: usize,
}

/// Finds the longest contiguous run that appears at least twice in `values`.
///
/// Window lengths are tried from `len / 2` down to 2, and the first length
/// with any repeated window wins. Within that length the most frequent window
/// wins, and equally frequent windows are decided by whichever appeared
/// first. Fewer than four values can't contain a qualifying repeat.
pub fn find_longest_repeat(values: &[i64]) -> Option<Repeat> {
    for len in (2..=values.len() / 2).rev() {
        // window -> (count, first index)
        let mut counts: FxHashMap<&[i64], (usize, usize)> = FxHashMap::default();
        for (start, window) in values.windows(len).enumerate() {
            counts
                .entry(window)
                .and_modify(|(count, _)| *count += 1)
                .or_insert((1, start));
        }
        let best = counts
            .values()
            .filter(|(count, _)| *count > 1)
            .min_by(|(count_a, start_a), (count_b, start_b)| {
                count_b.cmp(count_a).then(start_a.cmp(start_b))
            });
        if let Some(&(count, start)) = best {
            return Some(Repeat { start, len, count });
        }
    }
    None
}

/// Looks for a new motif along `axis` in `history`.
///
/// The result is rebuilt from the first occurrence's full notes, with the
/// other axis neutralized. If the pool already holds the same idea, nothing is
/// returned. The pool is only read; the caller decides whether to insert.
pub fn detect(history: &[Note], axis: Axis, pool: &MotifPool, neutrals: &Neutrals) -> Option<Motif> {
    let values: Vec<i64> = history.iter().map(|n| n.axis_value(axis)).collect();
    let repeat = find_longest_repeat(&values)?;
    let notes = history[repeat.start..repeat.start + repeat.len]
        .iter()
        .map(|n| neutrals.neutralize(n, axis))
        .collect();
    let motif = Motif::new_with(axis, notes).ok()?;
    if pool.contains(&motif) {
        None
    } else {
        Some(motif)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Normal, Timbre};

    fn pitches(keys: &[u8]) -> Vec<Note> {
        keys.iter()
            .map(|k| Note::new_with(*k, 500, Normal::maximum(), Timbre::default()))
            .collect()
    }

    #[test]
    fn prefers_the_longest_repeat() {
        let r = find_longest_repeat(&[1, 2, 1, 2, 1, 2]).unwrap();
        assert_eq!(r.len, 3);
        // (1,2,1) and (2,1,2) both occur twice; (1,2,1) came first.
        assert_eq!(r.start, 0);
        assert_eq!(r.count, 2);
    }

    #[test]
    fn prefers_frequency_within_a_length() {
        let r = find_longest_repeat(&[5, 6, 7, 8, 5, 6, 7, 8, 9, 7, 8]).unwrap();
        assert_eq!(r.len, 4);

        // Nothing repeats at length 3. At length 2, (5,6) appears twice and
        // (7,8) three times.
        let r = find_longest_repeat(&[5, 6, 1, 7, 8, 5, 6, 7, 8, 2, 7, 8]).unwrap();
        assert_eq!(r.len, 2);
        assert_eq!(r.start, 3);
        assert_eq!(r.count, 3);
    }

    #[test]
    fn nothing_in_short_or_unrepetitive_input() {
        assert!(find_longest_repeat(&[]).is_none());
        assert!(find_longest_repeat(&[1, 1, 1]).is_none());
        assert!(find_longest_repeat(&[1, 2, 3, 4, 5, 6]).is_none());
        // Four values is the shortest input that can work.
        assert_eq!(find_longest_repeat(&[3, 3, 3, 3]).map(|r| r.len), Some(2));
    }

    #[test]
    fn detect_materializes_full_notes() {
        let pool = MotifPool::new_with(Axis::Pitch, 8);
        let neutrals = Neutrals::default();
        let history: Vec<Note> = pitches(&[60, 62, 60, 62, 60, 62])
            .into_iter()
            .map(|n| n.with_duration_ms(1500))
            .collect();

        let motif = detect(&history, Axis::Pitch, &pool, &neutrals).unwrap();
        assert_eq!(motif.axis(), Axis::Pitch);
        assert_eq!(motif.len(), 3);
        let keys: Vec<u8> = motif.notes().iter().map(|n| n.pitch()).collect();
        assert_eq!(keys, vec![60, 62, 60]);
        assert!(motif.notes().iter().all(|n| n.duration_ms() == 500));
    }

    #[test]
    fn detect_on_the_duration_axis() {
        let pool = MotifPool::new_with(Axis::Duration, 8);
        let neutrals = Neutrals::default();
        let history: Vec<Note> = pitches(&[60, 61, 62, 63, 64, 65])
            .into_iter()
            .zip([500, 1000, 500, 1000, 2000, 2000])
            .map(|(n, d)| n.with_duration_ms(d))
            .collect();

        let motif = detect(&history, Axis::Duration, &pool, &neutrals).unwrap();
        assert_eq!(motif.key(), vec![500, 1000]);
        assert!(motif.notes().iter().all(|n| n.pitch() == neutrals.pitch));
    }

    #[test]
    fn detect_twice_yields_nothing_new() {
        let mut pool = MotifPool::new_with(Axis::Pitch, 8);
        let neutrals = Neutrals::default();
        let history = pitches(&[1, 2, 1, 2, 1, 2]);

        let first = detect(&history, Axis::Pitch, &pool, &neutrals).unwrap();
        assert!(pool.insert(first));
        assert!(detect(&history, Axis::Pitch, &pool, &neutrals).is_none());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn detect_needs_four_notes() {
        let pool = MotifPool::new_with(Axis::Pitch, 8);
        assert!(detect(&pitches(&[1, 1, 1]), Axis::Pitch, &pool, &Neutrals::default()).is_none());
    }
}
