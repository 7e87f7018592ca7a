use std::ops::RangeInclusive;

use crate::error::{MergeError, Result};

/// Digits in the zero-padded form of a part index.
pub const DEFAULT_PART_INDEX_WIDTH: usize = 2;

/// One fetchable piece of a split asset, identified by one or more candidate names that are
/// all expected to hold the same bytes.  Candidates are tried in order; the list is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    candidates: Vec<String>,
}

impl Segment {
    pub fn new(candidates: Vec<String>) -> Result<Self> {
        if candidates.is_empty() {
            return Err(MergeError::EmptySegment);
        }
        Ok(Self { candidates })
    }

    pub fn single(name: impl Into<String>) -> Self {
        Self {
            candidates: vec![name.into()],
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// The highest priority candidate; this is the name reported when the segment cannot be found.
    pub fn primary(&self) -> &str {
        &self.candidates[0]
    }
}

/// The candidate names for part `index` of `file`: `<file>.part<index>` followed by the
/// `width`-digit zero-padded form, or just the one name if both forms are identical.
pub fn segment_candidates(file: &str, index: usize, width: usize) -> Segment {
    let plain = format!("{file}.part{index}");
    let padded = format!("{file}.part{index:0width$}");

    if plain == padded {
        Segment::single(plain)
    } else {
        Segment {
            candidates: vec![plain, padded],
        }
    }
}

/// The segments of `file` for the inclusive part range `[start, end]`, using two-digit padding.
pub fn part_segments(file: &str, start: usize, end: usize) -> Vec<Segment> {
    part_segments_with_width(file, start..=end, DEFAULT_PART_INDEX_WIDTH)
}

pub fn part_segments_with_width(file: &str, range: RangeInclusive<usize>, width: usize) -> Vec<Segment> {
    range.map(|index| segment_candidates(file, index, width)).collect()
}
