use std::fmt;

/// A closed coordinate interval `[start, end]`.
///
/// Inverted segments (`start > end`) are representable and contain no
/// position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Segment {
    pub start: i64,
    pub end: i64,
}

impl Segment {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, position: i64) -> bool {
        position >= self.start && position <= self.end
    }

    pub fn overlaps(&self, other: &Segment) -> bool {
        !self.is_inverted()
            && !other.is_inverted()
            && self.start <= other.end
            && other.start <= self.end
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
