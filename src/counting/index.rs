use super::Segment;
use rayon::prelude::*;

/// Motif start positions sorted once for logarithmic range counts.
#[derive(Debug, Clone, Default)]
pub struct MotifIndex {
    positions: Vec<i64>,
}

impl MotifIndex {
    pub fn new(mut positions: Vec<i64>) -> Self {
        positions.sort_unstable();
        Self { positions }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn first(&self) -> Option<i64> {
        self.positions.first().copied()
    }

    pub fn last(&self) -> Option<i64> {
        self.positions.last().copied()
    }

    pub fn positions(&self) -> &[i64] {
        &self.positions
    }

    /// Number of positions `p` with `segment.start <= p <= segment.end`.
    pub fn count(&self, segment: &Segment) -> usize {
        if segment.is_inverted() {
            return 0;
        }
        let lower = self.positions.partition_point(|&pos| pos < segment.start);
        let upper = self.positions.partition_point(|&pos| pos <= segment.end);
        upper - lower
    }

    pub fn count_all(&self, segments: &[Segment]) -> Vec<usize> {
        segments.iter().map(|segment| self.count(segment)).collect()
    }

    /// Same as [`MotifIndex::count_all`], spread across the pool's threads.
    /// Output order follows `segments`.
    pub fn par_count_all(&self, segments: &[Segment], pool: &rayon::ThreadPool) -> Vec<usize> {
        pool.install(|| {
            segments
                .par_iter()
                .map(|segment| self.count(segment))
                .collect()
        })
    }
}

pub fn count_sorted(motifs: &[i64], segments: &[Segment]) -> Vec<usize> {
    MotifIndex::new(motifs.to_vec()).count_all(segments)
}
