//! Motif-per-segment counting.
//!
//! A motif is counted in a segment when its start coordinate lies within the
//! segment's closed bounds. Every segment is counted independently, so a motif
//! inside two overlapping segments contributes to both.

mod index;
mod naive;
mod segment;

pub use index::{count_sorted, MotifIndex};
pub use naive::count_naive;
pub use segment::Segment;

use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Algorithm {
    /// Scan every motif for every segment
    Naive,
    /// Sort motifs once and binary-search each segment
    Sorted,
}

/// Counts motifs per segment, in segment order.
///
/// `pool` is only used by [`Algorithm::Sorted`]; the naive scan always runs
/// on the calling thread.
pub fn count_motifs(
    motifs: Vec<i64>,
    segments: &[Segment],
    algorithm: Algorithm,
    pool: Option<&rayon::ThreadPool>,
) -> Vec<usize> {
    match algorithm {
        Algorithm::Naive => count_naive(&motifs, segments),
        Algorithm::Sorted => {
            let index = MotifIndex::new(motifs);
            match pool {
                Some(pool) => index.par_count_all(segments, pool),
                None => index.count_all(segments),
            }
        }
    }
}

/// Indices of inverted segments (start > end), which always count zero.
pub fn inverted_segments(segments: &[Segment]) -> Vec<usize> {
    segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| segment.is_inverted())
        .map(|(i, _)| i)
        .collect()
}
