use super::Segment;

/// Reference count: scans every motif for every segment.
pub fn count_naive(motifs: &[i64], segments: &[Segment]) -> Vec<usize> {
    segments
        .iter()
        .map(|segment| motifs.iter().filter(|&&pos| segment.contains(pos)).count())
        .collect()
}
