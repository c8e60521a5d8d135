use super::{load_inputs, Inputs};
use crate::cli::ValidateArgs;
use crate::counting::{inverted_segments, MotifIndex, Segment};
use crate::utils::Result;
use itertools::Itertools;

pub fn validate(args: ValidateArgs) -> Result<()> {
    let Inputs { motifs, segments } = load_inputs(&args.input)?;
    let index = MotifIndex::new(motifs);

    let inverted = inverted_segments(&segments);
    for &i in &inverted {
        log::warn!("Malformed segment {}: start > end ({})", i + 1, segments[i]);
    }

    let adjacent_overlaps = segments
        .iter()
        .tuple_windows()
        .filter(|(a, b)| a.overlaps(b))
        .count();

    let widths: Vec<i128> = segments
        .iter()
        .filter(|s| !s.is_inverted())
        .map(segment_width)
        .collect();
    let width_stats = calculate_stats(&widths);

    let covered: usize = merge_segments(&segments)
        .iter()
        .map(|s| index.count(s))
        .sum();
    let uncovered = index.len() - covered;

    match (index.first(), index.last()) {
        (Some(first), Some(last)) => log::info!(
            "Motifs: {} positions in range [{},{}]",
            index.len(),
            first,
            last
        ),
        _ => log::info!("Motifs: none"),
    }
    log::info!(
        "Segments: {} (inverted={}, overlapping neighbours={})",
        segments.len(),
        inverted.len(),
        adjacent_overlaps
    );
    log::info!(
        "Segment widths - Range: [{},{}], Median: {:.2}, Mean: {:.2}, StdDev: {:.2}",
        width_stats.min,
        width_stats.max,
        width_stats.median,
        width_stats.mean,
        width_stats.std_dev
    );
    if uncovered > 0 {
        log::warn!("{} motif positions fall outside every segment", uncovered);
    }

    match inverted.len() {
        0 => log::info!("Validation successful. Segments pass={}", segments.len()),
        n => log::info!(
            "Validation finished with {} inverted of {} segments",
            n,
            segments.len()
        ),
    }

    Ok(())
}

/// Number of positions in a forward segment. Widened so that segments spanning
/// most of the `i64` range do not overflow.
fn segment_width(segment: &Segment) -> i128 {
    i128::from(segment.end) - i128::from(segment.start) + 1
}

/// Union of the forward segments as disjoint intervals sorted by start.
fn merge_segments(segments: &[Segment]) -> Vec<Segment> {
    let mut merged: Vec<Segment> = Vec::new();
    for segment in segments
        .iter()
        .filter(|s| !s.is_inverted())
        .sorted_by_key(|s| s.start)
    {
        if let Some(last) = merged.last_mut() {
            if segment.start <= last.end {
                last.end = last.end.max(segment.end);
                continue;
            }
        }
        merged.push(*segment);
    }
    merged
}

fn calculate_stats(data: &[i128]) -> Stats {
    if data.is_empty() {
        return Stats::default();
    }
    let mut sorted = data.to_vec();
    sorted.sort_unstable();
    let len = sorted.len();
    let median = if len % 2 == 0 {
        (sorted[len / 2 - 1] + sorted[len / 2]) as f64 / 2.0
    } else {
        sorted[len / 2] as f64
    };
    let sum: i128 = sorted.iter().sum();
    let mean = sum as f64 / len as f64;
    let std_dev = (sorted
        .iter()
        .map(|&x| (x as f64 - mean).powi(2))
        .sum::<f64>()
        / len as f64)
        .sqrt();
    Stats {
        min: sorted[0],
        max: sorted[len - 1],
        mean,
        median,
        std_dev,
    }
}

#[derive(Debug, Default)]
struct Stats {
    min: i128,
    max: i128,
    mean: f64,
    median: f64,
    std_dev: f64,
}
