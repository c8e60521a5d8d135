use super::{load_inputs, Inputs};
use crate::cli::CountArgs;
use crate::counting::{count_motifs, inverted_segments, Algorithm, Segment};
use crate::utils::Result;
use crate::writers::CountsWriter;
use rayon::ThreadPoolBuilder;
use std::time::Instant;

pub fn count(args: CountArgs) -> Result<()> {
    let Inputs { motifs, segments } = load_inputs(&args.input)?;

    warn_inverted_segments(&segments);

    let pool = if args.num_threads > 1 && args.algorithm == Algorithm::Sorted {
        log::debug!(
            "Initializing thread pool with {} threads...",
            args.num_threads
        );
        Some(initialize_thread_pool(args.num_threads)?)
    } else {
        None
    };

    let start_timer = Instant::now();
    let counts = count_motifs(motifs, &segments, args.algorithm, pool.as_ref());
    log::debug!(
        "Counted {} segments with {:?} algorithm in {:.2?}",
        counts.len(),
        args.algorithm,
        start_timer.elapsed()
    );

    let mut writer = CountsWriter::new(&args.output_path)?;
    writer.write_all(&counts)?;
    let written = writer.commit()?;
    log::info!(
        "Wrote {} segment counts to {}",
        written,
        args.output_path.display()
    );
    Ok(())
}

/// Logs one warning per inverted segment and returns how many were found.
fn warn_inverted_segments(segments: &[Segment]) -> usize {
    let inverted = inverted_segments(segments);
    for &index in &inverted {
        log::warn!("{}", inverted_segment_message(index, &segments[index]));
    }
    inverted.len()
}

fn inverted_segment_message(index: usize, segment: &Segment) -> String {
    format!(
        "Malformed segment {} (start {} > end {}) counts zero",
        index + 1,
        segment.start,
        segment.end
    )
}

fn initialize_thread_pool(num_threads: usize) -> Result<rayon::ThreadPool> {
    ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .thread_name(|i| format!("segcount-{}", i))
        .build()
        .map_err(|e| format!("Failed to initialize thread pool: {}", e))
}
