pub mod count;
pub mod validate;

use crate::cli::InputArgs;
use crate::counting::Segment;
use crate::utils::{
    open_table_reader, read_motif_positions, read_segments, Result, SegmentColumns, TableLayout,
};

/// Motif positions and segments parsed from the input tables.
pub struct Inputs {
    pub motifs: Vec<i64>,
    pub segments: Vec<Segment>,
}

pub fn load_inputs(args: &InputArgs) -> Result<Inputs> {
    let motif_layout = TableLayout {
        delimiter: args.delimiter,
        ..TableLayout::motifs()
    };
    let segment_layout = TableLayout {
        delimiter: args.delimiter,
        skip_header: args.segments_header,
    };
    let columns = SegmentColumns {
        start: args.segment_start_column,
        end: args.segment_end_column,
    };

    let reader = open_table_reader(&args.motifs_path)?;
    let motifs = read_motif_positions(reader, motif_layout, args.motif_column)
        .map_err(|e| format!("{}: {}", args.motifs_path.display(), e))?;
    log::info!(
        "Loaded {} motif positions from {}",
        motifs.len(),
        args.motifs_path.display()
    );

    let reader = open_table_reader(&args.segments_path)?;
    let segments = read_segments(reader, segment_layout, columns)
        .map_err(|e| format!("{}: {}", args.segments_path.display(), e))?;
    log::info!(
        "Loaded {} segments from {}",
        segments.len(),
        args.segments_path.display()
    );

    Ok(Inputs { motifs, segments })
}
