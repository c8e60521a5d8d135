mod readers;
mod tables;

pub use readers::{is_gzipped, open_table_reader};
pub use tables::{
    read_motif_positions, read_segments, InputError, InputSource, SegmentColumns, TableLayout,
    DEFAULT_MOTIF_COLUMN, DEFAULT_SEGMENT_END_COLUMN, DEFAULT_SEGMENT_START_COLUMN,
};

pub type Result<T> = std::result::Result<T, String>;

pub fn handle_error_and_exit(err: String) -> ! {
    log::error!("{}", err);
    std::process::exit(1);
}
