mod counts;
pub use counts::{CountsWriter, COUNTS_HEADER};
