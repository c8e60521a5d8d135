use crate::counting::Segment;
use std::fmt;
use std::io::BufRead;
use std::num::IntErrorKind;
use thiserror::Error;

/// Which input table a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Motifs,
    Segments,
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Motifs => write!(f, "motif"),
            InputSource::Segments => write!(f, "segment"),
        }
    }
}

#[derive(Error, Debug)]
pub enum InputError {
    /// A field that must hold an integer coordinate does not.
    #[error("Malformed {table} record at line {record}: `{value}` is not an integer")]
    Malformed {
        table: InputSource,
        record: usize,
        value: String,
    },

    /// An integer field that does not fit a 64-bit coordinate.
    #[error("Malformed {table} record at line {record}: `{value}` is out of range for a 64-bit coordinate")]
    OutOfRange {
        table: InputSource,
        record: usize,
        value: String,
    },

    /// A record is too short to hold the requested column.
    #[error("Malformed {table} record at line {record}: expected at least {expected} fields, found {found}")]
    Shape {
        table: InputSource,
        record: usize,
        expected: usize,
        found: usize,
    },

    #[error("Error reading {table} line {record}: {err}")]
    Io {
        table: InputSource,
        record: usize,
        #[source]
        err: std::io::Error,
    },
}

/// How records are laid out in one input table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub delimiter: char,
    pub skip_header: bool,
}

impl TableLayout {
    pub const fn motifs() -> Self {
        Self {
            delimiter: '\t',
            skip_header: true,
        }
    }

    pub const fn segments() -> Self {
        Self {
            delimiter: '\t',
            skip_header: false,
        }
    }
}

pub const DEFAULT_MOTIF_COLUMN: usize = 1;
pub const DEFAULT_SEGMENT_START_COLUMN: usize = 1;
pub const DEFAULT_SEGMENT_END_COLUMN: usize = 2;

/// Column indices (0-based) of the segment bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentColumns {
    pub start: usize,
    pub end: usize,
}

impl Default for SegmentColumns {
    fn default() -> Self {
        Self {
            start: DEFAULT_SEGMENT_START_COLUMN,
            end: DEFAULT_SEGMENT_END_COLUMN,
        }
    }
}

fn parse_coordinate(
    table: InputSource,
    record: usize,
    raw: &str,
) -> std::result::Result<i64, InputError> {
    raw.trim().parse::<i64>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => InputError::OutOfRange {
            table,
            record,
            value: raw.to_string(),
        },
        _ => InputError::Malformed {
            table,
            record,
            value: raw.to_string(),
        },
    })
}

const NO_FIELDS: &[&str] = &[];

/// Walks the data lines of a table, yielding `(line_number, fields)`.
/// Line numbers are 1-based and count the discarded header.
///
/// Blank lines at the end of the table are ignored. A blank line followed by
/// more records is handed to `f` with no fields, so it fails as a short record.
fn for_each_record<R, F>(
    reader: R,
    table: InputSource,
    layout: TableLayout,
    mut f: F,
) -> std::result::Result<(), InputError>
where
    R: BufRead,
    F: FnMut(usize, &[&str]) -> std::result::Result<(), InputError>,
{
    let skip = usize::from(layout.skip_header);
    let mut first_blank: Option<usize> = None;
    for (line_index, line) in reader.lines().enumerate() {
        let record = line_index + 1;
        let line = line.map_err(|err| InputError::Io {
            table,
            record,
            err,
        })?;
        if line_index < skip {
            log::debug!("Discarding {} header: {}", table, line);
            continue;
        }
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            first_blank.get_or_insert(record);
            continue;
        }
        if let Some(blank) = first_blank {
            f(blank, NO_FIELDS)?;
        }
        let fields: Vec<&str> = line.split(layout.delimiter).collect();
        f(record, &fields)?;
    }
    if let Some(blank) = first_blank {
        log::debug!("Ignoring trailing blank {} lines from line {}", table, blank);
    }
    Ok(())
}

fn field<'a>(
    fields: &[&'a str],
    column: usize,
    expected: usize,
    table: InputSource,
    record: usize,
) -> std::result::Result<&'a str, InputError> {
    fields.get(column).copied().ok_or(InputError::Shape {
        table,
        record,
        expected,
        found: fields.len(),
    })
}

/// Reads the motif start coordinates from `column` of every data record.
pub fn read_motif_positions<R: BufRead>(
    reader: R,
    layout: TableLayout,
    column: usize,
) -> std::result::Result<Vec<i64>, InputError> {
    let table = InputSource::Motifs;
    let mut positions = Vec::new();
    for_each_record(reader, table, layout, |record, fields| {
        let raw = field(fields, column, column + 1, table, record)?;
        positions.push(parse_coordinate(table, record, raw)?);
        Ok(())
    })?;
    Ok(positions)
}

/// Reads segment bounds in file order.
pub fn read_segments<R: BufRead>(
    reader: R,
    layout: TableLayout,
    columns: SegmentColumns,
) -> std::result::Result<Vec<Segment>, InputError> {
    let table = InputSource::Segments;
    let expected = columns.start.max(columns.end) + 1;
    let mut segments = Vec::new();
    for_each_record(reader, table, layout, |record, fields| {
        let start = field(fields, columns.start, expected, table, record)?;
        let end = field(fields, columns.end, expected, table, record)?;
        segments.push(Segment::new(
            parse_coordinate(table, record, start)?,
            parse_coordinate(table, record, end)?,
        ));
        Ok(())
    })?;
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn read_motifs_discards_header() {
        let input = "name\tstart\nGATC\t150\nGATC\t1200\nGATC\t1200\n";
        let positions =
            read_motif_positions(Cursor::new(input), TableLayout::motifs(), DEFAULT_MOTIF_COLUMN)
                .unwrap();
        assert_eq!(positions, vec![150, 1200, 1200]);
    }

    #[test]
    fn read_segments_keeps_first_line() {
        let input = "chr\t0\t999\nchr\t1000\t1999\n";
        let segments = read_segments(
            Cursor::new(input),
            TableLayout::segments(),
            SegmentColumns::default(),
        )
        .unwrap();
        assert_eq!(segments, vec![Segment::new(0, 999), Segment::new(1000, 1999)]);
    }

    #[test]
    fn read_segments_with_header_flag() {
        let input = "chrom\tstart\tend\nchr\t0\t999\n";
        let layout = TableLayout {
            skip_header: true,
            ..TableLayout::segments()
        };
        let segments = read_segments(Cursor::new(input), layout, SegmentColumns::default()).unwrap();
        assert_eq!(segments, vec![Segment::new(0, 999)]);
    }

    #[test]
    fn read_tolerates_whitespace_and_crlf() {
        let input = "header\r\nm\t 42 \r\nm\t+7\r\n\r\n\n";
        let positions =
            read_motif_positions(Cursor::new(input), TableLayout::motifs(), DEFAULT_MOTIF_COLUMN)
                .unwrap();
        assert_eq!(positions, vec![42, 7]);
    }

    #[test]
    fn read_custom_delimiter_and_columns() {
        let input = "999,chr,0\n1999,chr,1000\n";
        let layout = TableLayout {
            delimiter: ',',
            skip_header: false,
        };
        let columns = SegmentColumns { start: 2, end: 0 };
        let segments = read_segments(Cursor::new(input), layout, columns).unwrap();
        assert_eq!(segments, vec![Segment::new(0, 999), Segment::new(1000, 1999)]);
    }

    #[test]
    fn malformed_motif_reports_record() {
        let input = "name\tstart\nGATC\t150\nGATC\tabc\n";
        let err =
            read_motif_positions(Cursor::new(input), TableLayout::motifs(), DEFAULT_MOTIF_COLUMN)
                .unwrap_err();
        match &err {
            InputError::Malformed {
                table,
                record,
                value,
            } => {
                assert_eq!(*table, InputSource::Motifs);
                assert_eq!(*record, 3);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(
            err.to_string(),
            "Malformed motif record at line 3: `abc` is not an integer"
        );
    }

    #[test]
    fn short_segment_record_is_shape_error() {
        let input = "chr\t0\t999\nchr\t1000\n";
        let err = read_segments(
            Cursor::new(input),
            TableLayout::segments(),
            SegmentColumns::default(),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed segment record at line 2: expected at least 3 fields, found 2"
        );
    }

    #[test]
    fn float_coordinate_is_malformed() {
        let input = "chr\t0\t99.5\n";
        let err = read_segments(
            Cursor::new(input),
            TableLayout::segments(),
            SegmentColumns::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InputError::Malformed {
                table: InputSource::Segments,
                record: 1,
                ..
            }
        ));
    }

    #[test]
    fn blank_line_between_records_is_shape_error() {
        let input = "name\tstart\nGATC\t150\n\nGATC\t1200\n";
        let err =
            read_motif_positions(Cursor::new(input), TableLayout::motifs(), DEFAULT_MOTIF_COLUMN)
                .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed motif record at line 3: expected at least 2 fields, found 0"
        );
    }

    #[test]
    fn trailing_blank_segment_lines_ignored() {
        let input = "chr\t0\t999\n\n  \n";
        let segments = read_segments(
            Cursor::new(input),
            TableLayout::segments(),
            SegmentColumns::default(),
        )
        .unwrap();
        assert_eq!(segments, vec![Segment::new(0, 999)]);
    }

    #[test]
    fn oversized_coordinate_is_out_of_range() {
        let input = "chr\t0\t99999999999999999999\n";
        let err = read_segments(
            Cursor::new(input),
            TableLayout::segments(),
            SegmentColumns::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            InputError::OutOfRange {
                table: InputSource::Segments,
                record: 1,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "Malformed segment record at line 1: `99999999999999999999` is out of range for a 64-bit coordinate"
        );
    }

    #[test]
    fn extreme_coordinates_parse() {
        let input = "chr\t-9223372036854775808\t9223372036854775807\n";
        let segments = read_segments(
            Cursor::new(input),
            TableLayout::segments(),
            SegmentColumns::default(),
        )
        .unwrap();
        assert_eq!(segments, vec![Segment::new(i64::MIN, i64::MAX)]);
    }
}
