use crate::counting::Algorithm;
use crate::utils::{
    Result, DEFAULT_MOTIF_COLUMN, DEFAULT_SEGMENT_END_COLUMN, DEFAULT_SEGMENT_START_COLUMN,
};
use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};
use env_logger::fmt::Color;
use log::{Level, LevelFilter};
use once_cell::sync::Lazy;
use std::{
    io::Write,
    path::{Path, PathBuf},
};

pub static FULL_VERSION: Lazy<String> = Lazy::new(|| {
    format!(
        "{}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    )
});

#[derive(Parser)]
#[command(name="segcount",
          version=&**FULL_VERSION,
          about="Count motif start positions per genomic segment",
          long_about = None,
          disable_help_subcommand = true,
          help_template = "{name} {version}\n{about-section}\n{usage-heading}\n    {usage}\n\n{all-args}{after-help}",
          )]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(short = 'v')]
    #[clap(long = "verbose")]
    #[clap(action = ArgAction::Count, help = "Specify multiple times to increase verbosity level (e.g., -vv for more verbosity)")]
    pub verbosity: u8,
}

#[derive(Subcommand)]
pub enum Command {
    #[clap(about = "Count motifs within each segment")]
    Count(CountArgs),
    #[clap(about = "Check motif and segment tables without writing counts")]
    Validate(ValidateArgs),
}

/// Input tables and how to read them; shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    #[clap(required = true)]
    #[clap(short = 'm')]
    #[clap(long = "motifs")]
    #[clap(help = "Table of motif occurrences; the first line is a header")]
    #[clap(value_name = "MOTIFS")]
    #[arg(value_parser = check_file_exists)]
    pub motifs_path: PathBuf,

    #[clap(required = true)]
    #[clap(short = 's')]
    #[clap(long = "segments")]
    #[clap(help = "Table of segment intervals")]
    #[clap(value_name = "SEGMENTS")]
    #[arg(value_parser = check_file_exists)]
    pub segments_path: PathBuf,

    #[clap(help_heading("Input format"))]
    #[clap(long = "delimiter")]
    #[clap(value_name = "CHAR")]
    #[clap(help = "Field delimiter of both tables (\\t for tab)")]
    #[clap(default_value = "\\t")]
    #[arg(value_parser = parse_delimiter)]
    pub delimiter: char,

    #[clap(help_heading("Input format"))]
    #[clap(long = "motif-column")]
    #[clap(value_name = "INDEX")]
    #[clap(help = "0-based column holding the motif start")]
    #[clap(default_value_t = DEFAULT_MOTIF_COLUMN)]
    pub motif_column: usize,

    #[clap(help_heading("Input format"))]
    #[clap(long = "segment-start-column")]
    #[clap(value_name = "INDEX")]
    #[clap(help = "0-based column holding the segment start")]
    #[clap(default_value_t = DEFAULT_SEGMENT_START_COLUMN)]
    pub segment_start_column: usize,

    #[clap(help_heading("Input format"))]
    #[clap(long = "segment-end-column")]
    #[clap(value_name = "INDEX")]
    #[clap(help = "0-based column holding the segment end")]
    #[clap(default_value_t = DEFAULT_SEGMENT_END_COLUMN)]
    pub segment_end_column: usize,

    #[clap(help_heading("Input format"))]
    #[clap(long = "segments-header")]
    #[clap(help = "Discard the first line of the segment table")]
    pub segments_header: bool,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("count")))]
#[command(arg_required_else_help(true))]
pub struct CountArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[clap(required = true)]
    #[clap(short = 'o')]
    #[clap(long = "output")]
    #[clap(help = "Output counts table (gzip-compressed when ending in .gz)")]
    #[clap(value_name = "OUTPUT")]
    #[arg(value_parser = check_prefix_path)]
    pub output_path: PathBuf,

    #[clap(short = 't')]
    #[clap(long = "threads")]
    #[clap(help = "Number of threads")]
    #[clap(value_name = "THREADS")]
    #[clap(default_value = "1")]
    #[arg(value_parser = threads_in_range)]
    pub num_threads: usize,

    #[clap(help_heading("Advanced"))]
    #[clap(long = "algorithm")]
    #[clap(value_name = "ALGORITHM")]
    #[clap(help = "Counting algorithm")]
    #[clap(value_enum, default_value_t = Algorithm::Sorted)]
    pub algorithm: Algorithm,
}

#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("validate")))]
#[command(arg_required_else_help(true))]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub fn init_verbose(args: &Cli) {
    let filter_level: LevelFilter = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    env_logger::Builder::from_default_env()
        .format(|buf, record| {
            let level = record.level();
            let mut style = buf.style();
            match record.level() {
                Level::Error => style.set_color(Color::Red),
                Level::Warn => style.set_color(Color::Yellow),
                Level::Info => style.set_color(Color::Green),
                Level::Debug => style.set_color(Color::Blue),
                Level::Trace => style.set_color(Color::Cyan),
            };

            writeln!(
                buf,
                "{} [{}] - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                style.value(level),
                record.args()
            )
        })
        .filter_level(filter_level)
        .init();
}

fn check_prefix_path(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if let Some(parent_dir) = path.parent() {
        if !parent_dir.as_os_str().is_empty() && !parent_dir.exists() {
            return Err(format!("Path does not exist: {}", parent_dir.display()));
        }
    }
    if path.is_dir() {
        return Err(format!("Output path is a directory: {}", path.display()));
    }
    Ok(path.to_path_buf())
}

fn threads_in_range(s: &str) -> Result<usize> {
    let thread: usize = s
        .parse()
        .map_err(|_| format!("`{}` is not a valid thread number", s))?;
    if thread >= 1 {
        Ok(thread)
    } else {
        Err("Number of threads must be at least 1".into())
    }
}

fn check_file_exists(s: &str) -> Result<PathBuf> {
    let path = Path::new(s);
    if !path.exists() {
        Err(format!("File does not exist: {}", path.display()))
    } else {
        Ok(path.to_path_buf())
    }
}

fn parse_delimiter(s: &str) -> Result<char> {
    match s {
        "\\t" | "tab" => Ok('\t'),
        _ => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("Delimiter must be a single character, got `{}`", s)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_delimiter_variants() {
        assert_eq!(parse_delimiter("\\t"), Ok('\t'));
        assert_eq!(parse_delimiter("tab"), Ok('\t'));
        assert_eq!(parse_delimiter(","), Ok(','));
        assert_eq!(parse_delimiter("\t"), Ok('\t'));
        assert!(parse_delimiter(",,").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn threads_must_be_positive() {
        assert_eq!(threads_in_range("4"), Ok(4));
        assert_eq!(
            threads_in_range("0"),
            Err("Number of threads must be at least 1".to_string())
        );
        assert!(threads_in_range("four").is_err());
    }

    #[test]
    fn output_parent_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let ok = dir.path().join("counts.tsv");
        assert_eq!(check_prefix_path(ok.to_str().unwrap()), Ok(ok.clone()));
        let missing = dir.path().join("nope").join("counts.tsv");
        assert!(check_prefix_path(missing.to_str().unwrap()).is_err());
        assert!(check_prefix_path(dir.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn parse_count_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let motifs = dir.path().join("motifs.tsv");
        let segments = dir.path().join("segments.tsv");
        std::fs::write(&motifs, "h\n").unwrap();
        std::fs::write(&segments, "").unwrap();
        let output = dir.path().join("out.tsv");

        let cli = Cli::try_parse_from([
            "segcount",
            "count",
            "-m",
            motifs.to_str().unwrap(),
            "-s",
            segments.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
        ])
        .unwrap();
        match cli.command {
            Command::Count(args) => {
                assert_eq!(args.input.delimiter, '\t');
                assert_eq!(args.input.motif_column, 1);
                assert_eq!(args.input.segment_start_column, 1);
                assert_eq!(args.input.segment_end_column, 2);
                assert!(!args.input.segments_header);
                assert_eq!(args.num_threads, 1);
                assert_eq!(args.algorithm, Algorithm::Sorted);
            }
            Command::Validate(_) => panic!("expected count subcommand"),
        }
    }
}
