use crate::logs::LogFormat;
use clap::{Parser, Subcommand, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "sparql-shapes")]
/// Groups the SPARQL queries of server logs by the shape of their graph patterns
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract the query shapes of a folder of log files
    ///
    /// Every connected component of more than one triple is written once, to the file
    /// `query_<complexity>.gz` of the output folder.
    Extract {
        /// Folder with the log files
        ///
        /// Files ending in `.gz` or `.bz2` are decompressed.
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        input: PathBuf,
        /// Folder to write the query shapes to
        ///
        /// It is created if it does not exist.
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output: PathBuf,
        /// The format of the log lines
        #[arg(long, value_enum, ignore_case = true, default_value_t = LogFormat::Tomcat)]
        log_format: LogFormat,
        /// Give up on a query after this many grammar rule attempts
        ///
        /// By default queries are parsed without limit.
        #[arg(long)]
        max_parse_steps: Option<u64>,
        /// Number of threads analyzing queries
        ///
        /// By default one thread per core is used.
        #[arg(long)]
        threads: Option<usize>,
    },
    /// Print the connected components of a single query
    Analyze {
        /// File with the query
        ///
        /// If no file is given, stdin is read.
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Give up on the query after this many grammar rule attempts
        #[arg(long)]
        max_parse_steps: Option<u64>,
    },
}
