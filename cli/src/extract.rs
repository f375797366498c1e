use crate::logs::{self, LogFormat};
use anyhow::Context;
use flate2::write::GzEncoder;
use flate2::Compression;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};
use sparql_shapes::parser::QueryParser;
use sparql_shapes::schema::ConnectedComponent;
use sparql_shapes::ShapeAnalyzer;
use std::collections::hash_map::Entry;
use std::fs::{self, File};
use std::hash::BuildHasher;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Number of queries handed to the worker threads at once.
const BATCH_SIZE: usize = 4096;
const RECORD_SEPARATOR: &[u8] = b"###\n";

pub struct ExtractOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub log_format: LogFormat,
    pub max_parse_steps: Option<u64>,
    pub threads: Option<usize>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    pub files: usize,
    /// Queries found in the logs.
    pub records: usize,
    /// Log lines whose query is not valid percent-encoded UTF-8.
    pub undecodable: usize,
    pub parse_failures: usize,
    pub components: usize,
    /// Components written to the output, i.e. non-trivial ones not seen before.
    pub written: usize,
}

/// Reads every log file of `options.input` in name order and writes the shapes of their
/// queries to `options.output`.
pub fn extract(options: &ExtractOptions) -> anyhow::Result<ExtractSummary> {
    let files = log_files(&options.input)?;
    fs::create_dir_all(&options.output).with_context(|| {
        format!(
            "Failed to create the output folder {}",
            options.output.display()
        )
    })?;
    let pool = ThreadPoolBuilder::new()
        .num_threads(options.threads.unwrap_or(0))
        .build()
        .context("Failed to start the worker threads")?;
    let mut parser = QueryParser::new();
    if let Some(limit) = options.max_parse_steps {
        parser = parser.with_step_limit(limit);
    }

    let mut extractor = Extractor {
        parser,
        pool,
        output: &options.output,
        seen: FxHashSet::default(),
        writers: FxHashMap::default(),
        summary: ExtractSummary::default(),
    };
    for file in files {
        info!(file = %file.display(), "Processing log file");
        extractor.process_file(&file, options.log_format)?;
    }
    extractor.finish()
}

fn log_files(input: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(input)
        .with_context(|| format!("Failed to list the log folder {}", input.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

struct Extractor<'a> {
    parser: QueryParser,
    pool: ThreadPool,
    output: &'a Path,
    /// Hashes of the rendered components written so far.
    seen: FxHashSet<u64>,
    writers: FxHashMap<String, GzEncoder<BufWriter<File>>>,
    summary: ExtractSummary,
}

impl Extractor<'_> {
    fn process_file(&mut self, path: &Path, format: LogFormat) -> anyhow::Result<()> {
        let mut batch = Vec::with_capacity(BATCH_SIZE);
        for line in logs::open(path)?.split(b'\n') {
            let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
            let line = String::from_utf8_lossy(&line);
            match format.query(&line) {
                Ok(Some(query)) => batch.push(query),
                Ok(None) => (),
                Err(error) => {
                    self.summary.undecodable += 1;
                    warn!(%error, %line, "Failed to decode the query of a log line");
                }
            }
            if batch.len() == BATCH_SIZE {
                self.process_batch(&batch)?;
                batch.clear();
            }
        }
        self.process_batch(&batch)?;
        self.summary.files += 1;
        Ok(())
    }

    /// Analyzes the queries on the worker threads, then writes their components in input order.
    fn process_batch(&mut self, queries: &[String]) -> anyhow::Result<()> {
        let parser = &self.parser;
        let results = self.pool.install(|| {
            queries
                .par_iter()
                .map_init(
                    || ShapeAnalyzer::with_parser(parser.clone()),
                    |analyzer, query| analyzer.analyze(query),
                )
                .collect::<Vec<_>>()
        });
        for (query, result) in queries.iter().zip(results) {
            self.summary.records += 1;
            match result {
                Ok(components) => {
                    for component in components {
                        self.write(query, &component)?;
                    }
                }
                Err(error) => {
                    self.summary.parse_failures += 1;
                    warn!(%error, %query, "Failed to parse query");
                }
            }
        }
        Ok(())
    }

    fn write(&mut self, query: &str, component: &ConnectedComponent) -> anyhow::Result<()> {
        self.summary.components += 1;
        if component.is_trivial() {
            return Ok(());
        }
        let text = component.to_query();
        if !self.seen.insert(FxBuildHasher.hash_one(text.as_str())) {
            return Ok(());
        }
        debug!(%query, %component, "New query shape");

        let writer = match self.writers.entry(component.signature()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let path = self.output.join(format!("query_{}.gz", entry.key()));
                let file = File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                entry.insert(GzEncoder::new(BufWriter::new(file), Compression::default()))
            }
        };
        writer.write_all(text.as_bytes())?;
        writer.write_all(RECORD_SEPARATOR)?;
        self.summary.written += 1;
        Ok(())
    }

    fn finish(self) -> anyhow::Result<ExtractSummary> {
        for (signature, writer) in self.writers {
            let file = writer
                .finish()
                .and_then(|writer| writer.into_inner().map_err(io::IntoInnerError::into_error))
                .with_context(|| format!("Failed to close the output file of {signature}"))?;
            file.sync_all()?;
        }
        let summary = self.summary;
        info!(
            files = summary.files,
            records = summary.records,
            undecodable = summary.undecodable,
            parse_failures = summary.parse_failures,
            components = summary.components,
            written = summary.written,
            "Extraction finished"
        );
        Ok(summary)
    }
}
