use crate::cli::{Args, Command};
use crate::extract::{extract, ExtractOptions};
use anyhow::Context;
use clap::Parser;
use sparql_shapes::parser::QueryParser;
use sparql_shapes::ShapeAnalyzer;
use std::fs;
use std::io::{self, stdin, stdout, Write};
use tracing_subscriber::EnvFilter;

mod cli;
mod extract;
mod logs;

pub fn main() -> anyhow::Result<()> {
    let matches = Args::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    match matches.command {
        Command::Extract {
            input,
            output,
            log_format,
            max_parse_steps,
            threads,
        } => {
            extract(&ExtractOptions {
                input,
                output,
                log_format,
                max_parse_steps,
                threads,
            })?;
            Ok(())
        }
        Command::Analyze {
            file,
            max_parse_steps,
        } => {
            let query = if let Some(file) = &file {
                fs::read_to_string(file)
                    .with_context(|| format!("Failed to read {}", file.display()))?
            } else {
                io::read_to_string(stdin().lock()).context("Failed to read the query from stdin")?
            };
            let mut parser = QueryParser::new();
            if let Some(limit) = max_parse_steps {
                parser = parser.with_step_limit(limit);
            }
            let components = ShapeAnalyzer::with_parser(parser)
                .analyze(&query)
                .context("Failed to parse the query")?;
            let mut stdout = stdout().lock();
            for component in components {
                write!(stdout, "{component}")?;
            }
            stdout.flush()?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic_in_result_fn, reason = "Assertions in tests returning Result")]
mod tests {
    use super::*;
    use anyhow::Result;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use assert_fs::{NamedTempFile, TempDir};
    use predicates::prelude::*;

    fn cli_command() -> Command {
        let mut command = Command::new(env!("CARGO"));
        command
            .arg("run")
            .arg("--bin")
            .arg("sparql-shapes")
            .arg("--");
        command
    }

    #[test]
    fn cli_help() {
        cli_command()
            .assert()
            .failure()
            .stdout("")
            .stderr(predicate::str::contains("Usage"));
    }

    #[test]
    fn cli_analyze_stdin() {
        cli_command()
            .arg("analyze")
            .write_stdin("select * { ?s a <:Person>; <name> \"toto\" }")
            .assert()
            .success()
            .stdout(
                "# complexity: [2]\n    ?v0 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <:Person> .\n    ?v0 <name> ?v1 .\n",
            );
    }

    #[test]
    fn cli_analyze_file() -> Result<()> {
        let query_file = NamedTempFile::new("query.rq")?;
        query_file.write_str(
            "PREFIX ex: <http://example.com/>\nASK { ?a ex:p ?b . ?b ex:q ?c ; ex:r 1 . ?x ex:s ?y }",
        )?;
        cli_command()
            .arg("analyze")
            .arg("--file")
            .arg(query_file.path())
            .assert()
            .success()
            .stdout(
                "# complexity: [1, 2]\n    ?v0 <http://example.com/p> ?v1 .\n    ?v1 <http://example.com/q> ?v2 .\n    ?v1 <http://example.com/r> 1 .\n# complexity: [1]\n    ?v3 <http://example.com/s> ?v4 .\n",
            );
        Ok(())
    }

    #[test]
    fn cli_analyze_invalid_query() {
        cli_command()
            .arg("analyze")
            .write_stdin("select * { ?s <p> }")
            .assert()
            .failure()
            .stderr(predicate::str::contains("syntax error at line 1"));
    }

    #[test]
    fn cli_extract() -> Result<()> {
        let input = TempDir::new()?;
        let output = TempDir::new()?;
        input.child("access.log").write_str(
            "GET /sparql?query=select+*+%7B+%3Fs+a+%3C%3APerson%3E%3B+%3Cname%3E+%22toto%22+%7D HTTP/1.1\n\
             GET /sparql?query=select+*+%7B+%3Fs+%3Cp%3E+%7D HTTP/1.1\n",
        )?;
        cli_command()
            .arg("extract")
            .arg("--input")
            .arg(input.path())
            .arg("--output")
            .arg(output.path())
            .arg("--log-format")
            .arg("TOMCAT")
            .assert()
            .success()
            .stderr(predicate::str::contains("Failed to parse query"));
        output.child("query_2.gz").assert(predicate::path::exists());
        Ok(())
    }

    #[test]
    fn clap_debug() {
        use clap::CommandFactory;

        Args::command().debug_assert()
    }
}
