use anyhow::Context;
use bzip2::read::MultiBzDecoder;
use clap::ValueEnum;
use flate2::read::MultiGzDecoder;
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::ffi::OsStr;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::Utf8Error;
use std::sync::LazyLock;

/// How queries are recorded in a log file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Access logs with the query in a `query=` request parameter
    Tomcat,
}

impl LogFormat {
    /// Extracts the query of a log line, if the line holds one.
    pub fn query(self, line: &str) -> Result<Option<String>, Utf8Error> {
        match self {
            Self::Tomcat => tomcat_query(line),
        }
    }
}

/// Opens a log file, decompressing it according to its extension.
pub fn open(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(match path.extension().and_then(OsStr::to_str) {
        Some("gz") => Box::new(BufReader::new(MultiGzDecoder::new(file))),
        Some("bz2") => Box::new(BufReader::new(MultiBzDecoder::new(file))),
        _ => Box::new(BufReader::new(file)),
    })
}

/// The query parameter is percent-encoded with `+` for spaces. Anything after the last `}`
/// is dropped; a query without `}` has no graph pattern and is ignored.
fn tomcat_query(line: &str) -> Result<Option<String>, Utf8Error> {
    let Some(encoded) = TOMCAT_QUERY
        .captures(line)
        .and_then(|captures| captures.get(1))
    else {
        return Ok(None);
    };
    let encoded = encoded.as_str().replace('+', " ");
    let decoded = percent_decode_str(&encoded).decode_utf8()?;
    Ok(decoded.rfind('}').map(|end| decoded[..=end].to_owned()))
}

#[allow(clippy::expect_used, reason = "Indicates programming error")]
static TOMCAT_QUERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("query=([^ ]+)").expect("valid query parameter pattern"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tomcat_line() {
        let line = "127.0.0.1 - - [10/Oct/2020:13:55:36 +0000] \"GET /sparql?query=select+*+%7B+%3Fs+%3Cp%3E+%22a+b%22+%7D&format=json HTTP/1.1\" 200 512";
        assert_eq!(
            LogFormat::Tomcat.query(line),
            Ok(Some("select * { ?s <p> \"a b\" }".to_owned()))
        );
    }

    #[test]
    fn encoded_plus_is_kept() {
        assert_eq!(
            LogFormat::Tomcat.query("GET /sparql?query=ASK%7B%3Fs+%3Cp%3E+1%2B1%7D"),
            Ok(Some("ASK{?s <p> 1+1}".to_owned()))
        );
    }

    #[test]
    fn lines_without_pattern_are_ignored() {
        assert_eq!(LogFormat::Tomcat.query("GET /index.html HTTP/1.1"), Ok(None));
        assert_eq!(
            LogFormat::Tomcat.query("GET /sparql?query=DESCRIBE+%3Chttp%3A%2F%2Fex.com%3E"),
            Ok(None)
        );
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        assert!(LogFormat::Tomcat.query("GET /sparql?query=%FF%7B%7D").is_err());
    }
}
