// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Line parser for discard benchmark logs.
//!
//! Each line is expected to carry exactly three measurements, each a decimal
//! number followed by a unit, e.g.
//! `"1123.456 MiB/s 9.200 Ki Msgs/s 128.00 bytes per msg"`.

use crate::config::ErrorPolicy;
use crate::error::Error;
use crate::series::{Sample, Series};

use logger::{debug, warn};
use regex::Regex;
use thiserror::Error;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// A number, then a unit which may be separated by whitespace. Digits are
/// ASCII only, `str::parse::<f64>` accepts nothing else.
const PATTERN: &str = r"([0-9]+\.[0-9]+)(\s*[^\s]+)\s*";

const FIELDS: usize = 3;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum ParseError {
    #[error("line {line}: expected 3 measurements, found {found}")]
    TokenCount { line: usize, found: usize },
    #[error("line {line}: invalid number '{token}'")]
    Number { line: usize, token: String },
}

impl ParseError {
    /// 1-based line number of the offending line.
    pub fn line(&self) -> usize {
        match self {
            ParseError::TokenCount { line, .. } | ParseError::Number { line, .. } => *line,
        }
    }
}

pub struct Parser {
    pattern: Regex,
    policy: ErrorPolicy,
    interval: u64,
}

impl Parser {
    pub fn new(policy: ErrorPolicy, interval: u64) -> Result<Self, Error> {
        Ok(Self {
            pattern: Regex::new(PATTERN)?,
            policy,
            interval,
        })
    }

    /// Extract one sample from a line. `line` is the 1-based line number used
    /// in errors.
    pub fn parse_line(&self, line: usize, text: &str) -> Result<Sample, ParseError> {
        let mut values = [0.0; FIELDS];
        let mut found = 0;

        for captures in self.pattern.captures_iter(text) {
            let token = &captures[1];
            let value = token.parse::<f64>().map_err(|_| ParseError::Number {
                line,
                token: token.to_owned(),
            })?;
            if found < FIELDS {
                values[found] = value;
            }
            found += 1;
        }

        if found != FIELDS {
            return Err(ParseError::TokenCount { line, found });
        }

        Ok(Sample::new(values[0], values[1], values[2]))
    }

    /// Parse a whole log file into a `Series`.
    pub fn parse_file(&self, path: &Path) -> Result<Series, Error> {
        let file = File::open(path).map_err(|source| Error::Io {
            path: path.to_owned(),
            source,
        })?;
        self.parse_reader(path, BufReader::new(file))
    }

    /// Parse lines from `reader`. `path` only names the source in errors.
    pub fn parse_reader<R: BufRead>(&self, path: &Path, reader: R) -> Result<Series, Error> {
        let mut samples = Vec::new();
        let mut errors = Vec::new();

        for (i, text) in reader.lines().enumerate() {
            let text = text.map_err(|source| Error::Io {
                path: path.to_owned(),
                source,
            })?;

            match self.parse_line(i + 1, &text) {
                Ok(sample) => samples.push(sample),
                Err(e) => match self.policy {
                    ErrorPolicy::Abort => {
                        return Err(Error::Parse {
                            path: path.to_owned(),
                            source: e,
                        });
                    }
                    ErrorPolicy::Skip => {
                        warn!("{}: skipping {}", path.display(), e);
                    }
                    ErrorPolicy::Collect => errors.push(e),
                },
            }
        }

        if !errors.is_empty() {
            return Err(Error::Malformed {
                path: path.to_owned(),
                errors,
            });
        }

        debug!("{}: parsed {} samples", path.display(), samples.len());

        Ok(Series::new(self.interval, samples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOG: &str = "\
1123.456 MiB/s 9.200 Ki Msgs/s 128.00 bytes per msg
1120.000 MiB/s 9.180 Ki Msgs/s 128.00 bytes per msg
1130.500 MiB/s 9.260 Ki Msgs/s 128.00 bytes per msg
";

    fn parser(policy: ErrorPolicy) -> Parser {
        Parser::new(policy, 3).unwrap()
    }

    fn parse(policy: ErrorPolicy, text: &str) -> Result<Series, Error> {
        parser(policy).parse_reader(Path::new("discard-128.log"), text.as_bytes())
    }

    #[test]
    fn three_tokens() {
        let sample = parser(ErrorPolicy::Abort)
            .parse_line(1, "12.500 Mbps 3400.0 msg 512.0 B")
            .unwrap();
        assert_eq!(sample, Sample::new(12.5, 3400.0, 512.0));
    }

    #[test]
    fn server_output_format() {
        let sample = parser(ErrorPolicy::Abort)
            .parse_line(1, "1123.456 MiB/s 9.200 Ki Msgs/s 128.00 bytes per msg")
            .unwrap();
        assert_eq!(sample, Sample::new(1123.456, 9.2, 128.0));
    }

    #[test]
    fn two_tokens() {
        let err = parser(ErrorPolicy::Abort)
            .parse_line(4, "12.5 Mbps 3400.0 msg")
            .unwrap_err();
        assert_eq!(err, ParseError::TokenCount { line: 4, found: 2 });
        assert_eq!(err.line(), 4);
    }

    #[test]
    fn too_many_tokens() {
        let err = parser(ErrorPolicy::Abort)
            .parse_line(1, "1.0 a 2.0 b 3.0 c 4.0 d")
            .unwrap_err();
        assert_eq!(err, ParseError::TokenCount { line: 1, found: 4 });
    }

    #[test]
    fn unit_is_required() {
        // the trailing number has nothing after it to act as a unit
        let err = parser(ErrorPolicy::Abort)
            .parse_line(1, "1.0 a 2.0 b 3.0")
            .unwrap_err();
        assert_eq!(err, ParseError::TokenCount { line: 1, found: 2 });
    }

    #[test]
    fn integers_are_not_measurements() {
        let sample = parser(ErrorPolicy::Abort)
            .parse_line(1, "run 7: 1.5 MiB/s 2.5 Msgs/s 3.5 bytes")
            .unwrap();
        assert_eq!(sample, Sample::new(1.5, 2.5, 3.5));
    }

    #[test]
    fn only_ascii_digits_are_measurements() {
        let err = parser(ErrorPolicy::Abort)
            .parse_line(2, "\u{661}\u{662}.\u{665} MiB/s 1.0 a 2.0 b")
            .unwrap_err();
        assert_eq!(err, ParseError::TokenCount { line: 2, found: 2 });
    }

    #[test]
    fn whole_file() {
        let series = parse(ErrorPolicy::Abort, LOG).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.index(), &[0, 3, 6]);
        assert_eq!(series.bits(), &[1123.456, 1120.0, 1130.5]);
        assert_eq!(series.msgs(), &[9.2, 9.18, 9.26]);
        assert_eq!(series.bytes_per_msg(), &[128.0, 128.0, 128.0]);
    }

    #[test]
    fn empty_file() {
        let series = parse(ErrorPolicy::Abort, "").unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn abort_reports_first_bad_line() {
        let text = format!("{}garbage\n{}", LOG, "also garbage\n");
        match parse(ErrorPolicy::Abort, &text) {
            Err(Error::Parse { source, .. }) => {
                assert_eq!(source, ParseError::TokenCount { line: 4, found: 0 })
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn skip_drops_bad_lines() {
        let text = format!("garbage\n{}1.0 x\n", LOG);
        let series = parse(ErrorPolicy::Skip, &text).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.bits(), &[1123.456, 1120.0, 1130.5]);
    }

    #[test]
    fn collect_reports_every_bad_line() {
        let text = format!("garbage\n{}1.0 x\n", LOG);
        match parse(ErrorPolicy::Collect, &text) {
            Err(Error::Malformed { errors, .. }) => {
                let lines: Vec<usize> = errors.iter().map(|e| e.line()).collect();
                assert_eq!(lines, vec![1, 5]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_file() {
        let result = parser(ErrorPolicy::Abort).parse_file(Path::new("does/not/exist.log"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }
}
