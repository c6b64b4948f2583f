// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::parse::ParseError;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: {source}", path.display())]
    Parse { path: PathBuf, source: ParseError },
    #[error("{}: {} malformed lines, first at {}", path.display(), errors.len(), first_line(errors))]
    Malformed {
        path: PathBuf,
        errors: Vec<ParseError>,
    },
    #[error("failed to render {}: {message}", path.display())]
    Render { path: PathBuf, message: String },
    #[error("invalid config: {0}")]
    Config(String),
    #[error("invalid template '{0}': must contain {{label}}")]
    Template(String),
    #[error("bad line pattern: {0}")]
    Pattern(#[from] regex::Error),
}

fn first_line(errors: &[ParseError]) -> String {
    errors
        .first()
        .map(|e| format!("line {}", e.line()))
        .unwrap_or_else(|| "unknown line".to_owned())
}
