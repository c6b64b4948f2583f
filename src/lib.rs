// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Parse discard benchmark logs and chart throughput, message rate and
//! message size over time, one image per log.

mod config;
mod error;
mod parse;
mod render;
mod series;
mod stats;

pub use crate::config::{app, Config, ErrorPolicy, Template, VERSION};
pub use crate::error::Error;
pub use crate::parse::{ParseError, Parser};
pub use crate::render::{chart_set, render};
pub use crate::series::{Dimension, Sample, Series};
pub use crate::stats::median;

pub use throughputgraph::{Backend, Bitmap, ChartSet, Panel, ReferenceLine};

use logger::info;

use std::path::PathBuf;

/// Runs parse then render for every configured label, in order.
pub struct Pipeline<B> {
    config: Config,
    parser: Parser,
    backend: B,
}

impl Pipeline<Bitmap> {
    /// A pipeline writing PNG files.
    pub fn new(config: Config) -> Result<Self, Error> {
        Self::with_backend(config, Bitmap::new())
    }
}

impl<B: Backend> Pipeline<B> {
    pub fn with_backend(config: Config, backend: B) -> Result<Self, Error> {
        let parser = Parser::new(config.on_error(), config.interval())?;
        Ok(Self {
            config,
            parser,
            backend,
        })
    }

    /// Process every label. Stops at the first failing label.
    pub fn run(&mut self) -> Result<Vec<PathBuf>, Error> {
        let labels = self.config.labels().to_vec();
        let mut written = Vec::with_capacity(labels.len());
        for label in labels {
            written.push(self.process(label)?);
        }
        Ok(written)
    }

    /// Parse the log for `label` and write its chart, returning the chart
    /// path.
    pub fn process(&mut self, label: u64) -> Result<PathBuf, Error> {
        let input = self.config.input(label);
        let output = self.config.output(label);

        info!("processing {}", input.display());
        let series = self.parser.parse_file(&input)?;
        info!("{}: {} samples", input.display(), series.len());

        render(
            &mut self.backend,
            &series,
            label,
            self.config.size(),
            &output,
        )?;
        info!("wrote {}", output.display());

        Ok(output)
    }
}
