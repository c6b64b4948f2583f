// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::Error;
use crate::series::{Dimension, Series};
use crate::stats;

use logger::{info, warn};
use strum::IntoEnumIterator;
use throughputgraph::{Backend, ChartSet, Panel, ReferenceLine};

use std::path::Path;

/// Describe the three panels for one log: bits, msgs and bytes/msg, each
/// against the synthetic time axis with a reference line at its median. An
/// empty series still gets its three panels, without reference lines.
pub fn chart_set(series: &Series, label: u64, size: (u32, u32)) -> ChartSet {
    let mut chart = ChartSet::new(size);

    for dimension in Dimension::iter() {
        let title = format!("{} msg size - {}", label, dimension);
        let mut panel = Panel::new(series.points(dimension))
            .x_desc("seconds")
            .y_desc(dimension.unit());

        match stats::median(series.values(dimension)) {
            Some(median) => {
                panel = panel.reference(ReferenceLine::new(median, median.to_string()));
            }
            None => warn!("{}: no samples, charting without a median", title),
        }

        chart.panel(panel.title(title));
    }

    chart
}

/// Chart `series` and write the image to `path`.
pub fn render<B: Backend>(
    backend: &mut B,
    series: &Series,
    label: u64,
    size: (u32, u32),
    path: &Path,
) -> Result<(), Error> {
    let chart = chart_set(series, label, size);

    for panel in chart.panels() {
        if let Some(median) = panel.get_reference() {
            info!("{}: median: {}", panel.get_title(), median.value());
        }
    }

    backend.draw(&chart, path).map_err(|e| Error::Render {
        path: path.to_owned(),
        message: e.to_string(),
    })
}
