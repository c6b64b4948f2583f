// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use discard_plot::{Config, Pipeline, VERSION};
use logger::*;

fn main() {
    let config = Config::new();

    Logger::new()
        .label("discard_plot")
        .level(config.logging())
        .init()
        .expect("Failed to initialize logger");

    info!("discard-plot {} initializing...", VERSION);
    config.print();

    let mut pipeline = Pipeline::new(config).unwrap_or_else(|e| fatal!("{}", e));

    match pipeline.run() {
        Ok(charts) => info!("done: {} charts written", charts.len()),
        Err(e) => fatal!("{}", e),
    }

    logger::flush();
}
