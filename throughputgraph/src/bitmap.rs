// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Backend, ChartSet};

use plotters::prelude::*;

use std::error::Error;
use std::path::Path;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            (($colour & 0x0000FF) >> 0) as u8,
        )
    };
}

const LINE: RGBColor = hexcolour!(0x1F77B4);
const REFERENCE: RGBColor = hexcolour!(0xDD0000);

const FONT: &str = "sans-serif";

// DejaVu Sans, see fonts/LICENSE-DejaVu. Registered under the family name
// plotters asks for by default, so captions, axis descriptions, tick labels
// and legends all resolve to it.
static FONT_DATA: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

fn register_font() -> Result<(), Box<dyn Error>> {
    plotters::style::register_font(FONT, FontStyle::Normal, FONT_DATA)
        .map_err(|_| "bundled font is not a valid OpenType font".into())
}

/// Renders charts to PNG through plotters' `BitMapBackend`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Bitmap;

impl Bitmap {
    pub fn new() -> Self {
        Self
    }
}

impl Backend for Bitmap {
    fn draw(&mut self, chart: &ChartSet, path: &Path) -> Result<(), Box<dyn Error>> {
        register_font()?;

        let root = BitMapBackend::new(path, chart.size()).into_drawing_area();
        root.fill(&WHITE)?;

        let root = match chart.get_caption() {
            Some(caption) => root.titled(caption, (FONT, 24))?,
            None => root,
        };

        let panels = chart.panels();
        if panels.is_empty() {
            root.present()?;
            return Ok(());
        }

        let areas = root.split_evenly((1, panels.len()));

        for (panel, area) in panels.iter().zip(areas.iter()) {
            let (x_min, x_max) = panel.x_range();
            let (y_min, y_max) = panel.y_range();

            let mut ctx = ChartBuilder::on(area)
                .caption(panel.get_title(), (FONT, 20))
                .margin(10)
                .set_label_area_size(LabelAreaPosition::Left, 70)
                .set_label_area_size(LabelAreaPosition::Bottom, 40)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

            ctx.configure_mesh()
                .x_desc(panel.get_x_desc())
                .y_desc(panel.get_y_desc())
                .draw()?;

            ctx.draw_series(LineSeries::new(
                panel.points().iter().copied(),
                LINE.stroke_width(2),
            ))?;

            if let Some(reference) = panel.get_reference() {
                let y = reference.value();
                ctx.draw_series(LineSeries::new(
                    vec![(x_min, y), (x_max, y)],
                    REFERENCE.stroke_width(1),
                ))?
                .label(reference.label())
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], REFERENCE.stroke_width(1)));

                ctx.configure_series_labels()
                    .background_style(WHITE.filled())
                    .border_style(BLACK)
                    .draw()?;
            }
        }

        root.present()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Panel, ReferenceLine};

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

    fn sample_chart() -> ChartSet {
        labelled_chart(128)
    }

    fn labelled_chart(label: u64) -> ChartSet {
        let mut chart = ChartSet::new((600, 200));
        for (i, unit) in ["MiB/s", "Msg/s", "bytes/msg"].iter().enumerate() {
            let points = (0..5).map(|x| ((x * 3) as f64, (x + i) as f64)).collect();
            chart.panel(
                Panel::new(points)
                    .title(format!("{} msg size - {}", label, unit))
                    .x_desc("seconds")
                    .y_desc(*unit)
                    .reference(ReferenceLine::new(2.0 + i as f64, "median")),
            );
        }
        chart
    }

    #[test]
    fn writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");

        Bitmap::new().draw(&sample_chart(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(PNG_MAGIC));
    }

    #[test]
    fn output_is_deterministic() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.png");
        let second = dir.path().join("second.png");
        let chart = sample_chart();

        Bitmap::new().draw(&chart, &first).unwrap();
        Bitmap::new().draw(&chart, &second).unwrap();

        assert_eq!(std::fs::read(first).unwrap(), std::fs::read(second).unwrap());
    }

    #[test]
    fn titles_are_drawn() {
        let dir = tempfile::tempdir().unwrap();
        let small = dir.path().join("small.png");
        let large = dir.path().join("large.png");

        Bitmap::new().draw(&labelled_chart(128), &small).unwrap();
        Bitmap::new().draw(&labelled_chart(2048), &large).unwrap();

        assert_ne!(std::fs::read(small).unwrap(), std::fs::read(large).unwrap());
    }

    #[test]
    fn caption_is_drawn() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.png");
        let captioned = dir.path().join("captioned.png");

        let mut chart = sample_chart();
        Bitmap::new().draw(&chart, &plain).unwrap();
        chart.caption("discard throughput");
        Bitmap::new().draw(&chart, &captioned).unwrap();

        assert_ne!(std::fs::read(plain).unwrap(), std::fs::read(captioned).unwrap());
    }

    #[test]
    fn empty_panels_are_drawn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");

        let mut chart = ChartSet::new((600, 200));
        for unit in ["MiB/s", "Msg/s", "bytes/msg"].iter() {
            chart.panel(
                Panel::new(Vec::new())
                    .title(format!("256 msg size - {}", unit))
                    .x_desc("seconds")
                    .y_desc(*unit),
            );
        }
        Bitmap::new().draw(&chart, &path).unwrap();

        assert!(std::fs::read(&path).unwrap().starts_with(PNG_MAGIC));
    }
}
