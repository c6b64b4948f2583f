// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Backend-neutral description of a row of line charts, and a plotters
//! bitmap backend that renders it to a PNG file.

use std::error::Error;
use std::path::Path;

mod bitmap;

pub use bitmap::Bitmap;

/// A set of panels laid out side by side and written to a single image.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSet {
    caption: Option<String>,
    size: (u32, u32),
    panels: Vec<Panel>,
}

impl ChartSet {
    pub fn new(size: (u32, u32)) -> Self {
        Self {
            caption: None,
            size,
            panels: Vec::new(),
        }
    }

    pub fn caption(&mut self, caption: impl AsRef<str>) -> &mut Self {
        self.caption = Some(caption.as_ref().to_owned());
        self
    }

    pub fn panel(&mut self, panel: Panel) -> &mut Self {
        self.panels.push(panel);
        self
    }

    pub fn get_caption(&self) -> Option<&str> {
        self.caption.as_deref()
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }
}

/// One line plot with optional horizontal reference line.
#[derive(Clone, Debug, PartialEq)]
pub struct Panel {
    title: String,
    x_desc: String,
    y_desc: String,
    points: Vec<(f64, f64)>,
    reference: Option<ReferenceLine>,
}

impl Panel {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self {
            title: String::new(),
            x_desc: String::new(),
            y_desc: String::new(),
            points,
            reference: None,
        }
    }

    pub fn title(mut self, title: impl AsRef<str>) -> Self {
        self.title = title.as_ref().to_owned();
        self
    }

    pub fn x_desc(mut self, x_desc: impl AsRef<str>) -> Self {
        self.x_desc = x_desc.as_ref().to_owned();
        self
    }

    pub fn y_desc(mut self, y_desc: impl AsRef<str>) -> Self {
        self.y_desc = y_desc.as_ref().to_owned();
        self
    }

    pub fn reference(mut self, reference: ReferenceLine) -> Self {
        self.reference = Some(reference);
        self
    }

    pub fn get_title(&self) -> &str {
        &self.title
    }

    pub fn get_x_desc(&self) -> &str {
        &self.x_desc
    }

    pub fn get_y_desc(&self) -> &str {
        &self.y_desc
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn get_reference(&self) -> Option<&ReferenceLine> {
        self.reference.as_ref()
    }

    /// Horizontal extent of the points, widened when degenerate.
    pub fn x_range(&self) -> (f64, f64) {
        padded(self.points.iter().map(|(x, _)| *x))
    }

    /// Vertical extent of the points and the reference line, widened when
    /// degenerate.
    pub fn y_range(&self) -> (f64, f64) {
        let reference = self.reference.as_ref().map(|r| r.value);
        padded(self.points.iter().map(|(_, y)| *y).chain(reference))
    }
}

/// A horizontal line across the whole panel.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceLine {
    value: f64,
    label: String,
}

impl ReferenceLine {
    pub fn new(value: f64, label: impl AsRef<str>) -> Self {
        Self {
            value,
            label: label.as_ref().to_owned(),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Something that can turn a `ChartSet` into a file.
pub trait Backend {
    fn draw(&mut self, chart: &ChartSet, path: &Path) -> Result<(), Box<dyn Error>>;
}

fn padded(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), v| {
        (min.min(v), max.max(v))
    });

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else {
        min.abs().max(1.0) * 0.05
    };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_cover_points_and_reference() {
        let panel = Panel::new(vec![(0.0, 10.0), (3.0, 20.0), (6.0, 30.0)])
            .reference(ReferenceLine::new(40.0, "40"));

        let (x_min, x_max) = panel.x_range();
        assert!(x_min < 0.0 && x_max > 6.0);

        let (y_min, y_max) = panel.y_range();
        assert!(y_min < 10.0 && y_max > 40.0);
    }

    #[test]
    fn degenerate_ranges_are_widened() {
        let panel = Panel::new(vec![(0.0, 5.0)]);
        let (x_min, x_max) = panel.x_range();
        let (y_min, y_max) = panel.y_range();
        assert!(x_max > x_min);
        assert!(y_max > y_min);

        let empty = Panel::new(Vec::new());
        assert_eq!(empty.x_range(), (0.0, 1.0));
    }

    #[test]
    fn builder_keeps_panel_order() {
        let mut chart = ChartSet::new((300, 100));
        chart
            .caption("128")
            .panel(Panel::new(Vec::new()).title("a"))
            .panel(Panel::new(Vec::new()).title("b"));

        assert_eq!(chart.get_caption(), Some("128"));
        let titles: Vec<&str> = chart.panels().iter().map(|p| p.get_title()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }
}
