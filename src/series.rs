// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use strum_macros::EnumIter;

/// One parsed log line.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sample {
    pub bits_per_second: f64,
    pub messages_per_second: f64,
    pub bytes_per_message: f64,
}

impl Sample {
    pub fn new(bits_per_second: f64, messages_per_second: f64, bytes_per_message: f64) -> Self {
        Self {
            bits_per_second,
            messages_per_second,
            bytes_per_message,
        }
    }

    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Bits => self.bits_per_second,
            Dimension::Msgs => self.messages_per_second,
            Dimension::BytesPerMsg => self.bytes_per_message,
        }
    }
}

/// The measured quantities, in the order they appear on a log line.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, EnumIter)]
pub enum Dimension {
    Bits,
    Msgs,
    BytesPerMsg,
}

impl Dimension {
    /// y-axis label
    pub fn unit(self) -> &'static str {
        match self {
            Dimension::Bits => "MiB/s",
            Dimension::Msgs => "Msg/s",
            Dimension::BytesPerMsg => "bytes/msg",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Dimension::Bits => write!(f, "MiB/s"),
            Dimension::Msgs => write!(f, "Msgs/s"),
            Dimension::BytesPerMsg => write!(f, "bytes/msg"),
        }
    }
}

/// Parallel sequences built from one log file. The index is a synthetic
/// time axis: `index[i] = i * interval`.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    index: Vec<u64>,
    bits: Vec<f64>,
    msgs: Vec<f64>,
    bytes_per_msg: Vec<f64>,
}

impl Series {
    pub fn new(interval: u64, samples: impl IntoIterator<Item = Sample>) -> Self {
        let mut series = Self {
            index: Vec::new(),
            bits: Vec::new(),
            msgs: Vec::new(),
            bytes_per_msg: Vec::new(),
        };
        for (i, sample) in samples.into_iter().enumerate() {
            series.index.push(i as u64 * interval);
            series.bits.push(sample.bits_per_second);
            series.msgs.push(sample.messages_per_second);
            series.bytes_per_msg.push(sample.bytes_per_message);
        }
        series
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[u64] {
        &self.index
    }

    pub fn bits(&self) -> &[f64] {
        &self.bits
    }

    pub fn msgs(&self) -> &[f64] {
        &self.msgs
    }

    pub fn bytes_per_msg(&self) -> &[f64] {
        &self.bytes_per_msg
    }

    pub fn values(&self, dimension: Dimension) -> &[f64] {
        match dimension {
            Dimension::Bits => self.bits(),
            Dimension::Msgs => self.msgs(),
            Dimension::BytesPerMsg => self.bytes_per_msg(),
        }
    }

    /// `(index, value)` pairs for one dimension.
    pub fn points(&self, dimension: Dimension) -> Vec<(f64, f64)> {
        self.index
            .iter()
            .zip(self.values(dimension))
            .map(|(x, y)| (*x as f64, *y))
            .collect()
    }
}
