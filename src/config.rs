// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::Error;

use clap::{App, Arg, ArgMatches};
use logger::{info, Level};
use serde_derive::*;

use std::convert::TryFrom;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

const PLACEHOLDER: &str = "{label}";

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    general: General,
    #[serde(default)]
    input: Input,
    #[serde(default)]
    output: Output,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct General {
    #[serde(with = "LevelDef")]
    #[serde(default = "default_logging_level")]
    logging: Level,
    #[serde(default)]
    on_error: ErrorPolicy,
    #[serde(default = "default_directory")]
    directory: PathBuf,
}

impl Default for General {
    fn default() -> Self {
        Self {
            logging: default_logging_level(),
            on_error: ErrorPolicy::default(),
            directory: default_directory(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Input {
    #[serde(default = "default_labels")]
    labels: Vec<u64>,
    #[serde(default = "default_input_template")]
    template: Template,
    #[serde(default = "default_interval")]
    interval: u64,
}

impl Default for Input {
    fn default() -> Self {
        Self {
            labels: default_labels(),
            template: default_input_template(),
            interval: default_interval(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Output {
    #[serde(default = "default_output_template")]
    template: Template,
    #[serde(default = "default_width")]
    width: u32,
    #[serde(default = "default_height")]
    height: u32,
}

impl Default for Output {
    fn default() -> Self {
        Self {
            template: default_output_template(),
            width: default_width(),
            height: default_height(),
        }
    }
}

/// What to do with a log line that doesn't hold exactly three measurements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[serde(deny_unknown_fields)]
pub enum ErrorPolicy {
    /// fail the file on the first bad line
    Abort,
    /// log and drop bad lines
    Skip,
    /// fail the file, reporting every bad line
    Collect,
}

impl Default for ErrorPolicy {
    fn default() -> Self {
        ErrorPolicy::Abort
    }
}

impl FromStr for ErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "abort" => Ok(ErrorPolicy::Abort),
            "skip" => Ok(ErrorPolicy::Skip),
            "collect" => Ok(ErrorPolicy::Collect),
            _ => Err(Error::Config(format!("unknown error policy: {}", s))),
        }
    }
}

/// A file name pattern in which `{label}` is replaced by the label value.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Template(String);

impl Template {
    pub fn new(template: impl Into<String>) -> Result<Self, Error> {
        let template = template.into();
        if template.contains(PLACEHOLDER) {
            Ok(Self(template))
        } else {
            Err(Error::Template(template))
        }
    }

    pub fn render(&self, label: u64) -> String {
        self.0.replace(PLACEHOLDER, &label.to_string())
    }
}

impl TryFrom<String> for Template {
    type Error = Error;

    fn try_from(template: String) -> Result<Self, Error> {
        Self::new(template)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Deserialize, Debug)]
#[serde(rename_all = "lowercase")]
#[serde(remote = "Level")]
#[serde(deny_unknown_fields)]
enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn default_logging_level() -> Level {
    Level::Info
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_labels() -> Vec<u64> {
    vec![128, 256, 512, 1024, 2048]
}

fn default_input_template() -> Template {
    Template("discard-{label}.log".to_owned())
}

fn default_output_template() -> Template {
    Template("discard-{label}.png".to_owned())
}

/// seconds between consecutive log lines
fn default_interval() -> u64 {
    3
}

fn default_width() -> u32 {
    2000
}

fn default_height() -> u32 {
    400
}

/// command line definition for the `discard-plot` binary
pub fn app() -> App<'static, 'static> {
    App::new(NAME)
        .version(VERSION)
        .author("Brian Martin <bmartin@twitter.com>")
        .about("Summary charts for discard benchmark logs")
        .arg(
            Arg::with_name("config")
                .long("config")
                .value_name("FILE")
                .help("TOML config file")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("directory")
                .long("dir")
                .value_name("DIR")
                .help("Directory holding the logs; charts are written here too")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("interval")
                .long("interval")
                .value_name("Seconds")
                .help("Time between consecutive log lines")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("on-error")
                .long("on-error")
                .value_name("POLICY")
                .help("How to handle malformed log lines")
                .possible_value("abort")
                .possible_value("skip")
                .possible_value("collect")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Increase verbosity by one level. Can be used more than once")
                .multiple(true),
        )
        .arg(
            Arg::with_name("label")
                .value_name("LABEL")
                .help("Labels to process, replacing the configured list")
                .multiple(true)
                .index(1),
        )
}

impl Config {
    /// parse command line options and return `Config`
    pub fn new() -> Config {
        let matches = app().get_matches();
        Self::from_matches(&matches).unwrap_or_else(|e| {
            println!("ERROR: {}", e);
            std::process::exit(1);
        })
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Config, Error> {
        let mut config = if let Some(file) = matches.value_of("config") {
            Config::load_from_file(Path::new(file))?
        } else {
            Default::default()
        };

        if let Some(directory) = matches.value_of("directory") {
            config.general.directory = PathBuf::from(directory);
        }

        if let Some(interval) = parse_arg(matches, "interval")? {
            config.input.interval = interval;
        }

        if let Some(policy) = parse_arg(matches, "on-error")? {
            config.general.on_error = policy;
        }

        if let Some(values) = matches.values_of("label") {
            config.input.labels = values
                .map(|v| {
                    v.parse()
                        .map_err(|_| Error::Config(format!("could not parse label: {}", v)))
                })
                .collect::<Result<Vec<u64>, Error>>()?;
        }

        match matches.occurrences_of("verbose") {
            0 => {}
            1 => config.general.logging = Level::Debug,
            _ => config.general.logging = Level::Trace,
        }

        config.validate()?;
        Ok(config)
    }

    pub fn load_from_file(file: &Path) -> Result<Config, Error> {
        let content = std::fs::read_to_string(file).map_err(|source| Error::Io {
            path: file.to_owned(),
            source,
        })?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<Config, Error> {
        let config: Config = toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        if self.input.labels.is_empty() {
            return Err(Error::Config("no labels configured".to_owned()));
        }
        if self.input.interval == 0 {
            return Err(Error::Config("interval must be at least 1 second".to_owned()));
        }
        if self.output.width == 0 || self.output.height == 0 {
            return Err(Error::Config("chart size must be non-zero".to_owned()));
        }
        Ok(())
    }

    pub fn logging(&self) -> Level {
        self.general.logging
    }

    pub fn on_error(&self) -> ErrorPolicy {
        self.general.on_error
    }

    pub fn directory(&self) -> &Path {
        &self.general.directory
    }

    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) {
        self.general.directory = directory.into();
    }

    pub fn labels(&self) -> &[u64] {
        &self.input.labels
    }

    pub fn set_labels(&mut self, labels: Vec<u64>) {
        self.input.labels = labels;
    }

    /// seconds between consecutive log lines
    pub fn interval(&self) -> u64 {
        self.input.interval
    }

    /// chart size in pixels
    pub fn size(&self) -> (u32, u32) {
        (self.output.width, self.output.height)
    }

    /// log file for `label`
    pub fn input(&self, label: u64) -> PathBuf {
        self.general.directory.join(self.input.template.render(label))
    }

    /// chart file for `label`
    pub fn output(&self, label: u64) -> PathBuf {
        self.general.directory.join(self.output.template.render(label))
    }

    pub fn print(&self) {
        info!("-----");
        info!(
            "Config: Directory: {} Interval: {}s On-Error: {:?}",
            self.directory().display(),
            self.interval(),
            self.on_error()
        );
        info!(
            "Config: Input: {} Output: {} Size: {}x{}",
            self.input.template, self.output.template, self.output.width, self.output.height
        );
        info!("Config: Labels: {:?}", self.labels());
        info!("-----");
    }
}

/// a helper function to parse an optional argument by name from `ArgMatches`
fn parse_arg<T: FromStr>(matches: &ArgMatches, key: &str) -> Result<Option<T>, Error> {
    matches
        .value_of(key)
        .map(|v| {
            v.parse()
                .map_err(|_| Error::Config(format!("could not parse {}: {}", key, v)))
        })
        .transpose()
}
