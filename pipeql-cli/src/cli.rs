use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// The query string to compile, e.g. `m_status=Pending&f_+orders&p_id,-secret`.
    #[arg(index = 1)]
    #[serde(skip)]
    pub query: Option<String>,

    /// The path to a configuration file (optional).
    ///
    /// Command line arguments specified in addition to a configuration file take precedence over configuration file values.
    #[clap(long = "file", short = 'f')]
    #[serde(skip)]
    pub config_file: Option<String>,

    /// The collection the pipeline runs against. Needed to infer the local side of collection joins (`f_+orders`).
    #[clap(long, short)]
    pub collection: Option<String>,

    /// How to print the pipeline.
    ///
    /// Default: mql
    #[clap(value_enum, long)]
    pub format: Option<OutputFormat>,

    /// The logging level (optional). Falls back to the LOG_LEVEL environment variable, then to warn.
    #[clap(value_enum, long, short = 'v')]
    pub verbosity: Option<Verbosity>,
}

#[derive(clap::ValueEnum, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One stage document per line.
    #[default]
    Mql,
    /// The whole pipeline as a single relaxed extended JSON array.
    Json,
    /// Indented relaxed extended JSON.
    Pretty,
}

#[derive(clap::ValueEnum, Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<Verbosity> for LevelFilter {
    fn from(verbosity: Verbosity) -> Self {
        match verbosity {
            Verbosity::Trace => LevelFilter::TRACE,
            Verbosity::Debug => LevelFilter::DEBUG,
            Verbosity::Info => LevelFilter::INFO,
            Verbosity::Warn => LevelFilter::WARN,
            Verbosity::Error => LevelFilter::ERROR,
        }
    }
}

impl Cli {
    /// Merge two Cli structs together, preferring left values over right values.
    pub fn merge(left: Cli, right: Cli) -> Cli {
        Cli {
            query: left.query.or(right.query),
            config_file: left.config_file.or(right.config_file),
            collection: left.collection.or(right.collection),
            format: left.format.or(right.format),
            verbosity: left.verbosity.or(right.verbosity),
        }
    }
}
