use std::path::PathBuf;
use structopt::{clap, clap::arg_enum, StructOpt};

#[derive(Debug, StructOpt)]
#[structopt(name = "prq", about = "Compile catalog prerequisite text into query trees")]
#[structopt(long_version(option_env!("LONG_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))))]
#[structopt(setting(clap::AppSettings::ColoredHelp))]
pub struct Opt {
    #[structopt(
        long = "log-level",
        possible_values(&LogLevel::variants()),
        case_insensitive = true
    )]
    pub log_level: Option<LogLevel>,
    /// Course records, one JSON object per line; `.gz` files are decompressed
    #[structopt(long = "input", short = "i", required = true)]
    pub inputs: Vec<PathBuf>,
    #[structopt(long = "comment", default_value = "#")]
    pub comment: char,
    #[structopt(
        long = "out-format",
        possible_values(&OutputFormat::variants()),
        case_insensitive = true
    )]
    pub out_format: Option<OutputFormat>,
    /// Comma separated completed courses; only courses open to them are printed
    #[structopt(long = "taken")]
    pub taken: Option<String>,
    /// Exit with an error when any course fails to compile
    #[structopt(long = "fail-on-error")]
    pub fail_on_error: bool,
}

arg_enum! {
    #[derive(Debug)]
    pub enum LogLevel {
        DEBUG,
        INFO,
        WARN,
        ERROR,
    }
}

arg_enum! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum OutputFormat {
        JSON,
        PRETTY,
        TREE,
    }
}
