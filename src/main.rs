#[macro_use]
extern crate log;

use std::io::{self, BufWriter, Write};
use std::{env::set_var, error::Error};
use structopt::StructOpt;

mod opt;

use crate::opt::{LogLevel, Opt, OutputFormat};
use prereq_reader::{reader, utils, Catalog, CatalogReader, CompiledCourse};

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();

    match &opt.log_level {
        Some(log_level) => match log_level {
            LogLevel::DEBUG => set_var("RUST_LOG", "debug"),
            LogLevel::INFO => set_var("RUST_LOG", "info"),
            LogLevel::WARN => set_var("RUST_LOG", "warn"),
            LogLevel::ERROR => set_var("RUST_LOG", "error"),
        },
        None => set_var("RUST_LOG", "warn"),
    };

    pretty_env_logger::init_timed();
    debug!("{:?}", opt);

    let mut catalog = Catalog::default();
    for input in opt.inputs.iter() {
        let bufreader = reader::read_with_gz(input)?;
        let department = CatalogReader::new(bufreader)
            .with_comment(opt.comment)
            .finish()?;

        info!(
            "{}: {} courses, {} failed",
            input.display(),
            department.len(),
            department.failures().len()
        );
        catalog = catalog.merge(department);
    }

    let courses: Vec<&CompiledCourse> = match &opt.taken {
        Some(taken) => catalog.eligible(utils::parse_taken(taken).as_slice()),
        None => catalog.courses().iter().collect(),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match opt.out_format.unwrap_or(OutputFormat::JSON) {
        OutputFormat::JSON => {
            serde_json::to_writer(&mut out, &courses)?;
            writeln!(out)?;
        }
        OutputFormat::PRETTY => {
            serde_json::to_writer_pretty(&mut out, &courses)?;
            writeln!(out)?;
        }
        OutputFormat::TREE => {
            for course in courses {
                writeln!(out, "{}\n", course)?;
            }
        }
    }
    out.flush()?;

    if opt.fail_on_error && !catalog.failures().is_empty() {
        for failure in catalog.failures() {
            error!("{}", failure);
        }
        return Err(format!("{} courses failed to compile", catalog.failures().len()).into());
    }

    Ok(())
}
