use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Parser;
use colored::Colorize;

use metacollector::{Job, Outcome};

/// Generate accessor boilerplate from PROPERTY/CLASSDATA annotated headers.
#[derive(Parser)]
#[command(name = "metacollector", version)]
#[command(about = "Scans annotated headers and generates their accessor boilerplate")]
struct Cli {
    /// Input headers, then the output header path, then the output source
    /// path (the last two, in that order).
    #[arg(required = true, value_name = "FILE")]
    paths: Vec<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut paths = cli.paths;
    let Some(source) = paths.pop() else {
        bail!("missing output source path");
    };
    let Some(header) = paths.pop() else {
        bail!("missing output header path");
    };
    if paths.is_empty() {
        bail!("at least one input file is required");
    }

    let job = Job::new(paths, header, source);
    match job.run()? {
        Outcome::UpToDate => {
            println!(
                "{}: no input newer than {}; nothing to do.",
                job.generator_name,
                job.header.display()
            );
        }
        Outcome::Generated { classes, files } => {
            eprintln!(
                "{}: generated {} and {} ({classes} classes from {files} files)",
                job.generator_name,
                job.header.display(),
                job.source.display()
            );
        }
    }

    Ok(())
}
