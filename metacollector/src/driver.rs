//! The batch pipeline: staleness check, per-file extraction, whole-registry
//! validation, then output writing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result};
use chrono::Local;
use log::{debug, info};

use crate::extract::extract_file;
use crate::generate::generate;
use crate::model::Registry;

/// One generation job: the ordered inputs and the two output paths.
#[derive(Debug, Clone)]
pub struct Job {
    pub inputs: Vec<PathBuf>,
    pub header: PathBuf,
    pub source: PathBuf,
    /// Name stamped into the generated banner.
    pub generator_name: String,
}

/// What a finished run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Outputs already existed and no input was newer than the header.
    UpToDate,
    /// Both outputs were written.
    Generated { classes: usize, files: usize },
}

impl Job {
    pub fn new(inputs: Vec<PathBuf>, header: PathBuf, source: PathBuf) -> Self {
        Self {
            inputs,
            header,
            source,
            generator_name: "metacollector".to_string(),
        }
    }

    /// Runs the whole pipeline.
    ///
    /// Inputs are processed strictly in order into one shared registry; the
    /// registry is validated in full before either output file is opened.
    /// Writes are not staged through temporary files, so an I/O failure
    /// mid-write can leave an output incomplete.
    pub fn run(&self) -> Result<Outcome> {
        if self.up_to_date()? {
            debug!("outputs are current, skipping");
            return Ok(Outcome::UpToDate);
        }

        let mut registry = Registry::new();
        for input in &self.inputs {
            let text = fs::read_to_string(input)
                .with_context(|| format!("could not read {}", input.display()))?;
            extract_file(&input.to_string_lossy(), &text, &mut registry)?;
            info!("scanned {}", input.display());
        }

        registry.validate()?;

        let output = generate(&registry, &self.generator_name, Local::now());
        fs::write(&self.header, &output.header)
            .with_context(|| format!("could not write {}", self.header.display()))?;
        fs::write(&self.source, &output.source)
            .with_context(|| format!("could not write {}", self.source.display()))?;

        Ok(Outcome::Generated {
            classes: registry.classes.len(),
            files: self.inputs.len(),
        })
    }

    /// Coarse mtime check: true when both outputs exist and no input is
    /// strictly newer than the header output. Best-effort optimization, not
    /// a correctness guarantee.
    fn up_to_date(&self) -> Result<bool> {
        if !self.header.exists() || !self.source.exists() {
            return Ok(false);
        }

        let base = modification_time(&self.header)?;
        for input in &self.inputs {
            if modification_time(input)? > base {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn modification_time(path: &Path) -> Result<SystemTime> {
    fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .with_context(|| format!("couldn't stat {}", path.display()))
}
