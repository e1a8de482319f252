//! CSV metrics sink
//!
//! Writes one `step,tag,value,wall_time` row per report to
//! `<log_dir>/<run_name>/scalars.csv`, ready for pandas or a spreadsheet.

use std::fs::{File, create_dir_all};
use std::io::{Write, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::agent::Summary;
use crate::error::Result;

pub struct CsvSummary {
    log_dir: PathBuf,
    start: Instant,
    writer: BufWriter<File>,
}

impl CsvSummary {
    /// Create the run directory and the scalar file with its header
    pub fn new<P: AsRef<Path>>(log_dir: P, run_name: &str) -> Result<Self> {
        let log_path = log_dir.as_ref().join(run_name);
        create_dir_all(&log_path)?;

        let mut writer = BufWriter::new(File::create(log_path.join("scalars.csv"))?);
        writeln!(writer, "step,tag,value,wall_time")?;

        Ok(CsvSummary {
            log_dir: log_path,
            start: Instant::now(),
            writer,
        })
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Log a scalar value
    pub fn add_scalar(&mut self, step: usize, tag: &str, value: f32) -> Result<()> {
        let wall_time = self.start.elapsed().as_secs_f64();
        writeln!(self.writer, "{},{},{},{:.3}", step, tag, value, wall_time)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

impl Summary for CsvSummary {
    fn epsilon(&mut self, step: usize, value: f32) -> Result<()> {
        self.add_scalar(step, "epsilon", value)
    }

    fn log_episode(&mut self, step: usize, episode: usize) -> Result<()> {
        self.add_scalar(step, "episode", episode as f32)?;
        // Episode boundaries are rare; make them visible to readers right away
        self.flush()
    }
}

impl Drop for CsvSummary {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
