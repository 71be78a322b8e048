//! Impulse-response output artifacts
//!
//! The history-tracking simulation mode persists per-run numeric arrays to
//! plain delimited text: vectors as one value per line, matrices as one
//! space-delimited row per period. File names carry the run's version tag,
//! e.g. `muhist3.txt`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writer for one run's artifact set
///
/// # Example
///
/// ```no_run
/// use pricing_simulator_core_rs::output::OutcomeWriter;
///
/// let writer = OutcomeWriter::new("/tmp/run_artifacts", 3);
/// writer.save_vector("p", &[0.0, 0.28, 0.29]).unwrap();
/// // Wrote /tmp/run_artifacts/p3.txt
/// ```
#[derive(Debug, Clone)]
pub struct OutcomeWriter {
    dir: PathBuf,
    version: u32,
}

impl OutcomeWriter {
    pub fn new(dir: impl Into<PathBuf>, version: u32) -> Self {
        Self {
            dir: dir.into(),
            version,
        }
    }

    /// Full path of a named artifact for this run's version tag
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}{}.txt", name, self.version))
    }

    /// Persist a vector, one value per line
    pub fn save_vector(&self, name: &str, values: &[f64]) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut out = BufWriter::new(File::create(self.path(name))?);
        for v in values {
            writeln!(out, "{:.12e}", v)?;
        }
        out.flush()
    }

    /// Persist a matrix, one space-delimited row per line
    pub fn save_matrix(&self, name: &str, rows: &[Vec<f64>]) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let mut out = BufWriter::new(File::create(self.path(name))?);
        for row in rows {
            let mut first = true;
            for v in row {
                if !first {
                    write!(out, " ")?;
                }
                write!(out, "{:.12e}", v)?;
                first = false;
            }
            writeln!(out)?;
        }
        out.flush()
    }
}

/// Read a vector artifact back (used in tests and downstream analysis)
pub fn load_vector(path: &Path) -> std::io::Result<Vec<f64>> {
    let text = std::fs::read_to_string(path)?;
    text.lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            l.trim().parse::<f64>().map_err(|e| {
                std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
            })
        })
        .collect()
}
