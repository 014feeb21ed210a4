//! Artifact writer
//!
//! Puts a rendered [`MigrationPair`] on disk as a whole or not at all. Both
//! scripts are first written and synced to temporary files next to their
//! targets, then renamed into place. If the second rename fails, the first
//! target is rolled back to what it held before the run.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{GeneratorError, Result};
use crate::generator::MigrationPair;

pub const UP_FILE: &str = "up.sql";
pub const DOWN_FILE: &str = "down.sql";

/// Where the last successful write landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenArtifacts {
    pub up: PathBuf,
    pub down: PathBuf,
}

/// Writes migration pairs into a fixed directory
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    out_dir: PathBuf,
    up_file: String,
    down_file: String,
}

impl ArtifactWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            up_file: UP_FILE.to_string(),
            down_file: DOWN_FILE.to_string(),
        }
    }

    /// Override the artifact file names
    pub fn with_file_names(mut self, up: impl Into<String>, down: impl Into<String>) -> Self {
        self.up_file = up.into();
        self.down_file = down.into();
        self
    }

    pub fn up_path(&self) -> PathBuf {
        self.out_dir.join(&self.up_file)
    }

    pub fn down_path(&self) -> PathBuf {
        self.out_dir.join(&self.down_file)
    }

    /// Replace both artifacts with `pair`
    pub fn write_pair(&self, pair: &MigrationPair) -> Result<WrittenArtifacts> {
        let up_path = self.up_path();
        let down_path = self.down_path();
        if up_path == down_path {
            return Err(GeneratorError::ArtifactClash { path: up_path });
        }

        fs::create_dir_all(&self.out_dir).map_err(|source| GeneratorError::Io {
            path: self.out_dir.clone(),
            source,
        })?;

        // Phase 1: everything staged, nothing visible yet
        let up_tmp = self.stage(&up_path, pair.up.as_bytes())?;
        let down_tmp = self.stage(&down_path, pair.down.as_bytes())?;
        let previous_up = read_existing(&up_path)?;

        // Phase 2: swap
        persist(up_tmp, &up_path)?;
        if let Err(err) = persist(down_tmp, &down_path) {
            warn!(
                "Failed to replace {}, restoring {}",
                down_path.display(),
                up_path.display()
            );
            self.restore(&up_path, previous_up.as_deref());
            return Err(err);
        }

        info!("Wrote {} and {}", up_path.display(), down_path.display());

        Ok(WrittenArtifacts {
            up: up_path,
            down: down_path,
        })
    }

    fn stage(&self, target: &Path, contents: &[u8]) -> Result<NamedTempFile> {
        let io_err = |source| GeneratorError::Io {
            path: target.to_path_buf(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.out_dir).map_err(io_err)?;
        tmp.write_all(contents).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;

        debug!("Staged {} at {}", target.display(), tmp.path().display());
        Ok(tmp)
    }

    /// Best effort: the original failure is what gets reported
    fn restore(&self, target: &Path, previous: Option<&[u8]>) {
        let outcome = match previous {
            Some(contents) => self
                .stage(target, contents)
                .and_then(|tmp| persist(tmp, target)),
            None => fs::remove_file(target).map_err(|source| GeneratorError::Io {
                path: target.to_path_buf(),
                source,
            }),
        };

        if let Err(e) = outcome {
            warn!(error = ?e, "Could not restore {}", target.display());
        }
    }
}

impl Default for ArtifactWriter {
    fn default() -> Self {
        Self::new(".")
    }
}

fn read_existing(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn persist(tmp: NamedTempFile, target: &Path) -> Result<()> {
    tmp.persist(target)
        .map(|_| ())
        .map_err(|e| GeneratorError::Persist {
            path: target.to_path_buf(),
            source: e.error,
        })
}
