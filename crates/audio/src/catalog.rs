//! Sound asset checks done once at startup.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::registry::TrackRegistry;
use crate::types::Effect;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("sounds directory {0} does not exist")]
    MissingDir(PathBuf),
    #[error("missing sound files in {}: {}", dir.display(), files.join(", "))]
    MissingFiles { dir: PathBuf, files: Vec<String> },
}

/// Resolved paths of every effect cue.
#[derive(Debug, Clone)]
pub struct EffectCatalog {
    dir: PathBuf,
}

impl EffectCatalog {
    /// Check that every effect file exists under `dir`.
    ///
    /// All missing files are reported together so one run is enough to fix an
    /// incomplete install.
    pub fn verify(dir: &Path) -> Result<Self, AssetError> {
        if !dir.is_dir() {
            return Err(AssetError::MissingDir(dir.to_path_buf()));
        }
        let missing: Vec<String> = Effect::ALL
            .iter()
            .map(|e| e.file_name())
            .filter(|name| !dir.join(name).is_file())
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(AssetError::MissingFiles {
                dir: dir.to_path_buf(),
                files: missing,
            });
        }
        info!(dir = %dir.display(), effects = Effect::ALL.len(), "effect assets verified");
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Same check for the tracks a registry refers to.
    pub fn verify_tracks(dir: &Path, registry: &TrackRegistry) -> Result<(), AssetError> {
        let missing: Vec<String> = registry
            .track_paths()
            .filter(|path| !dir.join(path).is_file())
            .map(str::to_string)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(AssetError::MissingFiles {
                dir: dir.to_path_buf(),
                files: missing,
            })
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self, effect: Effect) -> PathBuf {
        self.dir.join(effect.file_name())
    }
}
