use std::path::{Path, PathBuf};

use log::debug;

use crate::error::FeatureError;

/// Provides feature files that are missing from the local cache.
pub trait FeatureSource: Send + Sync {
    /// Stores the file with the given path relative to the cache root (e.g.
    /// `ocean/region/Arctic_Ocean/region.geojson`) at `destination`.
    fn fetch(&self, relative_path: &Path, destination: &Path) -> Result<(), FeatureError>;
}

/// Takes feature files from another feature cache directory, e.g. a local checkout of the feature repository.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a new instance reading files from the `root` directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the source.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FeatureSource for DirectorySource {
    fn fetch(&self, relative_path: &Path, destination: &Path) -> Result<(), FeatureError> {
        let source = self.root.join(relative_path);
        if !source.is_file() {
            return Err(FeatureError::Lookup(format!(
                "feature file {source:?} not found"
            )));
        }

        if let Some(folder) = destination.parent() {
            std::fs::create_dir_all(folder)?;
        }

        debug!("Copying {source:?} to {destination:?}");
        std::fs::copy(&source, destination)?;
        Ok(())
    }
}
