//! Local cache of catalog features, stored one feature per file.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::catalog::Catalog;
use crate::collection::{read_feature_collection, FeatureCollection, WriteOptions};
use crate::error::FeatureError;

mod source;

pub use source::{DirectorySource, FeatureSource};

/// Environment variable with the location of the feature cache.
pub const CACHE_DIR_ENV: &str = "GEOMETRIC_DATA_DIR";

/// Location of the feature cache used when neither an explicit location nor [`CACHE_DIR_ENV`] is given.
pub const DEFAULT_CACHE_DIR: &str = "./geometric_data";

/// Number of attempts to fetch a missing file by default.
pub const DEFAULT_RETRIES: usize = 3;

const BAD_CHARACTERS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\'', ',', ';'];

/// Directory name used for a feature in the cache.
///
/// Surrounding whitespace is trimmed, spaces are replaced with `_`, leading and trailing dots are removed and so are
/// characters that are not allowed in file names on common file systems.
pub fn sanitize_feature_name(name: &str) -> String {
    name.trim()
        .replace(' ', "_")
        .trim_matches('.')
        .chars()
        .filter(|c| !BAD_CHARACTERS.contains(c))
        .collect()
}

/// Path of the feature file relative to the cache root: `<component>/<object>/<sanitized name>/<object>.geojson`.
pub fn feature_file_name(component: &str, object: &str, name: &str) -> PathBuf {
    let mut path = PathBuf::from(component);
    path.push(object);
    path.push(sanitize_feature_name(name));
    path.push(format!("{object}.geojson"));
    path
}

/// Reads features from a local cache, fetching missing files from a [`FeatureSource`].
pub struct GeometricFeatures {
    catalog: Catalog,
    cache_location: PathBuf,
    source: Option<Box<dyn FeatureSource>>,
    retries: usize,
}

impl GeometricFeatures {
    /// Creates a new instance for the given catalog.
    ///
    /// The cache is located in the directory given by the `GEOMETRIC_DATA_DIR` environment variable, or in
    /// `./geometric_data` if it is not set. No source is set, so files missing from the cache cannot be read.
    pub fn new(catalog: Catalog) -> Self {
        let cache_location = std::env::var_os(CACHE_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR));

        Self {
            catalog,
            cache_location,
            source: None,
            retries: DEFAULT_RETRIES,
        }
    }

    /// Sets the location of the cache.
    pub fn with_cache_location(mut self, cache_location: impl Into<PathBuf>) -> Self {
        self.cache_location = cache_location.into();
        self
    }

    /// Sets the source missing files are fetched from.
    pub fn with_source(mut self, source: impl FeatureSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Sets the number of attempts to fetch each missing file.
    pub fn with_retries(mut self, retries: usize) -> Self {
        self.retries = retries.max(1);
        self
    }

    /// Location of the cache.
    pub fn cache_location(&self) -> &Path {
        &self.cache_location
    }

    /// Catalog of available features.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Reads features of the component and object type.
    ///
    /// Features are selected by name and tags as described in [`Catalog::feature_names`]. Files missing from the cache
    /// are fetched from the source first.
    pub fn read(
        &self,
        component: &str,
        object: &str,
        names: Option<&[String]>,
        tags: Option<&[String]>,
        all_tags: bool,
    ) -> Result<FeatureCollection, FeatureError> {
        let names = self
            .catalog
            .feature_names(component, object, names, tags, all_tags)?;
        let files = self.ensure_files(component, object, &names)?;

        let mut collection = FeatureCollection::new();
        for file in files {
            collection.merge(&read_feature_collection(&file)?);
        }

        info!(
            "Read {} {object} features of component {component}",
            collection.len()
        );
        Ok(collection)
    }

    /// Writes each feature of the collection to its own file under `destination` (or the cache location if it is
    /// `None`). Files are written without history and group name.
    ///
    /// Returns the paths of the written files.
    pub fn split(
        &self,
        collection: &FeatureCollection,
        destination: Option<&Path>,
    ) -> Result<Vec<PathBuf>, FeatureError> {
        let destination = destination.unwrap_or(self.cache_location.as_path());
        let options = WriteOptions::default().with_strip_history(true);

        let mut paths = Vec::with_capacity(collection.len());
        for feature in collection {
            let path = destination.join(feature_file_name(
                feature.component(),
                feature.object_type().as_str(),
                feature.name(),
            ));
            if let Some(folder) = path.parent() {
                std::fs::create_dir_all(folder)?;
            }

            let mut single = FeatureCollection::from_features([feature.clone()]);
            single.clear_group_name();
            single.to_geojson(&path, &options)?;

            debug!("Feature {} written to {path:?}", feature.name());
            paths.push(path);
        }

        Ok(paths)
    }

    fn ensure_files(&self, component: &str, object: &str, names: &[String]) -> Result<Vec<PathBuf>, FeatureError> {
        std::fs::create_dir_all(&self.cache_location)?;

        let mut files = Vec::with_capacity(names.len());
        for name in names {
            let relative_path = feature_file_name(component, object, name);
            let path = self.cache_location.join(&relative_path);
            if !path.exists() {
                self.fetch(&relative_path, &path)?;
            }

            files.push(path);
        }

        Ok(files)
    }

    fn fetch(&self, relative_path: &Path, destination: &Path) -> Result<(), FeatureError> {
        let Some(source) = &self.source else {
            return Err(FeatureError::Lookup(format!(
                "feature file {destination:?} is not in the cache"
            )));
        };

        let mut attempt = 1;
        loop {
            debug!("Fetching {relative_path:?}, attempt {attempt}");
            match source.fetch(relative_path, destination) {
                Ok(()) => return Ok(()),
                Err(err) if attempt < self.retries => {
                    warn!("Failed to fetch {relative_path:?}: {err}");
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
