//! See documentation for [`Catalog`].

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::collection::read_feature_collection;
use crate::error::FeatureError;
use crate::feature::Tags;

/// Name of the catalog file.
pub const CATALOG_FILE_NAME: &str = "features_and_tags.json";

/// A named feature of the catalog with its tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Feature name.
    pub name: String,
    /// Tags of the feature.
    pub tags: Tags,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ObjectEntries {
    object: String,
    features: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ComponentEntries {
    component: String,
    objects: Vec<ObjectEntries>,
}

/// List of all features available in a feature cache, grouped by component and object type.
///
/// The catalog is stored as `features_and_tags.json`:
///
/// ```json
/// {
///   "ocean": {
///     "region": {
///       "Arctic Ocean": ["Arctic", "Ocean"]
///     }
///   }
/// }
/// ```
///
/// Order of components, object types and features is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    components: Vec<ComponentEntries>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the catalog from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FeatureError> {
        let path = path.as_ref();
        debug!("Loading feature catalog from {path:?}");

        let value: Value = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        Self::from_json_value(&value)
    }

    /// Parses the catalog from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, FeatureError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(&value)
    }

    /// Builds the catalog from parsed JSON.
    pub fn from_json_value(value: &Value) -> Result<Self, FeatureError> {
        let invalid = |what: &str| FeatureError::Lookup(format!("invalid catalog: {what} must be an object"));

        let mut catalog = Catalog::new();
        for (component, objects) in value.as_object().ok_or_else(|| invalid("catalog"))? {
            for (object, features) in objects.as_object().ok_or_else(|| invalid(component.as_str()))? {
                for (name, tags) in features.as_object().ok_or_else(|| invalid(object.as_str()))? {
                    let tags = match tags {
                        Value::Array(tags) => tags
                            .iter()
                            .map(|tag| match tag {
                                Value::String(tag) => tag.clone(),
                                other => other.to_string(),
                            })
                            .collect(),
                        Value::String(tags) => Tags::parse(tags),
                        _ => Tags::default(),
                    };
                    catalog.insert(component, object, name, tags);
                }
            }
        }

        Ok(catalog)
    }

    /// Rebuilds the catalog by scanning a feature cache.
    ///
    /// Every file matching `<cache>/*/*/*/*.geojson` is read, and the first feature of each file is added to the
    /// catalog. Files are visited in sorted order.
    pub fn from_cache_dir(cache: impl AsRef<Path>) -> Result<Self, FeatureError> {
        let mut files = vec![];
        collect_feature_files(cache.as_ref(), 0, &mut files)?;
        files.sort();

        let mut catalog = Catalog::new();
        for file in files {
            debug!("Adding {file:?} to the catalog");
            let collection = read_feature_collection(&file)?;
            let Some(feature) = collection.features().first() else {
                continue;
            };

            catalog.insert(
                feature.component(),
                feature.object_type().as_str(),
                feature.name(),
                feature.tags().clone(),
            );
        }

        info!(
            "Catalog built with {} features",
            catalog.entries().count()
        );
        Ok(catalog)
    }

    /// Adds a feature to the catalog. If a feature with the same name is already listed for the component and object
    /// type, its tags are replaced.
    pub fn insert(&mut self, component: &str, object: &str, name: &str, tags: Tags) {
        let component_index = match self.components.iter().position(|c| c.component == component) {
            Some(index) => index,
            None => {
                self.components.push(ComponentEntries {
                    component: component.to_string(),
                    objects: vec![],
                });
                self.components.len() - 1
            }
        };
        let objects = &mut self.components[component_index].objects;

        let object_index = match objects.iter().position(|o| o.object == object) {
            Some(index) => index,
            None => {
                objects.push(ObjectEntries {
                    object: object.to_string(),
                    features: vec![],
                });
                objects.len() - 1
            }
        };
        let features = &mut objects[object_index].features;

        match features.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => entry.tags = tags,
            None => features.push(CatalogEntry {
                name: name.to_string(),
                tags,
            }),
        }
    }

    /// Names of the components in the catalog.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.component.as_str())
    }

    /// Features available for the component and object type.
    pub fn features(&self, component: &str, object: &str) -> Result<&[CatalogEntry], FeatureError> {
        let entries = self
            .components
            .iter()
            .find(|c| c.component == component)
            .ok_or_else(|| FeatureError::Lookup(format!("invalid component {component}")))?;

        entries
            .objects
            .iter()
            .find(|o| o.object == object)
            .map(|o| o.features.as_slice())
            .ok_or_else(|| {
                FeatureError::Lookup(format!(
                    "invalid object {object} in component {component}"
                ))
            })
    }

    /// Iterates over all `(component, object, entry)` triples of the catalog.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &CatalogEntry)> {
        self.components.iter().flat_map(|c| {
            c.objects.iter().flat_map(move |o| {
                o.features
                    .iter()
                    .map(move |entry| (c.component.as_str(), o.object.as_str(), entry))
            })
        })
    }

    /// Resolves a feature query to a list of feature names.
    ///
    /// If neither `names` nor `tags` are given, all features of the component and object type are returned.
    /// Otherwise the result contains the requested `names` followed by the features that have all the `tags` (or any
    /// of them, if `all_tags` is false). Each name is returned once.
    ///
    /// Fails if the component, the object type or any of the requested names is not in the catalog.
    pub fn feature_names(
        &self,
        component: &str,
        object: &str,
        names: Option<&[String]>,
        tags: Option<&[String]>,
        all_tags: bool,
    ) -> Result<Vec<String>, FeatureError> {
        let available = self.features(component, object)?;

        if names.is_none() && tags.is_none() {
            return Ok(available.iter().map(|entry| entry.name.clone()).collect());
        }

        let mut result: Vec<String> = vec![];
        for name in names.unwrap_or_default() {
            if !available.iter().any(|entry| &entry.name == name) {
                return Err(FeatureError::Lookup(format!("invalid feature {name}")));
            }
            if !result.contains(name) {
                result.push(name.clone());
            }
        }

        if let Some(tags) = tags {
            for entry in available {
                if entry.tags.matches(tags, all_tags) && !result.contains(&entry.name) {
                    result.push(entry.name.clone());
                }
            }
        }

        Ok(result)
    }

    /// Converts the catalog into JSON.
    pub fn to_json_value(&self) -> Value {
        let mut catalog = Map::new();
        for component in &self.components {
            let mut objects = Map::new();
            for object in &component.objects {
                let mut features = Map::new();
                for entry in &object.features {
                    features.insert(
                        entry.name.clone(),
                        Value::Array(
                            entry
                                .tags
                                .iter()
                                .map(|tag| Value::String(tag.to_string()))
                                .collect(),
                        ),
                    );
                }
                objects.insert(object.object.clone(), Value::Object(features));
            }
            catalog.insert(component.component.clone(), Value::Object(objects));
        }

        Value::Object(catalog)
    }

    /// Writes the catalog to a JSON file with two-space indentation.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), FeatureError> {
        let path = path.as_ref();
        debug!("Writing feature catalog to {path:?}");

        let mut writer = BufWriter::new(File::create(path)?);
        let mut serializer = serde_json::Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b"  "));
        self.to_json_value().serialize(&mut serializer)?;
        writer.flush()?;
        Ok(())
    }
}

/// Collects `*.geojson` files exactly three directory levels below `dir`.
fn collect_feature_files(dir: &Path, depth: usize, files: &mut Vec<PathBuf>) -> Result<(), FeatureError> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if depth < 3 {
            if path.is_dir() {
                collect_feature_files(&path, depth + 1, files)?;
            }
        } else if path.is_file() && path.extension().is_some_and(|ext| ext == "geojson") {
            files.push(path);
        }
    }

    Ok(())
}
