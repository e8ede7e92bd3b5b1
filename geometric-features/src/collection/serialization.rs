use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use geometric_features_types::geojson::DEFAULT_DIGITS;
use log::debug;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use super::FeatureCollection;
use crate::error::FeatureError;
use crate::provenance::provenance_command;

/// Options of writing a feature collection to GeoJSON.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteOptions {
    /// Remove the `history` property of the features instead of appending the provenance record to it.
    pub strip_history: bool,
    /// Number of spaces used for indentation.
    pub indent: usize,
    /// Number of decimal digits the coordinates are rounded to. `None` writes coordinates as they are.
    pub digits: Option<u32>,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            strip_history: false,
            indent: 4,
            digits: Some(DEFAULT_DIGITS),
        }
    }
}

impl WriteOptions {
    /// Sets [`WriteOptions::strip_history`].
    pub fn with_strip_history(mut self, strip_history: bool) -> Self {
        self.strip_history = strip_history;
        self
    }

    /// Sets [`WriteOptions::indent`].
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets [`WriteOptions::digits`].
    pub fn with_digits(mut self, digits: Option<u32>) -> Self {
        self.digits = digits;
        self
    }
}

/// Reads a feature collection from a GeoJSON file.
pub fn read_feature_collection(path: impl AsRef<Path>) -> Result<FeatureCollection, FeatureError> {
    let path = path.as_ref();
    debug!("Reading feature collection from {path:?}");

    let reader = BufReader::new(File::open(path)?);
    let value: Value = serde_json::from_reader(reader)?;
    FeatureCollection::from_json_value(&value)
}

impl FeatureCollection {
    /// Builds a collection from a parsed GeoJSON document.
    ///
    /// Every feature is validated (see [`crate::Feature::from_json`]) and features with repeated names are skipped.
    /// Members of the document other than `type` and `features` are kept as collection metadata.
    pub fn from_json_value(value: &Value) -> Result<Self, FeatureError> {
        let object = value
            .as_object()
            .ok_or_else(|| FeatureError::InvalidCollection("expected a JSON object".to_string()))?;
        let features = object
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| FeatureError::InvalidCollection("no features array".to_string()))?;

        let mut collection = FeatureCollection::new();
        for feature in features {
            collection.add_json_feature(feature)?;
        }

        let mut keys: Vec<&String> = object.keys().collect();
        keys.sort();
        for key in keys {
            if key != "type" && key != "features" {
                collection.set_metadata(key.clone(), object[key].clone());
            }
        }

        Ok(collection)
    }

    /// Parses a collection from a GeoJSON string.
    pub fn from_json_str(json: &str) -> Result<Self, FeatureError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(&value)
    }

    /// Converts the collection into a GeoJSON document.
    ///
    /// Members are written in the order `type`, `groupName`, metadata and `features`. Unless
    /// [`WriteOptions::strip_history`] is set, the provenance record of the current process is appended to the
    /// `history` of every feature.
    pub fn to_json_value(&self, options: &WriteOptions) -> Result<Value, FeatureError> {
        let command = (!options.strip_history).then(provenance_command);

        let mut features = Vec::with_capacity(self.features.len());
        for feature in &self.features {
            let mut feature = feature.clone();
            match &command {
                None => {
                    feature.remove_property("history");
                }
                Some(command) => {
                    let history = match feature.property("history") {
                        Some(Value::String(history)) => format!("{history} {command}"),
                        Some(other) => format!("{other} {command}"),
                        None => command.clone(),
                    };
                    feature.set_property("history", Value::String(history));
                }
            }

            features.push(feature.to_json(options.digits)?);
        }

        let mut document = Map::new();
        document.insert("type".into(), Value::String("FeatureCollection".into()));
        if let Some(group_name) = &self.group_name {
            document.insert("groupName".into(), Value::String(group_name.clone()));
        }
        for (key, value) in &self.metadata {
            document.insert(key.clone(), value.clone());
        }
        document.insert("features".into(), Value::Array(features));

        Ok(Value::Object(document))
    }

    /// Writes the collection as GeoJSON.
    pub fn to_writer(&self, writer: impl Write, options: &WriteOptions) -> Result<(), FeatureError> {
        let value = self.to_json_value(options)?;
        let indent = vec![b' '; options.indent];
        let mut serializer =
            serde_json::Serializer::with_formatter(writer, PrettyFormatter::with_indent(&indent));
        value.serialize(&mut serializer)?;
        Ok(())
    }

    /// Writes the collection to a GeoJSON file, replacing it if it exists.
    pub fn to_geojson(&self, path: impl AsRef<Path>, options: &WriteOptions) -> Result<(), FeatureError> {
        let path = path.as_ref();
        debug!("Writing {} features to {path:?}", self.features.len());

        let mut writer = BufWriter::new(File::create(path)?);
        self.to_writer(&mut writer, options)?;
        writer.flush()?;
        Ok(())
    }
}
