use std::collections::BTreeMap;

use geometric_features_types::geojson::{geometry_from_json, geometry_to_json};
use geometric_features_types::{GeometryKind, ObjectType};
use serde_json::{Map, Value};

use super::{Feature, Tags, RESERVED_PROPERTIES};
use crate::error::FeatureError;

const REQUIRED_KEYS: [(&str, &[&str]); 2] = [
    ("properties", &["name", "object", "component"]),
    ("geometry", &["type", "coordinates"]),
];

fn as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Feature {
    /// Validates a GeoJSON feature object and converts it into a feature.
    ///
    /// The `properties` of the feature must contain `name`, `object` and `component` and the `geometry` must
    /// contain `type` and `coordinates`. The declared `object` must be the one that corresponds to the geometry
    /// type. Members of the feature other than `properties` and `geometry` are not kept.
    pub fn from_json(value: &Value) -> Result<Self, FeatureError> {
        let name = value
            .get("properties")
            .and_then(|properties| properties.get("name"))
            .map(as_string)
            .unwrap_or_else(|| "unknown".to_string());

        for (outer, inner_keys) in REQUIRED_KEYS {
            let Some(outer_value) = value.get(outer) else {
                return Err(FeatureError::MissingKey {
                    feature: name,
                    path: format!("[{outer}]"),
                });
            };

            for inner in inner_keys {
                if outer_value.get(inner).is_none() {
                    return Err(FeatureError::MissingKey {
                        feature: name,
                        path: format!("[{outer}][{inner}]"),
                    });
                }
            }
        }

        let properties = &value["properties"];
        let geometry_value = &value["geometry"];

        let declared_object = as_string(&properties["object"]);
        let geometry_type = as_string(&geometry_value["type"]);
        let mismatch = || FeatureError::TypeMismatch {
            object: declared_object.clone(),
            geometry: geometry_type.clone(),
        };

        let expected_object = geometry_type
            .parse::<GeometryKind>()
            .and_then(|kind| kind.object_type())
            .map_err(|_| mismatch())?;
        if declared_object.parse::<ObjectType>().ok() != Some(expected_object) {
            return Err(mismatch());
        }

        let geometry = geometry_from_json(geometry_value)?;

        let mut feature = Feature::new(name, as_string(&properties["component"]), geometry)?;
        if let Some(author) = properties.get("author") {
            feature.author = as_string(author);
        }
        if let Some(tags) = properties.get("tags") {
            feature.tags = Tags::parse(&as_string(tags));
        }

        if let Some(map) = properties.as_object() {
            feature.properties = map
                .iter()
                .filter(|(key, _)| !RESERVED_PROPERTIES.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<BTreeMap<_, _>>();
        }

        Ok(feature)
    }

    /// Writes the feature as a GeoJSON feature object.
    ///
    /// Properties are written in a fixed order: `name`, `tags`, `object`, `component`, `author` and then the
    /// additional properties sorted by key. If `digits` is given, coordinates are rounded to that number of decimal
    /// digits.
    pub fn to_json(&self, digits: Option<u32>) -> Result<Value, FeatureError> {
        let mut properties = Map::new();
        properties.insert("name".into(), Value::String(self.name.clone()));
        properties.insert("tags".into(), Value::String(self.tags.to_string()));
        properties.insert(
            "object".into(),
            Value::String(self.object_type.as_str().to_string()),
        );
        properties.insert("component".into(), Value::String(self.component.clone()));
        properties.insert("author".into(), Value::String(self.author.clone()));
        for (key, value) in &self.properties {
            properties.insert(key.clone(), value.clone());
        }

        let mut feature = Map::new();
        feature.insert("type".into(), Value::String("Feature".into()));
        feature.insert("properties".into(), Value::Object(properties));
        feature.insert("geometry".into(), geometry_to_json(&self.geometry, digits)?);

        Ok(Value::Object(feature))
    }
}
