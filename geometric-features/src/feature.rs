//! See documentation for [`Feature`].

use std::collections::BTreeMap;

use geo_types::Geometry;
use geometric_features_types::{GeometryKind, ObjectType};
use serde_json::Value;

use crate::error::FeatureError;

mod geojson;
mod tags;

pub use tags::Tags;

/// Property keys stored in the dedicated fields of [`Feature`] and written before any other property.
pub const RESERVED_PROPERTIES: [&str; 5] = ["name", "tags", "object", "component", "author"];

/// A single named region, transect or point.
///
/// The object type of a feature is always derived from its geometry, so a feature cannot be constructed with a
/// geometry that does not correspond to one of the [`ObjectType`]s. Properties other than the standard ones are kept
/// in a side map sorted by key.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    name: String,
    tags: Tags,
    object_type: ObjectType,
    component: String,
    author: String,
    properties: BTreeMap<String, Value>,
    geometry: Geometry<f64>,
}

impl Feature {
    /// Creates a new feature with no tags, empty author and no additional properties.
    ///
    /// Fails if the geometry is a geometry collection.
    pub fn new(
        name: impl Into<String>,
        component: impl Into<String>,
        geometry: Geometry<f64>,
    ) -> Result<Self, FeatureError> {
        let geometry = geometric_features_types::ops::normalize(geometry)?;
        let object_type = GeometryKind::of(&geometry).object_type()?;

        Ok(Self {
            name: name.into(),
            tags: Tags::default(),
            object_type,
            component: component.into(),
            author: String::new(),
            properties: BTreeMap::new(),
            geometry,
        })
    }

    /// Sets the author of the feature.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Sets the tags of the feature.
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Sets an additional property. Reserved property names are ignored.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set_property(key, value);
        self
    }

    /// Replaces the geometry of the feature. The object type is updated to match the new geometry.
    pub fn with_geometry(mut self, geometry: Geometry<f64>) -> Result<Self, FeatureError> {
        let geometry = geometric_features_types::ops::normalize(geometry)?;
        self.object_type = GeometryKind::of(&geometry).object_type()?;
        self.geometry = geometry;
        Ok(self)
    }

    /// Applies an operation that keeps the geometry type intact.
    pub(crate) fn map_geometry(mut self, f: impl FnOnce(&Geometry<f64>) -> Geometry<f64>) -> Self {
        self.geometry = f(&self.geometry);
        self
    }

    /// Unique name of the feature.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tags of the feature.
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// Mutable access to the tags of the feature.
    pub fn tags_mut(&mut self) -> &mut Tags {
        &mut self.tags
    }

    /// Kind of the object, as derived from the geometry.
    pub fn object_type(&self) -> ObjectType {
        self.object_type
    }

    /// Component (dataset) the feature belongs to, e.g. `ocean` or `landice`.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Author(s) of the feature.
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Geometry of the feature in lon/lat degrees.
    pub fn geometry(&self) -> &Geometry<f64> {
        &self.geometry
    }

    /// Additional properties, sorted by key.
    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    /// Value of an additional property.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Sets an additional property. Reserved property names are ignored.
    pub fn set_property(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        if RESERVED_PROPERTIES.contains(&key.as_str()) {
            log::warn!(
                "Property {key} of feature {} cannot be set as an additional property",
                self.name
            );
            return;
        }

        self.properties.insert(key, value);
    }

    /// Removes an additional property, returning its value.
    pub fn remove_property(&mut self, key: &str) -> Option<Value> {
        self.properties.remove(key)
    }
}
