//! See documentation for [`FeatureCollection`].

use std::borrow::Cow;
use std::collections::BTreeSet;

use ahash::{HashSet, HashSetExt};
use geometric_features_types::antimeridian::split_at_antimeridian;
use geometric_features_types::prime_meridian::split_at_prime_meridian;
use geometric_features_types::subdivide::subdivide;
use geometric_features_types::{ops, GeometryError};
use log::{debug, info, warn};
use rayon::prelude::*;
use serde_json::{Map, Value};

use crate::error::FeatureError;
use crate::feature::Feature;

mod serialization;

pub use serialization::{read_feature_collection, WriteOptions};

/// Group name of a newly created collection.
pub const DEFAULT_GROUP_NAME: &str = "enterGroupName";

/// Ordered set of features with unique names.
///
/// Adding a feature whose name is already in the collection does nothing. All operations that modify geometry
/// ([`combine`](FeatureCollection::combine), [`difference`](FeatureCollection::difference),
/// [`fix_antimeridian`](FeatureCollection::fix_antimeridian), [`simplify`](FeatureCollection::simplify), etc.)
/// return a new collection and leave the original untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
    names: HashSet<String>,
    group_name: Option<String>,
    metadata: Map<String, Value>,
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::new()
    }
}

enum MaskOutcome {
    Unchanged,
    Masked(Feature),
    Dropped,
}

impl FeatureCollection {
    /// Creates an empty collection with the default group name.
    pub fn new() -> Self {
        Self {
            features: vec![],
            names: HashSet::new(),
            group_name: Some(DEFAULT_GROUP_NAME.to_string()),
            metadata: Map::new(),
        }
    }

    /// Creates a collection from the features. Features with repeated names are skipped.
    pub fn from_features(features: impl IntoIterator<Item = Feature>) -> Self {
        let mut collection = Self::new();
        for feature in features {
            collection.add_feature(feature);
        }

        collection
    }

    /// Creates an empty collection with the same group name and metadata as this one.
    fn empty_like(&self) -> Self {
        Self {
            features: vec![],
            names: HashSet::new(),
            group_name: self.group_name.clone(),
            metadata: self.metadata.clone(),
        }
    }

    /// Features of the collection in insertion order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Iterates over the features in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.iter()
    }

    /// Number of features in the collection.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Returns true if the collection has no features.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Feature with the given name.
    pub fn get(&self, name: &str) -> Option<&Feature> {
        if !self.names.contains(name) {
            return None;
        }

        self.features.iter().find(|f| f.name() == name)
    }

    /// Returns true if a feature with this name is in the collection.
    pub fn contains_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns true if a feature with the same name as `feature` is in the collection.
    pub fn feature_in_collection(&self, feature: &Feature) -> bool {
        self.contains_name(feature.name())
    }

    /// Group name of the collection, if set.
    pub fn group_name(&self) -> Option<&str> {
        self.group_name.as_deref()
    }

    /// Sets the group name of the collection.
    pub fn set_group_name(&mut self, group_name: impl Into<String>) {
        self.group_name = Some(group_name.into());
    }

    /// Removes the group name of the collection.
    pub fn clear_group_name(&mut self) {
        self.group_name = None;
    }

    /// Collection-level members other than `type`, `groupName` and `features`.
    pub fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    /// Sets a collection-level member. `type`, `groupName` and `features` are managed by the collection and cannot be
    /// set this way.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match key.as_str() {
            "type" | "features" => {
                warn!("Member {key} of a feature collection cannot be set as metadata")
            }
            "groupName" => match value {
                Value::String(name) => self.group_name = Some(name),
                other => self.group_name = Some(other.to_string()),
            },
            _ => {
                self.metadata.insert(key, value);
            }
        }
    }

    /// Adds the feature to the end of the collection, unless a feature with the same name is already there.
    ///
    /// Returns true if the feature was added.
    pub fn add_feature(&mut self, feature: Feature) -> bool {
        if self.names.contains(feature.name()) {
            return false;
        }

        self.names.insert(feature.name().to_string());
        self.features.push(feature);
        true
    }

    /// Validates a GeoJSON feature object and adds it to the collection (see [`Feature::from_json`] and
    /// [`FeatureCollection::add_feature`]).
    pub fn add_json_feature(&mut self, value: &Value) -> Result<bool, FeatureError> {
        let feature = Feature::from_json(value)?;
        Ok(self.add_feature(feature))
    }

    /// Adds all features of `other` to this collection.
    ///
    /// If both collections have a feature with the same name, the feature of this collection is kept, so
    /// `a.merge(b)` and `b.merge(a)` are in general different. Metadata members of `other` that are not set in this
    /// collection are copied over.
    pub fn merge(&mut self, other: &FeatureCollection) {
        for feature in &other.features {
            if !self.feature_in_collection(feature) {
                self.add_feature(feature.clone());
            }
        }

        if self.group_name.is_none() {
            self.group_name = other.group_name.clone();
        }

        let mut keys: Vec<&String> = other.metadata.keys().collect();
        keys.sort();
        for key in keys {
            if !self.metadata.contains_key(key) {
                self.metadata.insert(key.clone(), other.metadata[key].clone());
            }
        }
    }

    /// Adds the tags to every feature of the collection, or removes them if `remove` is set.
    pub fn tag<S: AsRef<str>>(&mut self, tags: &[S], remove: bool) {
        for feature in &mut self.features {
            let feature_tags = feature.tags_mut();
            for tag in tags {
                if remove {
                    feature_tags.remove(tag.as_ref());
                } else {
                    feature_tags.insert(tag.as_ref());
                }
            }
        }
    }

    /// Returns a collection with the features that have all of the `tags` (or, with `all_tags = false`, any of them).
    pub fn filter_by_tags<S: AsRef<str>>(&self, tags: &[S], all_tags: bool) -> FeatureCollection {
        let mut filtered = self.empty_like();
        for feature in &self.features {
            if feature.tags().matches(tags, all_tags) {
                filtered.add_feature(feature.clone());
            }
        }

        filtered
    }

    /// Unites the geometries of all features into a single feature with the given name.
    ///
    /// The new feature takes its component from the first feature of the collection. Its author is the sorted list of
    /// unique authors of the features, and the `constituents` property lists the names of the combined features, both
    /// separated by `; `. Features without an author do not add an empty entry to that list, so the author of the
    /// union is empty only if none of the features has one. The new feature has no tags.
    ///
    /// The features must all be of the same object type: if the union cannot be represented as a region, a transect
    /// or a point, a [`FeatureError::Combine`] error is returned.
    pub fn combine(&self, name: &str) -> Result<FeatureCollection, FeatureError> {
        let first = self
            .features
            .first()
            .ok_or(FeatureError::EmptyCollection("combine"))?;

        let shape = ops::union_all(self.features.iter().map(Feature::geometry)).map_err(|err| match err {
            GeometryError::UnsupportedGeometry(geometry_type) => FeatureError::Combine { geometry_type },
            other => other.into(),
        })?;

        let authors: BTreeSet<&str> = self
            .features
            .iter()
            .map(Feature::author)
            .filter(|author| !author.is_empty())
            .collect();
        let constituents: BTreeSet<&str> = self.features.iter().map(Feature::name).collect();

        let feature = Feature::new(name, first.component(), shape)?
            .with_author(authors.into_iter().collect::<Vec<_>>().join("; "))
            .with_property(
                "constituents",
                Value::String(constituents.into_iter().collect::<Vec<_>>().join("; ")),
            );

        Ok(FeatureCollection::from_features([feature]))
    }

    /// Removes the parts of features covered by the features of `masks`.
    ///
    /// Every mask that intersects a feature is subtracted from it in turn. Features that become empty are dropped,
    /// and features that no mask intersects are kept exactly as they are.
    pub fn difference(&self, masks: &FeatureCollection) -> Result<FeatureCollection, FeatureError> {
        info!(
            "Masking {} features with {} masks",
            self.features.len(),
            masks.features.len()
        );

        let outcomes = self
            .features
            .par_iter()
            .map(|feature| mask_feature(feature, masks))
            .collect::<Result<Vec<_>, _>>()?;

        let mut result = self.empty_like();
        let mut masked_count = 0;
        let mut dropped_count = 0;
        for (feature, outcome) in self.features.iter().zip(outcomes) {
            match outcome {
                MaskOutcome::Unchanged => {
                    result.add_feature(feature.clone());
                }
                MaskOutcome::Masked(masked) => {
                    masked_count += 1;
                    result.add_feature(masked);
                }
                MaskOutcome::Dropped => dropped_count += 1,
            }
        }

        info!(
            "{} features unchanged, {masked_count} masked and {dropped_count} dropped",
            self.features.len() - masked_count - dropped_count
        );

        Ok(result)
    }

    /// Keeps the parts of features that are covered by every feature of `other`.
    ///
    /// Features that do not intersect that shape are dropped. The result of intersecting a transect with a region is a
    /// transect, and points are kept only if they lie within the shape.
    pub fn intersection(&self, other: &FeatureCollection) -> Result<FeatureCollection, FeatureError> {
        let mut masks = other.features.iter().map(Feature::geometry);
        let first = masks
            .next()
            .ok_or(FeatureError::EmptyCollection("intersect with"))?;

        let mut shape = first.clone();
        for mask in masks {
            shape = ops::intersection(&shape, mask)?;
        }

        let mut result = self.empty_like();
        for feature in &self.features {
            if !ops::intersects(feature.geometry(), &shape) {
                warn!("Feature {} does not intersect the shape and is dropped", feature.name());
                continue;
            }

            let intersected = ops::intersection(feature.geometry(), &shape)?;
            if ops::is_empty(&intersected) {
                warn!("Intersection with feature {} is empty and is dropped", feature.name());
                continue;
            }

            result.add_feature(feature.clone().with_geometry(intersected)?);
        }

        info!(
            "{} of {} features kept after intersection",
            result.len(),
            self.features.len()
        );

        Ok(result)
    }

    /// Splits features crossing the antimeridian into pieces on either side of it.
    ///
    /// Features that do not cross the antimeridian are kept as they are. Edges longer than 180° of longitude are
    /// not handled correctly; use [`FeatureCollection::subdivide`] first for such features.
    pub fn fix_antimeridian(&self) -> Result<FeatureCollection, FeatureError> {
        let mut result = self.empty_like();
        let mut split_count = 0;
        for feature in &self.features {
            match split_at_antimeridian(feature.geometry()) {
                Some(geometry) => {
                    split_count += 1;
                    result.add_feature(feature.clone().with_geometry(geometry)?);
                }
                None => {
                    result.add_feature(feature.clone());
                }
            }
        }

        info!("{split_count} features split at the antimeridian");
        Ok(result)
    }

    /// Splits features crossing the prime meridian and moves their western parts 360° to the east.
    ///
    /// Split features lie in the `[0, 360]` longitude range, which suits grids that start at 0°. Features crossing
    /// the antimeridian must be fixed with [`FeatureCollection::fix_antimeridian`] first. Features that do not touch
    /// the prime meridian and point features are kept as they are.
    pub fn fix_prime_meridian(&self) -> Result<FeatureCollection, FeatureError> {
        let mut result = self.empty_like();
        let mut split_count = 0;
        for feature in &self.features {
            match split_at_prime_meridian(feature.geometry())? {
                Some(geometry) => {
                    debug!("Feature {} split at the prime meridian", feature.name());
                    split_count += 1;
                    result.add_feature(feature.clone().with_geometry(geometry)?);
                }
                None => {
                    result.add_feature(feature.clone());
                }
            }
        }

        info!("{split_count} features split at the prime meridian");
        Ok(result)
    }

    /// Simplifies geometries of the features so that they deviate from the original ones by no more than `tolerance`
    /// degrees. With zero tolerance only redundant points are removed.
    pub fn simplify(&self, tolerance: f64) -> FeatureCollection {
        let mut result = self.empty_like();
        for feature in &self.features {
            result.add_feature(
                feature
                    .clone()
                    .map_geometry(|geometry| ops::simplify(geometry, tolerance)),
            );
        }

        result
    }

    /// Splits segments of lines and polygons that are longer than `max_length` degrees.
    pub fn subdivide(&self, max_length: f64) -> FeatureCollection {
        let mut result = self.empty_like();
        for feature in &self.features {
            result.add_feature(
                feature
                    .clone()
                    .map_geometry(|geometry| subdivide(geometry, max_length)),
            );
        }

        result
    }
}

fn mask_feature(feature: &Feature, masks: &FeatureCollection) -> Result<MaskOutcome, FeatureError> {
    let mut shape = Cow::Borrowed(feature.geometry());
    let mut masked = false;

    for mask in &masks.features {
        if !ops::intersects(&shape, mask.geometry()) {
            continue;
        }

        masked = true;
        shape = Cow::Owned(ops::difference(&shape, mask.geometry())?);
        if ops::is_empty(&shape) {
            return Ok(MaskOutcome::Dropped);
        }
    }

    if masked {
        Ok(MaskOutcome::Masked(
            feature.clone().with_geometry(shape.into_owned())?,
        ))
    } else {
        Ok(MaskOutcome::Unchanged)
    }
}

impl<'a> IntoIterator for &'a FeatureCollection {
    type Item = &'a Feature;
    type IntoIter = std::slice::Iter<'a, Feature>;

    fn into_iter(self) -> Self::IntoIter {
        self.features.iter()
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<T: IntoIterator<Item = Feature>>(iter: T) -> Self {
        Self::from_features(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    use geo::BoundingRect;
    use geo_types::{line_string, point, polygon, Geometry};
    use geometric_features_types::{GeometryKind, ObjectType};

    use crate::feature::Tags;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Geometry<f64> {
        polygon![
            (x: x0, y: y0),
            (x: x1, y: y0),
            (x: x1, y: y1),
            (x: x0, y: y1),
            (x: x0, y: y0),
        ]
        .into()
    }

    fn region(name: &str, author: &str, geometry: Geometry<f64>) -> Feature {
        Feature::new(name, "ocean", geometry)
            .unwrap()
            .with_author(author)
    }

    #[test]
    fn add_feature_ignores_duplicate_names() {
        let mut collection = FeatureCollection::new();
        assert!(collection.add_feature(region("A", "x", square(0.0, 0.0, 1.0, 1.0))));
        assert!(!collection.add_feature(region("A", "y", square(5.0, 5.0, 6.0, 6.0))));

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.features()[0].author(), "x");
        assert!(collection.contains_name("A"));
    }

    #[test]
    fn merge_keeps_own_features() {
        let g1 = square(0.0, 0.0, 1.0, 1.0);
        let g2 = square(2.0, 2.0, 3.0, 3.0);

        let a = FeatureCollection::from_features([region("X", "a", g1.clone())]);
        let b = FeatureCollection::from_features([
            region("X", "b", g2.clone()),
            region("Y", "b", g2.clone()),
        ]);

        let mut ab = a.clone();
        ab.merge(&b);
        assert_eq!(ab.get("X").unwrap().geometry(), &g1);
        assert_eq!(ab.len(), 2);

        let mut ba = b.clone();
        ba.merge(&a);
        assert_eq!(ba.get("X").unwrap().geometry(), &g2);
        assert_eq!(ba.features()[0].name(), "X");
        assert_eq!(ba.features()[1].name(), "Y");
    }

    #[test]
    fn merge_copies_missing_metadata() {
        let mut a = FeatureCollection::new();
        a.set_metadata("source", Value::from("a"));

        let mut b = FeatureCollection::new();
        b.set_group_name("Other");
        b.set_metadata("source", Value::from("b"));
        b.set_metadata("license", Value::from("CC"));

        a.merge(&b);
        assert_eq!(a.metadata()["source"], "a");
        assert_eq!(a.metadata()["license"], "CC");
        assert_eq!(a.group_name(), Some(DEFAULT_GROUP_NAME));

        let mut c = FeatureCollection::new();
        c.clear_group_name();
        c.merge(&b);
        assert_eq!(c.group_name(), Some("Other"));
    }

    #[test]
    fn tag_and_untag() {
        let mut collection = FeatureCollection::from_features([
            region("A", "x", square(0.0, 0.0, 1.0, 1.0)).with_tags(Tags::parse("Old")),
            region("B", "x", square(2.0, 2.0, 3.0, 3.0)),
        ]);

        collection.tag(&["New"], false);
        assert_eq!(collection.features()[0].tags().to_string(), "Old;New");
        assert_eq!(collection.features()[1].tags().to_string(), "New");

        collection.tag(&["Old"], true);
        assert_eq!(collection.features()[0].tags().to_string(), "New");
        assert_eq!(collection.features()[1].tags().to_string(), "New");
    }

    #[test]
    fn filter_by_tags() {
        let collection = FeatureCollection::from_features([
            region("A", "x", square(0.0, 0.0, 1.0, 1.0)).with_tags(Tags::parse("Arctic;Ocean")),
            region("B", "x", square(2.0, 2.0, 3.0, 3.0)).with_tags(Tags::parse("Arctic")),
        ]);

        let all = collection.filter_by_tags(&["Arctic", "Ocean"], true);
        assert_eq!(all.len(), 1);
        assert_eq!(all.features()[0].name(), "A");

        let any = collection.filter_by_tags(&["Ocean", "Land"], false);
        assert_eq!(any.len(), 1);

        assert_eq!(collection.filter_by_tags::<&str>(&[], true).len(), 2);
        assert!(collection.filter_by_tags::<&str>(&[], false).is_empty());
    }

    #[test]
    fn combine_north_and_south() {
        let mut collection = FeatureCollection::from_features([region(
            "North",
            "x",
            square(0.0, 0.0, 10.0, 10.0),
        )]);
        collection.merge(&FeatureCollection::from_features([region(
            "South",
            "y",
            square(0.0, -10.0, 10.0, 0.0),
        )]));

        let combined = collection.combine("NorthSouth").unwrap();
        assert_eq!(combined.len(), 1);

        let feature = &combined.features()[0];
        assert_eq!(feature.name(), "NorthSouth");
        assert_eq!(feature.component(), "ocean");
        assert_eq!(feature.object_type(), ObjectType::Region);
        assert_eq!(feature.author(), "x; y");
        assert!(feature.tags().is_empty());
        assert_eq!(feature.property("constituents").unwrap(), "North; South");
        assert_eq!(GeometryKind::of(feature.geometry()), GeometryKind::Polygon);

        let bounds = feature.geometry().bounding_rect().unwrap();
        assert_abs_diff_eq!(bounds.min().x, 0.0);
        assert_abs_diff_eq!(bounds.max().x, 10.0);
        assert_abs_diff_eq!(bounds.min().y, -10.0);
        assert_abs_diff_eq!(bounds.max().y, 10.0);
        assert_abs_diff_eq!(ops::area(feature.geometry()), 200.0, epsilon = 1e-9);
    }

    #[test]
    fn combine_deduplicates_authors() {
        let collection = FeatureCollection::from_features([
            region("B", "y", square(0.0, 0.0, 1.0, 1.0)),
            region("A", "x", square(2.0, 0.0, 3.0, 1.0)),
            region("C", "y", square(4.0, 0.0, 5.0, 1.0)),
        ]);

        let combined = collection.combine("All").unwrap();
        let feature = &combined.features()[0];
        assert_eq!(feature.author(), "x; y");
        assert_eq!(feature.property("constituents").unwrap(), "A; B; C");
        assert_eq!(
            GeometryKind::of(feature.geometry()),
            GeometryKind::MultiPolygon
        );
    }

    #[test]
    fn combine_skips_missing_authors() {
        let collection = FeatureCollection::from_features([
            region("A", "", square(0.0, 0.0, 1.0, 1.0)),
            region("B", "x", square(2.0, 0.0, 3.0, 1.0)),
        ]);
        assert_eq!(collection.combine("AB").unwrap().features()[0].author(), "x");

        let anonymous = FeatureCollection::from_features([region("A", "", square(0.0, 0.0, 1.0, 1.0))]);
        assert_eq!(anonymous.combine("A2").unwrap().features()[0].author(), "");
    }

    #[test]
    fn combine_of_mixed_types_fails() {
        let collection = FeatureCollection::from_features([
            region("Region", "x", square(0.0, 0.0, 1.0, 1.0)),
            Feature::new(
                "Transect",
                "ocean",
                line_string![(x: 0.0, y: 0.0), (x: 2.0, y: 2.0)].into(),
            )
            .unwrap(),
        ]);

        assert_matches!(
            collection.combine("Mixed"),
            Err(FeatureError::Combine { geometry_type }) if geometry_type == "GeometryCollection"
        );
    }

    #[test]
    fn combine_of_empty_collection_fails() {
        assert_matches!(
            FeatureCollection::new().combine("Nothing"),
            Err(FeatureError::EmptyCollection(_))
        );
    }

    #[test]
    fn difference_drops_covered_and_keeps_untouched() {
        let untouched = square(20.0, 20.0, 21.0, 21.0);
        let collection = FeatureCollection::from_features([
            region("Covered", "x", square(1.0, 1.0, 2.0, 2.0)),
            region("Untouched", "x", untouched.clone()),
            region("Cut", "x", square(-1.0, 0.0, 1.0, 1.0)),
        ]);
        let masks = FeatureCollection::from_features([region("Mask", "x", square(0.0, 0.0, 3.0, 3.0))]);

        let result = collection.difference(&masks).unwrap();
        assert_eq!(result.len(), 2);
        assert!(!result.contains_name("Covered"));
        assert_eq!(result.get("Untouched").unwrap().geometry(), &untouched);
        assert_abs_diff_eq!(
            ops::area(result.get("Cut").unwrap().geometry()),
            1.0,
            epsilon = 1e-9
        );
        assert_eq!(result.features()[0].name(), "Untouched");
    }

    #[test]
    fn difference_with_several_masks() {
        let collection = FeatureCollection::from_features([region("Box", "x", square(0.0, 0.0, 4.0, 1.0))]);
        let masks = FeatureCollection::from_features([
            region("Left", "x", square(-1.0, -1.0, 1.0, 2.0)),
            region("Right", "x", square(3.0, -1.0, 5.0, 2.0)),
        ]);

        let result = collection.difference(&masks).unwrap();
        assert_abs_diff_eq!(
            ops::area(result.features()[0].geometry()),
            2.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn intersection_clips_features() {
        let collection = FeatureCollection::from_features([
            region("Inside", "x", square(0.0, 0.0, 2.0, 2.0)),
            region("Outside", "x", square(10.0, 10.0, 11.0, 11.0)),
            Feature::new("Point", "ocean", point!(x: 0.5, y: 0.5).into()).unwrap(),
        ]);
        let other = FeatureCollection::from_features([region("Clip", "x", square(1.0, 1.0, 3.0, 3.0))]);

        let result = collection.intersection(&other).unwrap();
        assert_eq!(result.len(), 1);
        assert_abs_diff_eq!(
            ops::area(result.features()[0].geometry()),
            1.0,
            epsilon = 1e-9
        );

        assert_matches!(
            collection.intersection(&FeatureCollection::new()),
            Err(FeatureError::EmptyCollection(_))
        );
    }

    #[test]
    fn fix_antimeridian_is_idempotent() {
        let crossing = polygon![
            (x: 170.0, y: -10.0),
            (x: 180.0, y: -10.0),
            (x: 190.0, y: -10.0),
            (x: 190.0, y: 10.0),
            (x: 180.0, y: 10.0),
            (x: 170.0, y: 10.0),
            (x: 170.0, y: -10.0),
        ];
        let untouched = square(0.0, 0.0, 1.0, 1.0);
        let collection = FeatureCollection::from_features([
            region("Crossing", "x", crossing.clone().into()),
            region("Untouched", "x", untouched.clone()),
        ]);

        let once = collection.fix_antimeridian().unwrap();
        let fixed = once.get("Crossing").unwrap().geometry();
        let bounds = fixed.bounding_rect().unwrap();
        assert!(bounds.min().x >= -180.0);
        assert!(bounds.max().x <= 180.0);
        assert_abs_diff_eq!(
            ops::area(fixed),
            ops::area(&crossing.into()),
            epsilon = 1e-6
        );
        assert_eq!(once.get("Untouched").unwrap().geometry(), &untouched);

        let twice = once.fix_antimeridian().unwrap();
        assert_eq!(twice, once);
    }

    #[test]
    fn fix_antimeridian_splits_transect() {
        let collection = FeatureCollection::from_features([Feature::new(
            "Section",
            "ocean",
            line_string![(x: 175.0, y: 0.0), (x: -175.0, y: 0.0)].into(),
        )
        .unwrap()]);

        let fixed = collection.fix_antimeridian().unwrap();
        let Geometry::MultiLineString(lines) = fixed.features()[0].geometry() else {
            panic!("expected multilinestring");
        };
        assert_eq!(lines.0.len(), 2);
        for line in lines {
            for segment in line.lines() {
                assert!((segment.end.x - segment.start.x).abs() <= 180.0);
            }
        }
    }

    #[test]
    fn fix_prime_meridian_shifts_western_part() {
        let crossing = square(-10.0, 40.0, 10.0, 50.0);
        let east = square(20.0, 0.0, 30.0, 10.0);
        let collection = FeatureCollection::from_features([
            region("Crossing", "x", crossing.clone()),
            region("East", "x", east.clone()),
        ]);

        let fixed = collection.fix_prime_meridian().unwrap();
        let names: Vec<_> = fixed.iter().map(Feature::name).collect();
        assert_eq!(names, ["Crossing", "East"]);

        let split = fixed.get("Crossing").unwrap().geometry();
        assert_eq!(GeometryKind::of(split), GeometryKind::MultiPolygon);
        assert_abs_diff_eq!(ops::area(split), ops::area(&crossing), epsilon = 1e-9);
        let bounds = split.bounding_rect().unwrap();
        assert_abs_diff_eq!(bounds.min().x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bounds.max().x, 360.0, epsilon = 1e-9);

        assert_eq!(fixed.get("East").unwrap().geometry(), &east);
    }

    #[test]
    fn simplify_removes_collinear_points() {
        let collection = FeatureCollection::from_features([region(
            "Box",
            "x",
            polygon![
                (x: 0.0, y: 0.0),
                (x: 1.0, y: 0.0),
                (x: 2.0, y: 0.0),
                (x: 2.0, y: 2.0),
                (x: 0.0, y: 2.0),
                (x: 0.0, y: 0.0),
            ]
            .into(),
        )]);

        let simplified = collection.simplify(0.0);
        let Geometry::Polygon(polygon) = simplified.features()[0].geometry() else {
            panic!("expected polygon");
        };
        assert_eq!(polygon.exterior().0.len(), 5);
        assert_abs_diff_eq!(ops::area(simplified.features()[0].geometry()), 4.0);
    }

    #[test]
    fn subdivide_keeps_names_and_order() {
        let collection = FeatureCollection::from_features([
            region("A", "x", square(0.0, 0.0, 10.0, 10.0)),
            region("B", "x", square(20.0, 0.0, 21.0, 1.0)),
        ]);

        let subdivided = collection.subdivide(5.0);
        assert_eq!(subdivided.features()[0].name(), "A");
        let Geometry::Polygon(polygon) = subdivided.features()[0].geometry() else {
            panic!("expected polygon");
        };
        assert_eq!(polygon.exterior().0.len(), 9);
        assert_eq!(
            subdivided.features()[1].geometry(),
            collection.features()[1].geometry()
        );
    }
}
