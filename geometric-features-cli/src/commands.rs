use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use geometric_features::cache::{CACHE_DIR_ENV, DEFAULT_CACHE_DIR};
use geometric_features::catalog::CATALOG_FILE_NAME;
use geometric_features::{
    read_feature_collection, Catalog, DirectorySource, FeatureCollection, GeometricFeatures, Tags,
    WriteOptions,
};
use log::{info, warn};

pub const DEFAULT_OUTPUT: &str = "features.geojson";

/// Feature selection of the `read` command.
pub struct ReadQuery {
    pub component: String,
    pub object_type: String,
    pub names: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub all_tags: bool,
}

pub fn merge(
    feature_files: &[PathBuf],
    features_dir: Option<&Path>,
    tags: Option<&str>,
    output: &Path,
) -> Result<()> {
    let mut files = feature_files.to_vec();
    if let Some(dir) = features_dir {
        files.extend(geojson_files(dir)?);
    }
    if files.is_empty() {
        bail!("no feature files to merge");
    }

    let tags: Option<Vec<String>> = tags.map(|tags| Tags::parse(tags).iter().map(String::from).collect());

    let mut incoming = FeatureCollection::new();
    for file in &files {
        let collection = read_input(file)?;
        match &tags {
            Some(tags) => incoming.merge(&collection.filter_by_tags(tags, true)),
            None => incoming.merge(&collection),
        }
    }

    append_to_output(&incoming, output)
}

pub fn combine(feature_file: &Path, name: &str, output: &Path) -> Result<()> {
    let existing = load_output(output);
    if existing.contains_name(name) {
        warn!("Feature {name} is already in {output:?}, nothing to combine");
        return Ok(());
    }

    let combined = read_input(feature_file)?.combine(name)?;
    append_to_output(&combined, output)
}

pub fn difference(feature_file: &Path, mask_file: &Path, output: &Path) -> Result<()> {
    let features = read_input(feature_file)?;
    let masks = read_input(mask_file)?;
    append_to_output(&features.difference(&masks)?, output)
}

pub fn intersect(
    feature_file: &Path,
    intersection_file: &Path,
    group_name: Option<&str>,
    output: &Path,
) -> Result<()> {
    let features = read_input(feature_file)?;
    let other = read_input(intersection_file)?;

    let mut result = features.intersection(&other)?;
    if let Some(group_name) = group_name {
        result.set_group_name(group_name);
    }

    append_to_output(&result, output)
}

pub fn fix_antimeridian(feature_file: &Path, output: &Path) -> Result<()> {
    let fixed = read_input(feature_file)?.fix_antimeridian()?;
    append_to_output(&fixed, output)
}

pub fn fix_prime_meridian(feature_file: &Path, output: &Path) -> Result<()> {
    let fixed = read_input(feature_file)?.fix_prime_meridian()?;
    append_to_output(&fixed, output)
}

pub fn simplify(feature_file: &Path, tolerance: f64, output: &Path) -> Result<()> {
    let simplified = read_input(feature_file)?.simplify(tolerance);
    append_to_output(&simplified, output)
}

pub fn subdivide(feature_file: &Path, max_degrees: f64, output: &Path) -> Result<()> {
    let subdivided = read_input(feature_file)?.subdivide(max_degrees);
    append_to_output(&subdivided, output)
}

pub fn tag(feature_file: &Path, tags: &[String], remove: bool, output: &Path) -> Result<()> {
    let mut collection = read_input(feature_file)?;
    collection.tag(tags, remove);
    append_to_output(&collection, output)
}

pub fn set_group_name(feature_file: &Path, group_name: &str) -> Result<()> {
    let mut collection = read_input(feature_file)?;
    collection.set_group_name(group_name);
    collection.to_geojson(feature_file, &WriteOptions::default())?;
    info!("Group name of {feature_file:?} set to {group_name}");
    Ok(())
}

pub fn split(feature_file: &Path, destination: Option<&Path>) -> Result<()> {
    let collection = read_input(feature_file)?;
    let features = GeometricFeatures::new(Catalog::new());
    let paths = features.split(&collection, destination)?;
    info!("{} features written", paths.len());
    Ok(())
}

pub fn read(
    query: &ReadQuery,
    cache: Option<&Path>,
    catalog: Option<&Path>,
    mirror: Option<&Path>,
    output: &Path,
) -> Result<()> {
    let cache = cache_location(cache);
    let catalog = load_catalog(&cache, catalog)?;

    let mut features = GeometricFeatures::new(catalog).with_cache_location(&cache);
    if let Some(mirror) = mirror {
        features = features.with_source(DirectorySource::new(mirror));
    }

    let collection = features.read(
        &query.component,
        &query.object_type,
        query.names.as_deref(),
        query.tags.as_deref(),
        query.all_tags,
    )?;

    append_to_output(&collection, output)
}

pub fn catalog(cache: Option<&Path>, output: &Path) -> Result<()> {
    let cache = cache_location(cache);
    let catalog = Catalog::from_cache_dir(&cache)
        .with_context(|| format!("failed to scan feature cache {cache:?}"))?;
    catalog.write(output)?;
    info!("Catalog of {cache:?} written to {output:?}");
    Ok(())
}

fn cache_location(cache: Option<&Path>) -> PathBuf {
    cache
        .map(PathBuf::from)
        .or_else(|| std::env::var_os(CACHE_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_DIR))
}

fn load_catalog(cache: &Path, catalog: Option<&Path>) -> Result<Catalog> {
    if let Some(path) = catalog {
        return Catalog::from_path(path).with_context(|| format!("failed to read catalog {path:?}"));
    }

    let path = cache.join(CATALOG_FILE_NAME);
    if path.is_file() {
        return Catalog::from_path(&path).with_context(|| format!("failed to read catalog {path:?}"));
    }

    info!("No catalog in {cache:?}, building one from the cached files");
    Ok(Catalog::from_cache_dir(cache)?)
}

fn read_input(path: &Path) -> Result<FeatureCollection> {
    read_feature_collection(path).with_context(|| format!("failed to read feature file {path:?}"))
}

/// Reads the existing output file, or an empty collection if there is none.
fn load_output(output: &Path) -> FeatureCollection {
    if !output.exists() {
        return FeatureCollection::new();
    }

    match read_feature_collection(output) {
        Ok(collection) => collection,
        Err(err) => {
            warn!("Ignoring unreadable output file {output:?}: {err}");
            FeatureCollection::new()
        }
    }
}

fn append_to_output(collection: &FeatureCollection, output: &Path) -> Result<()> {
    let mut result = load_output(output);
    let before = result.len();
    result.merge(collection);

    result
        .to_geojson(output, &WriteOptions::default())
        .with_context(|| format!("failed to write {output:?}"))?;
    info!(
        "{} features added to {output:?}, {} in total",
        result.len() - before,
        result.len()
    );
    Ok(())
}

fn geojson_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = vec![];
    for entry in std::fs::read_dir(dir).with_context(|| format!("failed to list {dir:?}"))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "geojson") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_features(path: &Path, features: &[(&str, &str, [f64; 2])]) {
        let features: Vec<_> = features
            .iter()
            .map(|(name, tags, [lon, lat])| {
                json!({
                    "type": "Feature",
                    "properties": {
                        "name": name,
                        "tags": tags,
                        "object": "point",
                        "component": "ocean",
                        "author": "Tester",
                    },
                    "geometry": {"type": "Point", "coordinates": [lon, lat]},
                })
            })
            .collect();
        let value = json!({"type": "FeatureCollection", "features": features});
        std::fs::write(path, value.to_string()).unwrap();
    }

    #[test]
    fn merge_appends_to_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.geojson");
        let b = dir.path().join("b.geojson");
        let output = dir.path().join("out.geojson");
        write_features(&a, &[("A", "", [0.0, 0.0])]);
        write_features(&b, &[("B", "", [1.0, 1.0]), ("A", "", [2.0, 2.0])]);

        merge(&[a], None, None, &output).unwrap();
        merge(&[b], None, None, &output).unwrap();

        let result = read_feature_collection(&output).unwrap();
        let names: Vec<_> = result.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn merge_directory_with_tags() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input");
        std::fs::create_dir(&input).unwrap();
        write_features(&input.join("1.geojson"), &[("A", "Arctic;Deep", [0.0, 0.0])]);
        write_features(&input.join("2.geojson"), &[("B", "Arctic", [1.0, 1.0])]);
        std::fs::write(input.join("notes.txt"), "not a feature file").unwrap();
        let output = dir.path().join("out.geojson");

        merge(&[], Some(&input), Some("Arctic;Deep"), &output).unwrap();

        let result = read_feature_collection(&output).unwrap();
        assert_eq!(result.len(), 1);
        assert!(result.contains_name("A"));
    }

    #[test]
    fn merge_without_inputs_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(merge(&[], None, None, &dir.path().join("out.geojson")).is_err());
    }

    #[test]
    fn combine_skips_existing_name() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.geojson");
        let output = dir.path().join("out.geojson");
        write_features(&input, &[("A", "", [0.0, 0.0]), ("B", "", [1.0, 1.0])]);

        combine(&input, "AB", &output).unwrap();
        let first = std::fs::read_to_string(&output).unwrap();
        combine(&input, "AB", &output).unwrap();

        assert_eq!(std::fs::read_to_string(&output).unwrap(), first);
        let result = read_feature_collection(&output).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.features()[0].name(), "AB");
    }

    #[test]
    fn unreadable_output_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.geojson");
        let output = dir.path().join("out.geojson");
        write_features(&input, &[("A", "", [0.0, 0.0])]);
        std::fs::write(&output, "garbage").unwrap();

        tag(&input, &["New".to_string()], false, &output).unwrap();

        let result = read_feature_collection(&output).unwrap();
        assert!(result.features()[0].tags().contains("New"));
    }

    #[test]
    fn fix_prime_meridian_writes_shifted_features() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.geojson");
        let output = dir.path().join("out.geojson");
        let value = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "properties": {"name": "Section", "object": "transect", "component": "ocean"},
                "geometry": {"type": "LineString", "coordinates": [[-5.0, 0.0], [5.0, 0.0]]},
            }],
        });
        std::fs::write(&input, value.to_string()).unwrap();

        fix_prime_meridian(&input, &output).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        let written = &written["features"][0]["geometry"];
        assert_eq!(written["type"], "MultiLineString");
        for line in written["coordinates"].as_array().unwrap() {
            for coord in line.as_array().unwrap() {
                assert!(coord[0].as_f64().unwrap() >= 0.0);
            }
        }
    }

    #[test]
    fn set_group_name_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.geojson");
        write_features(&input, &[("A", "", [0.0, 0.0])]);

        set_group_name(&input, "Points").unwrap();

        let result = read_feature_collection(&input).unwrap();
        assert_eq!(result.group_name(), Some("Points"));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn split_then_read_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.geojson");
        let cache = dir.path().join("cache");
        let output = dir.path().join("out.geojson");
        write_features(&input, &[("A", "Deep", [0.0, 0.0]), ("B", "", [1.0, 1.0])]);

        split(&input, Some(&cache)).unwrap();
        catalog(Some(&cache), &cache.join(CATALOG_FILE_NAME)).unwrap();

        let query = ReadQuery {
            component: "ocean".to_string(),
            object_type: "point".to_string(),
            names: None,
            tags: Some(vec!["Deep".to_string()]),
            all_tags: true,
        };
        read(&query, Some(&cache), None, None, &output).unwrap();

        let result = read_feature_collection(&output).unwrap();
        let names: Vec<_> = result.iter().map(|f| f.name()).collect();
        assert_eq!(names, ["A"]);
    }

    #[test]
    fn read_fetches_from_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.geojson");
        let mirror = dir.path().join("mirror");
        let cache = dir.path().join("cache");
        let output = dir.path().join("out.geojson");
        write_features(&input, &[("A", "", [0.0, 0.0])]);

        split(&input, Some(&mirror)).unwrap();
        let catalog_path = dir.path().join(CATALOG_FILE_NAME);
        catalog(Some(&mirror), &catalog_path).unwrap();

        let query = ReadQuery {
            component: "ocean".to_string(),
            object_type: "point".to_string(),
            names: Some(vec!["A".to_string()]),
            tags: None,
            all_tags: true,
        };
        read(&query, Some(&cache), Some(&catalog_path), Some(&mirror), &output).unwrap();

        assert!(read_feature_collection(&output).unwrap().contains_name("A"));
    }
}
