use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use rail_topology::prelude::{Clustering, RailPath, RailwayPaths, StationFeature};
use serde::Serialize;
use std::path::Path;

/// Convert a path to a GeoJSON LineString value ([lng, lat] positions)
fn path_to_geojson(path: &RailPath) -> Value {
    let coords: Vec<Vec<f64>> = path.coordinates.0.iter().map(|c| vec![c.x, c.y]).collect();
    Value::LineString(coords)
}

/// Create a GeoJSON Feature for one railway path
fn path_to_feature(railway: &RailwayPaths, path: &RailPath) -> Feature {
    let mut properties = serde_json::Map::new();
    properties.insert("railway_code".to_string(), serde_json::json!(railway.railway.as_str()));
    properties.insert("path_id".to_string(), serde_json::json!(path.path_id));
    properties.insert("topology".to_string(), serde_json::json!(path.kind.as_ref()));
    properties.insert("station_count".to_string(), serde_json::json!(path.stations.len()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(path_to_geojson(path))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Write every non-empty path as a LineString feature. Returns the feature count.
pub fn write_paths_geojson(railways: &[RailwayPaths], output_path: &Path) -> Result<usize> {
    let features: Vec<Feature> = railways
        .iter()
        .flat_map(|railway| railway.non_empty().map(move |path| path_to_feature(railway, path)))
        .collect();
    let count = features.len();

    log::info!("Writing {} path features to {}", count, output_path.display());

    let feature_collection = FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    };

    let geojson = GeoJson::from(feature_collection);
    let json_string = serde_json::to_string_pretty(&geojson)
        .context("Failed to serialize GeoJSON")?;

    std::fs::write(output_path, json_string)
        .with_context(|| format!("Failed to write GeoJSON to {}", output_path.display()))?;

    Ok(count)
}

/// Write `(railway_code, path_id, ord, lat, lng)` rows. Returns the row count.
pub fn write_path_rows_csv(railways: &[RailwayPaths], output_path: &Path) -> Result<usize> {
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;

    let mut count = 0;
    for railway in railways {
        for row in railway.rows() {
            writer.serialize(&row).context("Failed to write path row")?;
            count += 1;
        }
    }
    writer.flush()?;

    log::info!("Wrote {} path rows to {}", count, output_path.display());
    Ok(count)
}

#[derive(Serialize)]
struct GroupRow<'a> {
    index: usize,
    name: &'a str,
    railway: &'a str,
    company: &'a str,
    group_code: usize,
}

/// Write the group code assigned to every station feature
pub fn write_groups_csv(
    features: &[StationFeature],
    clustering: &Clustering,
    output_path: &Path,
) -> Result<()> {
    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("Failed to create {}", output_path.display()))?;

    for (index, (feature, &group_code)) in features.iter().zip(clustering.group_codes()).enumerate() {
        writer
            .serialize(GroupRow {
                index,
                name: &feature.name,
                railway: feature.railway.as_str(),
                company: feature.company.as_str(),
                group_code,
            })
            .context("Failed to write group row")?;
    }
    writer.flush()?;

    log::info!(
        "Wrote {} station group assignments to {}",
        features.len(),
        output_path.display()
    );
    Ok(())
}
