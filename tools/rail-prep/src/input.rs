use anyhow::{bail, Context, Result};
use geo::{Coord, LineString, Point};
use geojson::{Feature, GeoJson};
use rail_topology::prelude::{CompanyCode, NextStationRecord, RailwayCode, StationFeature};
use serde::Deserialize;
use std::path::Path;

/// Property keys used by the national land information station dataset (N02)
const N02_RAILWAY_KEY: &str = "N02_003";
const N02_COMPANY_KEY: &str = "N02_004";
const N02_NAME_KEY: &str = "N02_005";

/// How a station file was encoded
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StationFormat {
    /// JSON array of station records with precomputed centroids
    Records,
    /// GeoJSON station features; centroids computed from segment geometry
    GeoJson,
}

#[derive(Debug)]
pub struct LoadedStations {
    pub format: StationFormat,
    pub features: Vec<StationFeature>,
}

/// Station record with a precomputed centroid
#[derive(Debug, Deserialize)]
struct StationRecord {
    name: String,
    railway: String,
    company: String,
    lat: f64,
    lng: f64,
}

impl From<StationRecord> for StationFeature {
    fn from(r: StationRecord) -> Self {
        StationFeature::new(
            r.name,
            Point::new(r.lng, r.lat),
            RailwayCode::new(r.railway),
            CompanyCode::new(r.company),
        )
    }
}

/// Read stations from either a JSON record array or a GeoJSON FeatureCollection
pub fn read_stations(path: &Path) -> Result<LoadedStations> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read station file: {}", path.display()))?;

    let value: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from: {}", path.display()))?;

    if value.is_array() {
        let records: Vec<StationRecord> = serde_json::from_value(value)
            .with_context(|| format!("Invalid station records in: {}", path.display()))?;
        log::debug!("Read {} station records", records.len());

        return Ok(LoadedStations {
            format: StationFormat::Records,
            features: records.into_iter().map(StationFeature::from).collect(),
        });
    }

    let geojson = GeoJson::from_json_value(value)
        .with_context(|| format!("Failed to parse GeoJSON from: {}", path.display()))?;

    let features = match geojson {
        GeoJson::FeatureCollection(fc) => fc.features,
        GeoJson::Feature(feature) => vec![feature],
        GeoJson::Geometry(_) => bail!("Expected station features, found a bare geometry"),
    };

    let stations = features
        .iter()
        .enumerate()
        .map(|(i, feature)| {
            feature_to_station(feature).with_context(|| format!("Invalid station feature #{}", i))
        })
        .collect::<Result<Vec<_>>>()?;
    log::debug!("Read {} station features", stations.len());

    Ok(LoadedStations {
        format: StationFormat::GeoJson,
        features: stations,
    })
}

/// Read next-station records (JSON array of `{station, left, right}`)
pub fn read_next_stations(path: &Path) -> Result<Vec<NextStationRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read next-station file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse next-station records from: {}", path.display()))
}

fn feature_to_station(feature: &Feature) -> Result<StationFeature> {
    let name = string_property(feature, &[N02_NAME_KEY, "name"])?;
    let railway = string_property(feature, &[N02_RAILWAY_KEY, "railway"])?;
    let company = string_property(feature, &[N02_COMPANY_KEY, "company"])?;

    let Some(geometry) = &feature.geometry else {
        bail!("Station {} has no geometry", name);
    };

    let railway = RailwayCode::new(railway);
    let company = CompanyCode::new(company);

    match &geometry.value {
        geojson::Value::Point(position) => Ok(StationFeature::new(
            name,
            position_to_point(position)?,
            railway,
            company,
        )),
        geojson::Value::LineString(line) => Ok(StationFeature::from_segments(
            name,
            &[coords_to_linestring(line)],
            railway,
            company,
        )?),
        geojson::Value::MultiLineString(lines) => {
            let segments: Vec<LineString<f64>> = lines.iter().map(|l| coords_to_linestring(l)).collect();
            Ok(StationFeature::from_segments(name, &segments, railway, company)?)
        }
        _ => bail!("Unsupported station geometry (expected Point, LineString or MultiLineString)"),
    }
}

fn string_property(feature: &Feature, keys: &[&str]) -> Result<String> {
    keys.iter()
        .find_map(|key| feature.property(key).and_then(|v| v.as_str()))
        .map(str::to_owned)
        .with_context(|| format!("Missing property (tried {})", keys.join(", ")))
}

fn position_to_point(position: &[f64]) -> Result<Point<f64>> {
    match position {
        [x, y, ..] => Ok(Point::new(*x, *y)),
        _ => bail!("Position has fewer than two ordinates"),
    }
}

/// Convert GeoJSON coordinates to a geo LineString
fn coords_to_linestring(coords: &[Vec<f64>]) -> LineString<f64> {
    LineString::new(
        coords
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| Coord { x: c[0], y: c[1] })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rail-prep-input-{}-{}", std::process::id(), name));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_read_station_records() {
        let path = temp_file(
            "records.json",
            r#"[
                {"name": "東京", "railway": "東海道線", "company": "JR東日本", "lat": 35.681, "lng": 139.767},
                {"name": "新橋", "railway": "東海道線", "company": "JR東日本", "lat": 35.666, "lng": 139.758}
            ]"#,
        );

        let loaded = read_stations(&path).unwrap();
        assert_eq!(loaded.format, StationFormat::Records);
        assert_eq!(loaded.features.len(), 2);
        assert_eq!(loaded.features[0].name.as_ref(), "東京");
        assert_eq!(loaded.features[0].lat(), 35.681);
        assert_eq!(loaded.features[0].lng(), 139.767);
        assert_eq!(loaded.features[1].railway.as_str(), "東海道線");
    }

    #[test]
    fn test_read_station_geojson() {
        let path = temp_file(
            "stations.geojson",
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "properties": {"N02_003": "山手線", "N02_004": "東日本旅客鉄道", "N02_005": "渋谷"},
                        "geometry": {"type": "LineString", "coordinates": [[139.70, 35.65], [139.70, 35.67]]}
                    },
                    {
                        "type": "Feature",
                        "properties": {"railway": "銀座線", "company": "東京地下鉄", "name": "渋谷"},
                        "geometry": {"type": "MultiLineString", "coordinates": [
                            [[139.70, 35.66], [139.72, 35.66]],
                            [[139.72, 35.66], [139.72, 35.68]]
                        ]}
                    }
                ]
            }"#,
        );

        let loaded = read_stations(&path).unwrap();
        assert_eq!(loaded.format, StationFormat::GeoJson);
        assert_eq!(loaded.features.len(), 2);

        let yamanote = &loaded.features[0];
        assert_eq!(yamanote.name.as_ref(), "渋谷");
        assert_eq!(yamanote.railway.as_str(), "山手線");
        assert!((yamanote.lat() - 35.66).abs() < 1e-9);

        // Midpoints (139.71, 35.66) and (139.72, 35.67)
        let ginza = &loaded.features[1];
        assert_eq!(ginza.company.as_str(), "東京地下鉄");
        assert!((ginza.lng() - 139.715).abs() < 1e-9);
        assert!((ginza.lat() - 35.665).abs() < 1e-9);
    }

    #[test]
    fn test_missing_property() {
        let path = temp_file(
            "unnamed.geojson",
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"railway": "x", "company": "y"},
                 "geometry": {"type": "Point", "coordinates": [139.0, 35.0]}}
            ]}"#,
        );

        let err = read_stations(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Missing property"));
    }

    #[test]
    fn test_read_next_stations() {
        let path = temp_file(
            "next.json",
            r#"[{"station": 0, "right": [1]}, {"station": 1, "left": [0], "right": [2]}]"#,
        );

        let records = read_next_stations(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], NextStationRecord::new(0, vec![], vec![1]));
        assert_eq!(records[1].neighbors(), vec![0, 2]);
    }
}
