//! GeoJSON record and region input

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use geojson::{Feature, FeatureCollection, GeoJson, Value};

use crate::error::{Result, VerdinError};
use crate::models::{Record, Region};

/// Read observation records from a GeoJSON FeatureCollection.
///
/// Each feature must be a Point carrying `event_id` and `date` properties;
/// the point coordinates supply the record's longitude and latitude.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let collection = read_collection(path)?;

    let mut records = Vec::new();
    for (index, feature) in collection.features.iter().enumerate() {
        records.push(record_from_feature(feature, index)?);
    }

    Ok(records)
}

/// Read a clip region from the first Polygon feature in a GeoJSON file.
///
/// Only the exterior ring is used.
pub fn read_region(path: &Path) -> Result<Region> {
    let collection = read_collection(path)?;

    for feature in &collection.features {
        if let Some(geometry) = &feature.geometry {
            if let Value::Polygon(rings) = &geometry.value {
                let exterior = rings.first().ok_or_else(|| VerdinError::InvalidRegion {
                    reason: "polygon has no exterior ring".to_string(),
                })?;
                let vertices = exterior
                    .iter()
                    .filter(|position| position.len() >= 2)
                    .map(|position| (position[0], position[1]))
                    .collect();
                return Region::new(vertices);
            }
        }
    }

    Err(VerdinError::InvalidRegion { reason: "no polygon feature found".to_string() })
}

fn read_collection(path: &Path) -> Result<FeatureCollection> {
    let content = fs::read_to_string(path)?;

    let geojson: GeoJson = content.parse().map_err(|e| VerdinError::FormatInvalid {
        format: "GeoJSON".to_string(),
        reason: format!("Failed to parse GeoJSON: {}", e),
    })?;

    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        _ => Err(VerdinError::FormatInvalid {
            format: "GeoJSON".to_string(),
            reason: "expected a FeatureCollection".to_string(),
        }),
    }
}

fn record_from_feature(feature: &Feature, index: usize) -> Result<Record> {
    // Fall back to the feature index when no identifier is present
    let id = property_string(feature, "event_id").unwrap_or_else(|| index.to_string());

    let date_str = property_string(feature, "date").ok_or_else(|| VerdinError::RecordInvalid {
        id: id.clone(),
        reason: "missing date property".to_string(),
    })?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        VerdinError::RecordInvalid {
            id: id.clone(),
            reason: format!("bad date '{}': {}", date_str, e),
        }
    })?;

    let geometry = feature.geometry.as_ref().ok_or_else(|| VerdinError::RecordInvalid {
        id: id.clone(),
        reason: "missing geometry".to_string(),
    })?;

    match &geometry.value {
        Value::Point(position) if position.len() >= 2 => {
            Ok(Record::new(id, date, position[1], position[0]))
        }
        _ => Err(VerdinError::RecordInvalid {
            id,
            reason: "geometry is not a point".to_string(),
        }),
    }
}

fn property_string(feature: &Feature, key: &str) -> Option<String> {
    feature.properties.as_ref().and_then(|props| props.get(key)).map(|value| match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_records_from_feature_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.geojson");

        let content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-121.5, 47.25] },
                    "properties": { "event_id": "obs-1", "date": "2015-06-15" }
                },
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-150.0, 58.9] },
                    "properties": { "event_id": "obs-2", "date": "2013-01-02" }
                }
            ]
        }"#;
        fs::write(&path, content).unwrap();

        let records = read_records(&path).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "obs-1");
        assert_eq!(records[0].lng, -121.5);
        assert_eq!(records[0].lat, 47.25);
        assert_eq!(records[0].month(), 6);
        assert_eq!(records[1].id, "obs-2");
    }

    #[test]
    fn test_missing_date_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.geojson");

        let content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [-121.5, 47.25] },
                    "properties": { "event_id": "obs-1" }
                }
            ]
        }"#;
        fs::write(&path, content).unwrap();

        let result = read_records(&path);
        assert!(matches!(result, Err(VerdinError::RecordInvalid { ref id, .. }) if id == "obs-1"));
    }

    #[test]
    fn test_non_point_geometry_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.geojson");

        let content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "LineString",
                        "coordinates": [[-121.5, 47.25], [-121.6, 47.3]]
                    },
                    "properties": { "event_id": "obs-1", "date": "2015-06-15" }
                }
            ]
        }"#;
        fs::write(&path, content).unwrap();

        assert!(read_records(&path).is_err());
    }

    #[test]
    fn test_not_a_feature_collection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.geojson");

        let content = r#"{
            "type": "Feature",
            "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
            "properties": { "event_id": "obs-1", "date": "2015-06-15" }
        }"#;
        fs::write(&path, content).unwrap();

        let result = read_records(&path);
        assert!(matches!(result, Err(VerdinError::FormatInvalid { .. })));
    }

    #[test]
    fn test_read_region() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.geojson");

        let content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[
                            [-125.0, 45.0], [-120.0, 45.0],
                            [-120.0, 49.0], [-125.0, 49.0], [-125.0, 45.0]
                        ]]
                    },
                    "properties": {}
                }
            ]
        }"#;
        fs::write(&path, content).unwrap();

        let region = read_region(&path).unwrap();

        assert_eq!(region.vertices().len(), 4);
        assert!(region.contains(-122.5, 47.0));
        assert!(!region.contains(-119.0, 47.0));
    }

    #[test]
    fn test_read_region_without_polygon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.geojson");

        let content = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [0.0, 0.0] },
                    "properties": {}
                }
            ]
        }"#;
        fs::write(&path, content).unwrap();

        assert!(matches!(read_region(&path), Err(VerdinError::InvalidRegion { .. })));
    }
}
