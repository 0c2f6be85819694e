use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde_json::json;
use std::fs;
use std::path::Path;

use crate::config::Settings;
use crate::scene::{HexagonOverlay, Scene};

/// GeoJSON for the current scene: one polygon per hexagon, map view in
/// foreign members so a web map can reproduce the view.
pub fn scene_to_geojson(scene: &Scene, settings: &Settings) -> FeatureCollection {
    let features = scene
        .overlays
        .iter()
        .map(|overlay| overlay_feature(overlay, scene, settings))
        .collect();

    let map = &settings.map;
    let mut view = JsonObject::new();
    view.insert("center".into(), json!([map.center.lat, map.center.lon]));
    view.insert("zoom".into(), json!(map.zoom));
    view.insert("tiles".into(), json!(map.tiles));
    view.insert("attribution".into(), json!(map.attribution));
    view.insert("region".into(), json!(settings.region.name));
    view.insert("reference_area_km2".into(), json!(settings.region.reference_area_km2));

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(view),
    }
}

fn overlay_feature(overlay: &HexagonOverlay, scene: &Scene, settings: &Settings) -> Feature {
    // GeoJSON positions are [lon, lat]; rings repeat the first vertex
    let mut ring: Vec<Vec<f64>> = overlay.vertices.iter().map(|v| vec![v.lon, v.lat]).collect();
    ring.push(ring[0].clone());

    let profile = overlay.technology.profile();
    let color = overlay.color.css_name();

    let mut properties = JsonObject::new();
    properties.insert("name".into(), json!(profile.name));
    properties.insert("technology".into(), json!(overlay.technology.slug()));
    properties.insert("area_km2".into(), json!(profile.area_km2));
    properties.insert("percentage".into(), json!(overlay.percentage));
    properties.insert("rank".into(), json!(scene.rank_of(overlay.technology)));
    properties.insert("color".into(), json!(color));
    properties.insert("fill".into(), json!(true));
    properties.insert("fill_color".into(), json!(color));
    properties.insert("fill_opacity".into(), json!(settings.map.fill_opacity));
    properties.insert("tooltip".into(), json!(overlay.tooltip));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Polygon(vec![ring]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> Result<()> {
    let body = serde_json::to_string_pretty(collection).context("failed to serialize GeoJSON")?;
    fs::write(path, body).with_context(|| format!("failed to write {:?}", path))?;
    Ok(())
}
