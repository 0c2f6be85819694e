use crate::config::BasemapSettings;
use crate::map::{LineString, MapRenderer};
use anyhow::{anyhow, Context, Result};
use geojson::{GeoJson, Geometry, Value};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Load the configured basemap GeoJSON files into the map renderer.
/// Returns the number of linestrings added.
pub fn load_basemap(renderer: &mut MapRenderer, basemap: &BasemapSettings) -> usize {
    let paths: Vec<PathBuf> = basemap
        .files
        .iter()
        .map(|file| basemap.data_dir.join(file))
        .filter(|path| {
            let exists = path.exists();
            if !exists {
                warn!("basemap file {:?} not found, skipping", path);
            }
            exists
        })
        .collect();

    // Parse in parallel, add in configured order
    let parsed: Vec<(PathBuf, Result<Vec<LineString>>)> = paths
        .into_par_iter()
        .map(|path| {
            let lines = load_lines(&path);
            (path, lines)
        })
        .collect();

    let mut added = 0;
    for (path, lines) in parsed {
        match lines {
            Ok(lines) => {
                info!("loaded {} basemap lines from {:?}", lines.len(), path);
                added += lines.len();
                for line in lines {
                    renderer.add_line(line);
                }
            }
            Err(e) => warn!("failed to load basemap {:?}: {:#}", path, e),
        }
    }
    added
}

/// Read one GeoJSON file and extract its line features
pub fn load_lines(path: &Path) -> Result<Vec<LineString>> {
    let mut bytes = fs::read(path).with_context(|| format!("failed to read {:?}", path))?;
    let geojson: GeoJson = simd_json::serde::from_slice(&mut bytes)
        .map_err(|e| anyhow!("failed to parse GeoJSON in {:?}: {}", path, e))?;

    let mut lines = Vec::new();
    process_geojson_lines(&geojson, |line| lines.push(line));
    Ok(lines)
}

/// Process GeoJSON and extract line features
fn process_geojson_lines<F>(geojson: &GeoJson, mut add_line: F)
where
    F: FnMut(LineString),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    process_geometry_lines(geometry, &mut add_line);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                process_geometry_lines(geometry, &mut add_line);
            }
        }
        GeoJson::Geometry(geometry) => {
            process_geometry_lines(geometry, &mut add_line);
        }
    }
}

fn to_line(coords: &[Vec<f64>]) -> LineString {
    coords.iter().filter(|c| c.len() >= 2).map(|c| (c[0], c[1])).collect()
}

fn process_geometry_lines<F>(geometry: &Geometry, add_line: &mut F)
where
    F: FnMut(LineString),
{
    match &geometry.value {
        Value::LineString(coords) => add_line(to_line(coords)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                add_line(to_line(coords));
            }
        }
        // Every ring, so holes (parks, lakes) show too
        Value::Polygon(rings) => {
            for ring in rings {
                add_line(to_line(ring));
            }
        }
        Value::MultiPolygon(polygons) => {
            for ring in polygons.iter().flatten() {
                add_line(to_line(ring));
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                process_geometry_lines(g, add_line);
            }
        }
        _ => {}
    }
}
