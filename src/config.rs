use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::catalog::{MAP_CENTER, REFERENCE_AREA_KM2, REGION_NAME};
use crate::geo::GeoPoint;
use crate::map::{MAX_ZOOM, MIN_ZOOM};

/// Config file looked up in the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "energy-map.toml";

pub const ESRI_TILES: &str =
    "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}";
pub const ESRI_ATTRIBUTION: &str = "Tiles © Esri — Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, \
Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse TOML configuration")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub map: MapSettings,
    pub region: RegionSettings,
    pub basemap: BasemapSettings,
}

/// Map view handed to the map widget and written into exports
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MapSettings {
    pub center: GeoPoint,
    pub zoom: f64,
    pub tiles: String,
    pub attribution: String,
    pub fill_opacity: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RegionSettings {
    pub name: String,
    pub reference_area_km2: f64,
}

/// Optional GeoJSON line layers drawn under the hexagons
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BasemapSettings {
    pub data_dir: PathBuf,
    pub files: Vec<String>,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            center: MAP_CENTER,
            zoom: 13.0,
            tiles: ESRI_TILES.to_string(),
            attribution: ESRI_ATTRIBUTION.to_string(),
            fill_opacity: 0.6,
        }
    }
}

impl Default for RegionSettings {
    fn default() -> Self {
        Self {
            name: REGION_NAME.to_string(),
            reference_area_km2: REFERENCE_AREA_KM2,
        }
    }
}

impl Default for BasemapSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            files: vec![
                "bucaramanga_limits.json".to_string(),
                "bucaramanga_roads.json".to_string(),
            ],
        }
    }
}

impl Settings {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load the explicit config file, else the default file if present, else defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load_from_file(default_path)
                } else {
                    tracing::debug!("no {} found, using built-in settings", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let area = self.region.reference_area_km2;
        if !area.is_finite() || area <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "region.reference_area_km2 must be > 0, got {area}"
            )));
        }
        let opacity = self.map.fill_opacity;
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ConfigError::Invalid(format!(
                "map.fill_opacity must be within [0, 1], got {opacity}"
            )));
        }
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&self.map.zoom) {
            return Err(ConfigError::Invalid(format!(
                "map.zoom must be within [{MIN_ZOOM}, {MAX_ZOOM}], got {}",
                self.map.zoom
            )));
        }
        let GeoPoint { lat, lon } = self.map.center;
        if !(-85.0..=85.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(ConfigError::Invalid(format!(
                "map.center ({lat}, {lon}) is outside the Web Mercator range"
            )));
        }
        Ok(())
    }
}
