use crate::braille::BrailleCanvas;
use crate::catalog::PaletteColor;
use crate::map::geometry::{draw_line, draw_marker, draw_polygon, fill_polygon};
use crate::map::projection::Viewport;
use crate::scene::Scene;

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Graticule spacings in degrees, finest first
const GRATICULE_STEPS: [f64; 13] = [
    0.001, 0.002, 0.005, 0.01, 0.02, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0,
];

/// Display settings for map layers
#[derive(Clone, Debug, PartialEq)]
pub struct DisplaySettings {
    pub show_basemap: bool,
    /// Drawn only when no basemap is loaded
    pub show_graticule: bool,
    pub show_fill: bool,
    pub show_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_basemap: true,
            show_graticule: true,
            show_fill: true,
            show_labels: true,
        }
    }
}

/// One colored braille layer per hexagon
pub struct HexagonLayer {
    pub canvas: BrailleCanvas,
    pub color: PaletteColor,
}

/// Rendered map layers, back to front
pub struct MapLayers {
    pub basemap: BrailleCanvas,
    pub graticule: BrailleCanvas,
    pub hexagons: Vec<HexagonLayer>,
    pub center: BrailleCanvas,
    /// Text labels in character coordinates
    pub labels: Vec<(u16, u16, String)>,
}

/// Map renderer: optional basemap lines under the hexagon overlays
pub struct MapRenderer {
    pub basemap: Vec<LineString>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            basemap: Vec::new(),
            settings: DisplaySettings::default(),
        }
    }

    /// Render basemap, hexagons and center marker for a character area
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        scene: &Scene,
        fill_opacity: f64,
    ) -> MapLayers {
        let mut basemap = BrailleCanvas::new(width, height);
        let mut graticule = BrailleCanvas::new(width, height);
        let mut center = BrailleCanvas::new(width, height);
        let mut labels = Vec::new();

        if self.settings.show_basemap {
            for line in &self.basemap {
                self.draw_linestring(&mut basemap, line, viewport);
            }
        }

        if self.settings.show_graticule && !self.has_data() {
            self.draw_graticule(&mut graticule, viewport);
        }

        let hexagons = scene
            .overlays
            .iter()
            .map(|overlay| {
                let mut canvas = BrailleCanvas::new(width, height);
                let points: Vec<(i32, i32)> =
                    overlay.vertices.iter().map(|v| viewport.project_point(*v)).collect();

                if self.settings.show_fill {
                    fill_polygon(&mut canvas, &points, fill_opacity);
                }
                draw_polygon(&mut canvas, &points);

                // Area label just above the north vertex
                if self.settings.show_labels {
                    let (px, py) = points[0];
                    if px >= 0 && py >= 4 && viewport.is_visible(px, py) {
                        let char_x = (px / 2) as u16;
                        let char_y = (py / 4) as u16 - 1;
                        let text = format!("{:.2}", overlay.technology.profile().area_km2);
                        let label_x = char_x.saturating_sub(text.len() as u16 / 2);
                        labels.push((label_x, char_y, text));
                    }
                }

                HexagonLayer {
                    canvas,
                    color: overlay.color,
                }
            })
            .collect();

        let (cx, cy) = viewport.project_point(viewport.center());
        draw_marker(&mut center, cx, cy, 1);

        MapLayers {
            basemap,
            graticule,
            hexagons,
            center,
            labels,
        }
    }

    /// Draw a linestring with viewport culling
    fn draw_linestring(&self, canvas: &mut BrailleCanvas, line: &LineString, viewport: &Viewport) {
        if line.len() < 2 {
            return;
        }

        let mut prev: Option<(i32, i32)> = None;

        for &(lon, lat) in line {
            let (px, py) = viewport.project(lon, lat);

            if let Some((prev_x, prev_y)) = prev {
                if viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                    draw_line(canvas, prev_x, prev_y, px, py);
                }
            }

            prev = Some((px, py));
        }
    }

    /// Lat/lon grid lines so the map has a sense of scale without a basemap
    fn draw_graticule(&self, canvas: &mut BrailleCanvas, viewport: &Viewport) {
        let (min_lon, min_lat, max_lon, max_lat) = viewport.bounds();
        let step = graticule_step((max_lon - min_lon).max(max_lat - min_lat));

        let mut lon = (min_lon / step).floor() * step;
        while lon <= max_lon {
            let line = vec![(lon, min_lat), (lon, max_lat)];
            self.draw_linestring(canvas, &line, viewport);
            lon += step;
        }

        let mut lat = (min_lat / step).floor() * step;
        while lat <= max_lat {
            let line = vec![(min_lon, lat), (max_lon, lat)];
            self.draw_linestring(canvas, &line, viewport);
            lat += step;
        }
    }

    pub fn add_line(&mut self, line: LineString) {
        self.basemap.push(line);
    }

    /// Check if any basemap data is loaded
    pub fn has_data(&self) -> bool {
        !self.basemap.is_empty()
    }

    pub fn toggle_basemap(&mut self) {
        self.settings.show_basemap = !self.settings.show_basemap;
    }

    pub fn toggle_fill(&mut self) {
        self.settings.show_fill = !self.settings.show_fill;
    }

    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarsest grid spacing giving at most eight lines across `span_deg`
fn graticule_step(span_deg: f64) -> f64 {
    GRATICULE_STEPS
        .iter()
        .copied()
        .find(|step| span_deg / step <= 8.0)
        .unwrap_or(GRATICULE_STEPS[GRATICULE_STEPS.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Technology;
    use crate::config::Settings;
    use crate::scene::{build_scene, Selection};

    fn viewport() -> Viewport {
        let settings = Settings::default();
        Viewport::new(settings.map.center, settings.map.zoom, 160, 120)
    }

    #[test]
    fn test_graticule_step() {
        assert_eq!(graticule_step(0.05), 0.01);
        assert_eq!(graticule_step(0.5), 0.1);
        assert_eq!(graticule_step(1000.0), 10.0);
    }

    #[test]
    fn test_one_layer_per_overlay() {
        let selection: Selection = [Technology::Wind, Technology::Coal].into_iter().collect();
        let scene = build_scene(&selection, &Settings::default()).unwrap();
        let layers = MapRenderer::new().render(80, 30, &viewport(), &scene, 0.6);
        assert_eq!(layers.hexagons.len(), 2);
        assert_eq!(layers.hexagons[0].color, PaletteColor::Green);
        assert!(layers.hexagons.iter().all(|h| h.canvas.dot_count() > 0));
        // Larger hexagon lights more dots
        assert!(layers.hexagons[0].canvas.dot_count() > layers.hexagons[1].canvas.dot_count());
        assert_eq!(layers.labels.len(), 2);
    }

    #[test]
    fn test_empty_scene_draws_graticule_and_center() {
        let layers = MapRenderer::new().render(80, 30, &viewport(), &Scene::default(), 0.6);
        assert!(layers.hexagons.is_empty());
        assert!(layers.graticule.dot_count() > 0);
        assert!(layers.center.is_set(80, 60));
    }

    #[test]
    fn test_basemap_replaces_graticule() {
        let mut renderer = MapRenderer::new();
        let c = Settings::default().map.center;
        renderer.add_line(vec![(c.lon - 0.01, c.lat), (c.lon + 0.01, c.lat)]);
        let layers = renderer.render(80, 30, &viewport(), &Scene::default(), 0.6);
        assert!(layers.basemap.dot_count() > 0);
        assert_eq!(layers.graticule.dot_count(), 0);
    }

    #[test]
    fn test_fill_toggle() {
        let selection: Selection = [Technology::Hydro].into_iter().collect();
        let scene = build_scene(&selection, &Settings::default()).unwrap();
        let mut renderer = MapRenderer::new();
        let filled = renderer.render(80, 30, &viewport(), &scene, 0.6).hexagons[0].canvas.dot_count();
        renderer.toggle_fill();
        let outline = renderer.render(80, 30, &viewport(), &scene, 0.6).hexagons[0].canvas.dot_count();
        assert!(outline < filled);
    }
}
