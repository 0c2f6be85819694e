use std::cell::Cell;
use std::path::PathBuf;

use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::catalog::Technology;
use crate::config::Settings;
use crate::export::{scene_to_geojson, write_geojson};
use crate::geo::{GeoPoint, GeometryError};
use crate::map::{MapRenderer, Viewport};
use crate::scene::{build_scene, HexagonOverlay, Scene, Selection};

/// Checkbox grid columns; technology `i` sits in column `i % 3`
pub const CHECKBOX_COLUMNS: usize = 3;

/// Application state
pub struct App {
    pub settings: Settings,
    pub selection: Selection,
    /// Catalog index of the focused checkbox
    pub cursor: usize,
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for hover tooltips
    pub mouse_pos: Option<(u16, u16)>,
    /// Inner map area from the last frame, for mouse hit testing
    pub map_area: Cell<Rect>,
    pub status: Option<String>,
    pub export_path: PathBuf,
}

impl App {
    pub fn new(settings: Settings, selection: Selection, export_path: PathBuf) -> Self {
        let viewport = Viewport::new(settings.map.center, settings.map.zoom, 0, 0);
        Self {
            settings,
            selection,
            cursor: 0,
            viewport,
            map_renderer: MapRenderer::new(),
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            map_area: Cell::new(Rect::default()),
            status: None,
            export_path,
        }
    }

    /// Recompute the whole pipeline for the current selection
    pub fn scene(&self) -> Result<Scene, GeometryError> {
        build_scene(&self.selection, &self.settings)
    }

    pub fn focused(&self) -> Technology {
        Technology::from_index(self.cursor).unwrap_or(Technology::Solar)
    }

    pub fn toggle(&mut self, tech: Technology) {
        let selected = self.selection.toggle(tech);
        info!(technology = tech.slug(), selected, "selection changed");
        self.status = None;
    }

    pub fn toggle_focused(&mut self) {
        self.toggle(self.focused());
    }

    /// Toggle by 1-based catalog number, as typed on the keyboard
    pub fn toggle_number(&mut self, number: usize) {
        if let Some(tech) = number.checked_sub(1).and_then(Technology::from_index) {
            self.cursor = tech.index();
            self.toggle(tech);
        }
    }

    pub fn select_all(&mut self) {
        self.selection = Selection::all();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Move the checkbox cursor by grid columns/rows, staying on the grid
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let count = Technology::ALL.len() as i32;
        let col = (self.cursor % CHECKBOX_COLUMNS) as i32;
        let new_col = col + dx;
        if new_col < 0 || new_col >= CHECKBOX_COLUMNS as i32 {
            return;
        }
        let target = self.cursor as i32 + dx + dy * CHECKBOX_COLUMNS as i32;
        if (0..count).contains(&target) {
            self.cursor = target as usize;
        }
    }

    /// Pan the map
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Terminal cell to braille pixel inside the map, if the cell is on the map
    fn map_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let area = self.map_area.get();
        if col < area.x || row < area.y || col >= area.x + area.width || row >= area.y + area.height {
            return None;
        }
        // Each terminal cell is 2 braille pixels wide, 4 tall
        Some((((col - area.x) as i32) * 2 + 1, ((row - area.y) as i32) * 4 + 2))
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.sync_viewport_size();
            self.viewport.zoom_in_at(px, py);
        }
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.map_pixel(col, row) {
            self.sync_viewport_size();
            self.viewport.zoom_out_at(px, py);
        }
    }

    /// Match the viewport to the map area drawn last frame
    pub fn sync_viewport_size(&mut self) {
        let area = self.map_area.get();
        self.viewport.width = area.width as usize * 2;
        self.viewport.height = area.height as usize * 4;
    }

    /// Geographic point under a terminal cell
    pub fn geo_at(&self, col: u16, row: u16) -> Option<GeoPoint> {
        let (px, py) = self.map_pixel(col, row)?;
        let area = self.map_area.get();
        let mut viewport = self.viewport.clone();
        viewport.width = area.width as usize * 2;
        viewport.height = area.height as usize * 4;
        let (lon, lat) = viewport.unproject(px, py);
        Some(GeoPoint::new(lat, lon))
    }

    /// Overlay under the mouse cursor
    pub fn hovered<'a>(&self, scene: &'a Scene) -> Option<&'a HexagonOverlay> {
        let (col, row) = self.mouse_pos?;
        scene.overlay_at(self.geo_at(col, row)?)
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Restore the configured center and zoom
    pub fn reset_view(&mut self) {
        let (width, height) = (self.viewport.width, self.viewport.height);
        self.viewport = Viewport::new(self.settings.map.center, self.settings.map.zoom, width, height);
    }

    /// Handle mouse drag on the map
    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = (last_x as i32 - x as i32) * 2;
            let dy = (last_y as i32 - y as i32) * 4;
            self.sync_viewport_size();
            self.pan(dx, dy);
        }
        self.last_mouse = Some((x, y));
    }

    /// Reset drag state when mouse button released
    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Write the current scene as GeoJSON and report the outcome in the status bar
    pub fn export(&mut self) {
        let result = self
            .scene()
            .map_err(anyhow::Error::from)
            .and_then(|scene| {
                let collection = scene_to_geojson(&scene, &self.settings);
                write_geojson(&self.export_path, &collection).map(|_| collection.features.len())
            });

        self.status = Some(match result {
            Ok(count) => {
                info!(path = ?self.export_path, features = count, "exported scene");
                format!("exported {count} hexagons to {}", self.export_path.display())
            }
            Err(e) => {
                warn!("export failed: {:#}", e);
                format!("export failed: {e:#}")
            }
        });
    }

    /// Current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("z{:.1}", self.viewport.zoom)
    }

    /// Current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.4}°{}, {:.4}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new(Settings::default(), Selection::empty(), PathBuf::from("out.geojson"));
        app.map_area.set(Rect::new(10, 5, 50, 20));
        app.sync_viewport_size();
        app
    }

    #[test]
    fn test_cursor_moves_on_grid() {
        let mut app = app();
        app.move_cursor(-1, 0);
        assert_eq!(app.cursor, 0);
        app.move_cursor(1, 0);
        app.move_cursor(1, 0);
        assert_eq!(app.cursor, 2);
        // Right edge of the first row does not wrap
        app.move_cursor(1, 0);
        assert_eq!(app.cursor, 2);
        app.move_cursor(0, 1);
        assert_eq!(app.cursor, 5);
        // Row 3 only has Nuclear in column 0
        app.move_cursor(0, 1);
        assert_eq!(app.cursor, 5);
        app.move_cursor(-1, 0);
        app.move_cursor(-1, 0);
        app.move_cursor(0, 1);
        assert_eq!(app.focused(), Technology::Nuclear);
    }

    #[test]
    fn test_toggle_number() {
        let mut app = app();
        app.toggle_number(2);
        assert!(app.selection.contains(Technology::Wind));
        assert_eq!(app.cursor, 1);
        app.toggle_number(0);
        app.toggle_number(8);
        assert_eq!(app.selection.len(), 1);
        app.toggle_focused();
        assert!(app.selection.is_empty());
    }

    #[test]
    fn test_scene_recomputed_from_selection() {
        let mut app = app();
        assert!(app.scene().unwrap().chart.is_none());
        app.select_all();
        assert_eq!(app.scene().unwrap().overlays.len(), 7);
        app.clear_selection();
        assert!(app.scene().unwrap().overlays.is_empty());
    }

    #[test]
    fn test_hover_center_cell() {
        let mut app = app();
        app.toggle(Technology::Wind);
        let scene = app.scene().unwrap();

        // Middle of the 50x20 map area
        app.set_mouse_pos(35, 15);
        assert_eq!(app.hovered(&scene).map(|o| o.technology), Some(Technology::Wind));

        // Off the map
        app.set_mouse_pos(0, 0);
        assert!(app.hovered(&scene).is_none());
    }

    #[test]
    fn test_reset_view() {
        let mut app = app();
        app.pan(30, -20);
        app.zoom_in();
        app.reset_view();
        assert_eq!(app.viewport.zoom, 13.0);
        assert_eq!(app.viewport.center(), app.settings.map.center);
        assert_eq!(app.viewport.width, 100);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app();
        app.export_path = dir.path().join("scene.geojson");
        app.toggle(Technology::Solar);
        app.export();
        assert!(app.export_path.exists());
        assert!(app.status.as_deref().unwrap().starts_with("exported 1 hexagons"));
    }
}
