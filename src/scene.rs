use crate::catalog::{percentage_of, PaletteColor, Technology};
use crate::config::Settings;
use crate::geo::{hexagon_vertices, polygon_contains, GeoPoint, GeometryError, Hexagon};

/// Set of selected technologies. Iteration always follows catalog order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    bits: u8,
}

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn all() -> Self {
        Technology::ALL.into_iter().collect()
    }

    #[inline(always)]
    fn mask(tech: Technology) -> u8 {
        1 << tech.index()
    }

    pub fn contains(&self, tech: Technology) -> bool {
        self.bits & Self::mask(tech) != 0
    }

    pub fn insert(&mut self, tech: Technology) {
        self.bits |= Self::mask(tech);
    }

    /// Flip membership; returns whether `tech` is now selected
    pub fn toggle(&mut self, tech: Technology) -> bool {
        self.bits ^= Self::mask(tech);
        self.contains(tech)
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Technology> + '_ {
        Technology::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

impl FromIterator<Technology> for Selection {
    fn from_iter<I: IntoIterator<Item = Technology>>(iter: I) -> Self {
        let mut selection = Selection::empty();
        for tech in iter {
            selection.insert(tech);
        }
        selection
    }
}

/// One hexagon to draw on the map
#[derive(Clone, Debug, PartialEq)]
pub struct HexagonOverlay {
    pub technology: Technology,
    pub vertices: Hexagon,
    pub color: PaletteColor,
    pub percentage: f64,
    pub tooltip: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RankingEntry {
    pub technology: Technology,
    pub name: &'static str,
    pub area_km2: f64,
    pub color: PaletteColor,
}

/// Parallel bar chart columns, first entry drawn on top
#[derive(Clone, Debug, PartialEq)]
pub struct RankingSeries {
    pub labels: Vec<&'static str>,
    pub areas: Vec<f64>,
    pub colors: Vec<PaletteColor>,
    pub value_labels: Vec<String>,
}

impl RankingSeries {
    pub fn from_entries(entries: &[RankingEntry]) -> Self {
        Self {
            labels: entries.iter().map(|e| e.name).collect(),
            areas: entries.iter().map(|e| e.area_km2).collect(),
            colors: entries.iter().map(|e| e.color).collect(),
            value_labels: entries.iter().map(|e| format!("{:.2}", e.area_km2)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Everything the map and chart need for one selection
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    pub overlays: Vec<HexagonOverlay>,
    pub ranking: Vec<RankingEntry>,
    /// `None` when nothing is selected: no chart is drawn at all
    pub chart: Option<RankingSeries>,
}

impl Scene {
    /// Topmost overlay containing `point`. Later overlays are drawn on top.
    pub fn overlay_at(&self, point: GeoPoint) -> Option<&HexagonOverlay> {
        self.overlays
            .iter()
            .rev()
            .find(|o| polygon_contains(&o.vertices, point))
    }

    /// 1-based rank of `tech` in the area ranking
    pub fn rank_of(&self, tech: Technology) -> Option<usize> {
        self.ranking
            .iter()
            .position(|e| e.technology == tech)
            .map(|i| i + 1)
    }
}

pub fn tooltip_text(name: &str, area_km2: f64, percentage: f64, region: &str) -> String {
    format!("{name} – {area_km2:.2} km² ({percentage:.2}% de {region})")
}

/// Sort descending by area. Stable, so equal areas keep catalog order.
pub fn rank_by_area(selection: &Selection) -> Vec<RankingEntry> {
    let mut entries: Vec<RankingEntry> = selection
        .iter()
        .map(|technology| {
            let profile = technology.profile();
            RankingEntry {
                technology,
                name: profile.name,
                area_km2: profile.area_km2,
                color: profile.color,
            }
        })
        .collect();
    entries.sort_by(|a, b| b.area_km2.total_cmp(&a.area_km2));
    entries
}

/// Run the whole pipeline for one selection: geometry, tooltips, ranking
pub fn build_scene(selection: &Selection, settings: &Settings) -> Result<Scene, GeometryError> {
    let center = settings.map.center;
    let region = &settings.region;

    let overlays = selection
        .iter()
        .map(|technology| {
            let profile = technology.profile();
            let vertices = hexagon_vertices(center, profile.area_km2)?;
            let percentage = percentage_of(profile.area_km2, region.reference_area_km2);
            Ok(HexagonOverlay {
                technology,
                vertices,
                color: profile.color,
                percentage,
                tooltip: tooltip_text(profile.name, profile.area_km2, percentage, &region.name),
            })
        })
        .collect::<Result<Vec<_>, GeometryError>>()?;

    let ranking = rank_by_area(selection);
    let chart = (!ranking.is_empty()).then(|| RankingSeries::from_entries(&ranking));

    Ok(Scene {
        overlays,
        ranking,
        chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn scene_for(techs: &[Technology]) -> Scene {
        let selection: Selection = techs.iter().copied().collect();
        build_scene(&selection, &Settings::default()).unwrap()
    }

    #[test]
    fn test_selection_toggle_and_order() {
        let mut sel = Selection::empty();
        assert!(sel.is_empty());
        assert!(sel.toggle(Technology::Nuclear));
        assert!(sel.toggle(Technology::Solar));
        assert_eq!(sel.len(), 2);
        // Catalog order regardless of insertion order
        assert_eq!(sel.iter().collect::<Vec<_>>(), vec![Technology::Solar, Technology::Nuclear]);
        assert!(!sel.toggle(Technology::Nuclear));
        assert!(!sel.contains(Technology::Nuclear));
        sel.clear();
        assert!(sel.is_empty());
        assert_eq!(Selection::all().len(), 7);
    }

    #[test]
    fn test_ranking_descending() {
        let scene = scene_for(&[Technology::Coal, Technology::Solar, Technology::Wind]);
        let order: Vec<Technology> = scene.ranking.iter().map(|e| e.technology).collect();
        assert_eq!(order, vec![Technology::Wind, Technology::Solar, Technology::Coal]);

        let chart = scene.chart.expect("chart for non-empty selection");
        assert_eq!(chart.labels, vec!["Eólica 🌬️", "Solar Fotovoltaica ☀️", "Carbón 🪨"]);
        assert_eq!(chart.areas, vec![21.55, 8.58, 1.98]);
        assert_eq!(chart.colors, vec![PaletteColor::Green, PaletteColor::Orange, PaletteColor::Gray]);
        assert_eq!(chart.value_labels, vec!["21.55", "8.58", "1.98"]);
    }

    #[test]
    fn test_ranking_ties_keep_catalog_order() {
        let scene = scene_for(&[Technology::Diesel, Technology::NaturalGas]);
        let order: Vec<Technology> = scene.ranking.iter().map(|e| e.technology).collect();
        assert_eq!(order, vec![Technology::NaturalGas, Technology::Diesel]);
        assert_eq!(scene.chart.unwrap().value_labels, vec!["1.50", "1.50"]);
    }

    #[test]
    fn test_overlays_follow_selection_order() {
        let scene = scene_for(&[Technology::Nuclear, Technology::Wind, Technology::Solar]);
        let order: Vec<Technology> = scene.overlays.iter().map(|o| o.technology).collect();
        assert_eq!(order, vec![Technology::Solar, Technology::Wind, Technology::Nuclear]);
        assert_eq!(scene.rank_of(Technology::Wind), Some(1));
        assert_eq!(scene.rank_of(Technology::Nuclear), Some(3));
        assert_eq!(scene.rank_of(Technology::Hydro), None);
    }

    #[test]
    fn test_tooltip_and_percentage() {
        let scene = scene_for(&[Technology::Wind]);
        let overlay = &scene.overlays[0];
        assert_abs_diff_eq!(overlay.percentage, 13.06, epsilon = 0.01);
        assert_eq!(overlay.tooltip, "Eólica 🌬️ – 21.55 km² (13.06% de Bucaramanga)");
        assert_eq!(overlay.color, PaletteColor::Green);
    }

    #[test]
    fn test_empty_selection_has_no_chart() {
        let scene = scene_for(&[]);
        assert!(scene.overlays.is_empty());
        assert!(scene.ranking.is_empty());
        assert!(scene.chart.is_none());
    }

    #[test]
    fn test_overlay_at_prefers_topmost() {
        let scene = scene_for(&[Technology::Wind, Technology::Coal]);
        let center = Settings::default().map.center;
        // Coal is smaller and drawn after Wind
        assert_eq!(scene.overlay_at(center).unwrap().technology, Technology::Coal);

        // Inside Wind's hexagon, outside Coal's
        let wind_only = GeoPoint::new(center.lat + 0.02, center.lon);
        assert_eq!(scene.overlay_at(wind_only).unwrap().technology, Technology::Wind);

        let outside = GeoPoint::new(center.lat + 0.2, center.lon);
        assert!(scene.overlay_at(outside).is_none());
    }
}
