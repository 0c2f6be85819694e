use std::fmt::Write;

use crate::scene::Scene;
use crate::ui::AXIS_LABEL;

/// Bar width in characters for the largest entry
const BAR_COLUMNS: f64 = 40.0;

/// Plain-text rendition of a scene: one tooltip line per hexagon, then the
/// ranking as a text bar chart. No chart section for an empty selection.
pub fn render_report(scene: &Scene) -> String {
    let mut out = String::new();

    if scene.overlays.is_empty() {
        out.push_str("no technologies selected\n");
        return out;
    }

    out.push_str("Hexágonos:\n");
    for overlay in &scene.overlays {
        let _ = writeln!(out, "  {}", overlay.tooltip);
    }

    if let Some(series) = &scene.chart {
        out.push_str("\nRanking por Área Requerida:\n");
        let label_width = series.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let max_area = series.areas.iter().copied().fold(0.0_f64, f64::max);

        for ((label, area), value) in series.labels.iter().zip(&series.areas).zip(&series.value_labels) {
            let bar_len = ((area / max_area) * BAR_COLUMNS).round().max(1.0) as usize;
            let pad = " ".repeat(label_width - label.chars().count());
            let bar = "█".repeat(bar_len);
            let _ = writeln!(out, "  {label}{pad}  {bar} {value}");
        }
        let _ = writeln!(out, "  {AXIS_LABEL}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Technology;
    use crate::config::Settings;
    use crate::scene::{build_scene, Selection};

    fn report(techs: &[Technology]) -> String {
        let selection: Selection = techs.iter().copied().collect();
        render_report(&build_scene(&selection, &Settings::default()).unwrap())
    }

    #[test]
    fn test_empty_report_has_no_chart() {
        let text = report(&[]);
        assert_eq!(text, "no technologies selected\n");
    }

    #[test]
    fn test_report_orders_ranking() {
        let text = report(&[Technology::Coal, Technology::Solar, Technology::Wind]);
        let ranking = text.split("Ranking por").nth(1).unwrap();
        let wind = ranking.find("Eólica").unwrap();
        let solar = ranking.find("Solar").unwrap();
        let coal = ranking.find("Carbón").unwrap();
        assert!(wind < solar && solar < coal);
        assert!(ranking.contains("21.55"));
        assert!(text.contains("(13.06% de Bucaramanga)"));
    }
}
