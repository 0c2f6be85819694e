use crate::app::{App, CHECKBOX_COLUMNS};
use crate::braille::BrailleCanvas;
use crate::catalog::Technology;
use crate::map::MapLayers;
use crate::scene::{RankingSeries, Scene};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
    Frame,
};

pub const DESCRIPTION: &str = "Selecciona múltiples fuentes para visualizar su área proporcional \
sobre el mapa y su ranking comparativo:";
pub const CHART_TITLE: &str = " 📊 Ranking por Área Requerida ";
pub const AXIS_LABEL: &str = "Área requerida (km²)";

/// Width of the ranking panel when it is shown
const CHART_WIDTH: u16 = 56;

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let rows = Technology::ALL.len().div_ceil(CHECKBOX_COLUMNS) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),        // Title
            Constraint::Length(1),        // Description
            Constraint::Length(rows + 2), // Checkboxes
            Constraint::Min(5),           // Map + ranking
            Constraint::Length(1),        // Status bar
        ])
        .split(area);

    render_header(frame, app, chunks[0], chunks[1]);
    render_checkboxes(frame, app, chunks[2]);

    match app.scene() {
        Ok(scene) => {
            // No chart at all for an empty selection
            let (map_area, chart_area) = match &scene.chart {
                Some(_) => {
                    let body = Layout::default()
                        .direction(Direction::Horizontal)
                        .constraints([Constraint::Min(20), Constraint::Length(CHART_WIDTH)])
                        .split(chunks[3]);
                    (body[0], Some(body[1]))
                }
                None => (chunks[3], None),
            };

            render_map(frame, app, &scene, map_area);
            if let (Some(series), Some(chart_area)) = (&scene.chart, chart_area) {
                frame.render_widget(RankingChart { series }, chart_area);
            }
        }
        Err(e) => {
            let error = Paragraph::new(Line::from(Span::styled(
                format!(" {e}"),
                Style::default().fg(Color::Red),
            )))
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(error, chunks[3]);
        }
    }

    render_status_bar(frame, app, chunks[4]);
}

fn render_header(frame: &mut Frame, app: &App, title_area: Rect, description_area: Rect) {
    let title = Line::from(Span::styled(
        format!(" 🌎 Comparación de Fuentes de Energía en {}", app.settings.region.name),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(title), title_area);

    let description = Line::from(Span::styled(
        format!(" {DESCRIPTION}"),
        Style::default().fg(Color::Gray),
    ));
    frame.render_widget(Paragraph::new(description), description_area);
}

/// Three columns of checkboxes in catalog order
fn render_checkboxes(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(" Fuentes ", Style::default().fg(Color::Cyan)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, CHECKBOX_COLUMNS as u32); CHECKBOX_COLUMNS])
        .split(inner);

    for (col, column_area) in columns.iter().enumerate() {
        let lines: Vec<Line> = Technology::ALL
            .iter()
            .filter(|tech| tech.index() % CHECKBOX_COLUMNS == col)
            .map(|&tech| checkbox_line(app, tech))
            .collect();
        frame.render_widget(Paragraph::new(lines), *column_area);
    }
}

fn checkbox_line(app: &App, tech: Technology) -> Line<'static> {
    let selected = app.selection.contains(tech);
    let focused = app.cursor == tech.index();
    let profile = tech.profile();

    let mut style = if selected {
        Style::default().fg(profile.color.terminal()).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    if focused {
        style = style.add_modifier(Modifier::REVERSED);
    }

    Line::from(vec![
        Span::styled(format!(" {} ", tech.index() + 1), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("[{}] {}", if selected { 'x' } else { ' ' }, profile.name), style),
    ])
}

fn render_map(frame: &mut Frame, app: &App, scene: &Scene, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Mapa ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            format!(" {} ", app.settings.map.attribution),
            Style::default().fg(Color::DarkGray),
        )));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    app.map_area.set(inner);

    // Braille gives 2x4 resolution per character
    let mut viewport = app.viewport.clone();
    viewport.width = inner.width as usize * 2;
    viewport.height = inner.height as usize * 4;

    let layers = app.map_renderer.render(
        inner.width as usize,
        inner.height as usize,
        &viewport,
        scene,
        app.settings.map.fill_opacity,
    );

    let tooltip = app.hovered(scene).and_then(|overlay| {
        let (col, row) = app.mouse_pos?;
        Some((col.saturating_sub(inner.x), row.saturating_sub(inner.y), overlay.tooltip.clone()))
    });

    frame.render_widget(MapWidget { layers, tooltip }, inner);
}

/// Custom widget that renders braille layers with text labels overlaid
struct MapWidget {
    layers: MapLayers,
    /// Hover tooltip anchored at the mouse cell, map-relative
    tooltip: Option<(u16, u16, String)>,
}

impl MapWidget {
    /// Render a braille canvas layer with a specific color
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for (col, row, ch) in canvas.glyphs() {
            if col >= area.width || row >= area.height {
                continue;
            }
            buf[(area.x + col, area.y + row)].set_char(ch).set_fg(color);
        }
    }

    fn render_text(text: &str, x: u16, y: u16, style: Style, area: Rect, buf: &mut Buffer) {
        if x >= area.width || y >= area.height {
            return;
        }
        let max_width = (area.width - x) as usize;
        buf.set_stringn(area.x + x, area.y + y, text, max_width, style);
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front: graticule, basemap, hexagons in draw order, center
        Self::render_layer(&self.layers.graticule, Color::DarkGray, area, buf);
        Self::render_layer(&self.layers.basemap, Color::Gray, area, buf);
        for hexagon in &self.layers.hexagons {
            Self::render_layer(&hexagon.canvas, hexagon.color.terminal(), area, buf);
        }
        Self::render_layer(&self.layers.center, Color::White, area, buf);

        let label_style = Style::default().fg(Color::White);
        for (lx, ly, text) in &self.layers.labels {
            Self::render_text(text, *lx, *ly, label_style, area, buf);
        }

        if let Some((x, y, text)) = &self.tooltip {
            let style = Style::default().fg(Color::Black).bg(Color::White);
            let text = format!(" {text} ");
            // Shift left when the tooltip would run off the right edge
            let width = Span::raw(text.as_str()).width() as u16;
            let tx = if x + 2 + width > area.width {
                area.width.saturating_sub(width)
            } else {
                x + 2
            };
            Self::render_text(&text, tx, *y, style, area, buf);
        }
    }
}

/// Horizontal bar chart, largest bar on top, value printed past each bar end
struct RankingChart<'a> {
    series: &'a RankingSeries,
}

impl Widget for RankingChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(Span::styled(
                CHART_TITLE,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))
            .title_bottom(Line::from(Span::styled(
                format!(" {AXIS_LABEL} "),
                Style::default().fg(Color::Gray),
            )));
        let inner = block.inner(area);
        block.render(area, buf);

        let series = self.series;
        if series.is_empty() || inner.width < 8 || inner.height == 0 {
            return;
        }

        let label_width = series
            .labels
            .iter()
            .map(|l| Span::raw(*l).width())
            .max()
            .unwrap_or(0)
            .min(inner.width as usize / 2) as u16;
        let value_width = series.value_labels.iter().map(|v| v.len()).max().unwrap_or(0) as u16 + 1;
        let bar_space = inner.width.saturating_sub(label_width + 1 + value_width).max(1);
        let max_area = series.areas.iter().copied().fold(0.0_f64, f64::max);

        // Blank row between bars when there is room
        let pitch: u16 = if series.len() as u16 * 2 <= inner.height { 2 } else { 1 };

        for (i, ((label, area_km2), (color, value))) in series
            .labels
            .iter()
            .zip(&series.areas)
            .zip(series.colors.iter().zip(&series.value_labels))
            .enumerate()
        {
            let y = inner.y + i as u16 * pitch;
            if y >= inner.y + inner.height {
                break;
            }

            buf.set_stringn(inner.x, y, label, label_width as usize, Style::default().fg(Color::Gray));

            let bar_len = if max_area > 0.0 {
                ((area_km2 / max_area) * bar_space as f64).round().max(1.0) as u16
            } else {
                1
            };
            let bar_x = inner.x + label_width + 1;
            let bar: String = "█".repeat(bar_len as usize);
            buf.set_stringn(bar_x, y, &bar, bar_space as usize, Style::default().fg(color.terminal()));
            buf.set_stringn(
                bar_x + bar_len + 1,
                y,
                value,
                value_width as usize,
                Style::default().fg(Color::White),
            );
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.map_renderer.settings;
    let toggle = |on: bool, on_text: &'static str, off_text: &'static str| {
        Span::styled(
            if on { on_text } else { off_text },
            Style::default().fg(if on { Color::Green } else { Color::DarkGray }),
        )
    };

    let mut spans = vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        toggle(settings.show_fill, "[F]ill ", "[f]ill "),
        toggle(settings.show_basemap, "[B]ase ", "[b]ase "),
        toggle(settings.show_labels, "[L]abels ", "[l]abels "),
    ];

    match &app.status {
        Some(message) => {
            spans.push(Span::styled("| ", Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(message.clone(), Style::default().fg(Color::Yellow)));
        }
        None => spans.push(Span::styled(
            "| ←↑↓→ move  space toggle  1-7  a all  c clear  hjkl pan  +/- zoom  e export  r reset  q quit",
            Style::default().fg(Color::DarkGray),
        )),
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
