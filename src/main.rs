use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use energy_map::app::App;
use energy_map::catalog::Technology;
use energy_map::config::Settings;
use energy_map::export::{scene_to_geojson, write_geojson};
use energy_map::report::render_report;
use energy_map::scene::{build_scene, Selection};
use energy_map::{data, ui};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML settings file [default: energy-map.toml if present]
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file (the interactive map never logs to the terminal)
    #[arg(long, value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,

    /// Technologies selected at startup, comma separated
    #[arg(short, long, value_enum, value_delimiter = ',', global = true)]
    select: Vec<Technology>,

    /// Where the `e` key writes the GeoJSON export
    #[arg(long, value_name = "FILE", default_value = "energy-map.geojson")]
    export_path: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print hexagon tooltips and the area ranking
    Report,
    /// Write the selected hexagons as a GeoJSON FeatureCollection
    Export {
        #[arg(short, long, value_name = "FILE", default_value = "energy-map.geojson")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref(), cli.command.is_none())?;

    let settings = Settings::resolve(cli.config.as_deref()).context("failed to load settings")?;
    let selection: Selection = cli.select.iter().copied().collect();

    match cli.command {
        None => run_interactive(settings, selection, cli.export_path),
        Some(Commands::Report) => {
            let scene = build_scene(&selection, &settings)?;
            print!("{}", render_report(&scene));
            Ok(())
        }
        Some(Commands::Export { out }) => {
            let scene = build_scene(&selection, &settings)?;
            let collection = scene_to_geojson(&scene, &settings);
            write_geojson(&out, &collection)?;
            info!(path = ?out, features = collection.features.len(), "exported scene");
            println!("wrote {} hexagons to {}", collection.features.len(), out.display());
            Ok(())
        }
    }
}

/// Logs go to `log_file` when given, else to stderr for headless commands.
/// The interactive UI owns the terminal, so without a file it does not log.
fn init_logging(log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create log file {:?}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None if !interactive => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        None => {}
    }
    Ok(())
}

fn run_interactive(settings: Settings, selection: Selection, export_path: PathBuf) -> Result<()> {
    let mut app = App::new(settings, selection, export_path);
    let lines = data::load_basemap(&mut app.map_renderer, &app.settings.basemap);
    info!(lines, "basemap ready");

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal, &mut app);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Handle mouse events for panning, zooming and hover
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for the hover tooltip
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    loop {
        // Every frame rebuilds the scene from the current selection
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.sync_viewport_size();
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                        // Checkbox grid
                        KeyCode::Left => app.move_cursor(-1, 0),
                        KeyCode::Right => app.move_cursor(1, 0),
                        KeyCode::Up => app.move_cursor(0, -1),
                        KeyCode::Down => app.move_cursor(0, 1),
                        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_focused(),
                        KeyCode::Char(c @ '1'..='9') => {
                            app.toggle_number(c as usize - '0' as usize);
                        }
                        KeyCode::Char('a') => app.select_all(),
                        KeyCode::Char('c') => app.clear_selection(),

                        // Pan with hjkl
                        KeyCode::Char('h') => app.pan(-10, 0),
                        KeyCode::Char('l') => app.pan(10, 0),
                        KeyCode::Char('k') => app.pan(0, -6),
                        KeyCode::Char('j') => app.pan(0, 6),

                        // Zoom
                        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                        // Layer toggles
                        KeyCode::Char('f') | KeyCode::Char('F') => app.map_renderer.toggle_fill(),
                        KeyCode::Char('b') | KeyCode::Char('B') => {
                            app.map_renderer.toggle_basemap();
                        }
                        KeyCode::Char('L') => app.map_renderer.toggle_labels(),

                        KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),
                        KeyCode::Char('e') => app.export(),

                        _ => {}
                    }
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
