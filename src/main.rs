//! Matview - a terminal viewer for large two-dimensional matrices.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use matview::app::App;
use matview::config::{Aggregation, CacheConfig, ViewerConfig};
use matview::data::MatrixReader;
use matview::ui;
use matview::view2d::{ColorPalette, ScaleMode};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "matview")]
#[command(about = "A terminal viewer for large two-dimensional matrices", long_about = None)]
struct Args {
    /// Path to the matrix file (.nc, .txt, .dat, .mat, .csv, .tsv)
    file: PathBuf,

    /// NetCDF variable to display (defaults to the first 2-D variable)
    #[arg(long)]
    var: Option<String>,

    /// Enable logging to specified file
    #[arg(long)]
    log: Option<PathBuf>,

    /// Start with a logarithmic color scale
    #[arg(long)]
    log_scale: bool,

    /// Tiles kept around the visible area when panning
    #[arg(long, default_value_t = 1)]
    margin: i32,

    /// Maximum number of cached tiles
    #[arg(long)]
    max_tiles: Option<usize>,

    /// How zoomed-out pixels combine the cells they cover
    #[arg(long, value_enum, default_value_t = Aggregation::Max)]
    aggregate: Aggregation,

    /// Initial color palette
    #[arg(long, value_enum, default_value_t = ColorPalette::Classic)]
    palette: ColorPalette,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging if --log option is provided
    if let Some(log_path) = &args.log {
        let log_file = std::fs::File::create(log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(log_file))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
        tracing::info!("Starting Matview");
    }

    if !args.file.exists() {
        eprintln!("Error: Path not found: {}", args.file.display());
        std::process::exit(1);
    }

    // Load before touching the terminal so errors print normally
    let matrix = MatrixReader::read_file(&args.file, args.var.as_deref())
        .with_context(|| format!("Failed to load {}", args.file.display()))?;
    let config = ViewerConfig {
        cache: CacheConfig {
            weed_margin: args.margin.max(0),
            max_tiles: args.max_tiles,
            aggregation: args.aggregate,
        },
        ..ViewerConfig::default()
    };
    let mut app = App::new(matrix, args.file.clone(), config);
    app.viewer.set_palette(args.palette);
    if args.log_scale {
        app.viewer.set_scale_mode(ScaleMode::Log);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {}", err);
    }

    if args.log.is_some() {
        let stats = app.viewer.cache().stats();
        tracing::info!(
            "Matview exited: {} renders, {} hits, {} evictions, {} flushes",
            stats.renders,
            stats.hits,
            stats.evictions,
            stats.flushes
        );
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    if app.handle_key(key) {
                        return Ok(());
                    }
                },
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                Event::FocusGained => app.handle_focus(true),
                Event::FocusLost => app.handle_focus(false),
                // The next draw picks up the new size through layout.
                Event::Resize(..) => {},
                _ => {},
            }
        }
    }
}
