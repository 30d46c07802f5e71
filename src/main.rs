use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{Terminal, backend::CrosstermBackend};

use senkyoku_map::{
    config::{AppConfig, DEFAULT_CONFIG_PATH},
    data::{self, CandidateIndex, District},
    dummy, layout, logging,
    state::AppState,
    ui,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to senkyoku.toml; defaults apply when the default file is absent
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive terminal map
    View,
    /// Write the candidate markers for one zoom level as GeoJSON
    Export {
        #[arg(short, long, value_parser = parse_zoom)]
        zoom: f64,
        /// Output file; stdout when omitted
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Generate a random candidate CSV
    Dummy {
        /// District names, one per line; defaults to the configured GeoJSON
        #[arg(short, long, value_name = "FILE")]
        names: Option<PathBuf>,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Output file; defaults to the configured candidate CSV
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
}

fn parse_zoom(s: &str) -> Result<f64, String> {
    let zoom: f64 = s.parse().map_err(|e: std::num::ParseFloatError| e.to_string())?;
    if zoom.is_finite() {
        Ok(zoom)
    } else {
        Err("zoom must be a finite number".to_string())
    }
}

fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(p) => AppConfig::load_from_path(p)?,
        None => AppConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
    };
    Ok(config)
}

fn load_inputs(config: &AppConfig) -> Result<(Vec<District>, CandidateIndex)> {
    let input = &config.input;
    let districts = data::load_districts(&input.districts, &input.name_property)
        .context("Failed to load districts")?;
    let candidates = data::load_candidates(&input.candidates, &input.name_property)
        .context("Failed to load candidates")?;
    tracing::info!(
        districts = districts.len(),
        candidates = candidates.len(),
        "loaded inputs"
    );
    Ok((districts, candidates.into_iter().collect()))
}

fn run_view(config: &AppConfig) -> Result<()> {
    logging::init_file(&config.log_file)
        .with_context(|| format!("Failed to open log file {:?}", config.log_file))?;
    let (districts, candidates) = load_inputs(config)?;
    let mut state = AppState::new(
        districts,
        candidates,
        &config.view,
        config.layout.sizing(),
        config.colors.clone(),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<W: Write>(terminal: &mut Terminal<CrosstermBackend<W>>, state: &mut AppState) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, state))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) = event::read()? {
                if state.handle_input(code) {
                    return Ok(());
                }
            }
        }
    }
}

fn run_export(config: &AppConfig, zoom: f64, out: Option<&Path>) -> Result<()> {
    logging::init_stderr();
    let (districts, candidates) = load_inputs(config)?;
    let markers = layout::generate(
        &districts,
        &candidates,
        zoom,
        &config.layout.sizing(),
        &config.colors,
    );
    let json = serde_json::to_string(&markers.to_feature_collection())?;

    match out {
        Some(path) => {
            let mut file = BufWriter::new(
                File::create(path).with_context(|| format!("Failed to create {:?}", path))?,
            );
            file.write_all(json.as_bytes())?;
            file.flush()?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    tracing::info!(zoom, markers = markers.len(), "exported markers");
    Ok(())
}

fn run_dummy(config: &AppConfig, names: Option<&Path>, seed: Option<u64>, out: Option<&Path>) -> Result<()> {
    logging::init_stderr();
    let input = &config.input;
    let names = match names {
        Some(path) => data::load_names(path)?,
        None => data::load_districts(&input.districts, &input.name_property)?
            .into_iter()
            .map(|d| d.name)
            .collect(),
    };

    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };
    let rows = dummy::generate(&names, &config.colors, &mut rng);

    let out = out.unwrap_or(input.candidates.as_path());
    let file = File::create(out).with_context(|| format!("Failed to create {:?}", out))?;
    dummy::write_csv(&rows, &input.name_property, BufWriter::new(file))?;
    tracing::info!(rows = rows.len(), path = ?out, "wrote dummy candidates");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::View => run_view(&config),
        Commands::Export { zoom, out } => run_export(&config, *zoom, out.as_deref()),
        Commands::Dummy { names, seed, out } => run_dummy(&config, names.as_deref(), *seed, out.as_deref()),
    }
}
