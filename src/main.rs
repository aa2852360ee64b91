use std::io;
use std::path::PathBuf;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing_subscriber::EnvFilter;

use mathdrill::{
    config::{ConfigStore, DrillConfig, FileConfigStore},
    input::ReaderSource,
    runtime::SystemClock,
    session::SessionState,
    telemetry::{CsvExporter, LiveChart},
    ui::{self, Dashboard},
    Drill,
};

const LIVE_CHART_WIDTH: u16 = 100;
const LIVE_CHART_HEIGHT: u16 = 24;

/// arithmetic drill with timed quizzes and adaptive practice
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Quizzes you on addition, subtraction, multiplication and division, tracks accuracy and speed per operation, and keeps generating practice problems for the operations you get wrong most."
)]
pub struct Cli {
    /// config file to load (defaults to the platform config directory)
    #[clap(short = 'c', long)]
    config: Option<PathBuf>,

    /// directory to write the CSV exports into
    #[clap(short = 'o', long)]
    out_dir: Option<PathBuf>,

    /// number of questions per operation in each evaluation round
    #[clap(short = 'r', long)]
    rounds: Option<usize>,

    /// seed for reproducible problem sequences
    #[clap(long)]
    seed: Option<u64>,

    /// print the dashboard between questions every refresh interval
    #[clap(long)]
    live_chart: bool,

    /// do not show the dashboard when the drill ends
    #[clap(long)]
    no_dashboard: bool,

    /// write the effective settings to the config file and exit
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Layer command line overrides on top of the loaded config
    fn apply(&self, mut config: DrillConfig) -> DrillConfig {
        if let Some(dir) = &self.out_dir {
            config.export_dir = dir.clone();
        }
        if let Some(rounds) = self.rounds {
            config.rounds = rounds;
        }
        config
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let store = cli
        .config
        .as_ref()
        .map(FileConfigStore::with_path)
        .unwrap_or_default();
    let config = cli.apply(store.load());
    config.validate()?;

    if cli.save_config {
        store.save(&config)?;
        println!("Saved config to {}", store.path().display());
        return Ok(());
    }
    tracing::info!(config_path = %store.path().display(), ?config, "starting drill");

    let sink = (
        CsvExporter::new(&config.export_dir),
        cli.live_chart
            .then(|| LiveChart::new(io::stdout(), LIVE_CHART_WIDTH, LIVE_CHART_HEIGHT)),
    );

    let mut drill = Drill::new(
        config,
        cli.rng(),
        ReaderSource::new(io::stdin().lock()),
        io::stdout(),
        SystemClock,
        sink,
    );
    drill.run()?;

    if !cli.no_dashboard {
        if io::stdout().is_tty() && io::stdin().is_tty() {
            show_dashboard(drill.state())?;
        } else {
            println!(
                "{}",
                ui::render_text(&drill.state().snapshot(), LIVE_CHART_WIDTH, LIVE_CHART_HEIGHT)
            );
        }
    }

    Ok(())
}

/// Full-screen dashboard; any key closes it
fn show_dashboard(state: &SessionState) -> anyhow::Result<()> {
    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_dashboard(&mut terminal, state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_dashboard<B: Backend>(terminal: &mut Terminal<B>, state: &SessionState) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| f.render_widget(Dashboard::new(state.snapshot()), f.area()))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(()),
            _ => {}
        }
    }
}
