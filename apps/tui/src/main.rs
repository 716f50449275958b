use charts_core::{ChartSession, Platform};
use charts_tui::app::{App, AppOptions, Loader};
use charts_tui::cli::CliArgs;
use charts_tui::config::AppConfig;
use charts_tui::event::{self, HeadlessRequest};
use charts_tui::logging::{self, LogTarget};
use charts_tui::source::DataSource;
use charts_tui::terminal;
use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();
    let config = AppConfig::from_env()?;

    let platform = match args.platform.as_deref() {
        Some(name) => Some(Platform::parse(name).ok_or_else(|| {
            eyre!("Unknown platform {name:?}\n\n{}", CliArgs::help_text())
        })?),
        None => None,
    };

    let headless = args.headless || !is_terminal();
    let target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File
    };
    logging::init(&config, target)?;

    let source = DataSource::from_config(&config)?;
    tracing::info!(source = %source.describe(), "charts-tui starting");
    let session = Arc::new(ChartSession::new(source).with_default_cover(config.default_cover.clone()));

    if headless {
        return event::run_headless(
            &*session,
            HeadlessRequest {
                platform,
                chart: args.chart.as_deref(),
                limit: args.limit,
                json: args.json,
            },
        )
        .await;
    }

    let (sender, mut receiver) = mpsc::unbounded_channel();
    let loader = Loader::new(Arc::clone(&session), sender);

    let mut app = App::new(AppOptions {
        rotate_interval: config.rotate_interval,
        rotate: !args.no_rotate,
        limit: args.limit,
    });
    app.start_home();
    if let Some(platform) = platform {
        app.open_chart(platform, args.chart.as_deref());
    }

    // Setup terminal
    let mut terminal = terminal::setup()?;

    let result = event::run(&mut terminal, &mut app, &loader, &mut receiver).await;

    // Restore terminal
    terminal::cleanup(true, true);

    result
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
