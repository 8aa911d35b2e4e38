use std::io;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tokio::sync::mpsc;
use tracing::info;
use tui::{backend::CrosstermBackend, Terminal};

use project_dashboard::api::ApiClient;
use project_dashboard::app::{self, App};
use project_dashboard::config::{self, Cli};
use project_dashboard::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let cli = Cli::parse();
    let config = config::init(&cli)?;
    logging::init(&config.log_file)?;
    info!(base_url = %config.api_base_url, route = %cli.route, "starting dashboard");

    let client = Arc::new(ApiClient::from_config(&config)?);

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let (tx, rx) = mpsc::unbounded_channel();
    app::spawn_input(tx.clone());
    app::spawn_ticker(tx.clone());
    let mut app = App::new(client, tx, cli.route, config.success_ttl());
    app.start();

    // Run the main app loop
    let result = app::run(&mut terminal, &mut app, rx).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = &result {
        println!("Error: {}", err);
    }
    info!("dashboard closed");

    result
}
