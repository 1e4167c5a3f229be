use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use crossterm::event::KeyEventKind;
use ratatui::prelude::*;

mod ai;
mod app;
mod config;
mod error;
mod models;
mod services;
mod tui;
mod validation;
mod workflow;

use ai::Summarizer;
use app::App;
use config::Config;
use services::{ApiClient, ContentRepository, HttpContentRepository, Session};
use tui::{draw, handle_key_event};

enum Command {
    Run,
    List,
    Login(String),
    Logout,
}

fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    match args.get(1).map(String::as_str) {
        None => Ok(Command::Run),
        Some("--list") => Ok(Command::List),
        Some("--logout") => Ok(Command::Logout),
        Some("--login") => args
            .get(2)
            .map(|email| Command::Login(email.clone()))
            .context("--login requires an email address"),
        Some(other) => anyhow::bail!(
            "unknown argument {:?} (expected --login <email>, --logout or --list)",
            other
        ),
    }
}

fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    // The terminal is in raw mode while the UI runs, so prefer a log file
    match &config.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let command = parse_args(&args)?;

    // Load configuration
    let config = Config::load()?;
    init_logging(&config)?;

    let api = ApiClient::new(
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    match command {
        Command::Login(email) => {
            print!("Password for {}: ", email);
            io::stdout().flush()?;
            let mut password = String::new();
            io::stdin().lock().read_line(&mut password)?;

            let mut session = Session::anonymous(&config.session_path);
            let user = session.login(&api, &email, password.trim_end()).await?;
            println!("Logged in as {} ({})", user.display_name(), user.role.label());
            return Ok(());
        }
        // Works offline: only the stored tokens are removed
        Command::Logout => {
            Session::anonymous(&config.session_path).teardown()?;
            println!("Logged out");
            return Ok(());
        }
        Command::List | Command::Run => {}
    }

    let session = Session::init(&config.session_path, &api)
        .await
        .context("restoring session")?;

    let (Some(user), Some(token)) = (session.user().cloned(), session.access_token()) else {
        eprintln!("Not logged in. Run with --login <email> first.");
        return Ok(());
    };

    let repository = Arc::new(HttpContentRepository::new(api.with_token(token)));

    // If headless list, print and exit
    if let Command::List = command {
        for item in repository.list_content().await? {
            println!(
                "{:>5}  {:<8} {:<40} {}",
                item.id,
                item.content_type,
                item.title,
                item.training_name.as_deref().unwrap_or("")
            );
        }
        return Ok(());
    }

    let summary_api = ApiClient::new(
        &config.api_base_url,
        Duration::from_secs(config.summary_timeout_secs),
    )?
    .with_token(token);
    let summarizer = Arc::new(Summarizer::new(summary_api));

    let mut app = App::new(&config, user, repository, summarizer);
    app.start();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, app))?;

        // Advance spinner animation
        app.tick_spinner();

        // Apply completed background requests
        app.poll_events();

        // Poll for events with timeout so background results keep flowing in
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = handle_key_event(key, app.input_mode()) {
                        if app.handle_action(action) {
                            return Ok(());
                        }
                    }
                }
            }
        }

        tokio::task::yield_now().await;
    }
}
