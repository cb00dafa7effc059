use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

use taskdeck::api::ApiClient;
use taskdeck::app::{Action, ApiEvent, App};
use taskdeck::ui;

/// How long the input thread waits for a key before emitting a tick.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(name = "taskdeck", version, about = "Terminal client for the task manager API")]
struct Args {
    /// Base URL of the task manager backend.
    #[arg(long, default_value = "http://localhost:8000")]
    api_url: Url,

    /// Append logs to this file. Without it logging is disabled, since the
    /// alternate screen and stderr output do not mix.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Everything the event loop reacts to.
enum AppEvent {
    Input(Event),
    Api(ApiEvent),
    Tick,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;

    let client = ApiClient::new(args.api_url);

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, client).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("{err:?}");
    }
    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, client: ApiClient) -> io::Result<()> {
    let (tx, mut rx) = mpsc::channel::<AppEvent>(64);
    spawn_input_thread(tx.clone());

    let health = client.clone();
    tokio::spawn(async move {
        match health.health_check().await {
            Ok(true) => info!(url = %health.base_url(), "backend is reachable"),
            _ => warn!(url = %health.base_url(), "backend did not answer the health check"),
        }
    });

    let mut app = App::new();
    dispatch(Action::LoadTasks, &client, &tx);
    terminal.draw(|f| ui::draw(f, &app))?;

    while let Some(event) = rx.recv().await {
        let action = match event {
            AppEvent::Input(Event::Key(key)) => app.on_key(key, Instant::now()),
            AppEvent::Input(_) => None,
            AppEvent::Api(api_event) => app.on_api(api_event, Instant::now()),
            AppEvent::Tick => {
                app.tick(Instant::now());
                None
            }
        };
        if let Some(action) = action {
            dispatch(action, &client, &tx);
        }
        if app.should_quit {
            return Ok(());
        }
        terminal.draw(|f| ui::draw(f, &app))?;
    }
    Ok(())
}

/// Forward crossterm events over the channel; emit a tick when the terminal
/// stays quiet so banners still expire.
fn spawn_input_thread(tx: mpsc::Sender<AppEvent>) {
    std::thread::spawn(move || loop {
        let app_event = match event::poll(TICK_INTERVAL) {
            Ok(true) => match event::read() {
                Ok(ev) => AppEvent::Input(ev),
                Err(_) => break,
            },
            Ok(false) => AppEvent::Tick,
            Err(_) => break,
        };
        if tx.blocking_send(app_event).is_err() {
            break;
        }
    });
}

/// Run one backend call on the runtime and report its outcome back into the
/// event loop. Once issued a request is never cancelled.
fn dispatch(action: Action, client: &ApiClient, tx: &mpsc::Sender<AppEvent>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let event = match action {
            Action::LoadTasks => ApiEvent::TasksLoaded(client.list_tasks().await),
            Action::FetchTask(id) => ApiEvent::TaskFetched(client.get_task(id).await),
            Action::CreateTask(input) => ApiEvent::TaskCreated(client.create_task(&input).await),
            Action::UpdateTask { id, input } => {
                ApiEvent::TaskUpdated(client.update_task(id, &input).await)
            }
            Action::DeleteTask(id) => ApiEvent::TaskDeleted {
                id,
                result: client.delete_task(id).await,
            },
            Action::LoadStats => ApiEvent::StatsLoaded(client.stats().await),
        };
        let _ = tx.send(AppEvent::Api(event)).await;
    });
}

fn init_tracing(path: Option<&Path>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
