//! Interactive terminal UI.
//!
//! A single event loop thread owns the terminal and the [`App`]. Each
//! iteration draws, polls one key event, drains worker results, fires due
//! timers and finally executes the effects the app queued. Network calls run
//! on short-lived worker threads that report back over an mpsc channel.

mod actions;
mod app;
mod ui;

pub use actions::{action_for, Action};
pub use app::{App, Effect, LoginField, Screen, WorkerEvent};

use crate::client::{CompileService, TransportError};
use crate::error::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::any::Any;
use std::io::{self, Stdout};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// How long one loop iteration waits for a key before checking timers.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode.
pub fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the terminal UI until the user quits.
pub fn run(mut app: App, service: Arc<dyn CompileService>) -> Result<()> {
    // Restore the terminal only when the UI thread itself panics. Worker
    // panics are reported back as failed outcomes by `spawn_worker`.
    let ui_thread = thread::current().id();
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if thread::current().id() == ui_thread {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        } else {
            tracing::error!(panic = %panic_info, "worker thread panicked");
        }
    }));

    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, &mut app, service);
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop(terminal: &mut Tui, app: &mut App, service: Arc<dyn CompileService>) -> Result<()> {
    let (tx, rx) = mpsc::channel::<WorkerEvent>();
    tracing::info!(endpoint = %service.endpoint(), "terminal UI started");

    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release or repeat)
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = action_for(app.screen(), app.login().focus, key) {
                        app.dispatch(action);
                    }
                }
            }
        }

        while let Ok(worker_event) = rx.try_recv() {
            app.on_worker(worker_event, Instant::now());
        }
        app.tick(Instant::now());

        for effect in app.take_effects() {
            match effect {
                Effect::Compile(request) => {
                    let id = request.id();
                    let url = format!("{}/compile", service.endpoint());
                    spawn_worker(
                        &tx,
                        &service,
                        move |service| WorkerEvent::Compiled {
                            id,
                            outcome: service.compile(request.source_text()),
                        },
                        move |detail| WorkerEvent::Compiled {
                            id,
                            outcome: Err(TransportError { url, detail }),
                        },
                    )
                }
                Effect::Login(credentials) => {
                    let url = format!("{}/login", service.endpoint());
                    spawn_worker(
                        &tx,
                        &service,
                        move |service| WorkerEvent::LoggedIn {
                            outcome: service.login(&credentials),
                        },
                        move |detail| WorkerEvent::LoggedIn {
                            outcome: Err(TransportError { url, detail }),
                        },
                    )
                }
                Effect::EditSource => {
                    restore_terminal(terminal)?;
                    let edited = app.editor_mut().open();
                    enable_raw_mode()?;
                    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
                    terminal.clear()?;
                    app.source_edited(edited);
                }
            }
        }

        if app.should_quit() {
            tracing::info!("terminal UI closed");
            return Ok(());
        }
    }
}

fn spawn_worker<F, P>(
    tx: &Sender<WorkerEvent>,
    service: &Arc<dyn CompileService>,
    work: F,
    on_panic: P,
) where
    F: FnOnce(&dyn CompileService) -> WorkerEvent + Send + 'static,
    P: FnOnce(String) -> WorkerEvent + Send + 'static,
{
    let tx = tx.clone();
    let service = Arc::clone(service);
    thread::spawn(move || {
        let event = run_guarded(|| work(service.as_ref()), on_panic);
        // The receiver is gone only if the UI already quit.
        let _ = tx.send(event);
    });
}

/// Run `work`, turning a panic into the event built by `on_panic` so the
/// app always gets an answer for the request it is waiting on.
fn run_guarded<F, P>(work: F, on_panic: P) -> WorkerEvent
where
    F: FnOnce() -> WorkerEvent,
    P: FnOnce(String) -> WorkerEvent,
{
    panic::catch_unwind(AssertUnwindSafe(work))
        .unwrap_or_else(|payload| on_panic(panic_detail(payload.as_ref())))
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    let reason = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    format!("request worker panicked: {}", reason)
}
