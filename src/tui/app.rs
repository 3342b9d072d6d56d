use std::io;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info, warn};

use crate::io::watcher::WorkspaceWatcher;
use crate::io::workspace::{Topic, Workspace};
use crate::model::config::Config;

use super::cmd::{Cmd, Msg};
use super::context::{Env, GlobalKeyHandler, Outcome, ProgramContext, handle_back, handle_quit};
use super::keymap::KeyMap;
use super::listener::{ChangeListener, Listener, Listeners};
use super::theme::Theme;
use super::views::{AgendaView, open_projects_handler};

/// How often status messages get a chance to expire
const TICK: Duration = Duration::from_millis(250);

/// Run the TUI application
pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let ws = Arc::new(Workspace::open(&config.root)?.with_today(config.date));
    let _watcher = match WorkspaceWatcher::start(Arc::clone(&ws)) {
        Ok(w) => Some(w),
        Err(e) => {
            warn!(error = %e, "file watching disabled");
            None
        }
    };

    let mut ctx = build_context(config, &ws);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let (tx, rx) = mpsc::channel();
    let size = terminal.size()?;
    let _ = tx.send(Msg::Resize {
        width: size.width,
        height: size.height,
    });
    spawn_input(tx.clone());
    info!(root = %config.root.display(), "tui started");

    let result = run_event_loop(&mut terminal, &mut ctx, &tx, &rx);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("tui stopped");

    result
}

/// Agenda as the first view, change listeners for both topics, and the
/// quit, back and projects keys
fn build_context(config: &Config, ws: &Arc<Workspace>) -> ProgramContext {
    let mut env = Env::new(
        Theme::from_config(&config.file.ui),
        KeyMap::from_config(&config.file.keys),
        config.today(),
    );
    env.message_ttl = Duration::from_secs(config.file.ui.message_secs);
    env.inbox = config.file.tasks.inbox.clone();

    let listeners: Vec<Box<dyn Listener>> = [Topic::Tasks, Topic::Projects]
        .into_iter()
        .map(|topic| Box::new(ChangeListener::new(topic, ws.subscribe(topic))) as Box<dyn Listener>)
        .collect();
    let handlers: Vec<GlobalKeyHandler> = vec![
        Box::new(handle_quit),
        Box::new(handle_back),
        open_projects_handler(Arc::clone(ws)),
    ];

    ProgramContext::new(env, |env| Box::new(AgendaView::new(Arc::clone(ws), env)))
        .with_listeners(Listeners::new(listeners))
        .with_key_handlers(handlers)
}

/// Forward key presses and resizes into the message channel
fn spawn_input(tx: Sender<Msg>) {
    thread::spawn(move || {
        loop {
            let msg = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => Msg::Key(key),
                Ok(Event::Resize(width, height)) => Msg::Resize { width, height },
                Ok(_) => continue,
                Err(e) => {
                    warn!(error = %e, "terminal input failed");
                    break;
                }
            };
            if tx.send(msg).is_err() {
                break;
            }
        }
    });
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ctx: &mut ProgramContext,
    tx: &Sender<Msg>,
    rx: &Receiver<Msg>,
) -> Result<(), Box<dyn std::error::Error>> {
    if execute(ctx.init(), tx).is_break() {
        return Ok(());
    }
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|frame| ctx.render(frame))?;

        let msg = match rx.recv_timeout(TICK.saturating_sub(last_tick.elapsed())) {
            Ok(msg) => msg,
            Err(RecvTimeoutError::Timeout) => Msg::Tick,
            Err(RecvTimeoutError::Disconnected) => break,
        };
        if msg == Msg::Tick {
            last_tick = Instant::now();
        } else if last_tick.elapsed() >= TICK {
            // Keep ticking while messages arrive back to back
            let _ = tx.send(Msg::Tick);
            last_tick = Instant::now();
        }
        if let Msg::ListenerClosed(topic) = &msg {
            warn!(?topic, "change listener closed; views will no longer refresh");
        }

        if execute(step(ctx, &msg), tx).is_break() {
            break;
        }
    }
    Ok(())
}

/// The context sees every message first; unless it consumes it, the active
/// view gets it too
fn step(ctx: &mut ProgramContext, msg: &Msg) -> Cmd {
    match ctx.update(msg) {
        Outcome::Handled(cmd) => cmd,
        Outcome::Forward(cmd) => Cmd::batch(vec![cmd, ctx.dispatch(msg)]),
    }
}

/// Carry out a command. Breaks when the program should quit.
fn execute(cmd: Cmd, tx: &Sender<Msg>) -> ControlFlow<()> {
    for leaf in cmd.into_leaves() {
        match leaf {
            Cmd::Quit => {
                debug!("quit requested");
                return ControlFlow::Break(());
            }
            Cmd::Msg(msg) => {
                let _ = tx.send(msg);
            }
            Cmd::Task(task) => {
                let tx = tx.clone();
                thread::spawn(move || {
                    let _ = tx.send(task());
                });
            }
            Cmd::None | Cmd::Batch(_) => {}
        }
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::FileConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::fs;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> Config {
        Config {
            root: dir.path().to_path_buf(),
            date: chrono::NaiveDate::from_ymd_opt(2024, 3, 5),
            file: FileConfig::default(),
        }
    }

    #[test]
    fn execute_runs_every_leaf() {
        let (tx, rx) = mpsc::channel();
        let cmd = Cmd::batch(vec![
            Cmd::msg(Msg::Tick),
            Cmd::task(|| Msg::NavigatedBack),
        ]);
        assert!(execute(cmd, &tx).is_continue());
        assert_eq!(rx.recv_timeout(Duration::from_secs(1)).unwrap(), Msg::Tick);
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            Msg::NavigatedBack
        );
    }

    #[test]
    fn execute_stops_at_quit() {
        let (tx, rx) = mpsc::channel();
        let cmd = Cmd::batch(vec![Cmd::quit(), Cmd::msg(Msg::Tick)]);
        assert!(execute(cmd, &tx).is_break());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn context_starts_on_agenda_and_listens_to_changes() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.md"), "- [ ] one due:2024-03-01\n").unwrap();
        let config = config(&dir);
        let ws = Arc::new(Workspace::open(&config.root).unwrap());
        let mut ctx = build_context(&config, &ws);

        assert_eq!(ctx.active().unwrap().name(), "Agenda");
        let leaves = ctx.init().into_leaves();
        assert_eq!(leaves.len(), 2);

        // A listener's own event re-arms its wait
        let cmd = step(&mut ctx, &Msg::Changed(Topic::Tasks));
        assert!(matches!(cmd, Cmd::Task(_)));
    }

    #[test]
    fn quit_key_ends_the_loop() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let ws = Arc::new(Workspace::open(&config.root).unwrap());
        let mut ctx = build_context(&config, &ws);
        let (tx, _rx) = mpsc::channel();

        let q = Msg::Key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE));
        assert!(execute(step(&mut ctx, &q), &tx).is_break());
    }
}
