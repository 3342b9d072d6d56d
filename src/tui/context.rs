use std::mem;
use std::path::PathBuf;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use tracing::debug;

use crate::tui::cmd::{Cmd, Msg};
use crate::tui::history::History;
use crate::tui::keymap::{Action, KeyMap};
use crate::tui::listener::Listeners;
use crate::tui::theme::Theme;

/// Shared, read-mostly state every view renders against
#[derive(Debug, Clone)]
pub struct Env {
    pub theme: Theme,
    pub keymap: KeyMap,
    pub width: u16,
    pub height: u16,
    /// The date the program started on (or was pinned to)
    pub today: NaiveDate,
    /// How long status messages stay up
    pub message_ttl: Duration,
    /// Where tasks added outside a project go
    pub inbox: PathBuf,
}

impl Env {
    pub fn new(theme: Theme, keymap: KeyMap, today: NaiveDate) -> Self {
        Env {
            theme,
            keymap,
            width: 0,
            height: 0,
            today,
            message_ttl: Duration::from_secs(10),
            inbox: PathBuf::from("README.md"),
        }
    }

    pub fn action(&self, key: &KeyEvent) -> Option<Action> {
        self.keymap.action(key)
    }
}

/// Result of a view handling a message
pub struct Step {
    pub cmd: Cmd,
    /// A view to switch to
    pub navigate: Option<Box<dyn View>>,
    /// Leave this view for the previous one
    pub back: bool,
}

impl Step {
    pub fn stay() -> Self {
        Step::cmd(Cmd::none())
    }

    pub fn cmd(cmd: Cmd) -> Self {
        Step {
            cmd,
            navigate: None,
            back: false,
        }
    }

    pub fn navigate(view: Box<dyn View>) -> Self {
        Step {
            navigate: Some(view),
            ..Step::stay()
        }
    }

    /// Close the view, as a finished form does
    pub fn back() -> Self {
        Step {
            back: true,
            ..Step::stay()
        }
    }
}

/// A top-level screen
pub trait View {
    /// Shown in the status bar mode block
    fn name(&self) -> &'static str;
    fn update(&mut self, env: &Env, msg: &Msg) -> Step;
    fn render(&mut self, env: &Env, frame: &mut Frame, area: Rect);

    /// Views with a text field return true so typed characters reach them
    /// instead of the global key handlers
    fn takes_text(&self) -> bool {
        false
    }
}

/// Printable characters and line-editing keys. Anything with ctrl or alt
/// held is left to the global handlers.
pub fn is_text_key(key: &KeyEvent) -> bool {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return false;
    }
    matches!(
        key.code,
        KeyCode::Char(_)
            | KeyCode::Backspace
            | KeyCode::Delete
            | KeyCode::Left
            | KeyCode::Right
            | KeyCode::Home
            | KeyCode::End
    )
}

/// Handles a key before any view sees it. `Some` stops the chain.
pub type GlobalKeyHandler = Box<dyn Fn(&mut ProgramContext, &KeyEvent) -> Option<Cmd>>;

/// What the context did with a message
#[derive(Debug)]
pub enum Outcome {
    /// Consumed; the active view must not see the message
    Handled(Cmd),
    /// Pass the message on to the active view as well
    Forward(Cmd),
}

/// Owns navigation history, the change listeners and the global key chain.
pub struct ProgramContext {
    env: Env,
    history: History<Box<dyn View>>,
    listeners: Listeners,
    key_handlers: Vec<GlobalKeyHandler>,
}

impl ProgramContext {
    pub fn new(env: Env, initial: impl FnOnce(&Env) -> Box<dyn View>) -> Self {
        let mut history = History::new();
        history.push(initial(&env));
        ProgramContext {
            env,
            history,
            listeners: Listeners::default(),
            key_handlers: Vec::new(),
        }
    }

    pub fn with_listeners(mut self, listeners: Listeners) -> Self {
        self.listeners = listeners;
        self
    }

    pub fn with_key_handlers(mut self, handlers: Vec<GlobalKeyHandler>) -> Self {
        self.key_handlers = handlers;
        self
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    /// Startup commands: each listener emits its first event
    pub fn init(&self) -> Cmd {
        self.listeners.init()
    }

    /// Offer a message to the context first. Keys go through the global
    /// handlers unless the active view is taking typed text. Every message,
    /// handled or not, is also fanned out to the listeners.
    pub fn update(&mut self, msg: &Msg) -> Outcome {
        let heard = self.listeners.receive(msg);
        match msg {
            Msg::Key(key) if !self.typing(key) => {
                let handlers = mem::take(&mut self.key_handlers);
                let handled = handlers.iter().find_map(|h| h(self, key));
                self.key_handlers = handlers;
                match handled {
                    Some(cmd) => Outcome::Handled(Cmd::batch(vec![cmd, heard])),
                    None => Outcome::Forward(heard),
                }
            }
            Msg::Resize { width, height } => {
                self.env.width = *width;
                self.env.height = *height;
                Outcome::Forward(heard)
            }
            _ => Outcome::Forward(heard),
        }
    }

    /// Whether `key` is text input for the active view
    fn typing(&self, key: &KeyEvent) -> bool {
        self.history.peek().is_some_and(|v| v.takes_text()) && is_text_key(key)
    }

    /// Hand a message to the active view, following any navigation it asks for
    pub fn dispatch(&mut self, msg: &Msg) -> Cmd {
        let env = &self.env;
        let Some(view) = self.history.peek_mut() else {
            return Cmd::none();
        };
        let step = view.update(env, msg);
        if let Some(next) = step.navigate {
            let (_, nav) = self.navigate(next);
            return Cmd::batch(vec![step.cmd, nav]);
        }
        if step.back {
            let back = self.back().map(|(_, cmd)| cmd).unwrap_or_else(Cmd::none);
            return Cmd::batch(vec![step.cmd, back]);
        }
        step.cmd
    }

    /// Make `next` the active view
    pub fn navigate(&mut self, next: Box<dyn View>) -> (&mut (dyn View + 'static), Cmd) {
        debug!(view = next.name(), depth = self.history.len() + 1, "navigate");
        let view = self.history.push(next);
        (view.as_mut(), Cmd::none())
    }

    /// Return to the previous view, telling it that it is active again.
    /// At the first view there is nowhere to go and `None` is returned.
    pub fn back(&mut self) -> Option<(&mut (dyn View + 'static), Cmd)> {
        if self.history.len() <= 1 {
            debug!("back at the first view");
            return None;
        }
        if let Some(left) = self.history.pop() {
            debug!(view = left.name(), "back");
        }
        let env = &self.env;
        let view = self.history.peek_mut()?;
        let step = view.update(env, &Msg::NavigatedBack);
        if step.navigate.is_some() {
            debug!("ignoring navigation requested on back");
        }
        Some((view.as_mut(), step.cmd))
    }

    pub fn active(&mut self) -> Option<&mut (dyn View + 'static)> {
        self.history.peek_mut().map(|v| v.as_mut())
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Draw the active view over the whole frame
    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let env = &self.env;
        if let Some(view) = self.history.peek_mut() {
            view.render(env, frame, area);
        }
    }
}

/// Global handler: quit keys end the program
pub fn handle_quit(ctx: &mut ProgramContext, key: &KeyEvent) -> Option<Cmd> {
    (ctx.env().action(key) == Some(Action::Quit)).then(Cmd::quit)
}

/// Global handler: the back key returns to the previous view
pub fn handle_back(ctx: &mut ProgramContext, key: &KeyEvent) -> Option<Cmd> {
    if ctx.env().action(key) != Some(Action::Back) {
        return None;
    }
    ctx.back().map(|(_, cmd)| cmd)
}
