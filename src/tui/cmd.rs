use crossterm::event::KeyEvent;

use crate::io::workspace::Topic;

/// Everything the program loop can deliver to the context and views
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    /// Data on `topic` changed; views re-list it
    Changed(Topic),
    /// The change feed for `topic` closed; no further refreshes will come
    ListenerClosed(Topic),
    /// Sent to a view when it becomes active again after a back-navigation
    NavigatedBack,
    Tick,
}

/// A side effect requested by an update, carried out by the program loop.
pub enum Cmd {
    None,
    Quit,
    /// Deliver a message on the next loop iteration
    Msg(Msg),
    Batch(Vec<Cmd>),
    /// Run on a worker thread; the returned message is delivered back
    Task(Box<dyn FnOnce() -> Msg + Send>),
}

impl std::fmt::Debug for Cmd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Msg(m) => f.debug_tuple("Msg").field(m).finish(),
            Self::Batch(cmds) => f.debug_tuple("Batch").field(cmds).finish(),
            Self::Task(_) => write!(f, "Task(...)"),
        }
    }
}

impl Cmd {
    pub fn none() -> Self {
        Self::None
    }

    pub fn quit() -> Self {
        Self::Quit
    }

    pub fn msg(m: Msg) -> Self {
        Self::Msg(m)
    }

    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> Msg + Send + 'static,
    {
        Self::Task(Box::new(f))
    }

    /// Combine commands, dropping no-ops. Zero commands is `None`, one is itself.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Flatten nested batches into a list of leaf commands
    pub fn into_leaves(self) -> Vec<Cmd> {
        match self {
            Self::None => Vec::new(),
            Self::Batch(cmds) => cmds.into_iter().flat_map(Cmd::into_leaves).collect(),
            other => vec![other],
        }
    }
}
