use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::io::workspace::{DataChanged, Topic};
use crate::tui::cmd::{Cmd, Msg};

/// Turns an external source of events into UI messages
pub trait Listener {
    /// Command to run once at startup
    fn init(&self) -> Cmd;
    /// React to a message; `Cmd::None` for messages that are not ours
    fn receive(&self, msg: &Msg) -> Cmd;
}

/// Bridges a workspace subscription into `Msg::Changed(topic)`.
///
/// Each time its own message comes through, the listener re-arms by
/// spawning a single blocking wait for the next change marker. Markers that
/// pile up while nobody is waiting are drained together, so a burst of
/// changes produces one refresh.
pub struct ChangeListener {
    topic: Topic,
    rx: Arc<Mutex<Receiver<DataChanged>>>,
}

impl ChangeListener {
    pub fn new(topic: Topic, rx: Receiver<DataChanged>) -> Self {
        ChangeListener {
            topic,
            rx: Arc::new(Mutex::new(rx)),
        }
    }
}

impl Listener for ChangeListener {
    fn init(&self) -> Cmd {
        Cmd::msg(Msg::Changed(self.topic))
    }

    fn receive(&self, msg: &Msg) -> Cmd {
        if *msg != Msg::Changed(self.topic) {
            return Cmd::none();
        }
        let topic = self.topic;
        let rx = Arc::clone(&self.rx);
        Cmd::task(move || {
            let rx = rx.lock().unwrap_or_else(PoisonError::into_inner);
            match rx.recv() {
                Ok(DataChanged) => {
                    let coalesced = rx.try_iter().count();
                    debug!(?topic, coalesced, "data changed");
                    Msg::Changed(topic)
                }
                Err(_) => {
                    debug!(?topic, "change feed closed");
                    Msg::ListenerClosed(topic)
                }
            }
        })
    }
}

/// All registered listeners. Every message is offered to each of them.
#[derive(Default)]
pub struct Listeners(Vec<Box<dyn Listener>>);

impl Listeners {
    pub fn new(listeners: Vec<Box<dyn Listener>>) -> Self {
        Listeners(listeners)
    }

    pub fn init(&self) -> Cmd {
        Cmd::batch(self.0.iter().map(|l| l.init()).collect())
    }

    pub fn receive(&self, msg: &Msg) -> Cmd {
        Cmd::batch(self.0.iter().map(|l| l.receive(msg)).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
