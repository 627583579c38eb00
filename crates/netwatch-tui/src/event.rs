//! Terminal input pump.
//!
//! A background task merges crossterm's event stream with two timers and
//! forwards the result over a channel. Focus reports are folded into a
//! single visibility flag: terminals repeat focus events freely, but the
//! dashboard only cares when the flag actually flips.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Resize(u16, u16),
    /// The terminal window moved to the foreground (`true`) or background.
    Visibility(bool),
    /// Housekeeping tick (toast expiry).
    Tick,
    Render,
}

/// Tracks terminal focus so only real transitions become events.
#[derive(Debug)]
struct Focus {
    visible: bool,
}

impl Focus {
    fn new() -> Self {
        Self { visible: true }
    }

    /// Map one crossterm event, or drop it.
    fn translate(&mut self, event: CrosstermEvent) -> Option<Event> {
        match event {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
            CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
            CrosstermEvent::FocusGained => self.flip(true),
            CrosstermEvent::FocusLost => self.flip(false),
            _ => None,
        }
    }

    fn flip(&mut self, visible: bool) -> Option<Event> {
        if self.visible == visible {
            return None;
        }
        self.visible = visible;
        Some(Event::Visibility(visible))
    }
}

fn ticker(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

/// Owns the reader task; dropping it stops the task.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    pub fn new(tick_rate: Duration, render_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(pump(tx, cancel.clone(), tick_rate, render_rate));
        Self { rx, cancel }
    }

    /// Receive the next event. Returns `None` once the reader has stopped.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn pump(
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
    tick_rate: Duration,
    render_rate: Duration,
) {
    let mut input = EventStream::new();
    let mut tick = ticker(tick_rate);
    let mut render = ticker(render_rate);
    let mut focus = Focus::new();

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = tick.tick() => Event::Tick,
            _ = render.tick() => Event::Render,
            next = input.next() => match next {
                Some(Ok(raw)) => match focus.translate(raw) {
                    Some(event) => event,
                    None => continue,
                },
                Some(Err(e)) => {
                    warn!(error = %e, "terminal input error");
                    continue;
                }
                None => break,
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}
