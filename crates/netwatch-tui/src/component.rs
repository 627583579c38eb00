//! The contract between the app loop and a screen.

use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

use crate::action::Action;

/// One key and what it does, for the status bar.
pub type KeyHint = (&'static str, &'static str);

/// A screen receives keys the app loop did not claim, every non-global
/// action, and a render call per frame.
pub trait Component: Send {
    /// Map a key to an action for the app loop, if it means anything here.
    fn handle_key_event(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
        Ok(None)
    }

    /// Apply a dispatched action. May return a follow-up action.
    fn update(&mut self, _action: &Action) -> Result<Option<Action>> {
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Keys that apply in the component's current state.
    fn key_hints(&self) -> Vec<KeyHint> {
        Vec::new()
    }
}
