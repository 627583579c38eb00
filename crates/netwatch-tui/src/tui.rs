//! Owning the terminal while the dashboard is on screen.
//!
//! Focus reporting is switched on so the dashboard can pause its refresh
//! cadence while the terminal window is in the background. Every exit
//! path (normal quit, error return, panic) runs [`restore`].

use std::io::{Stdout, Write, stdout};

use color_eyre::eyre::Result;
use crossterm::{
    cursor,
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend};

type Backend = CrosstermBackend<Stdout>;

pub struct Tui {
    terminal: Terminal<Backend>,
    active: bool,
}

impl Tui {
    /// Take over the terminal: raw mode, alternate screen, focus events.
    pub fn enter() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        if let Err(e) = execute!(out, EnterAlternateScreen, EnableFocusChange, cursor::Hide) {
            restore();
            return Err(e.into());
        }

        let mut terminal = Terminal::new(CrosstermBackend::new(out))?;
        terminal.clear()?;
        Ok(Self {
            terminal,
            active: true,
        })
    }

    /// Hand the terminal back. Safe to call more than once.
    pub fn exit(&mut self) {
        if self.active {
            self.active = false;
            restore();
        }
    }

    pub fn draw(&mut self, render: impl FnOnce(&mut Frame)) -> Result<()> {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        self.exit();
    }
}

/// Undo everything [`Tui::enter`] did, one step at a time so a failing
/// step does not skip the rest.
fn restore() {
    let mut out = stdout();
    let _ = execute!(out, cursor::Show);
    let _ = execute!(out, DisableFocusChange);
    let _ = execute!(out, LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
    let _ = out.flush();
}

/// Install panic and error hooks that restore the terminal before printing.
///
/// Must be called before [`Tui::enter`].
pub fn install_hooks() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    let panic_hook = panic_hook.into_panic_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore();
        panic_hook(info);
    }));

    Ok(())
}
