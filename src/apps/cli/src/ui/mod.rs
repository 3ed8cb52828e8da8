/// TUI interface module
///
/// Build terminal user interface using ratatui

pub mod app;
pub mod input;
pub mod render;
pub mod theme;

use anyhow::Result;
use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

pub struct TerminalSession {
    pub terminal: Terminal<CrosstermBackend<io::Stdout>>,
    keyboard_enhanced: bool,
}

/// Initialize terminal
///
/// Keyboard enhancement lets terminals that support it report Ctrl+Enter.
pub fn init_terminal() -> Result<TerminalSession> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;

    let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if keyboard_enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(TerminalSession {
        terminal,
        keyboard_enhanced,
    })
}

/// Restore terminal
pub fn restore_terminal(mut session: TerminalSession) -> Result<()> {
    if session.keyboard_enhanced {
        execute!(session.terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(
        session.terminal.backend_mut(),
        DisableBracketedPaste,
        LeaveAlternateScreen
    )?;
    session.terminal.show_cursor()?;
    Ok(())
}
