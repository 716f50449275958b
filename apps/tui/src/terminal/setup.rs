use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::{
    cursor,
    event::{DisableFocusChange, EnableFocusChange},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{stdout, Write};

/// Puts the terminal into raw mode on the alternate screen and asks for
/// focus events, which pause widget rotation.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
    tracing::debug!(width, height, "setting up terminal");

    // STEP 1: Enable raw mode - simplest operation that modifies terminal state
    if let Err(e) = enable_raw_mode() {
        return Err(eyre!("Failed to enable raw mode: {e}"));
    }

    // STEP 2: Enter alternate screen - create a clean environment
    let mut stdout = stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableFocusChange) {
        let _ = disable_raw_mode();
        return Err(eyre!("Failed to enter alternate screen: {e}"));
    }

    // STEP 3: Create backend and terminal
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(term) => term,
        Err(e) => {
            let _ = execute!(std::io::stdout(), DisableFocusChange, LeaveAlternateScreen);
            let _ = disable_raw_mode();
            return Err(eyre!("Failed to create terminal: {e}"));
        }
    };

    // STEP 4: Clear screen and hide cursor; neither is fatal
    if let Err(e) = terminal.clear() {
        tracing::warn!("failed to clear terminal: {e}");
    }
    if let Err(e) = execute!(std::io::stdout(), cursor::Hide) {
        tracing::warn!("failed to hide cursor: {e}");
    }

    Ok(terminal)
}

/// Restores whatever [`setup_terminal`] changed. Errors are logged, not
/// returned, since this also runs on the way out of a failure.
pub fn cleanup_terminal_state(raw_mode: bool, alternate_screen: bool) {
    let mut stdout_handle = stdout();

    if let Err(e) = execute!(stdout_handle, cursor::Show) {
        tracing::warn!("failed to show cursor: {e}");
    }

    if alternate_screen {
        if let Err(e) = execute!(stdout_handle, DisableFocusChange, LeaveAlternateScreen) {
            tracing::warn!("failed to leave alternate screen: {e}");
        }
    }

    if raw_mode {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!("failed to disable raw mode: {e}");
        }
    }

    // Force a newline to ensure the prompt appears correctly
    let _ = execute!(stdout_handle, cursor::MoveToNextLine(1));
    let _ = stdout_handle.flush();

    tracing::debug!("terminal restored");
}
