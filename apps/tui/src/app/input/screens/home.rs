use crate::app::state::App;
use charts_core::Platform;
use crossterm::event::KeyCode;

pub fn handle_home_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::BackTab => app.focus_panel(false),
        KeyCode::Down | KeyCode::Tab => app.focus_panel(true),
        KeyCode::Left => app.cycle_tab(false),
        KeyCode::Right => app.cycle_tab(true),
        KeyCode::Char('p') => app.toggle_rotation(),
        KeyCode::Enter => app.view_all(),
        KeyCode::Esc => app.running = false,
        KeyCode::Char(digit @ '1'..='6') => open_platform(app, digit),
        _ => {}
    }
}

pub(super) fn open_platform(app: &mut App, digit: char) {
    let index = digit
        .to_digit(10)
        .and_then(|n| usize::try_from(n).ok())
        .and_then(|n| n.checked_sub(1));
    if let Some(platform) = index.and_then(|i| Platform::ALL.get(i)) {
        app.open_chart(*platform, None);
    }
}
