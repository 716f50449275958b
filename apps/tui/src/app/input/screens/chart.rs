use crate::app::state::App;
use crossterm::event::KeyCode;

use super::home::open_platform;

const PAGE: isize = 10;

pub fn handle_chart_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Char('h') => app.go_home(),
        KeyCode::Left => app.previous_platform(),
        KeyCode::Right => app.next_platform(),
        KeyCode::Tab | KeyCode::Char('c') => app.cycle_chart(true),
        KeyCode::BackTab | KeyCode::Char('C') => app.cycle_chart(false),
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(1),
        KeyCode::PageUp => app.move_cursor(-PAGE),
        KeyCode::PageDown => app.move_cursor(PAGE),
        KeyCode::Home => app.cursor_to_end(false),
        KeyCode::End => app.cursor_to_end(true),
        KeyCode::Enter => app.select_cursor_row(),
        KeyCode::Char('o') => app.click_cursor_cover(),
        KeyCode::Char('r') => app.open_chart(app.platform, Some(app.chart_code)),
        KeyCode::Char(digit @ '1'..='6') => open_platform(app, digit),
        _ => {}
    }
}
