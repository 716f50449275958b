// UI module for charts-tui
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use crate::app::{App, AppScreen};
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    match app.screen {
        AppScreen::Home => screens::home::render_home(app, f),
        AppScreen::Chart => screens::chart::render_chart(app, f),
    }

    if app.show_help {
        screens::help::render_help_popup(app, f);
    }
}
