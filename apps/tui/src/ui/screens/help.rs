use crate::app::{App, AppScreen};
use crate::ui::widgets::shortcuts::shortcuts_line;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

const HOME_KEYS: &[(&str, &str)] = &[
    ("↑/↓ Tab", "focus Top Songs, Top Artists or Streaming"),
    ("←/→", "switch tab (stops rotation) or streaming platform"),
    ("p", "pause or resume rotation of the focused widget"),
    ("Enter", "open the full list behind the focused panel"),
];

const CHART_KEYS: &[(&str, &str)] = &[
    ("←/→", "previous / next platform"),
    ("Tab c / Shift-Tab C", "next / previous chart"),
    ("↑/↓ PgUp/PgDn Home/End", "move the cursor"),
    ("Enter", "select the row"),
    ("o", "select, then open the streaming link"),
    ("r", "reload"),
    ("Esc h", "back to home"),
];

const GLOBAL_KEYS: &[(&str, &str)] = &[
    ("1-6", "open a platform list"),
    ("? F1", "toggle this help"),
    ("q", "quit"),
];

pub fn render_help_popup(app: &App, f: &mut Frame<'_>) {
    let area = centered(f.area(), 70, 70);
    f.render_widget(Clear, area);

    let screen_keys = match app.screen {
        AppScreen::Home => HOME_KEYS,
        AppScreen::Chart => CHART_KEYS,
    };

    let mut lines = Vec::new();
    for (key, action) in screen_keys.iter().chain(GLOBAL_KEYS) {
        lines.push(shortcuts_line(&[(*key, *action)]));
    }
    lines.push(TextLine::from(""));
    lines.push(TextLine::from("Press Esc to close"));

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
