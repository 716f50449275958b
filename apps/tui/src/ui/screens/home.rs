use crate::app::state::WidgetView;
use crate::app::{App, HomePanel};
use crate::ui::widgets::shortcuts::shortcuts_line;
use crate::ui::widgets::status::render_status;
use charts_core::highlights::HIGHLIGHT_GROUPS;
use charts_core::{Badge, ChartKind, HighlightCard, MergedRecord};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub fn render_home(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),      // Title
            Constraint::Percentage(30), // Top songs
            Constraint::Percentage(30), // Top artists
            Constraint::Min(6),         // Streaming highlights
            Constraint::Length(3),      // Status
            Constraint::Length(1),      // Shortcuts
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_title(f, layout[0]);
    render_widget_panel(app, &app.widgets[0], HomePanel::TopSongs, f, layout[1]);
    render_widget_panel(app, &app.widgets[1], HomePanel::TopArtists, f, layout[2]);
    render_highlights(app, f, layout[3]);
    render_status(&app.status_message, f, layout[4]);

    let shortcuts = shortcuts_line(&[
        ("↑/↓", "Panel"),
        ("←/→", "Tab"),
        ("p", "Pause/resume"),
        ("Enter", "View all"),
        ("1-6", "Lists"),
        ("?", "Help"),
        ("q", "Quit"),
    ]);
    f.render_widget(
        Paragraph::new(shortcuts).alignment(Alignment::Center),
        layout[5],
    );
}

fn render_title(f: &mut Frame<'_>, area: Rect) {
    let title = Paragraph::new(TextLine::from(vec![
        Span::styled(
            "Charts ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Hub",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, area);
}

fn panel_block(app: &App, panel: HomePanel, title: TextLine<'static>) -> Block<'static> {
    let color = if app.home_focus == panel {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
}

fn tab_spans(labels: impl Iterator<Item = &'static str>, active: usize) -> Vec<Span<'static>> {
    labels
        .enumerate()
        .map(|(i, label)| {
            if i == active {
                Span::styled(
                    format!(" [{label}] "),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(format!(" {label} "), Style::default().fg(Color::Gray))
            }
        })
        .collect()
}

fn render_widget_panel(
    app: &App,
    view: &WidgetView,
    panel: HomePanel,
    f: &mut Frame<'_>,
    area: Rect,
) {
    let mut title = vec![Span::styled(
        format!(" {} ", view.widget.name),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    title.extend(tab_spans(
        view.widget.categories.iter().map(|category| category.label),
        view.rotation.current(),
    ));
    if !view.rotation.is_rotating() {
        title.push(Span::styled(" (paused) ", Style::default().fg(Color::DarkGray)));
    }

    let mut lines = Vec::new();
    if view.loading && view.records.is_empty() {
        lines.push(TextLine::from("Loading..."));
    } else if let Some(error) = &view.error {
        lines.push(TextLine::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.extend(
            view.records
                .iter()
                .map(|record| record_line(record, view.widget.kind)),
        );
    }
    if let Some(link) = view.view_all_link() {
        lines.push(TextLine::from(Span::styled(
            format!("View all: {link}"),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(panel_block(app, panel, TextLine::from(title)))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn record_line(record: &MergedRecord, kind: ChartKind) -> TextLine<'static> {
    let detail = match kind {
        ChartKind::Songs => record.artist_line(),
        ChartKind::Artists => format!(
            "Hits: {}",
            record
                .hits
                .map_or_else(|| "?".to_string(), |hits| hits.to_string())
        ),
    };
    TextLine::from(vec![
        Span::styled(
            format!("{:>2}. ", record.rank),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            record.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(detail, Style::default().fg(Color::Gray)),
    ])
}

fn render_highlights(app: &App, f: &mut Frame<'_>, area: Rect) {
    let mut title = vec![Span::styled(
        " Streaming ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    title.extend(tab_spans(
        HIGHLIGHT_GROUPS.iter().map(|group| group.platform.label()),
        app.highlight_index,
    ));
    let block = panel_block(app, HomePanel::Streaming, TextLine::from(title));

    if app.highlights.is_empty() {
        let message = if app.highlights_loading {
            "Loading..."
        } else {
            "No highlights available."
        };
        f.render_widget(Paragraph::new(message).block(block), area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    let count = u32::try_from(app.highlights.len()).unwrap_or(1);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
        .split(inner);

    for (card, column) in app.highlights.iter().zip(columns.iter()) {
        render_card(card, f, *column);
    }
}

fn render_card(card: &HighlightCard, f: &mut Frame<'_>, area: Rect) {
    let badge = match &card.badge {
        Badge::Flag(_) => card.code.to_uppercase(),
        Badge::Text(text) => text.clone(),
    };

    let mut lines = vec![
        TextLine::from(Span::styled(
            card.headline.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(
            card.headline.artist_line(),
            Style::default().fg(Color::Gray),
        )),
    ];
    lines.extend(card.others.iter().map(|record| {
        TextLine::from(vec![
            Span::styled(
                format!("{}. ", record.rank),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(record.title.clone()),
        ])
    }));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title(format!(" {badge} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Green)),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}
