use crate::app::App;
use crate::ui::widgets::shortcuts::shortcuts_line;
use crate::ui::widgets::status::render_status;
use crate::ui::widgets::tables::scroll_offset;
use charts_core::{ChartKind, MergedRecord, Platform};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Tabs};
use ratatui::Frame;

pub fn render_chart(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Platform tabs
            Constraint::Length(3), // Chart header
            Constraint::Min(5),    // Rows
            Constraint::Length(3), // Status
            Constraint::Length(1), // Shortcuts
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_platform_tabs(app, f, layout[0]);
    render_header(app, f, layout[1]);
    render_rows(app, f, layout[2]);
    render_status(&app.status_message, f, layout[3]);

    let shortcuts = shortcuts_line(&[
        ("←/→", "Platform"),
        ("Tab", "Chart"),
        ("↑/↓", "Move"),
        ("Enter", "Select"),
        ("o", "Open link"),
        ("Esc", "Home"),
        ("q", "Quit"),
    ]);
    f.render_widget(
        Paragraph::new(shortcuts).alignment(Alignment::Center),
        layout[4],
    );
}

fn render_platform_tabs(app: &App, f: &mut Frame<'_>, area: Rect) {
    let titles = Platform::ALL
        .iter()
        .enumerate()
        .map(|(i, platform)| TextLine::from(format!("{} {}", i + 1, platform.label())))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .select(app.platform.index())
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider(Span::raw("|"));

    f.render_widget(tabs, area);
}

fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let config = app.platform.config();
    let header = app.platform.header(app.chart_code);

    let mut spans = vec![Span::styled(
        header.title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw("   "));
    for option in config.charts {
        let style = if option.code == app.chart_code {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        spans.push(Span::styled(format!(" {} ", option.label), style));
        spans.push(Span::raw(" "));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", config.list_page));
    f.render_widget(Paragraph::new(TextLine::from(spans)).block(block), area);
}

fn render_rows(app: &App, f: &mut Frame<'_>, area: Rect) {
    let rows = app.rows();

    if rows.is_empty() {
        let message = if app.chart_loading {
            "Loading..."
        } else if let Some(error) = &app.chart_error {
            error.as_str()
        } else {
            "No entries."
        };
        let block = Block::default()
            .title("Chart")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow));
        let paragraph = Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let kind = app.platform.kind();
    let header = Row::new(match kind {
        ChartKind::Songs => vec![
            Cell::from("#"),
            Cell::from("Title"),
            Cell::from("Artists"),
            Cell::from("Link"),
        ],
        ChartKind::Artists => vec![
            Cell::from("#"),
            Cell::from("Artist"),
            Cell::from("Hits"),
            Cell::from("Link"),
        ],
    })
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let total_rows = rows.len();
    let max_visible_rows = area.height.saturating_sub(3) as usize;
    let offset = scroll_offset(total_rows, max_visible_rows, app.cursor);

    let visible = rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(max_visible_rows)
        .map(|(i, record)| {
            let style = if app.selection.is_selected(i) {
                Style::default()
                    .bg(Color::Rgb(0, 0, 238))
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else if i == app.cursor {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            record_row(record, kind).style(style)
        });

    let widths = [
        Constraint::Length(4),
        Constraint::Percentage(45),
        Constraint::Percentage(40),
        Constraint::Length(4),
    ];

    let table = Table::new(visible, widths)
        .header(header)
        .block(
            Block::default()
                .title(format!("Rows ({} of {})", app.cursor + 1, total_rows))
                .borders(Borders::ALL),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

fn record_row(record: &MergedRecord, kind: ChartKind) -> Row<'static> {
    let link = if record.link.is_some() { "↗" } else { "" };
    let middle = match kind {
        ChartKind::Songs => record.artist_line(),
        ChartKind::Artists => record
            .hits
            .map_or_else(|| "?".to_string(), |hits| hits.to_string()),
    };

    Row::new(vec![
        Cell::from(record.rank.to_string()),
        Cell::from(record.title.clone()),
        Cell::from(middle),
        Cell::from(link),
    ])
}
