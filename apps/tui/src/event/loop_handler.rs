use charts_core::highlights::HighlightCard;
use charts_core::rotation::{TOP_ARTISTS_WIDGET, TOP_SONGS_WIDGET};
use charts_core::{Badge, ChartSession, JsonSource, MergedRecord, Platform, Widget};
use color_eyre::eyre::{eyre, Report};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::fmt::Write as _;
use std::io::Stdout;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::{handle_input, App, LoadEvent, Loader};
use crate::ui;

/// What a headless run prints.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRequest<'a> {
    pub platform: Option<Platform>,
    pub chart: Option<&'a str>,
    pub limit: Option<usize>,
    pub json: bool,
}

/// Run the application in headless mode (no UI)
pub async fn run_headless<S: JsonSource>(
    session: &ChartSession<S>,
    request: HeadlessRequest<'_>,
) -> Result<()> {
    let output = match request.platform {
        Some(platform) => {
            let chart = build_headless_chart(session, platform, request.chart, request.limit).await?;
            if request.json {
                serde_json::to_string_pretty(&chart)?
            } else {
                render_chart_text(&chart)
            }
        }
        None => {
            let home = build_headless_home(session).await;
            if request.json {
                serde_json::to_string_pretty(&home)?
            } else {
                render_home_text(&home)
            }
        }
    };

    println!("{output}");
    Ok(())
}

async fn build_headless_chart<S: JsonSource>(
    session: &ChartSession<S>,
    platform: Platform,
    chart: Option<&str>,
    limit: Option<usize>,
) -> Result<HeadlessChart> {
    let loaded = session
        .load_chart(platform, chart, limit)
        .await
        .map_err(|error| {
            let message = error.user_message();
            Report::new(error).wrap_err(message)
        })?;

    Ok(HeadlessChart {
        platform: platform.as_str(),
        chart: loaded.code,
        title: loaded.header.title,
        rows: loaded.records,
    })
}

async fn build_headless_home<S: JsonSource>(session: &ChartSession<S>) -> HeadlessHome {
    let (top_songs, top_artists, cards) = tokio::join!(
        headless_widget(session, &TOP_SONGS_WIDGET),
        headless_widget(session, &TOP_ARTISTS_WIDGET),
        session.load_highlights(Platform::Spotify),
    );

    HeadlessHome {
        top_songs,
        top_artists,
        streaming: cards.into_iter().map(HeadlessCard::from).collect(),
    }
}

async fn headless_widget<S: JsonSource>(
    session: &ChartSession<S>,
    widget: &'static Widget,
) -> HeadlessWidget {
    let Some(category) = widget.category_at(0) else {
        return HeadlessWidget::default();
    };

    match session.load_widget(widget, category).await {
        Ok(rows) => HeadlessWidget {
            name: widget.name,
            category: category.label,
            view_all: widget.view_all_link(category),
            rows,
            error: None,
        },
        Err(error) => HeadlessWidget {
            name: widget.name,
            category: category.label,
            view_all: widget.view_all_link(category),
            rows: Vec::new(),
            error: Some(error.user_message()),
        },
    }
}

fn render_chart_text(chart: &HeadlessChart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{}", chart.title);
    let _ = writeln!(out, "{}", "=".repeat(chart.title.chars().count()));
    for row in &chart.rows {
        push_row(&mut out, row);
    }
    if chart.rows.is_empty() {
        let _ = writeln!(out, "(no entries)");
    }
    out
}

fn render_home_text(home: &HeadlessHome) -> String {
    let mut out = String::new();
    for widget in [&home.top_songs, &home.top_artists] {
        let _ = writeln!(out, "\n{} ({})", widget.name, widget.category);
        let _ = writeln!(out, "View all: {}", widget.view_all);
        if let Some(error) = &widget.error {
            let _ = writeln!(out, "{error}");
        }
        for row in &widget.rows {
            push_row(&mut out, row);
        }
    }

    let _ = writeln!(out, "\nStreaming highlights (Spotify)");
    for card in &home.streaming {
        let _ = writeln!(out, "[{}] {}", card.code.to_uppercase(), card.badge);
        for row in &card.rows {
            let _ = writeln!(out, "  {:>3}. {}", row.rank, row.title);
        }
    }
    out
}

fn push_row(out: &mut String, row: &MergedRecord) {
    let artists = row.artist_line();
    let _ = match (artists.is_empty(), row.hits) {
        (true, Some(hits)) => writeln!(out, "{:>3}. {} | Hits: {hits}", row.rank, row.title),
        (true, None) => writeln!(out, "{:>3}. {}", row.rank, row.title),
        (false, _) => writeln!(out, "{:>3}. {} - {artists}", row.rank, row.title),
    };
}

#[derive(serde::Serialize)]
struct HeadlessChart {
    platform: &'static str,
    chart: &'static str,
    title: String,
    rows: Vec<MergedRecord>,
}

#[derive(serde::Serialize, Default)]
struct HeadlessHome {
    top_songs: HeadlessWidget,
    top_artists: HeadlessWidget,
    streaming: Vec<HeadlessCard>,
}

#[derive(serde::Serialize, Default)]
struct HeadlessWidget {
    name: &'static str,
    category: &'static str,
    view_all: String,
    rows: Vec<MergedRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(serde::Serialize)]
struct HeadlessCard {
    code: &'static str,
    badge: String,
    rows: Vec<MergedRecord>,
}

impl From<HighlightCard> for HeadlessCard {
    fn from(card: HighlightCard) -> Self {
        let badge = match card.badge {
            Badge::Flag(url) | Badge::Text(url) => url,
        };
        let mut rows = vec![card.headline];
        rows.extend(card.others);
        Self {
            code: card.code,
            badge,
            rows,
        }
    }
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    loader: &Loader,
    events: &mut UnboundedReceiver<LoadEvent>,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    loop {
        // Advance rotation timers
        app.update();

        while let Ok(event) = events.try_recv() {
            app.apply(event);
        }

        if let Some(message) = loader.perform(app.take_effects()) {
            app.status_message = message;
        }

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(std::time::Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                    if !app.running {
                        break;
                    }
                }
                Ok(Event::FocusGained) => app.focused = true,
                Ok(Event::FocusLost) => app.focused = false,
                Ok(Event::Resize(_, _)) => {
                    // Force a redraw after resize
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }
    }

    Ok(())
}
