use charts_core::highlights::HIGHLIGHT_GROUPS;
use charts_core::rotation::{DEFAULT_INTERVAL, TOP_ARTISTS_WIDGET, TOP_SONGS_WIDGET};
use charts_core::{
    Category, CoverClick, Generation, HighlightCard, LoadError, LoadTicket, LoadedChart,
    MergedRecord, Platform, Rotation, Selection, Widget,
};
use std::time::{Duration, Instant};

use crate::app::input::helpers::{wrap_decrement, wrap_increment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppScreen {
    Home,
    Chart,
}

/// Panels of the home screen, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomePanel {
    TopSongs,
    TopArtists,
    Streaming,
}

impl HomePanel {
    pub const ALL: [Self; 3] = [Self::TopSongs, Self::TopArtists, Self::Streaming];

    /// Widget slot for the rotating panels.
    pub const fn widget_slot(self) -> Option<usize> {
        match self {
            Self::TopSongs => Some(0),
            Self::TopArtists => Some(1),
            Self::Streaming => None,
        }
    }
}

/// Work the event loop performs on behalf of the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadRequest {
    Chart {
        ticket: LoadTicket,
        platform: Platform,
        code: &'static str,
        limit: Option<usize>,
    },
    Widget {
        slot: usize,
        ticket: LoadTicket,
        widget: &'static Widget,
        category: &'static Category,
    },
    Highlights {
        ticket: LoadTicket,
        platform: Platform,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Load(LoadRequest),
    /// Open a streaming link in the browser.
    Open(String),
}

/// Result of a finished load, tagged with the ticket it was issued under.
#[derive(Debug)]
pub enum LoadEvent {
    Chart {
        ticket: LoadTicket,
        result: Result<LoadedChart, LoadError>,
    },
    Widget {
        slot: usize,
        ticket: LoadTicket,
        result: Result<Vec<MergedRecord>, LoadError>,
    },
    Highlights {
        ticket: LoadTicket,
        cards: Vec<HighlightCard>,
    },
}

/// A rotating home widget and what it currently shows.
#[derive(Debug)]
pub struct WidgetView {
    pub widget: &'static Widget,
    pub rotation: Rotation,
    pub records: Vec<MergedRecord>,
    pub error: Option<String>,
    pub loading: bool,
    generation: Generation,
}

impl WidgetView {
    fn new(widget: &'static Widget, interval: Duration, rotate: bool) -> Self {
        let mut rotation = widget.rotation(interval);
        if !rotate {
            rotation.pause();
        }
        Self {
            widget,
            rotation,
            records: Vec::new(),
            error: None,
            loading: false,
            generation: Generation::default(),
        }
    }

    pub fn category(&self) -> Option<&'static Category> {
        self.widget.category_at(self.rotation.current())
    }

    pub fn view_all_link(&self) -> Option<String> {
        self.category()
            .map(|category| self.widget.view_all_link(category))
    }
}

/// Startup options taken from the CLI and configuration.
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    pub rotate_interval: Duration,
    pub rotate: bool,
    pub limit: Option<usize>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            rotate_interval: DEFAULT_INTERVAL,
            rotate: true,
            limit: None,
        }
    }
}

#[derive(Debug)]
pub struct App {
    pub running: bool,
    pub screen: AppScreen,
    pub show_help: bool,
    pub status_message: String,
    /// Whether the terminal has focus; rotation waits while it does not.
    pub focused: bool,
    pub last_frame: Instant,

    // Chart screen
    pub platform: Platform,
    pub chart_code: &'static str,
    pub chart: Option<LoadedChart>,
    pub chart_error: Option<String>,
    pub chart_loading: bool,
    pub cursor: usize,
    pub selection: Selection,
    pub limit: Option<usize>,
    chart_generation: Generation,

    // Home screen
    pub home_focus: HomePanel,
    pub widgets: Vec<WidgetView>,
    pub highlight_index: usize,
    pub highlights: Vec<HighlightCard>,
    pub highlights_loading: bool,
    highlights_generation: Generation,

    effects: Vec<Effect>,
}

impl App {
    pub fn new(options: AppOptions) -> Self {
        let widgets = [&TOP_SONGS_WIDGET, &TOP_ARTISTS_WIDGET]
            .into_iter()
            .map(|widget| WidgetView::new(widget, options.rotate_interval, options.rotate))
            .collect();

        Self {
            running: true,
            screen: AppScreen::Home,
            show_help: false,
            status_message: String::new(),
            focused: true,
            last_frame: Instant::now(),
            platform: Platform::Spotify,
            chart_code: Platform::Spotify.config().default_chart,
            chart: None,
            chart_error: None,
            chart_loading: false,
            cursor: 0,
            selection: Selection::default(),
            limit: options.limit,
            chart_generation: Generation::default(),
            home_focus: HomePanel::TopSongs,
            widgets,
            highlight_index: 0,
            highlights: Vec::new(),
            highlights_loading: false,
            highlights_generation: Generation::default(),
            effects: Vec::new(),
        }
    }

    /// Queues the initial load of every home panel.
    pub fn start_home(&mut self) {
        self.screen = AppScreen::Home;
        for slot in 0..self.widgets.len() {
            let index = self.widgets[slot].rotation.initial().index;
            self.load_widget(slot, index);
        }
        self.load_highlights();
    }

    pub fn go_home(&mut self) {
        self.screen = AppScreen::Home;
        self.status_message.clear();
    }

    /// Drains the work queued since the last call.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // ----- chart screen -----

    /// Switches to a platform list. Unknown chart codes open the default.
    pub fn open_chart(&mut self, platform: Platform, code: Option<&str>) {
        let chart = platform.config().resolve_chart(code);
        let ticket = self.chart_generation.begin();

        self.screen = AppScreen::Chart;
        self.platform = platform;
        self.chart_code = chart.code;
        self.chart_loading = true;
        self.chart_error = None;
        self.cursor = 0;
        self.selection.reset(0);
        self.status_message = format!("Loading {}...", platform.header(chart.code).title);

        self.effects.push(Effect::Load(LoadRequest::Chart {
            ticket,
            platform,
            code: chart.code,
            limit: self.limit,
        }));
    }

    pub fn next_platform(&mut self) {
        let next = wrap_increment(self.platform.index(), Platform::ALL.len());
        self.open_chart(Platform::ALL[next], None);
    }

    pub fn previous_platform(&mut self) {
        let previous = wrap_decrement(self.platform.index(), Platform::ALL.len());
        self.open_chart(Platform::ALL[previous], None);
    }

    pub fn cycle_chart(&mut self, forward: bool) {
        let config = self.platform.config();
        let next = wrap(config.chart_position(self.chart_code), config.charts.len(), forward);
        self.open_chart(self.platform, Some(config.charts[next].code));
    }

    pub fn rows(&self) -> &[MergedRecord] {
        self.chart
            .as_ref()
            .map(|chart| chart.records.as_slice())
            .unwrap_or_default()
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            return;
        }
        let last = len - 1;
        self.cursor = if delta.is_negative() {
            self.cursor.saturating_sub(delta.unsigned_abs())
        } else {
            self.cursor.saturating_add(delta.unsigned_abs()).min(last)
        };
    }

    pub fn cursor_to_end(&mut self, end: bool) {
        self.cursor = if end {
            self.rows().len().saturating_sub(1)
        } else {
            0
        };
    }

    /// Row click: select the row under the cursor.
    pub fn select_cursor_row(&mut self) {
        if self.selection.click_row(self.cursor) {
            self.status_message = self.row_summary(self.cursor);
        }
    }

    /// Cover click on the row under the cursor.
    pub fn click_cursor_cover(&mut self) {
        let row = self.cursor;
        let link = self.rows().get(row).and_then(|record| record.link.clone());

        match self.selection.click_cover(row, link.as_deref()) {
            CoverClick::Selected(row) => {
                self.status_message = format!("{} (press o again to open)", self.row_summary(row));
            }
            CoverClick::Open(url) => {
                self.status_message = format!("Opening {url}");
                self.effects.push(Effect::Open(url.to_string()));
            }
            CoverClick::Ignored => {
                if !self.rows().is_empty() {
                    self.status_message = "No streaming link for this entry".to_string();
                }
            }
        }
    }

    fn row_summary(&self, row: usize) -> String {
        self.rows().get(row).map_or_else(String::new, |record| {
            format!("#{} {} - {}", record.rank, record.title, record.artist_line())
        })
    }

    // ----- home screen -----

    pub fn focus_panel(&mut self, forward: bool) {
        let current = HomePanel::ALL
            .iter()
            .position(|panel| *panel == self.home_focus)
            .unwrap_or_default();
        let next = wrap(current, HomePanel::ALL.len(), forward);
        self.home_focus = HomePanel::ALL[next];
    }

    /// Left/Right on the focused panel: pick another tab.
    pub fn cycle_tab(&mut self, forward: bool) {
        match self.home_focus.widget_slot() {
            Some(slot) => {
                let view = &mut self.widgets[slot];
                let next = wrap(view.rotation.current(), view.widget.categories.len(), forward);
                if let Some(transition) = view.rotation.select(next) {
                    self.load_widget(slot, transition.index);
                }
            }
            None => {
                self.highlight_index = wrap(self.highlight_index, HIGHLIGHT_GROUPS.len(), forward);
                self.load_highlights();
            }
        }
    }

    pub fn toggle_rotation(&mut self) {
        let Some(slot) = self.home_focus.widget_slot() else {
            return;
        };
        let view = &mut self.widgets[slot];
        view.rotation.toggle();
        self.status_message = format!(
            "{} rotation {}",
            view.widget.name,
            if view.rotation.is_rotating() {
                "resumed"
            } else {
                "paused"
            }
        );
    }

    /// Opens the full list behind the focused panel.
    pub fn view_all(&mut self) {
        match self.home_focus {
            HomePanel::TopSongs | HomePanel::TopArtists => {
                let Some(slot) = self.home_focus.widget_slot() else {
                    return;
                };
                let view = &self.widgets[slot];
                let platform = match view.widget.kind {
                    charts_core::ChartKind::Songs => Platform::TopSongs,
                    charts_core::ChartKind::Artists => Platform::TopArtists,
                };
                let chart = view.category().map(|category| category.chart);
                self.open_chart(platform, chart);
            }
            HomePanel::Streaming => {
                let platform = HIGHLIGHT_GROUPS[self.highlight_index].platform;
                self.open_chart(platform, None);
            }
        }
    }

    pub fn highlight_platform(&self) -> Platform {
        HIGHLIGHT_GROUPS[self.highlight_index].platform
    }

    fn load_widget(&mut self, slot: usize, index: usize) {
        let view = &mut self.widgets[slot];
        let Some(category) = view.widget.category_at(index) else {
            return;
        };
        let ticket = view.generation.begin();
        view.loading = true;
        view.error = None;
        self.effects.push(Effect::Load(LoadRequest::Widget {
            slot,
            ticket,
            widget: view.widget,
            category,
        }));
    }

    fn load_highlights(&mut self) {
        let ticket = self.highlights_generation.begin();
        self.highlights_loading = true;
        self.effects.push(Effect::Load(LoadRequest::Highlights {
            ticket,
            platform: self.highlight_platform(),
        }));
    }

    // ----- time and results -----

    /// Advances rotation by the wall time since the previous frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.tick(delta);
    }

    pub fn tick(&mut self, delta: Duration) {
        let visible = self.screen == AppScreen::Home && self.focused;
        for slot in 0..self.widgets.len() {
            if let Some(transition) = self.widgets[slot].rotation.tick(delta, visible) {
                self.load_widget(slot, transition.index);
            }
        }
    }

    /// Applies a finished load unless a newer request superseded it.
    pub fn apply(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::Chart { ticket, result } => {
                if !self.chart_generation.is_current(ticket) {
                    tracing::debug!("dropping stale chart result");
                    return;
                }
                self.chart_loading = false;
                match result {
                    Ok(chart) => {
                        self.status_message = format!("{} rows", chart.records.len());
                        self.selection.reset(chart.records.len());
                        self.cursor = 0;
                        self.chart = Some(chart);
                    }
                    Err(error) => {
                        tracing::error!(%error, "chart load failed");
                        self.status_message = error.user_message();
                        self.chart_error = Some(error.user_message());
                        self.selection.reset(0);
                        self.chart = None;
                    }
                }
            }
            LoadEvent::Widget {
                slot,
                ticket,
                result,
            } => {
                let Some(view) = self.widgets.get_mut(slot) else {
                    return;
                };
                if !view.generation.is_current(ticket) {
                    tracing::debug!(widget = view.widget.name, "dropping stale widget result");
                    return;
                }
                view.loading = false;
                match result {
                    Ok(records) => {
                        view.records = records;
                        view.error = None;
                    }
                    Err(error) => {
                        view.records.clear();
                        view.error = Some(error.user_message());
                    }
                }
            }
            LoadEvent::Highlights { ticket, cards } => {
                if !self.highlights_generation.is_current(ticket) {
                    return;
                }
                self.highlights_loading = false;
                self.highlights = cards;
            }
        }
    }
}

const fn wrap(index: usize, len: usize, forward: bool) -> usize {
    if forward {
        wrap_increment(index, len)
    } else {
        wrap_decrement(index, len)
    }
}
