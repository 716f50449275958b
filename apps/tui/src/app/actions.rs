use crate::app::state::{Effect, LoadEvent, LoadRequest};
use crate::source::DataSource;
use charts_core::{ChartSession, JsonSource};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Runs load requests in the background and reports results to the event
/// loop.
#[derive(Clone)]
pub struct Loader {
    session: Arc<ChartSession<DataSource>>,
    events: UnboundedSender<LoadEvent>,
}

impl Loader {
    pub const fn new(
        session: Arc<ChartSession<DataSource>>,
        events: UnboundedSender<LoadEvent>,
    ) -> Self {
        Self { session, events }
    }

    /// Carries out queued effects. Returns a message for the status bar when
    /// one of them failed on the spot.
    pub fn perform(&self, effects: Vec<Effect>) -> Option<String> {
        let mut failure = None;
        for effect in effects {
            match effect {
                Effect::Load(request) => self.dispatch(request),
                Effect::Open(url) => {
                    if let Err(error) = webbrowser::open(&url) {
                        tracing::warn!(%error, url, "could not open browser");
                        failure = Some(format!("Could not open browser: {error}"));
                    }
                }
            }
        }
        failure
    }

    pub fn dispatch(&self, request: LoadRequest) {
        let session = Arc::clone(&self.session);
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = resolve(&*session, request).await;
            if events.send(event).is_err() {
                tracing::debug!("event loop gone; dropping load result");
            }
        });
    }
}

/// Runs one request to completion.
pub async fn resolve<S: JsonSource>(session: &ChartSession<S>, request: LoadRequest) -> LoadEvent {
    match request {
        LoadRequest::Chart {
            ticket,
            platform,
            code,
            limit,
        } => LoadEvent::Chart {
            ticket,
            result: session.load_chart(platform, Some(code), limit).await,
        },
        LoadRequest::Widget {
            slot,
            ticket,
            widget,
            category,
        } => LoadEvent::Widget {
            slot,
            ticket,
            result: session.load_widget(widget, category).await,
        },
        LoadRequest::Highlights { ticket, platform } => LoadEvent::Highlights {
            ticket,
            cards: session.load_highlights(platform).await,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::resolve;
    use crate::app::state::{App, AppOptions, Effect, LoadEvent, LoadRequest};
    use charts_core::{ChartSession, MemorySource, Platform};
    use serde_json::json;

    fn requests(app: &mut App) -> Vec<LoadRequest> {
        app.take_effects()
            .into_iter()
            .filter_map(|effect| match effect {
                Effect::Load(request) => Some(request),
                Effect::Open(_) => None,
            })
            .collect()
    }

    #[tokio::test]
    async fn widget_results_reach_the_home_screen() {
        let source = MemorySource::new()
            .with(
                "DATABASES/TOP_SONGS/top_15_weekly.json",
                json!([{"SongID": 1, "Position": 1, "Title": "Week One"}]),
            )
            .with(
                "DATABASES/TOP_ARTISTS/artists_top15_daily.json",
                json!([{"ArtistID": 9, "Position": 1, "Artist": "Nine", "Number of hits": 3}]),
            );
        let session = ChartSession::new(source);
        let mut app = App::new(AppOptions::default());
        app.start_home();

        for request in requests(&mut app) {
            let event = resolve(&session, request).await;
            app.apply(event);
        }

        assert_eq!(app.widgets[0].records[0].title, "Week One");
        assert_eq!(app.widgets[1].records[0].hits, Some(3));
        assert!(app.highlights.is_empty());
        assert!(!app.highlights_loading);
    }

    #[tokio::test]
    async fn missing_chart_shows_error_message() {
        let session = ChartSession::new(MemorySource::new());
        let mut app = App::new(AppOptions::default());
        app.open_chart(Platform::YouTube, Some("kr"));

        let request = requests(&mut app).remove(0);
        let event = resolve(&session, request).await;
        assert!(matches!(event, LoadEvent::Chart { result: Err(_), .. }));
        app.apply(event);

        assert_eq!(app.chart_error.as_deref(), Some("Error loading KR data."));
    }
}
