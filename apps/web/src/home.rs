use crate::dom;
use crate::fetch::BrowserSource;
use charts_core::highlights::HIGHLIGHT_GROUPS;
use charts_core::rotation::{TOP_ARTISTS_WIDGET, TOP_SONGS_WIDGET};
use charts_core::{Badge, ChartSession, Generation, HighlightCard, Platform, Rotation, Widget};
use gloo_timers::callback::Interval;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element};

/// Where one rotating widget lives in the page.
struct Slots {
    tabs: &'static str,
    container: &'static str,
    view_all: &'static str,
}

const SONG_SLOTS: Slots = Slots {
    tabs: ".chart-tab",
    container: "chartCardsContainer",
    view_all: "viewAllButton",
};

const ARTIST_SLOTS: Slots = Slots {
    tabs: ".chart-tab-artist",
    container: "chartCardsContainerArtists",
    view_all: "viewAllButtonArtists",
};

/// Holds a running timer handle. Dropping the handle clears the timer.
struct TimerSlot<T>(RefCell<Option<T>>);

impl<T> Default for TimerSlot<T> {
    fn default() -> Self {
        Self(RefCell::new(None))
    }
}

impl<T> TimerSlot<T> {
    fn is_running(&self) -> bool {
        self.0.borrow().is_some()
    }

    fn set(&self, handle: T) {
        *self.0.borrow_mut() = Some(handle);
    }

    fn cancel(&self) -> bool {
        let handle = self.0.borrow_mut().take();
        handle.is_some()
    }
}

struct WidgetPanel {
    widget: &'static Widget,
    slots: Slots,
    rotation: RefCell<Rotation>,
    generation: Generation,
    session: Rc<ChartSession<BrowserSource>>,
    timer: TimerSlot<Interval>,
}

impl WidgetPanel {
    fn show(self: &Rc<Self>, index: usize) {
        let Some(category) = self.widget.category_at(index) else {
            return;
        };

        for tab in dom::query_all(self.slots.tabs) {
            let active = tab.get_attribute("data-chart").as_deref() == Some(category.key);
            let _ = tab.class_list().toggle_with_force("active", active);
        }
        dom::set_href(self.slots.view_all, &self.widget.view_all_link(category));

        let ticket = self.generation.begin();
        let panel = Rc::clone(self);
        spawn_local(async move {
            let result = panel.session.load_widget(panel.widget, category).await;
            if !panel.generation.is_current(ticket) {
                return;
            }
            let (Some(doc), Some(container)) = (dom::document(), dom::by_id(panel.slots.container))
            else {
                return;
            };
            container.set_inner_html("");
            match result {
                Ok(records) => {
                    for record in &records {
                        let card = dom::home_card(
                            &doc,
                            record,
                            panel.widget.kind,
                            panel.session.default_cover(),
                        );
                        if let Some(card) = card {
                            let _ = container.append_child(&card);
                        }
                    }
                }
                Err(error) => {
                    tracing::error!(%error, widget = panel.widget.name, "widget load failed");
                    container.set_text_content(Some(&error.user_message()));
                }
            }
        });
    }

    fn wire_tabs(self: &Rc<Self>) {
        for tab in dom::query_all(self.slots.tabs) {
            let panel = Rc::clone(self);
            let target = tab.clone();
            dom::on(&tab, "click", move |_| {
                let Some(index) = target
                    .get_attribute("data-chart")
                    .and_then(|key| panel.widget.position(&key))
                else {
                    return;
                };
                let transition = panel.rotation.borrow_mut().select(index);
                if let Some(transition) = transition {
                    panel.show(transition.index);
                }
            });
        }
    }

    fn start_timer(self: &Rc<Self>) {
        if self.timer.is_running() {
            return;
        }
        let interval = self.rotation.borrow().interval();
        let millis = u32::try_from(interval.as_millis()).unwrap_or(u32::MAX);
        let panel = Rc::clone(self);
        self.timer.set(Interval::new(millis, move || {
            let visible = dom::document().is_some_and(|doc| !doc.hidden());
            let transition = panel.rotation.borrow_mut().tick(interval, visible);
            if let Some(transition) = transition {
                panel.show(transition.index);
            }
        }));
    }

    fn stop_timer(&self) {
        if self.timer.cancel() {
            tracing::debug!(widget = self.widget.name, "rotation timer cleared");
        }
    }

    /// Clears the timer when the page is hidden for navigation and restarts
    /// it if the page comes back from the back/forward cache.
    fn wire_lifecycle(self: &Rc<Self>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let panel = Rc::clone(self);
        dom::on(&window, "pagehide", move |_| panel.stop_timer());
        let panel = Rc::clone(self);
        dom::on(&window, "pageshow", move |_| panel.start_timer());
    }
}

fn start_widget(
    session: &Rc<ChartSession<BrowserSource>>,
    widget: &'static Widget,
    slots: Slots,
    interval: Duration,
) {
    if dom::by_id(slots.container).is_none() {
        return;
    }
    let panel = Rc::new(WidgetPanel {
        widget,
        slots,
        rotation: RefCell::new(widget.rotation(interval)),
        generation: Generation::default(),
        session: Rc::clone(session),
        timer: TimerSlot::default(),
    });
    panel.wire_tabs();
    panel.start_timer();
    panel.wire_lifecycle();
    let initial = panel.rotation.borrow().initial();
    panel.show(initial.index);
}

/// Streaming highlights: one card per chart of the chosen platform.
struct Highlights {
    session: Rc<ChartSession<BrowserSource>>,
    generation: Generation,
}

const STREAM_CONTAINER: &str = "chartCardsContainerStreaming";

impl Highlights {
    fn show(self: &Rc<Self>, platform: Platform) {
        if let Some(body) = dom::document().and_then(|doc| doc.body()) {
            for group in &HIGHLIGHT_GROUPS {
                if let Some(class) = group.theme_class {
                    let _ = body
                        .class_list()
                        .toggle_with_force(class, group.platform == platform);
                }
            }
        }
        dom::set_href("viewAllButtonStreaming", platform.config().list_page);

        let ticket = self.generation.begin();
        let highlights = Rc::clone(self);
        spawn_local(async move {
            let cards = highlights.session.load_highlights(platform).await;
            if !highlights.generation.is_current(ticket) {
                return;
            }
            let (Some(doc), Some(container)) = (dom::document(), dom::by_id(STREAM_CONTAINER))
            else {
                return;
            };
            container.set_inner_html("");
            for card in &cards {
                if let Some(node) = stream_card(&doc, card, highlights.session.default_cover()) {
                    let _ = container.append_child(&node);
                }
            }
        });
    }
}

fn stream_card(doc: &Document, card: &HighlightCard, fallback: &str) -> Option<Element> {
    let node = dom::create(doc, "div", "chart-card stream-card", None)?;
    let top = &card.headline;

    let cover = dom::cover_image(doc, &top.cover, &top.title, fallback)?;
    cover.set_class_name("chart-img");
    if let Some(link) = top.link.clone() {
        let _ = cover.style().set_property("cursor", "pointer");
        dom::on(&cover, "click", move |_| dom::open_link(&link));
    }

    let rank = dom::create(doc, "div", "chart-rank", None)?;
    match &card.badge {
        Badge::Flag(url) => {
            let flag = dom::create(doc, "img", "chart-flag", None)?;
            let _ = flag.set_attribute("src", url);
            let _ = flag.set_attribute("alt", card.code);
            let _ = rank.append_child(&flag);
        }
        Badge::Text(text) => rank.set_text_content(Some(text)),
    }

    let title = dom::create(doc, "div", "chart-title", Some(&top.title))?;
    let artist = dom::create(doc, "div", "chart-artist", None)?;
    dom::append_artists(doc, &artist, &top.artists);

    let others = dom::create(doc, "div", "chart-others", None)?;
    for record in &card.others {
        let button = dom::create(doc, "button", "stream-button-green", None)?;
        let position = dom::create(doc, "strong", "", Some(&format!("{}.", record.rank)))?;
        let label = dom::create(doc, "span", "", Some(&record.title))?;
        let _ = button.append_with_node_1(&position);
        let _ = button.append_with_str_1(" ");
        let _ = button.append_with_node_1(&label);
        if let Some(link) = record.link.clone() {
            dom::on(&button, "click", move |_| dom::open_link(&link));
        }
        let _ = others.append_child(&button);
    }

    node.append_with_node_5(&cover, &rank, &title, &artist, &others).ok()?;
    Some(node)
}

fn start_highlights(session: &Rc<ChartSession<BrowserSource>>) {
    if dom::by_id(STREAM_CONTAINER).is_none() {
        return;
    }
    let highlights = Rc::new(Highlights {
        session: Rc::clone(session),
        generation: Generation::default(),
    });

    let buttons = Rc::new(dom::query_all(".chart-tab-stream"));
    for button in buttons.iter() {
        let highlights = Rc::clone(&highlights);
        let all = Rc::clone(&buttons);
        let target = button.clone();
        dom::on(button, "click", move |_| {
            let Some(platform) = target
                .get_attribute("data-platform")
                .and_then(|name| Platform::parse(&name))
            else {
                return;
            };
            for other in all.iter() {
                let _ = other.class_list().remove_1("active");
            }
            let _ = target.class_list().add_1("active");
            highlights.show(platform);
        });
    }

    highlights.show(Platform::Spotify);
}

pub fn start(session: &Rc<ChartSession<BrowserSource>>, interval: Duration) {
    start_widget(session, &TOP_SONGS_WIDGET, SONG_SLOTS, interval);
    start_widget(session, &TOP_ARTISTS_WIDGET, ARTIST_SLOTS, interval);
    start_highlights(session);
}

#[cfg(test)]
mod tests {
    use super::TimerSlot;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Handle(Rc<Cell<bool>>);

    impl Drop for Handle {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    #[test]
    fn cancelling_drops_the_timer_handle() {
        let cleared = Rc::new(Cell::new(false));
        let slot = TimerSlot::default();
        slot.set(Handle(Rc::clone(&cleared)));

        assert!(slot.is_running());
        assert!(slot.cancel());
        assert!(cleared.get());
        assert!(!slot.is_running());
        assert!(!slot.cancel());
    }
}
