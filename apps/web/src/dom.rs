//! Thin helpers over the page's element contract. Every lookup tolerates a
//! missing element: the call becomes a no-op.

use charts_core::{ArtistCredit, ChartKind, CoverClick, Header, MergedRecord, Selection};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, HtmlImageElement};

pub const SONG_LIST: &str = "songList";

pub fn document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

pub fn by_id(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

pub fn query_all(selector: &str) -> Vec<Element> {
    let Some(list) = document().and_then(|doc| doc.query_selector_all(selector).ok()) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Attaches `handler` for the target's whole lifetime.
pub fn on(target: &EventTarget, event: &str, handler: impl FnMut(Event) + 'static) {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
    closure.forget();
}

pub fn open_link(url: &str) {
    if let Some(window) = web_sys::window() {
        if window.open_with_url_and_target(url, "_blank").is_err() {
            tracing::warn!(url, "could not open link");
        }
    }
}

pub fn set_text(id: &str, text: &str) {
    if let Some(element) = by_id(id) {
        element.set_text_content(Some(text));
    }
}

pub fn set_href(id: &str, href: &str) {
    if let Some(element) = by_id(id) {
        let _ = element.set_attribute("href", href);
    }
}

fn element(doc: &Document, tag: &str, class: Option<&str>, text: Option<&str>) -> Option<Element> {
    let node = doc.create_element(tag).ok()?;
    if let Some(class) = class {
        node.set_class_name(class);
    }
    if text.is_some() {
        node.set_text_content(text);
    }
    Some(node)
}

/// Cover image that swaps to `fallback` once if the source fails to load.
pub fn cover_image(doc: &Document, src: &str, alt: &str, fallback: &str) -> Option<HtmlImageElement> {
    let img = doc.create_element("img").ok()?.dyn_into::<HtmlImageElement>().ok()?;
    img.set_src(src);
    img.set_alt(alt);

    let target = img.clone();
    let fallback = fallback.to_string();
    let mut swapped = false;
    on(&img, "error", move |_| {
        if !swapped {
            swapped = true;
            target.set_src(&fallback);
        }
    });
    Some(img)
}

/// Writes the chart title, platform logo and country flag.
pub fn render_header(header: &Header) {
    if by_id("countryName").is_some() {
        set_text("countryName", &header.title);
    } else {
        set_text("listName", &header.title);
    }

    if let Some(logo) = by_id("platformLogo") {
        let _ = logo.set_attribute("src", header.logo);
        let _ = logo.set_attribute("alt", header.logo_alt);
    }

    if let Some(icon) = by_id("countryIcon").and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
        match &header.flag {
            Some(flag) => {
                let _ = icon.set_attribute("src", flag);
                let _ = icon.style().set_property("display", "inline");
            }
            None => {
                let _ = icon.style().set_property("display", "none");
            }
        }
    }
}

/// Replaces the list with a single message row.
pub fn render_message(message: &str) {
    let Some(list) = by_id(SONG_LIST) else {
        return;
    };
    list.set_inner_html("");
    if let Some(doc) = document() {
        if let Some(row) = element(&doc, "li", None, Some(message)) {
            let _ = list.append_child(&row);
        }
    }
}

/// Artist names, linked where a URL is known, separated by commas.
pub fn append_artists(doc: &Document, container: &Element, artists: &[ArtistCredit]) {
    for (i, artist) in artists.iter().enumerate() {
        let node = match &artist.url {
            Some(url) => element(doc, "a", None, Some(&artist.name)).inspect(|link| {
                let _ = link.set_attribute("href", url);
                let _ = link.set_attribute("target", "_blank");
                let _ = link.set_attribute("rel", "noopener noreferrer");
            }),
            None => element(doc, "span", None, Some(&artist.name)),
        };
        if let Some(node) = node {
            let _ = container.append_child(&node);
        }
        if i + 1 < artists.len() {
            let _ = container.append_with_str_1(", ");
        }
    }
}

/// Pairs each built row with its selected state. `rows[i]` belongs to
/// record `i`; `None` marks a row that could not be built.
fn marked_rows<'a, T>(
    rows: &'a [Option<T>],
    selection: &'a Selection,
) -> impl Iterator<Item = (&'a T, bool)> + 'a {
    rows.iter()
        .enumerate()
        .filter_map(move |(i, row)| row.as_ref().map(|row| (row, selection.is_selected(i))))
}

fn sync_selected(rows: &[Option<Element>], selection: &Selection) {
    for (row, selected) in marked_rows(rows, selection) {
        let _ = row.class_list().toggle_with_force("selected", selected);
    }
}

/// Renders `records` into `#songList` and wires row selection and the
/// select-then-open cover click.
pub fn render_song_list(
    records: &[MergedRecord],
    kind: ChartKind,
    fallback_cover: &str,
    selection: &Rc<RefCell<Selection>>,
) {
    let (Some(doc), Some(list)) = (document(), by_id(SONG_LIST)) else {
        return;
    };
    list.set_inner_html("");
    selection.borrow_mut().reset(records.len());

    let rows: Rc<RefCell<Vec<Option<Element>>>> = Rc::default();
    for (index, record) in records.iter().enumerate() {
        let Some(row) = song_row(&doc, record, kind, fallback_cover) else {
            tracing::warn!(index, "could not build list row");
            rows.borrow_mut().push(None);
            continue;
        };

        {
            let selection = Rc::clone(selection);
            let rows = Rc::clone(&rows);
            on(&row, "click", move |_| {
                let mut selection = selection.borrow_mut();
                if selection.click_row(index) {
                    sync_selected(&rows.borrow(), &selection);
                }
            });
        }

        if let Some(cover) = row.query_selector("img").ok().flatten() {
            if record.link.is_some() {
                if let Some(cover) = cover.dyn_ref::<HtmlElement>() {
                    let _ = cover.style().set_property("cursor", "pointer");
                }
            }
            let selection = Rc::clone(selection);
            let rows = Rc::clone(&rows);
            let link = record.link.clone();
            on(&cover, "click", move |event| {
                event.stop_propagation();
                let mut selection = selection.borrow_mut();
                match selection.click_cover(index, link.as_deref()) {
                    CoverClick::Selected(_) => sync_selected(&rows.borrow(), &selection),
                    CoverClick::Open(url) => open_link(url),
                    CoverClick::Ignored => {}
                }
            });
        }

        let _ = list.append_child(&row);
        rows.borrow_mut().push(Some(row));
    }
}

fn song_row(doc: &Document, record: &MergedRecord, kind: ChartKind, fallback: &str) -> Option<Element> {
    let row = element(doc, "li", None, None)?;
    let rank = element(doc, "div", Some("song-rank"), Some(&format!("{}.", record.rank)))?;
    let cover = cover_image(doc, &record.cover, &format!("{} Cover", record.title), fallback)?;
    let info = element(doc, "div", Some("song-info-list"), None)?;
    let title = element(doc, "span", Some("song-title"), Some(&record.title))?;
    let detail = element(doc, "div", Some("song-artist"), None)?;

    match kind {
        ChartKind::Songs => append_artists(doc, &detail, &record.artists),
        ChartKind::Artists => detail.set_text_content(Some(&hits_label(record.hits))),
    }

    info.append_with_node_2(&title, &detail).ok()?;
    row.append_with_node_3(&rank, &cover, &info).ok()?;
    Some(row)
}

pub fn hits_label(hits: Option<u64>) -> String {
    hits.map_or_else(|| "Hits: ?".to_string(), |hits| format!("Hits: {hits}"))
}

/// One home-page card: cover, rank, title and either artists or hits.
pub fn home_card(doc: &Document, record: &MergedRecord, kind: ChartKind, fallback: &str) -> Option<Element> {
    let class = match kind {
        ChartKind::Songs => "chart-card",
        ChartKind::Artists => "chart-card artist-card",
    };
    let card = element(doc, "div", Some(class), None)?;
    let cover = cover_image(doc, &record.cover, &record.title, fallback)?;
    cover.set_class_name("chart-img");
    if let Some(link) = record.link.clone() {
        let _ = cover.style().set_property("cursor", "pointer");
        on(&cover, "click", move |_| open_link(&link));
    }
    let rank = element(doc, "div", Some("chart-rank"), Some(&record.rank.to_string()))?;
    let title = element(doc, "div", Some("chart-title"), Some(&record.title))?;
    let detail = element(doc, "div", Some("chart-artist"), None)?;
    match kind {
        ChartKind::Songs => append_artists(doc, &detail, &record.artists),
        ChartKind::Artists => detail.set_text_content(Some(&hits_label(record.hits))),
    }

    card.append_with_node_4(&cover, &rank, &title, &detail).ok()?;
    Some(card)
}

pub fn create(doc: &Document, tag: &str, class: &str, text: Option<&str>) -> Option<Element> {
    element(doc, tag, Some(class), text)
}

#[cfg(test)]
mod tests {
    use super::{hits_label, marked_rows};
    use charts_core::Selection;

    #[test]
    fn hits_label_marks_missing_counts() {
        assert_eq!(hits_label(Some(42)), "Hits: 42");
        assert_eq!(hits_label(None), "Hits: ?");
    }

    #[test]
    fn missing_row_keeps_later_rows_on_their_record() {
        let rows = [Some("first"), None, Some("third")];
        let mut selection = Selection::new(rows.len());
        assert!(selection.click_row(2));

        let marked: Vec<_> = marked_rows(&rows, &selection).collect();

        assert_eq!(marked, [(&"first", false), (&"third", true)]);
    }
}
