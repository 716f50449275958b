use crate::dom;
use crate::fetch::BrowserSource;
use charts_core::query::query_param;
use charts_core::{ChartSession, Generation, Platform, Selection};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlSelectElement;

const CHART_SELECTS: [&str; 3] = ["countrySelect", "chartSelect", "topListSelect"];

/// A full-list page for one platform.
struct ListPage {
    platform: Platform,
    session: Rc<ChartSession<BrowserSource>>,
    generation: Generation,
    selection: Rc<RefCell<Selection>>,
}

impl ListPage {
    fn load(self: &Rc<Self>, requested: Option<&str>) {
        let chart = self.platform.config().resolve_chart(requested);
        dom::render_header(&self.platform.header(chart.code));

        let ticket = self.generation.begin();
        let page = Rc::clone(self);
        spawn_local(async move {
            let result = page
                .session
                .load_chart(page.platform, Some(chart.code), None)
                .await;
            if !page.generation.is_current(ticket) {
                tracing::debug!(chart = chart.code, "dropping stale chart");
                return;
            }
            match result {
                Ok(loaded) => dom::render_song_list(
                    &loaded.records,
                    page.platform.kind(),
                    page.session.default_cover(),
                    &page.selection,
                ),
                Err(error) => {
                    tracing::error!(%error, "chart load failed");
                    dom::render_message(&error.user_message());
                }
            }
        });
    }
}

fn chart_select() -> Option<HtmlSelectElement> {
    CHART_SELECTS
        .iter()
        .find_map(|id| dom::by_id(id))
        .and_then(|element| element.dyn_into::<HtmlSelectElement>().ok())
}

fn requested_chart() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    query_param(&search, "chart")
}

pub fn start(session: Rc<ChartSession<BrowserSource>>, platform: Platform) {
    let page = Rc::new(ListPage {
        platform,
        session,
        generation: Generation::default(),
        selection: Rc::default(),
    });

    let requested = requested_chart();
    let chart = platform.config().resolve_chart(requested.as_deref());

    if let Some(select) = chart_select() {
        select.set_value(chart.code);
        let page = Rc::clone(&page);
        let target = select.clone();
        dom::on(&select, "change", move |_| {
            page.load(Some(&target.value()));
        });
    }

    page.load(Some(chart.code));
}
