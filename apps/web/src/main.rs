mod dom;
mod fetch;
mod home;
mod list;
mod logging;

use charts_core::rotation::DEFAULT_INTERVAL;
use charts_core::{ChartSession, Platform};
use fetch::BrowserSource;
use std::rc::Rc;

/// Which script a page wants, read from `<body data-page="…">`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    List(Platform),
}

impl Page {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "home" | "index" => Some(Self::Home),
            other => Platform::parse(other).map(Self::List),
        }
    }

    fn detect() -> Option<Self> {
        let body = dom::document()?.body()?;
        if let Some(page) = body.get_attribute("data-page") {
            return Self::parse(&page);
        }
        dom::by_id("chartCardsContainer").map(|_| Self::Home)
    }
}

fn main() {
    logging::init();

    let Some(page) = Page::detect() else {
        tracing::warn!("page has no charts to render");
        return;
    };
    tracing::info!(?page, "rendering charts");

    let session = Rc::new(ChartSession::new(BrowserSource));
    match page {
        Page::Home => home::start(&session, DEFAULT_INTERVAL),
        Page::List(platform) => list::start(session, platform),
    }
}

#[cfg(test)]
mod tests {
    use super::Page;
    use charts_core::Platform;

    #[test]
    fn parses_page_names() {
        assert_eq!(Page::parse("home"), Some(Page::Home));
        assert_eq!(Page::parse("youtubeInsights"), Some(Page::List(Platform::YouTube)));
        assert_eq!(Page::parse(" Billboard "), Some(Page::List(Platform::Billboard)));
        assert_eq!(Page::parse("about"), None);
    }
}
