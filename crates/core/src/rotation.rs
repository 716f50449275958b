//! Rotating tab controller for the home page widgets.
//!
//! The controller owns no timer. The host calls [`Rotation::tick`] with the
//! time that passed, and cancels its own timer when the view goes away.

use crate::merge::ChartKind;
use std::time::Duration;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// One tab of a widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Tab key (`data-chart` in the page).
    pub key: &'static str,
    pub label: &'static str,
    /// Pre-enriched file under the widget's base directory.
    pub file: &'static str,
    /// Chart code the "view all" link opens.
    pub chart: &'static str,
}

/// A rotating top-N widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Widget {
    pub name: &'static str,
    pub base: &'static str,
    pub kind: ChartKind,
    pub categories: &'static [Category],
    pub list_page: &'static str,
    pub limit: usize,
}

pub const TOP_SONGS_WIDGET: Widget = Widget {
    name: "Top Songs",
    base: "DATABASES/TOP_SONGS/",
    kind: ChartKind::Songs,
    categories: &[
        Category {
            key: "week",
            label: "Weekly",
            file: "top_15_weekly.json",
            chart: "top_weekly",
        },
        Category {
            key: "month",
            label: "Monthly",
            file: "top_15_monthly.json",
            chart: "top_monthly",
        },
        Category {
            key: "general",
            label: "General",
            file: "top_15_general.json",
            chart: "top_general",
        },
    ],
    list_page: "topsongs.html",
    limit: 5,
};

pub const TOP_ARTISTS_WIDGET: Widget = Widget {
    name: "Top Artists",
    base: "DATABASES/TOP_ARTISTS/",
    kind: ChartKind::Artists,
    categories: &[
        Category {
            key: "week",
            label: "Weekly",
            file: "artists_top15_daily.json",
            chart: "artists_weekly",
        },
        Category {
            key: "month",
            label: "Monthly",
            file: "artist_top15_monthly.json",
            chart: "artists_monthly",
        },
        Category {
            key: "general",
            label: "General",
            file: "artist_top15_general.json",
            chart: "artists_general",
        },
    ],
    list_page: "topartists.html",
    limit: 5,
};

impl Widget {
    pub fn category(&self, key: &str) -> Option<&'static Category> {
        self.categories.iter().find(|category| category.key == key)
    }

    pub fn category_at(&self, index: usize) -> Option<&'static Category> {
        self.categories.get(index)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.categories.iter().position(|category| category.key == key)
    }

    pub fn entries_url(&self, category: &Category) -> String {
        format!("{}{}", self.base, category.file)
    }

    pub fn view_all_link(&self, category: &Category) -> String {
        format!("{}?chart={}", self.list_page, category.chart)
    }

    pub fn rotation(&self, interval: Duration) -> Rotation {
        Rotation::new(self.categories.len(), interval)
    }
}

/// What moved the controller to a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    User,
    Timer,
}

/// The controller entered `index`; the host should reload that category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub index: usize,
    pub trigger: Trigger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotation {
    len: usize,
    current: usize,
    rotating: bool,
    interval: Duration,
    elapsed: Duration,
}

impl Rotation {
    /// Starts on the first category with rotation enabled.
    pub fn new(len: usize, interval: Duration) -> Self {
        Self {
            len,
            current: 0,
            rotating: true,
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// The transition the host renders before any tick.
    pub fn initial(&self) -> Transition {
        Transition {
            index: self.current,
            trigger: Trigger::Timer,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn is_rotating(&self) -> bool {
        self.rotating
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Advances the timer. Time only counts while rotation is enabled and
    /// the view is visible.
    pub fn tick(&mut self, delta: Duration, visible: bool) -> Option<Transition> {
        if !self.rotating || !visible || self.len == 0 {
            return None;
        }

        self.elapsed += delta;
        if self.elapsed < self.interval {
            return None;
        }

        self.elapsed = Duration::ZERO;
        self.current = (self.current + 1) % self.len;
        Some(Transition {
            index: self.current,
            trigger: Trigger::Timer,
        })
    }

    /// Explicit user choice. Stops automatic rotation.
    pub fn select(&mut self, index: usize) -> Option<Transition> {
        if index >= self.len {
            return None;
        }

        self.current = index;
        self.rotating = false;
        self.elapsed = Duration::ZERO;
        Some(Transition {
            index,
            trigger: Trigger::User,
        })
    }

    pub fn pause(&mut self) {
        self.rotating = false;
    }

    pub fn resume(&mut self) {
        self.rotating = true;
        self.elapsed = Duration::ZERO;
    }

    pub fn toggle(&mut self) {
        if self.rotating {
            self.pause();
        } else {
            self.resume();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Rotation, Transition, Trigger, DEFAULT_INTERVAL, TOP_ARTISTS_WIDGET, TOP_SONGS_WIDGET};
    use std::time::Duration;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn timer_advances_and_wraps() {
        let mut rotation = TOP_SONGS_WIDGET.rotation(DEFAULT_INTERVAL);
        assert_eq!(rotation.initial().index, 0);

        assert_eq!(rotation.tick(secs(4), true), None);
        assert_eq!(
            rotation.tick(secs(6), true),
            Some(Transition {
                index: 1,
                trigger: Trigger::Timer
            })
        );
        rotation.tick(secs(10), true);
        let wrapped = rotation.tick(secs(10), true).map(|t| t.index);
        assert_eq!(wrapped, Some(0));
    }

    #[test]
    fn hidden_view_does_not_rotate() {
        let mut rotation = Rotation::new(3, secs(10));

        assert_eq!(rotation.tick(secs(30), false), None);
        assert_eq!(rotation.current(), 0);
        assert_eq!(rotation.tick(secs(9), true), None);
    }

    #[test]
    fn user_selection_pauses_rotation() {
        let mut rotation = Rotation::new(3, secs(10));

        let transition = rotation.select(2);
        assert_eq!(
            transition,
            Some(Transition {
                index: 2,
                trigger: Trigger::User
            })
        );
        assert!(!rotation.is_rotating());
        assert_eq!(rotation.tick(secs(60), true), None);
        assert_eq!(rotation.current(), 2);

        rotation.resume();
        assert_eq!(rotation.tick(secs(10), true).map(|t| t.index), Some(0));
    }

    #[test]
    fn out_of_range_selection_is_ignored() {
        let mut rotation = Rotation::new(3, secs(10));

        assert_eq!(rotation.select(3), None);
        assert!(rotation.is_rotating());
    }

    #[test]
    fn widget_links_open_the_matching_chart() {
        let month = TOP_SONGS_WIDGET.category("month").unwrap();
        assert_eq!(TOP_SONGS_WIDGET.entries_url(month), "DATABASES/TOP_SONGS/top_15_monthly.json");
        assert_eq!(TOP_SONGS_WIDGET.view_all_link(month), "topsongs.html?chart=top_monthly");

        let week = TOP_ARTISTS_WIDGET.category("week").unwrap();
        assert_eq!(
            TOP_ARTISTS_WIDGET.entries_url(week),
            "DATABASES/TOP_ARTISTS/artists_top15_daily.json"
        );
        assert_eq!(TOP_ARTISTS_WIDGET.view_all_link(week), "topartists.html?chart=artists_weekly");
        assert_eq!(TOP_ARTISTS_WIDGET.position("general"), Some(2));
    }
}
