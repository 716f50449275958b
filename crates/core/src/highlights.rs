//! Streaming highlight cards: the top of several charts of one platform,
//! side by side.

use crate::model::MergedRecord;
use crate::platform::{flag_url, Platform, TitleStyle};

pub const HIGHLIGHT_LIMIT: usize = 5;

/// The charts shown together for a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightGroup {
    pub platform: Platform,
    pub codes: &'static [&'static str],
    /// Class set on `<body>` while the group is shown.
    pub theme_class: Option<&'static str>,
}

pub const HIGHLIGHT_GROUPS: [HighlightGroup; 4] = [
    HighlightGroup {
        platform: Platform::Spotify,
        codes: &["us", "gb", "es", "mx", "kr"],
        theme_class: None,
    },
    HighlightGroup {
        platform: Platform::AppleMusic,
        codes: &["us", "uk", "es", "mx", "kr"],
        theme_class: Some("apple_music-active"),
    },
    HighlightGroup {
        platform: Platform::YouTube,
        codes: &["us", "uk", "es", "mx", "kr"],
        theme_class: Some("youtube-active"),
    },
    HighlightGroup {
        platform: Platform::Billboard,
        codes: &["hot100", "global200"],
        theme_class: Some("billboard-active"),
    },
];

pub fn group(platform: Platform) -> Option<&'static HighlightGroup> {
    HIGHLIGHT_GROUPS.iter().find(|group| group.platform == platform)
}

/// Marker drawn next to a card's rank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge {
    /// Country flag image URL.
    Flag(String),
    /// Short text, e.g. the chart size.
    Text(String),
}

impl Badge {
    pub fn for_chart(platform: Platform, code: &str) -> Self {
        match platform.config().title_style {
            TitleStyle::Country => Self::Flag(flag_url("24x18", code)),
            _ => Self::Text(chart_size(code)),
        }
    }
}

fn chart_size(code: &str) -> String {
    match code {
        "hot100" => "100".to_string(),
        "global200" => "200".to_string(),
        other => other.to_uppercase(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightCard {
    pub code: &'static str,
    pub badge: Badge,
    pub headline: MergedRecord,
    pub others: Vec<MergedRecord>,
}

impl HighlightCard {
    /// `None` when the chart had no rows.
    pub fn new(platform: Platform, code: &'static str, records: Vec<MergedRecord>) -> Option<Self> {
        let mut rows = records.into_iter().take(HIGHLIGHT_LIMIT);
        let headline = rows.next()?;

        Some(Self {
            code,
            badge: Badge::for_chart(platform, code),
            headline,
            others: rows.collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{group, Badge, HighlightCard};
    use crate::model::MergedRecord;
    use crate::platform::Platform;

    fn record(rank: u32) -> MergedRecord {
        MergedRecord {
            rank,
            title: format!("Song {rank}"),
            artists: Vec::new(),
            cover: String::new(),
            link: None,
            hits: None,
        }
    }

    #[test]
    fn billboard_cards_show_chart_size() {
        assert_eq!(Badge::for_chart(Platform::Billboard, "global200"), Badge::Text("200".into()));
        assert_eq!(Badge::for_chart(Platform::Billboard, "hot100"), Badge::Text("100".into()));
    }

    #[test]
    fn country_cards_show_small_flags() {
        assert_eq!(
            Badge::for_chart(Platform::YouTube, "uk"),
            Badge::Flag("https://flagcdn.com/24x18/gb.png".into())
        );
    }

    #[test]
    fn first_record_is_the_headline() {
        let card = HighlightCard::new(Platform::Spotify, "us", (1..=7).map(record).collect()).unwrap();

        assert_eq!(card.headline.rank, 1);
        assert_eq!(card.others.iter().map(|r| r.rank).collect::<Vec<_>>(), [2, 3, 4, 5]);
        assert!(HighlightCard::new(Platform::Spotify, "us", Vec::new()).is_none());
    }

    #[test]
    fn top_lists_have_no_highlight_group() {
        assert!(group(Platform::TopSongs).is_none());
        assert_eq!(group(Platform::Billboard).map(|g| g.codes.len()), Some(2));
    }
}
