use crate::merge::ChartKind;

/// Where one reference dataset lives. `fallback` is tried when `primary`
/// cannot be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceSource {
    pub primary: &'static str,
    pub fallback: Option<&'static str>,
}

impl ReferenceSource {
    pub const fn shared(url: &'static str) -> Self {
        Self {
            primary: url,
            fallback: None,
        }
    }

    pub const fn with_fallback(primary: &'static str, fallback: &'static str) -> Self {
        Self {
            primary,
            fallback: Some(fallback),
        }
    }
}

/// The four datasets a chart is joined against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReferenceUrls {
    pub songs: ReferenceSource,
    pub assets: ReferenceSource,
    pub links: ReferenceSource,
    pub artists: ReferenceSource,
}

const SHARED_REFERENCES: ReferenceUrls = ReferenceUrls {
    songs: ReferenceSource::shared("DATABASES/ALL_JSON/SI.json"),
    assets: ReferenceSource::shared("DATABASES/ALL_JSON/TS.json"),
    links: ReferenceSource::shared("DATABASES/ALL_JSON/SP.json"),
    artists: ReferenceSource::shared("DATABASES/ALL_JSON/ARTIST_FEATURES.json"),
};

const YOUTUBE_REFERENCES: ReferenceUrls = ReferenceUrls {
    songs: ReferenceSource::with_fallback(
        "DATABASES/ALL_JSON/YOUTUBE_SI.json",
        "DATABASES/ALL_JSON/SI.json",
    ),
    assets: ReferenceSource::with_fallback(
        "DATABASES/ALL_JSON/YOUTUBE_TS.json",
        "DATABASES/ALL_JSON/TS.json",
    ),
    links: ReferenceSource::with_fallback(
        "DATABASES/ALL_JSON/YOUTUBE_SP.json",
        "DATABASES/ALL_JSON/SP.json",
    ),
    artists: ReferenceSource::with_fallback(
        "DATABASES/ALL_JSON/YOUTUBE_ARTIST_FEATURES.json",
        "DATABASES/ALL_JSON/ARTIST_FEATURES.json",
    ),
};

const TOP_SONGS_REFERENCES: ReferenceUrls = ReferenceUrls {
    songs: ReferenceSource::shared("DATABASES/TOP_SONGS/SI.json"),
    assets: ReferenceSource::shared("DATABASES/TOP_SONGS/TS.json"),
    links: ReferenceSource::shared("DATABASES/TOP_SONGS/SP.json"),
    artists: ReferenceSource::shared("DATABASES/TOP_SONGS/ARTIST_FEATURES.json"),
};

// Artist charts only read `artists`.
const TOP_ARTISTS_REFERENCES: ReferenceUrls = ReferenceUrls {
    songs: ReferenceSource::shared("DATABASES/TOP_ARTISTS/SI.json"),
    assets: ReferenceSource::shared("DATABASES/TOP_ARTISTS/TS.json"),
    links: ReferenceSource::shared("DATABASES/TOP_ARTISTS/SP.json"),
    artists: ReferenceSource::shared("DATABASES/TOP_ARTISTS/ARTIST_FEATURES.json"),
};

/// A selectable chart of a platform (a country, or a named list).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartOption {
    pub code: &'static str,
    pub label: &'static str,
    /// Overrides the platform's display limit.
    pub limit: Option<usize>,
}

const fn chart(code: &'static str, label: &'static str) -> ChartOption {
    ChartOption {
        code,
        label,
        limit: None,
    }
}

/// How the list header names a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStyle {
    /// `SPOTIFY WEEKLY US`, with a country flag.
    Country,
    /// `BILLBOARD - HOT100`.
    Chart,
    /// `TOP SONGS - WEEKLY`; the prefix is stripped from the chart code.
    Prefixed(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformConfig {
    pub entries_prefix: &'static str,
    pub references: ReferenceUrls,
    pub charts: &'static [ChartOption],
    pub default_chart: &'static str,
    pub limit: usize,
    pub logo: &'static str,
    /// Country whose flag is not shown (the platform's own market).
    pub home_country: Option<&'static str>,
    pub title_style: TitleStyle,
    /// Full list page, used by "view all" links.
    pub list_page: &'static str,
}

/// Header shown above a chart list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    pub logo: &'static str,
    pub logo_alt: &'static str,
    pub flag: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Spotify,
    AppleMusic,
    YouTube,
    Billboard,
    TopSongs,
    TopArtists,
}

static SPOTIFY: PlatformConfig = PlatformConfig {
    entries_prefix: "DATABASES/ALL_JSON/SP_",
    references: SHARED_REFERENCES,
    charts: &[
        chart("global", "Global"),
        chart("us", "United States"),
        chart("gb", "United Kingdom"),
        chart("es", "Spain"),
        chart("mx", "Mexico"),
        chart("kr", "South Korea"),
    ],
    default_chart: "global",
    limit: 100,
    logo: "https://storage.googleapis.com/pr-newsroom-wp/1/2023/05/Spotify_Primary_Logo_RGB_Green.png",
    home_country: Some("global"),
    title_style: TitleStyle::Country,
    list_page: "spotifycharts.html",
};

static APPLE_MUSIC: PlatformConfig = PlatformConfig {
    entries_prefix: "DATABASES/ALL_JSON/apple_music_",
    references: SHARED_REFERENCES,
    charts: &[
        chart("us", "United States"),
        chart("uk", "United Kingdom"),
        chart("es", "Spain"),
        chart("mx", "Mexico"),
        chart("kr", "South Korea"),
    ],
    default_chart: "us",
    limit: 100,
    logo: "https://upload.wikimedia.org/wikipedia/commons/f/fa/Apple_logo_black.svg",
    home_country: Some("us"),
    title_style: TitleStyle::Country,
    list_page: "applemusicharts.html",
};

static YOUTUBE: PlatformConfig = PlatformConfig {
    entries_prefix: "DATABASES/ALL_JSON/yt_insights_",
    references: YOUTUBE_REFERENCES,
    charts: &[
        chart("us", "United States"),
        chart("uk", "United Kingdom"),
        chart("es", "Spain"),
        chart("mx", "Mexico"),
        chart("kr", "South Korea"),
    ],
    default_chart: "us",
    limit: 100,
    logo: "https://upload.wikimedia.org/wikipedia/commons/b/b8/YouTube_Logo_2017.svg",
    home_country: Some("us"),
    title_style: TitleStyle::Country,
    list_page: "youtubecharts.html",
};

static BILLBOARD: PlatformConfig = PlatformConfig {
    entries_prefix: "DATABASES/ALL_JSON/billboard_",
    references: SHARED_REFERENCES,
    charts: &[
        chart("hot100", "Hot 100"),
        ChartOption {
            code: "global200",
            label: "Global 200",
            limit: Some(200),
        },
    ],
    default_chart: "hot100",
    limit: 100,
    logo: "https://upload.wikimedia.org/wikipedia/commons/5/5e/Billboard_logo.svg",
    home_country: None,
    title_style: TitleStyle::Chart,
    list_page: "billboardcharts.html",
};

static TOP_SONGS: PlatformConfig = PlatformConfig {
    entries_prefix: "DATABASES/TOP_SONGS/",
    references: TOP_SONGS_REFERENCES,
    charts: &[
        chart("top_weekly", "Weekly"),
        chart("top_monthly", "Monthly"),
        chart("top_general", "General"),
    ],
    default_chart: "top_weekly",
    limit: 100,
    logo: "images/logo.png",
    home_country: None,
    title_style: TitleStyle::Prefixed("top_"),
    list_page: "topsongs.html",
};

static TOP_ARTISTS: PlatformConfig = PlatformConfig {
    entries_prefix: "DATABASES/TOP_ARTISTS/",
    references: TOP_ARTISTS_REFERENCES,
    charts: &[
        chart("artists_weekly", "Weekly"),
        chart("artists_monthly", "Monthly"),
        chart("artists_general", "General"),
    ],
    default_chart: "artists_weekly",
    limit: 100,
    logo: "images/logo.png",
    home_country: None,
    title_style: TitleStyle::Prefixed("artists_"),
    list_page: "topartists.html",
};

impl Platform {
    pub const ALL: [Self; 6] = [
        Self::Spotify,
        Self::AppleMusic,
        Self::YouTube,
        Self::Billboard,
        Self::TopSongs,
        Self::TopArtists,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spotify => "spotify",
            Self::AppleMusic => "apple_music",
            Self::YouTube => "youtube",
            Self::Billboard => "billboard",
            Self::TopSongs => "topsongs",
            Self::TopArtists => "topartists",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "spotify" | "sp" => Some(Self::Spotify),
            "apple_music" | "apple" | "applemusic" => Some(Self::AppleMusic),
            "youtube" | "yt" | "youtubeinsights" => Some(Self::YouTube),
            "billboard" => Some(Self::Billboard),
            "topsongs" | "top_songs" => Some(Self::TopSongs),
            "topartists" | "top_artists" => Some(Self::TopArtists),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Spotify => "Spotify Weekly",
            Self::AppleMusic => "Apple Music",
            Self::YouTube => "YouTube Insights",
            Self::Billboard => "Billboard",
            Self::TopSongs => "Top Songs",
            Self::TopArtists => "Top Artists",
        }
    }

    pub const fn kind(self) -> ChartKind {
        match self {
            Self::TopArtists => ChartKind::Artists,
            _ => ChartKind::Songs,
        }
    }

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|platform| *platform == self)
            .unwrap_or_default()
    }

    pub fn config(self) -> &'static PlatformConfig {
        match self {
            Self::Spotify => &SPOTIFY,
            Self::AppleMusic => &APPLE_MUSIC,
            Self::YouTube => &YOUTUBE,
            Self::Billboard => &BILLBOARD,
            Self::TopSongs => &TOP_SONGS,
            Self::TopArtists => &TOP_ARTISTS,
        }
    }

    /// Header for one of this platform's charts.
    pub fn header(self, code: &str) -> Header {
        let config = self.config();
        let label = self.label().to_uppercase();
        let title = match config.title_style {
            TitleStyle::Country => format!("{label} {}", code.to_uppercase()),
            TitleStyle::Chart => format!("{label} - {}", code.replace('-', " ").to_uppercase()),
            TitleStyle::Prefixed(prefix) => {
                let trimmed = code.strip_prefix(prefix).unwrap_or(code);
                format!("{label} - {}", trimmed.to_uppercase())
            }
        };

        let flag = match config.title_style {
            TitleStyle::Country if config.home_country != Some(code.to_lowercase().as_str()) => {
                Some(flag_url("w40", code))
            }
            _ => None,
        };

        Header {
            title,
            logo: config.logo,
            logo_alt: self.label(),
            flag,
        }
    }
}

impl PlatformConfig {
    /// Returns the catalog entry for `requested`, or the default chart when
    /// it is missing or unknown.
    pub fn resolve_chart(&self, requested: Option<&str>) -> &'static ChartOption {
        let wanted = requested.map(str::trim).filter(|code| !code.is_empty());
        let found = wanted.and_then(|wanted| {
            self.charts
                .iter()
                .find(|option| option.code.eq_ignore_ascii_case(wanted))
        });
        if let (Some(wanted), None) = (wanted, found) {
            tracing::warn!(chart = wanted, "unknown chart; using default");
        }
        found
            .or_else(|| self.charts.iter().find(|option| option.code == self.default_chart))
            .unwrap_or(&self.charts[0])
    }

    pub fn entries_url(&self, code: &str) -> String {
        format!("{}{code}.json", self.entries_prefix)
    }

    pub fn limit_for(&self, code: &str) -> usize {
        self.charts
            .iter()
            .find(|option| option.code == code)
            .and_then(|option| option.limit)
            .unwrap_or(self.limit)
    }

    pub fn chart_position(&self, code: &str) -> usize {
        self.charts
            .iter()
            .position(|option| option.code == code)
            .unwrap_or_default()
    }
}

/// flagcdn.com image for a country code. The catalog says `uk` where the
/// ISO code is `gb`.
pub fn flag_url(size: &str, code: &str) -> String {
    let code = code.to_lowercase();
    let iso = if code == "uk" { "gb" } else { code.as_str() };
    format!("https://flagcdn.com/{size}/{iso}.png")
}

#[cfg(test)]
mod tests {
    use super::{flag_url, Platform};

    #[test]
    fn unknown_or_missing_chart_resolves_to_default() {
        let config = Platform::Spotify.config();

        assert_eq!(config.resolve_chart(None).code, "global");
        assert_eq!(config.resolve_chart(Some("zz")).code, "global");
        assert_eq!(config.resolve_chart(Some(" MX ")).code, "mx");
    }

    #[test]
    fn billboard_global_chart_shows_two_hundred_rows() {
        let config = Platform::Billboard.config();

        assert_eq!(config.limit_for("global200"), 200);
        assert_eq!(config.limit_for("hot100"), 100);
        assert_eq!(config.entries_url("hot100"), "DATABASES/ALL_JSON/billboard_hot100.json");
    }

    #[test]
    fn headers_follow_each_platform_style() {
        let spotify = Platform::Spotify.header("mx");
        assert_eq!(spotify.title, "SPOTIFY WEEKLY MX");
        assert_eq!(spotify.flag.as_deref(), Some("https://flagcdn.com/w40/mx.png"));

        assert_eq!(Platform::Spotify.header("global").flag, None);
        assert_eq!(Platform::AppleMusic.header("us").flag, None);
        assert_eq!(Platform::Billboard.header("hot100").title, "BILLBOARD - HOT100");
        assert_eq!(Platform::TopSongs.header("top_monthly").title, "TOP SONGS - MONTHLY");
        assert_eq!(
            Platform::TopArtists.header("artists_general").title,
            "TOP ARTISTS - GENERAL"
        );
    }

    #[test]
    fn platform_names_round_trip_through_parse() {
        for platform in Platform::ALL {
            assert_eq!(Platform::parse(platform.as_str()), Some(platform));
        }
        assert_eq!(Platform::parse("youtubeInsights"), Some(Platform::YouTube));
        assert_eq!(Platform::parse("deezer"), None);
    }

    #[test]
    fn uk_flag_uses_iso_code() {
        assert_eq!(flag_url("24x18", "uk"), "https://flagcdn.com/24x18/gb.png");
    }
}
