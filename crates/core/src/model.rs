use crate::key::{lenient, Key};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One row of a chart file.
///
/// Song charts key rows by `SongID`, artist charts by `ArtistID`. Some files
/// (the homepage top 15 lists) arrive already enriched, so the display
/// fields are accepted here too.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChartEntry {
    #[serde(rename = "SongID", default, deserialize_with = "lenient::key")]
    pub song_id: Option<Key>,
    #[serde(rename = "ArtistID", default, deserialize_with = "lenient::key")]
    pub artist_id: Option<Key>,
    #[serde(rename = "Position", default, deserialize_with = "lenient::rank")]
    pub position: u32,
    #[serde(rename = "Title", default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(rename = "Artist", default, deserialize_with = "lenient::text")]
    pub artist: Option<String>,
    #[serde(rename = "Artists", default, deserialize_with = "embedded_artists")]
    pub artists: Option<Vec<ArtistCredit>>,
    #[serde(rename = "CoverImage", default, deserialize_with = "lenient::text")]
    pub cover_image: Option<String>,
    #[serde(rename = "SpotifyURL", default, deserialize_with = "lenient::text")]
    pub spotify_url: Option<String>,
    #[serde(rename = "SpotifyImageURL", default, deserialize_with = "lenient::text")]
    pub spotify_image_url: Option<String>,
    #[serde(rename = "Number of hits", default, deserialize_with = "lenient::count")]
    pub hits: Option<u64>,
}

/// `SI.json` row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongInfo {
    #[serde(rename = "SongID", default, deserialize_with = "lenient::key")]
    pub id: Option<Key>,
    #[serde(rename = "Title", default, deserialize_with = "lenient::text")]
    pub title: Option<String>,
    /// Display name as the chart producer wrote it; used when none of the
    /// artist IDs resolve.
    #[serde(rename = "Artist", default, deserialize_with = "lenient::text")]
    pub artist: Option<String>,
    /// Comma separated artist identifiers.
    #[serde(rename = "ArtistID", default, deserialize_with = "lenient::text")]
    pub artist_ids: Option<String>,
}

impl SongInfo {
    /// Artist identifiers in credit order, blanks dropped.
    pub fn artist_keys(&self) -> Vec<Key> {
        self.artist_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(Key::new)
            .collect()
    }
}

/// `TS.json` row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackAsset {
    #[serde(rename = "SongID", default, deserialize_with = "lenient::key")]
    pub id: Option<Key>,
    #[serde(rename = "CoverImage", default, deserialize_with = "lenient::text")]
    pub cover_image: Option<String>,
}

/// `SP.json` row. Older exports spell the field `Spotify_URL`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StreamingLink {
    #[serde(rename = "SongID", default, deserialize_with = "lenient::key")]
    pub id: Option<Key>,
    #[serde(rename = "Spotify_URL", default, deserialize_with = "lenient::text")]
    pub legacy_url: Option<String>,
    #[serde(rename = "SpotifyURL", default, deserialize_with = "lenient::text")]
    pub url: Option<String>,
}

impl StreamingLink {
    pub fn into_url(self) -> Option<String> {
        self.legacy_url.or(self.url)
    }
}

/// `ARTIST_FEATURES.json` row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArtistFeature {
    #[serde(rename = "ArtistID", default, deserialize_with = "lenient::key")]
    pub id: Option<Key>,
    #[serde(rename = "Artist", default, deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(rename = "SpotifyURL", default, deserialize_with = "lenient::text")]
    pub url: Option<String>,
    #[serde(rename = "SpotifyImageURL", default, deserialize_with = "lenient::text")]
    pub image_url: Option<String>,
}

/// Artist name with an optional profile link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistCredit {
    pub name: String,
    pub url: Option<String>,
}

impl ArtistCredit {
    pub fn new(name: impl Into<String>, url: Option<String>) -> Self {
        Self {
            name: name.into(),
            url,
        }
    }
}

/// Display-ready row produced by the merger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRecord {
    pub rank: u32,
    pub title: String,
    pub artists: Vec<ArtistCredit>,
    pub cover: String,
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hits: Option<u64>,
}

impl MergedRecord {
    /// Artist names joined the way the lists print them.
    pub fn artist_line(&self) -> String {
        self.artists
            .iter()
            .map(|artist| artist.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn embedded_artists<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<ArtistCredit>>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = value else {
        return Ok(None);
    };

    let credits = items
        .iter()
        .filter_map(Value::as_object)
        .map(|artist| {
            let name = artist
                .get("Artist")
                .and_then(lenient::text_of)
                .unwrap_or_else(|| "Unknown".to_string());
            let url = artist.get("SpotifyURL").and_then(lenient::text_of);
            ArtistCredit::new(name, url)
        })
        .collect();

    Ok(Some(credits))
}

#[cfg(test)]
mod tests {
    use super::{ChartEntry, SongInfo, StreamingLink};
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn chart_entry_reads_numeric_and_string_fields() {
        let value = json!({"SongID": 7, "Position": "3", "Number of hits": 12});
        let entry = ChartEntry::deserialize(&value).unwrap();

        assert_eq!(entry.song_id.unwrap().as_str(), "7");
        assert_eq!(entry.position, 3);
        assert_eq!(entry.hits, Some(12));
        assert!(entry.title.is_none());
    }

    #[test]
    fn wrong_field_types_are_treated_as_missing() {
        let value = json!({"SongID": "1", "Position": {"x": 1}, "Title": ["a"], "Artists": "nope"});
        let entry = ChartEntry::deserialize(&value).unwrap();

        assert_eq!(entry.position, 0);
        assert!(entry.title.is_none());
        assert!(entry.artists.is_none());
    }

    #[test]
    fn embedded_artists_default_missing_names() {
        let value = json!({
            "SongID": "1",
            "Artists": [{"Artist": "X", "SpotifyURL": "http://x"}, {"SpotifyURL": ""}, 5]
        });
        let entry = ChartEntry::deserialize(&value).unwrap();
        let artists = entry.artists.unwrap();

        assert_eq!(artists.len(), 2);
        assert_eq!(artists[0].url.as_deref(), Some("http://x"));
        assert_eq!(artists[1].name, "Unknown");
        assert_eq!(artists[1].url, None);
    }

    #[test]
    fn artist_keys_split_trim_and_drop_blanks() {
        let song = SongInfo {
            artist_ids: Some(" 10, ,11,".to_string()),
            ..SongInfo::default()
        };
        let keys = song.artist_keys();

        assert_eq!(
            keys.iter().map(|key| key.as_str()).collect::<Vec<_>>(),
            ["10", "11"]
        );
        assert!(SongInfo::default().artist_keys().is_empty());
    }

    #[test]
    fn streaming_link_accepts_both_spellings() {
        let legacy = StreamingLink::deserialize(&json!({"SongID": 1, "Spotify_URL": "a"})).unwrap();
        let current = StreamingLink::deserialize(&json!({"SongID": 1, "SpotifyURL": "b"})).unwrap();

        assert_eq!(legacy.into_url().as_deref(), Some("a"));
        assert_eq!(current.into_url().as_deref(), Some("b"));
    }
}
