//! Record merger: joins chart entries against the reference indices.
//!
//! Every function here is total. Missing or malformed reference data turns
//! into placeholders instead of errors.

use crate::index::ReferenceIndex;
use crate::model::{ArtistCredit, ChartEntry, MergedRecord};

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const DEFAULT_COVER: &str = "images/backgroundlogo.png";

/// Whether a chart ranks songs or artists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Songs,
    Artists,
}

/// Joins one song-chart entry. Reference data wins over fields the entry
/// already carries; the entry's own fields win over placeholders.
pub fn merge_song(entry: &ChartEntry, index: &ReferenceIndex, default_cover: &str) -> MergedRecord {
    let id = entry.song_id.as_ref().map_or("", |key| key.as_str());
    let song = index.songs.get(id);

    let title = song
        .and_then(|song| song.title.clone())
        .or_else(|| entry.title.clone())
        .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

    let mut artists = song
        .map(|song| {
            song.artist_keys()
                .iter()
                .filter_map(|artist_id| index.artists.get(artist_id))
                .map(|artist| {
                    ArtistCredit::new(
                        artist
                            .name
                            .clone()
                            .unwrap_or_else(|| UNKNOWN_ARTIST.to_string()),
                        artist.url.clone(),
                    )
                })
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if artists.is_empty() {
        artists = entry
            .artists
            .clone()
            .filter(|embedded| !embedded.is_empty())
            .unwrap_or_else(|| {
                let name = song
                    .and_then(|song| song.artist.clone())
                    .or_else(|| entry.artist.clone())
                    .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());
                vec![ArtistCredit::new(name, None)]
            });
    }

    let cover = first_usable([
        index.assets.get(id).and_then(|asset| asset.cover_image.as_deref()),
        entry.cover_image.as_deref(),
    ])
    .unwrap_or(default_cover)
    .to_string();

    let link = index
        .link(id)
        .map(str::to_string)
        .or_else(|| entry.spotify_url.clone());

    MergedRecord {
        rank: entry.position,
        title,
        artists,
        cover,
        link,
        hits: entry.hits,
    }
}

/// Joins one artist-chart entry against the artist features.
pub fn merge_artist(entry: &ChartEntry, index: &ReferenceIndex, default_cover: &str) -> MergedRecord {
    let id = entry.artist_id.as_ref().map_or("", |key| key.as_str());
    let feature = index.artists.get(id);

    let title = entry
        .artist
        .clone()
        .or_else(|| feature.and_then(|feature| feature.name.clone()))
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    let cover = first_usable([
        feature.and_then(|feature| feature.image_url.as_deref()),
        entry.spotify_image_url.as_deref(),
    ])
    .unwrap_or(default_cover)
    .to_string();

    let link = feature
        .and_then(|feature| feature.url.clone())
        .or_else(|| entry.spotify_url.clone());

    MergedRecord {
        rank: entry.position,
        title,
        artists: Vec::new(),
        cover,
        link,
        hits: entry.hits,
    }
}

/// Merges a whole chart, sorts ascending by rank and keeps the first
/// `limit` rows. The sort is stable, so tied ranks keep file order.
pub fn merge_chart(
    entries: &[ChartEntry],
    index: &ReferenceIndex,
    kind: ChartKind,
    limit: usize,
    default_cover: &str,
) -> Vec<MergedRecord> {
    let mut merged = entries
        .iter()
        .map(|entry| match kind {
            ChartKind::Songs => merge_song(entry, index, default_cover),
            ChartKind::Artists => merge_artist(entry, index, default_cover),
        })
        .collect::<Vec<_>>();

    merged.sort_by_key(|record| record.rank);
    merged.truncate(limit);
    merged
}

fn first_usable<'a, const N: usize>(candidates: [Option<&'a str>; N]) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{merge_artist, merge_chart, merge_song, ChartKind, DEFAULT_COVER};
    use crate::index::{records, ReferenceData, ReferenceIndex};
    use crate::model::{ArtistCredit, ChartEntry};
    use serde_json::{json, Value};

    fn index(songs: Value, assets: Value, links: Value, artists: Value) -> ReferenceIndex {
        ReferenceIndex::build(ReferenceData {
            songs: &songs,
            assets: &assets,
            links: &links,
            artists: &artists,
        })
    }

    fn entries(value: Value) -> Vec<ChartEntry> {
        records(&value)
    }

    #[test]
    fn missing_song_gets_placeholders() {
        let index = index(json!([]), json!([]), json!([]), json!([]));
        let chart = entries(json!([{"SongID": "99", "Position": 1}]));
        let entry = &chart[0];
        let record = merge_song(entry, &index, DEFAULT_COVER);

        assert_eq!(record.title, "Unknown Title");
        assert_eq!(record.artists, vec![ArtistCredit::new("Unknown Artist", None)]);
        assert_eq!(record.cover, DEFAULT_COVER);
        assert_eq!(record.link, None);
    }

    #[test]
    fn unresolvable_artists_fall_back_to_raw_artist_name() {
        let index = index(
            json!([{"SongID": 1, "Title": "A", "Artist": "Raw Name", "ArtistID": "404, 405"}]),
            json!([]),
            json!([]),
            json!([{"ArtistID": 10, "Artist": "X"}]),
        );
        let chart = entries(json!([{"SongID": 1, "Position": 1}]));
        let entry = &chart[0];
        let record = merge_song(entry, &index, DEFAULT_COVER);

        assert_eq!(record.artists, vec![ArtistCredit::new("Raw Name", None)]);
    }

    #[test]
    fn artists_resolve_in_credit_order_and_skip_unknown_ids() {
        let index = index(
            json!([{"SongID": 1, "Title": "A", "ArtistID": "11, 404 ,10"}]),
            json!([]),
            json!([]),
            json!([
                {"ArtistID": 10, "Artist": "X", "SpotifyURL": "http://x"},
                {"ArtistID": "11", "Artist": "Y"}
            ]),
        );
        let chart = entries(json!([{"SongID": "1", "Position": 1}]));
        let entry = &chart[0];
        let record = merge_song(entry, &index, DEFAULT_COVER);

        assert_eq!(
            record.artists,
            vec![
                ArtistCredit::new("Y", None),
                ArtistCredit::new("X", Some("http://x".to_string())),
            ]
        );
    }

    #[test]
    fn blank_cover_uses_default_and_numeric_ids_match() {
        let index = index(
            json!([{"SongID": 42, "Title": "Answer"}]),
            json!([{"SongID": 42, "CoverImage": "   "}, {"SongID": 43, "CoverImage": "c.jpg"}]),
            json!([{"SongID": 43, "Spotify_URL": "https://s/43"}]),
            json!([]),
        );
        let chart = entries(json!([
            {"SongID": "42", "Position": 1},
            {"SongID": 43, "Position": 2}
        ]));

        let first = merge_song(&chart[0], &index, "fallback.png");
        let second = merge_song(&chart[1], &index, "fallback.png");

        assert_eq!(first.title, "Answer");
        assert_eq!(first.cover, "fallback.png");
        assert_eq!(second.cover, "c.jpg");
        assert_eq!(second.link.as_deref(), Some("https://s/43"));
    }

    #[test]
    fn pre_enriched_entries_fill_reference_gaps() {
        let index = index(json!([]), json!([]), json!([]), json!([]));
        let chart = entries(json!([{
            "SongID": 5,
            "Position": 1,
            "Title": "Embedded",
            "Artists": [{"Artist": "E", "SpotifyURL": "http://e"}],
            "CoverImage": "e.jpg",
            "SpotifyURL": "http://song"
        }]));
        let entry = &chart[0];
        let record = merge_song(entry, &index, DEFAULT_COVER);

        assert_eq!(record.title, "Embedded");
        assert_eq!(record.artists, vec![ArtistCredit::new("E", Some("http://e".to_string()))]);
        assert_eq!(record.cover, "e.jpg");
        assert_eq!(record.link.as_deref(), Some("http://song"));
    }

    #[test]
    fn artist_entries_join_features() {
        let index = ReferenceIndex::artists_only(&json!([
            {"ArtistID": 7, "Artist": "Feature Name", "SpotifyURL": "http://a", "SpotifyImageURL": ""}
        ]));
        let chart = entries(json!([{"ArtistID": "7", "Artist": "Chart Name", "Position": 1, "Number of hits": 4}]));
        let entry = &chart[0];
        let record = merge_artist(entry, &index, DEFAULT_COVER);

        assert_eq!(record.title, "Chart Name");
        assert_eq!(record.cover, DEFAULT_COVER);
        assert_eq!(record.link.as_deref(), Some("http://a"));
        assert_eq!(record.hits, Some(4));
        assert!(record.artists.is_empty());
    }

    #[test]
    fn chart_is_sorted_and_truncated() {
        let index = index(json!([]), json!([]), json!([]), json!([]));
        let chart = entries(json!([
            {"SongID": 1, "Position": 6}, {"SongID": 2, "Position": 2},
            {"SongID": 3, "Position": 4}, {"SongID": 4, "Position": 1},
            {"SongID": 5, "Position": 5}, {"SongID": 6, "Position": 3},
            {"SongID": 7, "Position": 7}
        ]));

        let top = merge_chart(&chart, &index, ChartKind::Songs, 5, DEFAULT_COVER);
        let ranks = top.iter().map(|record| record.rank).collect::<Vec<_>>();
        assert_eq!(ranks, [1, 2, 3, 4, 5]);

        let all = merge_chart(&chart, &index, ChartKind::Songs, 100, DEFAULT_COVER);
        assert_eq!(all.len(), 7);
        assert!(all.windows(2).all(|pair| pair[0].rank <= pair[1].rank));
    }
}
