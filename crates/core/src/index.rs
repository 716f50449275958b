//! Reference index builder.
//!
//! Turns a dataset (a JSON array of flat records) into a lookup keyed by the
//! record's normalized identifier. Anything that is not an array becomes an
//! empty index, and records that cannot be read are skipped, so one bad file
//! only blanks out the fields it would have supplied.

use crate::key::Key;
use crate::model::{ArtistFeature, SongInfo, StreamingLink, TrackAsset};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;

/// Decodes every readable record of a dataset. A non-array input yields
/// nothing.
pub fn records<T: DeserializeOwned>(dataset: &Value) -> Vec<T> {
    let Some(items) = dataset.as_array() else {
        if !dataset.is_null() {
            tracing::warn!("dataset is not an array; treating it as empty");
        }
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| match T::deserialize(item) {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::warn!(position, %error, "skipping unreadable record");
                None
            }
        })
        .collect()
}

/// Builds `key -> projection` from records. Later duplicates overwrite
/// earlier ones; records without a key are dropped.
pub fn index_by<T, V>(
    records: impl IntoIterator<Item = T>,
    key: impl Fn(&T) -> Option<Key>,
    project: impl Fn(T) -> V,
) -> HashMap<Key, V> {
    let mut index = HashMap::new();
    for record in records {
        if let Some(id) = key(&record) {
            index.insert(id, project(record));
        }
    }
    index
}

/// The four lookups a song merge joins against.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    pub songs: HashMap<Key, SongInfo>,
    pub assets: HashMap<Key, TrackAsset>,
    /// Streaming URL per song. Songs listed without a URL map to `None`.
    pub links: HashMap<Key, Option<String>>,
    pub artists: HashMap<Key, ArtistFeature>,
}

/// Raw datasets feeding a [`ReferenceIndex`].
#[derive(Debug, Clone, Copy)]
pub struct ReferenceData<'a> {
    pub songs: &'a Value,
    pub assets: &'a Value,
    pub links: &'a Value,
    pub artists: &'a Value,
}

impl ReferenceIndex {
    pub fn build(data: ReferenceData<'_>) -> Self {
        let index = Self {
            songs: index_by(records::<SongInfo>(data.songs), |song| song.id.clone(), |song| song),
            assets: index_by(
                records::<TrackAsset>(data.assets),
                |asset| asset.id.clone(),
                |asset| asset,
            ),
            links: index_by(
                records::<StreamingLink>(data.links),
                |link| link.id.clone(),
                StreamingLink::into_url,
            ),
            artists: index_by(
                records::<ArtistFeature>(data.artists),
                |artist| artist.id.clone(),
                |artist| artist,
            ),
        };

        tracing::debug!(
            songs = index.songs.len(),
            assets = index.assets.len(),
            links = index.links.len(),
            artists = index.artists.len(),
            "built reference index"
        );

        index
    }

    /// Index holding only artist features, for artist charts.
    pub fn artists_only(artists: &Value) -> Self {
        Self {
            artists: index_by(
                records::<ArtistFeature>(artists),
                |artist| artist.id.clone(),
                |artist| artist,
            ),
            ..Self::default()
        }
    }

    pub fn link(&self, id: &str) -> Option<&str> {
        self.links.get(id).and_then(Option::as_deref)
    }
}

#[cfg(test)]
mod tests {
    use super::{index_by, records, ReferenceData, ReferenceIndex};
    use crate::model::SongInfo;
    use serde_json::json;

    #[test]
    fn duplicate_keys_keep_the_last_record() {
        let data = json!([
            {"SongID": 1, "Title": "first"},
            {"SongID": "1", "Title": "second"}
        ]);
        let index = index_by(records::<SongInfo>(&data), |s| s.id.clone(), |s| s);

        assert_eq!(index.len(), 1);
        assert_eq!(index["1"].title.as_deref(), Some("second"));
    }

    #[test]
    fn non_array_input_is_an_empty_index() {
        let data = json!({"SongID": 1});
        let index = index_by(records::<SongInfo>(&data), |s| s.id.clone(), |s| s);

        assert!(index.is_empty());
    }

    #[test]
    fn unreadable_and_keyless_records_are_skipped() {
        let data = json!([
            "not a record",
            {"Title": "no id"},
            {"SongID": 2, "Title": "kept"}
        ]);
        let index = index_by(records::<SongInfo>(&data), |s| s.id.clone(), |s| s);

        assert_eq!(index.len(), 1);
        assert!(index.contains_key("2"));
    }

    #[test]
    fn links_are_projected_to_urls() {
        let empty = json!([]);
        let links = json!([
            {"SongID": 5, "Spotify_URL": "https://open.spotify.com/track/5"},
            {"SongID": 6}
        ]);
        let index = ReferenceIndex::build(ReferenceData {
            songs: &empty,
            assets: &empty,
            links: &links,
            artists: &empty,
        });

        assert_eq!(index.link("5"), Some("https://open.spotify.com/track/5"));
        assert_eq!(index.link("6"), None);
        assert_eq!(index.link("7"), None);
    }
}
