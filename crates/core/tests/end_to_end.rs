use charts_core::{ArtistCredit, ChartSession, MemorySource, Platform};
use serde_json::json;

fn catalog() -> MemorySource {
    MemorySource::new()
        .with(
            "DATABASES/ALL_JSON/SI.json",
            json!([
                {"SongID": "1", "Title": "A", "ArtistID": "10"},
                {"SongID": "2", "Title": "B", "ArtistID": ""}
            ]),
        )
        .with("DATABASES/ALL_JSON/TS.json", json!([]))
        .with("DATABASES/ALL_JSON/SP.json", json!([]))
        .with(
            "DATABASES/ALL_JSON/ARTIST_FEATURES.json",
            json!([{"ArtistID": "10", "Artist": "X", "SpotifyURL": "http://x"}]),
        )
}

#[tokio::test]
async fn entries_are_joined_sorted_and_degraded() {
    let source = catalog().with(
        "DATABASES/ALL_JSON/SP_us.json",
        json!([{"SongID": "1", "Position": 2}, {"SongID": "2", "Position": 1}]),
    );
    let session = ChartSession::new(source);

    let chart = session
        .load_chart(Platform::Spotify, Some("us"), None)
        .await
        .unwrap();

    assert_eq!(chart.header.title, "SPOTIFY WEEKLY US");
    assert_eq!(chart.records.len(), 2);

    let first = &chart.records[0];
    assert_eq!((first.rank, first.title.as_str()), (1, "B"));
    assert_eq!(first.artists, vec![ArtistCredit::new("Unknown Artist", None)]);

    let second = &chart.records[1];
    assert_eq!((second.rank, second.title.as_str()), (2, "A"));
    assert_eq!(
        second.artists,
        vec![ArtistCredit::new("X", Some("http://x".to_string()))]
    );
}

#[tokio::test]
async fn youtube_without_own_datasets_uses_shared_ones() {
    let source = catalog()
        .with_status("DATABASES/ALL_JSON/YOUTUBE_SI.json", 404)
        .with_status("DATABASES/ALL_JSON/YOUTUBE_ARTIST_FEATURES.json", 503)
        .with(
            "DATABASES/ALL_JSON/yt_insights_mx.json",
            json!([{"SongID": 1, "Position": 1}]),
        );
    let session = ChartSession::new(source);

    let chart = session
        .load_chart(Platform::YouTube, Some("mx"), None)
        .await
        .unwrap();

    assert_eq!(chart.records[0].title, "A");
    assert_eq!(chart.records[0].artist_line(), "X");
}

#[tokio::test]
async fn list_pages_cap_at_one_hundred_rows() {
    let rows = (1..=150)
        .map(|rank| json!({"SongID": rank, "Position": rank}))
        .collect::<Vec<_>>();
    let source = catalog().with("DATABASES/ALL_JSON/apple_music_us.json", json!(rows));
    let session = ChartSession::new(source);

    let chart = session
        .load_chart(Platform::AppleMusic, None, None)
        .await
        .unwrap();

    assert_eq!(chart.records.len(), 100);
    assert_eq!(chart.records[99].rank, 100);
    assert_eq!(chart.records[5].title, "Unknown Title");
}

#[tokio::test]
async fn unreachable_references_still_render_the_chart() {
    let source = MemorySource::new().with(
        "DATABASES/ALL_JSON/billboard_hot100.json",
        json!([{"SongID": 3, "Position": 1}]),
    );
    let session = ChartSession::new(source);

    let chart = session
        .load_chart(Platform::Billboard, Some("nope"), None)
        .await
        .unwrap();

    assert_eq!(chart.code, "hot100");
    assert_eq!(chart.records[0].title, "Unknown Title");
    assert_eq!(chart.records[0].cover, "images/backgroundlogo.png");
    assert_eq!(chart.records[0].link, None);
}
