//! Request construction without a network.

use ballchasing::{
    Choice, DescriptorBuilder, ListGroupsParams, ListReplaysParams, PatchGroupParams, PlayerId,
    Platform, Playlist, RequestBody, Season, TeamIdentification, Uploader,
};
use chrono::{TimeZone, Utc};
use reqwest::Method;

fn builder() -> DescriptorBuilder {
    DescriptorBuilder::new("https://ballchasing.com", "T").unwrap()
}

fn query_keys(url: &reqwest::Url) -> Vec<String> {
    url.query_pairs().map(|(key, _)| key.into_owned()).collect()
}

#[test]
fn test_ping_request() {
    let descriptor = builder().ping().unwrap();
    assert_eq!(descriptor.method(), &Method::GET);
    assert_eq!(descriptor.url().as_str(), "https://ballchasing.com/api");
    assert!(descriptor.url().query().is_none());
    assert_eq!(descriptor.headers()["authorization"], "T");
    assert_eq!(descriptor.body(), &RequestBody::Empty);
}

#[test]
fn test_patch_group_sends_only_provided_fields() {
    let params =
        PatchGroupParams::default().team_identification(TeamIdentification::ByDistinctPlayers);
    let descriptor = builder().patch_group("gid", &params).unwrap();

    assert_eq!(descriptor.method(), &Method::PATCH);
    assert_eq!(
        descriptor.url().as_str(),
        "https://ballchasing.com/api/groups/gid"
    );
    let RequestBody::Json(body) = descriptor.body() else {
        panic!("expected a JSON body");
    };
    assert_eq!(
        body,
        &serde_json::json!({"team_identification": "by-distinct-players"})
    );
}

#[test]
fn test_cursor_overrides_every_filter() {
    let cursor = "https://ballchasing.com/api/replays?after=abc123&count=2";
    let params = ListReplaysParams::default()
        .next(cursor)
        .title("ignored")
        .count(7u32)
        .player_names(["a", "b"])
        .pro(true);

    let descriptor = builder().list_replays(&params).unwrap();
    assert_eq!(descriptor.url().as_str(), cursor);
}

#[test]
fn test_cursor_is_sent_in_normalized_form() {
    let cursor = "https://Ballchasing.com:443/api/replays?after=abc";
    let params = ListReplaysParams::default().next(cursor).title("ignored");

    let descriptor = builder().list_replays(&params).unwrap();
    assert_eq!(
        descriptor.url().as_str(),
        "https://ballchasing.com/api/replays?after=abc"
    );
    assert_eq!(params.next.unwrap().as_str(), cursor);
}

#[test]
fn test_group_cursor_overrides_filters() {
    let cursor = "https://ballchasing.com/api/groups?after=xyz";
    let params = ListGroupsParams::default().next(cursor).name("ignored");
    assert_eq!(builder().list_groups(&params).unwrap().url().as_str(), cursor);
}

#[test]
fn test_relative_cursor_rejected() {
    let params = ListReplaysParams::default().next("/api/replays?after=abc");
    let err = builder().list_replays(&params).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn test_count_checked_even_with_cursor() {
    let params = ListReplaysParams::default()
        .next("https://ballchasing.com/api/replays?after=abc")
        .count(0u32);
    assert!(builder().list_replays(&params).unwrap_err().is_validation());
}

#[test]
fn test_repeated_filters_keep_order() {
    let names = ["zed", "amy", "zed", "bob"];
    let params = ListReplaysParams::default()
        .player_names(names)
        .player_ids([
            PlayerId::new(Platform::Steam, "1"),
            PlayerId::new(Platform::Epic, "2"),
        ])
        .playlists([
            Choice::from(Playlist::RankedDuels),
            Choice::from("private"),
        ]);
    let descriptor = builder().list_replays(&params).unwrap();

    let pairs: Vec<(String, String)> = descriptor
        .url()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    let player_names: Vec<_> = pairs
        .iter()
        .filter(|(k, _)| k == "player-name")
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(player_names, names);

    let player_ids: Vec<_> = pairs
        .iter()
        .filter(|(k, _)| k == "player-id")
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(player_ids, ["steam:1", "epic:2"]);

    let playlists: Vec<_> = pairs
        .iter()
        .filter(|(k, _)| k == "playlist")
        .map(|(_, v)| v.as_str())
        .collect();
    assert_eq!(playlists, ["ranked-duels", "private"]);
}

#[test]
fn test_unset_filters_are_absent() {
    let descriptor = builder()
        .list_replays(&ListReplaysParams::default())
        .unwrap();
    assert_eq!(
        descriptor.url().as_str(),
        "https://ballchasing.com/api/replays"
    );

    let descriptor = builder()
        .list_replays(&ListReplaysParams::default().season(Season::F2))
        .unwrap();
    assert_eq!(query_keys(descriptor.url()), ["season"]);
}

#[test]
fn test_falsy_values_are_sent() {
    let params = ListReplaysParams::default().pro(false).title("");
    let descriptor = builder().list_replays(&params).unwrap();
    assert_eq!(
        descriptor.url().query(),
        Some("title=&pro=false")
    );
}

#[test]
fn test_dates_and_uploader_encoding() {
    let after = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
    let params = ListReplaysParams::default()
        .uploader(Uploader::Me)
        .created_after(after)
        .replay_date_before("2024-04-01T00:00:00+02:00");
    let descriptor = builder().list_replays(&params).unwrap();

    let pairs: Vec<(String, String)> = descriptor
        .url()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    assert_eq!(
        pairs,
        [
            ("uploader".to_string(), "me".to_string()),
            ("created-after".to_string(), "2024-03-01T12:30:00Z".to_string()),
            (
                "replay-date-before".to_string(),
                "2024-04-01T00:00:00+02:00".to_string()
            ),
        ]
    );
}

#[test]
fn test_steam_id_uploader() {
    let params = ListReplaysParams::default().uploader(76561198000000000u64);
    let descriptor = builder().list_replays(&params).unwrap();
    assert_eq!(
        descriptor.url().query(),
        Some("uploader=76561198000000000")
    );
}
