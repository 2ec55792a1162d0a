//! Integration tests for the song catalog and derived albums


use harmony_core::{types::*, HarmonyError};
use harmony_storage::{albums, playlists, songs};
use test_helpers::*;

fn new_song(title: &str, file_path: &str) -> CreateSong {
    CreateSong {
        title: title.to_string(),
        artist: "Alice Coltrane".to_string(),
        album: Some("Journey in Satchidananda".to_string()),
        duration: 400,
        file_path: file_path.to_string(),
    }
}

#[tokio::test]
async fn test_create_and_get_song() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let created = songs::create(pool, new_song("Shiva-Loka", "/music/shiva-loka.mp3"))
        .await
        .unwrap();
    assert_eq!(created.title, "Shiva-Loka");
    assert_eq!(created.duration, 400);

    let fetched = songs::get_by_id(pool, created.id).await.unwrap().unwrap();
    assert_eq!(fetched, created);

    assert!(songs::get_by_id(pool, SongId::new(9999)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_file_path_is_rejected() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    songs::create(pool, new_song("First", "/music/same.mp3")).await.unwrap();
    let result = songs::create(pool, new_song("Second", "/music/same.mp3")).await;

    assert!(matches!(result, Err(HarmonyError::Duplicate(_))));
}

#[tokio::test]
async fn test_list_is_paginated_with_total() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    for i in 0..15 {
        create_test_song(pool, &format!("Track {i:02}")).await;
    }

    let first = songs::list(pool, 10, 0).await.unwrap();
    assert_eq!(first.songs.len(), 10);
    assert_eq!(first.total, 15);
    assert_eq!((first.limit, first.offset), (10, 0));

    let second = songs::list(pool, 10, 10).await.unwrap();
    assert_eq!(second.songs.len(), 5);
    assert_eq!(second.songs[0].title, "Track 10");
}

#[tokio::test]
async fn test_partial_update_keeps_other_fields() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let created = songs::create(pool, new_song("Isis and Osiris", "/music/isis.mp3"))
        .await
        .unwrap();

    let updated = songs::update(
        pool,
        created.id,
        UpdateSong {
            duration: Some(1000),
            album: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(updated.duration, 1000);
    assert_eq!(updated.album, None);
    assert_eq!(updated.title, "Isis and Osiris");
    assert_eq!(updated.file_path, "/music/isis.mp3");
}

#[tokio::test]
async fn test_update_missing_song_is_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let result = songs::update(
        pool,
        SongId::new(404),
        UpdateSong {
            title: Some("Ghost".to_string()),
            ..Default::default()
        },
    )
    .await;

    assert!(matches!(result, Err(HarmonyError::SongNotFound(_))));
}

#[tokio::test]
async fn test_search_matches_title_artist_and_album() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_song_on_album(pool, "Blue Train", "John Coltrane", Some("Blue Train")).await;
    create_test_song_on_album(pool, "Naima", "John Coltrane", Some("Giant Steps")).await;
    create_test_song_on_album(pool, "Take Five", "Dave Brubeck", Some("Time Out")).await;

    let by_artist = songs::search(pool, "coltrane").await.unwrap();
    assert_eq!(by_artist.len(), 2);

    let by_album = songs::search(pool, "Time").await.unwrap();
    assert_eq!(by_album.len(), 1);
    assert_eq!(by_album[0].title, "Take Five");

    let blank = songs::search(pool, "  ").await;
    assert!(matches!(blank, Err(HarmonyError::InvalidInput(_))));
}

#[tokio::test]
async fn test_delete_song_compacts_every_playlist() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();
    let user_id = create_test_user(pool, "owner").await;

    let a = create_test_song(pool, "A").await;
    let doomed = create_test_song(pool, "Doomed").await;
    let c = create_test_song(pool, "C").await;

    let first = create_test_playlist(pool, "First", user_id).await;
    let second = create_test_playlist(pool, "Second", user_id).await;
    add_songs(pool, first, user_id, &[a, doomed, c, doomed]).await;
    add_songs(pool, second, user_id, &[doomed, c]).await;

    songs::delete(pool, doomed).await.unwrap();

    assert_eq!(positions(pool, first).await, vec![(a, 1), (c, 2)]);
    assert_eq!(positions(pool, second).await, vec![(c, 1)]);
    assert!(songs::get_by_id(pool, doomed).await.unwrap().is_none());

    let ordered = playlists::get_ordered_songs(pool, first, user_id).await.unwrap();
    assert_eq!(ordered.len(), 2);
}

#[tokio::test]
async fn test_delete_missing_song_is_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let result = songs::delete(pool, SongId::new(12)).await;
    assert!(matches!(result, Err(HarmonyError::SongNotFound(_))));
}

#[tokio::test]
async fn test_albums_are_derived_from_songs() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    create_test_song_on_album(pool, "So What", "Miles Davis", Some("Kind of Blue")).await;
    create_test_song_on_album(pool, "Blue in Green", "Miles Davis", Some("Kind of Blue")).await;
    create_test_song_on_album(pool, "Single", "Miles Davis", None).await;
    for i in 0..5 {
        create_test_song_on_album(pool, &format!("Cut {i}"), "Various", Some(&format!("Album {i}")))
            .await;
    }

    let all = albums::get_all(pool).await.unwrap();
    assert_eq!(all.len(), 6);
    let kind_of_blue = all.iter().find(|a| a.title == "Kind of Blue").unwrap();
    assert_eq!(kind_of_blue.song_count, 2);

    let featured = albums::get_featured(pool).await.unwrap();
    assert_eq!(featured.len(), albums::FEATURED_LIMIT as usize);
    assert!(featured.iter().all(|a| all.contains(a)));
}
