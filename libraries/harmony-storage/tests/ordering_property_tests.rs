//! Property-based tests for playlist ordering
//!
//! Uses proptest to verify the contiguity invariant across random operation
//! sequences, both for the pure planner and against a real SQLite file.


use harmony_core::types::*;
use harmony_storage::playlists::{self, ordering};
use proptest::prelude::*;
use test_helpers::*;

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Op {
    Add(usize),
    RemoveSong(usize),
    RemoveEntryAt(usize),
    Move(usize, u32),
    Reverse,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0usize..4).prop_map(Op::Add),
        1 => (0usize..4).prop_map(Op::RemoveSong),
        1 => (0usize..8).prop_map(Op::RemoveEntryAt),
        2 => ((0usize..8), (1u32..9)).prop_map(|(i, to)| Op::Move(i, to)),
        1 => Just(Op::Reverse),
    ]
}

/// Vec model of a single move: remove at `from`, insert at `to` (1-based)
fn model_move<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut out = items.to_vec();
    let item = out.remove(from - 1);
    out.insert(to - 1, item);
    out
}

// ===== Pure planner properties =====

proptest! {
    /// Property: a planned move relocates exactly like Vec remove + insert
    #[test]
    fn planned_move_matches_vec_model(len in 1u32..40, from_seed in 0u32..40, to_seed in 0u32..40) {
        let from = from_seed % len + 1;
        let to = to_seed % len + 1;
        let items: Vec<u32> = (1..=len).collect();

        let expected = model_move(&items, from as usize, to as usize);

        let mut actual = vec![0u32; len as usize];
        match ordering::plan_move(len, from, to).unwrap() {
            Some(plan) => {
                for position in 1..=len {
                    actual[(plan.apply(position) - 1) as usize] = position;
                }
            }
            None => {
                prop_assert_eq!(from, to);
                actual.clone_from(&items);
            }
        }

        prop_assert_eq!(actual, expected);
    }

    /// Property: any permutation of distinct members is accepted and kept in order
    #[test]
    fn song_reorder_accepts_every_permutation(
        order in Just((1i64..=12).collect::<Vec<_>>()).prop_shuffle()
    ) {
        let current: Vec<(EntryId, SongId)> = (1i64..=12)
            .map(|i| (EntryId::new(i + 100), SongId::new(i)))
            .collect();
        let requested: Vec<SongId> = order.iter().copied().map(SongId::new).collect();

        let planned = ordering::plan_song_reorder(&current, &requested).unwrap();
        let expected: Vec<EntryId> = order.iter().map(|&i| EntryId::new(i + 100)).collect();
        prop_assert_eq!(planned, expected);
    }

    /// Property: dropping any member from the request is rejected
    #[test]
    fn song_reorder_rejects_any_omission(missing in 0usize..6) {
        let current: Vec<(EntryId, SongId)> = (1i64..=6)
            .map(|i| (EntryId::new(i), SongId::new(i)))
            .collect();
        let requested: Vec<SongId> = current
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != missing)
            .map(|(_, &(_, song))| song)
            .collect();

        prop_assert!(ordering::plan_song_reorder(&current, &requested).is_err());
    }
}

// ===== Database properties =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Property: positions stay exactly 1..=N after any sequence of mutations
    #[test]
    fn positions_stay_contiguous(ops in prop::collection::vec(arbitrary_op(), 1..25)) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let test_db = TestDb::new().await;
            let pool = test_db.pool();
            let user_id = create_test_user(pool, "owner").await;
            let playlist_id = create_test_playlist(pool, "Shuffled", user_id).await;

            let mut songs = Vec::new();
            for title in ["A", "B", "C", "D"] {
                songs.push(create_test_song(pool, title).await);
            }

            // Vec model of the playlist as song ids
            let mut model: Vec<SongId> = Vec::new();

            for op in ops {
                match op {
                    Op::Add(i) => {
                        playlists::add_song(pool, playlist_id, songs[i], user_id).await.unwrap();
                        model.push(songs[i]);
                    }
                    Op::RemoveSong(i) => {
                        let result = playlists::remove_song(pool, playlist_id, songs[i], user_id).await;
                        match model.iter().position(|&s| s == songs[i]) {
                            Some(index) => {
                                result.unwrap();
                                model.remove(index);
                            }
                            None => assert!(result.unwrap_err().is_not_found()),
                        }
                    }
                    Op::RemoveEntryAt(i) => {
                        if i < model.len() {
                            let ordered = playlists::get_ordered_songs(pool, playlist_id, user_id).await.unwrap();
                            playlists::remove_entry(pool, playlist_id, ordered[i].entry_id, user_id).await.unwrap();
                            model.remove(i);
                        }
                    }
                    Op::Move(i, to) => {
                        if i < model.len() {
                            let ordered = playlists::get_ordered_songs(pool, playlist_id, user_id).await.unwrap();
                            let result = playlists::move_entry(pool, playlist_id, ordered[i].entry_id, to, user_id).await;
                            if (to as usize) <= model.len() {
                                result.unwrap();
                                model = model_move(&model, i + 1, to as usize);
                            } else {
                                assert!(result.is_err());
                            }
                        }
                    }
                    Op::Reverse => {
                        let ordered = playlists::get_ordered_songs(pool, playlist_id, user_id).await.unwrap();
                        let reversed: Vec<EntryId> = ordered.iter().rev().map(|o| o.entry_id).collect();
                        playlists::reorder_entries(pool, playlist_id, &reversed, user_id).await.unwrap();
                        model.reverse();
                    }
                }

                assert_contiguous(pool, playlist_id).await;
            }

            assert_eq!(song_order(pool, playlist_id).await, model);
        });
    }
}
