//! Pure ordering plans
//!
//! Validates reorder and move requests against a snapshot of a playlist and
//! computes the resulting positions. Nothing here touches the database; the
//! reorder engine applies the plans inside its transaction.

use harmony_core::{error::Result, types::*, HarmonyError};
use std::collections::{HashMap, HashSet};

/// Order of entry ids for a full reorder by song id.
///
/// `current` is the playlist in position order as `(entry, song)` pairs. The
/// request must name every member exactly once; a song that occupies more
/// than one slot cannot be placed by song id and is rejected.
pub fn plan_song_reorder(
    current: &[(EntryId, SongId)],
    requested: &[SongId],
) -> Result<Vec<EntryId>> {
    let mut entries_by_song: HashMap<SongId, Vec<EntryId>> = HashMap::new();
    for &(entry_id, song_id) in current {
        entries_by_song.entry(song_id).or_default().push(entry_id);
    }

    let mut seen = HashSet::with_capacity(requested.len());
    let mut order = Vec::with_capacity(requested.len());

    for &song_id in requested {
        if !seen.insert(song_id) {
            return Err(HarmonyError::invalid_input(format!(
                "song {song_id} is listed more than once"
            )));
        }
        match entries_by_song.get(&song_id).map(Vec::as_slice) {
            None | Some([]) => {
                return Err(HarmonyError::invalid_input(format!(
                    "song {song_id} is not in the playlist"
                )));
            }
            Some([entry_id]) => order.push(*entry_id),
            Some(entries) => {
                return Err(HarmonyError::invalid_input(format!(
                    "song {song_id} occurs {} times; reorder by entry id instead",
                    entries.len()
                )));
            }
        }
    }

    if order.len() != current.len() {
        return Err(HarmonyError::invalid_input(format!(
            "reorder must list every song in the playlist ({} of {} given)",
            order.len(),
            current.len()
        )));
    }

    Ok(order)
}

/// Check that `requested` is an exact permutation of `current`
pub fn plan_entry_reorder(current: &[EntryId], requested: &[EntryId]) -> Result<Vec<EntryId>> {
    let members: HashSet<EntryId> = current.iter().copied().collect();
    let mut seen = HashSet::with_capacity(requested.len());

    for &entry_id in requested {
        if !members.contains(&entry_id) {
            return Err(HarmonyError::invalid_input(format!(
                "entry {entry_id} is not in the playlist"
            )));
        }
        if !seen.insert(entry_id) {
            return Err(HarmonyError::invalid_input(format!(
                "entry {entry_id} is listed more than once"
            )));
        }
    }

    if seen.len() != members.len() {
        return Err(HarmonyError::invalid_input(format!(
            "reorder must list every entry in the playlist ({} of {} given)",
            seen.len(),
            members.len()
        )));
    }

    Ok(requested.to_vec())
}

/// Final `(entry, position)` assignments for an ordered list of entries
pub fn assign_positions(order: &[EntryId]) -> impl Iterator<Item = (EntryId, u32)> + '_ {
    order
        .iter()
        .zip(1u32..)
        .map(|(&entry_id, position)| (entry_id, position))
}

/// Contiguous run of positions that moves by `delta` slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
    pub first: u32,
    pub last: u32,
    pub delta: i64,
}

impl Shift {
    /// Whether `position` lies in the shifted run
    pub fn contains(&self, position: u32) -> bool {
        (self.first..=self.last).contains(&position)
    }
}

/// Moving one entry from `from` to `to` and the neighbours it displaces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovePlan {
    pub from: u32,
    pub to: u32,
    pub shift: Shift,
}

impl MovePlan {
    /// Where an entry currently at `position` ends up
    pub fn apply(&self, position: u32) -> u32 {
        if position == self.from {
            self.to
        } else if self.shift.contains(position) {
            (i64::from(position) + self.shift.delta) as u32
        } else {
            position
        }
    }
}

/// Plan a single-entry move in a playlist of `len` entries.
///
/// Returns `None` when the entry already sits at `to`. Moving later shifts
/// the entries in between up by one slot; moving earlier shifts them down.
pub fn plan_move(len: u32, from: u32, to: u32) -> Result<Option<MovePlan>> {
    if to == 0 || to > len {
        return Err(HarmonyError::invalid_input(format!(
            "position {to} is outside 1..={len}"
        )));
    }
    if from == to {
        return Ok(None);
    }

    let shift = if from < to {
        Shift {
            first: from + 1,
            last: to,
            delta: -1,
        }
    } else {
        Shift {
            first: to,
            last: from - 1,
            delta: 1,
        }
    };

    Ok(Some(MovePlan { from, to, shift }))
}
