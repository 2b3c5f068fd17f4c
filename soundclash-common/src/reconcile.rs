//! Reconciliation of scanned candidate entries against persisted battles.
//!
//! A re-scan must never change the identity of an entry it has seen before:
//! the filename is the match key, the id and creation time carry forward.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::types::{Battle, Entry, ScannedBattle};

/// Merge a freshly scanned battle with its previously persisted record.
///
/// The result's entry collection is exactly the candidate list in scan
/// order: recognized filenames keep their id and creation time (title and
/// author refresh from the scan), new filenames mint a fresh id stamped
/// `now`. Entries present only in the previous record are dropped. Battle
/// creation time and the closed/hidden flags carry forward when a previous
/// record exists.
pub fn reconcile_battle(
    scanned: &ScannedBattle,
    previous: Option<&Battle>,
    now: DateTime<Utc>,
) -> Battle {
    let mut battle = Battle {
        name: scanned.name.clone(),
        entries: Vec::with_capacity(scanned.entries.len()),
        created_at: now,
        closed_at: None,
        hidden: false,
    };

    if let Some(prev) = previous {
        battle.created_at = prev.created_at;
        battle.closed_at = prev.closed_at;
        battle.hidden = prev.hidden;
    }

    for candidate in &scanned.entries {
        let (id, created_at) = match previous.and_then(|p| p.entry_by_filename(&candidate.filename))
        {
            Some(existing) => (existing.id, existing.created_at),
            None => (Uuid::now_v7(), now),
        };
        battle.entries.push(Entry {
            id,
            title: candidate.title.clone(),
            author: candidate.author.clone(),
            filename: candidate.filename.clone(),
            created_at,
        });
    }

    battle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScannedEntry;

    fn scanned_entry(filename: &str) -> ScannedEntry {
        let stem = filename.trim_end_matches(".wav");
        ScannedEntry {
            author: "author".to_string(),
            title: stem.to_string(),
            filename: filename.to_string(),
            path: format!("demo/{filename}"),
        }
    }

    fn scanned(names: &[&str]) -> ScannedBattle {
        ScannedBattle {
            name: "demo".to_string(),
            entries: names.iter().map(|n| scanned_entry(n)).collect(),
        }
    }

    #[test]
    fn test_new_battle_is_open_and_stamped_now() {
        let now = Utc::now();
        let battle = reconcile_battle(&scanned(&["a.wav"]), None, now);

        assert_eq!(battle.name, "demo");
        assert_eq!(battle.created_at, now);
        assert!(battle.is_voting_open());
        assert!(!battle.hidden);
        assert_eq!(battle.entries.len(), 1);
        assert_eq!(battle.entries[0].created_at, now);
    }

    #[test]
    fn test_known_filename_keeps_identity() {
        let first = reconcile_battle(&scanned(&["a.wav"]), None, Utc::now());
        let original = first.entries[0].clone();

        let second = reconcile_battle(&scanned(&["a.wav"]), Some(&first), Utc::now());
        assert_eq!(second.entries[0].id, original.id);
        assert_eq!(second.entries[0].created_at, original.created_at);
    }

    #[test]
    fn test_new_filename_mints_fresh_id() {
        let first = reconcile_battle(&scanned(&["a.wav"]), None, Utc::now());
        let second = reconcile_battle(&scanned(&["a.wav", "b.wav"]), Some(&first), Utc::now());

        assert_eq!(second.entries.len(), 2);
        assert_eq!(second.entries[0].id, first.entries[0].id);
        assert_ne!(second.entries[1].id, first.entries[0].id);
    }

    #[test]
    fn test_unscanned_filename_is_dropped() {
        let first = reconcile_battle(&scanned(&["a.wav", "b.wav"]), None, Utc::now());
        let second = reconcile_battle(&scanned(&["b.wav"]), Some(&first), Utc::now());

        assert_eq!(second.entries.len(), 1);
        assert_eq!(second.entries[0].filename, "b.wav");
        assert!(second.entry_by_filename("a.wav").is_none());
    }

    #[test]
    fn test_flags_carry_forward() {
        let now = Utc::now();
        let mut first = reconcile_battle(&scanned(&["a.wav"]), None, now);
        first.closed_at = Some(now);
        first.hidden = true;

        let second = reconcile_battle(&scanned(&["a.wav"]), Some(&first), Utc::now());
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(second.closed_at, Some(now));
        assert!(second.hidden);
    }

    #[test]
    fn test_metadata_refreshes_on_match() {
        let first = reconcile_battle(&scanned(&["a.wav"]), None, Utc::now());

        let mut rescanned = scanned(&["a.wav"]);
        rescanned.entries[0].title = "renamed".to_string();
        rescanned.entries[0].author = "somebody else".to_string();

        let second = reconcile_battle(&rescanned, Some(&first), Utc::now());
        assert_eq!(second.entries[0].id, first.entries[0].id);
        assert_eq!(second.entries[0].title, "renamed");
        assert_eq!(second.entries[0].author, "somebody else");
    }

    #[test]
    fn test_entry_order_follows_scan_order() {
        let first = reconcile_battle(&scanned(&["a.wav", "b.wav"]), None, Utc::now());
        let second = reconcile_battle(&scanned(&["b.wav", "a.wav"]), Some(&first), Utc::now());

        let filenames: Vec<&str> = second.entries.iter().map(|e| e.filename.as_str()).collect();
        assert_eq!(filenames, vec!["b.wav", "a.wav"]);
    }
}
