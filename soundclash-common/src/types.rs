//! Domain records: battles, entries, ballots and scan descriptors.
//!
//! Battles and ballots are stored as serialized records; everything here
//! round-trips through serde_json without loss.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lowest accepted score (3rd place)
pub const MIN_SCORE: i64 = 1;
/// Highest accepted score (1st place)
pub const MAX_SCORE: i64 = 3;

/// Entry id -> score. A single voter's ballot or an aggregate across voters,
/// depending on context. Absent entries count as zero.
pub type ScoreMap = BTreeMap<Uuid, i64>;

/// True when `score` is inside the accepted bounded set.
pub fn score_is_valid(score: i64) -> bool {
    (MIN_SCORE..=MAX_SCORE).contains(&score)
}

/// One competing submission within a battle.
///
/// The id is minted once at first discovery and never changes; only title
/// and author may be refreshed by a later scan of the same filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Time-ordered unique id, sortable by creation order
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// Source filename, the reconciliation match key
    pub filename: String,
    pub created_at: DateTime<Utc>,
}

/// One named voting round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    /// Storage key and externally visible identifier
    pub name: String,
    /// Scan-ordered entries; ids are unique within the battle
    pub entries: Vec<Entry>,
    pub created_at: DateTime<Utc>,
    /// None = voting open
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
    /// Hidden battles are invisible outside the admin API
    #[serde(default)]
    pub hidden: bool,
}

impl Battle {
    pub fn is_voting_open(&self) -> bool {
        self.closed_at.is_none()
    }

    pub fn entry_by_id(&self, id: Uuid) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn entry_by_filename(&self, filename: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.filename == filename)
    }
}

/// One voter's full ballot for one battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Votes {
    pub battle_name: String,
    /// Opaque, externally supplied voter identifier
    pub voter_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub scores: ScoreMap,
}

impl Votes {
    /// Fresh empty ballot, created on a voter's first vote for a battle.
    pub fn new(battle_name: impl Into<String>, voter_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            battle_name: battle_name.into(),
            voter_id: voter_id.into(),
            created_at: now,
            updated_at: now,
            scores: ScoreMap::new(),
        }
    }

    /// Assign `score` to `entry_id`, keeping each score value unique within
    /// the ballot: any other entry currently holding `score` is revoked.
    ///
    /// Re-assigning the score an entry already holds is a no-op and leaves
    /// `updated_at` untouched.
    pub fn update_score(&mut self, entry_id: Uuid, score: i64, now: DateTime<Utc>) {
        if self.scores.get(&entry_id) == Some(&score) {
            return;
        }
        self.scores.retain(|id, s| *s != score || *id == entry_id);
        self.scores.insert(entry_id, score);
        self.updated_at = now;
    }
}

/// Candidate entry descriptor produced by the directory scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedEntry {
    pub author: String,
    pub title: String,
    pub filename: String,
    /// Path relative to the battles root
    pub path: String,
}

/// Candidate battle descriptor: one scanned subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedBattle {
    pub name: String,
    pub entries: Vec<ScannedEntry>,
}
