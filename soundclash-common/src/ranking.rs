//! Score aggregation and tie-aware placement grouping.
//!
//! Everything here is derived data, recomputed from the authoritative
//! ballots on every read. No caching, no persistence.

use uuid::Uuid;

use crate::shuffle;
use crate::types::{Entry, ScoreMap, Votes};

/// Sum every voter's scores into one aggregate map keyed by entry id.
///
/// Order of the input ballots does not matter. Entries nobody scored are
/// absent from the result; callers treat absence as zero.
pub fn sum_scores(ballots: &[Votes]) -> ScoreMap {
    let mut totals = ScoreMap::new();
    for ballot in ballots {
        for (entry_id, score) in &ballot.scores {
            *totals.entry(*entry_id).or_insert(0) += score;
        }
    }
    totals
}

/// Ordered placement groups, highest aggregate score first.
///
/// Each group holds the entries tied at one score level. The zero-score
/// entries, if any, always form the final group; that terminal group is
/// part of the ranking but never placed on the podium.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placements {
    groups: Vec<Vec<Entry>>,
    /// True when the final group is the zero-score group
    has_zero_group: bool,
}

impl Placements {
    pub fn groups(&self) -> &[Vec<Entry>] {
        &self.groups
    }

    pub fn into_groups(self) -> Vec<Vec<Entry>> {
        self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The first `n` scored groups, for podium display.
    ///
    /// The terminal zero-score group is never part of the podium: entries
    /// nobody scored belong in the remainder listing instead.
    pub fn top(&self, n: usize) -> Placements {
        let scored = self.groups.len() - usize::from(self.has_zero_group);
        Placements {
            groups: self.groups[..scored.min(n)].to_vec(),
            has_zero_group: false,
        }
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.groups.iter().flatten().any(|e| e.id == id)
    }

    /// Entries of `entries` not present in any group here, preserving the
    /// order of the argument.
    pub fn difference(&self, entries: &[Entry]) -> Vec<Entry> {
        entries
            .iter()
            .filter(|e| !self.contains(e.id))
            .cloned()
            .collect()
    }
}

/// Group `entries` into placements by aggregated score.
///
/// Entries are first sorted by id (the stable tie-break substrate), then
/// stable-sorted by descending score, then split into runs of equal score.
/// Within each group the order is a fixed-seed shuffle, so ties come out
/// stable across calls without following id order.
pub fn placement_groups(entries: &[Entry], scores: &ScoreMap) -> Placements {
    if entries.is_empty() {
        return Placements::default();
    }

    let score_of = |e: &Entry| scores.get(&e.id).copied().unwrap_or(0);

    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    // Stable sort: ties keep the id order established above.
    sorted.sort_by(|a, b| score_of(b).cmp(&score_of(a)));

    let mut groups: Vec<Vec<Entry>> = Vec::new();
    let mut current: Vec<Entry> = Vec::new();
    let mut current_score = score_of(&sorted[0]);

    for entry in sorted {
        let score = score_of(&entry);
        if score != current_score {
            groups.push(finish_group(current));
            current = Vec::new();
            current_score = score;
        }
        current.push(entry);
    }
    groups.push(finish_group(current));

    Placements {
        groups,
        // The descending sort puts the zero run last, so the final
        // current_score tells whether a zero group exists at all.
        has_zero_group: current_score == 0,
    }
}

fn finish_group(mut group: Vec<Entry>) -> Vec<Entry> {
    group.sort_by(|a, b| a.id.cmp(&b.id));
    shuffle::shuffle_tied(&mut group);
    group
}

/// Sort entries by display name: title, then author as tie-break.
pub fn sort_by_name(entries: &mut [Entry]) {
    entries.sort_by(|a, b| {
        (a.title.to_lowercase(), a.author.to_lowercase())
            .cmp(&(b.title.to_lowercase(), b.author.to_lowercase()))
    });
}

/// Stable-sort entries by descending aggregated score.
pub fn sort_by_score(entries: &mut [Entry], scores: &ScoreMap) {
    entries.sort_by(|a, b| {
        let sa = scores.get(&a.id).copied().unwrap_or(0);
        let sb = scores.get(&b.id).copied().unwrap_or(0);
        sb.cmp(&sa)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(title: &str) -> Entry {
        Entry {
            id: Uuid::now_v7(),
            title: title.to_string(),
            author: "author".to_string(),
            filename: format!("{title}.wav"),
            created_at: Utc::now(),
        }
    }

    fn ballot(battle: &str, voter: &str, scores: &[(Uuid, i64)]) -> Votes {
        let mut votes = Votes::new(battle, voter, Utc::now());
        for (id, score) in scores {
            votes.update_score(*id, *score, Utc::now());
        }
        votes
    }

    #[test]
    fn test_sum_scores_empty_input() {
        assert!(sum_scores(&[]).is_empty());
    }

    #[test]
    fn test_sum_scores_permutation_invariant() {
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();
        let ballots = vec![
            ballot("demo", "v1", &[(a, 3), (b, 2)]),
            ballot("demo", "v2", &[(a, 2), (b, 3)]),
            ballot("demo", "v3", &[(a, 1)]),
        ];

        let forward = sum_scores(&ballots);
        let mut reversed = ballots.clone();
        reversed.reverse();

        assert_eq!(forward, sum_scores(&reversed));
        assert_eq!(forward.get(&a), Some(&6));
        assert_eq!(forward.get(&b), Some(&5));
    }

    #[test]
    fn test_placements_empty_entries() {
        assert!(placement_groups(&[], &ScoreMap::new()).is_empty());
    }

    #[test]
    fn test_placements_all_zero_is_single_group() {
        let entries = vec![entry("a"), entry("b"), entry("c")];
        let placements = placement_groups(&entries, &ScoreMap::new());

        assert_eq!(placements.len(), 1);
        assert_eq!(placements.groups()[0].len(), 3);

        // Nothing scored, nothing placed: everything lands in the remainder
        let podium = placements.top(3);
        assert!(podium.is_empty());
        assert_eq!(podium.difference(&entries).len(), 3);
    }

    #[test]
    fn test_placements_single_entry() {
        let entries = vec![entry("a")];
        let mut scores = ScoreMap::new();
        scores.insert(entries[0].id, 3);

        let placements = placement_groups(&entries, &scores);
        assert_eq!(placements.len(), 1);
        assert_eq!(placements.groups()[0], entries);
    }

    #[test]
    fn test_placements_partition_entries_exactly() {
        let entries: Vec<Entry> = (0..7).map(|i| entry(&format!("e{i}"))).collect();
        let mut scores = ScoreMap::new();
        scores.insert(entries[0].id, 5);
        scores.insert(entries[1].id, 5);
        scores.insert(entries[2].id, 3);
        scores.insert(entries[3].id, 1);
        // entries 4..7 unscored

        let placements = placement_groups(&entries, &scores);
        assert_eq!(placements.len(), 4);

        let mut seen: Vec<Uuid> = placements.groups().iter().flatten().map(|e| e.id).collect();
        seen.sort();
        let mut expected: Vec<Uuid> = entries.iter().map(|e| e.id).collect();
        expected.sort();
        assert_eq!(seen, expected, "groups must partition the entries");

        // Terminal zero group holds every unscored entry.
        assert_eq!(placements.groups()[3].len(), 3);
    }

    #[test]
    fn test_placements_input_order_does_not_matter() {
        let entries: Vec<Entry> = (0..6).map(|i| entry(&format!("e{i}"))).collect();
        let mut scores = ScoreMap::new();
        for e in &entries[..3] {
            scores.insert(e.id, 4);
        }
        for e in &entries[3..] {
            scores.insert(e.id, 2);
        }

        let forward = placement_groups(&entries, &scores);
        let mut shuffled = entries.clone();
        shuffled.reverse();
        shuffled.swap(0, 3);

        assert_eq!(forward, placement_groups(&shuffled, &scores));
    }

    #[test]
    fn test_placements_tie_order_reproducible() {
        let entries: Vec<Entry> = (0..5).map(|i| entry(&format!("e{i}"))).collect();
        let mut scores = ScoreMap::new();
        for e in &entries {
            scores.insert(e.id, 2);
        }

        let first = placement_groups(&entries, &scores);
        let second = placement_groups(&entries, &scores);
        assert_eq!(first, second);
    }

    #[test]
    fn test_demo_scenario() {
        // Battle "demo": entries A,B,C. v1: A=3,B=2. v2: A=2,B=3.
        let entries = vec![entry("a"), entry("b"), entry("c")];
        let (a, b, c) = (entries[0].id, entries[1].id, entries[2].id);

        let ballots = vec![
            ballot("demo", "v1", &[(a, 3), (b, 2)]),
            ballot("demo", "v2", &[(a, 2), (b, 3)]),
        ];
        let scores = sum_scores(&ballots);
        assert_eq!(scores.get(&a), Some(&5));
        assert_eq!(scores.get(&b), Some(&5));
        assert_eq!(scores.get(&c), None);

        let placements = placement_groups(&entries, &scores);
        assert_eq!(placements.len(), 2);

        let mut first: Vec<Uuid> = placements.groups()[0].iter().map(|e| e.id).collect();
        first.sort();
        let mut tied = vec![a, b];
        tied.sort();
        assert_eq!(first, tied, "A and B tie for 1st");
        assert_eq!(
            placements.groups()[1].iter().map(|e| e.id).collect::<Vec<_>>(),
            vec![c],
            "C is the terminal zero-score group"
        );

        let podium = placements.top(3);
        assert_eq!(podium.len(), 1, "the zero group is never placed");

        let rest = podium.difference(&entries);
        assert_eq!(rest.iter().map(|e| e.id).collect::<Vec<_>>(), vec![c]);
    }

    #[test]
    fn test_score_shift_after_revocation() {
        // v1 sets A=3 then moves the 3 to B: A's score is revoked.
        let entries = vec![entry("a"), entry("b")];
        let (a, b) = (entries[0].id, entries[1].id);

        let mut votes = Votes::new("demo", "v1", Utc::now());
        votes.update_score(a, 3, Utc::now());
        votes.update_score(b, 3, Utc::now());

        let scores = sum_scores(&[votes]);
        assert_eq!(scores.get(&a), None);
        assert_eq!(scores.get(&b), Some(&3));
    }

    #[test]
    fn test_sort_by_name() {
        let mut entries = vec![entry("zulu"), entry("alpha"), entry("Mid")];
        sort_by_name(&mut entries);
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["alpha", "Mid", "zulu"]);
    }
}
