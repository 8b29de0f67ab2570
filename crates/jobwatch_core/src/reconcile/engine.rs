//! Posting set difference between the listing source and the store.
//!
//! # Invariants
//! - `to_save` and `to_delete` never share an identity.
//! - Each output keeps the relative order of the input it was drawn from.
//! - An identity repeated within one input contributes only its first
//!   occurrence.
//! - An empty remote list is not special-cased: every known posting is
//!   reported as closed.

use crate::model::identity::PostingIdentity;
use crate::model::posting::Posting;
use crate::reconcile::index::IdentityIndex;
use std::collections::HashSet;

/// Postings that opened (`to_save`) and closed (`to_delete`) in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationDelta {
    pub to_save: Vec<Posting>,
    pub to_delete: Vec<Posting>,
}

impl ReconciliationDelta {
    /// Total number of postings that opened or closed.
    pub fn change_count(&self) -> usize {
        self.to_save.len() + self.to_delete.len()
    }

    /// Gates persistence writes and notification dispatch.
    pub fn has_changes(&self) -> bool {
        self.change_count() > 0
    }
}

/// Computes the delta between what the source lists now and what is stored.
pub fn reconcile(remote_postings: &[Posting], known_postings: &[Posting]) -> ReconciliationDelta {
    let known_index = IdentityIndex::build(known_postings);
    let to_save = absent_from(remote_postings, &known_index);

    let remote_index = IdentityIndex::build(remote_postings);
    let to_delete = absent_from(known_postings, &remote_index);

    ReconciliationDelta { to_save, to_delete }
}

fn absent_from(postings: &[Posting], index: &IdentityIndex<'_>) -> Vec<Posting> {
    let mut emitted: HashSet<&PostingIdentity> = HashSet::new();
    postings
        .iter()
        .filter(|&posting| !index.contains(&posting.identity) && emitted.insert(&posting.identity))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::reconcile;
    use crate::model::identity::PostingIdentity;
    use crate::model::posting::Posting;
    use std::collections::HashSet;

    fn posting(id: &str, title: &str) -> Posting {
        Posting::new(
            id,
            format!("c-{id}"),
            title,
            "Administration",
            format!("https://jobs.example.org/{id}"),
        )
    }

    fn identities(postings: &[Posting]) -> Vec<PostingIdentity> {
        postings.iter().map(|p| p.identity.clone()).collect()
    }

    fn sample() -> Vec<Posting> {
        vec![
            posting("1", "Clerk"),
            posting("2", "Analyst"),
            posting("3", "Nurse"),
            posting("4", "Engineer"),
        ]
    }

    #[test]
    fn new_posting_is_saved_and_nothing_deleted() {
        let known = vec![posting("1", "Clerk")];
        let remote = vec![posting("1", "Clerk"), posting("2", "Analyst")];

        let delta = reconcile(&remote, &known);
        assert_eq!(delta.to_save, vec![posting("2", "Analyst")]);
        assert!(delta.to_delete.is_empty());
        assert!(delta.has_changes());
    }

    #[test]
    fn vanished_posting_is_deleted_and_nothing_saved() {
        let known = vec![posting("1", "Clerk"), posting("2", "Analyst")];
        let remote = vec![posting("1", "Clerk")];

        let delta = reconcile(&remote, &known);
        assert!(delta.to_save.is_empty());
        assert_eq!(delta.to_delete, vec![posting("2", "Analyst")]);
    }

    #[test]
    fn identical_inputs_produce_no_changes() {
        let postings = sample();
        let delta = reconcile(&postings, &postings);
        assert!(delta.to_save.is_empty());
        assert!(delta.to_delete.is_empty());
        assert!(!delta.has_changes());
    }

    #[test]
    fn reordered_remote_produces_no_changes() {
        let known = sample();
        let mut remote = sample();
        remote.reverse();
        assert!(!reconcile(&remote, &known).has_changes());
    }

    #[test]
    fn first_run_saves_everything_in_remote_order() {
        let remote = sample();
        let delta = reconcile(&remote, &[]);
        assert_eq!(delta.to_save, remote);
        assert!(delta.to_delete.is_empty());
    }

    #[test]
    fn empty_remote_deletes_everything_in_known_order() {
        let known = sample();
        let delta = reconcile(&[], &known);
        assert!(delta.to_save.is_empty());
        assert_eq!(delta.to_delete, known);
        assert_eq!(delta.change_count(), known.len());
    }

    #[test]
    fn retitled_posting_reads_as_close_plus_open() {
        let known = vec![posting("1", "Clerk")];
        let remote = vec![posting("1", "Clerk II")];

        let delta = reconcile(&remote, &known);
        assert_eq!(delta.to_save, remote);
        assert_eq!(delta.to_delete, known);
    }

    #[test]
    fn partition_holds_for_overlapping_inputs() {
        let all = sample();
        let known = vec![all[0].clone(), all[1].clone(), all[2].clone()];
        let remote = vec![all[3].clone(), all[1].clone(), all[3].clone(), all[0].clone()];

        let delta = reconcile(&remote, &known);
        let saved: HashSet<_> = identities(&delta.to_save).into_iter().collect();
        let deleted: HashSet<_> = identities(&delta.to_delete).into_iter().collect();

        assert!(saved.is_disjoint(&deleted));
        assert_eq!(identities(&delta.to_save), vec![all[3].identity.clone()]);
        assert_eq!(identities(&delta.to_delete), vec![all[2].identity.clone()]);
    }

    #[test]
    fn inputs_are_left_untouched() {
        let known = sample();
        let remote = vec![posting("9", "Welder")];
        let known_before = known.clone();
        let remote_before = remote.clone();

        let _ = reconcile(&remote, &known);
        assert_eq!(known, known_before);
        assert_eq!(remote, remote_before);
    }
}
