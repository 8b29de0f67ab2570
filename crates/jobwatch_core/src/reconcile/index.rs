//! Identity lookup set over a posting sequence.

use crate::model::identity::PostingIdentity;
use crate::model::posting::Posting;
use std::collections::HashSet;

/// Borrowed set of the identities in one posting sequence.
#[derive(Debug, Default)]
pub struct IdentityIndex<'a> {
    identities: HashSet<&'a PostingIdentity>,
}

impl<'a> IdentityIndex<'a> {
    pub fn build(postings: &'a [Posting]) -> Self {
        postings.iter().collect()
    }

    pub fn contains(&self, identity: &PostingIdentity) -> bool {
        self.identities.contains(identity)
    }

    /// Number of distinct identities.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

impl<'a> FromIterator<&'a Posting> for IdentityIndex<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Posting>>(iter: I) -> Self {
        Self {
            identities: iter.into_iter().map(|posting| &posting.identity).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IdentityIndex;
    use crate::model::posting::Posting;

    #[test]
    fn index_reflects_exactly_its_input() {
        let a = Posting::new("1", "c1", "Clerk", "Revenue", "u1");
        let b = Posting::new("2", "c2", "Analyst", "Labor", "u2");
        let outsider = Posting::new("3", "c3", "Nurse", "Health", "u3");
        let postings = vec![a.clone(), b.clone(), a.clone()];

        let index = IdentityIndex::build(&postings);
        assert_eq!(index.len(), 2);
        assert!(index.contains(&a.identity));
        assert!(index.contains(&b.identity));
        assert!(!index.contains(&outsider.identity));
    }

    #[test]
    fn empty_input_builds_empty_index() {
        let index = IdentityIndex::build(&[]);
        assert!(index.is_empty());
    }
}
