//! Part-of-speech filtering.
//!
//! Tags are matched exactly (case-sensitive) against whatever vocabulary the annotator emits.
//! Vocabulary validation happens in [crate::config].
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Filter;
use crate::annotation::TokenSequence;

/// Allowed set of part-of-speech tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PosFilter {
    allowed: BTreeSet<String>,
}

impl PosFilter {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.allowed.iter().map(String::as_str)
    }

    /// Positions of `doc` whose tag is allowed, in order.
    pub fn indices<D: TokenSequence + ?Sized>(&self, doc: &D) -> Vec<usize> {
        self.tag_positions((0..doc.len()).map(|i| doc.token_tag(i)))
    }

    fn tag_positions<'a, T>(&self, tags: T) -> Vec<usize>
    where
        T: IntoIterator<Item = Option<&'a str>>,
    {
        tags.into_iter()
            .enumerate()
            .filter_map(|(i, tag)| match tag {
                Some(t) if self.detect(t) => Some(i),
                _ => None,
            })
            .collect()
    }
}

impl Filter<&str> for PosFilter {
    fn detect(&self, tag: &str) -> bool {
        self.allowed.contains(tag)
    }
}

/// For each document's tag sequence, the positions whose tag is in `filter`.
///
/// Documents without any matching tag get an empty list.
pub fn indices_by_tag<'a, S, T>(sequences: S, filter: &PosFilter) -> Vec<Vec<usize>>
where
    S: IntoIterator<Item = T>,
    T: IntoIterator<Item = Option<&'a str>>,
{
    sequences
        .into_iter()
        .map(|tags| filter.tag_positions(tags))
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::annotation::Doc;
    use crate::filtering::Filter;

    use super::{indices_by_tag, PosFilter};

    #[test]
    fn test_detect_is_case_sensitive() {
        let f = PosFilter::new(["NOUN", "VERB"]);
        assert!(f.detect("NOUN"));
        assert!(!f.detect("noun"));
        assert!(!f.detect("ADJ"));
    }

    #[test]
    fn test_indices_by_tag() {
        let f = PosFilter::new(["NOUN", "ADJ"]);
        let tags = vec![
            vec![Some("DET"), Some("ADJ"), Some("NOUN"), Some("VERB")],
            vec![Some("VERB"), None],
            vec![],
            vec![Some("NOUN"), None, Some("NOUN")],
        ];
        let res = indices_by_tag(tags, &f);
        assert_eq!(res, vec![vec![1, 2], vec![], vec![], vec![0, 2]]);
    }

    #[test]
    fn test_doc_indices() {
        let d = Doc::from_tagged(vec![("big", "ADJ"), ("dogs", "NOUN"), ("bark", "VERB")]);
        let f = PosFilter::new(["VERB"]);
        assert_eq!(f.indices(&d), vec![2]);
        assert!(PosFilter::default().indices(&d).is_empty());
    }
}
